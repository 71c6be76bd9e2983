//! Rate functions (C1): point evaluation `λ(t)` for the tagged variants a transition
//! may carry, plus the custom shared-library escape hatch.
//!
//! Evaluation is total, deterministic, and side-effect-free. A variant that would
//! mathematically go negative (Linear below its root) is clamped to 0 here rather
//! than left for callers to rediscover.

use crate::error::{SimError, SimResult};
use std::ffi::c_void;
use std::fmt;

pub mod custom;
pub mod tests;

pub use custom::CustomRate;

/// A time-dependent hazard shape. `Constant` and `Switch` are closed-form and the
/// envelope builder (`crate::envelope`) bypasses numerical maximisation for them.
pub enum Rate {
    Constant {
        r: f64,
    },
    Linear {
        intercept: f64,
        slope: f64,
    },
    Switch {
        pre: f64,
        post: f64,
        t_s: f64,
    },
    Pulse {
        period: f64,
        low_len: f64,
        lo: f64,
        hi: f64,
    },
    Custom(CustomRate),
}

impl Rate {
    pub fn constant(r: f64) -> Self {
        Rate::Constant { r }
    }

    pub fn linear(intercept: f64, slope: f64) -> Self {
        Rate::Linear { intercept, slope }
    }

    pub fn switch(pre: f64, post: f64, t_s: f64) -> Self {
        Rate::Switch { pre, post, t_s }
    }

    pub fn pulse(period: f64, low_len: f64, lo: f64, hi: f64) -> Self {
        Rate::Pulse {
            period,
            low_len,
            lo,
            hi,
        }
    }

    pub fn custom(library_path: &str, symbol_name: &str) -> SimResult<Self> {
        Ok(Rate::Custom(CustomRate::load(library_path, symbol_name)?))
    }

    /// Is this rate known not to vary with time, so the homogeneous simulator (C5)
    /// may use it directly without building an envelope?
    pub fn is_homogeneous(&self) -> bool {
        matches!(self, Rate::Constant { .. })
    }

    /// Does this variant admit a closed-form envelope, letting the builder bypass
    /// the bracketed maximiser?
    pub fn has_closed_form_envelope(&self) -> bool {
        matches!(self, Rate::Constant { .. } | Rate::Switch { .. })
    }

    /// Point evaluation `λ(t)`. Always non-negative.
    pub fn eval(&self, t: f64) -> f64 {
        let raw = match self {
            Rate::Constant { r } => *r,
            Rate::Linear { intercept, slope } => intercept + slope * t,
            Rate::Switch { pre, post, t_s } => {
                if t < *t_s {
                    *pre
                } else {
                    *post
                }
            }
            Rate::Pulse {
                period,
                low_len,
                lo,
                hi,
            } => {
                let phase = t.rem_euclid(*period);
                if phase < *low_len {
                    *lo
                } else {
                    *hi
                }
            }
            Rate::Custom(c) => c.eval(t),
        };
        raw.max(0.0)
    }

    /// Closed-form supremum of `λ` on `[a, b]` for variants that admit one; `None`
    /// otherwise, signalling the caller should fall back to numerical maximisation.
    pub fn closed_form_sup(&self, a: f64, b: f64) -> Option<f64> {
        match self {
            Rate::Constant { r } => Some(r.max(0.0)),
            Rate::Switch { pre, post, t_s } => {
                if b < *t_s {
                    Some(pre.max(0.0))
                } else if a >= *t_s {
                    Some(post.max(0.0))
                } else {
                    Some(pre.max(0.0).max(post.max(0.0)))
                }
            }
            _ => None,
        }
    }
}

impl fmt::Debug for Rate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rate::Constant { r } => f.debug_struct("Constant").field("r", r).finish(),
            Rate::Linear { intercept, slope } => f
                .debug_struct("Linear")
                .field("intercept", intercept)
                .field("slope", slope)
                .finish(),
            Rate::Switch { pre, post, t_s } => f
                .debug_struct("Switch")
                .field("pre", pre)
                .field("post", post)
                .field("t_s", t_s)
                .finish(),
            Rate::Pulse {
                period,
                low_len,
                lo,
                hi,
            } => f
                .debug_struct("Pulse")
                .field("period", period)
                .field("low_len", low_len)
                .field("lo", lo)
                .field("hi", hi)
                .finish(),
            Rate::Custom(c) => f.debug_struct("Custom").field("path", &c.path).finish(),
        }
    }
}

/// The ABI a loaded custom-rate symbol must satisfy: `double symbol(double t, void* ctx)`.
pub type CustomRateFn = unsafe extern "C" fn(f64, *mut c_void) -> f64;

pub(crate) fn wrap_resource_error(msg: impl Into<String>) -> SimError {
    SimError::ResourceError(msg.into())
}
