//! Update / offspring (C3): turns a firing transition into an integer state delta,
//! either a fixed vector or a per-component random draw, always decrementing the
//! firing parent's own slot to model its disappearance.

use crate::error::{SimError, SimResult};
use crate::rng::RandomSource;

pub mod tests;

/// A named offspring distribution for the `Random` update variant.
#[derive(Debug, Clone, Copy)]
pub enum OffspringDistribution {
    Poisson { mu: f64 },
    Geometric { p: f64 },
}

impl OffspringDistribution {
    /// Validates `mu` (finite, non-negative; `mu = 0` is the degenerate
    /// always-0 draw) before constructing. Fails fast rather than letting an
    /// out-of-range mean reach `rand_distr::Poisson` inside the hot loop.
    pub fn poisson(mu: f64) -> SimResult<Self> {
        if !(mu.is_finite() && mu >= 0.0) {
            return Err(SimError::InvalidConfig(format!(
                "poisson mean must be finite and non-negative, got {mu}"
            )));
        }
        Ok(OffspringDistribution::Poisson { mu })
    }

    /// Validates `p ∈ (0, 1]` before constructing, for the same reason.
    pub fn geometric(p: f64) -> SimResult<Self> {
        if !(p.is_finite() && p > 0.0 && p <= 1.0) {
            return Err(SimError::InvalidConfig(format!(
                "geometric parameter must be in (0, 1], got {p}"
            )));
        }
        Ok(OffspringDistribution::Geometric { p })
    }

    fn sample(&self, rng: &mut RandomSource) -> i64 {
        match self {
            OffspringDistribution::Poisson { mu } => rng.poisson(*mu) as i64,
            OffspringDistribution::Geometric { p } => rng.geometric(*p) as i64,
        }
    }
}

/// Offspring specification for one transition.
#[derive(Debug, Clone)]
pub enum Update {
    /// A fixed delta vector of length `K`. The firing parent's slot is decremented
    /// by one on top of this vector, modelling the parent's disappearance.
    Fixed(Vec<i64>),
    /// A per-component mask selecting which components receive an independent
    /// random draw from `distribution`; masked-out components get 0. The firing
    /// parent's slot is decremented by one after the draws are assembled.
    Random {
        mask: Vec<bool>,
        distribution: OffspringDistribution,
    },
}

impl Update {
    /// Samples the delta vector of length `k` for a transition whose parent type
    /// is `from`.
    pub fn sample_delta(&self, from: usize, k: usize, rng: &mut RandomSource) -> Vec<i64> {
        match self {
            Update::Fixed(delta) => {
                debug_assert_eq!(delta.len(), k, "fixed delta length must match state length");
                let mut d = delta.clone();
                d[from] -= 1;
                d
            }
            Update::Random { mask, distribution } => {
                debug_assert_eq!(mask.len(), k, "mask length must match state length");
                let mut d = vec![0i64; k];
                for (j, slot) in d.iter_mut().enumerate() {
                    if mask[j] {
                        *slot = distribution.sample(rng);
                    }
                }
                d[from] -= 1;
                d
            }
        }
    }
}

/// Applies `delta` to `state` in place, clamping any component that would go
/// negative to 0 (documented non-error semantics, §7 `StateUnderflow`).
pub fn apply_delta(state: &mut [i64], delta: &[i64]) {
    for (s, d) in state.iter_mut().zip(delta.iter()) {
        let next = *s + *d;
        *s = next.max(0);
    }
}
