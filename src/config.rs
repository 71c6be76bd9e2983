//! Configuration (C8): load a `System` plus run parameters from TOML or JSON, or
//! build one programmatically. Validation happens here, before the simulation
//! loop ever starts, per §7's `InvalidConfig` policy.

use crate::error::{SimError, SimResult};
use crate::rate::Rate;
use crate::sim::ObservationGrid;
use crate::stop::{Comparator, StoppingCriterion};
use crate::system::{System, Transition};
use crate::update::{OffspringDistribution, Update};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Wire form of a rate specification (§6). Each variant carries the named fields
/// implied by that section's positional `params` arrays.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum RateSpec {
    Constant { r: f64 },
    Linear { intercept: f64, slope: f64 },
    Switch { pre: f64, post: f64, t_s: f64 },
    Pulse { period: f64, low_len: f64, low: f64, high: f64 },
    Custom { path: String, symbol: String },
}

impl RateSpec {
    fn into_rate(self) -> SimResult<Rate> {
        Ok(match self {
            RateSpec::Constant { r } => {
                if r < 0.0 {
                    return Err(SimError::InvalidConfig(format!(
                        "constant rate must be non-negative, got {r}"
                    )));
                }
                Rate::constant(r)
            }
            RateSpec::Linear { intercept, slope } => Rate::linear(intercept, slope),
            RateSpec::Switch { pre, post, t_s } => {
                if pre < 0.0 || post < 0.0 {
                    return Err(SimError::InvalidConfig(format!(
                        "switch rate levels must be non-negative, got pre={pre}, post={post}"
                    )));
                }
                Rate::switch(pre, post, t_s)
            }
            RateSpec::Pulse {
                period,
                low_len,
                low,
                high,
            } => {
                if low_len > period {
                    return Err(SimError::InvalidConfig(format!(
                        "pulse low_len ({low_len}) must be <= period ({period})"
                    )));
                }
                if low < 0.0 || high < 0.0 {
                    return Err(SimError::InvalidConfig(format!(
                        "pulse rate levels must be non-negative, got low={low}, high={high}"
                    )));
                }
                Rate::pulse(period, low_len, low, high)
            }
            RateSpec::Custom { path, symbol } => Rate::custom(&path, &symbol)?,
        })
    }
}

/// Wire form of an offspring/update specification (§4.3).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum UpdateSpec {
    Fixed { delta: Vec<i64> },
    Random {
        mask: Vec<bool>,
        distribution: String,
        params: Vec<f64>,
    },
}

impl UpdateSpec {
    fn into_update(self) -> SimResult<Update> {
        Ok(match self {
            UpdateSpec::Fixed { delta } => Update::Fixed(delta),
            UpdateSpec::Random {
                mask,
                distribution,
                params,
            } => {
                let dist = match distribution.as_str() {
                    "poisson" => {
                        let mu = *params.first().ok_or_else(|| {
                            SimError::InvalidConfig("poisson update requires mu".to_string())
                        })?;
                        OffspringDistribution::poisson(mu)?
                    }
                    "geometric" => {
                        let p = *params.first().ok_or_else(|| {
                            SimError::InvalidConfig("geometric update requires p".to_string())
                        })?;
                        OffspringDistribution::geometric(p)?
                    }
                    other => {
                        return Err(SimError::InvalidConfig(format!(
                            "unknown offspring distribution '{other}'"
                        )))
                    }
                };
                Update::Random { mask, distribution: dist }
            }
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransitionSpec {
    pub from: usize,
    pub rate: RateSpec,
    pub update: UpdateSpec,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StopSpec {
    pub indices: Vec<usize>,
    pub comparator: String,
    pub value: f64,
}

/// An observation grid, specified either as an explicit list of times or as an
/// integer `M` implying `τ_k = k` (§6).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum GridSpec {
    Explicit(Vec<f64>),
    StepCount(usize),
}

impl GridSpec {
    fn into_grid(self) -> SimResult<ObservationGrid> {
        match self {
            GridSpec::Explicit(times) => ObservationGrid::new(times),
            GridSpec::StepCount(m) => ObservationGrid::from_step_count(m),
        }
    }
}

/// The serde-derived mirror of a `System` plus run parameters, as loaded from a
/// TOML or JSON config file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SystemConfig {
    pub initial_state: Vec<i64>,
    pub transitions: Vec<TransitionSpec>,
    #[serde(default)]
    pub stops: Vec<StopSpec>,
    pub grid: GridSpec,
    pub seed: Option<u64>,
    #[serde(default = "default_margin")]
    pub margin: f64,
    #[serde(default = "default_envelope_bins")]
    pub envelope_bins: usize,
    #[serde(default)]
    pub silent: bool,
}

fn default_margin() -> f64 {
    crate::envelope::DEFAULT_MARGIN
}

fn default_envelope_bins() -> usize {
    1000
}

impl SystemConfig {
    /// Loads a config from `path`, dispatching on extension (`.toml` or
    /// `.json`/anything else defaulting to JSON).
    pub fn load(path: &Path) -> SimResult<Self> {
        let text = std::fs::read_to_string(path)?;
        match path.extension().and_then(|e| e.to_str()) {
            Some("toml") => toml::from_str(&text)
                .map_err(|e| SimError::InvalidConfig(format!("invalid TOML config: {e}"))),
            _ => serde_json::from_str(&text)
                .map_err(|e| SimError::InvalidConfig(format!("invalid JSON config: {e}"))),
        }
    }

    /// Translates the wire format into the runtime `System` and observation grid
    /// the simulators consume.
    pub fn try_into_system(self) -> SimResult<(System, ObservationGrid, u64, f64, usize, bool)> {
        let k = self.initial_state.len();

        let mut transitions = Vec::with_capacity(self.transitions.len());
        for t in self.transitions {
            if t.from >= k {
                return Err(SimError::InvalidConfig(format!(
                    "transition references parent type {} but K={k}",
                    t.from
                )));
            }
            transitions.push(Transition::new(t.from, t.rate.into_rate()?, t.update.into_update()?));
        }

        let mut stops = Vec::with_capacity(self.stops.len());
        for s in self.stops {
            stops.push(StoppingCriterion::new(
                s.indices,
                Comparator::parse(&s.comparator)?,
                s.value,
            ));
        }

        let grid = self.grid.into_grid()?;
        let seed = self.seed.unwrap_or_else(crate::rng::entropy_seed);
        let system = System::new(self.initial_state, transitions, stops)?;

        Ok((system, grid, seed, self.margin, self.envelope_bins, self.silent))
    }
}
