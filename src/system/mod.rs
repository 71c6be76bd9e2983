//! The `System` a caller assembles before invoking a simulation entry point:
//! initial state, transitions (parent type + rate + update), and stopping
//! criteria. Validated eagerly so malformed input fails before the hot loop runs.

use crate::error::{SimError, SimResult};
use crate::rate::Rate;
use crate::stop::StoppingCriterion;
use crate::update::Update;


/// A single transition: the parent type whose count multiplies the per-individual
/// rate, the rate function itself, and the offspring/update rule it fires.
pub struct Transition {
    pub from: usize,
    pub rate: Rate,
    pub update: Update,
}

impl Transition {
    pub fn new(from: usize, rate: Rate, update: Update) -> Self {
        Transition { from, rate, update }
    }
}

/// The full, validated description of one branching process: state, transitions,
/// and stopping criteria. Immutable for the duration of a simulation; state is
/// mutated only by the simulator's own working copy, never on this struct.
pub struct System {
    pub initial_state: Vec<i64>,
    pub transitions: Vec<Transition>,
    pub stops: Vec<StoppingCriterion>,
}

impl System {
    /// Validates and assembles a `System`. Fails fast (`InvalidConfig`) on
    /// dimension mismatches, negative initial counts, or an empty transition list
    /// referencing an out-of-range parent type.
    pub fn new(
        initial_state: Vec<i64>,
        transitions: Vec<Transition>,
        stops: Vec<StoppingCriterion>,
    ) -> SimResult<Self> {
        let k = initial_state.len();

        if k == 0 {
            return Err(SimError::InvalidConfig(
                "state vector must have at least one component".to_string(),
            ));
        }

        if let Some(&neg) = initial_state.iter().find(|&&s| s < 0) {
            return Err(SimError::InvalidConfig(format!(
                "initial state must be non-negative, found {neg}"
            )));
        }

        for (idx, t) in transitions.iter().enumerate() {
            if t.from >= k {
                return Err(SimError::InvalidConfig(format!(
                    "transition {idx} references parent type {} but K={k}",
                    t.from
                )));
            }
            if let Update::Fixed(delta) = &t.update {
                if delta.len() != k {
                    return Err(SimError::InvalidConfig(format!(
                        "transition {idx} fixed delta has length {} but K={k}",
                        delta.len()
                    )));
                }
            }
            if let Update::Random { mask, .. } = &t.update {
                if mask.len() != k {
                    return Err(SimError::InvalidConfig(format!(
                        "transition {idx} mask has length {} but K={k}",
                        mask.len()
                    )));
                }
            }
        }

        for (idx, s) in stops.iter().enumerate() {
            if let Some(&bad) = s.indices.iter().find(|&&j| j >= k) {
                return Err(SimError::InvalidConfig(format!(
                    "stopping criterion {idx} references index {bad} but K={k}"
                )));
            }
        }

        Ok(System {
            initial_state,
            transitions,
            stops,
        })
    }

    pub fn k(&self) -> usize {
        self.initial_state.len()
    }

    /// Whether every transition's rate is time-constant, letting a caller use the
    /// homogeneous simulator (C5) directly instead of building envelopes.
    pub fn is_homogeneous(&self) -> bool {
        self.transitions.iter().all(|t| t.rate.is_homogeneous())
    }
}
