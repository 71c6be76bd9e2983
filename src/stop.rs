//! Stopping criterion (C4): a boolean predicate over the state, composed from an
//! index set, a comparator, and a threshold, plus the built-in extinction check.

use crate::error::SimError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparator {
    Lt,
    Le,
    Gt,
    Ge,
    Eq,
    Ne,
}

impl Comparator {
    pub fn parse(s: &str) -> Result<Self, SimError> {
        match s {
            "<" => Ok(Comparator::Lt),
            "<=" => Ok(Comparator::Le),
            ">" => Ok(Comparator::Gt),
            ">=" => Ok(Comparator::Ge),
            "==" => Ok(Comparator::Eq),
            "!=" => Ok(Comparator::Ne),
            other => Err(SimError::InvalidConfig(format!(
                "unknown comparator '{other}'"
            ))),
        }
    }

    fn apply(&self, lhs: f64, rhs: f64) -> bool {
        match self {
            Comparator::Lt => lhs < rhs,
            Comparator::Le => lhs <= rhs,
            Comparator::Gt => lhs > rhs,
            Comparator::Ge => lhs >= rhs,
            Comparator::Eq => lhs == rhs,
            Comparator::Ne => lhs != rhs,
        }
    }
}

#[derive(Debug, Clone)]
pub struct StoppingCriterion {
    pub indices: Vec<usize>,
    pub comparator: Comparator,
    pub value: f64,
}

impl StoppingCriterion {
    pub fn new(indices: Vec<usize>, comparator: Comparator, value: f64) -> Self {
        StoppingCriterion {
            indices,
            comparator,
            value,
        }
    }

    /// Evaluates `comparator(Σ_{j∈indices} s[j], value)`.
    pub fn is_met(&self, state: &[i64]) -> bool {
        let sum: i64 = self.indices.iter().map(|&j| state[j]).sum();
        self.comparator.apply(sum as f64, self.value)
    }
}

/// The built-in extinction predicate: all components are 0.
pub fn is_extinct(state: &[i64]) -> bool {
    state.iter().all(|&s| s == 0)
}
