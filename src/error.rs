//! Error kinds for configuration loading, resource acquisition, and the simulation loop.
//!
//! `StateUnderflow` from the design notes has no variant here: clamping a negative
//! component to zero is documented behaviour, not a failure, and is exercised by a
//! non-negativity test instead of an error path.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SimError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("resource error: {0}")]
    ResourceError(String),

    #[error("numeric degeneracy: {0}")]
    NumericDegenerate(String),

    #[error("simulation cancelled by host")]
    UserInterrupt,

    #[error("internal invariant violated: {0}")]
    Bug(String),
}

impl From<std::io::Error> for SimError {
    fn from(err: std::io::Error) -> Self {
        SimError::ResourceError(err.to_string())
    }
}

impl From<csv::Error> for SimError {
    fn from(err: csv::Error) -> Self {
        SimError::ResourceError(err.to_string())
    }
}

pub type SimResult<T> = Result<T, SimError>;
