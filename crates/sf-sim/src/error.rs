//! Error types for integration.

use thiserror::Error;

/// Errors encountered while integrating an ODE system.
#[derive(Error, Debug)]
pub enum SimError {
    #[error("Invalid argument: {what}")]
    InvalidArg { what: String },

    #[error("Convergence failed: {message}")]
    ConvergenceFailed { message: String },

    #[error("Unknown integration method: {name}")]
    UnknownMethod { name: String },

    #[error("Numeric error: {what}")]
    Numeric { what: String },

    #[error("System error: {message}")]
    System { message: String },
}

pub type SimResult<T> = Result<T, SimError>;

impl From<sf_core::CoreError> for SimError {
    fn from(e: sf_core::CoreError) -> Self {
        SimError::System {
            message: e.to_string(),
        }
    }
}
