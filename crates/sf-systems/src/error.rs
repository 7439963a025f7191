//! Error types for system definitions and symbolic evaluation.

use sf_sim::SimError;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SystemsError {
    #[error("Unknown system '{name}' (available: {available})")]
    UnknownSystem { name: String, available: String },

    #[error("Unbound symbol '{name}' in symbolic expression")]
    UnboundSymbol { name: String },

    #[error("Invalid argument: {what}")]
    InvalidArg { what: String },
}

pub type SystemsResult<T> = Result<T, SystemsError>;

impl From<SystemsError> for SimError {
    fn from(e: SystemsError) -> Self {
        SimError::System {
            message: e.to_string(),
        }
    }
}
