//! Shared helpers for system implementations.

use nalgebra::DVector;
use sf_sim::{SimError, SimResult};

/// Reject state vectors whose length differs from the system dimension.
pub(crate) fn check_state(name: &str, expected: usize, y: &DVector<f64>) -> SimResult<()> {
    if y.len() != expected {
        return Err(SimError::InvalidArg {
            what: format!(
                "{name} expects a state of length {expected}, got {}",
                y.len()
            ),
        });
    }
    Ok(())
}
