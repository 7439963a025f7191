//! Finite-time singularity dy/dt = y^2.
//!
//! For y0 > 0 the solution y0 / (1 - y0 t) explodes at t = 1 / y0, so any
//! integration past that point fails. Used to exercise solver failure paths.

use nalgebra::DVector;
use sf_sim::{OdeSystem, SimResult};

use crate::common::check_state;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BlowUpSystem {
    dimension: usize,
}

impl Default for BlowUpSystem {
    fn default() -> Self {
        Self { dimension: 1 }
    }
}

impl BlowUpSystem {
    /// Componentwise y^2 on a state of length `dimension`.
    pub fn new(dimension: usize) -> Self {
        Self { dimension }
    }
}

impl OdeSystem for BlowUpSystem {
    fn dimension(&self) -> usize {
        self.dimension
    }

    fn rhs(&self, _t: f64, y: &DVector<f64>) -> SimResult<DVector<f64>> {
        check_state("blow-up system", self.dimension, y)?;
        Ok(y.component_mul(y))
    }
}
