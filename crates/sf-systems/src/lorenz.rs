//! Lorenz convection model.
//!
//! dx/dt = sigma (y - x)
//! dy/dt = x (rho - z) - y
//! dz/dt = x y - beta z

use std::sync::OnceLock;

use nalgebra::DVector;
use serde::{Deserialize, Serialize};
use sf_sim::{OdeSystem, SimResult};

use crate::common::check_state;
use crate::symbolic::{Expr, SymbolicEquations, SymbolicSystem};

/// Parameters of the Lorenz system.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct LorenzParams {
    /// Prandtl number.
    pub sigma: f64,
    /// Rayleigh number.
    pub rho: f64,
    /// Geometric factor of the convection layer.
    pub beta: f64,
}

impl Default for LorenzParams {
    /// The classic chaotic regime.
    fn default() -> Self {
        Self {
            sigma: 10.0,
            rho: 28.0,
            beta: 8.0 / 3.0,
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct LorenzSystem {
    params: LorenzParams,
    symbolic: OnceLock<SymbolicEquations>,
}

impl LorenzSystem {
    pub fn new(sigma: f64, rho: f64, beta: f64) -> Self {
        Self::from_params(LorenzParams { sigma, rho, beta })
    }

    pub fn from_params(params: LorenzParams) -> Self {
        Self {
            params,
            symbolic: OnceLock::new(),
        }
    }

    pub fn params(&self) -> LorenzParams {
        self.params
    }
}

impl OdeSystem for LorenzSystem {
    fn dimension(&self) -> usize {
        3
    }

    fn rhs(&self, _t: f64, y: &DVector<f64>) -> SimResult<DVector<f64>> {
        check_state("Lorenz system", 3, y)?;
        let LorenzParams { sigma, rho, beta } = self.params;
        let (x, yv, z) = (y[0], y[1], y[2]);
        Ok(DVector::from_vec(vec![
            sigma * (yv - x),
            x * (rho - z) - yv,
            x * yv - beta * z,
        ]))
    }
}

impl SymbolicSystem for LorenzSystem {
    fn state_variables(&self) -> &'static [&'static str] {
        &["x", "y", "z"]
    }

    fn build_symbolic_equations(&self) -> SymbolicEquations {
        let LorenzParams { sigma, rho, beta } = self.params;
        let (x, y, z) = (Expr::sym("x"), Expr::sym("y"), Expr::sym("z"));
        SymbolicEquations::new(vec![
            ("x".into(), Expr::num(sigma) * (y.clone() - x.clone())),
            (
                "y".into(),
                x.clone() * (Expr::num(rho) - z.clone()) - y.clone(),
            ),
            ("z".into(), x * y - Expr::num(beta) * z),
        ])
    }

    fn symbolic_cache(&self) -> &OnceLock<SymbolicEquations> {
        &self.symbolic
    }
}
