//! Damped pendulum as a first-order system in (theta, omega).
//!
//! dtheta/dt = omega
//! domega/dt = -(b/m) omega - (g/L) sin(theta)

use std::sync::OnceLock;

use nalgebra::DVector;
use serde::{Deserialize, Serialize};
use sf_sim::{OdeSystem, SimResult};

use crate::common::check_state;
use crate::symbolic::{Expr, SymbolicEquations, SymbolicSystem};

/// Physical parameters, SI units.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PendulumParams {
    /// Arm length L (m).
    pub length: f64,
    /// Damping coefficient b (N m s/rad).
    pub damping: f64,
    /// Bob mass m (kg).
    pub mass: f64,
    /// Gravitational acceleration g (m/s^2).
    pub gravity: f64,
}

impl Default for PendulumParams {
    fn default() -> Self {
        Self {
            length: 1.0,
            damping: 0.2,
            mass: 1.0,
            gravity: 9.81,
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct DampedPendulum {
    params: PendulumParams,
    symbolic: OnceLock<SymbolicEquations>,
}

impl DampedPendulum {
    pub fn new(params: PendulumParams) -> Self {
        Self {
            params,
            symbolic: OnceLock::new(),
        }
    }

    /// Default pendulum with a different damping coefficient.
    pub fn with_damping(damping: f64) -> Self {
        Self::new(PendulumParams {
            damping,
            ..PendulumParams::default()
        })
    }

    pub fn params(&self) -> PendulumParams {
        self.params
    }
}

impl OdeSystem for DampedPendulum {
    fn dimension(&self) -> usize {
        2
    }

    fn rhs(&self, _t: f64, y: &DVector<f64>) -> SimResult<DVector<f64>> {
        check_state("damped pendulum", 2, y)?;
        let p = &self.params;
        let (theta, omega) = (y[0], y[1]);
        Ok(DVector::from_vec(vec![
            omega,
            -(p.damping / p.mass) * omega - (p.gravity / p.length) * theta.sin(),
        ]))
    }
}

impl SymbolicSystem for DampedPendulum {
    fn state_variables(&self) -> &'static [&'static str] {
        &["theta", "omega"]
    }

    fn build_symbolic_equations(&self) -> SymbolicEquations {
        let p = &self.params;
        let (theta, omega) = (Expr::sym("theta"), Expr::sym("omega"));
        SymbolicEquations::new(vec![
            ("theta".into(), omega.clone()),
            (
                "omega".into(),
                Expr::num(-(p.damping / p.mass)) * omega
                    - Expr::num(p.gravity / p.length) * theta.sin(),
            ),
        ])
    }

    fn symbolic_cache(&self) -> &OnceLock<SymbolicEquations> {
        &self.symbolic
    }
}
