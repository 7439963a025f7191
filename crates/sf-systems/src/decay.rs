//! Exponential decay dx/dt = -lambda x, with x(t) = x0 exp(-lambda t).

use std::sync::OnceLock;

use nalgebra::DVector;
use sf_sim::{OdeSystem, SimResult};

use crate::common::check_state;
use crate::symbolic::{Expr, SymbolicEquations, SymbolicSystem};

#[derive(Clone, Debug)]
pub struct DecaySystem {
    lambda: f64,
    symbolic: OnceLock<SymbolicEquations>,
}

impl Default for DecaySystem {
    fn default() -> Self {
        Self::new(1.0)
    }
}

impl DecaySystem {
    pub fn new(lambda: f64) -> Self {
        Self {
            lambda,
            symbolic: OnceLock::new(),
        }
    }

    /// Decay rate constant.
    pub fn lambda(&self) -> f64 {
        self.lambda
    }

    /// Closed-form solution from `x0` at t = 0.
    pub fn analytic(&self, x0: f64, t: f64) -> f64 {
        x0 * (-self.lambda * t).exp()
    }
}

impl OdeSystem for DecaySystem {
    fn dimension(&self) -> usize {
        1
    }

    fn rhs(&self, _t: f64, y: &DVector<f64>) -> SimResult<DVector<f64>> {
        check_state("decay system", 1, y)?;
        Ok(DVector::from_element(1, -self.lambda * y[0]))
    }
}

impl SymbolicSystem for DecaySystem {
    fn state_variables(&self) -> &'static [&'static str] {
        &["x"]
    }

    fn build_symbolic_equations(&self) -> SymbolicEquations {
        SymbolicEquations::new(vec![(
            "x".into(),
            Expr::num(-self.lambda) * Expr::sym("x"),
        )])
    }

    fn symbolic_cache(&self) -> &OnceLock<SymbolicEquations> {
        &self.symbolic
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rhs_is_linear() {
        let sys = DecaySystem::new(0.5);
        let f = sys.rhs(3.0, &DVector::from_element(1, 4.0)).unwrap();
        assert_eq!(f[0], -2.0);
    }

    #[test]
    fn analytic_solution() {
        let sys = DecaySystem::default();
        assert_eq!(sys.analytic(5.0, 0.0), 5.0);
        assert!((sys.analytic(5.0, 1.0) - 5.0 / std::f64::consts::E).abs() < 1e-12);
    }

    #[test]
    fn symbolic_form() {
        let sys = DecaySystem::default();
        assert_eq!(sys.symbolic_equations().get("x").unwrap().to_string(), "-1*x");
    }
}
