//! OdeSystem trait for pluggable dynamic systems.

use nalgebra::DVector;

use crate::error::SimResult;

/// A first-order system dy/dt = f(t, y).
///
/// Implementations are expected to be pure: the integrators may evaluate
/// `rhs` at trial points that are later discarded.
pub trait OdeSystem {
    /// Number of state variables.
    fn dimension(&self) -> usize;

    /// Compute the state derivative at `(t, y)`.
    fn rhs(&self, t: f64, y: &DVector<f64>) -> SimResult<DVector<f64>>;
}

impl<S: OdeSystem + ?Sized> OdeSystem for &S {
    fn dimension(&self) -> usize {
        (**self).dimension()
    }

    fn rhs(&self, t: f64, y: &DVector<f64>) -> SimResult<DVector<f64>> {
        (**self).rhs(t, y)
    }
}

impl<S: OdeSystem + ?Sized> OdeSystem for Box<S> {
    fn dimension(&self) -> usize {
        (**self).dimension()
    }

    fn rhs(&self, t: f64, y: &DVector<f64>) -> SimResult<DVector<f64>> {
        (**self).rhs(t, y)
    }
}
