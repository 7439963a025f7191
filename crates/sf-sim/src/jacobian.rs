//! Finite difference Jacobian of a system right-hand side.

use nalgebra::{DMatrix, DVector};

use crate::error::SimResult;
use crate::model::OdeSystem;

/// Compute df/dy at `(t, y)` using forward finite differences.
///
/// `f_y` is the already-evaluated f(t, y). For each column j, perturbs y[j]
/// by `epsilon * max(|y[j]|, 1)` and computes (f(y+e) - f(y)) / e.
pub fn finite_difference_jacobian<S: OdeSystem + ?Sized>(
    system: &S,
    t: f64,
    y: &DVector<f64>,
    f_y: &DVector<f64>,
    epsilon: f64,
) -> SimResult<DMatrix<f64>> {
    let n = y.len();
    let m = f_y.len();

    let mut jac = DMatrix::zeros(m, n);

    for j in 0..n {
        let mut y_perturbed = y.clone();
        let dy = epsilon * y[j].abs().max(1.0);
        y_perturbed[j] += dy;

        let f_perturbed = system.rhs(t, &y_perturbed)?;
        let df = (f_perturbed - f_y) / dy;

        jac.set_column(j, &df);
    }

    Ok(jac)
}
