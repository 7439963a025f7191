//! Single-step integrators with embedded error estimates.
//!
//! Each integrator proposes one step of size `h` and reports a scaled error
//! norm; accepting or rejecting the step is the driver's job (see `solve`).

use nalgebra::{DMatrix, DVector};

use crate::error::SimResult;
use crate::jacobian::finite_difference_jacobian;
use crate::method::Method;
use crate::model::OdeSystem;
use crate::tableau::{BOGACKI_SHAMPINE, DORMAND_PRINCE, Tableau};

/// Mixed absolute/relative error scaling.
///
/// Error norm is the RMS of `err_i / (atol + rtol * max(|y_i|, |y_new_i|))`.
#[derive(Clone, Copy, Debug)]
pub struct ErrorScale {
    pub rtol: f64,
    pub atol: f64,
}

impl ErrorScale {
    pub fn norm(&self, err: &DVector<f64>, y: &DVector<f64>, y_new: &DVector<f64>) -> f64 {
        if err.is_empty() {
            return 0.0;
        }
        let sum: f64 = err
            .iter()
            .zip(y.iter().zip(y_new.iter()))
            .map(|(e, (a, b))| {
                let scale = self.atol + self.rtol * a.abs().max(b.abs());
                (e / scale).powi(2)
            })
            .sum();
        (sum / err.len() as f64).sqrt()
    }
}

/// Outcome of one proposed step.
#[derive(Clone, Debug)]
pub struct StepAttempt {
    /// Proposed new state.
    pub y_new: DVector<f64>,
    /// f(t + h, y_new), reused as the first slope of the next step.
    pub f_new: DVector<f64>,
    /// Scaled error norm; the step is acceptable when this is below 1.
    pub error_norm: f64,
    /// Right-hand side evaluations spent on this attempt.
    pub nfev: usize,
    /// Jacobian evaluations spent on this attempt.
    pub njev: usize,
}

impl StepAttempt {
    fn failed(y: &DVector<f64>, f: &DVector<f64>, nfev: usize, njev: usize) -> Self {
        Self {
            y_new: y.clone(),
            f_new: f.clone(),
            error_norm: f64::INFINITY,
            nfev,
            njev,
        }
    }
}

/// Trait for single-step integrators.
pub trait Integrator {
    /// Which public method this integrator implements.
    fn method(&self) -> Method;

    /// Order of the embedded error estimate (drives step-size control).
    fn error_order(&self) -> u32;

    /// Propose a step of size `h` from `(t, y)` where `f = f(t, y)`.
    fn attempt<S: OdeSystem + ?Sized>(
        &mut self,
        system: &S,
        t: f64,
        y: &DVector<f64>,
        f: &DVector<f64>,
        h: f64,
        scale: &ErrorScale,
    ) -> SimResult<StepAttempt>;
}

/// Embedded explicit Runge-Kutta pair.
#[derive(Clone)]
pub struct ExplicitRk {
    tableau: &'static Tableau,
    method: Method,
}

impl ExplicitRk {
    /// Dormand-Prince 5(4).
    pub fn dormand_prince() -> Self {
        Self {
            tableau: &DORMAND_PRINCE,
            method: Method::Rk45,
        }
    }

    /// Bogacki-Shampine 3(2).
    pub fn bogacki_shampine() -> Self {
        Self {
            tableau: &BOGACKI_SHAMPINE,
            method: Method::Rk23,
        }
    }
}

impl Integrator for ExplicitRk {
    fn method(&self) -> Method {
        self.method
    }

    fn error_order(&self) -> u32 {
        self.tableau.error_order
    }

    fn attempt<S: OdeSystem + ?Sized>(
        &mut self,
        system: &S,
        t: f64,
        y: &DVector<f64>,
        f: &DVector<f64>,
        h: f64,
        scale: &ErrorScale,
    ) -> SimResult<StepAttempt> {
        let tab = self.tableau;
        let stages = tab.stages();

        let mut k: Vec<DVector<f64>> = Vec::with_capacity(stages + 1);
        k.push(f.clone());
        for s in 1..stages {
            let mut y_stage = y.clone();
            for (kj, a) in k.iter().zip(tab.a[s].iter()) {
                if *a != 0.0 {
                    y_stage.axpy(h * a, kj, 1.0);
                }
            }
            k.push(system.rhs(t + tab.c[s] * h, &y_stage)?);
        }

        let mut y_new = y.clone();
        for (kj, b) in k.iter().zip(tab.b.iter()) {
            if *b != 0.0 {
                y_new.axpy(h * b, kj, 1.0);
            }
        }

        if y_new.iter().any(|v| !v.is_finite()) {
            return Ok(StepAttempt::failed(y, f, stages - 1, 0));
        }

        let f_new = system.rhs(t + h, &y_new)?;
        k.push(f_new.clone());

        let mut err = DVector::zeros(y.len());
        for (kj, e) in k.iter().zip(tab.e.iter()) {
            if *e != 0.0 {
                err.axpy(h * e, kj, 1.0);
            }
        }

        Ok(StepAttempt {
            error_norm: scale.norm(&err, y, &y_new),
            y_new,
            f_new,
            nfev: stages,
            njev: 0,
        })
    }
}

/// Variable-step backward Euler.
///
/// Each attempt solves the implicit update once with step `h` and twice with
/// `h / 2`; the difference between the two answers is the local error
/// estimate and the two-half-step answer is kept. The Newton iterations reuse
/// one finite-difference Jacobian per attempt.
#[derive(Clone, Debug)]
pub struct BackwardEuler {
    /// Maximum Newton iterations per implicit solve.
    pub newton_max_iter: usize,
    /// Relative perturbation for the finite-difference Jacobian.
    pub jacobian_epsilon: f64,
}

impl Default for BackwardEuler {
    fn default() -> Self {
        Self {
            newton_max_iter: 10,
            jacobian_epsilon: 1e-7,
        }
    }
}

impl BackwardEuler {
    /// Solve z = y + h f(t_new, z) by simplified Newton.
    ///
    /// Returns `None` when the iteration does not converge.
    #[allow(clippy::too_many_arguments)]
    fn solve_implicit<S: OdeSystem + ?Sized>(
        &self,
        system: &S,
        t_new: f64,
        y: &DVector<f64>,
        f_y: &DVector<f64>,
        h: f64,
        jac: &DMatrix<f64>,
        scale: &ErrorScale,
        nfev: &mut usize,
    ) -> SimResult<Option<DVector<f64>>> {
        let n = y.len();
        let lu = (DMatrix::identity(n, n) - jac * h).lu();
        let newton_tol = (10.0 * f64::EPSILON / scale.rtol).max(0.03_f64.min(scale.rtol.sqrt()));

        // Explicit Euler predictor.
        let mut z = y + f_y * h;
        for _ in 0..self.newton_max_iter {
            let f_z = system.rhs(t_new, &z)?;
            *nfev += 1;
            let residual = &z - y - f_z * h;
            let Some(dz) = lu.solve(&(-residual)) else {
                return Ok(None);
            };
            z += &dz;
            if z.iter().any(|v| !v.is_finite()) {
                return Ok(None);
            }
            if scale.norm(&dz, y, &z) < newton_tol {
                return Ok(Some(z));
            }
        }
        Ok(None)
    }
}

impl Integrator for BackwardEuler {
    fn method(&self) -> Method {
        Method::Bdf
    }

    fn error_order(&self) -> u32 {
        1
    }

    fn attempt<S: OdeSystem + ?Sized>(
        &mut self,
        system: &S,
        t: f64,
        y: &DVector<f64>,
        f: &DVector<f64>,
        h: f64,
        scale: &ErrorScale,
    ) -> SimResult<StepAttempt> {
        let mut nfev = 0;
        let jac = finite_difference_jacobian(system, t, y, f, self.jacobian_epsilon)?;
        nfev += y.len();

        let Some(full) =
            self.solve_implicit(system, t + h, y, f, h, &jac, scale, &mut nfev)?
        else {
            return Ok(StepAttempt::failed(y, f, nfev, 1));
        };

        let half = 0.5 * h;
        let Some(mid) =
            self.solve_implicit(system, t + half, y, f, half, &jac, scale, &mut nfev)?
        else {
            return Ok(StepAttempt::failed(y, f, nfev, 1));
        };
        let f_mid = system.rhs(t + half, &mid)?;
        nfev += 1;
        let Some(y_new) =
            self.solve_implicit(system, t + h, &mid, &f_mid, half, &jac, scale, &mut nfev)?
        else {
            return Ok(StepAttempt::failed(y, f, nfev, 1));
        };

        let err = &y_new - &full;
        let f_new = system.rhs(t + h, &y_new)?;
        nfev += 1;

        Ok(StepAttempt {
            error_norm: scale.norm(&err, y, &y_new),
            y_new,
            f_new,
            nfev,
            njev: 1,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Decay(f64);

    impl OdeSystem for Decay {
        fn dimension(&self) -> usize {
            1
        }

        fn rhs(&self, _t: f64, y: &DVector<f64>) -> SimResult<DVector<f64>> {
            Ok(-y * self.0)
        }
    }

    fn one_step<I: Integrator>(mut integrator: I, h: f64) -> StepAttempt {
        let y = DVector::from_vec(vec![1.0]);
        let f = Decay(1.0).rhs(0.0, &y).unwrap();
        let scale = ErrorScale {
            rtol: 1e-3,
            atol: 1e-6,
        };
        integrator
            .attempt(&Decay(1.0), 0.0, &y, &f, h, &scale)
            .unwrap()
    }

    #[test]
    fn dormand_prince_small_step_is_accurate() {
        let step = one_step(ExplicitRk::dormand_prince(), 0.1);
        assert!((step.y_new[0] - (-0.1_f64).exp()).abs() < 1e-7);
        assert!(step.error_norm < 1.0);
        assert_eq!(step.nfev, 6);
    }

    #[test]
    fn bogacki_shampine_small_step_is_accurate() {
        let step = one_step(ExplicitRk::bogacki_shampine(), 0.1);
        assert!((step.y_new[0] - (-0.1_f64).exp()).abs() < 1e-4);
        assert_eq!(step.nfev, 3);
    }

    #[test]
    fn backward_euler_is_stable_on_stiff_step() {
        // Explicit methods blow up with h * lambda = 100; backward Euler decays.
        let mut integrator = BackwardEuler::default();
        let y = DVector::from_vec(vec![1.0]);
        let system = Decay(1000.0);
        let f = system.rhs(0.0, &y).unwrap();
        let scale = ErrorScale {
            rtol: 1e-3,
            atol: 1e-6,
        };
        let step = integrator
            .attempt(&system, 0.0, &y, &f, 0.1, &scale)
            .unwrap();
        assert!(step.y_new[0].abs() < 1e-3);
    }

    #[test]
    fn large_error_is_reported() {
        let step = one_step(ExplicitRk::bogacki_shampine(), 5.0);
        assert!(step.error_norm > 1.0);
    }

    #[test]
    fn error_scale_mixes_abs_and_rel() {
        let scale = ErrorScale {
            rtol: 0.1,
            atol: 0.0,
        };
        let y = DVector::from_vec(vec![10.0]);
        let err = DVector::from_vec(vec![1.0]);
        assert!((scale.norm(&err, &y, &y) - 1.0).abs() < 1e-12);
    }
}
