//! Adaptive integration driver and the `solve_ode` entry point.

use nalgebra::{DMatrix, DVector};
use serde::{Deserialize, Serialize};
use sf_core::{Trajectory, ensure_finite};
use tracing::{debug, info, warn};

use crate::error::{SimError, SimResult};
use crate::integrator::{BackwardEuler, ErrorScale, ExplicitRk, Integrator};
use crate::method::Method;
use crate::model::OdeSystem;

const SAFETY: f64 = 0.9;
const MIN_FACTOR: f64 = 0.2;
const MAX_FACTOR: f64 = 10.0;

const TOO_SMALL_STEP: &str = "Required step size is less than spacing between numbers.";

/// Options for `solve_ode` and `integrate`.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct SolveOptions {
    /// Primary integration method.
    pub method: Method,
    /// Retry once with `fallback` when the primary method fails.
    pub auto_fallback: bool,
    /// Method used for the retry.
    pub fallback: Method,
    /// Relative tolerance.
    pub rtol: f64,
    /// Absolute tolerance.
    pub atol: f64,
    /// Initial step size; chosen automatically when `None`.
    pub first_step: Option<f64>,
    /// Upper bound on the step size.
    pub max_step: f64,
    /// Maximum number of accepted steps (safety limit).
    pub max_steps: usize,
}

impl Default for SolveOptions {
    fn default() -> Self {
        Self {
            method: Method::Rk45,
            auto_fallback: true,
            fallback: Method::Bdf,
            rtol: 1e-3,
            atol: 1e-6,
            first_step: None,
            max_step: f64::INFINITY,
            max_steps: 100_000,
        }
    }
}

impl SolveOptions {
    pub fn with_method(mut self, method: Method) -> Self {
        self.method = method;
        self
    }

    pub fn without_fallback(mut self) -> Self {
        self.auto_fallback = false;
        self
    }

    pub fn with_max_step(mut self, max_step: f64) -> Self {
        self.max_step = max_step;
        self
    }
}

/// Result of an integration run.
#[derive(Clone, Debug)]
pub struct Solution {
    /// Time points of accepted steps, starting at t0 and ending at tf on success.
    pub t: Vec<f64>,
    /// States, shape `[dimension][t.len()]`.
    pub y: DMatrix<f64>,
    /// Whether the integrator reached tf.
    pub success: bool,
    /// Human-readable termination reason.
    pub message: String,
    /// Number of right-hand side evaluations.
    pub nfev: usize,
    /// Number of Jacobian evaluations.
    pub njev: usize,
    /// Method that produced this solution.
    pub method: Method,
}

impl Solution {
    /// Hand the time/state pair over to consumers such as the plotting engine.
    pub fn into_trajectory(self) -> Trajectory {
        Trajectory {
            times: self.t,
            states: self.y,
        }
    }

    /// Final state, if any sample was recorded.
    pub fn final_state(&self) -> Option<DVector<f64>> {
        (self.y.ncols() > 0).then(|| self.y.column(self.y.ncols() - 1).into_owned())
    }
}

/// Solve an ODE system over `t_span = (t0, tf)` starting from `y0`.
///
/// Uses `opts.method` first. If it fails and `opts.auto_fallback` is set
/// (and the method is not already the fallback), retries once with
/// `opts.fallback`. Failures surface as `SimError::ConvergenceFailed`.
pub fn solve_ode<S: OdeSystem + ?Sized>(
    system: &S,
    t_span: (f64, f64),
    y0: &[f64],
    opts: &SolveOptions,
) -> SimResult<Solution> {
    info!(
        method = %opts.method,
        t0 = t_span.0,
        tf = t_span.1,
        dimension = y0.len(),
        "Solving an ODE system"
    );

    let solution = integrate(system, t_span, y0, opts.method, opts)?;
    if solution.success {
        info!(steps = solution.t.len() - 1, nfev = solution.nfev, "Success");
        return Ok(solution);
    }

    if opts.auto_fallback && opts.method != opts.fallback {
        warn!(
            "{} failed ({}), retrying with {}",
            opts.method, solution.message, opts.fallback
        );
        let retry = integrate(system, t_span, y0, opts.fallback, opts)?;
        if !retry.success {
            return Err(SimError::ConvergenceFailed {
                message: format!(
                    "Both {} and {} failed: {}",
                    opts.method, opts.fallback, retry.message
                ),
            });
        }
        info!("Success with {} fallback", opts.fallback);
        return Ok(retry);
    }

    Err(SimError::ConvergenceFailed {
        message: format!("{} failed: {}", opts.method, solution.message),
    })
}

/// Integrate with one method, without any fallback.
///
/// Numerical failure is reported through `Solution::success`/`message`;
/// `Err` is reserved for invalid arguments and errors raised by the system.
pub fn integrate<S: OdeSystem + ?Sized>(
    system: &S,
    t_span: (f64, f64),
    y0: &[f64],
    method: Method,
    opts: &SolveOptions,
) -> SimResult<Solution> {
    validate(system, t_span, y0, opts)?;
    let y0 = DVector::from_column_slice(y0);
    match method {
        Method::Rk45 => drive(ExplicitRk::dormand_prince(), system, t_span, y0, opts),
        Method::Rk23 => drive(ExplicitRk::bogacki_shampine(), system, t_span, y0, opts),
        Method::Bdf => drive(BackwardEuler::default(), system, t_span, y0, opts),
    }
}

fn validate<S: OdeSystem + ?Sized>(
    system: &S,
    t_span: (f64, f64),
    y0: &[f64],
    opts: &SolveOptions,
) -> SimResult<()> {
    let invalid = |what: String| Err(SimError::InvalidArg { what });

    if y0.is_empty() {
        return invalid("initial state must not be empty".to_string());
    }
    if y0.len() != system.dimension() {
        return invalid(format!(
            "initial state has {} entries, system dimension is {}",
            y0.len(),
            system.dimension()
        ));
    }
    let (t0, tf) = t_span;
    y0.iter()
        .map(|v| ensure_finite(*v, "initial state"))
        .chain([ensure_finite(t0, "t0"), ensure_finite(tf, "tf")])
        .try_for_each(|checked| checked.map(drop))
        .map_err(|e| SimError::InvalidArg {
            what: e.to_string(),
        })?;
    if t0 == tf {
        return invalid("time span must have non-zero length".to_string());
    }
    if !(opts.rtol > 0.0) || !(opts.atol >= 0.0) {
        return invalid("tolerances must be positive".to_string());
    }
    if !(opts.max_step > 0.0) {
        return invalid("max_step must be positive".to_string());
    }
    if opts.max_steps == 0 {
        return invalid("max_steps must be positive".to_string());
    }
    if let Some(h) = opts.first_step
        && !(h > 0.0)
    {
        return invalid("first_step must be positive".to_string());
    }
    Ok(())
}

/// Ten times the floating point spacing at `t`.
fn min_step_at(t: f64) -> f64 {
    10.0 * (t.abs() * f64::EPSILON).max(f64::MIN_POSITIVE)
}

/// Initial step heuristic (Hairer, Norsett & Wanner, section II.4).
#[allow(clippy::too_many_arguments)]
fn select_initial_step<S: OdeSystem + ?Sized>(
    system: &S,
    t0: f64,
    y0: &DVector<f64>,
    f0: &DVector<f64>,
    direction: f64,
    error_order: u32,
    scale: &ErrorScale,
    interval: f64,
    nfev: &mut usize,
) -> SimResult<f64> {
    let rms = |v: &DVector<f64>| scale.norm(v, y0, y0);

    let d0 = rms(y0);
    let d1 = rms(f0);
    let h0 = if d0 < 1e-5 || d1 < 1e-5 {
        1e-6
    } else {
        0.01 * d0 / d1
    };
    let h0 = h0.min(interval);

    let y1 = y0 + f0 * (h0 * direction);
    let f1 = system.rhs(t0 + h0 * direction, &y1)?;
    *nfev += 1;
    let d2 = rms(&(f1 - f0)) / h0;

    let h1 = if d1 <= 1e-15 && d2 <= 1e-15 {
        (h0 * 1e-3).max(1e-6)
    } else {
        (0.01 / d1.max(d2)).powf(1.0 / (error_order as f64 + 1.0))
    };

    Ok((100.0 * h0).min(h1).min(interval))
}

fn drive<S: OdeSystem + ?Sized, I: Integrator>(
    mut integrator: I,
    system: &S,
    t_span: (f64, f64),
    y0: DVector<f64>,
    opts: &SolveOptions,
) -> SimResult<Solution> {
    let (t0, t_bound) = t_span;
    let direction = (t_bound - t0).signum();
    let interval = (t_bound - t0).abs();
    let scale = ErrorScale {
        rtol: opts.rtol,
        atol: opts.atol,
    };
    let exponent = -1.0 / (integrator.error_order() as f64 + 1.0);

    let mut nfev = 0;
    let mut njev = 0;
    let mut t = t0;
    let mut y = y0;
    let mut f = system.rhs(t, &y)?;
    nfev += 1;

    let mut h_abs = match opts.first_step {
        Some(h) => h.min(interval),
        None => select_initial_step(
            system,
            t0,
            &y,
            &f,
            direction,
            integrator.error_order(),
            &scale,
            interval,
            &mut nfev,
        )?,
    };

    let mut times = vec![t];
    let mut states = vec![y.clone()];

    let failure: Option<String> = loop {
        if direction * (t - t_bound) >= 0.0 {
            break None;
        }
        if times.len() > opts.max_steps {
            break Some(format!(
                "Maximum number of steps ({}) exceeded.",
                opts.max_steps
            ));
        }

        let min_step = min_step_at(t);
        if h_abs > opts.max_step {
            h_abs = opts.max_step;
        } else if h_abs < min_step {
            h_abs = min_step;
        }

        let mut rejected = false;
        let accepted = loop {
            if h_abs < min_step {
                break None;
            }

            let mut t_new = t + h_abs * direction;
            if direction * (t_new - t_bound) > 0.0 {
                t_new = t_bound;
            }
            let h = t_new - t;
            h_abs = h.abs();

            let attempt = integrator.attempt(system, t, &y, &f, h, &scale)?;
            nfev += attempt.nfev;
            njev += attempt.njev;

            let error_norm = if attempt.error_norm.is_finite() {
                attempt.error_norm
            } else {
                f64::INFINITY
            };

            if error_norm < 1.0 {
                let mut factor = if error_norm == 0.0 {
                    MAX_FACTOR
                } else {
                    MAX_FACTOR.min(SAFETY * error_norm.powf(exponent))
                };
                if rejected {
                    factor = factor.min(1.0);
                }
                h_abs *= factor;
                break Some((t_new, attempt));
            }

            h_abs *= MIN_FACTOR.max(SAFETY * error_norm.powf(exponent));
            rejected = true;
        };

        match accepted {
            None => break Some(TOO_SMALL_STEP.to_string()),
            Some((t_new, attempt)) => {
                t = t_new;
                y = attempt.y_new;
                f = attempt.f_new;
                times.push(t);
                states.push(y.clone());
            }
        }
    };

    let (success, message) = match failure {
        None => (
            true,
            "The solver successfully reached the end of the integration interval.".to_string(),
        ),
        Some(message) => {
            debug!(method = %integrator.method(), t, %message, "integration stopped early");
            (false, message)
        }
    };

    let n = states[0].len();
    let y = DMatrix::from_fn(n, states.len(), |i, j| states[j][i]);

    Ok(Solution {
        t: times,
        y,
        success,
        message,
        nfev,
        njev,
        method: integrator.method(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Decay;

    impl OdeSystem for Decay {
        fn dimension(&self) -> usize {
            1
        }

        fn rhs(&self, _t: f64, y: &DVector<f64>) -> SimResult<DVector<f64>> {
            Ok(-y)
        }
    }

    #[test]
    fn solve_options_defaults() {
        let opts = SolveOptions::default();
        assert_eq!(opts.method, Method::Rk45);
        assert!(opts.auto_fallback);
        assert_eq!(opts.fallback, Method::Bdf);
        assert_eq!(opts.rtol, 1e-3);
        assert_eq!(opts.atol, 1e-6);
        assert_eq!(opts.max_steps, 100_000);
    }

    #[test]
    fn invalid_arguments_rejected() {
        let opts = SolveOptions::default();
        assert!(matches!(
            integrate(&Decay, (0.0, 1.0), &[], Method::Rk45, &opts),
            Err(SimError::InvalidArg { .. })
        ));
        assert!(matches!(
            integrate(&Decay, (0.0, 1.0), &[1.0, 2.0], Method::Rk45, &opts),
            Err(SimError::InvalidArg { .. })
        ));
        assert!(matches!(
            integrate(&Decay, (1.0, 1.0), &[1.0], Method::Rk45, &opts),
            Err(SimError::InvalidArg { .. })
        ));
        let err = integrate(&Decay, (0.0, 1.0), &[f64::NAN], Method::Rk45, &opts).unwrap_err();
        assert!(err.to_string().contains("Non-finite numeric value for initial state"));
        let err = integrate(&Decay, (0.0, f64::INFINITY), &[1.0], Method::Rk45, &opts).unwrap_err();
        assert!(matches!(&err, SimError::InvalidArg { what } if what.contains("tf")));
        let bad_tol = SolveOptions {
            rtol: 0.0,
            ..SolveOptions::default()
        };
        assert!(matches!(
            integrate(&Decay, (0.0, 1.0), &[1.0], Method::Rk45, &bad_tol),
            Err(SimError::InvalidArg { .. })
        ));
    }

    #[test]
    fn decay_matches_exponential_for_every_method() {
        for method in Method::ALL {
            let sol = integrate(&Decay, (0.0, 2.0), &[5.0], method, &SolveOptions::default())
                .unwrap();
            assert!(sol.success, "{method}: {}", sol.message);
            assert_eq!(sol.method, method);
            assert_eq!(sol.t[0], 0.0);
            assert_eq!(*sol.t.last().unwrap(), 2.0);
            let y_end = sol.final_state().unwrap()[0];
            let exact = 5.0 * (-2.0_f64).exp();
            // Backward Euler is only first order.
            let rel_tol = if method.is_implicit() { 0.1 } else { 0.01 };
            assert!(
                (y_end - exact).abs() < rel_tol * exact,
                "{method}: {y_end} vs {exact}"
            );
        }
    }

    #[test]
    fn backward_integration_supported() {
        let sol = integrate(&Decay, (1.0, 0.0), &[1.0], Method::Rk45, &SolveOptions::default())
            .unwrap();
        assert!(sol.success);
        assert_eq!(*sol.t.last().unwrap(), 0.0);
        assert!(sol.t.windows(2).all(|w| w[1] < w[0]));
        let y_end = sol.final_state().unwrap()[0];
        assert!((y_end - 1.0_f64.exp()).abs() < 1e-2);
    }

    #[test]
    fn max_step_bounds_spacing() {
        let opts = SolveOptions::default().with_max_step(0.01);
        let sol = integrate(&Decay, (0.0, 1.0), &[1.0], Method::Rk45, &opts).unwrap();
        assert!(sol.t.windows(2).all(|w| w[1] - w[0] <= 0.01 + 1e-12));
        assert!(sol.t.len() >= 101);
    }

    #[test]
    fn step_budget_exhaustion_reports_failure() {
        let opts = SolveOptions {
            max_steps: 3,
            max_step: 0.01,
            ..SolveOptions::default()
        };
        let sol = integrate(&Decay, (0.0, 1.0), &[1.0], Method::Rk45, &opts).unwrap();
        assert!(!sol.success);
        assert!(sol.message.contains("Maximum number of steps"));
    }
}
