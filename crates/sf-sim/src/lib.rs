//! ODE integration for synthforge systems.
//!
//! Provides:
//! - `OdeSystem` capability for right-hand sides dy/dt = f(t, y)
//! - Adaptive explicit Runge-Kutta pairs (Dormand-Prince 5(4), Bogacki-Shampine 3(2))
//! - Adaptive backward Euler for stiff problems
//! - `solve_ode` with automatic fallback to the stiff method

pub mod error;
pub mod integrator;
pub mod jacobian;
pub mod method;
pub mod model;
pub mod solve;

// Internal modules
mod tableau;

// Re-exports for public API
pub use error::{SimError, SimResult};
pub use integrator::{BackwardEuler, ExplicitRk, Integrator, StepAttempt};
pub use method::Method;
pub use model::OdeSystem;
pub use solve::{Solution, SolveOptions, integrate, solve_ode};
