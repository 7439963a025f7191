//! sf-systems: concrete ODE systems for synthforge.
//!
//! Provides:
//! - Lorenz attractor, damped pendulum, exponential decay
//! - A pathological blow-up system for exercising solver failure paths
//! - Symbolic right-hand sides, built lazily and cached per instance
//! - A named catalog with default parameters, initial states and labels

pub mod blow_up;
pub mod catalog;
pub mod decay;
pub mod error;
pub mod lorenz;
pub mod pendulum;
pub mod symbolic;

mod common;

// Re-exports
pub use blow_up::BlowUpSystem;
pub use catalog::SystemKind;
pub use decay::DecaySystem;
pub use error::{SystemsError, SystemsResult};
pub use lorenz::LorenzSystem;
pub use pendulum::DampedPendulum;
pub use symbolic::{Bindings, Expr, SymbolicEquations, SymbolicSystem};
