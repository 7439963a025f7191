//! sf-core: shared foundation for synthforge.
//!
//! Contains:
//! - numeric (Real + float helpers)
//! - trajectory (time vector + state matrix produced by the solver)
//! - error (shared error types)

pub mod error;
pub mod numeric;
pub mod trajectory;

// Re-exports: nice ergonomics for downstream crates
pub use error::{CoreError, CoreResult};
pub use numeric::*;
pub use trajectory::Trajectory;
