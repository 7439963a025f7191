//! sf-verify: bridge to an external Lean proof checker.
//!
//! Provides:
//! - Exact rational conversion of floats (`{num, den}` pairs)
//! - The JSON payload for the exponential decay case
//! - A subprocess client with timeouts and optional I/O logging

pub mod client;
pub mod error;
pub mod rational;
pub mod serializer;

pub use client::{DEFAULT_TIMEOUT, LeanClient, VerificationResult};
pub use error::{VerifyError, VerifyResult};
pub use rational::{MAX_DENOMINATOR, Rational, limit_denominator, to_rational};
pub use serializer::DecaySerializer;
