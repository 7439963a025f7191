//! JSON payload for verifying the exponential decay case.
//!
//! The checker proves bounds for one fixed problem: lambda = 1, x(0) = 5 on
//! t in [-0.1, 0.1]. Anything else is rejected before a payload is built.

use serde::Serialize;
use sf_systems::DecaySystem;

use crate::error::{VerifyError, VerifyResult};
use crate::rational::{Rational, to_rational};

pub const DECAY_T0: f64 = 0.0;
pub const DECAY_X0: f64 = 5.0;
pub const DECAY_TMIN: f64 = -0.1;
pub const DECAY_TMAX: f64 = 0.1;
pub const DECAY_LAMBDA: f64 = 1.0;

#[derive(Serialize)]
struct Payload {
    system_type: &'static str,
    initial_condition: InitialCondition,
    interval: Interval,
    parameters: Parameters,
}

#[derive(Serialize)]
struct InitialCondition {
    t0: Rational,
    x0: Rational,
}

#[derive(Serialize)]
struct Interval {
    tmin: Rational,
    tmax: Rational,
}

#[derive(Serialize)]
struct Parameters {
    lambda: Rational,
}

fn require(name: &'static str, expected: f64, actual: f64) -> VerifyResult<()> {
    if actual == expected {
        Ok(())
    } else {
        Err(VerifyError::UnsupportedParameter {
            name,
            expected,
            actual,
        })
    }
}

/// Serializes a [`DecaySystem`] for the checker.
#[derive(Clone, Copy, Debug)]
pub struct DecaySerializer {
    lambda: f64,
}

impl DecaySerializer {
    pub fn new(system: &DecaySystem) -> VerifyResult<Self> {
        require("lambda", DECAY_LAMBDA, system.lambda())?;
        Ok(Self {
            lambda: system.lambda(),
        })
    }

    pub fn to_json(&self, t0: f64, x0: f64, tmin: f64, tmax: f64) -> VerifyResult<String> {
        require("t0", DECAY_T0, t0)?;
        require("x0", DECAY_X0, x0)?;
        require("tmin", DECAY_TMIN, tmin)?;
        require("tmax", DECAY_TMAX, tmax)?;

        let payload = Payload {
            system_type: "decay",
            initial_condition: InitialCondition {
                t0: to_rational(t0)?,
                x0: to_rational(x0)?,
            },
            interval: Interval {
                tmin: to_rational(tmin)?,
                tmax: to_rational(tmax)?,
            },
            parameters: Parameters {
                lambda: to_rational(self.lambda)?,
            },
        };
        Ok(serde_json::to_string(&payload)?)
    }

    /// Payload for the one supported problem.
    pub fn canonical_json(&self) -> VerifyResult<String> {
        self.to_json(DECAY_T0, DECAY_X0, DECAY_TMIN, DECAY_TMAX)
    }
}
