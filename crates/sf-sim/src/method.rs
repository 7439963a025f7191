//! Integration method selection.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::SimError;

/// Integration method for `solve_ode`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Method {
    /// Dormand-Prince 5(4) explicit pair (default, non-stiff).
    #[default]
    #[serde(rename = "RK45")]
    Rk45,
    /// Bogacki-Shampine 3(2) explicit pair, cheaper per step.
    #[serde(rename = "RK23")]
    Rk23,
    /// Variable-step backward Euler (first-order BDF), for stiff problems.
    #[serde(rename = "BDF", alias = "Radau", alias = "LSODA")]
    Bdf,
}

impl Method {
    pub const ALL: [Method; 3] = [Method::Rk45, Method::Rk23, Method::Bdf];

    pub fn name(self) -> &'static str {
        match self {
            Method::Rk45 => "RK45",
            Method::Rk23 => "RK23",
            Method::Bdf => "BDF",
        }
    }

    /// Whether the method handles stiff problems.
    pub fn is_implicit(self) -> bool {
        matches!(self, Method::Bdf)
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Method {
    type Err = SimError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "RK45" | "DOPRI5" => Ok(Method::Rk45),
            "RK23" => Ok(Method::Rk23),
            // The stiff family all maps to the implicit stepper.
            "BDF" | "RADAU" | "LSODA" => Ok(Method::Bdf),
            _ => Err(SimError::UnknownMethod {
                name: s.to_string(),
            }),
        }
    }
}
