//! Named catalog of the built-in systems with their default setups.

use std::f64::consts::FRAC_PI_4;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use sf_sim::OdeSystem;

use crate::blow_up::BlowUpSystem;
use crate::decay::DecaySystem;
use crate::error::SystemsError;
use crate::lorenz::LorenzSystem;
use crate::pendulum::DampedPendulum;
use crate::symbolic::{SymbolicEquations, SymbolicSystem};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SystemKind {
    Lorenz,
    Pendulum,
    Decay,
    #[serde(alias = "blow-up", alias = "blow_up")]
    BlowUp,
}

impl SystemKind {
    pub const ALL: [SystemKind; 4] = [
        SystemKind::Lorenz,
        SystemKind::Pendulum,
        SystemKind::Decay,
        SystemKind::BlowUp,
    ];

    pub fn name(self) -> &'static str {
        match self {
            SystemKind::Lorenz => "lorenz",
            SystemKind::Pendulum => "pendulum",
            SystemKind::Decay => "decay",
            SystemKind::BlowUp => "blowup",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            SystemKind::Lorenz => "Lorenz attractor (sigma=10, rho=28, beta=8/3)",
            SystemKind::Pendulum => "Damped pendulum (L=1 m, b=0.2, m=1 kg, g=9.81)",
            SystemKind::Decay => "Exponential decay dx/dt = -lambda x (lambda=1)",
            SystemKind::BlowUp => "Finite-time singularity dy/dt = y^2",
        }
    }

    /// Number of state variables of the default instance.
    pub fn dimension(self) -> usize {
        match self {
            SystemKind::Lorenz => 3,
            SystemKind::Pendulum => 2,
            SystemKind::Decay | SystemKind::BlowUp => 1,
        }
    }

    pub fn default_initial_state(self) -> Vec<f64> {
        match self {
            SystemKind::Lorenz => vec![1.0, 1.0, 1.0],
            SystemKind::Pendulum => vec![FRAC_PI_4, 0.0],
            SystemKind::Decay => vec![5.0],
            SystemKind::BlowUp => vec![1.0],
        }
    }

    pub fn default_t_span(self) -> (f64, f64) {
        match self {
            SystemKind::Lorenz => (0.0, 40.0),
            SystemKind::Pendulum => (0.0, 20.0),
            SystemKind::Decay => (0.0, 5.0),
            SystemKind::BlowUp => (0.0, 2.0),
        }
    }

    /// Plot labels: one per state for phase plots, `(time, value)` for 1-D.
    pub fn default_labels(self) -> Vec<String> {
        let labels: &[&str] = match self {
            SystemKind::Lorenz => &["x", "y", "z"],
            SystemKind::Pendulum => &["theta (rad)", "omega (rad/s)"],
            SystemKind::Decay => &["Time (s)", "x(t)"],
            SystemKind::BlowUp => &["Time", "y(t)"],
        };
        labels.iter().map(|s| s.to_string()).collect()
    }

    /// Default instance, boxed.
    pub fn build(self) -> Box<dyn OdeSystem + Send + Sync> {
        match self {
            SystemKind::Lorenz => Box::new(LorenzSystem::default()),
            SystemKind::Pendulum => Box::new(DampedPendulum::default()),
            SystemKind::Decay => Box::new(DecaySystem::default()),
            SystemKind::BlowUp => Box::new(BlowUpSystem::default()),
        }
    }

    /// Symbolic right-hand side of the default instance, if it has one.
    pub fn equations(self) -> Option<SymbolicEquations> {
        match self {
            SystemKind::Lorenz => Some(LorenzSystem::default().symbolic_equations().clone()),
            SystemKind::Pendulum => Some(DampedPendulum::default().symbolic_equations().clone()),
            SystemKind::Decay => Some(DecaySystem::default().symbolic_equations().clone()),
            SystemKind::BlowUp => None,
        }
    }
}

impl fmt::Display for SystemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for SystemKind {
    type Err = SystemsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.to_ascii_lowercase().replace(['-', '_'], "");
        SystemKind::ALL
            .into_iter()
            .find(|kind| kind.name() == key)
            .ok_or_else(|| SystemsError::UnknownSystem {
                name: s.to_string(),
                available: SystemKind::ALL.map(SystemKind::name).join(", "),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_round_trip_through_from_str() {
        for kind in SystemKind::ALL {
            assert_eq!(kind.name().parse::<SystemKind>().unwrap(), kind);
        }
        assert_eq!("Blow-Up".parse::<SystemKind>().unwrap(), SystemKind::BlowUp);
    }

    #[test]
    fn unknown_name_lists_available() {
        let err = "rossler".parse::<SystemKind>().unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("rossler"));
        assert!(msg.contains("lorenz, pendulum, decay, blowup"));
    }

    #[test]
    fn defaults_are_consistent() {
        for kind in SystemKind::ALL {
            let system = kind.build();
            assert_eq!(system.dimension(), kind.dimension());
            assert_eq!(kind.default_initial_state().len(), kind.dimension());
            let (t0, tf) = kind.default_t_span();
            assert!(tf > t0);
            if let Some(eqs) = kind.equations() {
                assert_eq!(eqs.len(), kind.dimension());
            }
        }
    }

    #[test]
    fn labels_fit_the_plot_shape() {
        assert_eq!(SystemKind::Lorenz.default_labels().len(), 3);
        assert_eq!(SystemKind::Pendulum.default_labels().len(), 2);
        // 1-D plots label the time axis and the value axis.
        assert_eq!(SystemKind::Decay.default_labels().len(), 2);
    }
}
