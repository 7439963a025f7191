//! Result data types.

use serde::{Deserialize, Serialize};
use sf_core::Trajectory;

pub type RunId = String;

/// Summary of one stored run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunManifest {
    pub run_id: RunId,
    pub system_id: String,
    /// RFC 3339, UTC.
    pub timestamp: String,
    /// Method that produced the trajectory.
    pub method: String,
    pub t_span: (f64, f64),
    pub dimensions: usize,
    pub samples: usize,
    pub success: bool,
    pub message: String,
}

impl RunManifest {
    /// Manifest for `trajectory`, stamped with the current time.
    pub fn for_trajectory(
        run_id: impl Into<RunId>,
        system_id: impl Into<String>,
        method: impl Into<String>,
        trajectory: &Trajectory,
        success: bool,
        message: impl Into<String>,
    ) -> Self {
        Self {
            run_id: run_id.into(),
            system_id: system_id.into(),
            timestamp: chrono::Utc::now().to_rfc3339(),
            method: method.into(),
            t_span: trajectory.time_span().unwrap_or((0.0, 0.0)),
            dimensions: trajectory.dimensions(),
            samples: trajectory.len(),
            success,
            message: message.into(),
        }
    }
}

/// One line of `trajectory.jsonl`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SampleRecord {
    pub t: f64,
    pub y: Vec<f64>,
}
