//! sf-results: persisted solver runs.

pub mod csv;
pub mod hash;
pub mod store;
pub mod types;

pub use csv::export_csv;
pub use hash::compute_run_id;
pub use store::RunStore;
pub use types::*;

pub type ResultsResult<T> = Result<T, ResultsError>;

#[derive(thiserror::Error, Debug)]
pub enum ResultsError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Run not found: {run_id}")]
    RunNotFound { run_id: String },

    #[error("Corrupt trajectory record at line {line}: {message}")]
    CorruptRecord { line: usize, message: String },

    #[error("Trajectory error: {0}")]
    Core(#[from] sf_core::CoreError),
}
