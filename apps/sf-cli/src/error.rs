//! CLI error type.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CliError {
    #[error(transparent)]
    Sim(#[from] sf_sim::SimError),

    #[error(transparent)]
    Systems(#[from] sf_systems::SystemsError),

    #[error(transparent)]
    Plot(#[from] sf_plot::PlotError),

    #[error(transparent)]
    Verify(#[from] sf_verify::VerifyError),

    #[error(transparent)]
    Results(#[from] sf_results::ResultsError),

    #[error("Invalid plot config {path}: {source}")]
    Config {
        path: PathBuf,
        source: serde_yaml::Error,
    },

    #[error("Invalid argument: {0}")]
    InvalidArg(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type CliResult<T> = Result<T, CliError>;
