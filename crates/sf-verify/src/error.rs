//! Error types for the proof-checker bridge.

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

/// Characters of the input or output kept in error messages.
const PREVIEW_CHARS: usize = 200;

fn preview(s: &str) -> &str {
    match s.char_indices().nth(PREVIEW_CHARS) {
        Some((end, _)) => &s[..end],
        None => s,
    }
}

#[derive(Error, Debug)]
pub enum VerifyError {
    #[error("Verification requires {name}={expected}, got {actual}")]
    UnsupportedParameter {
        name: &'static str,
        expected: f64,
        actual: f64,
    },

    #[error("Value {value} has no rational form within range")]
    NonRepresentable { value: f64 },

    #[error(
        "Lean executable not found: {}\nRun: cd {} && lake build {}",
        .executable.display(),
        .lean_dir.display(),
        .executable.file_name().map(|n| n.to_string_lossy()).unwrap_or_default()
    )]
    ExecutableNotFound {
        executable: PathBuf,
        lean_dir: PathBuf,
    },

    #[error("Lean verification timed out after {}s\ninput: {}...", .timeout.as_secs_f64(), preview(.input_json))]
    Timeout {
        timeout: Duration,
        input_json: String,
    },

    #[error("Lean verification failed (exit code {exit_code})\nstderr: {stderr}\ninput: {}...", preview(.input_json))]
    Execution {
        exit_code: i32,
        stderr: String,
        input_json: String,
    },

    #[error("Invalid JSON response from Lean: {parse_error}\noutput: {}...", preview(.raw_output))]
    ResponseParse {
        raw_output: String,
        parse_error: String,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type VerifyResult<T> = Result<T, VerifyError>;
