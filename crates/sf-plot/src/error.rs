//! Error types for plotting.

use plotters::drawing::DrawingAreaErrorKind;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PlotError {
    #[error("No plotter registered for {requested}-dimensional trajectories (available: {available:?})")]
    PlotterNotFound {
        requested: usize,
        available: Vec<usize>,
    },

    #[error("Trajectory has no samples")]
    EmptyTrajectory,

    #[error("Unknown style '{name}' (available: {available:?})")]
    UnknownStyle {
        name: String,
        available: Vec<&'static str>,
    },

    #[error("Invalid color specification '{spec}'")]
    InvalidColor { spec: String },

    #[error("Plotter '{plotter}' needs {needed} state rows, trajectory has {actual}")]
    DimensionMismatch {
        plotter: &'static str,
        needed: usize,
        actual: usize,
    },

    #[error("Operation needs a {expected} scene")]
    WrongSceneKind { expected: &'static str },

    #[error("Canvas of {width}x{height} pixels has no drawable area")]
    EmptyCanvas { width: u32, height: u32 },

    #[error("Drawing backend error: {message}")]
    Backend { message: String },

    #[error("Image encoding error: {message}")]
    Encode { message: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type PlotResult<T> = Result<T, PlotError>;

impl<E: std::error::Error + Send + Sync> From<DrawingAreaErrorKind<E>> for PlotError {
    fn from(e: DrawingAreaErrorKind<E>) -> Self {
        PlotError::Backend {
            message: e.to_string(),
        }
    }
}

impl From<image::ImageError> for PlotError {
    fn from(e: image::ImageError) -> Self {
        match e {
            image::ImageError::IoError(io) => PlotError::Io(io),
            other => PlotError::Encode {
                message: other.to_string(),
            },
        }
    }
}
