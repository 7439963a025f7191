//! sf-plot: trajectory plotting for synthforge.
//!
//! Provides:
//! - `PlotConfig` (figure size, dpi, named style, line and marker settings)
//! - Plotter variants for 1-D, 2-D and 3-D trajectories
//! - A registry keyed by state dimension and a dispatch entry point
//! - `Figure` artifacts that save to PNG, SVG, JPEG or BMP
//!
//! # Example
//!
//! ```
//! use nalgebra::DMatrix;
//! use sf_plot::{PlotterRegistry, RenderOptions, render_trajectory};
//!
//! let times: Vec<f64> = (0..50).map(|i| i as f64 * 0.1).collect();
//! let states = DMatrix::from_fn(2, times.len(), |i, j| {
//!     if i == 0 { times[j].sin() } else { times[j].cos() }
//! });
//!
//! let registry = PlotterRegistry::new();
//! let opts = RenderOptions::default().with_title("Circle");
//! let figure = render_trajectory(&registry, &times, &states, &opts).unwrap();
//!
//! assert_eq!(figure.plotter_name(), "phase-plane");
//! assert!(figure.svg().contains("Circle"));
//! ```

pub mod color;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod figure;
pub mod layout;
pub mod plotter;
pub mod registry;
pub mod scene;
pub mod style;
pub mod variants;

pub(crate) mod draw;
pub(crate) mod fonts;

// Re-exports for ergonomics
pub use color::parse_color;
pub use config::{Aspect, LineColor, PlotConfig, SaveFormat};
pub use dispatch::{render_solution, render_trajectory};
pub use error::{PlotError, PlotResult};
pub use figure::Figure;
pub use layout::Layout;
pub use plotter::{END_COLOR, RenderOptions, START_COLOR, TrajectoryPlotter};
pub use registry::{PlotterFactory, PlotterRegistry};
pub use scene::{Curve, Marker, PlanarScene, Point2, Point3, Scene, SceneKind, VolumeScene};
pub use style::{STYLE_NAMES, Theme};
pub use variants::{PhasePlanePlotter, PhaseVolumePlotter, TimeSeriesPlotter};
