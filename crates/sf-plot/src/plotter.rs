//! The plotter capability and the render pipeline shared by all variants.

use std::path::PathBuf;

use nalgebra::DMatrix;
use plotters::style::RGBColor;

use crate::color::line_color;
use crate::config::PlotConfig;
use crate::error::{PlotError, PlotResult};
use crate::figure::Figure;
use crate::layout::Frame;
use crate::scene::{Curve, Marker, Scene};
use crate::style::hex;

/// Start marker colour (colour code `g`).
pub const START_COLOR: RGBColor = hex(0x008000);
/// End marker colour (colour code `r`).
pub const END_COLOR: RGBColor = hex(0xff0000);

/// Optional inputs of a render call.
#[derive(Clone, Debug, Default)]
pub struct RenderOptions {
    /// Axis labels; missing entries fall back to the variant's defaults.
    pub labels: Option<Vec<String>>,
    pub title: Option<String>,
    /// Save the figure here in `config.save_format`, overwriting.
    pub save_path: Option<PathBuf>,
    /// Defaults to [`PlotConfig::default`].
    pub config: Option<PlotConfig>,
}

impl RenderOptions {
    pub fn with_labels<S: Into<String>>(mut self, labels: impl IntoIterator<Item = S>) -> Self {
        self.labels = Some(labels.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_save_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.save_path = Some(path.into());
        self
    }

    pub fn with_config(mut self, config: PlotConfig) -> Self {
        self.config = Some(config);
        self
    }
}

/// Renders trajectories of one dimensionality.
///
/// `states` is `[n_dimensions][n_samples]` with column `j` taken at
/// `times[j]`. Implementations read their inputs without modifying them and
/// keep no state between calls.
pub trait TrajectoryPlotter: Send + Sync {
    fn name(&self) -> &'static str;

    fn render(
        &self,
        times: &[f64],
        states: &DMatrix<f64>,
        opts: &RenderOptions,
    ) -> PlotResult<Figure>;
}

/// Everything a variant needs before building its scene.
pub(crate) struct Prepared {
    pub config: PlotConfig,
    pub frame: Frame,
    pub line: RGBColor,
    pub labels: Vec<String>,
}

pub(crate) fn prepare(
    plotter: &'static str,
    needed_rows: usize,
    default_labels: &[&str],
    times: &[f64],
    states: &DMatrix<f64>,
    opts: &RenderOptions,
) -> PlotResult<Prepared> {
    if times.is_empty() || states.ncols() == 0 {
        return Err(PlotError::EmptyTrajectory);
    }
    if states.nrows() < needed_rows {
        return Err(PlotError::DimensionMismatch {
            plotter,
            needed: needed_rows,
            actual: states.nrows(),
        });
    }

    let config = opts.config.clone().unwrap_or_default();
    let frame = Frame::resolve(&config)?;
    let line = line_color(&config.color, &frame.theme)?;

    let given = opts.labels.as_deref().unwrap_or_default();
    let labels = default_labels
        .iter()
        .enumerate()
        .map(|(i, d)| given.get(i).cloned().unwrap_or_else(|| d.to_string()))
        .collect();

    Ok(Prepared {
        config,
        frame,
        line,
        labels,
    })
}

impl Prepared {
    pub fn trajectory<P>(&self, points: Vec<P>) -> Curve<P> {
        Curve {
            points,
            color: self.line,
            alpha: self.config.alpha,
            width: (self.config.points_to_px(self.config.line_width).round() as u32).max(1),
            label: None,
        }
    }

    /// Start/end markers, or none when markers are disabled.
    pub fn endpoints<P: Copy>(&self, first: P, last: P) -> Vec<Marker<P>> {
        if !self.config.show_markers {
            return Vec::new();
        }
        let radius = ((self.config.points_to_px(self.config.marker_size) / 2.0).round() as u32).max(1);
        vec![
            Marker {
                at: first,
                color: START_COLOR,
                radius,
                label: "Start".to_string(),
            },
            Marker {
                at: last,
                color: END_COLOR,
                radius,
                label: "End".to_string(),
            },
        ]
    }

    pub fn title(&self, opts: &RenderOptions) -> Option<String> {
        opts.title.clone().filter(|t| !t.is_empty())
    }

    /// Build the figure and save it when a path was given.
    pub fn finish(self, scene: Scene, opts: &RenderOptions, plotter: &'static str) -> PlotResult<Figure> {
        let figure = Figure::new(scene, self.frame, self.config.save_format, plotter)?;
        if let Some(path) = &opts.save_path {
            figure.save(path)?;
        }
        Ok(figure)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn states() -> DMatrix<f64> {
        DMatrix::from_row_slice(2, 3, &[0.0, 1.0, 2.0, 3.0, 4.0, 5.0])
    }

    #[test]
    fn empty_trajectory_rejected() {
        let err = prepare("t", 1, &["a"], &[], &DMatrix::zeros(1, 0), &RenderOptions::default())
            .err()
            .unwrap();
        assert!(matches!(err, PlotError::EmptyTrajectory));
    }

    #[test]
    fn too_few_rows_rejected() {
        let err = prepare("t", 3, &["a"], &[0.0, 1.0, 2.0], &states(), &RenderOptions::default())
            .err()
            .unwrap();
        assert!(matches!(
            err,
            PlotError::DimensionMismatch {
                needed: 3,
                actual: 2,
                ..
            }
        ));
    }

    #[test]
    fn missing_labels_fall_back_to_defaults() {
        let opts = RenderOptions::default().with_labels(["theta"]);
        let p = prepare("t", 2, &["State 0", "State 1"], &[0.0, 1.0, 2.0], &states(), &opts).unwrap();
        assert_eq!(p.labels, vec!["theta", "State 1"]);
    }

    #[test]
    fn markers_follow_config() {
        let opts = RenderOptions::default().with_config(PlotConfig {
            show_markers: false,
            ..PlotConfig::default()
        });
        let p = prepare("t", 2, &["a", "b"], &[0.0, 1.0, 2.0], &states(), &opts).unwrap();
        assert!(p.endpoints((0.0, 0.0), (1.0, 1.0)).is_empty());

        let p = prepare("t", 2, &["a", "b"], &[0.0, 1.0, 2.0], &states(), &RenderOptions::default())
            .unwrap();
        let markers = p.endpoints((0.0, 0.0), (1.0, 1.0));
        assert_eq!(markers.len(), 2);
        assert_eq!(markers[0].color, START_COLOR);
        // 8 pt at 100 dpi is ~11 px across.
        assert_eq!(markers[0].radius, 6);
    }

    #[test]
    fn invalid_style_and_color_surface() {
        let opts = RenderOptions::default().with_config(PlotConfig {
            style: "nope".into(),
            ..PlotConfig::default()
        });
        let err = prepare("t", 1, &["a"], &[0.0, 1.0, 2.0], &states(), &opts).err().unwrap();
        assert!(matches!(err, PlotError::UnknownStyle { .. }));

        let opts = RenderOptions::default().with_config(PlotConfig {
            color: "#12".into(),
            ..PlotConfig::default()
        });
        let err = prepare("t", 1, &["a"], &[0.0, 1.0, 2.0], &states(), &opts).err().unwrap();
        assert!(matches!(err, PlotError::InvalidColor { .. }));
    }
}
