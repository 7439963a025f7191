//! Built-in plotters for 1-, 2- and 3-dimensional trajectories.

use nalgebra::DMatrix;

use crate::config::Aspect;
use crate::error::PlotResult;
use crate::figure::Figure;
use crate::plotter::{RenderOptions, TrajectoryPlotter, prepare};
use crate::scene::{PlanarScene, Point2, Point3, Scene, SceneKind, VolumeScene};

/// A single state variable against time.
#[derive(Clone, Copy, Debug, Default)]
pub struct TimeSeriesPlotter;

impl TrajectoryPlotter for TimeSeriesPlotter {
    fn name(&self) -> &'static str {
        "time-series"
    }

    fn render(
        &self,
        times: &[f64],
        states: &DMatrix<f64>,
        opts: &RenderOptions,
    ) -> PlotResult<Figure> {
        let prep = prepare(self.name(), 1, &["Time", "x(t)"], times, states, opts)?;

        let points: Vec<Point2> = times
            .iter()
            .zip(states.row(0).iter())
            .map(|(t, x)| (*t, *x))
            .collect();
        let (first, last) = endpoints(&points);

        let scene = Scene {
            title: prep.title(opts),
            show_grid: prep.config.show_grid,
            kind: SceneKind::Planar(PlanarScene {
                x_label: prep.labels[0].clone(),
                y_label: prep.labels[1].clone(),
                // Time and state share no unit; the aspect setting is for phase plots.
                aspect: Aspect::Auto,
                markers: prep.endpoints(first, last),
                curves: vec![prep.trajectory(points)],
            }),
        };
        prep.finish(scene, opts, self.name())
    }
}

/// Phase portrait of the first two state variables.
#[derive(Clone, Copy, Debug, Default)]
pub struct PhasePlanePlotter;

impl TrajectoryPlotter for PhasePlanePlotter {
    fn name(&self) -> &'static str {
        "phase-plane"
    }

    fn render(
        &self,
        times: &[f64],
        states: &DMatrix<f64>,
        opts: &RenderOptions,
    ) -> PlotResult<Figure> {
        let prep = prepare(self.name(), 2, &["State 0", "State 1"], times, states, opts)?;

        let points: Vec<Point2> = states
            .column_iter()
            .map(|c| (c[0], c[1]))
            .collect();
        let (first, last) = endpoints(&points);

        let scene = Scene {
            title: prep.title(opts),
            show_grid: prep.config.show_grid,
            kind: SceneKind::Planar(PlanarScene {
                x_label: prep.labels[0].clone(),
                y_label: prep.labels[1].clone(),
                aspect: prep.config.aspect,
                markers: prep.endpoints(first, last),
                curves: vec![prep.trajectory(points)],
            }),
        };
        prep.finish(scene, opts, self.name())
    }
}

/// 3-D phase portrait of the first three state variables.
#[derive(Clone, Copy, Debug, Default)]
pub struct PhaseVolumePlotter;

impl TrajectoryPlotter for PhaseVolumePlotter {
    fn name(&self) -> &'static str {
        "phase-volume"
    }

    fn render(
        &self,
        times: &[f64],
        states: &DMatrix<f64>,
        opts: &RenderOptions,
    ) -> PlotResult<Figure> {
        let prep = prepare(
            self.name(),
            3,
            &["State 0", "State 1", "State 2"],
            times,
            states,
            opts,
        )?;

        let points: Vec<Point3> = states
            .column_iter()
            .map(|c| (c[0], c[1], c[2]))
            .collect();
        let (first, last) = endpoints(&points);

        let scene = Scene {
            title: prep.title(opts),
            show_grid: prep.config.show_grid,
            kind: SceneKind::Volume(VolumeScene {
                labels: [
                    prep.labels[0].clone(),
                    prep.labels[1].clone(),
                    prep.labels[2].clone(),
                ],
                markers: prep.endpoints(first, last),
                curves: vec![prep.trajectory(points)],
            }),
        };
        prep.finish(scene, opts, self.name())
    }
}

/// First and last points; callers have already rejected empty input.
fn endpoints<P: Copy + Default>(points: &[P]) -> (P, P) {
    (
        points.first().copied().unwrap_or_default(),
        points.last().copied().unwrap_or_default(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Aspect, PlotConfig};
    use crate::layout::Layout;

    fn circle(n: usize) -> (Vec<f64>, DMatrix<f64>) {
        let times = sf_core::linspace(0.0, 10.0, n);
        let states = DMatrix::from_fn(2, n, |i, j| {
            if i == 0 { times[j].sin() } else { times[j].cos() }
        });
        (times, states)
    }

    #[test]
    fn time_series_uses_time_axis() {
        let times = vec![0.0, 1.0, 2.0];
        let states = DMatrix::from_row_slice(1, 3, &[5.0, 3.0, 1.0]);
        let fig = TimeSeriesPlotter
            .render(&times, &states, &RenderOptions::default())
            .unwrap();
        let planar = fig.scene().planar().unwrap();
        assert_eq!(planar.x_label, "Time");
        assert_eq!(planar.y_label, "x(t)");
        assert_eq!(planar.curves[0].points, vec![(0.0, 5.0), (1.0, 3.0), (2.0, 1.0)]);
        assert_eq!(planar.markers[0].at, (0.0, 5.0));
        assert_eq!(planar.markers[1].at, (2.0, 1.0));
        assert_eq!(fig.plotter_name(), "time-series");
    }

    #[test]
    fn time_series_ignores_equal_aspect() {
        let times = sf_core::linspace(0.0, 100.0, 50);
        let states = DMatrix::from_fn(1, 50, |_, j| (-times[j] / 20.0).exp());
        let opts = RenderOptions::default().with_config(PlotConfig {
            aspect: Aspect::Equal,
            ..PlotConfig::default()
        });
        let fig = TimeSeriesPlotter.render(&times, &states, &opts).unwrap();
        assert_eq!(fig.scene().planar().unwrap().aspect, Aspect::Auto);
        let Layout::Planar(layout) = fig.layout() else {
            panic!("expected planar layout");
        };
        // The value axis keeps its own data range instead of being stretched.
        assert!(layout.y_range.1 - layout.y_range.0 < 2.0);
    }

    #[test]
    fn phase_plane_defaults_and_markers() {
        let (times, states) = circle(50);
        let fig = PhasePlanePlotter
            .render(&times, &states, &RenderOptions::default())
            .unwrap();
        let planar = fig.scene().planar().unwrap();
        assert_eq!(planar.x_label, "State 0");
        assert_eq!(planar.y_label, "State 1");
        assert_eq!(planar.markers.len(), 2);
        assert_eq!(planar.markers[0].label, "Start");
        assert_eq!(planar.markers[1].label, "End");
        assert!(fig.scene().has_legend());
        assert!(fig.svg().starts_with("<svg"));
    }

    #[test]
    fn equal_aspect_gives_square_units() {
        let (times, states) = circle(100);
        let opts = RenderOptions::default().with_config(PlotConfig {
            aspect: Aspect::Equal,
            ..PlotConfig::default()
        });
        let fig = PhasePlanePlotter.render(&times, &states, &opts).unwrap();
        let Layout::Planar(layout) = fig.layout() else {
            panic!("expected planar layout");
        };
        let (ux, uy) = layout.units_per_pixel();
        assert!((ux - uy).abs() / ux < 1e-9);
    }

    #[test]
    fn phase_volume_builds_3d_scene() {
        let times = sf_core::linspace(0.0, 1.0, 20);
        let states = DMatrix::from_fn(3, 20, |i, j| (i + j) as f64);
        let opts = RenderOptions::default()
            .with_labels(["x", "y", "z"])
            .with_title("Volume");
        let fig = PhaseVolumePlotter.render(&times, &states, &opts).unwrap();
        let volume = fig.scene().volume().unwrap();
        assert_eq!(volume.labels, ["x", "y", "z"]);
        assert_eq!(volume.markers[0].at, (0.0, 1.0, 2.0));
        assert_eq!(volume.markers[1].at, (19.0, 20.0, 21.0));
        assert_eq!(fig.scene().caption(), Some("Volume"));
        assert!(fig.svg().contains("Volume"));
    }

    #[test]
    fn no_markers_means_no_legend() {
        let (times, states) = circle(10);
        let opts = RenderOptions::default().with_config(PlotConfig {
            show_markers: false,
            ..PlotConfig::default()
        });
        let fig = PhasePlanePlotter.render(&times, &states, &opts).unwrap();
        assert!(fig.scene().planar().unwrap().markers.is_empty());
        assert!(!fig.scene().has_legend());
    }

    #[test]
    fn single_sample_renders() {
        let states = DMatrix::from_row_slice(2, 1, &[1.0, 2.0]);
        let fig = PhasePlanePlotter
            .render(&[0.0], &states, &RenderOptions::default())
            .unwrap();
        let planar = fig.scene().planar().unwrap();
        assert_eq!(planar.markers[0].at, planar.markers[1].at);
    }
}
