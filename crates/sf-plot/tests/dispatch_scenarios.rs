use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use nalgebra::DMatrix;
use sf_core::{Trajectory, linspace};
use sf_plot::{
    Figure, PhaseVolumePlotter, PlotConfig, PlotError, PlotResult, PlotterRegistry,
    RenderOptions, SceneKind, TrajectoryPlotter, render_solution, render_trajectory,
};

fn small_config() -> PlotConfig {
    PlotConfig {
        figsize: (4.0, 3.0),
        dpi: 60,
        ..PlotConfig::default()
    }
}

fn circle() -> (Vec<f64>, DMatrix<f64>) {
    let times = linspace(0.0, 10.0, 100);
    let states = DMatrix::from_fn(2, times.len(), |i, j| {
        if i == 0 { times[j].sin() } else { times[j].cos() }
    });
    (times, states)
}

fn helix(dims: usize) -> (Vec<f64>, DMatrix<f64>) {
    let times = linspace(0.0, 6.0, 60);
    let states = DMatrix::from_fn(dims, times.len(), |i, j| match i {
        0 => times[j].cos(),
        1 => times[j].sin(),
        _ => times[j] * i as f64,
    });
    (times, states)
}

#[test]
fn two_dimensional_trajectory_gets_phase_plane() {
    let (times, states) = circle();
    let times_before = times.clone();
    let states_before = states.clone();

    let opts = RenderOptions::default()
        .with_labels(["x", "y"])
        .with_title("Circle")
        .with_config(small_config());
    let figure = render_trajectory(&PlotterRegistry::new(), &times, &states, &opts).unwrap();

    assert_eq!(figure.plotter_name(), "phase-plane");
    let planar = figure.scene().planar().expect("planar scene");
    assert_eq!(planar.x_label, "x");
    assert_eq!(planar.y_label, "y");
    assert_eq!(planar.curves[0].points.len(), 100);
    assert_eq!(planar.markers[0].at, (0.0_f64.sin(), 0.0_f64.cos()));
    assert_eq!(planar.markers[1].at, (10.0_f64.sin(), 10.0_f64.cos()));
    assert_eq!(figure.scene().caption(), Some("Circle"));

    assert_eq!(times, times_before);
    assert_eq!(states, states_before);
}

#[test]
fn three_dimensional_trajectory_gets_phase_volume() {
    let (times, states) = helix(3);
    let opts = RenderOptions::default().with_config(small_config());
    let figure = render_trajectory(&PlotterRegistry::new(), &times, &states, &opts).unwrap();

    assert_eq!(figure.plotter_name(), "phase-volume");
    assert!(matches!(figure.scene().kind, SceneKind::Volume(_)));
    let volume = figure.scene().volume().unwrap();
    assert_eq!(volume.labels, ["State 0", "State 1", "State 2"]);
}

#[test]
fn one_dimensional_trajectory_gets_time_series() {
    let times = linspace(0.0, 5.0, 40);
    let states = DMatrix::from_fn(1, times.len(), |_, j| 5.0 * (-times[j]).exp());
    let trajectory = Trajectory::new(times, states).unwrap();
    let opts = RenderOptions::default().with_config(small_config());
    let figure = render_solution(&PlotterRegistry::new(), &trajectory, &opts).unwrap();
    assert_eq!(figure.plotter_name(), "time-series");
}

#[test]
fn unregistered_dimension_reports_available_keys() {
    let (times, states) = helix(4);
    let err = render_trajectory(
        &PlotterRegistry::new(),
        &times,
        &states,
        &RenderOptions::default(),
    )
    .unwrap_err();
    match err {
        PlotError::PlotterNotFound {
            requested,
            available,
        } => {
            assert_eq!(requested, 4);
            assert_eq!(available, vec![1, 2, 3]);
        }
        other => panic!("unexpected error: {other}"),
    }
}

/// Draws the first three coordinates of any trajectory and counts calls.
struct ProjectingPlotter {
    calls: Arc<AtomicUsize>,
}

impl TrajectoryPlotter for ProjectingPlotter {
    fn name(&self) -> &'static str {
        "projecting"
    }

    fn render(
        &self,
        times: &[f64],
        states: &DMatrix<f64>,
        opts: &RenderOptions,
    ) -> PlotResult<Figure> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let head = states.rows(0, 3).into_owned();
        PhaseVolumePlotter.render(times, &head, opts)
    }
}

#[test]
fn custom_variant_handles_new_dimension() {
    let calls = Arc::new(AtomicUsize::new(0));
    let mut registry = PlotterRegistry::new();
    let counter = Arc::clone(&calls);
    registry.register(4, move || {
        Box::new(ProjectingPlotter {
            calls: Arc::clone(&counter),
        })
    });

    let (times, states) = helix(4);
    let opts = RenderOptions::default().with_config(small_config());
    let figure = render_trajectory(&registry, &times, &states, &opts).unwrap();

    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert!(figure.scene().volume().is_some());
    assert_eq!(registry.dimensions(), vec![1, 2, 3, 4]);
}

#[test]
fn registering_twice_keeps_last_factory() {
    let mut registry = PlotterRegistry::new();
    registry.register_variant::<PhaseVolumePlotter>(2);
    let (times, states) = circle();
    let err = render_trajectory(&registry, &times, &states, &RenderOptions::default())
        .unwrap_err();
    assert!(matches!(
        err,
        PlotError::DimensionMismatch {
            plotter: "phase-volume",
            needed: 3,
            actual: 2
        }
    ));
}

#[test]
fn empty_trajectory_is_an_error() {
    let states = DMatrix::<f64>::zeros(2, 0);
    let err = render_trajectory(&PlotterRegistry::new(), &[], &states, &RenderOptions::default())
        .unwrap_err();
    assert!(matches!(err, PlotError::EmptyTrajectory));
}

#[test]
fn repeated_renders_are_identical() {
    let (times, states) = circle();
    let registry = PlotterRegistry::new();
    let opts = RenderOptions::default()
        .with_title("Same")
        .with_config(small_config());
    let a = render_trajectory(&registry, &times, &states, &opts).unwrap();
    let b = render_trajectory(&registry, &times, &states, &opts).unwrap();
    assert_eq!(a.scene(), b.scene());
    assert_eq!(a.svg(), b.svg());
}

#[test]
fn styles_do_not_leak_between_calls() {
    let (times, states) = circle();
    let registry = PlotterRegistry::new();
    let plain = RenderOptions::default().with_config(small_config());
    let dark = RenderOptions::default().with_config(PlotConfig {
        style: "dark_background".to_string(),
        ..small_config()
    });

    let before = render_trajectory(&registry, &times, &states, &plain).unwrap();
    let styled = render_trajectory(&registry, &times, &states, &dark).unwrap();
    let after = render_trajectory(&registry, &times, &states, &plain).unwrap();

    assert_eq!(styled.theme().name, "dark_background");
    assert_ne!(styled.svg(), before.svg());
    assert_eq!(before.theme(), after.theme());
    assert_eq!(before.svg(), after.svg());
}

#[test]
fn unknown_style_is_reported() {
    let (times, states) = circle();
    let opts = RenderOptions::default().with_config(PlotConfig {
        style: "solarized".to_string(),
        ..small_config()
    });
    let err = render_trajectory(&PlotterRegistry::new(), &times, &states, &opts).unwrap_err();
    match err {
        PlotError::UnknownStyle { name, available } => {
            assert_eq!(name, "solarized");
            assert!(available.contains(&"ggplot"));
        }
        other => panic!("unexpected error: {other}"),
    }
}
