use std::fs;
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use nalgebra::DMatrix;
use plotters::style::RGBColor;
use sf_core::linspace;
use sf_plot::{
    Aspect, Curve, Layout, LineColor, PlotConfig, PlotError, PlotterRegistry, RenderOptions,
    SaveFormat, render_trajectory,
};

fn unique_temp_dir(prefix: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos();
    let dir = std::env::temp_dir().join(format!("{prefix}_{nanos}"));
    fs::create_dir_all(&dir).expect("failed to create temp dir");
    dir
}

fn small_config(save_format: SaveFormat) -> PlotConfig {
    PlotConfig {
        figsize: (4.0, 3.0),
        dpi: 50,
        save_format,
        ..PlotConfig::default()
    }
}

fn decay() -> (Vec<f64>, DMatrix<f64>) {
    let times = linspace(0.0, 5.0, 50);
    let states = DMatrix::from_fn(1, times.len(), |_, j| 5.0 * (-times[j]).exp());
    (times, states)
}

#[test]
fn png_save_has_configured_pixel_size() {
    let dir = unique_temp_dir("sf_plot_png");
    let path = dir.join("decay.png");
    let (times, states) = decay();
    let opts = RenderOptions::default()
        .with_save_path(&path)
        .with_config(small_config(SaveFormat::Png));

    render_trajectory(&PlotterRegistry::new(), &times, &states, &opts).unwrap();

    let bytes = fs::read(&path).unwrap();
    assert!(bytes.starts_with(&[0x89, b'P', b'N', b'G']));
    let image = image::open(&path).unwrap();
    assert_eq!((image.width(), image.height()), (200, 150));

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn svg_save_writes_the_figure_markup() {
    let dir = unique_temp_dir("sf_plot_svg");
    let path = dir.join("decay.svg");
    let (times, states) = decay();
    let opts = RenderOptions::default()
        .with_title("Decay")
        .with_save_path(&path)
        .with_config(small_config(SaveFormat::Svg));

    let figure = render_trajectory(&PlotterRegistry::new(), &times, &states, &opts).unwrap();

    let written = fs::read_to_string(&path).unwrap();
    assert_eq!(written, figure.svg());
    assert!(written.contains("Decay"));

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn every_format_saves_non_empty_files() {
    let dir = unique_temp_dir("sf_plot_formats");
    let (times, states) = decay();
    let opts = RenderOptions::default().with_config(small_config(SaveFormat::Png));
    let figure = render_trajectory(&PlotterRegistry::new(), &times, &states, &opts).unwrap();

    for format in SaveFormat::ALL {
        let path = dir.join(format!("decay.{}", format.extension()));
        figure.save_as(&path, format).unwrap();
        assert!(fs::metadata(&path).unwrap().len() > 0, "{format} file is empty");
    }
    let jpeg = fs::read(dir.join("decay.jpg")).unwrap();
    assert!(jpeg.starts_with(&[0xff, 0xd8]));

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn save_overwrites_existing_file() {
    let dir = unique_temp_dir("sf_plot_overwrite");
    let path = dir.join("plot.svg");
    fs::write(&path, "stale").unwrap();
    let (times, states) = decay();
    let opts = RenderOptions::default()
        .with_save_path(&path)
        .with_config(small_config(SaveFormat::Svg));

    render_trajectory(&PlotterRegistry::new(), &times, &states, &opts).unwrap();

    assert_ne!(fs::read_to_string(&path).unwrap(), "stale");
    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn unwritable_path_propagates_io_error() {
    let dir = unique_temp_dir("sf_plot_missing");
    let path = dir.join("no_such_dir").join("plot.png");
    let (times, states) = decay();
    let opts = RenderOptions::default()
        .with_save_path(&path)
        .with_config(small_config(SaveFormat::Png));

    let err = render_trajectory(&PlotterRegistry::new(), &times, &states, &opts).unwrap_err();
    assert!(matches!(err, PlotError::Io(_)), "got {err}");
    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn zero_sized_figure_is_rejected() {
    let (times, states) = decay();
    let opts = RenderOptions::default().with_config(PlotConfig {
        figsize: (0.0, 3.0),
        ..PlotConfig::default()
    });
    let err = render_trajectory(&PlotterRegistry::new(), &times, &states, &opts).unwrap_err();
    assert!(matches!(err, PlotError::EmptyCanvas { width: 0, .. }));
}

#[test]
fn yaml_config_fills_missing_fields_with_defaults() {
    let yaml = "dpi: 72\nstyle: ggplot\nsave_format: jpg\naspect: equal\ncolor: '#ff0000'\n";
    let config: PlotConfig = serde_yaml::from_str(yaml).unwrap();

    assert_eq!(config.dpi, 72);
    assert_eq!(config.style, "ggplot");
    assert_eq!(config.save_format, SaveFormat::Jpeg);
    assert_eq!(config.aspect, Aspect::Equal);
    assert_eq!(config.color, LineColor::Spec("#ff0000".to_string()));
    assert_eq!(config.figsize, (10.0, 8.0));
    assert!(config.show_markers);

    let times = linspace(0.0, 6.0, 80);
    let states = DMatrix::from_fn(2, times.len(), |i, j| {
        if i == 0 { 2.0 * times[j].cos() } else { times[j].sin() }
    });
    let opts = RenderOptions::default().with_config(config);
    let figure = render_trajectory(&PlotterRegistry::new(), &times, &states, &opts).unwrap();

    let planar = figure.scene().planar().unwrap();
    assert_eq!(planar.curves[0].color, RGBColor(255, 0, 0));
    let Layout::Planar(layout) = figure.layout() else {
        panic!("expected a planar layout");
    };
    let (ux, uy) = layout.units_per_pixel();
    assert!((ux - uy).abs() <= 1e-9 * ux);
}

#[test]
fn overlay_curve_joins_planar_figure() {
    let (times, states) = decay();
    let opts = RenderOptions::default().with_config(small_config(SaveFormat::Svg));
    let mut figure = render_trajectory(&PlotterRegistry::new(), &times, &states, &opts).unwrap();
    let before = figure.svg().to_string();

    figure
        .add_curve(Curve {
            points: times.iter().map(|t| (*t, 5.0 * (-t).exp())).collect(),
            color: RGBColor(0, 0, 0),
            alpha: 0.5,
            width: 1,
            label: Some("Analytic".to_string()),
        })
        .unwrap();

    assert_eq!(figure.scene().planar().unwrap().curves.len(), 2);
    assert!(figure.svg().contains("Analytic"));
    assert_ne!(figure.svg(), before);
}

#[test]
fn overlay_curve_rejected_on_volume_figure() {
    let times = linspace(0.0, 1.0, 10);
    let states = DMatrix::from_fn(3, times.len(), |i, j| (i * j) as f64);
    let opts = RenderOptions::default().with_config(small_config(SaveFormat::Svg));
    let mut figure = render_trajectory(&PlotterRegistry::new(), &times, &states, &opts).unwrap();

    let err = figure
        .add_curve(Curve {
            points: vec![(0.0, 0.0)],
            color: RGBColor(0, 0, 0),
            alpha: 1.0,
            width: 1,
            label: None,
        })
        .unwrap_err();
    assert!(matches!(err, PlotError::WrongSceneKind { expected: "planar" }));
}

#[test]
fn default_config_png_draws_labelled_planar_and_volume_figures() {
    let dir = unique_temp_dir("sf_plot_default_png");
    let registry = PlotterRegistry::new();
    let times = linspace(0.0, 6.0, 120);
    let planar = DMatrix::from_fn(2, times.len(), |i, j| {
        if i == 0 { times[j].cos() } else { times[j].sin() }
    });
    let volume = DMatrix::from_fn(3, times.len(), |i, j| match i {
        0 => times[j].cos(),
        1 => times[j].sin(),
        _ => 0.2 * times[j],
    });

    for (name, states, labels) in [
        ("planar.png", &planar, vec!["x", "y"]),
        ("volume.png", &volume, vec!["x", "y", "z"]),
    ] {
        let path = dir.join(name);
        let opts = RenderOptions::default()
            .with_labels(labels)
            .with_title("Labelled trajectory")
            .with_save_path(&path);
        render_trajectory(&registry, &times, states, &opts).unwrap();

        let bytes = fs::read(&path).unwrap();
        assert!(bytes.starts_with(&[0x89, b'P', b'N', b'G']));
        let image = image::open(&path).unwrap();
        assert_eq!((image.width(), image.height()), (1000, 800), "{name}");
    }

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn raster_output_contains_the_title_text() {
    let registry = PlotterRegistry::new();
    let times = linspace(0.0, 6.0, 60);
    let states = DMatrix::from_fn(2, times.len(), |i, j| {
        if i == 0 { times[j].cos() } else { times[j].sin() }
    });
    let raster = |title: &str| {
        let opts = RenderOptions::default()
            .with_title(title)
            .with_config(small_config(SaveFormat::Png));
        render_trajectory(&registry, &times, &states, &opts)
            .unwrap()
            .to_rgb_image()
            .unwrap()
    };

    // Same layout, different glyphs.
    assert_ne!(raster("Phase"), raster("Orbit"));
}
