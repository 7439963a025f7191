//! Replays a [`Scene`] onto any plotters backend.

use plotters::coord::Shift;
use plotters::prelude::*;

use crate::error::{PlotError, PlotResult};
use crate::layout::{Frame, Layout, PlanarLayout, VolumeLayout, format_tick};
use crate::scene::{Curve, Marker, PlanarScene, Scene, SceneKind, VolumeScene};

/// Grid lines are drawn at this opacity.
const GRID_ALPHA: f64 = 0.3;
const LEGEND_LINE_PX: i32 = 20;

fn stroke(color: RGBColor, alpha: f64, width: u32) -> ShapeStyle {
    ShapeStyle {
        color: color.mix(alpha.clamp(0.0, 1.0)),
        filled: false,
        stroke_width: width,
    }
}

fn fill(color: RGBColor) -> ShapeStyle {
    ShapeStyle {
        color: color.to_rgba(),
        filled: true,
        stroke_width: 1,
    }
}

fn curve_style<P>(curve: &Curve<P>) -> ShapeStyle {
    stroke(curve.color, curve.alpha, curve.width.max(1))
}

fn marker_style<P>(marker: &Marker<P>) -> (ShapeStyle, u32) {
    (fill(marker.color), marker.radius.max(1))
}

fn finite2(p: &(f64, f64)) -> bool {
    p.0.is_finite() && p.1.is_finite()
}

fn finite3(p: &(f64, f64, f64)) -> bool {
    p.0.is_finite() && p.1.is_finite() && p.2.is_finite()
}

/// Draw the whole figure onto `root`. The caller presents the area.
pub(crate) fn draw_figure<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    scene: &Scene,
    frame: &Frame,
    layout: &Layout,
) -> PlotResult<()> {
    root.fill(&frame.theme.figure_bg)?;
    match (&scene.kind, layout) {
        (SceneKind::Planar(p), Layout::Planar(l)) => draw_planar(root, scene, p, frame, l),
        (SceneKind::Volume(v), Layout::Volume(l)) => draw_volume(root, scene, v, frame, l),
        _ => Err(PlotError::Backend {
            message: "layout was computed for a different scene kind".to_string(),
        }),
    }
}

fn draw_planar<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    scene: &Scene,
    p: &PlanarScene,
    frame: &Frame,
    l: &PlanarLayout,
) -> PlotResult<()> {
    let theme = &frame.theme;

    let mut builder = ChartBuilder::on(root);
    builder
        .margin(l.margin)
        .x_label_area_size(l.x_label_area)
        .y_label_area_size(l.y_label_area);
    if let Some(title) = scene.caption() {
        builder.caption(title, frame.font(frame.title_px).color(&theme.text));
    }
    let mut chart =
        builder.build_cartesian_2d(l.x_range.0..l.x_range.1, l.y_range.0..l.y_range.1)?;
    chart.plotting_area().fill(&theme.axes_bg)?;

    let x_fmt = |v: &f64| format_tick(*v, l.x_precision);
    let y_fmt = |v: &f64| format_tick(*v, l.y_precision);
    let mut mesh = chart.configure_mesh();
    mesh.x_desc(p.x_label.as_str())
        .y_desc(p.y_label.as_str())
        .label_style(frame.font(frame.tick_px).color(&theme.text))
        .axis_desc_style(frame.font(frame.label_px).color(&theme.text))
        .axis_style(stroke(theme.edge, 1.0, 1))
        .x_label_formatter(&x_fmt)
        .y_label_formatter(&y_fmt);
    if scene.show_grid {
        mesh.bold_line_style(stroke(theme.grid, GRID_ALPHA, 1))
            .light_line_style(stroke(theme.grid, 0.0, 1));
    } else {
        mesh.disable_mesh();
    }
    mesh.draw()?;

    for curve in &p.curves {
        let style = curve_style(curve);
        let anno = chart.draw_series(LineSeries::new(
            curve.points.iter().copied().filter(finite2),
            style,
        ))?;
        if let Some(label) = &curve.label {
            anno.label(label.as_str()).legend(move |(x, y)| {
                PathElement::new(vec![(x, y), (x + LEGEND_LINE_PX, y)], style)
            });
        }
    }

    for marker in &p.markers {
        let (style, radius) = marker_style(marker);
        chart
            .draw_series(std::iter::once(Circle::new(marker.at, radius, style)))?
            .label(marker.label.as_str())
            .legend(move |(x, y)| Circle::new((x, y), radius, style));
    }

    if scene.has_legend() {
        chart
            .configure_series_labels()
            .position(SeriesLabelPosition::UpperRight)
            .background_style(theme.axes_bg.mix(0.8))
            .border_style(stroke(theme.text, 0.5, 1))
            .label_font(frame.font(frame.tick_px).color(&theme.text))
            .draw()?;
    }
    Ok(())
}

fn draw_volume<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    scene: &Scene,
    v: &VolumeScene,
    frame: &Frame,
    l: &VolumeLayout,
) -> PlotResult<()> {
    let theme = &frame.theme;
    // Plotters' second axis points up; data z goes there.
    let [xr, yr, zr] = l.ranges;
    let up = |(x, y, z): (f64, f64, f64)| (x, z, y);

    let mut builder = ChartBuilder::on(root);
    builder.margin(l.margin);
    if let Some(title) = scene.caption() {
        builder.caption(title, frame.font(frame.title_px).color(&theme.text));
    }
    let mut chart = builder.build_cartesian_3d(xr.0..xr.1, zr.0..zr.1, yr.0..yr.1)?;
    chart.with_projection(|mut pb| {
        pb.yaw = 0.6;
        pb.pitch = 0.35;
        pb.scale = 0.8;
        pb.into_matrix()
    });

    let x_fmt = |v: &f64| format_tick(*v, l.precision[0]);
    let z_fmt = |v: &f64| format_tick(*v, l.precision[2]);
    let y_fmt = |v: &f64| format_tick(*v, l.precision[1]);
    let grid = if scene.show_grid { GRID_ALPHA } else { 0.0 };
    chart
        .configure_axes()
        .label_style(frame.font(frame.tick_px).color(&theme.text))
        .axis_panel_style(fill(theme.axes_bg))
        .bold_grid_style(stroke(theme.grid, grid, 1))
        .light_grid_style(stroke(theme.grid, 0.0, 1))
        .max_light_lines(0)
        .x_formatter(&x_fmt)
        .y_formatter(&z_fmt)
        .z_formatter(&y_fmt)
        .draw()?;

    let desc = frame.font(frame.label_px).color(&theme.text);
    let mid = |(lo, hi): (f64, f64)| 0.5 * (lo + hi);
    let beyond = |(lo, hi): (f64, f64)| lo - 0.15 * (hi - lo);
    let axis_labels = [
        (v.labels[0].as_str(), (mid(xr), beyond(yr), zr.0)),
        (v.labels[1].as_str(), (beyond(xr), mid(yr), zr.0)),
        (v.labels[2].as_str(), (xr.0, yr.1, mid(zr))),
    ];
    chart.draw_series(
        axis_labels
            .into_iter()
            .filter(|(text, _)| !text.is_empty())
            .map(|(text, at)| Text::new(text.to_string(), up(at), desc.clone())),
    )?;

    for curve in &v.curves {
        let style = curve_style(curve);
        let anno = chart.draw_series(LineSeries::new(
            curve.points.iter().copied().filter(finite3).map(up),
            style,
        ))?;
        if let Some(label) = &curve.label {
            anno.label(label.as_str()).legend(move |(x, y)| {
                PathElement::new(vec![(x, y), (x + LEGEND_LINE_PX, y)], style)
            });
        }
    }

    for marker in &v.markers {
        let (style, radius) = marker_style(marker);
        chart
            .draw_series(std::iter::once(Circle::new(up(marker.at), radius, style)))?
            .label(marker.label.as_str())
            .legend(move |(x, y)| Circle::new((x, y), radius, style));
    }

    if scene.has_legend() {
        chart
            .configure_series_labels()
            .position(SeriesLabelPosition::UpperRight)
            .background_style(theme.figure_bg.mix(0.8))
            .border_style(stroke(theme.text, 0.5, 1))
            .label_font(frame.font(frame.tick_px).color(&theme.text))
            .draw()?;
    }
    Ok(())
}
