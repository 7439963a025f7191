//! Retained description of what a figure shows.
//!
//! Plotters draws straight into a backend, so a figure keeps its content as
//! a `Scene` and replays it whenever an output is produced.

use plotters::style::RGBColor;

use crate::config::Aspect;

pub type Point2 = (f64, f64);
pub type Point3 = (f64, f64, f64);

/// A polyline in data coordinates.
#[derive(Clone, Debug, PartialEq)]
pub struct Curve<P> {
    pub points: Vec<P>,
    pub color: RGBColor,
    /// Opacity, clamped to `[0, 1]` when drawn.
    pub alpha: f64,
    /// Stroke width in pixels.
    pub width: u32,
    /// Legend entry, if any.
    pub label: Option<String>,
}

/// A filled circle marking one point.
#[derive(Clone, Debug, PartialEq)]
pub struct Marker<P> {
    pub at: P,
    pub color: RGBColor,
    /// Radius in pixels.
    pub radius: u32,
    pub label: String,
}

/// 2-D axes: one horizontal and one vertical data axis.
#[derive(Clone, Debug, PartialEq)]
pub struct PlanarScene {
    pub x_label: String,
    pub y_label: String,
    pub aspect: Aspect,
    pub curves: Vec<Curve<Point2>>,
    pub markers: Vec<Marker<Point2>>,
}

/// 3-D axes under a fixed projection.
#[derive(Clone, Debug, PartialEq)]
pub struct VolumeScene {
    pub labels: [String; 3],
    pub curves: Vec<Curve<Point3>>,
    pub markers: Vec<Marker<Point3>>,
}

#[derive(Clone, Debug, PartialEq)]
pub enum SceneKind {
    Planar(PlanarScene),
    Volume(VolumeScene),
}

#[derive(Clone, Debug, PartialEq)]
pub struct Scene {
    /// Drawn only when present and non-empty.
    pub title: Option<String>,
    pub show_grid: bool,
    pub kind: SceneKind,
}

impl Scene {
    /// Title text to draw, if any.
    pub fn caption(&self) -> Option<&str> {
        self.title.as_deref().filter(|t| !t.is_empty())
    }

    /// Whether any element carries a legend entry.
    pub fn has_legend(&self) -> bool {
        match &self.kind {
            SceneKind::Planar(p) => {
                !p.markers.is_empty() || p.curves.iter().any(|c| c.label.is_some())
            }
            SceneKind::Volume(v) => {
                !v.markers.is_empty() || v.curves.iter().any(|c| c.label.is_some())
            }
        }
    }

    pub fn planar(&self) -> Option<&PlanarScene> {
        match &self.kind {
            SceneKind::Planar(p) => Some(p),
            SceneKind::Volume(_) => None,
        }
    }

    pub fn volume(&self) -> Option<&VolumeScene> {
        match &self.kind {
            SceneKind::Volume(v) => Some(v),
            SceneKind::Planar(_) => None,
        }
    }
}

impl PlanarScene {
    /// Finite data extent over curves and markers: `((x_lo, x_hi), (y_lo, y_hi))`.
    pub fn data_bounds(&self) -> ((f64, f64), (f64, f64)) {
        let points = || {
            self.curves
                .iter()
                .flat_map(|c| c.points.iter().copied())
                .chain(self.markers.iter().map(|m| m.at))
        };
        (
            bounds_or_unit(points().map(|p| p.0)),
            bounds_or_unit(points().map(|p| p.1)),
        )
    }
}

impl VolumeScene {
    pub fn data_bounds(&self) -> [(f64, f64); 3] {
        let points = || {
            self.curves
                .iter()
                .flat_map(|c| c.points.iter().copied())
                .chain(self.markers.iter().map(|m| m.at))
        };
        [
            bounds_or_unit(points().map(|p| p.0)),
            bounds_or_unit(points().map(|p| p.1)),
            bounds_or_unit(points().map(|p| p.2)),
        ]
    }
}

fn bounds_or_unit(values: impl Iterator<Item = f64>) -> (f64, f64) {
    sf_core::finite_bounds(values).unwrap_or((0.0, 1.0))
}
