//! Pixel geometry of a figure.
//!
//! Fonts are sized in points and converted with the config's dpi. Label
//! areas are sized from the measured label text so that nothing is clipped
//! and no space is wasted before the figure is drawn or saved.

use plotters::style::{FontDesc, IntoFont};

use crate::config::{Aspect, PlotConfig};
use crate::error::{PlotError, PlotResult};
use crate::fonts::{FONT_FAMILY, ensure_registered};
use crate::scene::{PlanarScene, Scene, SceneKind, VolumeScene};
use crate::style::Theme;

const TITLE_PT: f64 = 14.0;
const LABEL_PT: f64 = 12.0;
const TICK_PT: f64 = 10.0;
/// Fraction of the data span added on each side of an axis.
const DATA_MARGIN: f64 = 0.05;

/// Style and size resolved from a [`PlotConfig`] for one render call.
#[derive(Clone, Debug, PartialEq)]
pub struct Frame {
    pub theme: Theme,
    /// Canvas size in pixels.
    pub size: (u32, u32),
    pub title_px: f64,
    pub label_px: f64,
    pub tick_px: f64,
}

impl Frame {
    pub fn resolve(config: &PlotConfig) -> PlotResult<Self> {
        ensure_registered()?;
        let theme = Theme::by_name(&config.style)?;
        let (width, height) = config.pixel_size();
        if width == 0 || height == 0 {
            return Err(PlotError::EmptyCanvas { width, height });
        }
        Ok(Self {
            theme,
            size: (width, height),
            title_px: config.points_to_px(TITLE_PT),
            label_px: config.points_to_px(LABEL_PT),
            tick_px: config.points_to_px(TICK_PT),
        })
    }

    pub(crate) fn font(&self, px: f64) -> FontDesc<'static> {
        (FONT_FAMILY, px).into_font()
    }

    fn text_size(&self, text: &str, px: f64) -> PlotResult<(u32, u32)> {
        self.font(px)
            .box_size(text)
            .map_err(|e| PlotError::Backend {
                message: format!("measuring text '{text}': {e}"),
            })
    }

    fn padding(&self) -> u32 {
        ((self.tick_px * 0.5).round() as u32).max(2)
    }

    fn caption_height(&self, scene: &Scene) -> PlotResult<u32> {
        match scene.caption() {
            // Same reservation plotters makes for a chart caption.
            Some(title) => {
                let (_, h) = self.text_size(title, self.title_px)?;
                Ok(h + 2 * (h / 2).min(5))
            }
            None => Ok(0),
        }
    }
}

/// Geometry of a planar chart.
#[derive(Clone, Debug, PartialEq)]
pub struct PlanarLayout {
    pub margin: u32,
    pub caption_height: u32,
    pub x_label_area: u32,
    pub y_label_area: u32,
    /// Size of the plotting area in pixels.
    pub plot_size: (u32, u32),
    pub x_range: (f64, f64),
    pub y_range: (f64, f64),
    pub x_precision: usize,
    pub y_precision: usize,
}

impl PlanarLayout {
    /// Data units per pixel along (x, y).
    pub fn units_per_pixel(&self) -> (f64, f64) {
        (
            (self.x_range.1 - self.x_range.0) / f64::from(self.plot_size.0),
            (self.y_range.1 - self.y_range.0) / f64::from(self.plot_size.1),
        )
    }
}

/// Geometry of a 3-D chart.
#[derive(Clone, Debug, PartialEq)]
pub struct VolumeLayout {
    pub margin: u32,
    pub caption_height: u32,
    pub ranges: [(f64, f64); 3],
    pub precision: [usize; 3],
}

#[derive(Clone, Debug, PartialEq)]
pub enum Layout {
    Planar(PlanarLayout),
    Volume(VolumeLayout),
}

impl Layout {
    pub fn compute(scene: &Scene, frame: &Frame) -> PlotResult<Self> {
        match &scene.kind {
            SceneKind::Planar(p) => planar(scene, p, frame).map(Layout::Planar),
            SceneKind::Volume(v) => volume(scene, v, frame).map(Layout::Volume),
        }
    }
}

fn margin(frame: &Frame) -> u32 {
    ((frame.label_px * 0.8).round() as u32).max(4)
}

fn planar(scene: &Scene, p: &PlanarScene, frame: &Frame) -> PlotResult<PlanarLayout> {
    let (width, height) = frame.size;
    let pad = frame.padding();
    let margin = margin(frame);
    let caption_height = frame.caption_height(scene)?;

    let (x_data, y_data) = p.data_bounds();
    let mut x_range = pad_range(x_data);
    let mut y_range = pad_range(y_data);

    let x_precision = tick_precision(x_range);
    let y_precision = tick_precision(y_range);

    let (_, tick_h) = frame.text_size("0", frame.tick_px)?;
    let mut y_tick_w = 0;
    for v in [y_range.0, y_range.1, 0.5 * (y_range.0 + y_range.1)] {
        let (w, _) = frame.text_size(&format_tick(v, y_precision), frame.tick_px)?;
        y_tick_w = y_tick_w.max(w);
    }
    let desc_height = |label: &str| -> PlotResult<u32> {
        if label.is_empty() {
            return Ok(0);
        }
        Ok(frame.text_size(label, frame.label_px)?.1 + pad)
    };

    let x_label_area = tick_h + 2 * pad + desc_height(p.x_label.as_str())?;
    let y_label_area = y_tick_w + 2 * pad + desc_height(p.y_label.as_str())?;

    let plot_w = width.saturating_sub(2 * margin + y_label_area);
    let plot_h = height.saturating_sub(2 * margin + caption_height + x_label_area);
    if plot_w == 0 || plot_h == 0 {
        return Err(PlotError::EmptyCanvas { width, height });
    }

    if p.aspect == Aspect::Equal {
        (x_range, y_range) = equalize(x_range, y_range, (plot_w, plot_h));
    }

    Ok(PlanarLayout {
        margin,
        caption_height,
        x_label_area,
        y_label_area,
        plot_size: (plot_w, plot_h),
        x_range,
        y_range,
        x_precision,
        y_precision,
    })
}

fn volume(scene: &Scene, v: &VolumeScene, frame: &Frame) -> PlotResult<VolumeLayout> {
    let ranges = v.data_bounds().map(pad_range);
    Ok(VolumeLayout {
        margin: margin(frame),
        caption_height: frame.caption_height(scene)?,
        ranges,
        precision: ranges.map(tick_precision),
    })
}

/// Widen a data range by the data margin; degenerate spans get a fixed pad.
pub fn pad_range((lo, hi): (f64, f64)) -> (f64, f64) {
    let span = hi - lo;
    if span > 0.0 && span.is_finite() {
        let pad = span * DATA_MARGIN;
        return (lo - pad, hi + pad);
    }
    let pad = if lo == 0.0 { 0.5 } else { lo.abs() * DATA_MARGIN };
    (lo - pad, hi + pad)
}

/// Expand the narrower axis so both show the same data units per pixel.
pub fn equalize(
    x: (f64, f64),
    y: (f64, f64),
    (plot_w, plot_h): (u32, u32),
) -> ((f64, f64), (f64, f64)) {
    let (w, h) = (f64::from(plot_w), f64::from(plot_h));
    let upp = ((x.1 - x.0) / w).max((y.1 - y.0) / h);
    let grow = |(lo, hi): (f64, f64), px: f64| {
        let mid = 0.5 * (lo + hi);
        let half = 0.5 * upp * px;
        (mid - half, mid + half)
    };
    (grow(x, w), grow(y, h))
}

/// Decimal places that resolve roughly a tenth of the span.
pub fn tick_precision((lo, hi): (f64, f64)) -> usize {
    let step = (hi - lo) / 10.0;
    if !(step > 0.0 && step.is_finite()) {
        return 2;
    }
    (-step.log10().floor()).clamp(0.0, 6.0) as usize
}

pub fn format_tick(v: f64, precision: usize) -> String {
    let s = format!("{v:.precision$}");
    // "-0.0" reads as noise on an axis.
    if let Some(rest) = s.strip_prefix('-')
        && rest.chars().all(|c| c == '0' || c == '.')
    {
        return rest.to_string();
    }
    s
}
