//! Plot configuration.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Styling and output options for one render call.
///
/// Plain data: nothing is validated when a config is built. Values the
/// backend cannot honour surface as errors at render time.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlotConfig {
    /// Figure size in inches (width, height).
    pub figsize: (f64, f64),
    /// Pixels per inch; also scales fonts, line widths and markers.
    pub dpi: u32,
    /// Named style, see [`crate::style::STYLE_NAMES`].
    pub style: String,
    /// Format used when a save path is given.
    pub save_format: SaveFormat,
    pub show_grid: bool,
    /// Trajectory line width in points.
    pub line_width: f64,
    pub color: LineColor,
    /// Line opacity, 0 transparent to 1 opaque.
    pub alpha: f64,
    /// Start/end marker diameter in points.
    pub marker_size: f64,
    pub show_markers: bool,
    pub aspect: Aspect,
}

impl Default for PlotConfig {
    fn default() -> Self {
        Self {
            figsize: (10.0, 8.0),
            dpi: 100,
            style: "seaborn-v0_8-darkgrid".to_string(),
            save_format: SaveFormat::Png,
            show_grid: false,
            line_width: 1.5,
            color: LineColor::Auto,
            alpha: 1.0,
            marker_size: 8.0,
            show_markers: true,
            aspect: Aspect::Auto,
        }
    }
}

impl PlotConfig {
    /// Canvas size in pixels, `figsize * dpi`.
    pub fn pixel_size(&self) -> (u32, u32) {
        let dpi = f64::from(self.dpi);
        // `as` saturates: negative or NaN sizes become 0.
        (
            (self.figsize.0 * dpi).round() as u32,
            (self.figsize.1 * dpi).round() as u32,
        )
    }

    /// Convert a length in points to pixels at this config's dpi.
    pub fn points_to_px(&self, points: f64) -> f64 {
        points * f64::from(self.dpi) / 72.0
    }
}

/// Trajectory line colour.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum LineColor {
    /// First colour of the style's palette.
    #[default]
    Auto,
    /// Any colour spec accepted by [`crate::color::parse_color`].
    Spec(String),
}

impl From<String> for LineColor {
    fn from(s: String) -> Self {
        if s.eq_ignore_ascii_case("auto") {
            LineColor::Auto
        } else {
            LineColor::Spec(s)
        }
    }
}

impl From<&str> for LineColor {
    fn from(s: &str) -> Self {
        LineColor::from(s.to_string())
    }
}

impl From<LineColor> for String {
    fn from(c: LineColor) -> Self {
        match c {
            LineColor::Auto => "auto".to_string(),
            LineColor::Spec(s) => s,
        }
    }
}

/// Axis scaling for planar plots.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Aspect {
    /// Fill the plotting area.
    #[default]
    Auto,
    /// One data unit spans the same number of pixels on both axes.
    Equal,
}

/// Output file format.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SaveFormat {
    #[default]
    Png,
    Svg,
    #[serde(alias = "jpg")]
    Jpeg,
    Bmp,
}

impl SaveFormat {
    pub const ALL: [SaveFormat; 4] = [
        SaveFormat::Png,
        SaveFormat::Svg,
        SaveFormat::Jpeg,
        SaveFormat::Bmp,
    ];

    pub fn extension(self) -> &'static str {
        match self {
            SaveFormat::Png => "png",
            SaveFormat::Svg => "svg",
            SaveFormat::Jpeg => "jpg",
            SaveFormat::Bmp => "bmp",
        }
    }

    pub fn is_raster(self) -> bool {
        !matches!(self, SaveFormat::Svg)
    }
}

impl fmt::Display for SaveFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for SaveFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "png" => Ok(SaveFormat::Png),
            "svg" => Ok(SaveFormat::Svg),
            "jpg" | "jpeg" => Ok(SaveFormat::Jpeg),
            "bmp" => Ok(SaveFormat::Bmp),
            other => Err(format!(
                "unsupported save format '{other}' (expected png, svg, jpeg or bmp)"
            )),
        }
    }
}
