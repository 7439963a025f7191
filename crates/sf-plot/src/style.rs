//! Named visual styles.
//!
//! A style name resolves to a [`Theme`] value at the start of each render
//! call. Themes are plain values passed down the drawing code, so a style
//! applies to exactly one figure and never leaks into the next.

use plotters::style::RGBColor;

use crate::error::{PlotError, PlotResult};

/// Colours used to draw one figure.
#[derive(Clone, Debug, PartialEq)]
pub struct Theme {
    pub name: &'static str,
    /// Canvas background.
    pub figure_bg: RGBColor,
    /// Plotting-area background.
    pub axes_bg: RGBColor,
    /// Titles, labels and tick text.
    pub text: RGBColor,
    /// Axis lines and legend border.
    pub edge: RGBColor,
    pub grid: RGBColor,
    /// Line colour cycle; `C0`..`C9` and `auto` index into it.
    pub palette: &'static [RGBColor],
}

pub(crate) const fn hex(v: u32) -> RGBColor {
    RGBColor((v >> 16) as u8, (v >> 8) as u8, v as u8)
}

const TAB10: [RGBColor; 10] = [
    hex(0x1f77b4),
    hex(0xff7f0e),
    hex(0x2ca02c),
    hex(0xd62728),
    hex(0x9467bd),
    hex(0x8c564b),
    hex(0xe377c2),
    hex(0x7f7f7f),
    hex(0xbcbd22),
    hex(0x17becf),
];

const SEABORN_DEEP: [RGBColor; 10] = [
    hex(0x4c72b0),
    hex(0xdd8452),
    hex(0x55a868),
    hex(0xc44e52),
    hex(0x8172b3),
    hex(0x937860),
    hex(0xda8bc3),
    hex(0x8c8c8c),
    hex(0xccb974),
    hex(0x64b5cd),
];

const CLASSIC: [RGBColor; 7] = [
    hex(0x0000ff),
    hex(0x008000),
    hex(0xff0000),
    hex(0x00bfbf),
    hex(0xbf00bf),
    hex(0xbfbf00),
    hex(0x000000),
];

const GGPLOT: [RGBColor; 7] = [
    hex(0xe24a33),
    hex(0x348abd),
    hex(0x988ed5),
    hex(0x777777),
    hex(0xfbc15e),
    hex(0x8eba42),
    hex(0xffb5b8),
];

const DARK: [RGBColor; 10] = [
    hex(0x8dd3c7),
    hex(0xfeffb3),
    hex(0xbfbbd9),
    hex(0xfa8174),
    hex(0x81b1d2),
    hex(0xfdb462),
    hex(0xb3de69),
    hex(0xbc82bd),
    hex(0xccebc4),
    hex(0xffed6f),
];

const BMH: [RGBColor; 10] = [
    hex(0x348abd),
    hex(0xa60628),
    hex(0x7a68a6),
    hex(0x467821),
    hex(0xd55e00),
    hex(0xcc79a7),
    hex(0x56b4e9),
    hex(0x009e73),
    hex(0xf0e442),
    hex(0x0072b2),
];

/// Names accepted by [`Theme::by_name`].
pub const STYLE_NAMES: [&str; 6] = [
    "seaborn-v0_8-darkgrid",
    "default",
    "classic",
    "ggplot",
    "dark_background",
    "bmh",
];

impl Theme {
    pub fn by_name(name: &str) -> PlotResult<Theme> {
        let theme = match name {
            "seaborn-v0_8-darkgrid" => Theme {
                name: "seaborn-v0_8-darkgrid",
                figure_bg: hex(0xffffff),
                axes_bg: hex(0xeaeaf2),
                text: hex(0x262626),
                edge: hex(0xffffff),
                grid: hex(0xffffff),
                palette: &SEABORN_DEEP,
            },
            "default" => Theme {
                name: "default",
                figure_bg: hex(0xffffff),
                axes_bg: hex(0xffffff),
                text: hex(0x000000),
                edge: hex(0x000000),
                grid: hex(0xb0b0b0),
                palette: &TAB10,
            },
            "classic" => Theme {
                name: "classic",
                figure_bg: hex(0xbfbfbf),
                axes_bg: hex(0xffffff),
                text: hex(0x000000),
                edge: hex(0x000000),
                grid: hex(0x000000),
                palette: &CLASSIC,
            },
            "ggplot" => Theme {
                name: "ggplot",
                figure_bg: hex(0xffffff),
                axes_bg: hex(0xe5e5e5),
                text: hex(0x555555),
                edge: hex(0xffffff),
                grid: hex(0xffffff),
                palette: &GGPLOT,
            },
            "dark_background" => Theme {
                name: "dark_background",
                figure_bg: hex(0x000000),
                axes_bg: hex(0x000000),
                text: hex(0xffffff),
                edge: hex(0xffffff),
                grid: hex(0xffffff),
                palette: &DARK,
            },
            "bmh" => Theme {
                name: "bmh",
                figure_bg: hex(0xffffff),
                axes_bg: hex(0xeeeeee),
                text: hex(0x000000),
                edge: hex(0xbcbcbc),
                grid: hex(0xb2b2b2),
                palette: &BMH,
            },
            _ => {
                return Err(PlotError::UnknownStyle {
                    name: name.to_string(),
                    available: STYLE_NAMES.to_vec(),
                });
            }
        };
        Ok(theme)
    }

    /// Colour `index` of the cycle, wrapping around.
    pub fn cycle(&self, index: usize) -> RGBColor {
        self.palette[index % self.palette.len()]
    }
}
