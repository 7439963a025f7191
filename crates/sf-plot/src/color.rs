//! Colour specifications.
//!
//! Accepted forms: `#rrggbb`, `#rgb`, single-letter codes (`b g r c m y k w`),
//! cycle references `C0`..`C9` into the active theme, grey levels given as a
//! number in `[0, 1]`, and named colours (`red`, `navy`, `tab:orange`, ...).

use plotters::style::RGBColor;

use crate::config::LineColor;
use crate::error::{PlotError, PlotResult};
use crate::style::{Theme, hex};

const NAMED: &[(&str, u32)] = &[
    ("black", 0x000000),
    ("white", 0xffffff),
    ("red", 0xff0000),
    ("green", 0x008000),
    ("blue", 0x0000ff),
    ("cyan", 0x00ffff),
    ("magenta", 0xff00ff),
    ("yellow", 0xffff00),
    ("orange", 0xffa500),
    ("purple", 0x800080),
    ("brown", 0xa52a2a),
    ("pink", 0xffc0cb),
    ("gray", 0x808080),
    ("grey", 0x808080),
    ("olive", 0x808000),
    ("navy", 0x000080),
    ("teal", 0x008080),
    ("lime", 0x00ff00),
    ("maroon", 0x800000),
    ("gold", 0xffd700),
    ("indigo", 0x4b0082),
    ("violet", 0xee82ee),
    ("crimson", 0xdc143c),
    ("darkblue", 0x00008b),
    ("darkgreen", 0x006400),
    ("darkred", 0x8b0000),
    ("lightblue", 0xadd8e6),
    ("lightgray", 0xd3d3d3),
    ("steelblue", 0x4682b4),
    ("tab:blue", 0x1f77b4),
    ("tab:orange", 0xff7f0e),
    ("tab:green", 0x2ca02c),
    ("tab:red", 0xd62728),
    ("tab:purple", 0x9467bd),
    ("tab:brown", 0x8c564b),
    ("tab:pink", 0xe377c2),
    ("tab:gray", 0x7f7f7f),
    ("tab:grey", 0x7f7f7f),
    ("tab:olive", 0xbcbd22),
    ("tab:cyan", 0x17becf),
];

/// Resolve a colour spec against `theme`.
pub fn parse_color(spec: &str, theme: &Theme) -> PlotResult<RGBColor> {
    let invalid = || PlotError::InvalidColor {
        spec: spec.to_string(),
    };
    let s = spec.trim();

    if let Some(digits) = s.strip_prefix('#') {
        return parse_hex(digits).ok_or_else(invalid);
    }

    if let Some(index) = s.strip_prefix('C')
        && let Ok(i) = index.parse::<usize>()
    {
        return Ok(theme.cycle(i));
    }

    let letter = match s {
        "b" => Some(0x0000ff),
        "g" => Some(0x008000),
        "r" => Some(0xff0000),
        "c" => Some(0x00bfbf),
        "m" => Some(0xbf00bf),
        "y" => Some(0xbfbf00),
        "k" => Some(0x000000),
        "w" => Some(0xffffff),
        _ => None,
    };
    if let Some(v) = letter {
        return Ok(hex(v));
    }

    if let Ok(level) = s.parse::<f64>() {
        if !(0.0..=1.0).contains(&level) {
            return Err(invalid());
        }
        let g = (level * 255.0).round() as u8;
        return Ok(RGBColor(g, g, g));
    }

    let lower = s.to_ascii_lowercase();
    NAMED
        .iter()
        .find(|(name, _)| *name == lower)
        .map(|(_, v)| hex(*v))
        .ok_or_else(invalid)
}

/// Trajectory colour for `color` under `theme`.
pub fn line_color(color: &LineColor, theme: &Theme) -> PlotResult<RGBColor> {
    match color {
        LineColor::Auto => Ok(theme.cycle(0)),
        LineColor::Spec(spec) => parse_color(spec, theme),
    }
}

fn parse_hex(digits: &str) -> Option<RGBColor> {
    if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    match digits.len() {
        6 => u32::from_str_radix(digits, 16).ok().map(hex),
        3 => {
            let v = u32::from_str_radix(digits, 16).ok()?;
            let expand = |n: u32| ((n & 0xf) * 0x11) as u8;
            Some(RGBColor(expand(v >> 8), expand(v >> 4), expand(v)))
        }
        _ => None,
    }
}
