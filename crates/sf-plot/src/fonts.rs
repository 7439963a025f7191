//! Bundled text font.
//!
//! Bitmap output rasterizes glyphs itself, so the font ships with the crate
//! instead of being looked up on the host. DejaVu Sans, license in
//! `assets/DejaVuSans-LICENSE.txt`.

use std::sync::OnceLock;

use plotters::style::{FontStyle, register_font};

use crate::error::{PlotError, PlotResult};

/// Family every figure draws its text with.
pub(crate) const FONT_FAMILY: &str = "sans-serif";

static DEJAVU_SANS: &[u8] = include_bytes!("../assets/DejaVuSans.ttf");
static REGISTERED: OnceLock<bool> = OnceLock::new();

/// Register the bundled font under [`FONT_FAMILY`]; later calls are free.
pub(crate) fn ensure_registered() -> PlotResult<()> {
    let ok = *REGISTERED
        .get_or_init(|| register_font(FONT_FAMILY, FontStyle::Normal, DEJAVU_SANS).is_ok());
    if ok {
        Ok(())
    } else {
        Err(PlotError::Backend {
            message: "bundled font could not be loaded".to_string(),
        })
    }
}
