//! The figure artifact returned by every plotter.

use std::fmt;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use image::{ImageFormat, RgbImage};
use plotters::prelude::*;
use tracing::info;

use crate::config::SaveFormat;
use crate::draw::draw_figure;
use crate::error::{PlotError, PlotResult};
use crate::layout::{Frame, Layout};
use crate::scene::{Curve, Point2, Scene, SceneKind};
use crate::style::Theme;

/// A rendered figure.
///
/// Owns everything it needs to produce output: the scene, the resolved
/// style, the layout and an SVG rendering made when the figure was created.
/// Raster output is drawn on demand at the figure's pixel size.
#[derive(Clone)]
pub struct Figure {
    scene: Scene,
    frame: Frame,
    layout: Layout,
    save_format: SaveFormat,
    plotter: &'static str,
    svg: String,
}

impl Figure {
    pub(crate) fn new(
        scene: Scene,
        frame: Frame,
        save_format: SaveFormat,
        plotter: &'static str,
    ) -> PlotResult<Self> {
        let layout = Layout::compute(&scene, &frame)?;
        let svg = render_svg(&scene, &frame, &layout)?;
        Ok(Self {
            scene,
            frame,
            layout,
            save_format,
            plotter,
            svg,
        })
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    pub fn theme(&self) -> &Theme {
        &self.frame.theme
    }

    /// Canvas size in pixels.
    pub fn size(&self) -> (u32, u32) {
        self.frame.size
    }

    /// Name of the plotter variant that produced this figure.
    pub fn plotter_name(&self) -> &'static str {
        self.plotter
    }

    /// Format used by [`Figure::save`].
    pub fn save_format(&self) -> SaveFormat {
        self.save_format
    }

    pub fn svg(&self) -> &str {
        &self.svg
    }

    /// Add a line to a planar figure, e.g. a reference solution.
    pub fn add_curve(&mut self, curve: Curve<Point2>) -> PlotResult<()> {
        let SceneKind::Planar(planar) = &mut self.scene.kind else {
            return Err(PlotError::WrongSceneKind { expected: "planar" });
        };
        planar.curves.push(curve);
        self.layout = Layout::compute(&self.scene, &self.frame)?;
        self.svg = render_svg(&self.scene, &self.frame, &self.layout)?;
        Ok(())
    }

    /// Save in the configured format, overwriting `path`.
    pub fn save(&self, path: impl AsRef<Path>) -> PlotResult<()> {
        self.save_as(path, self.save_format)
    }

    /// Save in `format`, overwriting `path`.
    pub fn save_as(&self, path: impl AsRef<Path>, format: SaveFormat) -> PlotResult<()> {
        let path = path.as_ref();
        match format {
            SaveFormat::Svg => fs::write(path, &self.svg)?,
            SaveFormat::Png | SaveFormat::Jpeg | SaveFormat::Bmp => {
                let image = self.to_rgb_image()?;
                let mut out = BufWriter::new(File::create(path)?);
                image.write_to(&mut out, image_format(format))?;
                out.flush()?;
            }
        }
        info!(
            path = %path.display(),
            format = %format,
            plotter = self.plotter,
            "saved figure"
        );
        Ok(())
    }

    /// Rasterize the scene into an RGB image.
    pub fn to_rgb_image(&self) -> PlotResult<RgbImage> {
        let (width, height) = self.frame.size;
        let mut buffer = vec![0u8; width as usize * height as usize * 3];
        {
            let root = BitMapBackend::with_buffer(&mut buffer, (width, height)).into_drawing_area();
            draw_figure(&root, &self.scene, &self.frame, &self.layout)?;
            root.present()?;
        }
        RgbImage::from_raw(width, height, buffer).ok_or_else(|| PlotError::Encode {
            message: format!("pixel buffer does not match {width}x{height}"),
        })
    }
}

impl fmt::Debug for Figure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Figure")
            .field("plotter", &self.plotter)
            .field("size", &self.frame.size)
            .field("style", &self.frame.theme.name)
            .field("save_format", &self.save_format)
            .field("scene", &self.scene)
            .finish_non_exhaustive()
    }
}

fn render_svg(scene: &Scene, frame: &Frame, layout: &Layout) -> PlotResult<String> {
    let mut svg = String::new();
    {
        let root = SVGBackend::with_string(&mut svg, frame.size).into_drawing_area();
        draw_figure(&root, scene, frame, layout)?;
        root.present()?;
    }
    Ok(svg)
}

fn image_format(format: SaveFormat) -> ImageFormat {
    match format {
        SaveFormat::Jpeg => ImageFormat::Jpeg,
        SaveFormat::Bmp => ImageFormat::Bmp,
        SaveFormat::Png | SaveFormat::Svg => ImageFormat::Png,
    }
}
