//! Rendering pipeline: wrap, size, paint, rasterize

pub mod layout;
pub mod paint;
pub mod raster;

use std::path::Path;

use image::RgbImage;

use crate::session::{Pipeline, RenderSummary};
use crate::{Canvas, Error, FontHandle, RenderConfig, Result};

/// A finished, not yet persisted, text image.
#[derive(Debug, Clone)]
pub struct TextImage {
    pub width: u32,
    pub height: u32,
    /// Wrapped lines in top-to-bottom order
    pub lines: Vec<String>,
    pub image: RgbImage,
}

impl TextImage {
    /// Encode to `path`; the extension picks the format.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        self.image.save(path).map_err(|e| match e {
            image::ImageError::IoError(io) => Error::IoError(io),
            other => Error::ImageError(other),
        })?;
        log::info!(
            "saved {}x{} image with {} lines to {}",
            self.width,
            self.height,
            self.lines.len(),
            path.display()
        );
        Ok(())
    }
}

/// Draw already wrapped lines onto a canvas of the given size.
pub fn render_lines(
    lines: &[String],
    canvas: Canvas,
    font: &FontHandle,
    config: &RenderConfig,
) -> Result<RgbImage> {
    let commands = paint::paint_lines(lines, config);
    raster::rasterize(&commands, canvas, font)
}

/// Wrap `text` to the configured width, size the canvas and draw it.
pub fn render_text(font: &FontHandle, config: &RenderConfig, text: &str) -> Result<TextImage> {
    let lines = layout::wrap_text(text, config.max_line_width(), font);
    let canvas = layout::canvas_for(lines.len(), config);
    log::debug!(
        "rendering {} lines on a {}x{} canvas",
        lines.len(),
        canvas.width,
        canvas.height
    );
    let image = render_lines(&lines, canvas, font, config)?;
    Ok(TextImage {
        width: canvas.width,
        height: canvas.height,
        lines,
        image,
    })
}

/// The loaded font plus configuration; renders text straight to files.
#[derive(Debug)]
pub struct TextImager {
    font: FontHandle,
    config: RenderConfig,
}

impl TextImager {
    /// Validate the configuration and load its font.
    pub fn new(config: RenderConfig) -> Result<Self> {
        config.validate()?;
        let font = FontHandle::from_file(&config.font_path, config.font_size)?;
        Ok(Self { font, config })
    }

    pub fn with_font(font: FontHandle, config: RenderConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { font, config })
    }

    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    pub fn render(&self, text: &str) -> Result<TextImage> {
        render_text(&self.font, &self.config, text)
    }
}

impl Pipeline for TextImager {
    fn render_to_file(&self, text: &str, path: &Path) -> Result<RenderSummary> {
        let image = self.render(text)?;
        image.save(path)?;
        Ok(RenderSummary {
            path: path.to_path_buf(),
            line_count: image.lines.len(),
            width: image.width,
            height: image.height,
        })
    }

    fn output_path(&self, n: u32) -> std::path::PathBuf {
        self.config.output_path(n)
    }
}
