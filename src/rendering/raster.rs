/// Rasterizer: executes paint commands on an RGB canvas

use image::{Rgb, RgbImage};

use crate::rendering::paint::PaintCommand;
use crate::{Canvas, Error, FontHandle, Result};

/// Largest width or height accepted for a canvas (the JPEG limit)
pub const MAX_CANVAS_DIMENSION: u32 = 65_535;

/// Largest pixel count accepted for a canvas
pub const MAX_CANVAS_PIXELS: u64 = 64 * 1024 * 1024;

/// Reject canvases the image buffer cannot represent.
///
/// Zero-sized, overlong and oversized canvases are a `RenderError` rather
/// than a failed allocation.
pub fn check_canvas(canvas: Canvas) -> Result<()> {
    if canvas.width == 0 || canvas.height == 0 {
        return Err(Error::RenderError(format!(
            "canvas must be non-empty, got {}x{}",
            canvas.width, canvas.height
        )));
    }
    if canvas.width > MAX_CANVAS_DIMENSION || canvas.height > MAX_CANVAS_DIMENSION {
        return Err(Error::RenderError(format!(
            "canvas {}x{} exceeds the {}px limit per side",
            canvas.width, canvas.height, MAX_CANVAS_DIMENSION
        )));
    }
    let pixels = u64::from(canvas.width) * u64::from(canvas.height);
    let fits = pixels <= MAX_CANVAS_PIXELS
        && pixels
            .checked_mul(3)
            .and_then(|bytes| usize::try_from(bytes).ok())
            .is_some();
    if !fits {
        return Err(Error::RenderError(format!(
            "canvas {}x{} exceeds the {} pixel limit",
            canvas.width, canvas.height, MAX_CANVAS_PIXELS
        )));
    }
    Ok(())
}

pub fn rasterize(commands: &[PaintCommand], canvas: Canvas, font: &FontHandle) -> Result<RgbImage> {
    check_canvas(canvas)?;
    let mut image = RgbImage::new(canvas.width, canvas.height);

    for cmd in commands {
        match cmd {
            PaintCommand::Clear { color } => {
                let rgb = color.to_rgb();
                for pixel in image.pixels_mut() {
                    *pixel = rgb;
                }
            }
            PaintCommand::Text { x, y, text, color } => {
                draw_line(&mut image, font, *x, *y, text, color.to_rgb());
            }
        }
    }

    Ok(image)
}

fn draw_line(image: &mut RgbImage, font: &FontHandle, x: i32, y: i32, text: &str, fg: Rgb<u8>) {
    let baseline = y as f32 + font.ascent();
    let (glyphs, _) = font.layout_line(text, x as f32, baseline);
    let (width, height) = image.dimensions();

    for glyph in glyphs {
        let Some(outlined) = font.outline(glyph) else {
            // whitespace has no outline
            continue;
        };
        let bounds = outlined.px_bounds();
        let min_x = bounds.min.x as i64;
        let min_y = bounds.min.y as i64;
        outlined.draw(|gx, gy, coverage| {
            let px = min_x + i64::from(gx);
            let py = min_y + i64::from(gy);
            if px < 0 || py < 0 || px >= i64::from(width) || py >= i64::from(height) {
                return;
            }
            let pixel = image.get_pixel_mut(px as u32, py as u32);
            *pixel = blend(*pixel, fg, coverage);
        });
    }
}

/// Move `under` towards `over` by `coverage` (0.0..=1.0).
fn blend(under: Rgb<u8>, over: Rgb<u8>, coverage: f32) -> Rgb<u8> {
    let a = coverage.clamp(0.0, 1.0);
    let mix = |u: u8, o: u8| (f32::from(u) + (f32::from(o) - f32::from(u)) * a).round() as u8;
    Rgb([
        mix(under[0], over[0]),
        mix(under[1], over[1]),
        mix(under[2], over[2]),
    ])
}
