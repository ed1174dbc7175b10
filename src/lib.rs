//! Textcard
//!
//! Renders plain text into image files. Text is word-wrapped to a fixed canvas
//! width and the canvas grows vertically until every line fits.
//!
//! The pipeline is split into small pieces that can be used on their own:
//!
//! - **Measuring**: [`TextMeasurer`] reports the pixel size of a string.
//!   [`FontHandle`] measures with a real TrueType/OpenType font,
//!   [`FixedAdvance`] with synthetic monospace metrics.
//! - **Layout**: [`rendering::layout::wrap_text`] and
//!   [`rendering::layout::compute_height`].
//! - **Painting**: [`rendering::paint::paint_lines`] and
//!   [`rendering::raster::rasterize`].
//! - **Session**: [`session::Session`] drives the interactive console loop.
//!
//! # Example
//!
//! ```no_run
//! use textcard::{FontHandle, RenderConfig};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = RenderConfig {
//!     font_path: "fonts/DejaVuSans.ttf".into(),
//!     canvas_width: 640,
//!     ..Default::default()
//! };
//! config.validate()?;
//!
//! let font = FontHandle::from_file(&config.font_path, config.font_size)?;
//! let image = textcard::render_text(&font, &config, "The quick brown fox")?;
//! println!("{} lines, {}x{}", image.lines.len(), image.width, image.height);
//! image.save(config.output_path(1))?;
//! # Ok(())
//! # }
//! ```

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

pub mod error;
pub use error::{Error, Result};

pub mod font;
pub use font::{FixedAdvance, FontHandle};

pub mod rendering;
pub use rendering::{render_text, TextImage, TextImager};

pub mod session;

/// Pixel size of a rendered string
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TextMetrics {
    pub width: u32,
    pub height: u32,
}

/// Anything that can report the rendered size of a string.
///
/// Implementations must be pure: the same input always yields the same
/// metrics for the lifetime of the measurer.
pub trait TextMeasurer {
    /// Measure `text` as a single unwrapped line
    fn measure(&self, text: &str) -> TextMetrics;
}

impl<M: TextMeasurer + ?Sized> TextMeasurer for &M {
    fn measure(&self, text: &str) -> TextMetrics {
        (**self).measure(text)
    }
}

/// Canvas dimensions in pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Canvas {
    pub width: u32,
    pub height: u32,
}

/// Padding around the text block, in pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Margins {
    pub top: u32,
    pub right: u32,
    pub bottom: u32,
    pub left: u32,
}

impl Margins {
    /// Same margin on all four sides
    pub const fn uniform(px: u32) -> Self {
        Self {
            top: px,
            right: px,
            bottom: px,
            left: px,
        }
    }
}

impl Default for Margins {
    fn default() -> Self {
        Self::uniform(10)
    }
}

/// An opaque RGB color.
///
/// Parses from `#rrggbb`, `rrggbb`, `white` and `black`, and serializes back
/// to the `#rrggbb` form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct Color(pub [u8; 3]);

impl Color {
    pub const WHITE: Color = Color([255, 255, 255]);
    pub const BLACK: Color = Color([0, 0, 0]);

    pub fn to_rgb(self) -> image::Rgb<u8> {
        image::Rgb(self.0)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [r, g, b] = self.0;
        write!(f, "#{:02x}{:02x}{:02x}", r, g, b)
    }
}

impl FromStr for Color {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        match s.to_ascii_lowercase().as_str() {
            "white" => return Ok(Color::WHITE),
            "black" => return Ok(Color::BLACK),
            _ => {}
        }
        let hex = s.strip_prefix('#').unwrap_or(s);
        if hex.len() != 6 || !hex.is_ascii() {
            return Err(Error::ConfigError(format!("invalid color '{}'", s)));
        }
        let mut rgb = [0u8; 3];
        for (i, channel) in rgb.iter_mut().enumerate() {
            *channel = u8::from_str_radix(&hex[i * 2..i * 2 + 2], 16)
                .map_err(|_| Error::ConfigError(format!("invalid color '{}'", s)))?;
        }
        Ok(Color(rgb))
    }
}

impl From<Color> for String {
    fn from(c: Color) -> String {
        c.to_string()
    }
}

impl TryFrom<String> for Color {
    type Error = Error;

    fn try_from(s: String) -> Result<Self> {
        s.parse()
    }
}

/// Configuration for rendering text into images
///
/// Built once at startup and never mutated afterwards. The defaults reproduce
/// the classic generator: an 800px wide white canvas at least 600px tall,
/// 20px black text, 10px margins and 5px between lines, written as
/// `output_image_<n>.jpg`.
///
/// # Examples
///
/// ```
/// let cfg = textcard::RenderConfig::default();
/// assert_eq!(cfg.line_height(), 25);
/// assert_eq!(cfg.max_line_width(), 780);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderConfig {
    /// Path to the TrueType/OpenType font file
    pub font_path: PathBuf,
    /// Font size in pixels
    pub font_size: u32,
    /// Fixed canvas width; lines wrap to fit inside it
    pub canvas_width: u32,
    /// The canvas never gets shorter than this
    pub min_height: u32,
    /// Padding around the text block
    pub margins: Margins,
    /// Extra pixels between consecutive lines
    pub line_spacing: u32,
    pub background: Color,
    pub foreground: Color,
    /// File name prefix for numbered outputs (may include a directory)
    pub output_base: String,
    /// File extension, which also selects the image format
    pub output_extension: String,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            font_path: PathBuf::from("arial.ttf"),
            font_size: 20,
            canvas_width: 800,
            min_height: 600,
            margins: Margins::default(),
            line_spacing: 5,
            background: Color::WHITE,
            foreground: Color::BLACK,
            output_base: "output_image".to_string(),
            output_extension: "jpg".to_string(),
        }
    }
}

/// Environment variable names understood by [`RenderConfig::with_overrides`]
pub mod env_keys {
    pub const FONT_PATH: &str = "TEXTCARD_FONT_PATH";
    pub const FONT_SIZE: &str = "TEXTCARD_FONT_SIZE";
    pub const WIDTH: &str = "TEXTCARD_WIDTH";
    pub const MIN_HEIGHT: &str = "TEXTCARD_MIN_HEIGHT";
    pub const MARGIN: &str = "TEXTCARD_MARGIN";
    pub const LINE_SPACING: &str = "TEXTCARD_LINE_SPACING";
    pub const BACKGROUND: &str = "TEXTCARD_BACKGROUND";
    pub const FOREGROUND: &str = "TEXTCARD_FOREGROUND";
    pub const OUTPUT: &str = "TEXTCARD_OUTPUT";
    pub const FORMAT: &str = "TEXTCARD_FORMAT";
}

fn parse_value<T>(key: &str, raw: &str) -> Result<T>
where
    T: FromStr,
    T::Err: fmt::Display,
{
    raw.trim()
        .parse()
        .map_err(|e| Error::ConfigError(format!("{}={:?}: {}", key, raw, e)))
}

impl RenderConfig {
    /// Apply overrides from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::default().with_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides from an arbitrary key lookup (see [`env_keys`]).
    ///
    /// Unset keys keep their current value; values that fail to parse are a
    /// `ConfigError`.
    pub fn with_overrides<F>(mut self, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = lookup(env_keys::FONT_PATH) {
            self.font_path = PathBuf::from(v);
        }
        if let Some(v) = lookup(env_keys::FONT_SIZE) {
            self.font_size = parse_value(env_keys::FONT_SIZE, &v)?;
        }
        if let Some(v) = lookup(env_keys::WIDTH) {
            self.canvas_width = parse_value(env_keys::WIDTH, &v)?;
        }
        if let Some(v) = lookup(env_keys::MIN_HEIGHT) {
            self.min_height = parse_value(env_keys::MIN_HEIGHT, &v)?;
        }
        if let Some(v) = lookup(env_keys::MARGIN) {
            self.margins = Margins::uniform(parse_value(env_keys::MARGIN, &v)?);
        }
        if let Some(v) = lookup(env_keys::LINE_SPACING) {
            self.line_spacing = parse_value(env_keys::LINE_SPACING, &v)?;
        }
        if let Some(v) = lookup(env_keys::BACKGROUND) {
            self.background = parse_value(env_keys::BACKGROUND, &v)?;
        }
        if let Some(v) = lookup(env_keys::FOREGROUND) {
            self.foreground = parse_value(env_keys::FOREGROUND, &v)?;
        }
        if let Some(v) = lookup(env_keys::OUTPUT) {
            self.output_base = v;
        }
        if let Some(v) = lookup(env_keys::FORMAT) {
            self.output_extension = v.trim().trim_start_matches('.').to_string();
        }
        Ok(self)
    }

    /// Reject combinations that can never produce an image.
    pub fn validate(&self) -> Result<()> {
        if self.font_size == 0 {
            return Err(Error::ConfigError("font size must be positive".into()));
        }
        if self.canvas_width <= self.margins.left.saturating_add(self.margins.right) {
            return Err(Error::ConfigError(format!(
                "canvas width {} leaves no room between margins {} and {}",
                self.canvas_width, self.margins.left, self.margins.right
            )));
        }
        let floor = Canvas {
            width: self.canvas_width,
            height: self.min_height.max(1),
        };
        rendering::raster::check_canvas(floor)
            .map_err(|e| Error::ConfigError(format!("canvas size: {}", e)))?;
        if self.output_base.trim().is_empty() {
            return Err(Error::ConfigError("output base name is empty".into()));
        }
        if self.output_extension.is_empty() {
            return Err(Error::ConfigError("output extension is empty".into()));
        }
        Ok(())
    }

    /// Vertical distance between the tops of consecutive lines
    pub fn line_height(&self) -> u32 {
        self.font_size.saturating_add(self.line_spacing)
    }

    /// Widest line that fits between the left and right margins
    pub fn max_line_width(&self) -> u32 {
        self.canvas_width
            .saturating_sub(self.margins.left)
            .saturating_sub(self.margins.right)
    }

    /// Path of the `n`-th numbered output, e.g. `output_image_3.jpg`
    pub fn output_path(&self, n: u32) -> PathBuf {
        PathBuf::from(format!(
            "{}_{}.{}",
            self.output_base, n, self.output_extension
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_default_config() {
        let config = RenderConfig::default();
        assert_eq!(config.canvas_width, 800);
        assert_eq!(config.min_height, 600);
        assert_eq!(config.font_size, 20);
        assert_eq!(config.line_height(), 25);
        assert_eq!(config.background, Color::WHITE);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn output_paths_are_numbered() {
        let config = RenderConfig::default();
        assert_eq!(config.output_path(1), PathBuf::from("output_image_1.jpg"));
        assert_eq!(config.output_path(12), PathBuf::from("output_image_12.jpg"));
    }

    #[test]
    fn overrides_replace_only_given_keys() {
        let config = RenderConfig::default()
            .with_overrides(lookup(&[
                (env_keys::FONT_PATH, "/fonts/DejaVuSans.ttf"),
                (env_keys::FONT_SIZE, "32"),
                (env_keys::MARGIN, "4"),
                (env_keys::FORMAT, ".png"),
                (env_keys::BACKGROUND, "#102030"),
            ]))
            .unwrap();
        assert_eq!(config.font_path, PathBuf::from("/fonts/DejaVuSans.ttf"));
        assert_eq!(config.font_size, 32);
        assert_eq!(config.margins, Margins::uniform(4));
        assert_eq!(config.output_extension, "png");
        assert_eq!(config.background, Color([0x10, 0x20, 0x30]));
        assert_eq!(config.canvas_width, 800);
        assert_eq!(config.foreground, Color::BLACK);
    }

    #[test]
    fn unparsable_override_is_config_error() {
        let err = RenderConfig::default()
            .with_overrides(lookup(&[(env_keys::FONT_SIZE, "large")]))
            .unwrap_err();
        assert!(matches!(err, Error::ConfigError(ref m) if m.contains("TEXTCARD_FONT_SIZE")));
    }

    #[test]
    fn validate_rejects_unusable_layouts() {
        let zero_font = RenderConfig {
            font_size: 0,
            ..Default::default()
        };
        assert!(zero_font.validate().is_err());

        let no_room = RenderConfig {
            canvas_width: 20,
            margins: Margins::uniform(10),
            ..Default::default()
        };
        assert!(no_room.validate().is_err());
    }

    #[test]
    fn validate_rejects_canvases_too_large_to_allocate() {
        let huge = RenderConfig {
            canvas_width: u32::MAX,
            min_height: u32::MAX,
            ..Default::default()
        };
        assert!(matches!(huge.validate(), Err(Error::ConfigError(_))));

        let too_wide = RenderConfig {
            canvas_width: rendering::raster::MAX_CANVAS_DIMENSION + 1,
            min_height: 0,
            ..Default::default()
        };
        assert!(matches!(too_wide.validate(), Err(Error::ConfigError(_))));

        let no_floor = RenderConfig {
            min_height: 0,
            ..Default::default()
        };
        assert!(no_floor.validate().is_ok());
    }

    #[test]
    fn color_parsing() {
        assert_eq!("white".parse::<Color>().unwrap(), Color::WHITE);
        assert_eq!("FF8000".parse::<Color>().unwrap(), Color([255, 128, 0]));
        assert_eq!(Color([1, 2, 255]).to_string(), "#0102ff");
        assert!("#12345".parse::<Color>().is_err());
        assert!("#gg0000".parse::<Color>().is_err());
    }

    #[test]
    fn config_serializes_colors_as_hex() {
        let json = serde_json::to_value(RenderConfig::default()).unwrap();
        assert_eq!(json["background"], "#ffffff");
        assert_eq!(json["margins"]["left"], 10);
        let back: RenderConfig = serde_json::from_value(json).unwrap();
        assert_eq!(back, RenderConfig::default());
    }
}
