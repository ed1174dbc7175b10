//! Font loading and text measurement

use std::fmt;
use std::path::{Path, PathBuf};

use ab_glyph::{point, Font, FontVec, Glyph, GlyphId, OutlinedGlyph, PxScale, ScaleFont};

use crate::{Error, Result, TextMeasurer, TextMetrics};

/// A font loaded once at startup and borrowed by every measure/render call.
pub struct FontHandle {
    font: FontVec,
    scale: PxScale,
    size: u32,
    source: PathBuf,
}

impl fmt::Debug for FontHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FontHandle")
            .field("source", &self.source)
            .field("size", &self.size)
            .finish_non_exhaustive()
    }
}

impl FontHandle {
    /// Read and parse a font file at the given pixel size.
    pub fn from_file(path: impl AsRef<Path>, size: u32) -> Result<Self> {
        let path = path.as_ref();
        let data = std::fs::read(path).map_err(|e| Error::FontLoadError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        Self::parse(data, size, path.to_path_buf())
    }

    /// Parse font data already held in memory.
    pub fn from_bytes(data: Vec<u8>, size: u32) -> Result<Self> {
        Self::parse(data, size, PathBuf::from("<memory>"))
    }

    fn parse(data: Vec<u8>, size: u32, source: PathBuf) -> Result<Self> {
        if size == 0 {
            return Err(Error::ConfigError("font size must be positive".into()));
        }
        let font = FontVec::try_from_vec(data).map_err(|e| Error::FontLoadError {
            path: source.clone(),
            reason: e.to_string(),
        })?;
        log::debug!("loaded font {} at {}px", source.display(), size);
        Ok(Self {
            font,
            scale: PxScale::from(size as f32),
            size,
            source,
        })
    }

    /// Pixel size the font was loaded at
    pub fn size(&self) -> u32 {
        self.size
    }

    /// Where the font data came from
    pub fn source(&self) -> &Path {
        &self.source
    }

    /// Distance from the top of a line box to the baseline
    pub fn ascent(&self) -> f32 {
        self.font.as_scaled(self.scale).ascent()
    }

    /// Position the glyphs of a single line.
    ///
    /// Returns the glyphs with their baseline at `baseline_y` and the total
    /// horizontal advance including pair kerning. Control characters are
    /// skipped.
    pub(crate) fn layout_line(&self, text: &str, origin_x: f32, baseline_y: f32) -> (Vec<Glyph>, f32) {
        let scaled = self.font.as_scaled(self.scale);
        let mut caret = origin_x;
        let mut prev: Option<GlyphId> = None;
        let mut glyphs = Vec::with_capacity(text.len());

        for ch in text.chars().filter(|c| !c.is_control()) {
            let id = scaled.glyph_id(ch);
            if let Some(p) = prev {
                caret += scaled.kern(p, id);
            }
            glyphs.push(id.with_scale_and_position(self.scale, point(caret, baseline_y)));
            caret += scaled.h_advance(id);
            prev = Some(id);
        }

        (glyphs, caret - origin_x)
    }

    pub(crate) fn outline(&self, glyph: Glyph) -> Option<OutlinedGlyph> {
        self.font.outline_glyph(glyph)
    }
}

impl TextMeasurer for FontHandle {
    fn measure(&self, text: &str) -> TextMetrics {
        let scaled = self.font.as_scaled(self.scale);
        let (_, advance) = self.layout_line(text, 0.0, 0.0);
        TextMetrics {
            width: advance.max(0.0).ceil() as u32,
            height: (scaled.ascent() - scaled.descent()).max(0.0).ceil() as u32,
        }
    }
}

/// Monospace metrics without a font: every character is `advance` pixels wide.
///
/// Used for deterministic layout in tests and benchmarks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedAdvance {
    pub advance: u32,
    pub height: u32,
}

impl FixedAdvance {
    pub const fn new(advance: u32, height: u32) -> Self {
        Self { advance, height }
    }
}

impl TextMeasurer for FixedAdvance {
    fn measure(&self, text: &str) -> TextMetrics {
        let chars = text.chars().count() as u32;
        TextMetrics {
            width: chars.saturating_mul(self.advance),
            height: self.height,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_is_font_load_error() {
        let err = FontHandle::from_file("/definitely/not/here.ttf", 20).unwrap_err();
        match err {
            Error::FontLoadError { path, .. } => {
                assert_eq!(path, PathBuf::from("/definitely/not/here.ttf"))
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn corrupt_data_is_font_load_error() {
        let err = FontHandle::from_bytes(b"not a font at all".to_vec(), 20).unwrap_err();
        assert!(matches!(err, Error::FontLoadError { .. }));
    }

    #[test]
    fn fixed_advance_counts_chars() {
        let m = FixedAdvance::new(10, 25);
        assert_eq!(m.measure("hello"), TextMetrics { width: 50, height: 25 });
        assert_eq!(m.measure(""), TextMetrics { width: 0, height: 25 });
        // counts chars, not bytes
        assert_eq!(m.measure("héllo").width, 50);
    }
}
