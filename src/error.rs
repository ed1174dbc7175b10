//! Error types for the text renderer

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for rendering operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while loading resources or producing an image
#[derive(Error, Debug)]
pub enum Error {
    /// The font file is missing or could not be parsed
    #[error("Failed to load font '{}': {reason}", path.display())]
    FontLoadError { path: PathBuf, reason: String },

    /// Invalid canvas or drawing parameters
    #[error("Rendering failed: {0}")]
    RenderError(String),

    /// Invalid configuration value or combination
    #[error("Invalid configuration: {0}")]
    ConfigError(String),

    /// Writing the output failed
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Encoding the output image failed
    #[error("Failed to encode image: {0}")]
    ImageError(#[from] image::ImageError),
}

impl Error {
    /// Whether the error should abort the process rather than a single request.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Error::FontLoadError { .. } | Error::ConfigError(_))
    }
}
