//! Error types for imbridge.

use thiserror::Error;

/// The main error type for imbridge operations.
#[derive(Error, Debug)]
pub enum BridgeError {
    /// The icon font payload is not valid Base64.
    #[error("icon font payload is not valid base64: {0}")]
    IconFontDecode(#[from] base64::DecodeError),

    /// The font payload is not a TrueType/OpenType file.
    #[error("invalid font data: {0}")]
    InvalidFontData(String),

    /// A glyph range is empty or reversed.
    #[error("invalid glyph range {min:#x}..={max:#x}")]
    InvalidGlyphRange { min: u32, max: u32 },

    /// Rendering error.
    #[error("render error: {0}")]
    Render(String),

    /// Window or event loop error.
    #[error("windowing error: {0}")]
    Window(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A specialized Result type for imbridge operations.
pub type Result<T> = std::result::Result<T, BridgeError>;
