//! Icon fonts merged into the GUI's default font at setup.

use base64::Engine as _;

use crate::{BridgeError, Result};

/// Size in pixels the icon glyphs are rasterized at, matching the default font.
pub const DEFAULT_ICON_FONT_SIZE: f32 = 11.0;

/// A decoded icon font plus the glyph range it covers.
///
/// The glyph ranges are owned by the font and released with it; the bridge
/// keeps the font alive until shutdown.
#[derive(Debug, Clone, PartialEq)]
pub struct IconFont {
    name: String,
    data: Vec<u8>,
    ranges: Vec<(u32, u32)>,
    size_px: f32,
}

impl IconFont {
    /// Decodes a Base64-embedded TrueType/OpenType payload covering `min..=max`.
    pub fn from_base64(name: impl Into<String>, encoded: &str, min: u32, max: u32) -> Result<Self> {
        let cleaned: String = encoded.split_whitespace().collect();
        let data = base64::engine::general_purpose::STANDARD.decode(cleaned)?;
        Self::from_bytes(name, data, min, max)
    }

    /// Wraps raw font bytes covering `min..=max`.
    pub fn from_bytes(name: impl Into<String>, data: Vec<u8>, min: u32, max: u32) -> Result<Self> {
        if min == 0 || min > max {
            return Err(BridgeError::InvalidGlyphRange { min, max });
        }
        validate_font_header(&data)?;
        Ok(Self {
            name: name.into(),
            data,
            ranges: vec![(min, max)],
            size_px: DEFAULT_ICON_FONT_SIZE,
        })
    }

    /// Overrides the rasterization size.
    #[must_use]
    pub fn with_size(mut self, size_px: f32) -> Self {
        self.size_px = size_px;
        self
    }

    /// Font name used when registering it with the GUI.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Raw font file bytes.
    #[must_use]
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Inclusive glyph ranges.
    #[must_use]
    pub fn ranges(&self) -> &[(u32, u32)] {
        &self.ranges
    }

    /// Rasterization size in pixels.
    #[must_use]
    pub fn size_px(&self) -> f32 {
        self.size_px
    }

    /// Whether `c` falls inside one of the glyph ranges.
    #[must_use]
    pub fn covers(&self, c: char) -> bool {
        let c = u32::from(c);
        self.ranges.iter().any(|&(min, max)| (min..=max).contains(&c))
    }
}

fn validate_font_header(data: &[u8]) -> Result<()> {
    const SIGNATURES: [[u8; 4]; 4] = [*b"\x00\x01\x00\x00", *b"OTTO", *b"true", *b"ttcf"];

    let Some(header) = data.get(..4) else {
        return Err(BridgeError::InvalidFontData(format!(
            "{} bytes is too short for a font file",
            data.len()
        )));
    };
    if SIGNATURES.iter().any(|sig| sig == header) {
        Ok(())
    } else {
        Err(BridgeError::InvalidFontData(format!(
            "unrecognized font signature {header:02x?}"
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // "\0\x01\0\0" followed by padding, enough to pass the header check.
    const TRUETYPE_STUB: &str = "AAEAAAAAAAAAAAAA";

    #[test]
    fn test_decode_base64_font() {
        let font = IconFont::from_base64("icons", TRUETYPE_STUB, 0xe000, 0xf8ff).unwrap();
        assert_eq!(font.name(), "icons");
        assert_eq!(&font.data()[..4], &[0, 1, 0, 0]);
        assert_eq!(font.ranges(), &[(0xe000, 0xf8ff)]);
        assert!(font.covers('\u{e005}'));
        assert!(!font.covers('a'));
    }

    #[test]
    fn test_whitespace_in_payload_is_ignored() {
        let wrapped = "AAEAAAAA\n  AAAAAAAA";
        assert!(IconFont::from_base64("icons", wrapped, 0xe000, 0xe0ff).is_ok());
    }

    #[test]
    fn test_invalid_base64() {
        let err = IconFont::from_base64("icons", "not base64!", 0xe000, 0xe0ff).unwrap_err();
        assert!(matches!(err, BridgeError::IconFontDecode(_)));
    }

    #[test]
    fn test_non_font_payload() {
        let err = IconFont::from_bytes("icons", b"PNG\x0d....".to_vec(), 0xe000, 0xe0ff).unwrap_err();
        assert!(matches!(err, BridgeError::InvalidFontData(_)));
    }

    #[test]
    fn test_reversed_range() {
        let err = IconFont::from_bytes("icons", vec![0, 1, 0, 0], 0xf000, 0xe000).unwrap_err();
        assert!(matches!(err, BridgeError::InvalidGlyphRange { .. }));
    }
}
