//! Opaque texture handles shared by the GUI and the host renderer.

use serde::{Deserialize, Serialize};

/// Handle to a host texture, carried through GUI draw commands.
///
/// The GUI library stores it in a pointer-sized field; the bridge only ever
/// reads it back through [`TextureId::raw`]. The zero value means "no texture".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub struct TextureId(u64);

impl TextureId {
    /// No texture bound.
    pub const NONE: Self = Self(0);

    /// Wraps a native host handle.
    #[must_use]
    pub const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    /// Returns the native host handle.
    #[must_use]
    pub const fn raw(self) -> u64 {
        self.0
    }

    /// Whether this is the "no texture" handle.
    #[must_use]
    pub const fn is_none(self) -> bool {
        self.0 == 0
    }

    /// Returns `None` for [`TextureId::NONE`].
    #[must_use]
    pub const fn get(self) -> Option<Self> {
        if self.is_none() {
            None
        } else {
            Some(self)
        }
    }
}

impl std::fmt::Display for TextureId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "tex#{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_none_handle() {
        assert!(TextureId::NONE.is_none());
        assert!(TextureId::default().is_none());
        assert_eq!(TextureId::NONE.get(), None);
    }

    #[test]
    fn test_raw_round_trip() {
        let id = TextureId::from_raw(42);
        assert_eq!(id.raw(), 42);
        assert_eq!(id.get(), Some(id));
        assert_eq!(id.to_string(), "tex#42");
    }
}
