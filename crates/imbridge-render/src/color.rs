//! 8-bit RGBA colors and the named palette used by the demos.

use glam::Vec4;

/// An RGBA color with 8 bits per channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Color {
    /// Red.
    pub r: u8,
    /// Green.
    pub g: u8,
    /// Blue.
    pub b: u8,
    /// Alpha.
    pub a: u8,
}

impl Color {
    pub const WHITE: Self = Self::new(255, 255, 255, 255);
    pub const BLACK: Self = Self::new(0, 0, 0, 255);
    pub const BLANK: Self = Self::new(0, 0, 0, 0);
    pub const LIGHTGRAY: Self = Self::new(200, 200, 200, 255);
    pub const GRAY: Self = Self::new(130, 130, 130, 255);
    pub const DARKGRAY: Self = Self::new(80, 80, 80, 255);
    pub const RED: Self = Self::new(230, 41, 55, 255);
    pub const GREEN: Self = Self::new(0, 228, 48, 255);
    pub const BLUE: Self = Self::new(0, 121, 241, 255);
    pub const SKYBLUE: Self = Self::new(102, 191, 255, 255);
    pub const BEIGE: Self = Self::new(211, 176, 131, 255);
    pub const BROWN: Self = Self::new(127, 106, 79, 255);

    /// Creates a color from its channels.
    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Creates an opaque color from normalized RGB, wrapping each channel into `0..=255`.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn from_rgb_f32(rgb: [f32; 3]) -> Self {
        let channel = |v: f32| ((v * 255.0) as i32).rem_euclid(256) as u8;
        Self::new(channel(rgb[0]), channel(rgb[1]), channel(rgb[2]), 255)
    }

    /// Normalized RGBA.
    #[must_use]
    pub fn to_vec4(self) -> Vec4 {
        Vec4::new(
            f32::from(self.r) / 255.0,
            f32::from(self.g) / 255.0,
            f32::from(self.b) / 255.0,
            f32::from(self.a) / 255.0,
        )
    }

    /// Channels as an array.
    #[must_use]
    pub const fn to_array(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }
}
