//! CPU-side images, the source of every texture upload.

use std::path::Path;

use crate::color::Color;
use crate::error::{RenderError, RenderResult};

/// Pixel layout of an [`Image`] or a texture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PixelFormat {
    /// 32 bits per pixel, 8 per channel.
    #[default]
    R8G8B8A8,
}

impl PixelFormat {
    /// Bytes per pixel.
    #[must_use]
    pub const fn bytes_per_pixel(self) -> usize {
        match self {
            Self::R8G8B8A8 => 4,
        }
    }
}

/// Pixel data in CPU memory, rows top to bottom.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Image {
    /// Pixel bytes.
    pub data: Vec<u8>,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Number of mip levels stored in `data`.
    pub mipmaps: u32,
    /// Pixel layout.
    pub format: PixelFormat,
}

impl Image {
    /// Wraps tightly packed RGBA8 pixels with a single mip level.
    pub fn from_rgba8(width: u32, height: u32, data: Vec<u8>) -> RenderResult<Self> {
        let expected = width as usize * height as usize * PixelFormat::R8G8B8A8.bytes_per_pixel();
        if data.len() != expected {
            return Err(RenderError::TextureCreationFailed(format!(
                "{width}x{height} image needs {expected} bytes, got {}",
                data.len()
            )));
        }
        Ok(Self {
            data,
            width,
            height,
            mipmaps: 1,
            format: PixelFormat::R8G8B8A8,
        })
    }

    /// An image filled with one color.
    #[must_use]
    pub fn filled(width: u32, height: u32, color: Color) -> Self {
        let data = color
            .to_array()
            .repeat(width as usize * height as usize);
        Self {
            data,
            width,
            height,
            mipmaps: 1,
            format: PixelFormat::R8G8B8A8,
        }
    }

    /// A checkerboard of `checks_x` × `checks_y` pixel cells, starting with `col1` at the top-left.
    #[must_use]
    pub fn checked(
        width: u32,
        height: u32,
        checks_x: u32,
        checks_y: u32,
        col1: Color,
        col2: Color,
    ) -> Self {
        let checks_x = checks_x.max(1);
        let checks_y = checks_y.max(1);
        let mut data = Vec::with_capacity(width as usize * height as usize * 4);
        for y in 0..height {
            for x in 0..width {
                let color = if (x / checks_x + y / checks_y) % 2 == 0 {
                    col1
                } else {
                    col2
                };
                data.extend_from_slice(&color.to_array());
            }
        }
        Self {
            data,
            width,
            height,
            mipmaps: 1,
            format: PixelFormat::R8G8B8A8,
        }
    }

    /// Decodes an image file.
    pub fn load(path: impl AsRef<Path>) -> RenderResult<Self> {
        let decoded = image::open(path)?;
        Ok(Self::from_dynamic(&decoded))
    }

    /// Decodes an in-memory encoded image.
    pub fn from_memory(bytes: &[u8]) -> RenderResult<Self> {
        let decoded = image::load_from_memory(bytes)?;
        Ok(Self::from_dynamic(&decoded))
    }

    /// Converts a decoded image to RGBA8.
    #[must_use]
    pub fn from_dynamic(decoded: &image::DynamicImage) -> Self {
        let rgba = decoded.to_rgba8();
        let (width, height) = rgba.dimensions();
        Self {
            data: rgba.into_raw(),
            width,
            height,
            mipmaps: 1,
            format: PixelFormat::R8G8B8A8,
        }
    }

    /// RGBA of the pixel at `(x, y)`, if inside the image.
    #[must_use]
    pub fn pixel(&self, x: u32, y: u32) -> Option<Color> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = (y as usize * self.width as usize + x as usize) * self.format.bytes_per_pixel();
        let px = self.data.get(i..i + 4)?;
        Some(Color::new(px[0], px[1], px[2], px[3]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_checked_pattern() {
        let img = Image::checked(256, 256, 32, 32, Color::DARKGRAY, Color::WHITE);
        assert_eq!(img.data.len(), 256 * 256 * 4);
        assert_eq!(img.pixel(0, 0), Some(Color::DARKGRAY));
        assert_eq!(img.pixel(31, 31), Some(Color::DARKGRAY));
        assert_eq!(img.pixel(32, 0), Some(Color::WHITE));
        assert_eq!(img.pixel(32, 32), Some(Color::DARKGRAY));
        assert_eq!(img.pixel(256, 0), None);
    }

    #[test]
    fn test_from_rgba8_checks_length() {
        assert!(Image::from_rgba8(2, 2, vec![0; 16]).is_ok());
        assert!(Image::from_rgba8(2, 2, vec![0; 15]).is_err());
    }

    #[test]
    fn test_png_roundtrip_through_image_crate() {
        let mut encoded = Vec::new();
        let buffer = image::RgbaImage::from_pixel(3, 2, image::Rgba([10, 20, 30, 255]));
        image::DynamicImage::ImageRgba8(buffer)
            .write_to(&mut std::io::Cursor::new(&mut encoded), image::ImageFormat::Png)
            .unwrap();

        let img = Image::from_memory(&encoded).unwrap();
        assert_eq!((img.width, img.height, img.mipmaps), (3, 2, 1));
        assert_eq!(img.pixel(2, 1), Some(Color::new(10, 20, 30, 255)));
    }
}
