//! GPU texture and render target descriptors.

use imbridge_core::TextureId;

use crate::image::PixelFormat;

/// A texture living on the graphics backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Texture {
    /// Backend handle; [`TextureId::NONE`] for an unloaded texture.
    pub id: TextureId,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Mip levels.
    pub mipmaps: u32,
    /// Pixel layout.
    pub format: PixelFormat,
}

impl Texture {
    /// Size as floats.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn size(&self) -> glam::Vec2 {
        glam::Vec2::new(self.width as f32, self.height as f32)
    }
}

/// An offscreen color + depth target whose color attachment can be sampled.
///
/// Content is stored bottom row first, so drawing it on screen needs a
/// vertically flipped source rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct RenderTexture {
    /// The color attachment.
    pub texture: Texture,
}

impl RenderTexture {
    /// Backend handle of the target, shared with its color texture.
    #[must_use]
    pub fn id(&self) -> TextureId {
        self.texture.id
    }
}
