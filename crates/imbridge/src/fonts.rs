//! The GUI font atlas as a host texture.

use imbridge_core::{BridgeError, GuiBackend, Result, TextureId};
use imbridge_render::{Image, ImmediateRenderer, Texture};

/// Exclusively owned host copy of the GUI font atlas.
#[derive(Debug, Default)]
pub struct FontTexture {
    texture: Texture,
}

impl FontTexture {
    /// An empty slot; nothing is uploaded yet.
    pub fn new() -> Self {
        Self::default()
    }

    /// The current texture; its id is [`TextureId::NONE`] before the first upload.
    pub fn texture(&self) -> &Texture {
        &self.texture
    }

    /// Handle registered with the GUI.
    pub fn id(&self) -> TextureId {
        self.texture.id
    }

    /// Rebuilds the atlas, uploads it, releases the previous texture and
    /// registers the new handle with the GUI.
    ///
    /// A failed upload leaves the previous texture loaded and registered.
    pub fn reload<G: GuiBackend + ?Sized>(
        &mut self,
        gui: &mut G,
        renderer: &mut dyn ImmediateRenderer,
    ) -> Result<TextureId> {
        let atlas = gui
            .font_atlas()
            .ok_or_else(|| BridgeError::InvalidFontData("GUI produced no font atlas".into()))?;
        if !atlas.is_consistent() {
            return Err(BridgeError::InvalidFontData(format!(
                "{}x{} atlas with {} bytes",
                atlas.width,
                atlas.height,
                atlas.pixels.len()
            )));
        }
        let (width, height) = (atlas.width, atlas.height);
        let image = Image::from_rgba8(width, height, atlas.pixels)?;

        let texture = renderer.load_texture(&image)?;
        if renderer.is_texture_ready(&self.texture) {
            renderer.unload_texture(&self.texture);
        }
        self.texture = texture;
        gui.set_font_texture(self.texture.id);

        log::debug!("font atlas uploaded as {} ({width}x{height})", self.texture.id);
        Ok(self.texture.id)
    }

    /// Releases the texture.
    pub fn unload(&mut self, renderer: &mut dyn ImmediateRenderer) {
        if renderer.is_texture_ready(&self.texture) {
            renderer.unload_texture(&self.texture);
        }
        self.texture = Texture::default();
    }
}
