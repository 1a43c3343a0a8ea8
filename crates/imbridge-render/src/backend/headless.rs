//! A backend without a GPU: tracks resources and keeps the last frame.

use std::collections::HashMap;

use imbridge_core::TextureId;

use super::GraphicsBackend;
use crate::batch::FrameOp;
use crate::error::{RenderError, RenderResult};
use crate::image::Image;

/// Records resource lifetimes and submitted frames for offscreen use and tests.
#[derive(Debug, Default)]
pub struct HeadlessBackend {
    width: u32,
    height: u32,
    next_id: u64,
    textures: HashMap<TextureId, (u32, u32)>,
    targets: HashMap<TextureId, (u32, u32)>,
    textures_created: usize,
    textures_destroyed: usize,
    targets_created: usize,
    targets_destroyed: usize,
    frames_presented: usize,
    last_frame: Vec<FrameOp>,
}

impl HeadlessBackend {
    /// Creates a backend with a `width` × `height` virtual surface.
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            next_id: 1,
            ..Self::default()
        }
    }

    fn allocate(&mut self) -> TextureId {
        let id = TextureId::from_raw(self.next_id.max(1));
        self.next_id = id.raw() + 1;
        id
    }

    /// Size of a live render target.
    #[must_use]
    pub fn render_target_size(&self, id: TextureId) -> Option<(u32, u32)> {
        self.targets.get(&id).copied()
    }

    /// Live render targets.
    #[must_use]
    pub fn live_render_targets(&self) -> usize {
        self.targets.len()
    }

    /// Live textures, render targets excluded.
    #[must_use]
    pub fn live_textures(&self) -> usize {
        self.textures.len()
    }

    /// Textures created so far.
    #[must_use]
    pub fn textures_created(&self) -> usize {
        self.textures_created
    }

    /// Textures destroyed so far.
    #[must_use]
    pub fn textures_destroyed(&self) -> usize {
        self.textures_destroyed
    }

    /// Render targets created so far.
    #[must_use]
    pub fn render_targets_created(&self) -> usize {
        self.targets_created
    }

    /// Render targets destroyed so far.
    #[must_use]
    pub fn render_targets_destroyed(&self) -> usize {
        self.targets_destroyed
    }

    /// Frames presented so far.
    #[must_use]
    pub fn frames_presented(&self) -> usize {
        self.frames_presented
    }

    /// Operations of the most recent frame.
    #[must_use]
    pub fn last_frame(&self) -> &[FrameOp] {
        &self.last_frame
    }
}

impl GraphicsBackend for HeadlessBackend {
    fn create_texture(&mut self, image: &Image) -> RenderResult<TextureId> {
        if image.width == 0 || image.height == 0 {
            return Err(RenderError::TextureCreationFailed(format!(
                "zero-sized image {}x{}",
                image.width, image.height
            )));
        }
        let id = self.allocate();
        self.textures.insert(id, (image.width, image.height));
        self.textures_created += 1;
        Ok(id)
    }

    fn destroy_texture(&mut self, id: TextureId) {
        if self.textures.remove(&id).is_some() {
            self.textures_destroyed += 1;
        }
    }

    fn has_texture(&self, id: TextureId) -> bool {
        self.textures.contains_key(&id) || self.targets.contains_key(&id)
    }

    fn create_render_target(&mut self, width: u32, height: u32) -> RenderResult<TextureId> {
        if width == 0 || height == 0 {
            return Err(RenderError::TextureCreationFailed(format!(
                "zero-sized render target {width}x{height}"
            )));
        }
        let id = self.allocate();
        self.targets.insert(id, (width, height));
        self.targets_created += 1;
        Ok(id)
    }

    fn destroy_render_target(&mut self, id: TextureId) {
        if self.targets.remove(&id).is_some() {
            self.targets_destroyed += 1;
        }
    }

    fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        self.width = width;
        self.height = height;
    }

    fn surface_size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn present(&mut self, ops: &[FrameOp]) -> RenderResult<()> {
        self.last_frame = ops.to_vec();
        self.frames_presented += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Color;

    #[test]
    fn test_resource_accounting() {
        let mut backend = HeadlessBackend::new(640, 480);
        let tex = backend
            .create_texture(&Image::filled(2, 2, Color::WHITE))
            .unwrap();
        let target = backend.create_render_target(64, 32).unwrap();
        assert_ne!(tex, target);
        assert!(backend.has_texture(tex));
        assert!(backend.has_texture(target));
        assert_eq!(backend.render_target_size(target), Some((64, 32)));

        backend.destroy_texture(tex);
        backend.destroy_texture(tex);
        backend.destroy_render_target(target);
        assert_eq!(backend.textures_destroyed(), 1);
        assert_eq!(backend.render_targets_destroyed(), 1);
        assert!(!backend.has_texture(tex));
    }

    #[test]
    fn test_zero_sized_resources_rejected() {
        let mut backend = HeadlessBackend::new(640, 480);
        assert!(backend.create_render_target(0, 10).is_err());
        assert!(backend
            .create_texture(&Image::filled(0, 0, Color::WHITE))
            .is_err());
    }
}
