//! The immediate renderer: a [`RenderBatch`] in front of a [`GraphicsBackend`].

use glam::{Mat4, Vec2, Vec3};
use imbridge_core::{ScissorRect, TextureId};

use crate::backend::GraphicsBackend;
use crate::batch::{DrawMode, RenderBatch};
use crate::color::Color;
use crate::error::{RenderError, RenderResult};
use crate::image::Image;
use crate::immediate::ImmediateRenderer;
use crate::texture::{RenderTexture, Texture};

/// Batches immediate-mode calls and hands each finished frame to a backend.
///
/// Resources released while a frame is being recorded stay alive on the
/// backend until the frame is presented.
pub struct Renderer<B: GraphicsBackend> {
    backend: B,
    batch: RenderBatch,
    drawing: bool,
    retired_textures: Vec<TextureId>,
    retired_targets: Vec<TextureId>,
}

impl<B: GraphicsBackend> Renderer<B> {
    /// Wraps a backend; the batch flushes after `batch_capacity` vertices.
    pub fn new(backend: B, batch_capacity: usize) -> Self {
        Self {
            backend,
            batch: RenderBatch::new(batch_capacity),
            drawing: false,
            retired_textures: Vec::new(),
            retired_targets: Vec::new(),
        }
    }

    /// The backend.
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// The backend, mutably.
    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    /// The batch.
    pub fn batch(&self) -> &RenderBatch {
        &self.batch
    }

    /// Resizes the presentation surface, in physical pixels.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.backend.resize(width, height);
    }

    /// Starts recording a frame for a screen of `screen_size` logical units.
    pub fn begin_drawing(&mut self, screen_size: Vec2) {
        if self.drawing {
            log::warn!("begin_drawing called twice without end_drawing");
        }
        self.batch.begin_frame(screen_size);
        self.drawing = true;
    }

    /// Presents the recorded frame and releases retired resources.
    pub fn end_drawing(&mut self) -> RenderResult<()> {
        let ops = self.batch.take_ops();
        self.drawing = false;
        let result = self.backend.present(&ops);
        self.release_retired();
        result
    }

    fn release_retired(&mut self) {
        for id in self.retired_textures.drain(..) {
            self.backend.destroy_texture(id);
        }
        for id in self.retired_targets.drain(..) {
            self.backend.destroy_render_target(id);
        }
    }

    fn is_retired(&self, id: TextureId) -> bool {
        self.retired_textures.contains(&id) || self.retired_targets.contains(&id)
    }

    /// Consumes the renderer, releasing pending resources, and returns the backend.
    pub fn into_backend(mut self) -> B {
        self.release_retired();
        self.backend
    }
}

impl<B: GraphicsBackend> ImmediateRenderer for Renderer<B> {
    fn draw_render_batch_active(&mut self) {
        self.batch.flush();
    }

    fn check_render_batch_limit(&mut self, vertex_count: usize) -> bool {
        self.batch.check_limit(vertex_count)
    }

    fn begin(&mut self, mode: DrawMode) {
        self.batch.begin(mode);
    }

    fn end(&mut self) {
        self.batch.end();
    }

    fn color4f(&mut self, r: f32, g: f32, b: f32, a: f32) {
        self.batch.color([r, g, b, a]);
    }

    fn tex_coord2f(&mut self, u: f32, v: f32) {
        self.batch.tex_coord(Vec2::new(u, v));
    }

    fn vertex3f(&mut self, x: f32, y: f32, z: f32) {
        self.batch.vertex(Vec3::new(x, y, z));
    }

    fn set_texture(&mut self, id: TextureId) {
        self.batch.set_texture(id);
    }

    fn enable_scissor_test(&mut self) {
        self.batch.set_scissor_test(true);
    }

    fn disable_scissor_test(&mut self) {
        self.batch.set_scissor_test(false);
    }

    fn scissor(&mut self, rect: ScissorRect) {
        self.batch.set_scissor(rect);
    }

    fn enable_backface_culling(&mut self) {
        self.batch.set_backface_culling(true);
    }

    fn disable_backface_culling(&mut self) {
        self.batch.set_backface_culling(false);
    }

    fn enable_depth_test(&mut self) {
        self.batch.set_depth_test(true);
    }

    fn disable_depth_test(&mut self) {
        self.batch.set_depth_test(false);
    }

    fn projection(&self) -> Mat4 {
        self.batch.projection()
    }

    fn set_projection(&mut self, projection: Mat4) {
        self.batch.set_projection(projection);
    }

    fn modelview(&self) -> Mat4 {
        self.batch.modelview()
    }

    fn set_modelview(&mut self, modelview: Mat4) {
        self.batch.set_modelview(modelview);
    }

    fn render_size(&self) -> Vec2 {
        self.batch.render_size()
    }

    fn begin_texture_mode(&mut self, target: &RenderTexture) {
        self.batch.begin_target(target.id(), target.texture.size());
    }

    fn end_texture_mode(&mut self) {
        self.batch.end_target();
    }

    fn clear_background(&mut self, color: Color) {
        self.batch.clear(color);
    }

    fn load_texture(&mut self, image: &Image) -> RenderResult<Texture> {
        let id = self.backend.create_texture(image)?;
        Ok(Texture {
            id,
            width: image.width,
            height: image.height,
            mipmaps: image.mipmaps,
            format: image.format,
        })
    }

    fn unload_texture(&mut self, texture: &Texture) {
        if texture.id.is_none() {
            return;
        }
        if self.drawing {
            self.retired_textures.push(texture.id);
        } else {
            self.backend.destroy_texture(texture.id);
        }
    }

    fn is_texture_ready(&self, texture: &Texture) -> bool {
        !texture.id.is_none() && self.backend.has_texture(texture.id) && !self.is_retired(texture.id)
    }

    fn load_render_texture(&mut self, width: u32, height: u32) -> RenderResult<RenderTexture> {
        if width == 0 || height == 0 {
            return Err(RenderError::TextureCreationFailed(format!(
                "zero-sized render target {width}x{height}"
            )));
        }
        let id = self.backend.create_render_target(width, height)?;
        Ok(RenderTexture {
            texture: Texture {
                id,
                width,
                height,
                mipmaps: 1,
                format: crate::image::PixelFormat::R8G8B8A8,
            },
        })
    }

    fn unload_render_texture(&mut self, target: &RenderTexture) {
        let id = target.id();
        if id.is_none() {
            return;
        }
        if self.drawing {
            self.retired_targets.push(id);
        } else {
            self.backend.destroy_render_target(id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::HeadlessBackend;
    use crate::batch::FrameOp;

    #[test]
    fn test_unload_during_frame_is_deferred() {
        let mut renderer = Renderer::new(HeadlessBackend::new(320, 240), 1024);
        let texture = renderer
            .load_texture(&Image::filled(4, 4, Color::WHITE))
            .unwrap();

        renderer.begin_drawing(Vec2::new(320.0, 240.0));
        renderer.unload_texture(&texture);
        assert!(!renderer.is_texture_ready(&texture));
        assert_eq!(renderer.backend().textures_destroyed(), 0);
        renderer.end_drawing().unwrap();
        assert_eq!(renderer.backend().textures_destroyed(), 1);
    }

    #[test]
    fn test_unload_outside_frame_is_immediate() {
        let mut renderer = Renderer::new(HeadlessBackend::new(320, 240), 1024);
        let target = renderer.load_render_texture(64, 64).unwrap();
        renderer.unload_render_texture(&target);
        assert_eq!(renderer.backend().render_targets_destroyed(), 1);
    }

    #[test]
    fn test_frame_is_presented() {
        let mut renderer = Renderer::new(HeadlessBackend::new(320, 240), 1024);
        renderer.begin_drawing(Vec2::new(320.0, 240.0));
        renderer.clear_background(Color::DARKGRAY);
        renderer.begin(DrawMode::Triangles);
        renderer.vertex2f(0.0, 0.0);
        renderer.vertex2f(10.0, 0.0);
        renderer.vertex2f(0.0, 10.0);
        renderer.end();
        renderer.end_drawing().unwrap();

        let frame = renderer.backend().last_frame();
        assert_eq!(frame.len(), 2);
        assert!(matches!(frame[1], FrameOp::Draw(ref call) if call.triangle_count() == 1));
    }
}
