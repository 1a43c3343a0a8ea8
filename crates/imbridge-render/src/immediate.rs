//! The low-level immediate rendering API the bridge draws through.

use glam::{Mat4, Vec2};
use imbridge_core::{ScissorRect, TextureId};

use crate::batch::DrawMode;
use crate::color::Color;
use crate::error::RenderResult;
use crate::image::Image;
use crate::texture::{RenderTexture, Texture};

/// An immediate-mode rasterizer with an internal vertex batch.
///
/// Calls mirror a classic fixed-function style: state is set, then vertices
/// are emitted between [`begin`](Self::begin) and [`end`](Self::end), each
/// preceded by its color and texture coordinate.
pub trait ImmediateRenderer {
    /// Submits all pending vertices.
    fn draw_render_batch_active(&mut self);

    /// Makes room for `vertex_count` vertices, flushing if needed.
    /// Returns `true` when a flush happened.
    fn check_render_batch_limit(&mut self, vertex_count: usize) -> bool;

    /// Starts a primitive block.
    fn begin(&mut self, mode: DrawMode);

    /// Ends the primitive block.
    fn end(&mut self);

    /// Sets the vertex color from normalized channels.
    fn color4f(&mut self, r: f32, g: f32, b: f32, a: f32);

    /// Sets the vertex color from 8-bit channels.
    fn color4ub(&mut self, r: u8, g: u8, b: u8, a: u8) {
        self.color4f(
            f32::from(r) / 255.0,
            f32::from(g) / 255.0,
            f32::from(b) / 255.0,
            f32::from(a) / 255.0,
        );
    }

    /// Sets the texture coordinate of the next vertex.
    fn tex_coord2f(&mut self, u: f32, v: f32);

    /// Emits a 2D vertex at depth 0.
    fn vertex2f(&mut self, x: f32, y: f32) {
        self.vertex3f(x, y, 0.0);
    }

    /// Emits a 3D vertex.
    fn vertex3f(&mut self, x: f32, y: f32, z: f32);

    /// Binds a texture; [`TextureId::NONE`] binds none.
    fn set_texture(&mut self, id: TextureId);

    /// Enables the scissor test.
    fn enable_scissor_test(&mut self);

    /// Disables the scissor test.
    fn disable_scissor_test(&mut self);

    /// Sets the scissor rectangle (origin bottom-left, framebuffer pixels).
    fn scissor(&mut self, rect: ScissorRect);

    /// Enables back-face culling.
    fn enable_backface_culling(&mut self);

    /// Disables back-face culling.
    fn disable_backface_culling(&mut self);

    /// Enables depth test and write.
    fn enable_depth_test(&mut self);

    /// Disables depth test and write.
    fn disable_depth_test(&mut self);

    /// Current projection matrix.
    fn projection(&self) -> Mat4;

    /// Replaces the projection matrix.
    fn set_projection(&mut self, projection: Mat4);

    /// Current model-view matrix.
    fn modelview(&self) -> Mat4;

    /// Replaces the model-view matrix.
    fn set_modelview(&mut self, modelview: Mat4);

    /// Size of the current render target in logical units.
    fn render_size(&self) -> Vec2;

    /// Redirects drawing into `target`.
    fn begin_texture_mode(&mut self, target: &RenderTexture);

    /// Returns drawing to the screen.
    fn end_texture_mode(&mut self);

    /// Clears the current target.
    fn clear_background(&mut self, color: Color);

    /// Uploads an image.
    fn load_texture(&mut self, image: &Image) -> RenderResult<Texture>;

    /// Releases a texture.
    fn unload_texture(&mut self, texture: &Texture);

    /// Whether `texture` refers to a live backend texture.
    fn is_texture_ready(&self, texture: &Texture) -> bool;

    /// Allocates an offscreen target of `width` × `height` pixels.
    fn load_render_texture(&mut self, width: u32, height: u32) -> RenderResult<RenderTexture>;

    /// Releases an offscreen target.
    fn unload_render_texture(&mut self, target: &RenderTexture);
}
