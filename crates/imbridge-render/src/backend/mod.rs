//! Graphics backends executing recorded frames.

mod headless;
mod wgpu_backend;

pub use headless::HeadlessBackend;
pub use wgpu_backend::WgpuBackend;

use imbridge_core::TextureId;

use crate::batch::FrameOp;
use crate::error::RenderResult;
use crate::image::Image;

/// GPU resource management and frame submission.
pub trait GraphicsBackend {
    /// Uploads an image and returns its handle.
    fn create_texture(&mut self, image: &Image) -> RenderResult<TextureId>;

    /// Releases a texture. Unknown handles are ignored.
    fn destroy_texture(&mut self, id: TextureId);

    /// Whether the handle refers to a live texture or render target.
    fn has_texture(&self, id: TextureId) -> bool;

    /// Allocates a sampleable color + depth target.
    fn create_render_target(&mut self, width: u32, height: u32) -> RenderResult<TextureId>;

    /// Releases a render target. Unknown handles are ignored.
    fn destroy_render_target(&mut self, id: TextureId);

    /// Resizes the presentation surface, in physical pixels.
    fn resize(&mut self, width: u32, height: u32);

    /// Presentation surface size in physical pixels.
    fn surface_size(&self) -> (u32, u32);

    /// Executes and presents one frame.
    fn present(&mut self, ops: &[FrameOp]) -> RenderResult<()>;
}
