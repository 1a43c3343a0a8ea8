//! Immediate-mode rendering for imbridge.
//!
//! This crate provides the host-side drawing layer, including:
//! - A vertex batch with state-change flushing ([`RenderBatch`])
//! - The [`ImmediateRenderer`] API and its [`Renderer`] implementation
//! - Graphics backends: wgpu-based [`WgpuBackend`] and GPU-less [`HeadlessBackend`]
//! - Images, textures, render targets, cameras and shape helpers

// Documentation lints - internal functions don't need exhaustive panic/error docs
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::missing_errors_doc)]
// Graphics code has many intentional numeric casts (u32 <-> f32)
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
// Builder patterns return Self which doesn't need must_use
#![allow(clippy::must_use_candidate)]
#![allow(clippy::module_name_repetitions)]
// Immediate-mode calls take many scalar arguments
#![allow(clippy::many_single_char_names)]
#![allow(clippy::too_many_arguments)]

pub mod backend;
pub mod batch;
pub mod camera;
pub mod color;
pub mod error;
pub mod image;
pub mod immediate;
pub mod renderer;
pub mod shapes;
pub mod texture;

pub use backend::{GraphicsBackend, HeadlessBackend, WgpuBackend};
pub use batch::{BatchVertex, DrawCall, DrawMode, DrawState, FrameOp, RenderBatch};
pub use camera::{screen_projection, Camera2D, Camera3D, CameraProjection};
pub use color::Color;
pub use error::{RenderError, RenderResult};
pub use image::{Image, PixelFormat};
pub use immediate::ImmediateRenderer;
pub use renderer::Renderer;
pub use shapes::{DrawExt, Rectangle};
pub use texture::{RenderTexture, Texture};
