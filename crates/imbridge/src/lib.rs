//! imbridge: drive an immediate-mode GUI from an immediate-mode renderer.
//!
//! The bridge has two halves that run once per frame:
//! - [`Platform`] samples host input and feeds the GUI's event queue
//! - [`render_draw_data`] walks the GUI's draw lists and submits textured
//!   triangles, one scissor rectangle per command
//!
//! [`Bridge`] ties them together with the font atlas texture. [`EguiBackend`]
//! adapts egui to the [`GuiBackend`] seam, [`WinitInput`] feeds winit events
//! into a [`HostInput`], and [`run`] opens a window and drives a [`BridgeApp`].
//!
//! # Example
//!
//! ```no_run
//! use imbridge::{egui, run, AppContext, BridgeApp, BridgeOptions};
//!
//! struct Hello;
//!
//! impl BridgeApp for Hello {
//!     fn ui(&mut self, gui: &egui::Context, _ctx: &mut AppContext<'_>) {
//!         egui::Window::new("Hello").show(gui, |ui| {
//!             ui.label("Hello from the bridge");
//!         });
//!     }
//! }
//!
//! fn main() -> imbridge::Result<()> {
//!     run(BridgeOptions::default().with_title("hello"), Hello)
//! }
//! ```

// Documentation lints - internal functions don't need exhaustive panic/error docs
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::missing_errors_doc)]
// Pixel and texel math casts between f32 and integer sizes
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::module_name_repetitions)]
// Key and cursor translation tables are long matches
#![allow(clippy::too_many_lines)]

pub mod app;
pub mod bridge;
pub mod clipboard;
pub mod document;
pub mod draw;
pub mod egui_backend;
pub mod fonts;
pub mod platform;
pub mod widgets;
pub mod winit_host;

#[cfg(test)]
mod testing;

pub use app::{run, AppContext, BridgeApp};
pub use bridge::Bridge;
pub use clipboard::SystemClipboard;
pub use document::{DocumentWindow, ImageViewerWindow, SceneViewWindow, ToolMode};
pub use draw::{render_draw_data, render_triangles, retarget_texture};
pub use egui_backend::{paint_callback, EguiBackend};
pub use fonts::FontTexture;
pub use platform::{display_metrics, half_axis_event, Platform, NAV_GAMEPAD};
pub use widgets::{
    fit_to_area, image, image_button, image_button_size, image_rect, image_rect_tinted,
    image_render_texture, image_render_texture_fit, image_size, source_rect_uv,
};
pub use winit_host::WinitInput;

pub use imbridge_core::{
    BridgeError, BridgeOptions, DrawCallback, DrawCmd, DrawData, DrawList, GuiBackend, HostInput,
    IconFont, InputState, Result, TextureId, Theme,
};
pub use imbridge_render::{
    Camera2D, Camera3D, Color, DrawExt, HeadlessBackend, Image, ImmediateRenderer, Rectangle,
    RenderTexture, Renderer, Texture, WgpuBackend,
};

// Re-export the crates the public API is expressed in
pub use egui;
pub use glam::{Vec2, Vec3};
pub use imbridge_core;
pub use imbridge_render;
