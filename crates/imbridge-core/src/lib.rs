//! Core vocabulary for imbridge.
//!
//! This crate holds everything the GUI side and the host side agree on:
//! - [`TextureId`] opaque texture handles
//! - host and GUI input identifiers plus the [`KeyMap`]/[`CursorMap`]/[`GamepadMap`] tables
//! - the [`DrawData`] command model and scissor math
//! - the [`HostInput`] and [`GuiBackend`] traits
//! - [`BridgeOptions`] configuration and [`BridgeError`]

// Documentation lints - internal functions don't need exhaustive panic/error docs
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::missing_errors_doc)]
// Options structs legitimately have many boolean flags
#![allow(clippy::struct_excessive_bools)]
// Builder patterns return Self which doesn't need must_use
#![allow(clippy::must_use_candidate)]
// Enum variants mirror host key names
#![allow(clippy::module_name_repetitions)]

pub mod draw;
pub mod error;
pub mod font;
pub mod frame;
pub mod gui;
pub mod host;
pub mod input_state;
pub mod keys;
pub mod maps;
pub mod options;
pub mod texture;

pub use draw::{
    pack_color, unpack_color, CallbackCmd, ClipRect, DrawCallback, DrawCmd, DrawData, DrawList,
    DrawVert, ScissorRect,
};
pub use error::{BridgeError, Result};
pub use font::{IconFont, DEFAULT_ICON_FONT_SIZE};
pub use frame::{ButtonEdge, FrameInput, Modifiers, MOUSE_BUTTONS};
pub use gui::{
    FontAtlasImage, GuiBackend, GuiConfig, GuiCursor, GuiEvent, GuiKey, GuiMouseButton,
};
pub use host::HostInput;
pub use input_state::{CursorRequests, InputState};
pub use keys::{GamepadAxis, GamepadButton, HostCursor, HostKey, HostMouseButton};
pub use maps::{CursorMap, GamepadMap, KeyMap, StickMapping};
pub use options::{BridgeOptions, Theme, DEFAULT_BATCH_VERTEX_CAPACITY, DEFAULT_GAMEPAD_DEAD_ZONE};
pub use texture::TextureId;

// Re-export glam types for convenience
pub use glam::{Mat4, Vec2, Vec3, Vec4};
