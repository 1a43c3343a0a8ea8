//! The GUI library seam.
//!
//! [`GuiBackend`] is everything the bridge needs from an immediate-mode GUI
//! library: an abstract event queue, display metrics, the requested cursor,
//! the font atlas, and the per-frame draw data.

use glam::Vec2;

use crate::draw::DrawData;
use crate::font::IconFont;
use crate::options::Theme;
use crate::texture::TextureId;
use crate::Result;

/// GUI-side key identifiers, including logical modifiers and gamepad controls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[allow(missing_docs)]
pub enum GuiKey {
    Tab,
    LeftArrow,
    RightArrow,
    UpArrow,
    DownArrow,
    PageUp,
    PageDown,
    Home,
    End,
    Insert,
    Delete,
    Backspace,
    Space,
    Enter,
    Escape,
    LeftCtrl,
    LeftShift,
    LeftAlt,
    LeftSuper,
    RightCtrl,
    RightShift,
    RightAlt,
    RightSuper,
    Menu,
    Num0,
    Num1,
    Num2,
    Num3,
    Num4,
    Num5,
    Num6,
    Num7,
    Num8,
    Num9,
    A,
    B,
    C,
    D,
    E,
    F,
    G,
    H,
    I,
    J,
    K,
    L,
    M,
    N,
    O,
    P,
    Q,
    R,
    S,
    T,
    U,
    V,
    W,
    X,
    Y,
    Z,
    F1,
    F2,
    F3,
    F4,
    F5,
    F6,
    F7,
    F8,
    F9,
    F10,
    F11,
    F12,
    Apostrophe,
    Comma,
    Minus,
    Period,
    Slash,
    Semicolon,
    Equal,
    LeftBracket,
    Backslash,
    RightBracket,
    GraveAccent,
    CapsLock,
    ScrollLock,
    NumLock,
    PrintScreen,
    Pause,
    Keypad0,
    Keypad1,
    Keypad2,
    Keypad3,
    Keypad4,
    Keypad5,
    Keypad6,
    Keypad7,
    Keypad8,
    Keypad9,
    KeypadDecimal,
    KeypadDivide,
    KeypadMultiply,
    KeypadSubtract,
    KeypadAdd,
    KeypadEnter,
    KeypadEqual,
    GamepadStart,
    GamepadBack,
    GamepadFaceLeft,
    GamepadFaceRight,
    GamepadFaceUp,
    GamepadFaceDown,
    GamepadDpadLeft,
    GamepadDpadRight,
    GamepadDpadUp,
    GamepadDpadDown,
    GamepadL1,
    GamepadR1,
    GamepadL2,
    GamepadR2,
    GamepadL3,
    GamepadR3,
    GamepadLStickLeft,
    GamepadLStickRight,
    GamepadLStickUp,
    GamepadLStickDown,
    GamepadRStickLeft,
    GamepadRStickRight,
    GamepadRStickUp,
    GamepadRStickDown,
    /// Logical control modifier (either side).
    ModCtrl,
    /// Logical shift modifier (either side).
    ModShift,
    /// Logical alt modifier (either side).
    ModAlt,
    /// Logical super/command modifier (either side).
    ModSuper,
}

impl GuiKey {
    /// Whether this is one of the four logical modifier keys.
    #[must_use]
    pub const fn is_modifier(self) -> bool {
        matches!(self, Self::ModCtrl | Self::ModShift | Self::ModAlt | Self::ModSuper)
    }

    /// Whether this key belongs to a gamepad.
    #[must_use]
    pub const fn is_gamepad(self) -> bool {
        matches!(
            self,
            Self::GamepadStart
                | Self::GamepadBack
                | Self::GamepadFaceLeft
                | Self::GamepadFaceRight
                | Self::GamepadFaceUp
                | Self::GamepadFaceDown
                | Self::GamepadDpadLeft
                | Self::GamepadDpadRight
                | Self::GamepadDpadUp
                | Self::GamepadDpadDown
                | Self::GamepadL1
                | Self::GamepadR1
                | Self::GamepadL2
                | Self::GamepadR2
                | Self::GamepadL3
                | Self::GamepadR3
                | Self::GamepadLStickLeft
                | Self::GamepadLStickRight
                | Self::GamepadLStickUp
                | Self::GamepadLStickDown
                | Self::GamepadRStickLeft
                | Self::GamepadRStickRight
                | Self::GamepadRStickUp
                | Self::GamepadRStickDown
        )
    }
}

/// GUI-side mouse buttons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GuiMouseButton {
    /// Primary button.
    Left,
    /// Secondary button.
    Right,
    /// Middle button.
    Middle,
    /// First extra button (forward).
    Extra1,
    /// Second extra button (back).
    Extra2,
}

/// Cursor shapes the GUI can request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum GuiCursor {
    /// Hide the cursor.
    None,
    /// Default arrow.
    #[default]
    Arrow,
    /// Text input.
    TextInput,
    /// Move in all directions.
    ResizeAll,
    /// Vertical resize.
    ResizeNS,
    /// Horizontal resize.
    ResizeEW,
    /// Diagonal resize, top-right to bottom-left.
    ResizeNESW,
    /// Diagonal resize, top-left to bottom-right.
    ResizeNWSE,
    /// Hyperlinks and clickable items.
    Hand,
    /// Disallowed interaction.
    NotAllowed,
}

/// One event in the GUI library's abstract input queue.
#[derive(Debug, Clone, PartialEq)]
pub enum GuiEvent {
    /// Absolute cursor position in display coordinates.
    MousePos(Vec2),
    /// Button press or release.
    MouseButton {
        /// Button.
        button: GuiMouseButton,
        /// `true` on press.
        down: bool,
    },
    /// Wheel movement this frame (x horizontal, y vertical).
    MouseWheel(Vec2),
    /// Digital key press or release, including logical modifiers.
    Key {
        /// Key.
        key: GuiKey,
        /// `true` on press.
        down: bool,
    },
    /// Analog key state (gamepad sticks).
    KeyAnalog {
        /// Key.
        key: GuiKey,
        /// Whether the key reads as pressed.
        down: bool,
        /// Magnitude in `[0, 1]`.
        value: f32,
    },
    /// Auto-repeat of a held key.
    KeyRepeat(GuiKey),
    /// A typed Unicode scalar.
    Text(char),
    /// Clipboard contents pasted by the paste shortcut.
    Paste(String),
    /// Window focus gained or lost.
    Focus(bool),
}

/// Feature flags the bridge reads back from the GUI library.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GuiConfig {
    /// Docking is enabled.
    pub docking: bool,
    /// Gamepad navigation is enabled.
    pub nav_gamepad: bool,
    /// The backend must not change the hardware cursor.
    pub no_mouse_cursor_change: bool,
    /// The GUI draws its own software cursor.
    pub mouse_draw_cursor: bool,
}

/// An RGBA32 copy of the GUI font atlas.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FontAtlasImage {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Tightly packed RGBA8 pixels, row-major, top row first.
    pub pixels: Vec<u8>,
}

impl FontAtlasImage {
    /// Bytes per pixel of the atlas format.
    pub const BYTES_PER_PIXEL: usize = 4;

    /// Whether the pixel buffer matches the declared dimensions.
    #[must_use]
    pub fn is_consistent(&self) -> bool {
        self.pixels.len() == self.width as usize * self.height as usize * Self::BYTES_PER_PIXEL
    }
}

/// An immediate-mode GUI library as seen by the bridge.
pub trait GuiBackend {
    /// Current feature flags.
    fn config(&self) -> GuiConfig;

    /// Replaces the feature flags.
    fn set_config(&mut self, config: GuiConfig);

    /// Applies a color theme.
    fn set_theme(&mut self, theme: Theme);

    /// Merges an icon font into the default font.
    fn add_icon_font(&mut self, font: &IconFont) -> Result<()>;

    /// Sets the logical display size, framebuffer scale and frame delta.
    fn set_display(&mut self, display_size: Vec2, framebuffer_scale: Vec2, delta_time: f32);

    /// Cursor position the GUI wants the host to warp to, if any.
    fn wanted_mouse_pos(&self) -> Option<Vec2>;

    /// Queues one input event for the next frame.
    fn push_event(&mut self, event: GuiEvent);

    /// Cursor shape the GUI requested during the last frame.
    fn mouse_cursor(&self) -> GuiCursor;

    /// Builds (if needed) and returns the RGBA32 font atlas.
    fn font_atlas(&mut self) -> Option<FontAtlasImage>;

    /// Whether the font atlas changed since the last registered upload.
    fn fonts_changed(&self) -> bool;

    /// Registers the host texture holding the font atlas.
    fn set_font_texture(&mut self, id: TextureId);

    /// Starts a GUI frame, consuming queued events.
    fn new_frame(&mut self);

    /// Finishes the frame and returns its draw data.
    fn render(&mut self) -> DrawData;

    /// Text the GUI copied during the last rendered frame, taken once.
    fn take_copied_text(&mut self) -> Option<String> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_modifier_keys() {
        assert!(GuiKey::ModCtrl.is_modifier());
        assert!(GuiKey::ModSuper.is_modifier());
        assert!(!GuiKey::LeftCtrl.is_modifier());
    }

    #[test]
    fn test_gamepad_keys() {
        assert!(GuiKey::GamepadDpadUp.is_gamepad());
        assert!(GuiKey::GamepadRStickDown.is_gamepad());
        assert!(!GuiKey::A.is_gamepad());
    }

    #[test]
    fn test_atlas_consistency() {
        let atlas = FontAtlasImage {
            width: 2,
            height: 3,
            pixels: vec![0; 24],
        };
        assert!(atlas.is_consistent());
        let broken = FontAtlasImage {
            pixels: vec![0; 23],
            ..atlas
        };
        assert!(!broken.is_consistent());
    }
}
