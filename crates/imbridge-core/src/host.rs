//! The host framework's input and window surface, as seen by the bridge.

use glam::Vec2;

use crate::keys::{GamepadAxis, GamepadButton, HostCursor, HostKey, HostMouseButton};

/// Buffered per-frame input state and cursor control of the host framework.
///
/// Every query reads state the host collected before the frame started; none
/// of them block. The two `next_*` methods drain FIFO queues.
pub trait HostInput {
    /// Window client size in logical units.
    fn screen_size(&self) -> Vec2;

    /// Whether the window is fullscreen.
    fn is_fullscreen(&self) -> bool;

    /// Size of the monitor the window is on, in logical units.
    fn monitor_size(&self) -> Vec2;

    /// Drawable size in physical pixels; zero when unknown.
    fn framebuffer_size(&self) -> Vec2;

    /// Seconds elapsed during the previous frame.
    fn frame_time(&self) -> f32;

    /// Cursor position in logical window coordinates.
    fn mouse_position(&self) -> Vec2;

    /// Warps the cursor.
    fn set_mouse_position(&mut self, position: Vec2);

    /// Button went down this frame.
    fn is_mouse_button_pressed(&self, button: HostMouseButton) -> bool;

    /// Button went up this frame.
    fn is_mouse_button_released(&self, button: HostMouseButton) -> bool;

    /// Button is currently held.
    fn is_mouse_button_down(&self, button: HostMouseButton) -> bool;

    /// Wheel movement accumulated this frame.
    fn mouse_wheel_move(&self) -> Vec2;

    /// Shows the hardware cursor.
    fn show_cursor(&mut self);

    /// Hides the hardware cursor.
    fn hide_cursor(&mut self);

    /// Changes the hardware cursor shape.
    fn set_mouse_cursor(&mut self, cursor: HostCursor);

    /// Key is currently held.
    fn is_key_down(&self, key: HostKey) -> bool;

    /// Key went down this frame.
    fn is_key_pressed(&self, key: HostKey) -> bool;

    /// Key went up this frame.
    fn is_key_released(&self, key: HostKey) -> bool;

    /// Pops the next key from the press queue.
    fn next_key_pressed(&mut self) -> Option<HostKey>;

    /// Pops the next auto-repeated key. Hosts without key repeat return `None`.
    fn next_key_repeated(&mut self) -> Option<HostKey> {
        None
    }

    /// Pops the next typed character.
    fn next_char_pressed(&mut self) -> Option<char>;

    /// Current clipboard text, if the host has a clipboard.
    fn clipboard_text(&mut self) -> Option<String> {
        None
    }

    /// Replaces the clipboard text.
    fn set_clipboard_text(&mut self, _text: &str) {}

    /// Whether the window has keyboard focus.
    fn is_window_focused(&self) -> bool;

    /// Whether the window was resized this frame.
    fn is_window_resized(&self) -> bool;

    /// Whether a gamepad is connected at `index`.
    fn is_gamepad_available(&self, _index: usize) -> bool {
        false
    }

    /// Gamepad button is currently held.
    fn is_gamepad_button_down(&self, _index: usize, _button: GamepadButton) -> bool {
        false
    }

    /// Gamepad axis value in `[-1, 1]`.
    fn gamepad_axis(&self, _index: usize, _axis: GamepadAxis) -> f32 {
        0.0
    }
}
