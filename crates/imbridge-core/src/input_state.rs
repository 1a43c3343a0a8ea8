//! A buffered [`HostInput`] fed by window events.
//!
//! The windowing layer pushes raw events in as they arrive; the bridge reads
//! them once per frame; [`InputState::end_frame`] clears the per-frame edges.
//! Cursor requests made by the bridge are recorded and picked up by the
//! windowing layer through [`InputState::take_cursor_requests`]; copied text
//! likewise through [`InputState::take_clipboard_request`].

use std::collections::{HashMap, HashSet, VecDeque};

use glam::Vec2;

use crate::host::HostInput;
use crate::keys::{GamepadAxis, GamepadButton, HostCursor, HostKey, HostMouseButton};

/// Cursor changes requested since the last call to
/// [`InputState::take_cursor_requests`].
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CursorRequests {
    /// New visibility, if it changed.
    pub visible: Option<bool>,
    /// New shape, if one was set.
    pub icon: Option<HostCursor>,
    /// Warp target, if one was requested.
    pub warp: Option<Vec2>,
}

impl CursorRequests {
    /// Whether nothing was requested.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.visible.is_none() && self.icon.is_none() && self.warp.is_none()
    }
}

#[derive(Debug, Clone, Default)]
struct GamepadState {
    buttons: HashSet<GamepadButton>,
    axes: HashMap<GamepadAxis, f32>,
}

/// Buffered host input state.
#[derive(Debug, Clone)]
pub struct InputState {
    screen_size: Vec2,
    monitor_size: Vec2,
    framebuffer_size: Vec2,
    fullscreen: bool,
    frame_time: f32,
    focused: bool,
    resized: bool,

    mouse_position: Vec2,
    wheel: Vec2,
    buttons_down: HashSet<HostMouseButton>,
    buttons_pressed: HashSet<HostMouseButton>,
    buttons_released: HashSet<HostMouseButton>,

    keys_down: HashSet<HostKey>,
    keys_pressed: HashSet<HostKey>,
    keys_released: HashSet<HostKey>,
    key_queue: VecDeque<HostKey>,
    repeat_queue: VecDeque<HostKey>,
    char_queue: VecDeque<char>,
    clipboard: Option<String>,
    clipboard_request: Option<String>,

    gamepads: Vec<Option<GamepadState>>,

    cursor_visible: bool,
    cursor: HostCursor,
    requests: CursorRequests,
}

impl Default for InputState {
    fn default() -> Self {
        Self::new(Vec2::ZERO)
    }
}

impl InputState {
    /// Creates a focused, windowed state of the given logical size.
    #[must_use]
    pub fn new(screen_size: Vec2) -> Self {
        Self {
            screen_size,
            monitor_size: screen_size,
            framebuffer_size: screen_size,
            fullscreen: false,
            frame_time: 0.0,
            focused: true,
            resized: false,
            mouse_position: Vec2::ZERO,
            wheel: Vec2::ZERO,
            buttons_down: HashSet::new(),
            buttons_pressed: HashSet::new(),
            buttons_released: HashSet::new(),
            keys_down: HashSet::new(),
            keys_pressed: HashSet::new(),
            keys_released: HashSet::new(),
            key_queue: VecDeque::new(),
            repeat_queue: VecDeque::new(),
            char_queue: VecDeque::new(),
            clipboard: None,
            clipboard_request: None,
            gamepads: Vec::new(),
            cursor_visible: true,
            cursor: HostCursor::Default,
            requests: CursorRequests::default(),
        }
    }

    /// Records a window resize. `framebuffer_size` is in physical pixels.
    pub fn resize(&mut self, screen_size: Vec2, framebuffer_size: Vec2) {
        if screen_size != self.screen_size || framebuffer_size != self.framebuffer_size {
            self.resized = true;
        }
        self.screen_size = screen_size;
        self.framebuffer_size = framebuffer_size;
    }

    /// Sets the size of the current monitor.
    pub fn set_monitor_size(&mut self, size: Vec2) {
        self.monitor_size = size;
    }

    /// Sets the fullscreen flag.
    pub fn set_fullscreen(&mut self, fullscreen: bool) {
        self.fullscreen = fullscreen;
    }

    /// Sets the duration of the previous frame.
    pub fn set_frame_time(&mut self, seconds: f32) {
        self.frame_time = seconds;
    }

    /// Records a focus change.
    pub fn set_focused(&mut self, focused: bool) {
        self.focused = focused;
    }

    /// Records a cursor move.
    pub fn mouse_moved(&mut self, position: Vec2) {
        self.mouse_position = position;
    }

    /// Records a button transition.
    pub fn mouse_button(&mut self, button: HostMouseButton, down: bool) {
        if down {
            if self.buttons_down.insert(button) {
                self.buttons_pressed.insert(button);
            }
        } else if self.buttons_down.remove(&button) {
            self.buttons_released.insert(button);
        }
    }

    /// Accumulates wheel movement.
    pub fn mouse_wheel(&mut self, delta: Vec2) {
        self.wheel += delta;
    }

    /// Records a key transition. A press of a held key is not a new press;
    /// auto-repeat goes through [`key_repeated`](Self::key_repeated).
    pub fn key(&mut self, key: HostKey, down: bool) {
        if down {
            if self.keys_down.insert(key) {
                self.keys_pressed.insert(key);
                self.key_queue.push_back(key);
            }
        } else if self.keys_down.remove(&key) {
            self.keys_released.insert(key);
        }
    }

    /// Records an auto-repeat of a key. A key that is not held is pressed instead.
    pub fn key_repeated(&mut self, key: HostKey) {
        if self.keys_down.contains(&key) {
            self.repeat_queue.push_back(key);
        } else {
            self.key(key, true);
        }
    }

    /// Queues a typed character. Control characters are dropped.
    pub fn char_typed(&mut self, c: char) {
        if !c.is_control() {
            self.char_queue.push_back(c);
        }
    }

    /// Replaces the buffered clipboard contents read by the bridge.
    pub fn set_clipboard_contents(&mut self, text: Option<String>) {
        self.clipboard = text;
    }

    /// Returns and clears text the bridge asked to put on the clipboard.
    pub fn take_clipboard_request(&mut self) -> Option<String> {
        self.clipboard_request.take()
    }

    /// Connects or disconnects the gamepad at `index`.
    pub fn set_gamepad_connected(&mut self, index: usize, connected: bool) {
        if self.gamepads.len() <= index {
            self.gamepads.resize_with(index + 1, || None);
        }
        self.gamepads[index] = connected.then(GamepadState::default);
    }

    /// Records a gamepad button state. Ignored for disconnected pads.
    pub fn gamepad_button(&mut self, index: usize, button: GamepadButton, down: bool) {
        if let Some(Some(pad)) = self.gamepads.get_mut(index) {
            if down {
                pad.buttons.insert(button);
            } else {
                pad.buttons.remove(&button);
            }
        }
    }

    /// Records a gamepad axis value, clamped to `[-1, 1]`.
    pub fn gamepad_axis_moved(&mut self, index: usize, axis: GamepadAxis, value: f32) {
        if let Some(Some(pad)) = self.gamepads.get_mut(index) {
            pad.axes.insert(axis, value.clamp(-1.0, 1.0));
        }
    }

    /// Releases every held key and button, e.g. after focus loss.
    pub fn release_all(&mut self) {
        self.buttons_released.extend(self.buttons_down.drain());
        self.keys_released.extend(self.keys_down.drain());
    }

    /// Clears the per-frame edges, wheel and resize flag.
    pub fn end_frame(&mut self) {
        self.buttons_pressed.clear();
        self.buttons_released.clear();
        self.keys_pressed.clear();
        self.keys_released.clear();
        self.key_queue.clear();
        self.repeat_queue.clear();
        self.char_queue.clear();
        self.wheel = Vec2::ZERO;
        self.resized = false;
    }

    /// Whether the hardware cursor should be visible.
    #[must_use]
    pub fn cursor_visible(&self) -> bool {
        self.cursor_visible
    }

    /// The last requested hardware cursor shape.
    #[must_use]
    pub fn cursor(&self) -> HostCursor {
        self.cursor
    }

    /// Returns and clears the pending cursor requests.
    pub fn take_cursor_requests(&mut self) -> CursorRequests {
        std::mem::take(&mut self.requests)
    }

    fn pad(&self, index: usize) -> Option<&GamepadState> {
        self.gamepads.get(index).and_then(Option::as_ref)
    }
}

impl HostInput for InputState {
    fn screen_size(&self) -> Vec2 {
        self.screen_size
    }

    fn is_fullscreen(&self) -> bool {
        self.fullscreen
    }

    fn monitor_size(&self) -> Vec2 {
        self.monitor_size
    }

    fn framebuffer_size(&self) -> Vec2 {
        self.framebuffer_size
    }

    fn frame_time(&self) -> f32 {
        self.frame_time
    }

    fn mouse_position(&self) -> Vec2 {
        self.mouse_position
    }

    fn set_mouse_position(&mut self, position: Vec2) {
        self.mouse_position = position;
        self.requests.warp = Some(position);
    }

    fn is_mouse_button_pressed(&self, button: HostMouseButton) -> bool {
        self.buttons_pressed.contains(&button)
    }

    fn is_mouse_button_released(&self, button: HostMouseButton) -> bool {
        self.buttons_released.contains(&button)
    }

    fn is_mouse_button_down(&self, button: HostMouseButton) -> bool {
        self.buttons_down.contains(&button)
    }

    fn mouse_wheel_move(&self) -> Vec2 {
        self.wheel
    }

    fn show_cursor(&mut self) {
        if !self.cursor_visible {
            self.cursor_visible = true;
            self.requests.visible = Some(true);
        }
    }

    fn hide_cursor(&mut self) {
        if self.cursor_visible {
            self.cursor_visible = false;
            self.requests.visible = Some(false);
        }
    }

    fn set_mouse_cursor(&mut self, cursor: HostCursor) {
        self.cursor = cursor;
        self.requests.icon = Some(cursor);
    }

    fn is_key_down(&self, key: HostKey) -> bool {
        self.keys_down.contains(&key)
    }

    fn is_key_pressed(&self, key: HostKey) -> bool {
        self.keys_pressed.contains(&key)
    }

    fn is_key_released(&self, key: HostKey) -> bool {
        self.keys_released.contains(&key)
    }

    fn next_key_pressed(&mut self) -> Option<HostKey> {
        self.key_queue.pop_front()
    }

    fn next_key_repeated(&mut self) -> Option<HostKey> {
        self.repeat_queue.pop_front()
    }

    fn next_char_pressed(&mut self) -> Option<char> {
        self.char_queue.pop_front()
    }

    fn clipboard_text(&mut self) -> Option<String> {
        self.clipboard.clone()
    }

    fn set_clipboard_text(&mut self, text: &str) {
        self.clipboard = Some(text.to_owned());
        self.clipboard_request = Some(text.to_owned());
    }

    fn is_window_focused(&self) -> bool {
        self.focused
    }

    fn is_window_resized(&self) -> bool {
        self.resized
    }

    fn is_gamepad_available(&self, index: usize) -> bool {
        self.pad(index).is_some()
    }

    fn is_gamepad_button_down(&self, index: usize, button: GamepadButton) -> bool {
        self.pad(index).is_some_and(|p| p.buttons.contains(&button))
    }

    fn gamepad_axis(&self, index: usize, axis: GamepadAxis) -> f32 {
        self.pad(index)
            .and_then(|p| p.axes.get(&axis).copied())
            .unwrap_or(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_button_edges() {
        let mut input = InputState::new(Vec2::new(800.0, 600.0));
        input.mouse_button(HostMouseButton::Left, true);
        assert!(input.is_mouse_button_pressed(HostMouseButton::Left));
        assert!(input.is_mouse_button_down(HostMouseButton::Left));

        input.end_frame();
        assert!(!input.is_mouse_button_pressed(HostMouseButton::Left));
        assert!(input.is_mouse_button_down(HostMouseButton::Left));

        input.mouse_button(HostMouseButton::Left, false);
        assert!(input.is_mouse_button_released(HostMouseButton::Left));
        assert!(!input.is_mouse_button_down(HostMouseButton::Left));
    }

    #[test]
    fn test_key_queue_order_and_repeat() {
        let mut input = InputState::default();
        input.key(HostKey::B, true);
        input.key(HostKey::A, true);
        input.key(HostKey::B, true);
        assert_eq!(input.next_key_pressed(), Some(HostKey::B));
        assert_eq!(input.next_key_pressed(), Some(HostKey::A));
        assert_eq!(input.next_key_pressed(), None);
    }

    #[test]
    fn test_same_frame_tap_sets_both_edges() {
        let mut input = InputState::default();
        input.mouse_button(HostMouseButton::Left, true);
        input.mouse_button(HostMouseButton::Left, false);
        assert!(input.is_mouse_button_pressed(HostMouseButton::Left));
        assert!(input.is_mouse_button_released(HostMouseButton::Left));
        assert!(!input.is_mouse_button_down(HostMouseButton::Left));
    }

    #[test]
    fn test_key_repeat_queue() {
        let mut input = InputState::default();
        input.key(HostKey::Backspace, true);
        input.key_repeated(HostKey::Backspace);
        input.key_repeated(HostKey::Backspace);
        assert_eq!(input.next_key_pressed(), Some(HostKey::Backspace));
        assert_eq!(input.next_key_pressed(), None);
        assert_eq!(input.next_key_repeated(), Some(HostKey::Backspace));
        assert_eq!(input.next_key_repeated(), Some(HostKey::Backspace));
        assert_eq!(input.next_key_repeated(), None);

        input.key_repeated(HostKey::Backspace);
        input.end_frame();
        assert_eq!(input.next_key_repeated(), None);
        assert!(input.is_key_down(HostKey::Backspace));
    }

    #[test]
    fn test_repeat_of_unheld_key_is_a_press() {
        let mut input = InputState::default();
        input.key_repeated(HostKey::Delete);
        assert!(input.is_key_pressed(HostKey::Delete));
        assert_eq!(input.next_key_pressed(), Some(HostKey::Delete));
        assert_eq!(input.next_key_repeated(), None);
    }

    #[test]
    fn test_clipboard_buffer_and_request() {
        let mut input = InputState::default();
        assert_eq!(input.clipboard_text(), None);
        input.set_clipboard_contents(Some("from host".to_owned()));
        assert_eq!(input.clipboard_text().as_deref(), Some("from host"));
        assert_eq!(input.take_clipboard_request(), None);

        input.set_clipboard_text("copied");
        assert_eq!(input.clipboard_text().as_deref(), Some("copied"));
        assert_eq!(input.take_clipboard_request().as_deref(), Some("copied"));
        assert_eq!(input.take_clipboard_request(), None);
        // the buffer survives frames
        input.end_frame();
        assert_eq!(input.clipboard_text().as_deref(), Some("copied"));
    }

    #[test]
    fn test_control_chars_dropped() {
        let mut input = InputState::default();
        input.char_typed('h');
        input.char_typed('\u{8}');
        input.char_typed('é');
        assert_eq!(input.next_char_pressed(), Some('h'));
        assert_eq!(input.next_char_pressed(), Some('é'));
        assert_eq!(input.next_char_pressed(), None);
    }

    #[test]
    fn test_resize_flag_clears() {
        let mut input = InputState::new(Vec2::new(800.0, 600.0));
        input.resize(Vec2::new(800.0, 600.0), Vec2::new(800.0, 600.0));
        assert!(!input.is_window_resized());
        input.resize(Vec2::new(1024.0, 768.0), Vec2::new(2048.0, 1536.0));
        assert!(input.is_window_resized());
        input.end_frame();
        assert!(!input.is_window_resized());
    }

    #[test]
    fn test_cursor_requests() {
        let mut input = InputState::default();
        input.show_cursor();
        assert!(input.take_cursor_requests().is_empty());

        input.hide_cursor();
        input.set_mouse_cursor(HostCursor::IBeam);
        input.set_mouse_position(Vec2::new(4.0, 5.0));
        let requests = input.take_cursor_requests();
        assert_eq!(requests.visible, Some(false));
        assert_eq!(requests.icon, Some(HostCursor::IBeam));
        assert_eq!(requests.warp, Some(Vec2::new(4.0, 5.0)));
        assert!(input.take_cursor_requests().is_empty());
    }

    #[test]
    fn test_gamepad_state() {
        let mut input = InputState::default();
        assert!(!input.is_gamepad_available(0));
        input.gamepad_button(0, GamepadButton::RightFaceDown, true);

        input.set_gamepad_connected(0, true);
        input.gamepad_button(0, GamepadButton::RightFaceDown, true);
        input.gamepad_axis_moved(0, GamepadAxis::LeftX, -3.0);
        assert!(input.is_gamepad_button_down(0, GamepadButton::RightFaceDown));
        assert!((input.gamepad_axis(0, GamepadAxis::LeftX) + 1.0).abs() < f32::EPSILON);

        input.set_gamepad_connected(0, false);
        assert!(!input.is_gamepad_button_down(0, GamepadButton::RightFaceDown));
    }
}
