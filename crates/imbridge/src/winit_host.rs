//! Feeds winit window events into an [`InputState`].

use glam::Vec2;
use imbridge_core::{CursorRequests, HostCursor, HostKey, HostMouseButton, InputState};
use winit::dpi::{LogicalPosition, PhysicalPosition, PhysicalSize};
use winit::event::{ElementState, MouseButton, MouseScrollDelta, WindowEvent};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{CursorIcon, Window};

/// Pixel scroll distance counted as one wheel notch.
pub const PIXELS_PER_LINE: f32 = 50.0;

/// The host key for a physical winit key.
pub fn host_key(code: KeyCode) -> Option<HostKey> {
    use HostKey as H;
    let key = match code {
        KeyCode::Quote => H::Apostrophe,
        KeyCode::Comma => H::Comma,
        KeyCode::Minus => H::Minus,
        KeyCode::Period => H::Period,
        KeyCode::Slash => H::Slash,
        KeyCode::Digit0 => H::Zero,
        KeyCode::Digit1 => H::One,
        KeyCode::Digit2 => H::Two,
        KeyCode::Digit3 => H::Three,
        KeyCode::Digit4 => H::Four,
        KeyCode::Digit5 => H::Five,
        KeyCode::Digit6 => H::Six,
        KeyCode::Digit7 => H::Seven,
        KeyCode::Digit8 => H::Eight,
        KeyCode::Digit9 => H::Nine,
        KeyCode::Semicolon => H::Semicolon,
        KeyCode::Equal => H::Equal,
        KeyCode::KeyA => H::A,
        KeyCode::KeyB => H::B,
        KeyCode::KeyC => H::C,
        KeyCode::KeyD => H::D,
        KeyCode::KeyE => H::E,
        KeyCode::KeyF => H::F,
        KeyCode::KeyG => H::G,
        KeyCode::KeyH => H::H,
        KeyCode::KeyI => H::I,
        KeyCode::KeyJ => H::J,
        KeyCode::KeyK => H::K,
        KeyCode::KeyL => H::L,
        KeyCode::KeyM => H::M,
        KeyCode::KeyN => H::N,
        KeyCode::KeyO => H::O,
        KeyCode::KeyP => H::P,
        KeyCode::KeyQ => H::Q,
        KeyCode::KeyR => H::R,
        KeyCode::KeyS => H::S,
        KeyCode::KeyT => H::T,
        KeyCode::KeyU => H::U,
        KeyCode::KeyV => H::V,
        KeyCode::KeyW => H::W,
        KeyCode::KeyX => H::X,
        KeyCode::KeyY => H::Y,
        KeyCode::KeyZ => H::Z,
        KeyCode::Space => H::Space,
        KeyCode::Escape => H::Escape,
        KeyCode::Enter => H::Enter,
        KeyCode::Tab => H::Tab,
        KeyCode::Backspace => H::Backspace,
        KeyCode::Insert => H::Insert,
        KeyCode::Delete => H::Delete,
        KeyCode::ArrowRight => H::Right,
        KeyCode::ArrowLeft => H::Left,
        KeyCode::ArrowDown => H::Down,
        KeyCode::ArrowUp => H::Up,
        KeyCode::PageUp => H::PageUp,
        KeyCode::PageDown => H::PageDown,
        KeyCode::Home => H::Home,
        KeyCode::End => H::End,
        KeyCode::CapsLock => H::CapsLock,
        KeyCode::ScrollLock => H::ScrollLock,
        KeyCode::NumLock => H::NumLock,
        KeyCode::PrintScreen => H::PrintScreen,
        KeyCode::Pause => H::Pause,
        KeyCode::F1 => H::F1,
        KeyCode::F2 => H::F2,
        KeyCode::F3 => H::F3,
        KeyCode::F4 => H::F4,
        KeyCode::F5 => H::F5,
        KeyCode::F6 => H::F6,
        KeyCode::F7 => H::F7,
        KeyCode::F8 => H::F8,
        KeyCode::F9 => H::F9,
        KeyCode::F10 => H::F10,
        KeyCode::F11 => H::F11,
        KeyCode::F12 => H::F12,
        KeyCode::ShiftLeft => H::LeftShift,
        KeyCode::ControlLeft => H::LeftControl,
        KeyCode::AltLeft => H::LeftAlt,
        KeyCode::SuperLeft => H::LeftSuper,
        KeyCode::ShiftRight => H::RightShift,
        KeyCode::ControlRight => H::RightControl,
        KeyCode::AltRight => H::RightAlt,
        KeyCode::SuperRight => H::RightSuper,
        KeyCode::ContextMenu => H::KbMenu,
        KeyCode::BracketLeft => H::LeftBracket,
        KeyCode::Backslash => H::Backslash,
        KeyCode::BracketRight => H::RightBracket,
        KeyCode::Backquote => H::Grave,
        KeyCode::Numpad0 => H::Kp0,
        KeyCode::Numpad1 => H::Kp1,
        KeyCode::Numpad2 => H::Kp2,
        KeyCode::Numpad3 => H::Kp3,
        KeyCode::Numpad4 => H::Kp4,
        KeyCode::Numpad5 => H::Kp5,
        KeyCode::Numpad6 => H::Kp6,
        KeyCode::Numpad7 => H::Kp7,
        KeyCode::Numpad8 => H::Kp8,
        KeyCode::Numpad9 => H::Kp9,
        KeyCode::NumpadDecimal => H::KpDecimal,
        KeyCode::NumpadDivide => H::KpDivide,
        KeyCode::NumpadMultiply => H::KpMultiply,
        KeyCode::NumpadSubtract => H::KpSubtract,
        KeyCode::NumpadAdd => H::KpAdd,
        KeyCode::NumpadEnter => H::KpEnter,
        KeyCode::NumpadEqual => H::KpEqual,
        KeyCode::BrowserBack => H::Back,
        KeyCode::AudioVolumeUp => H::VolumeUp,
        KeyCode::AudioVolumeDown => H::VolumeDown,
        _ => return None,
    };
    Some(key)
}

/// The host mouse button for a winit button.
pub fn host_mouse_button(button: MouseButton) -> Option<HostMouseButton> {
    match button {
        MouseButton::Left => Some(HostMouseButton::Left),
        MouseButton::Right => Some(HostMouseButton::Right),
        MouseButton::Middle => Some(HostMouseButton::Middle),
        MouseButton::Back => Some(HostMouseButton::Back),
        MouseButton::Forward => Some(HostMouseButton::Forward),
        MouseButton::Other(_) => None,
    }
}

/// The winit cursor icon for a host cursor shape.
pub fn cursor_icon(cursor: HostCursor) -> CursorIcon {
    match cursor {
        HostCursor::Default | HostCursor::Arrow => CursorIcon::Default,
        HostCursor::IBeam => CursorIcon::Text,
        HostCursor::Crosshair => CursorIcon::Crosshair,
        HostCursor::PointingHand => CursorIcon::Pointer,
        HostCursor::ResizeEW => CursorIcon::EwResize,
        HostCursor::ResizeNS => CursorIcon::NsResize,
        HostCursor::ResizeNWSE => CursorIcon::NwseResize,
        HostCursor::ResizeNESW => CursorIcon::NeswResize,
        HostCursor::ResizeAll => CursorIcon::Move,
        HostCursor::NotAllowed => CursorIcon::NotAllowed,
    }
}

fn physical_to_vec(size: PhysicalSize<u32>) -> Vec2 {
    Vec2::new(size.width as f32, size.height as f32)
}

/// Host input state of one winit window.
#[derive(Debug, Clone)]
pub struct WinitInput {
    state: InputState,
    scale_factor: f64,
    close_requested: bool,
}

impl WinitInput {
    /// Captures the window's current size, scale and monitor.
    pub fn new(window: &Window) -> Self {
        let scale_factor = window.scale_factor();
        let physical = window.inner_size();
        let mut input = Self::with_size(physical, scale_factor);
        if let Some(monitor) = window.current_monitor() {
            let logical = monitor.size().to_logical::<f32>(monitor.scale_factor());
            input
                .state
                .set_monitor_size(Vec2::new(logical.width, logical.height));
        }
        input.state.set_fullscreen(window.fullscreen().is_some());
        input.state.set_focused(window.has_focus());
        input
    }

    /// State for a window of `physical` pixels at `scale_factor`.
    pub fn with_size(physical: PhysicalSize<u32>, scale_factor: f64) -> Self {
        let logical = physical.to_logical::<f32>(scale_factor);
        let mut state = InputState::new(Vec2::new(logical.width, logical.height));
        state.resize(
            Vec2::new(logical.width, logical.height),
            physical_to_vec(physical),
        );
        state.end_frame();
        Self {
            state,
            scale_factor,
            close_requested: false,
        }
    }

    /// The buffered input state.
    pub fn state(&self) -> &InputState {
        &self.state
    }

    /// The buffered input state, mutably. This is the [`imbridge_core::HostInput`] handed to the bridge.
    pub fn state_mut(&mut self) -> &mut InputState {
        &mut self.state
    }

    /// Whether the window asked to close.
    pub fn close_requested(&self) -> bool {
        self.close_requested
    }

    /// Records one window event.
    pub fn handle_window_event(&mut self, event: &WindowEvent) {
        match event {
            WindowEvent::CloseRequested => self.close_requested = true,
            WindowEvent::Resized(size) => self.resized(*size),
            WindowEvent::ScaleFactorChanged { scale_factor, .. } => {
                self.scale_factor = *scale_factor;
            }
            WindowEvent::Focused(focused) => self.focused(*focused),
            WindowEvent::CursorMoved { position, .. } => self.cursor_moved(*position),
            WindowEvent::MouseInput { state, button, .. } => self.mouse_input(*state, *button),
            WindowEvent::MouseWheel { delta, .. } => self.mouse_wheel(*delta),
            WindowEvent::KeyboardInput { event, .. } => {
                let PhysicalKey::Code(code) = event.physical_key else {
                    return;
                };
                let text = event.text.as_ref().map(|t| t.as_str());
                self.keyboard(code, event.state, event.repeat, text);
            }
            _ => {}
        }
    }

    /// Records a resize to `physical` pixels.
    pub fn resized(&mut self, physical: PhysicalSize<u32>) {
        let logical = physical.to_logical::<f32>(self.scale_factor);
        self.state.resize(
            Vec2::new(logical.width, logical.height),
            physical_to_vec(physical),
        );
    }

    /// Records a focus change. Held keys and buttons are released on focus loss.
    pub fn focused(&mut self, focused: bool) {
        if !focused {
            self.state.release_all();
        }
        self.state.set_focused(focused);
    }

    /// Records a cursor move given in physical pixels.
    pub fn cursor_moved(&mut self, position: PhysicalPosition<f64>) {
        let logical = position.to_logical::<f32>(self.scale_factor);
        self.state.mouse_moved(Vec2::new(logical.x, logical.y));
    }

    /// Records a mouse button transition.
    pub fn mouse_input(&mut self, state: ElementState, button: MouseButton) {
        if let Some(button) = host_mouse_button(button) {
            self.state.mouse_button(button, state.is_pressed());
        }
    }

    /// Records wheel movement.
    pub fn mouse_wheel(&mut self, delta: MouseScrollDelta) {
        let lines = match delta {
            MouseScrollDelta::LineDelta(x, y) => Vec2::new(x, y),
            MouseScrollDelta::PixelDelta(pos) => {
                let logical = pos.to_logical::<f32>(self.scale_factor);
                Vec2::new(logical.x, logical.y) / PIXELS_PER_LINE
            }
        };
        self.state.mouse_wheel(lines);
    }

    /// Records a key transition or auto-repeat and the text it produced.
    pub fn keyboard(
        &mut self,
        code: KeyCode,
        state: ElementState,
        repeat: bool,
        text: Option<&str>,
    ) {
        let pressed = state.is_pressed();
        match host_key(code) {
            Some(key) if pressed && repeat => self.state.key_repeated(key),
            Some(key) => self.state.key(key, pressed),
            None => log::trace!("unmapped key {code:?}"),
        }
        if pressed {
            for c in text.unwrap_or_default().chars() {
                self.state.char_typed(c);
            }
        }
    }

    /// Applies the cursor changes requested since the last call.
    pub fn apply_cursor_requests(&mut self, window: &Window) {
        let CursorRequests {
            visible,
            icon,
            warp,
        } = self.state.take_cursor_requests();
        if let Some(visible) = visible {
            window.set_cursor_visible(visible);
        }
        if let Some(icon) = icon {
            window.set_cursor(cursor_icon(icon));
        }
        if let Some(pos) = warp {
            if let Err(err) = window.set_cursor_position(LogicalPosition::new(pos.x, pos.y)) {
                log::warn!("cursor warp failed: {err}");
            }
        }
    }

    /// Clears the per-frame edges after a frame was processed.
    pub fn end_frame(&mut self) {
        self.state.end_frame();
    }
}
