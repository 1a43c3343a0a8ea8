//! Per-frame input snapshot.

use glam::Vec2;

use crate::gui::{GuiKey, GuiMouseButton};
use crate::host::HostInput;
use crate::keys::{HostKey, HostMouseButton};
use crate::maps::KeyMap;

/// Host buttons forwarded to the GUI, with their GUI counterparts.
pub const MOUSE_BUTTONS: [(HostMouseButton, GuiMouseButton); 5] = [
    (HostMouseButton::Left, GuiMouseButton::Left),
    (HostMouseButton::Right, GuiMouseButton::Right),
    (HostMouseButton::Middle, GuiMouseButton::Middle),
    (HostMouseButton::Forward, GuiMouseButton::Extra1),
    (HostMouseButton::Back, GuiMouseButton::Extra2),
];

/// Logical modifier state, left and right collapsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[allow(clippy::struct_excessive_bools)]
pub struct Modifiers {
    /// Either control key.
    pub ctrl: bool,
    /// Either shift key.
    pub shift: bool,
    /// Either alt key.
    pub alt: bool,
    /// Either super key.
    pub super_key: bool,
}

impl Modifiers {
    /// Reads the held modifier keys from the host.
    pub fn from_host(host: &dyn HostInput) -> Self {
        let either = |a, b| host.is_key_down(a) || host.is_key_down(b);
        Self {
            ctrl: either(HostKey::LeftControl, HostKey::RightControl),
            shift: either(HostKey::LeftShift, HostKey::RightShift),
            alt: either(HostKey::LeftAlt, HostKey::RightAlt),
            super_key: either(HostKey::LeftSuper, HostKey::RightSuper),
        }
    }

    /// Whether the platform's command modifier is held: super on macOS, ctrl elsewhere.
    #[must_use]
    pub fn command(self) -> bool {
        if cfg!(target_os = "macos") {
            self.super_key
        } else {
            self.ctrl
        }
    }

    /// Whether pressing `key` with these modifiers pastes: command+V or shift+Insert.
    #[must_use]
    pub fn is_paste(self, key: HostKey) -> bool {
        (key == HostKey::V && self.command()) || (key == HostKey::Insert && self.shift)
    }

    /// Pairs each state with its logical GUI key, in ctrl, shift, alt, super order.
    #[must_use]
    pub fn keys(self) -> [(GuiKey, bool); 4] {
        [
            (GuiKey::ModCtrl, self.ctrl),
            (GuiKey::ModShift, self.shift),
            (GuiKey::ModAlt, self.alt),
            (GuiKey::ModSuper, self.super_key),
        ]
    }
}

/// Edge state of one mouse button during a frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ButtonEdge {
    /// Went down this frame.
    pub pressed: bool,
    /// Went up this frame.
    pub released: bool,
    /// Held at the end of the frame.
    pub down: bool,
}

impl ButtonEdge {
    /// The transitions to replay, in order, as `down` flags.
    ///
    /// A press and a release in the same frame replay both. The order is
    /// chosen so the last transition matches the held state.
    #[must_use]
    pub fn transitions(self) -> &'static [bool] {
        match (self.pressed, self.released) {
            (true, true) if self.down => &[false, true],
            (true, true) => &[true, false],
            (true, false) => &[true],
            (false, true) => &[false],
            (false, false) => &[],
        }
    }
}

/// Everything sampled from the host for one frame.
///
/// Built at the start of a frame and discarded once translated.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FrameInput {
    /// Cursor position in logical coordinates.
    pub mouse_position: Vec2,
    /// Edges of the forwarded buttons, same order as [`MOUSE_BUTTONS`].
    pub buttons: [ButtonEdge; 5],
    /// Wheel movement.
    pub wheel: Vec2,
    /// Held modifiers.
    pub modifiers: Modifiers,
    /// Mapped key transitions: releases of re-pressed keys, presses in
    /// arrival order, then the remaining releases.
    pub keys: Vec<(GuiKey, bool)>,
    /// Mapped auto-repeats in arrival order.
    pub repeats: Vec<GuiKey>,
    /// Clipboard text when the paste shortcut was pressed.
    pub paste: Option<String>,
    /// Typed characters in arrival order.
    pub text: Vec<char>,
    /// Window focus.
    pub focused: bool,
}

impl FrameInput {
    /// Samples the host, draining its key and character queues.
    pub fn capture(host: &mut dyn HostInput, key_map: &KeyMap) -> Self {
        let mut buttons = [ButtonEdge::default(); 5];
        for (edge, (host_button, _)) in buttons.iter_mut().zip(MOUSE_BUTTONS) {
            edge.pressed = host.is_mouse_button_pressed(host_button);
            edge.released = host.is_mouse_button_released(host_button);
            edge.down = host.is_mouse_button_down(host_button);
        }

        let modifiers = Modifiers::from_host(host);
        let released: Vec<_> = HostKey::ALL
            .iter()
            .filter(|&&key| host.is_key_released(key))
            .filter_map(|&key| key_map.get(key).map(|gui| (key, gui)))
            .collect();

        // a key released and pressed again this frame ends up held
        let mut keys: Vec<_> = released
            .iter()
            .filter(|&&(key, _)| host.is_key_down(key))
            .map(|&(_, gui)| (gui, false))
            .collect();
        let mut paste_pressed = false;
        while let Some(key) = host.next_key_pressed() {
            paste_pressed |= modifiers.is_paste(key);
            match key_map.get(key) {
                Some(gui) => keys.push((gui, true)),
                None => log::trace!("dropping unmapped key press {key:?}"),
            }
        }
        keys.extend(
            released
                .iter()
                .filter(|&&(key, _)| !host.is_key_down(key))
                .map(|&(_, gui)| (gui, false)),
        );

        let mut repeats = Vec::new();
        while let Some(key) = host.next_key_repeated() {
            paste_pressed |= modifiers.is_paste(key);
            if let Some(gui) = key_map.get(key) {
                repeats.push(gui);
            }
        }
        let paste = if paste_pressed {
            host.clipboard_text()
        } else {
            None
        };

        let mut text = Vec::new();
        while let Some(c) = host.next_char_pressed() {
            text.push(c);
        }

        Self {
            mouse_position: host.mouse_position(),
            buttons,
            wheel: host.mouse_wheel_move(),
            modifiers,
            keys,
            repeats,
            paste,
            text,
            focused: host.is_window_focused(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input_state::InputState;

    fn capture(host: &mut InputState) -> FrameInput {
        FrameInput::capture(host, &KeyMap::new())
    }

    fn command_key() -> HostKey {
        if cfg!(target_os = "macos") {
            HostKey::LeftSuper
        } else {
            HostKey::LeftControl
        }
    }

    #[test]
    fn test_button_transitions() {
        let edge = |pressed, released, down| ButtonEdge {
            pressed,
            released,
            down,
        };
        assert_eq!(edge(true, true, false).transitions(), &[true, false]);
        assert_eq!(edge(true, true, true).transitions(), &[false, true]);
        assert_eq!(edge(true, false, true).transitions(), &[true]);
        assert_eq!(edge(false, true, false).transitions(), &[false]);
        assert!(edge(false, false, true).transitions().is_empty());
    }

    #[test]
    fn test_tap_within_frame_is_captured() {
        let mut host = InputState::default();
        host.mouse_button(HostMouseButton::Left, true);
        host.mouse_button(HostMouseButton::Left, false);
        let input = capture(&mut host);
        assert_eq!(
            input.buttons[0],
            ButtonEdge {
                pressed: true,
                released: true,
                down: false
            }
        );
    }

    #[test]
    fn test_key_released_and_pressed_again_ends_down() {
        let mut host = InputState::default();
        host.key(HostKey::A, true);
        host.end_frame();
        host.key(HostKey::A, false);
        host.key(HostKey::A, true);
        host.key(HostKey::B, true);
        host.key(HostKey::B, false);
        let input = capture(&mut host);
        assert_eq!(
            input.keys,
            vec![
                (GuiKey::A, false),
                (GuiKey::A, true),
                (GuiKey::B, true),
                (GuiKey::B, false)
            ]
        );
    }

    #[test]
    fn test_repeats_are_captured() {
        let mut host = InputState::default();
        host.key(HostKey::Backspace, true);
        host.end_frame();
        host.key_repeated(HostKey::Backspace);
        host.key_repeated(HostKey::Backspace);
        let input = capture(&mut host);
        assert!(input.keys.is_empty());
        assert_eq!(input.repeats, vec![GuiKey::Backspace, GuiKey::Backspace]);
    }

    #[test]
    fn test_paste_shortcut_reads_clipboard() {
        let mut host = InputState::default();
        host.set_clipboard_contents(Some("pasted".to_owned()));
        host.key(HostKey::V, true);
        assert_eq!(capture(&mut host).paste, None);
        host.end_frame();
        host.key(HostKey::V, false);
        host.end_frame();

        host.key(command_key(), true);
        host.key(HostKey::V, true);
        assert_eq!(capture(&mut host).paste.as_deref(), Some("pasted"));
        host.end_frame();

        host.key_repeated(HostKey::V);
        assert_eq!(capture(&mut host).paste.as_deref(), Some("pasted"));
    }

    #[test]
    fn test_paste_shortcuts() {
        let shift = Modifiers {
            shift: true,
            ..Modifiers::default()
        };
        assert!(shift.is_paste(HostKey::Insert));
        assert!(!shift.is_paste(HostKey::V));
        assert!(!Modifiers::default().is_paste(HostKey::Insert));
        let mut host = InputState::default();
        host.key(command_key(), true);
        assert!(Modifiers::from_host(&host).is_paste(HostKey::V));
    }

    #[test]
    fn test_paste_with_empty_clipboard() {
        let mut host = InputState::default();
        host.key(command_key(), true);
        host.key(HostKey::V, true);
        assert_eq!(capture(&mut host).paste, None);
    }
}
