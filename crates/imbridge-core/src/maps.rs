//! Lookup tables from host input identifiers to GUI identifiers.
//!
//! The tables are plain values built during bridge setup and dropped with the
//! bridge; nothing here is global.

use std::collections::HashMap;

use crate::gui::{GuiCursor, GuiKey};
use crate::keys::{GamepadAxis, GamepadButton, HostCursor, HostKey};

/// Host key → GUI key.
#[derive(Debug, Clone)]
pub struct KeyMap {
    map: HashMap<HostKey, GuiKey>,
}

impl Default for KeyMap {
    fn default() -> Self {
        Self::new()
    }
}

impl KeyMap {
    /// Builds the full keyboard table.
    #[must_use]
    pub fn new() -> Self {
        use GuiKey as G;
        use HostKey as H;

        let pairs = [
            (H::Apostrophe, G::Apostrophe),
            (H::Comma, G::Comma),
            (H::Minus, G::Minus),
            (H::Period, G::Period),
            (H::Slash, G::Slash),
            (H::Zero, G::Num0),
            (H::One, G::Num1),
            (H::Two, G::Num2),
            (H::Three, G::Num3),
            (H::Four, G::Num4),
            (H::Five, G::Num5),
            (H::Six, G::Num6),
            (H::Seven, G::Num7),
            (H::Eight, G::Num8),
            (H::Nine, G::Num9),
            (H::Semicolon, G::Semicolon),
            (H::Equal, G::Equal),
            (H::A, G::A),
            (H::B, G::B),
            (H::C, G::C),
            (H::D, G::D),
            (H::E, G::E),
            (H::F, G::F),
            (H::G, G::G),
            (H::H, G::H),
            (H::I, G::I),
            (H::J, G::J),
            (H::K, G::K),
            (H::L, G::L),
            (H::M, G::M),
            (H::N, G::N),
            (H::O, G::O),
            (H::P, G::P),
            (H::Q, G::Q),
            (H::R, G::R),
            (H::S, G::S),
            (H::T, G::T),
            (H::U, G::U),
            (H::V, G::V),
            (H::W, G::W),
            (H::X, G::X),
            (H::Y, G::Y),
            (H::Z, G::Z),
            (H::Space, G::Space),
            (H::Escape, G::Escape),
            (H::Enter, G::Enter),
            (H::Tab, G::Tab),
            (H::Backspace, G::Backspace),
            (H::Insert, G::Insert),
            (H::Delete, G::Delete),
            (H::Right, G::RightArrow),
            (H::Left, G::LeftArrow),
            (H::Down, G::DownArrow),
            (H::Up, G::UpArrow),
            (H::PageUp, G::PageUp),
            (H::PageDown, G::PageDown),
            (H::Home, G::Home),
            (H::End, G::End),
            (H::CapsLock, G::CapsLock),
            (H::ScrollLock, G::ScrollLock),
            (H::NumLock, G::NumLock),
            (H::PrintScreen, G::PrintScreen),
            (H::Pause, G::Pause),
            (H::F1, G::F1),
            (H::F2, G::F2),
            (H::F3, G::F3),
            (H::F4, G::F4),
            (H::F5, G::F5),
            (H::F6, G::F6),
            (H::F7, G::F7),
            (H::F8, G::F8),
            (H::F9, G::F9),
            (H::F10, G::F10),
            (H::F11, G::F11),
            (H::F12, G::F12),
            (H::LeftShift, G::LeftShift),
            (H::LeftControl, G::LeftCtrl),
            (H::LeftAlt, G::LeftAlt),
            (H::LeftSuper, G::LeftSuper),
            (H::RightShift, G::RightShift),
            (H::RightControl, G::RightCtrl),
            (H::RightAlt, G::RightAlt),
            (H::RightSuper, G::RightSuper),
            (H::KbMenu, G::Menu),
            (H::LeftBracket, G::LeftBracket),
            (H::Backslash, G::Backslash),
            (H::RightBracket, G::RightBracket),
            (H::Grave, G::GraveAccent),
            (H::Kp0, G::Keypad0),
            (H::Kp1, G::Keypad1),
            (H::Kp2, G::Keypad2),
            (H::Kp3, G::Keypad3),
            (H::Kp4, G::Keypad4),
            (H::Kp5, G::Keypad5),
            (H::Kp6, G::Keypad6),
            (H::Kp7, G::Keypad7),
            (H::Kp8, G::Keypad8),
            (H::Kp9, G::Keypad9),
            (H::KpDecimal, G::KeypadDecimal),
            (H::KpDivide, G::KeypadDivide),
            (H::KpMultiply, G::KeypadMultiply),
            (H::KpSubtract, G::KeypadSubtract),
            (H::KpAdd, G::KeypadAdd),
            (H::KpEnter, G::KeypadEnter),
            (H::KpEqual, G::KeypadEqual),
        ];

        Self {
            map: pairs.into_iter().collect(),
        }
    }

    /// Translates a host key; `None` for keys the GUI does not know.
    #[must_use]
    pub fn get(&self, key: HostKey) -> Option<GuiKey> {
        self.map.get(&key).copied()
    }

    /// Iterates over every mapped pair.
    pub fn iter(&self) -> impl Iterator<Item = (HostKey, GuiKey)> + '_ {
        self.map.iter().map(|(h, g)| (*h, *g))
    }

    /// Number of mapped keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// Whether the table is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

/// GUI cursor → host cursor.
#[derive(Debug, Clone)]
pub struct CursorMap {
    map: HashMap<GuiCursor, HostCursor>,
}

impl Default for CursorMap {
    fn default() -> Self {
        Self::new()
    }
}

impl CursorMap {
    /// Builds the cursor table. [`GuiCursor::None`] is intentionally absent.
    #[must_use]
    pub fn new() -> Self {
        let pairs = [
            (GuiCursor::Arrow, HostCursor::Arrow),
            (GuiCursor::TextInput, HostCursor::IBeam),
            (GuiCursor::Hand, HostCursor::PointingHand),
            (GuiCursor::ResizeAll, HostCursor::ResizeAll),
            (GuiCursor::ResizeEW, HostCursor::ResizeEW),
            (GuiCursor::ResizeNESW, HostCursor::ResizeNESW),
            (GuiCursor::ResizeNS, HostCursor::ResizeNS),
            (GuiCursor::ResizeNWSE, HostCursor::ResizeNWSE),
            (GuiCursor::NotAllowed, HostCursor::NotAllowed),
        ];
        Self {
            map: pairs.into_iter().collect(),
        }
    }

    /// Translates a cursor, falling back to the host default.
    #[must_use]
    pub fn get(&self, cursor: GuiCursor) -> HostCursor {
        self.map.get(&cursor).copied().unwrap_or_default()
    }
}

/// Gamepad buttons and stick half-axes → GUI gamepad keys.
#[derive(Debug, Clone)]
pub struct GamepadMap {
    buttons: Vec<(GamepadButton, GuiKey)>,
    sticks: Vec<StickMapping>,
}

/// One stick axis split into a negative and a positive GUI key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StickMapping {
    /// Host axis.
    pub axis: GamepadAxis,
    /// Key fired for negative deflection.
    pub negative: GuiKey,
    /// Key fired for positive deflection.
    pub positive: GuiKey,
}

impl Default for GamepadMap {
    fn default() -> Self {
        Self::new()
    }
}

impl GamepadMap {
    /// Builds the gamepad navigation table.
    #[must_use]
    pub fn new() -> Self {
        use GamepadButton as B;
        use GuiKey as G;

        let buttons = vec![
            (B::LeftFaceUp, G::GamepadDpadUp),
            (B::LeftFaceRight, G::GamepadDpadRight),
            (B::LeftFaceDown, G::GamepadDpadDown),
            (B::LeftFaceLeft, G::GamepadDpadLeft),
            (B::RightFaceUp, G::GamepadFaceUp),
            (B::RightFaceRight, G::GamepadFaceRight),
            (B::RightFaceDown, G::GamepadFaceDown),
            (B::RightFaceLeft, G::GamepadFaceLeft),
            (B::LeftTrigger1, G::GamepadL1),
            (B::RightTrigger1, G::GamepadR1),
            (B::LeftTrigger2, G::GamepadL2),
            (B::RightTrigger2, G::GamepadR2),
            (B::LeftThumb, G::GamepadL3),
            (B::RightThumb, G::GamepadR3),
            (B::MiddleLeft, G::GamepadBack),
            (B::MiddleRight, G::GamepadStart),
        ];

        let sticks = vec![
            StickMapping {
                axis: GamepadAxis::LeftX,
                negative: G::GamepadLStickLeft,
                positive: G::GamepadLStickRight,
            },
            StickMapping {
                axis: GamepadAxis::LeftY,
                negative: G::GamepadLStickUp,
                positive: G::GamepadLStickDown,
            },
            StickMapping {
                axis: GamepadAxis::RightX,
                negative: G::GamepadRStickLeft,
                positive: G::GamepadRStickRight,
            },
            StickMapping {
                axis: GamepadAxis::RightY,
                negative: G::GamepadRStickUp,
                positive: G::GamepadRStickDown,
            },
        ];

        Self { buttons, sticks }
    }

    /// Button mappings in a stable order.
    #[must_use]
    pub fn buttons(&self) -> &[(GamepadButton, GuiKey)] {
        &self.buttons
    }

    /// Stick mappings in a stable order.
    #[must_use]
    pub fn sticks(&self) -> &[StickMapping] {
        &self.sticks
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn test_every_mapped_key_has_one_target() {
        let map = KeyMap::new();
        let targets: HashSet<GuiKey> = map.iter().map(|(_, g)| g).collect();
        // no two host keys share a GUI key
        assert_eq!(targets.len(), map.len());
        for (host, gui) in map.iter() {
            assert_eq!(map.get(host), Some(gui));
            assert!(!gui.is_modifier());
            assert!(!gui.is_gamepad());
        }
    }

    #[test]
    fn test_unmapped_keys() {
        let map = KeyMap::new();
        assert_eq!(map.get(HostKey::Back), None);
        assert_eq!(map.get(HostKey::VolumeUp), None);
        assert_eq!(map.get(HostKey::VolumeDown), None);
        assert_eq!(map.len(), HostKey::ALL.len() - 3);
    }

    #[test]
    fn test_arrow_keys() {
        let map = KeyMap::new();
        assert_eq!(map.get(HostKey::Left), Some(GuiKey::LeftArrow));
        assert_eq!(map.get(HostKey::Grave), Some(GuiKey::GraveAccent));
        assert_eq!(map.get(HostKey::LeftControl), Some(GuiKey::LeftCtrl));
    }

    #[test]
    fn test_cursor_fallback() {
        let map = CursorMap::new();
        assert_eq!(map.get(GuiCursor::TextInput), HostCursor::IBeam);
        assert_eq!(map.get(GuiCursor::None), HostCursor::Default);
    }

    #[test]
    fn test_gamepad_map_is_injective() {
        let map = GamepadMap::new();
        let mut keys: HashSet<GuiKey> = map.buttons().iter().map(|(_, k)| *k).collect();
        assert_eq!(keys.len(), map.buttons().len());
        for stick in map.sticks() {
            assert!(keys.insert(stick.negative));
            assert!(keys.insert(stick.positive));
        }
        assert!(keys.iter().all(|k| k.is_gamepad()));
    }
}
