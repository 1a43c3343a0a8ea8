//! Host-side input identifiers.
//!
//! These mirror what a lightweight game framework exposes: physical keyboard
//! keys, mouse buttons, hardware cursor shapes and gamepad controls.

/// A physical keyboard key as reported by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[allow(missing_docs)]
pub enum HostKey {
    Apostrophe,
    Comma,
    Minus,
    Period,
    Slash,
    Zero,
    One,
    Two,
    Three,
    Four,
    Five,
    Six,
    Seven,
    Eight,
    Nine,
    Semicolon,
    Equal,
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
    Space,
    Escape,
    Enter,
    Tab,
    Backspace,
    Insert,
    Delete,
    Right,
    Left,
    Down,
    Up,
    PageUp,
    PageDown,
    Home,
    End,
    CapsLock,
    ScrollLock,
    NumLock,
    PrintScreen,
    Pause,
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
    LeftShift,
    LeftControl,
    LeftAlt,
    LeftSuper,
    RightShift,
    RightControl,
    RightAlt,
    RightSuper,
    KbMenu,
    LeftBracket,
    Backslash,
    RightBracket,
    Grave,
    Kp0,
    Kp1,
    Kp2,
    Kp3,
    Kp4,
    Kp5,
    Kp6,
    Kp7,
    Kp8,
    Kp9,
    KpDecimal,
    KpDivide,
    KpMultiply,
    KpSubtract,
    KpAdd,
    KpEnter,
    KpEqual,
    // Android/media keys; the GUI has no counterpart for these.
    Back,
    VolumeUp,
    VolumeDown,
}

impl HostKey {
    /// Every key the host can report.
    pub const ALL: &'static [HostKey] = &[
        Self::Apostrophe,
        Self::Comma,
        Self::Minus,
        Self::Period,
        Self::Slash,
        Self::Zero,
        Self::One,
        Self::Two,
        Self::Three,
        Self::Four,
        Self::Five,
        Self::Six,
        Self::Seven,
        Self::Eight,
        Self::Nine,
        Self::Semicolon,
        Self::Equal,
        Self::A,
        Self::B,
        Self::C,
        Self::D,
        Self::E,
        Self::F,
        Self::G,
        Self::H,
        Self::I,
        Self::J,
        Self::K,
        Self::L,
        Self::M,
        Self::N,
        Self::O,
        Self::P,
        Self::Q,
        Self::R,
        Self::S,
        Self::T,
        Self::U,
        Self::V,
        Self::W,
        Self::X,
        Self::Y,
        Self::Z,
        Self::Space,
        Self::Escape,
        Self::Enter,
        Self::Tab,
        Self::Backspace,
        Self::Insert,
        Self::Delete,
        Self::Right,
        Self::Left,
        Self::Down,
        Self::Up,
        Self::PageUp,
        Self::PageDown,
        Self::Home,
        Self::End,
        Self::CapsLock,
        Self::ScrollLock,
        Self::NumLock,
        Self::PrintScreen,
        Self::Pause,
        Self::F1,
        Self::F2,
        Self::F3,
        Self::F4,
        Self::F5,
        Self::F6,
        Self::F7,
        Self::F8,
        Self::F9,
        Self::F10,
        Self::F11,
        Self::F12,
        Self::LeftShift,
        Self::LeftControl,
        Self::LeftAlt,
        Self::LeftSuper,
        Self::RightShift,
        Self::RightControl,
        Self::RightAlt,
        Self::RightSuper,
        Self::KbMenu,
        Self::LeftBracket,
        Self::Backslash,
        Self::RightBracket,
        Self::Grave,
        Self::Kp0,
        Self::Kp1,
        Self::Kp2,
        Self::Kp3,
        Self::Kp4,
        Self::Kp5,
        Self::Kp6,
        Self::Kp7,
        Self::Kp8,
        Self::Kp9,
        Self::KpDecimal,
        Self::KpDivide,
        Self::KpMultiply,
        Self::KpSubtract,
        Self::KpAdd,
        Self::KpEnter,
        Self::KpEqual,
        Self::Back,
        Self::VolumeUp,
        Self::VolumeDown,
    ];
}

/// A mouse button as reported by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HostMouseButton {
    /// Left button.
    Left,
    /// Right button.
    Right,
    /// Middle button (wheel click).
    Middle,
    /// Side button.
    Side,
    /// Extra button.
    Extra,
    /// Forward navigation button.
    Forward,
    /// Back navigation button.
    Back,
}

/// Hardware cursor shapes the host can display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum HostCursor {
    /// Platform default cursor.
    #[default]
    Default,
    /// Arrow.
    Arrow,
    /// Text insertion beam.
    IBeam,
    /// Crosshair.
    Crosshair,
    /// Pointing hand.
    PointingHand,
    /// Horizontal resize.
    ResizeEW,
    /// Vertical resize.
    ResizeNS,
    /// Diagonal resize, top-left to bottom-right.
    ResizeNWSE,
    /// Diagonal resize, top-right to bottom-left.
    ResizeNESW,
    /// Omnidirectional move.
    ResizeAll,
    /// Operation not allowed.
    NotAllowed,
}

/// Gamepad buttons, named by position rather than by vendor label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[allow(missing_docs)]
pub enum GamepadButton {
    LeftFaceUp,
    LeftFaceRight,
    LeftFaceDown,
    LeftFaceLeft,
    RightFaceUp,
    RightFaceRight,
    RightFaceDown,
    RightFaceLeft,
    LeftTrigger1,
    LeftTrigger2,
    RightTrigger1,
    RightTrigger2,
    /// Select / back / view.
    MiddleLeft,
    /// Guide / home.
    Middle,
    /// Start / menu.
    MiddleRight,
    LeftThumb,
    RightThumb,
}

/// Gamepad analog axes. Values range over `[-1, 1]`; Y grows downwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[allow(missing_docs)]
pub enum GamepadAxis {
    LeftX,
    LeftY,
    RightX,
    RightY,
    LeftTrigger,
    RightTrigger,
}
