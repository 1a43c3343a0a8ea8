//! Configuration options for the bridge.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::Result;

/// Default dead zone applied to analog stick half-axes.
pub const DEFAULT_GAMEPAD_DEAD_ZONE: f32 = 0.20;

/// Default number of vertices a host batch holds before it must be flushed.
pub const DEFAULT_BATCH_VERTEX_CAPACITY: usize = 8192;

/// Bridge and window configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BridgeOptions {
    /// Color theme applied to the GUI at setup.
    pub theme: Theme,

    /// Whether the GUI docking feature is requested.
    pub docking: bool,

    /// Whether gamepad navigation is forwarded to the GUI.
    pub nav_gamepad: bool,

    /// When set, the bridge never touches the host cursor shape or visibility.
    pub no_mouse_cursor_change: bool,

    /// Ask the GUI to draw a software cursor (the hardware cursor is hidden).
    pub mouse_draw_cursor: bool,

    /// Analog stick dead zone, as a fraction of full deflection.
    pub gamepad_dead_zone: f32,

    /// Window title used by the runner.
    pub window_title: String,

    /// Initial window width in logical pixels.
    pub window_width: u32,

    /// Initial window height in logical pixels.
    pub window_height: u32,

    /// Frame rate cap (0 = unlimited, vsync only).
    pub target_fps: u32,

    /// Host batch capacity in vertices.
    pub batch_vertex_capacity: usize,
}

impl Default for BridgeOptions {
    fn default() -> Self {
        Self {
            theme: Theme::Dark,
            docking: false,
            nav_gamepad: false,
            no_mouse_cursor_change: false,
            mouse_draw_cursor: false,
            gamepad_dead_zone: DEFAULT_GAMEPAD_DEAD_ZONE,
            window_title: "imbridge".to_string(),
            window_width: 1280,
            window_height: 800,
            target_fps: 144,
            batch_vertex_capacity: DEFAULT_BATCH_VERTEX_CAPACITY,
        }
    }
}

impl BridgeOptions {
    /// Parses options from a JSON document. Missing fields take their defaults.
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Loads options from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    /// Serializes the options as pretty-printed JSON.
    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Sets the theme.
    #[must_use]
    pub fn with_theme(mut self, theme: Theme) -> Self {
        self.theme = theme;
        self
    }

    /// Enables or disables docking.
    #[must_use]
    pub fn with_docking(mut self, docking: bool) -> Self {
        self.docking = docking;
        self
    }

    /// Enables or disables gamepad navigation.
    #[must_use]
    pub fn with_nav_gamepad(mut self, enabled: bool) -> Self {
        self.nav_gamepad = enabled;
        self
    }

    /// Sets the window title.
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.window_title = title.into();
        self
    }

    /// Sets the initial window size.
    #[must_use]
    pub fn with_window_size(mut self, width: u32, height: u32) -> Self {
        self.window_width = width;
        self.window_height = height;
        self
    }
}

/// GUI color theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Theme {
    /// Dark theme (default).
    #[default]
    Dark,
    /// Light theme.
    Light,
}
