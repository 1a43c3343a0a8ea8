//! Host input → GUI event translation.
//!
//! [`Platform`] owns the mapping tables and the few bits of state that turn
//! level-triggered host queries into edge-triggered GUI events: last focus,
//! last modifier set, last applied cursor shape, and the active gamepad
//! buttons and stick half-axes.

use glam::Vec2;
use imbridge_core::{
    BridgeOptions, CursorMap, FrameInput, GamepadMap, GuiBackend, GuiConfig, GuiCursor, GuiEvent,
    GuiKey, HostInput, KeyMap, Modifiers, MOUSE_BUTTONS,
};

/// Gamepad index read for navigation.
pub const NAV_GAMEPAD: usize = 0;

/// Display size and framebuffer scale for the current frame.
///
/// Fullscreen windows report the monitor size. The scale is the framebuffer
/// to display ratio, or 1:1 when either size is unknown.
pub fn display_metrics(host: &dyn HostInput) -> (Vec2, Vec2) {
    let display = if host.is_fullscreen() {
        host.monitor_size()
    } else {
        host.screen_size()
    };
    let framebuffer = host.framebuffer_size();
    let scale = if framebuffer.x > 0.0 && framebuffer.y > 0.0 && display.x > 0.0 && display.y > 0.0
    {
        framebuffer / display
    } else {
        Vec2::ONE
    };
    (display, scale)
}

/// Analog event for one stick half-axis.
///
/// `deflection` is the axis value signed towards this half-axis. While it
/// exceeds `dead_zone` the half-axis is active and reports its magnitude,
/// clamped to 1. Leaving the active state reports a single release.
pub fn half_axis_event(
    key: GuiKey,
    deflection: f32,
    dead_zone: f32,
    active: &mut bool,
) -> Option<GuiEvent> {
    if deflection > dead_zone {
        *active = true;
        Some(GuiEvent::KeyAnalog {
            key,
            down: true,
            value: deflection.min(1.0),
        })
    } else if *active {
        *active = false;
        Some(GuiEvent::KeyAnalog {
            key,
            down: false,
            value: 0.0,
        })
    } else {
        None
    }
}

/// Per-bridge input translation state.
#[derive(Debug, Clone)]
pub struct Platform {
    key_map: KeyMap,
    cursor_map: CursorMap,
    gamepad_map: GamepadMap,
    dead_zone: f32,
    last_focused: bool,
    last_modifiers: Modifiers,
    last_cursor: Option<GuiCursor>,
    pad_buttons: Vec<bool>,
    stick_active: Vec<[bool; 2]>,
}

impl Platform {
    /// Builds the tables and captures the initial focus state.
    pub fn new(options: &BridgeOptions, host: &dyn HostInput) -> Self {
        let gamepad_map = GamepadMap::new();
        let pad_buttons = vec![false; gamepad_map.buttons().len()];
        let stick_active = vec![[false; 2]; gamepad_map.sticks().len()];
        Self {
            key_map: KeyMap::new(),
            cursor_map: CursorMap::new(),
            gamepad_map,
            dead_zone: options.gamepad_dead_zone.clamp(0.0, 1.0),
            last_focused: host.is_window_focused(),
            last_modifiers: Modifiers::default(),
            last_cursor: None,
            pad_buttons,
            stick_active,
        }
    }

    /// The keyboard table.
    pub fn key_map(&self) -> &KeyMap {
        &self.key_map
    }

    /// The cursor table.
    pub fn cursor_map(&self) -> &CursorMap {
        &self.cursor_map
    }

    /// The gamepad table.
    pub fn gamepad_map(&self) -> &GamepadMap {
        &self.gamepad_map
    }

    /// Samples the host and feeds one frame of events to the GUI.
    ///
    /// A negative `delta_time` uses the host frame time.
    pub fn new_frame<G: GuiBackend + ?Sized>(
        &mut self,
        gui: &mut G,
        host: &mut dyn HostInput,
        delta_time: f32,
    ) {
        let (display, scale) = display_metrics(host);
        let dt = if delta_time >= 0.0 {
            delta_time
        } else {
            host.frame_time()
        };
        gui.set_display(display, scale, dt);

        if let Some(text) = gui.take_copied_text() {
            host.set_clipboard_text(&text);
        }

        let input = FrameInput::capture(host, &self.key_map);
        let config = gui.config();

        match gui.wanted_mouse_pos() {
            Some(pos) => host.set_mouse_position(pos),
            None => gui.push_event(GuiEvent::MousePos(input.mouse_position)),
        }

        for (edge, (_, button)) in input.buttons.iter().zip(MOUSE_BUTTONS) {
            for &down in edge.transitions() {
                gui.push_event(GuiEvent::MouseButton { button, down });
            }
        }
        gui.push_event(GuiEvent::MouseWheel(input.wheel));

        self.update_cursor(gui.mouse_cursor(), config, host);
        self.frame_events(gui, &input);

        if config.nav_gamepad {
            self.gamepad_events(gui, host);
        }
    }

    fn update_cursor(&mut self, cursor: GuiCursor, config: GuiConfig, host: &mut dyn HostInput) {
        if config.no_mouse_cursor_change {
            return;
        }
        if self.last_cursor == Some(cursor) && !config.mouse_draw_cursor {
            return;
        }
        self.last_cursor = Some(cursor);
        if config.mouse_draw_cursor || cursor == GuiCursor::None {
            host.hide_cursor();
        } else {
            host.show_cursor();
            host.set_mouse_cursor(self.cursor_map.get(cursor));
        }
    }

    fn frame_events<G: GuiBackend + ?Sized>(&mut self, gui: &mut G, input: &FrameInput) {
        if input.focused != self.last_focused {
            gui.push_event(GuiEvent::Focus(input.focused));
        }
        self.last_focused = input.focused;

        let before = self.last_modifiers.keys();
        for ((key, down), (_, was_down)) in input.modifiers.keys().into_iter().zip(before) {
            if down != was_down {
                gui.push_event(GuiEvent::Key { key, down });
            }
        }
        self.last_modifiers = input.modifiers;

        for &(key, down) in &input.keys {
            gui.push_event(GuiEvent::Key { key, down });
        }
        for &key in &input.repeats {
            gui.push_event(GuiEvent::KeyRepeat(key));
        }
        if let Some(text) = &input.paste {
            gui.push_event(GuiEvent::Paste(text.clone()));
        }
        for &c in &input.text {
            gui.push_event(GuiEvent::Text(c));
        }
    }

    fn gamepad_events<G: GuiBackend + ?Sized>(&mut self, gui: &mut G, host: &dyn HostInput) {
        let available = host.is_gamepad_available(NAV_GAMEPAD);

        for (held, &(button, key)) in self
            .pad_buttons
            .iter_mut()
            .zip(self.gamepad_map.buttons())
        {
            let down = available && host.is_gamepad_button_down(NAV_GAMEPAD, button);
            if down != *held {
                *held = down;
                gui.push_event(GuiEvent::Key { key, down });
            }
        }

        for (active, stick) in self.stick_active.iter_mut().zip(self.gamepad_map.sticks()) {
            let value = if available {
                host.gamepad_axis(NAV_GAMEPAD, stick.axis)
            } else {
                0.0
            };
            let [negative, positive] = active;
            let halves = [(stick.negative, -value, negative), (stick.positive, value, positive)];
            for (key, deflection, state) in halves {
                if let Some(event) = half_axis_event(key, deflection, self.dead_zone, state) {
                    gui.push_event(event);
                }
            }
        }
    }
}
