//! [`GuiBackend`] implementation over an [`egui::Context`].
//!
//! Events are collected into an [`egui::RawInput`] between frames. A frame is
//! one egui pass; its shapes are tessellated into a single [`DrawList`].
//! egui's font texture (`TextureId::Managed(0)`) is tracked from the texture
//! deltas and handed to the bridge as an RGBA32 atlas with premultiplied
//! white texels.

use std::collections::HashSet;
use std::sync::Arc;

use glam::Vec2;
use imbridge_core::{
    pack_color, ClipRect, DrawCallback, DrawData, DrawList, DrawVert, FontAtlasImage, GuiBackend,
    GuiConfig, GuiCursor, GuiEvent, GuiKey, GuiMouseButton, IconFont, Result, TextureId, Theme,
};

const FONT_TEXTURE: egui::TextureId = egui::TextureId::Managed(0);

/// Wraps a [`DrawCallback`] so it can be painted as an egui shape.
pub fn paint_callback(rect: egui::Rect, callback: DrawCallback) -> egui::PaintCallback {
    egui::PaintCallback {
        rect,
        callback: Arc::new(callback),
    }
}

/// The egui key for a GUI key, if egui has one.
///
/// Gamepad navigation keys map onto the keyboard navigation keys.
pub fn egui_key(key: GuiKey) -> Option<egui::Key> {
    use egui::Key as K;
    let key = match key {
        GuiKey::Tab => K::Tab,
        GuiKey::LeftArrow
        | GuiKey::GamepadDpadLeft
        | GuiKey::GamepadLStickLeft
        | GuiKey::GamepadRStickLeft => K::ArrowLeft,
        GuiKey::RightArrow
        | GuiKey::GamepadDpadRight
        | GuiKey::GamepadLStickRight
        | GuiKey::GamepadRStickRight => K::ArrowRight,
        GuiKey::UpArrow
        | GuiKey::GamepadDpadUp
        | GuiKey::GamepadLStickUp
        | GuiKey::GamepadRStickUp => K::ArrowUp,
        GuiKey::DownArrow
        | GuiKey::GamepadDpadDown
        | GuiKey::GamepadLStickDown
        | GuiKey::GamepadRStickDown => K::ArrowDown,
        GuiKey::PageUp => K::PageUp,
        GuiKey::PageDown => K::PageDown,
        GuiKey::Home => K::Home,
        GuiKey::End => K::End,
        GuiKey::Insert => K::Insert,
        GuiKey::Delete => K::Delete,
        GuiKey::Backspace => K::Backspace,
        GuiKey::Space => K::Space,
        GuiKey::Enter | GuiKey::KeypadEnter | GuiKey::GamepadFaceDown => K::Enter,
        GuiKey::Escape | GuiKey::GamepadFaceRight => K::Escape,
        GuiKey::Num0 | GuiKey::Keypad0 => K::Num0,
        GuiKey::Num1 | GuiKey::Keypad1 => K::Num1,
        GuiKey::Num2 | GuiKey::Keypad2 => K::Num2,
        GuiKey::Num3 | GuiKey::Keypad3 => K::Num3,
        GuiKey::Num4 | GuiKey::Keypad4 => K::Num4,
        GuiKey::Num5 | GuiKey::Keypad5 => K::Num5,
        GuiKey::Num6 | GuiKey::Keypad6 => K::Num6,
        GuiKey::Num7 | GuiKey::Keypad7 => K::Num7,
        GuiKey::Num8 | GuiKey::Keypad8 => K::Num8,
        GuiKey::Num9 | GuiKey::Keypad9 => K::Num9,
        GuiKey::A => K::A,
        GuiKey::B => K::B,
        GuiKey::C => K::C,
        GuiKey::D => K::D,
        GuiKey::E => K::E,
        GuiKey::F => K::F,
        GuiKey::G => K::G,
        GuiKey::H => K::H,
        GuiKey::I => K::I,
        GuiKey::J => K::J,
        GuiKey::K => K::K,
        GuiKey::L => K::L,
        GuiKey::M => K::M,
        GuiKey::N => K::N,
        GuiKey::O => K::O,
        GuiKey::P => K::P,
        GuiKey::Q => K::Q,
        GuiKey::R => K::R,
        GuiKey::S => K::S,
        GuiKey::T => K::T,
        GuiKey::U => K::U,
        GuiKey::V => K::V,
        GuiKey::W => K::W,
        GuiKey::X => K::X,
        GuiKey::Y => K::Y,
        GuiKey::Z => K::Z,
        GuiKey::F1 => K::F1,
        GuiKey::F2 => K::F2,
        GuiKey::F3 => K::F3,
        GuiKey::F4 => K::F4,
        GuiKey::F5 => K::F5,
        GuiKey::F6 => K::F6,
        GuiKey::F7 => K::F7,
        GuiKey::F8 => K::F8,
        GuiKey::F9 => K::F9,
        GuiKey::F10 => K::F10,
        GuiKey::F11 => K::F11,
        GuiKey::F12 => K::F12,
        GuiKey::Apostrophe => K::Quote,
        GuiKey::Comma => K::Comma,
        GuiKey::Minus | GuiKey::KeypadSubtract => K::Minus,
        GuiKey::Period | GuiKey::KeypadDecimal => K::Period,
        GuiKey::Slash | GuiKey::KeypadDivide => K::Slash,
        GuiKey::Semicolon => K::Semicolon,
        GuiKey::Equal | GuiKey::KeypadEqual => K::Equals,
        GuiKey::KeypadAdd => K::Plus,
        GuiKey::LeftBracket => K::OpenBracket,
        GuiKey::Backslash => K::Backslash,
        GuiKey::RightBracket => K::CloseBracket,
        GuiKey::GraveAccent => K::Backtick,
        _ => return None,
    };
    Some(key)
}

/// The cursor shape for an egui cursor icon.
pub fn gui_cursor(icon: egui::CursorIcon) -> GuiCursor {
    use egui::CursorIcon as C;
    match icon {
        C::None => GuiCursor::None,
        C::Text | C::VerticalText => GuiCursor::TextInput,
        C::Move | C::AllScroll | C::Grab | C::Grabbing => GuiCursor::ResizeAll,
        C::ResizeVertical | C::ResizeRow | C::ResizeNorth | C::ResizeSouth => GuiCursor::ResizeNS,
        C::ResizeHorizontal | C::ResizeColumn | C::ResizeEast | C::ResizeWest => {
            GuiCursor::ResizeEW
        }
        C::ResizeNeSw | C::ResizeNorthEast | C::ResizeSouthWest => GuiCursor::ResizeNESW,
        C::ResizeNwSe | C::ResizeNorthWest | C::ResizeSouthEast => GuiCursor::ResizeNWSE,
        C::PointingHand => GuiCursor::Hand,
        C::NotAllowed | C::NoDrop => GuiCursor::NotAllowed,
        _ => GuiCursor::Arrow,
    }
}

fn pointer_button(button: GuiMouseButton) -> egui::PointerButton {
    match button {
        GuiMouseButton::Left => egui::PointerButton::Primary,
        GuiMouseButton::Right => egui::PointerButton::Secondary,
        GuiMouseButton::Middle => egui::PointerButton::Middle,
        GuiMouseButton::Extra1 => egui::PointerButton::Extra1,
        GuiMouseButton::Extra2 => egui::PointerButton::Extra2,
    }
}

/// Gamma egui applies to glyph coverage before upload.
const COVERAGE_GAMMA: f32 = 0.55;

/// Premultiplied white with alpha from glyph coverage.
fn coverage_to_rgba(coverage: &[f32]) -> Vec<u8> {
    coverage
        .iter()
        .flat_map(|&c| {
            let v = (c.clamp(0.0, 1.0).powf(COVERAGE_GAMMA) * 255.0 + 0.5) as u8;
            [v, v, v, v]
        })
        .collect()
}

/// An egui context driven by the bridge.
pub struct EguiBackend {
    ctx: egui::Context,
    raw_input: egui::RawInput,
    config: GuiConfig,
    fonts: egui::FontDefinitions,
    fonts_pending: bool,
    fonts_dirty: bool,
    font_texture: TextureId,
    atlas: Option<FontAtlasImage>,
    wanted_mouse_pos: Option<Vec2>,
    cursor: GuiCursor,
    pointer_pos: egui::Pos2,
    modifiers: egui::Modifiers,
    analog_down: HashSet<GuiKey>,
    warned_textures: HashSet<egui::TextureId>,
    copied_text: Option<String>,
    time: f64,
    frame_open: bool,
}

impl Default for EguiBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl EguiBackend {
    /// Creates a backend over a fresh context.
    pub fn new() -> Self {
        Self::with_context(egui::Context::default())
    }

    /// Creates a backend over an existing context.
    pub fn with_context(ctx: egui::Context) -> Self {
        Self {
            ctx,
            raw_input: egui::RawInput::default(),
            config: GuiConfig::default(),
            fonts: egui::FontDefinitions::default(),
            fonts_pending: false,
            fonts_dirty: false,
            font_texture: TextureId::NONE,
            atlas: None,
            wanted_mouse_pos: None,
            cursor: GuiCursor::Arrow,
            pointer_pos: egui::Pos2::ZERO,
            modifiers: egui::Modifiers::default(),
            analog_down: HashSet::new(),
            warned_textures: HashSet::new(),
            copied_text: None,
            time: 0.0,
            frame_open: false,
        }
    }

    /// The egui context. GUI code for the current frame goes through it.
    pub fn context(&self) -> &egui::Context {
        &self.ctx
    }

    /// Adds a font and appends it to the fallbacks of `family`.
    pub fn add_font(&mut self, name: &str, data: Vec<u8>, family: egui::FontFamily) {
        self.fonts
            .font_data
            .insert(name.to_owned(), egui::FontData::from_owned(data).into());
        let fallbacks = self.fonts.families.entry(family).or_default();
        if !fallbacks.iter().any(|f| f == name) {
            fallbacks.push(name.to_owned());
        }
        self.ctx.set_fonts(self.fonts.clone());
        self.fonts_pending = true;
    }

    fn push_raw(&mut self, event: egui::Event) {
        self.raw_input.events.push(event);
    }

    fn key_event(&mut self, key: GuiKey, down: bool, repeat: bool) {
        match key {
            GuiKey::ModCtrl => self.modifiers.ctrl = down,
            GuiKey::ModShift => self.modifiers.shift = down,
            GuiKey::ModAlt => self.modifiers.alt = down,
            GuiKey::ModSuper => {
                if cfg!(target_os = "macos") {
                    self.modifiers.mac_cmd = down;
                }
            }
            _ => {
                let Some(egui_key) = egui_key(key) else {
                    log::trace!("no egui key for {key:?}");
                    return;
                };
                if down && self.modifiers.command {
                    match egui_key {
                        egui::Key::C => self.push_raw(egui::Event::Copy),
                        egui::Key::X => self.push_raw(egui::Event::Cut),
                        _ => {}
                    }
                }
                self.push_raw(egui::Event::Key {
                    key: egui_key,
                    physical_key: None,
                    pressed: down,
                    repeat,
                    modifiers: self.modifiers,
                });
                return;
            }
        }
        self.modifiers.command = if cfg!(target_os = "macos") {
            self.modifiers.mac_cmd
        } else {
            self.modifiers.ctrl
        };
    }

    fn apply_textures(&mut self, delta: &egui::TexturesDelta) {
        for (id, image_delta) in &delta.set {
            if *id != FONT_TEXTURE {
                if self.warned_textures.insert(*id) {
                    log::warn!("egui texture {id:?} is not backed by a host texture");
                }
                continue;
            }
            self.patch_atlas(image_delta);
            self.fonts_dirty = true;
        }
    }

    #[allow(unreachable_patterns)]
    fn patch_atlas(&mut self, delta: &egui::epaint::ImageDelta) {
        let (size, pixels) = match &delta.image {
            egui::ImageData::Font(font) => (font.size, coverage_to_rgba(&font.pixels)),
            egui::ImageData::Color(color) => (
                color.size,
                color.pixels.iter().flat_map(|c| c.to_array()).collect(),
            ),
            _ => {
                log::warn!("unsupported font image format");
                return;
            }
        };
        let [width, height] = size;

        match (delta.pos, self.atlas.as_mut()) {
            (Some([x, y]), Some(atlas)) => {
                let stride = atlas.width as usize * FontAtlasImage::BYTES_PER_PIXEL;
                let row = width * FontAtlasImage::BYTES_PER_PIXEL;
                for r in 0..height {
                    let dst = (y + r) * stride + x * FontAtlasImage::BYTES_PER_PIXEL;
                    let src = r * row;
                    if let (Some(dst), Some(src)) =
                        (atlas.pixels.get_mut(dst..dst + row), pixels.get(src..src + row))
                    {
                        dst.copy_from_slice(src);
                    }
                }
            }
            (Some(_), None) => log::warn!("partial font atlas update before the full atlas"),
            (None, _) => {
                self.atlas = Some(FontAtlasImage {
                    width: width as u32,
                    height: height as u32,
                    pixels,
                });
            }
        }
    }

    fn texture_for(&mut self, id: egui::TextureId) -> TextureId {
        match id {
            FONT_TEXTURE => self.font_texture,
            egui::TextureId::User(raw) => TextureId::from_raw(raw),
            other => {
                if self.warned_textures.insert(other) {
                    log::warn!("drawing unsupported egui texture {other:?} untextured");
                }
                TextureId::NONE
            }
        }
    }

    fn warm_up(&mut self) {
        let mut input = self.raw_input.clone();
        input.events.clear();
        self.ctx.begin_pass(input);
        let output = self.ctx.end_pass();
        self.apply_textures(&output.textures_delta);
        self.fonts_pending = false;
    }

    fn build_draw_data(
        &mut self,
        primitives: Vec<egui::ClippedPrimitive>,
        screen: egui::Rect,
        ppp: f32,
    ) -> DrawData {
        let mut list = DrawList::default();
        for egui::ClippedPrimitive {
            clip_rect,
            primitive,
        } in primitives
        {
            let clip = clip_rect.intersect(screen);
            let clip = ClipRect::new(
                Vec2::new(clip.min.x, clip.min.y),
                Vec2::new(clip.max.x, clip.max.y),
            );
            match primitive {
                egui::epaint::Primitive::Mesh(mesh) => {
                    if mesh.indices.is_empty() {
                        continue;
                    }
                    let texture = self.texture_for(mesh.texture_id);
                    let vertices: Vec<DrawVert> = mesh
                        .vertices
                        .iter()
                        .map(|v| {
                            let [r, g, b, a] = v.color.to_array();
                            DrawVert::new(
                                Vec2::new(v.pos.x, v.pos.y),
                                Vec2::new(v.uv.x, v.uv.y),
                                pack_color(r, g, b, a),
                            )
                        })
                        .collect();
                    list.push_mesh(&vertices, &mesh.indices, texture, clip);
                }
                egui::epaint::Primitive::Callback(paint) => {
                    match paint.callback.downcast_ref::<DrawCallback>() {
                        Some(callback) => list.push_callback(clip, 0, callback.clone()),
                        None => log::trace!("dropping paint callback of a foreign renderer"),
                    }
                }
            }
        }

        DrawData {
            display_pos: Vec2::new(screen.min.x, screen.min.y),
            display_size: Vec2::new(screen.width(), screen.height()),
            framebuffer_scale: Vec2::splat(ppp),
            lists: vec![list],
        }
    }
}

impl GuiBackend for EguiBackend {
    fn config(&self) -> GuiConfig {
        self.config
    }

    fn set_config(&mut self, config: GuiConfig) {
        self.config = config;
    }

    fn set_theme(&mut self, theme: Theme) {
        self.ctx.set_visuals(match theme {
            Theme::Dark => egui::Visuals::dark(),
            Theme::Light => egui::Visuals::light(),
        });
    }

    fn add_icon_font(&mut self, font: &IconFont) -> Result<()> {
        let tweak = egui::FontTweak {
            scale: font.size_px() / imbridge_core::DEFAULT_ICON_FONT_SIZE,
            ..egui::FontTweak::default()
        };
        self.fonts.font_data.insert(
            font.name().to_owned(),
            egui::FontData::from_owned(font.data().to_vec()).tweak(tweak).into(),
        );
        for family in [egui::FontFamily::Proportional, egui::FontFamily::Monospace] {
            let fallbacks = self.fonts.families.entry(family).or_default();
            if !fallbacks.iter().any(|f| f == font.name()) {
                fallbacks.push(font.name().to_owned());
            }
        }
        self.ctx.set_fonts(self.fonts.clone());
        self.fonts_pending = true;
        Ok(())
    }

    fn set_display(&mut self, display_size: Vec2, framebuffer_scale: Vec2, delta_time: f32) {
        self.raw_input.screen_rect = Some(egui::Rect::from_min_size(
            egui::Pos2::ZERO,
            egui::vec2(display_size.x, display_size.y),
        ));
        self.raw_input
            .viewports
            .entry(egui::ViewportId::ROOT)
            .or_default()
            .native_pixels_per_point = Some(framebuffer_scale.x);
        self.raw_input.predicted_dt = delta_time;
        self.time += f64::from(delta_time);
        self.raw_input.time = Some(self.time);
    }

    fn wanted_mouse_pos(&self) -> Option<Vec2> {
        self.wanted_mouse_pos
    }

    fn push_event(&mut self, event: GuiEvent) {
        match event {
            GuiEvent::MousePos(pos) => {
                self.pointer_pos = egui::pos2(pos.x, pos.y);
                self.push_raw(egui::Event::PointerMoved(self.pointer_pos));
            }
            GuiEvent::MouseButton { button, down } => {
                self.push_raw(egui::Event::PointerButton {
                    pos: self.pointer_pos,
                    button: pointer_button(button),
                    pressed: down,
                    modifiers: self.modifiers,
                });
            }
            GuiEvent::MouseWheel(delta) => {
                if delta != Vec2::ZERO {
                    self.push_raw(egui::Event::MouseWheel {
                        unit: egui::MouseWheelUnit::Line,
                        delta: egui::vec2(delta.x, delta.y),
                        modifiers: self.modifiers,
                    });
                }
            }
            GuiEvent::Key { key, down } => self.key_event(key, down, false),
            GuiEvent::KeyRepeat(key) => self.key_event(key, true, true),
            GuiEvent::KeyAnalog { key, down, .. } => {
                let was_down = self.analog_down.contains(&key);
                if down && !was_down {
                    self.analog_down.insert(key);
                    self.key_event(key, true, false);
                } else if !down && was_down {
                    self.analog_down.remove(&key);
                    self.key_event(key, false, false);
                }
            }
            GuiEvent::Text(c) => self.push_raw(egui::Event::Text(c.to_string())),
            GuiEvent::Paste(text) => {
                if !text.is_empty() {
                    self.push_raw(egui::Event::Paste(text));
                }
            }
            GuiEvent::Focus(focused) => {
                self.raw_input.focused = focused;
                self.push_raw(egui::Event::WindowFocused(focused));
            }
        }
    }

    fn mouse_cursor(&self) -> GuiCursor {
        self.cursor
    }

    fn font_atlas(&mut self) -> Option<FontAtlasImage> {
        if self.frame_open {
            return self.atlas.clone();
        }
        if self.atlas.is_none() || self.fonts_pending {
            self.warm_up();
        }
        self.atlas.clone()
    }

    fn fonts_changed(&self) -> bool {
        self.fonts_dirty || self.fonts_pending
    }

    fn set_font_texture(&mut self, id: TextureId) {
        self.font_texture = id;
        self.fonts_dirty = false;
    }

    fn new_frame(&mut self) {
        if self.frame_open {
            log::warn!("new GUI frame started before the previous one was rendered");
            let _ = self.ctx.end_pass();
        }
        self.wanted_mouse_pos = None;
        self.raw_input.modifiers = self.modifiers;
        let input = self.raw_input.take();
        self.ctx.begin_pass(input);
        self.frame_open = true;
        self.fonts_pending = false;
    }

    fn render(&mut self) -> DrawData {
        let screen = self
            .raw_input
            .screen_rect
            .unwrap_or(egui::Rect::NOTHING);
        if !self.frame_open {
            log::warn!("GUI render requested without an open frame");
            return DrawData {
                display_size: Vec2::new(screen.width().max(0.0), screen.height().max(0.0)),
                ..DrawData::default()
            };
        }
        self.frame_open = false;

        let mut output = self.ctx.end_pass();
        self.apply_textures(&output.textures_delta);

        for command in std::mem::take(&mut output.platform_output.commands) {
            match command {
                egui::OutputCommand::CopyText(text) => self.copied_text = Some(text),
                egui::OutputCommand::CopyImage(_) => {
                    log::debug!("image copy is not supported");
                }
                egui::OutputCommand::OpenUrl(url) => log::debug!("ignoring url {}", url.url),
            }
        }

        self.cursor = gui_cursor(output.platform_output.cursor_icon);
        if let Some(viewport) = output.viewport_output.get(&egui::ViewportId::ROOT) {
            for command in &viewport.commands {
                if let egui::ViewportCommand::CursorPosition(pos) = command {
                    self.wanted_mouse_pos = Some(Vec2::new(pos.x, pos.y));
                }
            }
        }

        let ppp = output.pixels_per_point;
        let primitives = self.ctx.tessellate(output.shapes, ppp);
        self.build_draw_data(primitives, screen, ppp)
    }

    fn take_copied_text(&mut self) -> Option<String> {
        self.copied_text.take()
    }
}
