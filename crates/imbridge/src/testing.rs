//! Recording fakes for the GUI and renderer seams.

use std::collections::HashSet;

use glam::{Mat4, Vec2};
use imbridge_core::{
    DrawData, FontAtlasImage, GuiBackend, GuiConfig, GuiCursor, GuiEvent, IconFont, ScissorRect,
    TextureId, Theme,
};
use imbridge_render::{
    Color, DrawMode, Image, ImmediateRenderer, PixelFormat, RenderError, RenderResult,
    RenderTexture, Texture,
};

/// A GUI that records what the bridge feeds it.
#[derive(Debug, Default)]
pub struct RecordingGui {
    pub events: Vec<GuiEvent>,
    pub config: GuiConfig,
    pub cursor: GuiCursor,
    pub wanted_mouse_pos: Option<Vec2>,
    pub display_size: Vec2,
    pub framebuffer_scale: Vec2,
    pub delta_time: f32,
    pub theme: Option<Theme>,
    pub icon_fonts: Vec<String>,
    pub atlas_size: u32,
    pub fonts_dirty: bool,
    pub font_texture: TextureId,
    pub frames: usize,
    pub draw_data: DrawData,
    pub copied_text: Option<String>,
}

impl GuiBackend for RecordingGui {
    fn config(&self) -> GuiConfig {
        self.config
    }

    fn set_config(&mut self, config: GuiConfig) {
        self.config = config;
    }

    fn set_theme(&mut self, theme: Theme) {
        self.theme = Some(theme);
    }

    fn add_icon_font(&mut self, font: &IconFont) -> imbridge_core::Result<()> {
        self.icon_fonts.push(font.name().to_string());
        self.fonts_dirty = true;
        Ok(())
    }

    fn set_display(&mut self, display_size: Vec2, framebuffer_scale: Vec2, delta_time: f32) {
        self.display_size = display_size;
        self.framebuffer_scale = framebuffer_scale;
        self.delta_time = delta_time;
    }

    fn wanted_mouse_pos(&self) -> Option<Vec2> {
        self.wanted_mouse_pos
    }

    fn push_event(&mut self, event: GuiEvent) {
        self.events.push(event);
    }

    fn mouse_cursor(&self) -> GuiCursor {
        self.cursor
    }

    fn font_atlas(&mut self) -> Option<FontAtlasImage> {
        let size = self.atlas_size.max(1);
        Some(FontAtlasImage {
            width: size,
            height: size,
            pixels: vec![255; (size * size * 4) as usize],
        })
    }

    fn fonts_changed(&self) -> bool {
        self.fonts_dirty
    }

    fn set_font_texture(&mut self, id: TextureId) {
        self.font_texture = id;
        self.fonts_dirty = false;
    }

    fn new_frame(&mut self) {
        self.frames += 1;
    }

    fn render(&mut self) -> DrawData {
        self.draw_data.clone()
    }

    fn take_copied_text(&mut self) -> Option<String> {
        self.copied_text.take()
    }
}

/// One recorded renderer call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Call {
    Flush,
    Begin(DrawMode),
    End,
    Color([f32; 4]),
    TexCoord(Vec2),
    Vertex(Vec2),
    SetTexture(TextureId),
    ScissorOn,
    ScissorOff,
    Scissor(ScissorRect),
    Culling(bool),
}

/// A renderer that records the calls the bridge makes.
#[derive(Debug, Default)]
pub struct RecordingRenderer {
    pub calls: Vec<Call>,
    /// Report a forced flush on every n-th limit check.
    pub flush_every: Option<usize>,
    pub(crate) checks: usize,
    pub(crate) next_id: u64,
    pub(crate) live: HashSet<TextureId>,
    pub unloaded: Vec<TextureId>,
    /// Make texture uploads fail.
    pub fail_loads: bool,
}

impl RecordingRenderer {
    pub fn vertices(&self) -> Vec<Vec2> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                Call::Vertex(v) => Some(*v),
                _ => None,
            })
            .collect()
    }

    pub fn live_textures(&self) -> usize {
        self.live.len()
    }
}

impl ImmediateRenderer for RecordingRenderer {
    fn draw_render_batch_active(&mut self) {
        self.calls.push(Call::Flush);
    }

    fn check_render_batch_limit(&mut self, _vertex_count: usize) -> bool {
        self.checks += 1;
        let flushed = self.flush_every.is_some_and(|n| self.checks % n.max(1) == 0);
        if flushed {
            self.calls.push(Call::Flush);
        }
        flushed
    }

    fn begin(&mut self, mode: DrawMode) {
        self.calls.push(Call::Begin(mode));
    }

    fn end(&mut self) {
        self.calls.push(Call::End);
    }

    fn color4f(&mut self, r: f32, g: f32, b: f32, a: f32) {
        self.calls.push(Call::Color([r, g, b, a]));
    }

    fn tex_coord2f(&mut self, u: f32, v: f32) {
        self.calls.push(Call::TexCoord(Vec2::new(u, v)));
    }

    fn vertex3f(&mut self, x: f32, y: f32, _z: f32) {
        self.calls.push(Call::Vertex(Vec2::new(x, y)));
    }

    fn set_texture(&mut self, id: TextureId) {
        self.calls.push(Call::SetTexture(id));
    }

    fn enable_scissor_test(&mut self) {
        self.calls.push(Call::ScissorOn);
    }

    fn disable_scissor_test(&mut self) {
        self.calls.push(Call::ScissorOff);
    }

    fn scissor(&mut self, rect: ScissorRect) {
        self.calls.push(Call::Scissor(rect));
    }

    fn enable_backface_culling(&mut self) {
        self.calls.push(Call::Culling(true));
    }

    fn disable_backface_culling(&mut self) {
        self.calls.push(Call::Culling(false));
    }

    fn enable_depth_test(&mut self) {}

    fn disable_depth_test(&mut self) {}

    fn projection(&self) -> Mat4 {
        Mat4::IDENTITY
    }

    fn set_projection(&mut self, _projection: Mat4) {}

    fn modelview(&self) -> Mat4 {
        Mat4::IDENTITY
    }

    fn set_modelview(&mut self, _modelview: Mat4) {}

    fn render_size(&self) -> Vec2 {
        Vec2::new(800.0, 600.0)
    }

    fn begin_texture_mode(&mut self, _target: &RenderTexture) {}

    fn end_texture_mode(&mut self) {}

    fn clear_background(&mut self, _color: Color) {}

    fn load_texture(&mut self, image: &Image) -> RenderResult<Texture> {
        if self.fail_loads {
            return Err(RenderError::TextureCreationFailed("upload refused".into()));
        }
        self.next_id += 1;
        let id = TextureId::from_raw(self.next_id);
        self.live.insert(id);
        Ok(Texture {
            id,
            width: image.width,
            height: image.height,
            mipmaps: image.mipmaps,
            format: image.format,
        })
    }

    fn unload_texture(&mut self, texture: &Texture) {
        if self.live.remove(&texture.id) {
            self.unloaded.push(texture.id);
        }
    }

    fn is_texture_ready(&self, texture: &Texture) -> bool {
        self.live.contains(&texture.id)
    }

    fn load_render_texture(&mut self, width: u32, height: u32) -> RenderResult<RenderTexture> {
        if self.fail_loads {
            return Err(RenderError::TextureCreationFailed("target refused".into()));
        }
        self.next_id += 1;
        let id = TextureId::from_raw(self.next_id);
        self.live.insert(id);
        Ok(RenderTexture {
            texture: Texture {
                id,
                width,
                height,
                mipmaps: 1,
                format: PixelFormat::R8G8B8A8,
            },
        })
    }

    fn unload_render_texture(&mut self, target: &RenderTexture) {
        self.unload_texture(&target.texture);
    }
}
