//! The per-frame bridge between a [`GuiBackend`] and the host.

use imbridge_core::{BridgeOptions, GuiBackend, HostInput, IconFont, Result, TextureId};
use imbridge_render::{ImmediateRenderer, Texture};

use crate::draw::{render_draw_data, retarget_texture};
use crate::fonts::FontTexture;
use crate::platform::Platform;

/// Owns the GUI backend, the input translation state and the font texture.
///
/// A frame is [`begin`](Self::begin), the application's GUI code against
/// [`gui_mut`](Self::gui_mut), then [`end`](Self::end) inside the host's
/// drawing block.
pub struct Bridge<G: GuiBackend> {
    gui: G,
    platform: Platform,
    fonts: FontTexture,
    icon_font: Option<IconFont>,
}

impl<G: GuiBackend> Bridge<G> {
    /// Sets up the bridge with the default fonts.
    pub fn setup(
        gui: G,
        options: &BridgeOptions,
        host: &dyn HostInput,
        renderer: &mut dyn ImmediateRenderer,
    ) -> Result<Self> {
        Self::setup_with(gui, options, None, host, renderer, |_| Ok(()))
    }

    /// Sets up the bridge, merging `icon_font` into the default font and
    /// running `user_fonts` before the first atlas upload.
    pub fn setup_with(
        mut gui: G,
        options: &BridgeOptions,
        icon_font: Option<IconFont>,
        host: &dyn HostInput,
        renderer: &mut dyn ImmediateRenderer,
        user_fonts: impl FnOnce(&mut G) -> Result<()>,
    ) -> Result<Self> {
        let platform = Platform::new(options, host);

        gui.set_theme(options.theme);
        let mut config = gui.config();
        config.docking = options.docking;
        config.nav_gamepad = options.nav_gamepad;
        config.no_mouse_cursor_change = options.no_mouse_cursor_change;
        config.mouse_draw_cursor = options.mouse_draw_cursor;
        gui.set_config(config);

        if let Some(font) = &icon_font {
            gui.add_icon_font(font)?;
            log::debug!(
                "merged icon font {} covering {:x?}",
                font.name(),
                font.ranges()
            );
        }
        user_fonts(&mut gui)?;

        let mut fonts = FontTexture::new();
        fonts.reload(&mut gui, renderer)?;

        log::info!(
            "bridge set up ({:?} theme, docking {}, gamepad navigation {})",
            options.theme,
            options.docking,
            options.nav_gamepad
        );
        Ok(Self {
            gui,
            platform,
            fonts,
            icon_font,
        })
    }

    /// The GUI backend.
    pub fn gui(&self) -> &G {
        &self.gui
    }

    /// The GUI backend, mutably.
    pub fn gui_mut(&mut self) -> &mut G {
        &mut self.gui
    }

    /// The input translation state.
    pub fn platform(&self) -> &Platform {
        &self.platform
    }

    /// The uploaded font atlas.
    pub fn font_texture(&self) -> &Texture {
        self.fonts.texture()
    }

    /// The merged icon font, if any.
    pub fn icon_font(&self) -> Option<&IconFont> {
        self.icon_font.as_ref()
    }

    /// Starts a GUI frame using the host frame time.
    pub fn begin(&mut self, host: &mut dyn HostInput) {
        self.begin_with_delta(host, -1.0);
    }

    /// Starts a GUI frame. A negative `delta_time` uses the host frame time.
    pub fn begin_with_delta(&mut self, host: &mut dyn HostInput, delta_time: f32) {
        self.platform.new_frame(&mut self.gui, host, delta_time);
        self.gui.new_frame();
    }

    /// Finishes the GUI frame and draws it.
    ///
    /// A font atlas that changed during the frame is uploaded before drawing.
    pub fn end(&mut self, renderer: &mut dyn ImmediateRenderer) -> Result<()> {
        let mut data = self.gui.render();
        if self.gui.fonts_changed() {
            let previous = self.fonts.id();
            let current = self.fonts.reload(&mut self.gui, renderer)?;
            retarget_texture(&mut data, previous, current);
        }
        render_draw_data(renderer, &data);
        Ok(())
    }

    /// Rebuilds and re-uploads the font atlas.
    pub fn reload_fonts(&mut self, renderer: &mut dyn ImmediateRenderer) -> Result<TextureId> {
        self.fonts.reload(&mut self.gui, renderer)
    }

    /// Releases the font texture and the icon glyph ranges, returning the GUI backend.
    pub fn shutdown(mut self, renderer: &mut dyn ImmediateRenderer) -> G {
        self.fonts.unload(renderer);
        if let Some(font) = self.icon_font.take() {
            log::debug!("released icon font {}", font.name());
        }
        log::info!("bridge shut down");
        self.gui
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{Call, RecordingGui, RecordingRenderer};
    use glam::Vec2;
    use imbridge_core::{ClipRect, DrawData, DrawList, DrawVert, InputState, Theme};

    fn host() -> InputState {
        InputState::new(Vec2::new(640.0, 480.0))
    }

    #[test]
    fn test_setup_applies_options() {
        let options = BridgeOptions::default()
            .with_theme(Theme::Light)
            .with_docking(true)
            .with_nav_gamepad(true);
        let mut renderer = RecordingRenderer::default();
        let bridge = Bridge::setup(RecordingGui::default(), &options, &host(), &mut renderer).unwrap();

        let gui = bridge.gui();
        assert_eq!(gui.theme, Some(Theme::Light));
        assert!(gui.config.docking);
        assert!(gui.config.nav_gamepad);
        assert!(!gui.font_texture.is_none());
        assert_eq!(gui.font_texture, bridge.font_texture().id);
    }

    #[test]
    fn test_user_fonts_run_before_upload() {
        let mut renderer = RecordingRenderer::default();
        let bridge = Bridge::setup_with(
            RecordingGui::default(),
            &BridgeOptions::default(),
            None,
            &host(),
            &mut renderer,
            |gui| {
                assert!(gui.font_texture.is_none());
                gui.atlas_size = 16;
                Ok(())
            },
        )
        .unwrap();
        assert_eq!(bridge.font_texture().width, 16);
    }

    #[test]
    fn test_changed_fonts_are_reuploaded_before_drawing() {
        let mut renderer = RecordingRenderer::default();
        let mut host = host();
        let mut bridge = Bridge::setup(
            RecordingGui::default(),
            &BridgeOptions::default(),
            &host,
            &mut renderer,
        )
        .unwrap();
        let old = bridge.font_texture().id;

        let mut list = DrawList::default();
        let v = DrawVert::new(Vec2::ZERO, Vec2::ZERO, u32::MAX);
        list.push_mesh(&[v, v, v], &[0, 1, 2], old, ClipRect::default());
        bridge.gui_mut().draw_data = DrawData {
            display_size: Vec2::new(640.0, 480.0),
            lists: vec![list],
            ..DrawData::default()
        };
        bridge.gui_mut().fonts_dirty = true;

        bridge.begin(&mut host);
        bridge.end(&mut renderer).unwrap();

        let new = bridge.font_texture().id;
        assert_ne!(old, new);
        assert_eq!(renderer.unloaded, vec![old]);
        assert!(renderer.calls.contains(&Call::SetTexture(new)));
        assert!(!renderer.calls.contains(&Call::SetTexture(old)));
    }

    #[test]
    fn test_shutdown_releases_font_texture() {
        let mut renderer = RecordingRenderer::default();
        let bridge = Bridge::setup(
            RecordingGui::default(),
            &BridgeOptions::default(),
            &host(),
            &mut renderer,
        )
        .unwrap();
        let font = bridge.font_texture().id;
        let gui = bridge.shutdown(&mut renderer);
        assert_eq!(renderer.unloaded, vec![font]);
        assert_eq!(renderer.live_textures(), 0);
        assert_eq!(gui.frames, 0);
    }
}
