//! Document windows showing offscreen render targets inside GUI windows.

use std::path::PathBuf;

use glam::{Vec2, Vec3};
use imbridge_core::{HostInput, HostMouseButton, Result};
use imbridge_render::{
    Camera2D, Camera3D, CameraProjection, Color, DrawExt, Image, ImmediateRenderer, Rectangle,
    RenderTexture, Texture,
};

use crate::app::AppContext;
use crate::widgets::{image_rect_tinted, image_render_texture_fit};

/// A GUI window backed by its own render target.
pub trait DocumentWindow {
    /// Window title.
    fn title(&self) -> &str;

    /// Allocates resources.
    fn setup(&mut self, ctx: &mut AppContext<'_>) -> Result<()>;

    /// Per-frame host side work, before the GUI frame.
    fn update(&mut self, ctx: &mut AppContext<'_>) -> Result<()>;

    /// Declares the window.
    fn show(&mut self, gui: &egui::Context);

    /// Releases resources.
    fn shutdown(&mut self, renderer: &mut dyn ImmediateRenderer);

    /// Whether the window is shown.
    fn is_open(&self) -> bool;

    /// Shows or hides the window.
    fn set_open(&mut self, open: bool);

    /// Whether the window had keyboard/mouse focus in the last GUI frame.
    fn focused(&self) -> bool;
}

/// Allocates a render target the size of the screen.
fn screen_target(renderer: &mut dyn ImmediateRenderer, screen: Vec2) -> Result<RenderTexture> {
    let width = screen.x.max(1.0) as u32;
    let height = screen.y.max(1.0) as u32;
    Ok(renderer.load_render_texture(width, height)?)
}

/// Replaces `target` with one sized to `screen`. Degenerate sizes and failed
/// allocations keep the old target.
fn reload_target(
    renderer: &mut dyn ImmediateRenderer,
    target: &mut RenderTexture,
    screen: Vec2,
) -> Result<()> {
    if screen.x < 1.0 || screen.y < 1.0 {
        log::debug!("keeping render target for a {screen} screen");
        return Ok(());
    }
    let fresh = screen_target(renderer, screen)?;
    renderer.unload_render_texture(target);
    *target = fresh;
    log::debug!(
        "render target reloaded as {} ({}x{})",
        target.id(),
        target.texture.width,
        target.texture.height
    );
    Ok(())
}

fn unload_target(renderer: &mut dyn ImmediateRenderer, target: &mut RenderTexture) {
    if renderer.is_texture_ready(&target.texture) {
        renderer.unload_render_texture(target);
    }
    *target = RenderTexture::default();
}

fn unload(renderer: &mut dyn ImmediateRenderer, texture: &mut Texture) {
    if renderer.is_texture_ready(texture) {
        renderer.unload_texture(texture);
    }
    *texture = Texture::default();
}

/// Whether `layer` is the topmost regular window.
fn is_top_layer(gui: &egui::Context, layer: egui::LayerId) -> bool {
    gui.memory(|m| m.areas().top_layer_id(egui::Order::Middle)) == Some(layer)
}

fn document_frame(gui: &egui::Context) -> egui::Frame {
    egui::Frame::window(&gui.style()).inner_margin(0.0)
}

/// Tools of the image viewer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ToolMode {
    /// Clicks do nothing.
    #[default]
    None,
    /// Left drag pans the camera.
    Move,
}

/// A pannable 2D view of an image.
pub struct ImageViewerWindow {
    open: bool,
    focused: bool,
    image_path: PathBuf,
    image: Texture,
    target: RenderTexture,
    camera: Camera2D,
    last_mouse: Vec2,
    last_target: Vec2,
    dragging: bool,
    dirty: bool,
    tool: ToolMode,
    tint: [f32; 3],
}

impl Default for ImageViewerWindow {
    fn default() -> Self {
        Self::new("resources/parrots.png")
    }
}

impl ImageViewerWindow {
    /// Title of the window.
    pub const TITLE: &'static str = "Image Viewer";

    /// A viewer for the image at `image_path`. A generated pattern is shown if it cannot be loaded.
    pub fn new(image_path: impl Into<PathBuf>) -> Self {
        Self {
            open: false,
            focused: false,
            image_path: image_path.into(),
            image: Texture::default(),
            target: RenderTexture::default(),
            camera: Camera2D::default(),
            last_mouse: Vec2::ZERO,
            last_target: Vec2::ZERO,
            dragging: false,
            dirty: false,
            tool: ToolMode::None,
            tint: [1.0, 1.0, 1.0],
        }
    }

    /// The 2D camera looking at the image.
    pub fn camera(&self) -> &Camera2D {
        &self.camera
    }

    /// The render target the image is drawn into.
    pub fn target(&self) -> &RenderTexture {
        &self.target
    }

    /// The active tool.
    pub fn tool(&self) -> ToolMode {
        self.tool
    }

    /// Selects a tool.
    pub fn set_tool(&mut self, tool: ToolMode) {
        self.tool = tool;
    }

    /// Whether the render target is redrawn on the next update.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    fn load_image(&self) -> Image {
        match Image::load(&self.image_path) {
            Ok(image) => image,
            Err(err) => {
                log::warn!(
                    "cannot load {}: {err}; showing a test pattern",
                    self.image_path.display()
                );
                Image::checked(512, 512, 64, 64, Color::GRAY, Color::LIGHTGRAY)
            }
        }
    }

    fn redraw(&mut self, renderer: &mut dyn ImmediateRenderer) {
        renderer.begin_texture_mode(&self.target);
        renderer.clear_background(Color::BLUE);

        renderer.begin_mode_2d(&self.camera);
        let half = self.image.size() / 2.0;
        renderer.draw_texture(&self.image, -half, Color::WHITE);
        renderer.end_mode_2d();

        renderer.end_texture_mode();
    }

    fn toolbar(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            if ui
                .selectable_label(self.tool == ToolMode::None, "None")
                .clicked()
            {
                self.tool = ToolMode::None;
            }
            if ui
                .selectable_label(self.tool == ToolMode::Move, "Move")
                .clicked()
            {
                self.tool = ToolMode::Move;
            }

            ui.separator();
            ui.color_edit_button_rgb(&mut self.tint);

            ui.separator();
            ui.label(match self.tool {
                ToolMode::None => "No Tool",
                ToolMode::Move => "Move Tool",
            });

            ui.separator();
            ui.label(format!(
                "camera target X{} Y{}",
                self.camera.target.x, self.camera.target.y
            ));
        });
    }
}

impl DocumentWindow for ImageViewerWindow {
    fn title(&self) -> &str {
        Self::TITLE
    }

    fn setup(&mut self, ctx: &mut AppContext<'_>) -> Result<()> {
        let screen = ctx.screen_size();
        self.camera = Camera2D {
            offset: screen / 2.0,
            target: Vec2::ZERO,
            rotation: 0.0,
            zoom: 1.0,
        };
        self.target = screen_target(ctx.renderer, screen)?;

        let image = self.load_image();
        self.image = ctx.renderer.load_texture(&image)?;
        self.dirty = true;
        Ok(())
    }

    fn update(&mut self, ctx: &mut AppContext<'_>) -> Result<()> {
        if !self.open {
            return Ok(());
        }

        if ctx.host.is_window_resized() {
            let screen = ctx.screen_size();
            reload_target(ctx.renderer, &mut self.target, screen)?;
            self.camera.offset = screen / 2.0;
            self.dirty = true;
        }

        let mouse = ctx.host.mouse_position();
        if self.focused
            && self.tool == ToolMode::Move
            && ctx.host.is_mouse_button_down(HostMouseButton::Left)
        {
            if !self.dragging {
                self.last_mouse = mouse;
                self.last_target = self.camera.target;
            }
            self.dragging = true;
            let delta = (self.last_mouse - mouse) / self.camera.zoom;
            self.camera.target = self.last_target + delta;
            self.dirty = true;
        } else {
            self.dragging = false;
        }

        if self.dirty {
            self.dirty = false;
            self.redraw(ctx.renderer);
        }
        Ok(())
    }

    fn show(&mut self, gui: &egui::Context) {
        if !self.open {
            self.focused = false;
            return;
        }
        let screen = gui.screen_rect().size();
        let mut open = self.open;
        let shown = egui::Window::new(Self::TITLE)
            .open(&mut open)
            .frame(document_frame(gui))
            .scroll([false, false])
            .min_size(egui::vec2(400.0, 400.0))
            .max_size(screen)
            .default_size(egui::vec2(640.0, 480.0))
            .show(gui, |ui| {
                self.toolbar(ui);

                let available = ui.available_size();
                let size = Vec2::new(available.x, available.y);
                let texture = self.target.texture;
                let view = Rectangle::new(
                    texture.width as f32 / 2.0 - size.x / 2.0,
                    texture.height as f32 / 2.0 - size.y / 2.0,
                    size.x,
                    -size.y,
                );
                image_rect_tinted(ui, &texture, size, view, Color::from_rgb_f32(self.tint));
            });
        self.open = open;
        self.focused = shown.is_some_and(|r| is_top_layer(gui, r.response.layer_id));
    }

    fn shutdown(&mut self, renderer: &mut dyn ImmediateRenderer) {
        unload_target(renderer, &mut self.target);
        unload(renderer, &mut self.image);
    }

    fn is_open(&self) -> bool {
        self.open
    }

    fn set_open(&mut self, open: bool) {
        self.open = open;
    }

    fn focused(&self) -> bool {
        self.focused
    }
}

/// A 3D scene of textured cubes seen from an orbiting camera.
pub struct SceneViewWindow {
    open: bool,
    focused: bool,
    camera: Camera3D,
    grid: Texture,
    target: RenderTexture,
}

impl Default for SceneViewWindow {
    fn default() -> Self {
        Self::new()
    }
}

impl SceneViewWindow {
    /// Title of the window.
    pub const TITLE: &'static str = "3D View";

    /// Cubes on each side of the origin along x and z.
    pub const GRID_COUNT: i32 = 5;

    /// Distance between neighbouring cubes.
    pub const GRID_SPACING: f32 = 4.0;

    /// An unopened scene view.
    pub fn new() -> Self {
        Self {
            open: false,
            focused: false,
            camera: Camera3D {
                position: Vec3::new(0.0, 3.0, -25.0),
                target: Vec3::ZERO,
                up: Vec3::Y,
                fovy: 45.0,
                projection: CameraProjection::Perspective,
            },
            grid: Texture::default(),
            target: RenderTexture::default(),
        }
    }

    /// The orbiting camera.
    pub fn camera(&self) -> &Camera3D {
        &self.camera
    }

    /// The render target the scene is drawn into.
    pub fn target(&self) -> &RenderTexture {
        &self.target
    }

    /// Cube positions along one axis.
    pub fn grid_positions() -> impl Iterator<Item = f32> {
        (-Self::GRID_COUNT..=Self::GRID_COUNT).map(|i| i as f32 * Self::GRID_SPACING)
    }

    fn redraw(&mut self, renderer: &mut dyn ImmediateRenderer) {
        renderer.begin_texture_mode(&self.target);
        renderer.clear_background(Color::SKYBLUE);

        renderer.begin_mode_3d(&self.camera);
        renderer.draw_plane(Vec3::ZERO, Vec2::new(50.0, 50.0), Color::BEIGE);
        for x in Self::grid_positions() {
            for z in Self::grid_positions() {
                renderer.draw_cube_texture(
                    &self.grid,
                    Vec3::new(x, 1.5, z),
                    Vec3::ONE,
                    Color::GREEN,
                );
                renderer.draw_cube_texture(
                    &self.grid,
                    Vec3::new(x, 0.5, z),
                    Vec3::new(0.25, 1.0, 0.25),
                    Color::BROWN,
                );
            }
        }
        renderer.end_mode_3d();

        renderer.end_texture_mode();
    }
}

impl DocumentWindow for SceneViewWindow {
    fn title(&self) -> &str {
        Self::TITLE
    }

    fn setup(&mut self, ctx: &mut AppContext<'_>) -> Result<()> {
        let screen = ctx.screen_size();
        self.target = screen_target(ctx.renderer, screen)?;
        let checks = Image::checked(256, 256, 32, 32, Color::DARKGRAY, Color::WHITE);
        self.grid = ctx.renderer.load_texture(&checks)?;
        Ok(())
    }

    fn update(&mut self, ctx: &mut AppContext<'_>) -> Result<()> {
        if !self.open {
            return Ok(());
        }

        if ctx.host.is_window_resized() {
            let screen = ctx.screen_size();
            reload_target(ctx.renderer, &mut self.target, screen)?;
        }

        let period = (ctx.time / 10.0).sin() as f32;
        self.camera.position.x = period * 25.0;

        self.redraw(ctx.renderer);
        Ok(())
    }

    fn show(&mut self, gui: &egui::Context) {
        if !self.open {
            self.focused = false;
            return;
        }
        let mut open = self.open;
        let shown = egui::Window::new(Self::TITLE)
            .open(&mut open)
            .frame(document_frame(gui))
            .scroll([false, false])
            .default_size(egui::vec2(640.0, 480.0))
            .show(gui, |ui| {
                image_render_texture_fit(ui, &self.target, true);
            });
        self.open = open;
        self.focused = shown.is_some_and(|r| is_top_layer(gui, r.response.layer_id));
    }

    fn shutdown(&mut self, renderer: &mut dyn ImmediateRenderer) {
        unload_target(renderer, &mut self.target);
        unload(renderer, &mut self.grid);
    }

    fn is_open(&self) -> bool {
        self.open
    }

    fn set_open(&mut self, open: bool) {
        self.open = open;
    }

    fn focused(&self) -> bool {
        self.focused
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use imbridge_core::InputState;
    use imbridge_render::{FrameOp, HeadlessBackend, Renderer};

    use crate::testing::RecordingRenderer;

    fn renderer() -> Renderer<HeadlessBackend> {
        Renderer::new(HeadlessBackend::new(800, 600), 4096)
    }

    #[test]
    fn test_failed_target_reload_keeps_old_target() {
        let mut renderer = RecordingRenderer::default();
        let mut target = screen_target(&mut renderer, Vec2::new(800.0, 600.0)).unwrap();
        let old = target.id();

        renderer.fail_loads = true;
        assert!(reload_target(&mut renderer, &mut target, Vec2::new(1024.0, 768.0)).is_err());
        assert_eq!(target.id(), old);
        assert!(renderer.unloaded.is_empty());

        renderer.fail_loads = false;
        reload_target(&mut renderer, &mut target, Vec2::new(1024.0, 768.0)).unwrap();
        assert_eq!(renderer.unloaded, vec![old]);
        assert_eq!(target.texture.width, 1024);
        assert_eq!(renderer.live_textures(), 1);
    }

    #[test]
    fn test_grid_positions() {
        let xs: Vec<f32> = SceneViewWindow::grid_positions().collect();
        assert_eq!(xs.len(), 11);
        assert_eq!(xs[0], -20.0);
        assert_eq!(xs[10], 20.0);
    }

    #[test]
    fn test_scene_view_redraws_into_its_target() {
        let mut renderer = renderer();
        let mut host = InputState::new(Vec2::new(800.0, 600.0));
        let mut exit = false;
        let mut view = SceneViewWindow::new();
        {
            let mut ctx = AppContext::new(&mut renderer, &mut host, 0.0, &mut exit);
            view.setup(&mut ctx).unwrap();
        }
        view.set_open(true);

        renderer.begin_drawing(Vec2::new(800.0, 600.0));
        {
            let mut ctx = AppContext::new(&mut renderer, &mut host, 0.0, &mut exit);
            view.update(&mut ctx).unwrap();
        }
        renderer.end_drawing().unwrap();

        let target = view.target().id();
        let ops = renderer.backend().last_frame();
        assert!(matches!(ops[0], FrameOp::Clear { target: Some(t), .. } if t == target));
        // plane plus two cubes per grid cell
        let triangles: usize = ops
            .iter()
            .filter_map(|op| match op {
                FrameOp::Draw(call) => Some(call.triangle_count()),
                FrameOp::Clear { .. } => None,
            })
            .sum();
        assert_eq!(triangles, 2 + 11 * 11 * 2 * 12);
    }

    #[test]
    fn test_closed_view_does_not_draw() {
        let mut renderer = renderer();
        let mut host = InputState::new(Vec2::new(800.0, 600.0));
        let mut exit = false;
        let mut view = SceneViewWindow::new();
        renderer.begin_drawing(Vec2::new(800.0, 600.0));
        {
            let mut ctx = AppContext::new(&mut renderer, &mut host, 0.0, &mut exit);
            view.setup(&mut ctx).unwrap();
            view.update(&mut ctx).unwrap();
        }
        renderer.end_drawing().unwrap();
        assert!(renderer.backend().last_frame().is_empty());
    }

    #[test]
    fn test_move_tool_pans_camera() {
        let mut renderer = renderer();
        let mut host = InputState::new(Vec2::new(800.0, 600.0));
        let mut exit = false;
        let mut viewer = ImageViewerWindow::new("does/not/exist.png");
        {
            let mut ctx = AppContext::new(&mut renderer, &mut host, 0.0, &mut exit);
            viewer.setup(&mut ctx).unwrap();
        }
        assert_eq!(viewer.camera().offset, Vec2::new(400.0, 300.0));
        viewer.set_open(true);
        viewer.focused = true;
        viewer.set_tool(ToolMode::Move);

        host.mouse_moved(Vec2::new(100.0, 100.0));
        host.mouse_button(HostMouseButton::Left, true);
        {
            let mut ctx = AppContext::new(&mut renderer, &mut host, 0.0, &mut exit);
            viewer.update(&mut ctx).unwrap();
        }
        host.end_frame();
        host.mouse_moved(Vec2::new(70.0, 120.0));
        {
            let mut ctx = AppContext::new(&mut renderer, &mut host, 0.0, &mut exit);
            viewer.update(&mut ctx).unwrap();
        }
        assert_eq!(viewer.camera().target, Vec2::new(30.0, -20.0));
        assert!(!viewer.is_dirty());
    }

    #[test]
    fn test_move_requires_focus() {
        let mut renderer = renderer();
        let mut host = InputState::new(Vec2::new(800.0, 600.0));
        let mut exit = false;
        let mut viewer = ImageViewerWindow::new("does/not/exist.png");
        viewer.set_open(true);
        viewer.set_tool(ToolMode::Move);
        host.mouse_button(HostMouseButton::Left, true);
        host.mouse_moved(Vec2::new(50.0, 50.0));
        let mut ctx = AppContext::new(&mut renderer, &mut host, 0.0, &mut exit);
        viewer.setup(&mut ctx).unwrap();
        viewer.update(&mut ctx).unwrap();
        assert_eq!(viewer.camera().target, Vec2::ZERO);
    }

    #[test]
    fn test_shutdown_releases_everything() {
        let mut renderer = renderer();
        let mut host = InputState::new(Vec2::new(800.0, 600.0));
        let mut exit = false;
        let mut viewer = ImageViewerWindow::default();
        let mut view = SceneViewWindow::default();
        {
            let mut ctx = AppContext::new(&mut renderer, &mut host, 0.0, &mut exit);
            viewer.setup(&mut ctx).unwrap();
            view.setup(&mut ctx).unwrap();
        }
        viewer.shutdown(&mut renderer);
        view.shutdown(&mut renderer);
        assert_eq!(renderer.backend().live_textures(), 0);
        assert_eq!(renderer.backend().live_render_targets(), 0);
    }
}
