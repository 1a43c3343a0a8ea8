//! Application runner: a winit window, a wgpu-backed renderer and the bridge.

use std::sync::Arc;
use std::time::{Duration, Instant};

use glam::Vec2;
use imbridge_core::{BridgeError, BridgeOptions, HostInput, IconFont, Result};
use imbridge_render::{Color, ImmediateRenderer, Renderer, WgpuBackend};
use pollster::FutureExt;
use winit::{
    application::ApplicationHandler,
    dpi::LogicalSize,
    event::WindowEvent,
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    window::{Window, WindowId},
};

use crate::bridge::Bridge;
use crate::clipboard::SystemClipboard;
use crate::egui_backend::EguiBackend;
use crate::winit_host::WinitInput;

/// What an application sees of the host during one callback.
pub struct AppContext<'a> {
    /// Immediate renderer for textures, render targets and offscreen drawing.
    pub renderer: &'a mut dyn ImmediateRenderer,
    /// Buffered host input.
    pub host: &'a mut dyn HostInput,
    /// Seconds since the runner started.
    pub time: f64,
    exit: &'a mut bool,
}

impl<'a> AppContext<'a> {
    /// Bundles the host for one callback.
    pub fn new(
        renderer: &'a mut dyn ImmediateRenderer,
        host: &'a mut dyn HostInput,
        time: f64,
        exit: &'a mut bool,
    ) -> Self {
        Self {
            renderer,
            host,
            time,
            exit,
        }
    }

    /// Logical screen size.
    pub fn screen_size(&self) -> Vec2 {
        self.host.screen_size()
    }

    /// Asks the runner to close the window after this frame.
    pub fn request_exit(&mut self) {
        *self.exit = true;
    }

    /// Whether an exit was requested.
    pub fn exit_requested(&self) -> bool {
        *self.exit
    }
}

/// An application driven by [`run`].
///
/// Per frame the runner calls [`update`](Self::update) for offscreen drawing,
/// clears the screen to [`clear_color`](Self::clear_color), then calls
/// [`ui`](Self::ui) between the bridge's begin and end.
pub trait BridgeApp {
    /// Icon font merged into the GUI's default font at setup.
    fn icon_font(&self) -> Option<IconFont> {
        None
    }

    /// Called once after the window, renderer and bridge exist.
    fn setup(&mut self, _ctx: &mut AppContext<'_>) -> Result<()> {
        Ok(())
    }

    /// Called every frame before the GUI.
    fn update(&mut self, _ctx: &mut AppContext<'_>) -> Result<()> {
        Ok(())
    }

    /// Declares the GUI for this frame.
    fn ui(&mut self, gui: &egui::Context, ctx: &mut AppContext<'_>);

    /// Called once after the bridge shut down.
    fn shutdown(&mut self, _ctx: &mut AppContext<'_>) {}

    /// Background color of the main window.
    fn clear_color(&self) -> Color {
        Color::DARKGRAY
    }
}

struct Running {
    window: Arc<Window>,
    renderer: Renderer<WgpuBackend>,
    input: WinitInput,
    clipboard: SystemClipboard,
    bridge: Bridge<EguiBackend>,
}

struct Runner<A: BridgeApp> {
    options: BridgeOptions,
    app: A,
    running: Option<Running>,
    error: Option<BridgeError>,
    start: Instant,
    last_frame: Option<Instant>,
    next_frame: Instant,
    exit: bool,
}

impl<A: BridgeApp> Runner<A> {
    fn new(options: BridgeOptions, app: A) -> Self {
        let now = Instant::now();
        Self {
            options,
            app,
            running: None,
            error: None,
            start: now,
            last_frame: None,
            next_frame: now,
            exit: false,
        }
    }

    fn frame_period(&self) -> Option<Duration> {
        (self.options.target_fps > 0)
            .then(|| Duration::from_secs_f64(1.0 / f64::from(self.options.target_fps)))
    }

    fn start(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        let attributes = Window::default_attributes()
            .with_title(self.options.window_title.clone())
            .with_inner_size(LogicalSize::new(
                self.options.window_width,
                self.options.window_height,
            ));
        let window = Arc::new(
            event_loop
                .create_window(attributes)
                .map_err(|err| BridgeError::Window(err.to_string()))?,
        );

        let backend = WgpuBackend::new(window.clone()).block_on()?;
        let mut renderer = Renderer::new(backend, self.options.batch_vertex_capacity);
        let mut input = WinitInput::new(&window);

        let bridge = Bridge::setup_with(
            EguiBackend::new(),
            &self.options,
            self.app.icon_font(),
            input.state(),
            &mut renderer,
            |_| Ok(()),
        )?;

        let time = self.start.elapsed().as_secs_f64();
        let mut ctx = AppContext::new(&mut renderer, input.state_mut(), time, &mut self.exit);
        self.app.setup(&mut ctx)?;

        self.running = Some(Running {
            window,
            renderer,
            input,
            clipboard: SystemClipboard::new(),
            bridge,
        });
        Ok(())
    }

    fn frame(&mut self) -> Result<()> {
        let period = self.frame_period();
        let Some(Running {
            window,
            renderer,
            input,
            clipboard,
            bridge,
        }) = self.running.as_mut()
        else {
            return Ok(());
        };

        let now = Instant::now();
        if let Some(last) = self.last_frame {
            input
                .state_mut()
                .set_frame_time(now.duration_since(last).as_secs_f32());
        }
        self.last_frame = Some(now);
        if let Some(period) = period {
            self.next_frame = now + period;
        }
        let time = self.start.elapsed().as_secs_f64();

        renderer.begin_drawing(input.state().screen_size());
        {
            let mut ctx = AppContext::new(renderer, input.state_mut(), time, &mut self.exit);
            self.app.update(&mut ctx)?;
        }

        renderer.clear_background(self.app.clear_color());
        bridge.begin(input.state_mut());
        {
            let gui = bridge.gui().context().clone();
            let mut ctx = AppContext::new(renderer, input.state_mut(), time, &mut self.exit);
            self.app.ui(&gui, &mut ctx);
        }
        bridge.end(renderer)?;
        renderer.end_drawing()?;

        input.apply_cursor_requests(window);
        clipboard.flush(input.state_mut());
        input.end_frame();
        Ok(())
    }

    fn stop(&mut self) {
        let Some(Running {
            mut renderer,
            mut input,
            bridge,
            ..
        }) = self.running.take()
        else {
            return;
        };
        bridge.shutdown(&mut renderer);
        let time = self.start.elapsed().as_secs_f64();
        let mut ctx = AppContext::new(&mut renderer, input.state_mut(), time, &mut self.exit);
        self.app.shutdown(&mut ctx);
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, err: BridgeError) {
        log::error!("{err}");
        self.error.get_or_insert(err);
        event_loop.exit();
    }
}

impl<A: BridgeApp> ApplicationHandler for Runner<A> {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.running.is_some() {
            return;
        }
        if let Err(err) = self.start(event_loop) {
            self.fail(event_loop, err);
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        let Some(running) = self.running.as_mut() else {
            return;
        };
        running
            .clipboard
            .observe(running.input.state_mut(), &event);
        running.input.handle_window_event(&event);

        match event {
            WindowEvent::Resized(size) => {
                running.renderer.resize(size.width, size.height);
            }
            WindowEvent::RedrawRequested => {
                if let Err(err) = self.frame() {
                    self.fail(event_loop, err);
                    return;
                }
            }
            _ => {}
        }

        let close = self
            .running
            .as_ref()
            .is_some_and(|r| r.input.close_requested());
        if close || self.exit {
            event_loop.exit();
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        let Some(running) = &self.running else {
            return;
        };
        if self.frame_period().is_some() && Instant::now() < self.next_frame {
            event_loop.set_control_flow(ControlFlow::WaitUntil(self.next_frame));
        } else {
            event_loop.set_control_flow(ControlFlow::Poll);
            running.window.request_redraw();
        }
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        self.stop();
        log::info!("event loop finished");
    }
}

/// Opens a window and runs `app` until the window is closed or the app requests an exit.
pub fn run<A: BridgeApp>(options: BridgeOptions, app: A) -> Result<()> {
    let _ = env_logger::try_init();

    let event_loop = EventLoop::new().map_err(|err| BridgeError::Window(err.to_string()))?;
    let mut runner = Runner::new(options, app);
    event_loop
        .run_app(&mut runner)
        .map_err(|err| BridgeError::Window(err.to_string()))?;

    match runner.error.take() {
        Some(err) => Err(err),
        None => Ok(()),
    }
}
