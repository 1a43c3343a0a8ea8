//! Editor-style demo: a main menu and two document windows drawing into
//! their own render targets.

use imbridge::{
    egui, run, AppContext, BridgeApp, BridgeOptions, DocumentWindow, ImageViewerWindow, Result,
    SceneViewWindow, Theme,
};

struct EditorDemo {
    image_viewer: ImageViewerWindow,
    scene_view: SceneViewWindow,
    show_gui_demo: bool,
}

impl EditorDemo {
    fn new() -> Self {
        Self {
            image_viewer: ImageViewerWindow::default(),
            scene_view: SceneViewWindow::new(),
            show_gui_demo: false,
        }
    }

    fn windows(&mut self) -> [&mut dyn DocumentWindow; 2] {
        [&mut self.image_viewer, &mut self.scene_view]
    }

    fn menu(&mut self, gui: &egui::Context, ctx: &mut AppContext<'_>) {
        egui::TopBottomPanel::top("main_menu").show(gui, |ui| {
            egui::menu::bar(ui, |ui| {
                ui.menu_button("File", |ui| {
                    if ui.button("Exit").clicked() {
                        ctx.request_exit();
                    }
                });
                ui.menu_button("Window", |ui| {
                    ui.checkbox(&mut self.show_gui_demo, "GUI Demo");
                    for window in self.windows() {
                        let mut open = window.is_open();
                        if ui.checkbox(&mut open, window.title()).changed() {
                            window.set_open(open);
                        }
                    }
                });
            });
        });
    }

    fn gui_demo(&mut self, gui: &egui::Context) {
        egui::Window::new("GUI Demo")
            .open(&mut self.show_gui_demo)
            .vscroll(true)
            .show(gui, |ui| {
                gui.settings_ui(ui);
            });
    }
}

impl BridgeApp for EditorDemo {
    fn setup(&mut self, ctx: &mut AppContext<'_>) -> Result<()> {
        for window in self.windows() {
            window.setup(ctx)?;
            window.set_open(true);
        }
        Ok(())
    }

    fn update(&mut self, ctx: &mut AppContext<'_>) -> Result<()> {
        for window in self.windows() {
            window.update(ctx)?;
        }
        Ok(())
    }

    fn ui(&mut self, gui: &egui::Context, ctx: &mut AppContext<'_>) {
        self.menu(gui, ctx);
        if self.show_gui_demo {
            self.gui_demo(gui);
        }
        for window in self.windows() {
            window.show(gui);
        }
    }

    fn shutdown(&mut self, ctx: &mut AppContext<'_>) {
        for window in self.windows() {
            window.shutdown(ctx.renderer);
        }
    }
}

fn main() -> Result<()> {
    env_logger::init();

    let options = BridgeOptions::default()
        .with_title("imbridge - editor demo")
        .with_window_size(1280, 800)
        .with_theme(Theme::Dark);
    run(options, EditorDemo::new())
}
