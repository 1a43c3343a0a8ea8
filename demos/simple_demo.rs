//! Minimal bridge harness: one window with a few widgets over a cleared screen.
//!
//! Pass a JSON options file as the first argument to override the defaults.

use imbridge::{egui, run, AppContext, BridgeApp, BridgeOptions, Color, HostInput, Result};

struct SimpleDemo {
    clear: [f32; 3],
    clicks: u32,
    name: String,
    show_fps: bool,
}

impl Default for SimpleDemo {
    fn default() -> Self {
        Self {
            clear: [0.31, 0.31, 0.31],
            clicks: 0,
            name: "imbridge".to_string(),
            show_fps: true,
        }
    }
}

impl BridgeApp for SimpleDemo {
    fn ui(&mut self, gui: &egui::Context, ctx: &mut AppContext<'_>) {
        egui::Window::new("Hello").show(gui, |ui| {
            ui.label(format!("Hello, {}!", self.name));
            ui.text_edit_singleline(&mut self.name);
            ui.color_edit_button_rgb(&mut self.clear);
            if ui.button("Click me").clicked() {
                self.clicks += 1;
            }
            ui.label(format!("clicked {} times", self.clicks));
            ui.checkbox(&mut self.show_fps, "Show frame time");
            if self.show_fps {
                let dt = ctx.host.frame_time();
                ui.label(format!("{:.2} ms", dt * 1000.0));
            }
            ui.separator();
            if ui.button("Quit").clicked() {
                ctx.request_exit();
            }
        });
    }

    fn clear_color(&self) -> Color {
        Color::from_rgb_f32(self.clear)
    }
}

fn main() -> Result<()> {
    env_logger::init();

    let options = match std::env::args().nth(1) {
        Some(path) => BridgeOptions::load(path)?,
        None => BridgeOptions::default().with_title("imbridge - simple demo"),
    };
    run(options, SimpleDemo::default())
}
