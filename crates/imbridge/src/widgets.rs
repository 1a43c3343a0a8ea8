//! Image widgets for host textures and render targets.
//!
//! These place host textures inside GUI windows. Render targets are stored
//! bottom row first, so [`image_render_texture`] and
//! [`image_render_texture_fit`] sample them with a vertically flipped source.

use glam::Vec2;
use imbridge_core::TextureId;
use imbridge_render::{Color, Rectangle, RenderTexture, Texture};

/// The GUI-side id of a host texture.
pub fn egui_texture_id(id: TextureId) -> egui::TextureId {
    egui::TextureId::User(id.raw())
}

/// Normalized texture coordinates of `source` in a texture of `texture_size`.
///
/// A negative width or height mirrors the sample along that axis.
pub fn source_rect_uv(source: Rectangle, texture_size: Vec2) -> (Vec2, Vec2) {
    let mut uv0 = Vec2::ZERO;
    let mut uv1 = Vec2::ZERO;

    if source.width < 0.0 {
        uv0.x = -(source.x / texture_size.x);
        uv1.x = uv0.x - source.width.abs() / texture_size.x;
    } else {
        uv0.x = source.x / texture_size.x;
        uv1.x = uv0.x + source.width / texture_size.x;
    }

    if source.height < 0.0 {
        uv0.y = -(source.y / texture_size.y);
        uv1.y = uv0.y - source.height.abs() / texture_size.y;
    } else {
        uv0.y = source.y / texture_size.y;
        uv1.y = uv0.y + source.height / texture_size.y;
    }

    (uv0, uv1)
}

/// Largest size with the aspect of `texture_size` that fits in `area`, truncated to whole pixels.
pub fn fit_to_area(texture_size: Vec2, area: Vec2) -> Vec2 {
    if texture_size.x <= 0.0 || texture_size.y <= 0.0 {
        return Vec2::ZERO;
    }
    let mut scale = area.x / texture_size.x;
    let y = texture_size.y * scale;
    if y > area.y {
        scale = area.y / texture_size.y;
    }
    (texture_size * scale).trunc()
}

/// Offset that centers `size` in `area`.
pub fn center_offset(area: Vec2, size: Vec2) -> Vec2 {
    area / 2.0 - size / 2.0
}

fn to_egui(v: Vec2) -> egui::Vec2 {
    egui::vec2(v.x, v.y)
}

fn to_color32(color: Color) -> egui::Color32 {
    egui::Color32::from_rgba_unmultiplied(color.r, color.g, color.b, color.a)
}

fn widget<'a>(texture: &Texture, size: Vec2, uv0: Vec2, uv1: Vec2, tint: Color) -> egui::Image<'a> {
    let sized = egui::load::SizedTexture::new(egui_texture_id(texture.id), to_egui(size));
    egui::Image::new(sized)
        .fit_to_exact_size(to_egui(size))
        .uv(egui::Rect::from_min_max(
            egui::pos2(uv0.x, uv0.y),
            egui::pos2(uv1.x, uv1.y),
        ))
        .tint(to_color32(tint))
        // dragging over an image must not move its window
        .sense(egui::Sense::drag())
}

/// Draws a texture at its own size.
pub fn image(ui: &mut egui::Ui, texture: &Texture) -> egui::Response {
    image_size(ui, texture, texture.size())
}

/// Draws a texture scaled to `size`.
pub fn image_size(ui: &mut egui::Ui, texture: &Texture, size: Vec2) -> egui::Response {
    ui.add(widget(texture, size, Vec2::ZERO, Vec2::ONE, Color::WHITE))
}

/// Draws the `source` part of a texture at `size`.
pub fn image_rect(
    ui: &mut egui::Ui,
    texture: &Texture,
    size: Vec2,
    source: Rectangle,
) -> egui::Response {
    image_rect_tinted(ui, texture, size, source, Color::WHITE)
}

/// Draws the `source` part of a texture at `size`, multiplied by `tint`.
pub fn image_rect_tinted(
    ui: &mut egui::Ui,
    texture: &Texture,
    size: Vec2,
    source: Rectangle,
    tint: Color,
) -> egui::Response {
    let (uv0, uv1) = source_rect_uv(source, texture.size());
    ui.add(widget(texture, size, uv0, uv1, tint))
}

fn flipped(target: &RenderTexture) -> Rectangle {
    let size = target.texture.size();
    Rectangle::new(0.0, 0.0, size.x, -size.y)
}

/// Draws a render target upright at its own size.
pub fn image_render_texture(ui: &mut egui::Ui, target: &RenderTexture) -> egui::Response {
    image_rect(ui, &target.texture, target.texture.size(), flipped(target))
}

/// Draws a render target upright, scaled to fit the available space.
pub fn image_render_texture_fit(
    ui: &mut egui::Ui,
    target: &RenderTexture,
    center: bool,
) -> egui::Response {
    let available = ui.available_size();
    let area = Vec2::new(available.x, available.y);
    let size = fit_to_area(target.texture.size(), area);
    let (uv0, uv1) = source_rect_uv(flipped(target), target.texture.size());
    let image = widget(&target.texture, size, uv0, uv1, Color::WHITE);

    if center {
        let min = ui.cursor().min + to_egui(center_offset(area, size));
        ui.put(egui::Rect::from_min_size(min, to_egui(size)), image)
    } else {
        ui.add(image)
    }
}

/// A button showing a texture at its own size. Returns `true` when clicked.
pub fn image_button(ui: &mut egui::Ui, name: &str, texture: &Texture) -> bool {
    image_button_size(ui, name, texture, texture.size())
}

/// A button showing a texture at `size`. Returns `true` when clicked.
pub fn image_button_size(ui: &mut egui::Ui, name: &str, texture: &Texture, size: Vec2) -> bool {
    ui.push_id(name, |ui| {
        let image = widget(texture, size, Vec2::ZERO, Vec2::ONE, Color::WHITE);
        ui.add(egui::Button::image(image)).clicked()
    })
    .inner
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_rect_uv() {
        let size = Vec2::new(200.0, 100.0);
        let (uv0, uv1) = source_rect_uv(Rectangle::new(50.0, 25.0, 100.0, 50.0), size);
        assert_eq!(uv0, Vec2::new(0.25, 0.25));
        assert_eq!(uv1, Vec2::new(0.75, 0.75));
    }

    #[test]
    fn test_negative_height_flips_v() {
        let size = Vec2::new(200.0, 100.0);
        let (uv0, uv1) = source_rect_uv(Rectangle::new(0.0, 0.0, 200.0, -100.0), size);
        assert_eq!(uv0, Vec2::new(0.0, 0.0));
        assert_eq!(uv1, Vec2::new(1.0, -1.0));
    }

    #[test]
    fn test_negative_width_flips_u() {
        let size = Vec2::new(100.0, 100.0);
        let (uv0, uv1) = source_rect_uv(Rectangle::new(20.0, 0.0, -50.0, 100.0), size);
        assert!((uv0.x + 0.2).abs() < 1e-6);
        assert!((uv1.x + 0.7).abs() < 1e-6);
        assert_eq!(uv1.y, 1.0);
    }

    #[test]
    fn test_fit_wide_area() {
        // height limits the scale
        let size = fit_to_area(Vec2::new(800.0, 600.0), Vec2::new(1000.0, 300.0));
        assert_eq!(size, Vec2::new(400.0, 300.0));
        assert_eq!(center_offset(Vec2::new(1000.0, 300.0), size), Vec2::new(300.0, 0.0));
    }

    #[test]
    fn test_fit_tall_area_truncates() {
        let size = fit_to_area(Vec2::new(300.0, 200.0), Vec2::new(100.0, 500.0));
        assert_eq!(size, Vec2::new(100.0, 66.0));
    }

    #[test]
    fn test_fit_empty_texture() {
        assert_eq!(fit_to_area(Vec2::ZERO, Vec2::new(10.0, 10.0)), Vec2::ZERO);
    }

    #[test]
    fn test_texture_id_round_trip() {
        let id = TextureId::from_raw(42);
        assert_eq!(egui_texture_id(id), egui::TextureId::User(42));
    }

    #[test]
    fn test_image_paints_host_texture() {
        let texture = Texture {
            id: TextureId::from_raw(5),
            width: 64,
            height: 32,
            ..Texture::default()
        };
        let ctx = egui::Context::default();
        let output = ctx.run(egui::RawInput::default(), |ctx| {
            egui::CentralPanel::default().show(ctx, |ui| {
                image(ui, &texture);
                assert!(!image_button(ui, "tool", &texture));
            });
        });
        let primitives = ctx.tessellate(output.shapes, output.pixels_per_point);
        let textured = primitives
            .iter()
            .filter(|p| match &p.primitive {
                egui::epaint::Primitive::Mesh(mesh) => mesh.texture_id == egui::TextureId::User(5),
                egui::epaint::Primitive::Callback(_) => false,
            })
            .count();
        assert!(textured >= 1);
    }
}
