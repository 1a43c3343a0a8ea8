//! Camera modes and textured shape helpers built on [`ImmediateRenderer`].

use glam::{Mat4, Vec2, Vec3};
use imbridge_core::TextureId;

use crate::batch::DrawMode;
use crate::camera::{screen_projection, Camera2D, Camera3D};
use crate::color::Color;
use crate::immediate::ImmediateRenderer;
use crate::texture::Texture;

/// An axis-aligned rectangle. Negative sizes flip texture sampling.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rectangle {
    /// Left edge.
    pub x: f32,
    /// Top edge.
    pub y: f32,
    /// Width.
    pub width: f32,
    /// Height.
    pub height: f32,
}

impl Rectangle {
    /// Creates a rectangle.
    #[must_use]
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }
}

// Cube faces as (texcoord, corner sign) quads, counter-clockwise seen from outside.
#[rustfmt::skip]
const CUBE_FACES: [[([f32; 2], [f32; 3]); 4]; 6] = [
    // +z
    [([0.0, 0.0], [-1.0, -1.0, 1.0]), ([1.0, 0.0], [1.0, -1.0, 1.0]), ([1.0, 1.0], [1.0, 1.0, 1.0]), ([0.0, 1.0], [-1.0, 1.0, 1.0])],
    // -z
    [([1.0, 0.0], [-1.0, -1.0, -1.0]), ([1.0, 1.0], [-1.0, 1.0, -1.0]), ([0.0, 1.0], [1.0, 1.0, -1.0]), ([0.0, 0.0], [1.0, -1.0, -1.0])],
    // +y
    [([0.0, 1.0], [-1.0, 1.0, -1.0]), ([0.0, 0.0], [-1.0, 1.0, 1.0]), ([1.0, 0.0], [1.0, 1.0, 1.0]), ([1.0, 1.0], [1.0, 1.0, -1.0])],
    // -y
    [([1.0, 1.0], [-1.0, -1.0, -1.0]), ([0.0, 1.0], [1.0, -1.0, -1.0]), ([0.0, 0.0], [1.0, -1.0, 1.0]), ([1.0, 0.0], [-1.0, -1.0, 1.0])],
    // +x
    [([1.0, 0.0], [1.0, -1.0, -1.0]), ([1.0, 1.0], [1.0, 1.0, -1.0]), ([0.0, 1.0], [1.0, 1.0, 1.0]), ([0.0, 0.0], [1.0, -1.0, 1.0])],
    // -x
    [([0.0, 0.0], [-1.0, -1.0, -1.0]), ([1.0, 0.0], [-1.0, -1.0, 1.0]), ([1.0, 1.0], [-1.0, 1.0, 1.0]), ([0.0, 1.0], [-1.0, 1.0, -1.0])],
];

/// Higher-level drawing on top of any [`ImmediateRenderer`].
pub trait DrawExt: ImmediateRenderer {
    /// Applies a 2D camera to following draws.
    fn begin_mode_2d(&mut self, camera: &Camera2D) {
        self.draw_render_batch_active();
        self.set_modelview(camera.matrix());
    }

    /// Restores the identity model-view.
    fn end_mode_2d(&mut self) {
        self.draw_render_batch_active();
        self.set_modelview(Mat4::IDENTITY);
    }

    /// Switches to a perspective camera with depth testing.
    fn begin_mode_3d(&mut self, camera: &Camera3D) {
        self.draw_render_batch_active();
        let size = self.render_size();
        let aspect = if size.y > 0.0 { size.x / size.y } else { 1.0 };
        self.set_projection(camera.projection_matrix(aspect));
        self.set_modelview(camera.view_matrix());
        self.enable_depth_test();
    }

    /// Returns to screen-space drawing.
    fn end_mode_3d(&mut self) {
        self.draw_render_batch_active();
        let size = self.render_size();
        self.set_projection(screen_projection(size));
        self.set_modelview(Mat4::IDENTITY);
        self.disable_depth_test();
    }

    /// Draws a part of a texture into `dest`, rotated by `rotation` degrees around `origin`.
    fn draw_texture_pro(
        &mut self,
        texture: &Texture,
        source: Rectangle,
        dest: Rectangle,
        origin: Vec2,
        rotation: f32,
        tint: Color,
    ) {
        if texture.id.is_none() || texture.width == 0 || texture.height == 0 {
            return;
        }
        let size = texture.size();
        let mut source = source;
        let mut flip_x = false;
        if source.width < 0.0 {
            flip_x = true;
            source.width = -source.width;
        }
        if source.height < 0.0 {
            source.y -= source.height;
        }

        let rotate = Mat4::from_translation(Vec3::new(dest.x, dest.y, 0.0))
            * Mat4::from_rotation_z(rotation.to_radians());
        let corner = |x: f32, y: f32| rotate.transform_point3(Vec3::new(x - origin.x, y - origin.y, 0.0));
        let top_left = corner(0.0, 0.0);
        let bottom_left = corner(0.0, dest.height);
        let bottom_right = corner(dest.width, dest.height);
        let top_right = corner(dest.width, 0.0);

        let (u_left, u_right) = if flip_x {
            ((source.x + source.width) / size.x, source.x / size.x)
        } else {
            (source.x / size.x, (source.x + source.width) / size.x)
        };
        let v_top = source.y / size.y;
        let v_bottom = (source.y + source.height) / size.y;

        self.set_texture(texture.id);
        self.begin(DrawMode::Quads);
        self.color4ub(tint.r, tint.g, tint.b, tint.a);
        for (uv, p) in [
            ((u_left, v_top), top_left),
            ((u_left, v_bottom), bottom_left),
            ((u_right, v_bottom), bottom_right),
            ((u_right, v_top), top_right),
        ] {
            self.tex_coord2f(uv.0, uv.1);
            self.vertex2f(p.x, p.y);
        }
        self.end();
        self.set_texture(TextureId::NONE);
    }

    /// Draws a whole texture with its top-left corner at `position`.
    fn draw_texture(&mut self, texture: &Texture, position: Vec2, tint: Color) {
        let size = texture.size();
        self.draw_texture_pro(
            texture,
            Rectangle::new(0.0, 0.0, size.x, size.y),
            Rectangle::new(position.x, position.y, size.x, size.y),
            Vec2::ZERO,
            0.0,
            tint,
        );
    }

    /// Draws a solid rectangle.
    fn draw_rectangle(&mut self, rect: Rectangle, color: Color) {
        self.begin(DrawMode::Quads);
        self.color4ub(color.r, color.g, color.b, color.a);
        self.vertex2f(rect.x, rect.y);
        self.vertex2f(rect.x, rect.y + rect.height);
        self.vertex2f(rect.x + rect.width, rect.y + rect.height);
        self.vertex2f(rect.x + rect.width, rect.y);
        self.end();
    }

    /// Draws a horizontal plane of `size` (x, z) centered at `center`, facing up.
    fn draw_plane(&mut self, center: Vec3, size: Vec2, color: Color) {
        let half = size / 2.0;
        self.begin(DrawMode::Quads);
        self.color4ub(color.r, color.g, color.b, color.a);
        for (dx, dz) in [(-1.0, -1.0), (-1.0, 1.0), (1.0, 1.0), (1.0, -1.0)] {
            self.vertex3f(center.x + dx * half.x, center.y, center.z + dz * half.y);
        }
        self.end();
    }

    /// Draws a textured box of `size` (width, height, length) centered at `position`.
    fn draw_cube_texture(&mut self, texture: &Texture, position: Vec3, size: Vec3, color: Color) {
        let half = size / 2.0;
        self.set_texture(texture.id);
        self.begin(DrawMode::Quads);
        self.color4ub(color.r, color.g, color.b, color.a);
        for face in &CUBE_FACES {
            for (uv, sign) in face {
                let p = position + Vec3::from(*sign) * half;
                self.tex_coord2f(uv[0], uv[1]);
                self.vertex3f(p.x, p.y, p.z);
            }
        }
        self.end();
        self.set_texture(TextureId::NONE);
    }
}

impl<R: ImmediateRenderer + ?Sized> DrawExt for R {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::HeadlessBackend;
    use crate::batch::FrameOp;
    use crate::image::Image;
    use crate::renderer::Renderer;

    fn renderer() -> Renderer<HeadlessBackend> {
        let mut r = Renderer::new(HeadlessBackend::new(800, 600), 4096);
        r.begin_drawing(Vec2::new(800.0, 600.0));
        r
    }

    #[test]
    fn test_cube_is_twelve_triangles() {
        let mut r = renderer();
        let texture = r.load_texture(&Image::filled(2, 2, Color::WHITE)).unwrap();
        r.draw_cube_texture(&texture, Vec3::new(0.0, 1.5, 0.0), Vec3::ONE, Color::GREEN);
        r.end_drawing().unwrap();

        let frame = r.backend().last_frame();
        let FrameOp::Draw(call) = &frame[0] else {
            panic!("expected a draw call");
        };
        assert_eq!(call.triangle_count(), 12);
        assert_eq!(call.state.texture, texture.id);
        let max_y = call
            .vertices
            .iter()
            .map(|v| v.position[1])
            .fold(f32::MIN, f32::max);
        assert!((max_y - 2.0).abs() < 1e-6);
    }

    #[test]
    fn test_cube_faces_point_outwards() {
        for face in &CUBE_FACES {
            let p: Vec<Vec3> = face.iter().map(|(_, s)| Vec3::from(*s)).collect();
            let normal = (p[1] - p[0]).cross(p[2] - p[0]);
            let center = (p[0] + p[1] + p[2] + p[3]) / 4.0;
            assert!(normal.dot(center) > 0.0);
        }
    }

    #[test]
    fn test_flipped_source_swaps_v() {
        let mut r = renderer();
        let texture = r.load_texture(&Image::filled(4, 4, Color::WHITE)).unwrap();
        r.draw_texture_pro(
            &texture,
            Rectangle::new(0.0, 0.0, 4.0, -4.0),
            Rectangle::new(0.0, 0.0, 4.0, 4.0),
            Vec2::ZERO,
            0.0,
            Color::WHITE,
        );
        r.end_drawing().unwrap();
        let frame = r.backend().last_frame();
        let FrameOp::Draw(call) = &frame[0] else {
            panic!("expected a draw call");
        };
        // first vertex is the top-left corner, now sampling the bottom row
        assert_eq!(call.vertices[0].position[..2], [0.0, 0.0]);
        assert!((call.vertices[0].tex_coord[1] - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_mode_3d_enables_depth_and_restores() {
        let mut r = renderer();
        let camera = Camera3D {
            position: Vec3::new(0.0, 3.0, -25.0),
            ..Camera3D::default()
        };
        r.begin_mode_3d(&camera);
        r.draw_plane(Vec3::ZERO, Vec2::splat(50.0), Color::BEIGE);
        r.end_mode_3d();
        r.draw_rectangle(Rectangle::new(0.0, 0.0, 10.0, 10.0), Color::RED);
        r.end_drawing().unwrap();

        let frame = r.backend().last_frame();
        let calls: Vec<_> = frame
            .iter()
            .filter_map(|op| match op {
                FrameOp::Draw(call) => Some(call),
                FrameOp::Clear { .. } => None,
            })
            .collect();
        assert_eq!(calls.len(), 2);
        assert!(calls[0].state.depth_test);
        assert!(!calls[1].state.depth_test);
        assert_eq!(
            calls[1].state.transform,
            screen_projection(Vec2::new(800.0, 600.0))
        );
    }
}
