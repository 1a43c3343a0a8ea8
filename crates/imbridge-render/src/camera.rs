//! 2D and 3D cameras for the immediate renderer.

use glam::{Mat4, Vec2, Vec3};

/// A 2D camera: `target` in world space appears at `offset` in screen space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera2D {
    /// Screen-space displacement of the target.
    pub offset: Vec2,
    /// World-space point the camera looks at.
    pub target: Vec2,
    /// Rotation in degrees.
    pub rotation: f32,
    /// Scale factor.
    pub zoom: f32,
}

impl Default for Camera2D {
    fn default() -> Self {
        Self {
            offset: Vec2::ZERO,
            target: Vec2::ZERO,
            rotation: 0.0,
            zoom: 1.0,
        }
    }
}

impl Camera2D {
    /// World → screen transform.
    #[must_use]
    pub fn matrix(&self) -> Mat4 {
        Mat4::from_translation(self.offset.extend(0.0))
            * Mat4::from_rotation_z(self.rotation.to_radians())
            * Mat4::from_scale(Vec3::new(self.zoom, self.zoom, 1.0))
            * Mat4::from_translation((-self.target).extend(0.0))
    }

    /// Converts a world position to screen space.
    #[must_use]
    pub fn world_to_screen(&self, world: Vec2) -> Vec2 {
        self.matrix().transform_point3(world.extend(0.0)).truncate()
    }

    /// Converts a screen position to world space.
    #[must_use]
    pub fn screen_to_world(&self, screen: Vec2) -> Vec2 {
        self.matrix()
            .inverse()
            .transform_point3(screen.extend(0.0))
            .truncate()
    }
}

/// Projection used by a [`Camera3D`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CameraProjection {
    /// Perspective with vertical field of view `fovy` degrees.
    #[default]
    Perspective,
    /// Orthographic with vertical extent `fovy` world units.
    Orthographic,
}

/// A 3D camera.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera3D {
    /// Eye position.
    pub position: Vec3,
    /// Point looked at.
    pub target: Vec3,
    /// Up direction.
    pub up: Vec3,
    /// Vertical field of view in degrees (or extent for orthographic).
    pub fovy: f32,
    /// Projection kind.
    pub projection: CameraProjection,
}

impl Default for Camera3D {
    fn default() -> Self {
        Self {
            position: Vec3::new(0.0, 0.0, 10.0),
            target: Vec3::ZERO,
            up: Vec3::Y,
            fovy: 45.0,
            projection: CameraProjection::Perspective,
        }
    }
}

impl Camera3D {
    /// Near clip distance.
    pub const NEAR: f32 = 0.01;
    /// Far clip distance.
    pub const FAR: f32 = 1000.0;

    /// View matrix.
    #[must_use]
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.target, self.up)
    }

    /// Projection matrix for the given aspect ratio (width / height).
    #[must_use]
    pub fn projection_matrix(&self, aspect: f32) -> Mat4 {
        match self.projection {
            CameraProjection::Perspective => {
                Mat4::perspective_rh(self.fovy.to_radians(), aspect, Self::NEAR, Self::FAR)
            }
            CameraProjection::Orthographic => {
                let top = self.fovy / 2.0;
                let right = top * aspect;
                Mat4::orthographic_rh(-right, right, -top, top, Self::NEAR, Self::FAR)
            }
        }
    }
}

/// Screen-space orthographic projection, origin top-left, y down.
#[must_use]
pub fn screen_projection(size: Vec2) -> Mat4 {
    Mat4::orthographic_rh(0.0, size.x.max(1.0), size.y.max(1.0), 0.0, -1.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_camera2d_target_maps_to_offset() {
        let camera = Camera2D {
            offset: Vec2::new(640.0, 400.0),
            target: Vec2::new(10.0, -5.0),
            rotation: 0.0,
            zoom: 2.0,
        };
        let screen = camera.world_to_screen(camera.target);
        assert!((screen - camera.offset).length() < 1e-4);

        let world = camera.screen_to_world(Vec2::new(642.0, 400.0));
        assert!((world - Vec2::new(11.0, -5.0)).length() < 1e-4);
    }

    #[test]
    fn test_screen_projection_corners() {
        let proj = screen_projection(Vec2::new(800.0, 600.0));
        let top_left = proj.project_point3(Vec3::ZERO);
        let bottom_right = proj.project_point3(Vec3::new(800.0, 600.0, 0.0));
        assert!((top_left.truncate() - Vec2::new(-1.0, 1.0)).length() < 1e-5);
        assert!((bottom_right.truncate() - Vec2::new(1.0, -1.0)).length() < 1e-5);
    }

    #[test]
    fn test_camera3d_target_projects_to_center() {
        let camera = Camera3D {
            position: Vec3::new(0.0, 3.0, -25.0),
            ..Camera3D::default()
        };
        let clip = camera.projection_matrix(16.0 / 9.0) * camera.view_matrix();
        let ndc = clip.project_point3(camera.target);
        assert!(ndc.truncate().length() < 1e-4);
    }
}
