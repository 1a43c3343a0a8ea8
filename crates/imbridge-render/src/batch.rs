//! CPU-side vertex batching.
//!
//! [`RenderBatch`] accumulates immediate-mode vertices under a current draw
//! state. Whenever the state changes (texture, scissor, culling, depth test,
//! matrices or render target) the pending vertices are closed into a
//! [`DrawCall`]. A frame is the ordered list of [`FrameOp`]s recorded between
//! [`RenderBatch::begin_frame`] and [`RenderBatch::take_ops`].

use glam::{Mat4, Vec2, Vec3};
use imbridge_core::{ScissorRect, TextureId};

use crate::camera::screen_projection;
use crate::color::Color;

/// Primitive assembly for `begin`/`end` blocks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrawMode {
    /// Every three vertices form a triangle.
    Triangles,
    /// Every four vertices form a quad, split into two triangles.
    Quads,
}

impl DrawMode {
    const fn vertices_per_primitive(self) -> usize {
        match self {
            Self::Triangles => 3,
            Self::Quads => 4,
        }
    }
}

/// One batched vertex, position still in model space.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct BatchVertex {
    /// Model-space position.
    pub position: [f32; 3],
    /// Texture coordinate.
    pub tex_coord: [f32; 2],
    /// Normalized RGBA.
    pub color: [f32; 4],
}

/// Render state shared by every vertex of a draw call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawState {
    /// Bound texture; [`TextureId::NONE`] samples plain white.
    pub texture: TextureId,
    /// Scissor rectangle, origin bottom-left, when the scissor test is on.
    pub scissor: Option<ScissorRect>,
    /// Back faces are culled.
    pub cull_backfaces: bool,
    /// Depth test and write are enabled.
    pub depth_test: bool,
    /// Projection × model-view.
    pub transform: Mat4,
    /// Render target, `None` for the screen.
    pub target: Option<TextureId>,
}

impl Default for DrawState {
    fn default() -> Self {
        Self {
            texture: TextureId::NONE,
            scissor: None,
            cull_backfaces: true,
            depth_test: false,
            transform: Mat4::IDENTITY,
            target: None,
        }
    }
}

/// A closed run of triangles sharing one [`DrawState`].
#[derive(Debug, Clone, PartialEq)]
pub struct DrawCall {
    /// State the triangles are drawn with.
    pub state: DrawState,
    /// Triangle list vertices.
    pub vertices: Vec<BatchVertex>,
}

impl DrawCall {
    /// Number of triangles.
    #[must_use]
    pub fn triangle_count(&self) -> usize {
        self.vertices.len() / 3
    }
}

/// One recorded frame operation.
#[derive(Debug, Clone, PartialEq)]
pub enum FrameOp {
    /// Clear color and depth of a target.
    Clear {
        /// Target, `None` for the screen.
        target: Option<TextureId>,
        /// Clear color.
        color: Color,
    },
    /// Draw triangles.
    Draw(DrawCall),
}

/// Immediate-mode vertex batcher.
#[derive(Debug, Clone)]
pub struct RenderBatch {
    capacity: usize,
    ops: Vec<FrameOp>,
    pending: Vec<BatchVertex>,
    partial: Vec<BatchVertex>,
    mode: Option<DrawMode>,
    state: DrawState,
    scissor_enabled: bool,
    scissor_rect: ScissorRect,
    projection: Mat4,
    modelview: Mat4,
    color: [f32; 4],
    tex_coord: [f32; 2],
    screen_size: Vec2,
    target_size: Option<Vec2>,
    flush_count: usize,
}

impl RenderBatch {
    /// Creates a batch that flushes once `capacity` vertices are pending.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let mut batch = Self {
            capacity: capacity.max(6),
            ops: Vec::new(),
            pending: Vec::new(),
            partial: Vec::new(),
            mode: None,
            state: DrawState::default(),
            scissor_enabled: false,
            scissor_rect: ScissorRect::default(),
            projection: Mat4::IDENTITY,
            modelview: Mat4::IDENTITY,
            color: [1.0; 4],
            tex_coord: [0.0; 2],
            screen_size: Vec2::ZERO,
            target_size: None,
            flush_count: 0,
        };
        batch.begin_frame(Vec2::ONE);
        batch
    }

    /// Resets all state for a new frame drawn to a screen of `screen_size` logical units.
    pub fn begin_frame(&mut self, screen_size: Vec2) {
        self.ops.clear();
        self.pending.clear();
        self.partial.clear();
        self.mode = None;
        self.scissor_enabled = false;
        self.scissor_rect = ScissorRect::default();
        self.screen_size = screen_size;
        self.target_size = None;
        self.projection = screen_projection(screen_size);
        self.modelview = Mat4::IDENTITY;
        self.color = [1.0; 4];
        self.tex_coord = [0.0; 2];
        self.flush_count = 0;
        self.state = DrawState {
            transform: self.projection,
            ..DrawState::default()
        };
    }

    /// Flushes and returns everything recorded since [`Self::begin_frame`].
    pub fn take_ops(&mut self) -> Vec<FrameOp> {
        self.flush();
        std::mem::take(&mut self.ops)
    }

    /// Operations recorded so far, excluding pending vertices.
    #[must_use]
    pub fn ops(&self) -> &[FrameOp] {
        &self.ops
    }

    /// Closes the pending vertices into a draw call.
    pub fn flush(&mut self) {
        if self.pending.is_empty() {
            return;
        }
        self.ops.push(FrameOp::Draw(DrawCall {
            state: self.state,
            vertices: std::mem::take(&mut self.pending),
        }));
        self.flush_count += 1;
    }

    /// Flushes when `vertex_count` more vertices would overflow the batch.
    /// Returns whether a flush happened.
    pub fn check_limit(&mut self, vertex_count: usize) -> bool {
        if self.pending.len() + self.partial.len() + vertex_count > self.capacity {
            self.flush();
            true
        } else {
            false
        }
    }

    /// Number of flushes that produced a draw call this frame.
    #[must_use]
    pub fn flush_count(&self) -> usize {
        self.flush_count
    }

    /// Number of vertices waiting to be closed into a draw call.
    #[must_use]
    pub fn pending_vertices(&self) -> usize {
        self.pending.len()
    }

    /// Starts a primitive block.
    pub fn begin(&mut self, mode: DrawMode) {
        if !self.partial.is_empty() {
            log::trace!("discarding {} dangling vertices", self.partial.len());
            self.partial.clear();
        }
        self.mode = Some(mode);
    }

    /// Ends the primitive block; an unfinished primitive is discarded.
    pub fn end(&mut self) {
        if !self.partial.is_empty() {
            log::trace!("discarding {} dangling vertices", self.partial.len());
            self.partial.clear();
        }
        self.mode = None;
    }

    /// Sets the color of following vertices.
    pub fn color(&mut self, rgba: [f32; 4]) {
        self.color = rgba;
    }

    /// Sets the texture coordinate of the next vertex.
    pub fn tex_coord(&mut self, uv: Vec2) {
        self.tex_coord = uv.to_array();
    }

    /// Emits a vertex. Ignored outside `begin`/`end`.
    pub fn vertex(&mut self, position: Vec3) {
        let Some(mode) = self.mode else {
            log::trace!("vertex outside begin/end ignored");
            return;
        };
        self.partial.push(BatchVertex {
            position: position.to_array(),
            tex_coord: self.tex_coord,
            color: self.color,
        });
        if self.partial.len() < mode.vertices_per_primitive() {
            return;
        }
        match mode {
            DrawMode::Triangles => self.pending.append(&mut self.partial),
            DrawMode::Quads => {
                let q = std::mem::take(&mut self.partial);
                self.pending
                    .extend_from_slice(&[q[0], q[1], q[2], q[0], q[2], q[3]]);
            }
        }
        if self.pending.len() >= self.capacity {
            self.flush();
        }
    }

    /// Binds a texture.
    pub fn set_texture(&mut self, texture: TextureId) {
        self.change_state(|s| s.texture = texture);
    }

    /// Enables or disables back-face culling.
    pub fn set_backface_culling(&mut self, enabled: bool) {
        self.change_state(|s| s.cull_backfaces = enabled);
    }

    /// Enables or disables the depth test.
    pub fn set_depth_test(&mut self, enabled: bool) {
        self.change_state(|s| s.depth_test = enabled);
    }

    /// Enables or disables the scissor test.
    pub fn set_scissor_test(&mut self, enabled: bool) {
        self.scissor_enabled = enabled;
        let scissor = enabled.then_some(self.scissor_rect);
        self.change_state(|s| s.scissor = scissor);
    }

    /// Sets the scissor rectangle (origin bottom-left, framebuffer pixels).
    pub fn set_scissor(&mut self, rect: ScissorRect) {
        self.scissor_rect = rect;
        let scissor = self.scissor_enabled.then_some(rect);
        self.change_state(|s| s.scissor = scissor);
    }

    /// Current projection matrix.
    #[must_use]
    pub fn projection(&self) -> Mat4 {
        self.projection
    }

    /// Current model-view matrix.
    #[must_use]
    pub fn modelview(&self) -> Mat4 {
        self.modelview
    }

    /// Replaces the projection matrix.
    pub fn set_projection(&mut self, projection: Mat4) {
        self.projection = projection;
        let transform = self.projection * self.modelview;
        self.change_state(|s| s.transform = transform);
    }

    /// Replaces the model-view matrix.
    pub fn set_modelview(&mut self, modelview: Mat4) {
        self.modelview = modelview;
        let transform = self.projection * self.modelview;
        self.change_state(|s| s.transform = transform);
    }

    /// Size of the current render target in logical units.
    #[must_use]
    pub fn render_size(&self) -> Vec2 {
        self.target_size.unwrap_or(self.screen_size)
    }

    /// Redirects drawing to an offscreen target with a fresh screen-space projection.
    pub fn begin_target(&mut self, target: TextureId, size: Vec2) {
        self.flush();
        self.target_size = Some(size);
        self.state.target = Some(target);
        self.projection = screen_projection(size);
        self.modelview = Mat4::IDENTITY;
        self.state.transform = self.projection;
    }

    /// Returns drawing to the screen.
    pub fn end_target(&mut self) {
        self.flush();
        self.target_size = None;
        self.state.target = None;
        self.projection = screen_projection(self.screen_size);
        self.modelview = Mat4::IDENTITY;
        self.state.transform = self.projection;
    }

    /// Records a clear of the current target.
    pub fn clear(&mut self, color: Color) {
        self.flush();
        self.ops.push(FrameOp::Clear {
            target: self.state.target,
            color,
        });
    }

    fn change_state(&mut self, apply: impl FnOnce(&mut DrawState)) {
        let mut next = self.state;
        apply(&mut next);
        if next != self.state {
            self.flush();
            self.state = next;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draw_calls(ops: &[FrameOp]) -> Vec<&DrawCall> {
        ops.iter()
            .filter_map(|op| match op {
                FrameOp::Draw(call) => Some(call),
                FrameOp::Clear { .. } => None,
            })
            .collect()
    }

    fn triangle(batch: &mut RenderBatch) {
        batch.vertex(Vec3::ZERO);
        batch.vertex(Vec3::X);
        batch.vertex(Vec3::Y);
    }

    #[test]
    fn test_quads_split_into_triangles() {
        let mut batch = RenderBatch::new(64);
        batch.begin(DrawMode::Quads);
        for p in [Vec3::ZERO, Vec3::Y, Vec3::ONE, Vec3::X] {
            batch.vertex(p);
        }
        batch.end();
        let ops = batch.take_ops();
        let calls = draw_calls(&ops);
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].triangle_count(), 2);
        assert_eq!(calls[0].vertices[3].position, [0.0, 0.0, 0.0]);
        assert_eq!(calls[0].vertices[5].position, [1.0, 0.0, 0.0]);
    }

    #[test]
    fn test_texture_change_splits_draw_calls() {
        let mut batch = RenderBatch::new(64);
        batch.begin(DrawMode::Triangles);
        batch.set_texture(TextureId::from_raw(1));
        triangle(&mut batch);
        batch.set_texture(TextureId::from_raw(1));
        triangle(&mut batch);
        batch.set_texture(TextureId::from_raw(2));
        triangle(&mut batch);
        batch.end();

        let ops = batch.take_ops();
        let calls = draw_calls(&ops);
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0].triangle_count(), 2);
        assert_eq!(calls[1].state.texture, TextureId::from_raw(2));
    }

    #[test]
    fn test_scissor_only_applies_when_enabled() {
        let rect = ScissorRect {
            x: 1,
            y: 2,
            width: 3,
            height: 4,
        };
        let mut batch = RenderBatch::new(64);
        batch.set_scissor(rect);
        batch.begin(DrawMode::Triangles);
        triangle(&mut batch);
        batch.end();
        batch.set_scissor_test(true);
        batch.begin(DrawMode::Triangles);
        triangle(&mut batch);
        batch.end();

        let ops = batch.take_ops();
        let calls = draw_calls(&ops);
        assert_eq!(calls[0].state.scissor, None);
        assert_eq!(calls[1].state.scissor, Some(rect));
    }

    #[test]
    fn test_check_limit_flushes() {
        let mut batch = RenderBatch::new(6);
        batch.begin(DrawMode::Triangles);
        triangle(&mut batch);
        assert!(!batch.check_limit(3));
        triangle(&mut batch);
        // six pending vertices reached capacity and were flushed
        assert_eq!(batch.pending_vertices(), 0);
        triangle(&mut batch);
        assert!(batch.check_limit(6));
        assert_eq!(batch.flush_count(), 2);
    }

    #[test]
    fn test_dangling_vertices_dropped() {
        let mut batch = RenderBatch::new(64);
        batch.begin(DrawMode::Triangles);
        batch.vertex(Vec3::ZERO);
        batch.vertex(Vec3::X);
        batch.end();
        batch.vertex(Vec3::Y);
        assert!(batch.take_ops().is_empty());
    }

    #[test]
    fn test_clear_records_target() {
        let mut batch = RenderBatch::new(64);
        batch.begin_frame(Vec2::new(800.0, 600.0));
        batch.begin_target(TextureId::from_raw(7), Vec2::new(256.0, 128.0));
        assert_eq!(batch.render_size(), Vec2::new(256.0, 128.0));
        batch.clear(Color::SKYBLUE);
        batch.end_target();
        batch.clear(Color::DARKGRAY);
        assert_eq!(batch.render_size(), Vec2::new(800.0, 600.0));

        let ops = batch.take_ops();
        assert_eq!(
            ops,
            vec![
                FrameOp::Clear {
                    target: Some(TextureId::from_raw(7)),
                    color: Color::SKYBLUE
                },
                FrameOp::Clear {
                    target: None,
                    color: Color::DARKGRAY
                },
            ]
        );
    }

    #[test]
    fn test_vertex_carries_current_attributes() {
        let mut batch = RenderBatch::new(64);
        batch.begin(DrawMode::Triangles);
        batch.color([1.0, 0.0, 0.0, 1.0]);
        batch.tex_coord(Vec2::new(0.5, 0.25));
        triangle(&mut batch);
        batch.end();
        let ops = batch.take_ops();
        let v = draw_calls(&ops)[0].vertices[2];
        assert_eq!(v.color, [1.0, 0.0, 0.0, 1.0]);
        assert_eq!(v.tex_coord, [0.5, 0.25]);
    }
}
