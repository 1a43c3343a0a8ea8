//! Draw data produced by the GUI library at the end of a frame.
//!
//! A [`DrawData`] holds one or more [`DrawList`]s (typically one per top-level
//! window). Each list owns a vertex and an index buffer shared by its
//! commands; a [`DrawCmd`] either renders a range of that index buffer or hands
//! control to a user callback.

use std::fmt;
use std::sync::Arc;

use bytemuck::{Pod, Zeroable};
use glam::{Vec2, Vec4};

use crate::texture::TextureId;

/// A GUI vertex: position in display coordinates, texture coordinate and packed color.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct DrawVert {
    /// Position in display coordinates (top-left origin).
    pub pos: [f32; 2],
    /// Texture coordinate.
    pub uv: [f32; 2],
    /// Packed RGBA8 color, red in the lowest byte.
    pub col: u32,
}

impl DrawVert {
    /// Creates a vertex.
    #[must_use]
    pub fn new(pos: Vec2, uv: Vec2, col: u32) -> Self {
        Self {
            pos: pos.to_array(),
            uv: uv.to_array(),
            col,
        }
    }

    /// Position as a vector.
    #[must_use]
    pub fn position(&self) -> Vec2 {
        Vec2::from(self.pos)
    }

    /// Texture coordinate as a vector.
    #[must_use]
    pub fn tex_coord(&self) -> Vec2 {
        Vec2::from(self.uv)
    }
}

/// Packs 8-bit RGBA channels, red in the lowest byte.
#[must_use]
pub const fn pack_color(r: u8, g: u8, b: u8, a: u8) -> u32 {
    u32::from_le_bytes([r, g, b, a])
}

/// Converts a packed color to normalized RGBA floats.
#[must_use]
pub fn unpack_color(col: u32) -> Vec4 {
    let [r, g, b, a] = col.to_le_bytes();
    Vec4::new(
        f32::from(r) / 255.0,
        f32::from(g) / 255.0,
        f32::from(b) / 255.0,
        f32::from(a) / 255.0,
    )
}

/// Axis-aligned clip rectangle in display coordinates, stored as min/max corners.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ClipRect {
    /// Top-left corner.
    pub min: Vec2,
    /// Bottom-right corner.
    pub max: Vec2,
}

impl ClipRect {
    /// Creates a clip rectangle from its corners.
    #[must_use]
    pub const fn new(min: Vec2, max: Vec2) -> Self {
        Self { min, max }
    }

    /// Creates a clip rectangle from a position and a size.
    #[must_use]
    pub fn from_pos_size(pos: Vec2, size: Vec2) -> Self {
        Self {
            min: pos,
            max: pos + size,
        }
    }

    /// Width and height.
    #[must_use]
    pub fn size(&self) -> Vec2 {
        self.max - self.min
    }
}

/// A hardware scissor rectangle in framebuffer pixels, origin bottom-left.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ScissorRect {
    /// Left edge.
    pub x: i32,
    /// Bottom edge, measured from the bottom of the framebuffer.
    pub y: i32,
    /// Width.
    pub width: i32,
    /// Height.
    pub height: i32,
}

impl ScissorRect {
    /// Converts a GUI clip rectangle into host scissor coordinates.
    ///
    /// The clip rectangle is first made relative to `display_pos`, then scaled
    /// by `scale` into framebuffer pixels, and finally flipped so that its
    /// vertical coordinate is measured from the bottom of the display.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn from_clip(clip: ClipRect, display_pos: Vec2, display_size: Vec2, scale: Vec2) -> Self {
        let min = clip.min - display_pos;
        let size = clip.size();
        let flipped_y = display_size.y - (min.y + size.y);
        Self {
            x: (min.x * scale.x) as i32,
            y: (flipped_y * scale.y) as i32,
            width: (size.x * scale.x) as i32,
            height: (size.y * scale.y) as i32,
        }
    }

    /// Whether the rectangle covers no pixels.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.width <= 0 || self.height <= 0
    }
}

/// Information handed to a user callback.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CallbackCmd {
    /// Clip rectangle active for the callback.
    pub clip_rect: ClipRect,
    /// Opaque value chosen when the callback was recorded.
    pub user_data: u64,
}

/// A custom renderer invoked in the middle of draw list traversal.
#[derive(Clone)]
pub struct DrawCallback(Arc<dyn Fn(&DrawList, &CallbackCmd) + Send + Sync>);

impl DrawCallback {
    /// Wraps a closure.
    pub fn new(f: impl Fn(&DrawList, &CallbackCmd) + Send + Sync + 'static) -> Self {
        Self(Arc::new(f))
    }

    /// Runs the callback.
    pub fn invoke(&self, list: &DrawList, cmd: &CallbackCmd) {
        (self.0)(list, cmd);
    }
}

impl fmt::Debug for DrawCallback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("DrawCallback(..)")
    }
}

/// One command of a draw list.
#[derive(Debug, Clone)]
pub enum DrawCmd {
    /// Render `index_count` indices starting at `index_offset`.
    Elements {
        /// Clip rectangle in display coordinates.
        clip_rect: ClipRect,
        /// Texture bound while drawing.
        texture: TextureId,
        /// First index in the list's index buffer.
        index_offset: usize,
        /// Number of indices.
        index_count: usize,
    },
    /// Invoke a custom renderer.
    Callback {
        /// Callback payload.
        cmd: CallbackCmd,
        /// The renderer.
        callback: DrawCallback,
    },
}

impl DrawCmd {
    /// Clip rectangle of the command.
    #[must_use]
    pub fn clip_rect(&self) -> ClipRect {
        match self {
            Self::Elements { clip_rect, .. } => *clip_rect,
            Self::Callback { cmd, .. } => cmd.clip_rect,
        }
    }
}

/// Vertex/index buffers plus the commands drawing from them.
#[derive(Debug, Clone, Default)]
pub struct DrawList {
    /// Shared vertices.
    pub vertices: Vec<DrawVert>,
    /// Shared indices into `vertices`.
    pub indices: Vec<u32>,
    /// Commands in submission order.
    pub commands: Vec<DrawCmd>,
}

impl DrawList {
    /// Appends a triangle mesh as one `Elements` command.
    pub fn push_mesh(
        &mut self,
        vertices: &[DrawVert],
        indices: &[u32],
        texture: TextureId,
        clip_rect: ClipRect,
    ) {
        #[allow(clippy::cast_possible_truncation)]
        let base = self.vertices.len() as u32;
        let index_offset = self.indices.len();
        self.vertices.extend_from_slice(vertices);
        self.indices.extend(indices.iter().map(|i| i + base));
        self.commands.push(DrawCmd::Elements {
            clip_rect,
            texture,
            index_offset,
            index_count: indices.len(),
        });
    }

    /// Appends a callback command.
    pub fn push_callback(&mut self, clip_rect: ClipRect, user_data: u64, callback: DrawCallback) {
        self.commands.push(DrawCmd::Callback {
            cmd: CallbackCmd {
                clip_rect,
                user_data,
            },
            callback,
        });
    }

    /// Index slice of an `Elements` range, clamped to the buffer.
    #[must_use]
    pub fn index_range(&self, offset: usize, count: usize) -> &[u32] {
        let start = offset.min(self.indices.len());
        let end = offset.saturating_add(count).min(self.indices.len());
        &self.indices[start..end]
    }
}

/// Everything the GUI produced for one frame.
#[derive(Debug, Clone)]
pub struct DrawData {
    /// Top-left of the displayed area in display coordinates.
    pub display_pos: Vec2,
    /// Size of the displayed area in display coordinates.
    pub display_size: Vec2,
    /// Framebuffer pixels per display unit.
    pub framebuffer_scale: Vec2,
    /// Command lists, back to front.
    pub lists: Vec<DrawList>,
}

impl Default for DrawData {
    fn default() -> Self {
        Self {
            display_pos: Vec2::ZERO,
            display_size: Vec2::ZERO,
            framebuffer_scale: Vec2::ONE,
            lists: Vec::new(),
        }
    }
}

impl DrawData {
    /// Total number of indices across all lists.
    #[must_use]
    pub fn total_index_count(&self) -> usize {
        self.lists.iter().map(|l| l.indices.len()).sum()
    }

    /// Total number of commands across all lists.
    #[must_use]
    pub fn total_command_count(&self) -> usize {
        self.lists.iter().map(|l| l.commands.len()).sum()
    }
}
