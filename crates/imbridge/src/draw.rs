//! GUI draw data → immediate renderer calls.

use imbridge_core::{unpack_color, DrawCmd, DrawData, DrawList, DrawVert, ScissorRect, TextureId};
use imbridge_render::{DrawMode, ImmediateRenderer};

/// Submits one frame of GUI draw data.
///
/// Back-face culling is off while GUI geometry is drawn and every command
/// gets its own scissor rectangle. The renderer is left with no texture bound,
/// the scissor test off and culling back on.
pub fn render_draw_data(renderer: &mut dyn ImmediateRenderer, data: &DrawData) {
    renderer.draw_render_batch_active();
    renderer.disable_backface_culling();

    for list in &data.lists {
        for cmd in &list.commands {
            let scissor = ScissorRect::from_clip(
                cmd.clip_rect(),
                data.display_pos,
                data.display_size,
                data.framebuffer_scale,
            );
            renderer.enable_scissor_test();
            renderer.scissor(scissor);

            match cmd {
                DrawCmd::Callback { cmd, callback } => {
                    callback.invoke(list, cmd);
                    continue;
                }
                DrawCmd::Elements {
                    texture,
                    index_offset,
                    index_count,
                    ..
                } => render_triangles(renderer, list, *index_offset, *index_count, *texture),
            }

            renderer.draw_render_batch_active();
        }
    }

    renderer.set_texture(TextureId::NONE);
    renderer.disable_scissor_test();
    renderer.enable_backface_culling();
}

/// Emits `count / 3` triangles from the list's index buffer.
///
/// Fewer than three indices draw nothing. A batch flush forced by the vertex
/// limit restarts the triangle block with the same texture.
pub fn render_triangles(
    renderer: &mut dyn ImmediateRenderer,
    list: &DrawList,
    index_offset: usize,
    count: usize,
    texture: TextureId,
) {
    if count < 3 {
        return;
    }
    let indices = list.index_range(index_offset, count);

    renderer.begin(DrawMode::Triangles);
    renderer.set_texture(texture);

    for triangle in indices.chunks_exact(3) {
        if renderer.check_render_batch_limit(3) {
            renderer.begin(DrawMode::Triangles);
            renderer.set_texture(texture);
        }

        let vertices: Option<Vec<&DrawVert>> = triangle
            .iter()
            .map(|&i| list.vertices.get(i as usize))
            .collect();
        let Some(vertices) = vertices else {
            log::trace!("skipping triangle with out-of-range index {triangle:?}");
            continue;
        };
        for vertex in vertices {
            triangle_vert(renderer, vertex);
        }
    }

    renderer.end();
}

fn triangle_vert(renderer: &mut dyn ImmediateRenderer, vertex: &DrawVert) {
    let color = unpack_color(vertex.col);
    renderer.color4f(color.x, color.y, color.z, color.w);
    renderer.tex_coord2f(vertex.uv[0], vertex.uv[1]);
    renderer.vertex2f(vertex.pos[0], vertex.pos[1]);
}

/// Points every command drawing with `from` at `to`.
pub fn retarget_texture(data: &mut DrawData, from: TextureId, to: TextureId) {
    for list in &mut data.lists {
        for cmd in &mut list.commands {
            if let DrawCmd::Elements { texture, .. } = cmd {
                if *texture == from {
                    *texture = to;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use super::*;
    use crate::testing::{Call, RecordingRenderer};
    use glam::Vec2;
    use imbridge_core::{pack_color, ClipRect, DrawCallback};

    fn quad_list(texture: TextureId) -> DrawList {
        let white = pack_color(255, 255, 255, 255);
        let verts = [
            DrawVert::new(Vec2::new(0.0, 0.0), Vec2::new(0.0, 0.0), white),
            DrawVert::new(Vec2::new(10.0, 0.0), Vec2::new(1.0, 0.0), white),
            DrawVert::new(Vec2::new(10.0, 10.0), Vec2::new(1.0, 1.0), white),
            DrawVert::new(Vec2::new(0.0, 10.0), Vec2::new(0.0, 1.0), white),
        ];
        let mut list = DrawList::default();
        list.push_mesh(
            &verts,
            &[0, 1, 2, 0, 2, 3],
            texture,
            ClipRect::from_pos_size(Vec2::new(10.0, 20.0), Vec2::new(100.0, 50.0)),
        );
        list
    }

    fn data(lists: Vec<DrawList>) -> DrawData {
        DrawData {
            display_pos: Vec2::ZERO,
            display_size: Vec2::new(800.0, 600.0),
            framebuffer_scale: Vec2::ONE,
            lists,
        }
    }

    #[test]
    fn test_fewer_than_three_indices_is_noop() {
        let mut renderer = RecordingRenderer::default();
        let list = quad_list(TextureId::NONE);
        render_triangles(&mut renderer, &list, 0, 2, TextureId::NONE);
        assert!(renderer.calls.is_empty());
    }

    #[test]
    fn test_triangle_count_and_last_indices() {
        let mut renderer = RecordingRenderer::default();
        let list = quad_list(TextureId::from_raw(7));
        render_triangles(&mut renderer, &list, 0, 6, TextureId::from_raw(7));
        assert_eq!(renderer.vertices().len(), 6);
        // the last triangle uses indices 0, 2, 3
        let last: Vec<_> = renderer.vertices()[3..].to_vec();
        assert_eq!(last, vec![Vec2::new(0.0, 0.0), Vec2::new(10.0, 10.0), Vec2::new(0.0, 10.0)]);
        assert_eq!(
            renderer.calls[..2],
            [Call::Begin(DrawMode::Triangles), Call::SetTexture(TextureId::from_raw(7))]
        );
        assert_eq!(renderer.calls.last(), Some(&Call::End));
    }

    #[test]
    fn test_vertex_call_order() {
        let mut renderer = RecordingRenderer::default();
        let list = quad_list(TextureId::NONE);
        render_triangles(&mut renderer, &list, 0, 3, TextureId::NONE);
        let body: Vec<_> = renderer.calls[2..5].to_vec();
        assert!(matches!(body[0], Call::Color(_)));
        assert_eq!(body[1], Call::TexCoord(Vec2::ZERO));
        assert_eq!(body[2], Call::Vertex(Vec2::ZERO));
    }

    #[test]
    fn test_batch_limit_restarts_block() {
        let mut renderer = RecordingRenderer {
            flush_every: Some(1),
            ..RecordingRenderer::default()
        };
        let list = quad_list(TextureId::from_raw(3));
        render_triangles(&mut renderer, &list, 0, 6, TextureId::from_raw(3));
        let begins = renderer
            .calls
            .iter()
            .filter(|c| **c == Call::Begin(DrawMode::Triangles))
            .count();
        assert_eq!(begins, 3);
        let binds = renderer
            .calls
            .iter()
            .filter(|c| **c == Call::SetTexture(TextureId::from_raw(3)))
            .count();
        assert_eq!(binds, 3);
    }

    #[test]
    fn test_frame_state_and_scissor() {
        let mut renderer = RecordingRenderer::default();
        render_draw_data(&mut renderer, &data(vec![quad_list(TextureId::NONE)]));

        assert_eq!(renderer.calls[0], Call::Flush);
        assert_eq!(renderer.calls[1], Call::Culling(false));
        assert_eq!(renderer.calls[2], Call::ScissorOn);
        assert_eq!(
            renderer.calls[3],
            Call::Scissor(ScissorRect {
                x: 10,
                y: 530,
                width: 100,
                height: 50
            })
        );
        let n = renderer.calls.len();
        assert_eq!(
            renderer.calls[n - 4..],
            [
                Call::Flush,
                Call::SetTexture(TextureId::NONE),
                Call::ScissorOff,
                Call::Culling(true)
            ]
        );
    }

    #[test]
    fn test_callback_skips_flush() {
        let hits = Arc::new(AtomicUsize::new(0));
        let seen = Arc::clone(&hits);
        let mut list = DrawList::default();
        list.push_callback(
            ClipRect::from_pos_size(Vec2::ZERO, Vec2::new(50.0, 50.0)),
            42,
            DrawCallback::new(move |_, cmd| {
                assert_eq!(cmd.user_data, 42);
                seen.fetch_add(1, Ordering::SeqCst);
            }),
        );
        let mut renderer = RecordingRenderer::default();
        render_draw_data(&mut renderer, &data(vec![list]));
        assert_eq!(hits.load(Ordering::SeqCst), 1);
        let flushes = renderer.calls.iter().filter(|c| **c == Call::Flush).count();
        assert_eq!(flushes, 1);
    }

    #[test]
    fn test_retarget_texture() {
        let old = TextureId::from_raw(1);
        let new = TextureId::from_raw(9);
        let mut frame = data(vec![quad_list(old), quad_list(TextureId::from_raw(2))]);
        retarget_texture(&mut frame, old, new);
        let textures: Vec<_> = frame
            .lists
            .iter()
            .flat_map(|l| &l.commands)
            .filter_map(|c| match c {
                DrawCmd::Elements { texture, .. } => Some(*texture),
                DrawCmd::Callback { .. } => None,
            })
            .collect();
        assert_eq!(textures, vec![new, TextureId::from_raw(2)]);
    }
}
