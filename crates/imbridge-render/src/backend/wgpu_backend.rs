//! Windowed backend on wgpu.
//!
//! Vertices are transformed to clip space on the CPU and drawn with one of
//! eight small pipelines keyed by culling, depth test and whether the pass
//! targets the screen or an offscreen target. Offscreen targets are rendered
//! upside down so their rows are stored bottom first.

use std::collections::HashMap;
use std::ops::Range;
use std::sync::Arc;

use glam::Vec3;
use imbridge_core::{ScissorRect, TextureId};
use wgpu::util::DeviceExt;

use super::GraphicsBackend;
use crate::batch::{DrawCall, FrameOp};
use crate::color::Color;
use crate::error::{RenderError, RenderResult};
use crate::image::Image;

const TARGET_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8Unorm;
const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

/// Vertex layout consumed by `batch.wgsl`.
#[repr(C)]
#[derive(Debug, Clone, Copy, bytemuck::Pod, bytemuck::Zeroable)]
struct GpuVertex {
    clip_position: [f32; 4],
    tex_coord: [f32; 2],
    color: [f32; 4],
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct PipelineKey {
    cull: bool,
    depth: bool,
    offscreen: bool,
}

struct GpuTexture {
    _texture: wgpu::Texture,
    bind_group: wgpu::BindGroup,
}

struct GpuTarget {
    color: GpuTexture,
    view: wgpu::TextureView,
    depth_view: wgpu::TextureView,
    width: u32,
    height: u32,
}

/// Converts a bottom-left scissor into a top-left one clamped to the target.
/// Returns `None` when nothing remains visible.
#[must_use]
#[allow(clippy::cast_sign_loss, clippy::cast_possible_wrap)]
pub fn scissor_to_top_left(
    rect: ScissorRect,
    target_width: u32,
    target_height: u32,
    bottom_row_first: bool,
) -> Option<(u32, u32, u32, u32)> {
    let tw = target_width as i32;
    let th = target_height as i32;
    let top = if bottom_row_first {
        rect.y
    } else {
        th - (rect.y + rect.height)
    };
    let x0 = rect.x.clamp(0, tw);
    let y0 = top.clamp(0, th);
    let x1 = (rect.x + rect.width).clamp(0, tw);
    let y1 = (top + rect.height).clamp(0, th);
    if x1 <= x0 || y1 <= y0 {
        return None;
    }
    Some((x0 as u32, y0 as u32, (x1 - x0) as u32, (y1 - y0) as u32))
}

/// A [`GraphicsBackend`] presenting to a window surface.
pub struct WgpuBackend {
    device: wgpu::Device,
    queue: wgpu::Queue,
    surface: wgpu::Surface<'static>,
    surface_config: wgpu::SurfaceConfiguration,
    depth_view: wgpu::TextureView,
    bind_group_layout: wgpu::BindGroupLayout,
    sampler: wgpu::Sampler,
    pipelines: HashMap<PipelineKey, wgpu::RenderPipeline>,
    white: GpuTexture,
    textures: HashMap<TextureId, GpuTexture>,
    targets: HashMap<TextureId, GpuTarget>,
    next_id: u64,
}

impl WgpuBackend {
    /// Creates a backend drawing into `window`.
    pub async fn new(window: Arc<winit::window::Window>) -> RenderResult<Self> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..wgpu::InstanceDescriptor::default()
        });

        let surface = instance.create_surface(window.clone())?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .map_err(|_| RenderError::AdapterCreationFailed)?;

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("imbridge device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default(),
                memory_hints: wgpu::MemoryHints::default(),
                trace: wgpu::Trace::default(),
                experimental_features: wgpu::ExperimentalFeatures::default(),
            })
            .await?;

        let size = window.inner_size();
        let width = size.width.max(1);
        let height = size.height.max(1);

        // GUI colors are blended in gamma space, so prefer a non-sRGB surface.
        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| !f.is_srgb())
            .or_else(|| surface_caps.formats.first())
            .copied()
            .ok_or(RenderError::SurfaceConfigurationFailed)?;
        let alpha_mode = surface_caps
            .alpha_modes
            .first()
            .copied()
            .unwrap_or(wgpu::CompositeAlphaMode::Auto);

        let surface_config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width,
            height,
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &surface_config);

        let depth_view = create_depth_view(&device, width, height);

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("batch bind group layout"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                        view_dimension: wgpu::TextureViewDimension::D2,
                        multisampled: false,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
            ],
        });

        // Repeat addressing: flipped image rectangles use negative texture coordinates.
        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("batch sampler"),
            address_mode_u: wgpu::AddressMode::Repeat,
            address_mode_v: wgpu::AddressMode::Repeat,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            ..Default::default()
        });

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("batch shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("../shaders/batch.wgsl").into()),
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("batch pipeline layout"),
            bind_group_layouts: &[&bind_group_layout],
            push_constant_ranges: &[],
        });

        let mut pipelines = HashMap::new();
        for cull in [false, true] {
            for depth in [false, true] {
                for offscreen in [false, true] {
                    let key = PipelineKey {
                        cull,
                        depth,
                        offscreen,
                    };
                    let format = if offscreen {
                        TARGET_FORMAT
                    } else {
                        surface_format
                    };
                    let pipeline =
                        create_pipeline(&device, &pipeline_layout, &shader, format, key);
                    pipelines.insert(key, pipeline);
                }
            }
        }

        let (white_texture, white_view) = upload_rgba(
            &device,
            &queue,
            "white texture",
            &Image::filled(1, 1, Color::WHITE),
        );
        let white = GpuTexture {
            bind_group: create_bind_group(&device, &bind_group_layout, &white_view, &sampler),
            _texture: white_texture,
        };

        log::info!(
            "wgpu backend ready: {:?}, surface {width}x{height} {surface_format:?}",
            adapter.get_info().backend
        );

        Ok(Self {
            device,
            queue,
            surface,
            surface_config,
            depth_view,
            bind_group_layout,
            sampler,
            pipelines,
            white,
            textures: HashMap::new(),
            targets: HashMap::new(),
            next_id: 1,
        })
    }

    fn allocate(&mut self) -> TextureId {
        let id = TextureId::from_raw(self.next_id);
        self.next_id += 1;
        id
    }

    fn bind_group(&self, id: TextureId) -> &wgpu::BindGroup {
        if id.is_none() {
            return &self.white.bind_group;
        }
        if let Some(texture) = self.textures.get(&id) {
            return &texture.bind_group;
        }
        if let Some(target) = self.targets.get(&id) {
            return &target.color.bind_group;
        }
        log::trace!("unknown texture {id}, drawing untextured");
        &self.white.bind_group
    }

    fn encode_pass(
        &self,
        encoder: &mut wgpu::CommandEncoder,
        screen_view: &wgpu::TextureView,
        target: Option<TextureId>,
        clear: Option<Color>,
        draws: &[(&DrawCall, Range<u32>)],
        vertex_buffer: Option<&wgpu::Buffer>,
    ) {
        let (view, depth_view, width, height) = match target {
            None => (
                screen_view,
                &self.depth_view,
                self.surface_config.width,
                self.surface_config.height,
            ),
            Some(id) => {
                let Some(t) = self.targets.get(&id) else {
                    log::warn!("render target {id} no longer exists, skipping pass");
                    return;
                };
                (&t.view, &t.depth_view, t.width, t.height)
            }
        };
        let offscreen = target.is_some();

        let (color_load, depth_load) = match clear {
            Some(c) => {
                let v = c.to_vec4();
                (
                    wgpu::LoadOp::Clear(wgpu::Color {
                        r: f64::from(v.x),
                        g: f64::from(v.y),
                        b: f64::from(v.z),
                        a: f64::from(v.w),
                    }),
                    wgpu::LoadOp::Clear(1.0),
                )
            }
            None => (wgpu::LoadOp::Load, wgpu::LoadOp::Load),
        };

        let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("batch pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: color_load,
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                view: depth_view,
                depth_ops: Some(wgpu::Operations {
                    load: depth_load,
                    store: wgpu::StoreOp::Store,
                }),
                stencil_ops: None,
            }),
            ..Default::default()
        });

        let Some(vertex_buffer) = vertex_buffer else {
            return;
        };
        pass.set_vertex_buffer(0, vertex_buffer.slice(..));

        for (call, range) in draws {
            let key = PipelineKey {
                cull: call.state.cull_backfaces,
                depth: call.state.depth_test,
                offscreen,
            };
            let Some(pipeline) = self.pipelines.get(&key) else {
                continue;
            };
            let (x, y, w, h) = match call.state.scissor {
                Some(rect) => match scissor_to_top_left(rect, width, height, offscreen) {
                    Some(r) => r,
                    None => continue,
                },
                None => (0, 0, width, height),
            };
            pass.set_pipeline(pipeline);
            pass.set_bind_group(0, self.bind_group(call.state.texture), &[]);
            pass.set_scissor_rect(x, y, w, h);
            pass.draw(range.clone(), 0..1);
        }
    }
}

impl GraphicsBackend for WgpuBackend {
    fn create_texture(&mut self, image: &Image) -> RenderResult<TextureId> {
        if image.width == 0 || image.height == 0 {
            return Err(RenderError::TextureCreationFailed(format!(
                "zero-sized image {}x{}",
                image.width, image.height
            )));
        }
        let (texture, view) = upload_rgba(&self.device, &self.queue, "image texture", image);
        let bind_group =
            create_bind_group(&self.device, &self.bind_group_layout, &view, &self.sampler);
        let id = self.allocate();
        self.textures.insert(
            id,
            GpuTexture {
                _texture: texture,
                bind_group,
            },
        );
        log::debug!("texture {id} uploaded ({}x{})", image.width, image.height);
        Ok(id)
    }

    fn destroy_texture(&mut self, id: TextureId) {
        if self.textures.remove(&id).is_some() {
            log::debug!("texture {id} released");
        }
    }

    fn has_texture(&self, id: TextureId) -> bool {
        self.textures.contains_key(&id) || self.targets.contains_key(&id)
    }

    fn create_render_target(&mut self, width: u32, height: u32) -> RenderResult<TextureId> {
        if width == 0 || height == 0 {
            return Err(RenderError::TextureCreationFailed(format!(
                "zero-sized render target {width}x{height}"
            )));
        }
        let texture = self.device.create_texture(&wgpu::TextureDescriptor {
            label: Some("render target"),
            size: wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: TARGET_FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT
                | wgpu::TextureUsages::TEXTURE_BINDING
                | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        let bind_group =
            create_bind_group(&self.device, &self.bind_group_layout, &view, &self.sampler);
        let depth_view = create_depth_view(&self.device, width, height);

        let id = self.allocate();
        self.targets.insert(
            id,
            GpuTarget {
                color: GpuTexture {
                    _texture: texture,
                    bind_group,
                },
                view,
                depth_view,
                width,
                height,
            },
        );
        log::debug!("render target {id} created ({width}x{height})");
        Ok(id)
    }

    fn destroy_render_target(&mut self, id: TextureId) {
        if self.targets.remove(&id).is_some() {
            log::debug!("render target {id} released");
        }
    }

    fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        self.surface_config.width = width;
        self.surface_config.height = height;
        self.surface.configure(&self.device, &self.surface_config);
        self.depth_view = create_depth_view(&self.device, width, height);
    }

    fn surface_size(&self) -> (u32, u32) {
        (self.surface_config.width, self.surface_config.height)
    }

    fn present(&mut self, ops: &[FrameOp]) -> RenderResult<()> {
        let output = match self.surface.get_current_texture() {
            Ok(output) => output,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                self.surface.configure(&self.device, &self.surface_config);
                return Ok(());
            }
            Err(wgpu::SurfaceError::OutOfMemory) => {
                log::error!("Out of memory");
                return Err(RenderError::OutOfMemory);
            }
            Err(wgpu::SurfaceError::Timeout) => {
                log::warn!("Surface timeout");
                return Ok(());
            }
            Err(wgpu::SurfaceError::Other) => {
                log::warn!("Surface error: other");
                return Ok(());
            }
        };

        let screen_view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut vertices = Vec::new();
        let mut ranges = Vec::with_capacity(ops.len());
        for op in ops {
            let range = match op {
                FrameOp::Draw(call) => Some(append_clip_vertices(&mut vertices, call)),
                FrameOp::Clear { .. } => None,
            };
            ranges.push(range);
        }

        let vertex_buffer = (!vertices.is_empty()).then(|| {
            self.device
                .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                    label: Some("batch vertices"),
                    contents: bytemuck::cast_slice(&vertices),
                    usage: wgpu::BufferUsages::VERTEX,
                })
        });

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("render encoder"),
            });

        // Consecutive operations on the same target share one pass; a clear opens a new one.
        let mut i = 0;
        while i < ops.len() {
            let (target, clear, mut j) = match &ops[i] {
                FrameOp::Clear { target, color } => (*target, Some(*color), i + 1),
                FrameOp::Draw(call) => (call.state.target, None, i),
            };
            let mut draws = Vec::new();
            while let Some(FrameOp::Draw(call)) = ops.get(j) {
                if call.state.target != target {
                    break;
                }
                if let Some(range) = ranges[j].clone() {
                    draws.push((call, range));
                }
                j += 1;
            }
            self.encode_pass(
                &mut encoder,
                &screen_view,
                target,
                clear,
                &draws,
                vertex_buffer.as_ref(),
            );
            i = j;
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        output.present();
        Ok(())
    }
}

#[allow(clippy::cast_possible_truncation)]
fn append_clip_vertices(out: &mut Vec<GpuVertex>, call: &DrawCall) -> Range<u32> {
    let start = out.len() as u32;
    let flip = call.state.target.is_some();
    for v in &call.vertices {
        let mut clip = call.state.transform * Vec3::from(v.position).extend(1.0);
        if flip {
            clip.y = -clip.y;
        }
        out.push(GpuVertex {
            clip_position: clip.to_array(),
            tex_coord: v.tex_coord,
            color: v.color,
        });
    }
    start..out.len() as u32
}

fn create_depth_view(device: &wgpu::Device, width: u32, height: u32) -> wgpu::TextureView {
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some("depth texture"),
        size: wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: DEPTH_FORMAT,
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
        view_formats: &[],
    });
    texture.create_view(&wgpu::TextureViewDescriptor::default())
}

fn upload_rgba(
    device: &wgpu::Device,
    queue: &wgpu::Queue,
    label: &str,
    image: &Image,
) -> (wgpu::Texture, wgpu::TextureView) {
    let size = wgpu::Extent3d {
        width: image.width,
        height: image.height,
        depth_or_array_layers: 1,
    };
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some(label),
        size,
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: TARGET_FORMAT,
        usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
        view_formats: &[],
    });
    queue.write_texture(
        wgpu::TexelCopyTextureInfo {
            texture: &texture,
            mip_level: 0,
            origin: wgpu::Origin3d::ZERO,
            aspect: wgpu::TextureAspect::All,
        },
        &image.data,
        wgpu::TexelCopyBufferLayout {
            offset: 0,
            bytes_per_row: Some(4 * image.width),
            rows_per_image: Some(image.height),
        },
        size,
    );
    let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
    (texture, view)
}

fn create_bind_group(
    device: &wgpu::Device,
    layout: &wgpu::BindGroupLayout,
    view: &wgpu::TextureView,
    sampler: &wgpu::Sampler,
) -> wgpu::BindGroup {
    device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some("batch texture bind group"),
        layout,
        entries: &[
            wgpu::BindGroupEntry {
                binding: 0,
                resource: wgpu::BindingResource::TextureView(view),
            },
            wgpu::BindGroupEntry {
                binding: 1,
                resource: wgpu::BindingResource::Sampler(sampler),
            },
        ],
    })
}

fn create_pipeline(
    device: &wgpu::Device,
    layout: &wgpu::PipelineLayout,
    shader: &wgpu::ShaderModule,
    format: wgpu::TextureFormat,
    key: PipelineKey,
) -> wgpu::RenderPipeline {
    // Offscreen passes flip y, which mirrors the winding.
    let front_face = if key.offscreen {
        wgpu::FrontFace::Cw
    } else {
        wgpu::FrontFace::Ccw
    };

    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some("batch pipeline"),
        layout: Some(layout),
        vertex: wgpu::VertexState {
            module: shader,
            entry_point: Some("vs_main"),
            buffers: &[wgpu::VertexBufferLayout {
                array_stride: std::mem::size_of::<GpuVertex>() as wgpu::BufferAddress,
                step_mode: wgpu::VertexStepMode::Vertex,
                attributes: &wgpu::vertex_attr_array![
                    0 => Float32x4,
                    1 => Float32x2,
                    2 => Float32x4
                ],
            }],
            compilation_options: wgpu::PipelineCompilationOptions::default(),
        },
        fragment: Some(wgpu::FragmentState {
            module: shader,
            entry_point: Some("fs_main"),
            targets: &[Some(wgpu::ColorTargetState {
                format,
                blend: Some(wgpu::BlendState::PREMULTIPLIED_ALPHA_BLENDING),
                write_mask: wgpu::ColorWrites::ALL,
            })],
            compilation_options: wgpu::PipelineCompilationOptions::default(),
        }),
        primitive: wgpu::PrimitiveState {
            topology: wgpu::PrimitiveTopology::TriangleList,
            front_face,
            cull_mode: key.cull.then_some(wgpu::Face::Back),
            ..Default::default()
        },
        depth_stencil: Some(wgpu::DepthStencilState {
            format: DEPTH_FORMAT,
            depth_write_enabled: key.depth,
            depth_compare: if key.depth {
                wgpu::CompareFunction::Less
            } else {
                wgpu::CompareFunction::Always
            },
            stencil: wgpu::StencilState::default(),
            bias: wgpu::DepthBiasState::default(),
        }),
        multisample: wgpu::MultisampleState::default(),
        multiview: None,
        cache: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scissor_screen_flip() {
        let rect = ScissorRect {
            x: 10,
            y: 530,
            width: 100,
            height: 50,
        };
        assert_eq!(scissor_to_top_left(rect, 800, 600, false), Some((10, 20, 100, 50)));
        // offscreen targets already store rows bottom first
        assert_eq!(scissor_to_top_left(rect, 800, 600, true), Some((10, 530, 100, 50)));
    }

    #[test]
    fn test_scissor_clamped() {
        let rect = ScissorRect {
            x: -20,
            y: 0,
            width: 100,
            height: 1000,
        };
        assert_eq!(scissor_to_top_left(rect, 800, 600, false), Some((0, 0, 80, 600)));
    }

    #[test]
    fn test_empty_scissor() {
        let rect = ScissorRect {
            x: 900,
            y: 0,
            width: 10,
            height: 10,
        };
        assert_eq!(scissor_to_top_left(rect, 800, 600, false), None);
    }
}
