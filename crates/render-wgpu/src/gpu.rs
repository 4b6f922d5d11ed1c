use crate::context::RenderError;
use crate::shaders;
use crate::texture::{self, GpuTexture};
use crate::uniforms::{DrawUniforms, FrameUniforms, aligned_stride};
use spincube_scene::{
    CubeGeometry, FillMode, FramePlan, MeshKind, RenderState, TextureImage, TexturedBox,
    TexturedVertex, Vertex,
};
use std::num::NonZeroU64;
use wgpu::util::DeviceExt;

const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

/// Draw slots in the per-draw uniform buffer.
pub const MAX_DRAWS: usize = 16;

struct MeshBuffers {
    vertex: wgpu::Buffer,
    index: wgpu::Buffer,
    index_count: u32,
}

impl MeshBuffers {
    fn destroy(self) {
        self.vertex.destroy();
        self.index.destroy();
    }
}

/// GPU resources owned by the scene. Dropped as a unit on release.
struct SceneResources {
    cube: MeshBuffers,
    textured_box: MeshBuffers,
    texture: GpuTexture,
}

/// wgpu renderer executing [`FramePlan`]s.
pub struct WgpuRenderer {
    cube_pipeline: wgpu::RenderPipeline,
    box_pipeline: wgpu::RenderPipeline,
    frame_buffer: wgpu::Buffer,
    frame_bind_group: wgpu::BindGroup,
    draw_buffer: wgpu::Buffer,
    draw_bind_group: wgpu::BindGroup,
    draw_stride: u64,
    depth_texture: wgpu::TextureView,
    resources: Option<SceneResources>,
}

fn uniform_layout_entry(dynamic: bool, size: usize) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding: 0,
        visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
        ty: wgpu::BindingType::Buffer {
            ty: wgpu::BufferBindingType::Uniform,
            has_dynamic_offset: dynamic,
            min_binding_size: NonZeroU64::new(size as u64),
        },
        count: None,
    }
}

fn polygon_mode(fill: FillMode, features: wgpu::Features) -> wgpu::PolygonMode {
    match fill {
        FillMode::Solid => wgpu::PolygonMode::Fill,
        FillMode::Wireframe if features.contains(wgpu::Features::POLYGON_MODE_LINE) => {
            wgpu::PolygonMode::Line
        }
        FillMode::Wireframe => {
            tracing::warn!("wireframe fill unsupported by device, drawing solid");
            wgpu::PolygonMode::Fill
        }
    }
}

impl WgpuRenderer {
    /// Build pipelines and upload geometry and texture. Buffer allocation
    /// failures are reported instead of surfacing later as device errors.
    pub fn new(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        surface_format: wgpu::TextureFormat,
        width: u32,
        height: u32,
        state: &RenderState,
        image: Option<&TextureImage>,
    ) -> Result<Self, RenderError> {
        device.push_error_scope(wgpu::ErrorFilter::OutOfMemory);
        device.push_error_scope(wgpu::ErrorFilter::Validation);

        let frame_size = std::mem::size_of::<FrameUniforms>();
        let draw_size = std::mem::size_of::<DrawUniforms>();
        let draw_stride = aligned_stride(
            draw_size as u64,
            device.limits().min_uniform_buffer_offset_alignment as u64,
        );

        let frame_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("frame_uniforms"),
            size: frame_size as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let draw_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("draw_uniforms"),
            size: draw_stride * MAX_DRAWS as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let frame_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("frame_bind_group_layout"),
            entries: &[uniform_layout_entry(false, frame_size)],
        });
        let draw_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("draw_bind_group_layout"),
            entries: &[uniform_layout_entry(true, draw_size)],
        });
        let texture_layout = texture::bind_group_layout(device);

        let frame_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("frame_bind_group"),
            layout: &frame_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: frame_buffer.as_entire_binding(),
            }],
        });
        let draw_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("draw_bind_group"),
            layout: &draw_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: wgpu::BindingResource::Buffer(wgpu::BufferBinding {
                    buffer: &draw_buffer,
                    offset: 0,
                    size: NonZeroU64::new(draw_size as u64),
                }),
            }],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("scene_pipeline_layout"),
            bind_group_layouts: &[&frame_layout, &draw_layout, &texture_layout],
            push_constant_ranges: &[],
        });
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("scene_shader"),
            source: wgpu::ShaderSource::Wgsl(shaders::SCENE_SHADER.into()),
        });

        let fill = polygon_mode(state.fill_mode, device.features());
        let make_pipeline = |label: &str, entry_point: &str, layout: wgpu::VertexBufferLayout| {
            device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
                label: Some(label),
                layout: Some(&pipeline_layout),
                vertex: wgpu::VertexState {
                    module: &shader,
                    entry_point: Some(entry_point),
                    compilation_options: Default::default(),
                    buffers: &[layout],
                },
                fragment: Some(wgpu::FragmentState {
                    module: &shader,
                    entry_point: Some("fs_main"),
                    compilation_options: Default::default(),
                    targets: &[Some(wgpu::ColorTargetState {
                        format: surface_format,
                        blend: Some(wgpu::BlendState::REPLACE),
                        write_mask: wgpu::ColorWrites::ALL,
                    })],
                }),
                primitive: wgpu::PrimitiveState {
                    topology: wgpu::PrimitiveTopology::TriangleList,
                    front_face: wgpu::FrontFace::Cw,
                    cull_mode: Some(wgpu::Face::Back),
                    polygon_mode: fill,
                    ..Default::default()
                },
                depth_stencil: Some(wgpu::DepthStencilState {
                    format: DEPTH_FORMAT,
                    depth_write_enabled: true,
                    depth_compare: wgpu::CompareFunction::Less,
                    stencil: Default::default(),
                    bias: Default::default(),
                }),
                multisample: Default::default(),
                multiview: None,
                cache: None,
            })
        };

        let cube_pipeline = make_pipeline(
            "cube_pipeline",
            "vs_cube",
            wgpu::VertexBufferLayout {
                array_stride: std::mem::size_of::<Vertex>() as u64,
                step_mode: wgpu::VertexStepMode::Vertex,
                attributes: &wgpu::vertex_attr_array![
                    0 => Float32x3,
                    1 => Float32x3,
                ],
            },
        );
        let box_pipeline = make_pipeline(
            "box_pipeline",
            "vs_textured",
            wgpu::VertexBufferLayout {
                array_stride: std::mem::size_of::<TexturedVertex>() as u64,
                step_mode: wgpu::VertexStepMode::Vertex,
                attributes: &wgpu::vertex_attr_array![
                    0 => Float32x3,
                    1 => Float32x3,
                    2 => Float32x2,
                ],
            },
        );

        // Allocate the cube buffers at their exact sizes, then fill them.
        let geometry = CubeGeometry::new();
        let cube_vertex = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("cube_vertex_buffer"),
            size: geometry.vertex_bytes(),
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let cube_index = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("cube_index_buffer"),
            size: geometry.index_bytes(),
            usage: wgpu::BufferUsages::INDEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        queue.write_buffer(&cube_vertex, 0, bytemuck::cast_slice(geometry.vertices()));
        queue.write_buffer(&cube_index, 0, bytemuck::cast_slice(geometry.indices()));
        let cube = MeshBuffers {
            vertex: cube_vertex,
            index: cube_index,
            index_count: geometry.indices().len() as u32,
        };

        let textured_box = MeshBuffers {
            vertex: device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("box_vertex_buffer"),
                contents: bytemuck::cast_slice(&TexturedBox::VERTICES),
                usage: wgpu::BufferUsages::VERTEX,
            }),
            index: device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("box_index_buffer"),
                contents: bytemuck::cast_slice(&TexturedBox::INDICES),
                usage: wgpu::BufferUsages::INDEX,
            }),
            index_count: TexturedBox::INDICES.len() as u32,
        };

        let texture = GpuTexture::upload(device, queue, &texture_layout, image, state.sampler);
        let depth_texture = Self::create_depth_texture(device, width, height);

        if let Some(source) = pollster::block_on(device.pop_error_scope()) {
            return Err(RenderError::Allocation {
                what: "scene resources",
                source,
            });
        }
        if let Some(source) = pollster::block_on(device.pop_error_scope()) {
            return Err(RenderError::Allocation {
                what: "GPU memory",
                source,
            });
        }

        tracing::info!(
            cube_indices = cube.index_count,
            box_indices = textured_box.index_count,
            textured = !texture.is_placeholder(),
            "renderer ready"
        );

        Ok(Self {
            cube_pipeline,
            box_pipeline,
            frame_buffer,
            frame_bind_group,
            draw_buffer,
            draw_bind_group,
            draw_stride,
            depth_texture,
            resources: Some(SceneResources {
                cube,
                textured_box,
                texture,
            }),
        })
    }

    /// Whether scene resources are still alive.
    pub fn is_ready(&self) -> bool {
        self.resources.is_some()
    }

    /// Draw one frame into `target`. Returns `false` without touching the
    /// target once resources have been released.
    pub fn render(
        &self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        target: &wgpu::TextureView,
        plan: &FramePlan,
    ) -> bool {
        let Some(res) = &self.resources else {
            return false;
        };

        queue.write_buffer(
            &self.frame_buffer,
            0,
            bytemuck::bytes_of(&FrameUniforms::from_plan(plan)),
        );

        let texture_bound = plan.texture_bound && !res.texture.is_placeholder();
        let items = plan.draws.items();
        if items.len() > MAX_DRAWS {
            tracing::warn!(count = items.len(), "draw list truncated to {MAX_DRAWS}");
        }
        let items = &items[..items.len().min(MAX_DRAWS)];
        for (slot, item) in items.iter().enumerate() {
            queue.write_buffer(
                &self.draw_buffer,
                slot as u64 * self.draw_stride,
                bytemuck::bytes_of(&DrawUniforms::from_item(item, texture_bound)),
            );
        }

        let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("frame_encoder"),
        });

        {
            let c = plan.clear_color;
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("scene_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: target,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color {
                            r: c.x as f64,
                            g: c.y as f64,
                            b: c.z as f64,
                            a: c.w as f64,
                        }),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_texture,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(plan.clear_depth),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                ..Default::default()
            });

            pass.set_bind_group(0, &self.frame_bind_group, &[]);
            pass.set_bind_group(2, res.texture.bind_group(), &[]);

            for (slot, item) in items.iter().enumerate() {
                let (pipeline, mesh) = match item.mesh {
                    MeshKind::Cube => (&self.cube_pipeline, &res.cube),
                    MeshKind::TexturedBox => (&self.box_pipeline, &res.textured_box),
                };
                let offset = (slot as u64 * self.draw_stride) as u32;
                pass.set_pipeline(pipeline);
                pass.set_bind_group(1, &self.draw_bind_group, &[offset]);
                pass.set_vertex_buffer(0, mesh.vertex.slice(..));
                pass.set_index_buffer(mesh.index.slice(..), wgpu::IndexFormat::Uint16);
                pass.draw_indexed(0..mesh.index_count, 0, 0..1);
            }
        }

        queue.submit(std::iter::once(encoder.finish()));
        true
    }

    /// Destroy geometry and texture. Later calls and later frames are no-ops.
    pub fn release(&mut self) {
        let Some(res) = self.resources.take() else {
            return;
        };
        res.cube.destroy();
        res.textured_box.destroy();
        res.texture.destroy();
        tracing::info!("renderer resources released");
    }

    fn create_depth_texture(device: &wgpu::Device, width: u32, height: u32) -> wgpu::TextureView {
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("depth_texture"),
            size: wgpu::Extent3d {
                width: width.max(1),
                height: height.max(1),
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: DEPTH_FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });
        texture.create_view(&Default::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn solid_fill_never_needs_features() {
        assert_eq!(
            polygon_mode(FillMode::Solid, wgpu::Features::empty()),
            wgpu::PolygonMode::Fill
        );
    }

    #[test]
    fn wireframe_falls_back_without_feature() {
        assert_eq!(
            polygon_mode(FillMode::Wireframe, wgpu::Features::empty()),
            wgpu::PolygonMode::Fill
        );
        assert_eq!(
            polygon_mode(FillMode::Wireframe, wgpu::Features::POLYGON_MODE_LINE),
            wgpu::PolygonMode::Line
        );
    }
}
