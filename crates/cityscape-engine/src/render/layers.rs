use bytemuck::{Pod, Zeroable};
use wgpu::util::DeviceExt;

use crate::camera::FrameMatrices;
use crate::layers::{LayerKind, Layers};
use crate::render::{RenderCtx, RenderTarget};

/// Background color of the scene (light blue-gray sky).
pub const CLEAR_COLOR: wgpu::Color = wgpu::Color {
    r: 190.0 / 255.0,
    g: 210.0 / 255.0,
    b: 215.0 / 255.0,
    a: 1.0,
};

/// Per-frame matrices shared by every layer, uploaded once per frame.
#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
struct FrameUniform {
    model: [[f32; 4]; 4],
    view: [[f32; 4]; 4],
    projection: [[f32; 4]; 4],
}

/// Per-layer constants (the layer's base color).
#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
struct LayerUniform {
    color: [f32; 4],
}

/// GPU-side mirror of one layer.
struct LayerMesh {
    kind: LayerKind,
    vertex_buffer: wgpu::Buffer,
    normal_buffer: Option<wgpu::Buffer>,
    index_buffer: wgpu::Buffer,
    index_count: u32,
    layer_bind_group: wgpu::BindGroup,
}

/// Renderer for the layer collection.
///
/// Owns the flat and lit pipelines plus per-layer mesh buffers. Meshes are
/// re-uploaded whenever the collection's revision changes; dropping the old
/// buffers releases the GPU resources of removed layers.
#[derive(Default)]
pub struct LayerRenderer {
    pipeline_format: Option<wgpu::TextureFormat>,
    flat_pipeline: Option<wgpu::RenderPipeline>,
    lit_pipeline: Option<wgpu::RenderPipeline>,

    frame_bind_group_layout: Option<wgpu::BindGroupLayout>,
    layer_bind_group_layout: Option<wgpu::BindGroupLayout>,
    frame_bind_group: Option<wgpu::BindGroup>,
    frame_ubo: Option<wgpu::Buffer>,

    meshes: Vec<LayerMesh>,
    synced_revision: Option<u64>,
}

impl LayerRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Encodes one indexed draw per layer, in collection (insertion) order.
    ///
    /// The color/depth attachments are loaded, not cleared; clearing is the
    /// frame context's responsibility.
    pub fn render(
        &mut self,
        ctx: &RenderCtx<'_>,
        target: &mut RenderTarget<'_>,
        layers: &Layers,
        frame: &FrameMatrices,
    ) {
        self.ensure_pipelines(ctx);
        self.sync_meshes(ctx, layers);

        if self.meshes.is_empty() {
            // Degenerate empty scene: drawing is a no-op, not an error.
            return;
        }

        self.write_frame_uniform(ctx, frame);

        // Immutable borrows only past this point.
        let Some(flat_pipeline) = self.flat_pipeline.as_ref() else { return };
        let Some(lit_pipeline) = self.lit_pipeline.as_ref() else { return };
        let Some(frame_bind_group) = self.frame_bind_group.as_ref() else { return };

        let mut rpass = target.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("cityscape layer pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: target.color_view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Load,
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                view: target.depth_view,
                depth_ops: Some(wgpu::Operations {
                    load: wgpu::LoadOp::Load,
                    store: wgpu::StoreOp::Store,
                }),
                stencil_ops: None,
            }),
            timestamp_writes: None,
            occlusion_query_set: None,
            multiview_mask: None,
        });

        rpass.set_bind_group(0, frame_bind_group, &[]);

        for mesh in &self.meshes {
            match mesh.kind {
                LayerKind::Flat => rpass.set_pipeline(flat_pipeline),
                LayerKind::Lit => rpass.set_pipeline(lit_pipeline),
            }

            rpass.set_bind_group(1, &mesh.layer_bind_group, &[]);
            rpass.set_vertex_buffer(0, mesh.vertex_buffer.slice(..));
            if let Some(normals) = &mesh.normal_buffer {
                rpass.set_vertex_buffer(1, normals.slice(..));
            }
            rpass.set_index_buffer(mesh.index_buffer.slice(..), wgpu::IndexFormat::Uint16);
            rpass.draw_indexed(0..mesh.index_count, 0, 0..1);
        }
    }

    fn write_frame_uniform(&self, ctx: &RenderCtx<'_>, frame: &FrameMatrices) {
        let Some(ubo) = self.frame_ubo.as_ref() else { return };
        let uniform = FrameUniform {
            model: frame.model.to_cols_array_2d(),
            view: frame.view.to_cols_array_2d(),
            projection: frame.projection.to_cols_array_2d(),
        };
        ctx.queue.write_buffer(ubo, 0, bytemuck::bytes_of(&uniform));
    }

    /// Rebuilds the GPU mirror when the collection changed.
    ///
    /// The collection holds at most a handful of layers, so a full rebuild
    /// is cheaper to reason about than per-layer diffing. Old buffers drop
    /// here, which is also what releases removed layers' GPU memory.
    fn sync_meshes(&mut self, ctx: &RenderCtx<'_>, layers: &Layers) {
        if self.synced_revision == Some(layers.revision()) {
            return;
        }

        let Some(layer_bgl) = self.layer_bind_group_layout.as_ref() else { return };

        self.meshes.clear();
        for (name, layer) in layers.iter() {
            let vertex_buffer =
                ctx.device
                    .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                        label: Some(&format!("cityscape {name} vertices")),
                        contents: bytemuck::cast_slice(layer.vertices()),
                        usage: wgpu::BufferUsages::VERTEX,
                    });

            let normal_buffer = layer.normals().map(|normals| {
                ctx.device
                    .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                        label: Some(&format!("cityscape {name} normals")),
                        contents: bytemuck::cast_slice(normals),
                        usage: wgpu::BufferUsages::VERTEX,
                    })
            });

            let index_buffer =
                ctx.device
                    .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                        label: Some(&format!("cityscape {name} indices")),
                        contents: bytemuck::cast_slice(layer.indices()),
                        usage: wgpu::BufferUsages::INDEX,
                    });

            let layer_ubo = ctx
                .device
                .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                    label: Some(&format!("cityscape {name} layer ubo")),
                    contents: bytemuck::bytes_of(&LayerUniform {
                        color: layer.color(),
                    }),
                    usage: wgpu::BufferUsages::UNIFORM,
                });

            let layer_bind_group = ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some(&format!("cityscape {name} layer bg")),
                layout: layer_bgl,
                entries: &[wgpu::BindGroupEntry {
                    binding: 0,
                    resource: layer_ubo.as_entire_binding(),
                }],
            });

            self.meshes.push(LayerMesh {
                kind: layer.kind(),
                vertex_buffer,
                normal_buffer,
                index_buffer,
                index_count: layer.indices().len() as u32,
                layer_bind_group,
            });
        }

        self.synced_revision = Some(layers.revision());
        log::debug!("layer renderer synced {} mesh(es)", self.meshes.len());
    }

    fn ensure_pipelines(&mut self, ctx: &RenderCtx<'_>) {
        if self.pipeline_format == Some(ctx.surface_format) && self.flat_pipeline.is_some() {
            return;
        }

        let frame_bgl = ctx
            .device
            .create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("cityscape frame bgl"),
                entries: &[wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: Some(ubo_min_binding_size::<FrameUniform>()),
                    },
                    count: None,
                }],
            });

        let layer_bgl = ctx
            .device
            .create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("cityscape layer bgl"),
                entries: &[wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: Some(ubo_min_binding_size::<LayerUniform>()),
                    },
                    count: None,
                }],
            });

        let frame_ubo = ctx.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("cityscape frame ubo"),
            size: std::mem::size_of::<FrameUniform>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let frame_bind_group = ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("cityscape frame bg"),
            layout: &frame_bgl,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: frame_ubo.as_entire_binding(),
            }],
        });

        let pipeline_layout =
            ctx.device
                .create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                    label: Some("cityscape layer pipeline layout"),
                    bind_group_layouts: &[&frame_bgl, &layer_bgl],
                    immediate_size: 0,
                });

        let flat_shader = ctx
            .device
            .create_shader_module(wgpu::ShaderModuleDescriptor {
                label: Some("cityscape flat shader"),
                source: wgpu::ShaderSource::Wgsl(include_str!("shaders/flat.wgsl").into()),
            });

        let lit_shader = ctx
            .device
            .create_shader_module(wgpu::ShaderModuleDescriptor {
                label: Some("cityscape lit shader"),
                source: wgpu::ShaderSource::Wgsl(include_str!("shaders/lit.wgsl").into()),
            });

        self.flat_pipeline = Some(create_layer_pipeline(
            ctx,
            "cityscape flat pipeline",
            &pipeline_layout,
            &flat_shader,
            &[position_layout()],
        ));

        self.lit_pipeline = Some(create_layer_pipeline(
            ctx,
            "cityscape lit pipeline",
            &pipeline_layout,
            &lit_shader,
            &[position_layout(), normal_layout()],
        ));

        self.frame_bind_group_layout = Some(frame_bgl);
        self.layer_bind_group_layout = Some(layer_bgl);
        self.frame_ubo = Some(frame_ubo);
        self.frame_bind_group = Some(frame_bind_group);
        self.pipeline_format = Some(ctx.surface_format);

        // Pipelines are bound to the surface format; a format change forces
        // a mesh rebuild as well since bind groups were recreated.
        self.synced_revision = None;
    }
}

const POSITION_ATTRS: [wgpu::VertexAttribute; 1] = wgpu::vertex_attr_array![0 => Float32x3];
const NORMAL_ATTRS: [wgpu::VertexAttribute; 1] = wgpu::vertex_attr_array![1 => Float32x3];

fn position_layout() -> wgpu::VertexBufferLayout<'static> {
    wgpu::VertexBufferLayout {
        array_stride: (std::mem::size_of::<f32>() * 3) as u64,
        step_mode: wgpu::VertexStepMode::Vertex,
        attributes: &POSITION_ATTRS,
    }
}

fn normal_layout() -> wgpu::VertexBufferLayout<'static> {
    wgpu::VertexBufferLayout {
        array_stride: (std::mem::size_of::<f32>() * 3) as u64,
        step_mode: wgpu::VertexStepMode::Vertex,
        attributes: &NORMAL_ATTRS,
    }
}

fn straight_alpha_blend() -> wgpu::BlendState {
    wgpu::BlendState {
        color: wgpu::BlendComponent {
            src_factor: wgpu::BlendFactor::SrcAlpha,
            dst_factor: wgpu::BlendFactor::OneMinusSrcAlpha,
            operation: wgpu::BlendOperation::Add,
        },
        alpha: wgpu::BlendComponent {
            src_factor: wgpu::BlendFactor::SrcAlpha,
            dst_factor: wgpu::BlendFactor::OneMinusSrcAlpha,
            operation: wgpu::BlendOperation::Add,
        },
    }
}

/// Returns the wgpu minimum binding size for a uniform struct.
///
/// Both uniform structs are non-empty by construction, so the size is always
/// non-zero. Centralising this avoids `.unwrap()` at the pipeline-creation
/// sites.
fn ubo_min_binding_size<T>() -> std::num::NonZeroU64 {
    std::num::NonZeroU64::new(std::mem::size_of::<T>() as u64)
        .expect("uniform struct has non-zero size by construction")
}

fn create_layer_pipeline(
    ctx: &RenderCtx<'_>,
    label: &str,
    layout: &wgpu::PipelineLayout,
    shader: &wgpu::ShaderModule,
    buffers: &[wgpu::VertexBufferLayout<'_>],
) -> wgpu::RenderPipeline {
    ctx.device
        .create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some(label),
            layout: Some(layout),

            vertex: wgpu::VertexState {
                module: shader,
                entry_point: Some("vs_main"),
                compilation_options: Default::default(),
                buffers,
            },

            fragment: Some(wgpu::FragmentState {
                module: shader,
                entry_point: Some("fs_main"),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: ctx.surface_format,
                    blend: Some(straight_alpha_blend()),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),

            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: Some(wgpu::Face::Back),
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },

            depth_stencil: Some(wgpu::DepthStencilState {
                format: ctx.depth_format,
                depth_write_enabled: true,
                depth_compare: wgpu::CompareFunction::Less,
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            }),

            multisample: wgpu::MultisampleState::default(),
            multiview_mask: None,
            cache: None,
        })
}
