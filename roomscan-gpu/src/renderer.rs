//! Render pipeline manager
//!
//! Owns the three draw passes executed in fixed order every frame: the
//! camera passthrough quad, the filled translucent anchor meshes, and the
//! wireframe outlines. Uniform data goes through the triple-buffered ring;
//! a frame is only encoded after the admission gate grants a slot, and the
//! slot is returned from the command buffer's completion callback.

use crate::camera::{CameraTextureBridge, PlaneView};
use crate::device::GpuContext;
use crate::ring::{
    AdmissionGate, UniformRing, ALIGNED_FRAME_UNIFORMS_SIZE, ALIGNED_INSTANCE_UNIFORMS_SIZE,
    MAX_ANCHOR_INSTANCES, MAX_FRAMES_IN_FLIGHT,
};
use nalgebra::{Matrix3, Vector3};
use roomscan_core::{Error, MeshSnapshot, Result};

/// Fullscreen quad for the camera pass: xy position + uv, triangle strip.
const IMAGE_PLANE_VERTEX_DATA: [f32; 16] = [
    -1.0, -1.0, 0.0, 1.0, //
    1.0, -1.0, 1.0, 1.0, //
    -1.0, 1.0, 0.0, 0.0, //
    1.0, 1.0, 1.0, 0.0, //
];

const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

/// Rendering configuration
#[derive(Debug, Clone)]
pub struct RenderConfig {
    pub color_format: wgpu::TextureFormat,
    pub width: u32,
    pub height: u32,
    /// Clip planes handed to the tracking collaborator when it derives the
    /// per-frame projection matrix.
    pub z_near: f32,
    pub z_far: f32,
    pub background_color: [f64; 4],
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            color_format: wgpu::TextureFormat::Bgra8Unorm,
            width: 1280,
            height: 720,
            z_near: 0.05,
            z_far: 50.0,
            background_color: [0.0, 0.0, 0.0, 1.0],
        }
    }
}

/// Everything the renderer needs for one frame.
pub struct FrameInput<'a> {
    pub projection: nalgebra::Matrix4<f32>,
    pub view: nalgebra::Matrix4<f32>,
    /// Display-to-camera transform applied to the passthrough quad UVs.
    pub display_transform: Matrix3<f32>,
    /// This frame's classified snapshots, in ingest order.
    pub snapshots: &'a [MeshSnapshot],
    /// Luma and chroma planes of the camera image, when available. Without
    /// them the camera pass is skipped.
    pub image: Option<(PlaneView<'a>, PlaneView<'a>)>,
}

/// One anchor's GPU-resident geometry for the current frame.
struct AnchorDraw {
    vertex_buffer: wgpu::Buffer,
    normal_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    index_count: u32,
    membership_bind_group: wgpu::BindGroup,
    instance: u32,
}

/// The scan renderer.
pub struct ScanRenderer {
    pub ctx: GpuContext,
    config: RenderConfig,
    gate: AdmissionGate,
    ring: UniformRing,

    frame_uniform_buffer: wgpu::Buffer,
    instance_uniform_buffer: wgpu::Buffer,
    image_plane_vertex_buffer: wgpu::Buffer,

    camera_pipeline: wgpu::RenderPipeline,
    mesh_pipeline: wgpu::RenderPipeline,
    outline_pipeline: wgpu::RenderPipeline,

    uniforms_bind_group: wgpu::BindGroup,
    camera_bind_group_layout: wgpu::BindGroupLayout,
    membership_bind_group_layout: wgpu::BindGroupLayout,

    bridge: CameraTextureBridge,
    depth_view: wgpu::TextureView,
    anchors: Vec<AnchorDraw>,
}

impl ScanRenderer {
    /// Build all pipeline and buffer state up front. Any failure here is a
    /// setup error surfaced to the caller; there is no quality fallback.
    pub fn new(ctx: GpuContext, config: RenderConfig) -> Result<Self> {
        let device = &ctx.device;

        // shader and pipeline validation errors would otherwise only reach
        // the uncaptured-error handler; scope them into a Result
        device.push_error_scope(wgpu::ErrorFilter::Validation);

        let frame_uniform_buffer = ctx.create_buffer(
            "Frame Uniform Buffer",
            (ALIGNED_FRAME_UNIFORMS_SIZE * MAX_FRAMES_IN_FLIGHT) as u64,
            wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        );
        let instance_uniform_buffer = ctx.create_buffer(
            "Instance Uniform Buffer",
            (ALIGNED_INSTANCE_UNIFORMS_SIZE * MAX_FRAMES_IN_FLIGHT) as u64,
            wgpu::BufferUsages::STORAGE | wgpu::BufferUsages::COPY_DST,
        );
        let image_plane_vertex_buffer = ctx.create_buffer_init(
            "Image Plane Vertex Buffer",
            &IMAGE_PLANE_VERTEX_DATA,
            wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
        );

        let uniforms_bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("uniforms_bind_group_layout"),
                entries: &[
                    wgpu::BindGroupLayoutEntry {
                        binding: 0,
                        visibility: wgpu::ShaderStages::VERTEX,
                        ty: wgpu::BindingType::Buffer {
                            ty: wgpu::BufferBindingType::Uniform,
                            has_dynamic_offset: true,
                            min_binding_size: wgpu::BufferSize::new(128),
                        },
                        count: None,
                    },
                    wgpu::BindGroupLayoutEntry {
                        binding: 1,
                        visibility: wgpu::ShaderStages::VERTEX,
                        ty: wgpu::BindingType::Buffer {
                            ty: wgpu::BufferBindingType::Storage { read_only: true },
                            has_dynamic_offset: true,
                            min_binding_size: wgpu::BufferSize::new(64),
                        },
                        count: None,
                    },
                ],
            });

        let membership_bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("membership_bind_group_layout"),
                entries: &[wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Storage { read_only: true },
                        has_dynamic_offset: false,
                        min_binding_size: wgpu::BufferSize::new(4),
                    },
                    count: None,
                }],
            });

        let camera_bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("camera_bind_group_layout"),
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
                        ty: wgpu::BindingType::Texture {
                            sample_type: wgpu::TextureSampleType::Float { filterable: true },
                            view_dimension: wgpu::TextureViewDimension::D2,
                            multisampled: false,
                        },
                        count: None,
                    },
                    wgpu::BindGroupLayoutEntry {
                        binding: 2,
                        visibility: wgpu::ShaderStages::FRAGMENT,
                        ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                        count: None,
                    },
                ],
            });

        let uniforms_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("uniforms_bind_group"),
            layout: &uniforms_bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::Buffer(wgpu::BufferBinding {
                        buffer: &frame_uniform_buffer,
                        offset: 0,
                        size: wgpu::BufferSize::new(128),
                    }),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Buffer(wgpu::BufferBinding {
                        buffer: &instance_uniform_buffer,
                        offset: 0,
                        size: wgpu::BufferSize::new((MAX_ANCHOR_INSTANCES * 64) as u64),
                    }),
                },
            ],
        });

        let camera_shader =
            ctx.create_shader_module("Camera Shader", include_str!("shaders/camera.wgsl"));
        let mesh_shader =
            ctx.create_shader_module("Mesh Shader", include_str!("shaders/mesh.wgsl"));

        let camera_pipeline_layout =
            device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: Some("Camera Pipeline Layout"),
                bind_group_layouts: &[&camera_bind_group_layout],
                push_constant_ranges: &[],
            });

        let camera_pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Camera Pipeline"),
            layout: Some(&camera_pipeline_layout),
            vertex: wgpu::VertexState {
                module: &camera_shader,
                entry_point: "vs_main",
                buffers: &[wgpu::VertexBufferLayout {
                    array_stride: 16,
                    step_mode: wgpu::VertexStepMode::Vertex,
                    attributes: &[
                        wgpu::VertexAttribute {
                            offset: 0,
                            shader_location: 0,
                            format: wgpu::VertexFormat::Float32x2,
                        },
                        wgpu::VertexAttribute {
                            offset: 8,
                            shader_location: 1,
                            format: wgpu::VertexFormat::Float32x2,
                        },
                    ],
                }],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &camera_shader,
                entry_point: "fs_main",
                targets: &[Some(wgpu::ColorTargetState {
                    format: config.color_format,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleStrip,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
                unclipped_depth: false,
                polygon_mode: wgpu::PolygonMode::Fill,
                conservative: false,
            },
            // passthrough draws behind everything: always pass, never write
            depth_stencil: Some(wgpu::DepthStencilState {
                format: DEPTH_FORMAT,
                depth_write_enabled: false,
                depth_compare: wgpu::CompareFunction::Always,
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            }),
            multisample: wgpu::MultisampleState {
                count: 1,
                mask: !0,
                alpha_to_coverage_enabled: false,
            },
            multiview: None,
        });

        let anchor_pipeline_layout =
            device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: Some("Anchor Pipeline Layout"),
                bind_group_layouts: &[&uniforms_bind_group_layout, &membership_bind_group_layout],
                push_constant_ranges: &[],
            });

        let anchor_vertex_buffers = [
            wgpu::VertexBufferLayout {
                array_stride: 12,
                step_mode: wgpu::VertexStepMode::Vertex,
                attributes: &[wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x3,
                }],
            },
            wgpu::VertexBufferLayout {
                array_stride: 12,
                step_mode: wgpu::VertexStepMode::Vertex,
                attributes: &[wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x3,
                }],
            },
        ];

        let anchor_blend = wgpu::BlendState {
            color: wgpu::BlendComponent {
                src_factor: wgpu::BlendFactor::One,
                dst_factor: wgpu::BlendFactor::OneMinusSrcAlpha,
                operation: wgpu::BlendOperation::Add,
            },
            alpha: wgpu::BlendComponent {
                src_factor: wgpu::BlendFactor::One,
                dst_factor: wgpu::BlendFactor::OneMinusSrcAlpha,
                operation: wgpu::BlendOperation::Add,
            },
        };

        let anchor_depth = wgpu::DepthStencilState {
            format: DEPTH_FORMAT,
            depth_write_enabled: true,
            depth_compare: wgpu::CompareFunction::LessEqual,
            stencil: wgpu::StencilState::default(),
            bias: wgpu::DepthBiasState::default(),
        };

        let mesh_pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Anchor Mesh Pipeline"),
            layout: Some(&anchor_pipeline_layout),
            vertex: wgpu::VertexState {
                module: &mesh_shader,
                entry_point: "vs_main",
                buffers: &anchor_vertex_buffers,
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &mesh_shader,
                entry_point: "fs_main",
                targets: &[Some(wgpu::ColorTargetState {
                    format: config.color_format,
                    blend: Some(anchor_blend),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
                unclipped_depth: false,
                polygon_mode: wgpu::PolygonMode::Fill,
                conservative: false,
            },
            depth_stencil: Some(anchor_depth.clone()),
            multisample: wgpu::MultisampleState {
                count: 1,
                mask: !0,
                alpha_to_coverage_enabled: false,
            },
            multiview: None,
        });

        let outline_pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Anchor Outline Pipeline"),
            layout: Some(&anchor_pipeline_layout),
            vertex: wgpu::VertexState {
                module: &mesh_shader,
                entry_point: "vs_main",
                buffers: &anchor_vertex_buffers,
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &mesh_shader,
                entry_point: "fs_outline",
                targets: &[Some(wgpu::ColorTargetState {
                    format: config.color_format,
                    blend: Some(anchor_blend),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
                unclipped_depth: false,
                polygon_mode: wgpu::PolygonMode::Line,
                conservative: false,
            },
            depth_stencil: Some(anchor_depth),
            multisample: wgpu::MultisampleState {
                count: 1,
                mask: !0,
                alpha_to_coverage_enabled: false,
            },
            multiview: None,
        });

        let depth_view = create_depth_view(&ctx, config.width, config.height);
        let bridge = CameraTextureBridge::new(&ctx);

        if let Some(error) = pollster::block_on(device.pop_error_scope()) {
            return Err(Error::Gpu(format!(
                "render pipeline construction failed: {}",
                error
            )));
        }

        Ok(Self {
            ctx,
            config,
            gate: AdmissionGate::new(MAX_FRAMES_IN_FLIGHT),
            ring: UniformRing::new(),
            frame_uniform_buffer,
            instance_uniform_buffer,
            image_plane_vertex_buffer,
            camera_pipeline,
            mesh_pipeline,
            outline_pipeline,
            uniforms_bind_group,
            camera_bind_group_layout,
            membership_bind_group_layout,
            bridge,
            depth_view,
            anchors: Vec::new(),
        })
    }

    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    /// Recreate the depth attachment for a new drawable size.
    pub fn resize(&mut self, width: u32, height: u32) {
        if width > 0 && height > 0 {
            self.config.width = width;
            self.config.height = height;
            self.depth_view = create_depth_view(&self.ctx, width, height);
        }
    }

    /// Encode and submit one frame into `target`.
    ///
    /// Blocks on the admission gate until a uniform slot is free, the only
    /// blocking point in the hot path. The slot token travels back through
    /// the command buffer's completion callback, together with the frame's
    /// camera textures, which are dropped there. An error before submission
    /// drops the token instead, so the slot is immediately free again.
    pub fn render_frame(&mut self, target: &wgpu::TextureView, frame: &FrameInput<'_>) -> Result<()> {
        // held as a token so any error before submission gives the slot back
        let token = self.gate.acquire();

        self.ring.advance();
        self.ring.write_frame_uniforms(&frame.projection, &frame.view);
        if frame.snapshots.len() > MAX_ANCHOR_INSTANCES {
            tracing::warn!(
                anchors = frame.snapshots.len(),
                capacity = MAX_ANCHOR_INSTANCES,
                "anchor count exceeds instance capacity, truncating"
            );
        }
        for (index, snapshot) in frame.snapshots.iter().enumerate() {
            self.ring.write_instance_transform(index, &snapshot.transform);
        }

        self.ctx.queue.write_buffer(
            &self.frame_uniform_buffer,
            self.ring.frame_offset() as u64,
            self.ring.frame_slot_bytes(),
        );
        self.ctx.queue.write_buffer(
            &self.instance_uniform_buffer,
            self.ring.instance_offset() as u64,
            self.ring.instance_slot_bytes(),
        );

        self.update_image_plane(&frame.display_transform);
        self.upload_anchors(frame.snapshots);
        if let Some((luma, chroma)) = frame.image {
            self.bridge
                .update(&self.ctx, &self.camera_bind_group_layout, luma, chroma)?;
        }

        let mut encoder = self
            .ctx
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Scan Render Encoder"),
            });

        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Scan Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: target,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color {
                            r: self.config.background_color[0],
                            g: self.config.background_color[1],
                            b: self.config.background_color[2],
                            a: self.config.background_color[3],
                        }),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            self.draw_camera_image(&mut pass);
            self.draw_anchor_geometry(&mut pass);
        }

        self.ctx.queue.submit(std::iter::once(encoder.finish()));

        let releaser = token.into_releaser();
        let retired_textures = self.bridge.take_frame_textures();
        self.ctx.queue.on_submitted_work_done(move || {
            drop(retired_textures);
            releaser.release();
        });

        Ok(())
    }

    fn draw_camera_image<'pass>(&'pass self, pass: &mut wgpu::RenderPass<'pass>) {
        let Some(bind_group) = self.bridge.bind_group() else {
            return;
        };
        pass.set_pipeline(&self.camera_pipeline);
        pass.set_bind_group(0, bind_group, &[]);
        pass.set_vertex_buffer(0, self.image_plane_vertex_buffer.slice(..));
        pass.draw(0..4, 0..1);
    }

    fn draw_anchor_geometry<'pass>(&'pass self, pass: &mut wgpu::RenderPass<'pass>) {
        let dynamic_offsets = [
            self.ring.frame_offset() as wgpu::DynamicOffset,
            self.ring.instance_offset() as wgpu::DynamicOffset,
        ];

        pass.set_pipeline(&self.mesh_pipeline);
        pass.set_bind_group(0, &self.uniforms_bind_group, &dynamic_offsets);
        for anchor in &self.anchors {
            self.draw_anchor(pass, anchor);
        }

        pass.set_pipeline(&self.outline_pipeline);
        pass.set_bind_group(0, &self.uniforms_bind_group, &dynamic_offsets);
        for anchor in &self.anchors {
            self.draw_anchor(pass, anchor);
        }
    }

    fn draw_anchor<'pass>(&'pass self, pass: &mut wgpu::RenderPass<'pass>, anchor: &'pass AnchorDraw) {
        pass.set_bind_group(1, &anchor.membership_bind_group, &[]);
        pass.set_vertex_buffer(0, anchor.vertex_buffer.slice(..));
        pass.set_vertex_buffer(1, anchor.normal_buffer.slice(..));
        pass.set_index_buffer(anchor.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
        pass.draw_indexed(0..anchor.index_count, 0, anchor.instance..anchor.instance + 1);
    }

    /// Re-derive the passthrough quad's texture coordinates from the
    /// frame's display transform.
    fn update_image_plane(&self, display_transform: &Matrix3<f32>) {
        let mut vertex_data = IMAGE_PLANE_VERTEX_DATA;
        for vertex in 0..4 {
            let uv_index = 4 * vertex + 2;
            let uv = Vector3::new(
                IMAGE_PLANE_VERTEX_DATA[uv_index],
                IMAGE_PLANE_VERTEX_DATA[uv_index + 1],
                1.0,
            );
            let mapped = display_transform * uv;
            vertex_data[uv_index] = mapped.x;
            vertex_data[uv_index + 1] = mapped.y;
        }
        self.ctx.queue.write_buffer(
            &self.image_plane_vertex_buffer,
            0,
            bytemuck::cast_slice(&vertex_data),
        );
    }

    /// Upload this frame's snapshots, replacing the previous frame's
    /// anchor buffers. Geometry is repacked to tight xyz triples.
    fn upload_anchors(&mut self, snapshots: &[MeshSnapshot]) {
        self.anchors.clear();
        for (index, snapshot) in snapshots.iter().enumerate() {
            if snapshot.vertices.count() == 0 || snapshot.faces.index_count() == 0 {
                continue;
            }

            let positions: Vec<[f32; 3]> = (0..snapshot.vertices.count())
                .map(|v| snapshot.vertices.vec3_at(v))
                .collect();
            let normals: Vec<[f32; 3]> = (0..snapshot.normals.count())
                .map(|v| snapshot.normals.vec3_at(v))
                .collect();

            let vertex_buffer = self.ctx.create_buffer_init(
                "Anchor Vertex Buffer",
                &positions,
                wgpu::BufferUsages::VERTEX,
            );
            let normal_buffer = self.ctx.create_buffer_init(
                "Anchor Normal Buffer",
                &normals,
                wgpu::BufferUsages::VERTEX,
            );
            let index_buffer = self.ctx.create_buffer_init(
                "Anchor Index Buffer",
                snapshot.faces.indices(),
                wgpu::BufferUsages::INDEX,
            );
            let membership_buffer = self.ctx.create_buffer_init(
                "Anchor Membership Buffer",
                &snapshot.membership,
                wgpu::BufferUsages::STORAGE,
            );

            let membership_bind_group =
                self.ctx
                    .device
                    .create_bind_group(&wgpu::BindGroupDescriptor {
                        label: Some("membership_bind_group"),
                        layout: &self.membership_bind_group_layout,
                        entries: &[wgpu::BindGroupEntry {
                            binding: 0,
                            resource: membership_buffer.as_entire_binding(),
                        }],
                    });

            self.anchors.push(AnchorDraw {
                vertex_buffer,
                normal_buffer,
                index_buffer,
                index_count: snapshot.faces.index_count() as u32,
                membership_bind_group,
                instance: index.min(MAX_ANCHOR_INSTANCES - 1) as u32,
            });
        }
    }
}

fn create_depth_view(ctx: &GpuContext, width: u32, height: u32) -> wgpu::TextureView {
    let texture = ctx.device.create_texture(&wgpu::TextureDescriptor {
        label: Some("Depth Texture"),
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
