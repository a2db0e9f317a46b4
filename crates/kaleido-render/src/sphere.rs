//! Blob demo: a warped icosphere on an orbiting camera

use crate::context::{DEPTH_FORMAT, DepthTarget, GpuContext};
use crate::scene::{FrameContext, Scene};
use crate::Result;
use bytemuck::{Pod, Zeroable};
use kaleido_core::camera::{Camera, OrbitClock};
use kaleido_core::mesh::Mesh;
use kaleido_core::palette::{BLOB_PALETTE, degamma};
use std::sync::Arc;
use tracing::info;
use wgpu::util::DeviceExt;

/// Startup parameters of the blob demo
#[derive(Debug, Clone, Copy)]
pub struct BlobConfig {
    /// Icosphere subdivision level
    pub subdivisions: u32,
}

impl Default for BlobConfig {
    fn default() -> Self {
        Self { subdivisions: 5 }
    }
}

/// Uniform buffer data sent to the GPU
/// This struct must match the WGSL struct layout exactly
#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
pub struct SphereUniforms {
    pub projection: [[f32; 4]; 4],
    pub view: [[f32; 4]; 4],
    pub eye: [f32; 3],
    pub time: f32,
    pub tint: [f32; 4],
}

impl SphereUniforms {
    pub fn from_camera(camera: &Camera, warp_time: f32) -> Self {
        Self {
            projection: camera.projection_matrix().to_cols_array_2d(),
            view: camera.view_matrix().to_cols_array_2d(),
            eye: camera.position.to_array(),
            time: warp_time,
            tint: degamma(BLOB_PALETTE[2]),
        }
    }

    /// Uniforms for the frame at `elapsed` seconds
    pub fn at(aspect: f32, elapsed: f32) -> Self {
        let clock = OrbitClock::at(elapsed);
        let camera = Camera::orbiting(aspect, clock.camera_time);
        Self::from_camera(&camera, clock.warp_time)
    }
}

/// Draws the displaced icosphere
pub struct SphereRenderer {
    queue: Arc<wgpu::Queue>,
    pipeline: wgpu::RenderPipeline,
    uniform_buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    index_count: u32,
}

impl SphereRenderer {
    pub fn new(
        device: &wgpu::Device,
        queue: Arc<wgpu::Queue>,
        surface_format: wgpu::TextureFormat,
        mesh: &Mesh,
    ) -> Self {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Sphere Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/sphere.wgsl").into()),
        });

        let uniform_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Sphere Uniform Buffer"),
            contents: bytemuck::cast_slice(&[SphereUniforms::at(16.0 / 9.0, 0.0)]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Sphere Vertex Buffer"),
            contents: bytemuck::cast_slice(&mesh.positions),
            usage: wgpu::BufferUsages::VERTEX,
        });

        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Sphere Index Buffer"),
            contents: bytemuck::cast_slice(&mesh.indices),
            usage: wgpu::BufferUsages::INDEX,
        });

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Sphere Bind Group Layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Sphere Bind Group"),
            layout: &bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Sphere Pipeline Layout"),
            bind_group_layouts: &[&bind_group_layout],
            push_constant_ranges: &[],
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Sphere Pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &[wgpu::VertexBufferLayout {
                    array_stride: std::mem::size_of::<[f32; 3]>() as wgpu::BufferAddress,
                    step_mode: wgpu::VertexStepMode::Vertex,
                    attributes: &wgpu::vertex_attr_array![0 => Float32x3],
                }],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: surface_format,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },
            depth_stencil: Some(wgpu::DepthStencilState {
                format: DEPTH_FORMAT,
                depth_write_enabled: true,
                depth_compare: wgpu::CompareFunction::Less,
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            }),
            multisample: wgpu::MultisampleState {
                count: 1,
                mask: !0,
                alpha_to_coverage_enabled: false,
            },
            multiview: None,
            cache: None,
        });

        Self {
            queue,
            pipeline,
            uniform_buffer,
            bind_group,
            vertex_buffer,
            index_buffer,
            index_count: mesh.indices.len() as u32,
        }
    }

    pub fn update(&self, uniforms: &SphereUniforms) {
        self.queue
            .write_buffer(&self.uniform_buffer, 0, bytemuck::cast_slice(&[*uniforms]));
    }

    pub fn draw(&self, pass: &mut wgpu::RenderPass<'_>) {
        pass.set_pipeline(&self.pipeline);
        pass.set_bind_group(0, &self.bind_group, &[]);
        pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
        pass.set_index_buffer(self.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
        pass.draw_indexed(0..self.index_count, 0, 0..1);
    }
}

/// The blob demo
pub struct BlobScene {
    device: Arc<wgpu::Device>,
    queue: Arc<wgpu::Queue>,
    sphere: SphereRenderer,
    depth: DepthTarget,
}

impl Scene for BlobScene {
    type Config = BlobConfig;

    const NAME: &'static str = "Kaleido Blob";

    fn create(gpu: &GpuContext, config: &BlobConfig, width: u32, height: u32) -> Result<Self> {
        let mesh = Mesh::icosphere(config.subdivisions);
        info!(
            vertices = mesh.vertex_count(),
            triangles = mesh.triangle_count(),
            "Icosphere generated"
        );

        Ok(Self {
            device: gpu.device.clone(),
            queue: gpu.queue.clone(),
            sphere: SphereRenderer::new(&gpu.device, gpu.queue.clone(), gpu.format, &mesh),
            depth: DepthTarget::new(&gpu.device, width, height),
        })
    }

    fn resize(&mut self, width: u32, height: u32) {
        self.depth.resize(&self.device, width, height);
    }

    fn render(&mut self, target: &wgpu::TextureView, frame: &FrameContext) {
        self.sphere
            .update(&SphereUniforms::at(frame.aspect(), frame.elapsed));

        let [r, g, b, a] = BLOB_PALETTE[0].map(f64::from);
        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Blob Encoder"),
            });

        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Blob Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: target,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color { r, g, b, a }),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(self.depth.attachment()),
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            self.sphere.draw(&mut pass);
        }

        self.queue.submit(std::iter::once(encoder.finish()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_uniform_layout_matches_wgsl() {
        assert_eq!(std::mem::size_of::<SphereUniforms>(), 160);
    }

    #[test]
    fn test_uniforms_track_orbit() {
        let uniforms = SphereUniforms::at(1.5, 20.0);
        let clock = OrbitClock::at(20.0);
        assert_relative_eq!(uniforms.time, clock.warp_time);

        let eye = glam::Vec3::from_array(uniforms.eye);
        assert!((1.4 - 1e-4..=2.2 + 1e-4).contains(&eye.length()));
        assert_eq!(uniforms.tint, degamma(BLOB_PALETTE[2]));
    }
}
