//! Full-screen environment pass behind the lattice

use crate::DEPTH_FORMAT;
use bytemuck::{Pod, Zeroable};
use kaleido_core::camera::Camera;
use kaleido_core::palette::{LATTICE_COLORS, to_vec4};
use std::sync::Arc;
use wgpu::util::DeviceExt;

/// Uniform buffer data sent to the GPU
/// This struct must match the WGSL struct layout exactly
#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
pub struct BackgroundUniforms {
    pub inv_projection: [[f32; 4]; 4],
    pub inv_view: [[f32; 4]; 4],
    pub colors: [[f32; 4]; 5],
    pub time: f32,
    pub _pad: [f32; 3],
}

impl BackgroundUniforms {
    /// The tunnel scrolls at a quarter of wall-clock speed
    pub fn from_camera(camera: &Camera, elapsed: f32) -> Self {
        Self {
            inv_projection: camera.inverse_projection_matrix().to_cols_array_2d(),
            inv_view: camera.inverse_view_matrix().to_cols_array_2d(),
            colors: to_vec4(&LATTICE_COLORS),
            time: 0.25 * elapsed,
            _pad: [0.0; 3],
        }
    }
}

impl Default for BackgroundUniforms {
    fn default() -> Self {
        Self::from_camera(&Camera::default(), 0.0)
    }
}

/// Draws the environment over the whole viewport without touching depth
pub struct Background {
    queue: Arc<wgpu::Queue>,
    pipeline: wgpu::RenderPipeline,
    uniform_buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
}

impl Background {
    pub fn new(
        device: &wgpu::Device,
        queue: Arc<wgpu::Queue>,
        surface_format: wgpu::TextureFormat,
    ) -> Self {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Background Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/background.wgsl").into()),
        });

        let uniform_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Background Uniform Buffer"),
            contents: bytemuck::cast_slice(&[BackgroundUniforms::default()]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Background Bind Group Layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Background Bind Group"),
            layout: &bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Background Pipeline Layout"),
            bind_group_layouts: &[&bind_group_layout],
            push_constant_ranges: &[],
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Background Pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &[],
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
            // Shares the pass with depth-tested geometry but never reads or writes it
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
            cache: None,
        });

        Self {
            queue,
            pipeline,
            uniform_buffer,
            bind_group,
        }
    }

    /// Update uniforms from camera state
    pub fn update(&self, camera: &Camera, elapsed: f32) {
        let uniforms = BackgroundUniforms::from_camera(camera, elapsed);
        self.queue
            .write_buffer(&self.uniform_buffer, 0, bytemuck::cast_slice(&[uniforms]));
    }

    pub fn draw(&self, pass: &mut wgpu::RenderPass<'_>) {
        pass.set_pipeline(&self.pipeline);
        pass.set_bind_group(0, &self.bind_group, &[]);
        pass.draw(0..3, 0..1); // Full-screen triangle
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use glam::Vec2;

    #[test]
    fn test_uniform_layout_matches_wgsl() {
        // 2 x mat4 + 5 x vec4 + time and padding
        assert_eq!(std::mem::size_of::<BackgroundUniforms>(), 224);
        assert_eq!(std::mem::size_of::<BackgroundUniforms>() % 16, 0);
    }

    #[test]
    fn test_time_runs_at_quarter_speed() {
        let camera = Camera::lattice(1.0, Vec2::ZERO);
        let uniforms = BackgroundUniforms::from_camera(&camera, 8.0);
        assert_relative_eq!(uniforms.time, 2.0);
        assert_eq!(uniforms.colors[3][3], 1.0);
    }
}
