//! Lattice demo: environment background plus the decorated point field

use crate::background::Background;
use crate::context::{DEPTH_FORMAT, DepthTarget, GpuContext};
use crate::scene::{FrameContext, Scene};
use crate::Result;
use bytemuck::{Pod, Zeroable};
use glam::Mat4;
use kaleido_core::camera::Camera;
use kaleido_core::field::FieldConfig;
use kaleido_core::lattice::LatticeGeometry;
use kaleido_core::palette::{LATTICE_COLORS, to_vec4};
use kaleido_core::triangulate::CellVertex;
use std::sync::Arc;
use tracing::info;
use wgpu::util::DeviceExt;

/// Point diameter in logical pixels
pub const POINT_SIZE: f32 = 2.2;

/// Uniforms shared by the point, edge and cell pipelines
/// This struct must match the WGSL struct layout exactly
#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
pub struct FieldUniforms {
    pub projection: [[f32; 4]; 4],
    pub view: [[f32; 4]; 4],
    pub colors: [[f32; 4]; 5],
    pub resolution: [f32; 2],
    pub time: f32,
    pub aspect: f32,
    pub pixel_ratio: f32,
    pub point_size: f32,
    pub _pad: [f32; 2],
}

impl FieldUniforms {
    pub fn new(camera: &Camera, frame: &FrameContext) -> Self {
        Self {
            projection: camera.projection_matrix().to_cols_array_2d(),
            view: camera.view_matrix().to_cols_array_2d(),
            colors: to_vec4(&LATTICE_COLORS),
            resolution: frame.resolution(),
            time: frame.elapsed,
            aspect: frame.aspect(),
            pixel_ratio: frame.pixel_ratio,
            point_size: POINT_SIZE,
            _pad: [0.0; 2],
        }
    }
}

impl Default for FieldUniforms {
    fn default() -> Self {
        Self {
            projection: Mat4::IDENTITY.to_cols_array_2d(),
            view: Mat4::IDENTITY.to_cols_array_2d(),
            colors: to_vec4(&LATTICE_COLORS),
            resolution: [800.0, 600.0],
            time: 0.0,
            aspect: 800.0 / 600.0,
            pixel_ratio: 1.0,
            point_size: POINT_SIZE,
            _pad: [0.0; 2],
        }
    }
}

/// How a field pipeline differs from its siblings
struct PipelineParams<'a> {
    label: &'a str,
    vs_entry: &'a str,
    fs_entry: &'a str,
    buffers: &'a [wgpu::VertexBufferLayout<'a>],
    topology: wgpu::PrimitiveTopology,
}

/// Draws the Voronoi fill, the points and the Delaunay edges
pub struct FieldRenderer {
    queue: Arc<wgpu::Queue>,
    points_pipeline: wgpu::RenderPipeline,
    edges_pipeline: wgpu::RenderPipeline,
    cells_pipeline: wgpu::RenderPipeline,
    uniform_buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
    point_buffer: wgpu::Buffer,
    edge_buffer: wgpu::Buffer,
    cell_buffer: wgpu::Buffer,
    point_count: u32,
    edge_index_count: u32,
    cell_vertex_count: u32,
}

impl FieldRenderer {
    pub fn new(
        device: &wgpu::Device,
        queue: Arc<wgpu::Queue>,
        surface_format: wgpu::TextureFormat,
        geometry: &LatticeGeometry,
    ) -> Self {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Lattice Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/lattice.wgsl").into()),
        });

        let uniform_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Lattice Uniform Buffer"),
            contents: bytemuck::cast_slice(&[FieldUniforms::default()]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        // wgpu rejects zero-sized vertex buffers, so empty geometry gets one
        // dummy element and a zero draw count
        let point_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Point Buffer"),
            contents: non_empty_bytes(&geometry.points),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let edge_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Edge Index Buffer"),
            contents: non_empty_bytes(&geometry.edges),
            usage: wgpu::BufferUsages::INDEX,
        });
        let cell_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Voronoi Vertex Buffer"),
            contents: non_empty_bytes(&geometry.cells),
            usage: wgpu::BufferUsages::VERTEX,
        });

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Lattice Bind Group Layout"),
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
            label: Some("Lattice Bind Group"),
            layout: &bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Lattice Pipeline Layout"),
            bind_group_layouts: &[&bind_group_layout],
            push_constant_ranges: &[],
        });

        let point_attributes = wgpu::vertex_attr_array![0 => Float32x2];
        let cell_attributes =
            wgpu::vertex_attr_array![0 => Float32x2, 1 => Float32x2, 2 => Float32x3];

        let points_pipeline = create_pipeline(
            device,
            &pipeline_layout,
            &shader,
            surface_format,
            PipelineParams {
                label: "Lattice Points Pipeline",
                vs_entry: "vs_points",
                fs_entry: "fs_points",
                // One screen-space quad per point
                buffers: &[wgpu::VertexBufferLayout {
                    array_stride: std::mem::size_of::<[f32; 2]>() as wgpu::BufferAddress,
                    step_mode: wgpu::VertexStepMode::Instance,
                    attributes: &point_attributes,
                }],
                topology: wgpu::PrimitiveTopology::TriangleList,
            },
        );

        let edges_pipeline = create_pipeline(
            device,
            &pipeline_layout,
            &shader,
            surface_format,
            PipelineParams {
                label: "Lattice Edges Pipeline",
                vs_entry: "vs_edges",
                fs_entry: "fs_edges",
                buffers: &[wgpu::VertexBufferLayout {
                    array_stride: std::mem::size_of::<[f32; 2]>() as wgpu::BufferAddress,
                    step_mode: wgpu::VertexStepMode::Vertex,
                    attributes: &point_attributes,
                }],
                topology: wgpu::PrimitiveTopology::LineList,
            },
        );

        let cells_pipeline = create_pipeline(
            device,
            &pipeline_layout,
            &shader,
            surface_format,
            PipelineParams {
                label: "Lattice Cells Pipeline",
                vs_entry: "vs_cells",
                fs_entry: "fs_cells",
                buffers: &[wgpu::VertexBufferLayout {
                    array_stride: std::mem::size_of::<CellVertex>() as wgpu::BufferAddress,
                    step_mode: wgpu::VertexStepMode::Vertex,
                    attributes: &cell_attributes,
                }],
                topology: wgpu::PrimitiveTopology::TriangleList,
            },
        );

        Self {
            queue,
            points_pipeline,
            edges_pipeline,
            cells_pipeline,
            uniform_buffer,
            bind_group,
            point_buffer,
            edge_buffer,
            cell_buffer,
            point_count: geometry.point_count(),
            edge_index_count: geometry.edge_index_count(),
            cell_vertex_count: geometry.cell_vertex_count(),
        }
    }

    /// Update uniforms from camera state
    pub fn update(&self, camera: &Camera, frame: &FrameContext) {
        let uniforms = FieldUniforms::new(camera, frame);
        self.queue
            .write_buffer(&self.uniform_buffer, 0, bytemuck::cast_slice(&[uniforms]));
    }

    pub fn draw(&self, pass: &mut wgpu::RenderPass<'_>) {
        pass.set_bind_group(0, &self.bind_group, &[]);

        if self.cell_vertex_count > 0 {
            pass.set_pipeline(&self.cells_pipeline);
            pass.set_vertex_buffer(0, self.cell_buffer.slice(..));
            pass.draw(0..self.cell_vertex_count, 0..1);
        }

        if self.point_count > 0 {
            pass.set_pipeline(&self.points_pipeline);
            pass.set_vertex_buffer(0, self.point_buffer.slice(..));
            pass.draw(0..6, 0..self.point_count);
        }

        if self.edge_index_count > 0 {
            pass.set_pipeline(&self.edges_pipeline);
            pass.set_vertex_buffer(0, self.point_buffer.slice(..));
            pass.set_index_buffer(self.edge_buffer.slice(..), wgpu::IndexFormat::Uint32);
            pass.draw_indexed(0..self.edge_index_count, 0, 0..1);
        }
    }
}

fn create_pipeline(
    device: &wgpu::Device,
    layout: &wgpu::PipelineLayout,
    shader: &wgpu::ShaderModule,
    surface_format: wgpu::TextureFormat,
    params: PipelineParams<'_>,
) -> wgpu::RenderPipeline {
    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some(params.label),
        layout: Some(layout),
        vertex: wgpu::VertexState {
            module: shader,
            entry_point: Some(params.vs_entry),
            buffers: params.buffers,
            compilation_options: Default::default(),
        },
        fragment: Some(wgpu::FragmentState {
            module: shader,
            entry_point: Some(params.fs_entry),
            targets: &[Some(wgpu::ColorTargetState {
                format: surface_format,
                blend: Some(wgpu::BlendState::REPLACE),
                write_mask: wgpu::ColorWrites::ALL,
            })],
            compilation_options: Default::default(),
        }),
        primitive: wgpu::PrimitiveState {
            topology: params.topology,
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
    })
}

/// Bytes of `items`, or a single zeroed element when there are none
fn non_empty_bytes<T: Pod>(items: &[T]) -> &[u8] {
    if items.is_empty() {
        bytemuck::bytes_of(&ZEROS)
    } else {
        bytemuck::cast_slice(items)
    }
}

static ZEROS: [u32; 8] = [0; 8];

/// The lattice demo
pub struct LatticeScene {
    device: Arc<wgpu::Device>,
    queue: Arc<wgpu::Queue>,
    background: Background,
    field: FieldRenderer,
    depth: DepthTarget,
}

impl Scene for LatticeScene {
    type Config = FieldConfig;

    const NAME: &'static str = "Kaleido Lattice";

    fn create(gpu: &GpuContext, config: &FieldConfig, width: u32, height: u32) -> Result<Self> {
        let geometry = LatticeGeometry::build(config)?;
        info!(
            points = geometry.points.len(),
            edges = geometry.edges.len(),
            cells = geometry.cell_count,
            cell_vertices = geometry.cells.len(),
            "Lattice geometry generated"
        );

        let background = Background::new(&gpu.device, gpu.queue.clone(), gpu.format);
        let field = FieldRenderer::new(&gpu.device, gpu.queue.clone(), gpu.format, &geometry);
        let depth = DepthTarget::new(&gpu.device, width, height);

        Ok(Self {
            device: gpu.device.clone(),
            queue: gpu.queue.clone(),
            background,
            field,
            depth,
        })
    }

    fn resize(&mut self, width: u32, height: u32) {
        self.depth.resize(&self.device, width, height);
    }

    fn render(&mut self, target: &wgpu::TextureView, frame: &FrameContext) {
        let camera = Camera::lattice(frame.aspect(), frame.pointer);
        self.background.update(&camera, frame.elapsed);
        self.field.update(&camera, frame);

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Lattice Encoder"),
            });

        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Lattice Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: target,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(self.depth.attachment()),
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            self.background.draw(&mut pass);
            self.field.draw(&mut pass);
        }

        self.queue.submit(std::iter::once(encoder.finish()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;

    fn frame() -> FrameContext {
        FrameContext {
            elapsed: 3.0,
            width: 1600,
            height: 900,
            pixel_ratio: 2.0,
            pointer: Vec2::new(0.5, -0.25),
        }
    }

    #[test]
    fn test_uniform_layout_matches_wgsl() {
        assert_eq!(std::mem::size_of::<FieldUniforms>(), 240);
        assert_eq!(std::mem::size_of::<FieldUniforms>() % 16, 0);
    }

    #[test]
    fn test_uniforms_follow_frame() {
        let frame = frame();
        let camera = Camera::lattice(frame.aspect(), frame.pointer);
        let uniforms = FieldUniforms::new(&camera, &frame);
        assert_eq!(uniforms.resolution, [1600.0, 900.0]);
        assert_eq!(uniforms.time, 3.0);
        assert_eq!(uniforms.pixel_ratio, 2.0);
        assert_eq!(uniforms.view, camera.view_matrix().to_cols_array_2d());
    }

    #[test]
    fn test_cell_vertex_stride_matches_attributes() {
        // offset (2) + center (2) + color (3) floats
        assert_eq!(std::mem::size_of::<CellVertex>(), 7 * 4);
    }

    #[test]
    fn test_non_empty_bytes() {
        let empty: [[f32; 2]; 0] = [];
        assert_eq!(non_empty_bytes(&empty).len(), 32);
        assert_eq!(non_empty_bytes(&[[1.0_f32, 2.0]]).len(), 8);
    }
}
