use super::helpers::{uniform_layout_entry, DEPTH_FORMAT};
use panorama_core::Scene;
use wgpu::util::DeviceExt;

#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub(crate) struct ModelVertex {
    position: [f32; 3],
    color: [f32; 4],
}

const VERTEX_ATTRS: [wgpu::VertexAttribute; 2] =
    wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x4];

/// Flattens every model in the scene, in its current pose, into one
/// non-indexed triangle list.
pub(crate) fn scene_vertices(scene: &Scene) -> Vec<ModelVertex> {
    let mut out = Vec::new();
    for model in scene.models() {
        for object in &model.objects {
            for (tri, color) in object.world_triangles() {
                out.extend(tri.iter().map(|p| ModelVertex {
                    position: p.to_array(),
                    color,
                }));
            }
        }
    }
    out
}

pub struct ModelLayer {
    pipeline: wgpu::RenderPipeline,
    bind_group: wgpu::BindGroup,
    vertices: Option<wgpu::Buffer>,
    vertex_count: u32,
    revision: u64,
}

impl ModelLayer {
    pub fn new(
        device: &wgpu::Device,
        color_format: wgpu::TextureFormat,
        uniforms: &wgpu::Buffer,
    ) -> Self {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("model_shader"),
            source: wgpu::ShaderSource::Wgsl(super::MODEL_WGSL.into()),
        });
        let bgl = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("model_bgl"),
            entries: &[uniform_layout_entry(
                0,
                wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
            )],
        });
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("model_bg"),
            layout: &bgl,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniforms.as_entire_binding(),
            }],
        });
        let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("model_pl"),
            bind_group_layouts: &[&bgl],
            push_constant_ranges: &[],
        });
        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("model_pipeline"),
            layout: Some(&layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_model"),
                buffers: &[wgpu::VertexBufferLayout {
                    array_stride: std::mem::size_of::<ModelVertex>() as wgpu::BufferAddress,
                    step_mode: wgpu::VertexStepMode::Vertex,
                    attributes: &VERTEX_ATTRS,
                }],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            },
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: Some(wgpu::Face::Back),
                ..Default::default()
            },
            depth_stencil: Some(wgpu::DepthStencilState {
                format: DEPTH_FORMAT,
                depth_write_enabled: true,
                depth_compare: wgpu::CompareFunction::Less,
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            }),
            multisample: wgpu::MultisampleState::default(),
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_model"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: color_format,
                    blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            }),
            cache: None,
            multiview: None,
        });
        Self {
            pipeline,
            bind_group,
            vertices: None,
            vertex_count: 0,
            revision: 0,
        }
    }

    /// Re-upload geometry when the scene's models or their pose changed.
    /// A re-posed scene of the same size is written into the existing buffer.
    pub fn sync(&mut self, device: &wgpu::Device, queue: &wgpu::Queue, scene: &Scene) {
        if scene.revision() == self.revision {
            return;
        }
        self.revision = scene.revision();
        let verts = scene_vertices(scene);
        let count = verts.len() as u32;
        if let Some(buf) = self.vertices.as_ref().filter(|_| count == self.vertex_count) {
            queue.write_buffer(buf, 0, bytemuck::cast_slice(&verts));
            return;
        }
        if let Some(old) = self.vertices.take() {
            old.destroy();
        }
        self.vertex_count = count;
        self.vertices = (!verts.is_empty()).then(|| {
            device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("model_vertices"),
                contents: bytemuck::cast_slice(&verts),
                usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            })
        });
        log::info!("[render] uploaded {} model triangles", count / 3);
    }

    pub fn draw(&self, pass: &mut wgpu::RenderPass<'_>) {
        let Some(buf) = self.vertices.as_ref() else {
            return;
        };
        pass.set_pipeline(&self.pipeline);
        pass.set_bind_group(0, &self.bind_group, &[]);
        pass.set_vertex_buffer(0, buf.slice(..));
        pass.draw(0..self.vertex_count, 0..1);
    }
}
