use crate::constants::CLEAR_RGB;
use glam::Mat4;
use panorama_core::{Camera, Renderer, Scene};
use web_sys as web;
use wgpu;

mod helpers;
mod model;
mod panorama;

use helpers::{create_depth_texture, make_fullscreen_pipeline};
use model::ModelLayer;
use panorama::PanoramaLayer;

pub static PANORAMA_WGSL: &str = include_str!("../shaders/panorama.wgsl");
pub static MODEL_WGSL: &str = include_str!("../shaders/model.wgsl");

#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub(crate) struct Globals {
    inv_view_proj: [[f32; 4]; 4],
    view_proj: [[f32; 4]; 4],
    params: [f32; 4],
}

impl Globals {
    fn from_camera(camera: &Camera, ambient: f32) -> Self {
        // the panorama ignores translation so it stays at infinity
        let rotation_only = Mat4::from_quat(camera.orientation.inverse());
        let inv_view_proj = (camera.projection_matrix() * rotation_only).inverse();
        Self {
            inv_view_proj: inv_view_proj.to_cols_array_2d(),
            view_proj: camera.view_projection().to_cols_array_2d(),
            params: [ambient, 0.0, 0.0, 0.0],
        }
    }
}

pub struct GpuState {
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    uniforms: wgpu::Buffer,
    panorama_pipeline: wgpu::RenderPipeline,
    panorama: PanoramaLayer,
    models: ModelLayer,
    depth_tex: wgpu::Texture,
    depth_view: wgpu::TextureView,
    clear_color: wgpu::Color,
}

impl GpuState {
    pub async fn new(canvas: &web::HtmlCanvasElement) -> anyhow::Result<Self> {
        let width = canvas.width().max(1);
        let height = canvas.height().max(1);

        let instance = wgpu::Instance::default();
        let surface = instance.create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone()))?;
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .ok_or_else(|| anyhow::anyhow!("No WebGPU adapter"))?;
        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    required_features: wgpu::Features::empty(),
                    // Use default limits on web to avoid passing unknown fields to older WebGPU impls
                    required_limits: wgpu::Limits::default(),
                    memory_hints: wgpu::MemoryHints::Performance,
                    label: None,
                },
                None,
            )
            .await
            .map_err(|e| anyhow::anyhow!(format!("request_device error: {:?}", e)))?;
        let caps = surface.get_capabilities(&adapter);
        let format = caps
            .formats
            .iter()
            .copied()
            .find(|f| {
                matches!(
                    f,
                    wgpu::TextureFormat::Bgra8UnormSrgb | wgpu::TextureFormat::Rgba8UnormSrgb
                )
            })
            .or_else(|| caps.formats.first().copied())
            .ok_or_else(|| anyhow::anyhow!("surface reports no formats"))?;
        let alpha_mode = caps
            .alpha_modes
            .first()
            .copied()
            .unwrap_or(wgpu::CompositeAlphaMode::Auto);
        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width,
            height,
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let uniforms = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("globals"),
            size: std::mem::size_of::<Globals>() as wgpu::BufferAddress,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let panorama = PanoramaLayer::new(&device, &queue, &uniforms);
        let panorama_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("panorama_shader"),
            source: wgpu::ShaderSource::Wgsl(PANORAMA_WGSL.into()),
        });
        let panorama_pl = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("panorama_pl"),
            bind_group_layouts: &[&panorama.bgl],
            push_constant_ranges: &[],
        });
        let panorama_pipeline = make_fullscreen_pipeline(
            &device,
            &panorama_pl,
            &panorama_shader,
            "fs_panorama",
            format,
        );
        let models = ModelLayer::new(&device, format, &uniforms);
        let (depth_tex, depth_view) = create_depth_texture(&device, width, height);

        log::info!("[render] WebGPU ready {}x{} {:?}", width, height, format);
        Ok(Self {
            surface,
            device,
            queue,
            config,
            uniforms,
            panorama_pipeline,
            panorama,
            models,
            depth_tex,
            depth_view,
            clear_color: wgpu::Color {
                r: CLEAR_RGB[0],
                g: CLEAR_RGB[1],
                b: CLEAR_RGB[2],
                a: 1.0,
            },
        })
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        let (width, height) = (width.max(1), height.max(1));
        if width == self.config.width && height == self.config.height {
            return;
        }
        self.config.width = width;
        self.config.height = height;
        self.surface.configure(&self.device, &self.config);
        let (tex, view) = create_depth_texture(&self.device, width, height);
        self.depth_tex.destroy();
        self.depth_tex = tex;
        self.depth_view = view;
    }

    pub fn set_background(&mut self, image: image::DynamicImage) {
        self.panorama
            .set_image(&self.device, &self.queue, &self.uniforms, image);
    }

    pub fn release_background(&mut self) {
        self.panorama
            .release(&self.device, &self.queue, &self.uniforms);
    }
}

impl Renderer for GpuState {
    fn render(&mut self, scene: &Scene, camera: &Camera) -> anyhow::Result<()> {
        self.models.sync(&self.device, &self.queue, scene);
        let globals = Globals::from_camera(camera, scene.ambient_intensity);
        self.queue
            .write_buffer(&self.uniforms, 0, bytemuck::bytes_of(&globals));

        let frame = match self.surface.get_current_texture() {
            Ok(f) => f,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                self.surface.configure(&self.device, &self.config);
                return Ok(());
            }
            Err(e) => return Err(anyhow::anyhow!("surface error: {:?}", e)),
        };
        let view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("frame"),
            });
        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("scene_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(self.clear_color),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Discard,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
            });
            pass.set_pipeline(&self.panorama_pipeline);
            pass.set_bind_group(0, self.panorama.bind_group(), &[]);
            pass.draw(0..3, 0..1);
            self.models.draw(&mut pass);
        }
        self.queue.submit(Some(encoder.finish()));
        frame.present();
        Ok(())
    }
}
