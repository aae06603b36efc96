use super::helpers::{create_color_texture, uniform_layout_entry};

const PANORAMA_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8UnormSrgb;

/// Background texture plus the bind group that samples it.
pub struct PanoramaLayer {
    pub bgl: wgpu::BindGroupLayout,
    sampler: wgpu::Sampler,
    texture: wgpu::Texture,
    bind_group: wgpu::BindGroup,
    loaded: bool,
}

impl PanoramaLayer {
    pub fn new(device: &wgpu::Device, queue: &wgpu::Queue, uniforms: &wgpu::Buffer) -> Self {
        let bgl = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("panorama_bgl"),
            entries: &[
                uniform_layout_entry(
                    0,
                    wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                ),
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
        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("panorama_sampler"),
            address_mode_u: wgpu::AddressMode::Repeat,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            ..Default::default()
        });
        let texture = placeholder(device, queue);
        let bind_group = make_bind_group(device, &bgl, uniforms, &texture, &sampler);
        Self {
            bgl,
            sampler,
            texture,
            bind_group,
            loaded: false,
        }
    }

    #[inline]
    pub fn bind_group(&self) -> &wgpu::BindGroup {
        &self.bind_group
    }

    /// Upload a decoded equirectangular image, downscaling it if the device
    /// cannot hold it in one texture.
    pub fn set_image(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        uniforms: &wgpu::Buffer,
        image: image::DynamicImage,
    ) {
        let max = device.limits().max_texture_dimension_2d;
        let image = if image.width() > max || image.height() > max {
            log::warn!(
                "[load] panorama {}x{} exceeds {}px, downscaling",
                image.width(),
                image.height(),
                max
            );
            image.resize(max, max, image::imageops::FilterType::Triangle)
        } else {
            image
        };
        let rgba = image.to_rgba8();
        let (w, h) = rgba.dimensions();
        let (texture, _view) = create_color_texture(
            device,
            "panorama",
            w,
            h,
            PANORAMA_FORMAT,
            wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
        );
        write_rgba(queue, &texture, &rgba, w, h);
        self.replace(device, uniforms, texture);
        self.loaded = true;
    }

    /// Free the panorama's GPU memory; a 1x1 black texture takes its place.
    pub fn release(&mut self, device: &wgpu::Device, queue: &wgpu::Queue, uniforms: &wgpu::Buffer) {
        if !self.loaded {
            return;
        }
        let texture = placeholder(device, queue);
        self.replace(device, uniforms, texture);
        self.loaded = false;
        log::info!("[load] panorama texture released");
    }

    fn replace(&mut self, device: &wgpu::Device, uniforms: &wgpu::Buffer, texture: wgpu::Texture) {
        self.bind_group = make_bind_group(device, &self.bgl, uniforms, &texture, &self.sampler);
        let old = std::mem::replace(&mut self.texture, texture);
        old.destroy();
    }
}

fn placeholder(device: &wgpu::Device, queue: &wgpu::Queue) -> wgpu::Texture {
    let (texture, _view) = create_color_texture(
        device,
        "panorama_placeholder",
        1,
        1,
        PANORAMA_FORMAT,
        wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
    );
    write_rgba(queue, &texture, &[0, 0, 0, 255], 1, 1);
    texture
}

fn write_rgba(queue: &wgpu::Queue, texture: &wgpu::Texture, data: &[u8], width: u32, height: u32) {
    queue.write_texture(
        wgpu::TexelCopyTextureInfo {
            texture,
            mip_level: 0,
            origin: wgpu::Origin3d::ZERO,
            aspect: wgpu::TextureAspect::All,
        },
        data,
        wgpu::TexelCopyBufferLayout {
            offset: 0,
            bytes_per_row: Some(4 * width),
            rows_per_image: Some(height),
        },
        wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        },
    );
}

fn make_bind_group(
    device: &wgpu::Device,
    bgl: &wgpu::BindGroupLayout,
    uniforms: &wgpu::Buffer,
    texture: &wgpu::Texture,
    sampler: &wgpu::Sampler,
) -> wgpu::BindGroup {
    let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
    device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some("panorama_bg"),
        layout: bgl,
        entries: &[
            wgpu::BindGroupEntry {
                binding: 0,
                resource: uniforms.as_entire_binding(),
            },
            wgpu::BindGroupEntry {
                binding: 1,
                resource: wgpu::BindingResource::TextureView(&view),
            },
            wgpu::BindGroupEntry {
                binding: 2,
                resource: wgpu::BindingResource::Sampler(sampler),
            },
        ],
    })
}
