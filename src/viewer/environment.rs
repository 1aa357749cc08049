//! Environment map GPU resources.
//!
//! The decoded equirectangular image becomes an `Rgba32Float` texture that the
//! scene shader samples by direction for ambient lighting and reflections.
//! Until the asynchronous load resolves, a 1x1 disabled placeholder keeps the
//! bind group valid.

use wgpu::util::DeviceExt;

use crate::assets::hdri::EnvImage;

/// Environment map data
pub struct EnvironmentMap {
    #[allow(dead_code)]
    pub texture: wgpu::Texture,
    pub view: wgpu::TextureView,
    pub sampler: wgpu::Sampler,
    pub bind_group: wgpu::BindGroup,
    pub uniform_buffer: wgpu::Buffer,
    pub enabled: bool,
}

/// Environment uniform parameters
#[repr(C)]
#[derive(Clone, Copy, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct EnvUniform {
    /// Environment intensity multiplier
    pub intensity: f32,
    /// Rotation offset in radians
    pub rotation: f32,
    /// Whether environment is enabled (1.0 = yes, 0.0 = no)
    pub enabled: f32,
    pub _pad: f32,
}

impl Default for EnvUniform {
    fn default() -> Self {
        Self {
            intensity: 1.0,
            rotation: 0.0,
            enabled: 0.0,
            _pad: 0.0,
        }
    }
}

/// Create bind group layout for the environment map (group 3)
pub fn create_env_bind_group_layout(device: &wgpu::Device) -> wgpu::BindGroupLayout {
    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some("env_map_bind_group_layout"),
        entries: &[
            // Environment texture
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
            // Sampler
            wgpu::BindGroupLayoutEntry {
                binding: 1,
                visibility: wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                count: None,
            },
            // Environment params
            wgpu::BindGroupLayoutEntry {
                binding: 2,
                visibility: wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            },
        ],
    })
}

/// Upload a decoded environment image and build its bind group.
pub fn create_env_map(
    device: &wgpu::Device,
    queue: &wgpu::Queue,
    layout: &wgpu::BindGroupLayout,
    image: &EnvImage,
    intensity: f32,
) -> EnvironmentMap {
    let uniform = EnvUniform {
        intensity,
        rotation: 0.0,
        enabled: 1.0,
        _pad: 0.0,
    };
    build(
        device,
        queue,
        layout,
        image.width,
        image.height,
        bytemuck::cast_slice(&image.pixels),
        uniform,
    )
}

/// Create a default (dummy) environment - 1x1 black texture, disabled.
pub fn create_placeholder_env(
    device: &wgpu::Device,
    queue: &wgpu::Queue,
    layout: &wgpu::BindGroupLayout,
) -> EnvironmentMap {
    let pixel: [f32; 4] = [0.0, 0.0, 0.0, 1.0];
    build(
        device,
        queue,
        layout,
        1,
        1,
        bytemuck::cast_slice(&pixel),
        EnvUniform::default(),
    )
}

fn build(
    device: &wgpu::Device,
    queue: &wgpu::Queue,
    layout: &wgpu::BindGroupLayout,
    width: u32,
    height: u32,
    bytes: &[u8],
    uniform: EnvUniform,
) -> EnvironmentMap {
    let texture = device.create_texture_with_data(
        queue,
        &wgpu::TextureDescriptor {
            label: Some("env_texture"),
            size: wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Rgba32Float,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        },
        wgpu::util::TextureDataOrder::LayerMajor,
        bytes,
    );

    let view = texture.create_view(&wgpu::TextureViewDescriptor::default());

    // Equirectangular: wrap horizontally, clamp at the poles
    let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
        label: Some("env_sampler"),
        address_mode_u: wgpu::AddressMode::Repeat,
        address_mode_v: wgpu::AddressMode::ClampToEdge,
        address_mode_w: wgpu::AddressMode::ClampToEdge,
        mag_filter: wgpu::FilterMode::Linear,
        min_filter: wgpu::FilterMode::Linear,
        mipmap_filter: wgpu::FilterMode::Linear,
        ..Default::default()
    });

    let uniform_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
        label: Some("env_uniform_buffer"),
        contents: bytemuck::bytes_of(&uniform),
        usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
    });

    let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some("env_map_bind_group"),
        layout,
        entries: &[
            wgpu::BindGroupEntry {
                binding: 0,
                resource: wgpu::BindingResource::TextureView(&view),
            },
            wgpu::BindGroupEntry {
                binding: 1,
                resource: wgpu::BindingResource::Sampler(&sampler),
            },
            wgpu::BindGroupEntry {
                binding: 2,
                resource: uniform_buffer.as_entire_binding(),
            },
        ],
    });

    EnvironmentMap {
        texture,
        view,
        sampler,
        bind_group,
        uniform_buffer,
        enabled: uniform.enabled > 0.5,
    }
}
