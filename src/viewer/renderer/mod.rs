//! wgpu renderer: environment-lit scene pass followed by the chromatic shift.
//!
//! The renderer is the exclusive owner of every GPU resource it creates
//! (pipelines, mesh buffers, textures, offscreen targets). Dropping it
//! releases them as a unit.

use std::sync::Arc;

use glam::Mat4;
use wgpu::util::DeviceExt;

mod pipelines;
mod postfx;
mod resources;
mod shaders;

pub use postfx::{Pass, PostChain, PASS_ORDER, RGB_SHIFT_AMOUNT};

use crate::assets::hdri::EnvImage;
use crate::assets::mesh::{MaterialData, ModelData};
use crate::viewer::environment::{self, EnvironmentMap};
use pipelines::{create_bind_group_layouts, create_scene_pipeline, BindGroupLayouts};
use resources::{CameraUniform, DepthTexture, MaterialUniform, ModelUniform, SceneColorTexture};

/// Clear color behind the model (dark page background).
const BACKGROUND_COLOR: wgpu::Color = wgpu::Color {
    r: 0.008,
    g: 0.008,
    b: 0.010,
    a: 1.0,
};

/// GPU mesh with its material and transform bind groups.
pub struct SceneMesh {
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    index_count: u32,
    material_bind_group: wgpu::BindGroup,
    model_buffer: wgpu::Buffer,
    model_bind_group: wgpu::BindGroup,
    transform: Mat4,
}

/// Main renderer state
pub struct Renderer {
    pub device: Arc<wgpu::Device>,
    pub queue: Arc<wgpu::Queue>,
    layouts: BindGroupLayouts,
    scene_pipeline: wgpu::RenderPipeline,

    // Uniforms
    camera_buffer: wgpu::Buffer,
    camera_bind_group: wgpu::BindGroup,

    // Material fallbacks
    #[allow(dead_code)]
    white_texture: wgpu::Texture,
    white_texture_view: wgpu::TextureView,
    material_sampler: wgpu::Sampler,

    // Offscreen targets
    scene_color: Option<SceneColorTexture>,
    depth_texture: Option<DepthTexture>,

    // Environment map (placeholder until the async load resolves)
    env_map: EnvironmentMap,

    // Post chain
    post_chain: PostChain,

    // Scene contents
    meshes: Vec<SceneMesh>,
    normalize: Mat4,
    rotation: (f32, f32),

    pub exposure: f32,
}

impl Renderer {
    pub fn new(
        device: Arc<wgpu::Device>,
        queue: Arc<wgpu::Queue>,
        output_format: wgpu::TextureFormat,
        exposure: f32,
    ) -> Self {
        let layouts = create_bind_group_layouts(&device);
        let scene_pipeline = create_scene_pipeline(&device, &layouts);

        let camera_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("camera_buffer"),
            contents: bytemuck::bytes_of(&CameraUniform::new(
                Mat4::IDENTITY,
                Mat4::IDENTITY,
                glam::Vec3::ZERO,
                exposure,
            )),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });
        let camera_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("camera_bind_group"),
            layout: &layouts.camera,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: camera_buffer.as_entire_binding(),
            }],
        });

        let white_texture = device.create_texture_with_data(
            &queue,
            &wgpu::TextureDescriptor {
                label: Some("white_texture"),
                size: wgpu::Extent3d {
                    width: 1,
                    height: 1,
                    depth_or_array_layers: 1,
                },
                mip_level_count: 1,
                sample_count: 1,
                dimension: wgpu::TextureDimension::D2,
                format: wgpu::TextureFormat::Rgba8UnormSrgb,
                usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
                view_formats: &[],
            },
            wgpu::util::TextureDataOrder::LayerMajor,
            &[255u8; 4],
        );
        let white_texture_view = white_texture.create_view(&wgpu::TextureViewDescriptor::default());

        let material_sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("material_sampler"),
            address_mode_u: wgpu::AddressMode::Repeat,
            address_mode_v: wgpu::AddressMode::Repeat,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::FilterMode::Linear,
            ..Default::default()
        });

        let env_map = environment::create_placeholder_env(&device, &queue, &layouts.environment);
        let post_chain = PostChain::new(&device, output_format);

        Self {
            device,
            queue,
            layouts,
            scene_pipeline,
            camera_buffer,
            camera_bind_group,
            white_texture,
            white_texture_view,
            material_sampler,
            scene_color: None,
            depth_texture: None,
            env_map,
            post_chain,
            meshes: Vec::new(),
            normalize: Mat4::IDENTITY,
            rotation: (0.0, 0.0),
            exposure,
        }
    }

    pub fn has_model(&self) -> bool {
        !self.meshes.is_empty()
    }

    pub fn has_environment(&self) -> bool {
        self.env_map.enabled
    }

    /// Install the loaded environment map as the scene's light source.
    pub fn set_environment(&mut self, image: &EnvImage) {
        self.env_map =
            environment::create_env_map(&self.device, &self.queue, &self.layouts.environment, image, 1.0);
    }

    /// Upload the decoded model, replacing any previous scene contents.
    /// Positions it at the origin at unit scale.
    pub fn set_model(&mut self, model: &ModelData) {
        self.meshes.clear();
        self.normalize = model.normalize_transform();
        self.rotation = (0.0, 0.0);

        for mesh in &model.meshes {
            let vertex_buffer = self.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(&format!("{}_vertices", mesh.name)),
                contents: bytemuck::cast_slice(&mesh.vertices),
                usage: wgpu::BufferUsages::VERTEX,
            });
            let index_buffer = self.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(&format!("{}_indices", mesh.name)),
                contents: bytemuck::cast_slice(&mesh.indices),
                usage: wgpu::BufferUsages::INDEX,
            });

            let material_bind_group = self.create_material_bind_group(&mesh.material);

            let model_buffer = self.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(&format!("{}_model", mesh.name)),
                contents: bytemuck::bytes_of(&ModelUniform::new(self.normalize * mesh.transform)),
                usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            });
            let model_bind_group = self.device.create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some(&format!("{}_model_bind_group", mesh.name)),
                layout: &self.layouts.model,
                entries: &[wgpu::BindGroupEntry {
                    binding: 0,
                    resource: model_buffer.as_entire_binding(),
                }],
            });

            self.meshes.push(SceneMesh {
                vertex_buffer,
                index_buffer,
                index_count: mesh.indices.len() as u32,
                material_bind_group,
                model_buffer,
                model_bind_group,
                transform: mesh.transform,
            });
        }
    }

    fn create_material_bind_group(&self, material: &MaterialData) -> wgpu::BindGroup {
        let has_texture = material.base_color_texture.is_some();

        let texture_view = match &material.base_color_texture {
            Some(tex) => {
                let texture = self.device.create_texture_with_data(
                    &self.queue,
                    &wgpu::TextureDescriptor {
                        label: Some("base_color_texture"),
                        size: wgpu::Extent3d {
                            width: tex.width,
                            height: tex.height,
                            depth_or_array_layers: 1,
                        },
                        mip_level_count: 1,
                        sample_count: 1,
                        dimension: wgpu::TextureDimension::D2,
                        format: wgpu::TextureFormat::Rgba8UnormSrgb,
                        usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
                        view_formats: &[],
                    },
                    wgpu::util::TextureDataOrder::LayerMajor,
                    &tex.rgba8,
                );
                texture.create_view(&wgpu::TextureViewDescriptor::default())
            }
            None => self.white_texture_view.clone(),
        };

        let uniform = MaterialUniform {
            base_color: material.base_color,
            params: [
                material.metallic,
                material.roughness,
                if has_texture { 1.0 } else { 0.0 },
                0.0,
            ],
        };
        let buffer = self.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("material_buffer"),
            contents: bytemuck::bytes_of(&uniform),
            usage: wgpu::BufferUsages::UNIFORM,
        });

        self.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("material_bind_group"),
            layout: &self.layouts.material,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::TextureView(&texture_view),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: wgpu::BindingResource::Sampler(&self.material_sampler),
                },
            ],
        })
    }

    /// Apply pointer-driven yaw/pitch to the model.
    pub fn set_rotation(&mut self, yaw: f32, pitch: f32) {
        if self.rotation == (yaw, pitch) {
            return;
        }
        self.rotation = (yaw, pitch);
        let rotation = Mat4::from_euler(glam::EulerRot::YXZ, yaw, pitch, 0.0);
        for mesh in &self.meshes {
            let model = rotation * self.normalize * mesh.transform;
            self.queue
                .write_buffer(&mesh.model_buffer, 0, bytemuck::bytes_of(&ModelUniform::new(model)));
        }
    }

    /// Update camera matrices for this frame.
    pub fn update_camera(&mut self, view_proj: Mat4, view: Mat4, position: glam::Vec3) {
        let uniform = CameraUniform::new(view_proj, view, position, self.exposure);
        self.queue
            .write_buffer(&self.camera_buffer, 0, bytemuck::bytes_of(&uniform));
    }

    /// Current offscreen target size in physical pixels.
    pub fn size(&self) -> (u32, u32) {
        self.scene_color.as_ref().map(|t| t.size).unwrap_or((0, 0))
    }

    /// Recreate the offscreen targets and rebind the post chain. No-op when
    /// the size is unchanged.
    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 || self.size() == (width, height) {
            return;
        }
        let scene_color = SceneColorTexture::new(&self.device, width, height);
        self.post_chain.resize(&self.device, &scene_color.view);
        self.scene_color = Some(scene_color);
        self.depth_texture = Some(DepthTexture::new(&self.device, width, height));
    }

    /// Render one frame into `output_view`, running the passes in
    /// [`PASS_ORDER`].
    pub fn render(&mut self, output_view: &wgpu::TextureView) {
        let _span = tracing::info_span!("renderer_frame").entered();

        if self.scene_color.is_none() {
            return;
        }

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("frame_encoder"),
            });

        for pass in PASS_ORDER {
            match pass {
                Pass::Scene => self.record_scene_pass(&mut encoder),
                Pass::ChromaticShift => self.post_chain.record(&mut encoder, output_view),
            }
        }

        self.queue.submit(Some(encoder.finish()));
    }

    fn record_scene_pass(&self, encoder: &mut wgpu::CommandEncoder) {
        let (scene_color, depth) = match (&self.scene_color, &self.depth_texture) {
            (Some(c), Some(d)) => (c, d),
            _ => return,
        };

        let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("scene_pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: &scene_color.view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(BACKGROUND_COLOR),
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                view: &depth.view,
                depth_ops: Some(wgpu::Operations {
                    load: wgpu::LoadOp::Clear(1.0),
                    store: wgpu::StoreOp::Store,
                }),
                stencil_ops: None,
            }),
            timestamp_writes: None,
            occlusion_query_set: None,
        });

        pass.set_pipeline(&self.scene_pipeline);
        pass.set_bind_group(0, &self.camera_bind_group, &[]);
        pass.set_bind_group(3, &self.env_map.bind_group, &[]);

        for mesh in &self.meshes {
            pass.set_bind_group(1, &mesh.model_bind_group, &[]);
            pass.set_bind_group(2, &mesh.material_bind_group, &[]);
            pass.set_vertex_buffer(0, mesh.vertex_buffer.slice(..));
            pass.set_index_buffer(mesh.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
            pass.draw_indexed(0..mesh.index_count, 0, 0..1);
        }
    }
}
