//! 3D viewport: owns the presentation lifecycle from renderer construction
//! to teardown.
//!
//! The per-frame work is gated by a run flag checked at the top of every
//! frame. [`Viewport::shutdown`] closes the gate and drops the renderer (and
//! with it every GPU resource) as a unit; later input or frame calls are
//! no-ops.

use egui::{Sense, Ui, Vec2};

use crate::assets::hdri::EnvImage;
use crate::assets::mesh::ModelData;

use super::camera::{OrbitRig, ShowcaseCamera, CAMERA_DISTANCE};
use super::input::{self, InputMode};
use super::renderer::Renderer;

/// Logical size times pixel ratio, rounded, never zero.
pub(crate) fn physical_extent(size: Vec2, pixels_per_point: f32) -> (u32, u32) {
    let w = (size.x * pixels_per_point).round().max(1.0) as u32;
    let h = (size.y * pixels_per_point).round().max(1.0) as u32;
    (w, h)
}

/// 3D viewport state
pub struct Viewport {
    pub camera: ShowcaseCamera,
    pub renderer: Option<Renderer>,
    mode: InputMode,
    orbit: Option<OrbitRig>,
    texture_id: Option<egui::TextureId>,
    render_texture: Option<RenderTexture>,
    /// Run gate: checked at the top of every frame, closed at teardown.
    running: bool,
    /// Present only once the async model load has resolved.
    model_attached: bool,
    /// Pointer-driven model rotation (yaw, pitch).
    rotation: (f32, f32),
}

struct RenderTexture {
    #[allow(dead_code)]
    texture: wgpu::Texture,
    view: wgpu::TextureView,
    size: (u32, u32),
}

impl Viewport {
    pub fn new(mode: InputMode) -> Self {
        // The orbit rig only exists in orbit mode; pointer-follow has no
        // inert controls object to keep disabled.
        let orbit = match mode {
            InputMode::Orbit => Some(OrbitRig::new(glam::Vec3::ZERO, CAMERA_DISTANCE)),
            InputMode::PointerFollow => None,
        };
        Self {
            camera: ShowcaseCamera::new(1.0),
            renderer: None,
            mode,
            orbit,
            texture_id: None,
            render_texture: None,
            running: true,
            model_attached: false,
            rotation: (0.0, 0.0),
        }
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn mode(&self) -> InputMode {
        self.mode
    }

    pub fn rotation(&self) -> (f32, f32) {
        self.rotation
    }

    pub fn has_model(&self) -> bool {
        self.model_attached
    }

    /// Initialize renderer (call once when the wgpu context is available)
    pub fn init_renderer(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        format: wgpu::TextureFormat,
        exposure: f32,
    ) {
        if !self.running {
            return;
        }
        self.renderer = Some(Renderer::new(
            std::sync::Arc::new(device.clone()),
            std::sync::Arc::new(queue.clone()),
            format,
            exposure,
        ));
    }

    /// Attach the decoded model to the scene.
    pub fn attach_model(&mut self, model: &ModelData) {
        if !self.running {
            return;
        }
        if let Some(renderer) = &mut self.renderer {
            renderer.set_model(model);
            self.model_attached = renderer.has_model();
        }
    }

    /// Install the decoded environment map.
    pub fn attach_environment(&mut self, image: &EnvImage) {
        if !self.running {
            return;
        }
        if let Some(renderer) = &mut self.renderer {
            renderer.set_environment(image);
        }
    }

    /// Pointer moved to `(x, y)` within a viewport of `(width, height)`.
    /// Only rotates the model in pointer-follow mode, and only once the model
    /// is present.
    pub fn pointer_moved(&mut self, x: f32, y: f32, width: f32, height: f32) {
        if !self.running || self.mode != InputMode::PointerFollow || !self.model_attached {
            return;
        }
        self.rotation = input::pointer_rotation(x, y, width, height);
    }

    /// Viewport resized to the given physical pixel extent.
    pub fn apply_resize(&mut self, width: u32, height: u32) {
        if !self.running {
            return;
        }
        self.camera.set_viewport(width as f32, height as f32);
        if let Some(renderer) = &mut self.renderer {
            renderer.resize(width, height);
        }
    }

    /// Show the viewport and run one frame.
    pub fn show(&mut self, ui: &mut Ui, wgpu_render_state: Option<&egui_wgpu::RenderState>) {
        if !self.running {
            return;
        }
        let _span = tracing::info_span!("viewport_show").entered();

        let available = ui.available_size();
        let size = Vec2::new(available.x.max(64.0), available.y.max(64.0));
        let (rect, response) = ui.allocate_exact_size(size, Sense::click_and_drag());

        self.handle_input(ui, &response, rect);

        // Advance orbit damping (absent in pointer-follow mode)
        let dt = ui.input(|i| i.stable_dt);
        if let Some(orbit) = &mut self.orbit {
            orbit.update(dt);
        }

        let render_state = match wgpu_render_state {
            Some(rs) => rs,
            None => {
                ui.painter()
                    .rect_filled(rect, 0.0, egui::Color32::from_rgb(20, 20, 24));
                return;
            }
        };

        let pixels_per_point = ui.ctx().pixels_per_point();
        let (width, height) = physical_extent(size, pixels_per_point);
        self.apply_resize(width, height);

        let (view_proj, view, position) = match (&self.orbit, self.mode) {
            (Some(orbit), InputMode::Orbit) => (
                self.camera.projection_matrix() * orbit.view_matrix(),
                orbit.view_matrix(),
                orbit.position(),
            ),
            _ => (
                self.camera.view_proj_matrix(),
                self.camera.view_matrix(),
                self.camera.position(),
            ),
        };

        if let Some(renderer) = &mut self.renderer {
            renderer.update_camera(view_proj, view, position);
            let (yaw, pitch) = self.rotation;
            renderer.set_rotation(yaw, pitch);
        }

        self.ensure_render_texture(render_state, width, height);

        if let (Some(renderer), Some(rt)) = (&mut self.renderer, &self.render_texture) {
            renderer.render(&rt.view);
        }

        if let Some(tex_id) = self.texture_id {
            ui.painter().image(
                tex_id,
                rect,
                egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0)),
                egui::Color32::WHITE,
            );
        }
    }

    /// Close the run gate and release every owned GPU resource. Frames and
    /// input events after this call do nothing.
    pub fn shutdown(&mut self, wgpu_render_state: Option<&egui_wgpu::RenderState>) {
        self.running = false;
        if let (Some(render_state), Some(tex_id)) = (wgpu_render_state, self.texture_id.take()) {
            render_state.renderer.write().free_texture(&tex_id);
        }
        self.texture_id = None;
        self.render_texture = None;
        self.renderer = None;
        self.orbit = None;
        self.model_attached = false;
    }

    fn handle_input(&mut self, ui: &Ui, response: &egui::Response, rect: egui::Rect) {
        match self.mode {
            InputMode::PointerFollow => {
                if let Some(pos) = ui.input(|i| i.pointer.hover_pos()) {
                    self.pointer_moved(
                        pos.x - rect.left(),
                        pos.y - rect.top(),
                        rect.width(),
                        rect.height(),
                    );
                }
            }
            InputMode::Orbit => {
                if let Some(orbit) = &mut self.orbit {
                    if response.dragged_by(egui::PointerButton::Primary) {
                        let delta = response.drag_delta();
                        orbit.orbit(delta.x, delta.y);
                    }
                    if response.hovered() {
                        let scroll = ui.input(|i| i.raw_scroll_delta.y);
                        if scroll.abs() > 0.0 {
                            orbit.zoom(scroll * 0.1);
                        }
                    }
                }
            }
        }
    }

    fn ensure_render_texture(
        &mut self,
        render_state: &egui_wgpu::RenderState,
        width: u32,
        height: u32,
    ) {
        let needs_recreate = match &self.render_texture {
            Some(rt) => rt.size != (width, height),
            None => true,
        };
        if !needs_recreate {
            return;
        }

        let device = &render_state.device;
        let format = render_state.target_format;

        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("viewport_render_texture"),
            size: wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::TEXTURE_BINDING,
            view_formats: &[],
        });
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());

        let tex_id = render_state.renderer.write().register_native_texture(
            device,
            &view,
            wgpu::FilterMode::Linear,
        );

        if let Some(old_id) = self.texture_id.take() {
            render_state.renderer.write().free_texture(&old_id);
        }

        self.texture_id = Some(tex_id);
        self.render_texture = Some(RenderTexture {
            texture,
            view,
            size: (width, height),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::PI;

    #[test]
    fn test_physical_extent_scales_by_pixel_ratio() {
        assert_eq!(physical_extent(Vec2::new(1280.0, 720.0), 1.0), (1280, 720));
        assert_eq!(physical_extent(Vec2::new(1280.0, 720.0), 2.0), (2560, 1440));
        assert_eq!(physical_extent(Vec2::new(640.5, 480.5), 2.0), (1281, 961));
        // Never collapses to zero
        assert_eq!(physical_extent(Vec2::ZERO, 1.0), (1, 1));
    }

    #[test]
    fn test_pointer_ignored_until_model_loads() {
        let mut vp = Viewport::new(InputMode::PointerFollow);
        vp.pointer_moved(1280.0, 720.0, 1280.0, 720.0);
        assert_eq!(vp.rotation(), (0.0, 0.0));

        // Simulate the model load resolving
        vp.model_attached = true;
        vp.pointer_moved(1280.0, 720.0, 1280.0, 720.0);
        let (yaw, pitch) = vp.rotation();
        assert!((yaw - PI / 2.0).abs() < 1e-6);
        assert!((pitch - PI / 2.0).abs() < 1e-6);
    }

    #[test]
    fn test_pointer_mapping_is_exact() {
        let mut vp = Viewport::new(InputMode::PointerFollow);
        vp.model_attached = true;
        vp.pointer_moved(320.0, 180.0, 1280.0, 720.0);
        let (yaw, pitch) = vp.rotation();
        assert_eq!(yaw, (320.0 / 1280.0 - 0.5) * PI);
        assert_eq!(pitch, (180.0 / 720.0 - 0.5) * PI);
    }

    #[test]
    fn test_orbit_mode_ignores_pointer_follow() {
        let mut vp = Viewport::new(InputMode::Orbit);
        vp.model_attached = true;
        vp.pointer_moved(0.0, 0.0, 1280.0, 720.0);
        assert_eq!(vp.rotation(), (0.0, 0.0));
        assert!(vp.orbit.is_some());
    }

    #[test]
    fn test_pointer_follow_has_no_orbit_rig() {
        let vp = Viewport::new(InputMode::PointerFollow);
        assert!(vp.orbit.is_none());
    }

    #[test]
    fn test_resize_updates_camera_aspect() {
        let mut vp = Viewport::new(InputMode::PointerFollow);
        vp.apply_resize(1920, 1080);
        assert!((vp.camera.aspect() - 1920.0 / 1080.0).abs() < 1e-6);
    }

    #[test]
    fn test_shutdown_closes_the_gate() {
        let mut vp = Viewport::new(InputMode::PointerFollow);
        vp.model_attached = true;
        vp.apply_resize(1000, 500);
        vp.shutdown(None);
        assert!(!vp.is_running());
        assert!(vp.renderer.is_none());
        assert!(!vp.has_model());

        // Synthetic events after teardown have no effect
        vp.pointer_moved(1000.0, 0.0, 1000.0, 500.0);
        assert_eq!(vp.rotation(), (0.0, 0.0));
        vp.apply_resize(64, 64);
        assert!((vp.camera.aspect() - 2.0).abs() < 1e-6);
    }
}
