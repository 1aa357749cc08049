//! Main application state and UI

use egui::{CentralPanel, Color32, TopBottomPanel};

use crate::assets::hdri::EnvImage;
use crate::assets::loader::{self, LoadEvent, LoadHandle};
use crate::assets::mesh::ModelData;
use crate::assets::AssetSource;

use super::navbar::Navbar;
use super::settings::Settings;
use super::viewport::Viewport;

/// Main showcase application
pub struct ShowcaseApp {
    settings: Settings,
    navbar: Navbar,
    viewport: Viewport,

    // In-flight asset loads; None once resolved or failed
    model_load: Option<LoadHandle<ModelData>>,
    env_load: Option<LoadHandle<EnvImage>>,

    // Decoded assets waiting for the renderer to come up
    pending_model: Option<ModelData>,
    pending_env: Option<EnvImage>,

    last_model_percent: Option<u64>,

    // UI state
    status_message: String,
    scroll_to_top: bool,
}

impl ShowcaseApp {
    pub fn new(_cc: &eframe::CreationContext<'_>, settings: Settings) -> Self {
        // Kick both loads off immediately; decoding is CPU-only and the
        // results wait in their channels until the renderer exists.
        let model_source = AssetSource::parse(&settings.model_path);
        let env_source = AssetSource::parse(&settings.environment_url);
        log::info!("loading model from {}", model_source);
        log::info!("loading environment from {}", env_source);

        let model_load = Some(loader::spawn_model(model_source.clone()));
        let env_load = Some(loader::spawn_environment(env_source));

        Self {
            viewport: Viewport::new(settings.input_mode),
            navbar: Navbar::new(),
            settings,
            model_load,
            env_load,
            pending_model: None,
            pending_env: None,
            last_model_percent: None,
            status_message: format!("Loading {}", model_source.label()),
            scroll_to_top: false,
        }
    }

    fn drain_model_events(&mut self) {
        loop {
            let event = match &self.model_load {
                Some(handle) => handle.poll(),
                None => return,
            };
            match event {
                None => return,
                Some(LoadEvent::Progress { loaded, total }) => {
                    if let Some(total) = total {
                        let percent = loaded * 100 / total.max(1);
                        if self.last_model_percent != Some(percent) {
                            self.last_model_percent = Some(percent);
                            log::info!("model loading: {}%", percent);
                        }
                    }
                }
                Some(LoadEvent::Ready(model)) => {
                    self.status_message = format!(
                        "Loaded: {} meshes, {} vertices, {} triangles",
                        model.meshes.len(),
                        model.vertex_count(),
                        model.triangle_count()
                    );
                    log::info!("{}", self.status_message);
                    self.pending_model = Some(model);
                    self.model_load = None;
                }
                Some(LoadEvent::Failed(err)) => {
                    // The scene keeps rendering without a model
                    log::error!("model load failed: {}", err);
                    self.status_message = format!("Model load failed: {}", err);
                    self.model_load = None;
                }
            }
        }
    }

    fn drain_env_events(&mut self) {
        loop {
            let event = match &self.env_load {
                Some(handle) => handle.poll(),
                None => return,
            };
            match event {
                None => return,
                Some(LoadEvent::Progress { .. }) => {}
                Some(LoadEvent::Ready(image)) => {
                    log::info!("environment ready: {}x{}", image.width, image.height);
                    self.pending_env = Some(image);
                    self.env_load = None;
                }
                Some(LoadEvent::Failed(err)) => {
                    // The scene keeps rendering without environment lighting
                    log::error!("environment load failed: {}", err);
                    self.env_load = None;
                }
            }
        }
    }

    /// Hand decoded assets to the viewport once the renderer exists.
    fn attach_pending(&mut self) {
        if self.viewport.renderer.is_none() {
            return;
        }
        if let Some(model) = self.pending_model.take() {
            self.viewport.attach_model(&model);
        }
        if let Some(image) = self.pending_env.take() {
            self.viewport.attach_environment(&image);
        }
    }

    fn status_bar(&self, ui: &mut egui::Ui) {
        let has_env = self
            .viewport
            .renderer
            .as_ref()
            .map(|r| r.has_environment())
            .unwrap_or(false);

        ui.horizontal(|ui| {
            ui.label(&self.status_message);
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                ui.label(format!("FPS: {:.0}", ui.ctx().input(|i| 1.0 / i.stable_dt)));
                if has_env {
                    ui.label("HDR");
                }
            });
        });
    }

    /// The scrollable page: a full-height viewport section, then a second
    /// full-height content section.
    fn page(&mut self, ui: &mut egui::Ui, render_state: Option<&egui_wgpu::RenderState>) {
        let screen_height = ui.ctx().screen_rect().height();

        let mut scroll_area = egui::ScrollArea::vertical().auto_shrink([false, false]);
        if self.scroll_to_top {
            scroll_area = scroll_area.vertical_scroll_offset(0.0);
            self.scroll_to_top = false;
        }

        let output = scroll_area.show(ui, |ui| {
            ui.allocate_ui(egui::vec2(ui.available_width(), screen_height), |ui| {
                ui.set_min_height(screen_height);
                self.viewport.show(ui, render_state);
            });

            // Second page section below the fold
            let (rect, _) = ui.allocate_exact_size(
                egui::vec2(ui.available_width(), screen_height),
                egui::Sense::hover(),
            );
            ui.painter()
                .rect_filled(rect, 0.0, Color32::from_rgb(24, 24, 27));
        });

        self.navbar.update_scroll(output.state.offset.y);
    }
}

impl eframe::App for ShowcaseApp {
    fn on_exit(&mut self) {
        self.settings.save();
        self.viewport.shutdown(None);
    }

    fn update(&mut self, ctx: &egui::Context, frame: &mut eframe::Frame) {
        // Close on Escape
        if ctx.input(|i| i.key_pressed(egui::Key::Escape)) {
            ctx.send_viewport_cmd(egui::ViewportCommand::Close);
            return;
        }

        // Initialize renderer once the wgpu context is available
        if self.viewport.renderer.is_none() {
            if let Some(render_state) = frame.wgpu_render_state() {
                self.viewport.init_renderer(
                    &render_state.device,
                    &render_state.queue,
                    render_state.target_format,
                    self.settings.exposure,
                );
            }
        }

        self.drain_model_events();
        self.drain_env_events();
        self.attach_pending();

        if self.navbar.show(ctx) {
            self.scroll_to_top = true;
        }

        TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            self.status_bar(ui);
        });

        let render_state = frame.wgpu_render_state();
        CentralPanel::default()
            .frame(egui::Frame::NONE.fill(Color32::from_rgb(10, 10, 12)))
            .show(ctx, |ui| {
                self.page(ui, render_state);
            });

        // Track window size for saving on exit
        ctx.input(|i| {
            if let Some(rect) = i.viewport().inner_rect {
                self.settings.window_width = rect.width();
                self.settings.window_height = rect.height();
            }
        });

        // Continuous render loop while mounted
        ctx.request_repaint();
    }
}
