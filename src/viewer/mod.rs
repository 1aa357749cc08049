//! Vitrine viewer - application shell for the 3D showcase.

mod app;
mod camera;
mod environment;
mod input;
mod navbar;
mod renderer;
mod settings;
mod viewport;

pub use input::InputMode;
pub use settings::Settings;

use anyhow::Result;

/// Command-line overrides applied on top of the saved settings.
#[derive(Debug, Default, Clone)]
pub struct ViewerOptions {
    pub model: Option<String>,
    pub environment: Option<String>,
    pub input_mode: Option<InputMode>,
}

/// Run the showcase window until it is closed.
pub fn run(options: ViewerOptions) -> Result<()> {
    env_logger::init();

    // Friendly panic handler for GPU errors
    std::panic::set_hook(Box::new(|info| {
        let msg = info
            .payload()
            .downcast_ref::<String>()
            .map(|s| s.as_str())
            .or_else(|| info.payload().downcast_ref::<&str>().copied())
            .unwrap_or("Unknown error");

        if msg.contains("wgpu") || msg.contains("Buffer") || msg.contains("shader") {
            eprintln!("\n[GPU Error] {}", msg);
            eprintln!("\nThis is likely a shader/buffer mismatch. Try updating your GPU drivers.");
        } else {
            eprintln!("\n[Error] {}", msg);
            if let Some(loc) = info.location() {
                eprintln!("  at {}:{}:{}", loc.file(), loc.line(), loc.column());
            }
        }
    }));

    let mut settings = Settings::load();
    if let Some(model) = options.model {
        settings.model_path = model;
    }
    if let Some(environment) = options.environment {
        settings.environment_url = environment;
    }
    if let Some(mode) = options.input_mode {
        settings.input_mode = mode;
    }

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([settings.window_width, settings.window_height])
            .with_title("Vitrine"),
        renderer: eframe::Renderer::Wgpu,
        wgpu_options: egui_wgpu::WgpuConfiguration {
            wgpu_setup: egui_wgpu::WgpuSetup::CreateNew(egui_wgpu::WgpuSetupCreateNew {
                device_descriptor: std::sync::Arc::new(|adapter| {
                    let base_limits = if adapter.get_info().backend == wgpu::Backend::Gl {
                        wgpu::Limits::downlevel_webgl2_defaults()
                    } else {
                        wgpu::Limits::default()
                    };
                    wgpu::DeviceDescriptor {
                        label: Some("vitrine device"),
                        // Rgba32Float environment maps are sampled with a
                        // filtering sampler
                        required_features: wgpu::Features::FLOAT32_FILTERABLE,
                        required_limits: base_limits,
                        ..Default::default()
                    }
                }),
                ..Default::default()
            }),
            ..Default::default()
        },
        ..Default::default()
    };

    eframe::run_native(
        "Vitrine",
        native_options,
        Box::new(move |cc| Ok(Box::new(app::ShowcaseApp::new(cc, settings)))),
    )
    .map_err(|e| anyhow::anyhow!("Failed to run: {}", e))
}
