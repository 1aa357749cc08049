//! Persistent application settings

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use super::input::InputMode;

/// Default model asset, resolved relative to the working directory.
pub const DEFAULT_MODEL: &str = "assets/DamagedHelmet.gltf";

/// Default environment map: a 4k equirectangular HDR served remotely.
pub const DEFAULT_ENVIRONMENT: &str =
    "https://dl.polyhaven.org/file/ph-assets/HDRIs/hdr/4k/pond_bridge_night_4k.hdr";

/// Application settings that persist between sessions
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // Window
    pub window_width: f32,
    pub window_height: f32,

    // Scene
    pub model_path: String,
    pub environment_url: String,
    pub exposure: f32,

    // Input
    pub input_mode: InputMode,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            window_width: 1280.0,
            window_height: 720.0,
            model_path: DEFAULT_MODEL.to_string(),
            environment_url: DEFAULT_ENVIRONMENT.to_string(),
            exposure: 1.0,
            input_mode: InputMode::default(),
        }
    }
}

impl Settings {
    /// Get settings file path
    fn path() -> Option<PathBuf> {
        dirs::config_dir().map(|mut p| {
            p.push("vitrine");
            std::fs::create_dir_all(&p).ok();
            p.push("settings.json");
            p
        })
    }

    /// Load settings from file
    pub fn load() -> Self {
        Self::path()
            .and_then(|p| std::fs::read_to_string(&p).ok())
            .and_then(|s| serde_json::from_str(&s).ok())
            .unwrap_or_default()
    }

    /// Save settings to file
    pub fn save(&self) {
        if let Some(path) = Self::path() {
            if let Ok(json) = serde_json::to_string_pretty(self) {
                let _ = std::fs::write(path, json);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roundtrip() {
        let mut settings = Settings::default();
        settings.window_width = 1920.0;
        settings.input_mode = InputMode::Orbit;

        let json = serde_json::to_string(&settings).unwrap();
        let back: Settings = serde_json::from_str(&json).unwrap();
        assert_eq!(back.window_width, 1920.0);
        assert_eq!(back.input_mode, InputMode::Orbit);
        assert_eq!(back.model_path, DEFAULT_MODEL);
    }

    #[test]
    fn test_missing_and_unknown_fields_tolerated() {
        // Settings written by an older or newer build still load
        let back: Settings =
            serde_json::from_str(r#"{"exposure": 2.0, "some_future_field": true}"#).unwrap();
        assert_eq!(back.exposure, 2.0);
        assert_eq!(back.environment_url, DEFAULT_ENVIRONMENT);
        assert_eq!(back.input_mode, InputMode::PointerFollow);
    }
}
