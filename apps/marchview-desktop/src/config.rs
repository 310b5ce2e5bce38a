use anyhow::{Context, Result};
use marchview_camera::CameraSettings;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Window parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "marchview".into(),
            width: 1200,
            height: 800,
        }
    }
}

/// Everything the desktop app reads from its optional JSON config file.
///
/// ```json
/// {
///   "window": { "width": 1600, "height": 900 },
///   "camera": { "position": [0.0, 1.0, 4.0], "movement_speed": 5.0 }
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub window: WindowConfig,
    pub camera: CameraSettings,
}

impl AppConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        let config: AppConfig = serde_json::from_str(&text)
            .with_context(|| format!("failed to parse config {}", path.display()))?;
        tracing::debug!(path = %path.display(), "loaded config");
        Ok(config)
    }

    /// Command-line values win over the file.
    pub fn apply_overrides(
        &mut self,
        width: Option<u32>,
        height: Option<u32>,
        speed: Option<f32>,
        sensitivity: Option<f32>,
    ) {
        if let Some(width) = width {
            self.window.width = width;
        }
        if let Some(height) = height {
            self.window.height = height;
        }
        if let Some(speed) = speed {
            self.camera.movement_speed = speed;
        }
        if let Some(sensitivity) = sensitivity {
            self.camera.mouse_sensitivity = sensitivity;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_window_is_1200_by_800() {
        let config = AppConfig::default();
        assert_eq!(config.window.width, 1200);
        assert_eq!(config.window.height, 800);
        assert_eq!(config.camera, CameraSettings::default());
    }

    #[test]
    fn partial_file_keeps_defaults() {
        let config: AppConfig =
            serde_json::from_str(r#"{ "camera": { "movement_speed": 5.0 } }"#).unwrap();
        assert_eq!(config.window, WindowConfig::default());
        assert_eq!(config.camera.movement_speed, 5.0);
        assert_eq!(config.camera.mouse_sensitivity, 0.1);
    }

    #[test]
    fn overrides_win() {
        let mut config = AppConfig::default();
        config.apply_overrides(Some(640), None, Some(10.0), None);
        assert_eq!(config.window.width, 640);
        assert_eq!(config.window.height, 800);
        assert_eq!(config.camera.movement_speed, 10.0);
        assert_eq!(config.camera.mouse_sensitivity, 0.1);
    }

    #[test]
    fn load_round_trip() {
        let path =
            std::env::temp_dir().join(format!("marchview-config-{}.json", std::process::id()));
        let mut config = AppConfig::default();
        config.window.title = "test".into();
        std::fs::write(&path, serde_json::to_string(&config).unwrap()).unwrap();
        let loaded = AppConfig::load(&path).unwrap();
        std::fs::remove_file(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn load_reports_missing_file() {
        let path = std::env::temp_dir().join("marchview-no-such-config.json");
        let err = AppConfig::load(&path).unwrap_err();
        assert!(err.to_string().contains("marchview-no-such-config.json"));
    }
}
