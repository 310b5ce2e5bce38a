use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Errors from [`CameraSettings::validate`].
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SettingsError {
    #[error("camera setting `{field}` must be finite")]
    NonFinite { field: &'static str },
    #[error("camera setting `{field}` must not be negative, got {value}")]
    Negative { field: &'static str, value: f32 },
}

/// Construction parameters for a [`Camera`](crate::Camera).
///
/// Every field has a default, so a config file only needs the ones it
/// changes. Angles are in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraSettings {
    pub position: Vec3,
    pub yaw: f32,
    pub pitch: f32,
    /// World units per second.
    pub movement_speed: f32,
    /// Degrees per pixel of cursor motion.
    pub mouse_sensitivity: f32,
    pub zoom: f32,
}

impl Default for CameraSettings {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            yaw: -90.0,
            pitch: 0.0,
            movement_speed: 2.5,
            mouse_sensitivity: 0.1,
            zoom: 45.0,
        }
    }
}

impl CameraSettings {
    /// Reject values that would poison the camera state. Pitch and zoom
    /// outside their ranges are accepted here and saturated by the camera.
    pub fn validate(&self) -> Result<(), SettingsError> {
        if !self.position.is_finite() {
            return Err(SettingsError::NonFinite { field: "position" });
        }
        for (field, value) in [
            ("yaw", self.yaw),
            ("pitch", self.pitch),
            ("movement_speed", self.movement_speed),
            ("mouse_sensitivity", self.mouse_sensitivity),
            ("zoom", self.zoom),
        ] {
            if !value.is_finite() {
                return Err(SettingsError::NonFinite { field });
            }
        }
        for (field, value) in [
            ("movement_speed", self.movement_speed),
            ("mouse_sensitivity", self.mouse_sensitivity),
        ] {
            if value < 0.0 {
                return Err(SettingsError::Negative { field, value });
            }
        }
        Ok(())
    }
}
