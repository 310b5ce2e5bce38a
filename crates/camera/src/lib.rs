//! First-person camera driven by keyboard, mouse, and scroll input.
//!
//! Orientation is stored as yaw/pitch in degrees; the forward/right/up basis
//! and the view matrix are derived from it on every read.
//!
//! # Invariants
//! - Pitch stays within [`PITCH_LIMIT`] degrees of the horizon.
//! - Zoom stays within [`ZOOM_MIN`]..=[`ZOOM_MAX`].
//! - Reads never mutate state; there is no cached basis to go stale.

mod camera;
mod settings;

pub use camera::{Camera, PITCH_LIMIT, WORLD_UP, ZOOM_MAX, ZOOM_MIN};
pub use settings::{CameraSettings, SettingsError};

pub fn crate_info() -> &'static str {
    "marchview-camera v0.1.0"
}
