use crate::settings::{CameraSettings, SettingsError};
use glam::{Mat4, Vec2, Vec3};
use marchview_input::{Direction, InputHandler};

/// Pitch is clamped to +/- this many degrees so forward never lines up with
/// the world up axis.
pub const PITCH_LIMIT: f32 = 89.0;
/// Narrowest zoom (field of view, degrees).
pub const ZOOM_MIN: f32 = 1.0;
/// Widest zoom (field of view, degrees).
pub const ZOOM_MAX: f32 = 45.0;
/// Fixed vertical axis. Up/down movement and the right vector use it.
pub const WORLD_UP: Vec3 = Vec3::Y;

/// First-person fly camera.
///
/// Yaw and pitch are kept in degrees and converted at read time. Yaw is
/// unbounded; trigonometry wraps it.
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    position: Vec3,
    yaw: f32,
    pitch: f32,
    movement_speed: f32,
    mouse_sensitivity: f32,
    zoom: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(Vec3::ZERO)
    }
}

impl Camera {
    /// Camera at `position` looking down the default axis (yaw -90, pitch 0).
    pub fn new(position: Vec3) -> Self {
        let defaults = CameraSettings::default();
        Self {
            position,
            yaw: defaults.yaw,
            pitch: defaults.pitch,
            movement_speed: defaults.movement_speed,
            mouse_sensitivity: defaults.mouse_sensitivity,
            zoom: defaults.zoom,
        }
    }

    /// Build a camera from validated settings. Out-of-range pitch and zoom
    /// saturate into their limits.
    pub fn from_settings(settings: &CameraSettings) -> Result<Self, SettingsError> {
        settings.validate()?;
        let pitch = settings.pitch.clamp(-PITCH_LIMIT, PITCH_LIMIT);
        let zoom = settings.zoom.clamp(ZOOM_MIN, ZOOM_MAX);
        if pitch != settings.pitch || zoom != settings.zoom {
            tracing::debug!(
                pitch = settings.pitch,
                zoom = settings.zoom,
                "initial camera angles saturated into range"
            );
        }
        Ok(Self {
            position: settings.position,
            yaw: settings.yaw,
            pitch,
            movement_speed: settings.movement_speed,
            mouse_sensitivity: settings.mouse_sensitivity,
            zoom,
        })
    }

    /// Current state as settings, e.g. to save a viewpoint.
    pub fn settings(&self) -> CameraSettings {
        CameraSettings {
            position: self.position,
            yaw: self.yaw,
            pitch: self.pitch,
            movement_speed: self.movement_speed,
            mouse_sensitivity: self.mouse_sensitivity,
            zoom: self.zoom,
        }
    }

    /// Move for `delta_time` seconds in `direction`.
    pub fn process_keyboard_input(&mut self, direction: Direction, delta_time: f32) {
        let step = self.movement_speed * delta_time;
        let basis = match direction {
            Direction::Forward => self.forward(),
            Direction::Backward => -self.forward(),
            Direction::Left => -self.right(),
            Direction::Right => self.right(),
            Direction::Up => WORLD_UP,
            Direction::Down => -WORLD_UP,
        };
        self.position += basis * step;
    }

    /// Turn by a cursor offset. Positive `y_offset` looks up.
    pub fn process_mouse_input(&mut self, x_offset: f32, y_offset: f32) {
        self.yaw += x_offset * self.mouse_sensitivity;
        self.pitch = (self.pitch + y_offset * self.mouse_sensitivity)
            .clamp(-PITCH_LIMIT, PITCH_LIMIT);
    }

    /// Scroll away from the user to zoom in.
    pub fn process_scroll_input(&mut self, y_offset: f32) {
        self.zoom = (self.zoom - y_offset).clamp(ZOOM_MIN, ZOOM_MAX);
    }

    pub fn forward(&self) -> Vec3 {
        let (yaw, pitch) = (self.yaw.to_radians(), self.pitch.to_radians());
        Vec3::new(
            pitch.cos() * yaw.cos(),
            pitch.sin(),
            pitch.cos() * yaw.sin(),
        )
        .normalize()
    }

    pub fn right(&self) -> Vec3 {
        self.forward().cross(WORLD_UP).normalize()
    }

    pub fn up(&self) -> Vec3 {
        let forward = self.forward();
        forward.cross(WORLD_UP).normalize().cross(forward).normalize()
    }

    /// Right-handed look-at matrix from the current position along forward.
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.position + self.forward(), self.up())
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    /// `(yaw, pitch)` in degrees.
    pub fn angles(&self) -> Vec2 {
        Vec2::new(self.yaw, self.pitch)
    }

    pub fn yaw(&self) -> f32 {
        self.yaw
    }

    pub fn pitch(&self) -> f32 {
        self.pitch
    }

    /// Field-of-view proxy in degrees.
    pub fn zoom(&self) -> f32 {
        self.zoom
    }

    pub fn movement_speed(&self) -> f32 {
        self.movement_speed
    }

    pub fn mouse_sensitivity(&self) -> f32 {
        self.mouse_sensitivity
    }
}

impl InputHandler for Camera {
    fn on_key(&mut self, direction: Direction, delta_time: f32) {
        self.process_keyboard_input(direction, delta_time);
    }

    fn on_mouse_move(&mut self, x_offset: f32, y_offset: f32) {
        self.process_mouse_input(x_offset, y_offset);
    }

    fn on_scroll(&mut self, y_offset: f32) {
        self.process_scroll_input(y_offset);
    }
}
