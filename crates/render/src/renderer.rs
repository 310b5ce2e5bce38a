use glam::{Mat4, Vec2, Vec3};
use marchview_camera::Camera;

/// Everything the shader needs from the host for one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameUniforms {
    /// Framebuffer size in pixels.
    pub resolution: Vec2,
    /// Camera position in world space.
    pub position: Vec3,
    /// `(yaw, pitch)` in degrees.
    pub angles: Vec2,
    pub forward: Vec3,
    pub up: Vec3,
    pub view: Mat4,
    /// Field of view in degrees.
    pub zoom: f32,
}

impl FrameUniforms {
    /// Read the camera's accessors for a `width` x `height` target.
    pub fn capture(camera: &Camera, width: u32, height: u32) -> Self {
        Self {
            resolution: Vec2::new(width.max(1) as f32, height.max(1) as f32),
            position: camera.position(),
            angles: camera.angles(),
            forward: camera.forward(),
            up: camera.up(),
            view: camera.view_matrix(),
            zoom: camera.zoom(),
        }
    }

    pub fn aspect(&self) -> f32 {
        self.resolution.x / self.resolution.y
    }
}

impl Default for FrameUniforms {
    fn default() -> Self {
        Self::capture(&Camera::default(), 1200, 800)
    }
}

/// Renderer-agnostic interface. All renderers implement this trait.
///
/// A renderer turns one frame's uniforms into output. It has no access to
/// the camera itself.
pub trait Renderer {
    /// The output type produced by this renderer.
    type Output;

    /// Render one frame.
    fn render(&self, uniforms: &FrameUniforms) -> Self::Output;
}

/// Text renderer for headless runs, logs, and tests.
#[derive(Debug, Default)]
pub struct DebugTextRenderer;

impl DebugTextRenderer {
    pub fn new() -> Self {
        Self
    }
}

impl Renderer for DebugTextRenderer {
    type Output = String;

    fn render(&self, u: &FrameUniforms) -> String {
        let mut out = String::new();
        out.push_str(&format!(
            "=== Frame ({}x{}, zoom={:.1}) ===\n",
            u.resolution.x, u.resolution.y, u.zoom
        ));
        out.push_str(&format!(
            "position: ({:.3}, {:.3}, {:.3})\n",
            u.position.x, u.position.y, u.position.z
        ));
        out.push_str(&format!(
            "angles:   yaw={:.2} pitch={:.2}\n",
            u.angles.x, u.angles.y
        ));
        out.push_str(&format!(
            "forward:  ({:.3}, {:.3}, {:.3})\n",
            u.forward.x, u.forward.y, u.forward.z
        ));
        out.push_str(&format!(
            "up:       ({:.3}, {:.3}, {:.3})\n",
            u.up.x, u.up.y, u.up.z
        ));
        out.push_str("view:\n");
        // Row-major for reading.
        let rows = u.view.transpose().to_cols_array_2d();
        for row in rows {
            out.push_str(&format!(
                "  [{:8.3} {:8.3} {:8.3} {:8.3}]\n",
                row[0], row[1], row[2], row[3]
            ));
        }
        tracing::trace!(bytes = out.len(), "debug frame rendered");
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use marchview_input::Direction;

    #[test]
    fn capture_mirrors_camera_accessors() {
        let mut cam = Camera::new(Vec3::new(1.0, 2.0, 3.0));
        cam.process_mouse_input(30.0, -12.0);
        cam.process_scroll_input(5.0);

        let u = FrameUniforms::capture(&cam, 1200, 800);
        assert_eq!(u.resolution, Vec2::new(1200.0, 800.0));
        assert_eq!(u.position, cam.position());
        assert_eq!(u.angles, cam.angles());
        assert_eq!(u.forward, cam.forward());
        assert_eq!(u.up, cam.up());
        assert_eq!(u.view, cam.view_matrix());
        assert_eq!(u.zoom, 40.0);
        assert_eq!(u.aspect(), 1.5);
    }

    #[test]
    fn capture_guards_zero_size() {
        let u = FrameUniforms::capture(&Camera::default(), 0, 0);
        assert_eq!(u.resolution, Vec2::ONE);
        assert!(u.aspect().is_finite());
    }

    #[test]
    fn capture_reflects_input_applied_before_it() {
        let mut cam = Camera::default();
        let before = FrameUniforms::capture(&cam, 10, 10);
        cam.process_keyboard_input(Direction::Up, 1.0);
        let after = FrameUniforms::capture(&cam, 10, 10);
        assert_eq!(after.position.y - before.position.y, 2.5);
        assert_ne!(after.view, before.view);
    }

    #[test]
    fn debug_renderer_default_frame() {
        let output = DebugTextRenderer::new().render(&FrameUniforms::default());
        assert!(output.contains("1200x800"));
        assert!(output.contains("yaw=-90.00 pitch=0.00"));
        assert!(output.contains("up:"));
        assert_eq!(output.lines().filter(|l| l.starts_with("  [")).count(), 4);
    }

    #[test]
    fn debug_renderer_after_movement() {
        let mut cam = Camera::default();
        cam.process_keyboard_input(Direction::Up, 2.0);
        let output = DebugTextRenderer::new().render(&FrameUniforms::capture(&cam, 64, 32));
        assert!(output.contains("position: (0.000, 5.000, 0.000)"));
        assert!(output.contains("64x32"));
    }
}
