mod config;
mod keymap;

use anyhow::{Context, Result};
use clap::Parser;
use config::AppConfig;
use marchview_camera::Camera;
use marchview_input::{CursorTracker, FrameClock, InputHandler, MovementKeys};
use marchview_render::FrameUniforms;
use marchview_render_wgpu::{QuadRenderer, ShaderSource};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;
use winit::application::ApplicationHandler;
use winit::dpi::PhysicalSize;
use winit::event::{DeviceEvent, ElementState, KeyEvent, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{CursorGrabMode, Window, WindowId};

#[derive(Parser)]
#[command(name = "marchview-desktop", about = "Fly through a ray-marched scene")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// JSON config file with `window` and `camera` sections
    #[arg(long)]
    config: Option<PathBuf>,

    /// Custom WGSL shader (must keep the built-in uniform block)
    #[arg(long)]
    shader: Option<PathBuf>,

    /// Window width in pixels
    #[arg(long)]
    width: Option<u32>,

    /// Window height in pixels
    #[arg(long)]
    height: Option<u32>,

    /// Camera movement speed, world units per second
    #[arg(long)]
    speed: Option<f32>,

    /// Mouse look sensitivity, degrees per pixel
    #[arg(long)]
    sensitivity: Option<f32>,
}

/// Application state. Owns the camera; input reaches it only through here.
struct AppState {
    camera: Camera,
    keys: MovementKeys,
    cursor: CursorTracker,
    clock: FrameClock,
    // Raw device motion while grabbed, absolute cursor positions otherwise.
    cursor_grabbed: bool,
    // Next absolute position re-anchors the tracker instead of turning.
    cursor_reentered: bool,
    width: u32,
    height: u32,
}

impl AppState {
    fn new(camera: Camera, width: u32, height: u32) -> Self {
        Self {
            camera,
            keys: MovementKeys::new(),
            cursor: CursorTracker::centered(width as f32, height as f32),
            clock: FrameClock::new(),
            cursor_grabbed: false,
            cursor_reentered: false,
            width,
            height,
        }
    }

    /// Advance one frame of held-key movement.
    fn update(&mut self) -> f32 {
        let dt = self.clock.tick();
        self.keys.drive(&mut self.camera, dt);
        dt
    }

    /// Returns `true` when the key asks the app to quit.
    fn handle_key(&mut self, key: KeyCode, pressed: bool) -> bool {
        if let Some(direction) = keymap::direction_for(key) {
            self.keys.set(direction, pressed);
        }
        pressed && key == KeyCode::Escape
    }

    fn handle_cursor_entered(&mut self) {
        self.cursor_reentered = true;
    }

    fn handle_cursor_moved(&mut self, x: f32, y: f32) {
        if self.cursor_grabbed {
            return;
        }
        if self.cursor_reentered {
            self.cursor_reentered = false;
            self.cursor.reset(x, y);
            return;
        }
        let (dx, dy) = self.cursor.offset(x, y);
        self.camera.on_mouse_move(dx, dy);
    }

    fn handle_mouse_motion(&mut self, dx: f32, dy: f32) {
        if !self.cursor_grabbed {
            return;
        }
        let (dx, dy) = self.cursor.motion(dx, dy);
        self.camera.on_mouse_move(dx, dy);
    }

    fn handle_scroll(&mut self, lines: f32) {
        self.camera.on_scroll(lines);
        tracing::debug!(zoom = self.camera.zoom(), "zoom changed");
    }

    fn resize(&mut self, width: u32, height: u32) {
        self.width = width.max(1);
        self.height = height.max(1);
    }

    fn frame_uniforms(&self) -> FrameUniforms {
        FrameUniforms::capture(&self.camera, self.width, self.height)
    }
}

/// GPU objects created once the window exists.
struct Gpu {
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    renderer: QuadRenderer,
}

impl Gpu {
    fn new(window: Arc<Window>, shader: &ShaderSource) -> Result<Self> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        let surface = instance
            .create_surface(window.clone())
            .context("failed to create surface")?;

        let adapter = pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::HighPerformance,
            compatible_surface: Some(&surface),
            force_fallback_adapter: false,
        }))
        .context("no suitable GPU adapter")?;

        let (device, queue) = pollster::block_on(adapter.request_device(
            &wgpu::DeviceDescriptor {
                label: Some("marchview_device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default(),
                memory_hints: Default::default(),
            },
            None,
        ))
        .context("failed to create device")?;

        let size = window.inner_size();
        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .or_else(|| surface_caps.formats.first())
            .copied()
            .context("surface reports no formats")?;
        let alpha_mode = surface_caps
            .alpha_modes
            .first()
            .copied()
            .unwrap_or(wgpu::CompositeAlphaMode::Auto);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let renderer = QuadRenderer::new(&device, surface_format, shader);

        tracing::info!(
            "GPU initialized with {} backend",
            adapter.get_info().backend.to_str()
        );

        Ok(Self {
            surface,
            device,
            queue,
            config,
            renderer,
        })
    }

    fn resize(&mut self, width: u32, height: u32) {
        self.config.width = width.max(1);
        self.config.height = height.max(1);
        self.surface.configure(&self.device, &self.config);
    }

    fn render(&self, uniforms: &FrameUniforms) {
        let output = match self.surface.get_current_texture() {
            Ok(t) => t,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                self.surface.configure(&self.device, &self.config);
                return;
            }
            Err(e) => {
                tracing::error!("surface error: {e}");
                return;
            }
        };

        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        self.renderer.render(&self.device, &self.queue, &view, uniforms);
        output.present();
    }
}

struct GpuApp {
    state: AppState,
    title: String,
    shader: ShaderSource,
    window: Option<Arc<Window>>,
    gpu: Option<Gpu>,
    fatal: Option<anyhow::Error>,
}

impl GpuApp {
    fn new(config: AppConfig, camera: Camera, shader: ShaderSource) -> Self {
        Self {
            state: AppState::new(camera, config.window.width, config.window.height),
            title: config.window.title,
            shader,
            window: None,
            gpu: None,
            fatal: None,
        }
    }

    fn init(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        let attrs = Window::default_attributes()
            .with_title(self.title.clone())
            .with_inner_size(PhysicalSize::new(self.state.width, self.state.height));
        let window = Arc::new(
            event_loop
                .create_window(attrs)
                .context("failed to create window")?,
        );

        self.state.cursor_grabbed = grab_cursor(&window);
        let size = window.inner_size();
        self.state.resize(size.width, size.height);

        self.gpu = Some(Gpu::new(window.clone(), &self.shader)?);
        self.window = Some(window);
        Ok(())
    }
}

/// Hide the cursor and keep it in the window. Returns `true` when either grab
/// mode took, so relative device motion drives the look.
fn grab_cursor(window: &Window) -> bool {
    window.set_cursor_visible(false);
    let grabbed = window
        .set_cursor_grab(CursorGrabMode::Locked)
        .or_else(|_| window.set_cursor_grab(CursorGrabMode::Confined));
    match grabbed {
        Ok(()) => true,
        Err(e) => {
            tracing::warn!("cursor grab unavailable, using absolute positions: {e}");
            false
        }
    }
}

impl ApplicationHandler for GpuApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }
        if let Err(e) = self.init(event_loop) {
            tracing::error!("startup failed: {e:#}");
            self.fatal = Some(e);
            event_loop.exit();
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::Resized(new_size) => {
                self.state.resize(new_size.width, new_size.height);
                if let Some(gpu) = &mut self.gpu {
                    gpu.resize(new_size.width, new_size.height);
                }
            }
            WindowEvent::Focused(false) => {
                self.state.keys.clear();
            }
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(key),
                        state: key_state,
                        ..
                    },
                ..
            } => {
                if self.state.handle_key(key, key_state == ElementState::Pressed) {
                    event_loop.exit();
                }
            }
            WindowEvent::CursorEntered { .. } => {
                self.state.handle_cursor_entered();
            }
            WindowEvent::CursorMoved { position, .. } => {
                self.state.handle_cursor_moved(position.x as f32, position.y as f32);
            }
            WindowEvent::MouseWheel { delta, .. } => {
                self.state.handle_scroll(keymap::scroll_lines(delta));
            }
            WindowEvent::RedrawRequested => {
                // All input for this frame is in; now read the camera.
                self.state.update();
                if let Some(gpu) = &self.gpu {
                    gpu.render(&self.state.frame_uniforms());
                }
                if let Some(window) = &self.window {
                    window.request_redraw();
                }
            }
            _ => {}
        }
    }

    fn device_event(
        &mut self,
        _event_loop: &ActiveEventLoop,
        _device_id: winit::event::DeviceId,
        event: DeviceEvent,
    ) {
        if let DeviceEvent::MouseMotion { delta } = event {
            self.state.handle_mouse_motion(delta.0 as f32, delta.1 as f32);
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        tracing::info!(frames = self.state.clock.frames(), "marchview-desktop exiting");
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    tracing::info!("marchview-desktop starting");

    let mut config = match &cli.config {
        Some(path) => AppConfig::load(path)?,
        None => AppConfig::default(),
    };
    config.apply_overrides(cli.width, cli.height, cli.speed, cli.sensitivity);

    let camera = Camera::from_settings(&config.camera).context("invalid camera settings")?;
    let shader = match &cli.shader {
        Some(path) => ShaderSource::load(path)?,
        None => ShaderSource::builtin(),
    };

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = GpuApp::new(config, camera, shader);
    event_loop.run_app(&mut app)?;

    match app.fatal {
        Some(e) => Err(e),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;
    use marchview_input::Direction;

    fn state() -> AppState {
        AppState::new(Camera::default(), 1200, 800)
    }

    #[test]
    fn escape_requests_exit_on_press_only() {
        let mut s = state();
        assert!(s.handle_key(KeyCode::Escape, true));
        assert!(!s.handle_key(KeyCode::Escape, false));
        assert!(!s.handle_key(KeyCode::KeyW, true));
    }

    #[test]
    fn movement_keys_are_tracked() {
        let mut s = state();
        s.handle_key(KeyCode::Space, true);
        assert!(s.keys.is_held(Direction::Up));
        s.handle_key(KeyCode::Space, false);
        assert!(s.keys.is_idle());
    }

    #[test]
    fn update_moves_along_held_keys() {
        let mut s = state();
        s.handle_key(KeyCode::Space, true);
        let dt = s.update();
        assert!(dt >= 0.0);
        assert!((s.camera.position().y - 2.5 * dt).abs() < 1e-6);
        assert_eq!(s.camera.position().x, 0.0);
    }

    #[test]
    fn ungrabbed_cursor_uses_absolute_positions() {
        let mut s = state();
        s.cursor_grabbed = false;
        // Up and to the right of the window centre.
        s.handle_cursor_moved(700.0, 300.0);
        assert_eq!(s.camera.angles().x, -90.0 + 100.0 * 0.1);
        assert!((s.camera.pitch() - 10.0).abs() < 1e-4);
        // Raw motion is ignored without a grab.
        s.handle_mouse_motion(1000.0, 1000.0);
        assert!((s.camera.pitch() - 10.0).abs() < 1e-4);
    }

    #[test]
    fn grabbed_cursor_turns_past_the_window_edge() {
        // Confined and locked grabs both deliver relative motion, which keeps
        // turning when the hidden cursor is pinned to an edge.
        let mut s = state();
        s.cursor_grabbed = true;
        s.handle_cursor_moved(1199.0, 400.0);
        assert_eq!(s.camera.angles(), Camera::default().angles());
        for _ in 0..5 {
            s.handle_cursor_moved(1199.0, 400.0);
            s.handle_mouse_motion(20.0, 0.0);
        }
        assert!((s.camera.yaw() - (-80.0)).abs() < 1e-4);
        s.handle_mouse_motion(0.0, -50.0);
        assert!((s.camera.pitch() - 5.0).abs() < 1e-4);
    }

    #[test]
    fn reentry_does_not_jump() {
        let mut s = state();
        s.cursor_grabbed = false;
        s.handle_cursor_entered();
        // Far from the tracked centre: re-anchors instead of turning.
        s.handle_cursor_moved(0.0, 0.0);
        assert_eq!(s.camera.angles(), Camera::default().angles());
        assert_eq!(s.cursor.last_position(), (0.0, 0.0));
        s.handle_cursor_moved(10.0, 0.0);
        assert!((s.camera.yaw() - (-89.0)).abs() < 1e-4);
    }

    #[test]
    fn scroll_zooms_in() {
        let mut s = state();
        s.handle_scroll(3.0);
        assert_eq!(s.camera.zoom(), 42.0);
    }

    #[test]
    fn uniforms_track_resize() {
        let mut s = state();
        s.camera = Camera::new(Vec3::new(0.0, 1.0, 0.0));
        s.resize(0, 600);
        let u = s.frame_uniforms();
        assert_eq!(u.resolution.x, 1.0);
        assert_eq!(u.resolution.y, 600.0);
        assert_eq!(u.position, Vec3::Y);
    }
}
