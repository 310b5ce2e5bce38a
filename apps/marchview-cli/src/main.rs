use anyhow::Context;
use clap::{Parser, Subcommand};
use glam::Vec3;
use marchview_camera::{Camera, CameraSettings};
use marchview_input::{Direction, InputHandler, MovementKeys};
use marchview_render::{DebugTextRenderer, FrameUniforms, Renderer};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "marchview-cli", about = "Headless tool for marchview camera runs")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print version and crate info
    Info,
    /// Drive a camera with the same input every frame and print the result
    Simulate {
        /// Number of frames to run
        #[arg(short, long, default_value = "60")]
        frames: u32,
        /// Seconds per frame
        #[arg(long, default_value = "0.016")]
        dt: f32,
        /// Held movement keys, comma separated (forward,backward,left,right,up,down)
        #[arg(short, long, value_delimiter = ',')]
        keys: Vec<Direction>,
        /// Horizontal cursor offset per frame, pixels
        #[arg(long, default_value = "0", allow_negative_numbers = true)]
        mouse_dx: f32,
        /// Vertical cursor offset per frame, pixels (positive looks up)
        #[arg(long, default_value = "0", allow_negative_numbers = true)]
        mouse_dy: f32,
        /// Scroll per frame, wheel notches (positive zooms in)
        #[arg(long, default_value = "0", allow_negative_numbers = true)]
        scroll: f32,
        /// Starting position as x,y,z
        #[arg(long, value_delimiter = ',', allow_negative_numbers = true)]
        position: Option<Vec<f32>>,
        /// Framebuffer size used for the printed uniforms
        #[arg(long, default_value = "1200x800")]
        size: String,
        /// Print the final camera settings as JSON instead of the frame dump
        #[arg(long)]
        json: bool,
    },
}

/// Per-frame input replayed by `simulate`.
#[derive(Debug, Clone, Default)]
struct FrameInput {
    keys: MovementKeys,
    mouse: (f32, f32),
    scroll: f32,
}

/// Run `frames` frames: movement first, then look and zoom, mirroring the
/// desktop loop's order.
fn simulate(camera: &mut Camera, input: &FrameInput, frames: u32, dt: f32) {
    for frame in 0..frames {
        input.keys.drive(camera, dt);
        if input.mouse != (0.0, 0.0) {
            camera.on_mouse_move(input.mouse.0, input.mouse.1);
        }
        if input.scroll != 0.0 {
            camera.on_scroll(input.scroll);
        }
        tracing::trace!(frame, position = ?camera.position(), angles = ?camera.angles());
    }
}

fn parse_size(size: &str) -> anyhow::Result<(u32, u32)> {
    let (w, h) = size
        .split_once(['x', 'X'])
        .with_context(|| format!("size `{size}` is not WIDTHxHEIGHT"))?;
    let w = w.trim().parse().with_context(|| format!("bad width in `{size}`"))?;
    let h = h.trim().parse().with_context(|| format!("bad height in `{size}`"))?;
    Ok((w, h))
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    match cli.command {
        Commands::Info => {
            println!("marchview-cli v{}", env!("CARGO_PKG_VERSION"));
            println!("input: {}", marchview_input::crate_info());
            println!("camera: {}", marchview_camera::crate_info());
            println!("render: {}", marchview_render::crate_info());
        }
        Commands::Simulate {
            frames,
            dt,
            keys,
            mouse_dx,
            mouse_dy,
            scroll,
            position,
            size,
            json,
        } => {
            anyhow::ensure!(dt >= 0.0, "dt must not be negative, got {dt}");
            let (width, height) = parse_size(&size)?;

            let mut settings = CameraSettings::default();
            if let Some(p) = position {
                anyhow::ensure!(p.len() == 3, "position needs exactly x,y,z, got {p:?}");
                settings.position = Vec3::from_slice(&p);
            }
            let mut camera = Camera::from_settings(&settings)?;

            let mut input = FrameInput {
                mouse: (mouse_dx, mouse_dy),
                scroll,
                ..FrameInput::default()
            };
            for key in keys {
                input.keys.press(key);
            }

            tracing::debug!(frames, dt, "simulating");
            simulate(&mut camera, &input, frames, dt);

            if json {
                println!("{}", serde_json::to_string_pretty(&camera.settings())?);
            } else {
                let uniforms = FrameUniforms::capture(&camera, width, height);
                print!("{}", DebugTextRenderer::new().render(&uniforms));
            }
        }
    }

    Ok(())
}
