//! Rendering Adapter: renderer-agnostic interface.
//!
//! # Invariants
//! - Renderers read a [`FrameUniforms`] snapshot and never touch the camera.
//! - A snapshot is captured once per frame, after all input for that frame
//!   has been applied.

mod renderer;

pub use renderer::{DebugTextRenderer, FrameUniforms, Renderer};

pub fn crate_info() -> &'static str {
    "marchview-render v0.1.0"
}
