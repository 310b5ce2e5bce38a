//! wgpu render backend.
//!
//! Draws a single full-screen quad. All scene content lives in the fragment
//! shader, which receives the camera state as uniforms each frame.
//!
//! # Invariants
//! - The renderer never sees the camera, only [`FrameUniforms`](marchview_render::FrameUniforms).
//! - Geometry is uploaded once; only the uniform buffer changes per frame.

mod gpu;
mod shaders;

pub use gpu::{GpuUniforms, QuadRenderer, QUAD_INDICES, QUAD_VERTICES};
pub use shaders::{ShaderError, ShaderSource, FRAGMENT_ENTRY, RAYMARCH_SHADER, VERTEX_ENTRY};
