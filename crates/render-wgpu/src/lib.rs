//! wgpu render backend for the spinning cube.
//!
//! Emulates the fixed-function pipeline in WGSL: per-vertex lighting with
//! directional and point lights, one material, a modulating texture with a
//! configurable sampler. Consumes [`spincube_scene::FramePlan`]s.
//!
//! # Invariants
//! - The renderer never mutates the scene.
//! - Geometry and texture are uploaded once; only uniforms change per frame.
//! - Frames after [`WgpuRenderer::release`] draw nothing.

mod context;
mod gpu;
mod shaders;
mod texture;
mod uniforms;

pub use context::{GpuContext, RenderError};
pub use gpu::{MAX_DRAWS, WgpuRenderer};
pub use texture::GpuTexture;
pub use uniforms::{DrawUniforms, FrameUniforms, GpuLight, MAX_LIGHTS};
