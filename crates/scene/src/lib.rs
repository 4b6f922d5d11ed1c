//! Spinning cube scene: the renderer-agnostic half of the demo.
//!
//! Holds the static cube geometry, the fixed-function render state (two
//! lights, one material, sampler and projection), the optional texture, the
//! helper box and the keyboard-driven orbit camera. Each frame the scene is
//! turned into a [`FramePlan`] that any [`Renderer`] can execute.
//!
//! # Invariants
//! - Geometry, lights, material and texture are fixed after setup.
//! - Only the camera changes between frames.
//! - Renderers never mutate the scene.

pub mod camera;
pub mod drawable;
pub mod geometry;
pub mod input;
pub mod lighting;
pub mod render_state;
mod renderer;
mod scene;
pub mod texture;

pub use camera::{OrbitCamera, Projection};
pub use drawable::{DrawItem, DrawList, Drawable, MeshKind, TexturedBox, TexturedVertex};
pub use geometry::{CubeGeometry, Vertex};
pub use input::{HeldKeys, Key};
pub use lighting::{Light, Material};
pub use render_state::{FillMode, Filter, RenderState, SamplerState};
pub use renderer::{DebugTextRenderer, Renderer};
pub use scene::{
    CUBE_OFFSET, DEFAULT_HEIGHT, DEFAULT_TEXTURE, DEFAULT_WIDTH, FramePlan, Scene, SceneConfig,
    SceneError,
};
pub use texture::{TextureError, TextureImage};
