//! Rendering Adapter: backend-agnostic scene rendering.
//!
//! # Invariants
//! - The scene is built completely or not at all.
//! - Every backend mesh and program is released exactly once, by its owner.
//! - Matrices cross the backend boundary by value.

mod backend;
mod frame;
mod mesh;
mod recording;
mod scene;

pub use backend::{
    BackendError, DrawUniforms, MeshHandle, ProgramHandle, RenderBackend, ShaderStage,
};
pub use frame::{CUBE_SPACING, FrameMatrices, RenderContext, ShaderSources, model_matrix};
pub use mesh::{MeshData, cube_mesh};
pub use recording::{DrawCall, RecordedFrame, RecordingBackend};
pub use scene::{CubeInstance, Scene};
