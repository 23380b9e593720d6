//! wgpu render backend for the cube scene.
//!
//! Implements `RenderBackend` on top of a configured wgpu surface. Shaders are
//! WGSL; compile and link failures are captured through validation error
//! scopes and reported with the validator's message.
//!
//! # Invariants
//! - Draws are recorded between `begin_frame` and `end_frame` and submitted
//!   in a single render pass.
//! - Each draw gets its own slot in a dynamic-offset uniform buffer.

mod gpu;
mod shaders;

pub use gpu::WgpuBackend;
pub use shaders::{FRAGMENT_SHADER, SHADERS, VERTEX_SHADER};
