use crate::mesh::MeshData;
use glam::Mat4;
use rubik_common::FaceColor;
use serde::Serialize;

/// A handle referencing a mesh owned by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct MeshHandle(pub u64);

/// A handle referencing a linked shader program owned by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct ProgramHandle(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShaderStage {
    Vertex,
    Fragment,
}

impl std::fmt::Display for ShaderStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ShaderStage::Vertex => f.write_str("vertex"),
            ShaderStage::Fragment => f.write_str("fragment"),
        }
    }
}

/// Errors surfaced by a rendering backend. None of them are retried.
#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    #[error("{stage} shader failed to compile: {log}")]
    ShaderCompile { stage: ShaderStage, log: String },
    #[error("shader program failed to link: {log}")]
    ShaderLink { log: String },
    #[error("failed to create resource: {0}")]
    ResourceCreation(String),
    #[error("unknown mesh {0:?}")]
    UnknownMesh(MeshHandle),
    #[error("unknown program {0:?}")]
    UnknownProgram(ProgramHandle),
    #[error("draw issued outside of a frame")]
    FrameNotStarted,
    #[error("surface error: {0}")]
    Surface(String),
}

/// Per-draw transform matrices, uploaded by value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawUniforms {
    pub model: Mat4,
    pub view: Mat4,
    pub projection: Mat4,
}

/// The capabilities the scene needs from a graphics API.
///
/// Implementations own the GPU-side resources behind each handle. Callers own
/// the handles and must hand each one back through `release_*` exactly once.
pub trait RenderBackend {
    /// Compile both stages and link them into a program.
    fn compile_and_link_shader(
        &mut self,
        vertex_source: &str,
        fragment_source: &str,
    ) -> Result<ProgramHandle, BackendError>;

    /// Upload a mesh. Returns its handle and index count.
    fn create_mesh(&mut self, mesh: &MeshData) -> Result<(MeshHandle, u32), BackendError>;

    /// Start a frame, clearing color to `clear` and depth to the far plane.
    fn begin_frame(&mut self, clear: FaceColor) -> Result<(), BackendError>;

    /// Draw all indices of `mesh` with `program`.
    fn draw(
        &mut self,
        program: ProgramHandle,
        mesh: MeshHandle,
        uniforms: &DrawUniforms,
    ) -> Result<(), BackendError>;

    /// Finish the frame and present it.
    fn end_frame(&mut self) -> Result<(), BackendError>;

    fn release_mesh(&mut self, mesh: MeshHandle);

    fn release_program(&mut self, program: ProgramHandle);
}

impl<B: RenderBackend + ?Sized> RenderBackend for &mut B {
    fn compile_and_link_shader(
        &mut self,
        vertex_source: &str,
        fragment_source: &str,
    ) -> Result<ProgramHandle, BackendError> {
        (**self).compile_and_link_shader(vertex_source, fragment_source)
    }

    fn create_mesh(&mut self, mesh: &MeshData) -> Result<(MeshHandle, u32), BackendError> {
        (**self).create_mesh(mesh)
    }

    fn begin_frame(&mut self, clear: FaceColor) -> Result<(), BackendError> {
        (**self).begin_frame(clear)
    }

    fn draw(
        &mut self,
        program: ProgramHandle,
        mesh: MeshHandle,
        uniforms: &DrawUniforms,
    ) -> Result<(), BackendError> {
        (**self).draw(program, mesh, uniforms)
    }

    fn end_frame(&mut self) -> Result<(), BackendError> {
        (**self).end_frame()
    }

    fn release_mesh(&mut self, mesh: MeshHandle) {
        (**self).release_mesh(mesh)
    }

    fn release_program(&mut self, program: ProgramHandle) {
        (**self).release_program(program)
    }
}
