use crate::backend::{
    BackendError, DrawUniforms, MeshHandle, ProgramHandle, RenderBackend, ShaderStage,
};
use crate::mesh::MeshData;
use rubik_common::FaceColor;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt::Write;

/// A draw call captured by [`RecordingBackend`].
#[derive(Debug, Clone, PartialEq)]
pub struct DrawCall {
    pub program: ProgramHandle,
    pub mesh: MeshHandle,
    pub index_count: u32,
    pub uniforms: DrawUniforms,
}

/// A finished frame captured by [`RecordingBackend`].
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedFrame {
    pub clear: FaceColor,
    pub draws: Vec<DrawCall>,
}

/// Headless backend that records every call instead of touching a GPU.
///
/// Useful for CLI output, logging, and testing the scene and frame loop.
/// Resource lifetimes are tracked so leaks and double releases are visible.
#[derive(Debug, Default)]
pub struct RecordingBackend {
    next_id: u64,
    programs: BTreeSet<ProgramHandle>,
    meshes: BTreeMap<MeshHandle, u32>,
    released_meshes: Vec<MeshHandle>,
    released_programs: Vec<ProgramHandle>,
    current: Option<RecordedFrame>,
    frames: Vec<RecordedFrame>,
    meshes_created: usize,
    fail_mesh_after: Option<usize>,
    fail_link: bool,
}

impl RecordingBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `create_mesh` fail once `count` meshes have been created.
    pub fn fail_mesh_after(mut self, count: usize) -> Self {
        self.fail_mesh_after = Some(count);
        self
    }

    /// Make every program link fail.
    pub fn fail_link(mut self) -> Self {
        self.fail_link = true;
        self
    }

    pub fn live_meshes(&self) -> usize {
        self.meshes.len()
    }

    pub fn live_programs(&self) -> usize {
        self.programs.len()
    }

    pub fn released_meshes(&self) -> &[MeshHandle] {
        &self.released_meshes
    }

    pub fn released_programs(&self) -> &[ProgramHandle] {
        &self.released_programs
    }

    pub fn frames(&self) -> &[RecordedFrame] {
        &self.frames
    }

    pub fn last_frame(&self) -> Option<&RecordedFrame> {
        self.frames.last()
    }

    /// Human-readable dump of the last finished frame.
    pub fn describe_last_frame(&self) -> String {
        let mut out = String::new();
        let Some(frame) = self.last_frame() else {
            out.push_str("no frame recorded\n");
            return out;
        };
        let [r, g, b, a] = frame.clear.rgba();
        let _ = writeln!(
            out,
            "=== Frame {} (clear=({r:.2}, {g:.2}, {b:.2}, {a:.2}), draws={}) ===",
            self.frames.len() - 1,
            frame.draws.len()
        );
        for call in &frame.draws {
            let t = call.uniforms.model.w_axis;
            let _ = writeln!(
                out,
                "  mesh={} program={} indices={} translate=({:.2}, {:.2}, {:.2})",
                call.mesh.0, call.program.0, call.index_count, t.x, t.y, t.z
            );
        }
        out
    }

    fn next_handle(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }
}

impl RenderBackend for RecordingBackend {
    fn compile_and_link_shader(
        &mut self,
        vertex_source: &str,
        fragment_source: &str,
    ) -> Result<ProgramHandle, BackendError> {
        for (stage, source) in [
            (ShaderStage::Vertex, vertex_source),
            (ShaderStage::Fragment, fragment_source),
        ] {
            if source.trim().is_empty() {
                return Err(BackendError::ShaderCompile {
                    stage,
                    log: "empty shader source".into(),
                });
            }
        }
        if self.fail_link {
            return Err(BackendError::ShaderLink {
                log: "link failure requested".into(),
            });
        }
        let program = ProgramHandle(self.next_handle());
        self.programs.insert(program);
        Ok(program)
    }

    fn create_mesh(&mut self, mesh: &MeshData) -> Result<(MeshHandle, u32), BackendError> {
        if self.fail_mesh_after == Some(self.meshes_created) {
            return Err(BackendError::ResourceCreation(format!(
                "mesh allocation failed after {} meshes",
                self.meshes_created
            )));
        }
        if mesh.positions.len() != mesh.colors.len() {
            return Err(BackendError::ResourceCreation(
                "position and color counts differ".into(),
            ));
        }
        let handle = MeshHandle(self.next_handle());
        let index_count = mesh.index_count();
        self.meshes.insert(handle, index_count);
        self.meshes_created += 1;
        Ok((handle, index_count))
    }

    fn begin_frame(&mut self, clear: FaceColor) -> Result<(), BackendError> {
        self.current = Some(RecordedFrame {
            clear,
            draws: Vec::new(),
        });
        Ok(())
    }

    fn draw(
        &mut self,
        program: ProgramHandle,
        mesh: MeshHandle,
        uniforms: &DrawUniforms,
    ) -> Result<(), BackendError> {
        if !self.programs.contains(&program) {
            return Err(BackendError::UnknownProgram(program));
        }
        let index_count = *self
            .meshes
            .get(&mesh)
            .ok_or(BackendError::UnknownMesh(mesh))?;
        let frame = self.current.as_mut().ok_or(BackendError::FrameNotStarted)?;
        frame.draws.push(DrawCall {
            program,
            mesh,
            index_count,
            uniforms: *uniforms,
        });
        Ok(())
    }

    fn end_frame(&mut self) -> Result<(), BackendError> {
        let frame = self.current.take().ok_or(BackendError::FrameNotStarted)?;
        self.frames.push(frame);
        Ok(())
    }

    fn release_mesh(&mut self, mesh: MeshHandle) {
        if self.meshes.remove(&mesh).is_some() {
            self.released_meshes.push(mesh);
        } else {
            tracing::warn!("release of unknown mesh {mesh:?}");
        }
    }

    fn release_program(&mut self, program: ProgramHandle) {
        if self.programs.remove(&program) {
            self.released_programs.push(program);
        } else {
            tracing::warn!("release of unknown program {program:?}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::cube_mesh;
    use glam::Mat4;

    fn identity_uniforms() -> DrawUniforms {
        DrawUniforms {
            model: Mat4::IDENTITY,
            view: Mat4::IDENTITY,
            projection: Mat4::IDENTITY,
        }
    }

    #[test]
    fn empty_shader_source_fails_to_compile() {
        let mut backend = RecordingBackend::new();
        let err = backend.compile_and_link_shader("", "fn main() {}").unwrap_err();
        assert!(matches!(
            err,
            BackendError::ShaderCompile {
                stage: ShaderStage::Vertex,
                ..
            }
        ));
        let err = backend.compile_and_link_shader("vs", " ").unwrap_err();
        assert!(matches!(
            err,
            BackendError::ShaderCompile {
                stage: ShaderStage::Fragment,
                ..
            }
        ));
    }

    #[test]
    fn link_failure_is_reported() {
        let mut backend = RecordingBackend::new().fail_link();
        let err = backend.compile_and_link_shader("vs", "fs").unwrap_err();
        assert!(matches!(err, BackendError::ShaderLink { .. }));
        assert_eq!(backend.live_programs(), 0);
    }

    #[test]
    fn draw_outside_frame_is_rejected() {
        let mut backend = RecordingBackend::new();
        let program = backend.compile_and_link_shader("vs", "fs").unwrap();
        let (mesh, _) = backend
            .create_mesh(&cube_mesh(&[FaceColor::WHITE; 6]))
            .unwrap();
        let err = backend
            .draw(program, mesh, &identity_uniforms())
            .unwrap_err();
        assert!(matches!(err, BackendError::FrameNotStarted));
    }

    #[test]
    fn draw_with_released_mesh_is_rejected() {
        let mut backend = RecordingBackend::new();
        let program = backend.compile_and_link_shader("vs", "fs").unwrap();
        let (mesh, _) = backend
            .create_mesh(&cube_mesh(&[FaceColor::WHITE; 6]))
            .unwrap();
        backend.release_mesh(mesh);
        backend.begin_frame(FaceColor::WHITE).unwrap();
        let err = backend
            .draw(program, mesh, &identity_uniforms())
            .unwrap_err();
        assert!(matches!(err, BackendError::UnknownMesh(m) if m == mesh));
    }

    #[test]
    fn frames_are_recorded_in_order() {
        let mut backend = RecordingBackend::new();
        let program = backend.compile_and_link_shader("vs", "fs").unwrap();
        let (mesh, count) = backend
            .create_mesh(&cube_mesh(&[FaceColor::RED; 6]))
            .unwrap();
        assert_eq!(count, 36);

        backend.begin_frame(FaceColor::WHITE).unwrap();
        backend.draw(program, mesh, &identity_uniforms()).unwrap();
        backend.end_frame().unwrap();
        backend.begin_frame(FaceColor::INTERIOR_GREY).unwrap();
        backend.end_frame().unwrap();

        assert_eq!(backend.frames().len(), 2);
        assert_eq!(backend.frames()[0].draws.len(), 1);
        assert_eq!(backend.frames()[0].draws[0].index_count, 36);
        assert_eq!(backend.last_frame().unwrap().clear, FaceColor::INTERIOR_GREY);
        assert!(backend.describe_last_frame().contains("draws=0"));
    }

    #[test]
    fn describe_without_frames() {
        let backend = RecordingBackend::new();
        assert_eq!(backend.describe_last_frame(), "no frame recorded\n");
    }
}
