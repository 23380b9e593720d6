use crate::backend::{BackendError, DrawUniforms, ProgramHandle, RenderBackend};
use crate::scene::Scene;
use glam::Mat4;
use rubik_common::{CubePosition, FaceColor};
use rubik_kernel::OrbitCamera;

/// Distance between neighbouring cubie centers. Slightly above the cube size
/// so gaps show between cubies.
pub const CUBE_SPACING: f32 = 1.1;

/// Translation-only model matrix placing a cubie in the assembly.
pub fn model_matrix(position: CubePosition) -> Mat4 {
    Mat4::from_translation(position.as_vec3() * CUBE_SPACING)
}

/// View and projection shared by every draw of one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameMatrices {
    pub view: Mat4,
    pub projection: Mat4,
}

impl FrameMatrices {
    pub fn from_camera(camera: &OrbitCamera, aspect: f32) -> Self {
        Self {
            view: camera.view_matrix(),
            projection: camera.projection_matrix(aspect),
        }
    }

    pub fn uniforms_for(&self, position: CubePosition) -> DrawUniforms {
        DrawUniforms {
            model: model_matrix(position),
            view: self.view,
            projection: self.projection,
        }
    }
}

/// Shader sources in the dialect the backend compiles.
#[derive(Debug, Clone, Copy)]
pub struct ShaderSources<'a> {
    pub vertex: &'a str,
    pub fragment: &'a str,
}

/// Owns the backend together with everything created on it.
///
/// Construction links the program and builds the whole scene; any failure
/// releases what was already created and returns the error. Dropping the
/// context (or calling [`RenderContext::shutdown`]) releases every mesh and
/// the program exactly once.
pub struct RenderContext<B: RenderBackend> {
    backend: B,
    program: ProgramHandle,
    scene: Scene,
    clear: FaceColor,
    released: bool,
}

impl<B: RenderBackend> RenderContext<B> {
    pub fn new(
        mut backend: B,
        shaders: ShaderSources<'_>,
        clear: FaceColor,
    ) -> Result<Self, BackendError> {
        let program = backend.compile_and_link_shader(shaders.vertex, shaders.fragment)?;
        tracing::debug!("linked shader program {program:?}");
        let scene = match Scene::build(&mut backend) {
            Ok(scene) => scene,
            Err(e) => {
                backend.release_program(program);
                return Err(e);
            }
        };
        Ok(Self {
            backend,
            program,
            scene,
            clear,
            released: false,
        })
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn program(&self) -> ProgramHandle {
        self.program
    }

    /// Clear, then draw every cubie as seen from `camera`.
    pub fn render_frame(
        &mut self,
        camera: &OrbitCamera,
        aspect: f32,
    ) -> Result<(), BackendError> {
        self.backend.begin_frame(self.clear)?;
        let matrices = FrameMatrices::from_camera(camera, aspect);
        for cube in self.scene.cubes() {
            self.backend
                .draw(self.program, cube.mesh, &matrices.uniforms_for(cube.position))?;
        }
        self.backend.end_frame()
    }

    /// Release the scene meshes and the program.
    pub fn shutdown(&mut self) {
        if self.released {
            return;
        }
        self.released = true;
        self.scene.release(&mut self.backend);
        self.backend.release_program(self.program);
        tracing::info!("render resources released");
    }
}

impl<B: RenderBackend> Drop for RenderContext<B> {
    fn drop(&mut self) {
        self.shutdown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recording::RecordingBackend;
    use glam::Vec3;

    const SHADERS: ShaderSources<'static> = ShaderSources {
        vertex: "vertex",
        fragment: "fragment",
    };

    #[test]
    fn model_matrix_spaces_cubies() {
        let m = model_matrix(CubePosition::new(1, -1, 0).unwrap());
        let p = m.transform_point3(Vec3::ZERO);
        assert!((p - Vec3::new(1.1, -1.1, 0.0)).length() < 1e-6);
        let center = model_matrix(CubePosition::new(0, 0, 0).unwrap());
        assert_eq!(center, Mat4::IDENTITY);
    }

    #[test]
    fn frame_draws_every_cubie_with_camera_matrices() {
        let mut ctx =
            RenderContext::new(RecordingBackend::new(), SHADERS, FaceColor::WHITE).unwrap();
        let camera = OrbitCamera::default();
        ctx.render_frame(&camera, 4.0 / 3.0).unwrap();

        let frame = ctx.backend().last_frame().unwrap();
        assert_eq!(frame.clear, FaceColor::WHITE);
        assert_eq!(frame.draws.len(), 27);
        let expected = FrameMatrices::from_camera(&camera, 4.0 / 3.0);
        for (draw, cube) in frame.draws.iter().zip(ctx.scene().cubes()) {
            assert_eq!(draw.mesh, cube.mesh);
            assert_eq!(draw.program, ctx.program());
            assert_eq!(draw.index_count, 36);
            assert_eq!(draw.uniforms.view, expected.view);
            assert_eq!(draw.uniforms.projection, expected.projection);
            assert_eq!(draw.uniforms.model, model_matrix(cube.position));
        }
    }

    #[test]
    fn frames_follow_camera_changes() {
        let mut ctx =
            RenderContext::new(RecordingBackend::new(), SHADERS, FaceColor::WHITE).unwrap();
        let mut camera = OrbitCamera::default();
        ctx.render_frame(&camera, 1.0).unwrap();
        camera.increase_azimuth();
        ctx.render_frame(&camera, 1.0).unwrap();
        let frames = ctx.backend().frames();
        assert_eq!(frames.len(), 2);
        assert_ne!(frames[0].draws[0].uniforms.view, frames[1].draws[0].uniforms.view);
    }

    #[test]
    fn shutdown_releases_everything_once() {
        let mut ctx =
            RenderContext::new(RecordingBackend::new(), SHADERS, FaceColor::WHITE).unwrap();
        ctx.shutdown();
        ctx.shutdown();
        assert_eq!(ctx.backend().live_meshes(), 0);
        assert_eq!(ctx.backend().live_programs(), 0);
        assert_eq!(ctx.backend().released_meshes().len(), 27);
        assert_eq!(ctx.backend().released_programs().len(), 1);
    }

    #[test]
    fn drop_releases_everything() {
        let mut backend = RecordingBackend::new();
        {
            let mut ctx = RenderContext::new(&mut backend, SHADERS, FaceColor::WHITE).unwrap();
            ctx.render_frame(&OrbitCamera::default(), 1.0).unwrap();
        }
        assert_eq!(backend.live_meshes(), 0);
        assert_eq!(backend.live_programs(), 0);
        assert_eq!(backend.released_meshes().len(), 27);
        assert_eq!(backend.frames().len(), 1);
    }

    #[test]
    fn link_failure_aborts_startup() {
        let mut backend = RecordingBackend::new().fail_link();
        let err = RenderContext::new(&mut backend, SHADERS, FaceColor::WHITE)
            .err()
            .unwrap();
        assert!(matches!(err, BackendError::ShaderLink { .. }));
        assert_eq!(backend.live_meshes(), 0);
    }

    #[test]
    fn mesh_failure_aborts_startup_and_releases_program() {
        let mut backend = RecordingBackend::new().fail_mesh_after(26);
        let err = RenderContext::new(&mut backend, SHADERS, FaceColor::WHITE)
            .err()
            .unwrap();
        assert!(matches!(err, BackendError::ResourceCreation(_)));
        assert_eq!(backend.live_meshes(), 0);
        assert_eq!(backend.live_programs(), 0);
        assert_eq!(backend.released_programs().len(), 1);
    }
}
