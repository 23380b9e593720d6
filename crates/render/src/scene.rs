use crate::backend::{BackendError, MeshHandle, RenderBackend};
use crate::mesh::cube_mesh;
use rubik_common::{CubePosition, FaceColor};
use rubik_kernel::face_colors;
use serde::Serialize;

/// One cubie: its grid cell, face colors and the backend mesh drawing it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CubeInstance {
    pub position: CubePosition,
    pub colors: [FaceColor; 6],
    pub mesh: MeshHandle,
    pub index_count: u32,
}

/// The 27 cubies of the assembly.
///
/// The scene owns every mesh handle it holds. Handles go back to the backend
/// through [`Scene::release`], which empties the scene so a second call is a
/// no-op.
#[derive(Debug, Default)]
pub struct Scene {
    cubes: Vec<CubeInstance>,
}

impl Scene {
    /// Create a mesh for every grid cell.
    ///
    /// Either all 27 meshes exist afterwards or none do: on failure the meshes
    /// created so far are released before the error is returned.
    pub fn build<B: RenderBackend + ?Sized>(backend: &mut B) -> Result<Scene, BackendError> {
        let mut scene = Scene::default();
        for position in CubePosition::all() {
            let colors = face_colors(position);
            match backend.create_mesh(&cube_mesh(&colors)) {
                Ok((mesh, index_count)) => scene.cubes.push(CubeInstance {
                    position,
                    colors,
                    mesh,
                    index_count,
                }),
                Err(e) => {
                    tracing::error!("failed to create mesh for cubie {position}: {e}");
                    scene.release(backend);
                    return Err(e);
                }
            }
        }
        tracing::info!("scene built with {} cubies", scene.cubes.len());
        Ok(scene)
    }

    pub fn cubes(&self) -> &[CubeInstance] {
        &self.cubes
    }

    pub fn len(&self) -> usize {
        self.cubes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cubes.is_empty()
    }

    /// Hand every mesh back to the backend.
    pub fn release<B: RenderBackend + ?Sized>(&mut self, backend: &mut B) {
        let cubes = std::mem::take(&mut self.cubes);
        if cubes.is_empty() {
            return;
        }
        for cube in &cubes {
            backend.release_mesh(cube.mesh);
        }
        tracing::debug!("released {} cubie meshes", cubes.len());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recording::RecordingBackend;
    use rubik_kernel::outer_face_count;
    use std::collections::HashSet;

    #[test]
    fn builds_one_cubie_per_cell() {
        let mut backend = RecordingBackend::new();
        let scene = Scene::build(&mut backend).unwrap();
        assert_eq!(scene.len(), 27);
        let positions: HashSet<_> = scene.cubes().iter().map(|c| c.position).collect();
        let expected: HashSet<_> = CubePosition::all().collect();
        assert_eq!(positions, expected);
        assert_eq!(backend.live_meshes(), 27);
    }

    #[test]
    fn cubies_carry_policy_colors_and_full_meshes() {
        let mut backend = RecordingBackend::new();
        let scene = Scene::build(&mut backend).unwrap();
        for cube in scene.cubes() {
            assert_eq!(cube.index_count, 36);
            let stickers = cube.colors.iter().filter(|c| !c.is_interior()).count();
            assert_eq!(stickers, outer_face_count(cube.position));
        }
        let handles: HashSet<_> = scene.cubes().iter().map(|c| c.mesh).collect();
        assert_eq!(handles.len(), 27);
    }

    #[test]
    fn failed_build_releases_partial_meshes() {
        let mut backend = RecordingBackend::new().fail_mesh_after(10);
        let err = Scene::build(&mut backend).unwrap_err();
        assert!(matches!(err, BackendError::ResourceCreation(_)));
        assert_eq!(backend.live_meshes(), 0);
        assert_eq!(backend.released_meshes().len(), 10);
    }

    #[test]
    fn release_is_idempotent() {
        let mut backend = RecordingBackend::new();
        let mut scene = Scene::build(&mut backend).unwrap();
        scene.release(&mut backend);
        scene.release(&mut backend);
        assert!(scene.is_empty());
        assert_eq!(backend.live_meshes(), 0);
        assert_eq!(backend.released_meshes().len(), 27);
    }
}
