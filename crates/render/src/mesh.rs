use glam::Vec3;
use rubik_common::{Face, FaceColor};

/// Geometry handed to a backend: one color per vertex, triangle list indices.
#[derive(Debug, Clone, PartialEq)]
pub struct MeshData {
    pub positions: Vec<[f32; 3]>,
    pub colors: Vec<[f32; 4]>,
    pub indices: Vec<u32>,
}

impl MeshData {
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn index_count(&self) -> u32 {
        self.indices.len() as u32
    }
}

/// Two in-plane axes of a face whose cross product is the outward normal.
fn face_axes(face: Face) -> (Vec3, Vec3) {
    match face {
        Face::Up => (Vec3::Z, Vec3::X),
        Face::Front => (Vec3::X, Vec3::Y),
        Face::Left => (Vec3::Z, Vec3::Y),
        Face::Down => (Vec3::X, Vec3::Z),
        Face::Back => (Vec3::Y, Vec3::X),
        Face::Right => (Vec3::Y, Vec3::Z),
    }
}

/// Unit cube centered at the origin with one flat color per face.
///
/// Faces are laid out in [`Face::ALL`] order, four vertices each, wound
/// counter-clockwise when seen from outside.
pub fn cube_mesh(face_colors: &[FaceColor; 6]) -> MeshData {
    let half = 0.5_f32;
    let mut positions = Vec::with_capacity(24);
    let mut colors = Vec::with_capacity(24);
    let mut indices = Vec::with_capacity(36);

    for face in Face::ALL {
        let center = face.normal() * half;
        let (u, v) = face_axes(face);
        let (u, v) = (u * half, v * half);
        let base = positions.len() as u32;
        for corner in [center - u - v, center + u - v, center + u + v, center - u + v] {
            positions.push(corner.to_array());
            colors.push(face_colors[face.index()].rgba());
        }
        indices.extend_from_slice(&[base, base + 1, base + 2, base + 2, base + 3, base]);
    }

    MeshData {
        positions,
        colors,
        indices,
    }
}
