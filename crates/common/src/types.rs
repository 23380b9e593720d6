use glam::{IVec3, Vec3};
use serde::{Deserialize, Serialize};

/// One cell of the 3×3×3 grid. Each coordinate is in {-1, 0, 1}.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct CubePosition {
    x: i8,
    y: i8,
    z: i8,
}

/// Classification of a grid cell by how many of its coordinates are extremal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum CellKind {
    /// Three extremal coordinates.
    Corner,
    /// Two extremal coordinates.
    Edge,
    /// One extremal coordinate.
    FaceCenter,
    /// The hidden cell at the origin.
    Core,
}

impl CubePosition {
    /// Create a position, rejecting coordinates outside {-1, 0, 1}.
    pub fn new(x: i8, y: i8, z: i8) -> Option<Self> {
        let valid = |c: i8| (-1..=1).contains(&c);
        (valid(x) && valid(y) && valid(z)).then_some(Self { x, y, z })
    }

    /// All 27 cells, x outermost, then y, then z.
    pub fn all() -> impl Iterator<Item = CubePosition> {
        (-1..=1i8).flat_map(|x| {
            (-1..=1i8).flat_map(move |y| (-1..=1i8).map(move |z| CubePosition { x, y, z }))
        })
    }

    pub fn x(&self) -> i8 {
        self.x
    }

    pub fn y(&self) -> i8 {
        self.y
    }

    pub fn z(&self) -> i8 {
        self.z
    }

    pub fn as_ivec3(&self) -> IVec3 {
        IVec3::new(self.x.into(), self.y.into(), self.z.into())
    }

    pub fn as_vec3(&self) -> Vec3 {
        self.as_ivec3().as_vec3()
    }

    pub fn kind(&self) -> CellKind {
        let extremal = [self.x, self.y, self.z]
            .iter()
            .filter(|c| **c != 0)
            .count();
        match extremal {
            3 => CellKind::Corner,
            2 => CellKind::Edge,
            1 => CellKind::FaceCenter,
            _ => CellKind::Core,
        }
    }
}

impl std::fmt::Display for CubePosition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:+}, {:+}, {:+})", self.x, self.y, self.z)
    }
}

/// The six cardinal faces of a cubie, in mesh/index order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Face {
    Up,
    Front,
    Left,
    Down,
    Back,
    Right,
}

impl Face {
    /// All faces ordered by [`Face::index`].
    pub const ALL: [Face; 6] = [
        Face::Up,
        Face::Front,
        Face::Left,
        Face::Down,
        Face::Back,
        Face::Right,
    ];

    pub fn index(self) -> usize {
        match self {
            Face::Up => 0,
            Face::Front => 1,
            Face::Left => 2,
            Face::Down => 3,
            Face::Back => 4,
            Face::Right => 5,
        }
    }

    pub fn from_index(index: usize) -> Option<Face> {
        Self::ALL.get(index).copied()
    }

    /// Outward unit normal of the face.
    pub fn normal(self) -> Vec3 {
        match self {
            Face::Up => Vec3::Y,
            Face::Front => Vec3::Z,
            Face::Left => Vec3::NEG_X,
            Face::Down => Vec3::NEG_Y,
            Face::Back => Vec3::NEG_Z,
            Face::Right => Vec3::X,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Face::Up => "up",
            Face::Front => "front",
            Face::Left => "left",
            Face::Down => "down",
            Face::Back => "back",
            Face::Right => "right",
        }
    }
}

/// RGBA color with components in [0, 1].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FaceColor(pub [f32; 4]);

impl FaceColor {
    pub const WHITE: FaceColor = FaceColor([1.0, 1.0, 1.0, 1.0]);
    pub const RED: FaceColor = FaceColor([1.0, 0.0, 0.0, 1.0]);
    pub const BLUE: FaceColor = FaceColor([0.0, 0.0, 1.0, 1.0]);
    pub const YELLOW: FaceColor = FaceColor([1.0, 1.0, 0.0, 1.0]);
    pub const ORANGE: FaceColor = FaceColor([1.0, 0.5, 0.0, 1.0]);
    pub const GREEN: FaceColor = FaceColor([0.0, 1.0, 0.0, 1.0]);
    /// Color of faces hidden inside the assembly.
    pub const INTERIOR_GREY: FaceColor = FaceColor([0.3, 0.3, 0.3, 1.0]);

    pub fn rgba(&self) -> [f32; 4] {
        self.0
    }

    pub fn is_interior(&self) -> bool {
        *self == Self::INTERIOR_GREY
    }
}

impl Default for FaceColor {
    fn default() -> Self {
        Self::INTERIOR_GREY
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn position_rejects_out_of_range() {
        assert!(CubePosition::new(0, 0, 0).is_some());
        assert!(CubePosition::new(-1, 1, -1).is_some());
        assert!(CubePosition::new(2, 0, 0).is_none());
        assert!(CubePosition::new(0, -2, 0).is_none());
    }

    #[test]
    fn all_positions_cover_grid_once() {
        let all: Vec<_> = CubePosition::all().collect();
        assert_eq!(all.len(), 27);
        let unique: HashSet<_> = all.iter().copied().collect();
        assert_eq!(unique.len(), 27);
        assert_eq!(all[0], CubePosition::new(-1, -1, -1).unwrap());
        assert_eq!(all[1], CubePosition::new(-1, -1, 0).unwrap());
        assert_eq!(all[26], CubePosition::new(1, 1, 1).unwrap());
    }

    #[test]
    fn cell_kind_counts() {
        let count = |kind| CubePosition::all().filter(|p| p.kind() == kind).count();
        assert_eq!(count(CellKind::Corner), 8);
        assert_eq!(count(CellKind::Edge), 12);
        assert_eq!(count(CellKind::FaceCenter), 6);
        assert_eq!(count(CellKind::Core), 1);
    }

    #[test]
    fn face_index_round_trips() {
        for (i, face) in Face::ALL.iter().enumerate() {
            assert_eq!(face.index(), i);
            assert_eq!(Face::from_index(i), Some(*face));
        }
        assert_eq!(Face::from_index(6), None);
    }

    #[test]
    fn opposite_faces_have_opposite_normals() {
        assert_eq!(Face::Up.normal(), -Face::Down.normal());
        assert_eq!(Face::Front.normal(), -Face::Back.normal());
        assert_eq!(Face::Left.normal(), -Face::Right.normal());
    }

    #[test]
    fn position_display() {
        let p = CubePosition::new(-1, 0, 1).unwrap();
        assert_eq!(p.to_string(), "(-1, +0, +1)");
    }
}
