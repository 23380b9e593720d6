use rubik_common::{CubePosition, Face, FaceColor};

/// Whether `face` of the cubie at `position` is on the outside of the assembly.
pub fn is_outer(position: CubePosition, face: Face) -> bool {
    match face {
        Face::Up => position.y() == 1,
        Face::Front => position.z() == 1,
        Face::Left => position.x() == -1,
        Face::Down => position.y() == -1,
        Face::Back => position.z() == -1,
        Face::Right => position.x() == 1,
    }
}

/// Sticker color shown on `face` when it is on the outside.
pub fn sticker_color(face: Face) -> FaceColor {
    match face {
        Face::Up => FaceColor::WHITE,
        Face::Front => FaceColor::RED,
        Face::Left => FaceColor::BLUE,
        Face::Down => FaceColor::YELLOW,
        Face::Back => FaceColor::ORANGE,
        Face::Right => FaceColor::GREEN,
    }
}

/// Color of one face: its sticker when outer, interior grey otherwise.
pub fn face_color(position: CubePosition, face: Face) -> FaceColor {
    if is_outer(position, face) {
        sticker_color(face)
    } else {
        FaceColor::INTERIOR_GREY
    }
}

/// Colors of all six faces in [`Face::ALL`] order.
pub fn face_colors(position: CubePosition) -> [FaceColor; 6] {
    Face::ALL.map(|face| face_color(position, face))
}

/// Number of faces of the cubie that carry a sticker.
pub fn outer_face_count(position: CubePosition) -> usize {
    Face::ALL
        .iter()
        .filter(|face| is_outer(position, **face))
        .count()
}
