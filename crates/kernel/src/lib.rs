//! Scene kernel: the orbit camera and the per-face color rule.
//!
//! # Invariants
//! - Camera distance stays positive; it only changes by a fixed scale factor.
//! - Angles are never clamped; they wrap through the trig functions.
//! - Face colors depend only on the cell position and the face.

pub mod camera;
pub mod palette;

pub use camera::OrbitCamera;
pub use palette::{face_color, face_colors, outer_face_count};
