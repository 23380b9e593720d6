//! Shared value types for the cube scene.
//!
//! # Invariants
//! - A `CubePosition` only ever holds coordinates in {-1, 0, 1}.
//! - Face order is fixed: up, front, left, down, back, right.

mod types;

pub use types::{CellKind, CubePosition, Face, FaceColor};
