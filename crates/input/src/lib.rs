//! Input: backend-neutral keys mapped to discrete camera actions.
//!
//! # Invariants
//! - Only key-down events step the camera; releases are ignored.
//! - Every action is a single fixed step of the orbit camera.

pub mod action;
pub mod bindings;

pub use action::CameraAction;
pub use bindings::{Key, KeyBindings, ParseKeyError};
