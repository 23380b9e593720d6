use crate::action::CameraAction;
use std::collections::HashMap;
use std::str::FromStr;

/// Keys the application reacts to, independent of the windowing library.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Left,
    Right,
    Up,
    Down,
    U,
    D,
}

#[derive(Debug, thiserror::Error)]
#[error("unknown key {0:?} (expected one of left, right, up, down, u, d)")]
pub struct ParseKeyError(pub String);

impl FromStr for Key {
    type Err = ParseKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "left" => Ok(Key::Left),
            "right" => Ok(Key::Right),
            "up" => Ok(Key::Up),
            "down" => Ok(Key::Down),
            "u" => Ok(Key::U),
            "d" => Ok(Key::D),
            _ => Err(ParseKeyError(s.to_string())),
        }
    }
}

/// Mapping from keys to camera actions.
#[derive(Debug, Clone)]
pub struct KeyBindings {
    map: HashMap<Key, CameraAction>,
}

impl Default for KeyBindings {
    /// Arrows orbit and zoom, U/D raise and lower the camera.
    fn default() -> Self {
        let map = HashMap::from([
            (Key::Left, CameraAction::DecreaseAzimuth),
            (Key::Right, CameraAction::IncreaseAzimuth),
            (Key::Down, CameraAction::IncreaseDistance),
            (Key::Up, CameraAction::DecreaseDistance),
            (Key::U, CameraAction::IncreaseElevation),
            (Key::D, CameraAction::DecreaseElevation),
        ]);
        Self { map }
    }
}

impl KeyBindings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bind(&mut self, key: Key, action: CameraAction) {
        self.map.insert(key, action);
    }

    pub fn action_for(&self, key: Key) -> Option<CameraAction> {
        self.map.get(&key).copied()
    }

    /// Action for a key event; key releases produce nothing.
    pub fn on_key(&self, key: Key, pressed: bool) -> Option<CameraAction> {
        if pressed { self.action_for(key) } else { None }
    }
}
