use rubik_kernel::OrbitCamera;

/// A discrete camera step produced by input.
///
/// The camera is only ever mutated through actions, never by raw key events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CameraAction {
    IncreaseAzimuth,
    DecreaseAzimuth,
    IncreaseElevation,
    DecreaseElevation,
    /// Move away from the target.
    IncreaseDistance,
    /// Move towards the target.
    DecreaseDistance,
}

impl CameraAction {
    pub fn apply(self, camera: &mut OrbitCamera) {
        match self {
            CameraAction::IncreaseAzimuth => camera.increase_azimuth(),
            CameraAction::DecreaseAzimuth => camera.decrease_azimuth(),
            CameraAction::IncreaseElevation => camera.increase_elevation(),
            CameraAction::DecreaseElevation => camera.decrease_elevation(),
            CameraAction::IncreaseDistance => camera.increase_distance(),
            CameraAction::DecreaseDistance => camera.decrease_distance(),
        }
        tracing::debug!(
            action = ?self,
            distance = camera.distance(),
            azimuth = camera.azimuth(),
            elevation = camera.elevation(),
            "camera moved"
        );
    }

    /// The action undoing this one.
    pub fn inverse(self) -> CameraAction {
        match self {
            CameraAction::IncreaseAzimuth => CameraAction::DecreaseAzimuth,
            CameraAction::DecreaseAzimuth => CameraAction::IncreaseAzimuth,
            CameraAction::IncreaseElevation => CameraAction::DecreaseElevation,
            CameraAction::DecreaseElevation => CameraAction::IncreaseElevation,
            CameraAction::IncreaseDistance => CameraAction::DecreaseDistance,
            CameraAction::DecreaseDistance => CameraAction::IncreaseDistance,
        }
    }
}
