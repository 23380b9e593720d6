use glam::{DVec3, Mat4, Vec3};
use serde::Serialize;
use std::f64::consts::{FRAC_PI_2, PI};

/// Distance from the target when the camera is created.
pub const DEFAULT_DISTANCE: f64 = 5.0;
/// Angle added or removed by one azimuth/elevation step (5 degrees).
pub const ANGLE_STEP: f64 = PI / 36.0;
/// Factor applied by one distance step.
pub const DISTANCE_SCALE: f64 = 1.1;

/// Vertical field of view of the projection (45 degrees).
pub const FOV_Y: f32 = std::f32::consts::FRAC_PI_4;
pub const NEAR_PLANE: f32 = 0.1;
pub const FAR_PLANE: f32 = 100.0;

/// Camera orbiting the origin on a sphere of radius `distance`.
///
/// State only changes through the discrete step operations, so `distance`
/// stays positive. Neither angle is clamped: past ±90° of elevation the view
/// turns over, and distance may shrink towards zero.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct OrbitCamera {
    distance: f64,
    azimuth: f64,
    elevation: f64,
}

impl Default for OrbitCamera {
    fn default() -> Self {
        Self {
            distance: DEFAULT_DISTANCE,
            azimuth: 0.0,
            elevation: 0.0,
        }
    }
}

impl OrbitCamera {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn distance(&self) -> f64 {
        self.distance
    }

    /// Rotation around the vertical axis, in radians.
    pub fn azimuth(&self) -> f64 {
        self.azimuth
    }

    /// Angle above the horizontal plane, in radians.
    pub fn elevation(&self) -> f64 {
        self.elevation
    }

    pub fn increase_azimuth(&mut self) {
        self.azimuth += ANGLE_STEP;
    }

    pub fn decrease_azimuth(&mut self) {
        self.azimuth -= ANGLE_STEP;
    }

    pub fn increase_elevation(&mut self) {
        self.elevation += ANGLE_STEP;
    }

    pub fn decrease_elevation(&mut self) {
        self.elevation -= ANGLE_STEP;
    }

    pub fn increase_distance(&mut self) {
        self.distance *= DISTANCE_SCALE;
    }

    pub fn decrease_distance(&mut self) {
        self.distance /= DISTANCE_SCALE;
    }

    /// Apply a signed number of azimuth and elevation steps.
    pub fn apply_steps(&mut self, azimuth_steps: i32, elevation_steps: i32) {
        for _ in 0..azimuth_steps.unsigned_abs() {
            if azimuth_steps > 0 {
                self.increase_azimuth();
            } else {
                self.decrease_azimuth();
            }
        }
        for _ in 0..elevation_steps.unsigned_abs() {
            if elevation_steps > 0 {
                self.increase_elevation();
            } else {
                self.decrease_elevation();
            }
        }
    }

    /// Eye position in world space.
    pub fn position(&self) -> Vec3 {
        point_on_sphere(self.distance, self.azimuth, self.elevation).as_vec3()
    }

    /// Unit up vector: the orbit point a quarter turn further in elevation.
    pub fn up_vector(&self) -> Vec3 {
        point_on_sphere(1.0, self.azimuth, self.elevation + FRAC_PI_2)
            .normalize()
            .as_vec3()
    }

    pub fn target(&self) -> Vec3 {
        Vec3::ZERO
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position(), self.target(), self.up_vector())
    }

    pub fn projection_matrix(&self, aspect: f32) -> Mat4 {
        Mat4::perspective_rh(FOV_Y, aspect, NEAR_PLANE, FAR_PLANE)
    }

    pub fn view_projection(&self, aspect: f32) -> Mat4 {
        self.projection_matrix(aspect) * self.view_matrix()
    }
}

fn point_on_sphere(distance: f64, azimuth: f64, elevation: f64) -> DVec3 {
    DVec3::new(
        distance * elevation.cos() * azimuth.sin(),
        distance * elevation.sin(),
        distance * elevation.cos() * azimuth.cos(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::TAU;

    fn approx(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-4
    }

    #[test]
    fn default_camera_looks_down_negative_z() {
        let cam = OrbitCamera::default();
        assert_eq!(cam.distance(), 5.0);
        assert_eq!(cam.azimuth(), 0.0);
        assert_eq!(cam.elevation(), 0.0);
        let p = cam.position();
        assert!(approx(p.x, 0.0) && approx(p.y, 0.0) && approx(p.z, 5.0));
        assert_eq!(cam.target(), Vec3::ZERO);
        let up = cam.up_vector();
        assert!(approx(up.x, 0.0) && approx(up.y, 1.0) && approx(up.z, 0.0));
    }

    #[test]
    fn distance_steps_round_trip() {
        let mut cam = OrbitCamera::default();
        cam.increase_distance();
        assert!((cam.distance() - 5.5).abs() < 1e-12);
        cam.decrease_distance();
        assert!((cam.distance() - DEFAULT_DISTANCE).abs() < 1e-12);
    }

    #[test]
    fn distance_never_reaches_zero() {
        let mut cam = OrbitCamera::default();
        for _ in 0..200 {
            cam.decrease_distance();
        }
        assert!(cam.distance() > 0.0);
        assert!(cam.distance() < 1e-6);
    }

    #[test]
    fn seventy_two_azimuth_steps_make_a_full_turn() {
        let mut cam = OrbitCamera::default();
        let start = cam.position();
        for _ in 0..72 {
            cam.increase_azimuth();
        }
        let turns = cam.azimuth() / TAU;
        assert!((turns - 1.0).abs() < 1e-9);
        let end = cam.position();
        assert!(start.distance(end) < 1e-4);
    }

    #[test]
    fn position_lies_on_sphere() {
        let mut cam = OrbitCamera::default();
        for _ in 0..3 {
            cam.increase_distance();
        }
        for az in -40..40 {
            for el in -40..40 {
                let mut c = cam;
                c.apply_steps(az, el);
                let radius = c.position().length();
                assert!(
                    (radius as f64 - c.distance()).abs() < 1e-4,
                    "az={az} el={el} radius={radius}"
                );
            }
        }
    }

    #[test]
    fn up_vector_is_unit_and_orthogonal_to_view() {
        let mut cam = OrbitCamera::default();
        for step in 0..100 {
            if step % 3 == 0 {
                cam.increase_elevation();
            } else {
                cam.increase_azimuth();
            }
            let up = cam.up_vector();
            let dir = (cam.target() - cam.position()).normalize();
            assert!(approx(up.length(), 1.0));
            assert!(up.dot(dir).abs() < 1e-4);
        }
    }

    #[test]
    fn elevation_is_not_clamped() {
        let mut cam = OrbitCamera::default();
        for _ in 0..20 {
            cam.increase_elevation();
        }
        assert!(cam.elevation() > FRAC_PI_2);
        // Past the pole the camera is behind the target.
        assert!(cam.position().z < 0.0);
    }

    #[test]
    fn apply_steps_handles_negative_counts() {
        let mut cam = OrbitCamera::default();
        cam.apply_steps(-6, 9);
        assert!((cam.azimuth() + 6.0 * ANGLE_STEP).abs() < 1e-12);
        assert!((cam.elevation() - 9.0 * ANGLE_STEP).abs() < 1e-12);
    }

    #[test]
    fn view_matrix_places_target_in_front() {
        let mut cam = OrbitCamera::default();
        cam.apply_steps(6, 9);
        let target_in_view = cam.view_matrix().transform_point3(cam.target());
        assert!(approx(target_in_view.x, 0.0));
        assert!(approx(target_in_view.y, 0.0));
        assert!(approx(target_in_view.z, -cam.distance() as f32));
    }

    #[test]
    fn view_projection_is_finite() {
        let cam = OrbitCamera::default();
        let vp = cam.view_projection(800.0 / 600.0);
        assert!(vp.is_finite());
    }
}
