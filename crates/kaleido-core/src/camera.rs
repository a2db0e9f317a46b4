//! Cameras for both demos
//!
//! Neither demo has interactive camera state: the lattice camera follows the
//! pointer, the blob camera rides a closed-form path over time. Both are
//! rebuilt from scratch every frame.

use glam::{Mat4, Vec2, Vec3};
use std::f32::consts::{FRAC_PI_4, TAU};

/// Frame rate the blob's tick-based timings were tuned for
pub const TICKS_PER_SECOND: f32 = 60.0;

/// A perspective camera looking at a target point
#[derive(Debug, Clone)]
pub struct Camera {
    /// Camera position in world space
    pub position: Vec3,
    /// Point the camera is looking at
    pub target: Vec3,
    /// Up vector
    pub up: Vec3,
    /// Field of view in radians
    pub fov: f32,
    /// Aspect ratio (width / height)
    pub aspect: f32,
    /// Near clipping plane
    pub near: f32,
    /// Far clipping plane
    pub far: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            position: Vec3::new(0.0, 0.0, -7.0),
            target: Vec3::ZERO,
            up: Vec3::Y,
            fov: FRAC_PI_4,
            aspect: 16.0 / 9.0,
            near: 0.01,
            far: 1000.0,
        }
    }
}

impl Camera {
    /// Lattice camera: fixed eye behind the field, looking at the pointer.
    ///
    /// `pointer` is in normalized device coordinates (`[-1, 1]²`).
    pub fn lattice(aspect: f32, pointer: Vec2) -> Self {
        Self {
            target: pointer.extend(0.0),
            aspect,
            ..Default::default()
        }
    }

    /// Blob camera at path time `t`.
    ///
    /// Looks towards the direction the path takes a little later, with up
    /// taken from where it was a little earlier.
    pub fn orbiting(aspect: f32, t: f32) -> Self {
        Self {
            position: orbit_position(t),
            target: orbit_position(t + 2.0).normalize(),
            up: orbit_position(t - 0.5).normalize(),
            fov: FRAC_PI_4,
            aspect,
            near: 0.125,
            far: 100.0,
        }
    }

    /// Get the view matrix (world to camera transform)
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.target, self.up)
    }

    /// Get the projection matrix
    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov, self.aspect, self.near, self.far)
    }

    /// Get the combined view-projection matrix
    pub fn view_projection_matrix(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    pub fn inverse_view_matrix(&self) -> Mat4 {
        self.view_matrix().inverse()
    }

    pub fn inverse_projection_matrix(&self) -> Mat4 {
        self.projection_matrix().inverse()
    }

    /// Get the forward direction (normalized)
    pub fn forward(&self) -> Vec3 {
        (self.target - self.position).normalize()
    }
}

/// Point on the blob camera path at time `t`.
///
/// The direction wanders over the sphere while the radius breathes slowly
/// between 1.4 and 2.2.
pub fn orbit_position(t: f32) -> Vec3 {
    let t = t * 0.25;
    let dir = Vec3::new(
        (3.0 * t + 10.0).cos(),
        (TAU * (0.25 * t).cos()).sin() - (t + 3.1).cos(),
        (5.0 * t + 0.1).cos(),
    )
    .normalize();
    dir * (1.8 - 0.4 * (0.05 * t).cos())
}

/// Blob timings derived from wall-clock time
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrbitClock {
    /// Parameter of [`orbit_position`]
    pub camera_time: f32,
    /// Phase of the surface warp
    pub warp_time: f32,
}

impl OrbitClock {
    pub fn at(elapsed_secs: f32) -> Self {
        let tick = elapsed_secs * TICKS_PER_SECOND;
        Self {
            camera_time: 0.0025 * tick,
            warp_time: 0.01 * tick,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use glam::{Mat3, Vec4};

    fn assert_orthonormal(view: Mat4) {
        let r = Mat3::from_mat4(view);
        let product = r * r.transpose();
        for (a, b) in product.to_cols_array().iter().zip(Mat3::IDENTITY.to_cols_array()) {
            assert_relative_eq!(*a, b, epsilon = 1e-4);
        }
    }

    fn assert_inverse(m: Mat4, inv: Mat4) {
        let product = m * inv;
        for (a, b) in product.to_cols_array().iter().zip(Mat4::IDENTITY.to_cols_array()) {
            assert_relative_eq!(*a, b, epsilon = 1e-3);
        }
    }

    #[test]
    fn test_lattice_camera_orthonormal_over_pointer_range() {
        for ix in -4..=4 {
            for iy in -4..=4 {
                let pointer = Vec2::new(ix as f32 / 4.0, iy as f32 / 4.0);
                let camera = Camera::lattice(1.6, pointer);
                assert_orthonormal(camera.view_matrix());
                assert_inverse(camera.view_matrix(), camera.inverse_view_matrix());
                assert_inverse(
                    camera.projection_matrix(),
                    camera.inverse_projection_matrix(),
                );
            }
        }
    }

    #[test]
    fn test_lattice_camera_looks_at_pointer() {
        let camera = Camera::lattice(1.0, Vec2::ZERO);
        let clip = camera.view_projection_matrix() * Vec4::new(0.0, 0.0, 0.0, 1.0);
        assert_relative_eq!(clip.x / clip.w, 0.0, epsilon = 1e-6);
        assert_relative_eq!(clip.y / clip.w, 0.0, epsilon = 1e-6);
        assert_relative_eq!(camera.forward().z, 1.0, epsilon = 1e-6);
    }

    #[test]
    fn test_orbit_radius_bounds() {
        for step in 0..2000 {
            let t = step as f32 * 0.37;
            let r = orbit_position(t).length();
            assert!((1.4 - 1e-4..=2.2 + 1e-4).contains(&r), "radius {r} at t={t}");
        }
    }

    #[test]
    fn test_orbiting_camera_well_defined() {
        for step in 0..500 {
            let clock = OrbitClock::at(step as f32 * 0.5);
            let camera = Camera::orbiting(1.5, clock.camera_time);
            let view = camera.view_matrix();
            assert!(view.is_finite(), "view not finite at step {step}");
            assert_orthonormal(view);
            assert!(camera.projection_matrix().determinant().abs() > 0.0);
        }
    }

    #[test]
    fn test_orbit_clock_rates() {
        let clock = OrbitClock::at(10.0);
        assert_relative_eq!(clock.camera_time, 1.5, epsilon = 1e-6);
        assert_relative_eq!(clock.warp_time, 6.0, epsilon = 1e-6);
    }
}
