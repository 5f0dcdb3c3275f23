use std::f32::consts::{PI, TAU};

use glam::{Vec2, Vec3};

use super::core::Camera;
use crate::options::CameraOptions;

/// Keeps the polar angle away from the poles so `look_at` stays defined.
const POLAR_EPSILON: f32 = 1e-4;
/// Motion below this is treated as settled.
const CHANGE_EPSILON: f32 = 1e-6;

/// Orbit camera controller: turns pointer drags and scrolls into camera
/// motion around a target point, with optional inertial damping.
///
/// Input methods only accumulate pending motion; [`update`](Self::update)
/// applies it to a camera. With damping enabled each update consumes
/// `damping_factor` of the pending motion, so the camera coasts.
#[derive(Debug, Clone)]
pub struct OrbitController {
    /// Pivot point the camera orbits and looks at.
    pub target: Vec3,
    /// Coast to a stop instead of halting when input ends.
    pub enable_damping: bool,
    /// Fraction of pending motion applied (and removed) per update.
    pub damping_factor: f32,
    /// Spin around the target without input.
    pub auto_rotate: bool,
    /// Radians per second of auto-rotation.
    pub auto_rotate_speed: f32,
    /// Rotation sensitivity multiplier.
    pub rotate_speed: f32,
    /// Pan sensitivity multiplier.
    pub pan_speed: f32,
    /// Zoom sensitivity multiplier.
    pub zoom_speed: f32,
    /// Closest allowed camera distance.
    pub min_distance: f32,
    /// Farthest allowed camera distance.
    pub max_distance: f32,

    /// Pending (azimuth, polar) rotation in radians.
    spherical_delta: Vec2,
    pan_offset: Vec3,
    scale: f32,
}

impl OrbitController {
    /// Controller configured from the camera options.
    #[must_use]
    pub fn new(options: &CameraOptions) -> Self {
        Self {
            target: Vec3::from_array(options.target),
            enable_damping: options.enable_damping,
            damping_factor: options.damping_factor,
            auto_rotate: options.auto_rotate,
            auto_rotate_speed: options.auto_rotate_speed,
            rotate_speed: options.rotate_speed,
            pan_speed: options.pan_speed,
            zoom_speed: options.zoom_speed,
            min_distance: 0.0,
            max_distance: f32::INFINITY,
            spherical_delta: Vec2::ZERO,
            pan_offset: Vec3::ZERO,
            scale: 1.0,
        }
    }

    /// Queue an orbit from a pointer drag of `delta` pixels inside a
    /// viewport `viewport_height` pixels tall.
    pub fn rotate(&mut self, delta: Vec2, viewport_height: f32) {
        if viewport_height <= 0.0 {
            return;
        }
        let per_pixel = TAU / viewport_height * self.rotate_speed;
        self.spherical_delta -= delta * per_pixel;
    }

    /// Queue a pan from a pointer drag of `delta` pixels. The pan distance
    /// is scaled so the point under the cursor at the target's depth
    /// follows the cursor.
    pub fn pan(&mut self, camera: &Camera, delta: Vec2, viewport_height: f32) {
        if viewport_height <= 0.0 {
            return;
        }
        let target_distance = (camera.position - self.target).length()
            * (camera.fovy.to_radians() / 2.0).tan();
        let scale = 2.0 * target_distance / viewport_height * self.pan_speed;
        let right = camera.rotation * Vec3::X;
        let up = camera.rotation * Vec3::Y;
        self.pan_offset += right * (-delta.x * scale) + up * (delta.y * scale);
    }

    /// Queue a dolly. Positive `delta` moves toward the target.
    pub fn zoom(&mut self, delta: f32) {
        self.scale *= 0.95_f32.powf(delta * self.zoom_speed);
    }

    /// Apply pending motion to `camera` and re-aim it at the target.
    ///
    /// `dt` is the frame time in seconds (used only by auto-rotation).
    /// Returns `true` if the camera moved.
    pub fn update(&mut self, camera: &mut Camera, dt: f32) -> bool {
        let offset = camera.position - self.target;
        let mut radius = offset.length();
        let (mut theta, mut phi) = if radius > 0.0 {
            (
                offset.x.atan2(offset.z),
                (offset.y / radius).clamp(-1.0, 1.0).acos(),
            )
        } else {
            (0.0, PI / 2.0)
        };

        if self.auto_rotate {
            self.spherical_delta.x -= self.auto_rotate_speed * dt;
        }

        let step = if self.enable_damping {
            self.damping_factor
        } else {
            1.0
        };
        theta += self.spherical_delta.x * step;
        phi = (phi + self.spherical_delta.y * step)
            .clamp(POLAR_EPSILON, PI - POLAR_EPSILON);
        radius = (radius * self.scale).clamp(self.min_distance, self.max_distance);
        self.target += self.pan_offset * step;

        let sin_phi = phi.sin();
        let new_offset = Vec3::new(
            radius * sin_phi * theta.sin(),
            radius * phi.cos(),
            radius * sin_phi * theta.cos(),
        );
        let previous_position = camera.position;
        let previous_rotation = camera.rotation;
        camera.position = self.target + new_offset;
        camera.look_at(self.target);

        if self.enable_damping {
            self.spherical_delta *= 1.0 - self.damping_factor;
            self.pan_offset *= 1.0 - self.damping_factor;
        } else {
            self.spherical_delta = Vec2::ZERO;
            self.pan_offset = Vec3::ZERO;
        }
        self.scale = 1.0;

        camera.position.distance_squared(previous_position) > CHANGE_EPSILON
            || 1.0 - camera.rotation.dot(previous_rotation).abs() > CHANGE_EPSILON
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup() -> (Camera, OrbitController) {
        let options = CameraOptions::default();
        let mut camera = Camera::new(options.fovy, 1.0, 0.1, 1000.0);
        camera.position = Vec3::from_array(options.position);
        let mut controller = OrbitController::new(&options);
        let _ = controller.update(&mut camera, 0.0);
        (camera, controller)
    }

    #[test]
    fn initial_update_aims_at_target() {
        let (camera, controller) = setup();
        let expected = (controller.target - camera.position).normalize();
        assert!(camera.forward().abs_diff_eq(expected, 1e-5));
        assert!(camera
            .position
            .abs_diff_eq(Vec3::new(0.0, 2.0, 5.0), 1e-4));
    }

    #[test]
    fn rotation_preserves_distance_to_target() {
        let (mut camera, mut controller) = setup();
        let distance = camera.position.distance(controller.target);
        controller.rotate(Vec2::new(120.0, 30.0), 600.0);
        for _ in 0..200 {
            let _ = controller.update(&mut camera, 1.0 / 60.0);
        }
        assert!((camera.position.distance(controller.target) - distance).abs() < 1e-3);
        assert!(!camera.position.abs_diff_eq(Vec3::new(0.0, 2.0, 5.0), 1e-2));
    }

    #[test]
    fn damping_converges_to_rest() {
        let (mut camera, mut controller) = setup();
        controller.rotate(Vec2::new(50.0, 0.0), 600.0);
        let mut moved = 0;
        for _ in 0..1000 {
            if controller.update(&mut camera, 1.0 / 60.0) {
                moved += 1;
            }
        }
        assert!(moved > 1, "damping should spread motion over frames");
        assert!(!controller.update(&mut camera, 1.0 / 60.0));
    }

    #[test]
    fn undamped_motion_applies_in_one_update() {
        let (mut camera, mut controller) = setup();
        controller.enable_damping = false;
        controller.rotate(Vec2::new(50.0, 0.0), 600.0);
        assert!(controller.update(&mut camera, 0.0));
        assert!(!controller.update(&mut camera, 0.0));
    }

    #[test]
    fn zoom_in_moves_toward_target() {
        let (mut camera, mut controller) = setup();
        controller.enable_damping = false;
        let before = camera.position.distance(controller.target);
        controller.zoom(3.0);
        let _ = controller.update(&mut camera, 0.0);
        assert!(camera.position.distance(controller.target) < before);
    }

    #[test]
    fn pan_moves_target_and_camera_together() {
        let (mut camera, mut controller) = setup();
        controller.enable_damping = false;
        let offset = camera.position - controller.target;
        controller.pan(&camera, Vec2::new(40.0, 0.0), 600.0);
        let _ = controller.update(&mut camera, 0.0);
        assert!(controller.target.x < 0.0);
        assert!((camera.position - controller.target).abs_diff_eq(offset, 1e-4));
    }

    #[test]
    fn polar_angle_is_clamped_off_the_pole() {
        let (mut camera, mut controller) = setup();
        controller.enable_damping = false;
        controller.rotate(Vec2::new(0.0, 10_000.0), 100.0);
        let _ = controller.update(&mut camera, 0.0);
        assert!(camera.forward().is_finite());
        assert!(camera.position.y > controller.target.y);
    }
}
