//! Primary-to-secondary camera synchronization.

use glam::Vec3;

use super::controller::OrbitController;
use super::core::Camera;

/// Copy the primary camera's pose onto a secondary camera and retarget the
/// secondary's controller.
///
/// Position and orientation are copied as-is (the quaternion, not Euler
/// angles), the secondary's projection is refreshed, and only the
/// controller's target changes; its pending motion is left alone.
pub fn sync_camera(
    primary: &Camera,
    primary_target: Vec3,
    camera: &mut Camera,
    controller: &mut OrbitController,
) {
    camera.position = primary.position;
    camera.rotation = primary.rotation;
    camera.update_projection_matrix();
    controller.target = primary_target;
}

#[cfg(test)]
mod tests {
    use glam::Quat;

    use super::*;
    use crate::options::CameraOptions;

    #[test]
    fn secondary_takes_primary_pose_and_target() {
        let mut primary = Camera::new(60.0, 1.0, 0.1, 100.0);
        primary.position = Vec3::new(3.0, 4.0, 5.0);
        primary.rotation = Quat::from_rotation_y(0.7);
        let target = Vec3::new(0.5, 1.0, -0.25);

        let mut secondary = Camera::new(60.0, 0.5, 0.1, 100.0);
        let mut controller = OrbitController::new(&CameraOptions::default());
        sync_camera(&primary, target, &mut secondary, &mut controller);

        assert_eq!(secondary.position, primary.position);
        assert_eq!(secondary.rotation, primary.rotation);
        assert_eq!(controller.target, target);
        // Projection parameters belong to the secondary viewport.
        assert_eq!(secondary.aspect, 0.5);
    }

    #[test]
    fn sync_is_idempotent() {
        let mut primary = Camera::new(60.0, 1.0, 0.1, 100.0);
        primary.position = Vec3::new(-1.0, 2.0, 9.0);
        primary.look_at(Vec3::ZERO);

        let mut secondary = Camera::new(45.0, 1.5, 0.1, 100.0);
        let mut controller = OrbitController::new(&CameraOptions::default());
        sync_camera(&primary, Vec3::ZERO, &mut secondary, &mut controller);
        let first = (secondary.clone(), controller.target);
        sync_camera(&primary, Vec3::ZERO, &mut secondary, &mut controller);
        assert_eq!(secondary, first.0);
        assert_eq!(controller.target, first.1);
    }
}
