//! Near/far plane fitting from model bounds.

use super::core::Camera;
use crate::options::ClipOptions;
use crate::scene::bounds::Aabb;

/// A near/far plane pair shared by every viewport camera.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClipPlanes {
    /// Near plane distance.
    pub near: f32,
    /// Far plane distance.
    pub far: f32,
}

impl ClipPlanes {
    /// Derive planes from the largest box dimension `M`:
    /// `near = max(near_floor, M * near_fraction)` and
    /// `far = M * padding_multiplier * far_factor`.
    ///
    /// Returns `None` for an empty box, one with no positive, finite
    /// extent, or one so small that its far plane would not clear the
    /// near floor. With the default options that last case is any box
    /// whose largest dimension is at most `near_floor / 20` (0.0005).
    #[must_use]
    pub fn from_bounds(bounds: &Aabb, options: &ClipOptions) -> Option<Self> {
        if bounds.is_empty() {
            return None;
        }
        let max_dimension = bounds.max_dimension();
        if !max_dimension.is_finite() || max_dimension <= 0.0 {
            return None;
        }
        let near = options
            .near_floor
            .max(max_dimension * options.near_fraction);
        let far = max_dimension * options.padding_multiplier * options.far_factor;
        (far > near).then_some(Self { near, far })
    }
}

/// Fit one shared near/far pair to `bounds` and apply it to every camera,
/// refreshing each projection.
///
/// Degenerate bounds leave the cameras untouched and return `None`.
pub fn fit_clip_planes<'a>(
    cameras: impl IntoIterator<Item = &'a mut Camera>,
    bounds: &Aabb,
    options: &ClipOptions,
) -> Option<ClipPlanes> {
    let Some(planes) = ClipPlanes::from_bounds(bounds, options) else {
        let max_dimension = bounds.max_dimension();
        if !bounds.is_empty() && max_dimension.is_finite() && max_dimension > 0.0 {
            log::warn!(
                "model extent {max_dimension} is too small: far plane would not clear the \
                 near floor {}; keeping existing clip planes",
                options.near_floor
            );
        } else {
            log::warn!(
                "model bounds {:?}..{:?} have no usable extent; keeping existing clip planes",
                bounds.min,
                bounds.max
            );
        }
        return None;
    };
    log::info!(
        "Updating camera clipping planes - Near: {:.2}, Far: {:.2}",
        planes.near,
        planes.far
    );
    for camera in cameras {
        camera.znear = planes.near;
        camera.zfar = planes.far;
        camera.update_projection_matrix();
    }
    Some(planes)
}

#[cfg(test)]
mod tests {
    use glam::Vec3;

    use super::*;

    fn cube(half: f32) -> Aabb {
        Aabb::new(Vec3::splat(-half), Vec3::splat(half))
    }

    #[test]
    fn ten_unit_model_gives_tenth_and_two_hundred() {
        let bounds = Aabb::new(Vec3::ZERO, Vec3::new(10.0, 4.0, 2.0));
        let planes = ClipPlanes::from_bounds(&bounds, &ClipOptions::default()).unwrap();
        assert!((planes.near - 0.1).abs() < 1e-6);
        assert!((planes.far - 200.0).abs() < 1e-4);
    }

    #[test]
    fn unit_model_hits_the_near_floor() {
        let planes = ClipPlanes::from_bounds(&cube(0.5), &ClipOptions::default()).unwrap();
        assert_eq!(planes.near, 0.01);
        assert!((planes.far - 20.0).abs() < 1e-5);
    }

    #[test]
    fn near_is_floored_and_below_far_for_many_sizes() {
        let options = ClipOptions::default();
        for &m in &[1e-4_f32, 0.003, 0.5, 1.0, 7.0, 123.0, 5e4] {
            let bounds = Aabb::new(Vec3::ZERO, Vec3::new(m, m * 0.5, 0.0));
            let planes = ClipPlanes::from_bounds(&bounds, &options);
            if let Some(planes) = planes {
                assert!(planes.near >= 0.01);
                assert!(planes.near < planes.far, "m = {m}");
                assert!((planes.far - 20.0 * m).abs() <= 20.0 * m * 1e-5);
            } else {
                // Only boxes too small to clear the near floor are rejected.
                assert!(20.0 * m <= 0.01, "m = {m}");
            }
        }
    }

    #[test]
    fn degenerate_boxes_are_rejected() {
        let options = ClipOptions::default();
        let point = Aabb::new(Vec3::ONE, Vec3::ONE);
        assert_eq!(ClipPlanes::from_bounds(&point, &options), None);
        assert_eq!(ClipPlanes::from_bounds(&Aabb::EMPTY, &options), None);
    }

    #[test]
    fn boxes_below_the_near_floor_are_rejected() {
        let options = ClipOptions::default();
        let tiny = Aabb::new(Vec3::ZERO, Vec3::splat(1e-4));
        assert_eq!(ClipPlanes::from_bounds(&tiny, &options), None);

        let mut cameras = vec![Camera::new(60.0, 1.0, 0.1, 1000.0)];
        assert!(fit_clip_planes(cameras.iter_mut(), &tiny, &options).is_none());
        assert_eq!(cameras[0].zfar, 1000.0);

        // Just above the threshold still fits.
        let small = Aabb::new(Vec3::ZERO, Vec3::splat(1e-3));
        assert!(ClipPlanes::from_bounds(&small, &options).is_some());
    }

    #[test]
    fn fitting_applies_to_every_camera() {
        let mut cameras = vec![
            Camera::new(60.0, 1.0, 0.1, 1000.0),
            Camera::new(60.0, 2.0, 0.1, 1000.0),
        ];
        let before: Vec<_> = cameras.iter().map(Camera::projection).collect();
        let planes =
            fit_clip_planes(cameras.iter_mut(), &cube(5.0), &ClipOptions::default()).unwrap();
        for (camera, old) in cameras.iter().zip(before) {
            assert_eq!(camera.znear, planes.near);
            assert_eq!(camera.zfar, planes.far);
            assert_ne!(camera.projection(), old);
        }
    }

    #[test]
    fn degenerate_fit_leaves_cameras_alone() {
        let mut cameras = vec![Camera::new(60.0, 1.0, 0.1, 1000.0)];
        let point = Aabb::new(Vec3::ZERO, Vec3::ZERO);
        assert!(fit_clip_planes(cameras.iter_mut(), &point, &ClipOptions::default()).is_none());
        assert_eq!(cameras[0].znear, 0.1);
        assert_eq!(cameras[0].zfar, 1000.0);
    }
}
