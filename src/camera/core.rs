use glam::{Mat3, Mat4, Quat, Vec3};

/// Perspective camera defined by a world-space pose and projection
/// parameters.
///
/// The projection matrix is cached; call
/// [`update_projection_matrix`](Self::update_projection_matrix) after
/// changing `fovy`, `aspect`, `znear` or `zfar`.
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    /// Eye position in world space.
    pub position: Vec3,
    /// World-space orientation. The camera looks down its local `-Z`.
    pub rotation: Quat,
    /// Vertical field of view in degrees.
    pub fovy: f32,
    /// Viewport aspect ratio (width / height).
    pub aspect: f32,
    /// Near clipping plane distance.
    pub znear: f32,
    /// Far clipping plane distance.
    pub zfar: f32,
    projection: Mat4,
}

#[repr(C)]
#[derive(Debug, Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
/// GPU uniform buffer holding the camera matrices and basis vectors.
pub struct CameraUniform {
    /// Combined view-projection matrix.
    pub view_proj: [[f32; 4]; 4],
    /// Inverse view-projection, used to reconstruct view rays for the
    /// background pass.
    pub inverse_view_proj: [[f32; 4]; 4],
    /// Camera world-space position.
    pub position: [f32; 3],
    /// Viewport aspect ratio.
    pub aspect: f32,
    /// Camera right vector, for screen-aligned point sprites.
    pub right: [f32; 3],
    /// Vertical field of view in degrees.
    pub fovy: f32,
    /// Camera up vector.
    pub up: [f32; 3],
    /// Padding for GPU alignment.
    pub(crate) _pad: f32,
}

impl Camera {
    /// Camera at the origin looking down `-Z`.
    #[must_use]
    pub fn new(fovy: f32, aspect: f32, znear: f32, zfar: f32) -> Self {
        let mut camera = Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            fovy,
            aspect,
            znear,
            zfar,
            projection: Mat4::IDENTITY,
        };
        camera.update_projection_matrix();
        camera
    }

    /// Recompute the cached projection from the current parameters.
    pub fn update_projection_matrix(&mut self) {
        // perspective_rh already uses [0,1] depth range (wgpu/Vulkan
        // convention)
        self.projection = Mat4::perspective_rh(
            self.fovy.to_radians(),
            self.aspect,
            self.znear,
            self.zfar,
        );
    }

    /// Cached projection matrix.
    #[must_use]
    pub fn projection(&self) -> Mat4 {
        self.projection
    }

    /// World-to-view transform.
    #[must_use]
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::from_rotation_translation(self.rotation, self.position).inverse()
    }

    /// Combined view-projection matrix.
    #[must_use]
    pub fn view_projection(&self) -> Mat4 {
        self.projection * self.view_matrix()
    }

    /// Unit view direction.
    #[must_use]
    pub fn forward(&self) -> Vec3 {
        self.rotation * Vec3::NEG_Z
    }

    /// Orient the camera toward `target`, keeping world `+Y` up.
    ///
    /// Leaves the rotation untouched when `target` coincides with the eye or
    /// lies straight above/below it.
    pub fn look_at(&mut self, target: Vec3) {
        let Some(forward) = (target - self.position).try_normalize() else {
            return;
        };
        let Some(right) = forward.cross(Vec3::Y).try_normalize() else {
            return;
        };
        let up = right.cross(forward);
        self.rotation =
            Quat::from_mat3(&Mat3::from_cols(right, up, -forward)).normalize();
    }
}

impl Default for CameraUniform {
    fn default() -> Self {
        Self::new()
    }
}

impl CameraUniform {
    /// Create a new camera uniform with identity matrices.
    #[must_use]
    pub fn new() -> Self {
        Self {
            view_proj: Mat4::IDENTITY.to_cols_array_2d(),
            inverse_view_proj: Mat4::IDENTITY.to_cols_array_2d(),
            position: [0.0; 3],
            aspect: 1.0,
            right: [1.0, 0.0, 0.0],
            fovy: 60.0,
            up: [0.0, 1.0, 0.0],
            _pad: 0.0,
        }
    }

    /// Update uniform fields from the given camera's current state.
    pub fn update_view_proj(&mut self, camera: &Camera) {
        let view_proj = camera.view_projection();
        self.view_proj = view_proj.to_cols_array_2d();
        self.inverse_view_proj = view_proj.inverse().to_cols_array_2d();
        self.position = camera.position.to_array();
        self.aspect = camera.aspect;
        self.right = (camera.rotation * Vec3::X).to_array();
        self.up = (camera.rotation * Vec3::Y).to_array();
        self.fovy = camera.fovy;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn look_at_points_forward_at_target() {
        let mut camera = Camera::new(60.0, 1.0, 0.1, 100.0);
        camera.position = Vec3::new(0.0, 2.0, 5.0);
        let target = Vec3::new(0.0, 1.0, 0.0);
        camera.look_at(target);
        let expected = (target - camera.position).normalize();
        assert!(camera.forward().abs_diff_eq(expected, 1e-5));
        // Up stays in the plane containing world +Y
        assert!((camera.rotation * Vec3::X).y.abs() < 1e-5);
    }

    #[test]
    fn look_at_ignores_degenerate_targets() {
        let mut camera = Camera::new(60.0, 1.0, 0.1, 100.0);
        camera.position = Vec3::new(1.0, 1.0, 1.0);
        let before = camera.rotation;
        camera.look_at(camera.position);
        assert_eq!(camera.rotation, before);
        camera.look_at(camera.position + Vec3::Y);
        assert_eq!(camera.rotation, before);
    }

    #[test]
    fn view_matrix_maps_eye_to_origin() {
        let mut camera = Camera::new(60.0, 1.0, 0.1, 100.0);
        camera.position = Vec3::new(3.0, -2.0, 7.0);
        camera.look_at(Vec3::ZERO);
        let eye_in_view = camera.view_matrix().transform_point3(camera.position);
        assert!(eye_in_view.abs_diff_eq(Vec3::ZERO, 1e-5));
    }

    #[test]
    fn projection_refresh_tracks_parameters() {
        let mut camera = Camera::new(60.0, 1.0, 0.1, 100.0);
        let before = camera.projection();
        camera.aspect = 2.0;
        assert_eq!(camera.projection(), before);
        camera.update_projection_matrix();
        assert_ne!(camera.projection(), before);
    }
}
