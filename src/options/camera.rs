use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
/// Camera projection and orbit-control parameters.
pub struct CameraOptions {
    /// Vertical field of view in degrees.
    pub fovy: f32,
    /// Near clipping plane distance before a model is fitted.
    pub znear: f32,
    /// Far clipping plane distance before a model is fitted.
    pub zfar: f32,
    /// Initial camera position.
    pub position: [f32; 3],
    /// Initial orbit target.
    pub target: [f32; 3],
    /// Whether orbit motion coasts to a stop instead of halting.
    pub enable_damping: bool,
    /// Fraction of remaining motion removed per update when damping.
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
}

impl Default for CameraOptions {
    fn default() -> Self {
        Self {
            fovy: 60.0,
            znear: 0.1,
            zfar: 1000.0,
            position: [0.0, 2.0, 5.0],
            target: [0.0, 1.0, 0.0],
            enable_damping: true,
            damping_factor: 0.05,
            auto_rotate: false,
            auto_rotate_speed: 0.5,
            rotate_speed: 1.0,
            pan_speed: 1.0,
            zoom_speed: 1.0,
        }
    }
}
