//! Per-view scene, camera and controller construction.

use glam::Vec3;

use super::light::{basic_rig, realistic_rig};
use super::material::color_from_hex;
use super::{Background, Scene, SceneId};
use crate::camera::controller::OrbitController;
use crate::camera::core::Camera;
use crate::options::{Options, ViewDescriptor, ViewKind};

/// Initial aspect; replaced on the first resize.
const INITIAL_ASPECT: f32 = 1.0;

/// The pieces one viewport is built from.
#[derive(Debug, Clone)]
pub struct ViewParts {
    /// Empty scene with background and lights set.
    pub scene: Scene,
    /// Camera aimed at the controller's target.
    pub camera: Camera,
    /// Damped orbit controller.
    pub controller: OrbitController,
}

/// Build the scene, camera and controller for one view.
///
/// Every kind except [`ViewKind::Realistic`] gets the dark background
/// color; the realistic view's background stays unset until an
/// environment map arrives.
#[must_use]
pub fn create_view(id: SceneId, view: &ViewDescriptor, options: &Options) -> ViewParts {
    let mut scene = Scene::new(id);
    if view.kind == ViewKind::Realistic {
        scene.set_lights(realistic_rig(&options.lighting));
    } else {
        scene.set_background(Background::Color(color_from_hex(
            options.materials.background_color,
        )));
        scene.set_lights(basic_rig(&options.lighting));
    }

    let camera_options = &options.camera;
    let mut camera = Camera::new(
        camera_options.fovy,
        INITIAL_ASPECT,
        camera_options.znear,
        camera_options.zfar,
    );
    camera.position = Vec3::from_array(camera_options.position);

    let mut controller = OrbitController::new(camera_options);
    let _ = controller.update(&mut camera, 0.0);

    log::debug!("created view '{}' ({})", view.name, view.kind.as_str());
    ViewParts {
        scene,
        camera,
        controller,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::light::Light;

    fn parts(kind: ViewKind) -> ViewParts {
        create_view(SceneId(0), &ViewDescriptor::new("v", kind), &Options::default())
    }

    #[test]
    fn realistic_view_has_no_background_and_full_rig() {
        let parts = parts(ViewKind::Realistic);
        assert!(matches!(parts.scene.background(), Background::None));
        assert_eq!(parts.scene.lights().len(), 4);
    }

    #[test]
    fn other_views_get_dark_background_and_basic_rig() {
        for kind in [
            ViewKind::Wireframe,
            ViewKind::Minimal,
            ViewKind::SurfaceParticles,
            ViewKind::VertexParticles,
        ] {
            let parts = parts(kind);
            let Background::Color(color) = parts.scene.background() else {
                panic!("{kind:?} should have a color background");
            };
            assert!(color.iter().all(|c| *c > 0.0 && *c < 0.01));
            assert_eq!(parts.scene.lights().len(), 2);
            assert!(matches!(parts.scene.lights()[0], Light::Ambient { .. }));
        }
    }

    #[test]
    fn camera_defaults_and_initial_aim() {
        let parts = parts(ViewKind::Minimal);
        let camera = &parts.camera;
        assert_eq!(camera.fovy, 60.0);
        assert_eq!(camera.aspect, 1.0);
        assert_eq!(camera.znear, 0.1);
        assert_eq!(camera.zfar, 1000.0);
        assert!(camera.position.abs_diff_eq(Vec3::new(0.0, 2.0, 5.0), 1e-4));
        assert_eq!(parts.controller.target, Vec3::new(0.0, 1.0, 0.0));
        assert!(parts.controller.enable_damping);
        assert_eq!(parts.controller.damping_factor, 0.05);
        assert!(!parts.controller.auto_rotate);
        let to_target = (parts.controller.target - camera.position).normalize();
        assert!(camera.forward().abs_diff_eq(to_target, 1e-5));
    }

    #[test]
    fn views_start_empty() {
        assert!(parts(ViewKind::Wireframe).scene.is_empty());
    }
}
