//! Per-view scenes over one shared model.
//!
//! A [`Scene`] owns what a single viewport draws: background, lights and
//! content. Model-backed content points at the shared
//! [`ModelAsset`](model::ModelAsset); only point clouds are owned per view.

/// Axis-aligned bounding boxes.
pub mod bounds;
/// Generated per-view content.
pub mod content;
/// Decoded environment maps.
pub mod environment;
/// Per-view scene, camera and controller construction.
pub mod factory;
/// Light sources and rigs.
pub mod light;
/// Materials and per-view overrides.
pub mod material;
/// The shared model arena.
pub mod model;
/// Area-weighted surface sampling.
pub mod sampler;

use std::sync::Arc;

pub use content::{Content, PointCloud, PointStyle};
pub use environment::EnvironmentMap;
pub use light::Light;
pub use model::ModelAsset;

/// Stable identity of a scene, used to key GPU-side caches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SceneId(pub u32);

/// What fills the viewport behind the content.
#[derive(Debug, Clone, Default)]
pub enum Background {
    /// Nothing drawn; the clear color shows through.
    #[default]
    None,
    /// Solid linear RGB.
    Color([f32; 3]),
    /// Equirectangular environment map.
    Environment(Arc<EnvironmentMap>),
}

/// Everything one viewport draws.
#[derive(Debug, Clone)]
pub struct Scene {
    id: SceneId,
    background: Background,
    environment: Option<Arc<EnvironmentMap>>,
    environment_strength: f32,
    lights: Vec<Light>,
    content: Vec<Content>,
    revision: u64,
}

impl Scene {
    /// Empty scene with no background.
    #[must_use]
    pub fn new(id: SceneId) -> Self {
        Self {
            id,
            background: Background::None,
            environment: None,
            environment_strength: 0.0,
            lights: Vec::new(),
            content: Vec::new(),
            revision: 0,
        }
    }

    /// Scene identity.
    #[must_use]
    pub fn id(&self) -> SceneId {
        self.id
    }

    /// Bumped on every content, light or background change.
    #[must_use]
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Current background.
    #[must_use]
    pub fn background(&self) -> &Background {
        &self.background
    }

    /// Environment used for image-based ambient light, if any.
    #[must_use]
    pub fn environment(&self) -> Option<&Arc<EnvironmentMap>> {
        self.environment.as_ref()
    }

    /// Multiplier on the environment's ambient contribution.
    #[must_use]
    pub fn environment_strength(&self) -> f32 {
        self.environment_strength
    }

    /// Lights in insertion order.
    #[must_use]
    pub fn lights(&self) -> &[Light] {
        &self.lights
    }

    /// Content in insertion order.
    #[must_use]
    pub fn content(&self) -> &[Content] {
        &self.content
    }

    /// Whether the scene has anything to draw besides its background.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }

    /// Replace the background.
    pub fn set_background(&mut self, background: Background) {
        self.background = background;
        self.revision += 1;
    }

    /// Use `map` both as background and as ambient light source.
    pub fn set_environment(&mut self, map: Arc<EnvironmentMap>, strength: f32) {
        self.background = Background::Environment(Arc::clone(&map));
        self.environment = Some(map);
        self.environment_strength = strength;
        self.revision += 1;
    }

    /// Replace every light.
    pub fn set_lights(&mut self, lights: Vec<Light>) {
        self.lights = lights;
        self.revision += 1;
    }

    /// Append content.
    pub fn add(&mut self, content: Content) {
        self.content.push(content);
        self.revision += 1;
    }

    /// Append several content items.
    pub fn extend(&mut self, content: impl IntoIterator<Item = Content>) {
        self.content.extend(content);
        self.revision += 1;
    }

    /// Drop all content.
    pub fn clear_content(&mut self) {
        if !self.content.is_empty() {
            self.content.clear();
            self.revision += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mutations_bump_revision() {
        let mut scene = Scene::new(SceneId(1));
        let start = scene.revision();
        scene.set_background(Background::Color([0.1; 3]));
        scene.set_lights(Vec::new());
        assert_eq!(scene.revision(), start + 2);
        scene.clear_content();
        assert_eq!(scene.revision(), start + 2);
    }

    #[test]
    fn environment_sets_background_too() {
        let mut scene = Scene::new(SceneId(0));
        let map = Arc::new(EnvironmentMap::new(1, 1, vec![[1.0; 4]]).unwrap());
        scene.set_environment(Arc::clone(&map), 0.6);
        assert!(matches!(scene.background(), Background::Environment(m) if Arc::ptr_eq(m, &map)));
        assert_eq!(scene.environment_strength(), 0.6);
    }
}
