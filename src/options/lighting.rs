use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
/// Light rig intensities for the realistic and basic scenes.
pub struct LightingOptions {
    /// White ambient term of the realistic rig.
    pub ambient: f32,
    /// Shadow-casting key light of the realistic rig.
    pub key_intensity: f32,
    /// Key light position.
    pub key_position: [f32; 3],
    /// Pink and cyan accent point lights of the realistic rig.
    pub accent_intensity: f32,
    /// White ambient term of the basic rig.
    pub basic_ambient: f32,
    /// White point light of the basic rig.
    pub basic_point_intensity: f32,
    /// Contribution of the HDR environment to realistic shading.
    pub environment_strength: f32,
}

impl Default for LightingOptions {
    fn default() -> Self {
        Self {
            ambient: 0.8,
            key_intensity: 1.5,
            key_position: [10.0, 15.0, 10.0],
            accent_intensity: 1.0,
            basic_ambient: 0.4,
            basic_point_intensity: 0.8,
            environment_strength: 0.6,
        }
    }
}
