use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
/// Material overrides applied on load and by the per-view treatments.
pub struct MaterialOptions {
    /// Metalness forced onto every PBR material after load.
    pub metalness: f32,
    /// Roughness forced onto every PBR material after load.
    pub roughness: f32,
    /// sRGB accent color (`0xRRGGBB`) for the wireframe view.
    pub accent_color: u32,
    /// Emissive strength of the wireframe material.
    pub wireframe_emissive_intensity: f32,
    /// sRGB color of the minimal view's unlit material.
    pub minimal_color: u32,
    /// sRGB background for every view except the realistic one.
    pub background_color: u32,
}

impl Default for MaterialOptions {
    fn default() -> Self {
        Self {
            metalness: 0.3,
            roughness: 0.4,
            accent_color: 0x00_ff_88,
            wireframe_emissive_intensity: 0.5,
            minimal_color: 0x80_80_80,
            background_color: 0x0a_0a_0a,
        }
    }
}
