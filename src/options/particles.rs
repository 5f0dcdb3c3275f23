use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
/// Point-cloud generation and style.
pub struct ParticleOptions {
    /// Samples drawn for surface-particle views.
    pub count: usize,
    /// sRGB point color as `0xRRGGBB`.
    pub color: u32,
    /// Surface particle size in world units.
    pub size: f32,
    /// Vertex particle size in world units.
    pub vertex_size: f32,
    /// Point opacity (0..1).
    pub opacity: f32,
    /// Whether point size shrinks with distance.
    pub size_attenuation: bool,
    /// Fixed sampler seed for reproducible clouds; random when unset.
    pub seed: Option<u64>,
}

impl Default for ParticleOptions {
    fn default() -> Self {
        Self {
            count: 10_000,
            color: 0x00_ff_88,
            size: 0.02,
            vertex_size: 0.02,
            opacity: 0.9,
            size_attenuation: true,
            seed: None,
        }
    }
}
