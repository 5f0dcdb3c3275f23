use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
/// Constants used to derive near/far planes from model bounds.
pub struct ClipOptions {
    /// Smallest near plane ever produced.
    pub near_floor: f32,
    /// Near plane as a fraction of the largest model dimension.
    pub near_fraction: f32,
    /// Orbit headroom beyond the model silhouette.
    pub padding_multiplier: f32,
    /// Far plane multiple of the padded model dimension.
    pub far_factor: f32,
}

impl Default for ClipOptions {
    fn default() -> Self {
        Self {
            near_floor: 0.01,
            near_fraction: 0.01,
            padding_multiplier: 2.0,
            far_factor: 10.0,
        }
    }
}
