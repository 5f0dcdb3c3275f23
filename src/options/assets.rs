use std::path::PathBuf;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
/// Asset locations, relative to `base_dir` unless absolute.
pub struct AssetOptions {
    /// Directory all relative asset paths resolve against.
    pub base_dir: PathBuf,
    /// glTF model to display.
    pub model: PathBuf,
    /// Equirectangular Radiance HDR for the realistic view.
    pub environment: Option<PathBuf>,
}

impl Default for AssetOptions {
    fn default() -> Self {
        Self {
            base_dir: PathBuf::from("assets"),
            model: PathBuf::from("models/humanoid_robot_face/scene.gltf"),
            environment: Some(PathBuf::from("skybox_4k.hdr")),
        }
    }
}

impl AssetOptions {
    /// Resolved model path.
    #[must_use]
    pub fn model_path(&self) -> PathBuf {
        self.base_dir.join(&self.model)
    }

    /// Resolved environment path, if one is configured.
    #[must_use]
    pub fn environment_path(&self) -> Option<PathBuf> {
        self.environment.as_ref().map(|p| self.base_dir.join(p))
    }
}
