//! Centralized viewer options with TOML file support.
//!
//! Everything tweakable (view list, camera defaults, clip-plane fitting,
//! particle style, material overrides, lighting, asset paths) lives here.
//! Options serialize to/from TOML; every section uses `#[serde(default)]`
//! so a partial file (e.g. only overriding `[particles]`) works.

mod assets;
mod camera;
mod clipping;
mod lighting;
mod materials;
mod particles;
mod views;

use std::path::Path;

pub use assets::AssetOptions;
pub use camera::CameraOptions;
pub use clipping::ClipOptions;
pub use lighting::LightingOptions;
pub use materials::MaterialOptions;
pub use particles::ParticleOptions;
use serde::{Deserialize, Serialize};
pub use views::{ViewDescriptor, ViewKind, ViewOptions};

use crate::error::ViewerError;

/// Top-level options container.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct Options {
    /// Ordered view list and primary-view designation.
    pub views: ViewOptions,
    /// Camera projection and orbit-control parameters.
    pub camera: CameraOptions,
    /// Clip-plane fitting constants.
    pub clipping: ClipOptions,
    /// Point-cloud generation and style.
    pub particles: ParticleOptions,
    /// Material overrides applied on load and per view.
    pub materials: MaterialOptions,
    /// Light rig intensities.
    pub lighting: LightingOptions,
    /// Model and environment asset paths.
    pub assets: AssetOptions,
}

impl Options {
    /// Load options from a TOML file. Missing fields use defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ViewerError::Io`] if the file cannot be read,
    /// [`ViewerError::OptionsParse`] if it is not valid TOML for these
    /// options, or [`ViewerError::InvalidOptions`] if validation fails.
    pub fn load(path: &Path) -> Result<Self, ViewerError> {
        let content = std::fs::read_to_string(path).map_err(ViewerError::Io)?;
        let options: Self = toml::from_str(&content)
            .map_err(|e| ViewerError::OptionsParse(e.to_string()))?;
        options.validate()?;
        Ok(options)
    }

    /// Save options to a TOML file (pretty-printed).
    ///
    /// # Errors
    ///
    /// Returns [`ViewerError::OptionsParse`] on serialization failure or
    /// [`ViewerError::Io`] if the file cannot be written.
    pub fn save(&self, path: &Path) -> Result<(), ViewerError> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| ViewerError::OptionsParse(e.to_string()))?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(ViewerError::Io)?;
        }
        std::fs::write(path, content).map_err(ViewerError::Io)
    }

    /// Check cross-field invariants that serde cannot express.
    ///
    /// # Errors
    ///
    /// Returns [`ViewerError::InvalidOptions`] when the view list is empty,
    /// contains duplicate names, or names a primary view that does not
    /// exist.
    pub fn validate(&self) -> Result<(), ViewerError> {
        self.views.validate()?;
        if self.particles.count == 0 {
            log::warn!("particles.count is 0; surface-particle views will be empty");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_round_trips_through_toml() {
        let opts = Options::default();
        let toml_str = toml::to_string_pretty(&opts).unwrap();
        let parsed: Options = toml::from_str(&toml_str).unwrap();
        assert_eq!(opts, parsed);
    }

    #[test]
    fn partial_toml_fills_defaults() {
        let toml_str = r"
[particles]
count = 2500
";
        let opts: Options = toml::from_str(toml_str).unwrap();
        assert_eq!(opts.particles.count, 2500);
        // Everything else should be default
        assert_eq!(opts.particles.size, 0.02);
        assert_eq!(opts.camera.fovy, 60.0);
        assert_eq!(opts.views.list.len(), 5);
    }

    #[test]
    fn hex_colors_parse_from_toml() {
        let toml_str = r"
[materials]
accent_color = 0xff0000
";
        let opts: Options = toml::from_str(toml_str).unwrap();
        assert_eq!(opts.materials.accent_color, 0xff_00_00);
    }

    #[test]
    fn view_list_parses_kebab_case_kinds() {
        let toml_str = r#"
[views]
primary = "points"

[[views.list]]
name = "shaded"
kind = "realistic"

[[views.list]]
name = "points"
kind = "surface-particles"
"#;
        let opts: Options = toml::from_str(toml_str).unwrap();
        assert!(opts.validate().is_ok());
        assert_eq!(opts.views.list[1].kind, ViewKind::SurfaceParticles);
        assert_eq!(opts.views.primary_index(), Some(1));
    }

    #[test]
    fn save_then_load_preserves_options() {
        let dir = std::env::temp_dir()
            .join(format!("prism-options-{}", std::process::id()));
        let path = dir.join("viewer.toml");
        let mut opts = Options::default();
        opts.particles.count = 42;
        opts.save(&path).unwrap();
        let loaded = Options::load(&path).unwrap();
        assert_eq!(loaded, opts);
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn load_rejects_missing_file() {
        let err = Options::load(Path::new("/nonexistent/prism.toml"));
        assert!(matches!(err, Err(ViewerError::Io(_))));
    }
}
