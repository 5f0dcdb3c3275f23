use serde::{Deserialize, Serialize};

use crate::error::ViewerError;

/// Visual treatment applied to the shared model in one viewport.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum ViewKind {
    /// Lit shading with the HDR environment as background.
    Realistic,
    /// Triangle edges in the accent color.
    Wireframe,
    /// Unlit flat gray.
    Minimal,
    /// Area-weighted samples drawn as points.
    SurfaceParticles,
    /// One point per mesh vertex.
    VertexParticles,
}

impl ViewKind {
    /// Stable kebab-case name, matching the TOML spelling.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Realistic => "realistic",
            Self::Wireframe => "wireframe",
            Self::Minimal => "minimal",
            Self::SurfaceParticles => "surface-particles",
            Self::VertexParticles => "vertex-particles",
        }
    }
}

/// One configured view: a unique name and the treatment it renders.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ViewDescriptor {
    /// Unique identifier among configured views.
    pub name: String,
    /// Visual treatment.
    pub kind: ViewKind,
}

impl ViewDescriptor {
    /// Convenience constructor.
    #[must_use]
    pub fn new(name: impl Into<String>, kind: ViewKind) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }
}

/// Ordered view list. Order is left-to-right viewport placement.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ViewOptions {
    /// Name of the view whose camera drives all others. `None` selects the
    /// first view.
    pub primary: Option<String>,
    /// Views in left-to-right order.
    pub list: Vec<ViewDescriptor>,
}

impl Default for ViewOptions {
    fn default() -> Self {
        Self {
            primary: Some("main".into()),
            list: vec![
                ViewDescriptor::new("main", ViewKind::Realistic),
                ViewDescriptor::new("view1", ViewKind::Minimal),
                ViewDescriptor::new("view2", ViewKind::Wireframe),
                ViewDescriptor::new("view3", ViewKind::SurfaceParticles),
                ViewDescriptor::new("view4", ViewKind::VertexParticles),
            ],
        }
    }
}

impl ViewOptions {
    /// Index of the primary view in [`list`](Self::list), if resolvable.
    #[must_use]
    pub fn primary_index(&self) -> Option<usize> {
        match &self.primary {
            Some(name) => self.list.iter().position(|v| &v.name == name),
            None if self.list.is_empty() => None,
            None => Some(0),
        }
    }

    pub(crate) fn validate(&self) -> Result<(), ViewerError> {
        if self.list.is_empty() {
            return Err(ViewerError::InvalidOptions(
                "at least one view must be configured".into(),
            ));
        }
        for (i, view) in self.list.iter().enumerate() {
            if self.list[..i].iter().any(|v| v.name == view.name) {
                return Err(ViewerError::InvalidOptions(format!(
                    "duplicate view name '{}'",
                    view.name
                )));
            }
        }
        if self.primary_index().is_none() {
            return Err(ViewerError::InvalidOptions(format!(
                "primary view '{}' is not configured",
                self.primary.as_deref().unwrap_or_default()
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_describe_five_views_with_main_primary() {
        let views = ViewOptions::default();
        assert_eq!(views.list.len(), 5);
        assert_eq!(views.primary_index(), Some(0));
        assert!(views.validate().is_ok());
    }

    #[test]
    fn missing_primary_falls_back_to_first_view() {
        let views = ViewOptions {
            primary: None,
            ..ViewOptions::default()
        };
        assert_eq!(views.primary_index(), Some(0));
    }

    #[test]
    fn duplicate_names_are_rejected() {
        let views = ViewOptions {
            primary: None,
            list: vec![
                ViewDescriptor::new("a", ViewKind::Realistic),
                ViewDescriptor::new("a", ViewKind::Wireframe),
            ],
        };
        assert!(matches!(
            views.validate(),
            Err(ViewerError::InvalidOptions(_))
        ));
    }

    #[test]
    fn unknown_primary_is_rejected() {
        let views = ViewOptions {
            primary: Some("nope".into()),
            ..ViewOptions::default()
        };
        assert!(views.validate().is_err());
    }

    #[test]
    fn empty_list_is_rejected() {
        let views = ViewOptions {
            primary: None,
            list: Vec::new(),
        };
        assert!(views.validate().is_err());
    }

    #[test]
    fn kind_names_match_serde_spelling() {
        assert_eq!(ViewKind::SurfaceParticles.as_str(), "surface-particles");
        let parsed: ViewDescriptor =
            toml::from_str("name = \"v\"\nkind = \"vertex-particles\"")
                .unwrap();
        assert_eq!(parsed.kind, ViewKind::VertexParticles);
    }
}
