//! Crate-level error types.

use std::fmt;

use crate::gpu::render_context::RenderContextError;

/// Errors produced by the prism crate.
#[derive(Debug)]
pub enum ViewerError {
    /// GPU context initialization failure.
    Gpu(RenderContextError),
    /// Failed to fetch or parse the glTF model.
    ModelLoad(String),
    /// Failed to fetch or decode the HDR environment map.
    EnvironmentLoad(String),
    /// The model parsed but contains no mesh with geometry.
    NoMesh,
    /// Generic I/O failure.
    Io(std::io::Error),
    /// Failed to spawn a background thread.
    ThreadSpawn(std::io::Error),
    /// TOML options parsing/serialization failure.
    OptionsParse(String),
    /// Options parsed but describe an unusable configuration.
    InvalidOptions(String),
    /// A shader failed to compose.
    Shader(String),
    /// Viewer event-loop failure.
    Viewer(String),
}

impl fmt::Display for ViewerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Gpu(e) => write!(f, "GPU error: {e}"),
            Self::ModelLoad(msg) => write!(f, "model load error: {msg}"),
            Self::EnvironmentLoad(msg) => {
                write!(f, "environment map load error: {msg}")
            }
            Self::NoMesh => write!(f, "no mesh with geometry found"),
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::ThreadSpawn(e) => {
                write!(f, "failed to spawn thread: {e}")
            }
            Self::OptionsParse(msg) => {
                write!(f, "options parse error: {msg}")
            }
            Self::InvalidOptions(msg) => write!(f, "invalid options: {msg}"),
            Self::Shader(msg) => write!(f, "shader error: {msg}"),
            Self::Viewer(msg) => write!(f, "viewer error: {msg}"),
        }
    }
}

impl std::error::Error for ViewerError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Gpu(e) => Some(e),
            Self::Io(e) | Self::ThreadSpawn(e) => Some(e),
            _ => None,
        }
    }
}

impl From<RenderContextError> for ViewerError {
    fn from(e: RenderContextError) -> Self {
        Self::Gpu(e)
    }
}

impl From<std::io::Error> for ViewerError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

#[cfg(test)]
mod tests {
    use std::error::Error;

    use super::*;

    #[test]
    fn display_includes_context() {
        let err = ViewerError::ModelLoad("missing.gltf".into());
        assert_eq!(err.to_string(), "model load error: missing.gltf");
        assert_eq!(
            ViewerError::NoMesh.to_string(),
            "no mesh with geometry found"
        );
    }

    #[test]
    fn io_errors_expose_source() {
        let err = ViewerError::from(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "gone",
        ));
        assert!(err.source().is_some());
        assert!(ViewerError::NoMesh.source().is_none());
    }
}
