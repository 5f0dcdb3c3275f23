//! Asset loading: glTF models, HDR environments and the background task
//! that fetches both without blocking the frame loop.

/// Radiance HDR decoding.
pub mod environment;
/// glTF import and material normalization.
pub mod model;
/// Cancellable background loading.
pub mod task;

pub use environment::load_environment;
pub use model::load_model;
pub use task::{AssetLoader, LoadRequest, LoadedAssets, LoadedModel};
