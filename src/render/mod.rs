//! Multi-viewport frame orchestration.
//!
//! [`RenderManager`] owns one [`Viewport`] per configured view, tiles them
//! across the window and drives a [`ViewportRenderer`] through the
//! per-frame protocol.

/// Window subdivision.
pub mod layout;
/// Viewport ownership and the frame/resize protocols.
pub mod manager;

pub use layout::Rect;
pub use manager::{ManagerState, RenderManager, Viewport, ViewportRenderer};
