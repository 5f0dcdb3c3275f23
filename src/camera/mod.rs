//! Camera system for the viewports.
//!
//! Provides a perspective camera, an orbit controller with damping,
//! clip-plane fitting from model bounds, primary-to-secondary pose
//! synchronization, and window-event input handling.

/// Near/far plane fitting from model bounds.
pub mod clip;
/// Orbit controller translating pointer motion into camera motion.
pub mod controller;
/// Core camera struct and GPU uniform types.
pub mod core;
/// Window-event-based camera input handler.
#[cfg(feature = "viewer")]
pub mod input;
/// Primary-to-secondary camera synchronization.
pub mod sync;
