// -- Lint policy ---------------------------------------------------------
// This is the single source of truth for crate-wide lints.

// Broad lint groups
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![deny(clippy::nursery)]
// Documentation
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]
#![deny(rustdoc::bare_urls)]
// No panicking in library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![deny(clippy::todo)]
#![deny(clippy::unimplemented)]
// No debug/print artifacts
#![deny(clippy::dbg_macro)]
#![deny(clippy::print_stdout)]
#![deny(clippy::print_stderr)]
// Import hygiene
#![deny(clippy::wildcard_imports)]
// Complexity limits
#![deny(clippy::cognitive_complexity)]
#![deny(clippy::excessive_nesting)]
// Function signature hygiene
#![deny(clippy::fn_params_excessive_bools)]
// Clone / pass-by-value hygiene
#![deny(clippy::needless_pass_by_value)]
#![deny(clippy::implicit_clone)]
// String hygiene
#![deny(clippy::inefficient_to_string)]
#![deny(clippy::redundant_closure_for_method_calls)]
#![deny(clippy::manual_string_new)]
#![deny(clippy::str_to_string)]
// Cargo lints (warn, not deny since cargo lints can be noisy)
#![warn(clippy::cargo)]
// Unused / redundant code
#![deny(unused_results)]
#![deny(unused_qualifications)]
// Cast hygiene
#![deny(trivial_casts)]
#![deny(trivial_numeric_casts)]

//! Multi-viewport glTF model viewer with synchronized cameras, built on
//! wgpu.
//!
//! Prism loads one glTF model (and an optional HDR environment map) and
//! shows it side by side in several viewports, each with its own
//! presentation: realistic PBR shading, a glowing wireframe, a minimal
//! unlit silhouette, and two point-cloud renderings. One viewport is the
//! primary view; the orbit camera driven by the user there is copied to
//! every other viewport each frame.
//!
//! # Key entry points
//!
//! - [`render::RenderManager`] - owns the viewports, syncs cameras and
//!   drives the per-frame render loop
//! - [`render::ViewportRenderer`] - the drawing backend seam;
//!   [`gpu::GpuRenderer`] is the wgpu implementation
//! - [`loader::AssetLoader`] - background glTF/HDR loading
//! - [`options::Options`] - runtime configuration (views, camera,
//!   particles, materials, lighting, asset paths)
//!
//! # Architecture
//!
//! Assets load on a background thread and arrive over a channel. The
//! decoded model is shared between every viewport behind an `Arc`; each
//! view only carries its material override or generated point cloud.
//! All viewports draw into one render pass per frame, each restricted to
//! its own viewport and scissor rectangle.

pub mod camera;
pub mod error;
pub mod gpu;
pub mod loader;
pub mod options;
pub mod render;
pub mod scene;
#[cfg(feature = "viewer")]
pub mod viewer;
