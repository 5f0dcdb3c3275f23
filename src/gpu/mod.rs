//! GPU backend for the viewport renderer.
//!
//! Provides wgpu device/surface initialization, pipelines, per-scene
//! resource uploads, and [`renderer::GpuRenderer`], the wgpu
//! implementation of [`crate::render::ViewportRenderer`].

/// Shared wgpu boilerplate helpers for bind groups, shaders and samplers.
pub mod pipeline_helpers;
/// Render pipelines for backgrounds, meshes and point clouds.
pub mod pipelines;
/// wgpu device, surface, and queue initialization.
pub mod render_context;
/// WGSL composition with `#import` support via naga_oil.
pub mod shader_composer;
/// Single-pass multi-viewport renderer.
pub mod renderer;
/// Vertex/index buffers and bind groups built from scene content.
pub mod resources;
/// Depth targets and sampled textures.
pub mod texture;
/// `#[repr(C)]` vertex and uniform layouts shared with the shaders.
pub mod uniforms;

pub use render_context::{RenderContext, RenderContextError};
pub use renderer::GpuRenderer;
pub use shader_composer::ShaderComposer;
