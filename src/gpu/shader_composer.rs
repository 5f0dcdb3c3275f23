use std::borrow::Cow;

use naga_oil::compose::{
    ComposableModuleDescriptor, Composer, ComposerError, NagaModuleDescriptor, ShaderLanguage,
    ShaderType,
};

use crate::error::ViewerError;

/// Shared modules, registered in dependency order.
const MODULES: &[(&str, &str)] = &[(
    include_str!("../../assets/shaders/common.wgsl"),
    "common.wgsl",
)];

/// Wraps `naga_oil::compose::Composer` so pipeline shaders can pull the
/// shared scene bindings in with `#import prism::common::{...}`.
///
/// Composition produces `naga::Module` IR directly, which wgpu accepts
/// without re-parsing WGSL.
pub struct ShaderComposer {
    composer: Composer,
}

impl ShaderComposer {
    /// Register every shared module.
    ///
    /// # Errors
    ///
    /// Returns [`ViewerError::Shader`] if a shared module fails to parse.
    pub fn new() -> Result<Self, ViewerError> {
        let mut composer = Composer::default();
        for &(source, file_path) in MODULES {
            let _ = composer
                .add_composable_module(ComposableModuleDescriptor {
                    source,
                    file_path,
                    language: ShaderLanguage::Wgsl,
                    ..Default::default()
                })
                .map_err(|e| shader_error(file_path, &e))?;
        }
        Ok(Self { composer })
    }

    /// Compose a shader source (which may contain `#import` directives)
    /// into a `wgpu::ShaderModule` ready for pipeline creation.
    ///
    /// # Errors
    ///
    /// Returns [`ViewerError::Shader`] if composition fails.
    pub fn compose(
        &mut self,
        device: &wgpu::Device,
        label: &str,
        source: &str,
        file_path: &str,
    ) -> Result<wgpu::ShaderModule, ViewerError> {
        let module = self
            .compose_naga(source, file_path)
            .map_err(|e| shader_error(file_path, &e))?;
        Ok(device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some(label),
            source: wgpu::ShaderSource::Naga(Cow::Owned(module)),
        }))
    }

    /// Compose a shader source into a `naga::Module` without a GPU device.
    ///
    /// # Errors
    ///
    /// Returns the composer's error when an import is unresolved or the
    /// source does not parse.
    pub fn compose_naga(
        &mut self,
        source: &str,
        file_path: &str,
    ) -> Result<naga::Module, Box<ComposerError>> {
        self.composer
            .make_naga_module(NagaModuleDescriptor {
                source,
                file_path,
                shader_type: ShaderType::Wgsl,
                ..Default::default()
            })
            .map_err(Box::new)
    }
}

fn shader_error(file_path: &str, e: &ComposerError) -> ViewerError {
    ViewerError::Shader(format!("{file_path}: {e}"))
}
