use std::borrow::Cow;

use naga_oil::compose::{
    ComposableModuleDescriptor, Composer, NagaModuleDescriptor, ShaderLanguage,
    ShaderType,
};

use crate::error::SwarmError;

/// Wraps `naga_oil::compose::Composer` to provide shader composition with
/// `#import` support.
///
/// Pre-loads the shared WGSL modules at construction time. Consuming shaders
/// use `#import sphere_swarm::frame` to pull in the frame uniforms and
/// shading helpers. The composer produces `naga::Module` IR directly,
/// skipping WGSL re-parse at runtime.
pub struct ShaderComposer {
    composer: Composer,
}

/// Shared module definition: (source, file_path)
struct ModuleDef {
    source: &'static str,
    file_path: &'static str,
}

/// Shared modules in dependency order.
const MODULES: &[ModuleDef] = &[ModuleDef {
    source: include_str!("../../assets/shaders/modules/frame.wgsl"),
    file_path: "modules/frame.wgsl",
}];

/// Instanced program: transform from per-instance vertex attributes.
pub const SPHERE_INSTANCED: (&str, &str) = (
    include_str!("../../assets/shaders/raster/sphere_instanced.wgsl"),
    "raster/sphere_instanced.wgsl",
);

/// Storage program: transform indexed by draw ID from a storage buffer.
pub const SPHERE_STORAGE: (&str, &str) = (
    include_str!("../../assets/shaders/raster/sphere_storage.wgsl"),
    "raster/sphere_storage.wgsl",
);

impl ShaderComposer {
    /// Register the shared modules.
    ///
    /// # Errors
    ///
    /// [`SwarmError::Shader`] if a shared module fails to parse.
    pub fn new() -> Result<Self, SwarmError> {
        let mut composer = Composer::default();

        for m in MODULES {
            let _ = composer
                .add_composable_module(ComposableModuleDescriptor {
                    source: m.source,
                    file_path: m.file_path,
                    language: ShaderLanguage::Wgsl,
                    ..Default::default()
                })
                .map_err(|e| {
                    SwarmError::Shader(format!(
                        "failed to register shader module '{}': {e}",
                        m.file_path
                    ))
                })?;
        }

        Ok(Self { composer })
    }

    /// Compose a shader source string (which may contain `#import`
    /// directives) into a `wgpu::ShaderModule` ready for pipeline creation.
    ///
    /// # Errors
    ///
    /// [`SwarmError::Shader`] if composition fails.
    pub fn compose(
        &mut self,
        device: &wgpu::Device,
        label: &str,
        source: &str,
        file_path: &str,
    ) -> Result<wgpu::ShaderModule, SwarmError> {
        let naga_module = self.compose_naga(source, file_path)?;

        Ok(device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some(label),
            source: wgpu::ShaderSource::Naga(Cow::Owned(naga_module)),
        }))
    }

    /// Compose a shader source into a `naga::Module` without creating a wgpu
    /// shader module. Useful for testing shader composition without a GPU
    /// device.
    ///
    /// # Errors
    ///
    /// [`SwarmError::Shader`] if composition fails.
    pub fn compose_naga(
        &mut self,
        source: &str,
        file_path: &str,
    ) -> Result<naga::Module, SwarmError> {
        self.composer
            .make_naga_module(NagaModuleDescriptor {
                source,
                file_path,
                shader_type: ShaderType::Wgsl,
                ..Default::default()
            })
            .map_err(|e| {
                SwarmError::Shader(format!(
                    "failed to compose shader '{file_path}': {e}"
                ))
            })
    }
}
