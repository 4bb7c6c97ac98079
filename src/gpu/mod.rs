//! GPU resource management utilities.
//!
//! Provides wgpu device/surface initialization, checked growable buffers,
//! shader composition, the sphere programs, and the depth target.

/// Growable GPU buffers with checked allocation.
pub mod dynamic_buffer;
/// Sphere pipelines and name-addressed frame uniforms.
pub mod programs;
/// wgpu device, surface, and queue initialization.
pub mod render_context;
/// WGSL shader composition with `#import` support via naga-oil.
pub mod shader_composer;
/// Depth attachment sized to the surface.
pub mod texture;
