//! Shader programs and their per-frame uniforms.
//!
//! Two programs cover the three draw strategies: the instanced program reads
//! the model matrix from per-instance vertex attributes, the storage program
//! indexes a storage buffer by draw ID and serves both multi-draw paths.
//! Uniforms are set by name through [`UniformSet`]; a name the block does
//! not have is a warning, never a failure.

use std::collections::HashSet;

use glam::{Mat4, Vec3};

use crate::error::SwarmError;
use crate::geometry::Vertex;
use crate::gpu::dynamic_buffer::create_checked;
use crate::gpu::shader_composer::{ShaderComposer, SPHERE_INSTANCED, SPHERE_STORAGE};
use crate::instancing::{buffer::create_bind_group_layout, InstanceTransform};
use crate::renderer::pipeline_util;
use crate::renderer::strategy::{DrawStrategy, InstanceSource};

/// GPU uniform block bound at group 0, binding 0 of every program.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct FrameUniforms {
    /// World-to-view matrix.
    pub view: [[f32; 4]; 4],
    /// View-to-clip matrix.
    pub projection: [[f32; 4]; 4],
    /// Direction towards the light (normalized in the shader).
    pub light_dir: [f32; 3],
    /// Ambient floor of the diffuse term, 0..1.
    pub ambient: f32,
    /// Surface colour before lighting.
    pub base_color: [f32; 3],
    /// Amplitude of the positional colour ripple.
    pub variation_amplitude: f32,
    /// Spatial frequency of the colour ripple.
    pub variation_frequency: f32,
    /// 0 = shaded, 1 = normals as colour.
    pub debug_mode: i32,
    _pad: [f32; 2],
}

impl Default for FrameUniforms {
    fn default() -> Self {
        Self {
            view: Mat4::IDENTITY.to_cols_array_2d(),
            projection: Mat4::IDENTITY.to_cols_array_2d(),
            light_dir: [1.0, 1.0, 1.0],
            ambient: 0.3,
            base_color: [0.6, 0.8, 1.0],
            variation_amplitude: 0.1,
            variation_frequency: 5.0,
            debug_mode: 0,
            _pad: [0.0; 2],
        }
    }
}

/// Name-addressed setters over [`FrameUniforms`].
///
/// Writes mark the block dirty; [`flush`](Self::flush) uploads it. Unknown
/// names and type mismatches warn once per name and change nothing.
#[derive(Debug, Default)]
pub struct UniformSet {
    block: FrameUniforms,
    dirty: bool,
    warned: HashSet<String>,
}

impl UniformSet {
    /// Uniform set starting from `block`, marked dirty.
    #[must_use]
    pub fn new(block: FrameUniforms) -> Self {
        Self {
            block,
            dirty: true,
            warned: HashSet::new(),
        }
    }

    /// Set a `mat4x4<f32>` uniform. Returns whether the name was found.
    pub fn set_matrix4(&mut self, name: &str, value: Mat4) -> bool {
        let slot = match name {
            "view" => &mut self.block.view,
            "projection" => &mut self.block.projection,
            _ => return self.missing(name, "mat4"),
        };
        *slot = value.to_cols_array_2d();
        self.dirty = true;
        true
    }

    /// Set an `f32` uniform. Returns whether the name was found.
    pub fn set_float(&mut self, name: &str, value: f32) -> bool {
        let slot = match name {
            "ambient" => &mut self.block.ambient,
            "variation_amplitude" => &mut self.block.variation_amplitude,
            "variation_frequency" => &mut self.block.variation_frequency,
            _ => return self.missing(name, "float"),
        };
        *slot = value;
        self.dirty = true;
        true
    }

    /// Set an `i32` uniform. Returns whether the name was found.
    pub fn set_int(&mut self, name: &str, value: i32) -> bool {
        if name != "debug_mode" {
            return self.missing(name, "int");
        }
        self.block.debug_mode = value;
        self.dirty = true;
        true
    }

    /// Set a `vec3<f32>` uniform. Returns whether the name was found.
    pub fn set_vec3(&mut self, name: &str, value: Vec3) -> bool {
        let slot = match name {
            "light_dir" => &mut self.block.light_dir,
            "base_color" => &mut self.block.base_color,
            _ => return self.missing(name, "vec3"),
        };
        *slot = value.to_array();
        self.dirty = true;
        true
    }

    fn missing(&mut self, name: &str, kind: &str) -> bool {
        if self.warned.insert(name.to_owned()) {
            log::warn!("no {kind} uniform named '{name}', leaving it unset");
        }
        false
    }

    /// Current CPU-side block.
    pub fn block(&self) -> &FrameUniforms {
        &self.block
    }

    /// Whether the block changed since the last flush.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Upload the block to `buffer` if it changed. Returns whether a write
    /// was issued.
    pub fn flush(&mut self, queue: &wgpu::Queue, buffer: &wgpu::Buffer) -> bool {
        if !std::mem::replace(&mut self.dirty, false) {
            return false;
        }
        queue.write_buffer(buffer, 0, bytemuck::bytes_of(&self.block));
        true
    }
}

/// What a strategy needs bound to draw: its pipeline and the frame uniform
/// bind group.
pub struct ProgramBinding<'a> {
    /// Render pipeline for the strategy.
    pub pipeline: &'a wgpu::RenderPipeline,
    /// Group 0 bind group holding the frame uniforms.
    pub uniforms: &'a wgpu::BindGroup,
}

/// Compiled programs, the shared uniform buffer, and the bind group layouts
/// the draw dispatcher binds against.
pub struct ProgramSet {
    instanced: wgpu::RenderPipeline,
    storage: wgpu::RenderPipeline,
    instance_layout: wgpu::BindGroupLayout,
    uniform_buffer: wgpu::Buffer,
    uniform_bind_group: wgpu::BindGroup,
    uniforms: UniformSet,
}

impl ProgramSet {
    /// Compose both shaders and build their pipelines for `color_format`.
    ///
    /// # Errors
    ///
    /// [`SwarmError::Shader`] if composition or pipeline validation fails;
    /// [`SwarmError::BufferAllocation`] if the uniform buffer cannot be
    /// created.
    pub fn new(
        device: &wgpu::Device,
        color_format: wgpu::TextureFormat,
        initial: FrameUniforms,
    ) -> Result<Self, SwarmError> {
        let mut composer = ShaderComposer::new()?;

        let frame_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("Frame Uniform Layout"),
                entries: &[wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: wgpu::BufferSize::new(
                            size_of::<FrameUniforms>() as u64,
                        ),
                    },
                    count: None,
                }],
            });
        let instance_layout = create_bind_group_layout(device);

        let uniform_buffer = create_checked(
            device,
            "Frame Uniform Buffer",
            size_of::<FrameUniforms>() as u64,
            wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        )?;
        let uniform_bind_group =
            device.create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some("Frame Uniform Bind Group"),
                layout: &frame_layout,
                entries: &[wgpu::BindGroupEntry {
                    binding: 0,
                    resource: uniform_buffer.as_entire_binding(),
                }],
            });

        device.push_error_scope(wgpu::ErrorFilter::Validation);
        let built = Self::create_pipelines(
            device,
            &mut composer,
            color_format,
            &frame_layout,
            &instance_layout,
        );
        let validation = pollster::block_on(device.pop_error_scope());
        let (instanced, storage) = built?;
        if let Some(err) = validation {
            return Err(SwarmError::Shader(format!(
                "pipeline validation failed: {err}"
            )));
        }
        log::info!("sphere programs ready ({color_format:?})");

        Ok(Self {
            instanced,
            storage,
            instance_layout,
            uniform_buffer,
            uniform_bind_group,
            uniforms: UniformSet::new(initial),
        })
    }

    fn create_pipelines(
        device: &wgpu::Device,
        composer: &mut ShaderComposer,
        color_format: wgpu::TextureFormat,
        frame_layout: &wgpu::BindGroupLayout,
        instance_layout: &wgpu::BindGroupLayout,
    ) -> Result<(wgpu::RenderPipeline, wgpu::RenderPipeline), SwarmError> {
        let instanced_layout =
            device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: Some("Sphere Instanced Pipeline Layout"),
                bind_group_layouts: &[frame_layout],
                push_constant_ranges: &[],
            });
        let storage_layout =
            device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: Some("Sphere Storage Pipeline Layout"),
                bind_group_layouts: &[frame_layout, instance_layout],
                push_constant_ranges: &[],
            });

        let instanced_shader = composer.compose(
            device,
            "Sphere Instanced Shader",
            SPHERE_INSTANCED.0,
            SPHERE_INSTANCED.1,
        )?;
        let storage_shader = composer.compose(
            device,
            "Sphere Storage Shader",
            SPHERE_STORAGE.0,
            SPHERE_STORAGE.1,
        )?;

        let instanced = Self::create_pipeline(
            device,
            "Sphere Instanced Pipeline",
            &instanced_layout,
            &instanced_shader,
            &[Vertex::layout(), InstanceTransform::layout()],
            color_format,
        );
        let storage = Self::create_pipeline(
            device,
            "Sphere Storage Pipeline",
            &storage_layout,
            &storage_shader,
            &[Vertex::layout()],
            color_format,
        );
        Ok((instanced, storage))
    }

    fn create_pipeline(
        device: &wgpu::Device,
        label: &str,
        layout: &wgpu::PipelineLayout,
        shader: &wgpu::ShaderModule,
        buffers: &[wgpu::VertexBufferLayout<'_>],
        color_format: wgpu::TextureFormat,
    ) -> wgpu::RenderPipeline {
        device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some(label),
            layout: Some(layout),
            vertex: wgpu::VertexState {
                module: shader,
                entry_point: Some("vs_main"),
                buffers,
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: shader,
                entry_point: Some("fs_main"),
                targets: &pipeline_util::surface_fragment_target(color_format),
                compilation_options: Default::default(),
            }),
            primitive: pipeline_util::culled_triangle_list(),
            depth_stencil: Some(pipeline_util::depth_stencil_state()),
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
            cache: None,
        })
    }

    /// Program and uniforms for `strategy`. The indirect strategy shares the
    /// multi-draw program.
    pub fn select(&self, strategy: DrawStrategy) -> ProgramBinding<'_> {
        let pipeline = match strategy.instance_source() {
            InstanceSource::VertexAttribute => &self.instanced,
            InstanceSource::StorageBuffer => &self.storage,
        };
        ProgramBinding {
            pipeline,
            uniforms: &self.uniform_bind_group,
        }
    }

    /// Layout of the instance storage bind group (group 1).
    pub fn instance_layout(&self) -> &wgpu::BindGroupLayout {
        &self.instance_layout
    }

    /// Name-addressed uniform setters.
    pub fn uniforms_mut(&mut self) -> &mut UniformSet {
        &mut self.uniforms
    }

    /// Current uniform values.
    pub fn uniforms(&self) -> &UniformSet {
        &self.uniforms
    }

    /// Upload uniforms changed since the last flush.
    pub fn flush_uniforms(&mut self, queue: &wgpu::Queue) -> bool {
        self.uniforms.flush(queue, &self.uniform_buffer)
    }
}
