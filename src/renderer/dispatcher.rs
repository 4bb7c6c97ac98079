//! Draw dispatcher: owns the swarm's GPU buffers and issues its draws.
//!
//! The dispatcher is either Uninitialized or Ready. Reaching Ready acquires
//! every buffer at once (vertex, index, instance transforms and indirect
//! commands); a failure partway drops whatever was already created, so no
//! partial state survives. Every other operation on an Uninitialized
//! dispatcher returns [`SwarmError::NotInitialized`].

use crate::error::SwarmError;
use crate::geometry::{SphereMesh, Vertex};
use crate::gpu::dynamic_buffer::TypedBuffer;
use crate::gpu::programs::ProgramSet;
use crate::instancing::{InstanceBuffer, InstanceStore};
use crate::renderer::indirect::IndirectBuffer;
use crate::renderer::plan::{DrawPlan, PassRecorder};
use crate::renderer::strategy::{DrawStrategy, InstanceSource};

/// What one dispatch issued, for diagnostics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DrawStats {
    /// Strategy that drew, `None` when the frame was skipped.
    pub strategy: Option<DrawStrategy>,
    /// API draw calls recorded.
    pub driver_calls: u32,
    /// Instances rendered.
    pub instances: u32,
}

impl From<&DrawPlan> for DrawStats {
    fn from(plan: &DrawPlan) -> Self {
        Self {
            strategy: plan.strategy(),
            driver_calls: plan.driver_calls(),
            instances: plan.instance_count(),
        }
    }
}

struct MeshBuffers {
    vertices: TypedBuffer<Vertex>,
    indices: TypedBuffer<u32>,
}

impl MeshBuffers {
    fn new(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        mesh: &SphereMesh,
    ) -> Result<Self, SwarmError> {
        Ok(Self {
            vertices: TypedBuffer::with_data(
                device,
                queue,
                "Sphere Vertex Buffer",
                mesh.vertices(),
                wgpu::BufferUsages::VERTEX,
            )?,
            indices: TypedBuffer::with_data(
                device,
                queue,
                "Sphere Index Buffer",
                mesh.indices(),
                wgpu::BufferUsages::INDEX,
            )?,
        })
    }

    fn index_count(&self) -> u32 {
        self.indices.count() as u32
    }
}

struct GpuResources {
    mesh: MeshBuffers,
    instances: InstanceBuffer,
    indirect: IndirectBuffer,
}

enum DispatcherState {
    Uninitialized,
    Ready(Box<GpuResources>),
}

/// Owns the mesh, instance and indirect buffers and records the swarm's
/// draws with the selected strategy.
pub struct DrawDispatcher {
    state: DispatcherState,
}

impl Default for DrawDispatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl DrawDispatcher {
    /// An Uninitialized dispatcher.
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: DispatcherState::Uninitialized,
        }
    }

    /// Acquire all GPU buffers and upload `mesh` and `store`.
    ///
    /// Calling this while Ready replaces the existing buffers.
    ///
    /// # Errors
    ///
    /// [`SwarmError::BufferAllocation`] if any buffer cannot be created.
    /// Buffers created before the failure are dropped and the dispatcher is
    /// left Uninitialized.
    pub fn initialize(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        mesh: &SphereMesh,
        store: &mut InstanceStore,
        instance_layout: &wgpu::BindGroupLayout,
    ) -> Result<(), SwarmError> {
        self.state = DispatcherState::Uninitialized;

        let mesh_buffers = MeshBuffers::new(device, queue, mesh)?;
        let mut instances =
            InstanceBuffer::new(device, instance_layout, store.max_count())?;
        let indirect = IndirectBuffer::new(device, 1)?;

        store.mark_dirty();
        let _ = instances.publish(device, queue, store)?;

        log::info!(
            "draw dispatcher ready: {} vertices, {} indices, {} instances (capacity {})",
            mesh.vertex_count(),
            mesh.index_count(),
            store.count(),
            instances.capacity()
        );
        self.state = DispatcherState::Ready(Box::new(GpuResources {
            mesh: mesh_buffers,
            instances,
            indirect,
        }));
        Ok(())
    }

    /// Whether buffers are acquired.
    pub fn is_ready(&self) -> bool {
        matches!(self.state, DispatcherState::Ready(_))
    }

    fn resources(&self) -> Result<&GpuResources, SwarmError> {
        match &self.state {
            DispatcherState::Ready(res) => Ok(res),
            DispatcherState::Uninitialized => Err(SwarmError::NotInitialized),
        }
    }

    fn resources_mut(&mut self) -> Result<&mut GpuResources, SwarmError> {
        match &mut self.state {
            DispatcherState::Ready(res) => Ok(res),
            DispatcherState::Uninitialized => Err(SwarmError::NotInitialized),
        }
    }

    /// Replace the GPU mesh with `mesh`, growing the buffers if needed.
    ///
    /// # Errors
    ///
    /// [`SwarmError::NotInitialized`] before [`initialize`](Self::initialize);
    /// [`SwarmError::BufferAllocation`] if growing fails.
    pub fn upload_mesh(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        mesh: &SphereMesh,
    ) -> Result<(), SwarmError> {
        let res = self.resources_mut()?;
        let _ = res.mesh.vertices.write(device, queue, mesh.vertices())?;
        let _ = res.mesh.indices.write(device, queue, mesh.indices())?;
        log::debug!(
            "mesh uploaded: {} vertices, {} indices",
            mesh.vertex_count(),
            mesh.index_count()
        );
        Ok(())
    }

    /// Republish instance transforms if the store changed.
    ///
    /// # Errors
    ///
    /// [`SwarmError::NotInitialized`] before [`initialize`](Self::initialize);
    /// [`SwarmError::BufferAllocation`] if growing fails.
    pub fn publish_instances(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        store: &mut InstanceStore,
    ) -> Result<bool, SwarmError> {
        self.resources_mut()?.instances.publish(device, queue, store)
    }

    /// Plan this frame's draws from the uploaded mesh and instance counts.
    ///
    /// # Errors
    ///
    /// [`SwarmError::NotInitialized`] before [`initialize`](Self::initialize).
    pub fn plan(&self, strategy: DrawStrategy) -> Result<DrawPlan, SwarmError> {
        let res = self.resources()?;
        Ok(DrawPlan::new(
            strategy,
            res.mesh.index_count(),
            res.instances.count(),
        ))
    }

    /// Write `plan`'s indirect commands, if any, ahead of the pass.
    ///
    /// # Errors
    ///
    /// [`SwarmError::NotInitialized`] before [`initialize`](Self::initialize).
    pub fn prepare_indirect(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        plan: &DrawPlan,
    ) -> Result<bool, SwarmError> {
        let res = self.resources_mut()?;
        let commands = plan.indirect_commands();
        if commands.is_empty() {
            return Ok(false);
        }
        res.indirect.update(device, queue, commands)
    }

    /// Bind `plan`'s program and buffers and record its draws into `pass`.
    ///
    /// A [`DrawPlan::Skip`] records nothing.
    ///
    /// # Errors
    ///
    /// [`SwarmError::NotInitialized`] before [`initialize`](Self::initialize).
    pub fn dispatch(
        &self,
        pass: &mut wgpu::RenderPass<'_>,
        programs: &ProgramSet,
        plan: &DrawPlan,
    ) -> Result<DrawStats, SwarmError> {
        let res = self.resources()?;
        let Some(strategy) = plan.strategy() else {
            return Ok(DrawStats::default());
        };

        let program = programs.select(strategy);
        pass.set_pipeline(program.pipeline);
        pass.set_bind_group(0, program.uniforms, &[]);
        pass.set_vertex_buffer(0, res.mesh.vertices.buffer().slice(..));
        pass.set_index_buffer(
            res.mesh.indices.buffer().slice(..),
            wgpu::IndexFormat::Uint32,
        );
        match strategy.instance_source() {
            InstanceSource::VertexAttribute => {
                pass.set_vertex_buffer(1, res.instances.buffer().slice(..));
            }
            InstanceSource::StorageBuffer => {
                pass.set_bind_group(1, res.instances.bind_group(), &[]);
            }
        }

        plan.encode(&mut PassRecorder::new(pass, res.indirect.buffer()));
        Ok(DrawStats::from(plan))
    }

    /// Drop every GPU buffer and return to Uninitialized. Returns whether
    /// anything was released.
    pub fn release(&mut self) -> bool {
        let was_ready = self.is_ready();
        self.state = DispatcherState::Uninitialized;
        if was_ready {
            log::debug!("draw dispatcher released");
        }
        was_ready
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_uninitialized() {
        let d = DrawDispatcher::new();
        assert!(!d.is_ready());
    }

    #[test]
    fn planning_before_initialize_is_not_initialized() {
        let d = DrawDispatcher::default();
        for strategy in DrawStrategy::ALL {
            assert!(matches!(d.plan(strategy), Err(SwarmError::NotInitialized)));
        }
    }

    #[test]
    fn release_when_uninitialized_is_a_no_op() {
        let mut d = DrawDispatcher::new();
        assert!(!d.release());
        assert!(!d.release());
        assert!(!d.is_ready());
    }

    #[test]
    fn stats_follow_the_plan() {
        let stats = DrawStats::from(&DrawPlan::new(DrawStrategy::MultiDraw, 36, 12));
        assert_eq!(stats.strategy, Some(DrawStrategy::MultiDraw));
        assert_eq!(stats.driver_calls, 12);
        assert_eq!(stats.instances, 12);

        let skipped = DrawStats::from(&DrawPlan::Skip);
        assert_eq!(skipped, DrawStats::default());
    }
}
