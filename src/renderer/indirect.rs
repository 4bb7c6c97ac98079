//! GPU-resident indirect draw commands.

use crate::error::SwarmError;
use crate::gpu::dynamic_buffer::TypedBuffer;

/// Indexed indirect draw command, five packed `u32`s:
/// `[index_count, instance_count, first_index, base_vertex, base_instance]`.
///
/// Matches the layout `multi_draw_indexed_indirect` consumes. `base_vertex`
/// is always zero here, so the unsigned field is bit-identical to the
/// signed one the API defines.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct IndirectCommand {
    /// Number of indices per draw.
    pub index_count: u32,
    /// Number of instances to draw.
    pub instance_count: u32,
    /// First index in the index buffer.
    pub first_index: u32,
    /// Value added to each index.
    pub base_vertex: u32,
    /// First instance ID.
    pub base_instance: u32,
}

impl IndirectCommand {
    /// Draw the whole mesh `instance_count` times.
    #[must_use]
    pub fn whole_mesh(index_count: u32, instance_count: u32) -> Self {
        Self {
            index_count,
            instance_count,
            first_index: 0,
            base_vertex: 0,
            base_instance: 0,
        }
    }
}

/// Indirect command buffer holding the current frame's commands.
///
/// Commands are rewritten only when they differ from what the buffer
/// already holds.
pub struct IndirectBuffer {
    commands: TypedBuffer<IndirectCommand>,
    current: Vec<IndirectCommand>,
}

impl IndirectBuffer {
    /// Allocate room for `capacity` commands.
    ///
    /// # Errors
    ///
    /// [`SwarmError::BufferAllocation`] if the buffer cannot be created.
    pub fn new(device: &wgpu::Device, capacity: usize) -> Result<Self, SwarmError> {
        Ok(Self {
            commands: TypedBuffer::with_capacity(
                device,
                "Indirect Command Buffer",
                capacity.max(1),
                wgpu::BufferUsages::INDIRECT,
            )?,
            current: Vec::new(),
        })
    }

    /// Make the GPU copy hold exactly `commands`. Returns `true` if a write
    /// was issued.
    ///
    /// # Errors
    ///
    /// [`SwarmError::BufferAllocation`] if growing the buffer fails.
    pub fn update(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        commands: &[IndirectCommand],
    ) -> Result<bool, SwarmError> {
        if self.current == commands {
            return Ok(false);
        }
        let _ = self.commands.write(device, queue, commands)?;
        self.current.clear();
        self.current.extend_from_slice(commands);
        log::debug!("indirect commands updated: {commands:?}");
        Ok(true)
    }

    /// Commands the GPU buffer currently holds.
    pub fn commands(&self) -> &[IndirectCommand] {
        &self.current
    }

    /// The underlying wgpu buffer.
    pub fn buffer(&self) -> &wgpu::Buffer {
        self.commands.buffer()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_is_five_packed_words() {
        assert_eq!(size_of::<IndirectCommand>(), 20);
        let cmd = IndirectCommand::whole_mesh(2790, 10_000);
        let words: &[u32] = bytemuck::cast_slice(std::slice::from_ref(&cmd));
        assert_eq!(words, &[2790, 10_000, 0, 0, 0]);
    }

    #[test]
    fn matches_wgpu_indexed_indirect_layout() {
        let cmd = IndirectCommand::whole_mesh(36, 4);
        let args = wgpu::util::DrawIndexedIndirectArgs {
            index_count: 36,
            instance_count: 4,
            first_index: 0,
            base_vertex: 0,
            first_instance: 0,
        };
        assert_eq!(bytemuck::bytes_of(&cmd), args.as_bytes());
    }
}
