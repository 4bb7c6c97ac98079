use crate::error::SwarmError;
use crate::gpu::dynamic_buffer::TypedBuffer;
use crate::instancing::layout::InstanceTransform;
use crate::instancing::store::InstanceStore;

/// Layout of the instance storage bind group (group 1 of the storage
/// program): one read-only `array<mat4x4<f32>>` visible to the vertex stage.
pub fn create_bind_group_layout(device: &wgpu::Device) -> wgpu::BindGroupLayout {
    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some("Instance Storage Layout"),
        entries: &[wgpu::BindGroupLayoutEntry {
            binding: 0,
            visibility: wgpu::ShaderStages::VERTEX,
            ty: wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Storage { read_only: true },
                has_dynamic_offset: false,
                min_binding_size: wgpu::BufferSize::new(
                    size_of::<InstanceTransform>() as u64,
                ),
            },
            count: None,
        }],
    })
}

/// GPU-resident instance transforms.
///
/// The same buffer is bound two ways: as vertex buffer slot 1 for the
/// instanced program, and as a storage buffer (through `bind_group`) for the
/// programs that index transforms by draw ID.
pub struct InstanceBuffer {
    transforms: TypedBuffer<InstanceTransform>,
    bind_group_layout: wgpu::BindGroupLayout,
    bind_group: wgpu::BindGroup,
}

impl InstanceBuffer {
    /// Allocate room for `capacity` transforms and build the storage bind
    /// group.
    ///
    /// # Errors
    ///
    /// [`SwarmError::BufferAllocation`] if the buffer cannot be created.
    pub fn new(
        device: &wgpu::Device,
        bind_group_layout: &wgpu::BindGroupLayout,
        capacity: u32,
    ) -> Result<Self, SwarmError> {
        let limit = device.limits().max_storage_buffer_binding_size;
        check_binding_size(capacity.max(1) as usize, u64::from(limit))?;
        let transforms = TypedBuffer::with_capacity(
            device,
            "Instance Transform Buffer",
            capacity.max(1) as usize,
            wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::STORAGE,
        )?;
        let bind_group =
            Self::create_bind_group(device, bind_group_layout, &transforms)?;

        Ok(Self {
            transforms,
            bind_group_layout: bind_group_layout.clone(),
            bind_group,
        })
    }

    fn create_bind_group(
        device: &wgpu::Device,
        layout: &wgpu::BindGroupLayout,
        transforms: &TypedBuffer<InstanceTransform>,
    ) -> Result<wgpu::BindGroup, SwarmError> {
        device.push_error_scope(wgpu::ErrorFilter::Validation);
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Instance Storage Bind Group"),
            layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: transforms.buffer().as_entire_binding(),
            }],
        });
        match pollster::block_on(device.pop_error_scope()) {
            Some(err) => Err(SwarmError::BufferAllocation {
                label: "Instance Storage Bind Group".to_owned(),
                reason: err.to_string(),
            }),
            None => Ok(bind_group),
        }
    }

    /// Upload the store's transforms if they changed since the last publish.
    ///
    /// Returns `true` when an upload happened.
    ///
    /// # Errors
    ///
    /// [`SwarmError::BufferAllocation`] if growing the buffer fails. The
    /// store stays dirty so the next publish retries.
    pub fn publish(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        store: &mut InstanceStore,
    ) -> Result<bool, SwarmError> {
        if !store.take_dirty() {
            return Ok(false);
        }

        let limit = device.limits().max_storage_buffer_binding_size;
        if let Err(e) = check_binding_size(store.transforms().len(), u64::from(limit)) {
            store.mark_dirty();
            return Err(e);
        }

        let reallocated = match self.transforms.write(device, queue, store.transforms()) {
            Ok(reallocated) => reallocated,
            Err(e) => {
                store.mark_dirty();
                return Err(e);
            }
        };
        if reallocated {
            match Self::create_bind_group(device, &self.bind_group_layout, &self.transforms) {
                Ok(bind_group) => self.bind_group = bind_group,
                Err(e) => {
                    store.mark_dirty();
                    return Err(e);
                }
            }
        }

        log::debug!(
            "published {} instance transforms (gen {})",
            store.count(),
            store.generation()
        );
        Ok(true)
    }

    /// Raw buffer, for binding as a per-instance vertex buffer.
    pub fn buffer(&self) -> &wgpu::Buffer {
        self.transforms.buffer()
    }

    /// Storage bind group for the draw-ID indexed programs.
    pub fn bind_group(&self) -> &wgpu::BindGroup {
        &self.bind_group
    }

    /// Number of transforms currently on the GPU.
    pub fn count(&self) -> u32 {
        self.transforms.count() as u32
    }

    /// Allocated capacity in transforms.
    pub fn capacity(&self) -> usize {
        self.transforms.capacity()
    }
}

/// Reject instance capacities whose transforms exceed one storage binding.
fn check_binding_size(transforms: usize, limit: u64) -> Result<(), SwarmError> {
    let bytes = (transforms as u64).saturating_mul(size_of::<InstanceTransform>() as u64);
    if bytes > limit {
        return Err(SwarmError::BufferAllocation {
            label: "Instance Transform Buffer".to_owned(),
            reason: format!(
                "{transforms} transforms ({bytes} bytes) exceed the \
                 storage binding limit of {limit}"
            ),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn binding_size_limit_is_enforced() {
        let limit = 128 << 20;
        assert!(check_binding_size(2_097_152, limit).is_ok());
        assert!(matches!(
            check_binding_size(3_000_000, limit),
            Err(SwarmError::BufferAllocation { .. })
        ));
        assert!(check_binding_size(usize::MAX, limit).is_err());
    }
}
