//! Growable GPU buffers with checked allocation.
//!
//! Buffers grow 2x when data exceeds capacity and never shrink. Every
//! allocation runs inside wgpu error scopes so an out-of-memory or
//! validation failure surfaces as a [`SwarmError::BufferAllocation`]
//! instead of a device-lost callback. A failed allocation drops whatever
//! the driver handed back, so no half-built buffer outlives the call.

use std::marker::PhantomData;

use crate::error::SwarmError;

/// Create a buffer, reporting driver-side failure as an error.
///
/// # Errors
///
/// [`SwarmError::BufferAllocation`] when the size exceeds the device limit
/// or the device reports an out-of-memory or validation error.
pub fn create_checked(
    device: &wgpu::Device,
    label: &str,
    size: u64,
    usage: wgpu::BufferUsages,
) -> Result<wgpu::Buffer, SwarmError> {
    let limit = device.limits().max_buffer_size;
    if size > limit {
        return Err(SwarmError::BufferAllocation {
            label: label.to_owned(),
            reason: format!("{size} bytes exceeds device limit of {limit}"),
        });
    }

    device.push_error_scope(wgpu::ErrorFilter::OutOfMemory);
    device.push_error_scope(wgpu::ErrorFilter::Validation);
    let buffer = device.create_buffer(&wgpu::BufferDescriptor {
        label: Some(label),
        size,
        usage,
        mapped_at_creation: false,
    });
    let validation = pollster::block_on(device.pop_error_scope());
    let out_of_memory = pollster::block_on(device.pop_error_scope());

    match validation.or(out_of_memory) {
        Some(err) => Err(SwarmError::BufferAllocation {
            label: label.to_owned(),
            reason: err.to_string(),
        }),
        None => Ok(buffer),
    }
}

/// A GPU buffer that can grow dynamically.
///
/// Uses a 2x growth strategy when capacity is exceeded.
/// Never shrinks (GPU buffers cannot be resized in place).
pub struct DynamicBuffer {
    buffer: wgpu::Buffer,
    capacity: usize, // Capacity in bytes
    len: usize,      // Current data length in bytes
    usage: wgpu::BufferUsages,
    label: String,
}

impl DynamicBuffer {
    /// Buffer with the given initial byte capacity.
    ///
    /// # Errors
    ///
    /// Propagates [`create_checked`] failures.
    pub fn new(
        device: &wgpu::Device,
        label: &str,
        initial_capacity: usize,
        usage: wgpu::BufferUsages,
    ) -> Result<Self, SwarmError> {
        let capacity = initial_capacity.max(64); // Minimum 64 bytes
        let buffer = create_checked(
            device,
            label,
            capacity as u64,
            usage | wgpu::BufferUsages::COPY_DST,
        )?;

        Ok(Self {
            buffer,
            capacity,
            len: 0,
            usage,
            label: label.to_owned(),
        })
    }

    /// Write data to buffer, growing if necessary.
    ///
    /// Returns `true` if buffer was reallocated (bind groups need recreation).
    ///
    /// # Errors
    ///
    /// Propagates [`create_checked`] failures; the old buffer and its
    /// contents are kept in that case.
    pub fn write<T: bytemuck::Pod>(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        data: &[T],
    ) -> Result<bool, SwarmError> {
        let data_bytes: &[u8] = bytemuck::cast_slice(data);
        let needed = data_bytes.len();

        let reallocated = if needed > self.capacity {
            // 2x growth, minimum 1KB
            let new_capacity = (needed * 2).max(self.capacity + 1024);
            self.buffer = create_checked(
                device,
                &self.label,
                new_capacity as u64,
                self.usage | wgpu::BufferUsages::COPY_DST,
            )?;
            log::debug!(
                "grew '{}' from {} to {} bytes",
                self.label,
                self.capacity,
                new_capacity
            );
            self.capacity = new_capacity;
            true
        } else {
            false
        };

        if needed > 0 {
            queue.write_buffer(&self.buffer, 0, data_bytes);
        }
        self.len = needed;

        Ok(reallocated)
    }

    /// The underlying wgpu buffer.
    pub fn buffer(&self) -> &wgpu::Buffer {
        &self.buffer
    }

    /// Bytes written by the last [`write`](Self::write).
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the last write was empty.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Allocated size in bytes.
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

/// Typed wrapper for [`DynamicBuffer`].
///
/// Tracks item count rather than byte length.
pub struct TypedBuffer<T> {
    inner: DynamicBuffer,
    count: usize,
    _marker: PhantomData<T>,
}

impl<T: bytemuck::Pod> TypedBuffer<T> {
    /// Buffer sized for `capacity` items.
    ///
    /// # Errors
    ///
    /// Propagates [`create_checked`] failures.
    pub fn with_capacity(
        device: &wgpu::Device,
        label: &str,
        capacity: usize,
        usage: wgpu::BufferUsages,
    ) -> Result<Self, SwarmError> {
        Ok(Self {
            inner: DynamicBuffer::new(
                device,
                label,
                size_of::<T>() * capacity,
                usage,
            )?,
            count: 0,
            _marker: PhantomData,
        })
    }

    /// Buffer sized for and filled with `data`.
    ///
    /// # Errors
    ///
    /// Propagates [`create_checked`] failures.
    pub fn with_data(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        label: &str,
        data: &[T],
        usage: wgpu::BufferUsages,
    ) -> Result<Self, SwarmError> {
        let mut buffer = Self::with_capacity(device, label, data.len(), usage)?;
        let _ = buffer.write(device, queue, data)?;
        Ok(buffer)
    }

    /// Write data to buffer, growing if necessary.
    ///
    /// Returns `true` if buffer was reallocated (bind groups need recreation).
    ///
    /// # Errors
    ///
    /// Propagates [`DynamicBuffer::write`] failures; the item count is left
    /// unchanged in that case.
    pub fn write(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        data: &[T],
    ) -> Result<bool, SwarmError> {
        let reallocated = self.inner.write(device, queue, data)?;
        self.count = data.len();
        Ok(reallocated)
    }

    /// The underlying wgpu buffer.
    pub fn buffer(&self) -> &wgpu::Buffer {
        self.inner.buffer()
    }

    /// Items written by the last write.
    pub fn count(&self) -> usize {
        self.count
    }

    /// Whether the last write was empty.
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Allocated capacity in items.
    pub fn capacity(&self) -> usize {
        self.inner.capacity() / size_of::<T>()
    }
}
