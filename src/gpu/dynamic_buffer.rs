//! Growable typed GPU buffers.
//!
//! Instance sets grow and shrink as shapes change, so their storage buffers
//! are reallocated with a 2x growth strategy when data exceeds capacity.
//! Buffers never shrink (GPU buffers cannot be resized in place).

use std::marker::PhantomData;

use wgpu::util::DeviceExt;

/// A typed GPU buffer that grows on demand. Tracks item count.
pub struct TypedBuffer<T> {
    buffer: wgpu::Buffer,
    /// Capacity in items.
    capacity: usize,
    count: usize,
    usage: wgpu::BufferUsages,
    label: String,
    _marker: PhantomData<T>,
}

impl<T: bytemuck::Pod> TypedBuffer<T> {
    /// Buffer initialized from `data`. Empty data still allocates one item so
    /// the buffer can be bound.
    pub fn new_with_data(
        device: &wgpu::Device,
        label: &str,
        data: &[T],
        usage: wgpu::BufferUsages,
    ) -> Self {
        let zeroed = [T::zeroed()];
        let contents = if data.is_empty() { &zeroed[..] } else { data };
        let buffer =
            device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(label),
                contents: bytemuck::cast_slice(contents),
                usage: usage | wgpu::BufferUsages::COPY_DST,
            });
        Self {
            buffer,
            capacity: contents.len(),
            count: data.len(),
            usage,
            label: label.to_owned(),
            _marker: PhantomData,
        }
    }

    /// Write `data`, growing the buffer if necessary.
    ///
    /// Returns `true` if the buffer was reallocated (bind groups need
    /// recreation).
    pub fn write(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        data: &[T],
    ) -> bool {
        let reallocated = data.len() > self.capacity;
        if reallocated {
            let capacity = (data.len() * 2).max(self.capacity + 64);
            self.buffer = device.create_buffer(&wgpu::BufferDescriptor {
                label: Some(&self.label),
                size: (capacity * size_of::<T>()) as u64,
                usage: self.usage | wgpu::BufferUsages::COPY_DST,
                mapped_at_creation: false,
            });
            self.capacity = capacity;
        }
        if !data.is_empty() {
            queue.write_buffer(&self.buffer, 0, bytemuck::cast_slice(data));
        }
        self.count = data.len();
        reallocated
    }

    /// The underlying buffer.
    pub fn buffer(&self) -> &wgpu::Buffer {
        &self.buffer
    }

    /// Items written by the last write.
    pub fn count(&self) -> usize {
        self.count
    }

    /// Capacity in items.
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
