//! Exact-size GPU storage buffers of fixed-layout records.
//!
//! Unlike a growable buffer, a structured buffer is sized to exactly
//! `len × size_of::<T>()` bytes at creation and is replaced wholesale when
//! its contents change. Kernels read the element count with `arrayLength`,
//! so padding or spare capacity would show up as phantom records.

use std::marker::PhantomData;

use wgpu::util::DeviceExt;

/// A read-only storage buffer holding `len` records of `T`.
pub struct StructuredBuffer<T> {
    buffer: wgpu::Buffer,
    len: usize,
    _marker: PhantomData<T>,
}

impl<T: bytemuck::Pod> StructuredBuffer<T> {
    /// Upload `data` into a new buffer of exactly `data.len()` records.
    ///
    /// `data` must not be empty: zero-sized storage bindings are invalid.
    pub fn new_with_data(device: &wgpu::Device, label: &str, data: &[T]) -> Self {
        let buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(label),
            contents: bytemuck::cast_slice(data),
            usage: wgpu::BufferUsages::STORAGE | wgpu::BufferUsages::COPY_DST,
        });
        Self {
            buffer,
            len: data.len(),
            _marker: PhantomData,
        }
    }

    /// Size of one record in bytes.
    pub const fn stride() -> usize {
        std::mem::size_of::<T>()
    }

    /// The underlying GPU buffer.
    pub fn buffer(&self) -> &wgpu::Buffer {
        &self.buffer
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the buffer holds no records.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Allocated size in bytes.
    pub fn byte_size(&self) -> u64 {
        self.buffer.size()
    }

    /// Free the GPU allocation now rather than when the last bind group
    /// referencing it is dropped.
    pub fn release(self) {
        self.buffer.destroy();
    }
}
