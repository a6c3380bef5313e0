//! GPU Mesh Buffers
//!
//! [`GpuMeshBuffer`] owns GPU buffer objects together with a host-side
//! mirror of the committed contents. The mirror and the GPU store stay
//! identical: a rewrite that the driver rejects leaves both untouched.

use std::rc::Rc;

use smallvec::SmallVec;

use crate::driver::{BufferId, BufferTarget, BufferUsage, GraphicsDriver, VertexAttribute};
use crate::errors::{Error, Result};

/// Owned GPU vertex buffer with a host mirror.
///
/// Buffer names are reserved by [`allocate`](Self::allocate); the first one
/// is the store that [`initialize`](Self::initialize) and
/// [`rewrite`](Self::rewrite) operate on. All reserved names are deleted on
/// drop.
pub struct GpuMeshBuffer<D: GraphicsDriver + ?Sized> {
    driver: Rc<D>,
    buffers: SmallVec<[BufferId; 1]>,
    target: BufferTarget,
    usage: BufferUsage,
    byte_size: usize,
    mirror: Vec<u8>,
    initialized: bool,
}

impl<D: GraphicsDriver + ?Sized> GpuMeshBuffer<D> {
    /// Reserves `count` buffer names.
    #[must_use]
    pub fn allocate(driver: &Rc<D>, count: usize) -> Self {
        Self {
            driver: Rc::clone(driver),
            buffers: driver.gen_buffers(count).into_iter().collect(),
            target: BufferTarget::Array,
            usage: BufferUsage::Static,
            byte_size: 0,
            mirror: Vec::new(),
            initialized: false,
        }
    }

    /// Binds the buffer under `target` and uploads `data` as its full contents.
    ///
    /// `data.len()` becomes the declared size every later rewrite must match.
    pub fn initialize(&mut self, target: BufferTarget, data: &[u8], usage: BufferUsage) -> Result<()> {
        let buffer = self.primary()?;

        self.driver.bind_buffer(target, buffer);
        self.driver.buffer_data(target, data, usage)?;

        self.target = target;
        self.usage = usage;
        self.byte_size = data.len();
        self.mirror.clear();
        self.mirror.extend_from_slice(data);
        self.initialized = true;
        Ok(())
    }

    /// Declares how the vertex stage reads this buffer.
    pub fn declare_layout(&self, attribute: VertexAttribute) -> Result<()> {
        let buffer = self.primary()?;

        self.driver.bind_buffer(BufferTarget::Array, buffer);
        self.driver.enable_vertex_attrib_array(attribute.location);
        self.driver.vertex_attrib_pointer(attribute)?;
        Ok(())
    }

    /// Replaces the entire contents with `data`.
    ///
    /// `data` must be exactly the declared size; otherwise
    /// [`Error::SizeMismatch`] is returned before anything is sent to the GPU.
    pub fn rewrite(&mut self, data: &[u8]) -> Result<()> {
        let buffer = self.primary()?;
        if !self.initialized {
            return Err(Error::BufferNotInitialized);
        }
        if data.len() != self.byte_size {
            return Err(Error::SizeMismatch {
                expected: self.byte_size,
                actual: data.len(),
            });
        }

        self.driver.bind_buffer(self.target, buffer);
        self.driver.buffer_sub_data(self.target, 0, data)?;

        self.mirror.copy_from_slice(data);
        Ok(())
    }

    /// The last contents the GPU accepted.
    #[must_use]
    pub fn contents(&self) -> &[u8] {
        &self.mirror
    }

    /// Size in bytes declared by [`initialize`](Self::initialize).
    #[must_use]
    pub fn byte_size(&self) -> usize {
        self.byte_size
    }

    #[must_use]
    pub fn usage(&self) -> BufferUsage {
        self.usage
    }

    /// Reserved buffer names; the first is the data store.
    #[must_use]
    pub fn buffers(&self) -> &[BufferId] {
        &self.buffers
    }

    fn primary(&self) -> Result<BufferId> {
        self.buffers.first().copied().ok_or(Error::BufferNotAllocated)
    }
}

impl<D: GraphicsDriver + ?Sized> Drop for GpuMeshBuffer<D> {
    fn drop(&mut self) {
        for buffer in self.buffers.drain(..) {
            self.driver.delete_buffer(buffer);
        }
    }
}
