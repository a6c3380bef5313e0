//! Graphics Driver Abstraction
//!
//! The game talks to the GPU through [`GraphicsDriver`], a fixed, GL-style
//! command set: shader objects, program objects, buffer objects, vertex
//! attribute declarations, clear, draw and present.
//!
//! Keeping the command set behind a trait decouples the shader pipeline and
//! mesh code from a particular backend. The production implementation is
//! [`WgpuDriver`]; tests drive the same code through a recording fake.
//!
//! # Handles
//!
//! Every driver object is addressed by a typed [`slotmap`] key
//! ([`ShaderId`], [`ProgramId`], [`BufferId`]). Handles are plain `Copy`
//! values; ownership and release are expressed one level up by the RAII
//! wrappers in [`crate::shader`] and [`crate::mesh`].
//!
//! # Interior mutability
//!
//! All commands take `&self`. Owning wrappers keep an `Rc` to the driver and
//! release their handle in `Drop`, which requires several of them to be alive
//! at once. Implementations keep their object tables in a `RefCell`; the game
//! is single-threaded.

use std::fmt;

use thiserror::Error;

pub mod wgpu_driver;
pub mod wgsl;

pub use wgpu_driver::WgpuDriver;

slotmap::new_key_type! {
    /// Handle to a driver-side shader object.
    pub struct ShaderId;
    /// Handle to a driver-side program object.
    pub struct ProgramId;
    /// Handle to a driver-side buffer object.
    pub struct BufferId;
}

/// One phase of the shader pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShaderStage {
    Vertex,
    Fragment,
}

impl ShaderStage {
    /// Lowercase stage name, as used in shader directive lines.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Vertex => "vertex",
            Self::Fragment => "fragment",
        }
    }
}

impl fmt::Display for ShaderStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Binding point for buffer commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BufferTarget {
    /// Per-vertex attribute data.
    Array,
}

/// How often the contents of a buffer are expected to change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BufferUsage {
    /// Uploaded once.
    Static,
    /// Expected to be rewritten.
    Dynamic,
}

/// Primitive assembly mode for [`GraphicsDriver::draw_arrays`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Topology {
    /// Every three vertices form one triangle.
    Triangles,
}

/// Layout of one float vertex attribute inside the currently bound array buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VertexAttribute {
    /// Shader input location.
    pub location: u32,
    /// Number of `f32` components (1..=4).
    pub components: u32,
    /// Distance in bytes between consecutive vertices.
    pub stride: u64,
    /// Byte offset of the first component.
    pub offset: u64,
}

impl VertexAttribute {
    /// A tightly packed `f32` attribute: stride = `components` x 4 bytes, no offset.
    #[must_use]
    pub const fn packed_f32(location: u32, components: u32) -> Self {
        Self {
            location,
            components,
            stride: components as u64 * std::mem::size_of::<f32>() as u64,
            offset: 0,
        }
    }
}

/// Errors reported by a [`GraphicsDriver`] command.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DriverError {
    #[error("unknown shader handle")]
    UnknownShader,

    #[error("unknown program handle")]
    UnknownProgram,

    #[error("unknown buffer handle")]
    UnknownBuffer,

    #[error("no buffer bound to {0:?} target")]
    NoBufferBound(BufferTarget),

    #[error("buffer has no data store")]
    BufferUninitialized,

    #[error("write of {len} bytes at offset {offset} exceeds buffer size {size}")]
    RangeOutOfBounds { offset: u64, len: u64, size: u64 },

    #[error("write of {len} bytes at offset {offset} is not 4-byte aligned")]
    MisalignedWrite { offset: u64, len: u64 },

    #[error("no linked program in use")]
    NoProgramInUse,

    #[error("unsupported vertex attribute at location {location} ({components} components)")]
    UnsupportedAttribute { location: u32, components: u32 },

    #[error("attributes sharing one buffer declare different strides")]
    StrideConflict,

    #[error("pipeline creation failed: {0}")]
    Pipeline(String),

    #[error("surface error: {0}")]
    Surface(String),
}

/// The fixed command set the game consumes from the graphics backend.
///
/// Status queries follow the compile/link/validate model: a command records
/// its outcome on the object, and the caller inspects it with the matching
/// status and info-log query.
pub trait GraphicsDriver {
    // ------------------------------------------------------------------
    // Shader objects
    // ------------------------------------------------------------------

    /// Allocates a shader object for `stage`.
    fn create_shader(&self, stage: ShaderStage) -> ShaderId;

    /// Replaces the source text of a shader object.
    fn shader_source(&self, shader: ShaderId, source: &str);

    /// Compiles the current source; the outcome is read with
    /// [`compile_status`](Self::compile_status).
    fn compile_shader(&self, shader: ShaderId);

    fn compile_status(&self, shader: ShaderId) -> bool;

    fn shader_info_log(&self, shader: ShaderId) -> String;

    fn delete_shader(&self, shader: ShaderId);

    // ------------------------------------------------------------------
    // Program objects
    // ------------------------------------------------------------------

    fn create_program(&self) -> ProgramId;

    fn attach_shader(&self, program: ProgramId, shader: ShaderId);

    fn detach_shader(&self, program: ProgramId, shader: ShaderId);

    /// Links the attached stages; the outcome is read with
    /// [`link_status`](Self::link_status).
    fn link_program(&self, program: ProgramId);

    fn link_status(&self, program: ProgramId) -> bool;

    /// Checks whether the program can execute against the current vertex
    /// attribute state; the outcome is read with
    /// [`validate_status`](Self::validate_status).
    fn validate_program(&self, program: ProgramId);

    fn validate_status(&self, program: ProgramId) -> bool;

    fn program_info_log(&self, program: ProgramId) -> String;

    fn use_program(&self, program: ProgramId);

    fn delete_program(&self, program: ProgramId);

    // ------------------------------------------------------------------
    // Buffer objects
    // ------------------------------------------------------------------

    /// Reserves `count` buffer names. No data store is created until
    /// [`buffer_data`](Self::buffer_data).
    fn gen_buffers(&self, count: usize) -> Vec<BufferId>;

    fn bind_buffer(&self, target: BufferTarget, buffer: BufferId);

    /// Creates the data store of the bound buffer with `data` as its contents.
    fn buffer_data(
        &self,
        target: BufferTarget,
        data: &[u8],
        usage: BufferUsage,
    ) -> Result<(), DriverError>;

    /// Replaces `data.len()` bytes of the bound buffer starting at `offset`.
    fn buffer_sub_data(
        &self,
        target: BufferTarget,
        offset: u64,
        data: &[u8],
    ) -> Result<(), DriverError>;

    fn delete_buffer(&self, buffer: BufferId);

    // ------------------------------------------------------------------
    // Vertex attributes
    // ------------------------------------------------------------------

    fn enable_vertex_attrib_array(&self, location: u32);

    /// Declares `attribute` as sourced from the buffer currently bound to
    /// [`BufferTarget::Array`].
    fn vertex_attrib_pointer(&self, attribute: VertexAttribute) -> Result<(), DriverError>;

    // ------------------------------------------------------------------
    // Frame
    // ------------------------------------------------------------------

    /// Clears the color buffer of the current frame.
    fn clear(&self, color: wgpu::Color);

    /// Draws `count` vertices starting at `first` with the program in use.
    fn draw_arrays(&self, mode: Topology, first: u32, count: u32) -> Result<(), DriverError>;

    /// Submits the recorded frame and presents it.
    fn present(&self) -> Result<(), DriverError>;

    /// Adapts the presentation surface to a new framebuffer size.
    fn resize(&self, width: u32, height: u32);
}
