//! Error Types
//!
//! This module defines the error types used throughout the game.
//!
//! # Overview
//!
//! The main error type [`Error`] covers all failure modes including:
//! - Window and event loop bootstrapping failures
//! - GPU adapter, surface and device initialization failures
//! - Shader compile, link and validation failures
//! - Mesh buffer contract violations
//!
//! # Usage
//!
//! All public APIs return [`Result<T>`] which is an alias for `std::result::Result<T, Error>`.
//!
//! ```rust,ignore
//! use asteroids::errors::Result;
//!
//! fn build() -> Result<()> {
//!     // Operations that may fail return Result
//!     Ok(())
//! }
//! ```

use std::path::PathBuf;

use thiserror::Error;

use crate::driver::{DriverError, ShaderStage};

/// The main error type for the game.
#[derive(Error, Debug)]
pub enum Error {
    // ========================================================================
    // Window & Driver Bootstrapping
    // ========================================================================
    /// The windowing subsystem (event loop) could not be started.
    #[error("Failed to initialize windowing subsystem: {0}")]
    WindowInit(#[from] winit::error::EventLoopError),

    /// The window could not be created.
    #[error("Failed to create window: {0}")]
    WindowCreate(#[from] winit::error::OsError),

    /// Failed to create the surface or request a compatible adapter.
    #[error("Failed to initialize graphics driver: {0}")]
    DriverInit(String),

    /// Failed to create the GPU device.
    #[error("Failed to create WGPU device: {0}")]
    DeviceCreate(#[from] wgpu::RequestDeviceError),

    // ========================================================================
    // Shader Program Construction
    // ========================================================================
    /// A shader stage failed to compile.
    #[error("Failed to compile {stage} shader:\n{log}")]
    ShaderCompile {
        /// The stage that failed
        stage: ShaderStage,
        /// Driver-provided diagnostic log
        log: String,
    },

    /// The program failed to link.
    #[error("Failed to link shader program:\n{log}")]
    ShaderLink {
        /// Driver-provided diagnostic log
        log: String,
    },

    /// The linked program failed validation.
    #[error("Shader program failed validation:\n{log}")]
    ShaderValidate {
        /// Driver-provided diagnostic log
        log: String,
    },

    // ========================================================================
    // Mesh Buffers
    // ========================================================================
    /// A rewrite payload does not match the declared buffer size.
    #[error("Buffer size mismatch: declared {expected} bytes, got {actual}")]
    SizeMismatch {
        /// Declared size in bytes
        expected: usize,
        /// Size of the rejected payload in bytes
        actual: usize,
    },

    /// A mesh buffer was used without any reserved buffer id.
    #[error("Mesh buffer has no allocated GPU buffer")]
    BufferNotAllocated,

    /// A rewrite was attempted before the buffer was initialized.
    #[error("Mesh buffer was rewritten before initialization")]
    BufferNotInitialized,

    /// The driver rejected a command.
    #[error("Graphics driver error: {0}")]
    Driver(#[from] DriverError),

    // ========================================================================
    // I/O
    // ========================================================================
    /// Reading a resource file failed.
    #[error("Failed to read {}: {source}", path.display())]
    Io {
        /// The resource path
        path: PathBuf,
        /// The underlying I/O error
        source: std::io::Error,
    },
}

impl From<wgpu::CreateSurfaceError> for Error {
    fn from(err: wgpu::CreateSurfaceError) -> Self {
        Error::DriverInit(err.to_string())
    }
}

impl From<wgpu::RequestAdapterError> for Error {
    fn from(err: wgpu::RequestAdapterError) -> Self {
        Error::DriverInit(err.to_string())
    }
}

/// Alias for `Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;
