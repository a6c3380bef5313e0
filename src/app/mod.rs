//! Application Layer
//!
//! - [`Session`]: everything acquired at startup (driver, program, player)
//!   plus the per-frame logic, independent of the windowing library
//! - [`App`]: builder that owns the winit event loop and drives a
//!   [`Session`] through the [`LoopState`] machine
//! - [`input_adapter`]: winit event translation into [`crate::input`] types

pub mod input_adapter;
pub mod session;
pub mod winit;

pub use self::session::Session;
pub use self::winit::App;

/// Lifecycle of the main loop.
///
/// `Initializing` moves to `Running` once every startup step succeeded, or
/// straight to `ShuttingDown` on the first failure. `ShuttingDown` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoopState {
    #[default]
    Initializing,
    Running,
    ShuttingDown,
}
