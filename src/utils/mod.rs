//! Utility Module
//!
//! - [`FrameClock`]: frame counting and frames-per-second estimation

pub mod frame_clock;

pub use frame_clock::{FrameClock, FrameTick};
