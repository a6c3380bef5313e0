//! Game Settings
//!
//! [`GameSettings`] gathers every tunable of the prototype: window, shader
//! resource, movement and presentation.
//!
//! ```rust,ignore
//! use asteroids::{App, GameSettings};
//!
//! let settings = GameSettings {
//!     vsync: true,
//!     movement_ratio: 1.5,
//!     ..Default::default()
//! };
//!
//! App::new().with_settings(settings).run()?;
//! ```

use std::path::PathBuf;

/// Default location of the combined vertex/fragment shader resource.
pub const DEFAULT_SHADER_PATH: &str = "assets/shaders/basic.shader";

/// Configuration for a game session.
#[derive(Debug, Clone)]
pub struct GameSettings {
    /// Window title.
    pub title: String,
    /// Initial window width in pixels.
    pub width: u32,
    /// Initial window height in pixels.
    pub height: u32,

    /// Path of the combined shader resource (`#shader vertex` / `#shader fragment`).
    pub shader_path: PathBuf,

    /// Distance covered per second of key presses: one press moves
    /// `movement_ratio / fps` in normalized device coordinates.
    pub movement_ratio: f32,
    /// Step used before the first frame-rate estimate is available.
    pub fallback_step: f32,

    /// Synchronize presentation with the display refresh rate.
    ///
    /// Off by default: the prototype renders as fast as the GPU allows.
    pub vsync: bool,
    /// Background color.
    pub clear_color: wgpu::Color,
    /// GPU adapter preference.
    pub power_preference: wgpu::PowerPreference,
}

impl Default for GameSettings {
    fn default() -> Self {
        Self {
            title: "Asteroids".into(),
            width: 640,
            height: 480,
            shader_path: PathBuf::from(DEFAULT_SHADER_PATH),
            movement_ratio: 12.0,
            fallback_step: 0.005,
            vsync: false,
            clear_color: wgpu::Color::BLACK,
            power_preference: wgpu::PowerPreference::default(),
        }
    }
}
