#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod app;
pub mod driver;
pub mod errors;
pub mod input;
pub mod mesh;
pub mod player;
pub mod settings;
pub mod shader;
pub mod utils;

pub use app::{App, LoopState, Session};
pub use driver::{GraphicsDriver, WgpuDriver};
pub use errors::{Error, Result};
pub use input::{InputTranslator, Key, KeyAction, MovementCommand};
pub use mesh::GpuMeshBuffer;
pub use player::Player;
pub use settings::GameSettings;
pub use shader::{ShaderProgram, ShaderSource};
