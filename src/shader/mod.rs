//! Shader Pipeline
//!
//! Startup path from a combined shader resource to an active program:
//!
//! 1. [`ShaderSource`] splits the resource into vertex and fragment text.
//! 2. [`compile`] turns each text into a [`CompiledStage`].
//! 3. [`link`] attaches, links and validates both stages into a
//!    [`ShaderProgram`], releasing the stages.
//!
//! [`build_program`] runs the whole sequence. Every driver object is owned by
//! an RAII wrapper, so each handle is released exactly once on every path.
//!
//! ```rust,ignore
//! let source = ShaderSource::load("assets/shaders/basic.shader")?;
//! let program = build_program(&driver, &source)?;
//! program.activate();
//! ```

pub mod compiler;
pub mod program;
pub mod source;

pub use compiler::{CompiledStage, compile};
pub use program::{ShaderProgram, build_program, link};
pub use source::ShaderSource;
