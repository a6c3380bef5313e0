use std::rc::Rc;

use super::compiler::{self, CompiledStage};
use super::source::ShaderSource;
use crate::driver::{GraphicsDriver, ProgramId, ShaderStage};
use crate::errors::{Error, Result};

/// A linked and validated shader program.
///
/// Owns the driver program object and deletes it when dropped.
pub struct ShaderProgram<D: GraphicsDriver + ?Sized> {
    driver: Rc<D>,
    id: ProgramId,
}

impl<D: GraphicsDriver + ?Sized> ShaderProgram<D> {
    #[must_use]
    pub fn id(&self) -> ProgramId {
        self.id
    }

    /// Makes this program current for subsequent draws.
    pub fn activate(&self) {
        self.driver.use_program(self.id);
    }
}

impl<D: GraphicsDriver + ?Sized> Drop for ShaderProgram<D> {
    fn drop(&mut self) {
        self.driver.delete_program(self.id);
    }
}

/// Links a vertex and a fragment stage into a program.
///
/// Both stages are consumed: they are detached and released whatever the
/// outcome. A failed validation is fatal, like a failed link.
pub fn link<D: GraphicsDriver + ?Sized>(
    driver: &Rc<D>,
    vertex: CompiledStage<D>,
    fragment: CompiledStage<D>,
) -> Result<ShaderProgram<D>> {
    debug_assert_eq!(vertex.stage(), ShaderStage::Vertex);
    debug_assert_eq!(fragment.stage(), ShaderStage::Fragment);

    let program = ShaderProgram {
        driver: Rc::clone(driver),
        id: driver.create_program(),
    };

    driver.attach_shader(program.id, vertex.id());
    driver.attach_shader(program.id, fragment.id());

    driver.link_program(program.id);
    let linked = driver.link_status(program.id);

    let validated = linked && {
        driver.validate_program(program.id);
        driver.validate_status(program.id)
    };
    if linked {
        log::info!(
            "Shader program validation: {}",
            if validated { "ok" } else { "failed" }
        );
    }

    let log = if validated {
        String::new()
    } else {
        driver.program_info_log(program.id)
    };

    driver.detach_shader(program.id, vertex.id());
    driver.detach_shader(program.id, fragment.id());
    drop(vertex);
    drop(fragment);

    if !linked {
        log::error!("Failed to link shader program!\n{log}");
        return Err(Error::ShaderLink { log });
    }
    if !validated {
        log::error!("Shader program is not valid!\n{log}");
        return Err(Error::ShaderValidate { log });
    }

    Ok(program)
}

/// Compiles both stages of `source` and links them.
///
/// Stops at the first failure; nothing acquired on the way is leaked.
pub fn build_program<D: GraphicsDriver + ?Sized>(
    driver: &Rc<D>,
    source: &ShaderSource,
) -> Result<ShaderProgram<D>> {
    let vertex = compiler::compile(driver, ShaderStage::Vertex, &source.vertex)?;
    let fragment = compiler::compile(driver, ShaderStage::Fragment, &source.fragment)?;
    link(driver, vertex, fragment)
}
