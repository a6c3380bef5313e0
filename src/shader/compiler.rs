use std::rc::Rc;

use crate::driver::{GraphicsDriver, ShaderId, ShaderStage};
use crate::errors::{Error, Result};

/// A successfully compiled shader stage.
///
/// Owns the driver shader object and deletes it when dropped.
pub struct CompiledStage<D: GraphicsDriver + ?Sized> {
    driver: Rc<D>,
    id: ShaderId,
    stage: ShaderStage,
}

impl<D: GraphicsDriver + ?Sized> CompiledStage<D> {
    #[must_use]
    pub fn id(&self) -> ShaderId {
        self.id
    }

    #[must_use]
    pub fn stage(&self) -> ShaderStage {
        self.stage
    }
}

impl<D: GraphicsDriver + ?Sized> Drop for CompiledStage<D> {
    fn drop(&mut self) {
        self.driver.delete_shader(self.id);
    }
}

/// Compiles `source` as a `stage` shader.
///
/// On failure the driver log is reported and returned as
/// [`Error::ShaderCompile`]; the failed shader object is released.
pub fn compile<D: GraphicsDriver + ?Sized>(
    driver: &Rc<D>,
    stage: ShaderStage,
    source: &str,
) -> Result<CompiledStage<D>> {
    let compiled = CompiledStage {
        driver: Rc::clone(driver),
        id: driver.create_shader(stage),
        stage,
    };

    driver.shader_source(compiled.id, source);
    driver.compile_shader(compiled.id);

    if !driver.compile_status(compiled.id) {
        let log = driver.shader_info_log(compiled.id);
        log::error!("Failed to compile {stage} shader!\n{log}");
        return Err(Error::ShaderCompile { stage, log });
    }

    log::debug!("Compiled {stage} shader");
    Ok(compiled)
}
