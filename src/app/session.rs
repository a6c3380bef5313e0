use std::rc::Rc;

use crate::driver::{GraphicsDriver, Topology};
use crate::errors::Result;
use crate::input::{InputTranslator, Key, KeyAction};
use crate::player::{PLAYER_VERTEX_COUNT, Player};
use crate::settings::GameSettings;
use crate::shader::{ShaderProgram, ShaderSource, build_program};
use crate::utils::FrameClock;

/// The running game: the active program, the player and the frame clock.
///
/// Dropping the session releases the program and the player's buffers
/// before the last reference to the driver goes away.
pub struct Session<D: GraphicsDriver + ?Sized> {
    program: ShaderProgram<D>,
    player: Player<D>,
    translator: InputTranslator,
    clock: FrameClock,
    clear_color: wgpu::Color,
    driver: Rc<D>,
}

impl<D: GraphicsDriver + ?Sized> Session<D> {
    /// Uploads the player, builds the program from `settings.shader_path`
    /// and makes it current.
    pub fn start(driver: Rc<D>, settings: &GameSettings) -> Result<Self> {
        let player = Player::load(&driver)?;
        let source = ShaderSource::load(&settings.shader_path)?;
        Self::assemble(driver, player, &source, settings)
    }

    /// Same as [`start`](Self::start) with an already split shader resource.
    pub fn start_with_source(driver: Rc<D>, source: &ShaderSource, settings: &GameSettings) -> Result<Self> {
        let player = Player::load(&driver)?;
        Self::assemble(driver, player, source, settings)
    }

    fn assemble(driver: Rc<D>, player: Player<D>, source: &ShaderSource, settings: &GameSettings) -> Result<Self> {
        let program = build_program(&driver, source)?;
        program.activate();
        log::info!("Shader program ready");

        Ok(Self {
            program,
            player,
            translator: InputTranslator::from_settings(settings),
            clock: FrameClock::new(),
            clear_color: settings.clear_color,
            driver,
        })
    }

    /// Applies one key event to the player.
    pub fn handle_key(&mut self, key: Key, action: KeyAction) -> Result<()> {
        let Some(command) = self.translator.translate(key, action, self.clock.fps()) else {
            return Ok(());
        };
        log::debug!("{key:?} {action:?} -> {:?}", command.delta);
        self.player.apply(command)
    }

    /// Records and presents one frame.
    pub fn frame(&mut self) -> Result<()> {
        let tick = self.clock.tick();
        if let Some(fps) = tick.report {
            log::info!("FPS: {fps:.1}");
        }

        self.driver.clear(self.clear_color);
        self.driver
            .draw_arrays(Topology::Triangles, 0, PLAYER_VERTEX_COUNT)?;
        self.driver.present()?;
        Ok(())
    }

    #[must_use]
    pub fn player(&self) -> &Player<D> {
        &self.player
    }

    #[must_use]
    pub fn program(&self) -> &ShaderProgram<D> {
        &self.program
    }

    #[must_use]
    pub fn driver(&self) -> &Rc<D> {
        &self.driver
    }
}
