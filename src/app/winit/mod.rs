//! Winit-based main loop
//!
//! [`App`] configures and launches the game; the internal `GameRunner`
//! implements winit's `ApplicationHandler` and moves through
//! [`LoopState`]:
//!
//! - `resumed`: create the window, the [`WgpuDriver`] and the [`Session`].
//!   The first failure is logged, kept as the result of [`App::run`], and
//!   ends the loop.
//! - `window_event`: key events feed the session, redraws render a frame.
//! - `CloseRequested`: drop the session and exit.
//!
//! ```rust,ignore
//! fn main() -> asteroids::errors::Result<()> {
//!     App::new().with_title("Asteroids").run()
//! }
//! ```

use std::rc::Rc;
use std::sync::Arc;

use winit::application::ApplicationHandler;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::{Window, WindowId};

use super::input_adapter;
use super::{LoopState, Session};
use crate::driver::{GraphicsDriver, WgpuDriver};
use crate::errors::{Error, Result};
use crate::settings::GameSettings;

/// Application builder.
///
/// ```rust,ignore
/// App::new()
///     .with_settings(GameSettings {
///         vsync: true,
///         ..Default::default()
///     })
///     .run()?;
/// ```
pub struct App {
    settings: GameSettings,
}

impl App {
    /// Creates a new application builder with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self {
            settings: GameSettings::default(),
        }
    }

    /// Sets the window title.
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.settings.title = title.into();
        self
    }

    #[must_use]
    pub fn with_settings(mut self, settings: GameSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Runs the main loop on the current thread until the window closes.
    ///
    /// # Errors
    ///
    /// Returns the event loop error, or the first startup failure (window,
    /// driver, shader or buffer).
    pub fn run(self) -> Result<()> {
        let event_loop = EventLoop::new()?;
        event_loop.set_control_flow(ControlFlow::Poll);

        let mut runner = GameRunner::new(self.settings);
        event_loop.run_app(&mut runner)?;

        match runner.failure.take() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}

struct GameRunner {
    settings: GameSettings,
    state: LoopState,
    window: Option<Arc<Window>>,
    session: Option<Session<WgpuDriver>>,
    failure: Option<Error>,
}

impl GameRunner {
    fn new(settings: GameSettings) -> Self {
        Self {
            settings,
            state: LoopState::Initializing,
            window: None,
            session: None,
            failure: None,
        }
    }

    fn initialize(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        let window_attributes = Window::default_attributes()
            .with_title(&self.settings.title)
            .with_inner_size(winit::dpi::PhysicalSize::new(
                self.settings.width,
                self.settings.height,
            ))
            .with_resizable(false);

        let window = Arc::new(event_loop.create_window(window_attributes)?);
        self.window = Some(Arc::clone(&window));

        log::info!("Initializing graphics driver...");

        let size = window.inner_size();
        let driver = pollster::block_on(WgpuDriver::new(
            Arc::clone(&window),
            &self.settings,
            size.width,
            size.height,
        ))?;

        self.session = Some(Session::start(Rc::new(driver), &self.settings)?);
        Ok(())
    }

    fn shut_down(&mut self, event_loop: &ActiveEventLoop) {
        self.state = LoopState::ShuttingDown;
        self.session = None;
        self.window = None;
        event_loop.exit();
    }
}

impl ApplicationHandler for GameRunner {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.state != LoopState::Initializing {
            return;
        }

        match self.initialize(event_loop) {
            Ok(()) => {
                self.state = LoopState::Running;
                if let Some(window) = &self.window {
                    window.request_redraw();
                }
            }
            Err(e) => {
                log::error!("Fatal initialization error: {e}");
                self.failure = Some(e);
                self.shut_down(event_loop);
            }
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        if self.state != LoopState::Running {
            return;
        }
        let Some(session) = &mut self.session else {
            return;
        };

        match event {
            WindowEvent::CloseRequested => {
                log::info!("Close requested, shutting down");
                self.shut_down(event_loop);
            }
            WindowEvent::KeyboardInput { event, .. } => {
                if let Some((key, action)) = input_adapter::translate_key_event(&event)
                    && let Err(e) = session.handle_key(key, action)
                {
                    log::error!("Failed to move player: {e}");
                }
            }
            WindowEvent::Resized(size) => {
                session.driver().resize(size.width, size.height);
            }
            WindowEvent::RedrawRequested => {
                if let Err(e) = session.frame() {
                    log::error!("Frame failed: {e}");
                }
                if let Some(window) = &self.window {
                    window.request_redraw();
                }
            }
            _ => {}
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if self.state == LoopState::Running
            && let Some(window) = &self.window
        {
            window.request_redraw();
        }
    }
}
