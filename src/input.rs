//! Platform-agnostic keyboard input and movement translation
//!
//! Key and action types here do not depend on any windowing library; the
//! winit adapter in [`crate::app::input_adapter`] translates platform events
//! into them. [`InputTranslator`] turns one key event into at most one
//! [`MovementCommand`].

use glam::Vec2;

use crate::settings::GameSettings;

/// Keys the game reacts to (platform-agnostic)
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Key {
    W,
    A,
    S,
    D,
}

/// What happened to a key
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum KeyAction {
    Press,
    /// Auto-repeat while the key is held
    Repeat,
    Release,
}

/// Screen-space movement direction
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Direction {
    Up,
    Left,
    Down,
    Right,
}

impl Direction {
    /// Unit vector in normalized device coordinates (y up).
    #[must_use]
    pub const fn unit(self) -> Vec2 {
        match self {
            Self::Up => Vec2::Y,
            Self::Left => Vec2::NEG_X,
            Self::Down => Vec2::NEG_Y,
            Self::Right => Vec2::X,
        }
    }
}

/// One frame's translation of the player.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct MovementCommand {
    pub delta: Vec2,
}

impl MovementCommand {
    #[must_use]
    pub fn new(direction: Direction, distance: f32) -> Self {
        Self {
            delta: direction.unit() * distance,
        }
    }
}

/// Maps key events to frame-rate-normalized movement.
///
/// Each [`Key`] moves the player along one axis; releases are ignored. The
/// step for one press is `movement_ratio / fps`, so the on-screen speed does
/// not depend on the rendering speed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InputTranslator {
    movement_ratio: f32,
    fallback_step: f32,
}

impl InputTranslator {
    #[must_use]
    pub fn new(movement_ratio: f32, fallback_step: f32) -> Self {
        Self {
            movement_ratio,
            fallback_step,
        }
    }

    #[must_use]
    pub fn from_settings(settings: &GameSettings) -> Self {
        Self::new(settings.movement_ratio, settings.fallback_step)
    }

    /// The movement key bindings.
    #[must_use]
    pub const fn direction(key: Key) -> Direction {
        match key {
            Key::W => Direction::Up,
            Key::A => Direction::Left,
            Key::S => Direction::Down,
            Key::D => Direction::Right,
        }
    }

    /// Distance moved by one key press at the given frame rate.
    ///
    /// Falls back to the configured fixed step while no usable estimate exists.
    #[must_use]
    pub fn step(&self, fps: Option<f32>) -> f32 {
        match fps {
            Some(fps) if fps.is_finite() && fps > 0.0 => self.movement_ratio / fps,
            _ => self.fallback_step,
        }
    }

    #[must_use]
    pub fn translate(&self, key: Key, action: KeyAction, fps: Option<f32>) -> Option<MovementCommand> {
        if action == KeyAction::Release {
            return None;
        }
        Some(MovementCommand::new(Self::direction(key), self.step(fps)))
    }
}

impl Default for InputTranslator {
    fn default() -> Self {
        Self::from_settings(&GameSettings::default())
    }
}
