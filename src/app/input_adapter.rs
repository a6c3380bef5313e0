//! Winit input event adapter
//!
//! Translates winit keyboard events into the platform-agnostic types of
//! [`crate::input`].

use winit::event::{ElementState, KeyEvent};
use winit::keyboard::{KeyCode, PhysicalKey};

use crate::input::{Key, KeyAction};

/// Converts a winit `PhysicalKey` to a [`Key`].
#[must_use]
pub fn translate_key(physical_key: PhysicalKey) -> Option<Key> {
    let PhysicalKey::Code(code) = physical_key else {
        return None;
    };

    let key = match code {
        KeyCode::KeyW => Key::W,
        KeyCode::KeyA => Key::A,
        KeyCode::KeyS => Key::S,
        KeyCode::KeyD => Key::D,
        _ => return None,
    };

    Some(key)
}

/// Converts a winit `ElementState` plus its repeat flag to a [`KeyAction`].
#[must_use]
pub fn translate_action(state: ElementState, repeat: bool) -> KeyAction {
    match (state, repeat) {
        (ElementState::Released, _) => KeyAction::Release,
        (ElementState::Pressed, true) => KeyAction::Repeat,
        (ElementState::Pressed, false) => KeyAction::Press,
    }
}

/// Translates a keyboard event, or `None` for keys the game does not know.
#[must_use]
pub fn translate_key_event(event: &KeyEvent) -> Option<(Key, KeyAction)> {
    let key = translate_key(event.physical_key)?;
    Some((key, translate_action(event.state, event.repeat)))
}
