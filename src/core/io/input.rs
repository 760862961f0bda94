//! Shared input state
//!
//! Keeps the pieces of input state that several consumers read: modifier
//! keys and whether a UI text field currently owns the keyboard. Keyboard
//! shortcuts and click handlers check `ui_consuming` before acting so typing
//! a value into a panel never triggers editor shortcuts.

use bevy::input::ButtonInput;
use bevy::prelude::*;

/// Global input state shared by the editing systems.
#[derive(Resource, Default, Debug)]
pub struct InputState {
    /// Whether input is currently being consumed by a text-input-like UI
    /// element. Set by the panel layer while an edit field has focus.
    pub ui_consuming: bool,
}

/// Modifier key state captured at event time.
#[derive(Debug, Default, Clone)]
pub struct ModifierState {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub super_key: bool,
}

impl ModifierState {
    pub fn from_keyboard(keyboard: &ButtonInput<KeyCode>) -> Self {
        Self {
            shift: keyboard.pressed(KeyCode::ShiftLeft) || keyboard.pressed(KeyCode::ShiftRight),
            ctrl: keyboard.pressed(KeyCode::ControlLeft)
                || keyboard.pressed(KeyCode::ControlRight),
            alt: keyboard.pressed(KeyCode::AltLeft) || keyboard.pressed(KeyCode::AltRight),
            super_key: keyboard.pressed(KeyCode::SuperLeft)
                || keyboard.pressed(KeyCode::SuperRight),
        }
    }

    /// Whether this click extends the selection instead of replacing it.
    pub fn multi_select(&self) -> bool {
        self.shift || self.ctrl || self.super_key
    }

    /// The primary command modifier (Cmd on macOS, Ctrl elsewhere).
    pub fn command(&self) -> bool {
        self.ctrl || self.super_key
    }
}
