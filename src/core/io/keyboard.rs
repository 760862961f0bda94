//! Keyboard shortcuts for editing
//!
//! Modifier+Z undo, Modifier+Shift+Z / Modifier+Y redo, Modifier+C/V copy
//! and paste, Delete/Backspace delete, arrow keys nudge the selection. All
//! of it is suppressed while a text-input element owns the keyboard.

use bevy::prelude::*;

use crate::core::io::input::{InputState, ModifierState};
use crate::core::session::EditorSession;
use crate::core::settings::{NUDGE_AMOUNT, SHIFT_NUDGE_AMOUNT};
use crate::editing::entity::EntityKey;
use crate::geometry::{PlanPoint, PlanVec3};

/// System to handle undo/redo keyboard shortcuts
pub fn handle_undo_redo_shortcuts(
    keyboard: Res<ButtonInput<KeyCode>>,
    input_state: Res<InputState>,
    mut session: ResMut<EditorSession>,
) {
    if input_state.ui_consuming {
        return;
    }
    let modifiers = ModifierState::from_keyboard(&keyboard);
    if !modifiers.command() {
        return;
    }

    if keyboard.just_pressed(KeyCode::KeyZ) && !modifiers.shift {
        debug!("Undo shortcut detected (Cmd+Z)");
        session.undo();
    } else if (keyboard.just_pressed(KeyCode::KeyZ) && modifiers.shift)
        || keyboard.just_pressed(KeyCode::KeyY)
    {
        debug!("Redo shortcut detected");
        session.redo();
    }
}

/// System to handle copy/paste of the selected entities
pub fn handle_clipboard_shortcuts(
    keyboard: Res<ButtonInput<KeyCode>>,
    input_state: Res<InputState>,
    mut session: ResMut<EditorSession>,
) {
    if input_state.ui_consuming {
        return;
    }
    let modifiers = ModifierState::from_keyboard(&keyboard);
    if !modifiers.command() {
        return;
    }

    if keyboard.just_pressed(KeyCode::KeyC) {
        session.copy_selection();
    } else if keyboard.just_pressed(KeyCode::KeyV) {
        session.paste_clipboard();
    }
}

/// System to delete the selection with Delete or Backspace
pub fn handle_delete_shortcut(
    keyboard: Res<ButtonInput<KeyCode>>,
    input_state: Res<InputState>,
    mut session: ResMut<EditorSession>,
) {
    if input_state.ui_consuming {
        return;
    }
    if keyboard.just_pressed(KeyCode::Delete) || keyboard.just_pressed(KeyCode::Backspace) {
        session.delete_selection();
    }
}

/// System to nudge the selection with the arrow keys. Each nudge is its own
/// undoable move command; shift enlarges the step.
pub fn handle_nudge_shortcuts(
    keyboard: Res<ButtonInput<KeyCode>>,
    input_state: Res<InputState>,
    mut session: ResMut<EditorSession>,
) {
    if input_state.ui_consuming || session.is_transforming() {
        return;
    }
    let modifiers = ModifierState::from_keyboard(&keyboard);
    let amount = if modifiers.shift {
        SHIFT_NUDGE_AMOUNT
    } else {
        NUDGE_AMOUNT
    };

    let delta = nudge_vector(&keyboard, amount);
    if delta.length() == 0.0 || session.selection.is_empty() {
        return;
    }

    let edits: Vec<(EntityKey, PlanPoint)> = session
        .selection
        .iter()
        .filter_map(|key| {
            session
                .model
                .position_of(key)
                .map(|p| (key.clone(), p + delta))
        })
        .collect();
    session.set_positions(edits);
}

/// Arrow keys translate along the floor plane: left/right on plan x,
/// up/down on plan z. Plan y is the vertical axis and never nudged.
fn nudge_vector(keyboard: &ButtonInput<KeyCode>, amount: f32) -> PlanVec3 {
    let mut delta = PlanVec3::ZERO;
    if keyboard.just_pressed(KeyCode::ArrowLeft) {
        delta.x -= amount;
    }
    if keyboard.just_pressed(KeyCode::ArrowRight) {
        delta.x += amount;
    }
    if keyboard.just_pressed(KeyCode::ArrowUp) {
        delta.z += amount;
    }
    if keyboard.just_pressed(KeyCode::ArrowDown) {
        delta.z -= amount;
    }
    delta
}

/// Plugin wiring the keyboard surface.
pub struct KeyboardPlugin;

impl Plugin for KeyboardPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            Update,
            (
                handle_undo_redo_shortcuts,
                handle_clipboard_shortcuts,
                handle_delete_shortcut,
                handle_nudge_shortcuts,
            ),
        );
    }
}

#[cfg(test)]
mod keyboard_tests {
    use super::*;

    #[test]
    fn vertical_arrows_nudge_along_the_floor_not_upward() {
        let mut keyboard = ButtonInput::<KeyCode>::default();
        keyboard.press(KeyCode::ArrowUp);
        let delta = nudge_vector(&keyboard, NUDGE_AMOUNT);
        assert_eq!(delta.y, 0.0, "arrow keys must never lift the selection");
        assert_eq!(
            delta.z, NUDGE_AMOUNT,
            "up arrow should push forward along plan z"
        );

        let mut keyboard = ButtonInput::<KeyCode>::default();
        keyboard.press(KeyCode::ArrowDown);
        let delta = nudge_vector(&keyboard, NUDGE_AMOUNT);
        assert_eq!(delta, PlanVec3::new(0.0, 0.0, -NUDGE_AMOUNT));
    }

    #[test]
    fn horizontal_arrows_nudge_along_plan_x() {
        let mut keyboard = ButtonInput::<KeyCode>::default();
        keyboard.press(KeyCode::ArrowRight);
        assert_eq!(
            nudge_vector(&keyboard, NUDGE_AMOUNT),
            PlanVec3::new(NUDGE_AMOUNT, 0.0, 0.0)
        );

        let mut keyboard = ButtonInput::<KeyCode>::default();
        keyboard.press(KeyCode::ArrowLeft);
        assert_eq!(
            nudge_vector(&keyboard, NUDGE_AMOUNT),
            PlanVec3::new(-NUDGE_AMOUNT, 0.0, 0.0)
        );
    }
}
