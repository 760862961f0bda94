//! Editing tools
//!
//! Each tool file contains the tool's behavior: the state it owns and the
//! systems that drive it. Exactly one tool is active at a time; switching
//! tools synchronously discards any in-flight placement, measurement or
//! transform state, so no stale handlers or half-built gestures survive a
//! mode change. Select-tool click behavior lives in
//! `editing::selection::systems`.

pub mod measure;
pub mod place;

use bevy::prelude::*;

use crate::core::session::EditorSession;

/// Information about a tool
#[derive(Debug, Clone)]
pub struct ToolInfo {
    pub name: &'static str,
    pub shortcut: Option<KeyCode>,
}

/// What the user can place with the placement tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlacementKind {
    Glazing,
    Partition,
    Door,
    Stairs,
    Till,
    SpawnPoint,
}

/// Which tool currently owns pointer clicks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ToolKind {
    #[default]
    Select,
    Place(PlacementKind),
    Measure,
}

impl ToolKind {
    pub fn info(self) -> ToolInfo {
        match self {
            ToolKind::Select => ToolInfo {
                name: "select",
                shortcut: Some(KeyCode::KeyV),
            },
            ToolKind::Measure => ToolInfo {
                name: "measure",
                shortcut: Some(KeyCode::KeyM),
            },
            ToolKind::Place(PlacementKind::Glazing) => ToolInfo {
                name: "place-glazing",
                shortcut: Some(KeyCode::KeyG),
            },
            ToolKind::Place(PlacementKind::Partition) => ToolInfo {
                name: "place-partition",
                shortcut: Some(KeyCode::KeyP),
            },
            ToolKind::Place(PlacementKind::Door) => ToolInfo {
                name: "place-door",
                shortcut: Some(KeyCode::KeyD),
            },
            ToolKind::Place(PlacementKind::Stairs) => ToolInfo {
                name: "place-stairs",
                shortcut: None,
            },
            ToolKind::Place(PlacementKind::Till) => ToolInfo {
                name: "place-till",
                shortcut: None,
            },
            ToolKind::Place(PlacementKind::SpawnPoint) => ToolInfo {
                name: "place-spawn",
                shortcut: None,
            },
        }
    }
}

/// The tools reachable directly from the keyboard.
const SHORTCUT_TOOLS: [ToolKind; 5] = [
    ToolKind::Select,
    ToolKind::Measure,
    ToolKind::Place(PlacementKind::Glazing),
    ToolKind::Place(PlacementKind::Partition),
    ToolKind::Place(PlacementKind::Door),
];

/// The active tool.
#[derive(Resource, Debug, Default)]
pub struct CurrentTool {
    pub kind: ToolKind,
}

/// Request to switch the active tool.
#[derive(Event, Debug)]
pub struct SwitchTool(pub ToolKind);

/// System to apply tool switches. Resets every per-tool state machine so
/// only one gesture can ever be in flight.
pub fn handle_tool_switch(
    mut switches: EventReader<SwitchTool>,
    mut current: ResMut<CurrentTool>,
    mut session: ResMut<EditorSession>,
    mut placement: ResMut<place::PlacementState>,
    mut measure: ResMut<measure::MeasureState>,
) {
    for SwitchTool(kind) in switches.read() {
        if current.kind == *kind {
            continue;
        }
        info!(
            "switching tool: {} -> {}",
            current.kind.info().name,
            kind.info().name
        );
        session.transform.cancel();
        measure.clear();
        match kind {
            ToolKind::Place(placement_kind) => placement.activate(*placement_kind),
            _ => placement.deactivate(),
        }
        current.kind = *kind;
    }
}

/// System to switch tools from keyboard shortcuts. Measure toggles back to
/// select on a second press.
pub fn handle_tool_shortcuts(
    keyboard: Res<ButtonInput<KeyCode>>,
    input_state: Res<crate::core::io::input::InputState>,
    current: Res<CurrentTool>,
    mut switches: EventWriter<SwitchTool>,
) {
    if input_state.ui_consuming {
        return;
    }
    for kind in SHORTCUT_TOOLS {
        let Some(shortcut) = kind.info().shortcut else {
            continue;
        };
        if !keyboard.just_pressed(shortcut) {
            continue;
        }
        let next = if kind == current.kind && kind == ToolKind::Measure {
            ToolKind::Select
        } else {
            kind
        };
        switches.write(SwitchTool(next));
        return;
    }
}

/// Plugin registering the tool framework and the individual tools.
pub struct ToolsPlugin;

impl Plugin for ToolsPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<CurrentTool>()
            .add_event::<SwitchTool>()
            .add_systems(
                Update,
                (handle_tool_shortcuts, handle_tool_switch).chain(),
            )
            .add_plugins((place::PlacementToolPlugin, measure::MeasureToolPlugin));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_shortcut_tool_has_a_binding() {
        for kind in SHORTCUT_TOOLS {
            assert!(kind.info().shortcut.is_some(), "{:?} lacks a shortcut", kind);
        }
    }

    #[test]
    fn shortcut_bindings_are_unique() {
        let mut seen = Vec::new();
        for kind in SHORTCUT_TOOLS {
            let shortcut = kind.info().shortcut.unwrap();
            assert!(!seen.contains(&shortcut), "duplicate binding {:?}", shortcut);
            seen.push(shortcut);
        }
    }
}
