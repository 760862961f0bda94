//! Selection state and components
//!
//! The selection system tracks which placed entities are currently selected
//! and is the authority for which entity owns an active transform gizmo:
//! - `Selectable` marks scene entities that can be interacted with
//! - `Selected` is added/removed dynamically to mirror the session state
//! - [`SelectionSet`] inside the editor session is the source of truth
//!
//! Typical workflow:
//! - Plain click on an entity -> replace the selection with it
//! - Shift/ctrl/super click -> toggle membership in the existing set
//! - Click on empty space -> clear, unless a transform is mid-flight

use std::collections::BTreeSet;

use bevy::prelude::*;

use crate::core::io::input::ModifierState;
use crate::editing::entity::EntityKey;

pub mod systems;

/// Marker component for scene entities that can be selected.
#[derive(Component, Debug, Default)]
pub struct Selectable;

/// Marker component for scene entities that are currently selected.
#[derive(Component, Debug, Default)]
pub struct Selected;

/// Links a scene entity back to the plan entity it renders.
#[derive(Component, Debug, Clone)]
pub struct PlanEntityRef {
    pub key: EntityKey,
}

/// Which gizmo the current selection is offered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GizmoMode {
    /// Nothing selected; no gizmo.
    None,
    /// Exactly one entity: full position/rotation editing.
    Single,
    /// More than one entity: group translation only. Rotation is not offered
    /// because per-entity rotation pivots would be ambiguous.
    GroupTranslate,
}

/// The ordered set of selected entity keys.
#[derive(Debug, Default, Clone)]
pub struct SelectionSet {
    selected: BTreeSet<EntityKey>,
}

impl SelectionSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply click semantics: plain click replaces the selection with the
    /// clicked entity, a modifier click toggles its membership.
    pub fn toggle(&mut self, key: EntityKey, modifiers: &ModifierState) {
        if modifiers.multi_select() {
            if !self.selected.remove(&key) {
                self.selected.insert(key);
            }
        } else {
            self.selected.clear();
            self.selected.insert(key);
        }
    }

    pub fn clear(&mut self) {
        self.selected.clear();
    }

    pub fn is_selected(&self, key: &EntityKey) -> bool {
        self.selected.contains(key)
    }

    pub fn len(&self) -> usize {
        self.selected.len()
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &EntityKey> {
        self.selected.iter()
    }

    /// Drop keys that no longer refer to live entities, e.g. after a delete
    /// command or an undo of a paste.
    pub fn retain_live(&mut self, model: &crate::editing::entity::PlanModel) {
        self.selected.retain(|key| model.contains(key));
    }

    pub fn gizmo_mode(&self) -> GizmoMode {
        match self.selected.len() {
            0 => GizmoMode::None,
            1 => GizmoMode::Single,
            _ => GizmoMode::GroupTranslate,
        }
    }
}

/// Plugin to add selection functionality to the editor.
pub struct SelectionPlugin;

impl Plugin for SelectionPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<systems::PointerMissed>()
            .configure_sets(
                Update,
                (SelectionSystemSet::Input, SelectionSystemSet::Processing).chain(),
            )
        .add_systems(
            Update,
            (systems::handle_selection_click, systems::handle_pointer_missed)
                .chain()
                .in_set(SelectionSystemSet::Input),
        )
        .add_systems(
            Update,
            (sync_selected_components, systems::prune_dead_selection)
                .in_set(SelectionSystemSet::Processing),
        );
    }
}

/// System sets for selection.
#[derive(Debug, Hash, PartialEq, Eq, Clone, SystemSet)]
pub enum SelectionSystemSet {
    Input,
    Processing,
}

/// Keep `Selected` marker components synchronized with the session's
/// selection set.
pub fn sync_selected_components(
    mut commands: Commands,
    session: Res<crate::core::session::EditorSession>,
    refs: Query<(Entity, &PlanEntityRef)>,
    selected: Query<(), With<Selected>>,
) {
    for (entity, plan_ref) in &refs {
        let should_select = session.selection.is_selected(&plan_ref.key);
        let is_selected = selected.contains(entity);
        if should_select && !is_selected {
            commands.entity(entity).insert(Selected);
        } else if !should_select && is_selected {
            commands.entity(entity).remove::<Selected>();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editing::entity::{ArchId, FixtureKey};

    fn key(seq: u32) -> EntityKey {
        EntityKey::Fixture(FixtureKey::new(0, "shelf", seq))
    }

    #[test]
    fn plain_click_replaces_selection() {
        let mut selection = SelectionSet::new();
        let plain = ModifierState::default();
        selection.toggle(key(1), &plain);
        selection.toggle(key(2), &plain);
        assert_eq!(selection.len(), 1);
        assert!(selection.is_selected(&key(2)));
    }

    #[test]
    fn modifier_click_toggles_membership() {
        let mut selection = SelectionSet::new();
        let shift = ModifierState {
            shift: true,
            ..Default::default()
        };
        selection.toggle(key(1), &ModifierState::default());
        selection.toggle(key(2), &shift);
        assert_eq!(selection.len(), 2);
        selection.toggle(key(1), &shift);
        assert_eq!(selection.len(), 1);
        assert!(!selection.is_selected(&key(1)));
    }

    #[test]
    fn gizmo_mode_follows_count() {
        let mut selection = SelectionSet::new();
        assert_eq!(selection.gizmo_mode(), GizmoMode::None);
        selection.toggle(key(1), &ModifierState::default());
        assert_eq!(selection.gizmo_mode(), GizmoMode::Single);
        let ctrl = ModifierState {
            ctrl: true,
            ..Default::default()
        };
        selection.toggle(EntityKey::Arch(ArchId(0)), &ctrl);
        assert_eq!(selection.gizmo_mode(), GizmoMode::GroupTranslate);
    }
}
