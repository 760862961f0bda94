//! Reversible edit commands and the undo/redo stack
//!
//! Every mutation of the [`PlanModel`] is expressed as an [`EditCommand`]
//! capturing before/after values at construction time. Commands are immutable
//! once built: `revert` exactly reverses `apply`, and replaying the `past`
//! stack in order from the initial model state reconstructs the current
//! state.

use std::collections::VecDeque;

use crate::editing::entity::{
    ArchId, ArchObject, ArchShape, EntityKey, Fixture, FixtureKey, PlanModel,
};
use crate::geometry::{PlanPoint, PlanRotation};

/// Maximum number of undoable commands kept on the stack. The oldest command
/// is evicted once the cap is exceeded and becomes permanently unundoable.
pub const UNDO_STACK_CAP: usize = 20;

/// A single reversible mutation of the plan model.
///
/// Commands carry values, not references; constructing one snapshots
/// everything needed to go both directions.
#[derive(Debug, Clone, PartialEq)]
pub enum EditCommand {
    /// Translate one or more entities as a rigid group. Undo restores every
    /// member atomically.
    MoveEntities {
        moves: Vec<(EntityKey, PlanPoint, PlanPoint)>,
    },
    RotateFixture {
        key: FixtureKey,
        before: PlanRotation,
        after: PlanRotation,
    },
    /// Replace the full shape of an architectural object (resize, height
    /// change, rotation, endpoint edits).
    ReshapeArch {
        id: ArchId,
        before: ArchShape,
        after: ArchShape,
    },
    SetFixtureCount {
        key: FixtureKey,
        before: u32,
        after: u32,
    },
    SetFixtureBrand {
        key: FixtureKey,
        before: String,
        after: String,
    },
    PlaceArch {
        object: ArchObject,
    },
    /// Soft-delete fixtures and hard-remove architectural objects. Removed
    /// objects are stored whole so undo can reinsert them.
    DeleteEntities {
        fixtures: Vec<FixtureKey>,
        arch: Vec<ArchObject>,
    },
    SetSpawnPoint {
        before: Option<PlanPoint>,
        after: PlanPoint,
    },
    PasteEntities {
        fixtures: Vec<Fixture>,
        arch: Vec<ArchObject>,
    },
}

impl EditCommand {
    pub fn name(&self) -> &'static str {
        match self {
            EditCommand::MoveEntities { .. } => "move",
            EditCommand::RotateFixture { .. } => "rotate",
            EditCommand::ReshapeArch { .. } => "reshape",
            EditCommand::SetFixtureCount { .. } => "set count",
            EditCommand::SetFixtureBrand { .. } => "set brand",
            EditCommand::PlaceArch { .. } => "place",
            EditCommand::DeleteEntities { .. } => "delete",
            EditCommand::SetSpawnPoint { .. } => "set spawn point",
            EditCommand::PasteEntities { .. } => "paste",
        }
    }

    pub fn apply(&self, model: &mut PlanModel) {
        match self {
            EditCommand::MoveEntities { moves } => {
                for (key, _before, after) in moves {
                    Self::set_position(model, key, *after);
                }
            }
            EditCommand::RotateFixture { key, after, .. } => {
                if let Some(fixture) = model.fixture_mut(key) {
                    fixture.rotation = *after;
                }
            }
            EditCommand::ReshapeArch { id, after, .. } => {
                if let Some(object) = model.arch_mut(*id) {
                    object.shape = after.clone();
                }
            }
            EditCommand::SetFixtureCount { key, after, .. } => {
                if let Some(fixture) = model.fixture_mut(key) {
                    fixture.count = *after;
                }
            }
            EditCommand::SetFixtureBrand { key, after, .. } => {
                if let Some(fixture) = model.fixture_mut(key) {
                    fixture.brand = after.clone();
                }
            }
            EditCommand::PlaceArch { object } => {
                model.insert_arch(object.clone());
            }
            EditCommand::DeleteEntities { fixtures, arch } => {
                for key in fixtures {
                    if let Some(fixture) = model.fixture_mut(key) {
                        fixture.for_delete = true;
                    }
                }
                for object in arch {
                    model.remove_arch(object.id);
                }
            }
            EditCommand::SetSpawnPoint { after, .. } => {
                model.spawn_point = Some(*after);
            }
            EditCommand::PasteEntities { fixtures, arch } => {
                for fixture in fixtures {
                    model.insert_fixture(fixture.clone());
                }
                for object in arch {
                    model.insert_arch(object.clone());
                }
            }
        }
    }

    pub fn revert(&self, model: &mut PlanModel) {
        match self {
            EditCommand::MoveEntities { moves } => {
                for (key, before, _after) in moves {
                    Self::set_position(model, key, *before);
                }
            }
            EditCommand::RotateFixture { key, before, .. } => {
                if let Some(fixture) = model.fixture_mut(key) {
                    fixture.rotation = *before;
                }
            }
            EditCommand::ReshapeArch { id, before, .. } => {
                if let Some(object) = model.arch_mut(*id) {
                    object.shape = before.clone();
                }
            }
            EditCommand::SetFixtureCount { key, before, .. } => {
                if let Some(fixture) = model.fixture_mut(key) {
                    fixture.count = *before;
                }
            }
            EditCommand::SetFixtureBrand { key, before, .. } => {
                if let Some(fixture) = model.fixture_mut(key) {
                    fixture.brand = before.clone();
                }
            }
            EditCommand::PlaceArch { object } => {
                model.remove_arch(object.id);
            }
            EditCommand::DeleteEntities { fixtures, arch } => {
                for key in fixtures {
                    if let Some(fixture) = model.fixture_mut(key) {
                        fixture.for_delete = false;
                    }
                }
                for object in arch {
                    model.insert_arch(object.clone());
                }
            }
            EditCommand::SetSpawnPoint { before, .. } => {
                model.spawn_point = *before;
            }
            EditCommand::PasteEntities { fixtures, arch } => {
                // Pasted fixtures were created by this command, so revert
                // removes the records outright; soft-delete is reserved for
                // upstream-loaded fixtures (`DeleteEntities`).
                for fixture in fixtures {
                    model.remove_fixture(&fixture.key());
                }
                for object in arch {
                    model.remove_arch(object.id);
                }
            }
        }
    }

    fn set_position(model: &mut PlanModel, key: &EntityKey, position: PlanPoint) {
        match key {
            EntityKey::Fixture(k) => {
                if let Some(fixture) = model.fixture_mut(k) {
                    fixture.position = position;
                }
            }
            EntityKey::Arch(id) => {
                if let Some(object) = model.arch_mut(*id) {
                    let current = object.shape.anchor();
                    let delta = position - current;
                    object.shape = object.shape.translated(delta);
                }
            }
        }
    }
}

/// Bounded undo/redo history with strict LIFO/FIFO semantics.
///
/// `past` holds executed commands, newest last; `future` holds undone
/// commands awaiting redo. Any new execution invalidates `future`.
#[derive(Debug, Default)]
pub struct CommandStack {
    past: VecDeque<EditCommand>,
    future: Vec<EditCommand>,
}

impl CommandStack {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply a command to the model and record it.
    pub fn execute(&mut self, model: &mut PlanModel, command: EditCommand) {
        log::debug!("executing command: {}", command.name());
        command.apply(model);
        self.past.push_back(command);
        if self.past.len() > UNDO_STACK_CAP {
            self.past.pop_front();
        }
        self.future.clear();
    }

    /// Revert the most recent command. No-op on an empty stack.
    pub fn undo(&mut self, model: &mut PlanModel) -> bool {
        match self.past.pop_back() {
            Some(command) => {
                log::debug!("undoing command: {}", command.name());
                command.revert(model);
                self.future.push(command);
                true
            }
            None => false,
        }
    }

    /// Re-apply the most recently undone command. No-op on an empty stack.
    pub fn redo(&mut self, model: &mut PlanModel) -> bool {
        match self.future.pop() {
            Some(command) => {
                log::debug!("redoing command: {}", command.name());
                command.apply(model);
                self.past.push_back(command);
                true
            }
            None => false,
        }
    }

    pub fn can_undo(&self) -> bool {
        !self.past.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.future.is_empty()
    }

    /// Number of commands currently undoable.
    pub fn undo_depth(&self) -> usize {
        self.past.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editing::entity::{ArchKind, ArchSize};

    fn model_with_fixture() -> (PlanModel, EntityKey) {
        let mut model = PlanModel::new();
        let fixture = Fixture::new(0, "shelf", 0, PlanPoint::ZERO, "acme");
        let key = EntityKey::Fixture(fixture.key());
        model.insert_fixture(fixture);
        (model, key)
    }

    fn move_command(key: &EntityKey, from: PlanPoint, to: PlanPoint) -> EditCommand {
        EditCommand::MoveEntities {
            moves: vec![(key.clone(), from, to)],
        }
    }

    #[test]
    fn undo_redo_inverse_law() {
        let (mut model, key) = model_with_fixture();
        let initial = model.clone();
        let mut stack = CommandStack::new();

        for i in 1..=5 {
            let from = PlanPoint::new((i - 1) as f32, 0.0, 0.0);
            let to = PlanPoint::new(i as f32, 0.0, 0.0);
            stack.execute(&mut model, move_command(&key, from, to));
        }
        let final_state = model.clone();

        for _ in 0..5 {
            assert!(stack.undo(&mut model));
        }
        assert_eq!(model, initial);

        for _ in 0..5 {
            assert!(stack.redo(&mut model));
        }
        assert_eq!(model, final_state);
    }

    #[test]
    fn capacity_evicts_oldest() {
        let (mut model, key) = model_with_fixture();
        let mut stack = CommandStack::new();

        for i in 0..25 {
            let from = PlanPoint::new(i as f32, 0.0, 0.0);
            let to = PlanPoint::new((i + 1) as f32, 0.0, 0.0);
            stack.execute(&mut model, move_command(&key, from, to));
        }
        assert_eq!(stack.undo_depth(), UNDO_STACK_CAP);

        let mut undone = 0;
        while stack.undo(&mut model) {
            undone += 1;
        }
        assert_eq!(undone, 20);
        assert!(!stack.can_undo());
        // The first five moves are permanently baked in.
        assert_eq!(
            model.position_of(&key).unwrap(),
            PlanPoint::new(5.0, 0.0, 0.0)
        );
    }

    #[test]
    fn execute_clears_redo_history() {
        let (mut model, key) = model_with_fixture();
        let mut stack = CommandStack::new();
        stack.execute(
            &mut model,
            move_command(&key, PlanPoint::ZERO, PlanPoint::new(1.0, 0.0, 0.0)),
        );
        stack.undo(&mut model);
        assert!(stack.can_redo());
        stack.execute(
            &mut model,
            move_command(&key, PlanPoint::ZERO, PlanPoint::new(2.0, 0.0, 0.0)),
        );
        assert!(!stack.can_redo());
    }

    #[test]
    fn empty_stack_is_a_noop() {
        let (mut model, _key) = model_with_fixture();
        let before = model.clone();
        let mut stack = CommandStack::new();
        assert!(!stack.undo(&mut model));
        assert!(!stack.redo(&mut model));
        assert_eq!(model, before);
    }

    #[test]
    fn delete_undo_restores_both_families() {
        let (mut model, key) = model_with_fixture();
        let arch_id = model.allocate_arch_id();
        let object = ArchObject::new(
            arch_id,
            ArchKind::Door,
            0,
            ArchShape::SinglePoint {
                position: PlanPoint::new(3.0, 3.0, 0.0),
                rotation: PlanRotation::ZERO,
                size: ArchSize::default(),
            },
        );
        model.insert_arch(object.clone());

        let fixture_key = match &key {
            EntityKey::Fixture(k) => k.clone(),
            _ => unreachable!(),
        };
        let mut stack = CommandStack::new();
        stack.execute(
            &mut model,
            EditCommand::DeleteEntities {
                fixtures: vec![fixture_key],
                arch: vec![object],
            },
        );
        assert!(!model.contains(&key));
        assert!(model.arch(arch_id).is_none());

        stack.undo(&mut model);
        assert!(model.contains(&key));
        assert!(model.arch(arch_id).is_some());
    }

    #[test]
    fn replaying_past_reconstructs_state() {
        let (mut model, key) = model_with_fixture();
        let initial = model.clone();
        let mut stack = CommandStack::new();
        let commands: Vec<EditCommand> = (0..4)
            .map(|i| {
                move_command(
                    &key,
                    PlanPoint::new(i as f32, 0.0, 0.0),
                    PlanPoint::new((i + 1) as f32, 0.0, 0.0),
                )
            })
            .collect();
        for command in &commands {
            stack.execute(&mut model, command.clone());
        }

        let mut replayed = initial;
        for command in &commands {
            command.apply(&mut replayed);
        }
        assert_eq!(replayed, model);
    }
}
