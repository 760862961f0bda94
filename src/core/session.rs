//! The editor session
//!
//! One [`EditorSession`] owns everything a single editing view mutates: the
//! plan model, the selection, the undo/redo history, the transform session
//! and the clipboard. It is registered as a single Bevy resource and passed
//! by reference to every system that needs it; tests construct a fresh
//! session directly.
//!
//! Panels call the typed entry points here (`set_position`, `set_rotation`,
//! `set_fixture_count`, ...) so programmatic numeric edits flow through the
//! same command stack as gizmo drags. Numeric input is validated
//! defensively: non-finite values, or non-positive values where positivity
//! is required, are discarded without mutating state or creating a command.

use bevy::prelude::*;

use crate::core::settings::PASTE_OFFSET;
use crate::editing::commands::{CommandStack, EditCommand};
use crate::editing::entity::{
    ArchObject, EntityKey, FixtureKey, PlanModel,
};
use crate::editing::selection::SelectionSet;
use crate::editing::transform::TransformSession;
use crate::geometry::{PlanPoint, PlanRotation, PlanVec3};

/// Entities captured by a copy, pasted as fresh entities with new identities.
#[derive(Debug, Default, Clone)]
pub struct Clipboard {
    pub fixtures: Vec<crate::editing::entity::Fixture>,
    pub arch: Vec<ArchObject>,
}

impl Clipboard {
    pub fn is_empty(&self) -> bool {
        self.fixtures.is_empty() && self.arch.is_empty()
    }
}

/// All mutable editor state for one floor-plan view.
#[derive(Resource, Debug, Default)]
pub struct EditorSession {
    pub model: PlanModel,
    pub selection: SelectionSet,
    pub history: CommandStack,
    pub transform: TransformSession,
    pub clipboard: Clipboard,
}

impl EditorSession {
    pub fn new(model: PlanModel) -> Self {
        Self {
            model,
            ..Default::default()
        }
    }

    pub fn is_transforming(&self) -> bool {
        self.transform.is_transforming()
    }

    /// An empty-space click clears the selection, unless a transform session
    /// is still in flight: the release that ends a gizmo drag arrives
    /// through the same pointer stream and must not deselect the group.
    pub fn pointer_missed(&mut self) {
        if self.is_transforming() {
            debug!("ignoring pointer-miss during transform");
            return;
        }
        self.selection.clear();
    }

    pub fn execute(&mut self, command: EditCommand) {
        self.history.execute(&mut self.model, command);
        self.selection.retain_live(&self.model);
    }

    pub fn undo(&mut self) -> bool {
        let undone = self.history.undo(&mut self.model);
        if undone {
            self.selection.retain_live(&self.model);
        }
        undone
    }

    pub fn redo(&mut self) -> bool {
        let redone = self.history.redo(&mut self.model);
        if redone {
            self.selection.retain_live(&self.model);
        }
        redone
    }

    /// Typed-value move of a single entity (info panel edit).
    pub fn set_position(&mut self, key: EntityKey, position: PlanPoint) {
        if ![position.x, position.y, position.z]
            .iter()
            .all(|v| v.is_finite())
        {
            warn!("discarding non-finite position edit for {key:?}");
            return;
        }
        let Some(before) = self.model.position_of(&key) else {
            return;
        };
        if before == position {
            return;
        }
        self.execute(EditCommand::MoveEntities {
            moves: vec![(key, before, position)],
        });
    }

    /// Typed-value move of several entities at once, committed atomically.
    pub fn set_positions(&mut self, edits: Vec<(EntityKey, PlanPoint)>) {
        let moves: Vec<(EntityKey, PlanPoint, PlanPoint)> = edits
            .into_iter()
            .filter(|(_, p)| [p.x, p.y, p.z].iter().all(|v| v.is_finite()))
            .filter_map(|(key, after)| {
                let before = self.model.position_of(&key)?;
                (before != after).then_some((key, before, after))
            })
            .collect();
        if moves.is_empty() {
            return;
        }
        self.execute(EditCommand::MoveEntities { moves });
    }

    /// Typed-value rotation of a fixture.
    pub fn set_rotation(&mut self, key: FixtureKey, rotation: PlanRotation) {
        if ![rotation.x, rotation.y, rotation.z]
            .iter()
            .all(|v| v.is_finite())
        {
            warn!("discarding non-finite rotation edit for {key:?}");
            return;
        }
        let Some(fixture) = self.model.fixture(&key) else {
            return;
        };
        let before = fixture.rotation;
        if before == rotation {
            return;
        }
        self.execute(EditCommand::RotateFixture {
            key,
            before,
            after: rotation,
        });
    }

    /// Typed-value repeat count. Counts below one are discarded.
    pub fn set_fixture_count(&mut self, key: FixtureKey, count: u32) {
        if count < 1 {
            warn!("discarding non-positive count edit for {key:?}");
            return;
        }
        let Some(fixture) = self.model.fixture(&key) else {
            return;
        };
        let before = fixture.count;
        if before == count {
            return;
        }
        self.execute(EditCommand::SetFixtureCount {
            key,
            before,
            after: count,
        });
    }

    pub fn set_fixture_brand(&mut self, key: FixtureKey, brand: String) {
        let Some(fixture) = self.model.fixture(&key) else {
            return;
        };
        let before = fixture.brand.clone();
        if before == brand {
            return;
        }
        self.execute(EditCommand::SetFixtureBrand {
            key,
            before,
            after: brand,
        });
    }

    /// Typed-value height edit of an architectural object. Rejects
    /// non-positive heights.
    pub fn set_arch_height(&mut self, id: crate::editing::entity::ArchId, height: f32) {
        if crate::core::errors::validate_positive(height, "height").is_err() {
            warn!("discarding invalid height edit for {id:?}");
            return;
        }
        let Some(object) = self.model.arch(id) else {
            return;
        };
        let before = object.shape.clone();
        let after = match before.clone() {
            crate::editing::entity::ArchShape::TwoPoint {
                start,
                end,
                rotation,
                ..
            } => crate::editing::entity::ArchShape::TwoPoint {
                start,
                end,
                height,
                rotation,
            },
            crate::editing::entity::ArchShape::SinglePoint {
                position,
                rotation,
                mut size,
            } => {
                size.height = height;
                crate::editing::entity::ArchShape::SinglePoint {
                    position,
                    rotation,
                    size,
                }
            }
        };
        if before == after {
            return;
        }
        self.execute(EditCommand::ReshapeArch { id, before, after });
    }

    /// Copy the current selection into the clipboard.
    pub fn copy_selection(&mut self) {
        let mut clipboard = Clipboard::default();
        for key in self.selection.iter() {
            match key {
                EntityKey::Fixture(k) => {
                    if let Some(fixture) = self.model.fixture(k) {
                        if !fixture.for_delete {
                            clipboard.fixtures.push(fixture.clone());
                        }
                    }
                }
                EntityKey::Arch(id) => {
                    if let Some(object) = self.model.arch(*id) {
                        clipboard.arch.push(object.clone());
                    }
                }
            }
        }
        if !clipboard.is_empty() {
            info!(
                "copied {} fixtures, {} architectural objects",
                clipboard.fixtures.len(),
                clipboard.arch.len()
            );
            self.clipboard = clipboard;
        }
    }

    /// Paste the clipboard as fresh entities, offset from the originals,
    /// and select the copies. One command; undo removes them all.
    pub fn paste_clipboard(&mut self) {
        if self.clipboard.is_empty() {
            return;
        }
        let offset = PlanVec3::new(PASTE_OFFSET, PASTE_OFFSET, 0.0);

        let mut fixtures = Vec::new();
        for source in self.clipboard.fixtures.clone() {
            let mut copy = source.clone();
            copy.seq = self.next_fixture_seq(copy.floor, &copy.block);
            copy.position = copy.position + offset;
            copy.rebase();
            fixtures.push(copy);
        }
        let mut arch = Vec::new();
        for source in self.clipboard.arch.clone() {
            let id = self.model.allocate_arch_id();
            let mut copy = ArchObject::new(
                id,
                source.kind,
                source.floor,
                source.shape.translated(offset),
            );
            copy.rebase();
            arch.push(copy);
        }

        let pasted_keys: Vec<EntityKey> = fixtures
            .iter()
            .map(|f| EntityKey::Fixture(f.key()))
            .chain(arch.iter().map(|o| EntityKey::Arch(o.id)))
            .collect();

        self.execute(EditCommand::PasteEntities { fixtures, arch });

        self.selection.clear();
        let shift = crate::core::io::input::ModifierState {
            shift: true,
            ..Default::default()
        };
        for key in pasted_keys {
            self.selection.toggle(key, &shift);
        }
    }

    /// Delete the current selection: fixtures are soft-deleted, architectural
    /// objects removed, in one undoable command.
    pub fn delete_selection(&mut self) {
        let mut fixtures = Vec::new();
        let mut arch = Vec::new();
        for key in self.selection.iter() {
            match key {
                EntityKey::Fixture(k) => fixtures.push(k.clone()),
                EntityKey::Arch(id) => {
                    if let Some(object) = self.model.arch(*id) {
                        arch.push(object.clone());
                    }
                }
            }
        }
        if fixtures.is_empty() && arch.is_empty() {
            return;
        }
        self.selection.clear();
        self.execute(EditCommand::DeleteEntities { fixtures, arch });
    }

    fn next_fixture_seq(&self, floor: u32, block: &str) -> u32 {
        self.model
            .live_fixtures()
            .filter(|f| f.floor == floor && f.block == block)
            .map(|f| f.seq)
            .max()
            .map(|seq| seq + 1)
            .unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::io::input::ModifierState;
    use crate::editing::entity::Fixture;

    fn session_with_fixture() -> (EditorSession, FixtureKey) {
        let mut model = PlanModel::new();
        let fixture = Fixture::new(0, "shelf", 0, PlanPoint::ZERO, "acme");
        let key = fixture.key();
        model.insert_fixture(fixture);
        (EditorSession::new(model), key)
    }

    #[test]
    fn nan_position_edit_is_discarded() {
        let (mut session, key) = session_with_fixture();
        session.set_position(
            EntityKey::Fixture(key.clone()),
            PlanPoint::new(f32::NAN, 0.0, 0.0),
        );
        assert!(!session.history.can_undo());
        assert_eq!(
            session.model.position_of(&EntityKey::Fixture(key)).unwrap(),
            PlanPoint::ZERO
        );
    }

    #[test]
    fn zero_count_edit_is_discarded() {
        let (mut session, key) = session_with_fixture();
        session.set_fixture_count(key.clone(), 0);
        assert!(!session.history.can_undo());
        assert_eq!(session.model.fixture(&key).unwrap().count, 1);
    }

    #[test]
    fn panel_edit_is_undoable_like_a_drag() {
        let (mut session, key) = session_with_fixture();
        let entity_key = EntityKey::Fixture(key);
        session.set_position(entity_key.clone(), PlanPoint::new(2.0, 3.0, 0.0));
        assert!(session.history.can_undo());
        session.undo();
        assert_eq!(
            session.model.position_of(&entity_key).unwrap(),
            PlanPoint::ZERO
        );
    }

    #[test]
    fn copy_paste_selects_fresh_copies() {
        let (mut session, key) = session_with_fixture();
        session
            .selection
            .toggle(EntityKey::Fixture(key.clone()), &ModifierState::default());
        session.copy_selection();
        let before_paste = session.model.clone();
        session.paste_clipboard();

        assert_eq!(session.selection.len(), 1);
        // The copy got a new sequence number.
        assert!(!session.selection.is_selected(&EntityKey::Fixture(key)));
        assert_eq!(session.model.live_fixtures().count(), 2);

        // One undo removes the pasted records outright, not a soft-delete;
        // the model is byte-for-byte what it was before the paste.
        session.undo();
        assert_eq!(session.model, before_paste);

        // Redo brings the copies back.
        session.redo();
        assert_eq!(session.model.live_fixtures().count(), 2);
    }

    #[test]
    fn empty_space_click_clears_unless_transforming() {
        let (mut session, key) = session_with_fixture();
        let entity_key = EntityKey::Fixture(key);
        session
            .selection
            .toggle(entity_key.clone(), &ModifierState::default());

        // Releasing a gizmo drag raises a pointer-miss in the same frame;
        // the still-settling session must keep the selection.
        session.transform.begin(&session.selection, &session.model);
        session.transform.release();
        assert!(session.is_transforming());
        session.pointer_missed();
        assert!(session.selection.is_selected(&entity_key));

        // Once the session settles, a genuine miss clears.
        session.transform.finish();
        session.pointer_missed();
        assert!(session.selection.is_empty());
    }

    #[test]
    fn delete_selection_is_one_command() {
        let (mut session, key) = session_with_fixture();
        session
            .selection
            .toggle(EntityKey::Fixture(key.clone()), &ModifierState::default());
        session.delete_selection();
        assert!(session.selection.is_empty());
        assert_eq!(session.model.live_fixtures().count(), 0);
        session.undo();
        assert_eq!(session.model.live_fixtures().count(), 1);
    }

    #[test]
    fn selection_drops_entities_removed_by_undo() {
        let (mut session, _key) = session_with_fixture();
        let id = session.model.allocate_arch_id();
        let object = ArchObject::new(
            id,
            crate::editing::entity::ArchKind::Door,
            0,
            crate::editing::entity::ArchShape::SinglePoint {
                position: PlanPoint::ZERO,
                rotation: PlanRotation::ZERO,
                size: crate::editing::entity::ArchSize::default(),
            },
        );
        session.execute(EditCommand::PlaceArch { object });
        session
            .selection
            .toggle(EntityKey::Arch(id), &ModifierState::default());
        session.undo();
        assert!(session.selection.is_empty());
    }
}
