//! Per-drag transform session
//!
//! A [`TransformSession`] carries the ephemeral state of one gizmo drag. On
//! mouse-down it snapshots the start position of every selected entity and a
//! group reference point (the arithmetic mean of their render-space
//! positions). While dragging, every gizmo movement becomes a single pending
//! plan-space delta; the authoritative model is never touched and rendering
//! adds the delta to each member's base position so the group moves rigidly.
//! On release the delta is committed as one aggregate move command, and the
//! session parks in `PendingCommit` for the rest of the frame so the
//! pointer-up that ended the drag cannot be misread as an empty-space click.
//! A dedicated system moves it back to `Idle` afterwards.
//!
//! Multi-selection drags are translate-only; rotation with several pivots
//! would be ambiguous.

use std::collections::BTreeMap;

use bevy::math::Vec3;

use crate::editing::commands::EditCommand;
use crate::editing::entity::{EntityKey, PlanModel};
use crate::editing::selection::SelectionSet;
use crate::geometry::{PlanPoint, PlanVec3};

/// The drag lifecycle. `PendingCommit` is the explicit two-phase exit: the
/// session stays "transforming" until every listener for the terminating
/// pointer-up has run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TransformPhase {
    #[default]
    Idle,
    Dragging,
    PendingCommit,
}

/// Ephemeral state for one drag gesture.
#[derive(Debug, Default)]
pub struct TransformSession {
    phase: TransformPhase,
    members: Vec<EntityKey>,
    start_positions: BTreeMap<EntityKey, PlanPoint>,
    /// Group reference point at drag start, render space.
    reference: Vec3,
    /// Uncommitted plan-space delta, alive for exactly one drag gesture.
    pending: Option<PlanVec3>,
}

impl TransformSession {
    pub fn phase(&self) -> TransformPhase {
        self.phase
    }

    /// True from mouse-down until the commit has fully settled. Camera orbit
    /// and empty-space selection clearing are suppressed while this holds.
    pub fn is_transforming(&self) -> bool {
        self.phase != TransformPhase::Idle
    }

    /// Start a drag over the current selection. Returns false (and stays
    /// idle) when the selection is empty or a drag is already active.
    pub fn begin(&mut self, selection: &SelectionSet, model: &PlanModel) -> bool {
        if self.phase != TransformPhase::Idle || selection.is_empty() {
            return false;
        }

        self.members.clear();
        self.start_positions.clear();
        let mut sum = Vec3::ZERO;
        for key in selection.iter() {
            let Some(position) = model.position_of(key) else {
                continue;
            };
            sum += position.to_render();
            self.members.push(key.clone());
            self.start_positions.insert(key.clone(), position);
        }
        if self.members.is_empty() {
            return false;
        }

        // The reference point is recomputed at every drag start, so it
        // follows the selection's centroid across successive commits.
        self.reference = sum / self.members.len() as f32;
        self.pending = None;
        self.phase = TransformPhase::Dragging;
        true
    }

    /// Feed the current gizmo position (render space). Stores the delta as
    /// pending without touching the model.
    pub fn update(&mut self, gizmo_position: Vec3) {
        if self.phase != TransformPhase::Dragging {
            return;
        }
        let delta = PlanVec3::from_render(gizmo_position - self.reference);
        self.pending = Some(delta);
    }

    /// The render-only offset for an entity during the drag: the pending
    /// delta for members, zero for everything else.
    pub fn render_offset(&self, key: &EntityKey) -> PlanVec3 {
        match (&self.pending, self.phase) {
            (Some(delta), TransformPhase::Dragging) if self.start_positions.contains_key(key) => {
                *delta
            }
            _ => PlanVec3::ZERO,
        }
    }

    pub fn is_member(&self, key: &EntityKey) -> bool {
        self.is_transforming() && self.start_positions.contains_key(key)
    }

    /// End the drag. Produces one aggregate move command covering every
    /// member when there is a net delta; a pure click without movement
    /// produces nothing. Either way the session enters `PendingCommit`.
    pub fn release(&mut self) -> Option<EditCommand> {
        if self.phase != TransformPhase::Dragging {
            return None;
        }
        self.phase = TransformPhase::PendingCommit;

        let delta = self.pending.take()?;
        if delta.length() == 0.0 {
            return None;
        }

        let moves: Vec<(EntityKey, PlanPoint, PlanPoint)> = self
            .members
            .iter()
            .filter_map(|key| {
                let start = *self.start_positions.get(key)?;
                Some((key.clone(), start, start + delta))
            })
            .collect();
        if moves.is_empty() {
            return None;
        }
        Some(EditCommand::MoveEntities { moves })
    }

    /// Settle the commit: `PendingCommit -> Idle`. Called after all
    /// listeners for the terminating pointer-up have run.
    pub fn finish(&mut self) {
        if self.phase == TransformPhase::PendingCommit {
            self.phase = TransformPhase::Idle;
            self.members.clear();
            self.start_positions.clear();
        }
    }

    /// Discard any in-flight drag, e.g. on tool switch.
    pub fn cancel(&mut self) {
        self.phase = TransformPhase::Idle;
        self.members.clear();
        self.start_positions.clear();
        self.pending = None;
    }
}
