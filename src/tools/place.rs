//! Placement tool
//!
//! Governs the "adding object / setting spawn point" interaction modes. The
//! state machine accumulates one or two floor points, depending on the kind
//! being placed, before emitting a completed placement:
//!
//! - Two-point kinds (glazing, partition): the first floor click captures
//!   the start point, the second computes length/angle and emits the
//!   entity, after which the tool is ready for the next placement.
//! - Single-point kinds (door, stairs, till, spawn point): one click
//!   completes immediately.
//!
//! Only classified clicks advance the machine; drags over the floor are
//! ignored. Degenerate two-point spans are rejected silently and the state
//! is retained so the user may retry the second point.

use bevy::prelude::*;

use crate::core::session::EditorSession;
use crate::core::io::pointer::{Gesture, PointerReleased};
use crate::editing::commands::EditCommand;
use crate::editing::entity::{ArchKind, ArchObject, ArchShape, ArchSize, MIN_SPAN};
use crate::geometry::{PlanPoint, PlanRotation};
use crate::rendering::entities::FloorSurface;
use crate::systems::hit_testing::{cast_floor_ray, ray_box_intersection, HitVolume, RayHit};
use crate::tools::{CurrentTool, PlacementKind, ToolKind};

/// Default wall height for newly placed two-point objects, plan units.
const DEFAULT_SPAN_HEIGHT: f32 = 2.5;

/// Where the placement state machine currently is.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum PlacementPhase {
    #[default]
    Inactive,
    AwaitingFirstPoint,
    AwaitingSecondPoint {
        start: PlanPoint,
    },
}

/// What a completed placement produced.
#[derive(Debug, Clone, PartialEq)]
pub enum PlacementOutcome {
    Arch { kind: ArchKind, shape: ArchShape },
    SpawnPoint(PlanPoint),
}

/// The placement tool's state machine.
#[derive(Resource, Debug, Default)]
pub struct PlacementState {
    kind: Option<PlacementKind>,
    phase: PlacementPhase,
}

impl PlacementState {
    pub fn phase(&self) -> PlacementPhase {
        self.phase
    }

    pub fn activate(&mut self, kind: PlacementKind) {
        self.kind = Some(kind);
        self.phase = PlacementPhase::AwaitingFirstPoint;
    }

    pub fn deactivate(&mut self) {
        self.kind = None;
        self.phase = PlacementPhase::Inactive;
    }

    /// Feed one classified floor click. Returns a completed placement when
    /// the machine has accumulated enough points.
    pub fn handle_point(&mut self, point: PlanPoint) -> Option<PlacementOutcome> {
        let kind = self.kind?;
        match (self.phase, arch_kind_of(kind)) {
            (PlacementPhase::Inactive, _) => None,
            (PlacementPhase::AwaitingFirstPoint, Some(arch_kind)) if arch_kind.is_two_point() => {
                self.phase = PlacementPhase::AwaitingSecondPoint { start: point };
                None
            }
            (PlacementPhase::AwaitingFirstPoint, Some(arch_kind)) => {
                // Single-point kinds complete immediately.
                Some(PlacementOutcome::Arch {
                    kind: arch_kind,
                    shape: ArchShape::SinglePoint {
                        position: point,
                        rotation: PlanRotation::ZERO,
                        size: ArchSize::default(),
                    },
                })
            }
            (PlacementPhase::AwaitingFirstPoint, None) => {
                Some(PlacementOutcome::SpawnPoint(point))
            }
            (PlacementPhase::AwaitingSecondPoint { start }, Some(arch_kind)) => {
                if start.distance(point) < MIN_SPAN {
                    // Degenerate span; keep waiting for a usable second point.
                    debug!("rejecting zero-length {arch_kind:?} placement");
                    return None;
                }
                // Ready for the next placement of the same kind.
                self.phase = PlacementPhase::AwaitingFirstPoint;
                Some(PlacementOutcome::Arch {
                    kind: arch_kind,
                    shape: ArchShape::TwoPoint {
                        start,
                        end: point,
                        height: DEFAULT_SPAN_HEIGHT,
                        rotation: 0.0,
                    },
                })
            }
            (PlacementPhase::AwaitingSecondPoint { .. }, None) => None,
        }
    }
}

fn arch_kind_of(kind: PlacementKind) -> Option<ArchKind> {
    match kind {
        PlacementKind::Glazing => Some(ArchKind::Glazing),
        PlacementKind::Partition => Some(ArchKind::Partition),
        PlacementKind::Door => Some(ArchKind::Door),
        PlacementKind::Stairs => Some(ArchKind::Stairs),
        PlacementKind::Till => Some(ArchKind::Till),
        PlacementKind::SpawnPoint => None,
    }
}

/// The floor the editor is currently working on.
#[derive(Resource, Debug, Default)]
pub struct ActiveFloor(pub u32);

/// System to feed floor clicks into the placement state machine and commit
/// completed placements.
pub fn handle_placement_click(
    mut releases: EventReader<PointerReleased>,
    current_tool: Res<CurrentTool>,
    mut placement: ResMut<PlacementState>,
    mut session: ResMut<EditorSession>,
    active_floor: Res<ActiveFloor>,
    surfaces: Query<(&GlobalTransform, &HitVolume, Option<&FloorSurface>)>,
) {
    if !matches!(current_tool.kind, ToolKind::Place(_)) {
        return;
    }

    for release in releases.read() {
        if release.gesture != Gesture::Click {
            // A drag over the floor must never advance the state machine.
            continue;
        }
        let Some(ray) = release.ray else {
            continue;
        };

        let mut hits: Vec<RayHit> = Vec::new();
        for (transform, volume, floor) in &surfaces {
            let t = transform.compute_transform();
            if let Some(distance) = ray_box_intersection(
                ray.origin,
                *ray.direction,
                t.translation,
                t.rotation,
                volume.half_extents,
            ) {
                hits.push(RayHit {
                    distance,
                    point: ray.origin + *ray.direction * distance,
                    interactive: floor.is_none(),
                });
            }
        }

        let Some(world_point) = cast_floor_ray(&ray, &mut hits) else {
            // No floor and no usable ground plane: drop the click, keep the
            // current phase so the user may retry.
            debug!("placement click dropped: ray produced no floor point");
            continue;
        };
        let plan_point = PlanPoint::from_render(world_point);

        match placement.handle_point(plan_point) {
            Some(PlacementOutcome::Arch { kind, shape }) => {
                let id = session.model.allocate_arch_id();
                let object = ArchObject::new(id, kind, active_floor.0, shape);
                info!(
                    "placing {:?} (length {:.2})",
                    kind,
                    object.shape.length()
                );
                session.execute(EditCommand::PlaceArch { object });
            }
            Some(PlacementOutcome::SpawnPoint(point)) => {
                let before = session.model.spawn_point;
                session.execute(EditCommand::SetSpawnPoint {
                    before,
                    after: point,
                });
            }
            None => {}
        }
    }
}

/// Plugin for the placement tool
pub struct PlacementToolPlugin;

impl Plugin for PlacementToolPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<PlacementState>()
            .init_resource::<ActiveFloor>()
            .add_systems(Update, handle_placement_click);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn two_point_flow_emits_glazing() {
        let mut state = PlacementState::default();
        state.activate(PlacementKind::Glazing);
        assert_eq!(state.phase(), PlacementPhase::AwaitingFirstPoint);

        assert!(state.handle_point(PlanPoint::ZERO).is_none());
        assert!(matches!(
            state.phase(),
            PlacementPhase::AwaitingSecondPoint { .. }
        ));

        let outcome = state
            .handle_point(PlanPoint::new(4.0, 0.0, 0.0))
            .expect("second point completes the placement");
        let PlacementOutcome::Arch { kind, shape } = outcome else {
            panic!("expected an architectural placement");
        };
        assert_eq!(kind, ArchKind::Glazing);
        assert!((shape.length() - 4.0).abs() < 1e-5);
        assert!(shape.angle().abs() < 1e-5);
        // Ready for the next run of glazing.
        assert_eq!(state.phase(), PlacementPhase::AwaitingFirstPoint);
    }

    #[test]
    fn degenerate_span_is_rejected_and_state_retained() {
        let mut state = PlacementState::default();
        state.activate(PlacementKind::Partition);
        state.handle_point(PlanPoint::new(1.0, 1.0, 0.0));
        let outcome = state.handle_point(PlanPoint::new(1.0, 1.0, 0.0));
        assert!(outcome.is_none());
        assert!(matches!(
            state.phase(),
            PlacementPhase::AwaitingSecondPoint { .. }
        ));
    }

    #[test]
    fn single_point_kind_completes_immediately() {
        let mut state = PlacementState::default();
        state.activate(PlacementKind::Door);
        let outcome = state.handle_point(PlanPoint::new(2.0, 3.0, 0.0));
        assert!(matches!(
            outcome,
            Some(PlacementOutcome::Arch {
                kind: ArchKind::Door,
                ..
            })
        ));
    }

    #[test]
    fn spawn_point_kind_emits_spawn_outcome() {
        let mut state = PlacementState::default();
        state.activate(PlacementKind::SpawnPoint);
        let point = PlanPoint::new(5.0, 5.0, 0.0);
        assert_eq!(
            state.handle_point(point),
            Some(PlacementOutcome::SpawnPoint(point))
        );
    }

    #[test]
    fn inactive_state_ignores_points() {
        let mut state = PlacementState::default();
        assert!(state.handle_point(PlanPoint::ZERO).is_none());
        state.activate(PlacementKind::Door);
        state.deactivate();
        assert!(state.handle_point(PlanPoint::ZERO).is_none());
    }
}
