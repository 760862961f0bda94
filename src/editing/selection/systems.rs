//! Click selection handling
//!
//! Consumes classified pointer releases while the select tool is active.
//! Only clicks participate; a release classified as a drag never changes the
//! selection. A click that hits no interactive entity raises
//! [`PointerMissed`], which clears the selection unless a transform session
//! is still in flight (the release that ends a gizmo drag arrives through
//! the same event stream).

use bevy::prelude::*;

use crate::core::io::pointer::{Gesture, PointerReleased};
use crate::core::session::EditorSession;
use crate::editing::selection::{PlanEntityRef, Selectable};
use crate::systems::hit_testing::{ray_box_intersection, HitVolume, RayHit};
use crate::tools::{CurrentTool, ToolKind};

/// A selection click that hit empty space.
#[derive(Event, Debug, Default)]
pub struct PointerMissed;

/// System to resolve selection clicks against entity hit volumes.
pub fn handle_selection_click(
    mut releases: EventReader<PointerReleased>,
    current_tool: Res<CurrentTool>,
    mut session: ResMut<EditorSession>,
    selectables: Query<(&GlobalTransform, &HitVolume, &PlanEntityRef), With<Selectable>>,
    mut missed: EventWriter<PointerMissed>,
) {
    if current_tool.kind != ToolKind::Select {
        return;
    }

    for release in releases.read() {
        if release.gesture != Gesture::Click {
            continue;
        }
        let Some(ray) = release.ray else {
            continue;
        };

        // Gather candidate hits, nearest-first resolution happens below.
        let mut hits: Vec<(RayHit, PlanEntityRef)> = Vec::new();
        for (transform, volume, plan_ref) in &selectables {
            if !session.model.contains(&plan_ref.key) {
                continue;
            }
            let t = transform.compute_transform();
            if let Some(distance) = ray_box_intersection(
                ray.origin,
                *ray.direction,
                t.translation,
                t.rotation,
                volume.half_extents,
            ) {
                hits.push((
                    RayHit {
                        distance,
                        point: ray.origin + *ray.direction * distance,
                        interactive: true,
                    },
                    plan_ref.clone(),
                ));
            }
        }
        hits.sort_by(|a, b| a.0.distance.total_cmp(&b.0.distance));
        match hits.into_iter().next() {
            Some((_, plan_ref)) => {
                debug!("selection click hit {:?}", plan_ref.key);
                session.selection.toggle(plan_ref.key, &release.modifiers);
            }
            None => {
                missed.write(PointerMissed);
            }
        }
    }
}

/// System to clear the selection on empty-space clicks, guarded against the
/// release that ends a drag.
pub fn handle_pointer_missed(
    mut missed: EventReader<PointerMissed>,
    mut session: ResMut<EditorSession>,
) {
    let any_missed = missed.read().next().is_some();
    if !any_missed {
        return;
    }
    session.pointer_missed();
}

/// System to drop selected keys whose entities no longer exist (deleted,
/// or removed by undo).
pub fn prune_dead_selection(mut session: ResMut<EditorSession>) {
    let session = &mut *session;
    session.selection.retain_live(&session.model);
}
