//! Transform gizmo interaction
//!
//! Drives the [`TransformSession`] from raw pointer input: pressing on a
//! selected entity starts a drag, pointer motion is projected onto the
//! horizontal plane through the grab point and fed to the session, release
//! commits the aggregate move through the editor session. Settling the
//! session back to `Idle` happens in `PostUpdate`, one stage after every
//! pointer-up listener has had its look at the transforming flag.

use bevy::prelude::*;

use crate::core::io::input::InputState;
use crate::core::io::pointer::PointerInfo;
use crate::core::session::EditorSession;
use crate::editing::selection::{GizmoMode, PlanEntityRef, Selected};
use crate::editing::transform::TransformPhase;
use crate::systems::hit_testing::{ray_box_intersection, HitVolume};
use crate::tools::{CurrentTool, ToolKind};

/// Degrees per rotate-key press, single-fixture gizmo only.
const ROTATE_STEP_DEG: f32 = 15.0;

/// Screen-space state of an active gizmo drag.
#[derive(Resource, Debug, Default)]
pub struct GizmoDrag {
    /// World point where the drag grabbed the selection.
    grab: Vec3,
    /// Selection centroid (render space) at drag start, the point whose
    /// virtual motion the transform session consumes.
    reference: Vec3,
}

impl GizmoDrag {
    /// Height of the drag plane; all drag motion stays at the grab height.
    fn plane_height(&self) -> f32 {
        self.grab.y
    }
}

/// System to start a drag when the pointer presses a selected entity.
pub fn begin_gizmo_drag(
    buttons: Res<ButtonInput<MouseButton>>,
    pointer: Res<PointerInfo>,
    input_state: Res<InputState>,
    current_tool: Res<CurrentTool>,
    mut session: ResMut<EditorSession>,
    mut drag: ResMut<GizmoDrag>,
    selected: Query<(&GlobalTransform, &HitVolume), (With<Selected>, With<PlanEntityRef>)>,
) {
    if !buttons.just_pressed(MouseButton::Left) || input_state.ui_consuming {
        return;
    }
    if current_tool.kind != ToolKind::Select {
        return;
    }
    let Some(ray) = pointer.ray else {
        return;
    };

    // The drag must grab a member of the current selection; pressing
    // anywhere else is left to the selection systems.
    let mut grab: Option<(f32, Vec3)> = None;
    for (transform, volume) in &selected {
        let t = transform.compute_transform();
        if let Some(distance) = ray_box_intersection(
            ray.origin,
            *ray.direction,
            t.translation,
            t.rotation,
            volume.half_extents,
        ) {
            if grab.is_none_or(|(best, _)| distance < best) {
                grab = Some((distance, ray.origin + *ray.direction * distance));
            }
        }
    }
    let Some((_, grab_point)) = grab else {
        return;
    };

    let session = &mut *session;
    let mut sum = Vec3::ZERO;
    let mut n = 0u32;
    for key in session.selection.iter() {
        if let Some(position) = session.model.position_of(key) {
            sum += position.to_render();
            n += 1;
        }
    }
    if n == 0 {
        return;
    }
    if session.transform.begin(&session.selection, &session.model) {
        drag.grab = grab_point;
        drag.reference = sum / n as f32;
        debug!("gizmo drag started over {} entities", n);
    }
}

/// System to feed pointer motion into the active drag.
pub fn update_gizmo_drag(
    pointer: Res<PointerInfo>,
    drag: Res<GizmoDrag>,
    mut session: ResMut<EditorSession>,
) {
    if session.transform.phase() != TransformPhase::Dragging {
        return;
    }
    let Some(ray) = pointer.ray else {
        return;
    };
    let Some(point) = plane_intersection(&ray, drag.plane_height()) else {
        return;
    };
    // Carry the grab offset so the selection does not jump to the cursor.
    let gizmo_position = drag.reference + (point - drag.grab);
    session.transform.update(gizmo_position);
}

/// System to commit the drag on pointer release.
pub fn end_gizmo_drag(
    buttons: Res<ButtonInput<MouseButton>>,
    mut session: ResMut<EditorSession>,
) {
    if !buttons.just_released(MouseButton::Left) {
        return;
    }
    if session.transform.phase() != TransformPhase::Dragging {
        return;
    }
    if let Some(command) = session.transform.release() {
        info!("committing drag: {}", command.name());
        session.execute(command);
    }
}

/// System to settle `PendingCommit` sessions back to idle. Runs in
/// `PostUpdate`, after the selection systems have seen the release.
pub fn finish_transform_sessions(mut session: ResMut<EditorSession>) {
    session.transform.finish();
}

/// System for step-rotation of a single selected fixture. Group selections
/// ignore the keys, matching the translate-only group gizmo.
pub fn handle_rotate_keys(
    keyboard: Res<ButtonInput<KeyCode>>,
    input_state: Res<InputState>,
    mut session: ResMut<EditorSession>,
) {
    if input_state.ui_consuming {
        return;
    }
    let step = if keyboard.just_pressed(KeyCode::BracketRight) {
        ROTATE_STEP_DEG
    } else if keyboard.just_pressed(KeyCode::BracketLeft) {
        -ROTATE_STEP_DEG
    } else {
        return;
    };
    if session.selection.gizmo_mode() != GizmoMode::Single {
        return;
    }
    let target = session.selection.iter().next().cloned();
    let Some(crate::editing::entity::EntityKey::Fixture(key)) = target else {
        return;
    };
    let Some(mut rotation) = session.model.fixture(&key).map(|f| f.rotation) else {
        return;
    };
    rotation.y += step;
    session.set_rotation(key, rotation);
}

fn plane_intersection(ray: &Ray3d, height: f32) -> Option<Vec3> {
    let direction = ray.direction.as_vec3();
    if direction.y.abs() < 1e-6 {
        return None;
    }
    let t = (height - ray.origin.y) / direction.y;
    if t < 0.0 {
        return None;
    }
    Some(ray.origin + direction * t)
}

pub struct GizmoPlugin;

impl Plugin for GizmoPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<GizmoDrag>()
            .add_systems(
                Update,
                (begin_gizmo_drag, update_gizmo_drag, end_gizmo_drag, handle_rotate_keys).chain(),
            )
            .add_systems(PostUpdate, finish_transform_sessions);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drag_plane_follows_grab_height() {
        let ray = Ray3d::new(Vec3::new(0.0, 10.0, 0.0), Dir3::NEG_Y);
        let point = plane_intersection(&ray, 2.0).unwrap();
        assert_eq!(point, Vec3::new(0.0, 2.0, 0.0));
    }

    #[test]
    fn parallel_ray_misses_drag_plane() {
        let ray = Ray3d::new(Vec3::new(0.0, 5.0, 0.0), Dir3::X);
        assert!(plane_intersection(&ray, 0.0).is_none());
    }

    #[test]
    fn plane_behind_camera_is_rejected() {
        let ray = Ray3d::new(Vec3::new(0.0, 1.0, 0.0), Dir3::Y);
        assert!(plane_intersection(&ray, 0.0).is_none());
    }
}
