//! Scene presentation: cameras, entity sync, gizmo interaction.

pub mod cameras;
pub mod entities;
pub mod gizmo;

use bevy::prelude::*;

use crate::rendering::cameras::{orbit_camera, spawn_camera, OrbitState};
use crate::rendering::entities::{
    highlight_selection, spawn_floor, sync_plan_entities, sync_spawn_marker,
};

pub struct RenderingPlugin;

impl Plugin for RenderingPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<OrbitState>()
            .add_plugins(gizmo::GizmoPlugin)
            .add_systems(Startup, (spawn_camera, spawn_floor))
            .add_systems(Update, orbit_camera)
            .add_systems(
                PostUpdate,
                (sync_plan_entities, sync_spawn_marker, highlight_selection)
                    .before(gizmo::finish_transform_sessions),
            );
    }
}
