//! Editor camera
//!
//! A single orbit camera around a focus point on the floor. Orbit input is
//! suspended while a transform session is active so releasing a gizmo drag
//! never kicks the camera.

use bevy::input::mouse::{MouseMotion, MouseWheel};
use bevy::prelude::*;

use crate::core::session::EditorSession;
use crate::core::settings::{MAX_ORBIT_DISTANCE, MIN_ORBIT_DISTANCE, ORBIT_SENSITIVITY};

/// Marker for the editor's camera; pointer ray conversion queries it.
#[derive(Component, Debug)]
pub struct EditorCamera;

/// Orbit parameters for the editor camera.
#[derive(Resource, Debug)]
pub struct OrbitState {
    pub focus: Vec3,
    pub yaw: f32,
    pub pitch: f32,
    pub distance: f32,
}

impl Default for OrbitState {
    fn default() -> Self {
        Self {
            focus: Vec3::ZERO,
            yaw: 0.8,
            pitch: 0.9,
            distance: 30.0,
        }
    }
}

/// System to spawn the editor camera and a light.
pub fn spawn_camera(mut commands: Commands, orbit: Res<OrbitState>) {
    commands.spawn((
        Camera3d::default(),
        camera_transform(&orbit),
        EditorCamera,
    ));
    commands.spawn((
        DirectionalLight {
            illuminance: 8_000.0,
            shadows_enabled: false,
            ..default()
        },
        Transform::from_xyz(10.0, 30.0, 10.0).looking_at(Vec3::ZERO, Vec3::Y),
    ));
}

/// System to apply right-drag orbit and wheel zoom. Disabled while a
/// transform session is in flight.
pub fn orbit_camera(
    session: Res<EditorSession>,
    mouse: Res<ButtonInput<MouseButton>>,
    mut motion: EventReader<MouseMotion>,
    mut wheel: EventReader<MouseWheel>,
    mut orbit: ResMut<OrbitState>,
    mut cameras: Query<&mut Transform, With<EditorCamera>>,
) {
    if session.is_transforming() {
        motion.clear();
        wheel.clear();
        return;
    }

    if mouse.pressed(MouseButton::Right) {
        for event in motion.read() {
            orbit.yaw -= event.delta.x * ORBIT_SENSITIVITY;
            orbit.pitch = (orbit.pitch + event.delta.y * ORBIT_SENSITIVITY)
                .clamp(0.05, std::f32::consts::FRAC_PI_2 - 0.05);
        }
    } else {
        motion.clear();
    }
    for event in wheel.read() {
        orbit.distance = (orbit.distance - event.y * 2.0)
            .clamp(MIN_ORBIT_DISTANCE, MAX_ORBIT_DISTANCE);
    }

    if let Ok(mut transform) = cameras.single_mut() {
        *transform = camera_transform(&orbit);
    }
}

fn camera_transform(orbit: &OrbitState) -> Transform {
    let offset = Vec3::new(
        orbit.distance * orbit.pitch.cos() * orbit.yaw.sin(),
        orbit.distance * orbit.pitch.sin(),
        orbit.distance * orbit.pitch.cos() * orbit.yaw.cos(),
    );
    Transform::from_translation(orbit.focus + offset).looking_at(orbit.focus, Vec3::Y)
}
