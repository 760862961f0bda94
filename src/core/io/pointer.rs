//! Pointer management and click/drag classification
//!
//! Single source of truth for pointer position: one system converts the
//! cursor to a world-space ray per frame and everything else reads the
//! result from [`PointerInfo`]. The [`GestureTracker`] accumulates pixel
//! travel between press and release; releases are published as
//! [`PointerReleased`] events, already classified as click or drag, so no
//! downstream consumer re-derives the distinction. A drag release must never
//! fire click semantics (selection, placement).

use bevy::input::mouse::MouseButton;
use bevy::prelude::*;

use crate::core::io::input::ModifierState;
use crate::core::settings::CLICK_DRAG_THRESHOLD_PX;
use crate::rendering::cameras::EditorCamera;

/// Current pointer position in its useful forms.
#[derive(Resource, Default)]
pub struct PointerInfo {
    /// Screen space coordinates (pixels), if the cursor is in the window.
    pub screen: Option<Vec2>,
    /// World-space ray under the cursor, if it could be computed.
    pub ray: Option<Ray3d>,
}

/// How a press/release pair is classified.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gesture {
    Click,
    Drag,
}

/// Accumulates pointer travel from mouse-down to decide click vs drag.
#[derive(Resource, Debug, Default)]
pub struct GestureTracker {
    down_at: Option<Vec2>,
    last: Option<Vec2>,
    travel: f32,
}

impl GestureTracker {
    pub fn press(&mut self, position: Vec2) {
        self.down_at = Some(position);
        self.last = Some(position);
        self.travel = 0.0;
    }

    pub fn motion(&mut self, position: Vec2) {
        if let Some(last) = self.last {
            self.travel += position.distance(last);
        }
        if self.down_at.is_some() {
            self.last = Some(position);
        }
    }

    /// Whether the gesture has already committed to being a drag.
    pub fn is_drag(&self) -> bool {
        self.down_at.is_some() && self.travel > CLICK_DRAG_THRESHOLD_PX
    }

    /// Finish the gesture. Returns `None` when no press was recorded.
    pub fn release(&mut self) -> Option<Gesture> {
        let gesture = self.down_at.take().map(|_| {
            if self.travel > CLICK_DRAG_THRESHOLD_PX {
                Gesture::Drag
            } else {
                Gesture::Click
            }
        });
        self.last = None;
        self.travel = 0.0;
        gesture
    }
}

/// Published on primary-button release, classified and stamped with the
/// pointer ray and modifier state at release time.
#[derive(Event, Debug)]
pub struct PointerReleased {
    pub gesture: Gesture,
    pub ray: Option<Ray3d>,
    pub modifiers: ModifierState,
}

/// Plugin that centrally manages pointer state and gesture classification.
pub struct PointerPlugin;

impl Plugin for PointerPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<PointerInfo>()
            .init_resource::<GestureTracker>()
            .add_event::<PointerReleased>()
            .add_systems(PreUpdate, (update_pointer_info, track_pointer_gesture).chain());
    }
}

/// System that updates pointer position once per frame. This is the only
/// place screen-to-world conversion happens.
fn update_pointer_info(
    mut pointer_info: ResMut<PointerInfo>,
    windows: Query<&Window>,
    camera_query: Query<(&Camera, &GlobalTransform), With<EditorCamera>>,
) {
    pointer_info.screen = None;
    pointer_info.ray = None;
    if let (Ok(window), Ok((camera, camera_transform))) =
        (windows.single(), camera_query.single())
    {
        if let Some(screen_pos) = window.cursor_position() {
            pointer_info.screen = Some(screen_pos);
            if let Ok(ray) = camera.viewport_to_world(camera_transform, screen_pos) {
                pointer_info.ray = Some(ray);
            }
        }
    }
}

/// System that feeds the gesture tracker and publishes classified releases.
fn track_pointer_gesture(
    pointer_info: Res<PointerInfo>,
    mouse: Res<ButtonInput<MouseButton>>,
    keyboard: Res<ButtonInput<KeyCode>>,
    mut tracker: ResMut<GestureTracker>,
    mut released: EventWriter<PointerReleased>,
) {
    if mouse.just_pressed(MouseButton::Left) {
        if let Some(screen) = pointer_info.screen {
            tracker.press(screen);
        }
    } else if mouse.pressed(MouseButton::Left) {
        if let Some(screen) = pointer_info.screen {
            tracker.motion(screen);
        }
    }

    if mouse.just_released(MouseButton::Left) {
        if let Some(gesture) = tracker.release() {
            released.write(PointerReleased {
                gesture,
                ray: pointer_info.ray,
                modifiers: ModifierState::from_keyboard(&keyboard),
            });
        }
    }
}
