//! Measure tool for measuring distances on the floor
//!
//! A degenerate two-point flow: two floor clicks define a segment whose live
//! distance is displayed, but nothing is ever committed to the model or the
//! command stack. Toggling the tool off clears the measurement.

use bevy::prelude::*;

use crate::core::io::pointer::{Gesture, PointerReleased};
use crate::geometry::PlanPoint;
use crate::rendering::entities::FloorSurface;
use crate::systems::hit_testing::{cast_floor_ray, ray_box_intersection, HitVolume, RayHit};
use crate::tools::{CurrentTool, ToolKind};

/// Current measurement state.
#[derive(Resource, Debug, Default)]
pub struct MeasureState {
    first: Option<PlanPoint>,
    segment: Option<(PlanPoint, PlanPoint)>,
}

impl MeasureState {
    /// Feed one classified floor click.
    pub fn handle_point(&mut self, point: PlanPoint) {
        match self.first.take() {
            None => {
                self.first = Some(point);
                self.segment = None;
            }
            Some(first) => {
                self.segment = Some((first, point));
            }
        }
    }

    /// The measured distance, once two points have been clicked.
    pub fn distance(&self) -> Option<f32> {
        self.segment.map(|(a, b)| a.distance(b))
    }

    pub fn segment(&self) -> Option<(PlanPoint, PlanPoint)> {
        self.segment
    }

    pub fn clear(&mut self) {
        self.first = None;
        self.segment = None;
    }
}

/// System to feed floor clicks into the measurement state.
pub fn handle_measure_click(
    mut releases: EventReader<PointerReleased>,
    current_tool: Res<CurrentTool>,
    mut measure: ResMut<MeasureState>,
    surfaces: Query<(&GlobalTransform, &HitVolume, Option<&FloorSurface>)>,
) {
    if current_tool.kind != ToolKind::Measure {
        return;
    }

    for release in releases.read() {
        if release.gesture != Gesture::Click {
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
            continue;
        };

        measure.handle_point(PlanPoint::from_render(world_point));
        if let Some(distance) = measure.distance() {
            info!("measured distance: {distance:.3}");
        }
    }
}

/// Plugin for the measure tool
pub struct MeasureToolPlugin;

impl Plugin for MeasureToolPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<MeasureState>()
            .add_systems(Update, handle_measure_click);
    }
}
