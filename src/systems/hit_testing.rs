//! Ray-based hit testing against the editor scene
//!
//! Placement tools need a point on the floor; selection needs the nearest
//! interactive entity under the cursor. Both start from the same pointer ray
//! and a list of candidate intersections gathered from entity hit volumes.
//!
//! Floor picks walk the intersection list nearest-first and take the first
//! mesh flagged NON-interactive (the floor or building shell), skipping
//! fixtures and overlays that happen to be in front of it. When no such mesh
//! is hit the ray falls back to a horizontal plane at height zero, so
//! placement always yields a point over empty space. A ray parallel to that
//! plane yields nothing and the caller must no-op.

use bevy::prelude::*;

/// Axis-aligned hit volume in the entity's local space, attached by the
/// rendering systems alongside the mesh.
#[derive(Component, Debug, Clone, Copy)]
pub struct HitVolume {
    pub half_extents: Vec3,
}

/// One candidate intersection along a pointer ray.
#[derive(Debug, Clone, Copy)]
pub struct RayHit {
    /// Distance from the ray origin.
    pub distance: f32,
    /// World-space intersection point.
    pub point: Vec3,
    /// Whether the hit mesh is an interactive overlay (fixture, gizmo) as
    /// opposed to the floor/building shell.
    pub interactive: bool,
}

/// Slab-test a ray against an oriented box. Returns the entry distance, or
/// `None` when the ray misses or the box is behind the origin.
pub fn ray_box_intersection(
    origin: Vec3,
    direction: Vec3,
    translation: Vec3,
    rotation: Quat,
    half_extents: Vec3,
) -> Option<f32> {
    // Transform the ray into the box's local frame so the test is AABB.
    let inverse = rotation.inverse();
    let local_origin = inverse * (origin - translation);
    let local_dir = inverse * direction;

    let mut t_min = f32::NEG_INFINITY;
    let mut t_max = f32::INFINITY;

    for axis in 0..3 {
        let o = local_origin[axis];
        let d = local_dir[axis];
        let extent = half_extents[axis];
        if d.abs() < f32::EPSILON {
            if o.abs() > extent {
                return None;
            }
        } else {
            let mut t1 = (-extent - o) / d;
            let mut t2 = (extent - o) / d;
            if t1 > t2 {
                std::mem::swap(&mut t1, &mut t2);
            }
            t_min = t_min.max(t1);
            t_max = t_max.min(t2);
            if t_min > t_max {
                return None;
            }
        }
    }

    if t_max < 0.0 {
        return None;
    }
    Some(t_min.max(0.0))
}

/// Intersect a ray with the horizontal plane at height zero.
pub fn ground_plane_intersection(ray: &Ray3d) -> Option<Vec3> {
    let direction = *ray.direction;
    if direction.y.abs() < f32::EPSILON {
        // Parallel to the ground; nothing to hit.
        return None;
    }
    let t = -ray.origin.y / direction.y;
    if t < 0.0 {
        return None;
    }
    Some(ray.origin + direction * t)
}

/// Pick the floor point for a placement click.
///
/// `hits` is the unordered candidate list for this ray; the nearest
/// non-interactive hit wins, the ground plane is the fallback, and `None`
/// means the click must be dropped.
pub fn cast_floor_ray(ray: &Ray3d, hits: &mut Vec<RayHit>) -> Option<Vec3> {
    hits.sort_by(|a, b| a.distance.total_cmp(&b.distance));
    for hit in hits.iter() {
        if !hit.interactive {
            return Some(hit.point);
        }
    }
    ground_plane_intersection(ray)
}
