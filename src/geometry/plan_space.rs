//! Plan space coordinate system for floor-plan editing
//!
//! This module provides the core coordinate types and transformations for the
//! editor. Plan space is the persisted coordinate system in which fixtures and
//! architectural objects are described: `x` runs along the building, `y` is
//! depth into the floor, and `z` is height above it. The render scene is the
//! usual right-handed Y-up space, so when drawing or hit-testing we translate
//! between the two conventions.
//!
//! The mapping is fixed: render-Y carries plan depth, render-Z carries negated
//! plan height, and the Y/Z rotation components swap between the two spaces
//! (with degrees on the plan side and radians on the render side). Every
//! entity type goes through the same pair of functions, so the convention is
//! applied uniformly across the codebase.

use std::fmt;
use std::ops::{Add, AddAssign, Sub, SubAssign};

use bevy::math::Vec3;
use bevy::prelude::*;

/// A point in plan space.
///
/// `x` and `y` locate the entity on the floor (`y` is depth), `z` is the
/// height above the floor surface.
#[derive(Clone, Copy, Component, PartialEq, Default, serde::Serialize, serde::Deserialize)]
pub struct PlanPoint {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

/// A vector in plan space, used for nudging and dragging.
///
/// A `PlanVec3` is always a relative offset, never an absolute position; its
/// lifetime is typically a single drag gesture.
#[derive(Debug, Clone, Copy, Component, PartialEq, Default)]
pub struct PlanVec3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

/// A rotation in plan space, in degrees per axis.
#[derive(Debug, Clone, Copy, Component, PartialEq, Default, serde::Serialize, serde::Deserialize)]
pub struct PlanRotation {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl PlanPoint {
    pub const ZERO: PlanPoint = PlanPoint {
        x: 0.0,
        y: 0.0,
        z: 0.0,
    };

    /// Create a new `PlanPoint` with the given coordinates. Should only be
    /// used with inputs already in plan space, such as when loaded from file.
    pub fn new(x: f32, y: f32, z: f32) -> PlanPoint {
        PlanPoint { x, y, z }
    }

    /// Convert a render-space position back into plan space. Exact inverse of
    /// [`PlanPoint::to_render`].
    pub fn from_render(pos: Vec3) -> PlanPoint {
        PlanPoint::new(pos.x, pos.y, -pos.z)
    }

    /// Convert this plan point into a render-space position.
    ///
    /// Render-Y carries plan depth; render-Z carries negated plan height.
    pub fn to_render(self) -> Vec3 {
        Vec3::new(self.x, self.y, -self.z)
    }

    /// Straight-line distance to another plan point.
    pub fn distance(self, other: PlanPoint) -> f32 {
        (other - self).length()
    }
}

impl PlanVec3 {
    pub const ZERO: PlanVec3 = PlanVec3 {
        x: 0.0,
        y: 0.0,
        z: 0.0,
    };

    pub fn new(x: f32, y: f32, z: f32) -> PlanVec3 {
        PlanVec3 { x, y, z }
    }

    /// Convert a render-space delta into a plan-space delta. Same axis
    /// remapping as positions; deltas have no origin so the rule is identical.
    pub fn from_render(delta: Vec3) -> PlanVec3 {
        PlanVec3::new(delta.x, delta.y, -delta.z)
    }

    #[inline]
    pub fn to_render(self) -> Vec3 {
        Vec3::new(self.x, self.y, -self.z)
    }

    #[inline]
    pub fn length(self) -> f32 {
        self.to_render().length()
    }
}

impl PlanRotation {
    pub const ZERO: PlanRotation = PlanRotation {
        x: 0.0,
        y: 0.0,
        z: 0.0,
    };

    pub fn new(x: f32, y: f32, z: f32) -> PlanRotation {
        PlanRotation { x, y, z }
    }

    /// Convert this plan rotation (degrees) into render-space Euler angles
    /// (radians). The Y and Z components swap between the two spaces.
    pub fn to_render(self) -> Vec3 {
        Vec3::new(
            self.x.to_radians(),
            self.z.to_radians(),
            self.y.to_radians(),
        )
    }

    /// Exact inverse of [`PlanRotation::to_render`].
    pub fn from_render(euler: Vec3) -> PlanRotation {
        PlanRotation::new(
            euler.x.to_degrees(),
            euler.z.to_degrees(),
            euler.y.to_degrees(),
        )
    }

    /// The render-space quaternion for this rotation.
    pub fn to_render_quat(self) -> Quat {
        let euler = self.to_render();
        Quat::from_euler(EulerRot::XYZ, euler.x, euler.y, euler.z)
    }
}

impl Add<PlanVec3> for PlanPoint {
    type Output = PlanPoint;

    fn add(self, other: PlanVec3) -> Self {
        PlanPoint::new(self.x + other.x, self.y + other.y, self.z + other.z)
    }
}

impl Sub<PlanVec3> for PlanPoint {
    type Output = PlanPoint;

    fn sub(self, other: PlanVec3) -> Self {
        PlanPoint::new(self.x - other.x, self.y - other.y, self.z - other.z)
    }
}

impl Sub<PlanPoint> for PlanPoint {
    type Output = PlanVec3;

    fn sub(self, other: PlanPoint) -> PlanVec3 {
        PlanVec3::new(self.x - other.x, self.y - other.y, self.z - other.z)
    }
}

impl Add for PlanVec3 {
    type Output = PlanVec3;

    fn add(self, other: PlanVec3) -> PlanVec3 {
        PlanVec3::new(self.x + other.x, self.y + other.y, self.z + other.z)
    }
}

impl AddAssign for PlanVec3 {
    fn add_assign(&mut self, rhs: PlanVec3) {
        *self = *self + rhs;
    }
}

impl Sub for PlanVec3 {
    type Output = PlanVec3;

    fn sub(self, other: PlanVec3) -> PlanVec3 {
        PlanVec3::new(self.x - other.x, self.y - other.y, self.z - other.z)
    }
}

impl SubAssign for PlanVec3 {
    fn sub_assign(&mut self, rhs: PlanVec3) {
        *self = *self - rhs;
    }
}

impl From<(f32, f32, f32)> for PlanPoint {
    fn from(src: (f32, f32, f32)) -> PlanPoint {
        PlanPoint::new(src.0, src.1, src.2)
    }
}

impl fmt::Debug for PlanPoint {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "PlanPoint<{} {} {}>", self.x, self.y, self.z)
    }
}

impl fmt::Display for PlanPoint {
    fn fmt(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        write!(
            formatter,
            "x: {:.1}, y: {:.1}, z: {:.1}",
            self.x, self.y, self.z
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOLERANCE: f32 = 1e-5;

    fn approx(a: f32, b: f32) -> bool {
        (a - b).abs() < TOLERANCE
    }

    #[test]
    fn position_round_trip() {
        let points = [
            PlanPoint::new(0.0, 0.0, 0.0),
            PlanPoint::new(12.5, -3.25, 4.0),
            PlanPoint::new(-100.0, 55.5, -0.75),
            PlanPoint::new(0.001, 9999.0, 42.0),
        ];
        for p in points {
            let back = PlanPoint::from_render(p.to_render());
            assert!(approx(back.x, p.x) && approx(back.y, p.y) && approx(back.z, p.z),
                "round trip failed for {p:?}, got {back:?}");
        }
    }

    #[test]
    fn rotation_round_trip() {
        let rotations = [
            PlanRotation::new(0.0, 0.0, 0.0),
            PlanRotation::new(90.0, 45.0, -30.0),
            PlanRotation::new(-180.0, 270.0, 15.5),
        ];
        for r in rotations {
            let back = PlanRotation::from_render(r.to_render());
            assert!(approx(back.x, r.x) && approx(back.y, r.y) && approx(back.z, r.z),
                "round trip failed for {r:?}, got {back:?}");
        }
    }

    #[test]
    fn height_axis_is_negated_forward_axis() {
        let p = PlanPoint::new(1.0, 2.0, 3.0);
        let render = p.to_render();
        assert_eq!(render, Vec3::new(1.0, 2.0, -3.0));
    }

    #[test]
    fn rotation_swaps_y_and_z() {
        let r = PlanRotation::new(0.0, 90.0, 180.0);
        let render = r.to_render();
        assert!(approx(render.y, 180.0_f32.to_radians()));
        assert!(approx(render.z, 90.0_f32.to_radians()));
    }

    #[test]
    fn delta_mapping_matches_position_mapping() {
        let a = PlanPoint::new(1.0, 2.0, 3.0);
        let b = PlanPoint::new(4.0, 6.0, 3.5);
        let model_delta = b - a;
        let render_delta = b.to_render() - a.to_render();
        let back = PlanVec3::from_render(render_delta);
        assert!(approx(back.x, model_delta.x));
        assert!(approx(back.y, model_delta.y));
        assert!(approx(back.z, model_delta.z));
    }
}
