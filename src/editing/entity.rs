//! The floor-plan data model
//!
//! Placed entities come in two families: retail `Fixture`s, loaded from
//! upstream plan data and identified by a stable composite key, and
//! `ArchObject`s (doors, partitions, glazing and friends), created in the
//! editor and identified by a locally assigned id. Both live in the
//! [`PlanModel`], which is mutated only through committed edit commands,
//! never by direct field assignment from UI code.
//!
//! Change tracking uses a baseline snapshot taken at load or placement time;
//! "was moved / was rotated / was resized" predicates are derived by
//! comparing current values against the baseline rather than maintained as
//! separate booleans.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::geometry::{PlanPoint, PlanRotation};

/// Minimum span for a two-point architectural object. Anything shorter is a
/// degenerate placement and is rejected before it reaches the model.
pub const MIN_SPAN: f32 = 1e-3;

/// Stable identity for a fixture, derived from plan data rather than stored
/// as an id: the floor it sits on, its block (type) name, and its sequence
/// number within that block on that floor.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct FixtureKey {
    pub floor: u32,
    pub block: String,
    pub seq: u32,
}

impl FixtureKey {
    pub fn new(floor: u32, block: impl Into<String>, seq: u32) -> Self {
        Self {
            floor,
            block: block.into(),
            seq,
        }
    }
}

/// Locally assigned identity for an architectural object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ArchId(pub u64);

/// Identity of any placed entity in the plan.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum EntityKey {
    Fixture(FixtureKey),
    Arch(ArchId),
}

/// The geometry a fixture baseline snapshots for diffing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FixtureBaseline {
    pub position: PlanPoint,
    pub rotation: PlanRotation,
    pub brand: String,
    pub block: String,
    pub count: u32,
}

/// A retail fixture placed on a floor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fixture {
    pub floor: u32,
    pub block: String,
    pub seq: u32,
    pub position: PlanPoint,
    /// Rotation in degrees per plan axis.
    pub rotation: PlanRotation,
    pub brand: String,
    /// How many identical units this fixture represents; rendered as a
    /// side-by-side stack. Always >= 1.
    pub count: u32,
    /// Optional model URL for the fixture's 3D asset.
    pub model_url: Option<String>,
    /// Soft delete: a flagged fixture stays in the backing collection but is
    /// excluded from selection, rendering and hit testing.
    pub for_delete: bool,
    baseline: FixtureBaseline,
}

impl Fixture {
    pub fn new(
        floor: u32,
        block: impl Into<String>,
        seq: u32,
        position: PlanPoint,
        brand: impl Into<String>,
    ) -> Self {
        let block = block.into();
        let brand = brand.into();
        let baseline = FixtureBaseline {
            position,
            rotation: PlanRotation::ZERO,
            brand: brand.clone(),
            block: block.clone(),
            count: 1,
        };
        Self {
            floor,
            block,
            seq,
            position,
            rotation: PlanRotation::ZERO,
            brand,
            count: 1,
            model_url: None,
            for_delete: false,
            baseline,
        }
    }

    pub fn key(&self) -> FixtureKey {
        FixtureKey::new(self.floor, self.block.clone(), self.seq)
    }

    /// Re-snapshot the baseline, e.g. after the plan is saved upstream.
    pub fn rebase(&mut self) {
        self.baseline = FixtureBaseline {
            position: self.position,
            rotation: self.rotation,
            brand: self.brand.clone(),
            block: self.block.clone(),
            count: self.count,
        };
    }

    pub fn was_moved(&self) -> bool {
        self.position != self.baseline.position
    }

    pub fn was_rotated(&self) -> bool {
        self.rotation != self.baseline.rotation
    }

    pub fn was_brand_changed(&self) -> bool {
        self.brand != self.baseline.brand
    }

    pub fn was_type_changed(&self) -> bool {
        self.block != self.baseline.block
    }

    pub fn was_count_changed(&self) -> bool {
        self.count != self.baseline.count
    }
}

/// What kind of architectural object this is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ArchKind {
    Glazing,
    Partition,
    Door,
    Stairs,
    Till,
    Column,
}

impl ArchKind {
    /// Two-point kinds are defined by a start and end point on the floor;
    /// single-point kinds by one position plus a size.
    pub fn is_two_point(self) -> bool {
        matches!(self, ArchKind::Glazing | ArchKind::Partition)
    }
}

/// Width/height/depth of a single-point architectural object.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ArchSize {
    pub width: f32,
    pub height: f32,
    pub depth: f32,
}

impl Default for ArchSize {
    fn default() -> Self {
        Self {
            width: 1.0,
            height: 2.0,
            depth: 0.2,
        }
    }
}

/// The shape of an architectural object. Every consumer matches this
/// exhaustively; there is no optional-field fallback between the variants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ArchShape {
    TwoPoint {
        start: PlanPoint,
        end: PlanPoint,
        height: f32,
        /// Extra rotation about the span axis, degrees.
        rotation: f32,
    },
    SinglePoint {
        position: PlanPoint,
        rotation: PlanRotation,
        size: ArchSize,
    },
}

impl ArchShape {
    /// The anchor used for selection centroids and group translation.
    pub fn anchor(&self) -> PlanPoint {
        match self {
            ArchShape::TwoPoint { start, end, .. } => PlanPoint::new(
                (start.x + end.x) / 2.0,
                (start.y + end.y) / 2.0,
                (start.z + end.z) / 2.0,
            ),
            ArchShape::SinglePoint { position, .. } => *position,
        }
    }

    /// Translate the whole shape by a plan-space delta.
    pub fn translated(&self, delta: crate::geometry::PlanVec3) -> ArchShape {
        match self {
            ArchShape::TwoPoint {
                start,
                end,
                height,
                rotation,
            } => ArchShape::TwoPoint {
                start: *start + delta,
                end: *end + delta,
                height: *height,
                rotation: *rotation,
            },
            ArchShape::SinglePoint {
                position,
                rotation,
                size,
            } => ArchShape::SinglePoint {
                position: *position + delta,
                rotation: *rotation,
                size: *size,
            },
        }
    }

    /// Span length for two-point shapes, 0 for single-point.
    pub fn length(&self) -> f32 {
        match self {
            ArchShape::TwoPoint { start, end, .. } => start.distance(*end),
            ArchShape::SinglePoint { .. } => 0.0,
        }
    }

    /// Angle of the span on the floor in degrees, measured from the plan
    /// x-axis. 0 for single-point shapes.
    pub fn angle(&self) -> f32 {
        match self {
            ArchShape::TwoPoint { start, end, .. } => {
                (end.y - start.y).atan2(end.x - start.x).to_degrees()
            }
            ArchShape::SinglePoint { .. } => 0.0,
        }
    }
}

/// A door, partition, run of glazing, or similar architectural element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArchObject {
    pub id: ArchId,
    pub kind: ArchKind,
    pub floor: u32,
    pub shape: ArchShape,
    baseline: ArchShape,
}

impl ArchObject {
    pub fn new(id: ArchId, kind: ArchKind, floor: u32, shape: ArchShape) -> Self {
        let baseline = shape.clone();
        Self {
            id,
            kind,
            floor,
            shape,
            baseline,
        }
    }

    pub fn rebase(&mut self) {
        self.baseline = self.shape.clone();
    }

    pub fn was_moved(&self) -> bool {
        self.shape.anchor() != self.baseline.anchor()
    }

    pub fn was_rotated(&self) -> bool {
        match (&self.shape, &self.baseline) {
            (
                ArchShape::TwoPoint { rotation: a, .. },
                ArchShape::TwoPoint { rotation: b, .. },
            ) => a != b,
            (
                ArchShape::SinglePoint { rotation: a, .. },
                ArchShape::SinglePoint { rotation: b, .. },
            ) => a != b,
            _ => true,
        }
    }

    pub fn was_height_changed(&self) -> bool {
        match (&self.shape, &self.baseline) {
            (
                ArchShape::TwoPoint { height: a, .. },
                ArchShape::TwoPoint { height: b, .. },
            ) => a != b,
            (
                ArchShape::SinglePoint { size: a, .. },
                ArchShape::SinglePoint { size: b, .. },
            ) => a.height != b.height,
            _ => true,
        }
    }

    pub fn was_resized(&self) -> bool {
        match (&self.shape, &self.baseline) {
            (ArchShape::TwoPoint { .. }, ArchShape::TwoPoint { .. }) => {
                (self.shape.length() - self.baseline.length()).abs() > f32::EPSILON
            }
            (
                ArchShape::SinglePoint { size: a, .. },
                ArchShape::SinglePoint { size: b, .. },
            ) => a != b,
            _ => true,
        }
    }
}

/// The authoritative floor-plan state for one editing session.
///
/// Mutations happen only through [`EditCommand`](crate::editing::commands::EditCommand)
/// apply/revert; everything else reads.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlanModel {
    fixtures: BTreeMap<FixtureKey, Fixture>,
    arch_objects: BTreeMap<ArchId, ArchObject>,
    next_arch_id: u64,
    pub spawn_point: Option<PlanPoint>,
}

impl PlanModel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a fixture loaded from upstream plan data.
    pub fn insert_fixture(&mut self, fixture: Fixture) {
        self.fixtures.insert(fixture.key(), fixture);
    }

    /// Allocate an id for a newly placed architectural object.
    pub fn allocate_arch_id(&mut self) -> ArchId {
        let id = ArchId(self.next_arch_id);
        self.next_arch_id += 1;
        id
    }

    pub fn insert_arch(&mut self, object: ArchObject) {
        self.next_arch_id = self.next_arch_id.max(object.id.0 + 1);
        self.arch_objects.insert(object.id, object);
    }

    /// Hard-remove a fixture record. Only for fixtures whose creation is
    /// being reverted; plan-loaded fixtures are soft-deleted instead.
    pub fn remove_fixture(&mut self, key: &FixtureKey) -> Option<Fixture> {
        self.fixtures.remove(key)
    }

    pub fn remove_arch(&mut self, id: ArchId) -> Option<ArchObject> {
        self.arch_objects.remove(&id)
    }

    pub fn fixture(&self, key: &FixtureKey) -> Option<&Fixture> {
        self.fixtures.get(key)
    }

    pub fn fixture_mut(&mut self, key: &FixtureKey) -> Option<&mut Fixture> {
        self.fixtures.get_mut(key)
    }

    pub fn arch(&self, id: ArchId) -> Option<&ArchObject> {
        self.arch_objects.get(&id)
    }

    pub fn arch_mut(&mut self, id: ArchId) -> Option<&mut ArchObject> {
        self.arch_objects.get_mut(&id)
    }

    /// Fixtures that participate in selection, rendering and hit testing.
    /// Soft-deleted fixtures are filtered out here, in one place.
    pub fn live_fixtures(&self) -> impl Iterator<Item = &Fixture> {
        self.fixtures.values().filter(|f| !f.for_delete)
    }

    pub fn arch_objects(&self) -> impl Iterator<Item = &ArchObject> {
        self.arch_objects.values()
    }

    /// The anchor position of any live entity, if it exists.
    pub fn position_of(&self, key: &EntityKey) -> Option<PlanPoint> {
        match key {
            EntityKey::Fixture(k) => self
                .fixtures
                .get(k)
                .filter(|f| !f.for_delete)
                .map(|f| f.position),
            EntityKey::Arch(id) => self.arch_objects.get(id).map(|o| o.shape.anchor()),
        }
    }

    /// Whether an entity key refers to a live (renderable, selectable) entity.
    pub fn contains(&self, key: &EntityKey) -> bool {
        self.position_of(key).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn soft_deleted_fixture_leaves_live_paths() {
        let mut model = PlanModel::new();
        let mut fixture = Fixture::new(0, "shelf", 1, PlanPoint::new(1.0, 2.0, 0.0), "acme");
        let key = fixture.key();
        model.insert_fixture(fixture.clone());
        assert!(model.contains(&EntityKey::Fixture(key.clone())));

        fixture.for_delete = true;
        model.insert_fixture(fixture);
        assert!(!model.contains(&EntityKey::Fixture(key.clone())));
        assert_eq!(model.live_fixtures().count(), 0);
        // Still present in the backing collection.
        assert!(model.fixture(&key).is_some());
    }

    #[test]
    fn baseline_diff_tracks_moves() {
        let mut fixture = Fixture::new(0, "rail", 3, PlanPoint::ZERO, "brandco");
        assert!(!fixture.was_moved());
        fixture.position = PlanPoint::new(1.0, 0.0, 0.0);
        assert!(fixture.was_moved());
        fixture.rebase();
        assert!(!fixture.was_moved());
    }

    #[test]
    fn two_point_length_and_angle() {
        let shape = ArchShape::TwoPoint {
            start: PlanPoint::ZERO,
            end: PlanPoint::new(4.0, 0.0, 0.0),
            height: 2.5,
            rotation: 0.0,
        };
        assert!((shape.length() - 4.0).abs() < 1e-6);
        assert!(shape.angle().abs() < 1e-6);

        let diagonal = ArchShape::TwoPoint {
            start: PlanPoint::ZERO,
            end: PlanPoint::new(1.0, 1.0, 0.0),
            height: 2.5,
            rotation: 0.0,
        };
        assert!((diagonal.angle() - 45.0).abs() < 1e-4);
    }

    #[test]
    fn arch_ids_are_unique_after_reinsert() {
        let mut model = PlanModel::new();
        let a = model.allocate_arch_id();
        model.insert_arch(ArchObject::new(
            a,
            ArchKind::Door,
            0,
            ArchShape::SinglePoint {
                position: PlanPoint::ZERO,
                rotation: PlanRotation::ZERO,
                size: ArchSize::default(),
            },
        ));
        let b = model.allocate_arch_id();
        assert_ne!(a, b);
    }
}
