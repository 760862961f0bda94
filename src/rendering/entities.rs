//! Scene synchronization for plan entities
//!
//! Builds and maintains the renderable scene from the plan model: the floor
//! shell, fixtures (with repeat stacks), architectural objects and the spawn
//! marker. Sync is comparison-guarded: an entity is rebuilt only when its
//! visual inputs change, and never while it is a member of an active drag,
//! so the gizmo cannot detach mid-drag because of a remount. Positions are
//! written every frame as base position plus the transform session's pending
//! delta, which is what makes a group drag move rigidly on screen.

use bevy::prelude::*;
use std::collections::{BTreeMap, BTreeSet};

use crate::core::session::EditorSession;
use crate::data::assets::ModelCache;
use crate::data::Catalog;
use crate::editing::entity::{ArchShape, EntityKey};
use crate::editing::selection::{PlanEntityRef, Selectable, Selected};
use crate::systems::hit_testing::HitVolume;

/// Footprint of one fixture unit, render units (x, y, z).
const FIXTURE_UNIT: Vec3 = Vec3::new(1.0, 1.5, 0.6);

/// Thickness of rendered spans (glazing, partitions).
const SPAN_THICKNESS: f32 = 0.1;

/// Marker for the floor/building shell. Floor meshes are the non-interactive
/// targets of placement ray casts.
#[derive(Component, Debug)]
pub struct FloorSurface;

/// Marker for the spawn-point indicator.
#[derive(Component, Debug)]
pub struct SpawnMarker;

/// The visual inputs an entity was last built from. A change here forces a
/// rebuild; equality means only the transform needs refreshing.
#[derive(Component, Debug, Clone, PartialEq)]
pub enum RenderedState {
    Fixture {
        count: u32,
        brand: String,
        model_url: Option<String>,
    },
    Arch {
        shape: ArchShape,
    },
}

/// System to spawn the static floor shell once at startup.
pub fn spawn_floor(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    let size = Vec3::new(60.0, 0.2, 40.0);
    commands.spawn((
        Mesh3d(meshes.add(Cuboid::new(size.x, size.y, size.z))),
        MeshMaterial3d(materials.add(StandardMaterial {
            base_color: Color::srgb(0.85, 0.84, 0.80),
            ..default()
        })),
        Transform::from_xyz(0.0, -size.y / 2.0, 0.0),
        FloorSurface,
        HitVolume {
            half_extents: size / 2.0,
        },
    ));
}

/// System to keep the scene in step with the plan model.
#[allow(clippy::too_many_arguments)]
pub fn sync_plan_entities(
    mut commands: Commands,
    session: Res<EditorSession>,
    catalog: Res<Catalog>,
    mut model_cache: ResMut<ModelCache>,
    asset_server: Res<AssetServer>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    mut rendered: Query<(Entity, &PlanEntityRef, &mut Transform, &mut RenderedState)>,
) {
    // Index what is already on screen.
    let mut on_screen: BTreeMap<EntityKey, Entity> = BTreeMap::new();
    let mut live: BTreeSet<EntityKey> = BTreeSet::new();

    for (entity, plan_ref, mut transform, mut state) in &mut rendered {
        if !session.model.contains(&plan_ref.key) {
            // Deleted (or soft-deleted) entities leave the scene entirely.
            commands.entity(entity).despawn();
            continue;
        }
        on_screen.insert(plan_ref.key.clone(), entity);

        let desired = desired_state(&session, &plan_ref.key);
        let mid_drag = session.transform.is_member(&plan_ref.key);
        if let Some(desired) = desired {
            if *state != desired && !mid_drag {
                // Visual inputs changed: rebuild children below. A member of
                // an active drag is left alone so the gizmo stays attached.
                if let RenderedState::Fixture {
                    model_url: Some(old_url),
                    ..
                } = &*state
                {
                    let new_url = match &desired {
                        RenderedState::Fixture { model_url, .. } => model_url.clone(),
                        _ => None,
                    };
                    if new_url.as_deref() != Some(old_url.as_str()) {
                        model_cache.invalidate(old_url);
                    }
                }
                commands.entity(entity).despawn_related::<Children>();
                spawn_visuals(
                    &mut commands,
                    entity,
                    &desired,
                    &catalog,
                    &mut model_cache,
                    &asset_server,
                    &mut meshes,
                    &mut materials,
                );
                *state = desired;
            }
        }

        // Base position plus the pending drag delta, every frame.
        if let Some(base) = session.model.position_of(&plan_ref.key) {
            let offset = session.transform.render_offset(&plan_ref.key);
            transform.translation = (base + offset).to_render();
            transform.rotation = rotation_for(&session, &plan_ref.key);
        }
    }

    // Spawn anything in the model that has no scene entity yet.
    for fixture in session.model.live_fixtures() {
        live.insert(EntityKey::Fixture(fixture.key()));
    }
    for object in session.model.arch_objects() {
        live.insert(EntityKey::Arch(object.id));
    }
    for key in live {
        if on_screen.contains_key(&key) {
            continue;
        }
        let Some(state) = desired_state(&session, &key) else {
            continue;
        };
        let Some(position) = session.model.position_of(&key) else {
            continue;
        };
        let root = commands
            .spawn((
                Transform::from_translation(position.to_render())
                    .with_rotation(rotation_for(&session, &key)),
                Visibility::default(),
                PlanEntityRef { key: key.clone() },
                Selectable,
                HitVolume {
                    half_extents: hit_half_extents(&state),
                },
                state.clone(),
            ))
            .id();
        spawn_visuals(
            &mut commands,
            root,
            &state,
            &catalog,
            &mut model_cache,
            &asset_server,
            &mut meshes,
            &mut materials,
        );
    }
}

/// System to keep the spawn marker in step with the model.
pub fn sync_spawn_marker(
    mut commands: Commands,
    session: Res<EditorSession>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    mut markers: Query<(Entity, &mut Transform), With<SpawnMarker>>,
) {
    match (session.model.spawn_point, markers.single_mut()) {
        (Some(point), Ok((_, mut transform))) => {
            transform.translation = point.to_render();
        }
        (Some(point), Err(_)) => {
            commands.spawn((
                Mesh3d(meshes.add(Sphere::new(0.3))),
                MeshMaterial3d(materials.add(StandardMaterial {
                    base_color: Color::srgb(0.1, 0.8, 0.3),
                    ..default()
                })),
                Transform::from_translation(point.to_render()),
                SpawnMarker,
            ));
        }
        (None, Ok((entity, _))) => {
            commands.entity(entity).despawn();
        }
        (None, Err(_)) => {}
    }
}

/// System to tint selected entities.
pub fn highlight_selection(
    selected: Query<&Children, (With<PlanEntityRef>, With<Selected>)>,
    unselected: Query<&Children, (With<PlanEntityRef>, Without<Selected>)>,
    material_handles: Query<&MeshMaterial3d<StandardMaterial>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    for children in &selected {
        for child in children {
            if let Ok(handle) = material_handles.get(*child) {
                if let Some(material) = materials.get_mut(&handle.0) {
                    material.emissive = LinearRgba::rgb(0.2, 0.25, 0.1);
                }
            }
        }
    }
    for children in &unselected {
        for child in children {
            if let Ok(handle) = material_handles.get(*child) {
                if let Some(material) = materials.get_mut(&handle.0) {
                    material.emissive = LinearRgba::BLACK;
                }
            }
        }
    }
}

fn desired_state(session: &EditorSession, key: &EntityKey) -> Option<RenderedState> {
    match key {
        EntityKey::Fixture(k) => {
            let fixture = session.model.fixture(k).filter(|f| !f.for_delete)?;
            Some(RenderedState::Fixture {
                count: fixture.count,
                brand: fixture.brand.clone(),
                model_url: fixture.model_url.clone(),
            })
        }
        EntityKey::Arch(id) => {
            let object = session.model.arch(*id)?;
            Some(RenderedState::Arch {
                shape: object.shape.clone(),
            })
        }
    }
}

fn rotation_for(session: &EditorSession, key: &EntityKey) -> Quat {
    match key {
        EntityKey::Fixture(k) => session
            .model
            .fixture(k)
            .map(|f| f.rotation.to_render_quat())
            .unwrap_or(Quat::IDENTITY),
        EntityKey::Arch(id) => match session.model.arch(*id).map(|o| &o.shape) {
            Some(ArchShape::TwoPoint { start, end, .. }) => {
                let direction = (end.to_render() - start.to_render()).normalize_or_zero();
                if direction == Vec3::ZERO {
                    Quat::IDENTITY
                } else {
                    Quat::from_rotation_arc(Vec3::X, direction)
                }
            }
            Some(ArchShape::SinglePoint { rotation, .. }) => rotation.to_render_quat(),
            None => Quat::IDENTITY,
        },
    }
}

fn hit_half_extents(state: &RenderedState) -> Vec3 {
    match state {
        RenderedState::Fixture { count, .. } => Vec3::new(
            FIXTURE_UNIT.x * (*count as f32) / 2.0,
            FIXTURE_UNIT.y / 2.0,
            FIXTURE_UNIT.z / 2.0,
        ),
        RenderedState::Arch { shape } => match shape {
            ArchShape::TwoPoint { height, .. } => Vec3::new(
                shape.length().max(SPAN_THICKNESS) / 2.0,
                *height / 2.0,
                SPAN_THICKNESS / 2.0,
            ),
            ArchShape::SinglePoint { size, .. } => {
                Vec3::new(size.width / 2.0, size.height / 2.0, size.depth / 2.0)
            }
        },
    }
}

/// Spawn the visible child meshes for an entity root.
#[allow(clippy::too_many_arguments)]
fn spawn_visuals(
    commands: &mut Commands,
    root: Entity,
    state: &RenderedState,
    catalog: &Catalog,
    model_cache: &mut ModelCache,
    asset_server: &AssetServer,
    meshes: &mut Assets<Mesh>,
    materials: &mut Assets<StandardMaterial>,
) {
    match state {
        RenderedState::Fixture {
            count,
            brand,
            model_url,
        } => {
            if let Some(url) = model_url {
                let handle = model_cache.get_or_load(asset_server, url);
                if ModelCache::load_failed(asset_server, &handle) {
                    // Isolated failure domain: this fixture simply has no
                    // visual, the scene around it is unaffected.
                    warn!("model failed to load, skipping render: {url}");
                    return;
                }
                for i in 0..*count {
                    commands.entity(root).with_children(|parent| {
                        parent.spawn((
                            SceneRoot(handle.clone()),
                            Transform::from_xyz(unit_offset(i, *count), 0.0, 0.0),
                        ));
                    });
                }
                return;
            }

            let color = brand_color(catalog, brand);
            let mesh = meshes.add(Cuboid::new(FIXTURE_UNIT.x, FIXTURE_UNIT.y, FIXTURE_UNIT.z));
            for i in 0..*count {
                let material = materials.add(StandardMaterial {
                    base_color: color,
                    ..default()
                });
                commands.entity(root).with_children(|parent| {
                    parent.spawn((
                        Mesh3d(mesh.clone()),
                        MeshMaterial3d(material),
                        Transform::from_xyz(
                            unit_offset(i, *count),
                            FIXTURE_UNIT.y / 2.0,
                            0.0,
                        ),
                    ));
                });
            }
        }
        RenderedState::Arch { shape } => {
            let (size, color) = match shape {
                ArchShape::TwoPoint { height, .. } => (
                    Vec3::new(shape.length(), *height, SPAN_THICKNESS),
                    Color::srgb(0.55, 0.75, 0.85),
                ),
                ArchShape::SinglePoint { size, .. } => (
                    Vec3::new(size.width, size.height, size.depth),
                    Color::srgb(0.6, 0.5, 0.4),
                ),
            };
            let mesh = meshes.add(Cuboid::new(size.x, size.y, size.z));
            let material = materials.add(StandardMaterial {
                base_color: color,
                ..default()
            });
            commands.entity(root).with_children(|parent| {
                parent.spawn((
                    Mesh3d(mesh),
                    MeshMaterial3d(material),
                    Transform::from_xyz(0.0, size.y / 2.0, 0.0),
                ));
            });
        }
    }
}

/// Offset of unit `i` in a side-by-side stack of `count`, centered on the
/// fixture's position.
fn unit_offset(i: u32, count: u32) -> f32 {
    (i as f32 - (count as f32 - 1.0) / 2.0) * FIXTURE_UNIT.x
}

fn brand_color(catalog: &Catalog, brand: &str) -> Color {
    // Stable palette index from the category name; unknown brands get grey.
    const PALETTE: [(f32, f32, f32); 6] = [
        (0.8, 0.35, 0.3),
        (0.3, 0.55, 0.8),
        (0.85, 0.7, 0.3),
        (0.45, 0.75, 0.45),
        (0.65, 0.45, 0.75),
        (0.8, 0.55, 0.35),
    ];
    match catalog.category_of(brand) {
        Some(category) => {
            let index = category
                .bytes()
                .fold(0usize, |acc, b| acc.wrapping_add(b as usize))
                % PALETTE.len();
            let (r, g, b) = PALETTE[index];
            Color::srgb(r, g, b)
        }
        None => Color::srgb(0.6, 0.6, 0.6),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repeat_stack_is_centered() {
        assert_eq!(unit_offset(0, 1), 0.0);
        let left = unit_offset(0, 3);
        let mid = unit_offset(1, 3);
        let right = unit_offset(2, 3);
        assert!(left < mid && mid < right);
        assert_eq!(mid, 0.0);
        assert!((right + left).abs() < 1e-6);
    }
}
