//! Collision lifecycle systems.
//!
//! These keep the [`CollisionGrid`] in step with the ECS world:
//!
//! - [`register_colliders`] (PreUpdate) – index added/changed colliders and
//!   drop removed or despawned ones before anything queries the grid
//! - [`collision_post_update`] (PostUpdate) – re-bucket colliders whose owner
//!   moved outside the resolver (teleports, tweens, direct writes)
//! - [`hitbox_overlap_detector`] (Update) – trigger [`CollisionEvent`]s for
//!   active hitboxes overlapping what they target
//!
//! [`rebuild_collision_index`] re-registers everything after the grid was
//! (re)initialized.
use bevy_ecs::prelude::*;
use glam::Vec2;
use log::{error, info, warn};
use rustc_hash::FxHashSet;

use crate::components::collider::{Collider, ColliderKey};
use crate::components::collidercollection::ColliderCollection;
use crate::components::mapposition::MapPosition;
use crate::error::CollisionError;
use crate::events::collision::CollisionEvent;
use crate::resources::collisiongrid::CollisionGrid;

/// Index or drop an entity's body collider according to its current state.
pub fn sync_body(
    grid: &mut CollisionGrid,
    entity: Entity,
    pos: Vec2,
    collider: &Collider,
) -> Result<(), CollisionError> {
    let key = ColliderKey::body(entity);
    if collider.is_active() {
        grid.update(key, collider.world_bounds(pos), collider.tags)
    } else {
        grid.remove(key).map(|_| ())
    }
}

/// Index or drop every entry of an entity's collider collection.
///
/// Slots past the end of the collection (left over from a longer collection
/// it replaced) are dropped as well.
pub fn sync_collection(
    grid: &mut CollisionGrid,
    entity: Entity,
    pos: Vec2,
    hitboxes: &ColliderCollection,
) -> Result<(), CollisionError> {
    for (index, collider) in hitboxes.iter().enumerate() {
        let key = ColliderKey::hitbox(entity, index);
        if collider.is_active() {
            grid.update(key, collider.world_bounds(pos), collider.tags)?;
        } else {
            grid.remove(key)?;
        }
    }
    grid.truncate_hitboxes(entity, hitboxes.len())?;
    Ok(())
}

fn warn_untagged(entity: Entity, collider: &Collider) {
    if collider.enabled && collider.tags.is_empty() {
        warn!("Collider on {:?} has no tags and will not be indexed", entity);
    }
}

/// Flush collider additions, changes, and removals into the grid.
///
/// Runs first in PreUpdate so that every insert/remove of the frame lands
/// before movement and queries. Enabling or disabling a collider shows up here
/// as a component change.
#[allow(clippy::type_complexity)]
pub fn register_colliders(
    mut grid: ResMut<CollisionGrid>,
    bodies: Query<(Entity, &MapPosition, &Collider), Changed<Collider>>,
    collections: Query<(Entity, &MapPosition, &ColliderCollection), Changed<ColliderCollection>>,
    still_present: Query<(Has<Collider>, Has<ColliderCollection>)>,
    mut removed_bodies: RemovedComponents<Collider>,
    mut removed_collections: RemovedComponents<ColliderCollection>,
) {
    if !grid.is_initialized() {
        if !bodies.is_empty() || !collections.is_empty() {
            error!("Colliders spawned before the collision grid was initialized");
        }
        return;
    }

    let mut result: Result<(), CollisionError> = Ok(());

    for entity in removed_bodies.read() {
        let has_body = still_present.get(entity).is_ok_and(|(body, _)| body);
        if !has_body {
            result = result.and(grid.remove(ColliderKey::body(entity)).map(|_| ()));
        }
    }
    for entity in removed_collections.read() {
        let has_collection = still_present
            .get(entity)
            .is_ok_and(|(_, collection)| collection);
        if !has_collection {
            result = result.and(grid.remove_hitboxes(entity).map(|_| ()));
        }
    }

    for (entity, position, collider) in bodies.iter() {
        warn_untagged(entity, collider);
        result = result.and(sync_body(&mut grid, entity, position.pos, collider));
    }
    for (entity, position, hitboxes) in collections.iter() {
        result = result.and(sync_collection(&mut grid, entity, position.pos, hitboxes));
    }

    if let Err(err) = result {
        error!("Collider registration failed: {}", err);
    }
}

/// Re-bucket every collider whose owner's position changed this frame.
///
/// Movers already handled by the resolver come out unchanged; this is the
/// backstop for positions written any other way.
#[allow(clippy::type_complexity)]
pub fn collision_post_update(
    mut grid: ResMut<CollisionGrid>,
    moved: Query<
        (
            Entity,
            &MapPosition,
            Option<&Collider>,
            Option<&ColliderCollection>,
        ),
        (
            Changed<MapPosition>,
            Or<(With<Collider>, With<ColliderCollection>)>,
        ),
    >,
) {
    if !grid.is_initialized() {
        return;
    }
    for (entity, position, body, hitboxes) in moved.iter() {
        let mut result = Ok(());
        if let Some(body) = body {
            result = sync_body(&mut grid, entity, position.pos, body);
        }
        if let Some(hitboxes) = hitboxes {
            result = result.and(sync_collection(&mut grid, entity, position.pos, hitboxes));
        }
        if let Err(err) = result {
            error!("Failed to re-bucket {:?}: {}", entity, err);
        }
    }
}

/// Trigger a [`CollisionEvent`] for each active hitbox overlapping a
/// collider its targets select. Each (attacker, target) pair fires once.
pub fn hitbox_overlap_detector(
    grid: Res<CollisionGrid>,
    hitboxes: Query<(Entity, &MapPosition, &ColliderCollection)>,
    mut commands: Commands,
) {
    if !grid.is_initialized() {
        return;
    }
    let mut pairs: FxHashSet<(Entity, Entity)> = FxHashSet::default();
    for (attacker, position, collection) in hitboxes.iter() {
        for (index, hitbox) in collection.iter().enumerate() {
            if !hitbox.is_active() || hitbox.targets.is_empty() {
                continue;
            }
            let bounds = hitbox.world_bounds(position.pos);
            let hits = match grid.overlapping(&bounds, hitbox.targets) {
                Ok(hits) => hits,
                Err(err) => {
                    error!("Hitbox query failed: {}", err);
                    return;
                }
            };
            for hit in hits {
                let target = hit.key.entity;
                if target != attacker && pairs.insert((attacker, target)) {
                    commands.trigger(CollisionEvent {
                        attacker,
                        target,
                        hitbox: index,
                    });
                }
            }
        }
    }
}

/// Index every collider in the world from scratch. Call after
/// [`CollisionGrid::initialize`], which empties the grid.
///
/// Returns the number of indexed colliders.
pub fn rebuild_collision_index(world: &mut World) -> Result<usize, CollisionError> {
    world.resource_scope(|world, mut grid: Mut<CollisionGrid>| {
        let mut query = world.query::<(
            Entity,
            &MapPosition,
            Option<&Collider>,
            Option<&ColliderCollection>,
        )>();
        for (entity, position, body, hitboxes) in query.iter(world) {
            if let Some(body) = body {
                warn_untagged(entity, body);
                sync_body(&mut grid, entity, position.pos, body)?;
            }
            if let Some(hitboxes) = hitboxes {
                sync_collection(&mut grid, entity, position.pos, hitboxes)?;
            }
        }
        info!("Collision index rebuilt with {} collider(s)", grid.len());
        Ok(grid.len())
    })
}
