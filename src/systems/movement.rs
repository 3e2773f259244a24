//! Movement integration and collision resolution.
//!
//! [`resolve_movement`] moves one collider's owner by a requested delta using
//! an axis-separated sweep: X first, then Y with the corrected X. On each axis
//! the grid is queried for blockers under the destination box and the mover
//! is pushed back to the nearest touching edge. Because each axis is handled
//! on its own, a diagonal move into a wall slides along the free axis.
//!
//! The [`movement`] system feeds every [`RigidBody`] through it once per frame.
use bevy_ecs::prelude::*;
use glam::Vec2;
use log::{error, warn};

use crate::components::collider::{Collider, ColliderKey, ColliderSlot};
use crate::components::collidercollection::ColliderCollection;
use crate::components::facing::Facing;
use crate::components::mapposition::MapPosition;
use crate::components::rigidbody::RigidBody;
use crate::error::CollisionError;
use crate::resources::collisiongrid::CollisionGrid;
use crate::resources::worldtime::WorldTime;
use crate::systems::collision::sync_collection;

#[derive(Clone, Copy)]
enum Axis {
    X,
    Y,
}

impl Axis {
    fn of(self, v: Vec2) -> f32 {
        match self {
            Axis::X => v.x,
            Axis::Y => v.y,
        }
    }

    fn with(self, v: Vec2, value: f32) -> Vec2 {
        match self {
            Axis::X => Vec2::new(value, v.y),
            Axis::Y => Vec2::new(v.x, value),
        }
    }
}

/// Move `collider`'s owner by `delta`, stopping at blockers selected by
/// `collider.targets`, and return the displacement actually applied.
///
/// `position` is the owner's position; it is only written once the whole step
/// succeeded, together with the grid update for `key`. Errors are returned
/// before anything is touched.
///
/// - Blockers owned by the same entity are ignored.
/// - A blocker already overlapping the mover before the step does not stop it.
/// - A disabled or untagged mover moves freely and is dropped from the grid.
/// - A mover without targets moves freely but stays indexed.
pub fn resolve_movement(
    grid: &mut CollisionGrid,
    key: ColliderKey,
    collider: &Collider,
    position: &mut Vec2,
    delta: Vec2,
) -> Result<Vec2, CollisionError> {
    resolve_movement_filtered(grid, key, collider, position, delta, |_| true)
}

/// [`resolve_movement`] where a grid hit only blocks if `is_blocker` accepts
/// its key. Lets callers skip colliders disabled or despawned since the last
/// registration flush.
pub fn resolve_movement_filtered(
    grid: &mut CollisionGrid,
    key: ColliderKey,
    collider: &Collider,
    position: &mut Vec2,
    delta: Vec2,
    is_blocker: impl Fn(ColliderKey) -> bool,
) -> Result<Vec2, CollisionError> {
    if !grid.is_initialized() {
        return Err(CollisionError::NotInitialized);
    }
    if !delta.is_finite() {
        return Err(CollisionError::InvalidDelta {
            x: delta.x,
            y: delta.y,
        });
    }

    let start = *position;
    if !collider.is_active() {
        grid.remove(key)?;
        *position = start + delta;
        return Ok(delta);
    }

    let end = if collider.targets.is_empty() {
        start + delta
    } else {
        let mut end = start;
        end.x = sweep_axis(grid, key, collider, end, delta.x, Axis::X, &is_blocker)?;
        end.y = sweep_axis(grid, key, collider, end, delta.y, Axis::Y, &is_blocker)?;
        end
    };

    grid.update(key, collider.world_bounds(end), collider.tags)?;
    *position = end;
    Ok(end - start)
}

/// New owner coordinate on `axis` after moving `amount` from `from`.
fn sweep_axis(
    grid: &CollisionGrid,
    key: ColliderKey,
    collider: &Collider,
    from: Vec2,
    amount: f32,
    axis: Axis,
    is_blocker: &impl Fn(ColliderKey) -> bool,
) -> Result<f32, CollisionError> {
    let start = axis.of(from);
    if amount == 0.0 {
        return Ok(start);
    }

    let before = collider.world_bounds(from);
    let after = collider.world_bounds(axis.with(from, start + amount));
    let offset = axis.of(collider.offset.position());
    let extent = axis.of(collider.offset.size());

    // Deepest overlap wins: the smallest resolved coordinate when moving
    // forward, the largest when moving back.
    let mut resolved = start + amount;
    for hit in grid.query(&after, collider.targets)? {
        if hit.key.entity == key.entity
            || !hit.bounds.intersects(&after)
            || hit.bounds.intersects(&before)
            || !is_blocker(hit.key)
        {
            continue;
        }
        if amount > 0.0 {
            let touching = axis.of(hit.bounds.position()) - offset - extent;
            resolved = resolved.min(touching);
        } else {
            let far_edge = axis.of(hit.bounds.position()) + axis.of(hit.bounds.size());
            resolved = resolved.max(far_edge - offset);
        }
    }

    Ok(if amount > 0.0 {
        resolved.max(start)
    } else {
        resolved.min(start)
    })
}

/// Current state of the collider a grid key points at, if it still exists.
fn live_collider<'a>(
    colliders: &'a Query<(Option<&Collider>, Option<&ColliderCollection>)>,
    key: ColliderKey,
) -> Option<&'a Collider> {
    let (body, collection) = colliders.get(key.entity).ok()?;
    match key.slot {
        ColliderSlot::Body => body,
        ColliderSlot::Hitbox(index) => collection?.get(index as usize),
    }
}

/// Integrate velocities into positions, resolving collisions for bodies with
/// an active [`Collider`].
///
/// Movers are processed one at a time; each one's grid entry is updated before
/// the next mover is resolved. A non-finite step is logged and skipped.
#[allow(clippy::type_complexity)]
pub fn movement(
    mut grid: ResMut<CollisionGrid>,
    time: Res<WorldTime>,
    mut bodies: Query<(
        Entity,
        &mut MapPosition,
        &mut RigidBody,
        Option<&Collider>,
        Option<&ColliderCollection>,
        Option<&mut Facing>,
    )>,
    colliders: Query<(Option<&Collider>, Option<&ColliderCollection>)>,
) {
    // Grid entries lag behind colliders disabled or despawned earlier this frame.
    let is_blocker =
        |hit: ColliderKey| live_collider(&colliders, hit).is_some_and(Collider::is_active);
    for (entity, mut position, mut rigidbody, collider, hitboxes, facing) in bodies.iter_mut() {
        if rigidbody.frozen {
            continue;
        }

        let requested = rigidbody.velocity * time.delta;
        let mut pos = position.pos;
        let effective = match collider {
            Some(collider) => match resolve_movement_filtered(
                &mut grid,
                ColliderKey::body(entity),
                collider,
                &mut pos,
                requested,
                is_blocker,
            ) {
                Ok(effective) => effective,
                Err(err @ CollisionError::InvalidDelta { .. }) => {
                    warn!("Skipping movement of {:?}: {}", entity, err);
                    Vec2::ZERO
                }
                Err(err) => {
                    error!("Movement of {:?} failed: {}", entity, err);
                    Vec2::ZERO
                }
            },
            None if requested.is_finite() => {
                pos += requested;
                requested
            }
            None => {
                warn!(
                    "Skipping movement of {:?}: non-finite step {:?}",
                    entity, requested
                );
                Vec2::ZERO
            }
        };

        rigidbody.last_displacement = effective;
        if position.set_if_neq(MapPosition { pos }) {
            if let Some(hitboxes) = hitboxes {
                if let Err(err) = sync_collection(&mut grid, entity, pos, hitboxes) {
                    error!("Failed to re-bucket hitboxes of {:?}: {}", entity, err);
                }
            }
        }

        if let Some(mut facing) = facing {
            let direction = if effective != Vec2::ZERO {
                effective
            } else {
                requested
            };
            if let Some(next) = Facing::from_vector(direction) {
                facing.set_if_neq(next);
            }
        }
    }
}
