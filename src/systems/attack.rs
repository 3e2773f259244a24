//! Directional attack hitboxes.
//!
//! While the attack action is held, the hitbox matching the entity's
//! [`Facing`] is enabled and every other one is disabled. Grid membership is
//! updated right away so the change is visible to the overlap detector and
//! any query later in the frame.
use bevy_ecs::prelude::*;
use log::error;

use crate::components::attack::AttackHitboxes;
use crate::components::collidercollection::ColliderCollection;
use crate::components::facing::Facing;
use crate::components::mapposition::MapPosition;
use crate::resources::collisiongrid::CollisionGrid;
use crate::resources::input::InputState;
use crate::systems::collision::sync_collection;

pub fn attack_system(
    input: Res<InputState>,
    mut grid: ResMut<CollisionGrid>,
    mut attackers: Query<
        (Entity, &MapPosition, &Facing, &mut ColliderCollection),
        With<AttackHitboxes>,
    >,
) {
    for (entity, position, facing, mut hitboxes) in attackers.iter_mut() {
        let wanted = input.attack.active.then(|| facing.hitbox_index());
        let stale = hitboxes
            .iter()
            .enumerate()
            .any(|(i, c)| c.enabled != (Some(i) == wanted));
        if !stale {
            continue;
        }
        for i in 0..hitboxes.len() {
            hitboxes.set_enabled(i, Some(i) == wanted);
        }
        if let Err(err) = sync_collection(&mut grid, entity, position.pos, &hitboxes) {
            error!("Failed to update attack hitboxes of {:?}: {}", entity, err);
        }
    }
}
