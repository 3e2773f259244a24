//! Hitbox collision events and the damage observer.
//!
//! The [`hitbox_overlap_detector`](crate::systems::collision::hitbox_overlap_detector)
//! triggers a [`CollisionEvent`] whenever an active hitbox overlaps a collider
//! it targets. Observers subscribe to react in a decoupled manner (damage,
//! sound, particles).
//!
//! [`observe_hitbox_damage`] is the engine's default reaction: one point of
//! damage to targets that carry [`Health`], despawning them on the killing
//! blow when `remove_on_death` is set.
use bevy_ecs::observer::On;
use bevy_ecs::prelude::*;
use log::info;

use crate::components::health::Health;

/// Fired when a hitbox of `attacker` overlaps a collider of `target`.
///
/// Emitted at most once per (attacker, target) pair per frame; `hitbox` is
/// the index of the first hitbox found overlapping.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct CollisionEvent {
    pub attacker: Entity,
    pub target: Entity,
    pub hitbox: usize,
}

/// Apply one point of damage to the target of a [`CollisionEvent`].
pub fn observe_hitbox_damage(
    trigger: On<CollisionEvent>,
    mut commands: Commands,
    mut healths: Query<&mut Health>,
) {
    let event = trigger.event();
    let Ok(mut health) = healths.get_mut(event.target) else {
        return;
    };
    let killed = health.damage(1);
    info!(
        "{:?} hit {:?} ({}/{} hp left)",
        event.attacker,
        event.target,
        health.current().max(0),
        health.max()
    );
    if killed && health.remove_on_death {
        info!("{:?} destroyed", event.target);
        commands.entity(event.target).despawn();
    }
}
