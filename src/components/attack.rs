use bevy_ecs::prelude::Component;

/// Marks an entity whose [`ColliderCollection`](super::collidercollection::ColliderCollection)
/// holds four directional attack hitboxes, ordered as
/// [`Facing::hitbox_index`](super::facing::Facing::hitbox_index).
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct AttackHitboxes;
