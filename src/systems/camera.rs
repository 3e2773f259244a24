//! Camera follow system.
//!
//! Centers the [`Camera2D`] on its target entity, using the center of the
//! target's body collider when it has one, and keeps it inside its bounds.
use bevy_ecs::prelude::*;

use crate::components::collider::Collider;
use crate::components::mapposition::MapPosition;
use crate::resources::camera2d::Camera2D;

pub fn camera_follow(
    camera: Option<ResMut<Camera2D>>,
    targets: Query<(&MapPosition, Option<&Collider>)>,
) {
    let Some(mut camera) = camera else {
        return;
    };
    let focus = camera
        .target
        .and_then(|target| targets.get(target).ok())
        .map(|(position, collider)| match collider {
            Some(collider) => collider.world_bounds(position.pos).center(),
            None => position.pos,
        });
    match focus {
        Some(point) => camera.center_on(point),
        None => camera.clamp_to_bounds(),
    }
}
