//! Simple input-to-velocity controller.
//!
//! Reads the shared [`InputState`](crate::resources::input::InputState) and
//! sets velocities on entities with an
//! [`InputControlled`](crate::components::inputcontrolled::InputControlled)
//! component. Diagonal movement is normalized to keep a constant speed.
use bevy_ecs::prelude::*;
use glam::Vec2;

use crate::components::inputcontrolled::InputControlled;
use crate::components::rigidbody::RigidBody;
use crate::resources::input::InputState;

/// Update each controlled entity's `RigidBody` velocity based on input.
pub fn input_simple_controller(
    mut query: Query<(&InputControlled, &mut RigidBody)>,
    input_state: Res<InputState>,
) {
    let mut direction = Vec2::ZERO;
    if input_state.up.active {
        direction.y -= 1.0;
    }
    if input_state.down.active {
        direction.y += 1.0;
    }
    if input_state.left.active {
        direction.x -= 1.0;
    }
    if input_state.right.active {
        direction.x += 1.0;
    }
    let direction = direction.normalize_or_zero();

    for (controlled, mut rigidbody) in query.iter_mut() {
        rigidbody.velocity = direction * controlled.speed;
    }
}
