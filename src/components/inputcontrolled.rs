//! Input-controlled movement component.
//!
//! Entities with [`InputControlled`] get their
//! [`RigidBody`](super::rigidbody::RigidBody) velocity set from
//! [`InputState`](crate::resources::input::InputState) by the
//! [`input_simple_controller`](crate::systems::inputsimplecontroller::input_simple_controller)
//! system.

use bevy_ecs::prelude::Component;

/// Movement intent derived from player input.
#[derive(Component, Clone, Copy, Debug, PartialEq)]
pub struct InputControlled {
    /// Walking speed in world units per second.
    pub speed: f32,
}

impl InputControlled {
    pub fn new(speed: f32) -> Self {
        Self { speed }
    }
}
