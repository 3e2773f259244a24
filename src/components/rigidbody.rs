//! Kinematic body component.
//!
//! The [`RigidBody`] stores the velocity requested by controllers. The
//! [`movement`](crate::systems::movement::movement) system turns it into a
//! displacement each frame, routing it through the collision resolver when
//! the entity has a [`Collider`](super::collider::Collider), and records what
//! was actually applied in `last_displacement`.
//!
//! The `frozen` flag disables integration, useful when the position is driven
//! externally (cutscenes, teleports).

use bevy_ecs::prelude::Component;
use glam::Vec2;

#[derive(Component, Clone, Copy, Debug, Default)]
pub struct RigidBody {
    /// Requested velocity in world units per second.
    pub velocity: Vec2,
    /// Displacement actually applied during the last movement step.
    pub last_displacement: Vec2,
    /// When true, the movement system skips this entity.
    pub frozen: bool,
}

impl RigidBody {
    /// Create a RigidBody at rest.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_velocity(mut self, velocity: Vec2) -> Self {
        self.velocity = velocity;
        self
    }

    pub fn set_velocity(&mut self, velocity: Vec2) {
        self.velocity = velocity;
    }

    /// Freeze the rigid body, preventing the movement system from updating it.
    pub fn freeze(&mut self) {
        self.frozen = true;
    }

    pub fn unfreeze(&mut self) {
        self.frozen = false;
    }
}
