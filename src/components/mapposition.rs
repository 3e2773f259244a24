//! World-space position of an entity.
//!
//! Colliders are positioned relative to this point, so every entity that owns
//! a [`Collider`](super::collider::Collider) or
//! [`ColliderCollection`](super::collidercollection::ColliderCollection) must
//! also carry a `MapPosition`.

use bevy_ecs::prelude::Component;
use glam::Vec2;

#[derive(Component, Clone, Copy, Debug, PartialEq)]
pub struct MapPosition {
    pub pos: Vec2,
}

impl MapPosition {
    pub fn new(x: f32, y: f32) -> Self {
        Self {
            pos: Vec2::new(x, y),
        }
    }

    /// Move to an absolute position. The collision grid picks the change up in
    /// its post-update sweep.
    pub fn set(&mut self, x: f32, y: f32) {
        self.pos = Vec2::new(x, y);
    }
}
