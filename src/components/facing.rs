//! Direction an entity is looking at.
//!
//! Updated by the [`movement`](crate::systems::movement::movement) system from
//! the effective displacement (or the requested one when fully blocked) and
//! used to pick which attack hitbox to enable.

use bevy_ecs::prelude::Component;
use glam::Vec2;

#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Facing {
    Up,
    #[default]
    Down,
    Left,
    Right,
}

impl Facing {
    /// Dominant direction of `v`; horizontal wins ties. `None` for a zero vector.
    pub fn from_vector(v: Vec2) -> Option<Self> {
        if v == Vec2::ZERO || !v.is_finite() {
            return None;
        }
        Some(if v.x.abs() >= v.y.abs() {
            if v.x > 0.0 { Facing::Right } else { Facing::Left }
        } else if v.y > 0.0 {
            Facing::Down
        } else {
            Facing::Up
        })
    }

    /// Index of the matching hitbox in a four-way attack collection
    /// (up, down, left, right).
    pub fn hitbox_index(self) -> usize {
        match self {
            Facing::Up => 0,
            Facing::Down => 1,
            Facing::Left => 2,
            Facing::Right => 3,
        }
    }
}
