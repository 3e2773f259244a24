//! Tagged axis-aligned collider and the tag bitmask.
//!
//! A [`Collider`] is a box placed relative to its owner's
//! [`MapPosition`](super::mapposition::MapPosition). `tags` say what the
//! collider *is*, `targets` say what it *collides against*. A collider is
//! indexed by the [`CollisionGrid`](crate::resources::collisiongrid::CollisionGrid)
//! only while it is enabled and has at least one tag.

use bevy_ecs::prelude::{Component, Entity};
use bitflags::bitflags;
use glam::Vec2;

use crate::bounds::Bounds;

bitflags! {
    /// Fixed set of collision categories.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct CollisionTags: u32 {
        /// Static level geometry.
        const WORLD = 1 << 0;
        const PLAYER = 1 << 1;
        /// Anything that takes damage from hitboxes.
        const DAMAGEABLE = 1 << 2;
        /// Attack volumes.
        const HITBOX = 1 << 3;
    }
}

/// Which collider of an entity a grid entry refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ColliderSlot {
    /// The entity's [`Collider`] component.
    Body,
    /// Entry `n` of the entity's
    /// [`ColliderCollection`](super::collidercollection::ColliderCollection).
    Hitbox(u32),
}

/// Stable identifier of one collider: owner entity plus slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ColliderKey {
    pub entity: Entity,
    pub slot: ColliderSlot,
}

impl ColliderKey {
    pub fn body(entity: Entity) -> Self {
        Self {
            entity,
            slot: ColliderSlot::Body,
        }
    }

    pub fn hitbox(entity: Entity, index: usize) -> Self {
        Self {
            entity,
            slot: ColliderSlot::Hitbox(index as u32),
        }
    }
}

#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct Collider {
    /// Box relative to the owner's position.
    pub offset: Bounds,
    pub tags: CollisionTags,
    pub targets: CollisionTags,
    pub enabled: bool,
}

impl Collider {
    /// Untagged, enabled collider at `(dx, dy)` from the owner with the given size.
    pub fn new(dx: f32, dy: f32, width: f32, height: f32) -> Self {
        Self::from_bounds(Bounds::new(dx, dy, width, height))
    }

    pub fn from_bounds(offset: Bounds) -> Self {
        Self {
            offset,
            tags: CollisionTags::empty(),
            targets: CollisionTags::empty(),
            enabled: true,
        }
    }

    pub fn with_tags(mut self, tags: CollisionTags) -> Self {
        self.tags = tags;
        self
    }

    pub fn with_targets(mut self, targets: CollisionTags) -> Self {
        self.targets = targets;
        self
    }

    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    /// Whether the grid should index this collider.
    pub fn is_active(&self) -> bool {
        self.enabled && !self.tags.is_empty()
    }

    /// World-space box for an owner standing at `owner_pos`.
    pub fn world_bounds(&self, owner_pos: Vec2) -> Bounds {
        self.offset.translated(owner_pos)
    }

    /// True when the two boxes intersect and `filter` selects one of `other`'s tags.
    pub fn overlaps(
        &self,
        owner_pos: Vec2,
        other: &Collider,
        other_pos: Vec2,
        filter: CollisionTags,
    ) -> bool {
        filter.intersects(other.tags)
            && self
                .world_bounds(owner_pos)
                .intersects(&other.world_bounds(other_pos))
    }
}
