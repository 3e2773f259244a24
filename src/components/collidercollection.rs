//! Several colliders under one owner.
//!
//! Used for multi-hitbox entities (attack volumes around the player) and for
//! tiles whose collision shape is made of more than one box. Each entry is
//! indexed by the grid under [`ColliderKey::hitbox`](super::collider::ColliderKey::hitbox)
//! with its position in the list, so entries are only ever appended.

use bevy_ecs::prelude::Component;

use crate::components::collider::{Collider, CollisionTags};

#[derive(Component, Debug, Clone, Default)]
pub struct ColliderCollection {
    colliders: Vec<Collider>,
    /// Applied to colliders added without tags.
    pub default_tags: CollisionTags,
    /// Applied to colliders added without targets.
    pub default_targets: CollisionTags,
}

impl ColliderCollection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_default_tags(mut self, tags: CollisionTags) -> Self {
        self.default_tags = tags;
        self
    }

    pub fn with_default_targets(mut self, targets: CollisionTags) -> Self {
        self.default_targets = targets;
        self
    }

    /// Builder form of [`ColliderCollection::add_collider`].
    pub fn with_collider(mut self, collider: Collider) -> Self {
        self.add_collider(collider);
        self
    }

    /// Append a collider and return its index. Empty tags or targets are
    /// replaced by the collection defaults.
    pub fn add_collider(&mut self, mut collider: Collider) -> usize {
        if collider.tags.is_empty() {
            collider.tags = self.default_tags;
        }
        if collider.targets.is_empty() {
            collider.targets = self.default_targets;
        }
        self.colliders.push(collider);
        self.colliders.len() - 1
    }

    pub fn get(&self, index: usize) -> Option<&Collider> {
        self.colliders.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut Collider> {
        self.colliders.get_mut(index)
    }

    /// Enable or disable one entry. Returns false for an unknown index.
    pub fn set_enabled(&mut self, index: usize, enabled: bool) -> bool {
        match self.colliders.get_mut(index) {
            Some(collider) => {
                collider.enabled = enabled;
                true
            }
            None => false,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Collider> {
        self.colliders.iter()
    }

    pub fn len(&self) -> usize {
        self.colliders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colliders.is_empty()
    }
}
