//! Hit points for damageable entities.
//!
//! Damage is applied by
//! [`observe_hitbox_damage`](crate::events::collision::observe_hitbox_damage)
//! when an attack hitbox overlaps the entity. With `remove_on_death` set the
//! entity is despawned on the hit that kills it, which in turn removes its
//! colliders from the grid on the next registration flush.

use bevy_ecs::prelude::Component;

#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Health {
    current: i32,
    max: i32,
    pub remove_on_death: bool,
}

impl Health {
    /// Full health with `max` points, removed on death.
    pub fn new(max: i32) -> Self {
        Self {
            current: max,
            max,
            remove_on_death: true,
        }
    }

    /// Start at `current`, capped at `max`.
    pub fn with_current(mut self, current: i32) -> Self {
        self.current = current.min(self.max);
        self
    }

    pub fn with_remove_on_death(mut self, remove_on_death: bool) -> Self {
        self.remove_on_death = remove_on_death;
        self
    }

    pub fn current(&self) -> i32 {
        self.current
    }

    pub fn max(&self) -> i32 {
        self.max
    }

    /// Lower the cap; current health follows it down.
    pub fn set_max(&mut self, max: i32) {
        self.max = max;
        self.current = self.current.min(max);
    }

    pub fn is_dead(&self) -> bool {
        self.current <= 0
    }

    /// Subtract `amount`. Returns true when this hit is the one that killed.
    pub fn damage(&mut self, amount: i32) -> bool {
        let was_alive = !self.is_dead();
        self.current -= amount;
        was_alive && self.is_dead()
    }

    pub fn heal(&mut self, amount: i32) {
        self.current = (self.current + amount).min(self.max);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_the_killing_blow_reports_death() {
        let mut hp = Health::new(2);
        assert!(!hp.damage(1));
        assert!(hp.damage(1));
        assert!(hp.is_dead());
        assert!(!hp.damage(1));
    }

    #[test]
    fn heal_and_max_are_capped() {
        let mut hp = Health::new(10).with_current(4);
        hp.heal(100);
        assert_eq!(hp.current(), 10);
        hp.set_max(6);
        assert_eq!(hp.current(), 6);
        assert_eq!(Health::new(3).with_current(9).current(), 3);
    }
}
