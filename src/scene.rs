//! Scene driver.
//!
//! A [`Scene`] owns the ECS [`World`] (and with it the
//! [`CollisionGrid`] resource) plus three ordered lists of schedules, one per
//! [`ScenePhase`]. Every call to [`Scene::add_systems`] appends a new schedule
//! to its phase, so handlers run in the order they were registered. The
//! engine's own collision handlers are registered by [`Scene::new`] and
//! therefore always run first in their phase:
//!
//! - PreUpdate: [`register_colliders`] flushes collider inserts and removals
//! - PostUpdate: [`collision_post_update`] re-buckets colliders moved outside
//!   the movement resolver
//!
//! # Frame
//!
//! [`Scene::tick`] advances [`WorldTime`], runs PreUpdate, Update and
//! PostUpdate, then clears change trackers for the next frame.
use bevy_ecs::prelude::*;
use bevy_ecs::system::ScheduleSystem;
use log::{error, info};

use crate::bounds::Bounds;
use crate::components::collider::{Collider, ColliderKey};
use crate::components::mapposition::MapPosition;
use crate::error::CollisionError;
use crate::resources::collisiongrid::CollisionGrid;
use crate::resources::input::InputState;
use crate::resources::worldtime::WorldTime;
use crate::systems::collision::{
    collision_post_update, rebuild_collision_index, register_colliders, sync_body,
};
use crate::systems::time::update_world_time;

/// Frame phases, run in declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScenePhase {
    PreUpdate,
    Update,
    PostUpdate,
}

pub struct Scene {
    pub world: World,
    pre_update: Vec<Schedule>,
    update: Vec<Schedule>,
    post_update: Vec<Schedule>,
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

impl Scene {
    /// Create a scene with the base resources and the collision handlers.
    ///
    /// The grid starts uninitialized; call [`Scene::init_collision`] once the
    /// level size is known.
    pub fn new() -> Self {
        let mut world = World::new();
        world.insert_resource(WorldTime::default().with_time_scale(1.0));
        world.insert_resource(InputState::default());
        world.insert_resource(CollisionGrid::default());

        let mut scene = Self {
            world,
            pre_update: Vec::new(),
            update: Vec::new(),
            post_update: Vec::new(),
        };
        scene.add_systems(ScenePhase::PreUpdate, register_colliders);
        scene.add_systems(ScenePhase::PostUpdate, collision_post_update);
        scene
    }

    /// Append a handler (a system or a configured group of systems) to `phase`.
    pub fn add_systems<M>(
        &mut self,
        phase: ScenePhase,
        systems: impl IntoScheduleConfigs<ScheduleSystem, M>,
    ) -> &mut Self {
        let mut schedule = Schedule::default();
        schedule.add_systems(systems);
        self.phase_mut(phase).push(schedule);
        self
    }

    /// Number of handlers registered for `phase`.
    pub fn handler_count(&self, phase: ScenePhase) -> usize {
        match phase {
            ScenePhase::PreUpdate => self.pre_update.len(),
            ScenePhase::Update => self.update.len(),
            ScenePhase::PostUpdate => self.post_update.len(),
        }
    }

    fn phase_mut(&mut self, phase: ScenePhase) -> &mut Vec<Schedule> {
        match phase {
            ScenePhase::PreUpdate => &mut self.pre_update,
            ScenePhase::Update => &mut self.update,
            ScenePhase::PostUpdate => &mut self.post_update,
        }
    }

    /// Initialize the collision grid for `world_bounds` and index every
    /// collider already present in the world.
    pub fn init_collision(
        &mut self,
        world_bounds: Bounds,
        cell_size: f32,
    ) -> Result<usize, CollisionError> {
        self.world
            .resource_mut::<CollisionGrid>()
            .initialize(world_bounds, cell_size)?;
        rebuild_collision_index(&mut self.world)
    }

    /// Advance one frame of `dt` seconds.
    pub fn tick(&mut self, dt: f32) {
        update_world_time(&mut self.world, dt);
        for schedule in self.pre_update.iter_mut() {
            schedule.run(&mut self.world);
        }
        for schedule in self.update.iter_mut() {
            schedule.run(&mut self.world);
        }
        for schedule in self.post_update.iter_mut() {
            schedule.run(&mut self.world);
        }
        self.world.clear_trackers();
    }

    /// Move the body collider of `from` to `to`, re-indexing it under its new
    /// owner right away. Returns `false` if `from` has no collider or either
    /// entity does not exist. Any collider `to` already had is replaced.
    pub fn set_collider_owner(&mut self, from: Entity, to: Entity) -> bool {
        let Some(to_pos) = self.world.get::<MapPosition>(to).map(|p| p.pos) else {
            return false;
        };
        let Some(collider) = self
            .world
            .get_entity_mut(from)
            .ok()
            .and_then(|mut entity| entity.take::<Collider>())
        else {
            return false;
        };

        let mut grid = self.world.resource_mut::<CollisionGrid>();
        if grid.is_initialized() {
            let moved = grid
                .remove(ColliderKey::body(from))
                .and_then(|_| sync_body(&mut grid, to, to_pos, &collider));
            if let Err(err) = moved {
                error!("Failed to re-index collider of {:?} under {:?}: {}", from, to, err);
            }
        }
        self.world.entity_mut(to).insert(collider);
        true
    }

    /// Tear the scene down: empty and uninitialize the grid, then despawn
    /// every placed entity. Observers stay registered.
    pub fn unload(&mut self) {
        self.world.resource_mut::<CollisionGrid>().teardown();
        let entities: Vec<Entity> = self
            .world
            .query_filtered::<Entity, With<MapPosition>>()
            .iter(&self.world)
            .collect();
        let count = entities.len();
        for entity in entities {
            self.world.despawn(entity);
        }
        self.world.flush();
        info!("Scene unloaded ({} entities despawned)", count);
    }
}
