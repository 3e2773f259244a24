//! Frame clock.
//!
//! [`update_world_time`] is called by [`Scene::tick`](crate::scene::Scene::tick)
//! before any phase runs, so every system of the frame sees the same delta.
use bevy_ecs::prelude::*;
use log::warn;

use crate::resources::worldtime::{MAX_FRAME_DELTA, WorldTime};

/// Start a new frame on the `WorldTime` resource. Returns the scaled delta.
pub fn update_world_time(world: &mut World, dt: f32) -> f32 {
    if !dt.is_finite() || dt < 0.0 {
        warn!("Ignoring invalid frame delta {}", dt);
    } else if dt > MAX_FRAME_DELTA {
        warn!("Frame delta {:.3}s capped to {}s", dt, MAX_FRAME_DELTA);
    }
    world.resource_mut::<WorldTime>().advance(dt)
}
