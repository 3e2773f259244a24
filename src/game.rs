//! Demo game setup.
//!
//! Builds a [`Scene`] from a [`LevelLayout`] and a [`GameConfig`]: level
//! tiles, the player with its body collider and four attack hitboxes, the
//! camera, scripted input, and the frame handlers in their phases.
use bevy_ecs::prelude::*;
use glam::Vec2;
use log::info;

use crate::components::attack::AttackHitboxes;
use crate::components::collider::{Collider, CollisionTags};
use crate::components::collidercollection::ColliderCollection;
use crate::components::facing::Facing;
use crate::components::health::Health;
use crate::components::inputcontrolled::InputControlled;
use crate::components::mapposition::MapPosition;
use crate::components::rigidbody::RigidBody;
use crate::error::CollisionError;
use crate::events::collision::observe_hitbox_damage;
use crate::level::LevelLayout;
use crate::resources::camera2d::Camera2D;
use crate::resources::gameconfig::GameConfig;
use crate::resources::input::ScriptedInput;
use crate::scene::{Scene, ScenePhase};
use crate::systems::attack::attack_system;
use crate::systems::camera::camera_follow;
use crate::systems::collision::hitbox_overlap_detector;
use crate::systems::input::play_scripted_input;
use crate::systems::inputsimplecontroller::input_simple_controller;
use crate::systems::movement::movement;

pub const PLAYER_HEALTH: i32 = 10;

/// Spawn one entity per tile of `layout`. Returns the number of tiles spawned.
///
/// Solid tiles block movement (`WORLD`); destroyable tiles are `DAMAGEABLE`
/// and get a [`Health`] that despawns them when it runs out. Tiles that are
/// neither get no collider.
pub fn spawn_level(world: &mut World, layout: &LevelLayout) -> usize {
    let mut count = 0;
    for (origin, kind) in layout.iter_tiles() {
        let mut tags = CollisionTags::empty();
        if kind.solid {
            tags |= CollisionTags::WORLD;
        }
        if kind.destroyable {
            tags |= CollisionTags::DAMAGEABLE;
        }

        let mut tile = world.spawn(MapPosition::new(origin.x, origin.y));
        if !tags.is_empty() {
            let mut shapes = ColliderCollection::new().with_default_tags(tags);
            for bounds in kind.collision_shapes(layout.tile_size) {
                shapes.add_collider(Collider::from_bounds(bounds));
            }
            tile.insert(shapes);
        }
        if kind.destroyable {
            tile.insert(Health::new(kind.health).with_remove_on_death(true));
        }
        count += 1;
    }
    info!(
        "Spawned {} tiles ({}x{} @ {})",
        count,
        layout.width_tiles(),
        layout.height_tiles(),
        layout.tile_size
    );
    count
}

/// Attack hitboxes of the player, in [`Facing::hitbox_index`] order.
fn player_hitboxes() -> ColliderCollection {
    ColliderCollection::new()
        .with_default_tags(CollisionTags::HITBOX)
        .with_default_targets(CollisionTags::DAMAGEABLE)
        // up
        .with_collider(Collider::new(4.0, -8.0, 24.0, 16.0).with_enabled(false))
        // down
        .with_collider(Collider::new(4.0, 24.0, 24.0, 16.0).with_enabled(false))
        // left
        .with_collider(Collider::new(-12.0, 8.0, 16.0, 20.0).with_enabled(false))
        // right
        .with_collider(Collider::new(28.0, 8.0, 16.0, 20.0).with_enabled(false))
}

/// Spawn the player at `position` (top-left of its 32x32 sprite area).
///
/// Only the feet (an 16x8 box at the bottom of the sprite) collide with the
/// level.
pub fn spawn_player(world: &mut World, position: Vec2, walk_speed: f32) -> Entity {
    world
        .spawn((
            MapPosition::new(position.x, position.y),
            Collider::new(8.0, 24.0, 16.0, 8.0)
                .with_tags(CollisionTags::PLAYER)
                .with_targets(CollisionTags::WORLD),
            player_hitboxes(),
            AttackHitboxes,
            RigidBody::new(),
            InputControlled::new(walk_speed),
            Facing::default(),
            Health::new(PLAYER_HEALTH),
        ))
        .id()
}

/// Build the demo scene. Returns the scene and the player entity.
pub fn setup_demo(
    config: &GameConfig,
    layout: &LevelLayout,
) -> Result<(Scene, Entity), CollisionError> {
    let start = layout.player_start().ok_or_else(|| {
        CollisionError::InvalidArgument(format!(
            "level has no player marker '{}'",
            layout.player_marker
        ))
    })?;

    let mut scene = Scene::new();
    scene.world.insert_resource(config.clone());

    spawn_level(&mut scene.world, layout);
    let player = spawn_player(&mut scene.world, start, config.walk_speed);
    let indexed = scene.init_collision(layout.world_bounds(), config.cell_size)?;
    info!("Player spawned at {:?}, {} colliders indexed", start, indexed);

    let viewport = Vec2::new(config.viewport_width as f32, config.viewport_height as f32);
    scene.world.insert_resource(
        Camera2D::new(viewport)
            .with_zoom(config.zoom)
            .with_bounds(layout.world_bounds())
            .with_target(player),
    );
    scene
        .world
        .insert_resource(ScriptedInput::new(layout.script.clone()));

    scene.world.add_observer(observe_hitbox_damage);
    // Ensure the observer is registered before any system triggers events.
    scene.world.flush();

    scene.add_systems(ScenePhase::PreUpdate, play_scripted_input);
    scene.add_systems(
        ScenePhase::Update,
        (
            input_simple_controller,
            movement,
            attack_system,
            hitbox_overlap_detector,
        )
            .chain(),
    );
    scene.add_systems(ScenePhase::PostUpdate, camera_follow);

    Ok((scene, player))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resources::collisiongrid::CollisionGrid;

    const LEVEL: &str = r######"{
        "tile_size": 32.0,
        "grid": ["#####", "#P x#", "#####"],
        "legend": { "#": {}, "x": { "destroyable": true, "health": 2 } }
    }"######;

    #[test]
    fn setup_indexes_level_and_player() {
        let layout = LevelLayout::from_json(LEVEL).unwrap();
        let (scene, player) = setup_demo(&GameConfig::new(), &layout).unwrap();

        let grid = scene.world.resource::<CollisionGrid>();
        // 13 tiles plus the player body; hitboxes start disabled.
        assert_eq!(grid.len(), 14);
        assert!(grid.is_consistent());
        assert_eq!(
            scene.world.get::<MapPosition>(player).unwrap().pos,
            Vec2::new(32.0, 32.0)
        );
        assert_eq!(scene.handler_count(ScenePhase::Update), 1);
    }

    #[test]
    fn level_without_player_is_rejected() {
        let json = r######"{ "tile_size": 32.0, "grid": ["###"], "legend": { "#": {} } }"######;
        let layout = LevelLayout::from_json(json).unwrap();
        assert!(matches!(
            setup_demo(&GameConfig::new(), &layout),
            Err(CollisionError::InvalidArgument(_))
        ));
    }
}
