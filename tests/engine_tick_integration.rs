//! Scene tick integration tests for collider lifecycle, movement resolution,
//! attacks and the camera.

use bevy_ecs::prelude::*;
use glam::Vec2;

use tilebox::bounds::Bounds;
use tilebox::components::collider::{Collider, ColliderKey, CollisionTags};
use tilebox::components::collidercollection::ColliderCollection;
use tilebox::components::mapposition::MapPosition;
use tilebox::components::rigidbody::RigidBody;
use tilebox::game::setup_demo;
use tilebox::level::LevelLayout;
use tilebox::resources::camera2d::Camera2D;
use tilebox::resources::collisiongrid::CollisionGrid;
use tilebox::resources::gameconfig::GameConfig;
use tilebox::scene::{Scene, ScenePhase};

#[derive(Resource, Default)]
struct SeenBlockers(Vec<usize>);

fn count_blockers(grid: Res<CollisionGrid>, mut seen: ResMut<SeenBlockers>) {
    let hits = grid
        .query(&Bounds::new(0.0, 0.0, 320.0, 320.0), CollisionTags::WORLD)
        .unwrap_or_default();
    seen.0.push(hits.len());
}

fn make_scene() -> Scene {
    let mut scene = Scene::new();
    scene
        .init_collision(Bounds::new(0.0, 0.0, 320.0, 320.0), 32.0)
        .unwrap();
    scene
}

fn spawn_block(scene: &mut Scene, x: f32, y: f32) -> Entity {
    scene
        .world
        .spawn((
            MapPosition::new(x, y),
            Collider::new(0.0, 0.0, 32.0, 32.0).with_tags(CollisionTags::WORLD),
        ))
        .id()
}

fn grid(scene: &Scene) -> &CollisionGrid {
    scene.world.resource::<CollisionGrid>()
}

#[test]
fn spawned_colliders_are_indexed_before_update_handlers() {
    let mut scene = make_scene();
    scene.world.init_resource::<SeenBlockers>();
    scene.add_systems(ScenePhase::Update, count_blockers);

    spawn_block(&mut scene, 64.0, 64.0);
    scene.tick(1.0 / 60.0);
    spawn_block(&mut scene, 128.0, 64.0);
    scene.tick(1.0 / 60.0);

    assert_eq!(scene.world.resource::<SeenBlockers>().0, vec![1, 2]);
    assert!(grid(&scene).is_consistent());
}

#[test]
fn despawned_entities_leave_the_grid_on_the_next_flush() {
    let mut scene = make_scene();
    let block = spawn_block(&mut scene, 64.0, 64.0);
    let hitboxes = scene
        .world
        .spawn((
            MapPosition::new(10.0, 10.0),
            ColliderCollection::new()
                .with_default_tags(CollisionTags::HITBOX)
                .with_collider(Collider::new(0.0, 0.0, 8.0, 8.0))
                .with_collider(Collider::new(40.0, 0.0, 8.0, 8.0)),
        ))
        .id();
    scene.tick(1.0 / 60.0);
    assert_eq!(grid(&scene).len(), 3);

    scene.world.despawn(block);
    scene.world.despawn(hitboxes);
    scene.tick(1.0 / 60.0);

    assert!(grid(&scene).is_empty());
    assert!(!grid(&scene).contains(ColliderKey::body(block)));
    assert!(grid(&scene).is_consistent());
}

#[test]
fn removing_the_component_keeps_the_entity_but_drops_its_key() {
    let mut scene = make_scene();
    let block = spawn_block(&mut scene, 64.0, 64.0);
    scene.tick(1.0 / 60.0);

    scene.world.entity_mut(block).remove::<Collider>();
    scene.tick(1.0 / 60.0);

    assert!(scene.world.get_entity(block).is_ok());
    assert!(!grid(&scene).contains(ColliderKey::body(block)));
}

#[test]
fn disabling_and_enabling_a_collider_toggles_membership() {
    let mut scene = make_scene();
    let block = spawn_block(&mut scene, 64.0, 64.0);
    scene.tick(1.0 / 60.0);
    assert!(grid(&scene).contains(ColliderKey::body(block)));

    scene
        .world
        .get_mut::<Collider>(block)
        .unwrap()
        .set_enabled(false);
    scene.tick(1.0 / 60.0);
    assert!(!grid(&scene).contains(ColliderKey::body(block)));

    scene
        .world
        .get_mut::<Collider>(block)
        .unwrap()
        .set_enabled(true);
    scene.tick(1.0 / 60.0);
    assert!(grid(&scene).contains(ColliderKey::body(block)));
    assert!(grid(&scene).is_consistent());
}

#[test]
fn teleported_blocker_is_rebucketed_after_update() {
    let mut scene = make_scene();
    let block = spawn_block(&mut scene, 0.0, 0.0);
    scene.tick(1.0 / 60.0);

    scene.world.get_mut::<MapPosition>(block).unwrap().set(250.0, 200.0);
    scene.tick(1.0 / 60.0);

    let entry = grid(&scene).entry(ColliderKey::body(block)).unwrap();
    assert_eq!(entry.bounds, Bounds::new(250.0, 200.0, 32.0, 32.0));
    assert!(grid(&scene).cell_contents(glam::IVec2::new(0, 0)).is_empty());
    assert!(grid(&scene).is_consistent());
}

#[test]
fn mover_stops_flush_against_a_blocker() {
    let mut scene = make_scene();
    scene.add_systems(ScenePhase::Update, tilebox::systems::movement::movement);
    spawn_block(&mut scene, 64.0, 64.0);
    let mover = scene
        .world
        .spawn((
            MapPosition::new(40.0, 64.0),
            Collider::new(0.0, 0.0, 16.0, 16.0)
                .with_tags(CollisionTags::PLAYER)
                .with_targets(CollisionTags::WORLD),
            RigidBody::new().with_velocity(Vec2::new(120.0, 0.0)),
        ))
        .id();

    scene.tick(0.25);

    assert_eq!(scene.world.get::<MapPosition>(mover).unwrap().pos, Vec2::new(48.0, 64.0));
    assert_eq!(
        scene.world.get::<RigidBody>(mover).unwrap().last_displacement,
        Vec2::new(8.0, 0.0)
    );
    let entry = grid(&scene).entry(ColliderKey::body(mover)).unwrap();
    assert_eq!(entry.bounds, Bounds::new(48.0, 64.0, 16.0, 16.0));

    // Pushing further keeps it in place.
    scene.tick(0.25);
    assert_eq!(scene.world.get::<MapPosition>(mover).unwrap().pos, Vec2::new(48.0, 64.0));
}

#[derive(Resource)]
struct Door(Entity);

fn open_door(door: Res<Door>, mut colliders: Query<&mut Collider>) {
    if let Ok(mut collider) = colliders.get_mut(door.0) {
        collider.set_enabled(false);
    }
}

#[test]
fn collider_disabled_earlier_in_the_frame_does_not_block() {
    let mut scene = make_scene();
    scene.add_systems(
        ScenePhase::Update,
        (open_door, tilebox::systems::movement::movement).chain(),
    );
    let door = spawn_block(&mut scene, 64.0, 64.0);
    scene.world.insert_resource(Door(door));
    let mover = scene
        .world
        .spawn((
            MapPosition::new(40.0, 64.0),
            Collider::new(0.0, 0.0, 16.0, 16.0)
                .with_tags(CollisionTags::PLAYER)
                .with_targets(CollisionTags::WORLD),
            RigidBody::new().with_velocity(Vec2::new(120.0, 0.0)),
        ))
        .id();

    scene.tick(0.25);

    assert_eq!(scene.world.get::<MapPosition>(mover).unwrap().pos, Vec2::new(70.0, 64.0));
    // The disabled door itself leaves the grid on the next flush.
    scene.tick(1.0 / 60.0);
    assert!(!grid(&scene).contains(ColliderKey::body(door)));
    assert!(grid(&scene).is_consistent());
}

#[test]
fn shorter_collection_drops_the_extra_hitboxes() {
    let mut scene = make_scene();
    let owner = scene
        .world
        .spawn((
            MapPosition::new(10.0, 10.0),
            ColliderCollection::new()
                .with_default_tags(CollisionTags::HITBOX)
                .with_collider(Collider::new(0.0, 0.0, 8.0, 8.0))
                .with_collider(Collider::new(40.0, 0.0, 8.0, 8.0)),
        ))
        .id();
    scene.tick(1.0 / 60.0);
    assert!(grid(&scene).contains(ColliderKey::hitbox(owner, 1)));

    scene.world.entity_mut(owner).insert(
        ColliderCollection::new()
            .with_default_tags(CollisionTags::HITBOX)
            .with_collider(Collider::new(0.0, 0.0, 8.0, 8.0)),
    );
    scene.tick(1.0 / 60.0);

    assert!(grid(&scene).contains(ColliderKey::hitbox(owner, 0)));
    assert!(!grid(&scene).contains(ColliderKey::hitbox(owner, 1)));
    assert_eq!(grid(&scene).len(), 1);
    assert!(grid(&scene).is_consistent());
}

#[test]
fn collider_changes_owner() {
    let mut scene = make_scene();
    let from = spawn_block(&mut scene, 0.0, 0.0);
    let to = scene.world.spawn(MapPosition::new(160.0, 160.0)).id();
    scene.tick(1.0 / 60.0);

    assert!(scene.set_collider_owner(from, to));
    assert!(!grid(&scene).contains(ColliderKey::body(from)));
    assert_eq!(
        grid(&scene).entry(ColliderKey::body(to)).unwrap().bounds,
        Bounds::new(160.0, 160.0, 32.0, 32.0)
    );
    assert!(scene.world.get::<Collider>(from).is_none());

    scene.tick(1.0 / 60.0);
    assert_eq!(grid(&scene).len(), 1);
    assert!(grid(&scene).is_consistent());

    assert!(!scene.set_collider_owner(from, to));
}

#[test]
fn unload_empties_the_grid_and_the_world() {
    let mut scene = make_scene();
    spawn_block(&mut scene, 0.0, 0.0);
    spawn_block(&mut scene, 64.0, 0.0);
    scene.tick(1.0 / 60.0);

    scene.unload();
    assert!(!grid(&scene).is_initialized());
    assert_eq!(
        scene.world.query::<&MapPosition>().iter(&scene.world).count(),
        0
    );
    // Ticking an unloaded scene is harmless.
    scene.tick(1.0 / 60.0);
}

const ARENA: &str = r######"{
    "tile_size": 32.0,
    "grid": ["#####", "#Px #", "#####"],
    "legend": { "#": {}, "x": { "destroyable": true, "health": 3 } },
    "script": [
        { "frames": 1, "right": true },
        { "frames": 3, "attack": true }
    ]
}"######;

#[test]
fn attacking_a_tile_three_times_destroys_it() {
    let layout = LevelLayout::from_json(ARENA).unwrap();
    let (mut scene, _player) = setup_demo(&GameConfig::new(), &layout).unwrap();

    let mut tiles = scene.world.query::<(Entity, &MapPosition)>();
    let target = tiles
        .iter(&scene.world)
        .find(|(_, p)| p.pos == Vec2::new(64.0, 32.0))
        .map(|(e, _)| e)
        .unwrap();
    assert!(grid(&scene).contains(ColliderKey::hitbox(target, 0)));

    for _ in 0..3 {
        scene.tick(1.0 / 60.0);
    }
    assert!(scene.world.get_entity(target).is_ok());

    scene.tick(1.0 / 60.0);
    assert!(scene.world.get_entity(target).is_err());

    scene.tick(1.0 / 60.0);
    assert!(grid(&scene).entries().all(|(key, _)| key.entity != target));
    assert!(grid(&scene).is_consistent());
}

#[test]
fn camera_stays_inside_the_map() {
    let layout = LevelLayout::from_json(ARENA).unwrap();
    let mut config = GameConfig::new();
    config.viewport_width = 64;
    config.viewport_height = 64;
    config.zoom = 1.0;
    let (mut scene, _player) = setup_demo(&config, &layout).unwrap();

    for _ in 0..10 {
        scene.tick(1.0 / 60.0);
        let camera = scene.world.resource::<Camera2D>();
        let allowed = camera.position_bounds().unwrap();
        assert!(allowed.contains(camera.position));
        let visible = camera.visible_bounds();
        assert!(visible.left() >= 0.0 && visible.right() <= 160.0);
        assert!(visible.top() >= 0.0 && visible.bottom() <= 96.0);
    }
}
