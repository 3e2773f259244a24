//! tilebox demo entry point.
//!
//! A headless 2D tile game driving the collision engine:
//! - **bevy_ecs** for entity-component-system architecture
//! - a uniform grid broad-phase with tag filtering
//! - axis-separated movement resolution against solid tiles
//!
//! The level is a JSON character grid; the player walks
//! following the input script embedded in the level and attacks
//! destroyable tiles with directional hitboxes.
//!
//! # Main Loop
//!
//! 1. Load `config.ini` (defaults on failure) and the level JSON
//! 2. Spawn tiles and the player, initialize the collision grid
//! 3. Tick the scene `frames` times with a fixed delta
//! 4. Log a summary of where everything ended up
//!
//! # Running
//!
//! ```sh
//! RUST_LOG=debug cargo run --release -- --level assets/levels/demo.json
//! ```

use std::path::PathBuf;

use clap::Parser;
use log::{error, info};

use tilebox::components::mapposition::MapPosition;
use tilebox::game;
use tilebox::level::LevelLayout;
use tilebox::resources::camera2d::Camera2D;
use tilebox::resources::collisiongrid::CollisionGrid;
use tilebox::resources::gameconfig::GameConfig;
use tilebox::resources::worldtime::WorldTime;

/// tilebox 2D collision demo
#[derive(Parser)]
#[command(version, about = "Headless tile-world demo of the tilebox collision engine")]
struct Cli {
    /// Path to the INI configuration file.
    #[arg(long, value_name = "PATH", default_value = "./config.ini")]
    config: PathBuf,

    /// Path to the JSON level layout.
    #[arg(long, value_name = "PATH", default_value = "assets/levels/demo.json")]
    level: String,

    /// Number of frames to simulate (overrides `[demo] frames`).
    #[arg(long, value_name = "N")]
    frames: Option<u32>,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    let mut config = GameConfig::with_path(&cli.config);
    if let Err(e) = config.load_from_file() {
        info!("{}; using default configuration", e);
    }
    if let Some(frames) = cli.frames {
        config.frames = frames;
    }

    let layout = match LevelLayout::load_from_file(&cli.level) {
        Ok(layout) => layout,
        Err(e) => {
            error!("Failed to load level {}: {}", cli.level, e);
            std::process::exit(1);
        }
    };

    let (mut scene, player) = match game::setup_demo(&config, &layout) {
        Ok(setup) => setup,
        Err(e) => {
            error!("Failed to set up the demo: {}", e);
            std::process::exit(1);
        }
    };

    info!("Running {} frames at dt={}", config.frames, config.fixed_dt);
    for frame in 0..config.frames {
        scene.tick(config.fixed_dt);
        if frame % 60 == 59 {
            if let Some(position) = scene.world.get::<MapPosition>(player) {
                info!("frame {}: player at ({:.1}, {:.1})", frame + 1, position.pos.x, position.pos.y);
            }
        }
    }

    let time = scene.world.resource::<WorldTime>();
    info!("Simulated {} frames ({:.2}s)", time.frame_count, time.elapsed);
    let grid = scene.world.resource::<CollisionGrid>();
    info!(
        "Grid: {} colliders in {} cells, consistent: {}",
        grid.len(),
        grid.occupied_cells().count(),
        grid.is_consistent()
    );
    if let Some(camera) = scene.world.get_resource::<Camera2D>() {
        info!("Camera at ({:.1}, {:.1})", camera.position.x, camera.position.y);
    }
    scene.unload();
}
