//! Game configuration resource.
//!
//! Manages game settings loaded from an INI configuration file. Provides
//! defaults for safe startup and methods to load/save configuration.
//!
//! # Configuration File Format
//!
//! ```ini
//! [world]
//! cell_size = 32
//!
//! [player]
//! walk_speed = 200
//!
//! [camera]
//! viewport_width = 640
//! viewport_height = 360
//! zoom = 2
//!
//! [demo]
//! frames = 600
//! fixed_dt = 0.016666668
//! ```

use bevy_ecs::prelude::*;
use configparser::ini::Ini;
use log::info;
use std::path::PathBuf;

/// Default safe values for startup
const DEFAULT_CELL_SIZE: f32 = 32.0;
const DEFAULT_WALK_SPEED: f32 = 200.0;
const DEFAULT_VIEWPORT_WIDTH: u32 = 640;
const DEFAULT_VIEWPORT_HEIGHT: u32 = 360;
const DEFAULT_ZOOM: f32 = 2.0;
const DEFAULT_FRAMES: u32 = 600;
const DEFAULT_FIXED_DT: f32 = 1.0 / 60.0;
const DEFAULT_CONFIG_PATH: &str = "./config.ini";

/// Game configuration resource.
#[derive(Resource, Debug, Clone, PartialEq)]
pub struct GameConfig {
    /// Broad-phase cell size in world units.
    pub cell_size: f32,
    /// Player walking speed in world units per second.
    pub walk_speed: f32,
    /// Render target width in pixels.
    pub viewport_width: u32,
    /// Render target height in pixels.
    pub viewport_height: u32,
    pub zoom: f32,
    /// Frames simulated by the headless demo.
    pub frames: u32,
    /// Seconds per simulated frame.
    pub fixed_dt: f32,
    /// Path to the configuration file.
    pub config_path: PathBuf,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl GameConfig {
    /// Create a new configuration with safe default values.
    pub fn new() -> Self {
        Self {
            cell_size: DEFAULT_CELL_SIZE,
            walk_speed: DEFAULT_WALK_SPEED,
            viewport_width: DEFAULT_VIEWPORT_WIDTH,
            viewport_height: DEFAULT_VIEWPORT_HEIGHT,
            zoom: DEFAULT_ZOOM,
            frames: DEFAULT_FRAMES,
            fixed_dt: DEFAULT_FIXED_DT,
            config_path: PathBuf::from(DEFAULT_CONFIG_PATH),
        }
    }

    /// Create a new configuration with a custom config file path.
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            config_path: path.into(),
            ..Self::new()
        }
    }

    /// Load configuration from the INI file.
    ///
    /// Missing values retain their current (default) values.
    /// Returns an error if the file cannot be read or parsed.
    pub fn load_from_file(&mut self) -> Result<(), String> {
        let mut config = Ini::new();
        config
            .load(&self.config_path)
            .map_err(|e| format!("Failed to load config file: {}", e))?;
        self.apply(&config);
        Ok(())
    }

    /// Load configuration from INI text.
    pub fn load_from_str(&mut self, text: &str) -> Result<(), String> {
        let mut config = Ini::new();
        config
            .read(text.to_string())
            .map_err(|e| format!("Failed to parse config: {}", e))?;
        self.apply(&config);
        Ok(())
    }

    fn apply(&mut self, config: &Ini) {
        let float = |section: &str, key: &str| config.getfloat(section, key).ok().flatten();
        let uint = |section: &str, key: &str| config.getuint(section, key).ok().flatten();

        // [world] section
        if let Some(cell_size) = float("world", "cell_size") {
            self.cell_size = cell_size as f32;
        }

        // [player] section
        if let Some(speed) = float("player", "walk_speed") {
            self.walk_speed = speed as f32;
        }

        // [camera] section
        if let Some(width) = uint("camera", "viewport_width") {
            self.viewport_width = width as u32;
        }
        if let Some(height) = uint("camera", "viewport_height") {
            self.viewport_height = height as u32;
        }
        if let Some(zoom) = float("camera", "zoom") {
            self.zoom = zoom as f32;
        }

        // [demo] section
        if let Some(frames) = uint("demo", "frames") {
            self.frames = frames as u32;
        }
        if let Some(dt) = float("demo", "fixed_dt") {
            self.fixed_dt = dt as f32;
        }

        info!(
            "Loaded config: cell={}, walk_speed={}, viewport={}x{}@{}x, frames={}, dt={}",
            self.cell_size,
            self.walk_speed,
            self.viewport_width,
            self.viewport_height,
            self.zoom,
            self.frames,
            self.fixed_dt
        );
    }

    /// Save configuration to the INI file.
    ///
    /// Creates the file if it doesn't exist.
    pub fn save_to_file(&self) -> Result<(), String> {
        let mut config = Ini::new();

        config.set("world", "cell_size", Some(self.cell_size.to_string()));
        config.set("player", "walk_speed", Some(self.walk_speed.to_string()));
        config.set("camera", "viewport_width", Some(self.viewport_width.to_string()));
        config.set("camera", "viewport_height", Some(self.viewport_height.to_string()));
        config.set("camera", "zoom", Some(self.zoom.to_string()));
        config.set("demo", "frames", Some(self.frames.to_string()));
        config.set("demo", "fixed_dt", Some(self.fixed_dt.to_string()));

        config
            .write(&self.config_path)
            .map_err(|e| format!("Failed to save config file: {}", e))?;

        info!("Saved config to {:?}", self.config_path);

        Ok(())
    }
}
