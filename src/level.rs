//! Data-driven level layout.
//!
//! A [`LevelLayout`] is a grid of characters plus a legend mapping characters
//! to tile kinds, loaded from JSON. [`spawn_level`](crate::game::spawn_level)
//! turns it into tile entities with colliders.
//!
//! # JSON Format
//!
//! ```json
//! {
//!   "tile_size": 32.0,
//!   "grid": ["#####", "#P.x#", "#####"],
//!   "legend": {
//!     "#": { "solid": true },
//!     "x": { "destroyable": true, "health": 3 },
//!     ".": null
//!   },
//!   "script": [{ "frames": 30, "right": true }]
//! }
//! ```
//!
//! The player marker (`P` unless `player_marker` says otherwise) marks where
//! the player spawns; it is not a tile. Characters mapped to `null` or missing
//! from the legend are empty.

use glam::Vec2;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::bounds::Bounds;
use crate::resources::input::ScriptStep;

fn default_true() -> bool {
    true
}

fn default_tile_health() -> i32 {
    3
}

fn default_player_marker() -> char {
    'P'
}

/// How one legend character is spawned.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct TileKind {
    /// Blocks movement (tagged `WORLD`).
    #[serde(default = "default_true")]
    pub solid: bool,
    /// Takes damage from attacks (tagged `DAMAGEABLE`, gets `Health`).
    #[serde(default)]
    pub destroyable: bool,
    #[serde(default = "default_tile_health")]
    pub health: i32,
    /// Collision boxes `[x, y, w, h]` relative to the tile's top-left corner.
    /// Empty means one box covering the whole tile.
    #[serde(default)]
    pub shapes: Vec<[f32; 4]>,
}

impl TileKind {
    /// Collision boxes of this tile, relative to its top-left corner.
    pub fn collision_shapes(&self, tile_size: f32) -> Vec<Bounds> {
        if self.shapes.is_empty() {
            vec![Bounds::new(0.0, 0.0, tile_size, tile_size)]
        } else {
            self.shapes
                .iter()
                .map(|[x, y, w, h]| Bounds::new(*x, *y, w.max(0.0), h.max(0.0)))
                .collect()
        }
    }
}

/// Structure representing the level data loaded from JSON.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct LevelLayout {
    pub tile_size: f32,
    pub grid: Vec<String>,
    pub legend: FxHashMap<char, Option<TileKind>>,
    #[serde(default = "default_player_marker")]
    pub player_marker: char,
    /// Input timeline for the headless demo.
    #[serde(default)]
    pub script: Vec<ScriptStep>,
}

impl LevelLayout {
    /// Loads level data from a JSON file at the specified path.
    pub fn load_from_file(path: &str) -> Result<Self, Box<dyn std::error::Error>> {
        let file_content = std::fs::read_to_string(path)?;
        Self::from_json(&file_content)
    }

    pub fn from_json(json: &str) -> Result<Self, Box<dyn std::error::Error>> {
        let layout: LevelLayout = serde_json::from_str(json)?;
        if !(layout.tile_size.is_finite() && layout.tile_size > 0.0) {
            return Err(format!("tile_size must be positive, got {}", layout.tile_size).into());
        }
        Ok(layout)
    }

    /// Width in tiles (longest row).
    pub fn width_tiles(&self) -> u32 {
        self.grid
            .iter()
            .map(|row| row.chars().count())
            .max()
            .unwrap_or(0) as u32
    }

    pub fn height_tiles(&self) -> u32 {
        self.grid.len() as u32
    }

    /// World rectangle covered by the grid.
    pub fn world_bounds(&self) -> Bounds {
        Bounds::new(
            0.0,
            0.0,
            self.width_tiles() as f32 * self.tile_size,
            self.height_tiles() as f32 * self.tile_size,
        )
    }

    /// Iterate over all defined tiles with the world position of their top-left corner.
    pub fn iter_tiles(&self) -> impl Iterator<Item = (Vec2, &TileKind)> {
        self.grid.iter().enumerate().flat_map(move |(row, line)| {
            line.chars().enumerate().filter_map(move |(col, ch)| {
                match self.legend.get(&ch) {
                    Some(Some(kind)) => Some((self.tile_origin(col, row), kind)),
                    _ => None,
                }
            })
        })
    }

    /// Top-left corner of the first tile holding the player marker.
    pub fn player_start(&self) -> Option<Vec2> {
        self.grid.iter().enumerate().find_map(|(row, line)| {
            line.chars()
                .position(|ch| ch == self.player_marker)
                .map(|col| self.tile_origin(col, row))
        })
    }

    fn tile_origin(&self, col: usize, row: usize) -> Vec2 {
        Vec2::new(col as f32 * self.tile_size, row as f32 * self.tile_size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LEVEL: &str = r######"{
        "tile_size": 16.0,
        "grid": ["####", "#P x", "##"],
        "legend": {
            "#": {},
            "x": { "destroyable": true, "health": 2, "shapes": [[0, 8, 16, 8]] },
            " ": null
        },
        "script": [{ "frames": 3, "left": true }]
    }"######;

    #[test]
    fn parses_layout_and_defaults() {
        let level = LevelLayout::from_json(LEVEL).unwrap();
        assert_eq!(level.width_tiles(), 4);
        assert_eq!(level.height_tiles(), 3);
        assert_eq!(level.world_bounds(), Bounds::new(0.0, 0.0, 64.0, 48.0));
        assert_eq!(level.player_marker, 'P');
        assert_eq!(level.script.len(), 1);

        let wall = level.legend[&'#'].as_ref().unwrap();
        assert!(wall.solid && !wall.destroyable);
        assert_eq!(wall.health, 3);
    }

    #[test]
    fn iterates_tiles_and_finds_the_player() {
        let level = LevelLayout::from_json(LEVEL).unwrap();
        assert_eq!(level.iter_tiles().count(), 4 + 2 + 2);
        assert_eq!(level.player_start(), Some(Vec2::new(16.0, 16.0)));

        let (origin, crate_tile) = level
            .iter_tiles()
            .find(|(_, kind)| kind.destroyable)
            .unwrap();
        assert_eq!(origin, Vec2::new(48.0, 16.0));
        assert_eq!(
            crate_tile.collision_shapes(level.tile_size),
            vec![Bounds::new(0.0, 8.0, 16.0, 8.0)]
        );
    }

    #[test]
    fn rejects_non_positive_tile_size() {
        let json = r#"{ "tile_size": 0.0, "grid": [], "legend": {} }"#;
        assert!(LevelLayout::from_json(json).is_err());
    }
}
