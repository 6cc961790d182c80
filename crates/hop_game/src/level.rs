//! Level files: one tile layer plus an object layer of collectible placements.
//!
//! ```json
//! {
//!   "version": "0.1",
//!   "level_id": "meadow",
//!   "tile_layer": { "tile_size": 16, "width": 100, "height": 30,
//!                   "tiles": [{ "x": 0, "y": 0 }] },
//!   "collectibles": [{ "x": 200.0, "y": 64.0 }],
//!   "spawn": { "x": 0.0, "y": 240.0 }
//! }
//! ```

use hop_core::{TileGrid, TileLayer, TileLayerFile};
use serde::Deserialize;
use std::fs;
use std::path::Path;

#[derive(Debug, Deserialize, Clone)]
pub struct LevelFile {
    pub version: String,
    pub level_id: String,
    pub tile_layer: TileLayerFile,
    #[serde(default)]
    pub collectibles: Vec<Placement>,
    #[serde(default)]
    pub spawn: Option<Placement>,
}

/// A world position from the object layer, bottom-left anchored.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq)]
pub struct Placement {
    pub x: f32,
    pub y: f32,
}

/// A loaded, validated level.
#[derive(Debug, Clone)]
pub struct Level {
    pub version: String,
    pub level_id: String,
    pub grid: TileGrid,
    pub collectibles: Vec<Placement>,
    pub spawn: Option<Placement>,
}

impl Level {
    pub fn from_file(file: LevelFile) -> Result<Self, String> {
        let LevelFile {
            version,
            level_id,
            tile_layer,
            collectibles,
            spawn,
        } = file;
        if level_id.is_empty() {
            return Err("Level validation failed: level_id is empty".to_string());
        }
        let grid =
            TileGrid::try_from_file(tile_layer).map_err(|e| format!("Level '{level_id}': {e}"))?;
        validate_placements(&grid, &collectibles, spawn)?;
        if collectibles.is_empty() {
            log::warn!(
                "Level '{}' has no collectibles. This is allowed but often accidental.",
                level_id
            );
        }
        Ok(Self {
            version,
            level_id,
            grid,
            collectibles,
            spawn,
        })
    }

    #[allow(dead_code)]
    pub fn level_width(&self) -> f32 {
        self.grid.level_width()
    }
}

pub fn load_level_from_path(path: &Path) -> Result<Level, String> {
    let raw =
        fs::read_to_string(path).map_err(|e| format!("Failed to read {}: {e}", path.display()))?;
    let file: LevelFile = serde_json::from_str(&raw)
        .map_err(|e| format!("Failed to parse level JSON {}: {e}", path.display()))?;
    let level = Level::from_file(file)?;
    log::info!(
        "Loaded level '{}' ({}): {}x{} cells, {} tiles, {} collectibles",
        level.level_id,
        level.version,
        level.grid.width(),
        level.grid.height(),
        level.grid.tile_count(),
        level.collectibles.len()
    );
    Ok(level)
}

/// Collectibles must sit inside the tile layer's extent.
fn validate_placements(
    grid: &TileGrid,
    collectibles: &[Placement],
    spawn: Option<Placement>,
) -> Result<(), String> {
    let (level_width, level_height) = (grid.level_width(), grid.level_height());
    for (index, placement) in collectibles.iter().enumerate() {
        if !(placement.x.is_finite() && placement.y.is_finite()) {
            return Err(format!(
                "Level validation failed: collectible {index} has a non-finite position"
            ));
        }
        let inside = (0.0..level_width).contains(&placement.x)
            && (0.0..level_height).contains(&placement.y);
        if !inside {
            return Err(format!(
                "Level validation failed: collectible {index} at ({}, {}) is outside the \
                 {level_width}x{level_height} level",
                placement.x, placement.y
            ));
        }
    }
    if let Some(spawn) = spawn {
        if !(spawn.x.is_finite() && spawn.y.is_finite()) {
            return Err("Level validation failed: spawn has a non-finite position".to_string());
        }
    }
    Ok(())
}
