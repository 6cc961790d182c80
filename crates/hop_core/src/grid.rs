//! Tile layer: the static, read-only occupancy grid a level is built from.
//!
//! Cells are addressed by zero-based integer coordinates with `(0, 0)` at the
//! bottom-left of the level. A world position `p` falls into cell
//! `floor(p / cell_size)`. Anything outside the layer reads as empty, so
//! callers never need to bounds-check before asking.

use serde::Deserialize;
use std::collections::HashSet;

use crate::rect::Rect;

/// Read access to a tile layer. The collision resolver only sees this trait.
pub trait TileLayer {
    /// Layer width in cells.
    fn width(&self) -> i32;
    /// Layer height in cells.
    fn height(&self) -> i32;
    /// Side length of one square cell in world units.
    fn cell_size(&self) -> f32;
    /// True iff a tile exists at the cell. Out-of-range cells are empty.
    fn is_occupied(&self, x: i32, y: i32) -> bool;

    /// Level width in world units.
    fn level_width(&self) -> f32 {
        self.width() as f32 * self.cell_size()
    }

    fn level_height(&self) -> f32 {
        self.height() as f32 * self.cell_size()
    }

    /// World-space box covered by a cell.
    fn cell_rect(&self, x: i32, y: i32) -> Rect {
        let size = self.cell_size();
        Rect::new(x as f32 * size, y as f32 * size, size, size)
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct TileLayerFile {
    pub tile_size: i32,
    pub width: i32,
    pub height: i32,
    pub tiles: Vec<GridCell>,
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GridCell {
    pub x: i32,
    pub y: i32,
}

#[derive(Debug, Clone)]
pub struct TileGrid {
    tile_size: i32,
    width: i32,
    height: i32,
    tiles: HashSet<GridCell>,
}

impl TileGrid {
    /// Builds a grid from a layer that already passed `validate_tile_layer`.
    pub fn from_file(file: TileLayerFile) -> Self {
        let tiles = file.tiles.into_iter().collect();
        Self {
            tile_size: file.tile_size,
            width: file.width,
            height: file.height,
            tiles,
        }
    }

    /// Validates and builds in one step; this is what level loading calls.
    pub fn try_from_file(file: TileLayerFile) -> Result<Self, String> {
        validate_tile_layer(&file)?;
        Ok(Self::from_file(file))
    }

    pub fn tile_count(&self) -> usize {
        self.tiles.len()
    }
}

impl TileLayer for TileGrid {
    fn width(&self) -> i32 {
        self.width
    }

    fn height(&self) -> i32 {
        self.height
    }

    fn cell_size(&self) -> f32 {
        self.tile_size as f32
    }

    fn is_occupied(&self, x: i32, y: i32) -> bool {
        if x < 0 || x >= self.width || y < 0 || y >= self.height {
            return false;
        }
        self.tiles.contains(&GridCell { x, y })
    }
}

pub fn validate_tile_layer(file: &TileLayerFile) -> Result<(), String> {
    if file.tile_size <= 0 {
        return Err("Tile layer validation failed: tile_size must be > 0".to_string());
    }
    if file.width <= 0 || file.height <= 0 {
        return Err("Tile layer validation failed: width and height must be > 0".to_string());
    }

    let mut seen = HashSet::new();
    for cell in &file.tiles {
        if cell.x < 0 || cell.x >= file.width || cell.y < 0 || cell.y >= file.height {
            return Err(format!(
                "Tile layer validation failed: tile out of bounds ({}, {})",
                cell.x, cell.y
            ));
        }
        if !seen.insert(*cell) {
            return Err(format!(
                "Tile layer validation failed: duplicate tile ({}, {})",
                cell.x, cell.y
            ));
        }
    }
    Ok(())
}
