//! Tile collision for a single moving box.
//!
//! Resolution runs after the body has already moved for this tick, so it works
//! from overlap rather than from a swept path:
//!
//!  1. **Enumerate** the cells the box's corners fall into. The box is never
//!     larger than a cell, so that is at most a 2x2 block, listed as
//!     bottom-left, diagonal, right, top.
//!  2. **Filter** to occupied cells, keeping that order.
//!  3. **Resolve** each occupied cell in turn against a fresh read of the box.
//!     A wide, flat overlap is a floor hit and pushes the box up onto the tile.
//!     A tall, thin overlap is a wall hit and pushes the box sideways, away from
//!     the side the tile is on. Later cells see the corrections of earlier ones,
//!     so the order above decides the outcome when several cells are hit at once.
//!
//! A corner-exact overlap (square intersection) is resolved as a floor hit.

use crate::body::Body;
use crate::grid::TileLayer;
use crate::rect::Rect;

/// One grid cell under the body's box this tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CollisionCell {
    pub x: i32,
    pub y: i32,
    pub occupied: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CollisionReport {
    /// Occupied cells that were examined.
    pub cells_checked: usize,
    /// A floor correction happened.
    pub landed: bool,
    /// The body was pushed left, off a tile on its right side.
    pub pushed_left: bool,
    /// The body was pushed right, off a tile on its left side.
    pub pushed_right: bool,
}

impl CollisionReport {
    pub fn collided(&self) -> bool {
        self.landed || self.pushed_left || self.pushed_right
    }
}

/// Cells covered by `rect`, which must be no larger than one cell on either
/// axis. A box aligned to the grid covers exactly one cell.
pub fn covered_cells<L: TileLayer + ?Sized>(layer: &L, rect: Rect) -> Vec<CollisionCell> {
    let size = layer.cell_size();
    let cell_x = (rect.x / size).floor() as i32;
    let cell_y = (rect.y / size).floor() as i32;

    // The far edges are exclusive: a box ending exactly on a cell boundary
    // does not reach into the next cell.
    let crosses_x = ((rect.right() / size).ceil() as i32 - 1) > cell_x;
    let crosses_y = ((rect.top() / size).ceil() as i32 - 1) > cell_y;

    let mut cells = Vec::with_capacity(4);
    let mut push = |x: i32, y: i32| {
        cells.push(CollisionCell {
            x,
            y,
            occupied: layer.is_occupied(x, y),
        });
    };

    push(cell_x, cell_y);
    if crosses_x && crosses_y {
        push(cell_x + 1, cell_y + 1);
    }
    if crosses_x {
        push(cell_x + 1, cell_y);
    }
    if crosses_y {
        push(cell_x, cell_y + 1);
    }
    cells
}

/// Drops empty cells, keeping enumeration order.
pub fn occupied_cells(cells: Vec<CollisionCell>) -> Vec<CollisionCell> {
    cells.into_iter().filter(|cell| cell.occupied).collect()
}

/// Pushes the body out of every occupied cell it overlaps and lands it on
/// floor hits.
pub fn resolve_tile_collisions<L: TileLayer + ?Sized>(
    body: &mut Body,
    layer: &L,
) -> CollisionReport {
    let cells = occupied_cells(covered_cells(layer, body.collision_rect()));
    let mut report = CollisionReport {
        cells_checked: cells.len(),
        ..CollisionReport::default()
    };

    for cell in &cells {
        let body_rect = body.collision_rect();
        let Some(hit) = body_rect.intersection(&layer.cell_rect(cell.x, cell.y)) else {
            // An earlier correction already moved the body clear of this cell.
            continue;
        };

        if hit.width < hit.height {
            if hit.x == body_rect.x {
                body.position.x = hit.right();
                report.pushed_right = true;
            } else if hit.x > body_rect.x {
                body.position.x = hit.x - body.width();
                report.pushed_left = true;
            }
        } else {
            body.position.y = hit.top();
            body.land();
            report.landed = true;
        }
    }

    if report.collided() {
        log::trace!(
            "Tile collision: {} cells, landed={}, pushed_left={}, pushed_right={}",
            report.cells_checked,
            report.landed,
            report.pushed_left,
            report.pushed_right
        );
    }
    report
}
