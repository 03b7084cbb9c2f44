//! Collision test and merge of a shape into the grid.

use crate::grid::Grid;
use crate::pieces::Shape;

/// Top-left anchor of a shape's matrix in grid coordinates. May be negative.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Position {
    pub row: i32,
    pub col: i32,
}

impl Position {
    pub const fn new(row: i32, col: i32) -> Self {
        Self { row, col }
    }

    pub const fn offset(self, drow: i32, dcol: i32) -> Self {
        Self {
            row: self.row + drow,
            col: self.col + dcol,
        }
    }
}

/// True if any block of `shape` placed at `pos` hits a wall, the floor or a settled cell.
/// Blocks above the top row never collide.
pub fn collides(grid: &Grid, shape: &Shape, pos: Position) -> bool {
    shape
        .cells()
        .any(|(y, x, _)| grid.is_blocked(pos.row + y as i32, pos.col + x as i32))
}

/// Burn `shape` into the grid at `pos`. Blocks outside the grid are dropped.
pub fn merge(grid: &mut Grid, shape: &Shape, pos: Position) {
    for (y, x, cell) in shape.cells() {
        let (row, col) = (pos.row + y as i32, pos.col + x as i32);
        if let Err(e) = grid.set_cell(row, col, cell) {
            log::trace!("merge skipped block: {e}");
        }
    }
}
