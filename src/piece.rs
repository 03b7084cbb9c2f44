//! Active piece: the falling shape and its collision-checked moves.

use crate::collision::{Position, collides};
use crate::grid::Grid;
use crate::pieces::{PieceKind, Shape};

/// Horizontal move direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Left,
    Right,
}

impl Direction {
    pub const fn delta(self) -> i32 {
        match self {
            Self::Left => -1,
            Self::Right => 1,
        }
    }
}

/// Current piece with its owned (possibly rotated) matrix and position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivePiece {
    pub kind: PieceKind,
    pub shape: Shape,
    pub pos: Position,
}

impl ActivePiece {
    /// Place `shape` on row 0, horizontally centred: `width / 2 - shape_width / 2`.
    pub fn spawn_centered(kind: PieceKind, shape: Shape, grid: &Grid) -> Self {
        let col = (grid.width() / 2) as i32 - (shape.width() / 2) as i32;
        Self {
            kind,
            shape,
            pos: Position::new(0, col),
        }
    }

    pub fn collides(&self, grid: &Grid) -> bool {
        collides(grid, &self.shape, self.pos)
    }

    /// Shift one column. Returns false, leaving the piece untouched, when blocked.
    pub fn move_horizontal(&mut self, grid: &Grid, dir: Direction) -> bool {
        self.try_shift(grid, 0, dir.delta())
    }

    /// Shift one row down. Returns false, leaving the piece untouched, when blocked.
    pub fn step_down(&mut self, grid: &Grid) -> bool {
        self.try_shift(grid, 1, 0)
    }

    fn try_shift(&mut self, grid: &Grid, drow: i32, dcol: i32) -> bool {
        let next = self.pos.offset(drow, dcol);
        if collides(grid, &self.shape, next) {
            return false;
        }
        self.pos = next;
        true
    }

    /// Turn clockwise, kicking sideways when the turned shape collides.
    ///
    /// Kicks walk the column by +1, -2, +3, -4, ... from wherever the previous step left
    /// it, visiting offsets +1, -1, +2, -2, ... The walk gives up once the next step would
    /// be wider than the shape, and the piece keeps its old shape and column.
    pub fn rotate(&mut self, grid: &Grid) -> bool {
        let rotated = self.shape.rotated();
        let limit = rotated.width() as i32;
        let mut col = self.pos.col;
        let mut step = 1i32;
        while collides(grid, &rotated, Position::new(self.pos.row, col)) {
            col += step;
            step = -(step + step.signum());
            if step.abs() > limit {
                return false;
            }
        }
        self.shape = rotated;
        self.pos.col = col;
        true
    }
}
