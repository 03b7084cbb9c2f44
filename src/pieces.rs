//! Piece catalog: the seven shape templates and clockwise rotation.

use crate::grid::Cell;
use rand::Rng;

/// Piece kinds. Declaration order is the spawn order used by `spawn`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PieceKind {
    T,
    J,
    L,
    O,
    S,
    Z,
    I,
}

impl PieceKind {
    pub const ALL: [Self; 7] = [Self::T, Self::J, Self::L, Self::O, Self::S, Self::Z, Self::I];

    /// Colour id written into the grid (1..=7). 0 is reserved for empty cells.
    pub fn color_id(&self) -> u8 {
        match self {
            Self::T => 1,
            Self::O => 2,
            Self::L => 3,
            Self::J => 4,
            Self::I => 5,
            Self::S => 6,
            Self::Z => 7,
        }
    }

    /// Inverse of `color_id`.
    #[cfg(test)]
    pub fn from_color_id(id: u8) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.color_id() == id)
    }

    /// Fresh copy of this kind's spawn matrix.
    pub fn template(&self) -> Shape {
        const X: bool = true;
        const O: bool = false;
        let mask: &[&[bool]] = match self {
            Self::T => &[&[O, X, O], &[X, X, X], &[O, O, O]],
            Self::O => &[&[X, X], &[X, X]],
            Self::L => &[&[O, O, X], &[X, X, X], &[O, O, O]],
            Self::J => &[&[X, O, O], &[X, X, X], &[O, O, O]],
            Self::I => &[&[O, X, O, O], &[O, X, O, O], &[O, X, O, O], &[O, X, O, O]],
            Self::S => &[&[O, X, X], &[X, X, O], &[O, O, O]],
            Self::Z => &[&[X, X, O], &[O, X, X], &[O, O, O]],
        };
        let block = Cell::Block(*self);
        Shape {
            rows: mask
                .iter()
                .map(|row| {
                    row.iter()
                        .map(|&filled| if filled { block } else { Cell::Empty })
                        .collect()
                })
                .collect(),
        }
    }
}

/// A piece's local matrix. Rows are top to bottom; every row has the same length.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Shape {
    rows: Vec<Vec<Cell>>,
}

impl Shape {
    /// Build a shape from explicit rows. Returns `None` for empty or ragged input.
    #[cfg(test)]
    pub fn from_rows(rows: Vec<Vec<Cell>>) -> Option<Self> {
        let width = rows.first()?.len();
        if width == 0 || rows.iter().any(|r| r.len() != width) {
            return None;
        }
        Some(Self { rows })
    }

    pub fn width(&self) -> usize {
        self.rows.first().map_or(0, Vec::len)
    }

    pub fn height(&self) -> usize {
        self.rows.len()
    }

    #[cfg(test)]
    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    /// Non-empty cells as (row, col, cell) in local coordinates.
    pub fn cells(&self) -> impl Iterator<Item = (usize, usize, Cell)> + '_ {
        self.rows.iter().enumerate().flat_map(|(y, row)| {
            row.iter()
                .enumerate()
                .filter(|(_, c)| c.is_filled())
                .map(move |(x, c)| (y, x, *c))
        })
    }

    /// Clockwise quarter turn about the matrix origin: transpose, then reverse each row.
    /// A `h x w` matrix becomes `w x h`.
    pub fn rotated(&self) -> Self {
        let (h, w) = (self.height(), self.width());
        let rows = (0..w)
            .map(|r| (0..h).map(|c| self.rows[h - 1 - c][r]).collect())
            .collect();
        Self { rows }
    }
}

/// Pick one of the seven kinds uniformly and return an independent copy of its template.
pub fn spawn<R: Rng>(rng: &mut R) -> (Shape, PieceKind) {
    let kind = PieceKind::ALL[rng.random_range(0..PieceKind::ALL.len())];
    (kind.template(), kind)
}
