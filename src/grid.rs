//! Grid: the fixed-size board of settled cells, and line sweeping.

use crate::pieces::PieceKind;
use std::collections::VecDeque;
use std::fmt;
use thiserror::Error;

/// Single board cell: empty, or a settled block carrying its piece colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Cell {
    #[default]
    Empty,
    Block(PieceKind),
}

impl Cell {
    #[inline]
    pub fn is_filled(&self) -> bool {
        matches!(self, Self::Block(_))
    }

    /// Numeric cell value: 0 for empty, 1..=7 for blocks.
    pub fn value(&self) -> u8 {
        match self {
            Self::Empty => 0,
            Self::Block(kind) => kind.color_id(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum GridError {
    #[error("cell ({row}, {col}) is outside the {width}x{height} grid")]
    OutOfBounds {
        row: i32,
        col: i32,
        width: usize,
        height: usize,
    },
}

/// Board of `width x height` cells. Row 0 is the top.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    width: usize,
    height: usize,
    /// rows[y][x] = cell. rows[0] is top.
    rows: VecDeque<Vec<Cell>>,
}

impl Grid {
    pub fn new(width: usize, height: usize) -> Self {
        let rows = (0..height).map(|_| vec![Cell::Empty; width]).collect();
        Self {
            width,
            height,
            rows,
        }
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    pub fn rows(&self) -> impl Iterator<Item = &[Cell]> {
        self.rows.iter().map(Vec::as_slice)
    }

    pub fn clear(&mut self) {
        for row in &mut self.rows {
            row.fill(Cell::Empty);
        }
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.rows.iter().flatten().all(|c| !c.is_filled())
    }

    fn index(&self, row: i32, col: i32) -> Result<(usize, usize), GridError> {
        let err = GridError::OutOfBounds {
            row,
            col,
            width: self.width,
            height: self.height,
        };
        let r = usize::try_from(row).map_err(|_| err)?;
        let c = usize::try_from(col).map_err(|_| err)?;
        if r >= self.height || c >= self.width {
            return Err(err);
        }
        Ok((r, c))
    }

    pub fn cell_at(&self, row: i32, col: i32) -> Result<Cell, GridError> {
        let (r, c) = self.index(row, col)?;
        Ok(self.rows[r][c])
    }

    pub fn set_cell(&mut self, row: i32, col: i32, cell: Cell) -> Result<(), GridError> {
        let (r, c) = self.index(row, col)?;
        self.rows[r][c] = cell;
        Ok(())
    }

    /// Collision view of a coordinate. Everything above row 0 is open, whatever the column,
    /// so pieces can spawn and turn partly out of view. Below that, walls and the floor are
    /// solid.
    pub fn is_blocked(&self, row: i32, col: i32) -> bool {
        if row < 0 {
            return false;
        }
        self.cell_at(row, col).map_or(true, |cell| cell.is_filled())
    }

    /// Remove every full row, dropping everything above it, and return how many went.
    ///
    /// Scans from the bottom. After a removal the same index is examined again, since the
    /// row that was above has just moved into it.
    pub fn sweep_completed_rows(&mut self) -> usize {
        let mut cleared = 0;
        let mut y = self.height;
        while y > 0 {
            let idx = y - 1;
            if self.rows[idx].iter().all(Cell::is_filled) {
                if let Some(mut row) = self.rows.remove(idx) {
                    row.fill(Cell::Empty);
                    self.rows.push_front(row);
                }
                cleared += 1;
                continue;
            }
            y -= 1;
        }
        cleared
    }
}

impl fmt::Display for Grid {
    /// One text line per row: `.` for empty, the colour id for blocks.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in &self.rows {
            for cell in row {
                match cell {
                    Cell::Empty => write!(f, ".")?,
                    Cell::Block(_) => write!(f, "{}", cell.value())?,
                }
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const B: Cell = Cell::Block(PieceKind::T);

    fn fill_row(grid: &mut Grid, row: i32) {
        for col in 0..grid.width() as i32 {
            grid.set_cell(row, col, B).unwrap();
        }
    }

    #[test]
    fn new_grid_is_empty_with_fixed_dimensions() {
        let g = Grid::new(12, 20);
        assert_eq!((g.width(), g.height()), (12, 20));
        assert_eq!(g.rows().count(), 20);
        assert!(g.rows().all(|r| r.len() == 12));
        assert!(g.is_empty());
    }

    #[test]
    fn cell_at_out_of_bounds_is_an_error() {
        let g = Grid::new(4, 4);
        assert!(g.cell_at(0, 0).is_ok());
        assert!(matches!(g.cell_at(-1, 0), Err(GridError::OutOfBounds { .. })));
        assert!(matches!(g.cell_at(0, 4), Err(GridError::OutOfBounds { .. })));
        assert!(matches!(g.cell_at(4, 0), Err(GridError::OutOfBounds { .. })));
    }

    #[test]
    fn is_blocked_walls_floor_and_open_sky() {
        let mut g = Grid::new(4, 4);
        g.set_cell(3, 1, B).unwrap();
        assert!(g.is_blocked(0, -1));
        assert!(g.is_blocked(0, 4));
        assert!(g.is_blocked(4, 0));
        assert!(g.is_blocked(3, 1));
        assert!(!g.is_blocked(3, 0));
        assert!(!g.is_blocked(-1, 0));
        assert!(!g.is_blocked(-10, 2));
        // Above the top even the wall columns are open.
        assert!(!g.is_blocked(-1, -1));
        assert!(!g.is_blocked(-3, 40));
    }

    #[test]
    fn clear_empties_every_cell() {
        let mut g = Grid::new(3, 3);
        fill_row(&mut g, 1);
        g.set_cell(2, 2, B).unwrap();
        g.clear();
        assert!(g.is_empty());
    }

    #[test]
    fn sweep_nothing_to_clear() {
        let mut g = Grid::new(3, 3);
        g.set_cell(2, 0, B).unwrap();
        let before = g.clone();
        assert_eq!(g.sweep_completed_rows(), 0);
        assert_eq!(g, before);
    }

    #[test]
    fn sweep_single_row_shifts_above_down() {
        let mut g = Grid::new(3, 4);
        g.set_cell(2, 1, B).unwrap();
        fill_row(&mut g, 3);
        assert_eq!(g.sweep_completed_rows(), 1);
        assert_eq!(g.to_string(), "...\n...\n...\n.1.\n");
    }

    #[test]
    fn sweep_non_adjacent_rows_in_one_pass() {
        let mut g = Grid::new(3, 5);
        g.set_cell(0, 0, B).unwrap();
        fill_row(&mut g, 1);
        g.set_cell(2, 2, B).unwrap();
        fill_row(&mut g, 3);
        g.set_cell(4, 1, B).unwrap();
        assert_eq!(g.sweep_completed_rows(), 2);
        assert_eq!(g.to_string(), "...\n...\n1..\n..1\n.1.\n");
    }

    #[test]
    fn sweep_adjacent_full_rows() {
        let mut g = Grid::new(2, 4);
        for row in 0..4 {
            fill_row(&mut g, row);
        }
        assert_eq!(g.sweep_completed_rows(), 4);
        assert!(g.is_empty());
    }

    fn arb_grid() -> impl Strategy<Value = Grid> {
        (1usize..6, 1usize..8).prop_flat_map(|(w, h)| {
            proptest::collection::vec(proptest::collection::vec(any::<bool>(), w), h).prop_map(
                move |mask| {
                    let mut g = Grid::new(w, h);
                    for (y, row) in mask.iter().enumerate() {
                        for (x, &filled) in row.iter().enumerate() {
                            if filled {
                                // Colour encodes the source row so order can be checked.
                                let kind = PieceKind::ALL[y % 7];
                                g.set_cell(y as i32, x as i32, Cell::Block(kind)).unwrap();
                            }
                        }
                    }
                    g
                },
            )
        })
    }

    proptest! {
        #[test]
        fn sweep_removes_exactly_full_rows_and_keeps_order(grid in arb_grid()) {
            let before: Vec<Vec<Cell>> = grid.rows().map(<[Cell]>::to_vec).collect();
            let survivors: Vec<Vec<Cell>> = before
                .iter()
                .filter(|r| !r.iter().all(Cell::is_filled))
                .cloned()
                .collect();
            let full = before.len() - survivors.len();

            let mut g = grid;
            prop_assert_eq!(g.sweep_completed_rows(), full);

            let after: Vec<Vec<Cell>> = g.rows().map(<[Cell]>::to_vec).collect();
            prop_assert_eq!(after.len(), before.len());
            for row in &after[..full] {
                prop_assert!(row.iter().all(|c| *c == Cell::Empty));
            }
            prop_assert_eq!(&after[full..], &survivors[..]);
        }
    }
}
