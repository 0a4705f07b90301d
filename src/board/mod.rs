use std::fmt::{self, Write};

use crate::piece::{Piece, PieceId, PieceType};

pub mod layout;
pub mod matches;
pub mod swap;

pub use layout::{GridLayout, Rect};
pub use matches::{MatchGroup, find_all_matches};
pub use swap::{any_matches_possible, can_swap_produce_match, find_hint};

/// Grid coordinates. Row 0 is the top row; gravity pulls toward the last row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Cell {
    pub column: usize,
    pub row: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    pub fn opposite(self) -> Self {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }
}

impl Cell {
    pub const fn new(column: usize, row: usize) -> Self {
        Self { column, row }
    }

    /// `None` when stepping off the top or left edge. The far edges are left to the grid's
    /// bounds check.
    pub fn neighbor(self, direction: Direction) -> Option<Cell> {
        let Cell { column, row } = self;

        Some(match direction {
            Direction::Up => Cell::new(column, row.checked_sub(1)?),
            Direction::Down => Cell::new(column, row + 1),
            Direction::Left => Cell::new(column.checked_sub(1)?, row),
            Direction::Right => Cell::new(column + 1, row),
        })
    }

    pub fn is_adjacent(self, other: Cell) -> bool {
        self.column.abs_diff(other.column) + self.row.abs_diff(other.row) == 1
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.column, self.row)
    }
}

/// Fixed `columns × rows` array of optional pieces, stored column by column.
///
/// Lookups outside the grid fail closed and report an empty cell, since neighbour scans
/// routinely step over the edges.
#[derive(Clone, PartialEq)]
pub struct Grid {
    columns: usize,
    rows: usize,
    cells: Vec<Option<Piece>>,
}

impl Grid {
    pub fn new(columns: usize, rows: usize) -> Self {
        Self {
            columns,
            rows,
            cells: vec![None; columns * rows],
        }
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn contains(&self, cell: Cell) -> bool {
        cell.column < self.columns && cell.row < self.rows
    }

    fn index(&self, cell: Cell) -> Option<usize> {
        self.contains(cell)
            .then_some(cell.column * self.rows + cell.row)
    }

    pub fn get(&self, cell: Cell) -> Option<&Piece> {
        self.cells[self.index(cell)?].as_ref()
    }

    pub fn get_mut(&mut self, cell: Cell) -> Option<&mut Piece> {
        let index = self.index(cell)?;
        self.cells[index].as_mut()
    }

    pub fn kind_at(&self, cell: Cell) -> Option<PieceType> {
        self.get(cell).map(Piece::kind)
    }

    pub fn is_occupied(&self, cell: Cell) -> bool {
        self.get(cell).is_some()
    }

    /// Removes and returns the occupant of `cell`.
    pub fn take(&mut self, cell: Cell) -> Option<Piece> {
        let index = self.index(cell)?;
        self.cells[index].take()
    }

    /// Places `piece` at its own [`Piece::cell`], returning the previous occupant. A piece whose
    /// cell lies outside the grid is handed straight back.
    pub fn put(&mut self, piece: Piece) -> Option<Piece> {
        match self.index(piece.cell()) {
            Some(index) => self.cells[index].replace(piece),
            None => Some(piece),
        }
    }

    /// Exchanges the contents of two cells and updates the pieces' logical positions.
    pub fn swap(&mut self, a: Cell, b: Cell) -> bool {
        let (Some(i), Some(j)) = (self.index(a), self.index(b)) else {
            return false;
        };

        self.cells.swap(i, j);

        if let Some(piece) = self.cells[i].as_mut() {
            piece.set_cell(a);
        }
        if let Some(piece) = self.cells[j].as_mut() {
            piece.set_cell(b);
        }

        true
    }

    /// All cells, column by column, top to bottom.
    pub fn cells(&self) -> impl Iterator<Item = Cell> + use<> {
        let rows = self.rows;
        (0..self.columns).flat_map(move |column| (0..rows).map(move |row| Cell::new(column, row)))
    }

    pub fn pieces(&self) -> impl Iterator<Item = &Piece> {
        self.cells.iter().flatten()
    }

    pub fn pieces_mut(&mut self) -> impl Iterator<Item = &mut Piece> {
        self.cells.iter_mut().flatten()
    }

    pub fn find(&self, id: PieceId) -> Option<&Piece> {
        self.pieces().find(|piece| piece.id() == id)
    }

    pub fn find_mut(&mut self, id: PieceId) -> Option<&mut Piece> {
        self.pieces_mut().find(|piece| piece.id() == id)
    }

    pub fn empty_count(&self) -> usize {
        self.cells.iter().filter(|slot| slot.is_none()).count()
    }

    pub fn is_full(&self) -> bool {
        self.empty_count() == 0
    }

    /// Row-major snapshot of the piece kinds.
    pub fn kinds(&self) -> Vec<Vec<Option<PieceType>>> {
        (0..self.rows)
            .map(|row| {
                (0..self.columns)
                    .map(|column| self.kind_at(Cell::new(column, row)))
                    .collect()
            })
            .collect()
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in 0..self.rows {
            if row > 0 {
                f.write_char('\n')?;
            }

            for column in 0..self.columns {
                let glyph = self
                    .kind_at(Cell::new(column, row))
                    .map_or('.', PieceType::glyph);
                f.write_char(glyph)?;
            }
        }

        Ok(())
    }
}

impl fmt::Debug for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Grid {}x{}", self.columns, self.rows)?;
        fmt::Display::fmt(self, f)
    }
}

pub mod test_utils {
    use super::{Cell, Grid};
    use crate::piece::{Piece, PieceId, PieceType, Vec2};

    /// Builds a grid from rows of piece glyphs, `.` marking an empty cell. Ids are assigned in
    /// reading order.
    ///
    /// # Panics
    /// Panics on ragged rows or unknown glyphs.
    pub fn grid_from_rows(rows: &[&str]) -> Grid {
        let columns = rows.first().map_or(0, |row| row.chars().count());
        let mut grid = Grid::new(columns, rows.len());
        let mut next_id = 0;

        for (row, line) in rows.iter().enumerate() {
            assert_eq!(line.chars().count(), columns, "ragged row {row}: {line:?}");

            for (column, glyph) in line.chars().enumerate() {
                if glyph == '.' {
                    continue;
                }

                let kind = PieceType::from_glyph(glyph)
                    .unwrap_or_else(|| panic!("unknown piece glyph {glyph:?}"));
                let piece = Piece::new(PieceId(next_id), kind, Cell::new(column, row), Vec2::ZERO);
                next_id += 1;
                grid.put(piece);
            }
        }

        grid
    }
}
