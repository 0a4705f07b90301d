use super::{Cell, Direction, Grid, matches::MIN_RUN};
use crate::piece::PieceType;

/// Read-only view of a grid with two cells' contents exchanged.
struct Swapped<'a> {
    grid: &'a Grid,
    a: Cell,
    b: Cell,
}

impl Swapped<'_> {
    fn kind_at(&self, cell: Cell) -> Option<PieceType> {
        if cell == self.a {
            self.grid.kind_at(self.b)
        } else if cell == self.b {
            self.grid.kind_at(self.a)
        } else {
            self.grid.kind_at(cell)
        }
    }

    /// Number of consecutive `kind` pieces next to `origin` heading `direction`, excluding
    /// `origin` itself.
    fn count(&self, origin: Cell, kind: PieceType, direction: Direction) -> usize {
        std::iter::successors(origin.neighbor(direction), |cell| cell.neighbor(direction))
            .take_while(|&cell| self.kind_at(cell) == Some(kind))
            .count()
    }

    fn completes_run(&self, cell: Cell) -> bool {
        let Some(kind) = self.kind_at(cell) else {
            return false;
        };

        let [up, down, left, right] = Direction::ALL.map(|d| self.count(cell, kind, d));
        let needed = MIN_RUN - 1;

        up >= needed
            || down >= needed
            || left >= needed
            || right >= needed
            || up + down >= needed
            || left + right >= needed
    }
}

/// Whether exchanging the pieces at `a` and `b` would line up a run of at least three.
///
/// The grid is only ever read; the swap is evaluated through a view, so probing leaves every
/// piece where it was. Non-adjacent, out-of-range or empty cells never produce a match.
pub fn can_swap_produce_match(grid: &Grid, a: Cell, b: Cell) -> bool {
    if !a.is_adjacent(b) || !grid.is_occupied(a) || !grid.is_occupied(b) {
        return false;
    }

    let view = Swapped { grid, a, b };
    view.completes_run(a) || view.completes_run(b)
}

/// First adjacent pair, scanning column by column, whose swap would produce a match.
pub fn find_hint(grid: &Grid) -> Option<(Cell, Cell)> {
    grid.cells()
        .flat_map(|cell| {
            [Direction::Right, Direction::Down]
                .into_iter()
                .filter_map(move |direction| cell.neighbor(direction).map(|other| (cell, other)))
        })
        .find(|&(a, b)| can_swap_produce_match(grid, a, b))
}

/// `false` means the board is deadlocked: no single swap anywhere clears anything.
pub fn any_matches_possible(grid: &Grid) -> bool {
    find_hint(grid).is_some()
}
