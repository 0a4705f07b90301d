use std::collections::BTreeSet;

use super::{Cell, Direction, Grid};
use crate::piece::PieceType;

/// Shortest straight run that clears.
pub const MIN_RUN: usize = 3;

/// One clear unit: every straight run of one kind that overlaps another, merged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchGroup {
    kind: PieceType,
    cells: BTreeSet<Cell>,
}

impl MatchGroup {
    pub fn kind(&self) -> PieceType {
        self.kind
    }

    pub fn cells(&self) -> &BTreeSet<Cell> {
        &self.cells
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn contains(&self, cell: Cell) -> bool {
        self.cells.contains(&cell)
    }

    fn overlaps(&self, other: &MatchGroup) -> bool {
        !self.cells.is_disjoint(&other.cells)
    }
}

/// Finds every clearable group on the board.
///
/// Horizontal and vertical runs of at least [`MIN_RUN`] are collected independently and then
/// folded together wherever they share a cell, so no cell shows up in two groups. The order of
/// the returned groups carries no meaning.
pub fn find_all_matches(grid: &Grid) -> Vec<MatchGroup> {
    let mut runs = Vec::new();

    for cell in grid.cells() {
        let Some(kind) = grid.kind_at(cell) else {
            continue;
        };

        if cell.column + 2 < grid.columns() {
            runs.extend(run_from(grid, cell, kind, Direction::Right));
        }

        if cell.row + 2 < grid.rows() {
            runs.extend(run_from(grid, cell, kind, Direction::Down));
        }
    }

    log::trace!("Found {} candidate runs", runs.len());
    merge_overlapping(runs)
}

/// Collects the run starting at `origin` heading `direction`, if `origin` really starts one and
/// the run is long enough.
fn run_from(grid: &Grid, origin: Cell, kind: PieceType, direction: Direction) -> Option<MatchGroup> {
    let continues_previous = origin
        .neighbor(direction.opposite())
        .is_some_and(|previous| grid.kind_at(previous) == Some(kind));

    if continues_previous {
        return None;
    }

    let cells: BTreeSet<Cell> = std::iter::successors(Some(origin), |cell| {
        cell.neighbor(direction)
            .filter(|next| grid.kind_at(*next) == Some(kind))
    })
    .collect();

    (cells.len() >= MIN_RUN).then_some(MatchGroup { kind, cells })
}

fn merge_overlapping(runs: Vec<MatchGroup>) -> Vec<MatchGroup> {
    let mut groups: Vec<MatchGroup> = Vec::with_capacity(runs.len());

    for mut run in runs {
        let (overlapping, disjoint): (Vec<_>, Vec<_>) =
            groups.into_iter().partition(|group| group.overlaps(&run));

        for group in overlapping {
            debug_assert_eq!(group.kind, run.kind);
            run.cells.extend(group.cells);
        }

        groups = disjoint;
        groups.push(run);
    }

    groups
}

#[cfg(test)]
mod test {
    use itertools::Itertools as _;

    use super::*;
    use crate::board::test_utils::grid_from_rows;

    fn memberships(groups: &[MatchGroup]) -> BTreeSet<BTreeSet<Cell>> {
        groups.iter().map(|group| group.cells().clone()).collect()
    }

    fn cells(coords: &[(usize, usize)]) -> BTreeSet<Cell> {
        coords.iter().map(|&(c, r)| Cell::new(c, r)).collect()
    }

    #[test]
    fn test_no_matches() {
        let grid = grid_from_rows(&["DSCP", "SDPC", "CPDS", "PCSD"]);
        assert!(find_all_matches(&grid).is_empty());
    }

    #[test]
    fn test_overlapping_runs_merge() {
        // Horizontal run of 4 on row 1 crossed by a vertical run of 3 on column 2.
        let grid = grid_from_rows(&[
            "SCDSCS", //
            "DDDDSC", //
            "CSDCPS", //
            "SCSPCP", //
        ]);

        let groups = find_all_matches(&grid);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].kind(), PieceType::Diamond);
        assert_eq!(groups[0].len(), 6);
        assert_eq!(
            groups[0].cells(),
            &cells(&[(0, 1), (1, 1), (2, 1), (3, 1), (2, 0), (2, 2)])
        );
    }

    #[test]
    fn test_separate_groups() {
        let grid = grid_from_rows(&[
            "JJJSC", //
            "SCDSC", //
            "CSDCS", //
            "SCDSC", //
        ]);

        let groups = find_all_matches(&grid);
        assert_eq!(
            memberships(&groups),
            BTreeSet::from([
                cells(&[(0, 0), (1, 0), (2, 0)]),
                cells(&[(2, 1), (2, 2), (2, 3)]),
            ])
        );
    }

    #[test]
    fn test_runs_touching_far_edges() {
        let grid = grid_from_rows(&[
            "SCSRRR", //
            "CSCSCP", //
            "SCSCSP", //
            "CSCSCP", //
        ]);

        let groups = find_all_matches(&grid);
        assert_eq!(
            memberships(&groups),
            BTreeSet::from([
                cells(&[(3, 0), (4, 0), (5, 0)]),
                cells(&[(5, 1), (5, 2), (5, 3)]),
            ])
        );
    }

    #[test]
    fn test_long_run_is_single_group() {
        let grid = grid_from_rows(&["PPPPPP", "SCSCSC", "CSCSCS"]);

        let groups = find_all_matches(&grid);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].len(), 6);
    }

    #[test]
    fn test_chain_of_overlaps_merges_transitively() {
        // Two horizontal runs bridged by one vertical run.
        let grid = grid_from_rows(&[
            "JJJSC", //
            "SCJCS", //
            "CSJJJ", //
            "SCSCS", //
        ]);

        let groups = find_all_matches(&grid);
        assert_eq!(groups.len(), 1);
        assert_eq!(
            groups[0].cells(),
            &cells(&[(0, 0), (1, 0), (2, 0), (2, 1), (2, 2), (3, 2), (4, 2)])
        );
    }

    #[test]
    fn test_empty_cells_break_runs() {
        let grid = grid_from_rows(&["DD.DD", "SCSCS", "D.DDD"]);

        let groups = find_all_matches(&grid);
        assert_eq!(memberships(&groups), BTreeSet::from([cells(&[(2, 2), (3, 2), (4, 2)])]));
    }

    #[test]
    fn test_column_example() {
        // Checkerboard of two kinds with three diamonds stacked in the first column.
        let mut rows = (0..6)
            .map(|row| {
                (0..6)
                    .map(|column| if (column + row) % 2 == 0 { 'S' } else { 'C' })
                    .collect::<String>()
            })
            .collect_vec();

        for row in rows.iter_mut().take(3) {
            row.replace_range(0..1, "D");
        }

        let rows = rows.iter().map(String::as_str).collect_vec();
        let groups = find_all_matches(&grid_from_rows(&rows));

        assert_eq!(memberships(&groups), BTreeSet::from([cells(&[(0, 0), (0, 1), (0, 2)])]));
    }

    #[test]
    fn test_groups_are_disjoint() {
        let grid = grid_from_rows(&[
            "RRRCR", //
            "RSCCR", //
            "RCCSR", //
            "SRRRS", //
        ]);

        let groups = find_all_matches(&grid);
        for (a, b) in groups.iter().tuple_combinations() {
            assert!(!a.overlaps(b), "{a:?} overlaps {b:?}");
        }

        // Top row and left column share a corner; the right column and bottom row stand alone.
        let mut sizes = groups.iter().map(MatchGroup::len).collect_vec();
        sizes.sort();
        assert_eq!(sizes, [3, 3, 5]);
    }
}
