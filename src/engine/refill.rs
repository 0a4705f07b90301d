use std::time::Duration;

use rand::Rng;

use super::{Board, BoardError, BoardEvent};
use crate::{
    board::{Cell, Grid, any_matches_possible, find_all_matches},
    piece::{MoveKind, Vec2},
};

/// Fresh deals tried before giving up on finding a playable board.
const MAX_DEAL_ATTEMPTS: u32 = 100;
/// Replacement rounds spent breaking up matches within one deal.
const MAX_REPLACEMENT_ROUNDS: u32 = 1000;

impl<R: Rng> Board<R> {
    /// Fills the whole grid in place, without animation.
    ///
    /// Matches left by the random fill are broken up by regenerating one random piece of each
    /// offending group until none remain. A result without any legal move is thrown away and
    /// dealt again.
    pub(super) fn deal(&mut self) -> Result<(), BoardError> {
        for attempt in 1..=MAX_DEAL_ATTEMPTS {
            self.grid = Grid::new(self.config.columns, self.config.rows);

            for cell in self.grid.cells() {
                let position = self.layout.cell_position(cell);
                let piece = self.factory.generate(&mut self.rng, cell, position);
                self.grid.put(piece);
            }

            if !self.break_up_matches() {
                log::debug!("Deal #{attempt} kept matching, dealing again");
                continue;
            }

            if any_matches_possible(&self.grid) {
                log::info!("Dealt board after {attempt} attempt(s):\n{}", self.grid);
                return Ok(());
            }

            log::debug!("Deal #{attempt} has no legal move, dealing again");
        }

        Err(BoardError::DealFailed {
            attempts: MAX_DEAL_ATTEMPTS,
        })
    }

    /// Returns `false` if matches survived every replacement round.
    fn break_up_matches(&mut self) -> bool {
        for _ in 0..MAX_REPLACEMENT_ROUNDS {
            let groups = find_all_matches(&self.grid);
            if groups.is_empty() {
                return true;
            }

            for group in groups {
                let pick = self.rng.random_range(0..group.len());
                let Some(&cell) = group.cells().iter().nth(pick) else {
                    continue;
                };

                let position = self.layout.cell_position(cell);
                let piece = self.factory.generate(&mut self.rng, cell, position);
                self.grid.put(piece);
            }
        }

        false
    }

    pub(super) fn reshuffle(&mut self) -> Result<(), BoardError> {
        self.clear_selection();
        self.deal()?;
        self.events.push(BoardEvent::Reshuffled);
        Ok(())
    }

    /// Lets every column collapse onto its lowest pieces and tops it up with new ones.
    ///
    /// New pieces start stacked above the column's insert position, each one a tile higher than
    /// the one below, so they fall in as a column instead of on top of each other. Every piece
    /// that isn't on its tile afterwards is sent falling toward it.
    pub(super) fn refill(&mut self) {
        let step = self.layout.step().y;

        for column in 0..self.grid.columns() {
            let mut free = self.grid.rows();

            for row in (0..self.grid.rows()).rev() {
                let Some(mut piece) = self.grid.take(Cell::new(column, row)) else {
                    continue;
                };

                free -= 1;
                piece.set_cell(Cell::new(column, free));
                self.grid.put(piece);
            }

            for row in 0..free {
                let shift = (free - 1 - row) as f32;
                let start = self.layout.insert_position(column) - Vec2::new(0.0, step * shift);
                let piece = self
                    .factory
                    .generate(&mut self.rng, Cell::new(column, row), start);

                log::trace!("Spawned {:?} {} at {}", piece.kind(), piece.id(), piece.cell());
                self.grid.put(piece);
            }
        }

        let falling: Vec<Cell> = self
            .grid
            .pieces()
            .filter(|piece| {
                !piece
                    .screen_position()
                    .approx_eq(self.layout.cell_position(piece.cell()))
            })
            .map(|piece| piece.cell())
            .collect();

        for cell in falling {
            let delay = self.fall_delay();
            self.move_piece(cell, MoveKind::Fall { delay });
        }
    }

    fn fall_delay(&mut self) -> Duration {
        let stagger = self.config.fall_stagger.as_secs_f32();
        if stagger <= 0.0 {
            return Duration::ZERO;
        }

        Duration::from_secs_f32(self.rng.random_range(0.0..stagger))
    }
}
