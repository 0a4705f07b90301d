use std::time::Duration;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use thiserror::Error;

use crate::{
    board::{Cell, Grid, GridLayout, MatchGroup, any_matches_possible, find_all_matches, find_hint},
    piece::{MoveKind, Piece, PieceFactory, PieceId, PieceType, Vec2},
};

pub mod config;
mod refill;
pub mod tracker;

pub use config::{BoardConfig, ConfigError, SwapPolicy};
pub use tracker::MovementTracker;

/// Reproducible random source used when none is injected.
pub type BoardRng = ChaCha8Rng;

#[derive(Debug, Error, PartialEq)]
pub enum BoardError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("could not deal a playable board without matches in {attempts} attempts")]
    DealFailed { attempts: u32 },

    #[error("board did not settle within {steps} steps")]
    Stalled { steps: u32 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// Waiting for a player swap to finish animating.
    Swap { a: Cell, b: Cell },
    /// Waiting for a rejected swap to animate back.
    SwapBack,
    /// Waiting for cleared columns to refill.
    Cascade,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    AwaitingInput,
    Resolving(Resolution),
}

/// Read-only record of a piece removed by a clear.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClearedPiece {
    pub id: PieceId,
    pub kind: PieceType,
    pub value: u32,
    pub cell: Cell,
}

impl From<&Piece> for ClearedPiece {
    fn from(piece: &Piece) -> Self {
        Self {
            id: piece.id(),
            kind: piece.kind(),
            value: piece.value,
            cell: piece.cell(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClearEvent {
    /// 1 for the swap's own matches, counting up with each cascade pass.
    pub chain: u32,
    pub kind: PieceType,
    pub pieces: Vec<ClearedPiece>,
}

impl ClearEvent {
    pub fn total_value(&self) -> u32 {
        self.pieces.iter().map(|piece| piece.value).sum()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BoardEvent {
    Selected(Cell),
    Deselected,
    Swapped { a: Cell, b: Cell },
    SwappedBack { a: Cell, b: Cell },
    Cleared(ClearEvent),
    Settled,
    Deadlocked,
    Reshuffled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Selection {
    id: PieceId,
    cell: Cell,
}

/// The board engine. Owns the grid and every live piece, turns player input into swaps and
/// runs the clear/refill cascade as piece moves complete.
///
/// Time only moves forward through [`Board::update`]; everything else is synchronous.
#[derive(Debug)]
pub struct Board<R = BoardRng> {
    config: BoardConfig,
    layout: GridLayout,
    grid: Grid,
    factory: PieceFactory,
    rng: R,
    tracker: MovementTracker,
    phase: Phase,
    selected: Option<Selection>,
    chain: u32,
    events: Vec<BoardEvent>,
}

impl Board<BoardRng> {
    pub fn seeded(config: BoardConfig, seed: u64) -> Result<Self, BoardError> {
        Self::new(config, BoardRng::seed_from_u64(seed))
    }
}

impl<R: Rng> Board<R> {
    /// Deals a fresh board: full, free of matches and with at least one legal move.
    pub fn new(config: BoardConfig, rng: R) -> Result<Self, BoardError> {
        let mut board = Self::empty(config, rng)?;
        board.deal()?;
        Ok(board)
    }

    /// Takes over a prepared grid. Pieces are snapped onto their tiles; if the grid already holds
    /// matches they start clearing straight away.
    pub fn from_grid(config: BoardConfig, grid: Grid, rng: R) -> Result<Self, BoardError> {
        let mut board = Self::empty(config, rng)?;

        if (grid.columns(), grid.rows()) != (board.config.columns, board.config.rows) {
            return Err(ConfigError::GridMismatch {
                columns: grid.columns(),
                rows: grid.rows(),
                expected_columns: board.config.columns,
                expected_rows: board.config.rows,
            }
            .into());
        }

        board.grid = grid;
        for piece in board.grid.pieces_mut() {
            board.factory.reserve(piece.id());
            piece.set_screen_position(board.layout.cell_position(piece.cell()));
        }

        board.refill();
        board.phase = Phase::Resolving(Resolution::Cascade);
        if board.tracker.is_idle() {
            board.resolve()?;
        }

        Ok(board)
    }

    fn empty(config: BoardConfig, rng: R) -> Result<Self, BoardError> {
        config.validate()?;

        Ok(Self {
            layout: config.layout(),
            grid: Grid::new(config.columns, config.rows),
            factory: PieceFactory::new(config.piece_kinds),
            rng,
            tracker: MovementTracker::new(),
            phase: Phase::AwaitingInput,
            selected: None,
            chain: 0,
            events: Vec::new(),
            config,
        })
    }

    pub fn config(&self) -> &BoardConfig {
        &self.config
    }

    pub fn layout(&self) -> &GridLayout {
        &self.layout
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn piece_at(&self, cell: Cell) -> Option<&Piece> {
        self.grid.get(cell)
    }

    pub fn pieces(&self) -> impl Iterator<Item = &Piece> {
        self.grid.pieces()
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_settled(&self) -> bool {
        self.phase == Phase::AwaitingInput
    }

    pub fn moving_count(&self) -> usize {
        self.tracker.pending()
    }

    /// Cascade passes run since the last swap.
    pub fn chain(&self) -> u32 {
        self.chain
    }

    pub fn selected(&self) -> Option<Cell> {
        self.selected
            .filter(|selection| self.is_current(selection))
            .map(|selection| selection.cell)
    }

    pub fn hint(&self) -> Option<(Cell, Cell)> {
        find_hint(&self.grid)
    }

    /// Marks the pieces of the first legal swap as highlighted and returns their cells.
    pub fn highlight_hint(&mut self) -> Option<(Cell, Cell)> {
        let (a, b) = self.hint()?;
        for cell in [a, b] {
            if let Some(piece) = self.grid.get_mut(cell) {
                piece.highlighted = true;
            }
        }

        Some((a, b))
    }

    fn clear_highlights(&mut self) {
        for piece in self.grid.pieces_mut() {
            piece.highlighted = false;
        }
    }

    pub fn drain_events(&mut self) -> Vec<BoardEvent> {
        std::mem::take(&mut self.events)
    }

    /// A press-and-release on `cell`. The first touch selects a piece, touching it again
    /// deselects it, and touching an adjacent piece swaps the two. Anything else drops the
    /// selection, except while the selected piece has moved away: then the touch is ignored.
    pub fn touch(&mut self, cell: Cell) {
        if !self.is_settled() {
            log::trace!("Ignoring touch on {cell} while resolving");
            return;
        }

        let Some(id) = self.grid.get(cell).map(Piece::id) else {
            self.clear_selection();
            return;
        };

        let selected = self.selected;
        match selected {
            None => self.select(Selection { id, cell }),
            Some(selection) if !self.is_current(&selection) => {
                log::debug!(
                    "Ignoring touch on {cell}, {} has moved since selection",
                    selection.id
                );
            }
            Some(selection) if selection.id == id => self.clear_selection(),
            Some(selection) if selection.cell.is_adjacent(cell) => {
                self.clear_selection();
                self.start_swap(selection.cell, cell);
            }
            Some(_) => self.clear_selection(),
        }
    }

    /// Touch given in screen coordinates. Points between or outside the tiles miss.
    pub fn touch_point(&mut self, point: Vec2) {
        match self.layout.cell_at(point) {
            Some(cell) => self.touch(cell),
            None if self.is_settled() => self.clear_selection(),
            None => {}
        }
    }

    /// Swaps the pieces at `a` and `b` if the board is waiting for input and both cells hold
    /// adjacent pieces. Returns whether the swap started; invalid attempts change nothing.
    pub fn attempt_swap(&mut self, a: Cell, b: Cell) -> bool {
        let valid = self.is_settled()
            && a.is_adjacent(b)
            && self.grid.is_occupied(a)
            && self.grid.is_occupied(b);

        if !valid {
            log::trace!("Ignoring swap attempt {a} <-> {b}");
            return false;
        }

        self.clear_selection();
        self.start_swap(a, b);
        true
    }

    /// Advances every moving piece by `dt`. When the last outstanding move completes, the next
    /// resolution step runs.
    pub fn update(&mut self, dt: Duration) -> Result<(), BoardError> {
        if self.tracker.is_idle() {
            return Ok(());
        }

        let mut drained = false;
        for piece in self.grid.pieces_mut() {
            if let Some(handle) = piece.advance(dt) {
                drained |= self.tracker.complete(handle);
            }
        }

        if drained {
            self.on_moves_drained()?;
        }

        Ok(())
    }

    /// Calls [`Board::update`] with `step` until the board settles and returns the number of
    /// steps taken.
    pub fn run_until_settled(&mut self, step: Duration, max_steps: u32) -> Result<u32, BoardError> {
        for steps in 0..max_steps {
            if self.is_settled() {
                return Ok(steps);
            }

            self.update(step)?;
        }

        if self.is_settled() {
            Ok(max_steps)
        } else {
            Err(BoardError::Stalled { steps: max_steps })
        }
    }

    fn is_current(&self, selection: &Selection) -> bool {
        self.grid.get(selection.cell).map(Piece::id) == Some(selection.id)
    }

    fn select(&mut self, selection: Selection) {
        if let Some(piece) = self.grid.get_mut(selection.cell) {
            piece.selected = true;
        }

        self.selected = Some(selection);
        self.events.push(BoardEvent::Selected(selection.cell));
    }

    fn clear_selection(&mut self) {
        let Some(selection) = self.selected.take() else {
            return;
        };

        if let Some(piece) = self.grid.find_mut(selection.id) {
            piece.selected = false;
        }

        self.events.push(BoardEvent::Deselected);
    }

    fn start_swap(&mut self, a: Cell, b: Cell) {
        log::debug!("Swapping {a} <-> {b}");
        self.clear_highlights();

        self.grid.swap(a, b);
        self.move_piece(a, MoveKind::Swap);
        self.move_piece(b, MoveKind::Swap);

        self.chain = 0;
        self.phase = Phase::Resolving(Resolution::Swap { a, b });
        self.events.push(BoardEvent::Swapped { a, b });
    }

    /// Sends the piece at `cell` toward its tile.
    fn move_piece(&mut self, cell: Cell, kind: MoveKind) {
        let target = self.layout.cell_position(cell);
        let duration = match kind {
            MoveKind::Swap => self.config.move_duration,
            MoveKind::Fall { .. } => self.config.fall_duration,
        };

        let Some(piece) = self.grid.get_mut(cell) else {
            return;
        };

        match piece.begin_move_to(target, kind, duration) {
            Ok(handle) => self.tracker.track(handle),
            Err(err) => log::warn!("{err}"),
        }
    }

    fn on_moves_drained(&mut self) -> Result<(), BoardError> {
        match self.phase {
            Phase::Resolving(Resolution::Swap { a, b }) => {
                let produced_match = !find_all_matches(&self.grid).is_empty();

                if !produced_match && self.config.swap_policy == SwapPolicy::RequireMatch {
                    log::debug!("Swap {a} <-> {b} matched nothing, swapping back");

                    self.grid.swap(a, b);
                    self.move_piece(a, MoveKind::Swap);
                    self.move_piece(b, MoveKind::Swap);
                    self.phase = Phase::Resolving(Resolution::SwapBack);
                    self.events.push(BoardEvent::SwappedBack { a, b });
                    return Ok(());
                }

                self.resolve()
            }
            Phase::Resolving(Resolution::SwapBack) => self.settle(),
            Phase::Resolving(Resolution::Cascade) => self.resolve(),
            Phase::AwaitingInput => Ok(()),
        }
    }

    /// Runs clear passes until either pieces are in flight or nothing matches.
    fn resolve(&mut self) -> Result<(), BoardError> {
        loop {
            let groups = find_all_matches(&self.grid);
            if groups.is_empty() {
                return self.settle();
            }

            self.clear(groups);
            self.refill();
            self.phase = Phase::Resolving(Resolution::Cascade);

            if !self.tracker.is_idle() {
                return Ok(());
            }
        }
    }

    fn clear(&mut self, groups: Vec<MatchGroup>) {
        self.chain += 1;
        log::debug!("Chain {}: clearing {} groups", self.chain, groups.len());

        for group in groups {
            let pieces = group
                .cells()
                .iter()
                .filter_map(|&cell| self.grid.take(cell))
                .map(|piece| ClearedPiece::from(&piece))
                .collect();

            self.events.push(BoardEvent::Cleared(ClearEvent {
                chain: self.chain,
                kind: group.kind(),
                pieces,
            }));
        }
    }

    fn settle(&mut self) -> Result<(), BoardError> {
        debug_assert!(self.tracker.is_idle());
        debug_assert!(find_all_matches(&self.grid).is_empty());

        self.phase = Phase::AwaitingInput;
        self.events.push(BoardEvent::Settled);

        if any_matches_possible(&self.grid) {
            return Ok(());
        }

        log::info!("Board deadlocked:\n{}", self.grid);
        self.events.push(BoardEvent::Deadlocked);

        if self.config.reshuffle_on_deadlock {
            self.reshuffle()?;
        }

        Ok(())
    }
}
