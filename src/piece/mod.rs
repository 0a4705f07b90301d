use std::{fmt, time::Duration};

use thiserror::Error;

use crate::board::Cell;

pub mod factory;
pub mod motion;

pub use factory::PieceFactory;
pub use motion::{Easing, Motion, Vec2};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PieceType {
    Diamond,
    Square,
    Circle,
    Pentagon,
    Jewel,
    Star,
}

impl PieceType {
    pub const VARIANTS: [PieceType; 6] = [
        PieceType::Diamond,
        PieceType::Square,
        PieceType::Circle,
        PieceType::Pentagon,
        PieceType::Jewel,
        PieceType::Star,
    ];

    pub fn glyph(self) -> char {
        match self {
            PieceType::Diamond => 'D',
            PieceType::Square => 'S',
            PieceType::Circle => 'C',
            PieceType::Pentagon => 'P',
            PieceType::Jewel => 'J',
            PieceType::Star => 'R',
        }
    }

    pub fn from_glyph(glyph: char) -> Option<Self> {
        Self::VARIANTS
            .into_iter()
            .find(|kind| kind.glyph() == glyph.to_ascii_uppercase())
    }
}

impl fmt::Display for PieceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Identity of a live piece, unique for the lifetime of a board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PieceId(pub u32);

impl fmt::Display for PieceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum MoveState {
    #[default]
    Idle,
    Moving,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MoveKind {
    /// Player swap: fixed duration, no delay.
    Swap,
    /// Gravity drop, started after `delay` so that neighbours don't fall in lockstep.
    Fall { delay: Duration },
}

/// Completion token for one issued move. Resolves once, when the piece reaches its target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MoveHandle(pub PieceId);

#[derive(Debug, Error, PartialEq, Eq)]
#[error("piece {0} is already moving")]
pub struct PieceBusy(pub PieceId);

#[derive(Debug, Clone, PartialEq)]
pub struct Piece {
    id: PieceId,
    kind: PieceType,
    cell: Cell,
    pub value: u32,
    pub selected: bool,
    pub highlighted: bool,
    screen_position: Vec2,
    motion: Option<Motion>,
}

impl Piece {
    pub fn new(id: PieceId, kind: PieceType, cell: Cell, screen_position: Vec2) -> Self {
        Self {
            id,
            kind,
            cell,
            value: 1,
            selected: false,
            highlighted: false,
            screen_position,
            motion: None,
        }
    }

    pub fn id(&self) -> PieceId {
        self.id
    }

    pub fn kind(&self) -> PieceType {
        self.kind
    }

    /// Authoritative logical location.
    pub fn cell(&self) -> Cell {
        self.cell
    }

    pub(crate) fn set_cell(&mut self, cell: Cell) {
        self.cell = cell;
    }

    pub fn screen_position(&self) -> Vec2 {
        self.screen_position
    }

    pub(crate) fn set_screen_position(&mut self, position: Vec2) {
        self.screen_position = position;
    }

    /// Where the piece is headed, or where it rests when idle.
    pub fn target_position(&self) -> Vec2 {
        self.motion
            .as_ref()
            .map_or(self.screen_position, Motion::target)
    }

    pub fn move_state(&self) -> MoveState {
        match self.motion {
            Some(_) => MoveState::Moving,
            None => MoveState::Idle,
        }
    }

    pub fn is_moving(&self) -> bool {
        self.motion.is_some()
    }

    pub fn begin_move_to(
        &mut self,
        target: Vec2,
        kind: MoveKind,
        duration: Duration,
    ) -> Result<MoveHandle, PieceBusy> {
        if self.is_moving() {
            return Err(PieceBusy(self.id));
        }

        let (delay, easing) = match kind {
            MoveKind::Swap => (Duration::ZERO, Easing::CubicInOut),
            MoveKind::Fall { delay } => (delay, Easing::BounceOut),
        };

        log::trace!(
            "Piece {} moving {} -> {target} over {duration:?}",
            self.id,
            self.screen_position
        );

        self.motion = Some(Motion::new(
            self.screen_position,
            target,
            delay,
            duration,
            easing,
        ));

        Ok(MoveHandle(self.id))
    }

    /// Progresses the current move. Returns the completion handle exactly once, on the step
    /// that finishes the move.
    pub fn advance(&mut self, dt: Duration) -> Option<MoveHandle> {
        let motion = self.motion.as_mut()?;
        self.screen_position = motion.advance(dt);

        if !motion.is_finished() {
            return None;
        }

        self.screen_position = motion.target();
        self.motion = None;
        Some(MoveHandle(self.id))
    }
}
