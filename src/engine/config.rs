use std::time::Duration;

use thiserror::Error;

use crate::{
    board::{GridLayout, Rect, matches::MIN_RUN},
    piece::PieceType,
};

/// What happens to a player swap that lines nothing up.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum SwapPolicy {
    /// Any adjacent swap stands, matching or not.
    #[default]
    Permissive,
    /// Swaps that produce no match are animated back.
    RequireMatch,
}

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("board must be at least {min}x{min}, got {columns}x{rows}")]
    BoardTooSmall {
        columns: usize,
        rows: usize,
        min: usize,
    },

    #[error("piece kinds must be between 2 and {max}, got {kinds}")]
    UnsupportedKinds { kinds: usize, max: usize },

    #[error("bounds {width}x{height} leave no room for tiles with spacing {spacing}")]
    BoundsTooSmall {
        width: f32,
        height: f32,
        spacing: f32,
    },

    #[error("grid is {columns}x{rows} but the configuration expects {expected_columns}x{expected_rows}")]
    GridMismatch {
        columns: usize,
        rows: usize,
        expected_columns: usize,
        expected_rows: usize,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct BoardConfig {
    pub columns: usize,
    pub rows: usize,
    /// Gap between tiles, in pixels.
    pub spacing: f32,
    /// Screen area the grid is laid out in.
    pub bounds: Rect,
    /// How many of the piece kinds are in play.
    pub piece_kinds: usize,
    pub move_duration: Duration,
    pub fall_duration: Duration,
    /// Upper bound of the random delay before each falling piece starts to move.
    pub fall_stagger: Duration,
    pub swap_policy: SwapPolicy,
    /// Deal a fresh board as soon as the settled one has no legal move left.
    pub reshuffle_on_deadlock: bool,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            columns: 6,
            rows: 6,
            spacing: 10.0,
            bounds: Rect::new(0.0, 0.0, 470.0, 470.0),
            piece_kinds: PieceType::VARIANTS.len(),
            move_duration: Duration::from_millis(400),
            fall_duration: Duration::from_millis(400),
            fall_stagger: Duration::from_millis(100),
            swap_policy: SwapPolicy::Permissive,
            reshuffle_on_deadlock: true,
        }
    }
}

impl BoardConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.columns < MIN_RUN || self.rows < MIN_RUN {
            return Err(ConfigError::BoardTooSmall {
                columns: self.columns,
                rows: self.rows,
                min: MIN_RUN,
            });
        }

        if !(2..=PieceType::VARIANTS.len()).contains(&self.piece_kinds) {
            return Err(ConfigError::UnsupportedKinds {
                kinds: self.piece_kinds,
                max: PieceType::VARIANTS.len(),
            });
        }

        let tile = self.layout().tile_size();
        let finite = self.spacing.is_finite() && tile.x.is_finite() && tile.y.is_finite();
        if !finite || self.spacing < 0.0 || tile.x <= 0.0 || tile.y <= 0.0 {
            return Err(ConfigError::BoundsTooSmall {
                width: self.bounds.width,
                height: self.bounds.height,
                spacing: self.spacing,
            });
        }

        Ok(())
    }

    pub fn layout(&self) -> GridLayout {
        GridLayout::new(self.bounds, self.columns, self.rows, self.spacing)
    }
}
