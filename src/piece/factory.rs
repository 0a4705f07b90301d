use rand::Rng;

use super::{Piece, PieceId, PieceType, Vec2};
use crate::board::Cell;

/// Hands out randomly typed pieces with fresh ids. The caller places them on the grid.
#[derive(Debug, Clone)]
pub struct PieceFactory {
    next_id: u32,
    kinds: usize,
}

impl PieceFactory {
    /// `kinds` limits generation to the first `kinds` entries of [`PieceType::VARIANTS`].
    pub fn new(kinds: usize) -> Self {
        Self {
            next_id: 0,
            kinds: kinds.clamp(1, PieceType::VARIANTS.len()),
        }
    }

    pub fn kinds(&self) -> &'static [PieceType] {
        &PieceType::VARIANTS[..self.kinds]
    }

    pub fn random_kind<R: Rng + ?Sized>(&self, rng: &mut R) -> PieceType {
        PieceType::VARIANTS[rng.random_range(0..self.kinds)]
    }

    pub fn generate<R: Rng + ?Sized>(&mut self, rng: &mut R, cell: Cell, screen: Vec2) -> Piece {
        let kind = self.random_kind(rng);
        self.build(kind, cell, screen)
    }

    /// Builds a piece of a fixed kind. Used for scripted boards.
    pub fn build(&mut self, kind: PieceType, cell: Cell, screen: Vec2) -> Piece {
        let id = PieceId(self.next_id);
        self.next_id += 1;
        Piece::new(id, kind, cell, screen)
    }

    /// Makes sure ids handed out from now on don't collide with `id`.
    pub(crate) fn reserve(&mut self, id: PieceId) {
        self.next_id = self.next_id.max(id.0 + 1);
    }
}
