pub mod battle;
pub mod board;
pub mod engine;
pub mod piece;

pub use battle::{Battle, Damage, Monster};
pub use board::{Cell, Direction, Grid};
pub use engine::{Board, BoardConfig, BoardError, BoardEvent, ClearEvent, SwapPolicy};
pub use piece::{Piece, PieceId, PieceType};
