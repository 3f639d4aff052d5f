//! Core chess types.
//!
//! - `Piece` and `Color`
//! - `Square` - board square index (a1=0)
//! - `Bitboard` - 64-bit square set
//! - `Move`, `MoveKind` and `MoveList` - packed moves
//! - `CastlingRights` - castling state

mod bitboard;
mod castling;
mod moves;
mod piece;
mod square;

pub use bitboard::{Bitboard, BitboardIter};
pub use castling::CastlingRights;
pub use moves::{Move, MoveKind, MoveList, MoveListIntoIter, MAX_PLY, MOVE_BITS};
pub use piece::{Color, Piece};
pub use square::Square;

pub(crate) use moves::{ScoredMoveList, EMPTY_MOVE};
pub(crate) use piece::PROMOTION_PIECES;
