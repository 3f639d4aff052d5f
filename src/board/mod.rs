//! Chess board representation, move generation, evaluation and search.
//!
//! Uses bitboards with magic slider lookups. `Position` keeps check and pin
//! masks up to date on every move so generation is strictly legal.
//!
//! # Example
//! ```
//! use chess_core::board::Position;
//!
//! let mut pos = Position::new();
//! assert_eq!(pos.legal_moves().len(), 20);
//! assert_eq!(pos.perft(3), 8902);
//! ```

mod attack_tables;
mod error;
pub mod eval;
mod fen;
mod make_unmake;
mod movegen;
mod pst;
pub mod search;
mod see;
mod state;
mod types;

#[cfg(test)]
mod tests;

pub use attack_tables::init as init_attack_tables;
pub use error::{FenError, MoveParseError, SquareError};
pub use fen::START_FEN;
pub use movegen::{piece_attacks, GenMode};
pub use search::{MATE_BOUND, MATE_SCORE};
pub use state::Position;
pub use types::{
    Bitboard, BitboardIter, CastlingRights, Color, Move, MoveKind, MoveList, MoveListIntoIter,
    Piece, Square, MAX_PLY, MOVE_BITS,
};
