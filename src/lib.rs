pub mod board;
pub mod engine;
pub mod pawn_hash;
pub mod sync;
pub mod timer;
pub mod tt;
pub mod uci;
pub mod zobrist;

pub use board::{Color, Move, Piece, Position, Square};
pub use engine::{Engine, EngineError, SearchEvent, SearchRequest};
pub use tt::TranspositionTable;
