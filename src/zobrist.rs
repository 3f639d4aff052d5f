//! Zobrist hashing for chess positions.
//!
//! Two keys are maintained per position: the full key used by the
//! transposition table, and a pawn key (pawns, king squares and per-side
//! endgame flags) used by the pawn-structure cache.

use once_cell::sync::Lazy;

use rand::prelude::*;

use crate::board::{Color, Piece, Square};

/// Index of the "no en passant" key.
pub(crate) const NO_EP_INDEX: usize = 64;

pub(crate) struct ZobristKeys {
    /// `piece_keys[color][piece][square]`
    pub(crate) piece_keys: [[[u64; 64]; 6]; 2],
    pub(crate) white_to_move_key: u64,
    /// One key per castling-rights bitmask.
    pub(crate) castling_keys: [u64; 16],
    /// One key per en-passant square, plus `NO_EP_INDEX`.
    pub(crate) en_passant_keys: [u64; 65],
    /// Pawn-key flag per side, set while that side has no pieces besides pawns and king.
    pub(crate) endgame_keys: [u64; 2],
}

impl ZobristKeys {
    fn new() -> Self {
        let mut rng = StdRng::seed_from_u64(1234567890_u64);
        let mut piece_keys = [[[0; 64]; 6]; 2];
        let mut castling_keys = [0; 16];
        let mut en_passant_keys = [0; 65];
        let mut endgame_keys = [0; 2];

        for color in &mut piece_keys {
            for piece in color.iter_mut() {
                for key in piece.iter_mut() {
                    *key = rng.gen();
                }
            }
        }
        let white_to_move_key = rng.gen();
        for key in &mut castling_keys {
            *key = rng.gen();
        }
        for key in &mut en_passant_keys {
            *key = rng.gen();
        }
        for key in &mut endgame_keys {
            *key = rng.gen();
        }

        ZobristKeys {
            piece_keys,
            white_to_move_key,
            castling_keys,
            en_passant_keys,
            endgame_keys,
        }
    }

    #[inline]
    pub(crate) fn piece(&self, color: Color, piece: Piece, sq: Square) -> u64 {
        self.piece_keys[color.index()][piece.index()][sq.index()]
    }

    #[inline]
    pub(crate) fn en_passant(&self, ep: Option<Square>) -> u64 {
        self.en_passant_keys[ep.map_or(NO_EP_INDEX, Square::index)]
    }
}

pub(crate) static ZOBRIST: Lazy<ZobristKeys> = Lazy::new(ZobristKeys::new);
