//! Attack tables for move generation.
//!
//! Leaper attacks come from per-square tables. Sliding attacks use magic
//! bitboards: mask the occupancy to the relevant squares, multiply by the
//! square's magic and shift down to an index into its attack table.

mod magic;
mod slider_rays;
mod tables;

use once_cell::sync::Lazy;

use magic::MagicTable;
use slider_rays::{BISHOP_DIRS, ROOK_DIRS};
pub(crate) use tables::{BETWEEN, KING_ATTACKS, KNIGHT_ATTACKS, LINE, PAWN_ATTACKS};

use super::types::{Bitboard, Color, Square};

static BISHOP_TABLE: Lazy<MagicTable> = Lazy::new(|| MagicTable::build(&BISHOP_DIRS));
static ROOK_TABLE: Lazy<MagicTable> = Lazy::new(|| MagicTable::build(&ROOK_DIRS));

/// Force every table to be built now rather than on first use.
pub fn init() {
    Lazy::force(&BISHOP_TABLE);
    Lazy::force(&ROOK_TABLE);
    Lazy::force(&KNIGHT_ATTACKS);
    Lazy::force(&KING_ATTACKS);
    Lazy::force(&PAWN_ATTACKS);
    Lazy::force(&BETWEEN);
    Lazy::force(&LINE);
}

#[inline]
#[must_use]
pub fn bishop_attacks(sq: Square, occupancy: Bitboard) -> Bitboard {
    Bitboard(BISHOP_TABLE.attacks(sq.index(), occupancy.0))
}

#[inline]
#[must_use]
pub fn rook_attacks(sq: Square, occupancy: Bitboard) -> Bitboard {
    Bitboard(ROOK_TABLE.attacks(sq.index(), occupancy.0))
}

#[inline]
#[must_use]
pub fn queen_attacks(sq: Square, occupancy: Bitboard) -> Bitboard {
    bishop_attacks(sq, occupancy) | rook_attacks(sq, occupancy)
}

#[inline]
#[must_use]
pub fn knight_attacks(sq: Square) -> Bitboard {
    Bitboard(KNIGHT_ATTACKS[sq.index()])
}

#[inline]
#[must_use]
pub fn king_attacks(sq: Square) -> Bitboard {
    Bitboard(KING_ATTACKS[sq.index()])
}

#[inline]
#[must_use]
pub fn pawn_attacks(color: Color, sq: Square) -> Bitboard {
    Bitboard(PAWN_ATTACKS[color.index()][sq.index()])
}

/// Squares strictly between `a` and `b`; empty unless aligned.
#[inline]
#[must_use]
pub fn between(a: Square, b: Square) -> Bitboard {
    Bitboard(BETWEEN[a.index()][b.index()])
}

/// Whole line through `a` and `b`; empty unless aligned.
#[inline]
#[must_use]
pub fn line(a: Square, b: Square) -> Bitboard {
    Bitboard(LINE[a.index()][b.index()])
}
