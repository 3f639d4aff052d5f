//! Pre-computed bitboard masks for evaluation.

use crate::board::types::{Bitboard, Color};

/// Files adjacent to each file (0-7)
/// e.g., `ADJACENT_FILES`[3] = files c and e for file d
pub(crate) const ADJACENT_FILES: [Bitboard; 8] = {
    let mut masks = [Bitboard(0); 8];
    let mut f = 0;
    while f < 8 {
        let mut adj = 0u64;
        if f > 0 {
            adj |= Bitboard::FILE_A.0 << (f - 1);
        }
        if f < 7 {
            adj |= Bitboard::FILE_A.0 << (f + 1);
        }
        masks[f] = Bitboard(adj);
        f += 1;
    }
    masks
};

/// Flood fill north.
#[inline]
pub(crate) const fn fill_north(mut bb: u64) -> u64 {
    bb |= bb << 8;
    bb |= bb << 16;
    bb |= bb << 32;
    bb
}

/// Flood fill south.
#[inline]
pub(crate) const fn fill_south(mut bb: u64) -> u64 {
    bb |= bb >> 8;
    bb |= bb >> 16;
    bb |= bb >> 32;
    bb
}

/// Squares strictly in front of `bb` from `color`'s point of view.
#[inline]
pub(crate) fn front_span(bb: Bitboard, color: Color) -> Bitboard {
    match color {
        Color::White => Bitboard(fill_north(bb.0 << 8)),
        Color::Black => Bitboard(fill_south(bb.0 >> 8)),
    }
}

/// Squares strictly behind `bb` from `color`'s point of view.
#[inline]
pub(crate) fn rear_span(bb: Bitboard, color: Color) -> Bitboard {
    front_span(bb, color.opponent())
}

/// Enemy pawns on these squares stop a pawn of `color` on `sq` from being
/// passed: its own file and both adjacent files, ahead of it.
#[inline]
pub(crate) fn passed_pawn_mask(sq: Bitboard, color: Color) -> Bitboard {
    front_span(sq | sq.shift_east() | sq.shift_west(), color)
}

/// Squares in front of a king on `king_file` where shield pawns belong,
/// two ranks deep.
pub(crate) const PAWN_SHIELD_MASK: [[Bitboard; 8]; 2] = {
    let mut masks = [[Bitboard(0); 8]; 2];
    let mut f = 0;
    while f < 8 {
        let lo = if f > 0 { f - 1 } else { f };
        let hi = if f < 7 { f + 1 } else { f };
        let mut file = lo;
        while file <= hi {
            masks[0][f].0 |= (1u64 << (8 + file)) | (1u64 << (16 + file));
            masks[1][f].0 |= (1u64 << (48 + file)) | (1u64 << (40 + file));
            file += 1;
        }
        f += 1;
    }
    masks
};
