//! Castling rights type.

use std::fmt;

use super::piece::Color;

pub(crate) const CASTLE_WHITE_K: u8 = 1 << 0;
pub(crate) const CASTLE_WHITE_Q: u8 = 1 << 1;
pub(crate) const CASTLE_BLACK_K: u8 = 1 << 2;
pub(crate) const CASTLE_BLACK_Q: u8 = 1 << 3;

pub(crate) const ALL_CASTLING_RIGHTS: u8 =
    CASTLE_WHITE_K | CASTLE_WHITE_Q | CASTLE_BLACK_K | CASTLE_BLACK_Q;

/// Rights that survive a move touching each square. A move from or to a
/// king or rook home square clears the matching bits.
pub(crate) const CASTLING_MASK: [u8; 64] = {
    let mut table = [ALL_CASTLING_RIGHTS; 64];
    table[0] = !CASTLE_WHITE_Q & ALL_CASTLING_RIGHTS;
    table[4] = !(CASTLE_WHITE_K | CASTLE_WHITE_Q) & ALL_CASTLING_RIGHTS;
    table[7] = !CASTLE_WHITE_K & ALL_CASTLING_RIGHTS;
    table[56] = !CASTLE_BLACK_Q & ALL_CASTLING_RIGHTS;
    table[60] = !(CASTLE_BLACK_K | CASTLE_BLACK_Q) & ALL_CASTLING_RIGHTS;
    table[63] = !CASTLE_BLACK_K & ALL_CASTLING_RIGHTS;
    table
};

/// Castling rights represented as a 4-bit mask
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub struct CastlingRights(u8);

impl CastlingRights {
    #[must_use]
    pub const fn none() -> Self {
        CastlingRights(0)
    }

    #[must_use]
    pub const fn all() -> Self {
        CastlingRights(ALL_CASTLING_RIGHTS)
    }

    #[inline]
    #[must_use]
    pub const fn has(self, color: Color, kingside: bool) -> bool {
        self.0 & Self::bit_for(color, kingside) != 0
    }

    #[inline]
    pub fn set(&mut self, color: Color, kingside: bool) {
        self.0 |= Self::bit_for(color, kingside);
    }

    /// Apply the rights mask for a move between `from` and `to`.
    #[inline]
    #[must_use]
    pub(crate) const fn after_move(self, from: usize, to: usize) -> Self {
        CastlingRights(self.0 & CASTLING_MASK[from] & CASTLING_MASK[to])
    }

    /// Raw bitmask value (Zobrist index)
    #[inline]
    #[must_use]
    pub const fn as_u8(self) -> u8 {
        self.0
    }

    #[inline]
    #[must_use]
    pub const fn from_u8(value: u8) -> Self {
        CastlingRights(value & ALL_CASTLING_RIGHTS)
    }

    #[inline]
    const fn bit_for(color: Color, kingside: bool) -> u8 {
        match (color, kingside) {
            (Color::White, true) => CASTLE_WHITE_K,
            (Color::White, false) => CASTLE_WHITE_Q,
            (Color::Black, true) => CASTLE_BLACK_K,
            (Color::Black, false) => CASTLE_BLACK_Q,
        }
    }
}

impl fmt::Display for CastlingRights {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0 == 0 {
            return f.write_str("-");
        }
        for (bit, c) in [
            (CASTLE_WHITE_K, 'K'),
            (CASTLE_WHITE_Q, 'Q'),
            (CASTLE_BLACK_K, 'k'),
            (CASTLE_BLACK_Q, 'q'),
        ] {
            if self.0 & bit != 0 {
                write!(f, "{c}")?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rook_and_king_moves_clear_rights() {
        let rights = CastlingRights::all();
        let after_rook = rights.after_move(7, 15);
        assert!(!after_rook.has(Color::White, true));
        assert!(after_rook.has(Color::White, false));

        let after_king = rights.after_move(60, 52);
        assert!(!after_king.has(Color::Black, true));
        assert!(!after_king.has(Color::Black, false));
        assert!(after_king.has(Color::White, true));

        // capturing a rook on its home square
        let after_capture = rights.after_move(20, 56);
        assert!(!after_capture.has(Color::Black, false));
    }

    #[test]
    fn display_matches_fen_field() {
        assert_eq!(CastlingRights::all().to_string(), "KQkq");
        assert_eq!(CastlingRights::none().to_string(), "-");
        assert_eq!(CastlingRights::from_u8(CASTLE_BLACK_K).to_string(), "k");
    }
}
