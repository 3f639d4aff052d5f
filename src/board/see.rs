//! Static Exchange Evaluation (SEE).
//!
//! Evaluates capture sequences on a single square to determine
//! if a capture is winning, losing, or equal.

use super::attack_tables::{bishop_attacks, rook_attacks};
use super::types::{Bitboard, Color, Move, Piece, Square};
use super::Position;

/// Longest exchange sequence considered (32 pieces).
const MAX_EXCHANGES: usize = 32;

impl Position {
    /// Static Exchange Evaluation for a capture or promotion.
    ///
    /// Returns the material balance in centipawns after all exchanges on the
    /// target square, from the perspective of the side making `mv`.
    /// Promotions count the gain of the promoted piece over the pawn.
    #[must_use]
    pub fn see(&self, mv: Move) -> i32 {
        let (from, to) = (mv.from(), mv.to());
        let us = self.side;

        let mut occupancy = self.all_occupied;
        let mut gain = [0i32; MAX_EXCHANGES];
        gain[0] = mv.captured().map_or(0, Piece::value);

        // piece standing on `to` after the capture, and thus next in line to be taken
        let mut on_square = mv.piece();
        if let Some(promo) = mv.promotion() {
            gain[0] += promo.value() - Piece::Pawn.value();
            on_square = promo;
        }
        if mv.is_en_passant() {
            occupancy ^= Bitboard::from_square(Square::from_index(to.index() ^ 8));
        }

        let mut attackers = self.attackers_to(to, occupancy);
        let mut from_bb = Bitboard::from_square(from);
        let mut side = us.opponent();
        let mut depth = 0;

        loop {
            occupancy ^= from_bb;
            attackers &= occupancy;
            // x-rays behind the piece that just moved
            attackers |= ((bishop_attacks(to, occupancy) & self.diagonal_sliders())
                | (rook_attacks(to, occupancy) & self.straight_sliders()))
                & occupancy;

            let side_attackers = attackers & self.occupied[side.index()];
            if side_attackers.is_empty() || depth + 1 >= MAX_EXCHANGES {
                break;
            }

            let (lva, lva_bb) = self.least_valuable_attacker(side_attackers, side);
            // the king may only recapture when nothing defends the square
            if lva == Piece::King
                && (attackers & self.occupied[side.opponent().index()]).is_nonempty()
            {
                break;
            }

            depth += 1;
            gain[depth] = on_square.value() - gain[depth - 1];
            if (-gain[depth - 1]).max(gain[depth]) < 0 {
                break;
            }

            on_square = lva;
            from_bb = lva_bb;
            side = side.opponent();
        }

        // Minimax the gains back up
        while depth > 0 {
            depth -= 1;
            gain[depth] = -(-gain[depth]).max(gain[depth + 1]);
        }

        gain[0]
    }

    /// Quick SEE test: the exchange started by `mv` nets at least `threshold`.
    #[inline]
    #[must_use]
    pub fn see_ge(&self, mv: Move, threshold: i32) -> bool {
        self.see(mv) >= threshold
    }

    #[inline]
    fn diagonal_sliders(&self) -> Bitboard {
        let [w, b] = &self.pieces;
        w[Piece::Bishop.index()]
            | w[Piece::Queen.index()]
            | b[Piece::Bishop.index()]
            | b[Piece::Queen.index()]
    }

    #[inline]
    fn straight_sliders(&self) -> Bitboard {
        let [w, b] = &self.pieces;
        w[Piece::Rook.index()]
            | w[Piece::Queen.index()]
            | b[Piece::Rook.index()]
            | b[Piece::Queen.index()]
    }

    /// Cheapest piece of `color` among `attackers`, as a single-bit board.
    fn least_valuable_attacker(&self, attackers: Bitboard, color: Color) -> (Piece, Bitboard) {
        for piece in Piece::ALL {
            let candidates = attackers & self.pieces[color.index()][piece.index()];
            if candidates.is_nonempty() {
                return (piece, Bitboard::from_square(candidates.lsb()));
            }
        }
        debug_assert!(false, "no attacker of {color} in {attackers:?}");
        (Piece::King, Bitboard::EMPTY)
    }
}
