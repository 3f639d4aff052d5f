//! Evaluation terms. Each returns `(middlegame, endgame)` from white's perspective.

use crate::board::attack_tables::{king_attacks, pawn_attacks};
use crate::board::movegen::piece_attacks;
use crate::board::pst::{MATERIAL_EG, MATERIAL_MG};
use crate::board::types::{Bitboard, Color, Piece};
use crate::board::Position;

use super::masks::{front_span, passed_pawn_mask, rear_span, ADJACENT_FILES, PAWN_SHIELD_MASK};
use super::tables::{
    ATTACK_WEIGHTS, BACKWARD_PAWN, BISHOP_MOB_EG, BISHOP_MOB_MG, CONNECTED_EG, CONNECTED_MG,
    DOUBLED_PAWN, ISOLATED_OPEN, ISOLATED_PAWN, KING_OPEN_FILE, KING_SEMI_OPEN_FILE,
    KING_SHIELD_BONUS, KNIGHT_MOB_EG, KNIGHT_MOB_MG, MAX_KING_DANGER, PASSED_PAWN_EG,
    PASSED_PAWN_MG, QUEEN_MOB_EG, QUEEN_MOB_MG, ROOK_MOB_EG, ROOK_MOB_MG,
};

/// Squares attacked by the pawns of `color`.
#[inline]
pub(crate) fn pawn_attack_span(pawns: Bitboard, color: Color) -> Bitboard {
    let advanced = match color {
        Color::White => pawns.shift_north(),
        Color::Black => pawns.shift_south(),
    };
    advanced.shift_east() | advanced.shift_west()
}

impl Position {
    /// Raw material count.
    #[must_use]
    pub fn eval_material(&self) -> (i32, i32) {
        let mut mg = 0;
        let mut eg = 0;
        for color in Color::BOTH {
            for piece in Piece::ALL {
                let count = self.pieces(color, piece).popcount() as i32;
                mg += color.sign() * count * MATERIAL_MG[piece.index()];
                eg += color.sign() * count * MATERIAL_EG[piece.index()];
            }
        }
        (mg, eg)
    }

    /// Safe squares reachable by knights, bishops, rooks and queens.
    #[must_use]
    pub fn eval_mobility(&self) -> (i32, i32) {
        let mut mg = 0;
        let mut eg = 0;

        for color in Color::BOTH {
            let sign = color.sign();
            let them = color.opponent();
            let enemy_pawn_attacks = pawn_attack_span(self.pieces(them, Piece::Pawn), them);
            let available = !self.occupied_by(color) & !enemy_pawn_attacks;

            for piece in [Piece::Knight, Piece::Bishop, Piece::Rook, Piece::Queen] {
                let (table_mg, table_eg): (&[i32], &[i32]) = match piece {
                    Piece::Knight => (&KNIGHT_MOB_MG, &KNIGHT_MOB_EG),
                    Piece::Bishop => (&BISHOP_MOB_MG, &BISHOP_MOB_EG),
                    Piece::Rook => (&ROOK_MOB_MG, &ROOK_MOB_EG),
                    _ => (&QUEEN_MOB_MG, &QUEEN_MOB_EG),
                };
                for sq in self.pieces(color, piece).iter() {
                    let reach = piece_attacks(piece, color, sq, self.occupied()) & available;
                    let count = (reach.popcount() as usize).min(table_mg.len() - 1);
                    mg += sign * table_mg[count];
                    eg += sign * table_eg[count];
                }
            }
        }

        (mg, eg)
    }

    /// Doubled, isolated, backward, connected and passed pawns.
    ///
    /// Depends only on pawn placement, so callers cache it under the pawn key.
    #[must_use]
    pub fn eval_pawn_structure(&self) -> (i32, i32) {
        let mut mg = 0;
        let mut eg = 0;

        for color in Color::BOTH {
            let sign = color.sign();
            let own = self.pieces(color, Piece::Pawn);
            let enemy = self.pieces(color.opponent(), Piece::Pawn);

            for sq in own.iter() {
                let bit = Bitboard::from_square(sq);
                let rel_rank = sq.relative_rank(color) as usize;
                let ahead = front_span(bit, color);
                let neighbours = bit.shift_east() | bit.shift_west();

                if (ahead & own).is_nonempty() {
                    mg += sign * DOUBLED_PAWN.0;
                    eg += sign * DOUBLED_PAWN.1;
                }

                let defended = (pawn_attacks(color.opponent(), sq) & own).is_nonempty();
                let phalanx = (neighbours & own).is_nonempty();
                if defended || phalanx {
                    mg += sign * CONNECTED_MG[rel_rank];
                    eg += sign * CONNECTED_EG[rel_rank];
                } else if (ADJACENT_FILES[sq.file() as usize] & own).is_empty() {
                    mg += sign * ISOLATED_PAWN.0;
                    eg += sign * ISOLATED_PAWN.1;
                    if (ahead & enemy).is_empty() {
                        mg += sign * ISOLATED_OPEN.0;
                        eg += sign * ISOLATED_OPEN.1;
                    }
                } else if (rear_span(neighbours, color) & own).is_empty() {
                    // every neighbour has already advanced past it
                    mg += sign * BACKWARD_PAWN.0;
                    eg += sign * BACKWARD_PAWN.1;
                }

                if (passed_pawn_mask(bit, color) & enemy).is_empty() {
                    mg += sign * PASSED_PAWN_MG[rel_rank];
                    eg += sign * PASSED_PAWN_EG[rel_rank];
                }
            }
        }

        (mg, eg)
    }

    /// Pawn shield, open files near the king and pieces bearing on the king zone.
    #[must_use]
    pub fn eval_king_safety(&self) -> (i32, i32) {
        let mut mg = 0;

        for color in Color::BOTH {
            let sign = color.sign();
            let them = color.opponent();
            let king = self.king_square(color);
            let file = king.file() as usize;
            let own_pawns = self.pieces(color, Piece::Pawn);
            let enemy_pawns = self.pieces(them, Piece::Pawn);

            if king.relative_rank(color) <= 1 {
                let shield = PAWN_SHIELD_MASK[color.index()][file] & own_pawns;
                mg += sign * KING_SHIELD_BONUS * shield.popcount() as i32;
            }

            for f in file.saturating_sub(1)..=(file + 1).min(7) {
                let mask = Bitboard::file_mask(f as u8);
                if (mask & own_pawns).is_empty() {
                    mg += sign
                        * if (mask & enemy_pawns).is_empty() {
                            KING_OPEN_FILE
                        } else {
                            KING_SEMI_OPEN_FILE
                        };
                }
            }

            let zone = king_attacks(king) | Bitboard::from_square(king);
            let mut units = 0;
            for piece in [Piece::Knight, Piece::Bishop, Piece::Rook, Piece::Queen] {
                for sq in self.pieces(them, piece).iter() {
                    let hits = piece_attacks(piece, them, sq, self.occupied()) & zone;
                    units += ATTACK_WEIGHTS[piece.index()] * hits.popcount() as i32;
                }
            }
            mg -= sign * (units * units * 2).min(MAX_KING_DANGER);
        }

        (mg, 0)
    }
}
