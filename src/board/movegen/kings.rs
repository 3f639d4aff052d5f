use super::super::attack_tables::{between, king_attacks};
use super::super::types::{Bitboard, MoveKind, MoveList, Piece, Square};
use super::super::Position;
use super::GenMode;

impl Position {
    pub(super) fn gen_king_moves(&self, mode: GenMode, list: &mut MoveList) {
        let us = self.side;
        let them = us.opponent();
        let from = self.king_sq[us.index()];
        // the king must not shelter behind itself from a slider
        let occ = self.all_occupied ^ Bitboard::from_square(from);

        let mut targets = king_attacks(from) & !self.occupied[us.index()];
        if mode == GenMode::Attacks {
            targets &= self.occupied[them.index()];
        }
        for to in targets.iter() {
            if !self.is_square_attacked(to, them, occ) {
                list.push(self.make_move_record(from, to, Piece::King, MoveKind::Normal));
            }
        }

        if mode == GenMode::Moves && self.checkers.is_empty() {
            self.gen_castling(from, list);
        }
    }

    fn gen_castling(&self, king: Square, list: &mut MoveList) {
        let us = self.side;
        let them = us.opponent();
        let rank = us.back_rank();
        let Some(home) = Square::new(rank, 4) else {
            return;
        };
        if king != home {
            return;
        }
        let rooks = self.pieces(us, Piece::Rook);

        for (kingside, rook_file, king_file, via_file) in [(true, 7, 6, 5), (false, 0, 2, 3)] {
            if !self.castling.has(us, kingside) {
                continue;
            }
            let (Some(rook_sq), Some(to), Some(via)) = (
                Square::new(rank, rook_file),
                Square::new(rank, king_file),
                Square::new(rank, via_file),
            ) else {
                continue;
            };
            if !rooks.contains(rook_sq) || (between(king, rook_sq) & self.all_occupied).is_nonempty() {
                continue;
            }
            if self.is_square_attacked(via, them, self.all_occupied)
                || self.is_square_attacked(to, them, self.all_occupied)
            {
                continue;
            }
            list.push(self.make_move_record(king, to, Piece::King, MoveKind::Castle));
        }
    }
}
