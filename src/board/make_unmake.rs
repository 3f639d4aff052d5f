use super::attack_tables::pawn_attacks;
use super::pst::{pst_square, MATERIAL_EG, MATERIAL_MG, PHASE_WEIGHTS, PST_EG, PST_MG};
use super::state::UndoInfo;
use super::types::{Color, Move, MoveKind, Piece, Square};
use super::Position;
use crate::zobrist::ZOBRIST;

/// Rook source and destination for a castling move landing the king on `king_to`.
#[inline]
pub(crate) fn castling_rook_squares(king_to: Square) -> (Square, Square) {
    let to = king_to.index();
    if king_to.file() == 6 {
        (Square::from_index(to + 1), Square::from_index(to - 1))
    } else {
        (Square::from_index(to - 2), Square::from_index(to + 1))
    }
}

impl Position {
    // Hashed edits: board + full key + pawn key + piece-square score.

    #[inline]
    fn add_piece(&mut self, color: Color, piece: Piece, sq: Square) {
        self.place(color, piece, sq);
        self.hash_piece(color, piece, sq);
        let p = piece.index();
        let t = pst_square(sq.index(), color == Color::White);
        self.psqt_mg += color.sign() * (MATERIAL_MG[p] + PST_MG[p][t]);
        self.psqt_eg += color.sign() * (MATERIAL_EG[p] + PST_EG[p][t]);
        self.phase += PHASE_WEIGHTS[p];
    }

    #[inline]
    fn remove_piece(&mut self, color: Color, piece: Piece, sq: Square) {
        self.lift(color, piece, sq);
        self.hash_piece(color, piece, sq);
        let p = piece.index();
        let t = pst_square(sq.index(), color == Color::White);
        self.psqt_mg -= color.sign() * (MATERIAL_MG[p] + PST_MG[p][t]);
        self.psqt_eg -= color.sign() * (MATERIAL_EG[p] + PST_EG[p][t]);
        self.phase -= PHASE_WEIGHTS[p];
    }

    #[inline]
    fn move_piece(&mut self, color: Color, piece: Piece, from: Square, to: Square) {
        self.remove_piece(color, piece, from);
        self.add_piece(color, piece, to);
        if piece == Piece::King {
            self.king_sq[color.index()] = to;
        }
    }

    #[inline]
    fn hash_piece(&mut self, color: Color, piece: Piece, sq: Square) {
        let k = ZOBRIST.piece(color, piece, sq);
        self.key ^= k;
        if matches!(piece, Piece::Pawn | Piece::King) {
            self.pawn_key ^= k;
        }
    }

    /// Play a legal move, pushing the prior state onto the history stack.
    ///
    /// The move must come from this position's legal move list; anything else
    /// is only caught by debug assertions.
    pub fn make_move(&mut self, mv: Move) {
        debug_assert!(!mv.is_null());
        debug_assert_eq!(self.piece_at(mv.from()), Some((self.side, mv.piece())), "{mv:?}");

        self.history.push(UndoInfo {
            mv,
            castling: self.castling,
            en_passant: self.en_passant,
            halfmove_clock: self.halfmove_clock,
            key: self.key,
            pawn_key: self.pawn_key,
            checkers: self.checkers,
            pinned: self.pinned,
            psqt_mg: self.psqt_mg,
            psqt_eg: self.psqt_eg,
            phase: self.phase,
        });

        let z = &*ZOBRIST;
        let us = self.side;
        let them = us.opponent();
        let (from, to, piece) = (mv.from(), mv.to(), mv.piece());
        let endgame_before = [
            self.has_only_pawns(Color::White),
            self.has_only_pawns(Color::Black),
        ];

        self.key ^= z.en_passant(self.en_passant);
        self.en_passant = None;
        self.halfmove_clock += 1;

        match mv.kind() {
            MoveKind::Normal | MoveKind::DoublePush => {
                if let Some(captured) = mv.captured() {
                    self.remove_piece(them, captured, to);
                    self.halfmove_clock = 0;
                }
                self.move_piece(us, piece, from, to);
                if piece == Piece::Pawn {
                    self.halfmove_clock = 0;
                    if mv.is_double_pawn_push() {
                        let ep = Square::from_index((from.index() + to.index()) / 2);
                        // only recorded when a capture is possible, so transpositions hash alike
                        if (pawn_attacks(us, ep) & self.pieces(them, Piece::Pawn)).is_nonempty() {
                            self.en_passant = Some(ep);
                        }
                    }
                }
            }
            MoveKind::EnPassant => {
                let victim = Square::from_index(to.index() ^ 8);
                self.remove_piece(them, Piece::Pawn, victim);
                self.move_piece(us, Piece::Pawn, from, to);
                self.halfmove_clock = 0;
            }
            MoveKind::Castle => {
                let (rook_from, rook_to) = castling_rook_squares(to);
                self.move_piece(us, Piece::King, from, to);
                self.move_piece(us, Piece::Rook, rook_from, rook_to);
            }
            MoveKind::Promotion(promo) => {
                if let Some(captured) = mv.captured() {
                    self.remove_piece(them, captured, to);
                }
                self.remove_piece(us, Piece::Pawn, from);
                self.add_piece(us, promo, to);
                self.halfmove_clock = 0;
            }
        }

        let castling = self.castling.after_move(from.index(), to.index());
        if castling != self.castling {
            self.key ^= z.castling_keys[self.castling.as_u8() as usize]
                ^ z.castling_keys[castling.as_u8() as usize];
            self.castling = castling;
        }
        self.key ^= z.en_passant(self.en_passant);
        self.key ^= z.white_to_move_key;
        self.side = them;
        self.move_counter += 1;

        for color in Color::BOTH {
            if self.has_only_pawns(color) != endgame_before[color.index()] {
                self.pawn_key ^= z.endgame_keys[color.index()];
            }
        }

        self.update_check_info();
        self.debug_validate();
    }

    /// Take back `mv`, which must be the last move made.
    pub fn unmake_move(&mut self, mv: Move) {
        let Some(undo) = self.history.pop() else {
            debug_assert!(false, "unmake_move with empty history");
            return;
        };
        debug_assert_eq!(undo.mv, mv);

        let them = self.side;
        let us = them.opponent();
        let (from, to, piece) = (mv.from(), mv.to(), mv.piece());

        match mv.kind() {
            MoveKind::Normal | MoveKind::DoublePush => {
                self.lift(us, piece, to);
                self.place(us, piece, from);
                if let Some(captured) = mv.captured() {
                    self.place(them, captured, to);
                }
            }
            MoveKind::EnPassant => {
                self.lift(us, Piece::Pawn, to);
                self.place(us, Piece::Pawn, from);
                self.place(them, Piece::Pawn, Square::from_index(to.index() ^ 8));
            }
            MoveKind::Castle => {
                let (rook_from, rook_to) = castling_rook_squares(to);
                self.lift(us, Piece::Rook, rook_to);
                self.place(us, Piece::Rook, rook_from);
                self.lift(us, Piece::King, to);
                self.place(us, Piece::King, from);
            }
            MoveKind::Promotion(promo) => {
                self.lift(us, promo, to);
                self.place(us, Piece::Pawn, from);
                if let Some(captured) = mv.captured() {
                    self.place(them, captured, to);
                }
            }
        }
        if piece == Piece::King {
            self.king_sq[us.index()] = from;
        }

        self.side = us;
        self.move_counter -= 1;
        self.castling = undo.castling;
        self.en_passant = undo.en_passant;
        self.halfmove_clock = undo.halfmove_clock;
        self.key = undo.key;
        self.pawn_key = undo.pawn_key;
        self.checkers = undo.checkers;
        self.pinned = undo.pinned;
        self.psqt_mg = undo.psqt_mg;
        self.psqt_eg = undo.psqt_eg;
        self.phase = undo.phase;
    }

    /// Last move played, if any.
    #[must_use]
    pub fn last_move(&self) -> Option<Move> {
        self.history.last().map(|u| u.mv)
    }
}
