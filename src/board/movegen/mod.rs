//! Legal move generation.
//!
//! Generation branches on the number of pieces giving check:
//!
//! | checkers | generated |
//! |---|---|
//! | 0 | every piece; pinned pieces stay on their pin line; castling |
//! | 1 | king steps, captures of the checker, blocks if it slides |
//! | 2+ | king steps only |
//!
//! No move is ever made to test legality; pins and checks are resolved
//! from the masks `Position` keeps up to date.

mod kings;
mod knights;
mod pawns;
mod sliders;

use super::attack_tables::{
    between, bishop_attacks, king_attacks, knight_attacks, line, pawn_attacks, queen_attacks,
    rook_attacks,
};
use super::types::{Bitboard, Color, Move, MoveKind, MoveList, Piece, Square};
use super::Position;

/// Which moves `generate` produces.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum GenMode {
    /// Every legal move.
    Moves,
    /// Captures and promotions only (quiescence).
    Attacks,
}

/// Squares attacked by `piece` of `color` standing on `sq`.
///
/// The match is exhaustive over `Piece`, so adding a piece type fails to
/// compile until it has an attack function.
#[inline]
#[must_use]
pub fn piece_attacks(piece: Piece, color: Color, sq: Square, occ: Bitboard) -> Bitboard {
    match piece {
        Piece::Pawn => pawn_attacks(color, sq),
        Piece::Knight => knight_attacks(sq),
        Piece::Bishop => bishop_attacks(sq, occ),
        Piece::Rook => rook_attacks(sq, occ),
        Piece::Queen => queen_attacks(sq, occ),
        Piece::King => king_attacks(sq),
    }
}

/// Per-call generation state shared by the piece generators.
pub(super) struct GenContext {
    pub(super) us: Color,
    pub(super) them: Color,
    pub(super) king: Square,
    pub(super) pinned: Bitboard,
    /// Destinations allowed for non-king pieces: empty or enemy squares,
    /// narrowed to the check-resolving squares when in check.
    pub(super) targets: Bitboard,
    pub(super) mode: GenMode,
}

impl GenContext {
    /// Destinations a piece on `from` may reach without exposing its king.
    #[inline]
    pub(super) fn pin_mask(&self, from: Square) -> Bitboard {
        if self.pinned.contains(from) {
            line(self.king, from)
        } else {
            Bitboard::ALL
        }
    }
}

impl Position {
    /// Every legal move for the side to move.
    #[must_use]
    pub fn legal_moves(&self) -> MoveList {
        let mut list = MoveList::new();
        self.generate(GenMode::Moves, &mut list);
        list
    }

    /// Legal captures and promotions.
    #[must_use]
    pub fn capture_moves(&self) -> MoveList {
        let mut list = MoveList::new();
        self.generate(GenMode::Attacks, &mut list);
        list
    }

    /// Append the legal moves selected by `mode` to `list`.
    pub fn generate(&self, mode: GenMode, list: &mut MoveList) {
        let us = self.side;
        let them = us.opponent();
        let king = self.king_sq[us.index()];

        let evasion = match self.checkers.popcount() {
            0 => Bitboard::ALL,
            1 => {
                let checker = self.checkers.lsb();
                match self.board[checker.index()] {
                    Some((_, p)) if p.is_slider() => between(king, checker) | self.checkers,
                    _ => self.checkers,
                }
            }
            _ => {
                self.gen_king_moves(mode, list);
                return;
            }
        };

        let mut targets = !self.occupied[us.index()] & evasion;
        if mode == GenMode::Attacks {
            targets &= self.occupied[them.index()];
        }
        let ctx = GenContext {
            us,
            them,
            king,
            pinned: self.pinned[us.index()],
            targets,
            mode,
        };

        self.gen_pawn_moves(&ctx, evasion, list);
        self.gen_knight_moves(&ctx, list);
        for piece in [Piece::Bishop, Piece::Rook, Piece::Queen] {
            self.gen_slider_moves(&ctx, piece, list);
        }
        self.gen_king_moves(mode, list);
    }

    /// Build a move from `from` to `to`, reading any capture off the board.
    #[inline]
    pub(super) fn make_move_record(&self, from: Square, to: Square, piece: Piece, kind: MoveKind) -> Move {
        let captured = self.board[to.index()].map(|(_, p)| p);
        Move::encode(from, to, piece, captured, kind)
    }

    /// The side to move is checkmated.
    #[must_use]
    pub fn is_checkmate(&self) -> bool {
        self.is_in_check() && self.legal_moves().is_empty()
    }

    /// The side to move has no legal move and is not in check.
    #[must_use]
    pub fn is_stalemate(&self) -> bool {
        !self.is_in_check() && self.legal_moves().is_empty()
    }

    /// Count leaf nodes of the legal move tree to `depth`.
    pub fn perft(&mut self, depth: usize) -> u64 {
        if depth == 0 {
            return 1;
        }

        let moves = self.legal_moves();
        if depth == 1 {
            return moves.len() as u64;
        }

        let mut nodes = 0;
        for &m in moves.iter() {
            self.make_move(m);
            nodes += self.perft(depth - 1);
            self.unmake_move(m);
        }

        nodes
    }

    /// Perft split by root move, for locating generator bugs.
    pub fn perft_divide(&mut self, depth: usize) -> Vec<(Move, u64)> {
        let moves = self.legal_moves();
        let mut out = Vec::with_capacity(moves.len());
        for &m in moves.iter() {
            self.make_move(m);
            let nodes = if depth <= 1 { 1 } else { self.perft(depth - 1) };
            self.unmake_move(m);
            out.push((m, nodes));
        }
        out
    }
}
