use super::attack_tables::{
    between, bishop_attacks, king_attacks, knight_attacks, pawn_attacks, rook_attacks,
};
use super::pst::{pst_square, taper, MATERIAL_EG, MATERIAL_MG, PHASE_WEIGHTS, PST_EG, PST_MG};
use super::types::{Bitboard, CastlingRights, Color, Move, Piece, Square};
use crate::zobrist::ZOBRIST;

/// Game plies reserved up front for the history stack.
pub(crate) const HISTORY_CAPACITY: usize = 1024;

/// Per-ply state saved by `make_move` and restored by `unmake_move`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct UndoInfo {
    pub(crate) mv: Move,
    pub(crate) castling: CastlingRights,
    pub(crate) en_passant: Option<Square>,
    pub(crate) halfmove_clock: u16,
    pub(crate) key: u64,
    pub(crate) pawn_key: u64,
    pub(crate) checkers: Bitboard,
    pub(crate) pinned: [Bitboard; 2],
    pub(crate) psqt_mg: i32,
    pub(crate) psqt_eg: i32,
    pub(crate) phase: i32,
}

/// Bitboard position with incrementally maintained keys and derived masks.
#[derive(Clone, Debug)]
pub struct Position {
    pub(crate) pieces: [[Bitboard; 6]; 2],
    pub(crate) occupied: [Bitboard; 2],
    pub(crate) all_occupied: Bitboard,
    pub(crate) board: [Option<(Color, Piece)>; 64],
    pub(crate) side: Color,
    pub(crate) castling: CastlingRights,
    pub(crate) en_passant: Option<Square>,
    pub(crate) halfmove_clock: u16,
    /// `2 * fullmove + (1 if black to move)`
    pub(crate) move_counter: u32,
    pub(crate) king_sq: [Square; 2],
    pub(crate) checkers: Bitboard,
    pub(crate) pinned: [Bitboard; 2],
    pub(crate) key: u64,
    pub(crate) pawn_key: u64,
    /// White-relative material + piece-square score
    pub(crate) psqt_mg: i32,
    pub(crate) psqt_eg: i32,
    pub(crate) phase: i32,
    pub(crate) history: Vec<UndoInfo>,
}

impl Position {
    /// The standard starting position.
    #[must_use]
    pub fn new() -> Self {
        let mut pos = Position::empty();
        let back_rank = [
            Piece::Rook,
            Piece::Knight,
            Piece::Bishop,
            Piece::Queen,
            Piece::King,
            Piece::Bishop,
            Piece::Knight,
            Piece::Rook,
        ];
        for (file, piece) in back_rank.into_iter().enumerate() {
            pos.place(Color::White, piece, Square::from_index(file));
            pos.place(Color::Black, piece, Square::from_index(56 + file));
            pos.place(Color::White, Piece::Pawn, Square::from_index(8 + file));
            pos.place(Color::Black, Piece::Pawn, Square::from_index(48 + file));
        }
        pos.castling = CastlingRights::all();
        pos.move_counter = 2;
        pos.refresh();
        pos
    }

    pub(crate) fn empty() -> Self {
        Position {
            pieces: [[Bitboard::EMPTY; 6]; 2],
            occupied: [Bitboard::EMPTY; 2],
            all_occupied: Bitboard::EMPTY,
            board: [None; 64],
            side: Color::White,
            castling: CastlingRights::none(),
            en_passant: None,
            halfmove_clock: 0,
            move_counter: 0,
            king_sq: [Square::from_index(0); 2],
            checkers: Bitboard::EMPTY,
            pinned: [Bitboard::EMPTY; 2],
            key: 0,
            pawn_key: 0,
            psqt_mg: 0,
            psqt_eg: 0,
            phase: 0,
            history: Vec::with_capacity(HISTORY_CAPACITY),
        }
    }

    /// Recompute every derived field from the piece placement and scalars.
    /// Used after building a position square by square.
    pub(crate) fn refresh(&mut self) {
        for color in Color::BOTH {
            let kings = self.pieces[color.index()][Piece::King.index()];
            if kings.is_nonempty() {
                self.king_sq[color.index()] = kings.lsb();
            }
        }
        self.key = self.compute_hash();
        self.pawn_key = self.compute_pawn_hash();
        let (mg, eg, phase) = self.compute_psqt();
        self.psqt_mg = mg;
        self.psqt_eg = eg;
        self.phase = phase;
        self.update_check_info();
        self.history.clear();
    }

    // Raw board edits. These touch only bitboards and the mailbox.

    #[inline]
    pub(crate) fn place(&mut self, color: Color, piece: Piece, sq: Square) {
        let bit = Bitboard::from_square(sq);
        self.pieces[color.index()][piece.index()] |= bit;
        self.occupied[color.index()] |= bit;
        self.all_occupied |= bit;
        self.board[sq.index()] = Some((color, piece));
    }

    #[inline]
    pub(crate) fn lift(&mut self, color: Color, piece: Piece, sq: Square) {
        let bit = !Bitboard::from_square(sq);
        self.pieces[color.index()][piece.index()] &= bit;
        self.occupied[color.index()] &= bit;
        self.all_occupied &= bit;
        self.board[sq.index()] = None;
    }

    // Full accessors

    #[inline]
    #[must_use]
    pub fn side_to_move(&self) -> Color {
        self.side
    }

    #[inline]
    #[must_use]
    pub fn piece_at(&self, sq: Square) -> Option<(Color, Piece)> {
        self.board[sq.index()]
    }

    #[inline]
    #[must_use]
    pub fn pieces(&self, color: Color, piece: Piece) -> Bitboard {
        self.pieces[color.index()][piece.index()]
    }

    #[inline]
    #[must_use]
    pub fn occupied_by(&self, color: Color) -> Bitboard {
        self.occupied[color.index()]
    }

    #[inline]
    #[must_use]
    pub fn occupied(&self) -> Bitboard {
        self.all_occupied
    }

    #[inline]
    #[must_use]
    pub fn empty_squares(&self) -> Bitboard {
        !self.all_occupied
    }

    #[inline]
    #[must_use]
    pub fn king_square(&self, color: Color) -> Square {
        self.king_sq[color.index()]
    }

    #[inline]
    #[must_use]
    pub fn castling_rights(&self) -> CastlingRights {
        self.castling
    }

    #[inline]
    #[must_use]
    pub fn en_passant(&self) -> Option<Square> {
        self.en_passant
    }

    #[inline]
    #[must_use]
    pub fn halfmove_clock(&self) -> u16 {
        self.halfmove_clock
    }

    /// Half-move counter since the start of the game, used to age table entries.
    #[inline]
    #[must_use]
    pub fn move_counter(&self) -> u32 {
        self.move_counter
    }

    #[inline]
    #[must_use]
    pub fn fullmove_number(&self) -> u32 {
        (self.move_counter / 2).max(1)
    }

    #[inline]
    #[must_use]
    pub fn hash(&self) -> u64 {
        self.key
    }

    #[inline]
    #[must_use]
    pub fn pawn_hash(&self) -> u64 {
        self.pawn_key
    }

    #[inline]
    #[must_use]
    pub fn checkers(&self) -> Bitboard {
        self.checkers
    }

    #[inline]
    #[must_use]
    pub fn pinned(&self, color: Color) -> Bitboard {
        self.pinned[color.index()]
    }

    #[inline]
    #[must_use]
    pub fn is_in_check(&self) -> bool {
        self.checkers.is_nonempty()
    }

    /// Plies made since the position was set up.
    #[inline]
    #[must_use]
    pub fn game_ply(&self) -> usize {
        self.history.len()
    }

    /// Incremental material + piece-square score, tapered, from White's side.
    #[inline]
    #[must_use]
    pub fn psqt_score(&self) -> i32 {
        taper(self.psqt_mg, self.psqt_eg, self.phase)
    }

    #[inline]
    #[must_use]
    pub fn game_phase(&self) -> i32 {
        self.phase
    }

    /// True when `color` has nothing left besides pawns and king.
    #[inline]
    #[must_use]
    pub fn has_only_pawns(&self, color: Color) -> bool {
        let c = color.index();
        (self.occupied[c]
            & !self.pieces[c][Piece::Pawn.index()]
            & !self.pieces[c][Piece::King.index()])
        .is_empty()
    }

    // Attack queries

    /// Pieces of both colors attacking `sq` given occupancy `occ`.
    #[must_use]
    pub fn attackers_to(&self, sq: Square, occ: Bitboard) -> Bitboard {
        let [white, black] = self.pieces;
        let diag = white[Piece::Bishop.index()]
            | white[Piece::Queen.index()]
            | black[Piece::Bishop.index()]
            | black[Piece::Queen.index()];
        let straight = white[Piece::Rook.index()]
            | white[Piece::Queen.index()]
            | black[Piece::Rook.index()]
            | black[Piece::Queen.index()];
        (pawn_attacks(Color::White, sq) & black[Piece::Pawn.index()])
            | (pawn_attacks(Color::Black, sq) & white[Piece::Pawn.index()])
            | (knight_attacks(sq) & (white[Piece::Knight.index()] | black[Piece::Knight.index()]))
            | (king_attacks(sq) & (white[Piece::King.index()] | black[Piece::King.index()]))
            | (bishop_attacks(sq, occ) & diag)
            | (rook_attacks(sq, occ) & straight)
    }

    /// True if any piece of color `by` attacks `sq` given occupancy `occ`.
    #[must_use]
    pub fn is_square_attacked(&self, sq: Square, by: Color, occ: Bitboard) -> bool {
        let them = &self.pieces[by.index()];
        if (pawn_attacks(by.opponent(), sq) & them[Piece::Pawn.index()]).is_nonempty()
            || (knight_attacks(sq) & them[Piece::Knight.index()]).is_nonempty()
            || (king_attacks(sq) & them[Piece::King.index()]).is_nonempty()
        {
            return true;
        }
        let diag = them[Piece::Bishop.index()] | them[Piece::Queen.index()];
        let straight = them[Piece::Rook.index()] | them[Piece::Queen.index()];
        (bishop_attacks(sq, occ) & diag).is_nonempty()
            || (rook_attacks(sq, occ) & straight).is_nonempty()
    }

    /// Pieces of `color` that are the only blocker between their king and an enemy slider.
    #[must_use]
    pub(crate) fn compute_pinned(&self, color: Color) -> Bitboard {
        let king = self.king_sq[color.index()];
        let them = &self.pieces[color.opponent().index()];
        let snipers = (rook_attacks(king, Bitboard::EMPTY)
            & (them[Piece::Rook.index()] | them[Piece::Queen.index()]))
            | (bishop_attacks(king, Bitboard::EMPTY)
                & (them[Piece::Bishop.index()] | them[Piece::Queen.index()]));

        let mut pinned = Bitboard::EMPTY;
        for sniper in snipers.iter() {
            let blockers = between(king, sniper) & self.all_occupied;
            if blockers.is_nonempty()
                && !blockers.has_many()
                && (blockers & self.occupied[color.index()]).is_nonempty()
            {
                pinned |= blockers;
            }
        }
        pinned
    }

    /// Recompute checkers for the side to move and pins for both sides.
    pub(crate) fn update_check_info(&mut self) {
        let us = self.side;
        let king = self.king_sq[us.index()];
        self.checkers =
            self.attackers_to(king, self.all_occupied) & self.occupied[us.opponent().index()];
        self.pinned = [
            self.compute_pinned(Color::White),
            self.compute_pinned(Color::Black),
        ];
    }

    // Full recomputation, used at setup and to cross-check incremental updates

    #[must_use]
    pub fn compute_hash(&self) -> u64 {
        let z = &*ZOBRIST;
        let mut key = 0u64;
        for (idx, slot) in self.board.iter().enumerate() {
            if let Some((color, piece)) = *slot {
                key ^= z.piece(color, piece, Square::from_index(idx));
            }
        }
        key ^= z.castling_keys[self.castling.as_u8() as usize];
        key ^= z.en_passant(self.en_passant);
        if self.side == Color::White {
            key ^= z.white_to_move_key;
        }
        key
    }

    #[must_use]
    pub fn compute_pawn_hash(&self) -> u64 {
        let z = &*ZOBRIST;
        let mut key = 0u64;
        for color in Color::BOTH {
            for sq in self.pieces(color, Piece::Pawn).iter() {
                key ^= z.piece(color, Piece::Pawn, sq);
            }
            for sq in self.pieces(color, Piece::King).iter() {
                key ^= z.piece(color, Piece::King, sq);
            }
            if self.has_only_pawns(color) {
                key ^= z.endgame_keys[color.index()];
            }
        }
        key
    }

    pub(crate) fn compute_psqt(&self) -> (i32, i32, i32) {
        let (mut mg, mut eg, mut phase) = (0, 0, 0);
        for (idx, slot) in self.board.iter().enumerate() {
            if let Some((color, piece)) = *slot {
                let p = piece.index();
                let t = pst_square(idx, color == Color::White);
                mg += color.sign() * (MATERIAL_MG[p] + PST_MG[p][t]);
                eg += color.sign() * (MATERIAL_EG[p] + PST_EG[p][t]);
                phase += PHASE_WEIGHTS[p];
            }
        }
        (mg, eg, phase)
    }

    // Draw detection

    /// The current position occurred before since the last irreversible move.
    #[must_use]
    pub fn is_repetition(&self) -> bool {
        let n = self.history.len();
        let limit = (self.halfmove_clock as usize).min(n);
        let mut back = 4;
        while back <= limit {
            if self.history[n - back].key == self.key {
                return true;
            }
            back += 2;
        }
        false
    }

    #[inline]
    #[must_use]
    pub fn is_fifty_move_draw(&self) -> bool {
        self.halfmove_clock >= 100
    }

    /// Neither side can possibly mate: bare kings, or a single minor piece.
    #[must_use]
    pub fn is_insufficient_material(&self) -> bool {
        let heavy_or_pawns = Color::BOTH.iter().fold(Bitboard::EMPTY, |acc, &c| {
            acc | self.pieces(c, Piece::Pawn) | self.pieces(c, Piece::Rook) | self.pieces(c, Piece::Queen)
        });
        if heavy_or_pawns.is_nonempty() {
            return false;
        }
        let minors = Color::BOTH.iter().fold(Bitboard::EMPTY, |acc, &c| {
            acc | self.pieces(c, Piece::Knight) | self.pieces(c, Piece::Bishop)
        });
        !minors.has_many()
    }

    /// Draw by repetition, fifty-move rule or insufficient material.
    #[must_use]
    pub fn is_draw(&self) -> bool {
        self.is_fifty_move_draw() || self.is_insufficient_material() || self.is_repetition()
    }

    /// Debug-build check of the king invariants. Keys are cross-checked by tests.
    #[inline]
    pub(crate) fn debug_validate(&self) {
        if cfg!(debug_assertions) {
            for color in Color::BOTH {
                let kings = self.pieces(color, Piece::King);
                debug_assert_eq!(kings.popcount(), 1, "{color} king count");
                debug_assert_eq!(kings.lsb(), self.king_sq[color.index()]);
            }
        }
    }
}

impl Default for Position {
    fn default() -> Self {
        Position::new()
    }
}

impl PartialEq for Position {
    /// Positions are equal when everything except the move history matches.
    fn eq(&self, other: &Self) -> bool {
        self.pieces == other.pieces
            && self.side == other.side
            && self.castling == other.castling
            && self.en_passant == other.en_passant
            && self.halfmove_clock == other.halfmove_clock
            && self.key == other.key
            && self.pawn_key == other.pawn_key
            && self.checkers == other.checkers
            && self.pinned == other.pinned
    }
}
