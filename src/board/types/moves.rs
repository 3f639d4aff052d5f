//! Move types and move list.

use std::fmt;
use std::ops::Index;

use super::piece::Piece;
use super::square::Square;

/// Special-move tag stored in the move's kind field.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MoveKind {
    Normal,
    DoublePush,
    EnPassant,
    Castle,
    Promotion(Piece),
}

const KIND_NORMAL: u32 = 0;
const KIND_DOUBLE_PUSH: u32 = 1;
const KIND_EN_PASSANT: u32 = 2;
const KIND_CASTLE: u32 = 3;
const KIND_PROMO_KNIGHT: u32 = 4;
const KIND_PROMO_BISHOP: u32 = 5;
const KIND_PROMO_ROOK: u32 = 6;
const KIND_PROMO_QUEEN: u32 = 7;

const FROM_SHIFT: u32 = 0;
const TO_SHIFT: u32 = 6;
const PIECE_SHIFT: u32 = 12;
const CAPTURED_SHIFT: u32 = 15;
const KIND_SHIFT: u32 = 18;

const SQUARE_MASK: u32 = 0x3F;
const PIECE_MASK: u32 = 0x7;
const KIND_MASK: u32 = 0xF;

/// Number of significant bits in a packed move.
pub const MOVE_BITS: u32 = 22;

/// Packed move.
///
/// Layout (bit offset, width):
///
/// | field          | offset | width | values                               |
/// |----------------|--------|-------|--------------------------------------|
/// | from square    | 0      | 6     | 0-63                                 |
/// | to square      | 6      | 6     | 0-63                                 |
/// | moving piece   | 12     | 3     | `Piece::index()`                     |
/// | captured piece | 15     | 3     | 0 = none, else `Piece::index() + 1`  |
/// | kind           | 18     | 4     | normal, double push, ep, castle, promotion N/B/R/Q |
///
/// The all-zero value is the null move; it never matches a generated move
/// because source and destination coincide.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Move(u32);

impl Move {
    #[inline]
    #[must_use]
    pub const fn null() -> Self {
        Move(0)
    }

    #[inline]
    #[must_use]
    pub const fn is_null(self) -> bool {
        self.0 == 0
    }

    /// Pack the fields of a move.
    #[inline]
    #[must_use]
    pub const fn encode(
        from: Square,
        to: Square,
        piece: Piece,
        captured: Option<Piece>,
        kind: MoveKind,
    ) -> Self {
        let captured_code = match captured {
            Some(p) => p.index() as u32 + 1,
            None => 0,
        };
        let kind_code = match kind {
            MoveKind::Normal => KIND_NORMAL,
            MoveKind::DoublePush => KIND_DOUBLE_PUSH,
            MoveKind::EnPassant => KIND_EN_PASSANT,
            MoveKind::Castle => KIND_CASTLE,
            MoveKind::Promotion(Piece::Knight) => KIND_PROMO_KNIGHT,
            MoveKind::Promotion(Piece::Bishop) => KIND_PROMO_BISHOP,
            MoveKind::Promotion(Piece::Rook) => KIND_PROMO_ROOK,
            MoveKind::Promotion(_) => KIND_PROMO_QUEEN,
        };
        Move(
            (from.index() as u32) << FROM_SHIFT
                | (to.index() as u32) << TO_SHIFT
                | (piece.index() as u32) << PIECE_SHIFT
                | captured_code << CAPTURED_SHIFT
                | kind_code << KIND_SHIFT,
        )
    }

    #[inline]
    #[must_use]
    pub const fn from(self) -> Square {
        Square::from_index(((self.0 >> FROM_SHIFT) & SQUARE_MASK) as usize)
    }

    #[inline]
    #[must_use]
    pub const fn to(self) -> Square {
        Square::from_index(((self.0 >> TO_SHIFT) & SQUARE_MASK) as usize)
    }

    /// Piece type that moves.
    #[inline]
    #[must_use]
    pub const fn piece(self) -> Piece {
        match Piece::from_index(((self.0 >> PIECE_SHIFT) & PIECE_MASK) as usize) {
            Some(p) => p,
            None => Piece::Pawn,
        }
    }

    /// Piece type removed by this move (pawn for en passant).
    #[inline]
    #[must_use]
    pub const fn captured(self) -> Option<Piece> {
        let code = ((self.0 >> CAPTURED_SHIFT) & PIECE_MASK) as usize;
        if code == 0 {
            None
        } else {
            Piece::from_index(code - 1)
        }
    }

    #[inline]
    #[must_use]
    pub const fn kind(self) -> MoveKind {
        match (self.0 >> KIND_SHIFT) & KIND_MASK {
            KIND_DOUBLE_PUSH => MoveKind::DoublePush,
            KIND_EN_PASSANT => MoveKind::EnPassant,
            KIND_CASTLE => MoveKind::Castle,
            KIND_PROMO_KNIGHT => MoveKind::Promotion(Piece::Knight),
            KIND_PROMO_BISHOP => MoveKind::Promotion(Piece::Bishop),
            KIND_PROMO_ROOK => MoveKind::Promotion(Piece::Rook),
            KIND_PROMO_QUEEN => MoveKind::Promotion(Piece::Queen),
            _ => MoveKind::Normal,
        }
    }

    #[inline]
    #[must_use]
    pub const fn is_capture(self) -> bool {
        (self.0 >> CAPTURED_SHIFT) & PIECE_MASK != 0
    }

    #[inline]
    #[must_use]
    pub const fn is_en_passant(self) -> bool {
        (self.0 >> KIND_SHIFT) & KIND_MASK == KIND_EN_PASSANT
    }

    #[inline]
    #[must_use]
    pub const fn is_castling(self) -> bool {
        (self.0 >> KIND_SHIFT) & KIND_MASK == KIND_CASTLE
    }

    #[inline]
    #[must_use]
    pub const fn is_double_pawn_push(self) -> bool {
        (self.0 >> KIND_SHIFT) & KIND_MASK == KIND_DOUBLE_PUSH
    }

    #[inline]
    #[must_use]
    pub const fn is_promotion(self) -> bool {
        (self.0 >> KIND_SHIFT) & KIND_MASK >= KIND_PROMO_KNIGHT
    }

    #[inline]
    #[must_use]
    pub const fn promotion(self) -> Option<Piece> {
        match self.kind() {
            MoveKind::Promotion(p) => Some(p),
            _ => None,
        }
    }

    /// Neither a capture nor a promotion
    #[inline]
    #[must_use]
    pub const fn is_quiet(self) -> bool {
        !self.is_capture() && !self.is_promotion()
    }

    /// Raw packed value, as stored in the transposition table
    #[inline]
    #[must_use]
    pub const fn as_u32(self) -> u32 {
        self.0
    }

    /// Rebuild a move from its packed value. Bits above the layout are dropped.
    #[inline]
    #[must_use]
    pub const fn from_u32(value: u32) -> Self {
        Move(value & ((1 << MOVE_BITS) - 1))
    }
}

impl fmt::Debug for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_null() {
            return write!(f, "Move(null)");
        }
        write!(f, "Move({} {}", self.piece(), self)?;
        if let Some(captured) = self.captured() {
            write!(f, " x{captured}")?;
        }
        match self.kind() {
            MoveKind::Normal | MoveKind::Promotion(_) => {}
            MoveKind::DoublePush => write!(f, " double")?,
            MoveKind::EnPassant => write!(f, " ep")?,
            MoveKind::Castle => write!(f, " castle")?,
        }
        write!(f, ")")
    }
}

/// Coordinate notation, e.g. `e2e4` or `e7e8q`. The null move prints as `0000`.
impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_null() {
            return f.write_str("0000");
        }
        write!(f, "{}{}", self.from(), self.to())?;
        if let Some(promo) = self.promotion() {
            write!(f, "{}", promo.to_char())?;
        }
        Ok(())
    }
}

pub(crate) const MAX_MOVES: usize = 256;
pub const MAX_PLY: usize = 128;
pub(crate) const EMPTY_MOVE: Move = Move::null();

/// List of moves with fixed-size backing array.
#[derive(Clone, Debug)]
pub struct MoveList {
    moves: [Move; MAX_MOVES],
    len: usize,
}

impl MoveList {
    #[must_use]
    pub fn new() -> Self {
        MoveList {
            moves: [EMPTY_MOVE; MAX_MOVES],
            len: 0,
        }
    }

    #[inline]
    pub(crate) fn push(&mut self, mv: Move) {
        debug_assert!(self.len < MAX_MOVES);
        self.moves[self.len] = mv;
        self.len += 1;
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[must_use]
    pub fn as_slice(&self) -> &[Move] {
        &self.moves[..self.len]
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Move> {
        self.as_slice().iter()
    }

    #[must_use]
    pub fn contains(&self, mv: Move) -> bool {
        self.as_slice().contains(&mv)
    }

    #[must_use]
    pub fn get(&self, idx: usize) -> Option<Move> {
        self.as_slice().get(idx).copied()
    }
}

impl<'a> IntoIterator for &'a MoveList {
    type Item = &'a Move;
    type IntoIter = std::slice::Iter<'a, Move>;

    fn into_iter(self) -> Self::IntoIter {
        self.as_slice().iter()
    }
}

impl Default for MoveList {
    fn default() -> Self {
        MoveList::new()
    }
}

/// Owning iterator over moves in a `MoveList`
pub struct MoveListIntoIter {
    list: MoveList,
    idx: usize,
}

impl Iterator for MoveListIntoIter {
    type Item = Move;

    fn next(&mut self) -> Option<Self::Item> {
        if self.idx < self.list.len {
            let mv = self.list.moves[self.idx];
            self.idx += 1;
            Some(mv)
        } else {
            None
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.list.len - self.idx;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for MoveListIntoIter {}

impl IntoIterator for MoveList {
    type Item = Move;
    type IntoIter = MoveListIntoIter;

    fn into_iter(self) -> Self::IntoIter {
        MoveListIntoIter { list: self, idx: 0 }
    }
}

impl Index<usize> for MoveList {
    type Output = Move;

    fn index(&self, idx: usize) -> &Self::Output {
        &self.as_slice()[idx]
    }
}

/// A scored move for move ordering.
#[derive(Clone, Copy, Debug)]
pub struct ScoredMove {
    pub mv: Move,
    pub score: i32,
}

/// Fixed-size list of scored moves to avoid heap allocation.
#[derive(Clone, Debug)]
pub struct ScoredMoveList {
    moves: [ScoredMove; MAX_MOVES],
    len: usize,
}

impl ScoredMoveList {
    #[must_use]
    pub fn new() -> Self {
        ScoredMoveList {
            moves: [ScoredMove {
                mv: EMPTY_MOVE,
                score: 0,
            }; MAX_MOVES],
            len: 0,
        }
    }

    #[inline]
    pub fn push(&mut self, mv: Move, score: i32) {
        self.moves[self.len] = ScoredMove { mv, score };
        self.len += 1;
    }

    /// Partial sort: find the best move from index `start` onwards and swap it to position `start`.
    /// Incremental selection sort avoids sorting moves that an early cutoff never reaches.
    #[inline]
    pub fn pick_best(&mut self, start: usize) -> Option<ScoredMove> {
        if start >= self.len {
            return None;
        }

        let mut best_idx = start;
        let mut best_score = self.moves[start].score;
        for i in (start + 1)..self.len {
            if self.moves[i].score > best_score {
                best_score = self.moves[i].score;
                best_idx = i;
            }
        }

        if best_idx != start {
            self.moves.swap(start, best_idx);
        }

        Some(self.moves[start])
    }
}

impl Default for ScoredMoveList {
    fn default() -> Self {
        ScoredMoveList::new()
    }
}
