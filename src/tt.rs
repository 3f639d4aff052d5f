//! Transposition table for caching search results.
//!
//! Two slot arrays share one index: an always-replace slot that takes every
//! store, and a depth-preferred slot that keeps the deepest result of the
//! current game position. Each slot holds a packed `u64` entry next to a
//! 32-bit fragment of the Zobrist key.
//!
//! Entries are written with relaxed atomics and no locks so that all Lazy
//! SMP workers can share one table. The stored fragment is XORed with the
//! folded entry, so a torn read fails verification and reads as a miss.
//! Two positions sharing the fragment are indistinguishable; callers
//! re-check any move they get back against the legal move list.

use std::fmt;
use std::sync::atomic::{AtomicU32, AtomicU64, AtomicUsize, Ordering};

use crate::board::{Move, MATE_BOUND, MOVE_BITS};

/// Default table size in megabytes.
pub const DEFAULT_HASH_MB: usize = 128;

/// Largest accepted table size in megabytes.
pub const MAX_HASH_MB: usize = 16384;

// Entry layout, bit offset : width
//
// | field              | offset | width |
// |--------------------|--------|-------|
// | depth              | 0      | 8     |
// | bound              | 8      | 2     |
// | move               | 10     | 22    |
// | half-move counter  | 32     | 16    |
// | score (signed)     | 48     | 16    |
const BOUND_SHIFT: u32 = 8;
const MOVE_SHIFT: u32 = 10;
const HALF_MOVE_SHIFT: u32 = 32;
const SCORE_SHIFT: u32 = 48;
const MOVE_MASK: u64 = (1 << MOVE_BITS) - 1;

/// How the stored score relates to the true value.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Bound {
    /// Score is the exact value
    Exact,
    /// Score is at most this value (failed low)
    Upper,
    /// Score is at least this value (failed high)
    Lower,
}

impl Bound {
    const fn to_bits(self) -> u64 {
        match self {
            Bound::Exact => 0,
            Bound::Upper => 1,
            Bound::Lower => 2,
        }
    }

    const fn from_bits(bits: u64) -> Self {
        match bits & 0x3 {
            0 => Bound::Exact,
            1 => Bound::Upper,
            _ => Bound::Lower,
        }
    }
}

/// Unpacked entry returned by `probe`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TtEntry {
    pub depth: u8,
    pub bound: Bound,
    /// Best or refutation move, `Move::null()` when none was found.
    pub mv: Move,
    /// Game half-move counter of the position the search started from.
    pub half_moves: u16,
    /// Score with mate distances relative to the probing ply.
    pub score: i32,
}

impl TtEntry {
    /// The stored move, if any.
    #[inline]
    #[must_use]
    pub fn best_move(&self) -> Option<Move> {
        (!self.mv.is_null()).then_some(self.mv)
    }

    /// The score is usable as a cutoff against the window `[alpha, beta]`.
    #[inline]
    #[must_use]
    pub fn cuts(&self, alpha: i32, beta: i32) -> bool {
        match self.bound {
            Bound::Exact => true,
            Bound::Lower => self.score >= beta,
            Bound::Upper => self.score <= alpha,
        }
    }
}

impl fmt::Display for TtEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "score={} {} depth={} bound={:?}",
            self.score, self.mv, self.depth, self.bound
        )
    }
}

/// Convert a root-relative mate score to node-relative before storing.
#[inline]
#[must_use]
pub fn score_to_tt(score: i32, ply: usize) -> i32 {
    let ply = ply as i32;
    if score > MATE_BOUND {
        score + ply
    } else if score < -MATE_BOUND {
        score - ply
    } else {
        score
    }
}

/// Inverse of `score_to_tt`.
#[inline]
#[must_use]
pub fn score_from_tt(score: i32, ply: usize) -> i32 {
    let ply = ply as i32;
    if score > MATE_BOUND {
        score - ply
    } else if score < -MATE_BOUND {
        score + ply
    } else {
        score
    }
}

fn pack(depth: u8, bound: Bound, mv: Move, half_moves: u16, score: i16) -> u64 {
    u64::from(depth)
        | bound.to_bits() << BOUND_SHIFT
        | (u64::from(mv.as_u32()) & MOVE_MASK) << MOVE_SHIFT
        | u64::from(half_moves) << HALF_MOVE_SHIFT
        | u64::from(score as u16) << SCORE_SHIFT
}

fn unpack(data: u64, ply: usize) -> TtEntry {
    TtEntry {
        depth: (data & 0xFF) as u8,
        bound: Bound::from_bits(data >> BOUND_SHIFT),
        mv: Move::from_u32(((data >> MOVE_SHIFT) & MOVE_MASK) as u32),
        half_moves: (data >> HALF_MOVE_SHIFT) as u16,
        score: score_from_tt(i32::from((data >> SCORE_SHIFT) as u16 as i16), ply),
    }
}

#[inline]
fn depth_of(data: u64) -> u8 {
    (data & 0xFF) as u8
}

#[inline]
fn half_moves_of(data: u64) -> u16 {
    (data >> HALF_MOVE_SHIFT) as u16
}

/// Checksum binding a key fragment to the entry it was stored with.
#[inline]
fn fold(fragment: u32, data: u64) -> u32 {
    fragment ^ data as u32 ^ (data >> 32) as u32
}

#[inline]
fn fragment_of(key: u64) -> u32 {
    (key >> 32) as u32
}

struct Slot {
    /// `fold(fragment, data)`
    check: AtomicU32,
    data: AtomicU64,
}

impl Slot {
    fn new() -> Self {
        Slot {
            check: AtomicU32::new(0),
            data: AtomicU64::new(0),
        }
    }

    /// Returns true when the slot was empty before the write.
    fn store(&self, fragment: u32, data: u64) -> bool {
        let was_empty = self.data.load(Ordering::Relaxed) == 0;
        self.data.store(data, Ordering::Relaxed);
        self.check.store(fold(fragment, data), Ordering::Relaxed);
        was_empty
    }

    fn load(&self, fragment: u32) -> Option<u64> {
        let check = self.check.load(Ordering::Relaxed);
        let data = self.data.load(Ordering::Relaxed);
        (data != 0 && fold(fragment, data) == check).then_some(data)
    }

    fn clear(&self) {
        self.check.store(0, Ordering::Relaxed);
        self.data.store(0, Ordering::Relaxed);
    }
}

/// Lossy, lock-free two-slot transposition table.
pub struct TranspositionTable {
    always: Box<[Slot]>,
    deep: Box<[Slot]>,
    mask: usize,
    used: AtomicUsize,
}

impl TranspositionTable {
    /// Create a table of roughly `size_mb` megabytes.
    ///
    /// Each slot array gets `size_mb * 2^20 / 16 / 2` entries rounded down
    /// to a power of two.
    #[must_use]
    pub fn new(size_mb: usize) -> Self {
        let entries = Self::entries_for(size_mb);
        TranspositionTable {
            always: (0..entries).map(|_| Slot::new()).collect(),
            deep: (0..entries).map(|_| Slot::new()).collect(),
            mask: entries - 1,
            used: AtomicUsize::new(0),
        }
    }

    fn entries_for(size_mb: usize) -> usize {
        let raw = (size_mb.max(1) << 20) / 16 / 2;
        // largest power of two not above `raw`
        1usize << (usize::BITS - 1 - raw.max(1).leading_zeros())
    }

    /// Entries per slot array.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.mask + 1
    }

    /// Reallocate at a new size, dropping every entry.
    pub fn resize(&mut self, size_mb: usize) {
        *self = TranspositionTable::new(size_mb);
    }

    #[inline]
    fn index(&self, key: u64) -> usize {
        (key as usize) & self.mask
    }

    /// Look up `key`; the score comes back relative to `ply`.
    ///
    /// The depth-preferred slot wins when both slots match and it is at
    /// least as deep.
    #[must_use]
    pub fn probe(&self, key: u64, ply: usize) -> Option<TtEntry> {
        let idx = self.index(key);
        let fragment = fragment_of(key);
        let always = self.always[idx].load(fragment);
        let deep = self.deep[idx].load(fragment);

        let data = match (always, deep) {
            (Some(a), Some(d)) if depth_of(d) >= depth_of(a) => d,
            (Some(a), _) => a,
            (None, Some(d)) => d,
            (None, None) => return None,
        };
        Some(unpack(data, ply))
    }

    /// Store a search result.
    ///
    /// `half_moves` is the game's half-move counter at the root; an entry
    /// from a different root is stale and always yields its deep slot.
    #[allow(clippy::too_many_arguments)]
    pub fn store(
        &self,
        key: u64,
        ply: usize,
        depth: u32,
        score: i32,
        bound: Bound,
        mv: Move,
        half_moves: u32,
    ) {
        let idx = self.index(key);
        let fragment = fragment_of(key);
        let depth = depth.min(u32::from(u8::MAX)) as u8;
        let half_moves = half_moves as u16;
        let score = score_to_tt(score, ply).clamp(i32::from(i16::MIN), i32::from(i16::MAX)) as i16;
        let data = pack(depth, bound, mv, half_moves, score);

        if self.always[idx].store(fragment, data) {
            self.used.fetch_add(1, Ordering::Relaxed);
        }

        let current = self.deep[idx].data.load(Ordering::Relaxed);
        if current == 0 || depth >= depth_of(current) || half_moves != half_moves_of(current) {
            if self.deep[idx].store(fragment, data) {
                self.used.fetch_add(1, Ordering::Relaxed);
            }
        }
    }

    /// Table occupancy in per mille (0-1000).
    #[must_use]
    pub fn hashfull(&self) -> u32 {
        let used = self.used.load(Ordering::Relaxed) as u64;
        let total = 2 * self.capacity() as u64;
        (used * 1000 / total).min(1000) as u32
    }

    /// Clear all entries from the table.
    pub fn clear(&self) {
        for slot in self.always.iter().chain(self.deep.iter()) {
            slot.clear();
        }
        self.used.store(0, Ordering::Relaxed);
    }
}

impl Default for TranspositionTable {
    fn default() -> Self {
        TranspositionTable::new(DEFAULT_HASH_MB)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{MoveKind, Piece, Square, MATE_SCORE};

    fn some_move() -> Move {
        Move::encode(
            Square::from_index(12),
            Square::from_index(28),
            Piece::Pawn,
            None,
            MoveKind::DoublePush,
        )
    }

    #[test]
    fn test_pack_unpack_roundtrip() {
        let mv = some_move();
        for (depth, bound, score) in [
            (10u8, Bound::Exact, 500i16),
            (255, Bound::Lower, -32000),
            (1, Bound::Upper, 0),
        ] {
            let entry = unpack(pack(depth, bound, mv, 77, score), 0);
            assert_eq!(entry.depth, depth);
            assert_eq!(entry.bound, bound);
            assert_eq!(entry.mv, mv);
            assert_eq!(entry.half_moves, 77);
            assert_eq!(entry.score, i32::from(score));
        }
    }

    #[test]
    fn test_sizes_are_powers_of_two() {
        assert_eq!(TranspositionTable::entries_for(1), 1 << 15);
        assert_eq!(TranspositionTable::entries_for(3), 1 << 16);
        assert_eq!(TranspositionTable::new(1).capacity(), 1 << 15);
    }

    #[test]
    fn test_store_and_probe() {
        let tt = TranspositionTable::new(1);
        let key = 0x1234_5678_9ABC_DEF0;
        let mv = some_move();

        tt.store(key, 0, 10, 500, Bound::Exact, mv, 4);

        let entry = tt.probe(key, 0).expect("should find entry");
        assert_eq!(entry.depth, 10);
        assert_eq!(entry.score, 500);
        assert_eq!(entry.bound, Bound::Exact);
        assert_eq!(entry.best_move(), Some(mv));
        assert_eq!(entry.half_moves, 4);
    }

    #[test]
    fn test_no_false_positives() {
        let tt = TranspositionTable::new(1);
        tt.store(0x1234_5678_9ABC_DEF0, 0, 10, 500, Bound::Exact, Move::null(), 1);
        // same index, different fragment
        assert!(tt.probe(0xFEDC_BA98_9ABC_DEF0, 0).is_none());
    }

    #[test]
    fn test_mate_scores_shift_with_ply() {
        let tt = TranspositionTable::new(1);
        let key = 0xDEAD_BEEF_0000_0001;
        // mate in 3 plies seen from ply 5
        let score = MATE_SCORE - 8;
        tt.store(key, 5, 6, score, Bound::Exact, Move::null(), 0);

        assert_eq!(tt.probe(key, 5).map(|e| e.score), Some(score));
        // reached again at ply 2 it is 3 plies closer to the root
        assert_eq!(tt.probe(key, 2).map(|e| e.score), Some(MATE_SCORE - 5));

        for s in [-MATE_SCORE + 10, 250, MATE_BOUND + 1] {
            assert_eq!(score_from_tt(score_to_tt(s, 7), 7), s);
        }
    }

    #[test]
    fn test_depth_slot_keeps_deeper_entry() {
        let tt = TranspositionTable::new(1);
        let key = 0x0101_0101_0000_0042;
        tt.store(key, 0, 12, 40, Bound::Exact, Move::null(), 8);
        tt.store(key, 0, 3, -15, Bound::Upper, Move::null(), 8);

        // the deep slot still holds depth 12 and wins the probe
        let entry = tt.probe(key, 0).expect("hit");
        assert_eq!((entry.depth, entry.score), (12, 40));

        // a new root position makes the deep entry stale
        tt.store(key, 0, 2, 7, Bound::Lower, Move::null(), 9);
        let entry = tt.probe(key, 0).expect("hit");
        assert_eq!((entry.depth, entry.score), (2, 7));
    }

    #[test]
    fn test_hashfull_and_clear() {
        let tt = TranspositionTable::new(1);
        assert_eq!(tt.hashfull(), 0);
        for i in 0..(tt.capacity() as u64 / 4) {
            tt.store((i << 32) | i, 0, 5, 0, Bound::Exact, Move::null(), 0);
        }
        // a quarter of each array filled
        assert_eq!(tt.hashfull(), 250);

        tt.clear();
        assert_eq!(tt.hashfull(), 0);
        assert!(tt.probe(1 << 32 | 1, 0).is_none());
    }

    #[test]
    fn test_entry_cutoffs() {
        let entry = TtEntry {
            depth: 4,
            bound: Bound::Lower,
            mv: Move::null(),
            half_moves: 0,
            score: 120,
        };
        assert!(entry.cuts(0, 100));
        assert!(!entry.cuts(0, 200));
        let upper = TtEntry { bound: Bound::Upper, ..entry };
        assert!(upper.cuts(150, 300));
        assert!(!upper.cuts(50, 300));
    }
}
