//! Pawn hash table for caching pawn structure evaluation.
//!
//! Pawn structure only depends on pawn and king placement, so it is cached
//! under the position's pawn key. Pawns rarely move, so most probes during
//! a search hit.

use std::sync::atomic::{AtomicU64, Ordering};

/// Default pawn table size in kilobytes.
pub const DEFAULT_PAWN_HASH_KB: usize = 1024;

/// Cached pawn-structure score, white-relative.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PawnHashEntry {
    pub mg: i32,
    pub eg: i32,
}

/// Format: mg (i32) in lower 32 bits, eg (i32) in upper 32 bits
#[inline]
fn pack_entry(mg: i32, eg: i32) -> u64 {
    u64::from(mg as u32) | (u64::from(eg as u32) << 32)
}

#[inline]
fn unpack_entry(data: u64) -> PawnHashEntry {
    PawnHashEntry {
        mg: data as u32 as i32,
        eg: (data >> 32) as u32 as i32,
    }
}

/// Direct-mapped slot. `key_xor` holds `pawn_key ^ data`, so a torn read
/// fails verification.
struct PawnSlot {
    key_xor: AtomicU64,
    data: AtomicU64,
}

/// Thread-safe pawn hash table shared by all search workers.
pub struct PawnHashTable {
    slots: Box<[PawnSlot]>,
    mask: usize,
}

impl PawnHashTable {
    /// Create a pawn hash table of about `size_kb` kilobytes.
    #[must_use]
    pub fn new(size_kb: usize) -> Self {
        let wanted = (size_kb * 1024 / std::mem::size_of::<PawnSlot>()).max(1024);
        let len = 1usize << (usize::BITS - 1 - wanted.leading_zeros());
        let slots = (0..len)
            .map(|_| PawnSlot {
                key_xor: AtomicU64::new(0),
                data: AtomicU64::new(0),
            })
            .collect();
        PawnHashTable {
            slots,
            mask: len - 1,
        }
    }

    #[inline]
    fn slot(&self, pawn_key: u64) -> &PawnSlot {
        // high bits: the low bits of the pawn key also pick TT buckets
        &self.slots[(pawn_key >> 32) as usize & self.mask]
    }

    /// Probe the table for cached pawn structure evaluation.
    #[must_use]
    pub fn probe(&self, pawn_key: u64) -> Option<PawnHashEntry> {
        let slot = self.slot(pawn_key);
        let key_xor = slot.key_xor.load(Ordering::Relaxed);
        let data = slot.data.load(Ordering::Relaxed);
        (key_xor ^ data == pawn_key && key_xor != 0).then(|| unpack_entry(data))
    }

    /// Store pawn structure evaluation, replacing whatever shared the slot.
    pub fn store(&self, pawn_key: u64, mg: i32, eg: i32) {
        let packed = pack_entry(mg, eg);
        let slot = self.slot(pawn_key);
        slot.data.store(packed, Ordering::Relaxed);
        slot.key_xor.store(pawn_key ^ packed, Ordering::Relaxed);
    }

    /// Clear all entries from the table.
    pub fn clear(&self) {
        for slot in self.slots.iter() {
            slot.key_xor.store(0, Ordering::Relaxed);
            slot.data.store(0, Ordering::Relaxed);
        }
    }
}

impl Default for PawnHashTable {
    fn default() -> Self {
        Self::new(DEFAULT_PAWN_HASH_KB)
    }
}
