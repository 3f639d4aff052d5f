use std::sync::atomic::{AtomicU64, Ordering};

/// Default number of evaluation cache slots.
const DEFAULT_EVAL_SLOTS: usize = 1 << 16;

struct EvalSlot {
    key_xor: AtomicU64,
    data: AtomicU64,
}

/// Direct-mapped cache of static scores keyed by the full position key.
///
/// Shared between search workers without locks. Each slot stores
/// `key ^ data` next to the data, so a torn read is rejected as a miss.
pub struct EvalCache {
    slots: Box<[EvalSlot]>,
    mask: usize,
}

impl EvalCache {
    /// Cache with at least `slots` entries, rounded down to a power of two.
    #[must_use]
    pub fn new(slots: usize) -> Self {
        let slots = slots.max(1);
        let len = 1usize << (usize::BITS - 1 - slots.leading_zeros());
        EvalCache {
            slots: (0..len)
                .map(|_| EvalSlot {
                    key_xor: AtomicU64::new(0),
                    data: AtomicU64::new(0),
                })
                .collect(),
            mask: len - 1,
        }
    }

    #[must_use]
    pub fn probe(&self, key: u64) -> Option<i32> {
        let slot = &self.slots[key as usize & self.mask];
        let data = slot.data.load(Ordering::Relaxed);
        let key_xor = slot.key_xor.load(Ordering::Relaxed);
        // data carries a tag bit so an empty slot never verifies
        (data != 0 && key_xor ^ data == key).then_some(data as u32 as i32)
    }

    pub fn store(&self, key: u64, score: i32) {
        let data = u64::from(score as u32) | (1 << 32);
        let slot = &self.slots[key as usize & self.mask];
        slot.data.store(data, Ordering::Relaxed);
        slot.key_xor.store(key ^ data, Ordering::Relaxed);
    }

    pub fn clear(&self) {
        for slot in self.slots.iter() {
            slot.data.store(0, Ordering::Relaxed);
            slot.key_xor.store(0, Ordering::Relaxed);
        }
    }
}

impl Default for EvalCache {
    fn default() -> Self {
        Self::new(DEFAULT_EVAL_SLOTS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stores_negative_scores() {
        let cache = EvalCache::new(64);
        cache.store(0xDEAD_BEEF, -250);
        assert_eq!(cache.probe(0xDEAD_BEEF), Some(-250));
    }

    #[test]
    fn aliasing_key_misses() {
        let cache = EvalCache::new(64);
        cache.store(0x40, 17);
        // same slot, different key
        assert_eq!(cache.probe(0x80), None);
        assert_eq!(cache.probe(0), None);
    }

    #[test]
    fn clear_empties_every_slot() {
        let cache = EvalCache::new(64);
        cache.store(7, 7);
        cache.clear();
        assert_eq!(cache.probe(7), None);
    }
}
