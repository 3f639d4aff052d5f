//! Magic bitboard tables for sliding pieces.
//!
//! Magic multipliers are searched at startup with a fixed-seed RNG. Every
//! candidate is checked against ray-walked attack sets for all relevant
//! occupancies, so a table is only accepted once it is collision-free
//! (constructive collisions mapping to the same attack set are allowed).

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::slider_rays::{attacks_on_the_fly, relevant_mask, set_occupancy};

const MAGIC_SEED: u64 = 0x9E37_79B9_7F4A_7C15;

#[derive(Clone, Copy, Default)]
struct MagicEntry {
    mask: u64,
    magic: u64,
    shift: u32,
    offset: usize,
}

pub(crate) struct MagicTable {
    entries: [MagicEntry; 64],
    attacks: Vec<u64>,
}

impl MagicTable {
    pub(super) fn build(dirs: &[(i8, i8); 4]) -> Self {
        let mut rng = StdRng::seed_from_u64(MAGIC_SEED);
        let mut entries = [MagicEntry::default(); 64];
        let mut attacks = Vec::new();

        for (square, entry) in entries.iter_mut().enumerate() {
            let mask = relevant_mask(square, dirs);
            let bits = mask.count_ones();
            let size = 1usize << bits;
            let occupancies: Vec<u64> = (0..size).map(|i| set_occupancy(i, mask)).collect();
            let reference: Vec<u64> = occupancies
                .iter()
                .map(|&occ| attacks_on_the_fly(square, occ, dirs))
                .collect();

            let shift = 64 - bits;
            let (magic, table) = find_magic(&mut rng, mask, shift, &occupancies, &reference);
            *entry = MagicEntry {
                mask,
                magic,
                shift,
                offset: attacks.len(),
            };
            attacks.extend_from_slice(&table);
        }

        MagicTable { entries, attacks }
    }

    #[inline]
    pub(crate) fn attacks(&self, square: usize, occupancy: u64) -> u64 {
        let entry = &self.entries[square];
        let index = ((occupancy & entry.mask).wrapping_mul(entry.magic) >> entry.shift) as usize;
        self.attacks[entry.offset + index]
    }
}

fn find_magic(
    rng: &mut StdRng,
    mask: u64,
    shift: u32,
    occupancies: &[u64],
    reference: &[u64],
) -> (u64, Vec<u64>) {
    let mut table = vec![0u64; occupancies.len()];
    loop {
        // sparse candidates converge much faster
        let magic = rng.gen::<u64>() & rng.gen::<u64>() & rng.gen::<u64>();
        if (mask.wrapping_mul(magic) & 0xFF00_0000_0000_0000).count_ones() < 6 {
            continue;
        }

        table.iter_mut().for_each(|slot| *slot = 0);
        let mut ok = true;
        for (&occ, &attack) in occupancies.iter().zip(reference) {
            let index = (occ.wrapping_mul(magic) >> shift) as usize;
            // slider attack sets are never empty, so 0 marks a free slot
            if table[index] == 0 {
                table[index] = attack;
            } else if table[index] != attack {
                ok = false;
                break;
            }
        }
        if ok {
            return (magic, table);
        }
    }
}
