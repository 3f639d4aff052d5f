//! Precomputed attack tables for leaper pieces and square-pair rays.

use once_cell::sync::Lazy;

use super::slider_rays;

const KNIGHT_DELTAS: [(i8, i8); 8] = [
    (2, 1),
    (1, 2),
    (-1, 2),
    (-2, 1),
    (-2, -1),
    (-1, -2),
    (1, -2),
    (2, -1),
];

const KING_DELTAS: [(i8, i8); 8] = [
    (1, 0),
    (-1, 0),
    (0, 1),
    (0, -1),
    (1, 1),
    (1, -1),
    (-1, 1),
    (-1, -1),
];

fn leaper_table(deltas: &[(i8, i8)]) -> [u64; 64] {
    let mut attacks = [0u64; 64];
    for (sq, slot) in attacks.iter_mut().enumerate() {
        let r = (sq / 8) as i8;
        let f = (sq % 8) as i8;
        let mut mask = 0u64;
        for &(dr, df) in deltas {
            let nr = r + dr;
            let nf = f + df;
            if (0..8).contains(&nr) && (0..8).contains(&nf) {
                mask |= 1u64 << (nr as usize * 8 + nf as usize);
            }
        }
        *slot = mask;
    }
    attacks
}

pub(crate) static KNIGHT_ATTACKS: Lazy<[u64; 64]> =
    Lazy::new(|| leaper_table(&KNIGHT_DELTAS));

pub(crate) static KING_ATTACKS: Lazy<[u64; 64]> =
    Lazy::new(|| leaper_table(&KING_DELTAS));

/// `PAWN_ATTACKS[color][sq]`: squares a pawn of `color` on `sq` attacks.
pub(crate) static PAWN_ATTACKS: Lazy<[[u64; 64]; 2]> =
    Lazy::new(|| [leaper_table(&[(1, -1), (1, 1)]), leaper_table(&[(-1, -1), (-1, 1)])]);

/// Squares strictly between two squares sharing a rank, file or diagonal.
/// Empty for unaligned or adjacent pairs.
pub(crate) static BETWEEN: Lazy<Box<[[u64; 64]; 64]>> = Lazy::new(|| {
    let mut table = Box::new([[0u64; 64]; 64]);
    for from in 0..64 {
        for (dr, df) in KING_DELTAS {
            let mut path = 0u64;
            for to in slider_rays::walk(from, dr, df) {
                table[from][to] = path;
                path |= 1u64 << to;
            }
        }
    }
    table
});

/// Full board line through two aligned squares (both included). Empty when unaligned.
pub(crate) static LINE: Lazy<Box<[[u64; 64]; 64]>> = Lazy::new(|| {
    let mut table = Box::new([[0u64; 64]; 64]);
    for from in 0..64 {
        for (dr, df) in KING_DELTAS {
            let mut line = 1u64 << from;
            for sq in slider_rays::walk(from, dr, df) {
                line |= 1u64 << sq;
            }
            for sq in slider_rays::walk(from, -dr, -df) {
                line |= 1u64 << sq;
            }
            for to in slider_rays::walk(from, dr, df) {
                table[from][to] = line;
            }
        }
    }
    table
});
