//! Ray walking used to build the slider tables.

pub(super) const BISHOP_DIRS: [(i8, i8); 4] = [(1, 1), (1, -1), (-1, 1), (-1, -1)];
pub(super) const ROOK_DIRS: [(i8, i8); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];

/// Squares reached stepping from `from` by `(dr, df)` until the board edge.
pub(super) fn walk(from: usize, dr: i8, df: i8) -> impl Iterator<Item = usize> {
    let mut r = (from / 8) as i8;
    let mut f = (from % 8) as i8;
    std::iter::from_fn(move || {
        r += dr;
        f += df;
        if (0..8).contains(&r) && (0..8).contains(&f) {
            Some(r as usize * 8 + f as usize)
        } else {
            None
        }
    })
}

/// Attack set found by walking each ray up to and including the first blocker.
pub(super) fn attacks_on_the_fly(square: usize, occupancy: u64, dirs: &[(i8, i8); 4]) -> u64 {
    let mut attacks = 0u64;
    for &(dr, df) in dirs {
        for sq in walk(square, dr, df) {
            attacks |= 1u64 << sq;
            if occupancy & (1u64 << sq) != 0 {
                break;
            }
        }
    }
    attacks
}

/// Occupancy bits that can change a slider's attack set: every ray square
/// except the last one before the edge.
pub(super) fn relevant_mask(square: usize, dirs: &[(i8, i8); 4]) -> u64 {
    let mut mask = 0u64;
    for &(dr, df) in dirs {
        let ray: Vec<usize> = walk(square, dr, df).collect();
        if let Some((_, inner)) = ray.split_last() {
            for &sq in inner {
                mask |= 1u64 << sq;
            }
        }
    }
    mask
}

/// The `index`-th subset of `mask`, bit i of `index` selecting the i-th mask square.
pub(super) fn set_occupancy(index: usize, mut mask: u64) -> u64 {
    let mut occupancy = 0u64;
    let mut i = 0;
    while mask != 0 {
        let sq = mask.trailing_zeros();
        mask &= mask - 1;
        if index & (1 << i) != 0 {
            occupancy |= 1u64 << sq;
        }
        i += 1;
    }
    occupancy
}
