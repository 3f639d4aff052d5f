//! Evaluation weights.
//!
//! All values are (middlegame, endgame) centipawns unless noted.

// ============================================================================
// MOBILITY TABLES
// ============================================================================

/// Knight mobility bonus (0-8 squares)
pub(crate) const KNIGHT_MOB_MG: [i32; 9] = [-28, -14, -2, 4, 8, 12, 17, 21, 25];
pub(crate) const KNIGHT_MOB_EG: [i32; 9] = [-28, -18, -8, 0, 6, 10, 14, 18, 22];

/// Bishop mobility bonus (0-13 squares)
pub(crate) const BISHOP_MOB_MG: [i32; 14] = [-30, -18, -8, 0, 6, 12, 17, 21, 24, 27, 29, 31, 33, 35];
pub(crate) const BISHOP_MOB_EG: [i32; 14] = [-30, -18, -8, 0, 6, 10, 14, 17, 20, 22, 24, 26, 28, 30];

/// Rook mobility bonus (0-14 squares)
pub(crate) const ROOK_MOB_MG: [i32; 15] = [-14, -8, -3, 0, 3, 6, 9, 12, 14, 16, 18, 20, 21, 22, 23];
pub(crate) const ROOK_MOB_EG: [i32; 15] = [-28, -16, -8, 0, 6, 12, 17, 21, 25, 28, 31, 34, 36, 38, 40];

/// Queen mobility bonus (0-27 squares)
pub(crate) const QUEEN_MOB_MG: [i32; 28] = [
    -14, -10, -6, -3, 0, 2, 4, 6, 8, 10, 11, 12, 13, 14, 15, 16, 16, 17, 17, 18, 18, 19, 19, 20,
    20, 20, 21, 21,
];
pub(crate) const QUEEN_MOB_EG: [i32; 28] = [
    -28, -18, -10, -4, 0, 4, 8, 11, 14, 17, 19, 21, 23, 25, 26, 27, 28, 29, 30, 31, 32, 32, 33, 33,
    34, 34, 35, 35,
];

// ============================================================================
// PAWN STRUCTURE
// ============================================================================

pub(crate) const DOUBLED_PAWN: (i32, i32) = (-10, -20);
pub(crate) const ISOLATED_PAWN: (i32, i32) = (-7, -9);
/// Extra penalty when no enemy pawn is in front of the isolated pawn
pub(crate) const ISOLATED_OPEN: (i32, i32) = (-9, 0);
pub(crate) const BACKWARD_PAWN: (i32, i32) = (-6, -4);

/// Passed pawn bonus by relative rank
pub(crate) const PASSED_PAWN_MG: [i32; 8] = [0, 5, 10, 20, 35, 60, 100, 0];
pub(crate) const PASSED_PAWN_EG: [i32; 8] = [0, 10, 20, 40, 70, 120, 200, 0];

/// Defended or side-by-side pawn bonus by relative rank
pub(crate) const CONNECTED_MG: [i32; 8] = [0, 0, 5, 8, 12, 20, 35, 0];
pub(crate) const CONNECTED_EG: [i32; 8] = [0, 0, 3, 5, 8, 12, 20, 0];

// ============================================================================
// KING SAFETY (middlegame only)
// ============================================================================

/// Attack units per piece hitting the king zone, [piece]
pub(crate) const ATTACK_WEIGHTS: [i32; 6] = [0, 2, 2, 3, 5, 0];

/// King shield bonus per pawn
pub(crate) const KING_SHIELD_BONUS: i32 = 8;

/// Open and semi-open files next to the king
pub(crate) const KING_OPEN_FILE: i32 = -25;
pub(crate) const KING_SEMI_OPEN_FILE: i32 = -15;

/// Penalty cap for accumulated attack units
pub(crate) const MAX_KING_DANGER: i32 = 500;
