//! Search constants.

// ============================================================================
// SCORES
// ============================================================================

/// Score of being mated at the root; mate in `n` plies scores `MATE_SCORE - n`.
pub const MATE_SCORE: i32 = 32000;

/// Scores beyond this magnitude are mate scores and shift with ply in the TT.
pub const MATE_BOUND: i32 = 30000;

/// Window bound outside every reachable score.
pub(crate) const INFINITY: i32 = MATE_SCORE + 1;

/// Default iterative deepening ceiling.
pub const MAX_DEPTH: u32 = 64;

// ============================================================================
// MOVE ORDERING PRIORITIES
// ============================================================================
// Higher scores are tried first: TT move > captures > killers > history.

/// Hash move from the transposition table
pub(crate) const TT_MOVE_SCORE: i32 = 1 << 24;

/// Base for captures and promotions, MVV-LVA is added on top
pub(crate) const CAPTURE_SCORE: i32 = 1 << 20;

/// First killer (latest quiet cutoff at this ply)
pub(crate) const KILLER1_SCORE: i32 = 1 << 19;

/// Second killer
pub(crate) const KILLER2_SCORE: i32 = KILLER1_SCORE - 1;

/// History scores saturate here, below the killers
pub(crate) const HISTORY_MAX: i32 = 1 << 18;

// ============================================================================
// QUIESCENCE
// ============================================================================

/// A capture is futile when stand-pat plus victim plus this margin misses alpha
pub(crate) const QS_FUTILITY_MARGIN: i32 = 100;

// ============================================================================
// POLLING
// ============================================================================

/// Nodes between node-count flushes and hard deadline checks
pub(crate) const NODE_CHECK_INTERVAL: u64 = 1024;
