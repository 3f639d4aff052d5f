//! Search module implementing alpha-beta with iterative deepening.
//!
//! Features:
//! - Iterative deepening, each completed depth replacing the previous result
//! - Fail-soft negamax with transposition table cutoffs
//! - Quiescence search with futility and SEE pruning
//! - Move ordering (TT move, MVV-LVA, killers, history)
//! - Lazy SMP parallel search sharing one transposition table

mod constants;
mod iterative;
mod move_order;
mod negamax;
mod quiescence;
pub mod smp;

use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::Mutex;

use super::{Move, Position};
use crate::board::eval::Evaluator;
use crate::sync::StopFlag;
use crate::tt::TranspositionTable;

pub use constants::{MATE_BOUND, MATE_SCORE, MAX_DEPTH};
pub use move_order::{mvv_lva, HistoryTable, KillerTable};
pub use negamax::Worker;
pub use smp::{smp_search, SharedSearch};

/// Deadlines of a running search.
///
/// `soft` is checked by iterative deepening between depths, `hard` by the
/// timer thread and as a backstop inside the search. Both are cleared while
/// pondering and re-armed on ponder hit.
pub struct SearchClock {
    start: Instant,
    deadlines: Mutex<(Option<Instant>, Option<Instant>)>,
}

impl SearchClock {
    #[must_use]
    pub fn new(start: Instant, soft: Option<Instant>, hard: Option<Instant>) -> Self {
        SearchClock {
            start,
            deadlines: Mutex::new((soft, hard)),
        }
    }

    /// No deadlines, starting now.
    #[must_use]
    pub fn unlimited() -> Self {
        Self::new(Instant::now(), None, None)
    }

    #[must_use]
    pub fn start(&self) -> Instant {
        self.start
    }

    #[must_use]
    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    pub fn set_deadlines(&self, soft: Option<Instant>, hard: Option<Instant>) {
        *self.deadlines.lock() = (soft, hard);
    }

    #[must_use]
    pub fn hard_deadline(&self) -> Option<Instant> {
        self.deadlines.lock().1
    }

    #[must_use]
    pub fn soft_expired(&self) -> bool {
        self.deadlines.lock().0.is_some_and(|d| Instant::now() >= d)
    }

    #[must_use]
    pub fn hard_expired(&self) -> bool {
        self.deadlines.lock().1.is_some_and(|d| Instant::now() >= d)
    }
}

/// Limits shared by every worker of one search session.
#[derive(Clone)]
pub struct SearchLimits {
    pub max_depth: u32,
    /// 0 = unlimited
    pub node_limit: u64,
    pub clock: Arc<SearchClock>,
    pub stop: StopFlag,
}

impl SearchLimits {
    /// Fixed depth, no clock.
    #[must_use]
    pub fn depth(max_depth: u32) -> Self {
        SearchLimits {
            max_depth: max_depth.clamp(1, MAX_DEPTH),
            node_limit: 0,
            clock: Arc::new(SearchClock::unlimited()),
            stop: StopFlag::new(),
        }
    }
}

/// Snapshot of one completed iteration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IterationInfo {
    pub depth: u32,
    pub seldepth: u32,
    /// Side-to-move relative, mate scores encode distance in plies
    pub score: i32,
    pub nodes: u64,
    pub nps: u64,
    pub hashfull: u32,
    pub time_ms: u64,
    pub pv: Vec<Move>,
}

impl IterationInfo {
    #[must_use]
    pub fn best_move(&self) -> Option<Move> {
        self.pv.first().copied()
    }

    #[must_use]
    pub fn ponder_move(&self) -> Option<Move> {
        self.pv.get(1).copied()
    }

    /// Moves to mate, negative when getting mated.
    #[must_use]
    pub fn mate_in(&self) -> Option<i32> {
        mate_in(self.score)
    }

    #[must_use]
    pub fn pv_string(&self) -> String {
        self.pv
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Full moves to mate for a mate score, negative when the side to move is mated.
#[must_use]
pub fn mate_in(score: i32) -> Option<i32> {
    if score > MATE_BOUND {
        Some((MATE_SCORE - score + 1) / 2)
    } else if score < -MATE_BOUND {
        Some(-(MATE_SCORE + score) / 2)
    } else {
        None
    }
}

/// Callback type for per-iteration reports.
pub type IterationCallback = Arc<dyn Fn(&IterationInfo) + Send + Sync>;

/// Final result of a search session.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SearchResult {
    /// `None` only when the root has no legal move
    pub best_move: Option<Move>,
    /// The expected opponent reply
    pub ponder_move: Option<Move>,
    pub score: i32,
    pub depth: u32,
    pub nodes: u64,
}

impl fmt::Display for SearchResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.best_move {
            Some(mv) => write!(f, "{mv}")?,
            None => write!(f, "(none)")?,
        }
        write!(f, " score {} depth {} nodes {}", self.score, self.depth, self.nodes)
    }
}

/// Single-threaded search of `pos` with its own limits.
///
/// Convenience wrapper over `smp_search` with one worker.
pub fn search(
    pos: &Position,
    tt: Arc<TranspositionTable>,
    evaluator: Arc<dyn Evaluator>,
    limits: SearchLimits,
) -> SearchResult {
    let shared = Arc::new(SharedSearch::new(tt, evaluator, limits, pos.move_counter()));
    smp_search(pos, &shared, 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mate_in_counts_full_moves() {
        assert_eq!(mate_in(MATE_SCORE - 1), Some(1));
        assert_eq!(mate_in(MATE_SCORE - 3), Some(2));
        assert_eq!(mate_in(-MATE_SCORE + 2), Some(-1));
        assert_eq!(mate_in(150), None);
    }

    #[test]
    fn clock_deadlines() {
        let now = Instant::now();
        let clock = SearchClock::new(now, Some(now), None);
        assert!(clock.soft_expired());
        assert!(!clock.hard_expired());
        clock.set_deadlines(None, Some(now + Duration::from_secs(60)));
        assert!(!clock.soft_expired());
        assert!(!clock.hard_expired());
    }
}
