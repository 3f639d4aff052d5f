//! Lazy SMP (Symmetric `MultiProcessing`) parallel search.
//!
//! All workers search the same root independently and share one
//! transposition table, which is the only coordination between them.
//! Helpers use their own killer and history tables and odd helpers search
//! one ply deeper, so their move orders drift apart and their TT entries
//! shortcut each other's trees.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::thread;

use log::{debug, warn};
use parking_lot::Mutex;

use super::{IterationCallback, IterationInfo, SearchLimits, SearchResult, Worker};
use crate::board::eval::Evaluator;
use crate::board::Position;
use crate::tt::TranspositionTable;

/// Search thread stack size (32 MB to handle deep recursion)
pub const SEARCH_STACK_SIZE: usize = 32 * 1024 * 1024;

/// State shared by every worker of one search session.
pub struct SharedSearch {
    pub(crate) tt: Arc<TranspositionTable>,
    pub(crate) evaluator: Arc<dyn Evaluator>,
    pub(crate) limits: SearchLimits,
    /// Nodes searched by all workers
    pub(crate) nodes: AtomicU64,
    /// Game half-move counter of the root, tags TT entries
    pub(crate) root_half_moves: u32,
    best: Mutex<Option<IterationInfo>>,
    on_iteration: Option<IterationCallback>,
}

impl SharedSearch {
    #[must_use]
    pub fn new(
        tt: Arc<TranspositionTable>,
        evaluator: Arc<dyn Evaluator>,
        limits: SearchLimits,
        root_half_moves: u32,
    ) -> Self {
        SharedSearch {
            tt,
            evaluator,
            limits,
            nodes: AtomicU64::new(0),
            root_half_moves,
            best: Mutex::new(None),
            on_iteration: None,
        }
    }

    /// Report every accepted iteration to `callback`.
    #[must_use]
    pub fn with_callback(mut self, callback: IterationCallback) -> Self {
        self.on_iteration = Some(callback);
        self
    }

    #[must_use]
    pub fn limits(&self) -> &SearchLimits {
        &self.limits
    }

    /// Nodes searched so far by all workers.
    #[must_use]
    pub fn nodes(&self) -> u64 {
        self.nodes.load(Ordering::Relaxed)
    }

    /// Transposition table usage in per mille.
    #[must_use]
    pub fn hashfull(&self) -> u32 {
        self.tt.hashfull()
    }

    /// Latest accepted iteration.
    #[must_use]
    pub fn best(&self) -> Option<IterationInfo> {
        self.best.lock().clone()
    }

    /// Offer a completed iteration. The main worker's iterations always
    /// replace the current one; a helper's only when it is deeper.
    ///
    /// Updates are serialized by the lock so workers never interleave.
    pub(crate) fn publish(&self, worker_id: usize, info: IterationInfo) {
        let mut best = self.best.lock();
        let accept = worker_id == 0 || best.as_ref().is_none_or(|b| info.depth > b.depth);
        if !accept {
            return;
        }
        if let Some(callback) = &self.on_iteration {
            callback(&info);
        }
        *best = Some(info);
    }
}

/// Depth offset for a worker: odd helpers search one ply deeper.
fn worker_depth_offset(worker_id: usize) -> u32 {
    (worker_id % 2) as u32
}

/// Run a search of `pos` with `threads` workers and return the final result.
///
/// Worker 0 runs on the calling thread; helpers run on scoped threads and
/// are stopped once worker 0 finishes. When no iteration completed the
/// first legal move is returned so the caller always has a move to play.
pub fn smp_search(pos: &Position, shared: &Arc<SharedSearch>, threads: usize) -> SearchResult {
    let threads = threads.max(1);
    let root_moves = pos.legal_moves();

    let mut main = Worker::new(0, pos.clone(), Arc::clone(shared));

    thread::scope(|scope| {
        for worker_id in 1..threads {
            let mut helper = Worker::new(worker_id, pos.clone(), Arc::clone(shared));
            let spawned = thread::Builder::new()
                .name(format!("search-{worker_id}"))
                .stack_size(SEARCH_STACK_SIZE)
                .spawn_scoped(scope, move || {
                    helper.iterative_deepening(worker_depth_offset(worker_id));
                });
            if let Err(err) = spawned {
                warn!("could not start search helper {worker_id}: {err}");
                break;
            }
        }

        main.iterative_deepening(0);
        // helpers have no deadline of their own
        shared.limits.stop.stop();
    });

    let best = shared.best();
    let best_move = best
        .as_ref()
        .and_then(IterationInfo::best_move)
        .or_else(|| root_moves.get(0));
    let ponder_move = best
        .as_ref()
        .and_then(IterationInfo::ponder_move)
        .or_else(|| best_move.and_then(|mv| main.ponder_move_after(mv)));

    let result = SearchResult {
        best_move,
        ponder_move,
        score: best.as_ref().map_or(0, |b| b.score),
        depth: best.as_ref().map_or(0, |b| b.depth),
        nodes: shared.nodes(),
    };
    debug!("search finished with {threads} thread(s): {result}");
    result
}
