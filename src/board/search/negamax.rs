//! Fail-soft negamax with alpha-beta pruning.

use std::sync::atomic::Ordering;
use std::sync::Arc;

use super::constants::{INFINITY, MATE_SCORE, NODE_CHECK_INTERVAL};
use super::move_order::{score_moves, HistoryTable, KillerTable};
use super::smp::SharedSearch;
use crate::board::types::{EMPTY_MOVE, MAX_PLY};
use crate::board::{Move, Position};
use crate::tt::Bound;

/// One search thread: a private position copy and ordering tables, plus the
/// state shared with the other workers.
pub struct Worker {
    pub(crate) id: usize,
    pub(crate) pos: Position,
    pub(crate) shared: Arc<SharedSearch>,
    pub(crate) killers: KillerTable,
    pub(crate) history: HistoryTable,
    /// Nodes not yet added to the shared counter
    pending_nodes: u64,
    pub(crate) nodes: u64,
    pub(crate) seldepth: usize,
    pub(crate) root_best: Move,
    quiescence: bool,
}

impl Worker {
    #[must_use]
    pub fn new(id: usize, pos: Position, shared: Arc<SharedSearch>) -> Self {
        Worker {
            id,
            pos,
            shared,
            killers: KillerTable::new(),
            history: HistoryTable::new(),
            pending_nodes: 0,
            nodes: 0,
            seldepth: 0,
            root_best: EMPTY_MOVE,
            quiescence: true,
        }
    }

    /// Evaluate horizon nodes statically instead of running quiescence.
    #[must_use]
    pub fn without_quiescence(mut self) -> Self {
        self.quiescence = false;
        self
    }

    #[must_use]
    pub fn position(&self) -> &Position {
        &self.pos
    }

    #[must_use]
    pub fn nodes(&self) -> u64 {
        self.nodes
    }

    /// Cooperative stop: the shared flag on every call, the hard deadline and
    /// node limit every `NODE_CHECK_INTERVAL` nodes.
    #[inline]
    pub(crate) fn should_stop(&self) -> bool {
        self.shared.limits.stop.is_stopped()
    }

    #[inline]
    pub(crate) fn count_node(&mut self, ply: usize) {
        self.nodes += 1;
        self.pending_nodes += 1;
        if ply > self.seldepth {
            self.seldepth = ply;
        }
        if self.pending_nodes >= NODE_CHECK_INTERVAL {
            self.flush_nodes();
            let limits = &self.shared.limits;
            let total = self.shared.nodes.load(Ordering::Relaxed);
            if limits.clock.hard_expired() || (limits.node_limit > 0 && total >= limits.node_limit)
            {
                limits.stop.stop();
            }
        }
    }

    pub(crate) fn flush_nodes(&mut self) {
        self.shared.nodes.fetch_add(self.pending_nodes, Ordering::Relaxed);
        self.pending_nodes = 0;
    }

    #[inline]
    pub(crate) fn evaluate(&self) -> i32 {
        self.shared.evaluator.evaluate(&self.pos)
    }

    /// Search to `depth` plies, returning a score from the side to move's
    /// point of view. Returns 0 once stopped; callers discard that value.
    pub fn negamax(&mut self, depth: u32, mut alpha: i32, beta: i32, ply: usize) -> i32 {
        if self.should_stop() {
            return 0;
        }
        self.count_node(ply);

        if ply > 0 && self.pos.is_draw() {
            return 0;
        }
        if ply >= MAX_PLY - 1 {
            return self.evaluate();
        }

        let key = self.pos.hash();
        let mut tt_move = EMPTY_MOVE;
        if let Some(entry) = self.shared.tt.probe(key, ply) {
            tt_move = entry.mv;
            if ply > 0 && u32::from(entry.depth) >= depth && entry.cuts(alpha, beta) {
                return entry.score;
            }
        }

        if depth == 0 {
            return if self.quiescence {
                self.quiesce(alpha, beta, ply)
            } else {
                self.evaluate()
            };
        }

        let moves = self.pos.legal_moves();
        if moves.is_empty() {
            return if self.pos.is_in_check() {
                -MATE_SCORE + ply as i32
            } else {
                0
            };
        }

        let side = self.pos.side_to_move();
        let mut scored = score_moves(&moves, tt_move, ply, side, &self.killers, &self.history);

        let original_alpha = alpha;
        let mut best_score = -INFINITY;
        let mut best_move = EMPTY_MOVE;

        let mut idx = 0;
        while let Some(entry) = scored.pick_best(idx) {
            idx += 1;
            let mv = entry.mv;

            self.pos.make_move(mv);
            let score = -self.negamax(depth - 1, -beta, -alpha, ply + 1);
            self.pos.unmake_move(mv);

            if self.should_stop() {
                return 0;
            }

            if score > best_score {
                best_score = score;
                best_move = mv;
                if ply == 0 {
                    self.root_best = mv;
                }
                if score > alpha {
                    alpha = score;
                    if score >= beta {
                        if !mv.is_capture() && !mv.is_promotion() {
                            self.killers.update(ply, mv);
                            self.history.update(side, mv, depth);
                        }
                        break;
                    }
                }
            }
        }

        let bound = if best_score >= beta {
            Bound::Lower
        } else if best_score > original_alpha {
            Bound::Exact
        } else {
            Bound::Upper
        };
        self.shared.tt.store(
            key,
            ply,
            depth,
            best_score,
            bound,
            best_move,
            self.shared.root_half_moves,
        );

        best_score
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::eval::DefaultEvaluator;
    use crate::board::search::SearchLimits;
    use crate::tt::TranspositionTable;

    fn worker(fen: &str) -> Worker {
        let pos: Position = fen.parse().unwrap();
        let shared = Arc::new(SharedSearch::new(
            Arc::new(TranspositionTable::new(1)),
            Arc::new(DefaultEvaluator::new()),
            SearchLimits::depth(8),
            pos.move_counter(),
        ));
        Worker::new(0, pos, shared)
    }

    #[test]
    fn mated_side_scores_minus_mate_at_ply() {
        // fool's mate, white to move and mated
        let mut w = worker("rnb1kbnr/pppp1ppp/8/4p3/6Pq/5P2/PPPPP2P/RNBQKBNR w KQkq - 1 3");
        assert_eq!(w.negamax(3, -INFINITY, INFINITY, 0), -MATE_SCORE);
    }

    #[test]
    fn stalemate_scores_zero() {
        let mut w = worker("7k/5Q2/6K1/8/8/8/8/8 b - - 0 1");
        assert_eq!(w.negamax(3, -INFINITY, INFINITY, 0), 0);
    }

    #[test]
    fn finds_back_rank_mate() {
        let mut w = worker("6k1/5ppp/8/8/8/8/8/R5K1 w - - 0 1");
        let score = w.negamax(3, -INFINITY, INFINITY, 0);
        assert_eq!(score, MATE_SCORE - 1);
        assert_eq!(w.root_best.to_string(), "a1a8");
    }

    #[test]
    fn stopped_search_returns_sentinel() {
        let mut w = worker("6k1/5ppp/8/8/8/8/8/R5K1 w - - 0 1");
        w.shared.limits.stop.stop();
        assert_eq!(w.negamax(3, -INFINITY, INFINITY, 0), 0);
        assert_eq!(w.nodes(), 0);
    }

    #[test]
    fn position_is_restored_after_search() {
        let mut w = worker("r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1");
        let before = w.position().to_fen();
        let key = w.position().hash();
        w.negamax(3, -INFINITY, INFINITY, 0);
        assert_eq!(w.position().to_fen(), before);
        assert_eq!(w.position().hash(), key);
    }
}
