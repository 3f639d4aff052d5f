use std::collections::HashSet;
use std::sync::atomic::Ordering;

use log::debug;

use super::constants::{INFINITY, MAX_DEPTH};
use super::{IterationInfo, Worker};
use crate::board::types::EMPTY_MOVE;
use crate::board::Move;

impl Worker {
    /// Iterative deepening from depth 1 to the session's maximum, shifted by
    /// `depth_offset` for helper threads. No iteration goes past the maximum.
    ///
    /// Each completed iteration is offered to the shared result; an iteration
    /// cut short by the stop flag is thrown away. Only the main worker (id 0)
    /// honours the soft deadline.
    pub fn iterative_deepening(&mut self, depth_offset: u32) {
        let max_depth = self.shared.limits.max_depth.min(MAX_DEPTH);
        if self.pos.legal_moves().is_empty() {
            return;
        }

        let mut last_depth = 0;
        for depth in 1..=max_depth {
            let search_depth = (depth + depth_offset).min(max_depth);
            if search_depth == last_depth {
                break;
            }
            last_depth = search_depth;
            self.root_best = EMPTY_MOVE;
            self.seldepth = 0;

            let score = self.negamax(search_depth, -INFINITY, INFINITY, 0);
            if self.should_stop() || self.root_best.is_null() {
                break;
            }
            self.flush_nodes();

            let info = self.iteration_info(search_depth, score);
            debug!(
                "worker {} depth {} score {} nodes {} pv {}",
                self.id,
                info.depth,
                info.score,
                info.nodes,
                info.pv_string()
            );
            self.shared.publish(self.id, info);

            if self.id == 0 && self.shared.limits.clock.soft_expired() {
                break;
            }
        }
        self.flush_nodes();
    }

    fn iteration_info(&mut self, depth: u32, score: i32) -> IterationInfo {
        let clock = &self.shared.limits.clock;
        let time_ms = clock.elapsed().as_millis() as u64;
        let nodes = self.shared.nodes.load(Ordering::Relaxed);
        IterationInfo {
            depth,
            seldepth: self.seldepth as u32,
            score,
            nodes,
            nps: if time_ms > 0 { nodes * 1000 / time_ms } else { nodes },
            hashfull: self.shared.tt.hashfull(),
            time_ms,
            pv: self.extract_pv(self.root_best, depth as usize),
        }
    }

    /// Principal variation: `first`, then the TT's best moves.
    ///
    /// Every TT move is checked against the legal move list, and the walk
    /// stops on a repeated key so a cycle of colliding entries ends.
    pub(crate) fn extract_pv(&mut self, first: Move, max_len: usize) -> Vec<Move> {
        let mut pv = Vec::with_capacity(max_len);
        let mut seen = HashSet::new();
        let mut mv = first;

        while pv.len() < max_len.max(1) && !mv.is_null() && seen.insert(self.pos.hash()) {
            if !self.pos.legal_moves().contains(mv) {
                break;
            }
            pv.push(mv);
            self.pos.make_move(mv);
            mv = self
                .shared
                .tt
                .probe(self.pos.hash(), 0)
                .map_or(EMPTY_MOVE, |entry| entry.mv);
        }

        for &played in pv.iter().rev() {
            self.pos.unmake_move(played);
        }
        pv
    }

    /// Expected reply to `best`, from the TT entry of the position after it.
    pub(crate) fn ponder_move_after(&mut self, best: Move) -> Option<Move> {
        let pv = self.extract_pv(best, 2);
        pv.get(1).copied()
    }
}
