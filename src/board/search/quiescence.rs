use super::constants::{INFINITY, MATE_SCORE, QS_FUTILITY_MARGIN};
use super::move_order::mvv_lva;
use super::Worker;
use crate::board::types::{Piece, ScoredMoveList, MAX_PLY};

impl Worker {
    /// Quiescence search: resolve captures before trusting the static score.
    ///
    /// Out of check only captures and queen promotions are searched, pruned by
    /// futility and by SEE. In check every evasion is searched so mates at the
    /// horizon are found.
    pub(crate) fn quiesce(&mut self, mut alpha: i32, beta: i32, ply: usize) -> i32 {
        if self.should_stop() {
            return 0;
        }
        self.count_node(ply);

        if ply >= MAX_PLY - 1 {
            return self.evaluate();
        }

        if self.pos.is_in_check() {
            return self.quiesce_evasions(alpha, beta, ply);
        }

        let stand_pat = self.evaluate();
        if stand_pat >= beta {
            return stand_pat;
        }
        alpha = alpha.max(stand_pat);
        let mut best_score = stand_pat;

        let moves = self.pos.capture_moves();
        let mut scored = ScoredMoveList::new();
        for &mv in &moves {
            scored.push(mv, mvv_lva(mv));
        }

        let mut idx = 0;
        while let Some(entry) = scored.pick_best(idx) {
            idx += 1;
            let mv = entry.mv;

            match mv.promotion() {
                Some(Piece::Queen) => {}
                Some(_) => continue,
                None => {
                    let victim = mv.captured().map_or(0, Piece::value);
                    if stand_pat + QS_FUTILITY_MARGIN + victim < alpha {
                        continue;
                    }
                }
            }
            if self.pos.see(mv) <= 0 {
                continue;
            }

            self.pos.make_move(mv);
            let score = -self.quiesce(-beta, -alpha, ply + 1);
            self.pos.unmake_move(mv);

            if self.should_stop() {
                return 0;
            }
            if score > best_score {
                best_score = score;
                if score >= beta {
                    return score;
                }
                alpha = alpha.max(score);
            }
        }

        best_score
    }

    fn quiesce_evasions(&mut self, mut alpha: i32, beta: i32, ply: usize) -> i32 {
        let moves = self.pos.legal_moves();
        if moves.is_empty() {
            return -MATE_SCORE + ply as i32;
        }

        let mut scored = ScoredMoveList::new();
        for &mv in &moves {
            scored.push(mv, mvv_lva(mv));
        }

        let mut best_score = -INFINITY;
        let mut idx = 0;
        while let Some(entry) = scored.pick_best(idx) {
            idx += 1;
            let mv = entry.mv;

            self.pos.make_move(mv);
            let score = -self.quiesce(-beta, -alpha, ply + 1);
            self.pos.unmake_move(mv);

            if self.should_stop() {
                return 0;
            }
            if score > best_score {
                best_score = score;
                if score >= beta {
                    return score;
                }
                alpha = alpha.max(score);
            }
        }

        best_score
    }
}
