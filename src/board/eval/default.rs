use crate::board::Position;
use crate::pawn_hash::PawnHashTable;

use super::{EvalBreakdown, EvalCache, Evaluator, Term};

/// Hand-written evaluator: incremental material and piece-square score plus
/// mobility, pawn structure and king safety.
///
/// Pawn structure is cached under the pawn key, complete scores under the
/// full key. Both caches are lock-free and can be shared by all workers.
#[derive(Default)]
pub struct DefaultEvaluator {
    pawn_hash: PawnHashTable,
    cache: EvalCache,
}

impl DefaultEvaluator {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn pawn_term(&self, pos: &Position) -> Term {
        let key = pos.pawn_hash();
        if let Some(hit) = self.pawn_hash.probe(key) {
            return Term::new(hit.mg, hit.eg);
        }
        let (mg, eg) = pos.eval_pawn_structure();
        self.pawn_hash.store(key, mg, eg);
        Term::new(mg, eg)
    }
}

impl Evaluator for DefaultEvaluator {
    fn evaluate(&self, pos: &Position) -> i32 {
        if let Some(score) = self.cache.probe(pos.hash()) {
            return score;
        }

        let sum = Term::new(pos.psqt_mg, pos.psqt_eg)
            + pos.eval_mobility().into()
            + self.pawn_term(pos)
            + pos.eval_king_safety().into();
        let score = pos.side_to_move().sign() * sum.tapered(pos.game_phase());

        self.cache.store(pos.hash(), score);
        score
    }

    fn breakdown(&self, pos: &Position) -> EvalBreakdown {
        let material: Term = pos.eval_material().into();
        EvalBreakdown {
            material,
            position: Term::new(pos.psqt_mg - material.mg, pos.psqt_eg - material.eg),
            mobility: pos.eval_mobility().into(),
            pawns: self.pawn_term(pos),
            king_safety: pos.eval_king_safety().into(),
            phase: pos.game_phase(),
            side_to_move: Some(pos.side_to_move()),
        }
    }

    fn clear(&self) {
        self.pawn_hash.clear();
        self.cache.clear();
    }
}
