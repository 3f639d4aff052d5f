//! Move ordering: hash move, MVV-LVA captures, killers and history.

use super::constants::{
    CAPTURE_SCORE, HISTORY_MAX, KILLER1_SCORE, KILLER2_SCORE, TT_MOVE_SCORE,
};
use crate::board::types::{Color, Move, MoveList, ScoredMoveList, EMPTY_MOVE, MAX_PLY};

/// Quiet moves that caused a beta cutoff, two per ply.
pub struct KillerTable {
    slots: [[Move; 2]; MAX_PLY],
}

impl Default for KillerTable {
    fn default() -> Self {
        Self::new()
    }
}

impl KillerTable {
    #[must_use]
    pub fn new() -> Self {
        KillerTable {
            slots: [[EMPTY_MOVE; 2]; MAX_PLY],
        }
    }

    #[must_use]
    pub fn primary(&self, ply: usize) -> Move {
        self.slots.get(ply).map_or(EMPTY_MOVE, |row| row[0])
    }

    #[must_use]
    pub fn secondary(&self, ply: usize) -> Move {
        self.slots.get(ply).map_or(EMPTY_MOVE, |row| row[1])
    }

    pub fn update(&mut self, ply: usize, mv: Move) {
        let Some(row) = self.slots.get_mut(ply) else {
            return;
        };
        if row[0] != mv {
            row[1] = row[0];
            row[0] = mv;
        }
    }

    pub fn reset(&mut self) {
        self.slots = [[EMPTY_MOVE; 2]; MAX_PLY];
    }
}

/// Cutoff statistics for quiet moves, indexed by `[color][from][to]`.
pub struct HistoryTable {
    entries: Box<[[i32; 4096]; 2]>,
}

impl Default for HistoryTable {
    fn default() -> Self {
        Self::new()
    }
}

impl HistoryTable {
    #[must_use]
    pub fn new() -> Self {
        HistoryTable {
            entries: Box::new([[0; 4096]; 2]),
        }
    }

    #[inline]
    fn index(mv: Move) -> usize {
        mv.from().index() * 64 + mv.to().index()
    }

    #[must_use]
    pub fn score(&self, color: Color, mv: Move) -> i32 {
        self.entries[color.index()][Self::index(mv)]
    }

    /// Reward a quiet move that caused a beta cutoff at `depth`.
    pub fn update(&mut self, color: Color, mv: Move, depth: u32) {
        let bonus = (depth * depth) as i32;
        let entry = &mut self.entries[color.index()][Self::index(mv)];
        *entry = entry.saturating_add(bonus);
        if *entry >= HISTORY_MAX {
            self.decay();
        }
    }

    /// Halve every entry.
    pub fn decay(&mut self) {
        for entry in self.entries.iter_mut().flatten() {
            *entry /= 2;
        }
    }

    pub fn reset(&mut self) {
        for side in self.entries.iter_mut() {
            side.fill(0);
        }
    }
}

/// Most valuable victim first, least valuable attacker breaks ties.
///
/// Promotions count the promoted piece as part of the gain.
#[inline]
#[must_use]
pub fn mvv_lva(mv: Move) -> i32 {
    let victim = mv.captured().map_or(0, |p| p.value());
    let promotion = mv.promotion().map_or(0, |p| p.value());
    (victim + promotion) * 8 - mv.piece().index() as i32
}

/// Score `moves` for selection by `ScoredMoveList::pick_best`.
pub(crate) fn score_moves(
    moves: &MoveList,
    tt_move: Move,
    ply: usize,
    side: Color,
    killers: &KillerTable,
    history: &HistoryTable,
) -> ScoredMoveList {
    let killer1 = killers.primary(ply);
    let killer2 = killers.secondary(ply);

    let mut scored = ScoredMoveList::new();
    for &mv in moves {
        let score = if mv == tt_move {
            TT_MOVE_SCORE
        } else if mv.is_capture() || mv.is_promotion() {
            CAPTURE_SCORE + mvv_lva(mv)
        } else if mv == killer1 {
            KILLER1_SCORE
        } else if mv == killer2 {
            KILLER2_SCORE
        } else {
            history.score(side, mv)
        };
        scored.push(mv, score);
    }
    scored
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Position;

    #[test]
    fn killers_shift_and_ignore_duplicates() {
        let pos = Position::new();
        let moves = pos.legal_moves();
        let (a, b) = (moves[0], moves[1]);
        let mut killers = KillerTable::new();
        killers.update(3, a);
        killers.update(3, a);
        assert_eq!(killers.primary(3), a);
        assert_eq!(killers.secondary(3), EMPTY_MOVE);
        killers.update(3, b);
        assert_eq!((killers.primary(3), killers.secondary(3)), (b, a));
        killers.update(MAX_PLY + 5, a);
        assert_eq!(killers.primary(MAX_PLY + 5), EMPTY_MOVE);
    }

    #[test]
    fn mvv_lva_prefers_valuable_victims_and_cheap_attackers() {
        let pos: Position = "7k/8/2r1q3/3P4/8/8/8/3R3K w - - 0 1".parse().unwrap();
        let pxq = pos.parse_move("d5e6").unwrap();
        let pxr = pos.parse_move("d5c6").unwrap();
        assert!(mvv_lva(pxq) > mvv_lva(pxr));

        let pos: Position = "4k3/8/8/3q4/4P3/8/8/3RK3 w - - 0 1".parse().unwrap();
        let pawn_takes = pos.parse_move("e4d5").unwrap();
        let rook_takes = pos.parse_move("d1d5").unwrap();
        assert!(mvv_lva(pawn_takes) > mvv_lva(rook_takes));
    }

    #[test]
    fn ordering_puts_tt_move_first_and_captures_before_quiets() {
        let pos: Position = "4k3/8/8/3q4/4P3/8/8/3RK3 w - - 0 1".parse().unwrap();
        let moves = pos.legal_moves();
        let tt_move = pos.parse_move("e1f2").unwrap();
        let mut scored = score_moves(
            &moves,
            tt_move,
            0,
            Color::White,
            &KillerTable::new(),
            &HistoryTable::new(),
        );
        assert_eq!(scored.pick_best(0).map(|s| s.mv), Some(tt_move));
        assert_eq!(scored.pick_best(1).map(|s| s.mv), pos.parse_move("e4d5").ok());
        assert_eq!(scored.pick_best(2).map(|s| s.mv), pos.parse_move("d1d5").ok());
    }

    #[test]
    fn history_rewards_cutoffs() {
        let pos = Position::new();
        let mv = pos.legal_moves()[0];
        let mut history = HistoryTable::new();
        history.update(Color::White, mv, 4);
        assert_eq!(history.score(Color::White, mv), 16);
        assert_eq!(history.score(Color::Black, mv), 0);
        history.reset();
        assert_eq!(history.score(Color::White, mv), 0);
    }
}
