//! Static evaluation.
//!
//! Search only needs `Evaluator::evaluate`; the default implementation adds
//! mobility, pawn structure and king safety on top of the incrementally
//! maintained material + piece-square score.

mod cache;
mod default;
mod masks;
mod tables;
mod terms;

use std::fmt;

use super::pst::taper;
use super::types::Color;
use super::Position;

pub use cache::EvalCache;
pub use default::DefaultEvaluator;

/// Scores a position for the search.
pub trait Evaluator: Send + Sync {
    /// Score in centipawns from the side to move's point of view.
    fn evaluate(&self, pos: &Position) -> i32;

    /// Per-component scores, for diagnostics.
    fn breakdown(&self, pos: &Position) -> EvalBreakdown;

    /// Drop any cached state (new game).
    fn clear(&self) {}
}

/// Middlegame / endgame pair, white-relative.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Term {
    pub mg: i32,
    pub eg: i32,
}

impl Term {
    #[must_use]
    pub const fn new(mg: i32, eg: i32) -> Self {
        Term { mg, eg }
    }

    /// Blend by game phase.
    #[must_use]
    pub fn tapered(self, phase: i32) -> i32 {
        taper(self.mg, self.eg, phase)
    }
}

impl From<(i32, i32)> for Term {
    fn from((mg, eg): (i32, i32)) -> Self {
        Term { mg, eg }
    }
}

impl std::ops::Add for Term {
    type Output = Term;

    fn add(self, rhs: Term) -> Term {
        Term::new(self.mg + rhs.mg, self.eg + rhs.eg)
    }
}

/// Component scores of one static evaluation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct EvalBreakdown {
    pub material: Term,
    /// Piece-square tables, without material
    pub position: Term,
    pub mobility: Term,
    pub pawns: Term,
    pub king_safety: Term,
    pub phase: i32,
    pub side_to_move: Option<Color>,
}

impl EvalBreakdown {
    /// Tapered sum of all terms, white-relative.
    #[must_use]
    pub fn total(&self) -> i32 {
        let sum = self.material + self.position + self.mobility + self.pawns + self.king_safety;
        sum.tapered(self.phase)
    }
}

impl fmt::Display for EvalBreakdown {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{:<12} | {:>7} | {:>7} | {:>7}", "Term", "MG", "EG", "Total")?;
        writeln!(f, "{}", "-".repeat(43))?;
        let rows = [
            ("Material", self.material),
            ("Position", self.position),
            ("Mobility", self.mobility),
            ("Pawns", self.pawns),
            ("King safety", self.king_safety),
        ];
        for (name, term) in rows {
            writeln!(
                f,
                "{:<12} | {:>7} | {:>7} | {:>7}",
                name,
                term.mg,
                term.eg,
                term.tapered(self.phase)
            )?;
        }
        writeln!(f, "{}", "-".repeat(43))?;
        writeln!(f, "Phase: {}/24", self.phase.clamp(0, 24))?;
        write!(f, "Total (white): {}", self.total())?;
        if let Some(side) = self.side_to_move {
            write!(f, "  ({side} to move: {})", side.sign() * self.total())?;
        }
        Ok(())
    }
}
