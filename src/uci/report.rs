//! Formatting of search events as UCI output lines.

use crate::board::search::{mate_in, IterationInfo};
use crate::board::Move;
use crate::engine::Progress;

fn score_field(score: i32) -> String {
    match mate_in(score) {
        Some(moves) => format!("mate {moves}"),
        None => format!("cp {score}"),
    }
}

#[must_use]
pub fn format_iteration(info: &IterationInfo) -> String {
    let mut line = format!(
        "info depth {} seldepth {} score {} nodes {} nps {} hashfull {} time {}",
        info.depth,
        info.seldepth,
        score_field(info.score),
        info.nodes,
        info.nps,
        info.hashfull,
        info.time_ms
    );
    if !info.pv.is_empty() {
        line.push_str(" pv ");
        line.push_str(&info.pv_string());
    }
    line
}

#[must_use]
pub fn format_progress(progress: &Progress) -> String {
    format!(
        "info nodes {} nps {} hashfull {} time {}",
        progress.nodes, progress.nps, progress.hashfull, progress.time_ms
    )
}

#[must_use]
pub fn format_bestmove(best: Option<Move>, ponder: Option<Move>, show_ponder: bool) -> String {
    match (best, ponder) {
        (Some(best), Some(ponder)) if show_ponder => format!("bestmove {best} ponder {ponder}"),
        (Some(best), _) => format!("bestmove {best}"),
        (None, _) => "bestmove (none)".to_string(),
    }
}
