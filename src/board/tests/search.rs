//! Search algorithm tests.
//!
//! Alpha-beta is checked against a plain minimax over the same tree, then
//! the full driver against tactical positions.

use std::sync::Arc;

use crate::board::eval::{DefaultEvaluator, Evaluator};
use crate::board::search::{search, SearchLimits, SearchResult, SharedSearch, Worker, MATE_SCORE};
use crate::board::Position;
use crate::tt::TranspositionTable;

/// Full window for root calls.
const WINDOW: i32 = MATE_SCORE + 1;

const POSITIONS: &[&str] = &[
    "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1",
    "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
    "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1",
    "r2q1rk1/pP1p2pp/Q4n2/bbp1p3/Np6/1B3NBn/pPPP1PPP/R3K2R b KQ - 0 1",
    "6k1/5ppp/8/8/8/8/8/R5K1 w - - 0 1",
    "8/8/8/8/8/8/6N1/K1k5 w - - 0 1",
];

/// Plain minimax with the same terminal rules as the real search.
fn minimax(pos: &mut Position, eval: &dyn Evaluator, depth: u32, ply: usize) -> i32 {
    if ply > 0 && pos.is_draw() {
        return 0;
    }
    if depth == 0 {
        return eval.evaluate(pos);
    }
    let moves = pos.legal_moves();
    if moves.is_empty() {
        return if pos.is_in_check() {
            -MATE_SCORE + ply as i32
        } else {
            0
        };
    }
    let mut best = -WINDOW;
    for &mv in &moves {
        pos.make_move(mv);
        best = best.max(-minimax(pos, eval, depth - 1, ply + 1));
        pos.unmake_move(mv);
    }
    best
}

fn shared_for(pos: &Position, limits: SearchLimits) -> Arc<SharedSearch> {
    Arc::new(SharedSearch::new(
        Arc::new(TranspositionTable::new(1)),
        Arc::new(DefaultEvaluator::new()),
        limits,
        pos.move_counter(),
    ))
}

fn run(fen: &str, depth: u32) -> SearchResult {
    let pos = Position::try_from_fen(fen).unwrap();
    search(
        &pos,
        Arc::new(TranspositionTable::new(1)),
        Arc::new(DefaultEvaluator::new()),
        SearchLimits::depth(depth),
    )
}

// ============================================================================
// Alpha-beta against minimax
// ============================================================================

#[test]
fn alphabeta_matches_minimax() {
    let eval = DefaultEvaluator::new();
    for fen in POSITIONS {
        let mut pos = Position::try_from_fen(fen).unwrap();
        for depth in 1..=3 {
            let expected = minimax(&mut pos, &eval, depth, 0);

            let shared = shared_for(&pos, SearchLimits::depth(depth));
            let mut worker = Worker::new(0, pos.clone(), shared).without_quiescence();
            let score = worker.negamax(depth, -WINDOW, WINDOW, 0);

            assert_eq!(score, expected, "depth {depth} on {fen}");
            assert_eq!(worker.position(), &pos);

            let best = worker.root_best;
            assert!(pos.legal_moves().contains(best), "depth {depth} on {fen}");
            pos.make_move(best);
            let best_value = -minimax(&mut pos, &eval, depth - 1, 1);
            pos.unmake_move(best);
            assert_eq!(best_value, expected, "best move {best} at depth {depth} on {fen}");
        }
    }
}

#[test]
fn alphabeta_visits_fewer_nodes_than_minimax() {
    let fen = POSITIONS[1];
    let pos = Position::try_from_fen(fen).unwrap();
    let mut brute = pos.clone();
    let leaves = brute.perft(3);

    let shared = shared_for(&pos, SearchLimits::depth(3));
    let mut worker = Worker::new(0, pos, shared).without_quiescence();
    worker.negamax(3, -WINDOW, WINDOW, 0);
    assert!(worker.nodes() < leaves, "{} nodes vs {leaves} leaves", worker.nodes());
}

// ============================================================================
// Driver
// ============================================================================

#[test]
fn search_finds_mate_in_one() {
    let result = run("6k1/5ppp/8/8/8/8/8/4Q2K w - - 0 1", 3);
    assert_eq!(result.best_move.map(|m| m.to_string()).as_deref(), Some("e1e8"));
    assert_eq!(result.score, MATE_SCORE - 1);
}

#[test]
fn search_handles_stalemate() {
    let result = run("k7/8/1QK5/8/8/8/8/8 b - - 0 1", 4);
    assert_eq!(result.best_move, None);
    assert_eq!(result.score, 0);
}

#[test]
fn search_returns_none_for_checkmate_position() {
    let result = run("rnb1kbnr/pppp1ppp/4p3/8/6Pq/5P2/PPPPP2P/RNBQKBNR w KQkq - 0 1", 4);
    assert_eq!(result.best_move, None);
}

#[test]
fn search_avoids_checkmate() {
    let mut pos = Position::try_from_fen("7k/8/8/8/8/5q2/4P3/4K3 w - - 0 1").unwrap();
    let result = search(
        &pos,
        Arc::new(TranspositionTable::new(1)),
        Arc::new(DefaultEvaluator::new()),
        SearchLimits::depth(4),
    );
    let mv = result.best_move.expect("a move exists");
    pos.make_move(mv);
    assert!(!pos.is_checkmate());
}

#[test]
fn search_captures_hanging_queen() {
    let result = run("4k3/8/8/3q4/8/8/8/3QK3 w - - 0 1", 3);
    assert_eq!(result.best_move.map(|m| m.to_string()).as_deref(), Some("d1d5"));
}

#[test]
fn search_finds_knight_fork() {
    // Nd6+ hits king, queen and rook
    let result = run("4k3/8/8/1q3r2/2N5/8/8/4K3 w - - 0 1", 4);
    assert_eq!(result.best_move.map(|m| m.to_string()).as_deref(), Some("c4d6"));
}

#[test]
fn search_with_node_limit() {
    let pos = Position::new();
    let limits = SearchLimits {
        node_limit: 2_000,
        ..SearchLimits::depth(30)
    };
    let result = search(
        &pos,
        Arc::new(TranspositionTable::new(1)),
        Arc::new(DefaultEvaluator::new()),
        limits,
    );
    assert!(result.best_move.is_some(), "Should find a move with node limit");
    assert!(result.depth < 30);
}

#[test]
fn search_extracts_ponder_move() {
    let result = run(POSITIONS[0], 4);
    let best = result.best_move.expect("best move");
    let ponder = result.ponder_move.expect("ponder move after depth 4");
    let mut pos = Position::new();
    pos.make_move(best);
    assert!(pos.legal_moves().contains(ponder));
}

#[test]
fn search_respects_stop_flag() {
    let pos = Position::new();
    let limits = SearchLimits::depth(30);
    limits.stop.stop();
    let result = search(
        &pos,
        Arc::new(TranspositionTable::new(1)),
        Arc::new(DefaultEvaluator::new()),
        limits,
    );
    // no iteration completed, but a legal move is still reported
    assert_eq!(result.depth, 0);
    assert!(pos.legal_moves().contains(result.best_move.expect("fallback move")));
}
