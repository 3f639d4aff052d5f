//! Search tests to verify the engine finds correct moves in various positions.

use std::sync::Arc;
use std::time::Instant;

use chess_core::board::eval::{DefaultEvaluator, Evaluator};
use chess_core::board::search::{search, SearchLimits, SearchResult, MATE_SCORE};
use chess_core::board::Position;
use chess_core::TranspositionTable;

fn search_fen(fen: &str, depth: u32) -> (Position, SearchResult) {
    let pos = Position::try_from_fen(fen).expect("valid FEN");
    let result = search(
        &pos,
        Arc::new(TranspositionTable::new(4)),
        Arc::new(DefaultEvaluator::new()),
        SearchLimits::depth(depth),
    );
    (pos, result)
}

fn best_uci(result: &SearchResult) -> Option<String> {
    result.best_move.map(|m| m.to_string())
}

/// Test that the engine finds a simple mate in 1
#[test]
fn finds_mate_in_one_back_rank() {
    // White to move, Qe8# is mate
    let (_, result) = search_fen("6k1/5ppp/8/8/8/8/8/4Q2K w - - 0 1", 4);
    assert_eq!(
        best_uci(&result).as_deref(),
        Some("e1e8"),
        "Should find Qe8# (back rank mate)"
    );
    assert_eq!(result.score, MATE_SCORE - 1);
}

/// Test that the engine finds a simple mate in 1 with queen
#[test]
fn finds_mate_in_one_queen() {
    // White to move, Qxf7# is mate
    let (_, result) = search_fen(
        "r1bqkb1r/pppp1ppp/2n2n2/4p2Q/2B1P3/8/PPPP1PPP/RNB1K1NR w KQkq - 0 4",
        4,
    );
    assert_eq!(
        best_uci(&result).as_deref(),
        Some("h5f7"),
        "Should find Qxf7# (scholar's mate)"
    );
}

/// Test that the engine avoids giving away material
#[test]
fn avoids_hanging_queen() {
    let (_, result) = search_fen(
        "r1bqkbnr/pppppppp/2n5/8/4P3/5Q2/PPPP1PPP/RNB1KBNR w KQkq - 0 3",
        4,
    );
    let uci = best_uci(&result).expect("Should find a move");
    assert_ne!(uci, "f3c6", "Should not hang the queen on c6");
}

#[test]
fn iterative_deepening_consistency() {
    let (pos, shallow) = search_fen(chess_core::board::START_FEN, 2);
    let (_, deep) = search_fen(chess_core::board::START_FEN, 4);
    let moves = pos.legal_moves();
    assert!(moves.contains(shallow.best_move.expect("Should find move at depth 2")));
    assert!(moves.contains(deep.best_move.expect("Should find move at depth 4")));
    assert_eq!(shallow.depth, 2);
    assert_eq!(deep.depth, 4);
}

#[test]
fn forced_single_reply_is_played() {
    // Only Kh2 escapes the rook check
    let (_, result) = search_fen("8/8/8/8/8/5k2/8/r6K w - - 0 1", 3);
    assert_eq!(best_uci(&result).as_deref(), Some("h1h2"));
}

#[test]
fn no_move_in_checkmate() {
    let (pos, result) = search_fen(
        "rnb1kbnr/pppp1ppp/4p3/8/6Pq/5P2/PPPPP2P/RNBQKBNR w KQkq - 0 1",
        4,
    );
    assert!(pos.is_checkmate(), "Position should be checkmate");
    assert!(result.best_move.is_none(), "Should return None for checkmate position");
}

#[test]
fn evaluation_symmetry() {
    let eval = DefaultEvaluator::new().evaluate(&Position::new());
    assert!(eval.abs() < 50, "Starting position should be roughly equal (eval: {eval})");
}

#[test]
fn evaluation_material_advantage() {
    let evaluator = DefaultEvaluator::new();
    let white_up =
        Position::try_from_fen("rnb1kbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1").unwrap();
    let black_up =
        Position::try_from_fen("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNB1KBNR w KQkq - 0 1").unwrap();
    let black_up_black_to_move =
        Position::try_from_fen("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNB1KBNR b KQkq - 0 1").unwrap();

    let eval_white_up = evaluator.evaluate(&white_up);
    let eval_black_up = evaluator.evaluate(&black_up);
    assert!(eval_white_up > 800, "White up a queen should be very positive (eval: {eval_white_up})");
    assert!(eval_black_up < -800, "Black up a queen should be very negative (eval: {eval_black_up})");
    // scores are relative to the side to move
    assert!(evaluator.evaluate(&black_up_black_to_move) > 800);
}

#[test]
fn search_completes_at_depth_6() {
    let start = Instant::now();
    let (_, result) = search_fen(chess_core::board::START_FEN, 6);
    let elapsed = start.elapsed();
    assert!(result.best_move.is_some(), "Should find a move at depth 6");
    assert!(elapsed.as_secs() < 60, "Search at depth 6 took too long: {elapsed:?}");
}
