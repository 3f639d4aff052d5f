//! Draw detection tests.

use crate::board::Position;

fn apply_uci(pos: &mut Position, uci: &str) {
    pos.make_move_uci(uci).expect("uci move not legal");
}

#[test]
fn test_fen_halfmove_parsing() {
    let pos = Position::try_from_fen("8/8/8/8/8/8/8/K1k5 w - - 57 1").unwrap();
    assert_eq!(pos.halfmove_clock(), 57);
}

#[test]
fn test_fifty_move_rule_draw() {
    let pos = Position::try_from_fen("8/8/8/8/8/8/R7/K1k5 w - - 100 80").unwrap();
    assert!(pos.is_fifty_move_draw());
    assert!(pos.is_draw());
}

#[test]
fn test_halfmove_resets_on_pawn_move() {
    let mut pos = Position::try_from_fen("8/8/8/8/8/8/4P3/K1k5 w - - 99 70").unwrap();
    apply_uci(&mut pos, "e2e4");
    assert_eq!(pos.halfmove_clock(), 0);
    assert!(!pos.is_draw());
}

#[test]
fn test_halfmove_increments_on_quiet_piece_move() {
    let mut pos = Position::new();
    apply_uci(&mut pos, "g1f3");
    assert_eq!(pos.halfmove_clock(), 1);
    apply_uci(&mut pos, "b8c6");
    assert_eq!(pos.halfmove_clock(), 2);
}

#[test]
fn test_repetition() {
    let mut pos = Position::new();
    apply_uci(&mut pos, "g1f3");
    apply_uci(&mut pos, "g8f6");
    apply_uci(&mut pos, "f3g1");
    assert!(!pos.is_repetition());
    apply_uci(&mut pos, "f6g8");
    assert!(pos.is_repetition());
    assert!(pos.is_draw());
}

#[test]
fn test_repetition_not_seen_across_irreversible_move() {
    let mut pos = Position::new();
    for uci in ["e2e4", "e7e5", "g1f3", "g8f6", "f3g1", "f6g8"] {
        apply_uci(&mut pos, uci);
    }
    assert!(pos.is_repetition());

    let mut pos = Position::new();
    for uci in ["g1f3", "g8f6", "e2e4", "f6g8", "f3g1"] {
        apply_uci(&mut pos, uci);
    }
    assert!(!pos.is_repetition());
}

#[test]
fn test_insufficient_material_draw() {
    for fen in [
        "8/8/8/8/8/8/8/K1k5 w - - 0 1",
        "8/8/8/8/8/8/6N1/K1k5 w - - 0 1",
        "8/8/8/8/8/8/6b1/K1k5 w - - 0 1",
    ] {
        let pos = Position::try_from_fen(fen).unwrap();
        assert!(pos.is_insufficient_material(), "{fen}");
        assert!(pos.is_draw(), "{fen}");
    }
}

#[test]
fn test_sufficient_material_is_not_drawn() {
    for fen in [
        "8/8/8/8/8/8/6P1/K1k5 w - - 0 1",
        "8/8/8/8/8/8/6R1/K1k5 w - - 0 1",
        "8/8/8/8/8/8/5NN1/K1k5 w - - 0 1",
        "8/8/8/8/8/8/5Bb1/K1k5 w - - 0 1",
    ] {
        let pos = Position::try_from_fen(fen).unwrap();
        assert!(!pos.is_insufficient_material(), "{fen}");
        assert!(!pos.is_draw(), "{fen}");
    }
}

#[test]
fn test_unmake_restores_repetition_history() {
    let mut pos = Position::new();
    for uci in ["g1f3", "g8f6", "f3g1"] {
        apply_uci(&mut pos, uci);
    }
    let mv = pos.make_move_uci("f6g8").unwrap();
    assert!(pos.is_repetition());
    pos.unmake_move(mv);
    assert!(!pos.is_repetition());
    assert_eq!(pos.game_ply(), 3);
}

#[test]
fn test_checkmate_detected() {
    let pos = Position::try_from_fen("7k/7Q/7K/8/8/8/8/8 b - - 0 1").unwrap();
    assert!(pos.is_in_check());
    assert!(pos.is_checkmate(), "Black should be in checkmate");
    assert!(!pos.is_stalemate());
}

#[test]
fn test_fen_round_trip_normalized() {
    let fen = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";
    let pos = Position::try_from_fen(fen).unwrap();
    assert_eq!(pos.to_fen(), fen);
}
