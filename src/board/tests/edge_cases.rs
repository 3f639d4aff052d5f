//! Edge case tests for special chess positions and moves.

use std::str::FromStr;

use crate::board::{
    Color, FenError, GenMode, Move, MoveKind, MoveList, Piece, Position, Square,
};

fn sq(name: &str) -> Square {
    name.parse().expect("valid square")
}

fn pos(fen: &str) -> Position {
    Position::try_from_fen(fen).expect("valid FEN")
}

#[test]
fn test_stalemate_position() {
    let pos = pos("7k/5Q2/6K1/8/8/8/8/8 b - - 0 1");
    assert!(!pos.is_checkmate());
    assert!(pos.is_stalemate());
    assert!(pos.legal_moves().is_empty());
}

#[test]
fn test_underpromotions_available() {
    let mut pos = pos("8/P7/8/8/8/8/8/K1k5 w - - 0 1");
    let moves = pos.legal_moves();

    for piece in [Piece::Knight, Piece::Bishop, Piece::Rook, Piece::Queen] {
        assert!(
            moves.iter().any(|m| m.promotion() == Some(piece)),
            "{piece:?} promotion should be available"
        );
    }

    let knight_promo = pos.parse_move("a7a8n").unwrap();
    pos.make_move(knight_promo);
    assert_eq!(pos.piece_at(sq("a8")), Some((Color::White, Piece::Knight)));
}

#[test]
fn test_en_passant_removes_correct_pawn() {
    let mut pos = pos("rnbqkbnr/ppp1pppp/8/3pP3/8/8/PPPP1PPP/RNBQKBNR w KQkq d6 0 1");
    let ep = pos
        .legal_moves()
        .iter()
        .copied()
        .find(|m| m.is_en_passant())
        .expect("En passant should be available");

    pos.make_move(ep);
    assert!(pos.piece_at(sq("d5")).is_none(), "Captured pawn should be removed");
    assert_eq!(
        pos.piece_at(sq("d6")),
        Some((Color::White, Piece::Pawn)),
        "Capturing pawn should be on d6"
    );

    pos.unmake_move(ep);
    assert_eq!(pos.piece_at(sq("d5")), Some((Color::Black, Piece::Pawn)));
    assert_eq!(pos.piece_at(sq("e5")), Some((Color::White, Piece::Pawn)));
}

#[test]
fn test_en_passant_exposing_king_is_illegal() {
    // Both pawns leave the fifth rank, opening the rook onto the king
    let pos = pos("8/8/8/KPp4r/8/8/8/7k w - c6 0 1");
    assert_eq!(pos.en_passant(), Some(sq("c6")));
    assert!(!pos.legal_moves().iter().any(|m| m.is_en_passant()));
}

#[test]
fn test_en_passant_square_dropped_without_capturer() {
    let pos = pos("rnbqkbnr/ppp1pppp/8/3p4/8/8/PPPPPPPP/RNBQKBNR w KQkq d6 0 2");
    assert_eq!(pos.en_passant(), None);
}

#[test]
fn test_castling_blocked_by_check() {
    let pos = pos("r3k2r/8/8/8/4Q3/8/8/R3K2R b KQkq - 0 1");
    assert!(
        !pos.legal_moves().iter().any(|m| m.is_castling()),
        "Castling should not be available when in check"
    );
}

#[test]
fn test_castling_through_attacked_square() {
    // f1 and g1 are covered by the rook on f8, queenside stays open
    let pos = pos("r4rk1/8/8/8/8/8/8/R3K2R w KQ - 0 1");
    let castles: Vec<String> = pos
        .legal_moves()
        .iter()
        .filter(|m| m.is_castling())
        .map(ToString::to_string)
        .collect();
    assert_eq!(castles, vec!["e1c1".to_string()]);
}

#[test]
fn test_double_check_only_king_can_move() {
    let pos = pos("4k3/8/8/1b6/8/8/3r4/3K4 w - - 0 1");
    let moves = pos.legal_moves();
    assert!(!moves.is_empty());
    for mv in &moves {
        assert_eq!(mv.from(), sq("d1"), "Only the king can move in check here");
    }
}

#[test]
fn test_knight_check_allows_capture_of_checker() {
    let pos = pos("4k3/8/8/8/8/5n2/8/3QK2R w K - 0 1");
    assert!(pos.is_in_check());
    let moves: Vec<String> = pos.legal_moves().iter().map(ToString::to_string).collect();
    assert!(moves.contains(&"d1f3".to_string()));
    assert!(!moves.contains(&"e1g1".to_string()));
}

#[test]
fn test_pinned_piece_moves_along_pin() {
    let pos = pos("4r1k1/8/8/8/8/8/4R3/4K3 w - - 0 1");
    assert!(pos.pinned(Color::White).contains(sq("e2")));
    for mv in pos.legal_moves().iter().filter(|m| m.from() == sq("e2")) {
        assert_eq!(mv.to().file(), 4, "pinned rook left the file with {mv}");
    }
}

#[test]
fn test_attacks_mode_in_check_is_evasions_only() {
    let pos = pos("4k3/8/8/8/8/5n2/8/3QK2R w K - 0 1");
    let mut list = MoveList::new();
    pos.generate(GenMode::Attacks, &mut list);
    let captures: Vec<String> = list.iter().map(ToString::to_string).collect();
    assert_eq!(captures, vec!["d1f3".to_string()]);
}

#[test]
fn test_checkmate_back_rank() {
    let mut pos = pos("6k1/5ppp/8/8/8/8/8/R5K1 w - - 0 1");
    let mate = pos.parse_move("a1a8").expect("a1a8 is legal");
    pos.make_move(mate);
    assert!(pos.is_checkmate());
}

#[test]
fn test_fen_parsing_errors() {
    assert!(matches!(
        Position::try_from_fen("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR"),
        Err(FenError::TooFewParts { found: 1 })
    ));
    assert!(matches!(
        Position::try_from_fen("rnbxkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1"),
        Err(FenError::InvalidPiece { char: 'x' })
    ));
    assert!(
        Position::try_from_fen("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR x KQkq - 0 1").is_err()
    );
    assert!(
        Position::try_from_fen("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w XYZ - 0 1").is_err()
    );
    assert!(Position::try_from_fen("8/8/8/8/8/8/8/K7 w - - 0 1").is_err());
}

#[test]
fn test_square_parsing() {
    assert_eq!(Square::from_str("a1").unwrap(), Square::from_index(0));
    assert_eq!(Square::from_str("h8").unwrap(), Square::from_index(63));
    assert_eq!(Square::from_str("e4").unwrap(), Square::new(3, 4).unwrap());

    assert!(Square::from_str("i1").is_err());
    assert!(Square::from_str("a9").is_err());
    assert!(Square::from_str("").is_err());
    assert!(Square::from_str("a").is_err());
    assert!(Square::new(8, 0).is_none());
    assert!(Square::new(0, 8).is_none());
}

#[test]
fn test_move_packing() {
    let quiet = Move::encode(sq("g1"), sq("f3"), Piece::Knight, None, MoveKind::Normal);
    assert!(quiet.is_quiet());
    assert_eq!(quiet.piece(), Piece::Knight);
    assert_eq!(quiet.to_string(), "g1f3");

    let double_pawn = Move::encode(sq("e2"), sq("e4"), Piece::Pawn, None, MoveKind::DoublePush);
    assert!(double_pawn.is_quiet());
    assert!(double_pawn.is_double_pawn_push());

    let promo_cap = Move::encode(
        sq("a7"),
        sq("b8"),
        Piece::Pawn,
        Some(Piece::Rook),
        MoveKind::Promotion(Piece::Queen),
    );
    assert!(!promo_cap.is_quiet());
    assert!(promo_cap.is_capture());
    assert_eq!(promo_cap.captured(), Some(Piece::Rook));
    assert_eq!(promo_cap.promotion(), Some(Piece::Queen));
    assert_eq!(promo_cap.to_string(), "a7b8q");
    assert_eq!(Move::from_u32(promo_cap.as_u32()), promo_cap);

    let ep = Move::encode(
        sq("e5"),
        sq("f6"),
        Piece::Pawn,
        Some(Piece::Pawn),
        MoveKind::EnPassant,
    );
    assert!(ep.is_capture());
    assert!(ep.is_en_passant());

    assert!(Move::null().is_null());
}

#[test]
fn test_position_from_str() {
    let pos: Position = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1"
        .parse()
        .unwrap();
    assert_eq!(pos.side_to_move(), Color::White);
    assert_eq!(pos, Position::new());

    let result: Result<Position, _> = "invalid fen".parse();
    assert!(result.is_err());
}
