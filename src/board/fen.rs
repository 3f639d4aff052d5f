use std::str::FromStr;

use super::attack_tables::pawn_attacks;
use super::error::{FenError, MoveParseError};
use super::types::{Bitboard, CastlingRights, Color, Move, Piece, Square};
use super::Position;

/// FEN of the standard starting position.
pub const START_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

impl Position {
    /// Parse a position from FEN notation.
    ///
    /// The halfmove clock and fullmove number are optional. When the
    /// fullmove number is missing it is estimated from how many pawns have
    /// left their starting squares.
    pub fn try_from_fen(fen: &str) -> Result<Self, FenError> {
        let mut pos = Position::empty();
        let parts: Vec<&str> = fen.split_whitespace().collect();

        if parts.len() < 4 {
            return Err(FenError::TooFewParts { found: parts.len() });
        }

        // Piece placement, rank 8 first
        let ranks: Vec<&str> = parts[0].split('/').collect();
        if ranks.len() != 8 {
            return Err(FenError::InvalidRank { rank: ranks.len() });
        }
        for (rank_idx, rank_str) in ranks.iter().enumerate() {
            let rank = 7 - rank_idx as u8;
            let mut file: usize = 0;
            for c in rank_str.chars() {
                if let Some(skip) = c.to_digit(10) {
                    file += skip as usize;
                    continue;
                }
                let piece = Piece::from_char(c).ok_or(FenError::InvalidPiece { char: c })?;
                let color = if c.is_ascii_uppercase() {
                    Color::White
                } else {
                    Color::Black
                };
                let sq = Square::new(rank, file as u8).ok_or(FenError::TooManyFiles {
                    rank: rank_idx,
                    files: file + 1,
                })?;
                if piece == Piece::Pawn && (rank == 0 || rank == 7) {
                    return Err(FenError::PawnOnBackRank { square: sq });
                }
                pos.place(color, piece, sq);
                file += 1;
            }
            match file {
                8 => {}
                f if f > 8 => return Err(FenError::TooManyFiles { rank: rank_idx, files: f }),
                f => return Err(FenError::TooFewFiles { rank: rank_idx, files: f }),
            }
        }

        for color in Color::BOTH {
            let count = pos.pieces(color, Piece::King).popcount();
            if count != 1 {
                return Err(FenError::InvalidKingCount { color, count });
            }
        }

        pos.side = match parts[1] {
            "w" => Color::White,
            "b" => Color::Black,
            other => {
                return Err(FenError::InvalidSideToMove {
                    found: other.to_string(),
                })
            }
        };

        let mut castling = CastlingRights::none();
        for c in parts[2].chars() {
            match c {
                'K' => castling.set(Color::White, true),
                'Q' => castling.set(Color::White, false),
                'k' => castling.set(Color::Black, true),
                'q' => castling.set(Color::Black, false),
                '-' => {}
                _ => return Err(FenError::InvalidCastling { char: c }),
            }
        }
        pos.castling = castling;

        pos.en_passant = if parts[3] == "-" {
            None
        } else {
            let invalid = || FenError::InvalidEnPassant {
                found: parts[3].to_string(),
            };
            let sq: Square = parts[3].parse().map_err(|_| invalid())?;
            let expected_rank = if pos.side == Color::White { 5 } else { 2 };
            if sq.rank() != expected_rank {
                return Err(invalid());
            }
            // dropped when no pawn can take, matching what make_move records
            let takers = pawn_attacks(pos.side.opponent(), sq) & pos.pieces(pos.side, Piece::Pawn);
            takers.is_nonempty().then_some(sq)
        };

        pos.halfmove_clock = match parts.get(4) {
            Some(field) => field.parse().map_err(|_| FenError::InvalidCounter {
                found: (*field).to_string(),
            })?,
            None => 0,
        };
        let black = u32::from(pos.side == Color::Black);
        pos.move_counter = match parts.get(5) {
            Some(field) => {
                let fullmove: u32 = field.parse().map_err(|_| FenError::InvalidCounter {
                    found: (*field).to_string(),
                })?;
                fullmove * 2 + black
            }
            None => pos.pawns_off_start_squares() * 2 + black,
        };

        pos.refresh();
        let them = pos.side.opponent();
        if pos.is_square_attacked(pos.king_square(them), pos.side, pos.occupied()) {
            return Err(FenError::OpponentInCheck);
        }
        Ok(pos)
    }

    fn pawns_off_start_squares(&self) -> u32 {
        let home = (self.pieces(Color::White, Piece::Pawn) & Bitboard::RANK_2).popcount()
            + (self.pieces(Color::Black, Piece::Pawn) & Bitboard::RANK_7).popcount();
        16 - home
    }

    /// Convert the position to FEN notation.
    #[must_use]
    pub fn to_fen(&self) -> String {
        let mut rows: Vec<String> = Vec::with_capacity(8);
        for rank in (0..8).rev() {
            let mut row = String::new();
            let mut empty = 0;
            for file in 0..8 {
                let sq = Square::from_index(rank * 8 + file);
                if let Some((color, piece)) = self.piece_at(sq) {
                    if empty > 0 {
                        row.push_str(&empty.to_string());
                        empty = 0;
                    }
                    row.push(piece.to_fen_char(color));
                } else {
                    empty += 1;
                }
            }
            if empty > 0 {
                row.push_str(&empty.to_string());
            }
            rows.push(row);
        }

        let active = if self.side == Color::White { "w" } else { "b" };
        let ep = self
            .en_passant
            .map_or_else(|| "-".to_string(), |sq| sq.to_string());

        format!(
            "{} {} {} {} {} {}",
            rows.join("/"),
            active,
            self.castling,
            ep,
            self.halfmove_clock,
            self.fullmove_number().max(1)
        )
    }

    /// Parse a move in coordinate notation (e.g., "e2e4", "e7e8q").
    ///
    /// Returns the matching legal move if found, or an error describing why parsing failed.
    ///
    /// # Example
    /// ```
    /// use chess_core::board::Position;
    ///
    /// let pos = Position::new();
    /// let mv = pos.parse_move("e2e4").unwrap();
    /// assert_eq!(mv.to_string(), "e2e4");
    /// ```
    pub fn parse_move(&self, uci: &str) -> Result<Move, MoveParseError> {
        if !uci.is_ascii() || uci.len() < 4 || uci.len() > 5 {
            return Err(MoveParseError::InvalidLength { len: uci.len() });
        }

        let invalid_square = || MoveParseError::InvalidSquare {
            notation: uci.to_string(),
        };
        let from_sq: Square = uci[0..2].parse().map_err(|_| invalid_square())?;
        let to_sq: Square = uci[2..4].parse().map_err(|_| invalid_square())?;

        let promotion = match uci[4..].chars().next() {
            Some(c) => match Piece::from_char(c) {
                Some(p) if !matches!(p, Piece::Pawn | Piece::King) => Some(p),
                _ => return Err(MoveParseError::InvalidPromotion { char: c }),
            },
            None => None,
        };

        self.legal_moves()
            .iter()
            .copied()
            .find(|m| m.from() == from_sq && m.to() == to_sq && m.promotion() == promotion)
            .ok_or_else(|| MoveParseError::IllegalMove {
                notation: uci.to_string(),
            })
    }

    /// Parse a coordinate move and make it on the board in one call.
    ///
    /// # Example
    /// ```
    /// use chess_core::board::Position;
    ///
    /// let mut pos = Position::new();
    /// pos.make_move_uci("e2e4").unwrap();
    /// pos.make_move_uci("e7e5").unwrap();
    /// ```
    pub fn make_move_uci(&mut self, uci: &str) -> Result<Move, MoveParseError> {
        let mv = self.parse_move(uci)?;
        self.make_move(mv);
        Ok(mv)
    }
}

impl FromStr for Position {
    type Err = FenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Position::try_from_fen(s)
    }
}
