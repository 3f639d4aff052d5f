use super::super::attack_tables::{bishop_attacks, pawn_attacks, rook_attacks};
use super::super::types::{
    Bitboard, Color, Move, MoveKind, MoveList, Piece, Square, PROMOTION_PIECES,
};
use super::super::Position;
use super::{GenContext, GenMode};

/// Square one step ahead of `sq` for a pawn of `color`.
#[inline]
fn advance(sq: Square, color: Color) -> Square {
    match color {
        Color::White => Square::from_index(sq.index() + 8),
        Color::Black => Square::from_index(sq.index() - 8),
    }
}

impl Position {
    /// Pushes, captures, promotions and en passant. `evasion` is the set of
    /// check-resolving squares (all squares when not in check).
    pub(super) fn gen_pawn_moves(&self, ctx: &GenContext, evasion: Bitboard, list: &mut MoveList) {
        let us = ctx.us;
        let empty = !self.all_occupied;
        let enemies = self.occupied[ctx.them.index()];

        for from in self.pieces(us, Piece::Pawn).iter() {
            let pin = ctx.pin_mask(from);
            let one = advance(from, us);
            let promoting = one.relative_rank(us) == 7;

            if empty.contains(one) {
                if (evasion & pin).contains(one) {
                    if promoting {
                        self.push_promotions(from, one, list);
                    } else if ctx.mode == GenMode::Moves {
                        list.push(self.make_move_record(from, one, Piece::Pawn, MoveKind::Normal));
                    }
                }
                if ctx.mode == GenMode::Moves && from.relative_rank(us) == 1 {
                    let two = advance(one, us);
                    if empty.contains(two) && (evasion & pin).contains(two) {
                        list.push(self.make_move_record(from, two, Piece::Pawn, MoveKind::DoublePush));
                    }
                }
            }

            let attacks = pawn_attacks(us, from);
            for to in (attacks & enemies & ctx.targets & pin).iter() {
                if promoting {
                    self.push_promotions(from, to, list);
                } else {
                    list.push(self.make_move_record(from, to, Piece::Pawn, MoveKind::Normal));
                }
            }

            if let Some(ep) = self.en_passant {
                if attacks.contains(ep) && self.en_passant_is_legal(ctx, from, ep) {
                    list.push(Move::encode(
                        from,
                        ep,
                        Piece::Pawn,
                        Some(Piece::Pawn),
                        MoveKind::EnPassant,
                    ));
                }
            }
        }
    }

    fn push_promotions(&self, from: Square, to: Square, list: &mut MoveList) {
        for promo in PROMOTION_PIECES {
            list.push(self.make_move_record(from, to, Piece::Pawn, MoveKind::Promotion(promo)));
        }
    }

    /// En passant removes two pawns from one rank at once, so pins alone
    /// cannot decide it. Replay the occupancy change and look for sliders
    /// hitting the king; a knight check, or a pawn check from anything but
    /// the captured pawn, is never resolved by it.
    fn en_passant_is_legal(&self, ctx: &GenContext, from: Square, ep: Square) -> bool {
        let victim = Square::from_index(ep.index() ^ 8);
        let them = &self.pieces[ctx.them.index()];

        let leaper_checkers = self.checkers
            & !Bitboard::from_square(victim)
            & (them[Piece::Knight.index()] | them[Piece::Pawn.index()]);
        if leaper_checkers.is_nonempty() {
            return false;
        }

        let occ = (self.all_occupied ^ Bitboard::from_square(from) ^ Bitboard::from_square(victim))
            | Bitboard::from_square(ep);
        let diag = them[Piece::Bishop.index()] | them[Piece::Queen.index()];
        let straight = them[Piece::Rook.index()] | them[Piece::Queen.index()];
        (bishop_attacks(ctx.king, occ) & diag).is_empty()
            && (rook_attacks(ctx.king, occ) & straight).is_empty()
    }
}
