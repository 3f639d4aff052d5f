use super::super::types::{MoveKind, MoveList, Piece};
use super::super::Position;
use super::{piece_attacks, GenContext};

impl Position {
    pub(super) fn gen_slider_moves(&self, ctx: &GenContext, piece: Piece, list: &mut MoveList) {
        debug_assert!(piece.is_slider());
        for from in self.pieces(ctx.us, piece).iter() {
            let dests = piece_attacks(piece, ctx.us, from, self.all_occupied)
                & ctx.targets
                & ctx.pin_mask(from);
            for to in dests.iter() {
                list.push(self.make_move_record(from, to, piece, MoveKind::Normal));
            }
        }
    }
}
