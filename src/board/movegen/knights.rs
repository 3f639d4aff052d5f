use super::super::attack_tables::knight_attacks;
use super::super::types::{MoveKind, MoveList, Piece};
use super::super::Position;
use super::GenContext;

impl Position {
    pub(super) fn gen_knight_moves(&self, ctx: &GenContext, list: &mut MoveList) {
        // a pinned knight can never stay on its pin line
        let knights = self.pieces(ctx.us, Piece::Knight) & !ctx.pinned;
        for from in knights.iter() {
            for to in (knight_attacks(from) & ctx.targets).iter() {
                list.push(self.make_move_record(from, to, Piece::Knight, MoveKind::Normal));
            }
        }
    }
}
