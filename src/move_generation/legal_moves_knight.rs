use crate::game_state::{chess_types::*, game_state::GameState};
use crate::move_generation::legal_move_shared::push_attack_moves;
use crate::moves::knight_moves::knight_attacks;

pub fn generate_knight_moves(game_state: &GameState, out: &mut Vec<Move>) {
    let side = game_state.side_to_move;
    let own_occ = game_state.occupancy_by_color[side.index()];

    let mut knights = game_state.pieces[side.index()][PieceKind::Knight.index()];
    while knights != 0 {
        let from = knights.trailing_zeros() as Square;
        knights &= knights - 1;

        push_attack_moves(
            game_state,
            out,
            from,
            PieceKind::Knight,
            knight_attacks(from) & !own_occ,
        );
    }
}
