use crate::game_state::{chess_types::*, game_state::GameState};
use crate::move_generation::legal_move_shared::push_attack_moves;
use crate::moves::rook_moves::rook_attacks;

pub fn generate_rook_moves(game_state: &GameState, out: &mut Vec<Move>) {
    let side = game_state.side_to_move;
    let own_occ = game_state.occupancy_by_color[side.index()];

    let mut rooks = game_state.pieces[side.index()][PieceKind::Rook.index()];
    while rooks != 0 {
        let from = rooks.trailing_zeros() as Square;
        rooks &= rooks - 1;

        push_attack_moves(
            game_state,
            out,
            from,
            PieceKind::Rook,
            rook_attacks(from, game_state.occupancy_all) & !own_occ,
        );
    }
}
