use crate::game_state::{chess_types::*, game_state::GameState};
use crate::move_generation::legal_move_shared::push_attack_moves;
use crate::moves::bishop_moves::bishop_attacks;

pub fn generate_bishop_moves(game_state: &GameState, out: &mut Vec<Move>) {
    let side = game_state.side_to_move;
    let own_occ = game_state.occupancy_by_color[side.index()];

    let mut bishops = game_state.pieces[side.index()][PieceKind::Bishop.index()];
    while bishops != 0 {
        let from = bishops.trailing_zeros() as Square;
        bishops &= bishops - 1;

        push_attack_moves(
            game_state,
            out,
            from,
            PieceKind::Bishop,
            bishop_attacks(from, game_state.occupancy_all) & !own_occ,
        );
    }
}
