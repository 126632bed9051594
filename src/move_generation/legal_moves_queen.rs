use crate::game_state::{chess_types::*, game_state::GameState};
use crate::move_generation::legal_move_shared::push_attack_moves;
use crate::moves::queen_moves::queen_attacks;

pub fn generate_queen_moves(game_state: &GameState, out: &mut Vec<Move>) {
    let side = game_state.side_to_move;
    let own_occ = game_state.occupancy_by_color[side.index()];

    let mut queens = game_state.pieces[side.index()][PieceKind::Queen.index()];
    while queens != 0 {
        let from = queens.trailing_zeros() as Square;
        queens &= queens - 1;

        push_attack_moves(
            game_state,
            out,
            from,
            PieceKind::Queen,
            queen_attacks(from, game_state.occupancy_all) & !own_occ,
        );
    }
}
