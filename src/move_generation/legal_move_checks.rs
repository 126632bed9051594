//! Attack and check queries against the live occupancy.

use crate::game_state::{chess_types::*, game_state::GameState};
use crate::moves::bishop_moves::bishop_attacks;
use crate::moves::king_moves::king_attacks;
use crate::moves::knight_moves::knight_attacks;
use crate::moves::pawn_moves::pawn_attacks;
use crate::moves::rook_moves::rook_attacks;

#[inline]
pub fn king_square(game_state: &GameState, color: Color) -> Option<Square> {
    let kings = game_state.pieces[color.index()][PieceKind::King.index()];
    if kings == 0 {
        None
    } else {
        Some(kings.trailing_zeros() as Square)
    }
}

#[inline]
pub fn is_king_in_check(game_state: &GameState, color: Color) -> bool {
    match king_square(game_state, color) {
        Some(square) => is_square_attacked(game_state, square, color.opposite()),
        None => false,
    }
}

/// True when any piece of `attacker_color` attacks `square` under the
/// current occupancy.
pub fn is_square_attacked(game_state: &GameState, square: Square, attacker_color: Color) -> bool {
    let attacker = attacker_color.index();

    // A pawn of the attacker's color attacks `square` exactly when a pawn of
    // the defender's color on `square` would attack the pawn's square.
    let attacker_pawns = game_state.pieces[attacker][PieceKind::Pawn.index()];
    if pawn_attacks(attacker_color.opposite(), square) & attacker_pawns != 0 {
        return true;
    }

    if knight_attacks(square) & game_state.pieces[attacker][PieceKind::Knight.index()] != 0 {
        return true;
    }

    if king_attacks(square) & game_state.pieces[attacker][PieceKind::King.index()] != 0 {
        return true;
    }

    let diagonal_sliders = game_state.pieces[attacker][PieceKind::Bishop.index()]
        | game_state.pieces[attacker][PieceKind::Queen.index()];
    if diagonal_sliders != 0 && bishop_attacks(square, game_state.occupancy_all) & diagonal_sliders != 0
    {
        return true;
    }

    let straight_sliders = game_state.pieces[attacker][PieceKind::Rook.index()]
        | game_state.pieces[attacker][PieceKind::Queen.index()];
    if straight_sliders != 0 && rook_attacks(square, game_state.occupancy_all) & straight_sliders != 0
    {
        return true;
    }

    false
}

#[cfg(test)]
mod tests {
    use super::{is_king_in_check, is_square_attacked, king_square};
    use crate::game_state::chess_types::Color;
    use crate::game_state::game_state::GameState;
    use crate::utils::algebraic::algebraic_to_square;

    #[test]
    fn finds_the_king_square() {
        let game = GameState::new_game();
        assert_eq!(king_square(&game, Color::White), Some(4));
        assert_eq!(king_square(&game, Color::Black), Some(60));
    }

    #[test]
    fn detects_attacks_by_each_piece_class() {
        let game = GameState::from_fen("4k3/8/8/3r4/8/2n5/4P3/4K3 w - - 0 1")
            .expect("FEN should parse");

        let d1 = algebraic_to_square("d1").expect("square");
        assert!(is_square_attacked(&game, d1, Color::Black), "rook down the file");

        let b1 = algebraic_to_square("b1").expect("square");
        assert!(is_square_attacked(&game, b1, Color::Black), "knight hop");

        let d3 = algebraic_to_square("d3").expect("square");
        assert!(is_square_attacked(&game, d3, Color::White), "pawn capture square");

        let a8 = algebraic_to_square("a8").expect("square");
        assert!(!is_square_attacked(&game, a8, Color::White));
    }

    #[test]
    fn blocked_slider_does_not_attack_through_pieces() {
        let game = GameState::from_fen("4k3/8/8/3r4/3P4/8/8/3K4 w - - 0 1")
            .expect("FEN should parse");
        let d1 = algebraic_to_square("d1").expect("square");
        assert!(!is_square_attacked(&game, d1, Color::Black));
        assert!(!is_king_in_check(&game, Color::White));
    }

    #[test]
    fn scholars_mate_position_is_check() {
        let game = GameState::from_fen(
            "r1bqkb1r/pppp1Qpp/2n2n2/4p3/2B1P3/8/PPPP1PPP/RNB1K1NR b KQkq - 0 4",
        )
        .expect("FEN should parse");
        assert!(is_king_in_check(&game, Color::Black));
        assert!(!is_king_in_check(&game, Color::White));
    }
}
