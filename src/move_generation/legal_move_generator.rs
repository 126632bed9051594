//! Full legal move generation pipeline.
//!
//! Piece-wise pseudo-legal generation followed by try-and-revert legality
//! filtering: each candidate is applied in place, rejected when the mover's
//! own king is attacked, and reverted. The returned list is exactly the set
//! of moves a rules-compliant player may play.

use crate::game_state::{chess_types::*, game_state::GameState};
use crate::move_generation::legal_move_apply::{make_move_in_place, unmake_move_in_place};
use crate::move_generation::legal_move_checks::is_king_in_check;
use crate::move_generation::legal_moves_bishop::generate_bishop_moves;
use crate::move_generation::legal_moves_king::generate_king_moves;
use crate::move_generation::legal_moves_knight::generate_knight_moves;
use crate::move_generation::legal_moves_pawn::generate_pawn_moves;
use crate::move_generation::legal_moves_queen::generate_queen_moves;
use crate::move_generation::legal_moves_rook::generate_rook_moves;
use crate::move_generation::move_generator::{MoveGenResult, MoveGenerationError};
use crate::moves::move_descriptions::same_move;

/// Candidate moves that obey piece movement rules but may still leave the
/// mover's own king in check.
pub fn generate_pseudo_legal_moves(game_state: &GameState) -> Vec<Move> {
    let mut moves = Vec::with_capacity(64);

    generate_pawn_moves(game_state, &mut moves);
    generate_knight_moves(game_state, &mut moves);
    generate_bishop_moves(game_state, &mut moves);
    generate_rook_moves(game_state, &mut moves);
    generate_queen_moves(game_state, &mut moves);
    generate_king_moves(game_state, &mut moves);

    moves
}

/// Legal moves for the side to move. The position is mutated during
/// filtering and restored before returning.
pub fn generate_legal_moves_in_place(game_state: &mut GameState) -> MoveGenResult<Vec<Move>> {
    let mover = game_state.side_to_move;
    let pseudo = generate_pseudo_legal_moves(game_state);
    let mut legal = Vec::with_capacity(pseudo.len());

    for mv in pseudo {
        make_move_in_place(game_state, mv)
            .map_err(|e| MoveGenerationError::InvalidState(format!("make_move_in_place failed: {e}")))?;
        let leaves_own_king_in_check = is_king_in_check(game_state, mover);
        unmake_move_in_place(game_state).map_err(|e| {
            MoveGenerationError::InvalidState(format!("unmake_move_in_place failed: {e}"))
        })?;

        if !leaves_own_king_in_check {
            legal.push(mv);
        }
    }

    Ok(legal)
}

/// Borrow-only convenience wrapper around `generate_legal_moves_in_place`.
pub fn generate_legal_moves(game_state: &GameState) -> MoveGenResult<Vec<Move>> {
    let mut probe = game_state.clone();
    generate_legal_moves_in_place(&mut probe)
}

/// Re-validate and apply a requested move.
///
/// Returns `Ok(false)` and leaves the state untouched when the request is
/// not a legal move in the current position. The applied move is the
/// generator's canonical packing, so flags and the captured piece are
/// always consistent regardless of how sparsely the caller packed theirs.
pub fn try_make_move(game_state: &mut GameState, move_description: Move) -> MoveGenResult<bool> {
    let legal = generate_legal_moves_in_place(game_state)?;
    let Some(canonical) = legal.into_iter().find(|&mv| same_move(mv, move_description)) else {
        return Ok(false);
    };

    make_move_in_place(game_state, canonical)
        .map_err(|e| MoveGenerationError::InvalidState(format!("make_move_in_place failed: {e}")))?;
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::{generate_legal_moves_in_place, try_make_move};
    use crate::game_state::game_state::GameState;
    use crate::utils::long_algebraic::long_algebraic_to_move_description;

    #[test]
    fn starting_position_has_twenty_legal_moves() {
        let mut game = GameState::new_game();
        let moves = generate_legal_moves_in_place(&mut game).expect("generation should succeed");
        assert_eq!(moves.len(), 20);
        assert_eq!(game, GameState::new_game(), "filtering must not disturb the state");
    }

    #[test]
    fn pinned_piece_may_not_expose_the_king() {
        // Knight on d2 is pinned against the king by the rook on d8.
        let mut game = GameState::from_fen("3rk3/8/8/8/8/8/3N4/3K4 w - - 0 1")
            .expect("FEN should parse");
        let moves = generate_legal_moves_in_place(&mut game).expect("generation should succeed");
        let knight_moves = moves
            .iter()
            .filter(|&&mv| crate::moves::move_descriptions::move_from(mv) == 11)
            .count();
        assert_eq!(knight_moves, 0, "pinned knight has no legal moves");
    }

    #[test]
    fn check_evasions_are_the_only_legal_replies() {
        // Back-rank check: king must step out or the check must be blocked.
        let mut game = GameState::from_fen("4k3/8/8/8/8/8/PPP5/r3K3 w - - 0 1")
            .expect("FEN should parse");
        let moves = generate_legal_moves_in_place(&mut game).expect("generation should succeed");
        assert!(!moves.is_empty());
        for &mv in &moves {
            assert_eq!(
                crate::moves::move_descriptions::move_moved_piece(mv),
                Some(crate::game_state::chess_types::PieceKind::King),
                "only king moves escape this check"
            );
        }
    }

    #[test]
    fn try_make_move_rejects_illegal_input_without_mutation() {
        let mut game = GameState::new_game();
        let pristine = game.clone();

        let illegal = long_algebraic_to_move_description("e2e5", &game).expect("move should parse");
        let applied = try_make_move(&mut game, illegal).expect("validation should succeed");
        assert!(!applied);
        assert_eq!(game, pristine);

        let legal = long_algebraic_to_move_description("e2e4", &game).expect("move should parse");
        let applied = try_make_move(&mut game, legal).expect("validation should succeed");
        assert!(applied);
        assert_ne!(game, pristine);
    }

    #[test]
    fn stalemate_position_has_no_legal_moves() {
        let mut game =
            GameState::from_fen("7k/5Q2/6K1/8/8/8/8/8 b - - 0 1").expect("FEN should parse");
        let moves = generate_legal_moves_in_place(&mut game).expect("generation should succeed");
        assert!(moves.is_empty());
    }
}
