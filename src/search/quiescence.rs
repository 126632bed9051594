//! Quiescence search: resolve the horizon effect before trusting the
//! static evaluator.
//!
//! From a depth-zero leaf, only forcing moves are searched — captures,
//! promotions, and checking moves — until the position is quiet. The
//! stand-pat evaluation is a lower bound the side to move can claim by
//! declining all tactics; a hard ply cap bounds runaway check chains.

use crate::game_state::{chess_types::*, game_state::GameState};
use crate::move_generation::legal_move_apply::{make_move_in_place, unmake_move_in_place};
use crate::move_generation::legal_move_checks::is_king_in_check;
use crate::move_generation::legal_move_generator::generate_legal_moves_in_place;
use crate::move_generation::move_generator::{MoveGenResult, MoveGenerationError};
use crate::moves::move_descriptions::is_quiet;
use crate::search::board_scoring::BoardScorer;
use crate::search::negascout::{should_abort, SearchContext};

/// Hard recursion cap; a safety valve against perpetual check chains.
pub const QUIESCENCE_MAX_PLY: u8 = 16;

/// Search forcing moves to quiet, returning a side-to-move score.
/// `Ok(None)` means the search was cancelled and is unwinding.
pub fn quiescence<S: BoardScorer>(
    game_state: &mut GameState,
    ctx: &mut SearchContext<'_, S>,
    mut alpha: i32,
    beta: i32,
    qply: u8,
) -> MoveGenResult<Option<i32>> {
    if should_abort(ctx) {
        return Ok(None);
    }
    ctx.nodes += 1;

    // Stand pat: the side to move may always decline further tactics.
    let stand_pat = ctx.scorer.score(game_state);
    if stand_pat >= beta {
        return Ok(Some(beta));
    }
    if stand_pat > alpha {
        alpha = stand_pat;
    }
    if qply >= QUIESCENCE_MAX_PLY {
        return Ok(Some(stand_pat));
    }

    let mut moves = generate_forcing_moves(game_state)?;
    if moves.is_empty() {
        return Ok(Some(stand_pat));
    }
    ctx.orderer
        .order_moves(game_state, &mut moves, usize::from(qply), None);

    for mv in moves {
        make_move_in_place(game_state, mv)
            .map_err(|e| MoveGenerationError::InvalidState(format!("make_move_in_place failed: {e}")))?;
        let score_opt = quiescence(game_state, ctx, -beta, -alpha, qply + 1);
        unmake_move_in_place(game_state).map_err(|e| {
            MoveGenerationError::InvalidState(format!("unmake_move_in_place failed: {e}"))
        })?;

        let Some(score) = score_opt? else {
            return Ok(None);
        };
        let score = -score;

        if score >= beta {
            return Ok(Some(beta));
        }
        if score > alpha {
            alpha = score;
        }
    }

    Ok(Some(alpha))
}

/// Legal captures, promotions, and checking moves. Checks are detected by
/// applying the move and probing the opponent's king.
fn generate_forcing_moves(game_state: &mut GameState) -> MoveGenResult<Vec<Move>> {
    let legal = generate_legal_moves_in_place(game_state)?;
    let mut forcing = Vec::with_capacity(legal.len());

    for mv in legal {
        if !is_quiet(mv) {
            forcing.push(mv);
            continue;
        }

        make_move_in_place(game_state, mv)
            .map_err(|e| MoveGenerationError::InvalidState(format!("make_move_in_place failed: {e}")))?;
        let gives_check = is_king_in_check(game_state, game_state.side_to_move);
        unmake_move_in_place(game_state).map_err(|e| {
            MoveGenerationError::InvalidState(format!("unmake_move_in_place failed: {e}"))
        })?;

        if gives_check {
            forcing.push(mv);
        }
    }

    Ok(forcing)
}

#[cfg(test)]
mod tests {
    use super::{generate_forcing_moves, quiescence};
    use crate::game_state::game_state::GameState;
    use crate::moves::move_descriptions::is_quiet;
    use crate::search::board_scoring::MaterialScorer;
    use crate::search::negascout::SearchContext;

    #[test]
    fn quiet_position_returns_the_stand_pat_score() {
        let mut game = GameState::new_game();
        let scorer = MaterialScorer;
        let mut ctx = SearchContext::new(&scorer);

        let score = quiescence(&mut game, &mut ctx, -30_000, 30_000, 0)
            .expect("quiescence should run")
            .expect("quiescence should complete");
        assert_eq!(score, 0);
    }

    #[test]
    fn hanging_piece_is_resolved_before_evaluating() {
        // Black queen hangs on d5; naive stand-pat would miss the win.
        let mut game =
            GameState::from_fen("4k3/8/8/3q4/4P3/8/8/4K3 w - - 0 1").expect("FEN should parse");
        let scorer = MaterialScorer;
        let mut ctx = SearchContext::new(&scorer);

        let score = quiescence(&mut game, &mut ctx, -30_000, 30_000, 0)
            .expect("quiescence should run")
            .expect("quiescence should complete");
        assert!(score >= 0, "capturing the queen rescues the eval, got {score}");
    }

    #[test]
    fn forcing_set_is_exactly_the_checking_moves_in_a_capture_free_position() {
        // No captures or promotions exist; only Rb8+ and Re2+ give check.
        let mut game =
            GameState::from_fen("4k3/8/8/8/8/8/1R6/1K6 w - - 0 1").expect("FEN should parse");
        let forcing = generate_forcing_moves(&mut game).expect("generation should succeed");

        let mut targets: Vec<u8> = forcing
            .iter()
            .map(|&mv| crate::moves::move_descriptions::move_to(mv))
            .collect();
        targets.sort_unstable();
        assert_eq!(targets, vec![12, 57], "e2 and b8 checks only");
        assert!(forcing.iter().all(|&mv| is_quiet(mv)));
    }

    #[test]
    fn state_is_restored_after_quiescence() {
        let mut game = GameState::from_fen(
            "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
        )
        .expect("FEN should parse");
        let pristine = game.clone();
        let scorer = MaterialScorer;
        let mut ctx = SearchContext::new(&scorer);

        quiescence(&mut game, &mut ctx, -30_000, 30_000, 0)
            .expect("quiescence should run")
            .expect("quiescence should complete");
        assert_eq!(game, pristine);
    }
}
