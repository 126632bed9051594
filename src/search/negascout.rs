//! Negascout (Principal Variation Search) with iterative deepening.
//!
//! The driver deepens from one ply upward, keeping the last fully
//! completed depth's answer. Each node scores terminals first, orders the
//! legal moves, searches the first with the full window, and probes every
//! later move with a null window, re-searching at full width only when the
//! probe lands strictly inside (alpha, beta). The wall-clock deadline and
//! the external stop flag are polled on every node entry; expiry unwinds
//! the recursion immediately, restoring the position frame by frame and
//! discarding the in-progress depth.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::game_state::{chess_types::*, game_state::GameState};
use crate::move_generation::legal_move_apply::{make_move_in_place, unmake_move_in_place};
use crate::move_generation::legal_move_checks::is_king_in_check;
use crate::move_generation::legal_move_generator::generate_legal_moves_in_place;
use crate::move_generation::move_generator::{MoveGenResult, MoveGenerationError};
use crate::moves::move_descriptions::same_move;
use crate::search::board_scoring::BoardScorer;
use crate::search::move_ordering::MoveOrderer;
use crate::search::quiescence::quiescence;

/// Mate magnitude; an actual mate at `ply` scores `-MATE_SCORE + ply` for
/// the side being mated, so shorter mates are more extreme.
pub const MATE_SCORE: i32 = 30_000;

/// Full search window bound, strictly wider than any mate score.
pub const INFINITY_SCORE: i32 = 999_999;

#[derive(Debug, Clone, Default)]
pub struct SearchConfig {
    /// Iterative deepening bound; zero runs no iterations and yields the
    /// empty result.
    pub max_depth: u8,
    /// Wall-clock budget. The shallowest iteration always completes.
    pub movetime_ms: Option<u64>,
    /// Cooperative cancellation flag, polled on every node entry.
    pub stop_flag: Option<Arc<AtomicBool>>,
}

/// Outcome of one completed deepening iteration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DepthReport {
    pub depth: u8,
    pub best_move: Option<Move>,
    pub score: i32,
    pub principal_variation: Vec<Move>,
    pub nodes: u64,
}

#[derive(Debug, Clone, Default)]
pub struct SearchResult {
    /// `None` is the no-legal-move sentinel; the front-end decides how to
    /// report mate or stalemate.
    pub best_move: Option<Move>,
    pub best_score: i32,
    pub reached_depth: u8,
    pub principal_variation: Vec<Move>,
    pub nodes: u64,
    pub elapsed_ms: u64,
    pub nps: u64,
    /// One report per fully completed deepening iteration.
    pub completed_depths: Vec<DepthReport>,
}

/// Per-invocation search state: the evaluator seam, the ordering tables,
/// the time box, and the node counter. Exclusively owned by one search.
pub struct SearchContext<'a, S: BoardScorer> {
    pub scorer: &'a S,
    pub orderer: MoveOrderer,
    pub deadline: Option<Instant>,
    pub stop_flag: Option<&'a AtomicBool>,
    pub nodes: u64,
}

impl<'a, S: BoardScorer> SearchContext<'a, S> {
    pub fn new(scorer: &'a S) -> Self {
        Self {
            scorer,
            orderer: MoveOrderer::new(),
            deadline: None,
            stop_flag: None,
            nodes: 0,
        }
    }
}

#[inline]
pub fn should_abort<S: BoardScorer>(ctx: &SearchContext<'_, S>) -> bool {
    if let Some(deadline) = ctx.deadline {
        if Instant::now() >= deadline {
            return true;
        }
    }
    if let Some(flag) = ctx.stop_flag {
        if flag.load(Ordering::Relaxed) {
            return true;
        }
    }
    false
}

/// Iterative-deepening driver. The caller's position is never mutated; the
/// search works on a private copy restored by make/unmake pairing.
pub fn negascout_search<S: BoardScorer>(
    game_state: &GameState,
    scorer: &S,
    config: SearchConfig,
) -> MoveGenResult<SearchResult> {
    let started_at = Instant::now();
    let deadline = config
        .movetime_ms
        .map(|ms| started_at + Duration::from_millis(ms.max(1)));

    let mut ctx = SearchContext::new(scorer);
    let mut root = game_state.clone();
    let mut result = SearchResult::default();

    for depth in 1..=config.max_depth {
        // The shallowest iteration runs unboxed so a time-limited search
        // can still report a legal move; deeper ones honor the limits.
        if depth > 1 {
            ctx.deadline = deadline;
            ctx.stop_flag = config.stop_flag.as_deref();
            if should_abort(&ctx) {
                break;
            }
        }

        let previous_pv = std::mem::take(&mut result.principal_variation);
        let Some((best_move, best_score, principal_variation)) =
            search_root(&mut root, &mut ctx, depth, &previous_pv)?
        else {
            // Expired mid-iteration: the in-progress depth is discarded.
            result.principal_variation = previous_pv;
            break;
        };

        result.best_move = best_move;
        result.best_score = best_score;
        result.reached_depth = depth;
        result.principal_variation = principal_variation;
        result.nodes = ctx.nodes;
        result.completed_depths.push(DepthReport {
            depth,
            best_move,
            score: best_score,
            principal_variation: result.principal_variation.clone(),
            nodes: ctx.nodes,
        });

        if best_move.is_none() {
            // No legal moves at the root; deepening cannot change that.
            break;
        }
    }

    result.nodes = ctx.nodes;
    result.elapsed_ms = started_at.elapsed().as_millis() as u64;
    result.nps = if result.elapsed_ms == 0 {
        0
    } else {
        result.nodes.saturating_mul(1000) / result.elapsed_ms
    };

    debug_assert_eq!(root, *game_state, "search must restore its root position");

    Ok(result)
}

/// One full-width root iteration. `Ok(None)` means the iteration was cut
/// short by the time box or stop flag and its partial answer is unusable.
fn search_root<S: BoardScorer>(
    game_state: &mut GameState,
    ctx: &mut SearchContext<'_, S>,
    depth: u8,
    previous_pv: &[Move],
) -> MoveGenResult<Option<(Option<Move>, i32, Vec<Move>)>> {
    ctx.nodes += 1;

    let mut moves = generate_legal_moves_in_place(game_state)?;
    if moves.is_empty() {
        return Ok(Some((None, terminal_score(game_state, 0), Vec::new())));
    }

    let pv_move = previous_pv.first().copied();
    ctx.orderer.order_moves(game_state, &mut moves, 0, pv_move);

    let mut alpha = -INFINITY_SCORE;
    let beta = INFINITY_SCORE;
    let mut best_move = None;
    let mut best_score = -INFINITY_SCORE;
    let mut best_line = Vec::new();
    let mut is_first_move = true;

    for mv in moves {
        if should_abort(ctx) {
            return Ok(None);
        }

        let mut line = Vec::new();
        let score_opt = search_child(
            game_state,
            ctx,
            depth,
            alpha,
            beta,
            0,
            mv,
            is_first_move,
            previous_pv,
            &mut line,
        )?;
        let Some(score) = score_opt else {
            return Ok(None);
        };
        is_first_move = false;

        if score > best_score {
            best_score = score;
            best_move = Some(mv);
        }
        if score > alpha {
            alpha = score;
            best_line.clear();
            best_line.push(mv);
            best_line.append(&mut line);
        }
    }

    Ok(Some((best_move, best_score, best_line)))
}

fn negascout<S: BoardScorer>(
    game_state: &mut GameState,
    ctx: &mut SearchContext<'_, S>,
    depth: u8,
    mut alpha: i32,
    beta: i32,
    ply: u8,
    previous_pv: &[Move],
    pv: &mut Vec<Move>,
) -> MoveGenResult<Option<i32>> {
    if should_abort(ctx) {
        return Ok(None);
    }
    ctx.nodes += 1;
    pv.clear();

    // Terminal conditions come before the evaluator is consulted: draws
    // score zero, a moveless side is mated or stalemated, and only then
    // does a depth-zero leaf defer to quiescence.
    if game_state.is_draw_state() {
        return Ok(Some(0));
    }

    let mut moves = generate_legal_moves_in_place(game_state)?;
    if moves.is_empty() {
        return Ok(Some(terminal_score(game_state, ply)));
    }
    if depth == 0 {
        return quiescence(game_state, ctx, alpha, beta, 0);
    }

    let pv_move = previous_pv.first().copied();
    ctx.orderer
        .order_moves(game_state, &mut moves, usize::from(ply), pv_move);

    let mut best_score = -INFINITY_SCORE;
    let mut is_first_move = true;

    for mv in moves {
        if should_abort(ctx) {
            return Ok(None);
        }

        let mut line = Vec::new();
        let score_opt = search_child(
            game_state,
            ctx,
            depth,
            alpha,
            beta,
            ply,
            mv,
            is_first_move,
            previous_pv,
            &mut line,
        )?;
        let Some(score) = score_opt else {
            return Ok(None);
        };
        is_first_move = false;

        if score > best_score {
            best_score = score;
        }
        if score > alpha {
            alpha = score;
            pv.clear();
            pv.push(mv);
            pv.append(&mut line);
        }
        if alpha >= beta {
            // Cutoff bookkeeping feeds the ordering heuristics.
            ctx.orderer.update_killer_moves(mv, usize::from(ply));
            ctx.orderer.update_history(mv, depth);
            break;
        }
    }

    Ok(Some(best_score))
}

/// Search one child move: full window for the first move, null-window probe
/// then conditional full-width re-search for the rest. The move is always
/// unmade before returning, including on cancellation and error paths.
#[allow(clippy::too_many_arguments)]
fn search_child<S: BoardScorer>(
    game_state: &mut GameState,
    ctx: &mut SearchContext<'_, S>,
    depth: u8,
    alpha: i32,
    beta: i32,
    ply: u8,
    mv: Move,
    is_first_move: bool,
    previous_pv: &[Move],
    line: &mut Vec<Move>,
) -> MoveGenResult<Option<i32>> {
    // Thread the previous iteration's PV down its own line only.
    let child_pv: &[Move] = match previous_pv.first() {
        Some(&head) if same_move(head, mv) => &previous_pv[1..],
        _ => &[],
    };

    make_move_in_place(game_state, mv)
        .map_err(|e| MoveGenerationError::InvalidState(format!("make_move_in_place failed: {e}")))?;

    let child_result = if is_first_move {
        negascout(game_state, ctx, depth - 1, -beta, -alpha, ply + 1, child_pv, line)
    } else {
        // Null-window probe: is this move better than the current best?
        match negascout(game_state, ctx, depth - 1, -alpha - 1, -alpha, ply + 1, &[], line) {
            Ok(Some(probe)) if alpha < -probe && -probe < beta => {
                // A candidate new best line; verify with the full window.
                negascout(game_state, ctx, depth - 1, -beta, -alpha, ply + 1, child_pv, line)
            }
            other => other,
        }
    };

    unmake_move_in_place(game_state).map_err(|e| {
        MoveGenerationError::InvalidState(format!("unmake_move_in_place failed: {e}"))
    })?;

    Ok(child_result?.map(|score| -score))
}

/// Score for a side with no legal moves: mated or stalemated.
#[inline]
fn terminal_score(game_state: &GameState, ply: u8) -> i32 {
    if is_king_in_check(game_state, game_state.side_to_move) {
        -MATE_SCORE + i32::from(ply)
    } else {
        0
    }
}
