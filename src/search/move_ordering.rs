//! Move ordering for alpha-beta efficiency.
//!
//! Priority, descending: the supplied hash/PV move; winning-or-equal
//! captures by MVV-LVA with SEE deciding which lane a capture lands in;
//! promotions by promoted-piece value; killer moves; quiet moves by the
//! history table. Losing captures are never discarded, only ranked below
//! everything scored.
//!
//! The killer and history tables are per-search-session state: a
//! `MoveOrderer` is built fresh for each search call and passed by mutable
//! reference into the recursion.

use crate::game_state::{chess_types::*, game_state::GameState};
use crate::moves::move_descriptions::{
    is_capture, move_captured_piece, move_from, move_moved_piece, move_promotion_piece, move_to,
    same_move,
};
use crate::search::see::static_exchange_evaluation;

/// Deepest ply the killer table tracks.
pub const MAX_PLY: usize = 64;

const HASH_MOVE_SCORE: i32 = 10_000;
const WINNING_CAPTURE_BASE: i32 = 8_000;
const KILLER_MOVE_SCORE: i32 = 7_000;
const QUIET_MOVE_BASE: i32 = 1_000;
const LOSING_CAPTURE_BASE: i32 = 100;

const HISTORY_SCORE_CAP: i32 = 50_000;

pub struct MoveOrderer {
    /// Two killer slots per ply, most recent first. Never holds captures.
    killers: [[Option<Move>; 2]; MAX_PLY],
    /// Cutoff history indexed `[from][to]`.
    history: Box<[[i32; 64]; 64]>,
}

impl Default for MoveOrderer {
    fn default() -> Self {
        Self::new()
    }
}

impl MoveOrderer {
    pub fn new() -> Self {
        Self {
            killers: [[None; 2]; MAX_PLY],
            history: Box::new([[0; 64]; 64]),
        }
    }

    /// Sort `moves` best-first for the given ply.
    pub fn order_moves(
        &self,
        game_state: &GameState,
        moves: &mut [Move],
        ply: usize,
        hash_move: Option<Move>,
    ) {
        moves.sort_by_cached_key(|&mv| -self.score_move(game_state, mv, ply, hash_move));
    }

    /// Transient ordering score; never part of move identity.
    pub fn score_move(
        &self,
        game_state: &GameState,
        move_description: Move,
        ply: usize,
        hash_move: Option<Move>,
    ) -> i32 {
        if let Some(hash_move) = hash_move {
            if same_move(move_description, hash_move) {
                return HASH_MOVE_SCORE;
            }
        }

        if is_capture(move_description) {
            let victim_value = move_captured_piece(move_description)
                .map(PieceKind::value)
                .unwrap_or(0);
            let aggressor_value = move_moved_piece(move_description)
                .map(PieceKind::value)
                .unwrap_or(0);

            let see_score = static_exchange_evaluation(game_state, move_description);
            return if see_score >= 0 {
                WINNING_CAPTURE_BASE + victim_value - aggressor_value
            } else {
                LOSING_CAPTURE_BASE + see_score
            };
        }

        if let Some(promotion) = move_promotion_piece(move_description) {
            return WINNING_CAPTURE_BASE + promotion.value();
        }

        if ply < MAX_PLY {
            for killer in self.killers[ply].into_iter().flatten() {
                if same_move(move_description, killer) {
                    return KILLER_MOVE_SCORE;
                }
            }
        }

        let from = move_from(move_description) as usize;
        let to = move_to(move_description) as usize;
        QUIET_MOVE_BASE + self.history[from][to]
    }

    /// Record a beta-cutoff move in the killer slots. Captures are never
    /// stored; the most recent killer displaces the older slot.
    pub fn update_killer_moves(&mut self, move_description: Move, ply: usize) {
        if ply >= MAX_PLY || is_capture(move_description) {
            return;
        }

        let slots = &mut self.killers[ply];
        if let Some(first) = slots[0] {
            if same_move(first, move_description) {
                return;
            }
        }
        slots[1] = slots[0];
        slots[0] = Some(move_description);
    }

    /// Credit a beta-cutoff move in the history table with depth squared.
    pub fn update_history(&mut self, move_description: Move, depth: u8) {
        let from = move_from(move_description) as usize;
        let to = move_to(move_description) as usize;
        let bonus = i32::from(depth) * i32::from(depth);
        let entry = &mut self.history[from][to];
        *entry = (*entry + bonus).min(HISTORY_SCORE_CAP);
    }
}
