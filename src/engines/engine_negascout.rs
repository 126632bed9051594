//! Negascout engine facade.
//!
//! Owns the game position and the cooperative stop signal, and exposes the
//! surface a protocol front-end drives: position setup from FEN plus a
//! coordinate-notation move list, a depth/time-bounded search, cooperative
//! cancellation, and FEN export. The evaluator is a pluggable seam; the
//! default engine ships with the baseline material scorer.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::engines::engine_trait::{Engine, EngineOutput, SearchLimits};
use crate::game_state::game_state::GameState;
use crate::move_generation::legal_move_generator::try_make_move;
use crate::search::board_scoring::{BoardScorer, MaterialScorer};
use crate::search::negascout::{negascout_search, SearchConfig, SearchResult};
use crate::utils::long_algebraic::{
    long_algebraic_to_move_description, move_description_to_long_algebraic,
};

const DEFAULT_SEARCH_DEPTH: u8 = 5;

pub struct NegascoutEngine<S: BoardScorer> {
    game_state: GameState,
    scorer: S,
    stop_signal: Arc<AtomicBool>,
    default_depth: u8,
}

impl NegascoutEngine<MaterialScorer> {
    pub fn new() -> Self {
        Self::with_scorer(MaterialScorer)
    }
}

impl Default for NegascoutEngine<MaterialScorer> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: BoardScorer> NegascoutEngine<S> {
    pub fn with_scorer(scorer: S) -> Self {
        Self {
            game_state: GameState::new_game(),
            scorer,
            stop_signal: Arc::new(AtomicBool::new(false)),
            default_depth: DEFAULT_SEARCH_DEPTH,
        }
    }

    pub fn set_default_depth(&mut self, depth: u8) {
        self.default_depth = depth.max(1);
    }

    /// Reset to the standard starting position, or to `fen` when given,
    /// then play out `moves` in coordinate notation. Every move must be
    /// legal in sequence; the position is left at the last applied move.
    pub fn set_position(&mut self, fen: Option<&str>, moves: &[String]) -> Result<(), String> {
        let mut game_state = match fen {
            Some(fen) => GameState::from_fen(fen).map_err(|e| e.to_string())?,
            None => GameState::new_game(),
        };

        for move_str in moves {
            let mv = long_algebraic_to_move_description(move_str, &game_state)?;
            let applied = try_make_move(&mut game_state, mv).map_err(|e| e.to_string())?;
            if !applied {
                return Err(format!("Illegal move in position setup: {move_str}"));
            }
        }

        self.game_state = game_state;
        Ok(())
    }

    /// Search the current position. A `best_move` of `None` is the
    /// no-legal-move sentinel; the caller decides how to report mate or
    /// stalemate.
    pub fn search(&mut self, max_depth: u8, movetime_ms: Option<u64>) -> Result<SearchResult, String> {
        self.stop_signal.store(false, Ordering::Relaxed);

        negascout_search(
            &self.game_state,
            &self.scorer,
            SearchConfig {
                max_depth: max_depth.max(1),
                movetime_ms,
                stop_flag: Some(Arc::clone(&self.stop_signal)),
            },
        )
        .map_err(|e| e.to_string())
    }

    /// Cooperatively stop an in-flight search from another thread.
    pub fn request_stop(&self) {
        self.stop_signal.store(true, Ordering::Relaxed);
    }

    /// Shareable handle to the stop signal for front-end wiring.
    pub fn stop_handle(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.stop_signal)
    }

    pub fn position(&self) -> &GameState {
        &self.game_state
    }

    pub fn to_fen(&self) -> String {
        self.game_state.to_fen()
    }
}

impl<S: BoardScorer> Engine for NegascoutEngine<S> {
    fn name(&self) -> &str {
        "QuinceChess Negascout"
    }

    fn new_game(&mut self) {
        self.game_state = GameState::new_game();
        self.stop_signal.store(false, Ordering::Relaxed);
    }

    fn set_stop_signal(&mut self, stop_signal: Option<Arc<AtomicBool>>) {
        if let Some(stop_signal) = stop_signal {
            self.stop_signal = stop_signal;
        }
    }

    fn choose_move(
        &mut self,
        game_state: &GameState,
        limits: &SearchLimits,
    ) -> Result<EngineOutput, String> {
        self.game_state = game_state.clone();
        let depth = limits.depth.unwrap_or(self.default_depth);
        let result = self.search(depth, limits.movetime_ms)?;

        let mut out = EngineOutput {
            best_move: result.best_move,
            info_lines: Vec::with_capacity(result.completed_depths.len()),
        };
        for report in &result.completed_depths {
            let pv: Vec<String> = report
                .principal_variation
                .iter()
                .filter_map(|&mv| move_description_to_long_algebraic(mv).ok())
                .collect();
            out.info_lines.push(format!(
                "info depth {} score cp {} nodes {} pv {}",
                report.depth,
                report.score,
                report.nodes,
                pv.join(" ")
            ));
        }

        Ok(out)
    }
}
