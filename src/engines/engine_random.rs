//! Uniform random-move engine.
//!
//! Picks uniformly from the legal moves; useful as a diagnostics baseline
//! and as the weakest rung in engine-versus-engine testing.

use rand::prelude::IndexedRandom;

use crate::engines::engine_trait::{Engine, EngineOutput, SearchLimits};
use crate::game_state::game_state::GameState;
use crate::move_generation::legal_move_generator::generate_legal_moves;

#[derive(Debug, Default)]
pub struct RandomEngine;

impl RandomEngine {
    pub fn new() -> Self {
        Self
    }
}

impl Engine for RandomEngine {
    fn name(&self) -> &str {
        "QuinceChess Random"
    }

    fn choose_move(
        &mut self,
        game_state: &GameState,
        _limits: &SearchLimits,
    ) -> Result<EngineOutput, String> {
        let legal_moves = generate_legal_moves(game_state).map_err(|e| e.to_string())?;

        let mut out = EngineOutput::default();
        out.info_lines
            .push(format!("info string random_engine legal_moves {}", legal_moves.len()));

        if legal_moves.is_empty() {
            return Ok(out);
        }

        let mut rng = rand::rng();
        let picked = legal_moves
            .as_slice()
            .choose(&mut rng)
            .ok_or("failed to choose a random move")?;
        out.best_move = Some(*picked);

        Ok(out)
    }
}
