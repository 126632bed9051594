//! Engine abstraction used by protocol front-ends.
//!
//! Different engine strategies sit behind one trait so a front-end can
//! select them at runtime. Diagnostics travel as UCI-style `info string`
//! lines rather than direct output.

use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use crate::game_state::chess_types::Move;
use crate::game_state::game_state::GameState;

#[derive(Debug, Clone, Copy, Default)]
pub struct SearchLimits {
    pub depth: Option<u8>,
    pub movetime_ms: Option<u64>,
}

#[derive(Debug, Clone, Default)]
pub struct EngineOutput {
    pub best_move: Option<Move>,
    pub info_lines: Vec<String>,
}

pub trait Engine: Send {
    fn name(&self) -> &str;

    fn new_game(&mut self) {}

    fn set_stop_signal(&mut self, _stop_signal: Option<Arc<AtomicBool>>) {}

    fn choose_move(
        &mut self,
        game_state: &GameState,
        limits: &SearchLimits,
    ) -> Result<EngineOutput, String>;
}
