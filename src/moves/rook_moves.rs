//! Occupancy-aware rook attack generation.

use crate::game_state::chess_types::{Bitboard, Square};
use crate::moves::bishop_moves::sliding_attacks;

const ROOK_DIRECTIONS: [(i32, i32); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];

pub fn rook_attacks(square: Square, occupancy: Bitboard) -> Bitboard {
    sliding_attacks(square, occupancy, &ROOK_DIRECTIONS)
}
