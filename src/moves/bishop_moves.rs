//! Occupancy-aware bishop attack generation.
//!
//! Rays are walked outward per diagonal and stop at the first occupied
//! square, which is included so captures of the blocker are expressible.

use crate::game_state::chess_types::{Bitboard, Square};

const BISHOP_DIRECTIONS: [(i32, i32); 4] = [(1, 1), (1, -1), (-1, 1), (-1, -1)];

pub fn bishop_attacks(square: Square, occupancy: Bitboard) -> Bitboard {
    sliding_attacks(square, occupancy, &BISHOP_DIRECTIONS)
}

pub(crate) fn sliding_attacks(
    square: Square,
    occupancy: Bitboard,
    directions: &[(i32, i32)],
) -> Bitboard {
    let start_file = i32::from(square % 8);
    let start_rank = i32::from(square / 8);
    let mut attacks = 0u64;

    for &(file_step, rank_step) in directions {
        let mut file = start_file + file_step;
        let mut rank = start_rank + rank_step;

        while (0..8).contains(&file) && (0..8).contains(&rank) {
            let bit = 1u64 << (rank * 8 + file);
            attacks |= bit;
            if (occupancy & bit) != 0 {
                break;
            }
            file += file_step;
            rank += rank_step;
        }
    }

    attacks
}
