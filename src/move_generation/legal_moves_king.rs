//! King move generation, including the castling rules.
//!
//! Castling requires the right still held, every between-square empty, and
//! the king neither in check now nor crossing or landing on an attacked
//! square.

use crate::game_state::{chess_types::*, game_state::GameState};
use crate::move_generation::legal_move_checks::is_square_attacked;
use crate::move_generation::legal_move_shared::push_attack_moves;
use crate::moves::king_moves::king_attacks;
use crate::moves::move_descriptions::{pack_move, FLAG_CASTLING};

struct CastlingLane {
    right: CastlingRights,
    king_from: Square,
    king_to: Square,
    between: Bitboard,
    transit: [Square; 2],
}

const CASTLING_LANES: [CastlingLane; 4] = [
    CastlingLane {
        right: CASTLE_WHITE_KINGSIDE,
        king_from: 4,
        king_to: 6,
        between: (1 << 5) | (1 << 6),
        transit: [5, 6],
    },
    CastlingLane {
        right: CASTLE_WHITE_QUEENSIDE,
        king_from: 4,
        king_to: 2,
        between: (1 << 1) | (1 << 2) | (1 << 3),
        transit: [3, 2],
    },
    CastlingLane {
        right: CASTLE_BLACK_KINGSIDE,
        king_from: 60,
        king_to: 62,
        between: (1 << 61) | (1 << 62),
        transit: [61, 62],
    },
    CastlingLane {
        right: CASTLE_BLACK_QUEENSIDE,
        king_from: 60,
        king_to: 58,
        between: (1 << 57) | (1 << 58) | (1 << 59),
        transit: [59, 58],
    },
];

pub fn generate_king_moves(game_state: &GameState, out: &mut Vec<Move>) {
    let side = game_state.side_to_move;
    let own_occ = game_state.occupancy_by_color[side.index()];
    let king_bb = game_state.pieces[side.index()][PieceKind::King.index()];
    if king_bb == 0 {
        return;
    }

    let from = king_bb.trailing_zeros() as Square;
    push_attack_moves(game_state, out, from, PieceKind::King, king_attacks(from) & !own_occ);

    generate_castling_moves(game_state, out, from);
}

fn generate_castling_moves(game_state: &GameState, out: &mut Vec<Move>, king_from: Square) {
    let side = game_state.side_to_move;
    let enemy = side.opposite();

    let own_lanes = match side {
        Color::White => &CASTLING_LANES[0..2],
        Color::Black => &CASTLING_LANES[2..4],
    };

    let mut checked_own_square = false;
    for lane in own_lanes {
        if (game_state.castling_rights & lane.right) == 0 || lane.king_from != king_from {
            continue;
        }
        if (game_state.occupancy_all & lane.between) != 0 {
            continue;
        }

        // Cannot castle out of check; test lazily, once, only when a lane
        // is otherwise available.
        if !checked_own_square {
            if is_square_attacked(game_state, king_from, enemy) {
                return;
            }
            checked_own_square = true;
        }

        if lane
            .transit
            .iter()
            .any(|&square| is_square_attacked(game_state, square, enemy))
        {
            continue;
        }

        out.push(pack_move(
            lane.king_from,
            lane.king_to,
            PieceKind::King,
            None,
            None,
            FLAG_CASTLING,
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::generate_king_moves;
    use crate::game_state::game_state::GameState;
    use crate::moves::move_descriptions::{move_to, FLAG_CASTLING};

    fn castling_targets(fen: &str) -> Vec<u8> {
        let game = GameState::from_fen(fen).expect("fixture FEN should parse");
        let mut moves = Vec::new();
        generate_king_moves(&game, &mut moves);
        moves
            .iter()
            .filter(|&&mv| (mv & FLAG_CASTLING) != 0)
            .map(|&mv| move_to(mv))
            .collect()
    }

    #[test]
    fn both_castling_lanes_open() {
        let targets = castling_targets("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1");
        assert_eq!(targets, vec![6, 2]);
    }

    #[test]
    fn castling_is_blocked_by_between_pieces() {
        let targets = castling_targets("r3k2r/8/8/8/8/8/8/RN2K1NR w KQkq - 0 1");
        assert!(targets.is_empty());
    }

    #[test]
    fn cannot_castle_out_of_check() {
        let targets = castling_targets("r3k2r/8/8/8/8/8/4r3/R3K2R w KQkq - 0 1");
        assert!(targets.is_empty());
    }

    #[test]
    fn cannot_castle_through_an_attacked_square() {
        // Black rook on f8 covers f1, killing the kingside lane only.
        let targets = castling_targets("4kr2/8/8/8/8/8/8/R3K2R w KQ - 0 1");
        assert_eq!(targets, vec![2]);
    }

    #[test]
    fn attacked_b_file_square_does_not_stop_queenside_castling() {
        // Black rook on b8 covers b1, which the king never crosses.
        let targets = castling_targets("1r2k3/8/8/8/8/8/8/R3K2R w KQ - 0 1");
        assert_eq!(targets, vec![6, 2]);
    }

    #[test]
    fn no_rights_means_no_castling_moves() {
        let targets = castling_targets("r3k2r/8/8/8/8/8/8/R3K2R w - - 0 1");
        assert!(targets.is_empty());
    }
}
