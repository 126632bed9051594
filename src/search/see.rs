//! Static Exchange Evaluation.
//!
//! Predicts the net material outcome of a forced capture sequence on one
//! square, assuming each side always recaptures with its least valuable
//! available attacker and may stop whenever continuing loses material.
//! Positive results favor the side making the first capture.

use crate::game_state::{chess_types::*, game_state::GameState};
use crate::moves::bishop_moves::bishop_attacks;
use crate::moves::king_moves::king_attacks;
use crate::moves::knight_moves::knight_attacks;
use crate::moves::move_descriptions::{
    is_capture, move_captured_piece, move_from, move_moved_piece, move_to, FLAG_EN_PASSANT,
};
use crate::moves::pawn_moves::pawn_attacks;
use crate::moves::rook_moves::rook_attacks;

const MAX_EXCHANGE_DEPTH: usize = 32;

/// Net material of the exchange sequence a capture starts, in centipawns.
/// Non-captures evaluate to zero.
pub fn static_exchange_evaluation(game_state: &GameState, move_description: Move) -> i32 {
    if !is_capture(move_description) {
        return 0;
    }
    let Some(initial_attacker) = move_moved_piece(move_description) else {
        return 0;
    };

    let from = move_from(move_description);
    let to = move_to(move_description);

    let mut gain = [0i32; MAX_EXCHANGE_DEPTH];
    let mut depth = 0usize;

    let mut occupancy = game_state.occupancy_all;
    let mut attacker_set = 1u64 << from;
    let mut attacker_value = initial_attacker.value();
    let mut side = game_state.side_to_move;

    // Seed with the initial victim. For en-passant the victim is a pawn that
    // does not sit on the target square; lift it out of the occupancy too.
    gain[0] = if (move_description & FLAG_EN_PASSANT) != 0 {
        let victim_square = match side {
            Color::White => to.wrapping_sub(8),
            Color::Black => to + 8,
        };
        occupancy &= !(1u64 << victim_square);
        PieceKind::Pawn.value()
    } else {
        match move_captured_piece(move_description) {
            Some(victim) => victim.value(),
            None => return 0,
        }
    };

    loop {
        depth += 1;
        if depth >= MAX_EXCHANGE_DEPTH {
            break;
        }
        // Speculative score if the piece that just captured is taken back.
        gain[depth] = attacker_value - gain[depth - 1];

        // Neither side can improve by continuing from here.
        if gain[depth].max(-gain[depth - 1]) < 0 {
            break;
        }

        // The captor leaves its origin square, possibly unmasking a slider
        // behind it for the next round.
        occupancy ^= attacker_set;
        side = side.opposite();

        let Some((next_set, next_kind)) = least_valuable_attacker(game_state, to, occupancy, side)
        else {
            break;
        };
        attacker_set = next_set;
        attacker_value = next_kind.value();
    }

    // Fold back to front: each side may decline the recapture.
    while depth > 1 {
        depth -= 1;
        gain[depth - 1] = -gain[depth].max(-gain[depth - 1]);
    }

    gain[0]
}

/// Cheapest piece of `side` attacking `square` under `occupancy`, as a
/// one-hot bitboard plus its kind. Sliding attacks are recomputed against
/// the shrinking occupancy so x-ray attackers participate.
fn least_valuable_attacker(
    game_state: &GameState,
    square: Square,
    occupancy: Bitboard,
    side: Color,
) -> Option<(Bitboard, PieceKind)> {
    let pieces = &game_state.pieces[side.index()];

    let pawns = pieces[PieceKind::Pawn.index()] & occupancy;
    let pawn_reach = pawn_attacks(side.opposite(), square);
    let candidates = pawns & pawn_reach;
    if candidates != 0 {
        return Some((candidates & candidates.wrapping_neg(), PieceKind::Pawn));
    }

    let knights = pieces[PieceKind::Knight.index()] & occupancy;
    let candidates = knights & knight_attacks(square);
    if candidates != 0 {
        return Some((candidates & candidates.wrapping_neg(), PieceKind::Knight));
    }

    let diagonal_reach = bishop_attacks(square, occupancy);
    let bishops = pieces[PieceKind::Bishop.index()] & occupancy;
    let candidates = bishops & diagonal_reach;
    if candidates != 0 {
        return Some((candidates & candidates.wrapping_neg(), PieceKind::Bishop));
    }

    let straight_reach = rook_attacks(square, occupancy);
    let rooks = pieces[PieceKind::Rook.index()] & occupancy;
    let candidates = rooks & straight_reach;
    if candidates != 0 {
        return Some((candidates & candidates.wrapping_neg(), PieceKind::Rook));
    }

    let queens = pieces[PieceKind::Queen.index()] & occupancy;
    let candidates = queens & (diagonal_reach | straight_reach);
    if candidates != 0 {
        return Some((candidates & candidates.wrapping_neg(), PieceKind::Queen));
    }

    let kings = pieces[PieceKind::King.index()] & occupancy;
    let candidates = kings & king_attacks(square);
    if candidates != 0 {
        return Some((candidates & candidates.wrapping_neg(), PieceKind::King));
    }

    None
}

#[cfg(test)]
mod tests {
    use super::static_exchange_evaluation;
    use crate::game_state::game_state::GameState;
    use crate::utils::long_algebraic::long_algebraic_to_move_description;

    fn see(fen: &str, long_algebraic: &str) -> i32 {
        let game = GameState::from_fen(fen).expect("fixture FEN should parse");
        let mv = long_algebraic_to_move_description(long_algebraic, &game)
            .expect("fixture move should parse");
        static_exchange_evaluation(&game, mv)
    }

    #[test]
    fn pawn_takes_undefended_pawn_wins_a_pawn() {
        assert_eq!(see("4k3/8/8/3p4/4P3/8/8/4K3 w - - 0 1", "e4d5"), 100);
    }

    #[test]
    fn queen_takes_pawn_defended_by_rook_loses_the_queen() {
        assert_eq!(see("3rk3/8/8/3p4/8/8/3Q4/4K3 w - - 0 1", "d2d5"), -800);
    }

    #[test]
    fn equal_trade_of_defended_pieces_nets_zero() {
        // NxN, the knight is recaptured by a pawn: 320 - 320 = 0.
        assert_eq!(see("4k3/3p4/4n3/8/3N4/8/8/4K3 w - - 0 1", "d4e6"), 0);
    }

    #[test]
    fn rook_takes_knight_defended_by_pawn_loses_the_exchange() {
        assert_eq!(see("4k3/8/3p4/4n3/8/8/4R3/4K3 w - - 0 1", "e2e5"), -180);
    }

    #[test]
    fn xray_attacker_joins_the_exchange() {
        // White rooks doubled on the e-file; the front rook captures, the
        // back one recaptures through the vacated square.
        assert_eq!(see("4k3/4q3/8/4p3/8/8/4R3/3KR3 w - - 0 1", "e2e5"), 100);
    }

    #[test]
    fn en_passant_capture_evaluates_the_bypassed_pawn() {
        assert_eq!(see("4k3/8/8/3pP3/8/8/8/4K3 w - d6 0 2", "e5d6"), 100);
    }

    #[test]
    fn non_capture_moves_evaluate_to_zero() {
        assert_eq!(see("4k3/8/8/8/8/8/4P3/4K3 w - - 0 1", "e2e4"), 0);
    }
}
