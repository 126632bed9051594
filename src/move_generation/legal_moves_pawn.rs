use crate::game_state::{chess_types::*, game_state::GameState};
use crate::move_generation::legal_move_shared::enemy_piece_on;
use crate::moves::move_descriptions::{
    pack_move, FLAG_CAPTURE, FLAG_DOUBLE_PAWN_PUSH, FLAG_EN_PASSANT,
};

const PROMOTION_PIECES: [PieceKind; 4] = [
    PieceKind::Queen,
    PieceKind::Rook,
    PieceKind::Bishop,
    PieceKind::Knight,
];

pub fn generate_pawn_moves(game_state: &GameState, out: &mut Vec<Move>) {
    let side = game_state.side_to_move;
    let enemy_occ = game_state.occupancy_by_color[side.opposite().index()];
    let empty = !game_state.occupancy_all;

    let (push_step, start_rank, promotion_rank): (i8, u8, u8) = match side {
        Color::White => (8, 1, 7),
        Color::Black => (-8, 6, 0),
    };

    let mut pawns = game_state.pieces[side.index()][PieceKind::Pawn.index()];
    while pawns != 0 {
        let from = pawns.trailing_zeros() as Square;
        pawns &= pawns - 1;

        let file = from % 8;
        let rank = from / 8;

        // A pawn sitting on either back rank only occurs in hand-built
        // positions; stepping it off the board is not representable.
        if rank == 0 || rank == 7 {
            continue;
        }

        // Single and double pushes.
        let one_step = (from as i8 + push_step) as Square;
        if (1u64 << one_step) & empty != 0 {
            if one_step / 8 == promotion_rank {
                for promotion in PROMOTION_PIECES {
                    out.push(pack_move(from, one_step, PieceKind::Pawn, None, Some(promotion), 0));
                }
            } else {
                out.push(pack_move(from, one_step, PieceKind::Pawn, None, None, 0));

                if rank == start_rank {
                    let two_step = (from as i8 + 2 * push_step) as Square;
                    if (1u64 << two_step) & empty != 0 {
                        out.push(pack_move(
                            from,
                            two_step,
                            PieceKind::Pawn,
                            None,
                            None,
                            FLAG_DOUBLE_PAWN_PUSH,
                        ));
                    }
                }
            }
        }

        // Diagonal captures and en-passant.
        for file_step in [-1i8, 1i8] {
            let target_file = file as i8 + file_step;
            if !(0..=7).contains(&target_file) {
                continue;
            }
            let to = (from as i8 + push_step + file_step) as Square;

            if (1u64 << to) & enemy_occ != 0 {
                let captured = enemy_piece_on(game_state, to);
                if to / 8 == promotion_rank {
                    for promotion in PROMOTION_PIECES {
                        out.push(pack_move(
                            from,
                            to,
                            PieceKind::Pawn,
                            captured,
                            Some(promotion),
                            FLAG_CAPTURE,
                        ));
                    }
                } else {
                    out.push(pack_move(from, to, PieceKind::Pawn, captured, None, FLAG_CAPTURE));
                }
            } else if game_state.en_passant_square == Some(to) {
                out.push(pack_move(
                    from,
                    to,
                    PieceKind::Pawn,
                    Some(PieceKind::Pawn),
                    None,
                    FLAG_CAPTURE | FLAG_EN_PASSANT,
                ));
            }
        }
    }
}
