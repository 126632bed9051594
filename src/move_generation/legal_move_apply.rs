//! In-place move application with snapshot-restore undo.
//!
//! `make_move_in_place` mutates the position, pushes an `UndoState`, and
//! keeps the Zobrist signature updated incrementally; `unmake_move_in_place`
//! restores the exact prior state. Every search frame pairs the two on all
//! exit paths, so the position a search borrows is bit-identical once the
//! search returns.

use crate::game_state::{chess_types::*, game_state::GameState};
use crate::moves::move_descriptions::{
    is_capture, move_captured_piece, move_from, move_moved_piece, move_promotion_piece, move_to,
    FLAG_CASTLING, FLAG_DOUBLE_PAWN_PUSH, FLAG_EN_PASSANT,
};
use crate::search::zobrist::{
    castling_key, en_passant_file_key, piece_square_key, side_to_move_key,
};

pub fn make_move_in_place(game_state: &mut GameState, move_description: Move) -> Result<(), String> {
    let from = move_from(move_description);
    let to = move_to(move_description);
    let from_mask = 1u64 << from;
    let to_mask = 1u64 << to;

    let us = game_state.side_to_move;
    let them = us.opposite();

    let moved_piece = move_moved_piece(move_description)
        .ok_or_else(|| format!("move {move_description:#x} carries no moved piece"))?;
    if (game_state.pieces[us.index()][moved_piece.index()] & from_mask) == 0 {
        return Err(format!("no {moved_piece:?} of the side to move on square {from}"));
    }
    let captured_piece = move_captured_piece(move_description);

    game_state.undo_stack.push(UndoState {
        move_description,
        captured_piece,
        prev_castling_rights: game_state.castling_rights,
        prev_en_passant_square: game_state.en_passant_square,
        prev_halfmove_clock: game_state.halfmove_clock,
        prev_zobrist_key: game_state.zobrist_key,
    });

    let mut key = game_state.zobrist_key;
    key ^= castling_key(game_state.castling_rights);
    if let Some(ep_square) = game_state.en_passant_square {
        key ^= en_passant_file_key(ep_square % 8);
    }

    // Lift the mover.
    game_state.pieces[us.index()][moved_piece.index()] &= !from_mask;
    key ^= piece_square_key(us, moved_piece, from);

    // Remove the victim, which for en-passant is not on the target square.
    if (move_description & FLAG_EN_PASSANT) != 0 {
        let capture_square = en_passant_victim_square(us, to)?;
        game_state.pieces[them.index()][PieceKind::Pawn.index()] &= !(1u64 << capture_square);
        key ^= piece_square_key(them, PieceKind::Pawn, capture_square);
    } else if is_capture(move_description) {
        let victim = captured_piece
            .ok_or_else(|| format!("capture move {move_description:#x} carries no victim"))?;
        game_state.pieces[them.index()][victim.index()] &= !to_mask;
        key ^= piece_square_key(them, victim, to);
    }

    // Drop the mover (or the promoted piece) on the target square.
    let placed_piece = move_promotion_piece(move_description).unwrap_or(moved_piece);
    game_state.pieces[us.index()][placed_piece.index()] |= to_mask;
    key ^= piece_square_key(us, placed_piece, to);

    // Castling relocates the paired rook as well.
    if (move_description & FLAG_CASTLING) != 0 {
        let (rook_from, rook_to) = castling_rook_squares(us, to)?;
        game_state.pieces[us.index()][PieceKind::Rook.index()] ^=
            (1u64 << rook_from) | (1u64 << rook_to);
        key ^= piece_square_key(us, PieceKind::Rook, rook_from);
        key ^= piece_square_key(us, PieceKind::Rook, rook_to);
    }

    update_castling_rights(game_state, us, moved_piece, from, to);

    game_state.en_passant_square = if (move_description & FLAG_DOUBLE_PAWN_PUSH) != 0 {
        Some((from + to) / 2)
    } else {
        None
    };

    if moved_piece == PieceKind::Pawn || is_capture(move_description) {
        game_state.halfmove_clock = 0;
    } else {
        game_state.halfmove_clock = game_state.halfmove_clock.saturating_add(1);
    }
    if us == Color::Black {
        game_state.fullmove_number = game_state.fullmove_number.saturating_add(1);
    }

    game_state.side_to_move = them;
    game_state.ply = game_state.ply.saturating_add(1);

    key ^= side_to_move_key();
    key ^= castling_key(game_state.castling_rights);
    if let Some(ep_square) = game_state.en_passant_square {
        key ^= en_passant_file_key(ep_square % 8);
    }
    game_state.zobrist_key = key;

    game_state.recompute_occupancy();
    game_state.repetition_history.push(key);

    Ok(())
}

pub fn unmake_move_in_place(game_state: &mut GameState) -> Result<(), String> {
    let undo = game_state
        .undo_stack
        .pop()
        .ok_or("unmake_move_in_place called without a prior make")?;
    let move_description = undo.move_description;

    let from = move_from(move_description);
    let to = move_to(move_description);
    let from_mask = 1u64 << from;
    let to_mask = 1u64 << to;

    let mover = game_state.side_to_move.opposite();
    let enemy = game_state.side_to_move;

    let moved_piece = move_moved_piece(move_description)
        .ok_or_else(|| format!("undo move {move_description:#x} carries no moved piece"))?;
    let placed_piece = move_promotion_piece(move_description).unwrap_or(moved_piece);

    game_state.pieces[mover.index()][placed_piece.index()] &= !to_mask;
    game_state.pieces[mover.index()][moved_piece.index()] |= from_mask;

    if (move_description & FLAG_EN_PASSANT) != 0 {
        let capture_square = en_passant_victim_square(mover, to)?;
        game_state.pieces[enemy.index()][PieceKind::Pawn.index()] |= 1u64 << capture_square;
    } else if is_capture(move_description) {
        let victim = undo
            .captured_piece
            .ok_or_else(|| format!("undo capture {move_description:#x} carries no victim"))?;
        game_state.pieces[enemy.index()][victim.index()] |= to_mask;
    }

    if (move_description & FLAG_CASTLING) != 0 {
        let (rook_from, rook_to) = castling_rook_squares(mover, to)?;
        game_state.pieces[mover.index()][PieceKind::Rook.index()] ^=
            (1u64 << rook_from) | (1u64 << rook_to);
    }

    game_state.castling_rights = undo.prev_castling_rights;
    game_state.en_passant_square = undo.prev_en_passant_square;
    game_state.halfmove_clock = undo.prev_halfmove_clock;
    if mover == Color::Black {
        game_state.fullmove_number = game_state.fullmove_number.saturating_sub(1);
    }
    game_state.side_to_move = mover;
    game_state.ply = game_state.ply.saturating_sub(1);
    game_state.zobrist_key = undo.prev_zobrist_key;

    game_state.repetition_history.pop();
    game_state.recompute_occupancy();

    Ok(())
}

#[inline]
fn en_passant_victim_square(mover: Color, to: Square) -> Result<Square, String> {
    match mover {
        Color::White => to
            .checked_sub(8)
            .ok_or_else(|| format!("bad en-passant target square {to} for white")),
        Color::Black => {
            let square = to + 8;
            if square > 63 {
                Err(format!("bad en-passant target square {to} for black"))
            } else {
                Ok(square)
            }
        }
    }
}

#[inline]
fn castling_rook_squares(color: Color, king_to: Square) -> Result<(Square, Square), String> {
    match (color, king_to) {
        (Color::White, 6) => Ok((7, 5)),
        (Color::White, 2) => Ok((0, 3)),
        (Color::Black, 62) => Ok((63, 61)),
        (Color::Black, 58) => Ok((56, 59)),
        _ => Err(format!("castling move with invalid king target square {king_to}")),
    }
}

fn update_castling_rights(
    game_state: &mut GameState,
    moving_color: Color,
    moved_piece: PieceKind,
    from: Square,
    to: Square,
) {
    if moved_piece == PieceKind::King {
        match moving_color {
            Color::White => {
                game_state.castling_rights &= !(CASTLE_WHITE_KINGSIDE | CASTLE_WHITE_QUEENSIDE)
            }
            Color::Black => {
                game_state.castling_rights &= !(CASTLE_BLACK_KINGSIDE | CASTLE_BLACK_QUEENSIDE)
            }
        }
    }

    if moved_piece == PieceKind::Rook {
        clear_right_for_rook_home(game_state, from);
    }
    // A capture landing on a rook home square also clears that right.
    clear_right_for_rook_home(game_state, to);
}

#[inline]
fn clear_right_for_rook_home(game_state: &mut GameState, square: Square) {
    match square {
        0 => game_state.castling_rights &= !CASTLE_WHITE_QUEENSIDE,
        7 => game_state.castling_rights &= !CASTLE_WHITE_KINGSIDE,
        56 => game_state.castling_rights &= !CASTLE_BLACK_QUEENSIDE,
        63 => game_state.castling_rights &= !CASTLE_BLACK_KINGSIDE,
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::{make_move_in_place, unmake_move_in_place};
    use crate::game_state::game_state::GameState;
    use crate::move_generation::legal_move_generator::generate_legal_moves_in_place;
    use crate::search::zobrist::compute_zobrist_key;
    use crate::utils::long_algebraic::long_algebraic_to_move_description;

    fn make_unmake_round_trip(fen: &str) {
        let mut game = GameState::from_fen(fen).expect("fixture FEN should parse");
        let pristine = game.clone();

        let moves = generate_legal_moves_in_place(&mut game).expect("generation should succeed");
        assert!(!moves.is_empty(), "fixture should have legal moves: {fen}");

        for mv in moves {
            make_move_in_place(&mut game, mv).expect("legal move should apply");
            assert_eq!(
                game.zobrist_key,
                compute_zobrist_key(&game),
                "incremental signature should match recomputation after {mv:#x}"
            );
            unmake_move_in_place(&mut game).expect("unmake should succeed");
            assert_eq!(game, pristine, "make/unmake should restore the exact state");
        }
    }

    #[test]
    fn make_unmake_symmetry_from_the_starting_position() {
        make_unmake_round_trip("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1");
    }

    #[test]
    fn make_unmake_symmetry_with_castling_en_passant_and_promotions() {
        // Kiwipete: castling both ways, an en-passant capture, heavy tactics.
        make_unmake_round_trip(
            "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
        );
        // Promotions and underpromotions for both sides.
        make_unmake_round_trip("rnbq1k1r/pp1Pbppp/2p5/8/2B5/8/PPP1NnPP/RNBQK2R w KQ - 1 8");
        // En-passant capture available immediately.
        make_unmake_round_trip("4k3/8/8/3pP3/8/8/8/4K3 w - d6 0 2");
    }

    #[test]
    fn en_passant_removes_the_bypassed_pawn() {
        let mut game =
            GameState::from_fen("4k3/8/8/3pP3/8/8/8/4K3 w - d6 0 2").expect("FEN should parse");
        let mv = long_algebraic_to_move_description("e5d6", &game).expect("move should parse");
        make_move_in_place(&mut game, mv).expect("en-passant should apply");
        assert_eq!(game.to_fen(), "4k3/8/3P4/8/8/8/8/4K3 b - - 0 2");
    }

    #[test]
    fn castling_moves_both_king_and_rook() {
        let mut game = GameState::from_fen("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1")
            .expect("FEN should parse");
        let mv = long_algebraic_to_move_description("e1g1", &game).expect("move should parse");
        make_move_in_place(&mut game, mv).expect("castling should apply");
        assert_eq!(game.to_fen(), "r3k2r/8/8/8/8/8/8/R4RK1 b kq - 1 1");
    }

    #[test]
    fn capturing_a_home_rook_clears_that_castling_right() {
        let mut game = GameState::from_fen("r3k2r/8/8/8/8/8/6q1/R3K2R b KQkq - 0 1")
            .expect("FEN should parse");
        let mv = long_algebraic_to_move_description("g2h1", &game).expect("move should parse");
        make_move_in_place(&mut game, mv).expect("capture should apply");
        assert_eq!(game.castling_rights & crate::game_state::chess_types::CASTLE_WHITE_KINGSIDE, 0);
        assert_ne!(game.castling_rights & crate::game_state::chess_types::CASTLE_WHITE_QUEENSIDE, 0);
    }

    #[test]
    fn halfmove_clock_resets_on_pawn_moves_and_captures_only() {
        let mut game = GameState::from_fen("4k3/8/8/8/7n/8/4P3/4KN2 w - - 7 20")
            .expect("FEN should parse");

        let quiet = long_algebraic_to_move_description("f1d2", &game).expect("move should parse");
        make_move_in_place(&mut game, quiet).expect("quiet move should apply");
        assert_eq!(game.halfmove_clock, 8);
        unmake_move_in_place(&mut game).expect("unmake should succeed");

        let pawn_push = long_algebraic_to_move_description("e2e3", &game).expect("move should parse");
        make_move_in_place(&mut game, pawn_push).expect("pawn move should apply");
        assert_eq!(game.halfmove_clock, 0);
    }
}
