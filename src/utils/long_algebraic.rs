//! Coordinate move notation codec (`e2e4`, `e7e8q`).
//!
//! Parsing consults the position to fill in the moved and captured pieces
//! and the special-move flags a bare coordinate string does not carry.

use crate::game_state::{chess_types::*, game_state::GameState};
use crate::moves::move_descriptions::{
    move_from, move_promotion_piece, move_to, pack_move, FLAG_CAPTURE, FLAG_CASTLING,
    FLAG_DOUBLE_PAWN_PUSH, FLAG_EN_PASSANT,
};
use crate::utils::algebraic::{algebraic_to_square, square_to_algebraic};

pub fn move_description_to_long_algebraic(move_description: Move) -> Result<String, String> {
    let mut out = String::with_capacity(5);
    out.push_str(&square_to_algebraic(move_from(move_description))?);
    out.push_str(&square_to_algebraic(move_to(move_description))?);

    if let Some(promotion) = move_promotion_piece(move_description) {
        out.push(promotion_to_char(promotion)?);
    }

    Ok(out)
}

pub fn long_algebraic_to_move_description(
    long_algebraic: &str,
    game_state: &GameState,
) -> Result<Move, String> {
    let bytes = long_algebraic.as_bytes();
    if bytes.len() != 4 && bytes.len() != 5 {
        return Err(format!("Invalid long algebraic move: {long_algebraic}"));
    }

    let from = algebraic_to_square(&long_algebraic[0..2])?;
    let to = algebraic_to_square(&long_algebraic[2..4])?;

    let (moving_color, moved_piece) = game_state
        .piece_on_square(from)
        .ok_or_else(|| format!("No piece on from-square: {}", &long_algebraic[0..2]))?;
    if moving_color != game_state.side_to_move {
        return Err("Attempted to move a piece that is not on side to move".to_owned());
    }

    let target_piece = game_state.piece_on_square(to);
    let mut captured_piece = target_piece.map(|(_, piece)| piece);
    let mut flags = 0u64;

    if captured_piece.is_some() {
        flags |= FLAG_CAPTURE;
    }

    if moved_piece == PieceKind::Pawn && from.abs_diff(to) == 16 {
        flags |= FLAG_DOUBLE_PAWN_PUSH;
    }

    if moved_piece == PieceKind::King && from.abs_diff(to) == 2 {
        flags |= FLAG_CASTLING;
    }

    if moved_piece == PieceKind::Pawn
        && game_state.en_passant_square == Some(to)
        && from % 8 != to % 8
        && target_piece.is_none()
    {
        captured_piece = Some(PieceKind::Pawn);
        flags |= FLAG_CAPTURE | FLAG_EN_PASSANT;
    }

    let promotion_piece = if bytes.len() == 5 {
        if moved_piece != PieceKind::Pawn {
            return Err("Only pawns may promote".to_owned());
        }
        if to / 8 != 0 && to / 8 != 7 {
            return Err("Promotion move must end on a back rank".to_owned());
        }
        Some(char_to_promotion(bytes[4] as char)?)
    } else {
        if moved_piece == PieceKind::Pawn && (to / 8 == 0 || to / 8 == 7) {
            return Err(format!("Missing promotion piece in move: {long_algebraic}"));
        }
        None
    };

    Ok(pack_move(from, to, moved_piece, captured_piece, promotion_piece, flags))
}

fn promotion_to_char(piece: PieceKind) -> Result<char, String> {
    match piece {
        PieceKind::Knight => Ok('n'),
        PieceKind::Bishop => Ok('b'),
        PieceKind::Rook => Ok('r'),
        PieceKind::Queen => Ok('q'),
        _ => Err(format!("Invalid promotion piece: {piece:?}")),
    }
}

fn char_to_promotion(ch: char) -> Result<PieceKind, String> {
    match ch.to_ascii_lowercase() {
        'n' => Ok(PieceKind::Knight),
        'b' => Ok(PieceKind::Bishop),
        'r' => Ok(PieceKind::Rook),
        'q' => Ok(PieceKind::Queen),
        _ => Err(format!("Invalid promotion piece character: {ch}")),
    }
}
