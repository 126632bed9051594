//! FEN-to-GameState parser.
//!
//! Builds a fully populated position from a six-field Forsyth-Edwards
//! Notation string: piece bitboards, rights, clocks, occupancies, and the
//! Zobrist signature that seeds the repetition history. Each malformed
//! field fails with a distinct error variant so callers can decide whether
//! to fall back to the standard starting position.

use std::error::Error;
use std::fmt;

use crate::game_state::{chess_types::*, game_state::GameState};
use crate::search::zobrist::compute_zobrist_key;
use crate::utils::algebraic::algebraic_to_square;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FenParseError {
    MissingField(&'static str),
    TrailingFields,
    BadBoardLayout(String),
    InvalidPieceChar(char),
    InvalidSideToMove(String),
    InvalidCastlingChar(char),
    InvalidEnPassantSquare(String),
    InvalidHalfmoveClock(String),
    InvalidFullmoveNumber(String),
}

impl fmt::Display for FenParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FenParseError::MissingField(name) => write!(f, "missing FEN field: {name}"),
            FenParseError::TrailingFields => write!(f, "FEN has extra trailing fields"),
            FenParseError::BadBoardLayout(msg) => write!(f, "bad board layout: {msg}"),
            FenParseError::InvalidPieceChar(ch) => write!(f, "invalid piece character '{ch}'"),
            FenParseError::InvalidSideToMove(field) => write!(f, "invalid side to move: {field}"),
            FenParseError::InvalidCastlingChar(ch) => {
                write!(f, "invalid castling rights character '{ch}'")
            }
            FenParseError::InvalidEnPassantSquare(field) => {
                write!(f, "invalid en-passant square: {field}")
            }
            FenParseError::InvalidHalfmoveClock(field) => {
                write!(f, "invalid halfmove clock: {field}")
            }
            FenParseError::InvalidFullmoveNumber(field) => {
                write!(f, "invalid fullmove number: {field}")
            }
        }
    }
}

impl Error for FenParseError {}

pub fn parse_fen(fen: &str) -> Result<GameState, FenParseError> {
    let mut fields = fen.split_whitespace();

    let board_field = fields.next().ok_or(FenParseError::MissingField("board layout"))?;
    let side_field = fields.next().ok_or(FenParseError::MissingField("side to move"))?;
    let castling_field = fields.next().ok_or(FenParseError::MissingField("castling rights"))?;
    let en_passant_field = fields.next().ok_or(FenParseError::MissingField("en-passant square"))?;
    let halfmove_field = fields.next().ok_or(FenParseError::MissingField("halfmove clock"))?;
    let fullmove_field = fields.next().ok_or(FenParseError::MissingField("fullmove number"))?;

    if fields.next().is_some() {
        return Err(FenParseError::TrailingFields);
    }

    let mut game_state = GameState::new_empty();

    parse_board_field(board_field, &mut game_state)?;

    game_state.side_to_move = match side_field {
        "w" => Color::White,
        "b" => Color::Black,
        other => return Err(FenParseError::InvalidSideToMove(other.to_owned())),
    };

    game_state.castling_rights = parse_castling_field(castling_field)?;

    game_state.en_passant_square = if en_passant_field == "-" {
        None
    } else {
        Some(
            algebraic_to_square(en_passant_field)
                .map_err(|_| FenParseError::InvalidEnPassantSquare(en_passant_field.to_owned()))?,
        )
    };

    game_state.halfmove_clock = halfmove_field
        .parse::<u16>()
        .map_err(|_| FenParseError::InvalidHalfmoveClock(halfmove_field.to_owned()))?;
    game_state.fullmove_number = fullmove_field
        .parse::<u16>()
        .map_err(|_| FenParseError::InvalidFullmoveNumber(fullmove_field.to_owned()))?;

    game_state.recompute_occupancy();
    game_state.zobrist_key = compute_zobrist_key(&game_state);
    game_state.repetition_history = vec![game_state.zobrist_key];

    Ok(game_state)
}

fn parse_board_field(board_field: &str, game_state: &mut GameState) -> Result<(), FenParseError> {
    let ranks: Vec<&str> = board_field.split('/').collect();
    if ranks.len() != 8 {
        return Err(FenParseError::BadBoardLayout(format!(
            "expected 8 ranks, found {}",
            ranks.len()
        )));
    }

    for (fen_rank_idx, rank_str) in ranks.iter().enumerate() {
        let board_rank = 7 - fen_rank_idx;
        let mut file = 0usize;

        for ch in rank_str.chars() {
            if let Some(empty_count) = ch.to_digit(10) {
                if !(1..=8).contains(&empty_count) {
                    return Err(FenParseError::BadBoardLayout(format!(
                        "invalid empty-square count '{ch}'"
                    )));
                }
                file += empty_count as usize;
                continue;
            }

            let (color, piece) =
                piece_from_fen_char(ch).ok_or(FenParseError::InvalidPieceChar(ch))?;
            if file >= 8 {
                return Err(FenParseError::BadBoardLayout(format!(
                    "rank {} has too many files",
                    board_rank + 1
                )));
            }

            let square = board_rank * 8 + file;
            game_state.pieces[color.index()][piece.index()] |= 1u64 << square;
            file += 1;
        }

        if file != 8 {
            return Err(FenParseError::BadBoardLayout(format!(
                "rank {} does not sum to 8 files",
                board_rank + 1
            )));
        }
    }

    Ok(())
}

fn parse_castling_field(castling_field: &str) -> Result<CastlingRights, FenParseError> {
    if castling_field == "-" {
        return Ok(0);
    }

    let mut rights: CastlingRights = 0;
    for ch in castling_field.chars() {
        match ch {
            'K' => rights |= CASTLE_WHITE_KINGSIDE,
            'Q' => rights |= CASTLE_WHITE_QUEENSIDE,
            'k' => rights |= CASTLE_BLACK_KINGSIDE,
            'q' => rights |= CASTLE_BLACK_QUEENSIDE,
            _ => return Err(FenParseError::InvalidCastlingChar(ch)),
        }
    }

    Ok(rights)
}

fn piece_from_fen_char(ch: char) -> Option<(Color, PieceKind)> {
    let color = if ch.is_ascii_uppercase() {
        Color::White
    } else if ch.is_ascii_lowercase() {
        Color::Black
    } else {
        return None;
    };

    let piece = match ch.to_ascii_lowercase() {
        'p' => PieceKind::Pawn,
        'n' => PieceKind::Knight,
        'b' => PieceKind::Bishop,
        'r' => PieceKind::Rook,
        'q' => PieceKind::Queen,
        'k' => PieceKind::King,
        _ => return None,
    };

    Some((color, piece))
}
