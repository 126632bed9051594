//! GameState-to-FEN serializer, the inverse of `fen_parser`.

use crate::game_state::{chess_types::*, game_state::GameState};
use crate::utils::algebraic::square_to_algebraic;

pub fn generate_fen(game_state: &GameState) -> String {
    let side_to_move = match game_state.side_to_move {
        Color::White => "w",
        Color::Black => "b",
    };

    format!(
        "{} {} {} {} {} {}",
        board_field(game_state),
        side_to_move,
        castling_field(game_state.castling_rights),
        en_passant_field(game_state.en_passant_square),
        game_state.halfmove_clock,
        game_state.fullmove_number
    )
}

fn board_field(game_state: &GameState) -> String {
    let mut out = String::with_capacity(72);

    for rank in (0..8).rev() {
        let mut empty_run = 0u8;

        for file in 0..8 {
            let square = (rank * 8 + file) as Square;
            match game_state.piece_on_square(square) {
                Some((color, piece)) => {
                    if empty_run > 0 {
                        out.push(char::from(b'0' + empty_run));
                        empty_run = 0;
                    }
                    out.push(piece_fen_char(color, piece));
                }
                None => empty_run += 1,
            }
        }

        if empty_run > 0 {
            out.push(char::from(b'0' + empty_run));
        }
        if rank > 0 {
            out.push('/');
        }
    }

    out
}

fn piece_fen_char(color: Color, piece: PieceKind) -> char {
    let base = match piece {
        PieceKind::Pawn => 'p',
        PieceKind::Knight => 'n',
        PieceKind::Bishop => 'b',
        PieceKind::Rook => 'r',
        PieceKind::Queen => 'q',
        PieceKind::King => 'k',
    };

    match color {
        Color::White => base.to_ascii_uppercase(),
        Color::Black => base,
    }
}

fn castling_field(rights: CastlingRights) -> String {
    let mut out = String::new();

    if (rights & CASTLE_WHITE_KINGSIDE) != 0 {
        out.push('K');
    }
    if (rights & CASTLE_WHITE_QUEENSIDE) != 0 {
        out.push('Q');
    }
    if (rights & CASTLE_BLACK_KINGSIDE) != 0 {
        out.push('k');
    }
    if (rights & CASTLE_BLACK_QUEENSIDE) != 0 {
        out.push('q');
    }

    if out.is_empty() {
        out.push('-');
    }
    out
}

fn en_passant_field(square: Option<Square>) -> String {
    match square {
        Some(square) => square_to_algebraic(square).unwrap_or_else(|_| "-".to_owned()),
        None => "-".to_owned(),
    }
}

#[cfg(test)]
mod tests {
    use super::generate_fen;
    use crate::game_state::chess_rules::STARTING_POSITION_FEN;
    use crate::utils::fen_parser::parse_fen;

    #[test]
    fn round_trip_starting_position() {
        let parsed = parse_fen(STARTING_POSITION_FEN).expect("starting FEN should parse");
        assert_eq!(generate_fen(&parsed), STARTING_POSITION_FEN);
    }

    #[test]
    fn round_trip_reproduces_every_field_bit_for_bit() {
        let fens = [
            "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
            "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1",
            "rnbq1k1r/pp1Pbppp/2p5/8/2B5/8/PPP1NnPP/RNBQK2R w KQ - 1 8",
            "r1bqk2r/pppp1ppp/2n2n2/2b1p3/2B1P3/2N2N2/PPPP1PPP/R1BQ1RK1 b kq - 4 6",
            "4k3/8/8/3pP3/8/8/8/4K3 w - d6 0 2",
        ];

        for fen in fens {
            let parsed = parse_fen(fen).expect("fixture FEN should parse");
            let generated = generate_fen(&parsed);
            assert_eq!(generated, fen);

            let reparsed = parse_fen(&generated).expect("generated FEN should parse");
            assert_eq!(reparsed.pieces, parsed.pieces);
            assert_eq!(reparsed.side_to_move, parsed.side_to_move);
            assert_eq!(reparsed.castling_rights, parsed.castling_rights);
            assert_eq!(reparsed.en_passant_square, parsed.en_passant_square);
            assert_eq!(reparsed.halfmove_clock, parsed.halfmove_clock);
            assert_eq!(reparsed.fullmove_number, parsed.fullmove_number);
            assert_eq!(reparsed.zobrist_key, parsed.zobrist_key);
        }
    }
}
