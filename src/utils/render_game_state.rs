//! Plain-text board renderer for tests and terminal diagnostics.

use crate::game_state::{chess_types::*, game_state::GameState};

/// Render the board as an 8x8 ASCII diagram, rank 8 at the top.
pub fn render_game_state(game_state: &GameState) -> String {
    let mut out = String::new();

    for rank in (0..8).rev() {
        out.push(char::from(b'1' + rank));
        out.push(' ');

        for file in 0..8 {
            let square = rank * 8 + file;
            match game_state.piece_on_square(square) {
                Some((color, piece)) => out.push(piece_letter(color, piece)),
                None => out.push('.'),
            }
            out.push(' ');
        }
        out.push('\n');
    }

    out.push_str("  a b c d e f g h");
    out
}

fn piece_letter(color: Color, piece: PieceKind) -> char {
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
