use crate::game_state::chess_types::*;

/// Snapshot pushed by `make_move_in_place` and consumed by
/// `unmake_move_in_place`. Fields that the move itself cannot reconstruct
/// are recorded verbatim.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UndoState {
    pub move_description: Move,
    pub captured_piece: Option<PieceKind>,

    pub prev_castling_rights: CastlingRights,
    pub prev_en_passant_square: Option<Square>,
    pub prev_halfmove_clock: u16,
    pub prev_zobrist_key: u64,
}
