//! Castling eligibility and the rook's side effect.

use crate::attacks;
use crate::board::Board;
use crate::safety::is_safe_after_move;
use crate::types::*;

const KING_FILE: u8 = 4;
const KINGSIDE_ROOK_FILE: u8 = 7;
const QUEENSIDE_ROOK_FILE: u8 = 0;
/// Must be empty for the queenside rook to pass, but the king never crosses it.
const QUEENSIDE_KNIGHT_FILE: u8 = 1;

/// Where the rook travels when the king goes `king_from -> king_to`, if that
/// king move is a castle.
pub fn rook_relocation(king_from: Square, king_to: Square) -> Option<(Square, Square)> {
    if king_from.rank() != king_to.rank() || king_from.file().abs_diff(king_to.file()) != 2 {
        return None;
    }
    let rank = king_from.rank();
    if king_to.file() > king_from.file() {
        Some((Square::at(rank, KINGSIDE_ROOK_FILE), Square::at(rank, 5)))
    } else {
        Some((Square::at(rank, QUEENSIDE_ROOK_FILE), Square::at(rank, 3)))
    }
}

/// Can the king on `king_sq` castle to the given side right now?
pub fn can_castle(board: &mut Board, king_sq: Square, kingside: bool) -> bool {
    let Some(king) = board.piece_at(king_sq) else {
        return false;
    };
    if king.kind != PieceKind::King || king.has_moved {
        return false;
    }
    let rank = king.color.home_rank();
    if king_sq != Square::at(rank, KING_FILE) {
        return false;
    }
    if attacks::in_check(board, king.color) {
        return false;
    }

    let rook_file = if kingside {
        KINGSIDE_ROOK_FILE
    } else {
        QUEENSIDE_ROOK_FILE
    };
    match board.piece_at(Square::at(rank, rook_file)) {
        Some(rook) if rook.kind == PieceKind::Rook && rook.color == king.color && !rook.has_moved => {}
        _ => return false,
    }

    let step: i8 = if kingside { 1 } else { -1 };
    let (Some(transit), Some(landing)) = (king_sq.offset(0, step), king_sq.offset(0, 2 * step))
    else {
        return false;
    };
    if !board.is_empty(transit) || !board.is_empty(landing) {
        return false;
    }
    if !kingside && !board.is_empty(Square::at(rank, QUEENSIDE_KNIGHT_FILE)) {
        return false;
    }

    // Neither through nor into check.
    is_safe_after_move(board, king_sq, transit) && is_safe_after_move(board, king_sq, landing)
}

#[cfg(test)]
#[path = "castling_tests.rs"]
mod castling_tests;
