use crate::board::{Board, LastMove};
use crate::safety;
use crate::types::*;

/// Square a capturing pawn would land on if the last move can be taken
/// en passant by the pawn on `pawn_sq`.
pub fn can_en_passant(
    board: &mut Board,
    pawn_sq: Square,
    active: Color,
    last_move: Option<&LastMove>,
) -> Option<Square> {
    let last = last_move?;
    let pawn = board.piece_at(pawn_sq)?;
    if pawn.kind != PieceKind::Pawn || pawn.color != active || !last.is_double_pawn_push() {
        return None;
    }
    if last.to.rank() != pawn_sq.rank() || last.to.file().abs_diff(pawn_sq.file()) != 1 {
        return None;
    }
    let target = pawn_sq.offset(
        active.forward(),
        last.to.file() as i8 - pawn_sq.file() as i8,
    )?;

    // The bypassed pawn leaves with the capture, so test safety without it.
    let mut scratch = board.scoped();
    scratch.lift(last.to);
    safety::probe(scratch.scoped(), pawn_sq, target).then_some(target)
}

/// The square skipped by a two-square pawn advance, as written in FEN.
pub fn en_passant_target(last_move: Option<&LastMove>) -> Option<Square> {
    let last = last_move.filter(|lm| lm.is_double_pawn_push())?;
    last.from.offset(last.piece.color.forward(), 0)
}

#[cfg(test)]
#[path = "en_passant_tests.rs"]
mod en_passant_tests;
