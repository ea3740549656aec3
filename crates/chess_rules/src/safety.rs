//! The exploratory move every legality decision is built on.

use crate::attacks;
use crate::board::{Board, Scratch};
use crate::types::Square;

/// Would the mover's own king be safe after `from -> to`?
///
/// False when `from` is empty or `to` holds a piece of the mover's color. The
/// board is identical before and after the call, whatever the answer.
pub fn is_safe_after_move(board: &mut Board, from: Square, to: Square) -> bool {
    probe(board.scoped(), from, to)
}

/// Runs the probe inside an already opened scope, so callers can stack their
/// own temporary edits underneath it.
pub(crate) fn probe(mut scratch: Scratch<'_>, from: Square, to: Square) -> bool {
    let Some(mover) = scratch.piece_at(from) else {
        return false;
    };
    if let Some(target) = scratch.piece_at(to)
        && target.color == mover.color
    {
        return false;
    }
    scratch.relocate(from, to);
    !attacks::is_attacked(&scratch, mover.color, None)
}

#[cfg(test)]
#[path = "safety_tests.rs"]
mod safety_tests;
