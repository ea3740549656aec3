//! Check detection.
//!
//! The scan works from the attackers' side: every enemy piece walks its own
//! direction table and reports when it reaches the king of the queried color.
//! Only a king is ever an attack target here.

use serde::{Deserialize, Serialize};

use crate::board::Board;
use crate::types::*;

/// Whether the side to move is in check, and where its king stands.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckState {
    pub in_check: bool,
    pub king_square: Option<Square>,
}

/// Returns true if the king of `color` is attacked.
///
/// When `record` is given it is overwritten with the result of this scan.
/// Exploratory probes pass `None` so hypothetical positions never leak into
/// the recorded state.
pub fn is_attacked(board: &Board, color: Color, record: Option<&mut CheckState>) -> bool {
    let attacked = attacked_king(board, color);
    if let Some(state) = record {
        *state = CheckState {
            in_check: attacked.is_some(),
            king_square: attacked,
        };
    }
    attacked.is_some()
}

/// Square of the king of `color` if any enemy piece reaches it.
pub fn attacked_king(board: &Board, color: Color) -> Option<Square> {
    for (from, attacker) in board.pieces() {
        if attacker.color == color {
            continue;
        }
        for &(dr, df) in attacker.directions() {
            // Pawns never threaten straight ahead.
            if attacker.kind == PieceKind::Pawn && df == 0 {
                continue;
            }
            let mut cursor = from.offset(dr, df);
            while let Some(target) = cursor {
                if let Some(occupant) = board.piece_at(target) {
                    if occupant.kind == PieceKind::King && occupant.color == color {
                        return Some(target);
                    }
                    break;
                }
                if !attacker.slides() {
                    break;
                }
                cursor = target.offset(dr, df);
            }
        }
    }
    None
}

pub fn in_check(board: &Board, color: Color) -> bool {
    attacked_king(board, color).is_some()
}

#[cfg(test)]
#[path = "attacks_tests.rs"]
mod attacks_tests;
