use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::board::{Board, LastMove};
use crate::castling::can_castle;
use crate::en_passant::can_en_passant;
use crate::piece::Piece;
use crate::safety::is_safe_after_move;
use crate::types::*;

/// Legal destinations per origin square for the side to move.
///
/// Origins without a legal move are absent, so an empty index means the side
/// to move has no legal move at all.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SafeMoveIndex {
    moves: BTreeMap<Square, Vec<Square>>,
}

impl SafeMoveIndex {
    pub fn destinations(&self, from: Square) -> &[Square] {
        self.moves.get(&from).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn contains(&self, from: Square, to: Square) -> bool {
        self.destinations(from).contains(&to)
    }

    pub fn is_empty(&self) -> bool {
        self.moves.is_empty()
    }

    /// Number of origin squares with at least one legal move.
    pub fn origins(&self) -> usize {
        self.moves.len()
    }

    /// Total number of `(from, to)` pairs.
    pub fn move_count(&self) -> usize {
        self.moves.values().map(Vec::len).sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Square, &[Square])> + '_ {
        self.moves.iter().map(|(from, to)| (*from, to.as_slice()))
    }

    /// Every `(from, to)` pair in origin order.
    pub fn moves(&self) -> impl Iterator<Item = (Square, Square)> + '_ {
        self.moves
            .iter()
            .flat_map(|(from, tos)| tos.iter().map(move |to| (*from, *to)))
    }
}

/// Builds the full index of legal moves for `active`.
///
/// The board is only touched through the safety probe, which restores it, so
/// it is unchanged when this returns.
pub fn legal_moves(board: &mut Board, active: Color, last_move: Option<&LastMove>) -> SafeMoveIndex {
    let origins: Vec<(Square, Piece)> = board.pieces_of(active).collect();
    let mut index = SafeMoveIndex::default();

    for (from, piece) in origins {
        let mut out = Vec::new();
        match piece.kind {
            PieceKind::Pawn => {
                gen_pawn(board, from, piece, &mut out);
                if let Some(to) = can_en_passant(board, from, active, last_move) {
                    out.push(to);
                }
            }
            PieceKind::King => {
                gen_piece(board, from, piece, &mut out);
                for (kingside, file_step) in [(true, 2), (false, -2)] {
                    if can_castle(board, from, kingside)
                        && let Some(to) = from.offset(0, file_step)
                    {
                        out.push(to);
                    }
                }
            }
            _ => gen_piece(board, from, piece, &mut out),
        }
        if !out.is_empty() {
            index.moves.insert(from, out);
        }
    }
    index
}

/// Knights, bishops, rooks, queens and the king's ordinary steps.
fn gen_piece(board: &mut Board, from: Square, piece: Piece, out: &mut Vec<Square>) {
    for &(dr, df) in piece.directions() {
        let mut cursor = from.offset(dr, df);
        while let Some(to) = cursor {
            let occupant = board.piece_at(to);
            if let Some(pc) = occupant
                && (pc.color == piece.color || pc.kind == PieceKind::King)
            {
                break;
            }
            if is_safe_after_move(board, from, to) {
                out.push(to);
            }
            if occupant.is_some() || !piece.slides() {
                break;
            }
            cursor = to.offset(dr, df);
        }
    }
}

fn gen_pawn(board: &mut Board, from: Square, pawn: Piece, out: &mut Vec<Square>) {
    for &(dr, df) in pawn.directions() {
        let Some(to) = from.offset(dr, df) else {
            continue;
        };
        let reachable = if df == 0 {
            // Advances need an empty landing square; the double step also
            // needs an unmoved pawn and an empty square in between.
            board.is_empty(to)
                && (dr.abs() == 1
                    || (!pawn.has_moved
                        && from
                            .offset(dr.signum(), 0)
                            .is_some_and(|mid| board.is_empty(mid))))
        } else {
            matches!(
                board.piece_at(to),
                Some(pc) if pc.color != pawn.color && pc.kind != PieceKind::King
            )
        };
        if reachable && is_safe_after_move(board, from, to) {
            out.push(to);
        }
    }
}

#[cfg(test)]
#[path = "movegen_tests.rs"]
mod movegen_tests;
