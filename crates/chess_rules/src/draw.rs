//! Draw rules that do not depend on the legal-move index: insufficient
//! material, threefold repetition and the fifty-move rule.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::board::Board;
use crate::types::*;

/// Half-moves without a pawn move or capture before the game is drawn
/// (fifty full moves).
pub const FIFTY_MOVE_HALF_MOVES: u32 = 100;

/// Occurrences of one position that end the game.
pub const REPETITION_LIMIT: u8 = 3;

/// True when neither side can possibly deliver mate.
pub fn insufficient_material(board: &Board) -> bool {
    let mut white = Vec::new();
    let mut black = Vec::new();
    for (sq, pc) in board.pieces() {
        if pc.kind == PieceKind::King {
            continue;
        }
        match pc.color {
            Color::White => white.push((sq, pc.kind)),
            Color::Black => black.push((sq, pc.kind)),
        }
    }

    match (white.as_slice(), black.as_slice()) {
        ([], []) => true,
        ([], side) | (side, []) => lone_minor(side) || two_knights(side) || one_colored_bishops(side),
        ([(a, PieceKind::Bishop)], [(b, PieceKind::Bishop)]) => a.is_dark() == b.is_dark(),
        _ => false,
    }
}

fn lone_minor(side: &[(Square, PieceKind)]) -> bool {
    matches!(side, [(_, PieceKind::Knight | PieceKind::Bishop)])
}

fn two_knights(side: &[(Square, PieceKind)]) -> bool {
    matches!(side, [(_, PieceKind::Knight), (_, PieceKind::Knight)])
}

fn one_colored_bishops(side: &[(Square, PieceKind)]) -> bool {
    let Some((first, _)) = side.first() else {
        return false;
    };
    side.iter()
        .all(|(sq, kind)| *kind == PieceKind::Bishop && sq.is_dark() == first.is_dark())
}

/// The part of a FEN string that identifies a position for repetition:
/// placement, side to move, castling rights and en passant target.
pub fn repetition_key(fen: &str) -> String {
    fen.split_whitespace().take(4).collect::<Vec<_>>().join(" ")
}

/// Occurrence counts of positions seen in the current game.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepetitionLedger {
    counts: HashMap<String, u8>,
    threefold: bool,
}

impl RepetitionLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records one occurrence of `key` and returns its count (saturating at
    /// the repetition limit).
    pub fn record(&mut self, key: &str) -> u8 {
        let count = self.counts.entry(key.to_string()).or_insert(0);
        *count = (*count + 1).min(REPETITION_LIMIT);
        if *count == REPETITION_LIMIT {
            self.threefold = true;
        }
        *count
    }

    pub fn count(&self, key: &str) -> u8 {
        self.counts.get(key).copied().unwrap_or(0)
    }

    /// Has any position been seen three times?
    pub fn is_threefold(&self) -> bool {
        self.threefold
    }

    pub fn clear(&mut self) {
        self.counts.clear();
        self.threefold = false;
    }
}

#[cfg(test)]
#[path = "draw_tests.rs"]
mod draw_tests;
