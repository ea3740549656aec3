use serde::{Deserialize, Serialize};
use std::fmt;

use crate::attacks::CheckState;
use crate::board::Board;
use crate::draw::{self, FIFTY_MOVE_HALF_MOVES, RepetitionLedger};
use crate::movegen::SafeMoveIndex;
use crate::types::Color;

/// How a finished game ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameOutcome {
    Checkmate { winner: Color },
    Stalemate,
    InsufficientMaterial,
    ThreefoldRepetition,
    FiftyMove,
    Resignation { loser: Color },
}

impl GameOutcome {
    pub fn winner(&self) -> Option<Color> {
        match self {
            GameOutcome::Checkmate { winner } => Some(*winner),
            GameOutcome::Resignation { loser } => Some(loser.other()),
            _ => None,
        }
    }

    pub fn is_draw(&self) -> bool {
        self.winner().is_none()
    }

    pub fn message(&self) -> String {
        match self {
            GameOutcome::Checkmate { winner } => format!("{winner} won by checkmate"),
            GameOutcome::Stalemate => "Stalemate".to_string(),
            GameOutcome::InsufficientMaterial => "Draw due to lack of material".to_string(),
            GameOutcome::ThreefoldRepetition => "Draw by threefold repetition".to_string(),
            GameOutcome::FiftyMove => "Draw by the fifty-move rule".to_string(),
            GameOutcome::Resignation { loser } => format!("{loser} gave up"),
        }
    }
}

impl fmt::Display for GameOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message())
    }
}

/// Terminal conditions after a move, first match wins: insufficient material,
/// no legal moves (mate or stalemate), threefold repetition, fifty-move rule.
pub fn evaluate(
    board: &Board,
    to_move: Color,
    moves: &SafeMoveIndex,
    check: &CheckState,
    ledger: &RepetitionLedger,
    half_moves: u32,
) -> Option<GameOutcome> {
    if draw::insufficient_material(board) {
        return Some(GameOutcome::InsufficientMaterial);
    }
    if moves.is_empty() {
        return Some(if check.in_check {
            GameOutcome::Checkmate {
                winner: to_move.other(),
            }
        } else {
            GameOutcome::Stalemate
        });
    }
    if ledger.is_threefold() {
        return Some(GameOutcome::ThreefoldRepetition);
    }
    if half_moves >= FIFTY_MOVE_HALF_MOVES {
        return Some(GameOutcome::FiftyMove);
    }
    None
}
