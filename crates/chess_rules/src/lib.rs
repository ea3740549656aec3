//! Chess rules engine.
//!
//! Owns the board, decides which moves are legal, applies them (castling, en
//! passant and promotion included), and detects check, checkmate, stalemate
//! and the draw rules. [`Game`] is the entry point; the lower-level modules are
//! public for callers that want to query positions directly.

pub mod attacks;
pub mod board;
pub mod castling;
pub mod config;
pub mod draw;
pub mod en_passant;
pub mod error;
pub mod feed;
pub mod fen;
pub mod game;
pub mod movegen;
pub mod outcome;
pub mod perft;
pub mod piece;
pub mod safety;
pub mod types;

pub use attacks::{CheckState, in_check, is_attacked};
pub use board::{Board, LastMove, Scratch};
pub use config::GameConfig;
pub use draw::{FIFTY_MOVE_HALF_MOVES, RepetitionLedger, insufficient_material};
pub use error::{RulesError, RulesResult};
pub use feed::{Snapshot, SnapshotFeed};
pub use fen::{FenEncoder, PositionEncoder, START_FEN, Setup};
pub use game::{Game, Material, MoveEvent, MoveReport};
pub use movegen::{SafeMoveIndex, legal_moves};
pub use outcome::GameOutcome;
pub use perft::perft;
pub use piece::Piece;
pub use safety::is_safe_after_move;
pub use types::*;
