//! Error types for the rules engine.
//!
//! Only contract violations are errors. Intents that are merely stale (empty
//! origin, opponent's piece, finished game) are ignored without one, and the
//! end of a game is a [`GameOutcome`](crate::GameOutcome), not an error.

use std::path::PathBuf;

use crate::types::Square;

#[derive(Debug, thiserror::Error)]
pub enum RulesError {
    /// A selectable own piece was sent to a square outside its legal set
    #[error("illegal move: {from} -> {to}")]
    IllegalMove { from: Square, to: Square },

    #[error("invalid FEN string: {0}")]
    InvalidFen(String),

    #[error("invalid square notation: {0}")]
    InvalidSquare(String),

    #[error("invalid move notation: {0}")]
    InvalidMoveText(String),

    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config: {0}")]
    Config(#[from] toml::de::Error),

    #[error("failed to serialize snapshot: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Result type alias for engine operations
pub type RulesResult<T> = Result<T, RulesError>;
