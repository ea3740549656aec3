//! Game configuration, loaded from TOML.
//!
//! ```toml
//! start_fen = "8/8/8/4k3/8/8/4P3/4K3 w - - 0 1"
//! keep_history = true
//! log_filter = "chess_rules=debug"
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{RulesError, RulesResult};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Position to start (and restart) from; the standard opening when absent
    pub start_fen: Option<String>,
    /// Keep a snapshot of every position for replay
    pub keep_history: bool,
    /// Default tracing filter when `RUST_LOG` is not set
    pub log_filter: String,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            start_fen: None,
            keep_history: true,
            log_filter: "info".to_string(),
        }
    }
}

impl GameConfig {
    pub fn from_toml_str(s: &str) -> RulesResult<Self> {
        Ok(toml::from_str(s)?)
    }

    pub fn load(path: &Path) -> RulesResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|source| RulesError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&contents)
    }
}
