//! Latest-value snapshot publication for observers such as a board view.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::attacks::CheckState;
use crate::board::{Board, LastMove};
use crate::error::RulesResult;
use crate::game::Material;
use crate::outcome::GameOutcome;
use crate::types::Color;

/// An owned copy of the observable game state after a commit.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub board: Board,
    pub active: Color,
    pub last_move: Option<LastMove>,
    pub check: CheckState,
    pub outcome: Option<GameOutcome>,
    pub material: Material,
    pub fen: String,
    /// Half-moves played since the start of the game
    pub ply: usize,
}

impl Snapshot {
    pub fn to_json(&self) -> RulesResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

pub type Subscriber = Box<dyn FnMut(&Snapshot)>;

/// One subscriber slot holding the most recent snapshot.
///
/// Subscribing replaces the previous subscriber and immediately hands over the
/// latest snapshot; older snapshots are never replayed.
#[derive(Default)]
pub struct SnapshotFeed {
    latest: Option<Snapshot>,
    subscriber: Option<Subscriber>,
}

impl SnapshotFeed {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self, mut subscriber: impl FnMut(&Snapshot) + 'static) {
        if let Some(latest) = &self.latest {
            subscriber(latest);
        }
        self.subscriber = Some(Box::new(subscriber));
    }

    pub fn unsubscribe(&mut self) {
        self.subscriber = None;
    }

    pub fn publish(&mut self, snapshot: Snapshot) {
        if let Some(subscriber) = self.subscriber.as_mut() {
            subscriber(&snapshot);
        }
        self.latest = Some(snapshot);
    }
}

impl fmt::Debug for SnapshotFeed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SnapshotFeed")
            .field("latest", &self.latest.as_ref().map(|s| &s.fen))
            .field("subscribed", &self.subscriber.is_some())
            .finish()
    }
}
