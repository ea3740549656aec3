//! The game state machine: the only place the live board changes.

use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, info, trace};

use crate::attacks::{self, CheckState};
use crate::board::{Board, LastMove};
use crate::config::GameConfig;
use crate::draw::{RepetitionLedger, repetition_key};
use crate::error::{RulesError, RulesResult};
use crate::feed::{Snapshot, SnapshotFeed};
use crate::fen::{self, FenEncoder, PositionEncoder, Setup};
use crate::movegen::{SafeMoveIndex, legal_moves};
use crate::outcome::{self, GameOutcome};
use crate::perft::perft;
use crate::types::*;

/// Captured material for both sides.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Material {
    /// Black pieces taken by White
    pub captured_by_white: Vec<PieceKind>,
    /// White pieces taken by Black
    pub captured_by_black: Vec<PieceKind>,
    /// Sum of captured values, positive when White is ahead
    pub balance: i32,
}

impl Material {
    fn record(&mut self, capturer: Color, kind: PieceKind) {
        match capturer {
            Color::White => {
                self.captured_by_white.push(kind);
                self.balance += kind.value();
            }
            Color::Black => {
                self.captured_by_black.push(kind);
                self.balance -= kind.value();
            }
        }
    }
}

/// Typed notification of what a committed move did, for sound or animation
/// layers to react to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum MoveEvent {
    BasicMove,
    Capture,
    Castling,
    Promotion,
    Check,
    Checkmate,
    /// The move ended the game without a winner
    Draw,
}

/// Result of a committed move.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveReport {
    pub from: Square,
    pub to: Square,
    pub piece: PieceKind,
    pub captured: Option<PieceKind>,
    pub promotion: Option<PieceKind>,
    pub events: Vec<MoveEvent>,
    pub outcome: Option<GameOutcome>,
}

pub struct Game {
    start: Setup,
    board: Board,
    active: Color,
    check: CheckState,
    safe_moves: SafeMoveIndex,
    last_move: Option<LastMove>,
    outcome: Option<GameOutcome>,
    half_moves: u32,
    full_moves: u32,
    ply: usize,
    material: Material,
    ledger: RepetitionLedger,
    fen: String,
    encoder: Box<dyn PositionEncoder>,
    keep_history: bool,
    history: Vec<Snapshot>,
    shown: usize,
    feed: SnapshotFeed,
}

impl Default for Game {
    fn default() -> Self {
        Self::new()
    }
}

impl Game {
    /// A game from the standard starting position.
    pub fn new() -> Self {
        Self::from_setup(Setup::standard())
    }

    pub fn from_fen(fen: &str) -> RulesResult<Self> {
        Ok(Self::from_setup(fen::parse(fen)?))
    }

    pub fn from_setup(setup: Setup) -> Self {
        Self::with_encoder(setup, Box::new(FenEncoder), true)
    }

    pub fn from_config(config: &GameConfig) -> RulesResult<Self> {
        let setup = match &config.start_fen {
            Some(fen) => fen::parse(fen)?,
            None => Setup::standard(),
        };
        Ok(Self::with_encoder(setup, Box::new(FenEncoder), config.keep_history))
    }

    /// A game that produces its position strings with `encoder`.
    pub fn with_encoder(setup: Setup, encoder: Box<dyn PositionEncoder>, keep_history: bool) -> Self {
        let mut game = Game {
            board: setup.board,
            active: setup.active,
            check: CheckState::default(),
            safe_moves: SafeMoveIndex::default(),
            last_move: setup.last_move,
            outcome: None,
            half_moves: setup.half_moves,
            full_moves: setup.full_moves,
            ply: 0,
            material: Material::default(),
            ledger: RepetitionLedger::new(),
            fen: String::new(),
            encoder,
            keep_history,
            history: Vec::new(),
            shown: 0,
            feed: SnapshotFeed::new(),
            start: setup,
        };
        game.reset();
        game
    }

    fn reset(&mut self) {
        let setup = self.start.clone();
        self.board = setup.board;
        self.active = setup.active;
        self.last_move = setup.last_move;
        self.half_moves = setup.half_moves;
        self.full_moves = setup.full_moves;
        self.ply = 0;
        self.material = Material::default();
        self.ledger.clear();

        self.refresh();
        self.outcome = self.evaluate_outcome();

        self.history.clear();
        let snapshot = self.snapshot();
        self.history.push(snapshot.clone());
        self.shown = 0;
        self.feed.publish(snapshot);
    }

    /// Recomputes everything derived from board and side to move: check
    /// state, legal moves, position string and repetition count.
    fn refresh(&mut self) {
        attacks::is_attacked(&self.board, self.active, Some(&mut self.check));
        self.safe_moves = legal_moves(&mut self.board, self.active, self.last_move.as_ref());
        self.fen = self.encoder.encode(
            &self.board,
            self.active,
            self.last_move.as_ref(),
            self.half_moves,
            self.full_moves,
        );
        self.ledger.record(&repetition_key(&self.fen));
    }

    fn evaluate_outcome(&self) -> Option<GameOutcome> {
        outcome::evaluate(
            &self.board,
            self.active,
            &self.safe_moves,
            &self.check,
            &self.ledger,
            self.half_moves,
        )
    }

    /// Plays `from -> to` for the side to move.
    ///
    /// Returns `Ok(None)` without touching anything when the game is over, the
    /// origin is empty, or the origin holds an opponent's piece. Returns
    /// [`RulesError::IllegalMove`] when an own piece is sent to a square
    /// outside its legal set.
    pub fn apply_move(
        &mut self,
        from: Square,
        to: Square,
        promotion: Option<PieceKind>,
    ) -> RulesResult<Option<MoveReport>> {
        if self.outcome.is_some() {
            trace!(%from, %to, "move ignored: game is over");
            return Ok(None);
        }
        match self.board.piece_at(from) {
            Some(pc) if pc.color == self.active => {}
            _ => {
                trace!(%from, %to, "move ignored: no piece of the side to move");
                return Ok(None);
            }
        }
        if !self.safe_moves.contains(from, to) {
            return Err(RulesError::IllegalMove { from, to });
        }

        let Some(played) = self.board.make_move(from, to, promotion) else {
            return Ok(None);
        };
        let mover = self.active;

        let mut events = Vec::new();
        if let Some(kind) = played.captured {
            self.material.record(mover, kind);
            events.push(MoveEvent::Capture);
        }
        if played.castled {
            events.push(MoveEvent::Castling);
        }
        if played.promoted.is_some() {
            events.push(MoveEvent::Promotion);
        }
        if events.is_empty() {
            events.push(MoveEvent::BasicMove);
        }

        if played.last_move.piece.kind == PieceKind::Pawn || played.captured.is_some() {
            self.half_moves = 0;
        } else {
            self.half_moves = self.half_moves.saturating_add(1);
        }
        self.last_move = Some(played.last_move);
        self.active = mover.other();
        if self.active == Color::White {
            self.full_moves = self.full_moves.saturating_add(1);
        }
        self.ply += 1;

        self.refresh();
        self.outcome = self.evaluate_outcome();

        match self.outcome {
            Some(GameOutcome::Checkmate { .. }) => events.push(MoveEvent::Checkmate),
            Some(_) => {
                if self.check.in_check {
                    events.push(MoveEvent::Check);
                }
                events.push(MoveEvent::Draw);
            }
            None if self.check.in_check => events.push(MoveEvent::Check),
            None => {}
        }

        debug!(%from, %to, ?events, fen = %self.fen, "move applied");
        if let Some(outcome) = self.outcome {
            info!(%outcome, ply = self.ply, "game over");
        }

        self.commit_snapshot();

        Ok(Some(MoveReport {
            from,
            to,
            piece: played.last_move.piece.kind,
            captured: played.captured,
            promotion: played.promoted,
            events,
            outcome: self.outcome,
        }))
    }

    /// [`apply_move`](Self::apply_move) for raw `(rank, file)` coordinates;
    /// anything off the board is ignored.
    pub fn apply_move_at(
        &mut self,
        from: (i8, i8),
        to: (i8, i8),
        promotion: Option<PieceKind>,
    ) -> RulesResult<Option<MoveReport>> {
        match (Square::new(from.0, from.1), Square::new(to.0, to.1)) {
            (Some(from), Some(to)) => self.apply_move(from, to, promotion),
            _ => {
                trace!(?from, ?to, "move ignored: off the board");
                Ok(None)
            }
        }
    }

    /// [`apply_move`](Self::apply_move) for move text such as `e2e4` or `a7a8n`.
    pub fn apply_move_text(&mut self, text: &str) -> RulesResult<Option<MoveReport>> {
        let (from, to, promotion) = parse_move_text(text)?;
        self.apply_move(from, to, promotion)
    }

    /// Back to the starting position of this game.
    pub fn restart(&mut self) {
        info!("game restarted");
        self.reset();
    }

    /// Ends the game with `color` resigning. The board is left as it is.
    ///
    /// No ply is played, so the latest history entry is replaced by one that
    /// carries the outcome instead of a new entry being added.
    pub fn resign(&mut self, color: Color) {
        if self.outcome.is_some() {
            return;
        }
        info!(%color, "resignation");
        self.outcome = Some(GameOutcome::Resignation { loser: color });
        let snapshot = self.snapshot();
        match self.history.last_mut() {
            Some(latest) => *latest = snapshot.clone(),
            None => self.history.push(snapshot.clone()),
        }
        self.shown = self.history.len() - 1;
        self.feed.publish(snapshot);
    }

    fn commit_snapshot(&mut self) {
        let snapshot = self.snapshot();
        if !self.keep_history {
            self.history.clear();
        }
        self.history.push(snapshot.clone());
        self.shown = self.history.len() - 1;
        self.feed.publish(snapshot);
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            board: self.board,
            active: self.active,
            last_move: self.last_move,
            check: self.check,
            outcome: self.outcome,
            material: self.material.clone(),
            fen: self.fen.clone(),
            ply: self.ply,
        }
    }

    /// Registers the single observer of committed snapshots, replacing any
    /// previous one. It receives the current snapshot right away.
    pub fn subscribe(&mut self, subscriber: impl FnMut(&Snapshot) + 'static) {
        self.feed.subscribe(subscriber);
    }

    pub fn unsubscribe(&mut self) {
        self.feed.unsubscribe();
    }

    /// Snapshot number `index` (0 is the starting position).
    pub fn history_at(&self, index: usize) -> Option<&Snapshot> {
        self.history.get(index)
    }

    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    /// Publishes a stored snapshot for display; `None` means the latest.
    /// Live state is not affected.
    pub fn replay(&mut self, index: Option<usize>) -> Option<&Snapshot> {
        let index = index.unwrap_or(self.history.len().saturating_sub(1));
        let snapshot = self.history.get(index)?.clone();
        self.shown = index;
        self.feed.publish(snapshot);
        self.history.get(index)
    }

    /// Index of the snapshot last published by a commit or a replay.
    pub fn shown_index(&self) -> usize {
        self.shown
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn active(&self) -> Color {
        self.active
    }

    pub fn check_state(&self) -> CheckState {
        self.check
    }

    pub fn safe_moves(&self) -> &SafeMoveIndex {
        &self.safe_moves
    }

    pub fn legal_destinations(&self, from: Square) -> &[Square] {
        self.safe_moves.destinations(from)
    }

    pub fn last_move(&self) -> Option<&LastMove> {
        self.last_move.as_ref()
    }

    pub fn outcome(&self) -> Option<GameOutcome> {
        self.outcome
    }

    pub fn is_over(&self) -> bool {
        self.outcome.is_some()
    }

    pub fn message(&self) -> Option<String> {
        self.outcome.map(|o| o.message())
    }

    pub fn fen(&self) -> &str {
        &self.fen
    }

    pub fn material(&self) -> &Material {
        &self.material
    }

    pub fn half_moves(&self) -> u32 {
        self.half_moves
    }

    pub fn full_moves(&self) -> u32 {
        self.full_moves
    }

    /// Half-moves played since the start (or last restart).
    pub fn ply(&self) -> usize {
        self.ply
    }

    pub fn repetitions(&self) -> u8 {
        self.ledger.count(&repetition_key(&self.fen))
    }

    /// Leaf count of the legal-move tree `depth` plies deep from here.
    pub fn perft(&self, depth: u8) -> u64 {
        perft(&self.board, self.active, self.last_move, depth)
    }
}

impl fmt::Debug for Game {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Game")
            .field("fen", &self.fen)
            .field("outcome", &self.outcome)
            .field("ply", &self.ply)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[path = "game_tests.rs"]
mod game_tests;
