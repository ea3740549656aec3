use std::cell::RefCell;
use std::rc::Rc;

use super::*;
use crate::fen::START_FEN;

fn sq(s: &str) -> Square {
    s.parse().unwrap()
}

fn play(game: &mut Game, moves: &[&str]) {
    for mv in moves {
        game.apply_move_text(mv)
            .unwrap()
            .unwrap_or_else(|| panic!("{mv} was ignored"));
    }
}

#[test]
fn test_new_game() {
    let game = Game::new();
    assert_eq!(game.active(), Color::White);
    assert_eq!(game.fen(), START_FEN);
    assert_eq!(game.safe_moves().move_count(), 20);
    assert_eq!(game.history_len(), 1);
    assert_eq!(game.ply(), 0);
    assert_eq!(game.repetitions(), 1);
    assert!(!game.check_state().in_check);
    assert!(game.outcome().is_none());
}

#[test]
fn test_illegal_move_is_an_error() {
    let mut game = Game::new();
    let err = game.apply_move(sq("e2"), sq("e5"), None).unwrap_err();
    assert!(matches!(err, RulesError::IllegalMove { from, to } if from == sq("e2") && to == sq("e5")));
    assert_eq!(game.fen(), START_FEN);
    assert_eq!(game.history_len(), 1);
}

#[test]
fn test_stale_intents_are_ignored() {
    let mut game = Game::new();
    // Empty origin
    assert_eq!(game.apply_move(sq("e4"), sq("e5"), None).unwrap(), None);
    // Opponent's piece
    assert_eq!(game.apply_move(sq("e7"), sq("e5"), None).unwrap(), None);
    // Off the board
    assert_eq!(game.apply_move_at((8, 0), (0, 0), None).unwrap(), None);
    assert_eq!(game.apply_move_at((1, 4), (3, -1), None).unwrap(), None);
    assert_eq!(game.fen(), START_FEN);
    assert_eq!(game.ply(), 0);
}

#[test]
fn test_bad_move_text() {
    let mut game = Game::new();
    assert!(matches!(
        game.apply_move_text("e2"),
        Err(RulesError::InvalidMoveText(_))
    ));
}

#[test]
fn test_raw_coordinates() {
    let mut game = Game::new();
    let report = game.apply_move_at((1, 4), (3, 4), None).unwrap().unwrap();
    assert_eq!(report.from, sq("e2"));
    assert_eq!(report.to, sq("e4"));
    assert_eq!(report.piece, PieceKind::Pawn);
}

#[test]
fn test_move_counters() {
    let mut game = Game::new();
    play(&mut game, &["e2e4"]);
    assert_eq!(game.active(), Color::Black);
    assert_eq!((game.half_moves(), game.full_moves()), (0, 1));
    play(&mut game, &["g8f6"]);
    assert_eq!((game.half_moves(), game.full_moves()), (1, 2));
    play(&mut game, &["g1f3"]);
    assert_eq!((game.half_moves(), game.full_moves()), (2, 2));
    play(&mut game, &["f6e4"]);
    // Capture resets the clock
    assert_eq!((game.half_moves(), game.full_moves()), (0, 3));
    assert_eq!(game.ply(), 4);
}

#[test]
fn test_capture_updates_material() {
    let mut game = Game::new();
    play(&mut game, &["e2e4", "d7d5"]);
    let report = game.apply_move_text("e4d5").unwrap().unwrap();
    assert_eq!(report.captured, Some(PieceKind::Pawn));
    assert_eq!(report.events, vec![MoveEvent::Capture]);
    assert_eq!(game.material().captured_by_white, vec![PieceKind::Pawn]);
    assert_eq!(game.material().balance, 1);

    let report = game.apply_move_text("d8d5").unwrap().unwrap();
    assert_eq!(report.captured, Some(PieceKind::Pawn));
    assert_eq!(game.material().captured_by_black, vec![PieceKind::Pawn]);
    assert_eq!(game.material().balance, 0);
}

#[test]
fn test_basic_move_event() {
    let mut game = Game::new();
    let report = game.apply_move_text("g1f3").unwrap().unwrap();
    assert_eq!(report.events, vec![MoveEvent::BasicMove]);
    assert_eq!(report.outcome, None);
}

#[test]
fn test_check_event() {
    let mut game = Game::from_fen("4k3/8/8/8/8/8/8/R3K3 w - - 0 1").unwrap();
    let report = game.apply_move_text("a1a8").unwrap().unwrap();
    assert_eq!(report.events, vec![MoveEvent::BasicMove, MoveEvent::Check]);
    assert_eq!(
        game.check_state(),
        CheckState {
            in_check: true,
            king_square: Some(sq("e8")),
        }
    );
    // The checked side may only step out of the rank
    for (_, to) in game.safe_moves().moves() {
        assert_eq!(to.rank(), 6);
    }
}

#[test]
fn test_castling_event() {
    let mut game = Game::from_fen("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1").unwrap();
    let report = game.apply_move_text("e1g1").unwrap().unwrap();
    assert_eq!(report.events, vec![MoveEvent::Castling]);
    assert_eq!(game.board().piece_at(sq("f1")).map(|p| p.kind), Some(PieceKind::Rook));
    assert!(game.board().is_empty(sq("h1")));
    assert!(game.fen().contains(" b kq - "));

    let report = game.apply_move_text("e8c8").unwrap().unwrap();
    assert_eq!(report.events, vec![MoveEvent::Castling]);
    assert_eq!(game.board().piece_at(sq("d8")).map(|p| p.kind), Some(PieceKind::Rook));
}

#[test]
fn test_underpromotion_to_insufficient_material() {
    let mut game = Game::from_fen("4k3/P7/8/8/8/8/8/4K3 w - - 0 1").unwrap();
    let report = game.apply_move_text("a7a8n").unwrap().unwrap();
    assert_eq!(report.promotion, Some(PieceKind::Knight));
    assert_eq!(report.events, vec![MoveEvent::Promotion, MoveEvent::Draw]);
    assert_eq!(report.outcome, Some(GameOutcome::InsufficientMaterial));
    assert!(game.is_over());
    assert_eq!(game.message().as_deref(), Some("Draw due to lack of material"));
}

#[test]
fn test_promotion_defaults_to_queen() {
    let mut game = Game::from_fen("4k3/P7/8/8/8/8/8/4K3 w - - 0 1").unwrap();
    let report = game.apply_move(sq("a7"), sq("a8"), None).unwrap().unwrap();
    assert_eq!(report.promotion, Some(PieceKind::Queen));
    assert_eq!(
        report.events,
        vec![MoveEvent::Promotion, MoveEvent::Check]
    );
}

#[test]
fn test_finished_game_ignores_moves() {
    let mut game = Game::from_fen("k7/2K5/1Q6/8/8/8/8/8 b - - 0 1").unwrap();
    assert_eq!(game.outcome(), Some(GameOutcome::Stalemate));
    assert_eq!(game.apply_move(sq("a8"), sq("a7"), None).unwrap(), None);
}

#[test]
fn test_resign() {
    let mut game = Game::new();
    play(&mut game, &["e2e4"]);
    game.resign(Color::Black);
    assert_eq!(game.outcome(), Some(GameOutcome::Resignation { loser: Color::Black }));
    assert_eq!(game.outcome().and_then(|o| o.winner()), Some(Color::White));
    assert_eq!(game.message().as_deref(), Some("Black gave up"));

    // Nothing changes once over
    game.resign(Color::White);
    assert_eq!(game.outcome(), Some(GameOutcome::Resignation { loser: Color::Black }));
    assert_eq!(game.apply_move_text("e7e5").unwrap(), None);
}

#[test]
fn test_resign_marks_latest_snapshot() {
    let mut game = Game::new();
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&seen);
    game.subscribe(move |snap| sink.borrow_mut().push(snap.outcome));
    play(&mut game, &["e2e4", "e7e5"]);
    game.resign(Color::White);

    let resigned = Some(GameOutcome::Resignation { loser: Color::White });
    assert_eq!(game.history_len(), game.ply() + 1);
    let latest = game.history_at(game.ply()).unwrap();
    assert_eq!(latest.outcome, resigned);
    assert_eq!(latest.ply, 2);
    assert_eq!(game.history_at(1).unwrap().outcome, None);
    assert_eq!(game.shown_index(), 2);
    assert_eq!(seen.borrow().last().copied(), Some(resigned));
    assert_eq!(seen.borrow().len(), 4);
}

#[test]
fn test_counters_saturate_at_fen_maximum() {
    let mut game = Game::from_fen("4k3/8/8/8/8/8/8/R3K3 b - - 4294967295 4294967295").unwrap();
    assert_eq!(game.outcome(), Some(GameOutcome::FiftyMove));

    let mut game = Game::from_fen("4k3/8/8/8/8/8/8/R3K3 b - - 0 4294967295").unwrap();
    let report = game.apply_move_text("e8d8").unwrap().unwrap();
    assert_eq!(report.piece, PieceKind::King);
    assert_eq!(game.full_moves(), u32::MAX);
    assert_eq!(game.half_moves(), 1);
}

#[test]
fn test_restart() {
    let mut game = Game::new();
    play(&mut game, &["e2e4", "d7d5", "e4d5"]);
    game.resign(Color::Black);
    game.restart();
    assert_eq!(game.fen(), START_FEN);
    assert_eq!(game.outcome(), None);
    assert_eq!(game.material(), &Material::default());
    assert_eq!(game.history_len(), 1);
    assert_eq!(game.ply(), 0);
    assert_eq!(game.repetitions(), 1);
}

#[test]
fn test_restart_returns_to_custom_start() {
    let fen = "4k3/8/8/8/8/8/4P3/4K3 w - - 0 1";
    let mut game = Game::from_fen(fen).unwrap();
    play(&mut game, &["e2e4"]);
    game.restart();
    assert_eq!(game.fen(), fen);
}

#[test]
fn test_repetition_count() {
    let mut game = Game::new();
    play(&mut game, &["g1f3", "g8f6", "f3g1", "f6g8"]);
    assert_eq!(game.fen(), "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 4 3");
    assert_eq!(game.repetitions(), 2);
    assert!(!game.is_over());
}

#[test]
fn test_subscriber_gets_latest_then_updates() {
    let mut game = Game::new();
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&seen);
    game.subscribe(move |snap| sink.borrow_mut().push(snap.fen.clone()));
    assert_eq!(*seen.borrow(), vec![START_FEN.to_string()]);

    play(&mut game, &["e2e4"]);
    assert_eq!(seen.borrow().len(), 2);
    assert_eq!(seen.borrow()[1], game.fen());
}

#[test]
fn test_subscribe_replaces_previous() {
    let mut game = Game::new();
    let first = Rc::new(RefCell::new(0));
    let second = Rc::new(RefCell::new(0));
    let a = Rc::clone(&first);
    let b = Rc::clone(&second);
    game.subscribe(move |_| *a.borrow_mut() += 1);
    game.subscribe(move |_| *b.borrow_mut() += 1);
    play(&mut game, &["e2e4"]);
    assert_eq!(*first.borrow(), 1);
    assert_eq!(*second.borrow(), 2);

    game.unsubscribe();
    play(&mut game, &["e7e5"]);
    assert_eq!(*second.borrow(), 2);
}

#[test]
fn test_replay_does_not_touch_live_state() {
    let mut game = Game::new();
    play(&mut game, &["e2e4", "e7e5"]);
    let live = game.fen().to_string();

    let shown = game.replay(Some(0)).unwrap().fen.clone();
    assert_eq!(shown, START_FEN);
    assert_eq!(game.shown_index(), 0);
    assert_eq!(game.fen(), live);
    assert!(game.replay(Some(9)).is_none());
    assert_eq!(game.shown_index(), 0);

    let latest = game.replay(None).unwrap();
    assert_eq!(latest.fen, live);
    assert_eq!(game.shown_index(), 2);

    // Play continues from the live position
    play(&mut game, &["g1f3"]);
    assert_eq!(game.history_len(), 4);
    assert_eq!(game.history_at(1).unwrap().ply, 1);
}

#[test]
fn test_without_history() {
    let config = GameConfig {
        keep_history: false,
        ..GameConfig::default()
    };
    let mut game = Game::from_config(&config).unwrap();
    play(&mut game, &["e2e4", "e7e5"]);
    assert_eq!(game.history_len(), 1);
    assert_eq!(game.history_at(0).unwrap().fen, game.fen());
}

#[test]
fn test_from_config_start_fen() {
    let config = GameConfig {
        start_fen: Some("4k3/8/8/8/8/8/8/4K3 w - - 0 1".to_string()),
        ..GameConfig::default()
    };
    let game = Game::from_config(&config).unwrap();
    assert_eq!(game.outcome(), Some(GameOutcome::InsufficientMaterial));

    let config = GameConfig {
        start_fen: Some("not a fen".to_string()),
        ..GameConfig::default()
    };
    assert!(matches!(Game::from_config(&config), Err(RulesError::InvalidFen(_))));
}

struct PlacementOnly;

impl PositionEncoder for PlacementOnly {
    fn encode(&self, board: &Board, active: Color, _: Option<&LastMove>, _: u32, _: u32) -> String {
        let fen = FenEncoder.encode(board, active, None, 0, 1);
        fen.split_whitespace().take(2).collect::<Vec<_>>().join(" ") + " - - 0 1"
    }
}

#[test]
fn test_custom_encoder() {
    let mut game = Game::with_encoder(Setup::standard(), Box::new(PlacementOnly), true);
    assert!(game.fen().ends_with("w - - 0 1"));
    play(&mut game, &["e2e4"]);
    assert!(game.fen().ends_with("b - - 0 1"));
}

#[test]
fn test_snapshot_json() {
    let mut game = Game::new();
    play(&mut game, &["e2e4"]);
    let json = game.snapshot().to_json().unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["fen"], game.fen());
    assert_eq!(value["last_move"]["to"], "e4");
    assert_eq!(value["active"], "Black");
}

#[test]
fn test_perft_from_game() {
    let game = Game::new();
    assert_eq!(game.perft(1), 20);
    assert_eq!(game.perft(2), 400);
}
