//! Whole-game scenarios driven through the public `Game` API.

use chess_rules::{Color, Game, GameOutcome, MoveEvent, PieceKind, Square};

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

fn kind_at(game: &Game, s: &str) -> Option<PieceKind> {
    game.board().piece_at(sq(s)).map(|p| p.kind)
}

// =============================================================================
// En passant
// =============================================================================

#[test]
fn test_en_passant_for_black_after_double_push() {
    let mut game = Game::new();
    play(&mut game, &["h2h3", "d7d5", "h3h4", "d5d4", "e2e4"]);
    assert!(game.legal_destinations(sq("d4")).contains(&sq("e3")));

    let report = game.apply_move_text("d4e3").unwrap().unwrap();
    assert_eq!(report.captured, Some(PieceKind::Pawn));
    assert_eq!(report.events, vec![MoveEvent::Capture]);
    assert!(game.board().is_empty(sq("e4")), "the passed pawn is removed");
    assert_eq!(kind_at(&game, "e3"), Some(PieceKind::Pawn));
    assert_eq!(game.material().captured_by_black, vec![PieceKind::Pawn]);
}

#[test]
fn test_en_passant_expires_after_one_move() {
    let mut game = Game::new();
    play(&mut game, &["e2e4", "a7a6", "e4e5", "d7d5"]);
    assert!(game.legal_destinations(sq("e5")).contains(&sq("d6")));
    assert!(game.fen().contains(" d6 "));

    play(&mut game, &["a2a3", "h7h6"]);
    assert!(!game.legal_destinations(sq("e5")).contains(&sq("d6")));
    assert!(game.apply_move_text("e5d6").is_err());
}

#[test]
fn test_no_en_passant_after_single_steps() {
    let mut game = Game::new();
    play(&mut game, &["e2e4", "d7d6", "e4e5", "d6d5"]);
    assert!(!game.legal_destinations(sq("e5")).contains(&sq("d6")));
}

// =============================================================================
// Checkmate
// =============================================================================

#[test]
fn test_scholars_mate() {
    let mut game = Game::new();
    play(&mut game, &["e2e4", "e7e5", "f1c4", "b8c6", "d1h5", "g8f6"]);
    let report = game.apply_move_text("h5f7").unwrap().unwrap();

    let mate = GameOutcome::Checkmate {
        winner: Color::White,
    };
    assert_eq!(report.events, vec![MoveEvent::Capture, MoveEvent::Checkmate]);
    assert_eq!(report.outcome, Some(mate));
    assert_eq!(game.outcome(), Some(mate));
    assert_eq!(game.message().as_deref(), Some("White won by checkmate"));
    assert_eq!(
        game.fen(),
        "r1bqkb1r/pppp1Qpp/2n2n2/4p3/2B1P3/8/PPPP1PPP/RNB1K1NR b KQkq - 0 4"
    );

    // Moves after the end are ignored
    assert_eq!(game.apply_move_text("e8e7").unwrap(), None);
    assert_eq!(game.ply(), 7);
}

#[test]
fn test_fools_mate() {
    let mut game = Game::new();
    play(&mut game, &["f2f3", "e7e5", "g2g4"]);
    let report = game.apply_move_text("d8h4").unwrap().unwrap();
    assert_eq!(report.events, vec![MoveEvent::BasicMove, MoveEvent::Checkmate]);
    assert_eq!(
        game.outcome(),
        Some(GameOutcome::Checkmate {
            winner: Color::Black
        })
    );
    assert_eq!(game.check_state().king_square, Some(sq("e1")));
}

// =============================================================================
// Castling and promotion
// =============================================================================

#[test]
fn test_castling_in_an_opening() {
    let mut game = Game::new();
    play(&mut game, &["e2e4", "e7e5", "g1f3", "b8c6", "f1c4", "f8c5"]);
    assert!(game.legal_destinations(sq("e1")).contains(&sq("g1")));
    assert!(!game.legal_destinations(sq("e1")).contains(&sq("c1")));

    let report = game.apply_move_text("e1g1").unwrap().unwrap();
    assert_eq!(report.events, vec![MoveEvent::Castling]);
    assert_eq!(kind_at(&game, "g1"), Some(PieceKind::King));
    assert_eq!(kind_at(&game, "f1"), Some(PieceKind::Rook));
    assert!(game.fen().contains(" b kq - "));
}

#[test]
fn test_promotion_with_capture() {
    let mut game = Game::from_fen("r3k3/1P6/8/8/8/8/8/4K3 w q - 0 1").unwrap();
    let report = game.apply_move_text("b7a8q").unwrap().unwrap();

    assert_eq!(report.captured, Some(PieceKind::Rook));
    assert_eq!(report.promotion, Some(PieceKind::Queen));
    assert_eq!(
        report.events,
        vec![MoveEvent::Capture, MoveEvent::Promotion, MoveEvent::Check]
    );
    assert_eq!(game.material().balance, 5);
    let queen = game.board().piece_at(sq("a8")).unwrap();
    assert_eq!((queen.color, queen.kind), (Color::White, PieceKind::Queen));
    assert!(queen.has_moved);
    assert!(game.fen().contains(" b - - "));
}

#[test]
fn test_black_promotion() {
    let mut game = Game::from_fen("4k3/8/8/8/8/8/p7/4K3 b - - 0 1").unwrap();
    let report = game.apply_move_text("a2a1r").unwrap().unwrap();
    assert_eq!(report.promotion, Some(PieceKind::Rook));
    assert_eq!(report.events, vec![MoveEvent::Promotion, MoveEvent::Check]);
    assert_eq!(game.full_moves(), 2);
}

// =============================================================================
// Kings are never captured
// =============================================================================

#[test]
fn test_king_never_a_destination() {
    let game = Game::from_fen("4k3/8/8/8/8/8/8/4R1K1 w - - 0 1").unwrap();
    for (_, to) in game.safe_moves().moves() {
        assert_ne!(to, sq("e8"));
    }
}
