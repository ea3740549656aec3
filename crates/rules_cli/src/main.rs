//! Chess rules CLI
//!
//! Play moves against the rules engine, run random self-play games and count
//! perft nodes.

use std::collections::BTreeMap;
use std::env;
use std::io::{self, BufRead, Write};
use std::path::Path;
use std::time::Instant;

use anyhow::{bail, Context, Result};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use chess_rules::{Board, Game, GameConfig, MoveReport, Square};

fn print_usage() {
    println!("Chess rules engine");
    println!();
    println!("Usage:");
    println!("  chess-rules play [moves...] [--fen FEN] [--config FILE]");
    println!("  chess-rules selfplay [--games N] [--seed S] [--max-plies P] [--fen FEN]");
    println!("  chess-rules perft <depth> [--fen FEN]");
    println!();
    println!("Without moves, `play` reads commands from stdin:");
    print_commands();
    println!();
    println!("Examples:");
    println!("  chess-rules play e2e4 e7e5 g1f3");
    println!("  chess-rules selfplay --games 100 --seed 42");
    println!("  chess-rules perft 4 --fen \"8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1\"");
}

fn print_commands() {
    println!("  <move>        - play a move such as e2e4 or a7a8n");
    println!("  moves         - list legal moves");
    println!("  board | fen   - show the position");
    println!("  json          - print the current snapshot as JSON");
    println!("  history [N]   - show snapshot N (latest when omitted)");
    println!("  resign        - the side to move gives up");
    println!("  restart       - back to the starting position");
    println!("  quit");
}

/// Options shared by every command, plus whatever is left over.
struct Options {
    config: GameConfig,
    rest: Vec<String>,
    flags: BTreeMap<String, String>,
}

impl Options {
    fn parse(args: &[String]) -> Result<Self> {
        let mut config_path = None;
        let mut fen = None;
        let mut flags = BTreeMap::new();
        let mut rest = Vec::new();

        let mut i = 0;
        while i < args.len() {
            let arg = args[i].as_str();
            if let Some(name) = arg.strip_prefix("--") {
                let Some(value) = args.get(i + 1) else {
                    bail!("missing value for {arg}");
                };
                match name {
                    "config" | "c" => config_path = Some(value.clone()),
                    "fen" => fen = Some(value.clone()),
                    _ => {
                        flags.insert(name.to_string(), value.clone());
                    }
                }
                i += 1;
            } else {
                rest.push(arg.to_string());
            }
            i += 1;
        }

        let mut config = match config_path {
            Some(path) => GameConfig::load(Path::new(&path))
                .with_context(|| format!("loading config from {path}"))?,
            None => GameConfig::default(),
        };
        if fen.is_some() {
            config.start_fen = fen;
        }

        Ok(Options { config, rest, flags })
    }

    fn flag<T: std::str::FromStr>(&self, name: &str, default: T) -> Result<T> {
        match self.flags.get(name) {
            Some(value) => value
                .parse()
                .map_err(|_| anyhow::anyhow!("invalid value for --{name}: {value}")),
            None => Ok(default),
        }
    }

    fn game(&self) -> Result<Game> {
        Game::from_config(&self.config).context("setting up the game")
    }
}

fn init_logging(config: &GameConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn render_board(board: &Board) -> String {
    let mut out = String::new();
    for rank in (0..8).rev() {
        out.push_str(&format!("{} ", rank + 1));
        for file in 0..8 {
            let c = Square::new(rank, file)
                .and_then(|sq| board.piece_at(sq))
                .map_or('.', |pc| pc.to_fen_char());
            out.push(' ');
            out.push(c);
        }
        out.push('\n');
    }
    out.push_str("   a b c d e f g h");
    out
}

fn print_position(game: &Game) {
    println!("{}", render_board(game.board()));
    println!("{}", game.fen());
    match game.message() {
        Some(message) => println!("{message}"),
        None if game.check_state().in_check => println!("{} to move (check)", game.active()),
        None => println!("{} to move", game.active()),
    }
}

fn print_report(report: &MoveReport) {
    let mut line = format!("{} {}{}", report.piece.to_char(), report.from, report.to);
    if let Some(kind) = report.captured {
        line.push_str(&format!(" x{}", kind.to_char()));
    }
    if let Some(kind) = report.promotion {
        line.push_str(&format!(" ={}", kind.to_char()));
    }
    println!("{line} {:?}", report.events);
}

fn print_moves(game: &Game) {
    let moves: Vec<String> = game
        .safe_moves()
        .moves()
        .map(|(from, to)| format!("{from}{to}"))
        .collect();
    println!("{} legal moves: {}", moves.len(), moves.join(" "));
}

fn run_play(options: &Options) -> Result<()> {
    let mut game = options.game()?;

    if !options.rest.is_empty() {
        for text in &options.rest {
            match game
                .apply_move_text(text)
                .with_context(|| format!("playing {text}"))?
            {
                Some(report) => print_report(&report),
                None => bail!("{text} cannot be played in {}", game.fen()),
            }
        }
        print_position(&game);
        return Ok(());
    }

    print_position(&game);
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    print!("> ");
    stdout.flush()?;

    for line in stdin.lock().lines() {
        let line = line.context("reading stdin")?;
        let words: Vec<&str> = line.split_whitespace().collect();
        match words.as_slice() {
            [] => {}
            ["quit" | "exit"] => break,
            ["help"] => print_commands(),
            ["moves"] => print_moves(&game),
            ["board"] => print_position(&game),
            ["fen"] => println!("{}", game.fen()),
            ["json"] => println!("{}", game.snapshot().to_json()?),
            ["resign"] => {
                game.resign(game.active());
                print_position(&game);
            }
            ["restart"] => {
                game.restart();
                print_position(&game);
            }
            ["history"] => show_history(&mut game, None),
            ["history", n] => match n.parse() {
                Ok(index) => show_history(&mut game, Some(index)),
                Err(_) => println!("Not a snapshot number: {n}"),
            },
            [text] => match game.apply_move_text(text) {
                Ok(Some(report)) => {
                    print_report(&report);
                    print_position(&game);
                }
                Ok(None) => println!("Nothing to move on that square"),
                Err(e) => println!("{e}"),
            },
            _ => println!("Unknown command: {line}"),
        }
        print!("> ");
        stdout.flush()?;
    }
    Ok(())
}

fn show_history(game: &mut Game, index: Option<usize>) {
    let len = game.history_len();
    match game.replay(index) {
        Some(snapshot) => {
            println!("{}", render_board(&snapshot.board));
            println!("{} (ply {} of {})", snapshot.fen, snapshot.ply, len - 1);
        }
        None => println!("No snapshot {} (have {len})", index.unwrap_or_default()),
    }
}

fn run_selfplay(options: &Options) -> Result<()> {
    let games: u32 = options.flag("games", 10)?;
    let seed: u64 = options.flag("seed", 0)?;
    let max_plies: usize = options.flag("max-plies", 400)?;

    println!("=== Self-play: {games} games, seed {seed} ===");
    let mut rng = StdRng::seed_from_u64(seed);
    let mut tally: BTreeMap<String, u32> = BTreeMap::new();
    let start = Instant::now();
    let mut total_plies = 0;

    for n in 1..=games {
        let mut game = options.game()?;
        while !game.is_over() && game.ply() < max_plies {
            let moves: Vec<(Square, Square)> = game.safe_moves().moves().collect();
            let Some(&(from, to)) = moves.choose(&mut rng) else {
                break;
            };
            game.apply_move(from, to, None)
                .with_context(|| format!("game {n}: {from}{to} in {}", game.fen()))?;
        }
        let result = game.message().unwrap_or_else(|| "Unfinished".to_string());
        debug!(game = n, plies = game.ply(), %result, "self-play game done");
        println!("Game {n:3}: {:3} plies, {result}", game.ply());
        total_plies += game.ply();
        *tally.entry(result).or_default() += 1;
    }

    println!();
    println!("=== Results ===");
    for (result, count) in &tally {
        println!("{count:5}  {result}");
    }
    info!(games, total_plies, elapsed = ?start.elapsed(), "self-play finished");
    Ok(())
}

fn run_perft(options: &Options) -> Result<()> {
    let Some(depth) = options.rest.first() else {
        bail!("perft requires a depth");
    };
    let depth: u8 = depth.parse().with_context(|| format!("invalid depth: {depth}"))?;
    let game = options.game()?;

    println!("{}", game.fen());
    let start = Instant::now();
    let mut total = 0;
    if depth > 0 {
        for (from, to) in game.safe_moves().moves() {
            let mut child = Game::from_fen(game.fen())?;
            if child.apply_move(from, to, None)?.is_none() {
                continue;
            }
            let nodes = child.perft(depth - 1);
            println!("{from}{to}: {nodes}");
            total += nodes;
        }
    } else {
        total = 1;
    }
    let elapsed = start.elapsed();
    println!();
    println!(
        "Nodes: {total} in {elapsed:.3?} ({:.1} Mn/s)",
        (total as f64 / 1_000_000.0) / elapsed.as_secs_f64().max(1e-9)
    );
    Ok(())
}

fn main() -> Result<()> {
    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        print_usage();
        return Ok(());
    }

    let options = Options::parse(&args[2..])?;
    init_logging(&options.config);

    match args[1].as_str() {
        "play" => run_play(&options),
        "selfplay" | "self-play" => run_selfplay(&options),
        "perft" => run_perft(&options),
        "help" | "--help" | "-h" => {
            print_usage();
            Ok(())
        }
        other => {
            eprintln!("Unknown command: {other}");
            print_usage();
            Ok(())
        }
    }
}
