//! Forsyth-Edwards Notation.
//!
//! The engine only relies on [`PositionEncoder`]; [`FenEncoder`] is the
//! default implementation. [`parse`] reads a FEN string into a [`Setup`] used
//! by tests and by the command-line driver to start from arbitrary positions.

use crate::board::{Board, LastMove};
use crate::en_passant::en_passant_target;
use crate::error::RulesError;
use crate::piece::Piece;
use crate::types::*;

pub const START_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

/// Turns engine state into a position string.
///
/// The first four whitespace-separated fields must encode placement, side to
/// move, castling rights and en passant target; they form the repetition key.
pub trait PositionEncoder {
    fn encode(
        &self,
        board: &Board,
        active: Color,
        last_move: Option<&LastMove>,
        half_moves: u32,
        full_moves: u32,
    ) -> String;
}

#[derive(Clone, Copy, Debug, Default)]
pub struct FenEncoder;

impl PositionEncoder for FenEncoder {
    fn encode(
        &self,
        board: &Board,
        active: Color,
        last_move: Option<&LastMove>,
        half_moves: u32,
        full_moves: u32,
    ) -> String {
        let mut fen = placement(board);
        fen.push(' ');
        fen.push(match active {
            Color::White => 'w',
            Color::Black => 'b',
        });
        fen.push(' ');
        fen.push_str(&castling_field(board));
        fen.push(' ');
        match en_passant_target(last_move) {
            Some(sq) => fen.push_str(&sq.to_string()),
            None => fen.push('-'),
        }
        fen.push_str(&format!(" {half_moves} {full_moves}"));
        fen
    }
}

fn placement(board: &Board) -> String {
    let mut out = String::new();
    for rank in (0..8u8).rev() {
        let mut empty = 0;
        for file in 0..8u8 {
            match board.piece_at(Square::at(rank, file)) {
                Some(pc) => {
                    if empty > 0 {
                        out.push_str(&empty.to_string());
                        empty = 0;
                    }
                    out.push(pc.to_fen_char());
                }
                None => empty += 1,
            }
        }
        if empty > 0 {
            out.push_str(&empty.to_string());
        }
        if rank > 0 {
            out.push('/');
        }
    }
    out
}

/// Castling rights follow from unmoved kings and rooks on their home squares.
fn castling_field(board: &Board) -> String {
    let mut out = String::new();
    for (color, kingside_char, queenside_char) in [(Color::White, 'K', 'Q'), (Color::Black, 'k', 'q')] {
        let rank = color.home_rank();
        let unmoved = |file: u8, kind: PieceKind| {
            board
                .piece_at(Square::at(rank, file))
                .is_some_and(|pc| pc.color == color && pc.kind == kind && !pc.has_moved)
        };
        if !unmoved(4, PieceKind::King) {
            continue;
        }
        if unmoved(7, PieceKind::Rook) {
            out.push(kingside_char);
        }
        if unmoved(0, PieceKind::Rook) {
            out.push(queenside_char);
        }
    }
    if out.is_empty() {
        out.push('-');
    }
    out
}

/// A position to start a game from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Setup {
    pub board: Board,
    pub active: Color,
    pub last_move: Option<LastMove>,
    pub half_moves: u32,
    pub full_moves: u32,
}

impl Default for Setup {
    fn default() -> Self {
        Self::standard()
    }
}

impl Setup {
    pub fn standard() -> Self {
        Setup {
            board: Board::startpos(),
            active: Color::White,
            last_move: None,
            half_moves: 0,
            full_moves: 1,
        }
    }
}

/// Reads a FEN string.
///
/// Moved flags are inferred: kings and rooks are unmoved only when a castling
/// right names them, pawns only while on their starting rank. An en passant
/// field becomes a synthetic last move (the two-square advance that made it).
pub fn parse(fen: &str) -> Result<Setup, RulesError> {
    let invalid = |why: &str| RulesError::InvalidFen(format!("{why}: '{fen}'"));

    let parts: Vec<&str> = fen.split_whitespace().collect();
    if parts.len() < 4 {
        return Err(invalid("expected at least 4 fields"));
    }

    let mut board = Board::empty();
    let ranks: Vec<&str> = parts[0].split('/').collect();
    if ranks.len() != 8 {
        return Err(invalid("board section must have 8 ranks"));
    }
    for (rank_idx, rank_str) in ranks.iter().enumerate() {
        let rank = 7 - rank_idx as u8; // FEN lists rank 8 .. 1
        let mut file: u8 = 0;
        for ch in rank_str.chars() {
            if let Some(d) = ch.to_digit(10) {
                file += d as u8;
            } else {
                let kind = PieceKind::from_char(ch).ok_or_else(|| invalid("bad piece letter"))?;
                let color = if ch.is_ascii_uppercase() {
                    Color::White
                } else {
                    Color::Black
                };
                if file >= 8 {
                    return Err(invalid("too many files in a rank"));
                }
                let mut piece = Piece::new(color, kind);
                piece.has_moved = match kind {
                    PieceKind::Pawn => rank != color.pawn_rank(),
                    PieceKind::King | PieceKind::Rook => true,
                    _ => false,
                };
                board.set_piece(Square::at(rank, file), Some(piece));
                file += 1;
            }
            if file > 8 {
                return Err(invalid("too many files in a rank"));
            }
        }
        if file != 8 {
            return Err(invalid("not enough files in a rank"));
        }
    }

    for color in [Color::White, Color::Black] {
        if board.pieces_of(color).filter(|(_, pc)| pc.kind == PieceKind::King).count() > 1 {
            return Err(invalid("more than one king of a color"));
        }
    }

    let active = match parts[1] {
        "w" => Color::White,
        "b" => Color::Black,
        _ => return Err(invalid("side to move must be 'w' or 'b'")),
    };

    if parts[2] != "-" {
        for c in parts[2].chars() {
            let (color, rook_file) = match c {
                'K' => (Color::White, 7),
                'Q' => (Color::White, 0),
                'k' => (Color::Black, 7),
                'q' => (Color::Black, 0),
                _ => return Err(invalid("bad castling right")),
            };
            let rank = color.home_rank();
            for (file, kind) in [(4, PieceKind::King), (rook_file, PieceKind::Rook)] {
                let sq = Square::at(rank, file);
                match board.piece_at(sq) {
                    Some(mut pc) if pc.color == color && pc.kind == kind => {
                        pc.has_moved = false;
                        board.set_piece(sq, Some(pc));
                    }
                    _ => return Err(invalid("castling right without king and rook at home")),
                }
            }
        }
    }

    let last_move = if parts[3] == "-" {
        None
    } else {
        let target: Square = parts[3].parse().map_err(|_| invalid("bad en passant square"))?;
        let mover = active.other();
        // The skipped square sits between the mover's pawn rank and the
        // rank it advanced to.
        if target.rank() as i8 != mover.pawn_rank() as i8 + mover.forward() {
            return Err(invalid("en passant square on the wrong rank for the side to move"));
        }
        let from = target.offset(-mover.forward(), 0);
        let to = target.offset(mover.forward(), 0);
        let (Some(from), Some(to)) = (from, to) else {
            return Err(invalid("en passant square on an edge rank"));
        };
        if !board.is_empty(target) || !board.is_empty(from) {
            return Err(invalid("en passant squares behind the advanced pawn must be empty"));
        }
        match board.piece_at(to) {
            Some(pc) if pc.color == mover && pc.kind == PieceKind::Pawn => Some(LastMove {
                piece: Piece::new(mover, PieceKind::Pawn),
                from,
                to,
                promotion: None,
            }),
            _ => return Err(invalid("en passant square without the advanced pawn")),
        }
    };

    let half_moves = match parts.get(4) {
        Some(s) => s.parse().map_err(|_| invalid("bad halfmove clock"))?,
        None => 0,
    };
    let full_moves = match parts.get(5) {
        Some(s) => s.parse().map_err(|_| invalid("bad fullmove number"))?,
        None => 1,
    };
    if full_moves == 0 {
        return Err(invalid("fullmove number starts at 1"));
    }

    Ok(Setup {
        board,
        active,
        last_move,
        half_moves,
        full_moves,
    })
}

#[cfg(test)]
#[path = "fen_tests.rs"]
mod fen_tests;
