//! Movement geometry of each piece kind.
//!
//! Directions are `(rank delta, file delta)` pairs. Sliding pieces repeat a
//! direction until blocked, every other piece takes a single step. The pawn
//! table is asymmetric: the straight vectors are advances only and the
//! diagonal vectors are captures only.

use serde::{Deserialize, Serialize};

use crate::types::{Color, PieceKind};

pub const KNIGHT_DIRS: [(i8, i8); 8] = [
    (1, 2),
    (2, 1),
    (-1, 2),
    (-2, 1),
    (1, -2),
    (2, -1),
    (-1, -2),
    (-2, -1),
];

pub const BISHOP_DIRS: [(i8, i8); 4] = [(1, 1), (1, -1), (-1, 1), (-1, -1)];

pub const ROOK_DIRS: [(i8, i8); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];

pub const QUEEN_DIRS: [(i8, i8); 8] = [
    (1, 1),
    (1, -1),
    (-1, 1),
    (-1, -1),
    (1, 0),
    (-1, 0),
    (0, 1),
    (0, -1),
];

pub const KING_DIRS: [(i8, i8); 8] = QUEEN_DIRS;

pub const WHITE_PAWN_DIRS: [(i8, i8); 4] = [(1, 0), (2, 0), (1, 1), (1, -1)];

pub const BLACK_PAWN_DIRS: [(i8, i8); 4] = [(-1, 0), (-2, 0), (-1, 1), (-1, -1)];

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Piece {
    pub color: Color,
    pub kind: PieceKind,
    /// Set once the piece leaves its square. Matters for pawns (double
    /// advance), and for kings and rooks (castling).
    pub has_moved: bool,
}

impl Piece {
    pub fn new(color: Color, kind: PieceKind) -> Self {
        Self {
            color,
            kind,
            has_moved: false,
        }
    }

    pub fn directions(&self) -> &'static [(i8, i8)] {
        match self.kind {
            PieceKind::Pawn => match self.color {
                Color::White => &WHITE_PAWN_DIRS,
                Color::Black => &BLACK_PAWN_DIRS,
            },
            PieceKind::Knight => &KNIGHT_DIRS,
            PieceKind::Bishop => &BISHOP_DIRS,
            PieceKind::Rook => &ROOK_DIRS,
            PieceKind::Queen => &QUEEN_DIRS,
            PieceKind::King => &KING_DIRS,
        }
    }

    pub fn slides(&self) -> bool {
        self.kind.slides()
    }

    /// FEN letter: uppercase for White.
    pub fn to_fen_char(&self) -> char {
        let c = self.kind.to_char();
        match self.color {
            Color::White => c.to_ascii_uppercase(),
            Color::Black => c,
        }
    }
}
