use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::RulesError;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Color {
    White,
    Black,
}

impl Color {
    pub fn other(self) -> Color {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }

    /// Rank delta of a pawn advance for this color.
    pub fn forward(self) -> i8 {
        match self {
            Color::White => 1,
            Color::Black => -1,
        }
    }

    /// Rank holding the king and rooks at the start of the game.
    pub fn home_rank(self) -> u8 {
        match self {
            Color::White => 0,
            Color::Black => 7,
        }
    }

    pub fn pawn_rank(self) -> u8 {
        match self {
            Color::White => 1,
            Color::Black => 6,
        }
    }

    pub fn promotion_rank(self) -> u8 {
        match self {
            Color::White => 7,
            Color::Black => 0,
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Color::White => write!(f, "White"),
            Color::Black => write!(f, "Black"),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PieceKind {
    Pawn,
    Knight,
    Bishop,
    Rook,
    Queen,
    King,
}

impl PieceKind {
    /// Sliding pieces keep travelling along a direction until blocked.
    pub fn slides(self) -> bool {
        matches!(self, PieceKind::Bishop | PieceKind::Rook | PieceKind::Queen)
    }

    /// Standard material value used for the capture tally.
    pub fn value(self) -> i32 {
        match self {
            PieceKind::Pawn => 1,
            PieceKind::Knight | PieceKind::Bishop => 3,
            PieceKind::Rook => 5,
            PieceKind::Queen => 9,
            PieceKind::King => 0,
        }
    }

    /// Kinds a pawn may turn into on the last rank.
    pub fn is_promotion_target(self) -> bool {
        matches!(
            self,
            PieceKind::Knight | PieceKind::Bishop | PieceKind::Rook | PieceKind::Queen
        )
    }

    /// Lowercase letter used by FEN and move text.
    pub fn to_char(self) -> char {
        match self {
            PieceKind::Pawn => 'p',
            PieceKind::Knight => 'n',
            PieceKind::Bishop => 'b',
            PieceKind::Rook => 'r',
            PieceKind::Queen => 'q',
            PieceKind::King => 'k',
        }
    }

    pub fn from_char(c: char) -> Option<PieceKind> {
        match c.to_ascii_lowercase() {
            'p' => Some(PieceKind::Pawn),
            'n' => Some(PieceKind::Knight),
            'b' => Some(PieceKind::Bishop),
            'r' => Some(PieceKind::Rook),
            'q' => Some(PieceKind::Queen),
            'k' => Some(PieceKind::King),
            _ => None,
        }
    }
}

/// A board coordinate. Rank 0 is White's back rank, file 0 is the a-file.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct Square {
    rank: u8,
    file: u8,
}

impl Square {
    pub fn new(rank: i8, file: i8) -> Option<Square> {
        if (0..8).contains(&rank) && (0..8).contains(&file) {
            Some(Square {
                rank: rank as u8,
                file: file as u8,
            })
        } else {
            None
        }
    }

    /// Builds a square from coordinates already known to be on the board.
    pub(crate) const fn at(rank: u8, file: u8) -> Square {
        Square { rank, file }
    }

    pub fn rank(self) -> u8 {
        self.rank
    }

    pub fn file(self) -> u8 {
        self.file
    }

    /// The square `(dr, df)` away, if it is still on the board.
    pub fn offset(self, dr: i8, df: i8) -> Option<Square> {
        Square::new(self.rank as i8 + dr, self.file as i8 + df)
    }

    /// a1 is dark.
    pub fn is_dark(self) -> bool {
        (self.rank + self.file) % 2 == 0
    }

    pub fn all() -> impl Iterator<Item = Square> {
        (0..8u8).flat_map(|rank| (0..8u8).map(move |file| Square { rank, file }))
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let file = (b'a' + self.file) as char;
        let rank = (b'1' + self.rank) as char;
        write!(f, "{file}{rank}")
    }
}

impl FromStr for Square {
    type Err = RulesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let b = s.as_bytes();
        if b.len() != 2 || !(b'a'..=b'h').contains(&b[0]) || !(b'1'..=b'8').contains(&b[1]) {
            return Err(RulesError::InvalidSquare(s.to_string()));
        }
        Ok(Square {
            rank: b[1] - b'1',
            file: b[0] - b'a',
        })
    }
}

impl From<Square> for String {
    fn from(sq: Square) -> String {
        sq.to_string()
    }
}

impl TryFrom<String> for Square {
    type Error = RulesError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

/// Parses UCI-style move text such as `e2e4` or `e7e8q`.
pub fn parse_move_text(text: &str) -> Result<(Square, Square, Option<PieceKind>), RulesError> {
    let text = text.trim();
    if !text.is_ascii() || !(4..=5).contains(&text.len()) {
        return Err(RulesError::InvalidMoveText(text.to_string()));
    }
    let from: Square = text[0..2].parse()?;
    let to: Square = text[2..4].parse()?;
    let promotion = match text[4..].chars().next() {
        None => None,
        Some(c) => match PieceKind::from_char(c) {
            Some(kind) if kind.is_promotion_target() => Some(kind),
            _ => return Err(RulesError::InvalidMoveText(text.to_string())),
        },
    };
    Ok((from, to, promotion))
}

#[cfg(test)]
#[path = "types_tests.rs"]
mod types_tests;
