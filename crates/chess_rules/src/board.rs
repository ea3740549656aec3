use serde::{Deserialize, Serialize};
use std::ops::Deref;

use crate::castling;
use crate::piece::Piece;
use crate::types::*;

/// The record of the most recently committed move.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LastMove {
    /// The piece as it was before it moved.
    pub piece: Piece,
    pub from: Square,
    pub to: Square,
    pub promotion: Option<PieceKind>,
}

impl LastMove {
    pub fn is_double_pawn_push(&self) -> bool {
        self.piece.kind == PieceKind::Pawn && self.from.rank().abs_diff(self.to.rank()) == 2
    }
}

/// Board-level effects of a committed move.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Played {
    pub last_move: LastMove,
    pub captured: Option<PieceKind>,
    pub castled: bool,
    pub promoted: Option<PieceKind>,
}

/// 8x8 grid indexed `[rank][file]`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    cells: [[Option<Piece>; 8]; 8],
}

impl Default for Board {
    fn default() -> Self {
        Self::empty()
    }
}

impl Board {
    pub fn empty() -> Self {
        Board {
            cells: [[None; 8]; 8],
        }
    }

    pub fn startpos() -> Self {
        let mut b = Board::empty();
        let back = [
            PieceKind::Rook,
            PieceKind::Knight,
            PieceKind::Bishop,
            PieceKind::Queen,
            PieceKind::King,
            PieceKind::Bishop,
            PieceKind::Knight,
            PieceKind::Rook,
        ];
        for (file, &kind) in back.iter().enumerate() {
            b.cells[0][file] = Some(Piece::new(Color::White, kind));
            b.cells[1][file] = Some(Piece::new(Color::White, PieceKind::Pawn));
            b.cells[6][file] = Some(Piece::new(Color::Black, PieceKind::Pawn));
            b.cells[7][file] = Some(Piece::new(Color::Black, kind));
        }
        b
    }

    pub fn piece_at(&self, sq: Square) -> Option<Piece> {
        self.cells[sq.rank() as usize][sq.file() as usize]
    }

    pub fn set_piece(&mut self, sq: Square, pc: Option<Piece>) {
        self.cells[sq.rank() as usize][sq.file() as usize] = pc;
    }

    /// Removes and returns the occupant of `sq`.
    pub fn take(&mut self, sq: Square) -> Option<Piece> {
        self.cells[sq.rank() as usize][sq.file() as usize].take()
    }

    pub fn is_empty(&self, sq: Square) -> bool {
        self.piece_at(sq).is_none()
    }

    pub fn pieces(&self) -> impl Iterator<Item = (Square, Piece)> + '_ {
        Square::all().filter_map(|sq| self.piece_at(sq).map(|pc| (sq, pc)))
    }

    pub fn pieces_of(&self, color: Color) -> impl Iterator<Item = (Square, Piece)> + '_ {
        self.pieces().filter(move |(_, pc)| pc.color == color)
    }

    pub fn king_square(&self, color: Color) -> Option<Square> {
        self.pieces_of(color)
            .find(|(_, pc)| pc.kind == PieceKind::King)
            .map(|(sq, _)| sq)
    }

    /// Opens a scope for hypothetical edits. Every square touched through the
    /// returned guard is put back when the guard is dropped.
    pub fn scoped(&mut self) -> Scratch<'_> {
        Scratch {
            board: self,
            saved: Vec::with_capacity(3),
        }
    }

    /// Plays `from -> to` on the grid without any legality check. Handles the
    /// castling rook, the en passant victim and promotion (Queen unless a
    /// valid promotion kind is given).
    pub(crate) fn make_move(
        &mut self,
        from: Square,
        to: Square,
        promotion: Option<PieceKind>,
    ) -> Option<Played> {
        let moved = self.piece_at(from)?;
        let mut captured = self.piece_at(to).map(|pc| pc.kind);

        let mut castled = false;
        if moved.kind == PieceKind::King
            && !moved.has_moved
            && let Some((rook_from, rook_to)) = castling::rook_relocation(from, to)
            && let Some(mut rook) = self.take(rook_from)
        {
            rook.has_moved = true;
            self.set_piece(rook_to, Some(rook));
            castled = true;
        }

        // A pawn moving diagonally onto an empty square is capturing en passant;
        // the bypassed pawn stands beside the origin.
        if moved.kind == PieceKind::Pawn && captured.is_none() && from.file() != to.file() {
            let victim = Square::at(from.rank(), to.file());
            captured = self.take(victim).map(|pc| pc.kind);
        }

        let mut placed = moved;
        placed.has_moved = true;
        let mut promoted = None;
        if moved.kind == PieceKind::Pawn && to.rank() == moved.color.promotion_rank() {
            let kind = promotion
                .filter(|k| k.is_promotion_target())
                .unwrap_or(PieceKind::Queen);
            placed = Piece {
                color: moved.color,
                kind,
                has_moved: true,
            };
            promoted = Some(kind);
        }

        self.set_piece(from, None);
        self.set_piece(to, Some(placed));

        Some(Played {
            last_move: LastMove {
                piece: moved,
                from,
                to,
                promotion: promoted,
            },
            captured,
            castled,
            promoted,
        })
    }
}

/// Exclusive, self-restoring access to a board.
///
/// Holds the only mutable borrow of the board, so nothing else can observe the
/// hypothetical state. Original occupants are restored in `Drop`, which runs on
/// every exit path including unwinding.
pub struct Scratch<'a> {
    board: &'a mut Board,
    saved: Vec<(Square, Option<Piece>)>,
}

impl Scratch<'_> {
    fn save(&mut self, sq: Square) {
        if !self.saved.iter().any(|(s, _)| *s == sq) {
            self.saved.push((sq, self.board.piece_at(sq)));
        }
    }

    /// Moves the occupant of `from` onto `to`, overwriting whatever was there.
    pub fn relocate(&mut self, from: Square, to: Square) {
        self.save(from);
        self.save(to);
        let pc = self.board.take(from);
        self.board.set_piece(to, pc);
    }

    /// Removes the occupant of `sq` for the lifetime of this scope.
    pub fn lift(&mut self, sq: Square) -> Option<Piece> {
        self.save(sq);
        self.board.take(sq)
    }

    /// A nested scope; its edits are undone before this one's.
    pub fn scoped(&mut self) -> Scratch<'_> {
        self.board.scoped()
    }
}

impl Deref for Scratch<'_> {
    type Target = Board;

    fn deref(&self) -> &Board {
        &*self.board
    }
}

impl Drop for Scratch<'_> {
    fn drop(&mut self) {
        while let Some((sq, pc)) = self.saved.pop() {
            self.board.set_piece(sq, pc);
        }
    }
}

#[cfg(test)]
#[path = "board_tests.rs"]
mod board_tests;
