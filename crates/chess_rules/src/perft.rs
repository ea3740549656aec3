use crate::board::{Board, LastMove};
use crate::movegen::legal_moves;
use crate::types::Color;

/// Pure perft node count over the legal-move index.
///
/// Each `(from, to)` pair is one node, so a promotion counts once (it is
/// played as a queen) rather than once per promotion piece.
pub fn perft(board: &Board, active: Color, last_move: Option<LastMove>, depth: u8) -> u64 {
    if depth == 0 {
        return 1;
    }

    let mut board = *board;
    let index = legal_moves(&mut board, active, last_move.as_ref());
    if depth == 1 {
        return index.move_count() as u64;
    }

    let mut nodes = 0u64;
    for (from, to) in index.moves() {
        let mut next = board;
        if let Some(played) = next.make_move(from, to, None) {
            nodes += perft(&next, active.other(), Some(played.last_move), depth - 1);
        }
    }
    nodes
}
