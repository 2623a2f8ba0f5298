//! Win detection.

use crate::board::{Board, Cell, Side};

/// Every row, column, and diagonal, as cell indices.
pub const WINNING_LINES: [[usize; 3]; 8] = [
    [0, 1, 2],
    [3, 4, 5],
    [6, 7, 8],
    [0, 3, 6],
    [1, 4, 7],
    [2, 5, 8],
    [0, 4, 8],
    [2, 4, 6],
];

/// True when `side` holds all three cells of at least one line.
pub fn has_won(board: &Board, side: Side) -> bool {
    let cells = board.cells();
    WINNING_LINES
        .iter()
        .any(|line| line.iter().all(|&i| cells[i] == Cell::Marked(side)))
}

/// The side that completed a line, checking [`Side::First`] before [`Side::Second`].
pub fn winner(board: &Board) -> Option<Side> {
    Side::BOTH.into_iter().find(|&side| has_won(board, side))
}
