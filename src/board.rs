//! The 3x3 board and the two sides that mark it.

use std::fmt::Display;

/// Number of cells on the board.
pub const CELL_COUNT: usize = 9;

/// Which half of a match a player is. Fixed for the whole session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    /// First accepted connection, opens the first round.
    First,
    /// Second accepted connection.
    Second,
}

impl Side {
    /// Both sides, in pairing order.
    pub const BOTH: [Side; 2] = [Side::First, Side::Second];

    /// Wire index of the side (`0` or `1`).
    pub fn index(self) -> usize {
        match self {
            Side::First => 0,
            Side::Second => 1,
        }
    }

    /// The other side.
    pub fn opponent(self) -> Side {
        match self {
            Side::First => Side::Second,
            Side::Second => Side::First,
        }
    }

    /// Inverse of [`Side::index`].
    pub fn from_index(index: usize) -> Option<Side> {
        match index {
            0 => Some(Side::First),
            1 => Some(Side::Second),
            _ => None,
        }
    }
}

impl Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.index())
    }
}

/// Content of one board cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Cell {
    /// Nobody has marked the cell this round.
    #[default]
    Empty,
    /// Marked by the given side.
    Marked(Side),
}

impl Cell {
    /// Wire token: `"0"`, `"1"`, or `"-1"` for an empty cell.
    pub fn token(self) -> &'static str {
        match self {
            Cell::Empty => "-1",
            Cell::Marked(Side::First) => "0",
            Cell::Marked(Side::Second) => "1",
        }
    }
}

/// Nine cells in row-major order.
///
/// A marked cell stays marked until the whole board is cleared.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Board {
    cells: [Cell; CELL_COUNT],
}

impl Board {
    /// An empty board.
    pub fn new() -> Self {
        Self::default()
    }

    /// Cell at `index`, or `None` when out of range.
    pub fn get(&self, index: usize) -> Option<Cell> {
        self.cells.get(index).copied()
    }

    /// True when `index` is on the board and unmarked.
    pub fn is_free(&self, index: usize) -> bool {
        self.get(index) == Some(Cell::Empty)
    }

    /// Mark `index` for `side`. Returns false, leaving the board untouched, when the cell
    /// is taken or out of range.
    pub fn place(&mut self, index: usize, side: Side) -> bool {
        if !self.is_free(index) {
            return false;
        }
        self.cells[index] = Cell::Marked(side);
        true
    }

    /// Empty every cell.
    pub fn clear(&mut self) {
        self.cells = [Cell::Empty; CELL_COUNT];
    }

    /// True when no cell is empty.
    pub fn is_full(&self) -> bool {
        self.cells.iter().all(|c| *c != Cell::Empty)
    }

    /// All cells in row-major order.
    pub fn cells(&self) -> &[Cell; CELL_COUNT] {
        &self.cells
    }

    /// Nine comma-terminated cell tokens, e.g. `"0,-1,1,-1,-1,-1,-1,-1,-1,"`.
    pub fn to_tokens(&self) -> String {
        self.cells.iter().fold(String::new(), |acu, cell| {
            acu + cell.token() + ","
        })
    }
}

#[cfg(test)]
mod board_tests {
    use super::*;

    #[test]
    fn placed_cells_are_never_overwritten() {
        let mut board = Board::new();
        assert!(board.place(4, Side::First));
        assert!(!board.place(4, Side::Second));
        assert_eq!(board.get(4), Some(Cell::Marked(Side::First)));
    }

    #[test]
    fn out_of_range_is_never_free() {
        let mut board = Board::new();
        assert!(!board.is_free(9));
        assert!(!board.place(9, Side::First));
        assert_eq!(board, Board::new());
    }

    #[test]
    fn tokens_follow_cell_ownership() {
        let mut board = Board::new();
        board.place(0, Side::First);
        board.place(2, Side::Second);
        board.place(8, Side::First);

        let tokens = board.to_tokens();
        assert_eq!(tokens, "0,-1,1,-1,-1,-1,-1,-1,0,");

        let split = tokens.trim_end_matches(',').split(',').collect::<Vec<_>>();
        assert_eq!(split.len(), CELL_COUNT);
        for (token, cell) in split.iter().zip(board.cells()) {
            assert_eq!(*token, cell.token());
        }
    }

    #[test]
    fn clear_empties_a_full_board() {
        let mut board = Board::new();
        for i in 0..CELL_COUNT {
            board.place(i, Side::BOTH[i % 2]);
        }
        assert!(board.is_full());
        board.clear();
        assert!(board.cells().iter().all(|c| *c == Cell::Empty));
    }

    #[test]
    fn side_index_round_trips() {
        for side in Side::BOTH {
            assert_eq!(Side::from_index(side.index()), Some(side));
            assert_eq!(side.opponent().opponent(), side);
        }
        assert_eq!(Side::from_index(2), None);
    }
}
