//! Module `board`
//!
//! Defines the 3x3 board, its cells, and the derived game outcome.
//! Outcome detection is a pure function of the cell contents.

use std::fmt;

/// Number of cells on the board.
pub const BOARD_SIZE: usize = 9;

/// The eight winning triples, scanned rows first, then columns, then diagonals.
const LINES: [[usize; 3]; 8] = [
    // Rows
    [0, 1, 2],
    [3, 4, 5],
    [6, 7, 8],
    // Columns
    [0, 3, 6],
    [1, 4, 7],
    [2, 5, 8],
    // Diagonals
    [0, 4, 8],
    [2, 4, 6],
];

/// Contents of a single board cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Cell {
    #[default]
    Empty,
    X,
    O,
}

impl Cell {
    /// Returns the wire symbol for this cell (`-`, `X` or `O`).
    pub fn symbol(self) -> char {
        match self {
            Cell::Empty => '-',
            Cell::X => 'X',
            Cell::O => 'O',
        }
    }

    /// Maps a wire symbol back to a cell, if it belongs to the alphabet.
    pub fn from_symbol(symbol: char) -> Option<Self> {
        match symbol {
            '-' => Some(Cell::Empty),
            'X' => Some(Cell::X),
            'O' => Some(Cell::O),
            _ => None,
        }
    }

    pub fn is_empty(self) -> bool {
        self == Cell::Empty
    }
}

/// Classification of a board: still being played, or finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Outcome {
    #[default]
    InProgress,
    WinX,
    WinO,
    Draw,
}

impl Outcome {
    /// Returns the wire discriminator (` `, `X`, `O` or `D`).
    pub fn symbol(self) -> char {
        match self {
            Outcome::InProgress => ' ',
            Outcome::WinX => 'X',
            Outcome::WinO => 'O',
            Outcome::Draw => 'D',
        }
    }

    /// Maps a wire discriminator back to an outcome.
    pub fn from_symbol(symbol: char) -> Option<Self> {
        match symbol {
            ' ' => Some(Outcome::InProgress),
            'X' => Some(Outcome::WinX),
            'O' => Some(Outcome::WinO),
            'D' => Some(Outcome::Draw),
            _ => None,
        }
    }

    pub fn is_terminal(self) -> bool {
        self != Outcome::InProgress
    }
}

/// Fixed-size board of nine cells in row-major order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Board {
    cells: [Cell; BOARD_SIZE],
}

impl Board {
    /// Creates an all-empty board.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_cells(cells: [Cell; BOARD_SIZE]) -> Self {
        Self { cells }
    }

    pub fn cells(&self) -> &[Cell; BOARD_SIZE] {
        &self.cells
    }

    /// Returns the cell at `index`, or `None` if the index is off the board.
    pub fn get(&self, index: usize) -> Option<Cell> {
        self.cells.get(index).copied()
    }

    pub(crate) fn set(&mut self, index: usize, cell: Cell) {
        self.cells[index] = cell;
    }

    /// Indices of all empty cells, ascending.
    pub fn empty_cells(&self) -> Vec<usize> {
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, cell)| cell.is_empty())
            .map(|(index, _)| index)
            .collect()
    }

    pub fn is_full(&self) -> bool {
        self.cells.iter().all(|cell| !cell.is_empty())
    }

    /// Computes the outcome of this board.
    ///
    /// The first fully-occupied, identical triple decides the winner.
    /// With no such triple, a full board is a draw.
    pub fn outcome(&self) -> Outcome {
        for [a, b, c] in LINES {
            let cell = self.cells[a];
            if !cell.is_empty() && cell == self.cells[b] && cell == self.cells[c] {
                return match cell {
                    Cell::X => Outcome::WinX,
                    Cell::O => Outcome::WinO,
                    Cell::Empty => Outcome::InProgress,
                };
            }
        }

        if self.is_full() {
            Outcome::Draw
        } else {
            Outcome::InProgress
        }
    }
}

/// Renders the board as three rows, e.g. `X|-|O`.
impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (row, chunk) in self.cells.chunks(3).enumerate() {
            if row > 0 {
                writeln!(f)?;
            }
            write!(
                f,
                "{}|{}|{}",
                chunk[0].symbol(),
                chunk[1].symbol(),
                chunk[2].symbol()
            )?;
        }
        Ok(())
    }
}

#[cfg(test)]
pub(crate) fn board_from_str(layout: &str) -> Board {
    let mut cells = [Cell::Empty; BOARD_SIZE];
    for (index, symbol) in layout.chars().enumerate() {
        cells[index] = Cell::from_symbol(symbol).expect("valid cell symbol");
    }
    Board::from_cells(cells)
}

/// Every board reachable from the empty board by alternating X and O
/// moves, stopping at finished games. Includes the empty board.
#[cfg(test)]
pub(crate) fn reachable_boards() -> Vec<Board> {
    let mut seen = std::collections::HashSet::new();
    let mut stack = vec![(Board::new(), Cell::X)];

    while let Some((board, turn)) = stack.pop() {
        if !seen.insert(board) || board.outcome().is_terminal() {
            continue;
        }
        let next = if turn == Cell::X { Cell::O } else { Cell::X };
        for index in board.empty_cells() {
            let mut child = board;
            child.set(index, turn);
            stack.push((child, next));
        }
    }

    seen.into_iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_board_in_progress() {
        let board = Board::new();
        assert_eq!(board.outcome(), Outcome::InProgress);
        assert_eq!(board.empty_cells(), (0..9).collect::<Vec<_>>());
    }

    #[test]
    fn test_row_column_and_diagonal_wins() {
        assert_eq!(board_from_str("XXXOO----").outcome(), Outcome::WinX);
        assert_eq!(board_from_str("OXXOX-O--").outcome(), Outcome::WinO);
        assert_eq!(board_from_str("X-O-XO--X").outcome(), Outcome::WinX);
        assert_eq!(board_from_str("XXO-O-O--").outcome(), Outcome::WinO);
    }

    #[test]
    fn test_full_board_without_line_is_draw() {
        let board = board_from_str("XOXXOOOXX");
        assert!(board.is_full());
        assert_eq!(board.outcome(), Outcome::Draw);
    }

    #[test]
    fn test_full_board_with_line_is_win_not_draw() {
        assert_eq!(board_from_str("XXXOOXOXO").outcome(), Outcome::WinX);
    }

    #[test]
    fn test_outcome_depends_only_on_cells() {
        let a = board_from_str("XO-XO-X--");
        let b = Board::from_cells(*a.cells());
        assert_eq!(a.outcome(), b.outcome());
    }

    #[test]
    fn test_symbols_round_trip_alphabet() {
        for cell in [Cell::Empty, Cell::X, Cell::O] {
            assert_eq!(Cell::from_symbol(cell.symbol()), Some(cell));
        }
        for outcome in [Outcome::InProgress, Outcome::WinX, Outcome::WinO, Outcome::Draw] {
            assert_eq!(Outcome::from_symbol(outcome.symbol()), Some(outcome));
        }
        assert_eq!(Cell::from_symbol('x'), None);
        assert_eq!(Outcome::from_symbol('-'), None);
    }

    #[test]
    fn test_reachable_positions() {
        let boards = reachable_boards();
        assert_eq!(boards.len(), 5478);
        for board in &boards {
            let xs = board.cells().iter().filter(|c| **c == Cell::X).count();
            let os = board.cells().iter().filter(|c| **c == Cell::O).count();
            assert!(xs == os || xs == os + 1);
        }
    }

    #[test]
    fn test_display_renders_rows() {
        let board = board_from_str("X-O-X---O");
        assert_eq!(board.to_string(), "X|-|O\n-|X|-\n-|-|O");
    }
}
