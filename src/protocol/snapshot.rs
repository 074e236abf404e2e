//! Module `snapshot`
//!
//! A snapshot is the complete board plus outcome, sent by the server after
//! every change. On the wire it is nine cell symbols, a comma, and one
//! outcome symbol: `XX-OO----, `.

use std::fmt;

use crate::error::ProtocolError;
use crate::game::{BOARD_SIZE, Board, Cell, GameEngine, Outcome};

/// Length of an encoded snapshot without its line terminator.
pub const SNAPSHOT_LEN: usize = BOARD_SIZE + 2;

/// Immutable board and outcome at one point in time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Snapshot {
    pub board: Board,
    pub outcome: Outcome,
}

impl Snapshot {
    pub fn new(board: Board, outcome: Outcome) -> Self {
        Self { board, outcome }
    }

    /// Captures the current state of an engine.
    pub fn of<R: rand::Rng>(engine: &GameEngine<R>) -> Self {
        Self::new(*engine.board(), engine.outcome())
    }

    /// Encodes the snapshot as one newline-terminated line.
    pub fn encode(&self) -> String {
        format!("{}\n", self)
    }

    /// Decodes a snapshot line. The line terminator must already be stripped.
    pub fn decode(line: &str) -> Result<Self, ProtocolError> {
        if line.is_empty() {
            return Err(ProtocolError::Empty);
        }

        let (board_part, outcome_part) = line
            .split_once(',')
            .ok_or(ProtocolError::MissingSeparator)?;

        let count = board_part.chars().count();
        if count != BOARD_SIZE {
            return Err(ProtocolError::BoardLength(count));
        }

        let mut cells = [Cell::Empty; BOARD_SIZE];
        for (slot, symbol) in cells.iter_mut().zip(board_part.chars()) {
            *slot = Cell::from_symbol(symbol).ok_or(ProtocolError::UnknownCell(symbol))?;
        }

        let mut symbols = outcome_part.chars();
        let outcome = match (symbols.next(), symbols.next()) {
            (Some(symbol), None) => Outcome::from_symbol(symbol),
            _ => None,
        }
        .ok_or_else(|| ProtocolError::UnknownOutcome(outcome_part.to_string()))?;

        Ok(Self::new(Board::from_cells(cells), outcome))
    }
}

impl fmt::Display for Snapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for cell in self.board.cells() {
            write!(f, "{}", cell.symbol())?;
        }
        write!(f, ",{}", self.outcome.symbol())
    }
}
