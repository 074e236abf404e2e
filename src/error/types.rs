//! Error types
//!
//! Defines domain-specific error types for the protocol, the game rules,
//! the transport and the leaderboard.

use std::fmt;
use std::io;

/// Malformed protocol lines
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProtocolError {
    Empty,
    LineTooLong(usize),
    MissingSeparator,
    BoardLength(usize),
    UnknownCell(char),
    UnknownOutcome(String),
    InvalidIndex(String),
    UnknownMessage(String),
}

impl fmt::Display for ProtocolError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProtocolError::Empty => write!(f, "Empty line"),
            ProtocolError::LineTooLong(len) => write!(f, "Line too long: {} bytes", len),
            ProtocolError::MissingSeparator => write!(f, "Missing ',' separator"),
            ProtocolError::BoardLength(len) => {
                write!(f, "Board must have 9 cells, got {}", len)
            }
            ProtocolError::UnknownCell(c) => write!(f, "Unknown cell symbol: {:?}", c),
            ProtocolError::UnknownOutcome(s) => write!(f, "Unknown outcome: {:?}", s),
            ProtocolError::InvalidIndex(s) => write!(f, "Invalid move index: {:?}", s),
            ProtocolError::UnknownMessage(s) => write!(f, "Unknown message: {:?}", s),
        }
    }
}

impl std::error::Error for ProtocolError {}

/// Rejected player moves
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoveError {
    OutOfRange(usize),
    Occupied(usize),
    GameOver,
}

impl fmt::Display for MoveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MoveError::OutOfRange(index) => write!(f, "Cell {} is off the board", index),
            MoveError::Occupied(index) => write!(f, "Cell {} is already occupied", index),
            MoveError::GameOver => write!(f, "Game is already over"),
        }
    }
}

impl std::error::Error for MoveError {}

/// Connection failures
#[derive(Debug)]
pub enum TransportError {
    Connect { addr: String, source: io::Error },
    Io(io::Error),
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransportError::Connect { addr, source } => {
                write!(f, "Failed to connect to {}: {}", addr, source)
            }
            TransportError::Io(e) => write!(f, "I/O error: {}", e),
        }
    }
}

impl std::error::Error for TransportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TransportError::Connect { source, .. } => Some(source),
            TransportError::Io(e) => Some(e),
        }
    }
}

impl From<io::Error> for TransportError {
    fn from(error: io::Error) -> Self {
        TransportError::Io(error)
    }
}

/// Leaderboard failures
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PersistenceError {
    InvalidName(String),
}

impl fmt::Display for PersistenceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PersistenceError::InvalidName(name) => write!(f, "Invalid player name: {:?}", name),
        }
    }
}

impl std::error::Error for PersistenceError {}

/// General error that encompasses all error types
#[derive(Debug)]
pub enum GameServerError {
    Protocol(ProtocolError),
    Move(MoveError),
    Transport(TransportError),
    Persistence(PersistenceError),
    Config(config::ConfigError),
}

impl fmt::Display for GameServerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameServerError::Protocol(e) => write!(f, "Protocol error: {}", e),
            GameServerError::Move(e) => write!(f, "Move rejected: {}", e),
            GameServerError::Transport(e) => write!(f, "Transport error: {}", e),
            GameServerError::Persistence(e) => write!(f, "Persistence error: {}", e),
            GameServerError::Config(e) => write!(f, "Configuration error: {}", e),
        }
    }
}

impl std::error::Error for GameServerError {}

impl From<ProtocolError> for GameServerError {
    fn from(error: ProtocolError) -> Self {
        GameServerError::Protocol(error)
    }
}

impl From<MoveError> for GameServerError {
    fn from(error: MoveError) -> Self {
        GameServerError::Move(error)
    }
}

impl From<TransportError> for GameServerError {
    fn from(error: TransportError) -> Self {
        GameServerError::Transport(error)
    }
}

impl From<PersistenceError> for GameServerError {
    fn from(error: PersistenceError) -> Self {
        GameServerError::Persistence(error)
    }
}

impl From<config::ConfigError> for GameServerError {
    fn from(error: config::ConfigError) -> Self {
        GameServerError::Config(error)
    }
}

impl From<io::Error> for GameServerError {
    fn from(error: io::Error) -> Self {
        GameServerError::Transport(TransportError::Io(error))
    }
}
