//! Module `commands`
//!
//! Messages sent from a client to the server. The only command is a move,
//! `MOVE:<index>`, naming the cell the human (X) wants to play.

use crate::error::ProtocolError;

/// Prefix of a move line.
pub const MOVE_PREFIX: &str = "MOVE:";

/// A command parsed from a client line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientMessage {
    /// Play X at the given cell. The index is not range-checked here;
    /// that is the engine's job.
    Move(usize),
}

impl ClientMessage {
    /// Encodes the message as one newline-terminated line.
    pub fn encode(&self) -> String {
        match self {
            ClientMessage::Move(index) => format!("{}{}\n", MOVE_PREFIX, index),
        }
    }
}

/// Parses a client line. The line terminator must already be stripped.
pub fn parse_command(line: &str) -> Result<ClientMessage, ProtocolError> {
    if line.is_empty() {
        return Err(ProtocolError::Empty);
    }

    let digits = line
        .strip_prefix(MOVE_PREFIX)
        .ok_or_else(|| ProtocolError::UnknownMessage(line.to_string()))?;

    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ProtocolError::InvalidIndex(digits.to_string()));
    }

    digits
        .parse::<usize>()
        .map(ClientMessage::Move)
        .map_err(|_| ProtocolError::InvalidIndex(digits.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_move() {
        assert_eq!(parse_command("MOVE:0"), Ok(ClientMessage::Move(0)));
        assert_eq!(parse_command("MOVE:8"), Ok(ClientMessage::Move(8)));
    }

    #[test]
    fn test_out_of_range_index_still_parses() {
        assert_eq!(parse_command("MOVE:9"), Ok(ClientMessage::Move(9)));
    }

    #[test]
    fn test_encode_move() {
        assert_eq!(ClientMessage::Move(4).encode(), "MOVE:4\n");
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert_eq!(parse_command(""), Err(ProtocolError::Empty));
        assert_eq!(
            parse_command("move:3"),
            Err(ProtocolError::UnknownMessage("move:3".into()))
        );
        assert_eq!(
            parse_command("MOVE:"),
            Err(ProtocolError::InvalidIndex(String::new()))
        );
        assert_eq!(
            parse_command("MOVE:-1"),
            Err(ProtocolError::InvalidIndex("-1".into()))
        );
        assert_eq!(
            parse_command("MOVE: 3"),
            Err(ProtocolError::InvalidIndex(" 3".into()))
        );
        assert_eq!(
            parse_command("MOVE:99999999999999999999999"),
            Err(ProtocolError::InvalidIndex("99999999999999999999999".into()))
        );
    }
}
