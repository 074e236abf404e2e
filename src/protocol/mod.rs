//! Session protocol
//!
//! Line-delimited UTF-8 messages over one ordered byte stream:
//! snapshots flow from server to client, moves from client to server.

pub mod commands;
pub mod snapshot;

pub use commands::{ClientMessage, MOVE_PREFIX, parse_command};
pub use snapshot::{SNAPSHOT_LEN, Snapshot};

use tokio::io::{AsyncBufRead, AsyncBufReadExt};

use crate::error::ProtocolError;

/// Default longest accepted line in bytes, excluding the terminator.
pub const DEFAULT_MAX_LINE_LENGTH: usize = 64;

/// Result of reading one line with [`read_bounded_line`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineRead {
    /// End of stream with nothing buffered.
    Eof,
    /// A line (or a final unterminated fragment) is in the buffer.
    Line,
    /// The line exceeded the limit and was discarded up to its `\n`.
    /// Carries the number of bytes discarded.
    TooLong(usize),
}

/// Reads one `\n`-terminated line into `buf`, keeping at most
/// `max_len` bytes plus a `\r\n` terminator in memory.
///
/// An over-long line is consumed and dropped up to and including its
/// newline, so the next call starts on the following line.
pub async fn read_bounded_line<R>(
    reader: &mut R,
    buf: &mut Vec<u8>,
    max_len: usize,
) -> std::io::Result<LineRead>
where
    R: AsyncBufRead + Unpin,
{
    buf.clear();
    let limit = max_len + 2;
    let mut total = 0usize;
    let mut overflow = false;

    loop {
        let available = reader.fill_buf().await?;
        if available.is_empty() {
            return Ok(match (total, overflow) {
                (0, _) => LineRead::Eof,
                (_, true) => LineRead::TooLong(total),
                (_, false) => LineRead::Line,
            });
        }

        let (used, done) = match available.iter().position(|b| *b == b'\n') {
            Some(pos) => (pos + 1, true),
            None => (available.len(), false),
        };

        if !overflow {
            if buf.len() + used > limit {
                overflow = true;
                buf.clear();
            } else {
                buf.extend_from_slice(&available[..used]);
            }
        }

        total += used;
        reader.consume(used);

        if done {
            return Ok(if overflow {
                LineRead::TooLong(total)
            } else {
                LineRead::Line
            });
        }
    }
}

/// Strips the trailing `\n` or `\r\n` from a line read off the stream.
pub fn strip_line_ending(line: &str) -> &str {
    let line = line.strip_suffix('\n').unwrap_or(line);
    line.strip_suffix('\r').unwrap_or(line)
}

/// Rejects lines longer than `max_len` bytes before any parsing.
pub fn check_line_length(line: &str, max_len: usize) -> Result<(), ProtocolError> {
    if line.len() > max_len {
        Err(ProtocolError::LineTooLong(line.len()))
    } else {
        Ok(())
    }
}
