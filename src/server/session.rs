//! Server session
//!
//! One accepted connection and the one game it owns. The session sends the
//! initial snapshot, then answers every well-formed move line with a fresh
//! snapshot until the peer goes away.

use log::{debug, info};
use rand::Rng;
use rand::rngs::StdRng;
use std::net::SocketAddr;
use tokio::io::{AsyncRead, AsyncWrite, AsyncWriteExt, BufReader};

use crate::error::{MoveError, ProtocolError, TransportError, handle_error};
use crate::game::GameEngine;
use crate::protocol::{
    ClientMessage, LineRead, Snapshot, check_line_length, parse_command, read_bounded_line,
    strip_line_ending,
};

/// Per-connection game session. Never shared between connections.
pub struct ServerSession<R = StdRng> {
    peer: SocketAddr,
    engine: GameEngine<R>,
    max_line_length: usize,
}

impl<R: Rng> ServerSession<R> {
    pub fn new(peer: SocketAddr, engine: GameEngine<R>, max_line_length: usize) -> Self {
        Self {
            peer,
            engine,
            max_line_length,
        }
    }

    pub fn peer(&self) -> SocketAddr {
        self.peer
    }

    /// Current state of this session's game.
    pub fn snapshot(&self) -> Snapshot {
        Snapshot::of(&self.engine)
    }

    /// Handles one line from the client (terminator already stripped).
    ///
    /// A well-formed move always yields the snapshot to send back, whether
    /// or not the move was accepted. Moves after the game has finished are
    /// refused here, before reaching the engine. Malformed lines yield an
    /// error and nothing is sent.
    pub fn handle_line(&mut self, line: &str) -> Result<Snapshot, ProtocolError> {
        check_line_length(line, self.max_line_length)?;

        match parse_command(line)? {
            ClientMessage::Move(index) => {
                // A finished game takes no further moves from this connection
                let played = if self.engine.is_game_over() {
                    Err(MoveError::GameOver)
                } else {
                    self.engine.apply_player_move(index)
                };

                match played {
                    Ok(()) => {
                        info!("{} played {}", self.peer, index);
                        if !self.engine.is_game_over() {
                            if let Some(reply) = self.engine.apply_computer_move() {
                                info!("Computer answered {} with {}", self.peer, reply);
                            }
                        }
                        if self.engine.is_game_over() {
                            info!("Game with {} ended: {:?}", self.peer, self.engine.outcome());
                        }
                    }
                    Err(e) => {
                        info!("Rejected move {} from {}", index, self.peer);
                        handle_error(&e.into());
                    }
                }
                Ok(self.snapshot())
            }
        }
    }

    /// Runs the session until end of input or a transport failure.
    pub async fn run<S>(mut self, stream: S) -> Result<(), TransportError>
    where
        S: AsyncRead + AsyncWrite + Unpin,
    {
        let (read_half, mut write_half) = tokio::io::split(stream);
        let mut reader = BufReader::new(read_half);
        let mut buf = Vec::new();

        // The first bytes on the stream are always the initial snapshot
        send_snapshot(&mut write_half, &self.snapshot()).await?;

        loop {
            match read_bounded_line(&mut reader, &mut buf, self.max_line_length).await? {
                LineRead::Eof => {
                    info!("Connection closed by {}", self.peer);
                    return Ok(());
                }
                LineRead::TooLong(len) => {
                    handle_error(&ProtocolError::LineTooLong(len).into());
                    continue;
                }
                LineRead::Line => {}
            }

            let raw = String::from_utf8_lossy(&buf);
            let line = strip_line_ending(&raw);
            debug!("Received from {}: {:?}", self.peer, line);

            match self.handle_line(line) {
                Ok(snapshot) => send_snapshot(&mut write_half, &snapshot).await?,
                Err(e) => {
                    // Dropped; the connection stays open
                    handle_error(&e.into());
                }
            }
        }
    }
}

async fn send_snapshot<W>(writer: &mut W, snapshot: &Snapshot) -> Result<(), TransportError>
where
    W: AsyncWrite + Unpin,
{
    writer.write_all(snapshot.encode().as_bytes()).await?;
    writer.flush().await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::board::board_from_str;
    use crate::game::{Cell, Outcome};
    use rand::SeedableRng;
    use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};

    fn session() -> ServerSession<StdRng> {
        let peer: SocketAddr = "127.0.0.1:40000".parse().unwrap();
        ServerSession::new(peer, GameEngine::with_rng(StdRng::seed_from_u64(1)), 64)
    }

    #[test]
    fn test_valid_move_triggers_computer_reply() {
        let mut session = session();
        let snapshot = session.handle_line("MOVE:4").unwrap();
        assert_eq!(snapshot.board.get(4), Some(Cell::X));
        let o_count = snapshot
            .board
            .cells()
            .iter()
            .filter(|c| **c == Cell::O)
            .count();
        assert_eq!(o_count, 1);
        assert_eq!(snapshot.outcome, Outcome::InProgress);
    }

    #[test]
    fn test_out_of_range_move_resends_unchanged_snapshot() {
        let mut session = session();
        let before = session.snapshot();
        let after = session.handle_line("MOVE:9").unwrap();
        assert_eq!(after, before);
    }

    #[test]
    fn test_occupied_move_resends_unchanged_snapshot() {
        let mut session = session();
        let first = session.handle_line("MOVE:0").unwrap();
        let again = session.handle_line("MOVE:0").unwrap();
        assert_eq!(first, again);
    }

    #[test]
    fn test_move_after_finished_game_resends_unchanged_snapshot() {
        let peer: SocketAddr = "127.0.0.1:40001".parse().unwrap();
        let mut engine = GameEngine::with_rng(StdRng::seed_from_u64(1));
        engine.set_state(board_from_str("XXXOO----"), Outcome::WinX);
        let mut session = ServerSession::new(peer, engine, 64);

        let before = session.snapshot();
        assert_eq!(session.handle_line("MOVE:8").unwrap(), before);
    }

    #[test]
    fn test_malformed_lines_are_errors() {
        let mut session = session();
        assert!(matches!(
            session.handle_line("HELLO"),
            Err(ProtocolError::UnknownMessage(_))
        ));
        assert!(matches!(
            session.handle_line("MOVE:x"),
            Err(ProtocolError::InvalidIndex(_))
        ));
        assert!(matches!(
            session.handle_line(&"MOVE:1".repeat(20)),
            Err(ProtocolError::LineTooLong(_))
        ));
        assert_eq!(session.snapshot(), Snapshot::default());
    }

    #[tokio::test]
    async fn test_run_sends_initial_snapshot_and_replies() {
        let (client, server) = tokio::io::duplex(1024);
        let task = tokio::spawn(session().run(server));

        let (read_half, mut write_half) = tokio::io::split(client);
        let mut lines = BufReader::new(read_half).lines();

        let initial = lines.next_line().await.unwrap().unwrap();
        assert_eq!(initial, "---------, ");

        // Garbage is dropped without a reply; the next move still gets one
        write_half.write_all(b"garbage\nMOVE:9\n").await.unwrap();
        let unchanged = lines.next_line().await.unwrap().unwrap();
        assert_eq!(unchanged, initial);

        write_half.write_all(b"MOVE:4\r\n").await.unwrap();
        let reply = lines.next_line().await.unwrap().unwrap();
        let snapshot = Snapshot::decode(&reply).unwrap();
        assert_eq!(snapshot.board.get(4), Some(Cell::X));
        assert_eq!(snapshot.board.empty_cells().len(), 7);

        drop(write_half);
        drop(lines);
        assert!(task.await.unwrap().is_ok());
    }

    #[tokio::test]
    async fn test_oversized_line_is_discarded_and_session_survives() {
        let (client, server) = tokio::io::duplex(1024);
        let task = tokio::spawn(session().run(server));

        let (read_half, mut write_half) = tokio::io::split(client);
        let mut lines = BufReader::new(read_half).lines();
        lines.next_line().await.unwrap().unwrap();

        // 4 MiB without a newline; the session drains it in bounded chunks
        let chunk = vec![b'A'; 64 * 1024];
        for _ in 0..64 {
            write_half.write_all(&chunk).await.unwrap();
        }
        write_half.write_all(b"\nMOVE:4\n").await.unwrap();

        let reply = lines.next_line().await.unwrap().unwrap();
        let snapshot = Snapshot::decode(&reply).unwrap();
        assert_eq!(snapshot.board.get(4), Some(Cell::X));

        drop(write_half);
        drop(lines);
        assert!(task.await.unwrap().is_ok());
    }
}
