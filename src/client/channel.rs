//! Module `channel`
//!
//! The client end of a game connection. A receive task reads snapshots and
//! hands each one to a callback; a writer task drains queued moves, so
//! sending never blocks the caller.

use log::{debug, error, info, warn};
use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::io::{AsyncWriteExt, BufReader};
use tokio::net::TcpStream;
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::error::{GameServerError, ProtocolError, TransportError, handle_error};
use crate::protocol::{
    ClientMessage, DEFAULT_MAX_LINE_LENGTH, LineRead, Snapshot, read_bounded_line,
    strip_line_ending,
};

/// Outbound connection to a game server.
///
/// Dropping the channel stops the receive task and closes the connection.
pub struct ClientChannel {
    peer: SocketAddr,
    outgoing: mpsc::UnboundedSender<ClientMessage>,
    connected: Arc<AtomicBool>,
    receiver_task: JoinHandle<()>,
}

impl ClientChannel {
    /// Connects to `host:port` and starts the receive task.
    ///
    /// Returns once the TCP handshake completes. `on_snapshot` runs on the
    /// receive task, once per decoded snapshot, in stream order.
    pub async fn connect<F>(host: &str, port: u16, on_snapshot: F) -> Result<Self, TransportError>
    where
        F: FnMut(Snapshot) + Send + 'static,
    {
        let addr = format!("{}:{}", host, port);
        let stream = TcpStream::connect(&addr)
            .await
            .map_err(|source| TransportError::Connect {
                addr: addr.clone(),
                source,
            })?;
        let peer = stream.peer_addr()?;
        info!("Connected to game server {}", peer);

        let (read_half, write_half) = stream.into_split();
        let connected = Arc::new(AtomicBool::new(true));
        let (outgoing, queued) = mpsc::unbounded_channel();

        let receiver_task = tokio::spawn(receive_loop(
            read_half,
            peer,
            on_snapshot,
            Arc::clone(&connected),
        ));
        tokio::spawn(write_loop(write_half, peer, queued, Arc::clone(&connected)));

        Ok(Self {
            peer,
            outgoing,
            connected,
            receiver_task,
        })
    }

    /// Connects and forwards every snapshot into a channel, so the caller
    /// consumes them on its own task instead of inside the receive loop.
    pub async fn subscribe(
        host: &str,
        port: u16,
    ) -> Result<(Self, mpsc::UnboundedReceiver<Snapshot>), TransportError> {
        let (tx, rx) = mpsc::unbounded_channel();
        let channel = Self::connect(host, port, move |snapshot| {
            // The consumer may have gone away; nothing left to deliver to
            let _ = tx.send(snapshot);
        })
        .await?;
        Ok((channel, rx))
    }

    /// Queues a move for the server. Fire-and-forget: write failures are
    /// logged by the writer task and show up as [`ClientChannel::is_connected`]
    /// turning false.
    pub fn send_move(&self, index: usize) {
        if self.outgoing.send(ClientMessage::Move(index)).is_err() {
            debug!("Dropping move {}: connection to {} is gone", index, self.peer);
        }
    }

    /// False once the server closed the stream or a read or write failed.
    pub fn is_connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }

    pub fn peer(&self) -> SocketAddr {
        self.peer
    }
}

impl Drop for ClientChannel {
    fn drop(&mut self) {
        self.receiver_task.abort();
    }
}

/// Reads snapshot lines until end of stream. Undecodable or over-long lines are dropped.
async fn receive_loop<F>(
    read_half: OwnedReadHalf,
    peer: SocketAddr,
    mut on_snapshot: F,
    connected: Arc<AtomicBool>,
) where
    F: FnMut(Snapshot) + Send + 'static,
{
    let mut reader = BufReader::new(read_half);
    let mut buf = Vec::new();

    loop {
        match read_bounded_line(&mut reader, &mut buf, DEFAULT_MAX_LINE_LENGTH).await {
            Ok(LineRead::Eof) => {
                info!("Server {} closed the connection", peer);
                break;
            }
            Ok(LineRead::TooLong(len)) => handle_error(&ProtocolError::LineTooLong(len).into()),
            Ok(LineRead::Line) => {
                let raw = String::from_utf8_lossy(&buf);
                match Snapshot::decode(strip_line_ending(&raw)) {
                    Ok(snapshot) => on_snapshot(snapshot),
                    Err(e) => handle_error(&e.into()),
                }
            }
            Err(e) => {
                handle_error(&GameServerError::from(e));
                break;
            }
        }
    }

    connected.store(false, Ordering::SeqCst);
}

/// Writes queued moves until the channel is dropped or a write fails.
async fn write_loop(
    mut write_half: OwnedWriteHalf,
    peer: SocketAddr,
    mut queued: mpsc::UnboundedReceiver<ClientMessage>,
    connected: Arc<AtomicBool>,
) {
    while let Some(message) = queued.recv().await {
        let line = message.encode();
        let result = async {
            write_half.write_all(line.as_bytes()).await?;
            write_half.flush().await
        }
        .await;

        if let Err(e) = result {
            error!("Failed to send {:?} to {}: {}", message, peer, e);
            connected.store(false, Ordering::SeqCst);
            return;
        }
    }

    if let Err(e) = write_half.shutdown().await {
        warn!("Failed to shut down connection to {}: {}", peer, e);
    }
}
