use log::{error, info, warn};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::Mutex;

use crate::config::GameConfig;
use crate::error::TransportError;
use crate::game::GameEngine;
use crate::server::registry::ConnectionRegistry;
use crate::server::session::ServerSession;

/// Builds the engine for each newly accepted connection.
pub type EngineFactory = Arc<dyn Fn() -> GameEngine + Send + Sync>;

pub struct Server {
    registry: Arc<Mutex<ConnectionRegistry>>,
    engine_factory: EngineFactory,
    listener: TcpListener,
    config: Arc<GameConfig>,
}

impl Server {
    /// Binds the listening socket described by `config`.
    pub async fn bind(config: GameConfig) -> std::io::Result<Self> {
        let socket = config.listen_socket();
        let listener = TcpListener::bind(&socket).await.inspect_err(|e| {
            error!("Failed to bind to {}: {}", socket, e);
        })?;
        info!("Server bound to {}", listener.local_addr()?);

        Ok(Self {
            registry: Arc::new(Mutex::new(ConnectionRegistry::new())),
            engine_factory: Arc::new(GameEngine::new),
            listener,
            config: Arc::new(config),
        })
    }

    /// Replaces the engine factory, e.g. with one producing seeded engines.
    pub fn with_engine_factory<F>(mut self, factory: F) -> Self
    where
        F: Fn() -> GameEngine + Send + Sync + 'static,
    {
        self.engine_factory = Arc::new(factory);
        self
    }

    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Number of connections currently being served.
    pub async fn active_sessions(&self) -> usize {
        self.registry.lock().await.len()
    }

    /// Accepts connections forever, one task per connection.
    pub async fn start(&self) {
        info!(
            "Starting tic-tac-toe server on {}",
            self.config.listen_socket()
        );

        loop {
            match self.listener.accept().await {
                Ok((stream, addr)) => {
                    let registry = Arc::clone(&self.registry);
                    let engine = (self.engine_factory)();
                    let max_line_length = self.config.max_line_length;

                    // Spawn a task for each client so accept loop doesn't block
                    tokio::spawn(async move {
                        if let Err(e) =
                            handle_new_client(stream, addr, registry, engine, max_line_length)
                                .await
                        {
                            warn!("Session with {} failed: {}", addr, e);
                        }
                    });
                }
                Err(e) => {
                    error!("Error accepting connection: {}", e);
                }
            }
        }
    }
}

/// Registers the peer, runs its session to completion, then deregisters it.
async fn handle_new_client(
    stream: TcpStream,
    client_addr: SocketAddr,
    registry: Arc<Mutex<ConnectionRegistry>>,
    engine: GameEngine,
    max_line_length: usize,
) -> Result<(), TransportError> {
    {
        let mut peers = registry.lock().await;
        peers.insert(client_addr);
        info!(
            "Client connected: {} ({} active sessions)",
            client_addr,
            peers.len()
        );
    }

    let result = ServerSession::new(client_addr, engine, max_line_length)
        .run(stream)
        .await;

    let mut peers = registry.lock().await;
    peers.remove(&client_addr);
    if peers.is_empty() {
        info!("Client {} disconnected, server idle", client_addr);
    } else {
        info!(
            "Client {} disconnected ({} active sessions)",
            client_addr,
            peers.len()
        );
    }

    result
}
