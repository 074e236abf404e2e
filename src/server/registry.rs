//! Connection registry
//!
//! Tracks which peers currently have a live session. This is the only state
//! shared between the accept loop and the session tasks; game state is never stored here.

use std::collections::HashSet;
use std::net::SocketAddr;

/// Registry of peers with an active session
#[derive(Debug, Default)]
pub struct ConnectionRegistry {
    peers: HashSet<SocketAddr>,
}

impl ConnectionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a peer. Returns false if it was already registered.
    pub fn insert(&mut self, addr: SocketAddr) -> bool {
        self.peers.insert(addr)
    }

    pub fn remove(&mut self, addr: &SocketAddr) -> bool {
        self.peers.remove(addr)
    }

    pub fn len(&self) -> usize {
        self.peers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.peers.is_empty()
    }
}
