//! Server core functionality
//!
//! The accept loop, the per-connection game session, and the registry of
//! live connections.

pub mod core;
pub mod registry;
pub mod session;

pub use self::core::{EngineFactory, Server};
pub use registry::ConnectionRegistry;
pub use session::ServerSession;
