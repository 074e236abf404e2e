//! Configuration management for the tic-tac-toe server and client
//!
//! Values come from built-in defaults, then an optional `config.toml`,
//! then `TICTACTOE_*` environment variables.

use config::{Config, Environment, File};
use serde::Deserialize;

use crate::protocol::{DEFAULT_MAX_LINE_LENGTH, SNAPSHOT_LEN};

/// Default TCP port for the game server.
pub const DEFAULT_PORT: u16 = 5000;

/// Settings shared by the server and client binaries
#[derive(Debug, Deserialize, Clone)]
pub struct GameConfig {
    /// IP address the server listens on
    pub bind_address: String,

    /// TCP port the server listens on and the client connects to.
    /// 0 asks the OS for an ephemeral port.
    pub port: u16,

    /// Longest accepted protocol line in bytes, excluding the terminator
    pub max_line_length: usize,

    /// Host the client connects to
    pub server_host: String,

    /// Name recorded on the leaderboard after an online win
    pub player_name: String,

    /// Number of entries shown from the leaderboard
    pub leaderboard_size: usize,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            bind_address: "127.0.0.1".to_string(),
            port: DEFAULT_PORT,
            max_line_length: DEFAULT_MAX_LINE_LENGTH,
            server_host: "127.0.0.1".to_string(),
            player_name: "player".to_string(),
            leaderboard_size: 10,
        }
    }
}

impl GameConfig {
    /// Load configuration from `config.toml` (optional) with environment overrides
    pub fn load() -> Result<Self, config::ConfigError> {
        Self::load_from("config")
    }

    /// Load configuration from the given file stem (optional) with environment overrides
    pub fn load_from(path: &str) -> Result<Self, config::ConfigError> {
        let defaults = Self::default();

        let settings = Config::builder()
            .set_default("bind_address", defaults.bind_address)?
            .set_default("port", i64::from(defaults.port))?
            .set_default("max_line_length", defaults.max_line_length as i64)?
            .set_default("server_host", defaults.server_host)?
            .set_default("player_name", defaults.player_name)?
            .set_default("leaderboard_size", defaults.leaderboard_size as i64)?
            .add_source(File::with_name(path).required(false))
            .add_source(Environment::with_prefix("TICTACTOE"))
            .build()?;

        let config: GameConfig = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Validation for all configuration values
    fn validate(&self) -> Result<(), config::ConfigError> {
        if self.bind_address.trim().is_empty() {
            return Err(config::ConfigError::Message(
                "bind_address cannot be empty".into(),
            ));
        }

        if self.server_host.trim().is_empty() {
            return Err(config::ConfigError::Message(
                "server_host cannot be empty".into(),
            ));
        }

        if self.max_line_length < SNAPSHOT_LEN {
            return Err(config::ConfigError::Message(format!(
                "max_line_length must be at least {}",
                SNAPSHOT_LEN
            )));
        }

        if self.leaderboard_size == 0 {
            return Err(config::ConfigError::Message(
                "leaderboard_size must be greater than 0".into(),
            ));
        }

        Ok(())
    }

    /// Get bind address and port as a listen address
    pub fn listen_socket(&self) -> String {
        format!("{}:{}", self.bind_address, self.port)
    }
}
