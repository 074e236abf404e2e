//! Tic-tac-toe server - Entry Point
//!
//! Serves human-vs-computer games over TCP, one game per connection.

use log::{error, info};
use std::process::ExitCode;

use rax_tictactoe::Server;
use rax_tictactoe::config::GameConfig;
use rax_tictactoe::utils::logging::setup_logging;

#[tokio::main]
async fn main() -> ExitCode {
    setup_logging();

    let config = match GameConfig::load() {
        Ok(config) => config,
        Err(e) => {
            error!("Invalid configuration: {}", e);
            return ExitCode::FAILURE;
        }
    };

    info!("Launching tic-tac-toe server...");

    let server = match Server::bind(config).await {
        Ok(server) => server,
        Err(e) => {
            error!("Server startup failed: {}", e);
            return ExitCode::FAILURE;
        }
    };

    server.start().await;
    ExitCode::SUCCESS
}
