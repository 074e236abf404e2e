//! Tic-tac-toe terminal client
//!
//! Plays against a server when one is reachable, otherwise against a local
//! computer player. Type a cell number (0-8), `n` for a new game, `q` to quit.

use log::{info, warn};
use std::process::ExitCode;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc::UnboundedReceiver;

use rax_tictactoe::client::{ClientChannel, GameMirror, MoveIntent, PlayMode};
use rax_tictactoe::config::GameConfig;
use rax_tictactoe::error::{GameServerError, handle_error};
use rax_tictactoe::game::Outcome;
use rax_tictactoe::leaderboard::{InMemoryLeaderboard, Leaderboard};
use rax_tictactoe::protocol::Snapshot;
use rax_tictactoe::utils::logging::setup_logging;

type Connection = (ClientChannel, UnboundedReceiver<Snapshot>);

#[tokio::main]
async fn main() -> ExitCode {
    setup_logging();

    let config = match GameConfig::load() {
        Ok(config) => config,
        Err(e) => {
            handle_error(&GameServerError::from(e));
            return ExitCode::FAILURE;
        }
    };

    let mut connection = connect(&config).await;
    let mut mirror = GameMirror::new(if connection.is_some() {
        PlayMode::Online
    } else {
        PlayMode::Offline
    });
    let mut leaderboard = InMemoryLeaderboard::new();

    if mirror.mode() == PlayMode::Offline {
        render(&mirror.snapshot());
    }

    let mut input = BufReader::new(tokio::io::stdin()).lines();

    loop {
        tokio::select! {
            line = input.next_line() => {
                let Ok(Some(line)) = line else { break };
                match line.trim() {
                    "q" => break,
                    "n" => {
                        mirror.new_game();
                        if mirror.mode() == PlayMode::Online {
                            // One connection is one game
                            drop(connection.take());
                            connection = connect(&config).await;
                            if connection.is_none() {
                                mirror.set_mode(PlayMode::Offline);
                                render(&mirror.snapshot());
                            }
                        } else {
                            render(&mirror.snapshot());
                        }
                    }
                    cell => match cell.parse::<usize>() {
                        Ok(index) => match mirror.choose_cell(index) {
                            Ok(MoveIntent::Local(snapshot)) => {
                                render(&snapshot);
                                announce(&snapshot, PlayMode::Offline, &config, &mut leaderboard);
                            }
                            Ok(MoveIntent::Remote(index)) => {
                                if let Some((channel, _)) = &connection {
                                    channel.send_move(index);
                                }
                            }
                            Err(e) => println!("{}", e),
                        },
                        Err(_) => println!("Enter a cell 0-8, n for a new game, q to quit"),
                    },
                }
            }
            snapshot = next_snapshot(&mut connection) => {
                match snapshot {
                    Some(snapshot) => {
                        let finished = mirror.apply_snapshot(&snapshot);
                        render(&snapshot);
                        if finished {
                            announce(&snapshot, PlayMode::Online, &config, &mut leaderboard);
                        }
                    }
                    None => {
                        println!("Disconnected from server, playing offline");
                        connection = None;
                        mirror.set_mode(PlayMode::Offline);
                        render(&mirror.snapshot());
                    }
                }
            }
        }
    }

    info!("Goodbye");
    ExitCode::SUCCESS
}

async fn connect(config: &GameConfig) -> Option<Connection> {
    match ClientChannel::subscribe(&config.server_host, config.port).await {
        Ok(connection) => Some(connection),
        Err(e) => {
            warn!("{}; playing offline", e);
            None
        }
    }
}

/// Waits for the next snapshot. Never resolves while offline.
async fn next_snapshot(connection: &mut Option<Connection>) -> Option<Snapshot> {
    match connection {
        Some((_, snapshots)) => snapshots.recv().await,
        None => std::future::pending().await,
    }
}

fn render(snapshot: &Snapshot) {
    println!("{}\n", snapshot.board);
}

/// Reports a finished game. Called once per game.
fn announce(
    snapshot: &Snapshot,
    mode: PlayMode,
    config: &GameConfig,
    leaderboard: &mut InMemoryLeaderboard,
) {
    match snapshot.outcome {
        Outcome::InProgress => {}
        Outcome::WinO => println!("Computer wins. Press n for a new game."),
        Outcome::Draw => println!("Draw. Press n for a new game."),
        Outcome::WinX => {
            println!("You win! Press n for a new game.");
            if mode == PlayMode::Online {
                record_win(config, leaderboard);
            }
        }
    }
}

fn record_win(config: &GameConfig, leaderboard: &mut InMemoryLeaderboard) {
    if let Err(e) = leaderboard.record_win(&config.player_name) {
        handle_error(&e.into());
        return;
    }

    match leaderboard.top_scores(config.leaderboard_size) {
        Ok(scores) => {
            println!("Leaderboard:");
            for entry in scores {
                println!("  {} : {}", entry.name, entry.wins);
            }
        }
        Err(e) => handle_error(&e.into()),
    }
}
