//! Module `mirror`
//!
//! The client's local copy of the game. Online, it is only ever replaced
//! wholesale by snapshots from the server. Offline, it is a full game
//! against the computer.

use rand::Rng;
use rand::rngs::StdRng;

use crate::error::MoveError;
use crate::game::{Board, GameEngine, Outcome};
use crate::protocol::Snapshot;

/// Where moves are decided.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayMode {
    Offline,
    Online,
}

/// What the caller should do with a chosen cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveIntent {
    /// The move was played locally; this is the resulting state.
    Local(Snapshot),
    /// The move must be sent to the server.
    Remote(usize),
}

pub struct GameMirror<R = StdRng> {
    engine: GameEngine<R>,
    mode: PlayMode,
}

impl GameMirror<StdRng> {
    pub fn new(mode: PlayMode) -> Self {
        Self::with_engine(GameEngine::new(), mode)
    }
}

impl<R: Rng> GameMirror<R> {
    pub fn with_engine(engine: GameEngine<R>, mode: PlayMode) -> Self {
        Self { engine, mode }
    }

    pub fn mode(&self) -> PlayMode {
        self.mode
    }

    /// Switches mode and starts a new game, e.g. after losing the connection.
    pub fn set_mode(&mut self, mode: PlayMode) {
        self.mode = mode;
        self.engine.reset();
    }

    pub fn new_game(&mut self) {
        self.engine.reset();
    }

    /// Replaces the local state with an authoritative snapshot.
    ///
    /// Returns true only when this snapshot ends a game that was still in
    /// progress, so a resent terminal snapshot reports the result once.
    pub fn apply_snapshot(&mut self, snapshot: &Snapshot) -> bool {
        let was_in_progress = !self.engine.is_game_over();
        self.engine.set_state(snapshot.board, snapshot.outcome);
        was_in_progress && snapshot.outcome.is_terminal()
    }

    /// Handles a cell chosen by the player.
    ///
    /// Offline, the move and the computer's reply are played immediately.
    /// Online, the mirror is left untouched and the server decides.
    pub fn choose_cell(&mut self, index: usize) -> Result<MoveIntent, MoveError> {
        if self.engine.is_game_over() {
            return Err(MoveError::GameOver);
        }

        match self.mode {
            PlayMode::Online => Ok(MoveIntent::Remote(index)),
            PlayMode::Offline => {
                self.engine.apply_player_move(index)?;
                if !self.engine.is_game_over() {
                    self.engine.apply_computer_move();
                }
                Ok(MoveIntent::Local(self.snapshot()))
            }
        }
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot::of(&self.engine)
    }

    pub fn board(&self) -> &Board {
        self.engine.board()
    }

    pub fn outcome(&self) -> Outcome {
        self.engine.outcome()
    }
}
