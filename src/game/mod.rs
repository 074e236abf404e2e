//! Game rules
//!
//! Board representation, outcome detection and the move-validating engine.

pub mod board;
pub mod engine;

pub use board::{BOARD_SIZE, Board, Cell, Outcome};
pub use engine::GameEngine;
