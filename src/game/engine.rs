//! Module `engine`
//!
//! The authoritative tic-tac-toe state machine. The human plays X,
//! the computer plays O by picking uniformly among the empty cells.

use log::debug;
use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use rand::{Rng, SeedableRng};

use crate::error::MoveError;
use crate::game::board::{BOARD_SIZE, Board, Cell, Outcome};

/// One game: a board, its outcome, and the random source used by the computer player.
///
/// The outcome is recomputed after every move and only ever overwritten
/// directly through [`GameEngine::set_state`].
#[derive(Debug)]
pub struct GameEngine<R = StdRng> {
    board: Board,
    outcome: Outcome,
    rng: R,
}

impl GameEngine<StdRng> {
    /// Creates a fresh game seeded from the operating system.
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_os_rng())
    }
}

impl Default for GameEngine<StdRng> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Rng> GameEngine<R> {
    /// Creates a fresh game that draws computer moves from `rng`.
    pub fn with_rng(rng: R) -> Self {
        Self {
            board: Board::new(),
            outcome: Outcome::InProgress,
            rng,
        }
    }

    /// Clears the board and returns to `InProgress`.
    pub fn reset(&mut self) {
        self.board = Board::new();
        self.outcome = Outcome::InProgress;
    }

    /// Places an X at `index`.
    ///
    /// Rejected only if the index is off the board or the cell is occupied.
    /// A rejected move leaves the state untouched. Whether a finished game
    /// may still be played on is left to the caller; check
    /// [`GameEngine::is_game_over`] first.
    pub fn apply_player_move(&mut self, index: usize) -> Result<(), MoveError> {
        if index >= BOARD_SIZE {
            return Err(MoveError::OutOfRange(index));
        }
        if !self.board.cells()[index].is_empty() {
            return Err(MoveError::Occupied(index));
        }

        self.board.set(index, Cell::X);
        self.outcome = self.board.outcome();
        Ok(())
    }

    /// Places an O on a uniformly chosen empty cell.
    ///
    /// Returns the chosen index, or `None` when the game is over or the board is full.
    pub fn apply_computer_move(&mut self) -> Option<usize> {
        if self.is_game_over() {
            return None;
        }

        let empties = self.board.empty_cells();
        let index = *empties.choose(&mut self.rng)?;

        self.board.set(index, Cell::O);
        self.outcome = self.board.outcome();
        debug!("Computer played {} -> {:?}", index, self.outcome);
        Some(index)
    }

    pub fn is_game_over(&self) -> bool {
        self.outcome.is_terminal()
    }

    /// Wire discriminator of the current outcome (` ` while in progress).
    pub fn winner(&self) -> char {
        self.outcome.symbol()
    }

    pub fn outcome(&self) -> Outcome {
        self.outcome
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Overwrites the whole state without validation.
    ///
    /// Only used to mirror an authoritative snapshot received from a server.
    pub fn set_state(&mut self, board: Board, outcome: Outcome) {
        self.board = board;
        self.outcome = outcome;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::board::{board_from_str, reachable_boards};

    fn seeded() -> GameEngine<StdRng> {
        GameEngine::with_rng(StdRng::seed_from_u64(42))
    }

    fn engine_with(layout: &str) -> GameEngine<StdRng> {
        let mut engine = seeded();
        let board = board_from_str(layout);
        engine.set_state(board, board.outcome());
        engine
    }

    #[test]
    fn test_center_move_on_empty_board() {
        let mut engine = seeded();
        assert!(engine.apply_player_move(4).is_ok());
        assert_eq!(engine.board().get(4), Some(Cell::X));
        assert_eq!(engine.outcome(), Outcome::InProgress);
        assert_eq!(engine.winner(), ' ');
    }

    #[test]
    fn test_occupied_cell_rejected_and_board_unchanged() {
        let mut engine = engine_with("XXO------");
        let before = *engine.board();
        assert_eq!(engine.apply_player_move(2), Err(MoveError::Occupied(2)));
        assert_eq!(*engine.board(), before);
    }

    #[test]
    fn test_out_of_range_rejected() {
        let mut engine = seeded();
        assert_eq!(engine.apply_player_move(9), Err(MoveError::OutOfRange(9)));
        assert_eq!(
            engine.apply_player_move(usize::MAX),
            Err(MoveError::OutOfRange(usize::MAX))
        );
        assert_eq!(*engine.board(), Board::new());
    }

    #[test]
    fn test_completing_top_row_wins() {
        let mut engine = engine_with("XX-OO----");
        assert!(engine.apply_player_move(2).is_ok());
        assert_eq!(engine.outcome(), Outcome::WinX);
        assert!(engine.is_game_over());
        assert_eq!(engine.winner(), 'X');
    }

    #[test]
    fn test_last_move_without_line_is_draw() {
        let mut engine = engine_with("XOXXOOOX-");
        assert!(engine.apply_player_move(8).is_ok());
        assert_eq!(engine.outcome(), Outcome::Draw);
        assert_eq!(engine.winner(), 'D');
    }

    #[test]
    fn test_player_move_on_won_board_only_checks_the_cell() {
        let mut engine = engine_with("XXXOO----");
        assert_eq!(engine.apply_player_move(0), Err(MoveError::Occupied(0)));

        assert!(engine.apply_player_move(8).is_ok());
        assert_eq!(engine.board().get(8), Some(Cell::X));
        assert_eq!(engine.outcome(), Outcome::WinX);
    }

    #[test]
    fn test_computer_does_not_move_on_won_board() {
        let mut engine = engine_with("XXXOO----");
        let before = *engine.board();
        assert_eq!(engine.apply_computer_move(), None);
        assert_eq!(*engine.board(), before);
    }

    #[test]
    fn test_every_reachable_board_rejects_occupied_and_off_board_moves() {
        for board in reachable_boards() {
            let mut engine = GameEngine::with_rng(StdRng::seed_from_u64(0));
            engine.set_state(board, board.outcome());

            for index in (0..BOARD_SIZE).filter(|&i| board.get(i) != Some(Cell::Empty)) {
                assert_eq!(engine.apply_player_move(index), Err(MoveError::Occupied(index)));
                assert_eq!(*engine.board(), board);
            }
            assert_eq!(engine.apply_player_move(BOARD_SIZE), Err(MoveError::OutOfRange(9)));
            assert_eq!(*engine.board(), board);
            assert_eq!(engine.outcome(), board.outcome());
        }
    }

    #[test]
    fn test_computer_places_exactly_one_o_in_empty_cell() {
        for seed in 0..50 {
            let mut engine = GameEngine::with_rng(StdRng::seed_from_u64(seed));
            let board = board_from_str("XO-X-O---");
            engine.set_state(board, board.outcome());

            let index = engine.apply_computer_move().expect("a move is available");
            assert!(board.empty_cells().contains(&index));

            let changed: Vec<usize> = (0..BOARD_SIZE)
                .filter(|&i| engine.board().get(i) != board.get(i))
                .collect();
            assert_eq!(changed, vec![index]);
            assert_eq!(engine.board().get(index), Some(Cell::O));
        }
    }

    #[test]
    fn test_computer_move_is_deterministic_for_a_seed() {
        let mut a = seeded();
        let mut b = seeded();
        a.apply_player_move(0).unwrap();
        b.apply_player_move(0).unwrap();
        assert_eq!(a.apply_computer_move(), b.apply_computer_move());
        assert_eq!(a.board(), b.board());
    }

    #[test]
    fn test_computer_move_reaches_every_empty_cell() {
        let mut seen = [false; BOARD_SIZE];
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..500 {
            let mut engine = GameEngine::with_rng(StdRng::seed_from_u64(rng.random()));
            engine.apply_player_move(4).unwrap();
            let index = engine.apply_computer_move().unwrap();
            seen[index] = true;
        }
        assert!(!seen[4]);
        assert!(seen.iter().enumerate().all(|(i, hit)| i == 4 || *hit));
    }

    #[test]
    fn test_computer_move_on_full_board_is_noop() {
        let mut engine = seeded();
        let board = board_from_str("XOXXOOOXX");
        engine.set_state(board, Outcome::InProgress);
        assert_eq!(engine.apply_computer_move(), None);
        assert_eq!(*engine.board(), board);
    }

    #[test]
    fn test_reset_clears_state() {
        let mut engine = engine_with("XXXOO----");
        engine.reset();
        assert_eq!(*engine.board(), Board::new());
        assert_eq!(engine.outcome(), Outcome::InProgress);
    }
}
