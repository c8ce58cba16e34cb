//! 5x5 line game against the machine
//!
//! The human always plays X and moves first. `GridMatch` keeps the running
//! tally across rounds; the board logic and search live in `board` and `ai`.

pub mod ai;
pub mod board;

pub use ai::{Difficulty, PRIORITY, best_move, evaluate, minimax, ordered_moves, winning_cell};
pub use board::{Board, CELLS, Mark, Outcome, SIDE, WIN_LINES, winner};

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveRejected {
    OutOfRange(usize),
    Occupied(usize),
    RoundOver,
    NotYourTurn,
}

impl fmt::Display for MoveRejected {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MoveRejected::OutOfRange(i) => write!(f, "cell {i} is off the board"),
            MoveRejected::Occupied(i) => write!(f, "cell {i} is already taken"),
            MoveRejected::RoundOver => write!(f, "the round is over"),
            MoveRejected::NotYourTurn => write!(f, "waiting for the machine to move"),
        }
    }
}

impl std::error::Error for MoveRejected {}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Tally {
    pub player: u32,
    pub computer: u32,
    pub draws: u32,
}

impl Tally {
    fn record(&mut self, outcome: Outcome) {
        match outcome {
            Outcome::Won(Mark::Human) => self.player += 1,
            Outcome::Won(Mark::Machine) => self.computer += 1,
            Outcome::Draw => self.draws += 1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridMatch {
    pub board: Board,
    pub difficulty: Difficulty,
    pub to_move: Mark,
    pub outcome: Option<Outcome>,
    pub tally: Tally,
}

impl Default for GridMatch {
    fn default() -> Self {
        Self::new(Difficulty::default())
    }
}

impl GridMatch {
    pub fn new(difficulty: Difficulty) -> Self {
        Self {
            board: Board::new(),
            difficulty,
            to_move: Mark::Human,
            outcome: None,
            tally: Tally::default(),
        }
    }

    pub fn is_over(&self) -> bool {
        self.outcome.is_some()
    }

    /// Place the human mark. Returns the outcome if this move ended the round.
    pub fn play(&mut self, index: usize) -> Result<Option<Outcome>, MoveRejected> {
        if self.is_over() {
            return Err(MoveRejected::RoundOver);
        }
        if self.to_move != Mark::Human {
            return Err(MoveRejected::NotYourTurn);
        }
        if index >= CELLS {
            return Err(MoveRejected::OutOfRange(index));
        }
        if !self.board.is_empty_cell(index) {
            return Err(MoveRejected::Occupied(index));
        }
        Ok(self.place(index, Mark::Human))
    }

    /// Machine reply. Returns the chosen cell, or `None` when it is not the
    /// machine's turn or the round is over.
    pub fn machine_turn(&mut self) -> Option<usize> {
        if self.is_over() || self.to_move != Mark::Machine {
            return None;
        }
        let cell = best_move(&self.board, self.difficulty)?;
        self.place(cell, Mark::Machine);
        Some(cell)
    }

    /// Clear the board for a new round; the tally is kept
    pub fn reset(&mut self) {
        self.board = Board::new();
        self.to_move = Mark::Human;
        self.outcome = None;
    }

    /// Clear both the board and the tally
    pub fn reset_tally(&mut self) {
        self.reset();
        self.tally = Tally::default();
    }

    fn place(&mut self, index: usize, mark: Mark) -> Option<Outcome> {
        self.board.set(index, Some(mark));
        self.to_move = mark.opponent();
        self.outcome = winner(&self.board);
        if let Some(outcome) = self.outcome {
            self.tally.record(outcome);
            log::info!("Grid round over: {outcome:?}");
        }
        self.outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_human_moves_first() {
        let mut game = GridMatch::new(Difficulty::Easy);
        assert_eq!(game.machine_turn(), None);
        assert_eq!(game.play(12), Ok(None));
        assert_eq!(game.play(13), Err(MoveRejected::NotYourTurn));
    }

    #[test]
    fn test_rejects_bad_cells() {
        let mut game = GridMatch::new(Difficulty::Easy);
        assert_eq!(game.play(25), Err(MoveRejected::OutOfRange(25)));
        game.board.set(3, Some(Mark::Machine));
        assert_eq!(game.play(3), Err(MoveRejected::Occupied(3)));
    }

    #[test]
    fn test_machine_blocks_then_human_win_is_tallied() {
        let mut game = GridMatch::new(Difficulty::Easy);
        for i in [0, 1, 2] {
            game.board.set(i, Some(Mark::Human));
        }
        game.board.set(20, Some(Mark::Machine));
        game.board.set(21, Some(Mark::Machine));
        assert_eq!(game.play(3), Ok(None));
        assert_eq!(game.machine_turn(), Some(4));

        // Column 0 for the human: 0 is taken, fill 5, 10, 15 around machine replies
        game.reset();
        for i in [5, 10, 15] {
            game.board.set(i, Some(Mark::Human));
        }
        for i in [6, 7, 8] {
            game.board.set(i, Some(Mark::Machine));
        }
        assert_eq!(game.play(0), Ok(None));
        // Machine must block 20
        assert_eq!(game.machine_turn(), Some(20));
    }

    #[test]
    fn test_win_updates_tally_and_locks_board() {
        let mut game = GridMatch::new(Difficulty::Easy);
        for i in [0, 1, 2, 3] {
            game.board.set(i, Some(Mark::Human));
        }
        assert_eq!(game.play(4), Ok(Some(Outcome::Won(Mark::Human))));
        assert_eq!(game.tally.player, 1);
        assert_eq!(game.play(10), Err(MoveRejected::RoundOver));
        assert_eq!(game.machine_turn(), None);

        game.reset();
        assert!(!game.is_over());
        assert_eq!(game.tally.player, 1);
        game.reset_tally();
        assert_eq!(game.tally, Tally::default());
    }
}
