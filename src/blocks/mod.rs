//! Falling-block puzzle
//!
//! A 10x20 well, seven tetromino kinds and line clears scored by level.
//! Randomness only comes through a `PieceSource`.

pub mod state;
pub mod tick;

pub use state::{BlocksPhase, BlocksState, Cells, Piece, PieceKind, Well};
pub use tick::{
    BlockMove, BlocksEvent, PieceSource, SeededPieces, apply_move, generate_piece, restart, start,
    tick, toggle_pause,
};

use crate::tuning::BlocksTuning;

/// Blocks game driver holding state and piece source
pub struct BlocksGame<S: PieceSource = SeededPieces> {
    state: BlocksState,
    source: S,
}

impl BlocksGame<SeededPieces> {
    pub fn new(tuning: BlocksTuning, seed: u64) -> Self {
        Self::with_source(tuning, SeededPieces::new(seed))
    }
}

impl<S: PieceSource> BlocksGame<S> {
    pub fn with_source(tuning: BlocksTuning, source: S) -> Self {
        Self {
            state: BlocksState::new(tuning),
            source,
        }
    }

    pub fn state(&self) -> &BlocksState {
        &self.state
    }

    pub fn phase(&self) -> BlocksPhase {
        self.state.phase
    }

    pub fn start(&mut self) -> Vec<BlocksEvent> {
        start(&mut self.state, &mut self.source)
    }

    pub fn restart(&mut self) {
        restart(&mut self.state);
    }

    pub fn toggle_pause(&mut self) -> bool {
        toggle_pause(&mut self.state)
    }

    /// Player input applies immediately
    pub fn input(&mut self, mv: BlockMove) -> Vec<BlocksEvent> {
        apply_move(&mut self.state, mv, &mut self.source)
    }

    pub fn step(&mut self) -> Vec<BlocksEvent> {
        tick(&mut self.state, &mut self.source)
    }
}
