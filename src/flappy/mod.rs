//! Flap-and-avoid game
//!
//! Same rules as the runner simulation: one tick per frame, randomness only
//! through a `PipeSource`, no rendering or platform dependencies.

pub mod state;
pub mod tick;

pub use state::{Bird, FlappyPhase, FlappyState, Pickup, Pipe};
pub use tick::{FlappyEvent, PipeSource, SeededPipes, flap, generate_pickup, generate_pipe, restart, tick};

use crate::tuning::FlappyTuning;

/// Flap game driver holding state, pipe source and the queued flap
pub struct FlappyGame<S: PipeSource = SeededPipes> {
    state: FlappyState,
    source: S,
    pending_flap: bool,
}

impl FlappyGame<SeededPipes> {
    pub fn new(tuning: FlappyTuning, seed: u64) -> Self {
        Self::with_source(tuning, SeededPipes::new(seed))
    }
}

impl<S: PipeSource> FlappyGame<S> {
    pub fn with_source(tuning: FlappyTuning, source: S) -> Self {
        Self {
            state: FlappyState::new(tuning),
            source,
            pending_flap: false,
        }
    }

    pub fn state(&self) -> &FlappyState {
        &self.state
    }

    pub fn phase(&self) -> FlappyPhase {
        self.state.phase
    }

    /// Queue a flap for the next frame
    pub fn request_flap(&mut self) {
        if self.state.phase != FlappyPhase::GameOver {
            self.pending_flap = true;
        }
    }

    pub fn restart(&mut self) {
        self.pending_flap = false;
        restart(&mut self.state);
    }

    pub fn step(&mut self) -> Vec<FlappyEvent> {
        let mut events = Vec::new();
        if std::mem::take(&mut self.pending_flap) {
            events.extend(flap(&mut self.state));
        }
        events.extend(tick(&mut self.state, &mut self.source));
        events
    }
}
