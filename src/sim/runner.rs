//! Runner driver
//!
//! Owns the simulation state, its entity source and the one-shot input flags
//! that input handlers set between frames. Hosts call `step` once per frame
//! and hand `state()` to the renderer.

use super::spawn::{EntitySource, SeededSpawner};
use super::state::{RunnerPhase, RunnerState};
use super::tick::{RunnerEvent, TickInput, restart, start, tick};
use crate::tuning::RunnerTuning;

pub struct Runner<S: EntitySource = SeededSpawner> {
    state: RunnerState,
    source: S,
    pending: TickInput,
}

impl Runner<SeededSpawner> {
    /// Runner with the default seeded spawner
    pub fn new(tuning: RunnerTuning, seed: u64) -> Self {
        Self::with_source(tuning, SeededSpawner::new(seed))
    }

    /// Start a run on a fresh spawn stream
    pub fn start_seeded(&mut self, seed: u64) {
        self.source.reseed(seed);
        self.start();
    }
}

impl<S: EntitySource> Runner<S> {
    pub fn with_source(tuning: RunnerTuning, source: S) -> Self {
        Self {
            state: RunnerState::new(tuning),
            source,
            pending: TickInput::default(),
        }
    }

    /// Read-only snapshot for rendering
    pub fn state(&self) -> &RunnerState {
        &self.state
    }

    pub fn phase(&self) -> RunnerPhase {
        self.state.phase
    }

    pub fn source_mut(&mut self) -> &mut S {
        &mut self.source
    }

    /// NotStarted -> Running. Ignored mid-run.
    pub fn start(&mut self) {
        if self.state.phase == RunnerPhase::Running {
            return;
        }
        self.pending = TickInput::default();
        start(&mut self.state);
    }

    /// Any phase -> NotStarted with the initial snapshot
    pub fn restart(&mut self) {
        self.pending = TickInput::default();
        restart(&mut self.state);
    }

    /// Queue a jump for the next tick
    pub fn request_jump(&mut self) {
        if self.state.phase == RunnerPhase::Running {
            self.pending.jump = true;
        }
    }

    /// Advance one frame, consuming queued input
    pub fn step(&mut self) -> Vec<RunnerEvent> {
        let input = std::mem::take(&mut self.pending);
        tick(&mut self.state, &input, &mut self.source)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_jump_request_ignored_until_started() {
        let mut runner = Runner::new(RunnerTuning::default(), 1);
        runner.request_jump();
        runner.start();
        runner.step();
        assert!(!runner.state().character.airborne);
    }

    #[test]
    fn test_jump_request_consumed_once() {
        let mut runner = Runner::new(RunnerTuning::default(), 1);
        runner.start();
        runner.request_jump();
        let events = runner.step();
        assert!(events.contains(&RunnerEvent::Jumped));
        assert!(runner.state().character.airborne);
        let events = runner.step();
        assert!(!events.contains(&RunnerEvent::Jumped));
    }

    #[test]
    fn test_start_is_ignored_mid_run() {
        let mut runner = Runner::new(RunnerTuning::default(), 1);
        runner.start();
        for _ in 0..10 {
            runner.step();
        }
        runner.start();
        assert_eq!(runner.state().frame_count, 10);
    }

    #[test]
    fn test_restart_then_start() {
        let mut runner = Runner::new(RunnerTuning::default(), 1);
        runner.start();
        for _ in 0..5000 {
            runner.step();
            if runner.phase() == RunnerPhase::GameOver {
                break;
            }
        }
        runner.restart();
        assert_eq!(runner.phase(), RunnerPhase::NotStarted);
        runner.start_seeded(2);
        assert_eq!(runner.phase(), RunnerPhase::Running);
        assert_eq!(runner.state().frame_count, 0);
    }
}
