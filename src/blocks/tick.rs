//! Falling-block simulation: input moves, gravity and locking

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::state::{BlocksPhase, BlocksState, Piece, PieceKind};

/// Chooses the kind of every new piece
pub trait PieceSource {
    fn next_kind(&mut self) -> PieceKind;
}

/// Seeded PCG piece generator, uniform over the seven kinds
#[derive(Debug, Clone)]
pub struct SeededPieces {
    rng: Pcg32,
}

impl SeededPieces {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Pcg32::seed_from_u64(seed),
        }
    }
}

impl PieceSource for SeededPieces {
    fn next_kind(&mut self) -> PieceKind {
        generate_piece(&mut self.rng)
    }
}

pub fn generate_piece<R: Rng + ?Sized>(rng: &mut R) -> PieceKind {
    PieceKind::ALL[rng.random_range(0..PieceKind::ALL.len())]
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BlockMove {
    Left,
    Right,
    /// Soft drop; locks the piece when it cannot fall
    Down,
    Rotate,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum BlocksEvent {
    Started,
    Locked {
        kind: PieceKind,
        lines_cleared: u32,
        points: u32,
        score: u32,
    },
    LevelUp {
        level: u32,
    },
    GameOver {
        score: u32,
        lines: u32,
    },
}

/// Fresh well with the first two pieces drawn
pub fn start<S: PieceSource + ?Sized>(state: &mut BlocksState, source: &mut S) -> Vec<BlocksEvent> {
    state.reset();
    let width = state.tuning.well_width;
    state.current = Some(Piece::spawn(source.next_kind(), width));
    state.next = Some(Piece::spawn(source.next_kind(), width));
    state.phase = BlocksPhase::Running;
    log::info!("Blocks run started");
    vec![BlocksEvent::Started]
}

/// Back to the empty start screen
pub fn restart(state: &mut BlocksState) {
    state.reset();
}

/// Toggle between running and paused. Returns whether the game is now paused.
pub fn toggle_pause(state: &mut BlocksState) -> bool {
    state.phase = match state.phase {
        BlocksPhase::Running => BlocksPhase::Paused,
        BlocksPhase::Paused => BlocksPhase::Running,
        other => other,
    };
    state.phase == BlocksPhase::Paused
}

/// Apply one player move. Blocked moves are ignored, except a blocked
/// `Down`, which locks the piece.
pub fn apply_move<S: PieceSource + ?Sized>(
    state: &mut BlocksState,
    mv: BlockMove,
    source: &mut S,
) -> Vec<BlocksEvent> {
    if state.phase != BlocksPhase::Running {
        return Vec::new();
    }
    let Some(current) = state.current else {
        return Vec::new();
    };

    let candidate = match mv {
        BlockMove::Left => current.shifted(-1, 0),
        BlockMove::Right => current.shifted(1, 0),
        BlockMove::Down => current.shifted(0, 1),
        BlockMove::Rotate => current.rotated(),
    };
    if state.well.fits(&candidate) {
        state.current = Some(candidate);
        return Vec::new();
    }
    if mv == BlockMove::Down {
        return lock(state, current, source);
    }
    Vec::new()
}

/// Advance one frame; gravity drops the piece every `drop_interval(level)` frames
pub fn tick<S: PieceSource + ?Sized>(state: &mut BlocksState, source: &mut S) -> Vec<BlocksEvent> {
    if state.phase != BlocksPhase::Running {
        return Vec::new();
    }
    state.frame_count += 1;
    if state.frame_count - state.last_drop < state.tuning.drop_interval(state.level) {
        return Vec::new();
    }
    state.last_drop = state.frame_count;
    apply_move(state, BlockMove::Down, source)
}

fn lock<S: PieceSource + ?Sized>(state: &mut BlocksState, piece: Piece, source: &mut S) -> Vec<BlocksEvent> {
    let mut events = Vec::new();

    state.well.place(&piece);
    let cleared = state.well.clear_lines();
    // Scored at the level the piece fell in
    let points = cleared * state.tuning.line_value * state.level + state.tuning.lock_value;
    state.score = state.score.saturating_add(points);
    state.lines += cleared;
    if cleared > 0 {
        log::debug!("Cleared {cleared} lines for {points}");
    }
    events.push(BlocksEvent::Locked {
        kind: piece.kind,
        lines_cleared: cleared,
        points,
        score: state.score,
    });

    let level = state.tuning.level_for(state.lines);
    if level != state.level {
        state.level = level;
        log::debug!("Blocks level {level}");
        events.push(BlocksEvent::LevelUp { level });
    }

    let width = state.tuning.well_width;
    let next = state
        .next
        .take()
        .unwrap_or_else(|| Piece::spawn(source.next_kind(), width));
    if !state.well.fits(&next) {
        state.current = None;
        state.next = Some(next);
        state.phase = BlocksPhase::GameOver;
        log::info!("Blocks run over: score {}, {} lines", state.score, state.lines);
        events.push(BlocksEvent::GameOver {
            score: state.score,
            lines: state.lines,
        });
        return events;
    }
    state.current = Some(next);
    state.next = Some(Piece::spawn(source.next_kind(), width));
    events
}
