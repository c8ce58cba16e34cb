//! Flap-and-avoid simulation tick

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::state::{Bird, FlappyPhase, FlappyState, Pickup, Pipe};
use crate::sim::collision::{Bounded, overlaps};
use crate::sim::state::CollectibleKind;
use crate::tuning::FlappyTuning;
use glam::Vec2;

/// Produces pipes and pickups for the flap game
pub trait PipeSource {
    fn pipe(&mut self, tuning: &FlappyTuning) -> Pipe;
    fn pickup(&mut self, tuning: &FlappyTuning) -> Pickup;
}

/// Seeded PCG pipe/pickup generator
#[derive(Debug, Clone)]
pub struct SeededPipes {
    rng: Pcg32,
}

impl SeededPipes {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Pcg32::seed_from_u64(seed),
        }
    }
}

impl PipeSource for SeededPipes {
    fn pipe(&mut self, tuning: &FlappyTuning) -> Pipe {
        generate_pipe(&mut self.rng, tuning)
    }

    fn pickup(&mut self, tuning: &FlappyTuning) -> Pickup {
        generate_pickup(&mut self.rng, tuning)
    }
}

/// Random pipe at the right edge; the gap sits anywhere that leaves both segments
/// at least `pipe_min_height` tall
pub fn generate_pipe<R: Rng + ?Sized>(rng: &mut R, tuning: &FlappyTuning) -> Pipe {
    let min = tuning.pipe_min_height as i32;
    let max = (tuning.pipe_max_height() as i32).max(min);
    let top_height = rng.random_range(min..=max) as f32;
    Pipe {
        id: 0,
        x: tuning.field_width,
        width: tuning.pipe_width,
        top_height,
        bottom_height: tuning.field_height - top_height - tuning.pipe_gap,
        passed: false,
    }
}

/// Random pickup at the right edge
pub fn generate_pickup<R: Rng + ?Sized>(rng: &mut R, tuning: &FlappyTuning) -> Pickup {
    let kind = if rng.random_bool(tuning.beneficial_chance.clamp(0.0, 1.0)) {
        CollectibleKind::Beneficial
    } else {
        CollectibleKind::Penalizing
    };
    let low = tuning.collectible_margin as i32;
    let high = ((tuning.field_height - tuning.collectible_margin) as i32).max(low + 1);
    Pickup {
        id: 0,
        kind,
        pos: Vec2::new(tuning.field_width, rng.random_range(low..high) as f32),
        size: Vec2::splat(tuning.collectible_size),
        collected: false,
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FlappyEvent {
    Started,
    Flapped,
    PipeSpawned { id: u32 },
    PipePassed { id: u32, score: u32 },
    Collected { id: u32, kind: CollectibleKind, score: u32 },
    GameOver { score: u32, frames: u64 },
}

/// Flap. The first flap starts the run.
pub fn flap(state: &mut FlappyState) -> Vec<FlappyEvent> {
    let mut events = Vec::new();
    match state.phase {
        FlappyPhase::GameOver => return events,
        FlappyPhase::NotStarted => {
            state.reset();
            state.phase = FlappyPhase::Running;
            log::info!("Flap run started");
            events.push(FlappyEvent::Started);
        }
        FlappyPhase::Running => {}
    }
    state.bird.velocity = state.tuning.flap_velocity;
    events.push(FlappyEvent::Flapped);
    events
}

/// Back to the hovering start screen
pub fn restart(state: &mut FlappyState) {
    state.reset();
}

/// Advance the flap game by one frame
pub fn tick<S: PipeSource + ?Sized>(state: &mut FlappyState, source: &mut S) -> Vec<FlappyEvent> {
    let mut events = Vec::new();
    match state.phase {
        FlappyPhase::GameOver => return events,
        FlappyPhase::NotStarted => {
            hover(&mut state.bird, &state.tuning, state.frame_count);
            state.frame_count += 1;
            return events;
        }
        FlappyPhase::Running => {}
    }

    // Bird physics
    state.bird.velocity += state.tuning.gravity;
    state.bird.pos.y += state.bird.velocity;

    let tick_index = state.frame_count + 1;
    let speed = state.tuning.scroll_speed;

    // Pipes: spawn, scroll, drop off-screen
    if tick_index % state.tuning.pipe_interval.max(1) == 0 {
        let mut pipe = source.pipe(&state.tuning);
        pipe.id = state.next_entity_id();
        log::debug!("Spawned pipe {} (top {})", pipe.id, pipe.top_height);
        events.push(FlappyEvent::PipeSpawned { id: pipe.id });
        state.pipes.push(pipe);
    }
    state.pipes = std::mem::take(&mut state.pipes)
        .into_iter()
        .map(|mut p| {
            p.x -= speed;
            p
        })
        .filter(|p| p.right() > 0.0)
        .collect();

    if tick_index % state.tuning.collectible_interval.max(1) == 0 {
        let mut pickup = source.pickup(&state.tuning);
        pickup.id = state.next_entity_id();
        state.pickups.push(pickup);
    }
    state.pickups = std::mem::take(&mut state.pickups)
        .into_iter()
        .filter(|p| !p.collected)
        .map(|mut p| {
            p.pos.x -= speed;
            p
        })
        .filter(|p| p.pos.x + p.size.x > 0.0)
        .collect();

    // Passing a pipe scores once
    let bird_x = state.bird.pos.x;
    for pipe in &mut state.pipes {
        if !pipe.passed && pipe.right() < bird_x {
            pipe.passed = true;
            state.score = state.score.saturating_add(state.tuning.pass_value);
            events.push(FlappyEvent::PipePassed {
                id: pipe.id,
                score: state.score,
            });
        }
    }

    for pickup in &mut state.pickups {
        if pickup.collected || !state.bird.collides_with(&*pickup) {
            continue;
        }
        pickup.collected = true;
        state.score = match pickup.kind {
            CollectibleKind::Beneficial => state.score.saturating_add(state.tuning.beneficial_value),
            CollectibleKind::Penalizing => state.score.saturating_sub(state.tuning.penalty_value),
        };
        events.push(FlappyEvent::Collected {
            id: pickup.id,
            kind: pickup.kind,
            score: state.score,
        });
    }

    state.frame_count = tick_index;

    if crashed(state) {
        state.phase = FlappyPhase::GameOver;
        log::info!("Flap run over: score {}", state.score);
        events.push(FlappyEvent::GameOver {
            score: state.score,
            frames: state.frame_count,
        });
    }

    events
}

fn hover(bird: &mut Bird, tuning: &FlappyTuning, frame: u64) {
    let offset = (frame as f32 * 0.1).sin() * 2.0;
    bird.pos.y = tuning.field_height / 2.0 + offset;
    bird.velocity = 0.0;
}

fn crashed(state: &FlappyState) -> bool {
    let bird = state.bird.bounds();
    if bird.top() < 0.0 || bird.bottom() > state.tuning.field_height {
        return true;
    }
    state.pipes.iter().any(|pipe| {
        overlaps(&bird, &pipe.top_rect())
            || overlaps(&bird, &pipe.bottom_rect(state.tuning.field_height))
    })
}
