//! Fixed-rate simulation tick
//!
//! Core runner loop: one call advances the world by one animation frame.

use serde::{Deserialize, Serialize};

use super::collision::Bounded;
use super::spawn::EntitySource;
use super::state::{Character, CollectibleKind, ObstacleKind, RunnerPhase, RunnerState};

/// Input commands for a single tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickInput {
    /// Jump (key press, tap or tilt)
    pub jump: bool,
}

/// What changed during a tick, for HUDs, sound and the reward layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RunnerEvent {
    Jumped,
    ObstacleSpawned { id: u32, kind: ObstacleKind },
    CollectibleSpawned { id: u32, kind: CollectibleKind },
    Collected { id: u32, kind: CollectibleKind, score: u32 },
    SpeedUp { speed: f32 },
    GameOver { score: u32, frames: u64 },
}

/// Integrate one tick of character motion
pub fn update_character(character: &mut Character, gravity: f32) {
    character.update(gravity);
}

/// Enter `Running` from any phase with a clean slate
pub fn start(state: &mut RunnerState) {
    state.reset();
    state.phase = RunnerPhase::Running;
    log::info!("Runner started");
}

/// Return to the initial `NotStarted` snapshot
pub fn restart(state: &mut RunnerState) {
    state.reset();
    log::info!("Runner reset");
}

/// Advance the runner by one frame.
///
/// Does nothing unless the run is active. Collisions are resolved against the
/// positions produced by this same tick, so a hit is reported in the snapshot
/// that contains it.
pub fn tick<S: EntitySource + ?Sized>(
    state: &mut RunnerState,
    input: &TickInput,
    source: &mut S,
) -> Vec<RunnerEvent> {
    let mut events = Vec::new();
    if state.phase != RunnerPhase::Running {
        return events;
    }

    // 1. Character physics
    if input.jump && state.character.jump(state.tuning.jump_velocity) {
        events.push(RunnerEvent::Jumped);
    }
    update_character(&mut state.character, state.tuning.gravity);

    // 2. Scroll the world, dropping anything fully off-screen or already picked up
    let speed = state.speed;
    state.obstacles = std::mem::take(&mut state.obstacles)
        .into_iter()
        .map(|mut o| {
            o.pos.x -= speed;
            o
        })
        .filter(|o| o.pos.x + o.size.x > 0.0)
        .collect();
    state.collectibles = std::mem::take(&mut state.collectibles)
        .into_iter()
        .filter(|c| !c.collected)
        .map(|mut c| {
            c.pos.x -= speed;
            c
        })
        .filter(|c| c.pos.x + c.size.x > 0.0)
        .collect();

    // 3. Spawning, on the 1-based index of this tick
    let tick_index = state.frame_count + 1;
    if is_due(tick_index, state.tuning.obstacle_interval) {
        let mut obstacle = source.obstacle(state.score, &state.tuning);
        obstacle.id = state.next_entity_id();
        log::debug!("Spawned {:?} obstacle {} at tick {}", obstacle.kind, obstacle.id, tick_index);
        events.push(RunnerEvent::ObstacleSpawned {
            id: obstacle.id,
            kind: obstacle.kind,
        });
        state.obstacles.push(obstacle);
    }
    if is_due(tick_index, state.tuning.collectible_interval) {
        let mut collectible = source.collectible(&state.tuning);
        collectible.id = state.next_entity_id();
        collectible.collected = false;
        log::debug!(
            "Spawned {:?} collectible {} at tick {}",
            collectible.kind,
            collectible.id,
            tick_index
        );
        events.push(RunnerEvent::CollectibleSpawned {
            id: collectible.id,
            kind: collectible.kind,
        });
        state.collectibles.push(collectible);
    }

    // 4. Obstacle hits end the run
    let hit = state
        .obstacles
        .iter()
        .any(|o| state.character.collides_with(o));

    // 5. Pickups apply exactly once
    for collectible in &mut state.collectibles {
        if collectible.collected || !state.character.collides_with(&*collectible) {
            continue;
        }
        collectible.collected = true;
        state.score = match collectible.kind {
            CollectibleKind::Beneficial => state.score.saturating_add(state.tuning.beneficial_value),
            CollectibleKind::Penalizing => state.score.saturating_sub(state.tuning.penalty_value),
        };
        events.push(RunnerEvent::Collected {
            id: collectible.id,
            kind: collectible.kind,
            score: state.score,
        });
    }

    // 6. Difficulty ramp
    if is_due(tick_index, state.tuning.speed_interval) {
        let next = (state.speed + state.tuning.speed_increment).min(state.tuning.max_speed);
        if next > state.speed {
            state.speed = next;
            log::debug!("Speed increased to {}", state.speed);
            events.push(RunnerEvent::SpeedUp { speed: state.speed });
        }
    }

    // 7. Frame bookkeeping
    state.frame_count = tick_index;

    if hit {
        state.phase = RunnerPhase::GameOver;
        log::info!(
            "Game over: score {} after {} frames",
            state.score,
            state.frame_count
        );
        events.push(RunnerEvent::GameOver {
            score: state.score,
            frames: state.frame_count,
        });
    }

    events
}

#[inline]
fn is_due(tick_index: u64, interval: u64) -> bool {
    interval > 0 && tick_index % interval == 0
}
