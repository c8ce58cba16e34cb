//! Runner state and core simulation types
//!
//! Everything the renderer needs to draw a frame lives here. The renderer
//! only ever reads a `RunnerState`; only `tick` and the phase commands write it.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::{Bounded, Rect};
use crate::tuning::RunnerTuning;

/// Current phase of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RunnerPhase {
    /// Waiting for the start command
    #[default]
    NotStarted,
    /// Active gameplay
    Running,
    /// Run ended on an obstacle hit
    GameOver,
}

/// The player-controlled character
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Character {
    /// Top-left corner
    pub pos: Vec2,
    pub size: Vec2,
    pub velocity_y: f32,
    pub airborne: bool,
    /// Resting y of the top edge
    pub ground_y: f32,
}

impl Character {
    pub fn new(tuning: &RunnerTuning) -> Self {
        Self {
            pos: Vec2::new(tuning.character_start_x, tuning.ground_y),
            size: Vec2::new(tuning.character_width, tuning.character_height),
            velocity_y: 0.0,
            airborne: false,
            ground_y: tuning.ground_y,
        }
    }

    /// Start a jump. Ignored while already airborne.
    pub fn jump(&mut self, jump_velocity: f32) -> bool {
        if self.airborne {
            return false;
        }
        self.airborne = true;
        self.velocity_y = jump_velocity;
        true
    }

    /// Integrate one tick of vertical motion and land on the ground
    pub fn update(&mut self, gravity: f32) {
        if !self.airborne {
            return;
        }
        self.velocity_y += gravity;
        self.pos.y += self.velocity_y;

        if self.pos.y >= self.ground_y {
            self.pos.y = self.ground_y;
            self.airborne = false;
            self.velocity_y = 0.0;
        }
    }
}

impl Bounded for Character {
    fn bounds(&self) -> Rect {
        Rect {
            pos: self.pos,
            size: self.size,
        }
    }
}

/// Obstacle variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ObstacleKind {
    /// Low hazard sitting on the ground
    Ground,
    /// Elevated hazard that grows with the score
    Flying,
}

/// A passive hazard
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Obstacle {
    pub id: u32,
    pub kind: ObstacleKind,
    pub pos: Vec2,
    pub size: Vec2,
}

impl Bounded for Obstacle {
    fn bounds(&self) -> Rect {
        Rect {
            pos: self.pos,
            size: self.size,
        }
    }
}

/// Collectible variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CollectibleKind {
    /// Adds to the score
    Beneficial,
    /// Takes away from the score
    Penalizing,
}

/// A passive pickup
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Collectible {
    pub id: u32,
    pub kind: CollectibleKind,
    pub pos: Vec2,
    pub size: Vec2,
    pub collected: bool,
}

impl Bounded for Collectible {
    fn bounds(&self) -> Rect {
        Rect {
            pos: self.pos,
            size: self.size,
        }
    }
}

/// Complete runner state (deterministic, serializable)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunnerState {
    /// Balance in effect for this run
    pub tuning: RunnerTuning,
    pub character: Character,
    /// Active obstacles in spawn order
    pub obstacles: Vec<Obstacle>,
    /// Active collectibles in spawn order
    pub collectibles: Vec<Collectible>,
    pub score: u32,
    /// Leftward displacement applied to world entities each tick
    pub speed: f32,
    /// Ticks completed in the current run
    pub frame_count: u64,
    pub phase: RunnerPhase,
    /// Next entity ID
    next_id: u32,
}

impl RunnerState {
    /// Fresh, not-yet-started state
    pub fn new(tuning: RunnerTuning) -> Self {
        Self {
            character: Character::new(&tuning),
            obstacles: Vec::new(),
            collectibles: Vec::new(),
            score: 0,
            speed: tuning.initial_speed,
            frame_count: 0,
            phase: RunnerPhase::NotStarted,
            next_id: 1,
            tuning,
        }
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Put every counter and entity list back to the initial snapshot
    pub fn reset(&mut self) {
        self.character = Character::new(&self.tuning);
        self.obstacles.clear();
        self.collectibles.clear();
        self.score = 0;
        self.speed = self.tuning.initial_speed;
        self.frame_count = 0;
        self.phase = RunnerPhase::NotStarted;
        self.next_id = 1;
    }

    pub fn is_running(&self) -> bool {
        self.phase == RunnerPhase::Running
    }

    pub fn is_game_over(&self) -> bool {
        self.phase == RunnerPhase::GameOver
    }

    /// Seconds survived at the nominal frame rate
    pub fn seconds_survived(&self) -> u64 {
        self.frame_count / crate::consts::FRAMES_PER_SECOND as u64
    }
}

impl Default for RunnerState {
    fn default() -> Self {
        Self::new(RunnerTuning::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_character_starts_grounded() {
        let tuning = RunnerTuning::default();
        let character = Character::new(&tuning);
        assert_eq!(character.pos, Vec2::new(50.0, 300.0));
        assert!(!character.airborne);
        assert_eq!(character.velocity_y, 0.0);
    }

    #[test]
    fn test_jump_is_not_retriggered_midair() {
        let mut character = Character::new(&RunnerTuning::default());
        assert!(character.jump(-10.0));
        character.update(0.4);
        let velocity = character.velocity_y;
        assert!(!character.jump(-10.0));
        assert_eq!(character.velocity_y, velocity);
    }

    #[test]
    fn test_grounded_update_is_noop() {
        let mut character = Character::new(&RunnerTuning::default());
        let before = character.clone();
        character.update(0.4);
        assert_eq!(character, before);
    }

    #[test]
    fn test_full_jump_lands() {
        let mut character = Character::new(&RunnerTuning::default());
        character.jump(-10.0);
        let mut ticks = 0;
        while character.airborne {
            character.update(0.4);
            assert!(character.pos.y <= character.ground_y);
            ticks += 1;
            assert!(ticks < 200, "jump never landed");
        }
        assert_eq!(character.pos.y, character.ground_y);
        assert_eq!(character.velocity_y, 0.0);
    }

    #[test]
    fn test_entity_ids_are_sequential() {
        let mut state = RunnerState::default();
        assert_eq!(state.next_entity_id(), 1);
        assert_eq!(state.next_entity_id(), 2);
        state.reset();
        assert_eq!(state.next_entity_id(), 1);
    }

    proptest! {
        #[test]
        fn prop_jump_never_sinks_below_ground(jump in -20.0f32..-1.0, gravity in 0.1f32..2.0) {
            let mut character = Character::new(&RunnerTuning::default());
            character.jump(jump);
            let mut velocity = jump;
            let mut y = character.pos.y;
            for _ in 0..1000 {
                if !character.airborne {
                    break;
                }
                velocity += gravity;
                y += velocity;
                character.update(gravity);
                prop_assert!(character.pos.y <= character.ground_y);
                if character.airborne {
                    prop_assert_eq!(character.pos.y, y);
                    prop_assert_eq!(character.velocity_y, velocity);
                }
            }
            prop_assert!(!character.airborne);
            prop_assert_eq!(character.pos.y, character.ground_y);
        }
    }
}
