//! Data-driven game balance
//!
//! Every constant a simulation reads lives here so balance passes can ship as
//! JSON overrides. Missing fields fall back to the defaults.

use serde::{Deserialize, Serialize};

use crate::consts::CANVAS_WIDTH;

/// Endless-runner balance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunnerTuning {
    // === Character ===
    pub character_start_x: f32,
    /// Resting y of the character's top edge
    pub ground_y: f32,
    pub character_width: f32,
    pub character_height: f32,
    /// Added to vertical velocity every airborne tick
    pub gravity: f32,
    /// Velocity applied on jump (negative is up)
    pub jump_velocity: f32,

    // === Obstacles ===
    pub spawn_x: f32,
    pub obstacle_width: f32,
    pub ground_hazard_height: f32,
    pub flying_hazard_height: f32,
    /// Top edges a flying hazard may spawn at
    pub flight_altitudes: Vec<f32>,
    /// Flying hazards grow by `flying_growth` every `flying_growth_every` points
    pub flying_growth_every: u32,
    pub flying_growth: f32,

    // === Collectibles ===
    pub collectible_size: f32,
    pub collectible_altitudes: Vec<f32>,
    /// Probability a spawned collectible is beneficial
    pub beneficial_chance: f64,
    pub beneficial_value: u32,
    pub penalty_value: u32,

    // === Pacing (in ticks) ===
    pub obstacle_interval: u64,
    pub collectible_interval: u64,
    pub speed_interval: u64,

    // === Scroll speed ===
    pub initial_speed: f32,
    pub speed_increment: f32,
    pub max_speed: f32,
}

impl Default for RunnerTuning {
    fn default() -> Self {
        Self {
            character_start_x: 50.0,
            ground_y: 300.0,
            character_width: 40.0,
            character_height: 60.0,
            gravity: 0.4,
            jump_velocity: -10.0,

            spawn_x: CANVAS_WIDTH,
            obstacle_width: 20.0,
            ground_hazard_height: 40.0,
            flying_hazard_height: 20.0,
            flight_altitudes: vec![250.0, 200.0, 150.0],
            flying_growth_every: 3,
            flying_growth: 0.5,

            collectible_size: 15.0,
            collectible_altitudes: vec![250.0, 200.0, 150.0, 180.0, 220.0],
            beneficial_chance: 0.7,
            beneficial_value: 5,
            penalty_value: 2,

            obstacle_interval: 120,
            collectible_interval: 180,
            speed_interval: 600,

            initial_speed: 3.0,
            speed_increment: 0.3,
            max_speed: 8.0,
        }
    }
}

impl RunnerTuning {
    /// Parse a (possibly partial) JSON override, falling back to defaults on error
    pub fn from_json(json: &str) -> Self {
        match serde_json::from_str(json) {
            Ok(tuning) => tuning,
            Err(err) => {
                log::warn!("Ignoring malformed runner tuning: {}", err);
                Self::default()
            }
        }
    }

    /// Size multiplier for flying hazards at the given score
    pub fn flying_scale(&self, score: u32) -> f32 {
        let steps = score / self.flying_growth_every.max(1);
        1.0 + steps as f32 * self.flying_growth
    }
}

/// Flap-and-avoid balance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlappyTuning {
    pub gravity: f32,
    /// Velocity applied on flap (negative is up)
    pub flap_velocity: f32,
    pub field_width: f32,
    pub field_height: f32,
    /// Fixed horizontal position of the bird's left edge
    pub bird_x: f32,
    pub bird_size: f32,
    pub pipe_gap: f32,
    pub pipe_width: f32,
    /// Shortest pipe segment
    pub pipe_min_height: f32,
    pub pipe_interval: u64,
    pub collectible_size: f32,
    pub collectible_interval: u64,
    /// Collectibles spawn with their top edge in `[margin, field_height - margin)`
    pub collectible_margin: f32,
    pub scroll_speed: f32,
    pub beneficial_chance: f64,
    pub beneficial_value: u32,
    pub penalty_value: u32,
    /// Points for clearing a pipe
    pub pass_value: u32,
}

impl Default for FlappyTuning {
    fn default() -> Self {
        Self {
            gravity: 0.3,
            flap_velocity: -6.0,
            field_width: CANVAS_WIDTH,
            field_height: 500.0,
            bird_x: 100.0,
            bird_size: 30.0,
            pipe_gap: 180.0,
            pipe_width: 50.0,
            pipe_min_height: 50.0,
            pipe_interval: 120,
            collectible_size: 20.0,
            collectible_interval: 300,
            collectible_margin: 50.0,
            scroll_speed: 2.0,
            beneficial_chance: 0.7,
            beneficial_value: 2,
            penalty_value: 1,
            pass_value: 1,
        }
    }
}

impl FlappyTuning {
    /// Parse a (possibly partial) JSON override, falling back to defaults on error
    pub fn from_json(json: &str) -> Self {
        match serde_json::from_str(json) {
            Ok(tuning) => tuning,
            Err(err) => {
                log::warn!("Ignoring malformed flappy tuning: {}", err);
                Self::default()
            }
        }
    }

    /// Tallest top pipe that still leaves room for the gap and a bottom pipe
    pub fn pipe_max_height(&self) -> f32 {
        self.field_height - self.pipe_gap - self.pipe_min_height
    }
}

/// Falling-block puzzle balance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BlocksTuning {
    pub well_width: usize,
    pub well_height: usize,
    /// Frames between gravity drops on level 1
    pub base_drop_frames: u64,
    /// Frames shaved off the drop interval per level
    pub drop_step_frames: u64,
    pub min_drop_frames: u64,
    pub lines_per_level: u32,
    /// Points per cleared line, multiplied by the level
    pub line_value: u32,
    /// Points for every piece that locks
    pub lock_value: u32,
}

impl Default for BlocksTuning {
    fn default() -> Self {
        Self {
            well_width: 10,
            well_height: 20,
            base_drop_frames: 60,
            drop_step_frames: 3,
            min_drop_frames: 6,
            lines_per_level: 10,
            line_value: 100,
            lock_value: 10,
        }
    }
}

impl BlocksTuning {
    /// Parse a (possibly partial) JSON override, falling back to defaults on error
    pub fn from_json(json: &str) -> Self {
        match serde_json::from_str(json) {
            Ok(tuning) => tuning,
            Err(err) => {
                log::warn!("Ignoring malformed blocks tuning: {}", err);
                Self::default()
            }
        }
    }

    /// Frames between gravity drops at `level` (1-based)
    pub fn drop_interval(&self, level: u32) -> u64 {
        let faster = level.saturating_sub(1) as u64 * self.drop_step_frames;
        self.base_drop_frames
            .saturating_sub(faster)
            .max(self.min_drop_frames)
            .max(1)
    }

    pub fn level_for(&self, lines: u32) -> u32 {
        lines / self.lines_per_level.max(1) + 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_override_keeps_defaults() {
        let tuning = RunnerTuning::from_json(r#"{ "max_speed": 10.0 }"#);
        assert_eq!(tuning.max_speed, 10.0);
        assert_eq!(tuning.initial_speed, 3.0);
        assert_eq!(tuning.obstacle_interval, 120);
    }

    #[test]
    fn test_malformed_override_falls_back() {
        let tuning = FlappyTuning::from_json("{ not json");
        assert_eq!(tuning, FlappyTuning::default());
    }

    #[test]
    fn test_flying_scale_steps_every_three_points() {
        let tuning = RunnerTuning::default();
        assert_eq!(tuning.flying_scale(0), 1.0);
        assert_eq!(tuning.flying_scale(2), 1.0);
        assert_eq!(tuning.flying_scale(3), 1.5);
        assert_eq!(tuning.flying_scale(7), 2.0);
    }

    #[test]
    fn test_pipe_height_range() {
        let tuning = FlappyTuning::default();
        assert_eq!(tuning.pipe_max_height(), 270.0);
    }

    #[test]
    fn test_drop_interval_speeds_up_to_floor() {
        let tuning = BlocksTuning::default();
        assert_eq!(tuning.drop_interval(1), 60);
        assert_eq!(tuning.drop_interval(2), 57);
        assert_eq!(tuning.drop_interval(19), 6);
        assert_eq!(tuning.drop_interval(40), 6);
        assert_eq!(tuning.level_for(0), 1);
        assert_eq!(tuning.level_for(9), 1);
        assert_eq!(tuning.level_for(10), 2);
    }
}
