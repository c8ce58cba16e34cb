//! Arcade Hub - mini-game simulations and a local reward layer
//!
//! Core modules:
//! - `sim`: Deterministic endless-runner simulation (physics, spawning, collisions, scoring)
//! - `flappy`: Flap-and-avoid side-scroller simulation
//! - `grid`: 5x5 line game with an alpha-beta machine opponent
//! - `blocks`: Falling-block line-clearing puzzle
//! - `quiz`: Timed multiple-choice quiz sessions
//! - `economy`: Tokens, streaks, quests and daily challenges
//! - `persistence`: Key-value storage backends with versioned envelopes
//! - `platform`: Identity, play days and device input helpers
//! - `tuning`: Data-driven game balance

pub mod blocks;
pub mod economy;
pub mod flappy;
pub mod grid;
pub mod highscores;
pub mod persistence;
pub mod platform;
pub mod quiz;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use economy::{Economy, EconomyEvent, GameKind, SessionReport};
pub use highscores::HighScores;
pub use platform::Identity;
pub use settings::Settings;
pub use tuning::{BlocksTuning, FlappyTuning, RunnerTuning};

/// Shared configuration constants
pub mod consts {
    /// Frames per second the hosts schedule ticks at
    pub const FRAMES_PER_SECOND: u32 = 60;
    /// Fixed simulation timestep (seconds)
    pub const SIM_DT: f32 = 1.0 / FRAMES_PER_SECOND as f32;
    /// Maximum ticks per rendered frame before the host drops time
    pub const MAX_SUBSTEPS: u32 = 5;

    /// Horizontal extent of the play field
    pub const CANVAS_WIDTH: f32 = 800.0;
    /// Vertical extent of the runner play field
    pub const CANVAS_HEIGHT: f32 = 400.0;
    /// Painted ground line (presentation only)
    pub const GROUND_LINE_Y: f32 = 360.0;

    /// Leaderboard identity used when no wallet is connected
    pub const GUEST_KEY: &str = "guest";
}

/// Derive a run seed from a wall-clock reading in milliseconds.
///
/// Hosts pass `Date.now()` (wasm) or the system clock; tests pass constants.
#[inline]
pub fn seed_from_millis(millis: f64) -> u64 {
    (millis as u64).wrapping_mul(2654435761) ^ 0x5eed_cafe
}
