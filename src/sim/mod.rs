//! Deterministic endless-runner simulation
//!
//! All runner gameplay lives here. This module must stay pure and deterministic:
//! - One tick per frame, no wall-clock reads
//! - Entity generation only through an `EntitySource`
//! - Stable entity order (spawn order, sequential IDs)
//! - No rendering or platform dependencies

pub mod collision;
pub mod runner;
pub mod spawn;
pub mod state;
pub mod tick;

pub use collision::{Bounded, Rect, overlaps};
pub use runner::Runner;
pub use spawn::{EntitySource, SeededSpawner, generate_collectible, generate_obstacle};
pub use state::{
    Character, Collectible, CollectibleKind, Obstacle, ObstacleKind, RunnerPhase, RunnerState,
};
pub use tick::{RunnerEvent, TickInput, restart, start, tick, update_character};
