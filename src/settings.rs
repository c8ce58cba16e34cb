//! Player settings and preferences
//!
//! Persisted under a single store key, independent of identity.

use serde::{Deserialize, Serialize};

use crate::grid::Difficulty;
use crate::persistence::{self, KeyValueStore};

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Audio ===
    /// Sound effects on/off
    pub sound_enabled: bool,
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,

    // === Input ===
    /// Forward tilt jumps (mobile)
    pub tilt_controls: bool,

    // === Games ===
    /// Machine opponent strength in the grid game
    pub grid_difficulty: Difficulty,
    /// Quiz language pack id
    pub quiz_language: String,

    // === HUD ===
    /// Show FPS counter
    pub show_fps: bool,

    // === Accessibility ===
    /// Reduced motion (no hover bobbing, no flashes)
    pub reduced_motion: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            sound_enabled: true,
            master_volume: 0.8,

            tilt_controls: false,

            grid_difficulty: Difficulty::Hard,
            quiz_language: "spanish".to_string(),

            show_fps: false,

            reduced_motion: false,
        }
    }
}

impl Settings {
    /// Store key
    pub const STORAGE_KEY: &'static str = "settings";

    /// Volume to hand to an audio backend (0 when muted)
    pub fn effective_volume(&self) -> f32 {
        if self.sound_enabled {
            self.master_volume.clamp(0.0, 1.0)
        } else {
            0.0
        }
    }

    pub fn load<S: KeyValueStore + ?Sized>(store: &S) -> Self {
        let settings: Self = persistence::load_or_default(store, Self::STORAGE_KEY);
        log::info!("Settings loaded");
        settings
    }

    pub fn save<S: KeyValueStore + ?Sized>(&self, store: &mut S) {
        persistence::save(store, Self::STORAGE_KEY, self);
        log::info!("Settings saved");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MemoryStore;

    #[test]
    fn test_defaults_when_missing() {
        let store = MemoryStore::new();
        assert_eq!(Settings::load(&store), Settings::default());
    }

    #[test]
    fn test_save_and_reload() {
        let mut store = MemoryStore::new();
        let mut settings = Settings::default();
        settings.tilt_controls = true;
        settings.grid_difficulty = Difficulty::Easy;
        settings.save(&mut store);
        let loaded = Settings::load(&store);
        assert!(loaded.tilt_controls);
        assert_eq!(loaded.grid_difficulty, Difficulty::Easy);
    }

    #[test]
    fn test_partial_settings_fill_defaults() {
        let mut store = MemoryStore::new();
        store.set(Settings::STORAGE_KEY, r#"{"version":1,"data":{"show_fps":true}}"#);
        let loaded = Settings::load(&store);
        assert!(loaded.show_fps);
        assert_eq!(loaded.master_volume, 0.8);
    }

    #[test]
    fn test_effective_volume() {
        let mut settings = Settings::default();
        settings.master_volume = 3.0;
        assert_eq!(settings.effective_volume(), 1.0);
        settings.sound_enabled = false;
        assert_eq!(settings.effective_volume(), 0.0);
    }
}
