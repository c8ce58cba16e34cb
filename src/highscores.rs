//! High score leaderboards
//!
//! One top-10 board per game and identity, persisted through a `KeyValueStore`.
//! Anonymous players share the guest board.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::economy::GameKind;
use crate::persistence::{self, KeyValueStore};
use crate::platform::Identity;

/// Rows kept per board
pub const MAX_HIGH_SCORES: usize = 10;

/// One leaderboard row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HighScoreEntry {
    pub score: u32,
    /// Seconds survived (0 for untimed games)
    pub seconds: u32,
    /// Play day when achieved
    pub day: NaiveDate,
}

/// High score leaderboard, sorted descending by score
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct HighScores {
    pub entries: Vec<HighScoreEntry>,
}

impl HighScores {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Storage key: `highscores_{game}_{address|guest}`
    pub fn storage_key(game: GameKind, identity: &Identity) -> String {
        format!("highscores_{}_{}", game.slug(), identity.leaderboard_key())
    }

    /// Whether `score` would make the board
    pub fn qualifies(&self, score: u32) -> bool {
        if score == 0 {
            return false;
        }
        if self.entries.len() < MAX_HIGH_SCORES {
            return true;
        }
        self.entries.last().map(|e| score > e.score).unwrap_or(true)
    }

    /// 1-based rank `score` would take, `None` if it misses the board
    pub fn potential_rank(&self, score: u32) -> Option<usize> {
        if !self.qualifies(score) {
            return None;
        }
        let rank = self.entries.iter().position(|e| score > e.score);
        Some(rank.unwrap_or(self.entries.len()) + 1)
    }

    /// Insert a finished run; returns its 1-based rank when it makes the board
    pub fn add_score(&mut self, score: u32, seconds: u32, day: NaiveDate) -> Option<usize> {
        if !self.qualifies(score) {
            return None;
        }

        let entry = HighScoreEntry {
            score,
            seconds,
            day,
        };

        // Equal scores keep the older entry ahead
        let pos = self.entries.iter().position(|e| score > e.score);
        let rank = match pos {
            Some(i) => {
                self.entries.insert(i, entry);
                i + 1
            }
            None => {
                self.entries.push(entry);
                self.entries.len()
            }
        };

        self.entries.truncate(MAX_HIGH_SCORES);

        Some(rank)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn top_score(&self) -> Option<u32> {
        self.entries.first().map(|e| e.score)
    }

    pub fn load<S: KeyValueStore + ?Sized>(store: &S, game: GameKind, identity: &Identity) -> Self {
        let scores: Self = persistence::load_or_default(store, &Self::storage_key(game, identity));
        log::info!("Loaded {} high scores for {}", scores.entries.len(), game.slug());
        scores
    }

    pub fn save<S: KeyValueStore + ?Sized>(&self, store: &mut S, game: GameKind, identity: &Identity) {
        persistence::save(store, &Self::storage_key(game, identity), self);
        log::info!("High scores saved ({} entries)", self.entries.len());
    }
}

/// Relative label for a play day as seen from `today`
pub fn format_day(day: NaiveDate, today: NaiveDate) -> String {
    let days = (today - day).num_days();
    match days {
        i64::MIN..=0 => "Today".to_string(),
        1 => "Yesterday".to_string(),
        2..=6 => format!("{days} days ago"),
        _ => day.format("%-m/%-d/%y").to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MemoryStore;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, d).unwrap()
    }

    #[test]
    fn test_zero_never_qualifies() {
        let mut scores = HighScores::new();
        assert!(!scores.qualifies(0));
        assert_eq!(scores.add_score(0, 0, day(1)), None);
    }

    #[test]
    fn test_insert_order_and_rank() {
        let mut scores = HighScores::new();
        assert_eq!(scores.add_score(50, 10, day(1)), Some(1));
        assert_eq!(scores.add_score(80, 16, day(1)), Some(1));
        assert_eq!(scores.add_score(50, 10, day(2)), Some(3));
        assert_eq!(scores.top_score(), Some(80));
        assert_eq!(scores.entries[1].day, day(1));
    }

    #[test]
    fn test_board_caps_at_ten() {
        let mut scores = HighScores::new();
        for s in 1..=10 {
            scores.add_score(s * 10, 0, day(1));
        }
        assert!(!scores.qualifies(10));
        assert_eq!(scores.potential_rank(15), Some(10));
        assert_eq!(scores.add_score(15, 0, day(1)), Some(10));
        assert_eq!(scores.entries.len(), MAX_HIGH_SCORES);
        assert_eq!(scores.entries.last().unwrap().score, 15);
    }

    #[test]
    fn test_boards_are_per_game_and_identity() {
        let mut store = MemoryStore::new();
        let alice = Identity::wallet("0xa11ce");
        let mut board = HighScores::new();
        board.add_score(42, 0, day(1));
        board.save(&mut store, GameKind::Runner, &alice);

        assert_eq!(HighScores::load(&store, GameKind::Runner, &alice).top_score(), Some(42));
        assert!(HighScores::load(&store, GameKind::Flappy, &alice).is_empty());
        assert!(HighScores::load(&store, GameKind::Runner, &Identity::anonymous()).is_empty());
        assert!(store.get("highscores_dino_0xa11ce").is_some());
    }

    #[test]
    fn test_format_day() {
        assert_eq!(format_day(day(10), day(10)), "Today");
        assert_eq!(format_day(day(9), day(10)), "Yesterday");
        assert_eq!(format_day(day(5), day(10)), "5 days ago");
        assert_eq!(format_day(day(1), day(10)), "3/1/24");
    }
}
