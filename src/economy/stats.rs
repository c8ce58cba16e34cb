//! Per-identity play statistics and the daily streak

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::GameKind;
use crate::platform::is_previous_day;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameStats {
    pub total_tokens: u64,
    pub daily_streak: u32,
    /// Games finished per game slug
    pub games_played: BTreeMap<String, u32>,
    /// Best score per game slug
    pub highest_scores: BTreeMap<String, u32>,
    pub last_play_date: Option<NaiveDate>,
    pub total_games_played: u32,
    /// Tokens earned on `tokens_day`
    pub tokens_today: u64,
    pub tokens_day: Option<NaiveDate>,
}

impl GameStats {
    /// Advance the streak for a play on `today`. Same day keeps it, the next
    /// day extends it, anything else starts over at 1.
    pub fn touch_day(&mut self, today: NaiveDate) -> u32 {
        self.daily_streak = match self.last_play_date {
            Some(last) if last == today => self.daily_streak.max(1),
            Some(last) if is_previous_day(last, today) => self.daily_streak + 1,
            _ => 1,
        };
        self.last_play_date = Some(today);
        if self.tokens_day != Some(today) {
            self.tokens_day = Some(today);
            self.tokens_today = 0;
        }
        self.daily_streak
    }

    /// Count a finished game and its token award
    pub fn record_game(&mut self, game: GameKind, score: u32, tokens: u64, today: NaiveDate) {
        self.touch_day(today);
        *self.games_played.entry(game.slug().to_string()).or_default() += 1;
        self.total_games_played += 1;

        let best = self.highest_scores.entry(game.slug().to_string()).or_default();
        if score > *best {
            *best = score;
            log::info!("New best for {}: {score}", game.slug());
        }
        self.credit(tokens, today);
    }

    /// Add tokens to both the lifetime and the daily total
    pub fn credit(&mut self, tokens: u64, today: NaiveDate) {
        if self.tokens_day != Some(today) {
            self.tokens_day = Some(today);
            self.tokens_today = 0;
        }
        self.total_tokens += tokens;
        self.tokens_today += tokens;
    }

    /// Best score across all games
    pub fn best_score(&self) -> u32 {
        self.highest_scores.values().copied().max().unwrap_or(0)
    }

    pub fn tokens_on(&self, day: NaiveDate) -> u64 {
        if self.tokens_day == Some(day) {
            self.tokens_today
        } else {
            0
        }
    }

    pub fn plays_of(&self, game: GameKind) -> u32 {
        self.games_played.get(game.slug()).copied().unwrap_or(0)
    }
}

/// Badge text for a streak, `None` below two days
pub fn streak_label(streak: u32) -> Option<&'static str> {
    match streak {
        7.. => Some("Week Warrior"),
        3.. => Some("Streak Master"),
        2 => Some("Daily Player"),
        _ => None,
    }
}
