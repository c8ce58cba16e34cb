//! Daily challenges
//!
//! Each play day draws three or four challenges from a fixed pool. The draw is
//! seeded by the date, so every host shows the same set on the same day.

use chrono::{Datelike, NaiveDate};
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::GameKind;
use crate::consts::FRAMES_PER_SECOND;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChallengeId {
    Score100,
    Play3Games,
    DinoSurvival,
    TokenCollector,
    HighScorer,
}

impl ChallengeId {
    pub const ALL: [ChallengeId; 5] = [
        ChallengeId::Score100,
        ChallengeId::Play3Games,
        ChallengeId::DinoSurvival,
        ChallengeId::TokenCollector,
        ChallengeId::HighScorer,
    ];

    pub fn title(self) -> &'static str {
        match self {
            ChallengeId::Score100 => "Score Hunter",
            ChallengeId::Play3Games => "Triple Threat",
            ChallengeId::DinoSurvival => "Dino Survivor",
            ChallengeId::TokenCollector => "Token Collector",
            ChallengeId::HighScorer => "High Scorer",
        }
    }

    pub fn target(self) -> u64 {
        match self {
            ChallengeId::Score100 => 100,
            ChallengeId::Play3Games => 3,
            // Seconds
            ChallengeId::DinoSurvival => 120,
            ChallengeId::TokenCollector => 200,
            ChallengeId::HighScorer => 500,
        }
    }

    pub fn reward(self) -> u64 {
        match self {
            ChallengeId::Score100 => 50,
            ChallengeId::Play3Games => 75,
            ChallengeId::DinoSurvival => 100,
            ChallengeId::TokenCollector => 150,
            ChallengeId::HighScorer => 200,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Challenge {
    pub id: ChallengeId,
    pub progress: u64,
    pub completed: bool,
}

/// What a finished game contributes to today's challenges
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChallengeInput {
    pub game: GameKind,
    pub score: u32,
    /// Frames the run lasted (runner survival)
    pub frames: u64,
    /// Tokens earned so far today, this game included
    pub tokens_today: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyChallenges {
    pub day: NaiveDate,
    pub challenges: Vec<Challenge>,
    /// Distinct game slugs played today
    pub games_today: Vec<String>,
}

impl DailyChallenges {
    /// Today's draw from the pool
    pub fn generate(day: NaiveDate) -> Self {
        let mut rng = Pcg32::seed_from_u64(day.num_days_from_ce() as u64);
        let mut pool = ChallengeId::ALL;
        pool.shuffle(&mut rng);
        let count = rng.random_range(3..=4);
        Self {
            day,
            challenges: pool[..count]
                .iter()
                .map(|&id| Challenge {
                    id,
                    progress: 0,
                    completed: false,
                })
                .collect(),
            games_today: Vec::new(),
        }
    }

    /// Storage key: `dailyChallenges_{address}_{YYYY-MM-DD}`
    pub fn storage_key(address: &str, day: NaiveDate) -> String {
        format!("dailyChallenges_{address}_{}", crate::platform::day_key(day))
    }

    /// Fold a finished game into progress. Returns challenges completed for the
    /// first time; rewards are credited by the caller.
    pub fn update(&mut self, input: &ChallengeInput) -> Vec<ChallengeId> {
        let slug = input.game.slug().to_string();
        if !self.games_today.contains(&slug) {
            self.games_today.push(slug);
        }

        let mut newly_completed = Vec::new();
        for challenge in &mut self.challenges {
            let progress = match challenge.id {
                ChallengeId::Score100 | ChallengeId::HighScorer => {
                    challenge.progress.max(input.score as u64)
                }
                ChallengeId::Play3Games => self.games_today.len() as u64,
                ChallengeId::DinoSurvival if input.game == GameKind::Runner => {
                    let seconds = input.frames / FRAMES_PER_SECOND as u64;
                    challenge.progress.max(seconds)
                }
                ChallengeId::DinoSurvival => challenge.progress,
                ChallengeId::TokenCollector => challenge.progress.max(input.tokens_today),
            };
            challenge.progress = progress;
            if !challenge.completed && progress >= challenge.id.target() {
                challenge.completed = true;
                log::info!("Daily challenge completed: {}", challenge.id.title());
                newly_completed.push(challenge.id);
            }
        }
        newly_completed
    }

    /// Token totals can rise after the game itself (quest and challenge
    /// rewards); re-check the token challenge against the new total
    pub fn update_tokens(&mut self, tokens_today: u64) -> Vec<ChallengeId> {
        let mut newly_completed = Vec::new();
        for challenge in &mut self.challenges {
            if challenge.id != ChallengeId::TokenCollector {
                continue;
            }
            challenge.progress = challenge.progress.max(tokens_today);
            if !challenge.completed && challenge.progress >= challenge.id.target() {
                challenge.completed = true;
                log::info!("Daily challenge completed: {}", challenge.id.title());
                newly_completed.push(challenge.id);
            }
        }
        newly_completed
    }

    pub fn get(&self, id: ChallengeId) -> Option<&Challenge> {
        self.challenges.iter().find(|c| c.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 7, d).unwrap()
    }

    /// Today's set with every pool challenge, for progress tests
    fn full_set(d: NaiveDate) -> DailyChallenges {
        DailyChallenges {
            day: d,
            challenges: ChallengeId::ALL
                .iter()
                .map(|&id| Challenge {
                    id,
                    progress: 0,
                    completed: false,
                })
                .collect(),
            games_today: Vec::new(),
        }
    }

    fn input(game: GameKind, score: u32) -> ChallengeInput {
        ChallengeInput {
            game,
            score,
            frames: 0,
            tokens_today: 0,
        }
    }

    #[test]
    fn test_draw_is_stable_per_day() {
        for d in 1..=31 {
            let a = DailyChallenges::generate(day(d));
            let b = DailyChallenges::generate(day(d));
            assert_eq!(a, b);
            assert!((3..=4).contains(&a.challenges.len()));
            let ids: HashSet<_> = a.challenges.iter().map(|c| c.id).collect();
            assert_eq!(ids.len(), a.challenges.len());
        }
    }

    #[test]
    fn test_distinct_games_counted() {
        let mut set = full_set(day(1));
        set.update(&input(GameKind::Runner, 1));
        set.update(&input(GameKind::Runner, 1));
        set.update(&input(GameKind::Quiz, 1));
        assert_eq!(set.get(ChallengeId::Play3Games).unwrap().progress, 2);
        let done = set.update(&input(GameKind::Grid, 1));
        assert_eq!(done, vec![ChallengeId::Play3Games]);
    }

    #[test]
    fn test_survival_only_counts_runner() {
        let mut set = full_set(day(1));
        let long_flight = ChallengeInput {
            frames: 60 * 200,
            ..input(GameKind::Flappy, 10)
        };
        set.update(&long_flight);
        assert_eq!(set.get(ChallengeId::DinoSurvival).unwrap().progress, 0);

        let long_run = ChallengeInput {
            frames: 60 * 125,
            ..input(GameKind::Runner, 10)
        };
        assert!(set.update(&long_run).contains(&ChallengeId::DinoSurvival));
    }

    #[test]
    fn test_score_progress_is_monotonic_and_pays_once() {
        let mut set = full_set(day(1));
        assert_eq!(set.update(&input(GameKind::Runner, 150)), vec![ChallengeId::Score100]);
        set.update(&input(GameKind::Runner, 20));
        assert_eq!(set.get(ChallengeId::Score100).unwrap().progress, 150);
        assert!(!set.update(&input(GameKind::Runner, 160)).contains(&ChallengeId::Score100));
    }

    #[test]
    fn test_token_recheck() {
        let mut set = full_set(day(1));
        assert!(set.update_tokens(199).is_empty());
        assert_eq!(set.update_tokens(200), vec![ChallengeId::TokenCollector]);
        assert!(set.update_tokens(400).is_empty());
    }

    #[test]
    fn test_storage_key_format() {
        assert_eq!(
            DailyChallenges::storage_key("0xabc", day(4)),
            "dailyChallenges_0xabc_2024-07-04"
        );
    }
}
