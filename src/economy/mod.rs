//! Local reward layer
//!
//! Turns finished games into tokens, tracks the daily streak, long-running
//! quests and the day's challenges, and keeps per-game leaderboards.
//!
//! Everything a finished game changes is reported back in a `SessionReport`;
//! hosts render those events instead of listening for broadcasts.

pub mod challenges;
pub mod quests;
pub mod stats;

pub use challenges::{Challenge, ChallengeId, ChallengeInput, DailyChallenges};
pub use quests::{Quest, QuestBook, QuestId, QuestMetric};
pub use stats::{GameStats, streak_label};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::consts::FRAMES_PER_SECOND;
use crate::highscores::HighScores;
use crate::persistence::{self, KeyValueStore, MemoryStore};
use crate::platform::Identity;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameKind {
    Runner,
    Flappy,
    Quiz,
    Grid,
    Blocks,
}

impl GameKind {
    pub const ALL: [GameKind; 5] = [
        GameKind::Runner,
        GameKind::Flappy,
        GameKind::Quiz,
        GameKind::Grid,
        GameKind::Blocks,
    ];

    /// Storage slug, shared with existing saves
    pub fn slug(self) -> &'static str {
        match self {
            GameKind::Runner => "dino",
            GameKind::Flappy => "flappy-bird",
            GameKind::Quiz => "quiz",
            GameKind::Grid => "tic-tac-toe",
            GameKind::Blocks => "block-stack",
        }
    }

    pub fn from_slug(slug: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|g| g.slug() == slug)
    }

    pub fn token_multiplier(self) -> f64 {
        match self {
            GameKind::Runner => 1.0,
            GameKind::Flappy => 1.2,
            GameKind::Quiz => 1.5,
            GameKind::Grid => 0.8,
            GameKind::Blocks => 1.0,
        }
    }
}

/// Tokens earned by one finished game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenAward {
    pub base: u64,
    pub streak_bonus: u64,
}

impl TokenAward {
    /// `base = floor(floor(score / 10) * multiplier)`, plus 10% of base per streak day
    pub fn compute(game: GameKind, score: u32, streak: u32) -> Self {
        let base = ((score / 10) as f64 * game.token_multiplier()).floor() as u64;
        let streak_bonus = (base as f64 * streak as f64 * 0.1).floor() as u64;
        Self { base, streak_bonus }
    }

    pub fn total(&self) -> u64 {
        self.base + self.streak_bonus
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum EconomyEvent {
    StreakChanged { streak: u32 },
    TokensAwarded { game: GameKind, award: TokenAward },
    QuestCompleted { id: QuestId, reward: u64 },
    ChallengeCompleted { id: ChallengeId, reward: u64 },
    NewHighScore { game: GameKind, score: u32, rank: usize },
}

/// Outcome of recording one finished game
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionReport {
    pub game: GameKind,
    pub score: u32,
    /// Game tokens plus any quest and challenge rewards
    pub tokens_awarded: u64,
    /// Leaderboard rank, if the score made the board
    pub rank: Option<usize>,
    pub events: Vec<EconomyEvent>,
}

/// Reward-layer coordinator for one identity over one store
pub struct Economy<S: KeyValueStore = MemoryStore> {
    store: S,
    identity: Identity,
    stats: GameStats,
    quests: QuestBook,
    challenges: Option<DailyChallenges>,
}

impl<S: KeyValueStore> Economy<S> {
    pub fn new(store: S, identity: Identity) -> Self {
        let mut economy = Self {
            store,
            identity: Identity::anonymous(),
            stats: GameStats::default(),
            quests: QuestBook::default(),
            challenges: None,
        };
        economy.switch_identity(identity);
        economy
    }

    pub fn identity(&self) -> &Identity {
        &self.identity
    }

    pub fn stats(&self) -> &GameStats {
        &self.stats
    }

    pub fn quests(&self) -> &QuestBook {
        &self.quests
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    pub fn high_scores(&self, game: GameKind) -> HighScores {
        HighScores::load(&self.store, game, &self.identity)
    }

    /// Reload per-identity state. Anonymous players start from zero and are
    /// never written back.
    pub fn switch_identity(&mut self, identity: Identity) {
        self.identity = identity;
        self.challenges = None;
        match self.identity.address() {
            Some(address) => {
                self.stats = persistence::load_or_default(&self.store, &stats_key(address));
                self.quests = persistence::load_or_default(&self.store, &quests_key(address));
                log::info!(
                    "Loaded economy for {}: {} tokens, streak {}",
                    self.identity.short_label(),
                    self.stats.total_tokens,
                    self.stats.daily_streak
                );
            }
            None => {
                self.stats = GameStats::default();
                self.quests = QuestBook::default();
                log::info!("Playing as guest");
            }
        }
    }

    /// The challenge set for `today`, drawn or reloaded on first access each day
    pub fn challenges(&mut self, today: NaiveDate) -> &DailyChallenges {
        self.challenges_mut(today)
    }

    /// Fold a finished game into stats, tokens, quests, challenges and the leaderboard
    pub fn record_session(
        &mut self,
        game: GameKind,
        score: u32,
        frames: u64,
        today: NaiveDate,
    ) -> SessionReport {
        let mut events = Vec::new();

        let previous_streak = self.stats.daily_streak;
        let streak = self.stats.touch_day(today);
        if streak != previous_streak {
            events.push(EconomyEvent::StreakChanged { streak });
        }

        let award = TokenAward::compute(game, score, streak);
        self.stats.record_game(game, score, award.total(), today);
        events.push(EconomyEvent::TokensAwarded { game, award });
        let mut tokens_awarded = award.total();
        log::info!(
            "{} finished: score {score}, {} tokens (+{} streak bonus)",
            game.slug(),
            award.base,
            award.streak_bonus
        );

        let input = ChallengeInput {
            game,
            score,
            frames,
            tokens_today: self.stats.tokens_on(today),
        };
        let mut challenge_done = self.challenges_mut(today).update(&input);

        // Rewards raise token totals, which can complete further quests or the
        // token challenge; settle until nothing new completes
        loop {
            let quest_done = self.quests.refresh(&self.stats);
            if quest_done.is_empty() && challenge_done.is_empty() {
                break;
            }
            for id in quest_done {
                self.stats.credit(id.reward(), today);
                tokens_awarded += id.reward();
                events.push(EconomyEvent::QuestCompleted {
                    id,
                    reward: id.reward(),
                });
            }
            for id in challenge_done {
                self.stats.credit(id.reward(), today);
                tokens_awarded += id.reward();
                events.push(EconomyEvent::ChallengeCompleted {
                    id,
                    reward: id.reward(),
                });
            }
            let tokens_today = self.stats.tokens_on(today);
            challenge_done = self.challenges_mut(today).update_tokens(tokens_today);
        }

        let mut board = self.high_scores(game);
        let seconds = (frames / FRAMES_PER_SECOND as u64) as u32;
        let rank = board.add_score(score, seconds, today);
        if let Some(rank) = rank {
            board.save(&mut self.store, game, &self.identity);
            events.push(EconomyEvent::NewHighScore { game, score, rank });
        }

        self.persist();

        SessionReport {
            game,
            score,
            tokens_awarded,
            rank,
            events,
        }
    }

    fn challenges_mut(&mut self, today: NaiveDate) -> &mut DailyChallenges {
        let stale = self.challenges.as_ref().is_none_or(|c| c.day != today);
        if stale {
            let loaded = self
                .identity
                .address()
                .and_then(|a| self.store.get(&DailyChallenges::storage_key(a, today)))
                .and_then(|json| persistence::decode::<DailyChallenges>(&json))
                .filter(|c| c.day == today);
            self.challenges = Some(loaded.unwrap_or_else(|| DailyChallenges::generate(today)));
        }
        self.challenges.get_or_insert_with(|| DailyChallenges::generate(today))
    }

    fn persist(&mut self) {
        let Some(address) = self.identity.address().map(str::to_string) else {
            return;
        };
        persistence::save(&mut self.store, &stats_key(&address), &self.stats);
        persistence::save(&mut self.store, &quests_key(&address), &self.quests);
        if let Some(challenges) = &self.challenges {
            let key = DailyChallenges::storage_key(&address, challenges.day);
            persistence::save(&mut self.store, &key, challenges);
        }
    }
}

fn stats_key(address: &str) -> String {
    format!("gameStats_{address}")
}

fn quests_key(address: &str) -> String {
    format!("questProgress_{address}")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 8, d).unwrap()
    }

    #[test]
    fn test_token_formula() {
        // floor(floor(257/10) * 1.2) = floor(30.0) = 30
        assert_eq!(TokenAward::compute(GameKind::Flappy, 257, 0).base, 30);
        // floor(floor(99/10) * 0.8) = floor(7.2) = 7
        assert_eq!(TokenAward::compute(GameKind::Grid, 99, 0).base, 7);
        let award = TokenAward::compute(GameKind::Quiz, 200, 3);
        assert_eq!(award.base, 30);
        assert_eq!(award.streak_bonus, 9);
        assert_eq!(award.total(), 39);
        assert_eq!(TokenAward::compute(GameKind::Runner, 9, 5).total(), 0);
        assert_eq!(TokenAward::compute(GameKind::Blocks, 1230, 0).base, 123);
    }

    #[test]
    fn test_slugs_round_trip() {
        for game in GameKind::ALL {
            assert_eq!(GameKind::from_slug(game.slug()), Some(game));
        }
        assert_eq!(GameKind::from_slug("snake"), None);
    }

    #[test]
    fn test_first_session_pays_first_game_quest() {
        let mut economy = Economy::new(MemoryStore::new(), Identity::wallet("0xabc"));
        let report = economy.record_session(GameKind::Runner, 50, 600, day(1));
        // 5 game tokens with a streak of 1 (bonus floor(0.5) = 0) plus 50 for the first game
        assert!(report.events.contains(&EconomyEvent::QuestCompleted {
            id: QuestId::FirstGame,
            reward: 50
        }));
        assert_eq!(report.rank, Some(1));
        assert!(report.tokens_awarded >= 55);
        assert_eq!(economy.stats().total_tokens, report.tokens_awarded);
    }

    #[test]
    fn test_quest_reward_paid_once_across_sessions() {
        let mut economy = Economy::new(MemoryStore::new(), Identity::wallet("0xabc"));
        economy.record_session(GameKind::Grid, 0, 0, day(1));
        let report = economy.record_session(GameKind::Grid, 0, 0, day(1));
        assert!(
            !report
                .events
                .iter()
                .any(|e| matches!(e, EconomyEvent::QuestCompleted { id: QuestId::FirstGame, .. }))
        );
    }

    #[test]
    fn test_state_persists_per_identity() {
        let mut economy = Economy::new(MemoryStore::new(), Identity::wallet("0xabc"));
        economy.record_session(GameKind::Quiz, 120, 0, day(1));
        let tokens = economy.stats().total_tokens;

        economy.switch_identity(Identity::wallet("0xdef"));
        assert_eq!(economy.stats().total_games_played, 0);

        economy.switch_identity(Identity::wallet("0xabc"));
        assert_eq!(economy.stats().total_tokens, tokens);
        assert!(economy.quests().get(QuestId::FirstGame).unwrap().completed);
    }

    #[test]
    fn test_guest_is_not_persisted_except_leaderboard() {
        let mut economy = Economy::new(MemoryStore::new(), Identity::anonymous());
        economy.record_session(GameKind::Runner, 30, 0, day(1));
        assert_eq!(economy.stats().total_games_played, 1);
        let keys: Vec<&str> = economy.store().keys().collect();
        assert_eq!(keys, vec!["highscores_dino_guest"]);
    }

    #[test]
    fn test_streak_bonus_applies_on_following_day() {
        let mut economy = Economy::new(MemoryStore::new(), Identity::wallet("0xabc"));
        economy.record_session(GameKind::Runner, 0, 0, day(1));
        let report = economy.record_session(GameKind::Runner, 100, 0, day(2));
        assert!(report.events.contains(&EconomyEvent::StreakChanged { streak: 2 }));
        assert!(report.events.contains(&EconomyEvent::TokensAwarded {
            game: GameKind::Runner,
            award: TokenAward {
                base: 10,
                streak_bonus: 2
            }
        }));
    }

    #[test]
    fn test_corrupt_stats_fall_back_to_zero() {
        let mut store = MemoryStore::new();
        store.set("gameStats_0xabc", "{{{{");
        let economy = Economy::new(store, Identity::wallet("0xabc"));
        assert_eq!(economy.stats(), &GameStats::default());
        assert_eq!(economy.quests(), &QuestBook::default());
    }

    #[test]
    fn test_challenges_follow_the_day() {
        let mut economy = Economy::new(MemoryStore::new(), Identity::wallet("0xabc"));
        let first = economy.challenges(day(1)).clone();
        assert_eq!(first, DailyChallenges::generate(day(1)));
        assert_eq!(economy.challenges(day(2)).day, day(2));
    }
}
