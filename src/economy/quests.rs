//! Long-running quests
//!
//! Progress is always recomputed from `GameStats`; only the completion flags
//! need to persist so each reward is paid once.

use serde::{Deserialize, Serialize};

use super::stats::GameStats;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum QuestMetric {
    GamesPlayed,
    BestScore,
    Streak,
    TotalTokens,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestId {
    FirstGame,
    Score100,
    Score500,
    DailyPlayer,
    StreakMaster,
    TokenCollector,
    GameMaster,
}

impl QuestId {
    /// All quests in display order.
    pub const ALL: [QuestId; 7] = [
        QuestId::FirstGame,
        QuestId::Score100,
        QuestId::Score500,
        QuestId::DailyPlayer,
        QuestId::StreakMaster,
        QuestId::TokenCollector,
        QuestId::GameMaster,
    ];

    pub fn title(self) -> &'static str {
        match self {
            QuestId::FirstGame => "First Steps",
            QuestId::Score100 => "Century Club",
            QuestId::Score500 => "High Achiever",
            QuestId::DailyPlayer => "Daily Player",
            QuestId::StreakMaster => "Streak Master",
            QuestId::TokenCollector => "Token Collector",
            QuestId::GameMaster => "Game Master",
        }
    }

    pub fn metric(self) -> QuestMetric {
        match self {
            QuestId::FirstGame | QuestId::GameMaster => QuestMetric::GamesPlayed,
            QuestId::Score100 | QuestId::Score500 => QuestMetric::BestScore,
            QuestId::DailyPlayer | QuestId::StreakMaster => QuestMetric::Streak,
            QuestId::TokenCollector => QuestMetric::TotalTokens,
        }
    }

    pub fn target(self) -> u64 {
        match self {
            QuestId::FirstGame => 1,
            QuestId::Score100 => 100,
            QuestId::Score500 => 500,
            QuestId::DailyPlayer => 3,
            QuestId::StreakMaster => 7,
            QuestId::TokenCollector => 500,
            QuestId::GameMaster => 20,
        }
    }

    pub fn reward(self) -> u64 {
        match self {
            QuestId::FirstGame => 50,
            QuestId::Score100 => 100,
            QuestId::Score500 => 250,
            QuestId::DailyPlayer => 150,
            QuestId::StreakMaster => 400,
            QuestId::TokenCollector => 200,
            QuestId::GameMaster => 300,
        }
    }
}

impl QuestMetric {
    pub fn read(self, stats: &GameStats) -> u64 {
        match self {
            QuestMetric::GamesPlayed => stats.total_games_played as u64,
            QuestMetric::BestScore => stats.best_score() as u64,
            QuestMetric::Streak => stats.daily_streak as u64,
            QuestMetric::TotalTokens => stats.total_tokens,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quest {
    pub id: QuestId,
    pub progress: u64,
    pub completed: bool,
}

impl Quest {
    /// Progress as a 0-100 percentage
    pub fn percent(&self) -> u32 {
        let target = self.id.target().max(1);
        ((self.progress.min(target) * 100) / target) as u32
    }
}

/// Every quest with its progress and completion flag
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestBook {
    pub quests: Vec<Quest>,
}

impl Default for QuestBook {
    fn default() -> Self {
        Self {
            quests: QuestId::ALL
                .iter()
                .map(|&id| Quest {
                    id,
                    progress: 0,
                    completed: false,
                })
                .collect(),
        }
    }
}

impl QuestBook {
    /// Recompute progress from `stats`. Returns quests completed for the first
    /// time by this call; their rewards are not yet credited.
    pub fn refresh(&mut self, stats: &GameStats) -> Vec<QuestId> {
        self.ensure_all();
        let mut newly_completed = Vec::new();
        for quest in &mut self.quests {
            quest.progress = quest.id.metric().read(stats);
            if !quest.completed && quest.progress >= quest.id.target() {
                quest.completed = true;
                log::info!("Quest completed: {}", quest.id.title());
                newly_completed.push(quest.id);
            }
        }
        newly_completed
    }

    pub fn get(&self, id: QuestId) -> Option<&Quest> {
        self.quests.iter().find(|q| q.id == id)
    }

    pub fn completed_count(&self) -> usize {
        self.quests.iter().filter(|q| q.completed).count()
    }

    /// Saved books from older builds may lack newer quests
    fn ensure_all(&mut self) {
        for id in QuestId::ALL {
            if self.get(id).is_none() {
                self.quests.push(Quest {
                    id,
                    progress: 0,
                    completed: false,
                });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::economy::GameKind;
    use chrono::NaiveDate;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()
    }

    #[test]
    fn test_first_game_completes_once() {
        let mut book = QuestBook::default();
        let mut stats = GameStats::default();
        assert!(book.refresh(&stats).is_empty());

        stats.record_game(GameKind::Grid, 0, 0, today());
        assert_eq!(book.refresh(&stats), vec![QuestId::FirstGame]);
        assert!(book.refresh(&stats).is_empty());
        assert_eq!(book.completed_count(), 1);
    }

    #[test]
    fn test_score_quests_use_best_across_games() {
        let mut book = QuestBook::default();
        let mut stats = GameStats::default();
        stats.record_game(GameKind::Runner, 40, 0, today());
        stats.record_game(GameKind::Quiz, 510, 0, today());
        let done = book.refresh(&stats);
        assert!(done.contains(&QuestId::Score100));
        assert!(done.contains(&QuestId::Score500));
        assert_eq!(book.get(QuestId::GameMaster).unwrap().percent(), 10);
    }

    #[test]
    fn test_completion_survives_progress_drop() {
        let mut book = QuestBook::default();
        let mut stats = GameStats {
            daily_streak: 3,
            ..GameStats::default()
        };
        assert_eq!(book.refresh(&stats), vec![QuestId::DailyPlayer]);
        stats.daily_streak = 1;
        assert!(book.refresh(&stats).is_empty());
        assert!(book.get(QuestId::DailyPlayer).unwrap().completed);
    }

    #[test]
    fn test_missing_quests_are_restored() {
        let mut book = QuestBook { quests: Vec::new() };
        book.refresh(&GameStats::default());
        assert_eq!(book.quests.len(), QuestId::ALL.len());
    }
}
