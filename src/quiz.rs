//! Timed multiple-choice quiz
//!
//! The host calls `tick_second` once per wall-clock second. A session counts
//! down before the first question, then gives each question a fixed time budget.
//! Answers are scored from the question's base points, the seconds left and the
//! current streak.

use serde::{Deserialize, Serialize};

const BUNDLED_BANK: &str = include_str!("../assets/quiz.json");

/// Seconds shown before the first question
pub const COUNTDOWN_SECONDS: u32 = 3;
/// Seconds allowed per question
pub const QUESTION_SECONDS: u32 = 15;
/// Points per second left on the clock
const TIME_BONUS_PER_SECOND: u32 = 2;
/// Streak bonus per streak step, applied from a streak of 2 upward
const STREAK_BONUS: u32 = 5;
/// Nominal per-question score used for the accuracy percentage
const ACCURACY_UNIT: u32 = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuestionDifficulty {
    #[default]
    Easy,
    Medium,
    Hard,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    pub prompt: String,
    pub options: Vec<String>,
    /// Index into `options`
    pub correct: usize,
    #[serde(default)]
    pub difficulty: QuestionDifficulty,
    pub points: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LanguagePack {
    pub id: String,
    pub name: String,
    pub questions: Vec<Question>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct QuestionBank {
    pub languages: Vec<LanguagePack>,
}

impl QuestionBank {
    /// Bank compiled into the binary
    pub fn bundled() -> Self {
        Self::from_json(BUNDLED_BANK)
    }

    /// Parse a bank, dropping questions whose answer index is out of range.
    /// Malformed JSON yields an empty bank.
    pub fn from_json(json: &str) -> Self {
        let mut bank: QuestionBank = match serde_json::from_str(json) {
            Ok(bank) => bank,
            Err(e) => {
                log::warn!("Failed to parse question bank: {e}");
                return Self::default();
            }
        };
        for pack in &mut bank.languages {
            pack.questions.retain(|q| {
                let valid = q.correct < q.options.len();
                if !valid {
                    log::warn!("Dropping question with bad answer index: {}", q.prompt);
                }
                valid
            });
        }
        bank
    }

    pub fn language(&self, id: &str) -> Option<&LanguagePack> {
        self.languages.iter().find(|l| l.id == id)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum QuizPhase {
    Countdown { remaining: u32 },
    Asking,
    /// Answer or timeout shown, waiting for `advance`
    Revealed,
    Complete,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AnswerResult {
    Correct {
        points: u32,
        time_bonus: u32,
        streak_bonus: u32,
    },
    Incorrect {
        correct: usize,
    },
    TimedOut {
        correct: usize,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuizSession {
    questions: Vec<Question>,
    pub index: usize,
    pub phase: QuizPhase,
    pub time_left: u32,
    pub score: u32,
    pub streak: u32,
    pub max_streak: u32,
    pub correct_answers: u32,
    pub last_result: Option<AnswerResult>,
}

impl QuizSession {
    pub fn new(questions: Vec<Question>) -> Self {
        Self {
            questions,
            index: 0,
            phase: QuizPhase::Countdown {
                remaining: COUNTDOWN_SECONDS,
            },
            time_left: QUESTION_SECONDS,
            score: 0,
            streak: 0,
            max_streak: 0,
            correct_answers: 0,
            last_result: None,
        }
    }

    /// Session over one language from a bank
    pub fn for_language(bank: &QuestionBank, language: &str) -> Option<Self> {
        let pack = bank.language(language)?;
        Some(Self::new(pack.questions.clone()))
    }

    pub fn question(&self) -> Option<&Question> {
        match self.phase {
            QuizPhase::Asking | QuizPhase::Revealed => self.questions.get(self.index),
            _ => None,
        }
    }

    pub fn question_count(&self) -> usize {
        self.questions.len()
    }

    pub fn is_complete(&self) -> bool {
        self.phase == QuizPhase::Complete
    }

    /// One wall-clock second. Returns the timeout result when the clock runs out.
    pub fn tick_second(&mut self) -> Option<AnswerResult> {
        match self.phase {
            QuizPhase::Countdown { remaining } => {
                if remaining <= 1 {
                    self.begin_question(0);
                } else {
                    self.phase = QuizPhase::Countdown {
                        remaining: remaining - 1,
                    };
                }
                None
            }
            QuizPhase::Asking => {
                self.time_left = self.time_left.saturating_sub(1);
                if self.time_left > 0 {
                    return None;
                }
                let correct = self.questions.get(self.index).map_or(0, |q| q.correct);
                self.streak = 0;
                self.phase = QuizPhase::Revealed;
                let result = AnswerResult::TimedOut { correct };
                self.last_result = Some(result);
                Some(result)
            }
            QuizPhase::Revealed | QuizPhase::Complete => None,
        }
    }

    /// Submit an answer for the current question. Ignored unless a question is open.
    pub fn answer(&mut self, choice: usize) -> Option<AnswerResult> {
        if self.phase != QuizPhase::Asking {
            return None;
        }
        let question = self.questions.get(self.index)?;
        let result = if choice == question.correct {
            let time_bonus = self.time_left * TIME_BONUS_PER_SECOND;
            let streak_bonus = if self.streak >= 2 {
                self.streak * STREAK_BONUS
            } else {
                0
            };
            let points = question.points + time_bonus + streak_bonus;
            self.score += points;
            self.streak += 1;
            self.max_streak = self.max_streak.max(self.streak);
            self.correct_answers += 1;
            AnswerResult::Correct {
                points,
                time_bonus,
                streak_bonus,
            }
        } else {
            self.streak = 0;
            AnswerResult::Incorrect {
                correct: question.correct,
            }
        };
        self.phase = QuizPhase::Revealed;
        self.last_result = Some(result);
        Some(result)
    }

    /// Move past a revealed answer to the next question, or finish
    pub fn advance(&mut self) {
        if self.phase != QuizPhase::Revealed {
            return;
        }
        if self.index + 1 < self.questions.len() {
            self.begin_question(self.index + 1);
        } else {
            self.phase = QuizPhase::Complete;
            log::info!(
                "Quiz complete: score {} ({} of {} correct)",
                self.score,
                self.correct_answers,
                self.questions.len()
            );
        }
    }

    /// Score relative to 20 points per question, as a rounded percentage
    pub fn accuracy(&self) -> u32 {
        if self.questions.is_empty() {
            return 0;
        }
        let max = (self.questions.len() as u32 * ACCURACY_UNIT) as f64;
        (self.score as f64 / max * 100.0).round() as u32
    }

    /// Back to the countdown with the same questions
    pub fn restart(&mut self) {
        let questions = std::mem::take(&mut self.questions);
        *self = Self::new(questions);
    }

    fn begin_question(&mut self, index: usize) {
        self.index = index;
        self.time_left = QUESTION_SECONDS;
        self.last_result = None;
        self.phase = if index < self.questions.len() {
            QuizPhase::Asking
        } else {
            QuizPhase::Complete
        };
    }
}
