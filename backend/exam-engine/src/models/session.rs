use std::collections::VecDeque;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Number of recent outcomes the difficulty adjuster evaluates.
pub const RECENT_WINDOW_SIZE: usize = 3;

/// Ordered difficulty band. Adjustments move one step at a time and clamp
/// at the bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub fn step_up(self) -> Self {
        match self {
            Difficulty::Easy => Difficulty::Medium,
            Difficulty::Medium | Difficulty::Hard => Difficulty::Hard,
        }
    }

    pub fn step_down(self) -> Self {
        match self {
            Difficulty::Hard => Difficulty::Medium,
            Difficulty::Medium | Difficulty::Easy => Difficulty::Easy,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }
}

/// Bounded ring of the most recent answer outcomes.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RecentWindow {
    outcomes: VecDeque<bool>,
}

impl RecentWindow {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pushes an outcome, evicting the oldest once the window is full.
    pub fn push(&mut self, correct: bool) {
        if self.outcomes.len() == RECENT_WINDOW_SIZE {
            self.outcomes.pop_front();
        }
        self.outcomes.push_back(correct);
    }

    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }

    /// Accuracy over the window as a percentage. Zero for an empty window.
    pub fn accuracy(&self) -> f64 {
        if self.outcomes.is_empty() {
            return 0.0;
        }
        let correct = self.outcomes.iter().filter(|c| **c).count();
        (correct as f64 / self.outcomes.len() as f64) * 100.0
    }
}

/// A single difficulty adjustment produced by the adjuster.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DifficultyChange {
    pub from: Difficulty,
    pub to: Difficulty,
    /// Window accuracy (%) that triggered the change.
    pub accuracy: f64,
}

/// Append-only record of a difficulty adjustment within a session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DifficultyShift {
    pub question_number: u32,
    pub from: Difficulty,
    pub to: Difficulty,
    pub accuracy: f64,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    NotStarted,
    InProgress,
    Waiting,
    Completed,
    Terminated,
}

impl SessionStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, SessionStatus::Completed | SessionStatus::Terminated)
    }
}

/// One candidate's attempt at one exam. The unit of isolation: all
/// mutations to a session execute under its per-session lock.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub id: String,
    pub candidate_id: String,
    pub exam_id: String,
    pub difficulty: Difficulty,
    pub questions_answered: u32,
    pub correct_answers: u32,
    pub recent_results: RecentWindow,
    /// Served but not yet answered question, re-served on re-poll.
    pub current_question: Option<String>,
    pub wait_until: Option<DateTime<Utc>>,
    pub violations: u32,
    pub status: SessionStatus,
    pub difficulty_history: Vec<DifficultyShift>,
    pub started_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Session {
    pub fn new(candidate_id: &str, exam_id: &str, starting_difficulty: Difficulty) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            candidate_id: candidate_id.to_string(),
            exam_id: exam_id.to_string(),
            difficulty: starting_difficulty,
            questions_answered: 0,
            correct_answers: 0,
            recent_results: RecentWindow::new(),
            current_question: None,
            wait_until: None,
            violations: 0,
            status: SessionStatus::NotStarted,
            difficulty_history: Vec::new(),
            started_at: now,
            updated_at: now,
        }
    }

    /// Overall accuracy (%) across the whole session, not just the window.
    pub fn accuracy(&self) -> f64 {
        if self.questions_answered == 0 {
            return 0.0;
        }
        (self.correct_answers as f64 / self.questions_answered as f64) * 100.0
    }
}
