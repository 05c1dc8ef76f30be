use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::session::{Difficulty, DifficultyChange};

/// Append-only audit row for one graded submission. At most one exists per
/// (session, question) pair.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnswerResult {
    pub id: String,
    pub session_id: String,
    pub question_id: String,
    /// Canonical option index the candidate chose.
    pub chosen_option: usize,
    pub correct: bool,
    pub time_spent_seconds: u32,
    /// Session difficulty at the time of the answer.
    pub difficulty: Difficulty,
    pub question_number: u32,
    pub submitted_at: DateTime<Utc>,
}

impl AnswerResult {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        session_id: &str,
        question_id: &str,
        chosen_option: usize,
        correct: bool,
        time_spent_seconds: u32,
        difficulty: Difficulty,
        question_number: u32,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            session_id: session_id.to_string(),
            question_id: question_id.to_string(),
            chosen_option,
            correct,
            time_spent_seconds,
            difficulty,
            question_number,
            submitted_at: Utc::now(),
        }
    }
}

/// Aggregate progress returned with every grading outcome.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionStats {
    pub questions_answered: u32,
    pub correct_answers: u32,
    /// Overall accuracy (%) across the session.
    pub accuracy: f64,
    pub difficulty: Difficulty,
}

/// Result of `submit_answer`: correctness plus the updated aggregates and
/// the scheduled wait before the next question.
#[derive(Debug, Clone, Serialize)]
pub struct AnswerOutcome {
    pub correct: bool,
    /// Canonical index of the correct option, revealed after grading.
    pub correct_option: usize,
    pub wait_seconds: u32,
    pub stats: SessionStats,
    pub difficulty_change: Option<DifficultyChange>,
}
