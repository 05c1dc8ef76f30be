use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

use super::session::Difficulty;

/// A question as the bank owns it. The core only reads these. Option order
/// is canonical: `correct_option` indexes into it and never changes, so
/// grading never re-derives correctness from shuffled text.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestionRecord {
    pub id: String,
    pub content: String,
    pub options: Vec<String>,
    /// Index of the correct option in the canonical order.
    pub correct_option: usize,
    pub difficulty: Difficulty,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// One display option of a served question. `index` points back into the
/// canonical option order and is what the candidate submits.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServedOption {
    pub index: usize,
    pub text: String,
}

/// A question prepared for delivery: options shuffled for display, answer
/// key withheld.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServedQuestion {
    pub question_id: String,
    pub content: String,
    pub options: Vec<ServedOption>,
    pub difficulty: Difficulty,
    pub question_number: u32,
    pub total_questions: u32,
    pub time_per_question: u32,
}

impl ServedQuestion {
    pub fn serve(
        record: &QuestionRecord,
        question_number: u32,
        total_questions: u32,
        time_per_question: u32,
    ) -> Self {
        let mut options: Vec<ServedOption> = record
            .options
            .iter()
            .enumerate()
            .map(|(index, text)| ServedOption {
                index,
                text: text.clone(),
            })
            .collect();
        options.shuffle(&mut rand::rng());

        Self {
            question_id: record.id.clone(),
            content: record.content.clone(),
            options,
            difficulty: record.difficulty,
            question_number,
            total_questions,
            time_per_question,
        }
    }
}

/// What the engine hands back when the client polls for the next step.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum NextStep {
    Question(ServedQuestion),
    Waiting { seconds_remaining: u32 },
    Complete,
}
