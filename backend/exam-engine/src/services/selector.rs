use std::collections::HashSet;
use std::sync::Arc;

use rand::seq::IndexedRandom;

use crate::error::{EngineError, EngineResult};
use crate::models::{Difficulty, QuestionRecord};
use crate::store::QuestionBank;

/// Picks the next question for a session: exact difficulty band first, then
/// the full range, unweighted random among the eligible batch. Already
/// served ids are excluded so a question never repeats within a session.
pub struct QuestionSelector {
    bank: Arc<dyn QuestionBank>,
    batch_limit: usize,
}

impl QuestionSelector {
    pub fn new(bank: Arc<dyn QuestionBank>, batch_limit: usize) -> Self {
        Self { bank, batch_limit }
    }

    pub async fn select(
        &self,
        difficulty: Difficulty,
        categories: &[String],
        exclude: &HashSet<String>,
    ) -> EngineResult<QuestionRecord> {
        let mut pool = self
            .bank
            .find_questions(Some(difficulty), categories, exclude, self.batch_limit)
            .await?;

        if pool.is_empty() {
            tracing::debug!(
                difficulty = difficulty.as_str(),
                "no questions left at requested difficulty, widening to full range"
            );
            pool = self
                .bank
                .find_questions(None, categories, exclude, self.batch_limit)
                .await?;
        }

        pool.choose(&mut rand::rng())
            .cloned()
            .ok_or(EngineError::Exhausted)
    }
}
