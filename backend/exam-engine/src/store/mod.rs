//! Persistence ports. The engine never talks to a concrete database: the
//! external collaborators of the core (exam configuration store, question
//! bank, session/answer/violation/recording storage) are trait objects with
//! read-after-write consistency per entity. `MemoryStore` is the in-process
//! implementation the crate ships.

use std::collections::HashSet;

use async_trait::async_trait;

use crate::error::EngineResult;
use crate::models::{
    AnswerResult, Difficulty, ExamConfig, QuestionRecord, RecordingSession, Session,
    ViolationRecord,
};

/// Read-only access to exam configuration.
#[async_trait]
pub trait ExamConfigStore: Send + Sync {
    async fn get_exam(&self, exam_id: &str) -> EngineResult<Option<ExamConfig>>;
}

/// Read-only access to the question bank.
#[async_trait]
pub trait QuestionBank: Send + Sync {
    async fn get_question(&self, question_id: &str) -> EngineResult<Option<QuestionRecord>>;

    /// A candidate batch matching the filter, capped at `limit`.
    /// `difficulty = None` means any band; an empty `categories` slice means
    /// no tag filter.
    async fn find_questions(
        &self,
        difficulty: Option<Difficulty>,
        categories: &[String],
        exclude: &HashSet<String>,
        limit: usize,
    ) -> EngineResult<Vec<QuestionRecord>>;
}

/// Durable session state. Sessions are never deleted, only replaced.
#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn get_session(&self, session_id: &str) -> EngineResult<Option<Session>>;

    async fn find_session(
        &self,
        candidate_id: &str,
        exam_id: &str,
    ) -> EngineResult<Option<Session>>;

    async fn put_session(&self, session: &Session) -> EngineResult<()>;
}

/// Append-only answer audit trail.
#[async_trait]
pub trait AnswerLog: Send + Sync {
    async fn append_answer(&self, answer: &AnswerResult) -> EngineResult<()>;

    async fn has_answered(&self, session_id: &str, question_id: &str) -> EngineResult<bool>;

    async fn answered_question_ids(&self, session_id: &str) -> EngineResult<HashSet<String>>;
}

/// Append-only violation audit trail.
#[async_trait]
pub trait ViolationLog: Send + Sync {
    async fn append_violation(&self, violation: &ViolationRecord) -> EngineResult<()>;

    async fn violations_for_session(&self, session_id: &str)
        -> EngineResult<Vec<ViolationRecord>>;
}

/// Recording metadata rows, owned by the recording pipeline.
#[async_trait]
pub trait RecordingStore: Send + Sync {
    async fn get_recording(&self, recording_id: &str) -> EngineResult<Option<RecordingSession>>;

    async fn put_recording(&self, recording: &RecordingSession) -> EngineResult<()>;
}

pub mod memory;

pub use memory::MemoryStore;
