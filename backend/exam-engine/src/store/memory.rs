use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::error::EngineResult;
use crate::models::{
    AnswerResult, Difficulty, ExamConfig, QuestionRecord, RecordingSession, Session,
    ViolationRecord,
};

use super::{
    AnswerLog, ExamConfigStore, QuestionBank, RecordingStore, SessionStore, ViolationLog,
};

/// In-process store backing every port. Each map is guarded independently
/// so unrelated entities never contend; a `put` replaces the whole row,
/// which is what gives the engine its all-or-nothing session commit.
#[derive(Default)]
pub struct MemoryStore {
    exams: RwLock<HashMap<String, ExamConfig>>,
    questions: RwLock<HashMap<String, QuestionRecord>>,
    sessions: RwLock<HashMap<String, Session>>,
    /// (candidate_id, exam_id) -> session_id
    session_index: RwLock<HashMap<(String, String), String>>,
    answers: RwLock<Vec<AnswerResult>>,
    answered: RwLock<HashSet<(String, String)>>,
    violations: RwLock<Vec<ViolationRecord>>,
    recordings: RwLock<HashMap<String, RecordingSession>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert_exam(&self, exam: ExamConfig) {
        self.exams.write().await.insert(exam.id.clone(), exam);
    }

    pub async fn insert_question(&self, question: QuestionRecord) {
        self.questions
            .write()
            .await
            .insert(question.id.clone(), question);
    }

    pub async fn insert_questions(&self, questions: impl IntoIterator<Item = QuestionRecord>) {
        let mut map = self.questions.write().await;
        for question in questions {
            map.insert(question.id.clone(), question);
        }
    }

    /// Answer rows for a session, ordered by question number. For test
    /// assertions and export collaborators.
    pub async fn answers_for_session(&self, session_id: &str) -> Vec<AnswerResult> {
        let mut rows: Vec<AnswerResult> = self
            .answers
            .read()
            .await
            .iter()
            .filter(|a| a.session_id == session_id)
            .cloned()
            .collect();
        rows.sort_by_key(|a| a.question_number);
        rows
    }
}

#[async_trait]
impl ExamConfigStore for MemoryStore {
    async fn get_exam(&self, exam_id: &str) -> EngineResult<Option<ExamConfig>> {
        Ok(self.exams.read().await.get(exam_id).cloned())
    }
}

#[async_trait]
impl QuestionBank for MemoryStore {
    async fn get_question(&self, question_id: &str) -> EngineResult<Option<QuestionRecord>> {
        Ok(self.questions.read().await.get(question_id).cloned())
    }

    async fn find_questions(
        &self,
        difficulty: Option<Difficulty>,
        categories: &[String],
        exclude: &HashSet<String>,
        limit: usize,
    ) -> EngineResult<Vec<QuestionRecord>> {
        let questions = self.questions.read().await;
        let batch = questions
            .values()
            .filter(|q| difficulty.map_or(true, |d| q.difficulty == d))
            .filter(|q| categories.is_empty() || q.tags.iter().any(|t| categories.contains(t)))
            .filter(|q| !exclude.contains(&q.id))
            .take(limit)
            .cloned()
            .collect();
        Ok(batch)
    }
}

#[async_trait]
impl SessionStore for MemoryStore {
    async fn get_session(&self, session_id: &str) -> EngineResult<Option<Session>> {
        Ok(self.sessions.read().await.get(session_id).cloned())
    }

    async fn find_session(
        &self,
        candidate_id: &str,
        exam_id: &str,
    ) -> EngineResult<Option<Session>> {
        let key = (candidate_id.to_string(), exam_id.to_string());
        let session_id = match self.session_index.read().await.get(&key) {
            Some(id) => id.clone(),
            None => return Ok(None),
        };
        Ok(self.sessions.read().await.get(&session_id).cloned())
    }

    async fn put_session(&self, session: &Session) -> EngineResult<()> {
        self.session_index.write().await.insert(
            (session.candidate_id.clone(), session.exam_id.clone()),
            session.id.clone(),
        );
        self.sessions
            .write()
            .await
            .insert(session.id.clone(), session.clone());
        Ok(())
    }
}

#[async_trait]
impl AnswerLog for MemoryStore {
    async fn append_answer(&self, answer: &AnswerResult) -> EngineResult<()> {
        self.answered
            .write()
            .await
            .insert((answer.session_id.clone(), answer.question_id.clone()));
        self.answers.write().await.push(answer.clone());
        Ok(())
    }

    async fn has_answered(&self, session_id: &str, question_id: &str) -> EngineResult<bool> {
        Ok(self
            .answered
            .read()
            .await
            .contains(&(session_id.to_string(), question_id.to_string())))
    }

    async fn answered_question_ids(&self, session_id: &str) -> EngineResult<HashSet<String>> {
        Ok(self
            .answered
            .read()
            .await
            .iter()
            .filter(|(sid, _)| sid == session_id)
            .map(|(_, qid)| qid.clone())
            .collect())
    }
}

#[async_trait]
impl ViolationLog for MemoryStore {
    async fn append_violation(&self, violation: &ViolationRecord) -> EngineResult<()> {
        self.violations.write().await.push(violation.clone());
        Ok(())
    }

    async fn violations_for_session(
        &self,
        session_id: &str,
    ) -> EngineResult<Vec<ViolationRecord>> {
        Ok(self
            .violations
            .read()
            .await
            .iter()
            .filter(|v| v.session_id == session_id)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl RecordingStore for MemoryStore {
    async fn get_recording(&self, recording_id: &str) -> EngineResult<Option<RecordingSession>> {
        Ok(self.recordings.read().await.get(recording_id).cloned())
    }

    async fn put_recording(&self, recording: &RecordingSession) -> EngineResult<()> {
        self.recordings
            .write()
            .await
            .insert(recording.id.clone(), recording.clone());
        Ok(())
    }
}
