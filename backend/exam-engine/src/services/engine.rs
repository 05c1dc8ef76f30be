use std::sync::Arc;

use chrono::Utc;

use crate::error::{EngineError, EngineResult};
use crate::metrics::{
    ANSWERS_SUBMITTED_TOTAL, DIFFICULTY_ADJUSTMENTS_TOTAL, SESSIONS_ACTIVE, SESSIONS_TOTAL,
};
use crate::models::{
    AnswerOutcome, AnswerResult, DifficultyShift, ExamConfig, NextStep, ServedQuestion, Session,
    SessionStats, SessionStatus, ViolationOutcome, ViolationType,
};
use crate::services::selector::QuestionSelector;
use crate::services::violations::ViolationTracker;
use crate::services::{difficulty, wait_gate};
use crate::store::{AnswerLog, ExamConfigStore, QuestionBank, SessionStore};
use crate::utils::locks::KeyedLocks;
use crate::utils::retry::{retry_with_config, RetryConfig};

/// The exam session core: lifecycle, question delivery, grading, adaptive
/// difficulty, and violation handling. Every mutation of a session runs
/// under that session's lock, so interleaved calls for the same candidate
/// serialize while distinct sessions proceed in parallel.
pub struct ExamEngine {
    exams: Arc<dyn ExamConfigStore>,
    sessions: Arc<dyn SessionStore>,
    answers: Arc<dyn AnswerLog>,
    bank: Arc<dyn QuestionBank>,
    selector: QuestionSelector,
    violations: ViolationTracker,
    locks: KeyedLocks,
}

impl ExamEngine {
    pub fn new(
        exams: Arc<dyn ExamConfigStore>,
        sessions: Arc<dyn SessionStore>,
        answers: Arc<dyn AnswerLog>,
        bank: Arc<dyn QuestionBank>,
        selector: QuestionSelector,
        violations: ViolationTracker,
    ) -> Self {
        Self {
            exams,
            sessions,
            answers,
            bank,
            selector,
            violations,
            locks: KeyedLocks::new(),
        }
    }

    /// Opens (or re-opens) a session for a candidate on an active exam.
    /// Idempotent: a second start for the same (candidate, exam) pair
    /// returns the existing session unchanged.
    pub async fn start_session(&self, candidate_id: &str, exam_id: &str) -> EngineResult<Session> {
        let exam = self.active_exam(exam_id).await?;

        // Lock on the pair so two concurrent starts cannot both miss the
        // lookup and create twin sessions.
        let key = format!("{}:{}", candidate_id, exam_id);
        let _guard = self.locks.acquire(&key).await;

        if let Some(existing) = self.sessions.find_session(candidate_id, exam_id).await? {
            tracing::info!(
                session_id = %existing.id,
                candidate_id,
                exam_id,
                "start requested for existing session"
            );
            return Ok(existing);
        }

        let session = Session::new(candidate_id, exam_id, exam.adaptive.starting_difficulty);
        self.put_session(&session).await?;

        SESSIONS_TOTAL.with_label_values(&["created"]).inc();
        SESSIONS_ACTIVE.inc();
        tracing::info!(
            session_id = %session.id,
            candidate_id,
            exam_id,
            starting_difficulty = session.difficulty.as_str(),
            "session created"
        );
        Ok(session)
    }

    /// Polls for the next step of the session: a served question, the
    /// remaining wait, or completion. Also the resume path: an unanswered
    /// current question is re-served rather than re-drawn.
    pub async fn next_question(&self, session_id: &str) -> EngineResult<NextStep> {
        let _guard = self.locks.acquire(session_id).await;

        let mut session = self.fetch_session(session_id).await?;
        if session.status.is_terminal() {
            return Err(EngineError::conflict(format!(
                "session {} is {}",
                session_id,
                status_name(session.status)
            )));
        }

        let exam = self.exam(&session.exam_id).await?;

        // Completion wins over any pending wait: the final answer's gate
        // never delays the result screen.
        if session.questions_answered >= exam.total_questions {
            session.status = SessionStatus::Completed;
            session.wait_until = None;
            session.current_question = None;
            self.put_session(&session).await?;

            SESSIONS_TOTAL.with_label_values(&["completed"]).inc();
            SESSIONS_ACTIVE.dec();
            tracing::info!(
                session_id,
                questions_answered = session.questions_answered,
                correct_answers = session.correct_answers,
                "session completed"
            );
            return Ok(NextStep::Complete);
        }

        if session.status == SessionStatus::Waiting {
            if let Some(wait_until) = session.wait_until {
                let remaining = wait_gate::remaining_seconds(wait_until, Utc::now());
                if remaining > 0 {
                    return Ok(NextStep::Waiting {
                        seconds_remaining: remaining,
                    });
                }
            }
            session.status = SessionStatus::InProgress;
            session.wait_until = None;
        }

        if session.status == SessionStatus::NotStarted {
            session.status = SessionStatus::InProgress;
        }

        let question_number = session.questions_answered + 1;

        // Resume: re-serve the question already on the table, freshly
        // shuffled, without drawing a new one.
        if let Some(current_id) = session.current_question.clone() {
            if let Some(record) = self.bank.get_question(&current_id).await? {
                let served = ServedQuestion::serve(
                    &record,
                    question_number,
                    exam.total_questions,
                    exam.time_per_question,
                );
                self.put_session(&session).await?;
                return Ok(NextStep::Question(served));
            }
            tracing::warn!(
                session_id,
                question_id = %current_id,
                "current question vanished from the bank, drawing a replacement"
            );
            session.current_question = None;
        }

        let exclude = self.answers.answered_question_ids(session_id).await?;
        let record = self
            .selector
            .select(session.difficulty, &exam.categories, &exclude)
            .await?;

        session.current_question = Some(record.id.clone());
        self.put_session(&session).await?;

        let served = ServedQuestion::serve(
            &record,
            question_number,
            exam.total_questions,
            exam.time_per_question,
        );
        tracing::debug!(
            session_id,
            question_id = %record.id,
            question_number,
            difficulty = record.difficulty.as_str(),
            "question served"
        );
        Ok(NextStep::Question(served))
    }

    /// Grades a submission against the canonical answer key, updates the
    /// rolling window and difficulty, and schedules the wait gate. Exactly
    /// one grading per (session, question): duplicates get `Conflict`.
    pub async fn submit_answer(
        &self,
        session_id: &str,
        question_id: &str,
        chosen_option: usize,
        time_spent_seconds: u32,
    ) -> EngineResult<AnswerOutcome> {
        let _guard = self.locks.acquire(session_id).await;

        let mut session = self.fetch_session(session_id).await?;
        if session.status != SessionStatus::InProgress {
            return Err(EngineError::conflict(format!(
                "session {} is {}, not accepting answers",
                session_id,
                status_name(session.status)
            )));
        }

        if self.answers.has_answered(session_id, question_id).await? {
            return Err(EngineError::conflict(format!(
                "question {} already answered in session {}",
                question_id, session_id
            )));
        }

        let record = self
            .bank
            .get_question(question_id)
            .await?
            .ok_or_else(|| EngineError::not_found(format!("question {}", question_id)))?;
        if chosen_option >= record.options.len() {
            return Err(EngineError::conflict(format!(
                "option index {} out of range for question {}",
                chosen_option, question_id
            )));
        }

        let exam = self.exam(&session.exam_id).await?;
        let correct = chosen_option == record.correct_option;
        let question_number = session.questions_answered + 1;

        // The audit row lands first so a retry after a failed session
        // write is rejected as a duplicate instead of double-counting.
        let answer = AnswerResult::new(
            session_id,
            question_id,
            chosen_option,
            correct,
            time_spent_seconds,
            session.difficulty,
            question_number,
        );
        self.answers.append_answer(&answer).await?;

        session.questions_answered = question_number;
        if correct {
            session.correct_answers += 1;
        }
        session.recent_results.push(correct);

        let change = difficulty::evaluate(&session.recent_results, &exam.adaptive, session.difficulty);
        if let Some(change) = change {
            session.difficulty = change.to;
            session.difficulty_history.push(DifficultyShift {
                question_number,
                from: change.from,
                to: change.to,
                accuracy: change.accuracy,
                timestamp: Utc::now(),
            });
            let direction = if change.to > change.from { "up" } else { "down" };
            DIFFICULTY_ADJUSTMENTS_TOTAL
                .with_label_values(&[direction])
                .inc();
            tracing::info!(
                session_id,
                from = change.from.as_str(),
                to = change.to.as_str(),
                window_accuracy = change.accuracy,
                "difficulty adjusted"
            );
        }

        let (wait_seconds, wait_until) = wait_gate::schedule(&exam.adaptive, Utc::now());
        session.status = SessionStatus::Waiting;
        session.wait_until = Some(wait_until);
        session.current_question = None;
        self.put_session(&session).await?;

        ANSWERS_SUBMITTED_TOTAL
            .with_label_values(&[if correct { "true" } else { "false" }])
            .inc();
        tracing::debug!(
            session_id,
            question_id,
            correct,
            question_number,
            wait_seconds,
            "answer graded"
        );

        Ok(AnswerOutcome {
            correct,
            correct_option: record.correct_option,
            wait_seconds,
            stats: SessionStats {
                questions_answered: session.questions_answered,
                correct_answers: session.correct_answers,
                accuracy: session.accuracy(),
                difficulty: session.difficulty,
            },
            difficulty_change: change,
        })
    }

    /// Records a proctoring violation. At the exam's threshold the session
    /// is terminated (auto-submitted); violations against an already
    /// terminated session still count, only a completed session rejects
    /// them.
    pub async fn log_violation(
        &self,
        session_id: &str,
        violation_type: ViolationType,
        details: Option<String>,
    ) -> EngineResult<ViolationOutcome> {
        let _guard = self.locks.acquire(session_id).await;

        let mut session = self.fetch_session(session_id).await?;
        if session.status == SessionStatus::Completed {
            return Err(EngineError::conflict(format!(
                "session {} already completed",
                session_id
            )));
        }

        let exam = self.exam(&session.exam_id).await?;
        let outcome = self
            .violations
            .record(&mut session, violation_type, details, exam.violation_threshold)
            .await?;

        if outcome.auto_submit && session.status != SessionStatus::Terminated {
            session.status = SessionStatus::Terminated;
            session.wait_until = None;
            session.current_question = None;

            SESSIONS_TOTAL.with_label_values(&["terminated"]).inc();
            SESSIONS_ACTIVE.dec();
            tracing::warn!(
                session_id,
                violations = outcome.count,
                "session terminated by violation threshold"
            );
        }
        self.put_session(&session).await?;

        Ok(outcome)
    }

    pub async fn get_session(&self, session_id: &str) -> EngineResult<Session> {
        self.fetch_session(session_id).await
    }

    async fn fetch_session(&self, session_id: &str) -> EngineResult<Session> {
        self.sessions
            .get_session(session_id)
            .await?
            .ok_or_else(|| EngineError::not_found(format!("session {}", session_id)))
    }

    async fn exam(&self, exam_id: &str) -> EngineResult<ExamConfig> {
        self.exams
            .get_exam(exam_id)
            .await?
            .ok_or_else(|| EngineError::not_found(format!("exam {}", exam_id)))
    }

    /// An exam that exists and is accepting sessions. Used only by
    /// `start_session`: an exam paused mid-run does not break sessions
    /// already in flight.
    async fn active_exam(&self, exam_id: &str) -> EngineResult<ExamConfig> {
        let exam = self.exam(exam_id).await?;
        if exam.status != crate::models::ExamStatus::Active {
            return Err(EngineError::not_found(format!("active exam {}", exam_id)));
        }
        Ok(exam)
    }

    async fn put_session(&self, session: &Session) -> EngineResult<()> {
        let mut updated = session.clone();
        updated.updated_at = Utc::now();
        let updated = &updated;
        retry_with_config(RetryConfig::default(), || async move {
            self.sessions.put_session(updated).await
        })
        .await
    }
}

fn status_name(status: SessionStatus) -> &'static str {
    match status {
        SessionStatus::NotStarted => "not_started",
        SessionStatus::InProgress => "in_progress",
        SessionStatus::Waiting => "waiting",
        SessionStatus::Completed => "completed",
        SessionStatus::Terminated => "terminated",
    }
}
