#![allow(dead_code)]

use std::sync::Arc;

use tempfile::TempDir;

use examgate_engine::config::Config;
use examgate_engine::models::{
    AdaptiveSettings, Difficulty, ExamConfig, ExamStatus, QuestionRecord,
};
use examgate_engine::services::AppState;

/// Builds the wired state against a throwaway recordings directory. The
/// `TempDir` guard must outlive the test or the directory vanishes.
pub async fn create_test_state() -> (Arc<AppState>, TempDir) {
    // Initialize tracing for tests
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();

    let recordings_dir = tempfile::tempdir().expect("failed to create recordings tempdir");
    let config = Config {
        recordings_dir: recordings_dir.path().to_string_lossy().into_owned(),
        selector_batch_limit: 10,
    };

    (Arc::new(AppState::new(config)), recordings_dir)
}

/// Exam with zero wait so test flows never sleep.
pub fn fast_exam(id: &str, total_questions: u32) -> ExamConfig {
    exam_with(
        id,
        total_questions,
        AdaptiveSettings {
            wait_time_min: 0,
            wait_time_max: 0,
            ..Default::default()
        },
    )
}

pub fn exam_with(id: &str, total_questions: u32, adaptive: AdaptiveSettings) -> ExamConfig {
    ExamConfig {
        id: id.to_string(),
        title: format!("Exam {}", id),
        status: ExamStatus::Active,
        total_questions,
        time_per_question: 30,
        categories: vec![],
        adaptive,
        violation_threshold: 3,
        require_camera: false,
        require_biometric: false,
        auto_record: false,
        routing: None,
    }
}

pub fn question(id: &str, difficulty: Difficulty) -> QuestionRecord {
    QuestionRecord {
        id: id.to_string(),
        content: format!("question {}", id),
        options: vec!["a".into(), "b".into(), "c".into(), "d".into()],
        // Correct answer is always canonical index 1.
        correct_option: 1,
        difficulty,
        tags: vec![],
    }
}

/// Seeds a bank deep enough that a session never exhausts it mid-test.
pub async fn seed_bank(state: &AppState, per_band: usize) {
    let mut questions = Vec::new();
    for band in [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard] {
        for i in 0..per_band {
            questions.push(question(&format!("{}-{}", band.as_str(), i), band));
        }
    }
    state.store.insert_questions(questions).await;
}
