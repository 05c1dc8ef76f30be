mod common;

use common::{create_test_state, fast_exam, seed_bank};
use examgate_engine::models::{NextStep, SessionStatus, ViolationType};
use examgate_engine::store::ViolationLog;

#[tokio::test]
async fn violations_count_below_threshold() {
    let (state, _dir) = create_test_state().await;
    state.store.insert_exam(fast_exam("exam-1", 5)).await;
    seed_bank(&state, 5).await;

    let session = state.engine.start_session("alice", "exam-1").await.unwrap();

    let first = state
        .engine
        .log_violation(&session.id, ViolationType::TabSwitch, None)
        .await
        .unwrap();
    assert_eq!(first.count, 1);
    assert!(!first.auto_submit);

    let second = state
        .engine
        .log_violation(
            &session.id,
            ViolationType::WindowBlur,
            Some("focus lost for 4s".to_string()),
        )
        .await
        .unwrap();
    assert_eq!(second.count, 2);
    assert!(!second.auto_submit);

    // The session is untouched below the threshold.
    let after = state.engine.get_session(&session.id).await.unwrap();
    assert_eq!(after.status, SessionStatus::NotStarted);
    assert_eq!(after.violations, 2);
}

#[tokio::test]
async fn threshold_terminates_the_session() {
    let (state, _dir) = create_test_state().await;
    state.store.insert_exam(fast_exam("exam-1", 5)).await;
    seed_bank(&state, 5).await;

    let session = state.engine.start_session("alice", "exam-1").await.unwrap();
    // Put a question on the table so termination has state to clear.
    let served = match state.engine.next_question(&session.id).await.unwrap() {
        NextStep::Question(q) => q,
        other => panic!("expected a question, got {:?}", other),
    };

    for _ in 0..2 {
        state
            .engine
            .log_violation(&session.id, ViolationType::TabSwitch, None)
            .await
            .unwrap();
    }
    let third = state
        .engine
        .log_violation(&session.id, ViolationType::FullscreenExit, None)
        .await
        .unwrap();
    assert_eq!(third.count, 3);
    assert!(third.auto_submit);

    let after = state.engine.get_session(&session.id).await.unwrap();
    assert_eq!(after.status, SessionStatus::Terminated);
    assert!(after.current_question.is_none());
    assert!(after.wait_until.is_none());

    // A terminated session serves nothing and grades nothing.
    assert!(state
        .engine
        .next_question(&session.id)
        .await
        .unwrap_err()
        .is_conflict());
    assert!(state
        .engine
        .submit_answer(&session.id, &served.question_id, 1, 5)
        .await
        .unwrap_err()
        .is_conflict());
}

#[tokio::test]
async fn violations_keep_counting_after_termination() {
    let (state, _dir) = create_test_state().await;
    state.store.insert_exam(fast_exam("exam-1", 5)).await;
    seed_bank(&state, 5).await;

    let session = state.engine.start_session("alice", "exam-1").await.unwrap();
    for _ in 0..3 {
        state
            .engine
            .log_violation(&session.id, ViolationType::TabSwitch, None)
            .await
            .unwrap();
    }

    // Evidence still accrues against the terminated session.
    let fourth = state
        .engine
        .log_violation(&session.id, ViolationType::MultipleFaces, None)
        .await
        .unwrap();
    assert_eq!(fourth.count, 4);
    assert!(fourth.auto_submit);

    let after = state.engine.get_session(&session.id).await.unwrap();
    assert_eq!(after.status, SessionStatus::Terminated);
    assert_eq!(after.violations, 4);

    let trail = state.store.violations_for_session(&session.id).await.unwrap();
    assert_eq!(trail.len(), 4);
}

#[tokio::test]
async fn completed_session_rejects_violations() {
    let (state, _dir) = create_test_state().await;
    state.store.insert_exam(fast_exam("exam-1", 1)).await;
    seed_bank(&state, 2).await;

    let session = state.engine.start_session("alice", "exam-1").await.unwrap();
    let served = match state.engine.next_question(&session.id).await.unwrap() {
        NextStep::Question(q) => q,
        other => panic!("expected a question, got {:?}", other),
    };
    state
        .engine
        .submit_answer(&session.id, &served.question_id, 1, 5)
        .await
        .unwrap();
    let step = state.engine.next_question(&session.id).await.unwrap();
    assert!(matches!(step, NextStep::Complete));

    let err = state
        .engine
        .log_violation(&session.id, ViolationType::TabSwitch, None)
        .await
        .unwrap_err();
    assert!(err.is_conflict());
}
