//! Threshold-based difficulty adjuster. Deterministic over the rolling
//! window contents; the legacy routing table on `ExamConfig` is inert.

use crate::models::{AdaptiveSettings, Difficulty, DifficultyChange, RecentWindow};

/// Evaluates the rolling window against the exam thresholds and returns the
/// one-step adjustment, if any. Windows smaller than
/// `min_questions_before_adjust` never adjust.
pub fn evaluate(
    window: &RecentWindow,
    settings: &AdaptiveSettings,
    current: Difficulty,
) -> Option<DifficultyChange> {
    if window.len() < settings.min_questions_before_adjust {
        return None;
    }

    let accuracy = window.accuracy();
    let next = if accuracy >= settings.increase_threshold {
        current.step_up()
    } else if accuracy <= settings.decrease_threshold {
        current.step_down()
    } else {
        current
    };

    if next == current {
        None
    } else {
        Some(DifficultyChange {
            from: current,
            to: next,
            accuracy,
        })
    }
}
