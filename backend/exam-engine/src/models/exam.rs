use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::session::Difficulty;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExamStatus {
    Draft,
    Active,
    Paused,
    Completed,
}

/// Thresholds and timing knobs for the adaptive question loop.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdaptiveSettings {
    /// Window accuracy (%) at or above which difficulty rises one step.
    #[serde(default = "default_increase_threshold")]
    pub increase_threshold: f64,
    /// Window accuracy (%) at or below which difficulty drops one step.
    #[serde(default = "default_decrease_threshold")]
    pub decrease_threshold: f64,
    /// Minimum window samples before any adjustment is considered.
    #[serde(default = "default_min_questions_before_adjust")]
    pub min_questions_before_adjust: usize,
    /// Inclusive bounds (seconds) for the randomized inter-question wait.
    #[serde(default = "default_wait_time_min")]
    pub wait_time_min: u32,
    #[serde(default = "default_wait_time_max")]
    pub wait_time_max: u32,
    #[serde(default = "default_starting_difficulty")]
    pub starting_difficulty: Difficulty,
}

fn default_increase_threshold() -> f64 {
    60.0
}

fn default_decrease_threshold() -> f64 {
    40.0
}

fn default_min_questions_before_adjust() -> usize {
    2
}

fn default_wait_time_min() -> u32 {
    5
}

fn default_wait_time_max() -> u32 {
    10
}

fn default_starting_difficulty() -> Difficulty {
    Difficulty::Easy
}

impl Default for AdaptiveSettings {
    fn default() -> Self {
        Self {
            increase_threshold: default_increase_threshold(),
            decrease_threshold: default_decrease_threshold(),
            min_questions_before_adjust: default_min_questions_before_adjust(),
            wait_time_min: default_wait_time_min(),
            wait_time_max: default_wait_time_max(),
            starting_difficulty: default_starting_difficulty(),
        }
    }
}

/// Admin-authored routing rule: candidate bands for the next question after
/// a correct or wrong answer at a given difficulty.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoutingRule {
    pub correct: Vec<Difficulty>,
    pub wrong: Vec<Difficulty>,
}

pub type DifficultyRouting = HashMap<String, RoutingRule>;

/// Exam configuration. Read-only to the core: supplied by the external
/// configuration store, immutable during a run except for admin status
/// changes made outside this crate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExamConfig {
    pub id: String,
    pub title: String,
    pub status: ExamStatus,
    pub total_questions: u32,
    /// Per-question time limit in seconds.
    #[serde(default = "default_time_per_question")]
    pub time_per_question: u32,
    /// Category tag filter for question selection. Empty means no filter.
    #[serde(default)]
    pub categories: Vec<String>,
    #[serde(default)]
    pub adaptive: AdaptiveSettings,
    #[serde(default = "default_violation_threshold")]
    pub violation_threshold: u32,
    #[serde(default)]
    pub require_camera: bool,
    #[serde(default)]
    pub require_biometric: bool,
    #[serde(default)]
    pub auto_record: bool,
    /// Legacy difficulty routing table. Still persisted by the admin
    /// surface but inert here: the threshold adjuster is authoritative.
    #[serde(default)]
    pub routing: Option<DifficultyRouting>,
}

fn default_time_per_question() -> u32 {
    30
}

fn default_violation_threshold() -> u32 {
    3
}
