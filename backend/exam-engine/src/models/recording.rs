use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordingStatus {
    Recording,
    Completed,
    Failed,
}

/// One proctoring recording attempt for an (exam, session) pair. Owned
/// exclusively by the recording pipeline; sealed on stop or on the first
/// append failure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordingSession {
    pub id: String,
    pub exam_id: String,
    pub session_id: String,
    pub file_name: String,
    pub file_path: PathBuf,
    pub started_at: DateTime<Utc>,
    pub ended_at: Option<DateTime<Utc>>,
    pub status: RecordingStatus,
    pub chunks_received: u64,
    pub file_size_bytes: u64,
    pub duration_seconds: Option<i64>,
    pub error_message: Option<String>,
}

impl RecordingSession {
    pub fn new(exam_id: &str, session_id: &str, file_name: String, file_path: PathBuf) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            exam_id: exam_id.to_string(),
            session_id: session_id.to_string(),
            file_name,
            file_path,
            started_at: Utc::now(),
            ended_at: None,
            status: RecordingStatus::Recording,
            chunks_received: 0,
            file_size_bytes: 0,
            duration_seconds: None,
            error_message: None,
        }
    }
}

/// Final figures reported by `stop_recording`.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct StopOutcome {
    pub duration_seconds: i64,
    pub total_size_bytes: u64,
}
