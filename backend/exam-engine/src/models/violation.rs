use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Proctoring-policy breach categories reported by the monitoring client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViolationType {
    TabSwitch,
    WindowBlur,
    CameraDisabled,
    FullscreenExit,
    FaceNotVisible,
    MultipleFaces,
    Other,
}

impl ViolationType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ViolationType::TabSwitch => "tab_switch",
            ViolationType::WindowBlur => "window_blur",
            ViolationType::CameraDisabled => "camera_disabled",
            ViolationType::FullscreenExit => "fullscreen_exit",
            ViolationType::FaceNotVisible => "face_not_visible",
            ViolationType::MultipleFaces => "multiple_faces",
            ViolationType::Other => "other",
        }
    }
}

/// Append-only audit row, one per reported violation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ViolationRecord {
    pub id: String,
    pub session_id: String,
    pub violation_type: ViolationType,
    pub details: Option<String>,
    pub timestamp: DateTime<Utc>,
}

impl ViolationRecord {
    pub fn new(session_id: &str, violation_type: ViolationType, details: Option<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            session_id: session_id.to_string(),
            violation_type,
            details,
            timestamp: Utc::now(),
        }
    }
}

/// Returned from `log_violation`. `auto_submit` tells the proctoring client
/// to stop its capture and navigate the candidate away.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct ViolationOutcome {
    pub count: u32,
    pub auto_submit: bool,
}
