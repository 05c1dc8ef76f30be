pub mod answer;
pub mod exam;
pub mod question;
pub mod recording;
pub mod session;
pub mod violation;

pub use answer::{AnswerOutcome, AnswerResult, SessionStats};
pub use exam::{AdaptiveSettings, DifficultyRouting, ExamConfig, ExamStatus, RoutingRule};
pub use question::{NextStep, QuestionRecord, ServedOption, ServedQuestion};
pub use recording::{RecordingSession, RecordingStatus, StopOutcome};
pub use session::{
    Difficulty, DifficultyChange, DifficultyShift, RecentWindow, Session, SessionStatus,
    RECENT_WINDOW_SIZE,
};
pub use violation::{ViolationOutcome, ViolationRecord, ViolationType};
