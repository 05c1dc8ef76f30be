//! Adaptive exam session engine with proctoring recording ingest.
//!
//! The engine drives a candidate's run through a timed exam: idempotent
//! session start, polled question delivery behind a randomized wait gate,
//! grading against a canonical answer key, rolling-window difficulty
//! adjustment, and violation tracking with auto-submit at the exam's
//! threshold. A separate recording pipeline ingests proctoring video
//! chunks; its failures never affect the exam session itself.
//!
//! Persistence is behind the ports in [`store`]; [`store::MemoryStore`] is
//! the in-process implementation.

pub mod config;
pub mod error;
pub mod metrics;
pub mod models;
pub mod services;
pub mod store;
pub mod utils;

pub use config::Config;
pub use error::{EngineError, EngineResult};
pub use services::{AppState, ExamEngine, RecordingService};
