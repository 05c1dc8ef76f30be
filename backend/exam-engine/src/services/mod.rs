use std::path::PathBuf;
use std::sync::Arc;

use crate::config::Config;
use crate::store::MemoryStore;

pub mod difficulty;
pub mod engine;
pub mod recording;
pub mod selector;
pub mod violations;
pub mod wait_gate;

pub use engine::ExamEngine;
pub use recording::RecordingService;
pub use selector::QuestionSelector;
pub use violations::ViolationTracker;

/// Wired application state: the engine and the recording pipeline sharing
/// one store. Embedders hold this behind an `Arc`.
pub struct AppState {
    pub config: Config,
    pub store: Arc<MemoryStore>,
    pub engine: ExamEngine,
    pub recordings: RecordingService,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let store = Arc::new(MemoryStore::new());

        let selector = QuestionSelector::new(store.clone(), config.selector_batch_limit);
        let violations = ViolationTracker::new(store.clone());
        let engine = ExamEngine::new(
            store.clone(),
            store.clone(),
            store.clone(),
            store.clone(),
            selector,
            violations,
        );
        let recordings =
            RecordingService::new(store.clone(), PathBuf::from(&config.recordings_dir));

        Self {
            config,
            store,
            engine,
            recordings,
        }
    }
}
