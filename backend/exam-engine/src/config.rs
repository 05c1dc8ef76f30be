use serde::Deserialize;
use std::env;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Directory the recording pipeline appends chunk files into.
    pub recordings_dir: String,
    /// Candidate batch size the selector asks the question bank for.
    pub selector_batch_limit: usize,
}

impl Config {
    pub fn load() -> Result<Self, config::ConfigError> {
        dotenvy::dotenv().ok();

        // Determine environment (defaults to dev)
        let env_name = env::var("APP_ENV").unwrap_or_else(|_| "dev".to_string());

        // Build configuration from config/*.toml + ENV overrides
        let settings = config::Config::builder()
            .add_source(
                config::File::with_name(&format!("config/{}", env_name)).required(false), // Allow missing config file, fallback to ENV
            )
            .add_source(config::Environment::with_prefix("APP").separator("__"))
            .build()?;

        let recordings_dir = settings
            .get_string("recording.dir")
            .or_else(|_| env::var("RECORDINGS_DIR"))
            .unwrap_or_else(|_| default_recordings_dir());

        let selector_batch_limit = settings
            .get_int("selector.batch_limit")
            .ok()
            .and_then(|v| usize::try_from(v).ok())
            .filter(|v| *v > 0)
            .unwrap_or_else(default_selector_batch_limit);

        Ok(Config {
            recordings_dir,
            selector_batch_limit,
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            recordings_dir: default_recordings_dir(),
            selector_batch_limit: default_selector_batch_limit(),
        }
    }
}

fn default_recordings_dir() -> String {
    "uploads/recordings".to_string()
}

fn default_selector_batch_limit() -> usize {
    10
}
