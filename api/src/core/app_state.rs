use std::path::PathBuf;

/// Shared state for all HTTP handlers.
///
/// Only immutable settings live here; the review config file itself is
/// re-read by the pipeline on every request.
#[derive(Clone)]
pub struct AppState {
    /// Path of the review configuration file.
    pub config_path: PathBuf,
}

impl AppState {
    /// Load shared state from environment variables.
    pub fn from_env() -> Self {
        Self {
            config_path: std::env::var("REVIEW_CONFIG_PATH")
                .unwrap_or_else(|_| code_reviewer::config::DEFAULT_CONFIG_PATH.to_string())
                .into(),
        }
    }
}
