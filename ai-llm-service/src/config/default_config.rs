//! Default LLM configs resolved from environment variables.
//!
//! Currently one profile is provided:
//!
//! - **Review** → JSON-mode generation with low, fixed sampling so the
//!   reply stays parseable.
//!
//! # Environment variables
//!
//! - `OLLAMA_URL` or `OLLAMA_PORT` = endpoint (optional)
//! - `REVIEW_TIMEOUT_SECS`         = request timeout, seconds (optional)

use crate::config::llm_model_config::LlmModelConfig;

/// Fallback endpoint when neither `OLLAMA_URL` nor `OLLAMA_PORT` is set.
const DEFAULT_ENDPOINT: &str = "http://localhost:11434";

/// Default request timeout for the review profile, seconds.
const DEFAULT_REVIEW_TIMEOUT_SECS: u64 = 90;

/// Resolves the Ollama endpoint from environment.
///
/// Precedence:
/// 1. `OLLAMA_URL` if present and non-empty
/// 2. `OLLAMA_PORT` → `http://localhost:{port}`
/// 3. built-in default `http://localhost:11434`
fn ollama_endpoint() -> String {
    if let Ok(url) = std::env::var("OLLAMA_URL") {
        if !url.trim().is_empty() {
            return url;
        }
    }
    if let Ok(port) = std::env::var("OLLAMA_PORT") {
        if !port.trim().is_empty() {
            return format!("http://localhost:{port}");
        }
    }
    DEFAULT_ENDPOINT.to_string()
}

/// Constructs the config for the **review** profile.
///
/// Sampling is pinned low (`temperature = 0.2`, `top_p = 0.9`) so the
/// JSON-mode reply stays stable and parseable.
///
/// # Env
/// - `OLLAMA_URL` / `OLLAMA_PORT` (optional)
/// - `REVIEW_TIMEOUT_SECS` (optional, default 90)
pub fn config_ollama_review(model: impl Into<String>) -> LlmModelConfig {
    let timeout_secs = std::env::var("REVIEW_TIMEOUT_SECS")
        .ok()
        .and_then(|s| s.parse::<u64>().ok())
        .unwrap_or(DEFAULT_REVIEW_TIMEOUT_SECS);

    LlmModelConfig {
        model: model.into(),
        endpoint: ollama_endpoint(),
        max_tokens: None,
        temperature: Some(0.2),
        top_p: Some(0.9),
        timeout_secs: Some(timeout_secs),
    }
}
