//! Public entry for the snippet review pipeline.
//!
//! Single high-level function to run the whole pipeline for one request:
//!
//! 1) **Config** — load the review config file, absorbing any failure into
//!    the built-in defaults.
//! 2) **Heuristics** — deterministic findings, Python sources only; other
//!    language tags skip the analyzer entirely.
//! 3) **Prompt** — truncate the code to the configured character budget and
//!    build the strict-JSON review prompt.
//! 4) **Backend** — one bounded `/api/generate` call in JSON output mode.
//!    This is the only failure that aborts the request: a timeout or
//!    transport error surfaces as [`errors::Error`], with no
//!    heuristics-only fallback.
//! 5) **Merge** — fold heuristic and model findings into one ordered list
//!    and attach size/cost telemetry.
//!
//! The pipeline holds no shared mutable state: the config is re-read and
//! the backend client rebuilt per request, so concurrent reviews are
//! independent.

pub mod config;
pub mod errors;
pub mod heuristics;
pub mod merge;
pub mod prompt;
pub mod types;

use std::path::Path;
use std::time::Instant;

use tracing::{debug, info};

use ai_llm_service::config::default_config::config_ollama_review;
use ai_llm_service::services::ollama_service::OllamaService;

use config::ReviewConfig;
use errors::Error;
use types::{ReviewRequest, ReviewResult};

/// Run the full review pipeline for one request.
///
/// # Errors
/// [`Error::BackendTimeout`] when the generation call exceeds its timeout,
/// [`Error::BackendUnavailable`] for any other backend failure. Config and
/// model-output problems never error; they degrade the result instead.
pub async fn run_review(config_path: &Path, req: &ReviewRequest) -> Result<ReviewResult, Error> {
    let t0 = Instant::now();

    debug!("review: load config from {}", config_path.display());
    let cfg = ReviewConfig::load(config_path);

    let (fixes, suggestions) = if heuristics::is_python_tag(&req.lang) {
        heuristics::analyze(&req.code)
    } else {
        (Vec::new(), Vec::new())
    };
    debug!(
        "review: heuristics lang={} fixes={} suggestions={}",
        req.lang,
        fixes.len(),
        suggestions.len()
    );

    let excerpt = truncate_chars(&req.code, cfg.max_context_chars);
    let prompt = prompt::build_prompt(&cfg.guidelines, &req.path, &req.lang, excerpt);
    debug!(
        "review: prompt built, model={} prompt_chars={}",
        cfg.model,
        prompt.chars().count()
    );

    let svc = OllamaService::new(config_ollama_review(cfg.model.clone()))?;
    let generation = svc.generate(&prompt).await?;
    debug!(
        "review: generation done, response_chars={}",
        generation.response.chars().count()
    );

    let result = merge::merge_review(
        &generation.response,
        fixes,
        suggestions,
        &generation.usage,
        &prompt,
        &cfg,
    );

    info!(
        "review: done path={} comments={} in {} ms",
        req.path,
        result.comments.len(),
        t0.elapsed().as_millis()
    );

    Ok(result)
}

/// Truncate to at most `max` characters without splitting a UTF-8 sequence.
fn truncate_chars(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}
