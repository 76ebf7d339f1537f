//! Health probe for the generation backend.
//!
//! One lightweight check: `GET {endpoint}/api/tags`, with a best-effort
//! model existence test against the returned tag list. The returned
//! [`HealthStatus`] is JSON-serializable and suitable for a `/health`
//! endpoint. [`HealthService::check`] is resilient and never fails
//! (errors are mapped to `ok = false`); the inner probe returns a strict
//! `Result`.

use std::time::{Duration, Instant};

use serde::Serialize;
use tracing::{debug, warn};

use crate::config::llm_model_config::LlmModelConfig;
use crate::error_handler::{AiLlmError, make_snippet, validate_http_endpoint};

/// A serializable health snapshot for one backend config.
#[derive(Debug, Clone, Serialize)]
pub struct HealthStatus {
    /// Target endpoint base URL.
    pub endpoint: String,
    /// Model identifier relevant to the probe.
    pub model: String,
    /// Overall health flag.
    pub ok: bool,
    /// Measured HTTP latency in milliseconds for the probe.
    pub latency_ms: u128,
    /// Short human-readable message with details.
    pub message: String,
}

impl HealthStatus {
    fn ok(cfg: &LlmModelConfig, latency_ms: u128, message: impl Into<String>) -> Self {
        Self {
            endpoint: cfg.endpoint.clone(),
            model: cfg.model.clone(),
            ok: true,
            latency_ms,
            message: message.into(),
        }
    }

    fn fail(cfg: &LlmModelConfig, latency_ms: u128, message: impl Into<String>) -> Self {
        Self {
            endpoint: cfg.endpoint.clone(),
            model: cfg.model.clone(),
            ok: false,
            latency_ms,
            message: message.into(),
        }
    }
}

/// Health checker that reuses a single HTTP client.
///
/// Probes run with the service's own timeout, independent of the (much
/// longer) generation timeout in the config being checked.
pub struct HealthService {
    client: reqwest::Client,
}

impl HealthService {
    /// Creates a new health service with an optional probe timeout (seconds).
    ///
    /// # Errors
    /// Returns [`AiLlmError::Transport`] if the HTTP client cannot be built.
    pub fn new(timeout_secs: Option<u64>) -> Result<Self, AiLlmError> {
        let timeout = Duration::from_secs(timeout_secs.unwrap_or(10));
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(AiLlmError::from)?;

        Ok(Self { client })
    }

    /// Checks health for one backend config.
    ///
    /// This method is **resilient**: it never returns an error. Any failure
    /// is converted to `HealthStatus { ok: false, message: ... }`.
    pub async fn check(&self, cfg: &LlmModelConfig) -> HealthStatus {
        if validate_http_endpoint(&cfg.endpoint).is_err() {
            warn!(endpoint = %cfg.endpoint, "invalid endpoint (empty or missing http/https)");
            return HealthStatus::fail(cfg, 0, "endpoint is empty or missing http/https");
        }

        let start = Instant::now();
        match self.try_probe(cfg).await {
            Ok(status) => {
                debug!(
                    endpoint = %status.endpoint,
                    model = %status.model,
                    ok = status.ok,
                    latency_ms = status.latency_ms,
                    "health probe completed"
                );
                status
            }
            Err(err) => {
                let status = HealthStatus::fail(cfg, start.elapsed().as_millis(), err.to_string());
                warn!(
                    endpoint = %status.endpoint,
                    model = %status.model,
                    latency_ms = status.latency_ms,
                    message = %status.message,
                    "health probe failed"
                );
                status
            }
        }
    }

    /// Strict probe. Returns an error on hard failures.
    ///
    /// - `GET {endpoint}/api/tags`
    /// - Ensure 2xx
    /// - Best-effort: verify `cfg.model` exists in the returned tags
    async fn try_probe(&self, cfg: &LlmModelConfig) -> Result<HealthStatus, AiLlmError> {
        let url = format!("{}/api/tags", cfg.endpoint.trim_end_matches('/'));

        let start = Instant::now();
        debug!(model = %cfg.model, "GET {}", url);

        let resp = self.client.get(&url).send().await?;
        let latency = start.elapsed().as_millis();

        if !resp.status().is_success() {
            let status = resp.status();
            let text = resp.text().await.unwrap_or_default();
            return Err(AiLlmError::HttpStatus {
                status,
                url,
                snippet: make_snippet(&text),
            });
        }

        // Expected minimal JSON: { "models": [ { "name": "<model>" }, ... ] }
        #[derive(serde::Deserialize)]
        struct Tag {
            name: String,
        }
        #[derive(serde::Deserialize)]
        struct Tags {
            models: Option<Vec<Tag>>,
        }

        match resp.json::<Tags>().await {
            Ok(tags) => match tags.models {
                Some(models) if models.iter().any(|m| m.name == cfg.model) => Ok(HealthStatus::ok(
                    cfg,
                    latency,
                    "backend is healthy; model is available",
                )),
                Some(_) => Ok(HealthStatus::fail(
                    cfg,
                    latency,
                    "backend is up, but model not found in /api/tags",
                )),
                None => Ok(HealthStatus::ok(
                    cfg,
                    latency,
                    "backend is healthy; tags response without `models` field",
                )),
            },
            Err(e) => Ok(HealthStatus::ok(
                cfg,
                latency,
                format!("backend is reachable; failed to decode /api/tags: {e}"),
            )),
        }
    }
}
