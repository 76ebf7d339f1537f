//! Lightweight Ollama client for structured text generation.
//!
//! This module implements a thin client for the local Ollama API:
//! - `POST {endpoint}/api/generate` — synchronous text generation
//!   (`stream=false`) with `format="json"`, so the backend emits one
//!   parseable JSON document instead of free-form prose.
//!
//! The reply's usage counters (`prompt_eval_count`, `eval_count`,
//! `total_duration`) are surfaced untouched; any of them may be missing,
//! and the caller decides how to estimate around the gaps.
//!
//! # Examples
//!
//! ```no_run
//! use ai_llm_service::config::default_config::config_ollama_review;
//! use ai_llm_service::services::ollama_service::OllamaService;
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let svc = OllamaService::new(config_ollama_review("llama3.1"))?;
//!
//! let generated = svc.generate("Return {\"ok\": true} as JSON.").await?;
//! println!("raw: {}", generated.response);
//! println!("response tokens: {:?}", generated.usage.eval_count);
//! # Ok(()) }
//! ```

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::config::llm_model_config::LlmModelConfig;
use crate::error_handler::{AiLlmError, Result, make_snippet, validate_http_endpoint};

/// Thin client for Ollama `/api/generate`.
///
/// Initialized with a full [`LlmModelConfig`]. Reuses one HTTP client with
/// the configured timeout; the timeout is the only cancellation mechanism.
pub struct OllamaService {
    client: reqwest::Client,
    cfg: LlmModelConfig,
    url_generate: String,
}

impl OllamaService {
    /// Creates a new [`OllamaService`] from the given config.
    ///
    /// # Errors
    /// - [`AiLlmError::InvalidEndpoint`] if `cfg.endpoint` is invalid
    /// - [`AiLlmError::Transport`] if the HTTP client cannot be built
    pub fn new(cfg: LlmModelConfig) -> Result<Self> {
        validate_http_endpoint(&cfg.endpoint)?;

        let timeout = cfg
            .timeout_secs
            .map(Duration::from_secs)
            .unwrap_or_else(|| Duration::from_secs(60));

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(AiLlmError::from)?;

        let base = cfg.endpoint.trim_end_matches('/').to_string();
        let url_generate = format!("{base}/api/generate");

        Ok(Self {
            client,
            cfg,
            url_generate,
        })
    }

    /// Performs a **non-streaming** JSON-mode generation request.
    ///
    /// Mapped options:
    /// - `model`       ← `self.cfg.model`
    /// - `prompt`      ← argument
    /// - `format`      ← always `"json"`
    /// - `temperature` ← `self.cfg.temperature`
    /// - `top_p`       ← `self.cfg.top_p`
    /// - `num_predict` ← `self.cfg.max_tokens`
    ///
    /// # Errors
    /// - [`AiLlmError::Timeout`] when the call exceeds the configured timeout
    /// - [`AiLlmError::HttpStatus`] for non-2xx responses
    /// - [`AiLlmError::Transport`] for client errors
    /// - [`AiLlmError::Decode`] if the response cannot be parsed
    #[instrument(skip_all, fields(model = %self.cfg.model))]
    pub async fn generate(&self, prompt: &str) -> Result<Generation> {
        let body = GenerateRequest::from_cfg(&self.cfg, prompt);

        debug!("POST {}", self.url_generate);
        let resp = self
            .client
            .post(&self.url_generate)
            .json(&body)
            .send()
            .await?;

        if !resp.status().is_success() {
            let status = resp.status();
            let url = self.url_generate.clone();
            let text = resp.text().await.unwrap_or_default();
            return Err(AiLlmError::HttpStatus {
                status,
                url,
                snippet: make_snippet(&text),
            });
        }

        let out: GenerateResponse = resp.json().await.map_err(|e| {
            AiLlmError::Decode(format!("serde error: {e}; ensure `stream=false` is used"))
        })?;

        debug!(
            prompt_eval_count = ?out.usage.prompt_eval_count,
            eval_count = ?out.usage.eval_count,
            "generation completed"
        );

        Ok(Generation {
            response: out.response,
            usage: out.usage,
        })
    }
}

/// A completed generation: raw reply text plus backend usage counters.
#[derive(Debug, Clone)]
pub struct Generation {
    /// Raw reply text. JSON mode was requested but is not guaranteed.
    pub response: String,
    /// Usage counters as reported by the backend.
    pub usage: GenerationUsage,
}

/// Usage counters reported by the backend. Any field may be absent.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct GenerationUsage {
    /// Tokens consumed by the prompt.
    pub prompt_eval_count: Option<u64>,
    /// Tokens produced in the reply.
    pub eval_count: Option<u64>,
    /// Wall-clock duration of the call, nanoseconds.
    pub total_duration: Option<u64>,
}

/* ==========================
HTTP payloads & options
========================== */

/// Request body for `/api/generate` (non-streaming, JSON output mode).
#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
    format: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    options: Option<GenerateOptions>,
}

impl<'a> GenerateRequest<'a> {
    /// Builds a request from config and prompt.
    fn from_cfg(cfg: &'a LlmModelConfig, prompt: &'a str) -> Self {
        let options = GenerateOptions {
            temperature: cfg.temperature,
            top_p: cfg.top_p,
            num_predict: cfg.max_tokens,
        };

        Self {
            model: &cfg.model,
            prompt,
            stream: false,
            format: "json",
            options: Some(options),
        }
    }
}

/// Subset of Ollama `options`.
#[derive(Debug, Default, Serialize)]
struct GenerateOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    top_p: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    num_predict: Option<u32>,
}

/// Response body for `/api/generate`.
///
/// The generated text is in `response`; the usage counters sit beside it
/// at the top level and are captured via `flatten`.
#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    response: String,
    #[serde(flatten)]
    usage: GenerationUsage,
}
