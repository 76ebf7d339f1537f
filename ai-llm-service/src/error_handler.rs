//! Unified error handling for `ai-llm-service`.
//!
//! One top-level [`AiLlmError`] for the whole library. Transport errors are
//! split into a dedicated [`AiLlmError::Timeout`] variant so callers can
//! distinguish "backend too slow" from "backend broken" without inspecting
//! the underlying HTTP error.
//!
//! All messages include the suffix `[AI LLM Service]` to simplify
//! attribution in logs.

use reqwest::StatusCode;
use thiserror::Error;

/// Unified result alias for the entire crate.
pub type Result<T> = std::result::Result<T, AiLlmError>;

/// Top-level error for the `ai-llm-service` crate.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum AiLlmError {
    /// Endpoint is empty or missing an http/https scheme.
    #[error("[AI LLM Service] invalid endpoint: {0}")]
    InvalidEndpoint(String),

    /// Underlying HTTP transport error (DNS/connect/reset/body).
    #[error("[AI LLM Service] transport error: {0}")]
    Transport(String),

    /// Operation exceeded the configured timeout.
    #[error("[AI LLM Service] operation timed out")]
    Timeout,

    /// Upstream returned a non-successful HTTP status.
    #[error("[AI LLM Service] HTTP {status} from {url}: {snippet}")]
    HttpStatus {
        /// Numeric HTTP status code.
        status: StatusCode,
        /// Request URL.
        url: String,
        /// Short snippet of the response body (trimmed).
        snippet: String,
    },

    /// Response payload could not be decoded as expected.
    #[error("[AI LLM Service] decode error: {0}")]
    Decode(String),
}

impl From<reqwest::Error> for AiLlmError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            AiLlmError::Timeout
        } else {
            AiLlmError::Transport(e.to_string())
        }
    }
}

/// Short single-line snippet of an upstream body, for error messages.
pub fn make_snippet(text: &str) -> String {
    text.chars().take(240).collect()
}

/// Validates that an HTTP endpoint starts with `http://` or `https://`.
///
/// # Errors
/// Returns [`AiLlmError::InvalidEndpoint`] when the string is empty or does
/// not start with a valid HTTP scheme.
pub fn validate_http_endpoint(value: &str) -> Result<()> {
    let v = value.trim();
    if v.is_empty() || !(v.starts_with("http://") || v.starts_with("https://")) {
        return Err(AiLlmError::InvalidEndpoint(value.to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_validation() {
        assert!(validate_http_endpoint("http://localhost:11434").is_ok());
        assert!(validate_http_endpoint("https://llm.internal").is_ok());
        assert!(validate_http_endpoint("").is_err());
        assert!(validate_http_endpoint("localhost:11434").is_err());
        assert!(validate_http_endpoint("ftp://nope").is_err());
    }

    #[test]
    fn snippet_is_bounded() {
        let long = "x".repeat(1000);
        assert_eq!(make_snippet(&long).chars().count(), 240);
        assert_eq!(make_snippet("short"), "short");
    }
}
