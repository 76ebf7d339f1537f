//! Crate-wide error types for the review pipeline.
//!
//! Only backend transport conditions escape the pipeline; configuration and
//! model-output problems are absorbed into degraded output and never reach
//! the caller.

use ai_llm_service::error_handler::AiLlmError;
use thiserror::Error;

/// Root error for the code-reviewer crate.
#[derive(Debug, Error)]
pub enum Error {
    /// Backend call exceeded the configured timeout.
    #[error("generation backend timed out")]
    BackendTimeout,

    /// Backend call failed (network, HTTP status, undecodable payload).
    #[error("generation backend unavailable: {0}")]
    BackendUnavailable(String),
}

impl From<AiLlmError> for Error {
    fn from(e: AiLlmError) -> Self {
        match e {
            AiLlmError::Timeout => Error::BackendTimeout,
            other => Error::BackendUnavailable(other.to_string()),
        }
    }
}

/// Failure modes of [`crate::merge::parse_model_output`].
///
/// Every variant is absorbed by the caller: a parse failure degrades to the
/// placeholder review instead of failing the request.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("model returned an empty reply")]
    Empty,

    #[error("model reply is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("model reply is valid JSON but not an object")]
    NotAnObject,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timeout_maps_to_backend_timeout() {
        let err: Error = AiLlmError::Timeout.into();
        assert!(matches!(err, Error::BackendTimeout));
    }

    #[test]
    fn other_backend_failures_map_to_unavailable() {
        let err: Error = AiLlmError::Transport("connection refused".into()).into();
        assert!(matches!(err, Error::BackendUnavailable(_)));

        let err: Error = AiLlmError::Decode("bad payload".into()).into();
        assert!(matches!(err, Error::BackendUnavailable(_)));
    }
}
