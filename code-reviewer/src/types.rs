//! Wire-level data model for the review pipeline.
//!
//! The response keeps the original wire format: comment line offsets are
//! camelCase (`lineOffset`), telemetry keys are snake_case. Comments carry
//! an internal provenance tag that never reaches the wire, so the payload
//! stays one flat ordered list.

use serde::{Deserialize, Serialize};

/// Immutable review request accepted at the boundary.
#[derive(Debug, Clone, Deserialize)]
pub struct ReviewRequest {
    /// Source text to review.
    pub code: String,
    /// Language tag; anything unrecognized is treated as plain text.
    #[serde(default = "default_lang")]
    pub lang: String,
    /// Display path of the snippet.
    #[serde(default = "default_path")]
    pub path: String,
}

fn default_lang() -> String {
    "text".to_string()
}

fn default_path() -> String {
    "pasted".to_string()
}

/// A single observation about the source.
///
/// `line_offset` is zero-based relative to the start of the analyzed text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Finding {
    #[serde(rename = "lineOffset", default)]
    pub line_offset: u32,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
}

/// Where a comment came from. Internal only; the serialized output is flat.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommentSource {
    HeuristicFix,
    HeuristicSuggestion,
    Model,
}

/// A finding tagged with its origin.
///
/// The tag is skipped on the wire: the response carries one flat ordered
/// sequence, but provenance stays available internally.
#[derive(Debug, Clone, Serialize)]
pub struct ReviewComment {
    #[serde(skip)]
    pub source: CommentSource,
    #[serde(flatten)]
    pub finding: Finding,
}

impl ReviewComment {
    pub fn new(source: CommentSource, finding: Finding) -> Self {
        Self { source, finding }
    }
}

/// Parsed shape of the model's JSON-mode reply.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ModelReview {
    pub summary: String,
    pub comments: Vec<Finding>,
}

/// Size and cost telemetry attached to every result.
///
/// Numeric fields are always present, defaulting to 0 when the backend
/// reported nothing usable.
#[derive(Debug, Clone, Serialize)]
pub struct TelemetryMeta {
    pub model: String,
    pub prompt_chars: usize,
    pub response_chars: usize,
    pub prompt_tokens_est: u64,
    pub response_tokens_est: u64,
    pub chars_per_token: u32,
    pub duration_ms: f64,
    pub price_per_mtok_usd: f64,
    pub cost_usd_est: f64,
}

/// Final payload returned to the caller.
///
/// Comment order is a stable contract: heuristic fixes, then heuristic
/// suggestions, then model comments, each group keeping its internal order.
#[derive(Debug, Clone, Serialize)]
pub struct ReviewResult {
    pub summary: String,
    pub comments: Vec<ReviewComment>,
    pub meta: TelemetryMeta,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_defaults() {
        let req: ReviewRequest = serde_json::from_str(r#"{"code":"x = 1"}"#).unwrap();
        assert_eq!(req.lang, "text");
        assert_eq!(req.path, "pasted");
    }

    #[test]
    fn comment_serializes_flat() {
        let c = ReviewComment::new(
            CommentSource::Model,
            Finding {
                line_offset: 3,
                message: "msg".into(),
                suggestion: None,
            },
        );
        let v = serde_json::to_value(&c).unwrap();
        assert_eq!(v["lineOffset"], 3);
        assert_eq!(v["message"], "msg");
        // provenance tag and absent suggestion stay off the wire
        assert!(v.get("source").is_none());
        assert!(v.get("suggestion").is_none());
    }

    #[test]
    fn finding_rejects_negative_offset() {
        let r: Result<Finding, _> =
            serde_json::from_str(r#"{"lineOffset":-1,"message":"bad"}"#);
        assert!(r.is_err());
    }
}
