//! Result merger and cost estimator.
//!
//! Two concerns live here:
//! - interpreting the backend's raw reply as a [`ModelReview`], with an
//!   explicit degradation branch for malformed output;
//! - folding heuristic and model findings into one ordered comment list and
//!   deriving size/cost telemetry from whatever usage counters survived.

use serde_json::Value;
use tracing::debug;

use ai_llm_service::services::ollama_service::GenerationUsage;

use crate::config::ReviewConfig;
use crate::errors::ParseError;
use crate::types::{
    CommentSource, Finding, ModelReview, ReviewComment, ReviewResult, TelemetryMeta,
};

/// Fixed character-per-token ratio used when the backend reports no counters.
pub const CHARS_PER_TOKEN: u32 = 4;

/// Summary substituted when the model reply cannot be interpreted.
pub const PLACEHOLDER_SUMMARY: &str = "(unstructured)";

/// Interpret the backend's raw reply as one structured review object.
///
/// # Errors
/// - [`ParseError::Empty`] for an empty/whitespace reply
/// - [`ParseError::Json`] when the reply is not valid JSON
/// - [`ParseError::NotAnObject`] when the JSON top level is not an object
///
/// Malformed entries *inside* a well-formed `comments` array are silently
/// dropped rather than failing the parse: an entry survives when it is an
/// object with a string `message` (a missing `lineOffset` defaults to 0).
pub fn parse_model_output(raw: &str) -> Result<ModelReview, ParseError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ParseError::Empty);
    }

    let value: Value = serde_json::from_str(trimmed)?;
    let obj = value.as_object().ok_or(ParseError::NotAnObject)?;

    let summary = obj
        .get("summary")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();

    let comments = obj
        .get("comments")
        .and_then(Value::as_array)
        .map(|arr| {
            arr.iter()
                .filter_map(|c| serde_json::from_value::<Finding>(c.clone()).ok())
                .collect()
        })
        .unwrap_or_default();

    Ok(ModelReview { summary, comments })
}

/// The review used when [`parse_model_output`] fails.
fn placeholder_review() -> ModelReview {
    ModelReview {
        summary: PLACEHOLDER_SUMMARY.to_string(),
        comments: Vec::new(),
    }
}

/// Estimate a token count from a character count.
///
/// `ceil(chars / CHARS_PER_TOKEN)`, floored at 1 so even an empty text
/// counts as one token.
pub fn estimate_tokens(chars: usize) -> u64 {
    (chars as u64).div_ceil(CHARS_PER_TOKEN as u64).max(1)
}

/// Cost in USD for the given total tokens, rounded to 6 decimal places.
/// Zero when no price is configured.
fn estimate_cost_usd(total_tokens: u64, per_mtok_usd: f64) -> f64 {
    if per_mtok_usd <= 0.0 {
        return 0.0;
    }
    let raw = total_tokens as f64 / 1_000_000.0 * per_mtok_usd;
    (raw * 1e6).round() / 1e6
}

/// Merge heuristic and model findings into the final [`ReviewResult`].
///
/// This function is total: arbitrary `raw` text degrades to the placeholder
/// review instead of propagating an error. Comment order is the stable
/// contract — heuristic fixes, heuristic suggestions, model comments.
///
/// Token counts prefer the backend's usage counters; absent counters fall
/// back to character-based estimates. Duration converts ns → ms, default 0.
pub fn merge_review(
    raw: &str,
    fixes: Vec<Finding>,
    suggestions: Vec<Finding>,
    usage: &GenerationUsage,
    prompt: &str,
    cfg: &ReviewConfig,
) -> ReviewResult {
    let parsed = parse_model_output(raw).unwrap_or_else(|e| {
        debug!("model output degraded to placeholder: {e}");
        placeholder_review()
    });

    let mut comments =
        Vec::with_capacity(fixes.len() + suggestions.len() + parsed.comments.len());
    comments.extend(
        fixes
            .into_iter()
            .map(|f| ReviewComment::new(CommentSource::HeuristicFix, f)),
    );
    comments.extend(
        suggestions
            .into_iter()
            .map(|f| ReviewComment::new(CommentSource::HeuristicSuggestion, f)),
    );
    comments.extend(
        parsed
            .comments
            .into_iter()
            .map(|f| ReviewComment::new(CommentSource::Model, f)),
    );

    let prompt_chars = prompt.chars().count();
    let response_chars = raw.chars().count();

    let prompt_tokens_est = usage
        .prompt_eval_count
        .unwrap_or_else(|| estimate_tokens(prompt_chars));
    let response_tokens_est = usage
        .eval_count
        .unwrap_or_else(|| estimate_tokens(response_chars));

    let price_per_mtok_usd = cfg.price_per_mtok();
    let cost_usd_est = estimate_cost_usd(prompt_tokens_est + response_tokens_est, price_per_mtok_usd);

    let duration_ms = usage
        .total_duration
        .map(|ns| ns as f64 / 1_000_000.0)
        .unwrap_or(0.0);

    ReviewResult {
        summary: parsed.summary,
        comments,
        meta: TelemetryMeta {
            model: cfg.model.clone(),
            prompt_chars,
            response_chars,
            prompt_tokens_est,
            response_tokens_est,
            chars_per_token: CHARS_PER_TOKEN,
            duration_ms,
            price_per_mtok_usd,
            cost_usd_est,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    use crate::config::ModelPrice;
    use crate::heuristics;

    fn finding(offset: u32, message: &str) -> Finding {
        Finding {
            line_offset: offset,
            message: message.to_string(),
            suggestion: None,
        }
    }

    fn no_usage() -> GenerationUsage {
        GenerationUsage::default()
    }

    fn priced_cfg(model: &str, per_mtok_usd: f64) -> ReviewConfig {
        let mut prices = HashMap::new();
        prices.insert(model.to_string(), ModelPrice { per_mtok_usd });
        ReviewConfig {
            model: model.to_string(),
            prices,
            ..ReviewConfig::default()
        }
    }

    /* ---------------- parse_model_output ---------------- */

    #[test]
    fn parses_well_formed_reply() {
        let raw = r#"{"summary":"ok","comments":[{"lineOffset":2,"message":"fine"},{"lineOffset":0,"message":"x","suggestion":"y"}]}"#;
        let out = parse_model_output(raw).unwrap();
        assert_eq!(out.summary, "ok");
        assert_eq!(out.comments.len(), 2);
        assert_eq!(out.comments[0].line_offset, 2);
        assert_eq!(out.comments[1].suggestion.as_deref(), Some("y"));
    }

    #[test]
    fn missing_line_offset_defaults_to_zero() {
        let out =
            parse_model_output(r#"{"summary":"s","comments":[{"message":"no offset"}]}"#).unwrap();
        assert_eq!(out.comments[0].line_offset, 0);
    }

    #[test]
    fn malformed_entries_are_dropped_silently() {
        let raw = r#"{"summary":"s","comments":[
            {"lineOffset":1,"message":"keep"},
            "just a string",
            {"lineOffset":2},
            {"lineOffset":-3,"message":"negative"},
            {"lineOffset":3,"message":"keep too"}
        ]}"#;
        let out = parse_model_output(raw).unwrap();
        assert_eq!(out.comments.len(), 2);
        assert_eq!(out.comments[0].message, "keep");
        assert_eq!(out.comments[1].message, "keep too");
    }

    #[test]
    fn empty_and_non_json_and_non_object_fail() {
        assert!(matches!(parse_model_output(""), Err(ParseError::Empty)));
        assert!(matches!(parse_model_output("   \n"), Err(ParseError::Empty)));
        assert!(matches!(
            parse_model_output("here is your review!"),
            Err(ParseError::Json(_))
        ));
        assert!(matches!(
            parse_model_output("[1,2,3]"),
            Err(ParseError::NotAnObject)
        ));
        assert!(matches!(
            parse_model_output("42"),
            Err(ParseError::NotAnObject)
        ));
    }

    /* ---------------- merge ordering & degradation ---------------- */

    #[test]
    fn merge_never_raises_and_degrades_to_placeholder() {
        for raw in ["", "not json", "[]", "\"str\"", "{broken"] {
            let result = merge_review(
                raw,
                vec![finding(0, "heuristic")],
                Vec::new(),
                &no_usage(),
                "prompt",
                &ReviewConfig::default(),
            );
            assert_eq!(result.summary, PLACEHOLDER_SUMMARY, "raw = {raw:?}");
            assert_eq!(result.comments.len(), 1);
            assert_eq!(result.comments[0].finding.message, "heuristic");
        }
    }

    #[test]
    fn comment_order_is_fixes_suggestions_model() {
        let raw = r#"{"summary":"s","comments":[{"lineOffset":0,"message":"C"},{"lineOffset":0,"message":"D"}]}"#;
        let result = merge_review(
            raw,
            vec![finding(5, "A")],
            vec![finding(1, "B")],
            &no_usage(),
            "p",
            &ReviewConfig::default(),
        );

        let messages: Vec<&str> = result
            .comments
            .iter()
            .map(|c| c.finding.message.as_str())
            .collect();
        assert_eq!(messages, ["A", "B", "C", "D"]);

        let sources: Vec<CommentSource> = result.comments.iter().map(|c| c.source).collect();
        assert_eq!(
            sources,
            [
                CommentSource::HeuristicFix,
                CommentSource::HeuristicSuggestion,
                CommentSource::Model,
                CommentSource::Model
            ]
        );
    }

    /* ---------------- estimation ---------------- */

    #[test]
    fn token_estimates() {
        assert_eq!(estimate_tokens(0), 1);
        assert_eq!(estimate_tokens(4), 1);
        assert_eq!(estimate_tokens(5), 2);
        assert_eq!(estimate_tokens(8), 2);
        assert_eq!(estimate_tokens(9), 3);
    }

    #[test]
    fn cost_is_zero_without_price() {
        assert_eq!(estimate_cost_usd(1_000_000, 0.0), 0.0);
        let result = merge_review(
            "{}",
            Vec::new(),
            Vec::new(),
            &no_usage(),
            "p",
            &ReviewConfig::default(),
        );
        assert_eq!(result.meta.cost_usd_est, 0.0);
        assert_eq!(result.meta.price_per_mtok_usd, 0.0);
    }

    #[test]
    fn cost_with_configured_price() {
        let usage = GenerationUsage {
            prompt_eval_count: Some(500_000),
            eval_count: Some(500_000),
            total_duration: None,
        };
        let cfg = priced_cfg("llama3.1", 10.0);
        let result = merge_review("{}", Vec::new(), Vec::new(), &usage, "p", &cfg);
        assert_eq!(result.meta.cost_usd_est, 10.0);
        assert_eq!(result.meta.price_per_mtok_usd, 10.0);
    }

    #[test]
    fn cost_rounds_to_six_decimals() {
        // 1_234_567 tokens at 1 USD/Mtok = 1.234567, exact at 6 dp
        assert!((estimate_cost_usd(1_234_567, 1.0) - 1.234567).abs() < 1e-9);
        // sub-microdollar amounts round away entirely
        assert_eq!(estimate_cost_usd(1, 0.1), 0.0);
    }

    #[test]
    fn usage_counters_win_over_estimates() {
        let usage = GenerationUsage {
            prompt_eval_count: None,
            eval_count: Some(37),
            total_duration: None,
        };
        let prompt = "p".repeat(400);
        let result = merge_review(
            "{}",
            Vec::new(),
            Vec::new(),
            &usage,
            &prompt,
            &ReviewConfig::default(),
        );
        // reported counter wins for the response side
        assert_eq!(result.meta.response_tokens_est, 37);
        // absent counter falls back to the char estimate: 400 / 4
        assert_eq!(result.meta.prompt_tokens_est, 100);
    }

    #[test]
    fn duration_converts_ns_to_ms() {
        let usage = GenerationUsage {
            prompt_eval_count: None,
            eval_count: None,
            total_duration: Some(1_500_000_000),
        };
        let result = merge_review(
            "{}",
            Vec::new(),
            Vec::new(),
            &usage,
            "p",
            &ReviewConfig::default(),
        );
        assert_eq!(result.meta.duration_ms, 1500.0);

        let result = merge_review(
            "{}",
            Vec::new(),
            Vec::new(),
            &no_usage(),
            "p",
            &ReviewConfig::default(),
        );
        assert_eq!(result.meta.duration_ms, 0.0);
    }

    /* ---------------- end-to-end merge scenario ---------------- */

    #[test]
    fn end_to_end_python_snippet() {
        let code = "def f(): pass";
        let (fixes, suggestions) = heuristics::analyze(code);
        assert!(fixes.is_empty() && suggestions.is_empty());

        let cfg = ReviewConfig::default();
        let prompt = crate::prompt::build_prompt(&cfg.guidelines, "pasted", "py", code);
        let raw = r#"{"summary":"ok","comments":[{"lineOffset":0,"message":"fine"}]}"#;

        let result = merge_review(raw, fixes, suggestions, &no_usage(), &prompt, &cfg);

        assert_eq!(result.summary, "ok");
        assert_eq!(result.comments.len(), 1);
        assert_eq!(result.comments[0].source, CommentSource::Model);
        assert_eq!(result.comments[0].finding.message, "fine");
        assert_eq!(
            result.meta.prompt_tokens_est,
            estimate_tokens(prompt.chars().count())
        );
        assert_eq!(
            result.meta.response_tokens_est,
            estimate_tokens(raw.chars().count())
        );
        assert_eq!(result.meta.chars_per_token, 4);
        assert_eq!(result.meta.cost_usd_est, 0.0);
        assert_eq!(result.meta.model, "llama3.1");
    }
}
