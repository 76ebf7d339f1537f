use std::sync::Arc;

use axum::{Json, extract::State, extract::rejection::JsonRejection};
use tracing::{debug, instrument};

use code_reviewer::{
    run_review,
    types::{ReviewRequest, ReviewResult},
};

use crate::{core::app_state::AppState, error_handler::AppResult};

/// HTTP endpoint for reviewing one pasted snippet.
///
/// Expects `{code, lang, path}`; `lang` defaults to `"text"` and `path` to
/// `"pasted"`. On success the body is the bare review payload
/// `{summary, comments, meta}`. A malformed request maps to a 400 error
/// body; a backend transport failure maps to an explicit 502/504 error
/// body instead of a partial result.
#[instrument(name = "review_route", skip_all)]
pub async fn review(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<ReviewRequest>, JsonRejection>,
) -> AppResult<Json<ReviewResult>> {
    let Json(body) = payload?;
    debug!(
        "review request: path={} lang={} {} chars",
        body.path,
        body.lang,
        body.code.chars().count()
    );

    let result = run_review(&state.config_path, &body).await?;

    Ok(Json(result))
}
