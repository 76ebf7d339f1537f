use std::sync::Arc;

use axum::{Json, extract::State};
use serde::Serialize;

use ai_llm_service::config::default_config::config_ollama_review;
use ai_llm_service::health_service::{HealthService, HealthStatus};
use code_reviewer::config::ReviewConfig;

use crate::core::app_state::AppState;

/// Probe timeout, seconds. Short on purpose: the route must answer fast
/// even when the backend is gone.
const PROBE_TIMEOUT_SECS: u64 = 5;

#[derive(Serialize)]
pub struct HealthReply {
    /// The API process itself is up.
    pub ok: bool,
    /// Reachability snapshot of the generation backend, when probed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub backend: Option<HealthStatus>,
}

/// Liveness plus a best-effort backend probe. Never fails the route: a
/// broken backend shows up as `backend.ok = false`.
pub async fn health(State(state): State<Arc<AppState>>) -> Json<HealthReply> {
    let cfg = ReviewConfig::load(&state.config_path);
    let llm_cfg = config_ollama_review(cfg.model);

    let backend = match HealthService::new(Some(PROBE_TIMEOUT_SECS)) {
        Ok(svc) => Some(svc.check(&llm_cfg).await),
        Err(_) => None,
    };

    Json(HealthReply { ok: true, backend })
}
