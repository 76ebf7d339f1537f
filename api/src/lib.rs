//! HTTP layer: one review endpoint plus a health probe.
//!
//! The routing, CORS, and listener setup here is thin plumbing around the
//! `code-reviewer` pipeline; all review semantics live in that crate.

use std::{env, sync::Arc};

pub mod core;
pub mod error_handler;
mod routes;

use axum::{
    Router,
    routing::{get, post},
};
use tokio::signal;
use tower_http::cors::CorsLayer;

use crate::core::app_state::AppState;
use crate::error_handler::AppError;
use crate::routes::{health_route::health, review_route::review};

pub async fn start() -> Result<(), AppError> {
    let host_url = env::var("API_ADDRESS").unwrap_or_else(|_| "0.0.0.0:8080".to_string());

    let state = Arc::new(AppState::from_env());

    // CORS stays permissive: this is a local demo backend fronted by a
    // browser UI on another origin.
    let app = Router::new()
        .route("/health", get(health))
        .route("/review", post(review))
        .layer(CorsLayer::permissive())
        .with_state(state);

    let listener = tokio::net::TcpListener::bind(&host_url)
        .await
        .map_err(AppError::Bind)?;
    tracing::info!("api: listening on {host_url}");

    // Start server with graceful shutdown on Ctrl+C
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(AppError::Server)?;

    Ok(())
}

/// Returns a future that resolves when Ctrl+C is pressed
async fn shutdown_signal() {
    signal::ctrl_c()
        .await
        .expect("Failed to listen for shutdown signal");
}
