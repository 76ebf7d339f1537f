//! Thin client layer for an Ollama-compatible text-generation backend.
//!
//! The crate covers exactly the concerns a review pipeline needs from its
//! generative backend:
//! - [`services::ollama_service::OllamaService`] — one non-streaming
//!   `/api/generate` call in JSON output mode, returning the raw reply text
//!   plus whatever usage counters the backend reports;
//! - [`health_service::HealthService`] — a resilient `/api/tags` probe
//!   suitable for a `/health` route;
//! - [`config`] — the model invocation config and its env-driven
//!   constructors;
//! - [`error_handler`] — one unified error type for the whole crate;
//! - [`telemetry`] — a crate-scoped `tracing` layer for embedders.

pub mod config;
pub mod error_handler;
pub mod health_service;
pub mod services;
pub mod telemetry;

pub use config::llm_model_config::LlmModelConfig;
pub use error_handler::{AiLlmError, Result};
