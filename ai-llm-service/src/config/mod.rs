//! Model invocation configuration and env-driven constructors.

pub mod default_config;
pub mod llm_model_config;
