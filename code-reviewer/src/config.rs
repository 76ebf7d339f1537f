//! Typed review configuration loaded from a JSON file.
//!
//! The file is re-read on every request so edits apply without a restart.
//! Any read or parse failure falls back to the built-in defaults; a broken
//! config file never fails a review. Values are validated once at load
//! time instead of defensively at each use site.

use std::collections::HashMap;
use std::path::Path;

use serde::Deserialize;
use tracing::{debug, warn};

/// Default location of the review config file.
pub const DEFAULT_CONFIG_PATH: &str = ".aicodereviewrc.json";

/// Review configuration with documented defaults for every field.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ReviewConfig {
    /// Model identifier passed to the generation backend.
    pub model: String,
    /// Character budget for the code excerpt embedded in the prompt.
    pub max_context_chars: usize,
    /// Review guidelines injected into the prompt, in order.
    pub guidelines: Vec<String>,
    /// Price table keyed by model name.
    pub prices: HashMap<String, ModelPrice>,
}

/// Price entry for one model.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct ModelPrice {
    /// USD per million tokens (prompt + response combined).
    pub per_mtok_usd: f64,
}

impl Default for ReviewConfig {
    fn default() -> Self {
        Self {
            model: "llama3.1".to_string(),
            max_context_chars: 4000,
            guidelines: Vec::new(),
            prices: HashMap::new(),
        }
    }
}

impl ReviewConfig {
    /// Load from `path`, absorbing every failure into the defaults.
    pub fn load(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(raw) => match serde_json::from_str::<ReviewConfig>(&raw) {
                Ok(cfg) => cfg.validated(),
                Err(e) => {
                    warn!("config {} is not valid JSON, using defaults: {e}", path.display());
                    Self::default()
                }
            },
            Err(e) => {
                debug!("config {} unreadable, using defaults: {e}", path.display());
                Self::default()
            }
        }
    }

    /// Clamp nonsensical values once, at load time.
    fn validated(mut self) -> Self {
        let defaults = Self::default();
        if self.model.trim().is_empty() {
            self.model = defaults.model;
        }
        if self.max_context_chars == 0 {
            self.max_context_chars = defaults.max_context_chars;
        }
        self
    }

    /// Price per million tokens for the active model; 0 when not configured.
    pub fn price_per_mtok(&self) -> f64 {
        self.prices
            .get(&self.model)
            .map(|p| p.per_mtok_usd)
            .unwrap_or(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write as _;

    fn write_config(contents: &str) -> tempfile::NamedTempFile {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        f.write_all(contents.as_bytes()).unwrap();
        f
    }

    #[test]
    fn full_file_parses() {
        let f = write_config(
            r#"{
                "model": "qwen3:14b",
                "max_context_chars": 2000,
                "guidelines": ["no unwrap", "docstrings"],
                "prices": { "qwen3:14b": { "per_mtok_usd": 0.5 } }
            }"#,
        );
        let cfg = ReviewConfig::load(f.path());
        assert_eq!(cfg.model, "qwen3:14b");
        assert_eq!(cfg.max_context_chars, 2000);
        assert_eq!(cfg.guidelines.len(), 2);
        assert!((cfg.price_per_mtok() - 0.5).abs() < 1e-9);
    }

    #[test]
    fn partial_file_takes_field_defaults() {
        let f = write_config(r#"{ "model": "mistral" }"#);
        let cfg = ReviewConfig::load(f.path());
        assert_eq!(cfg.model, "mistral");
        assert_eq!(cfg.max_context_chars, 4000);
        assert!(cfg.guidelines.is_empty());
        assert_eq!(cfg.price_per_mtok(), 0.0);
    }

    #[test]
    fn missing_file_takes_defaults() {
        let cfg = ReviewConfig::load(Path::new("/definitely/not/here.json"));
        assert_eq!(cfg.model, "llama3.1");
        assert_eq!(cfg.max_context_chars, 4000);
    }

    #[test]
    fn garbage_file_takes_defaults() {
        let f = write_config("not json at all {{{");
        let cfg = ReviewConfig::load(f.path());
        assert_eq!(cfg.model, "llama3.1");
    }

    #[test]
    fn empty_values_are_clamped_at_load() {
        let f = write_config(r#"{ "model": "  ", "max_context_chars": 0 }"#);
        let cfg = ReviewConfig::load(f.path());
        assert_eq!(cfg.model, "llama3.1");
        assert_eq!(cfg.max_context_chars, 4000);
    }

    #[test]
    fn price_for_other_model_is_ignored() {
        let f = write_config(
            r#"{ "model": "llama3.1", "prices": { "gpt-4": { "per_mtok_usd": 30.0 } } }"#,
        );
        let cfg = ReviewConfig::load(f.path());
        assert_eq!(cfg.price_per_mtok(), 0.0);
    }
}
