/// Configuration for an LLM model invocation.
///
/// One struct covers everything the Ollama client needs for a single
/// generation profile. Sampling fields are optional; when absent the
/// backend's own defaults apply.
///
/// # Fields
///
/// - `model`: model identifier (e.g. `"llama3.1"`, `"qwen3:14b"`).
/// - `endpoint`: inference endpoint base URL.
/// - `max_tokens`: cap on generated tokens (`num_predict`), if any.
/// - `temperature`: sampling temperature (low = deterministic).
/// - `top_p`: nucleus sampling cutoff.
/// - `timeout_secs`: request timeout in seconds.
#[derive(Debug, Clone, PartialEq)]
pub struct LlmModelConfig {
    /// Model identifier string.
    pub model: String,

    /// Inference endpoint base URL (e.g. `http://localhost:11434`).
    pub endpoint: String,

    /// Maximum number of tokens to generate.
    pub max_tokens: Option<u32>,

    /// Sampling temperature.
    pub temperature: Option<f32>,

    /// Nucleus sampling parameter.
    pub top_p: Option<f32>,

    /// Request timeout (in seconds).
    pub timeout_secs: Option<u64>,
}
