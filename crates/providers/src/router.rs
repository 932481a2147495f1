//! Provider selection: builds the configured default LLM provider.
//!
//! Every provider speaks the OpenAI chat-completions protocol; the name
//! picks a well-known base URL unless `[providers.<name>]` overrides it.

use std::sync::Arc;
use std::time::Duration;
use consilium_core::provider::Provider;
use crate::openai_compat::OpenAiCompatProvider;

/// Build the default provider from configuration.
///
/// A `[providers.<default>]` entry supplies the URL and key when present.
/// Otherwise the top-level API key and the well-known URL are used.
pub fn default_from_config(config: &consilium_config::AppConfig) -> Arc<dyn Provider> {
    let name = config.default_provider.as_str();
    let entry = config.providers.get(name);
    let api_key = entry
        .and_then(|p| p.api_key.clone())
        .or_else(|| config.api_key.clone())
        .unwrap_or_default();
    let base_url = entry
        .and_then(|p| p.api_url.clone())
        .unwrap_or_else(|| default_base_url(name));
    let timeout = Duration::from_secs(config.request_timeout_secs);

    Arc::new(OpenAiCompatProvider::with_timeout(name, &base_url, &api_key, timeout))
}

/// Get the default base URL for well-known providers.
fn default_base_url(provider_name: &str) -> String {
    match provider_name {
        "openai" => "https://api.openai.com/v1".into(),
        "openrouter" => "https://openrouter.ai/api/v1".into(),
        "ollama" => "http://localhost:11434/v1".into(),
        "groq" => "https://api.groq.com/openai/v1".into(),
        "together" => "https://api.together.xyz/v1".into(),
        "vllm" => "http://localhost:8000/v1".into(),
        "llamacpp" | "llama.cpp" => "http://localhost:8080/v1".into(),
        _ => format!("https://{provider_name}.api.example.com/v1"),
    }
}
