//! Provider trait: the abstraction over LLM backends.
//!
//! A Provider knows how to send a short conversation to an LLM and get a
//! complete text reply back. The pipeline treats it as an opaque
//! text-completion capability, which lets tests swap in scripted doubles.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use crate::error::ProviderError;
use crate::message::Message;

/// Sampling parameters sent with every completion request.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SamplingConfig {
    /// Temperature (0.0 = deterministic)
    #[serde(default)]
    pub temperature: f32,

    /// Nucleus sampling cutoff
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top_p: Option<f32>,

    /// Maximum tokens to generate
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
}

impl SamplingConfig {
    /// Temperature 0 with the nucleus cutoff the answers were tuned with.
    pub fn deterministic() -> Self {
        Self {
            temperature: 0.0,
            top_p: Some(0.9),
            max_tokens: None,
        }
    }
}

impl Default for SamplingConfig {
    fn default() -> Self {
        Self::deterministic()
    }
}

/// Configuration for a provider request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderRequest {
    /// The model to use (e.g., "gpt-4-turbo")
    pub model: String,

    /// The conversation messages
    pub messages: Vec<Message>,

    /// Sampling parameters
    #[serde(default)]
    pub sampling: SamplingConfig,
}

impl ProviderRequest {
    /// Build a single-turn request: one system instruction, one user prompt.
    pub fn prompt(
        model: impl Into<String>,
        system: impl Into<String>,
        prompt: impl Into<String>,
        sampling: SamplingConfig,
    ) -> Self {
        Self {
            model: model.into(),
            messages: vec![Message::system(system), Message::user(prompt)],
            sampling,
        }
    }
}

/// A complete response from a provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderResponse {
    /// The generated message
    pub message: Message,

    /// Token usage statistics
    pub usage: Option<Usage>,

    /// Which model actually responded (may differ from requested)
    pub model: String,
}

/// Token usage information.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Usage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

/// The core Provider trait.
///
/// Every LLM backend implements this trait. The pipeline calls `complete()`
/// without knowing which provider is being used.
#[async_trait]
pub trait Provider: Send + Sync {
    /// A human-readable name for this provider (e.g., "openai").
    fn name(&self) -> &str;

    /// Send a request and get a complete response.
    async fn complete(&self, request: ProviderRequest) -> std::result::Result<ProviderResponse, ProviderError>;

    /// Health check: can we reach the provider?
    async fn health_check(&self) -> std::result::Result<bool, ProviderError> {
        Ok(true)
    }
}
