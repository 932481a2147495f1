//! Thin wrapper binding a provider to a model and sampling parameters.

use std::sync::Arc;

use consilium_core::error::ProviderError;
use consilium_core::provider::{Provider, ProviderRequest, SamplingConfig};
use tracing::debug;

/// A provider plus the model and sampling settings every call uses.
///
/// Every call runs at temperature 0 whatever `sampling` carries; only
/// `top_p` and `max_tokens` pass through.
#[derive(Clone)]
pub struct ModelClient {
    provider: Arc<dyn Provider>,
    model: String,
    sampling: SamplingConfig,
}

impl ModelClient {
    pub fn new(provider: Arc<dyn Provider>, model: impl Into<String>, sampling: SamplingConfig) -> Self {
        Self {
            provider,
            model: model.into(),
            sampling: SamplingConfig {
                temperature: 0.0,
                ..sampling
            },
        }
    }

    /// Send one system instruction and one prompt, return the reply text.
    pub async fn complete(&self, system: &str, prompt: String) -> Result<String, ProviderError> {
        let prompt_len = prompt.len();
        let request = ProviderRequest::prompt(&self.model, system, prompt, self.sampling);
        let response = self.provider.complete(request).await?;

        if let Some(usage) = &response.usage {
            debug!(
                provider = %self.provider.name(),
                model = %response.model,
                prompt_len,
                prompt_tokens = usage.prompt_tokens,
                completion_tokens = usage.completion_tokens,
                "Completion received"
            );
        }

        Ok(response.message.content)
    }
}
