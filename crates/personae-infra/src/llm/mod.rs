//! LLM provider implementations.
//!
//! Contains the OpenAI-compatible chat-completions client and a factory
//! ([`create_provider`]) that builds the configured provider as a
//! [`BoxLlmProvider`].

pub mod openai;

use personae_core::llm::box_provider::BoxLlmProvider;
use personae_core::llm::provider::LlmProvider;
use personae_types::config::LlmConfig;
use personae_types::llm::{CompletionRequest, CompletionResponse, LlmError};
use secrecy::SecretString;

use self::openai::OpenAiProvider;

/// Build the configured provider.
///
/// Without an API key the returned provider fails every request with
/// [`LlmError::NotConfigured`], so the server can still start and serve the
/// non-chat endpoints.
pub fn create_provider(config: &LlmConfig, api_key: Option<SecretString>) -> Result<BoxLlmProvider, LlmError> {
    match api_key {
        Some(key) => Ok(BoxLlmProvider::new(OpenAiProvider::new(config, key)?)),
        None => {
            tracing::warn!(
                env = %config.api_key_env,
                "no LLM API key configured; chat requests will fail"
            );
            Ok(BoxLlmProvider::new(UnconfiguredProvider {
                name: config.provider_name.clone(),
                model: config.model.clone(),
                api_key_env: config.api_key_env.clone(),
            }))
        }
    }
}

/// Stand-in provider used when no API key is available.
pub struct UnconfiguredProvider {
    name: String,
    model: String,
    api_key_env: String,
}

impl LlmProvider for UnconfiguredProvider {
    fn name(&self) -> &str {
        &self.name
    }

    fn default_model(&self) -> &str {
        &self.model
    }

    async fn complete(&self, _request: &CompletionRequest) -> Result<CompletionResponse, LlmError> {
        Err(LlmError::NotConfigured(format!(
            "set {} to enable chat",
            self.api_key_env
        )))
    }
}
