//! LlmProvider trait definition.
//!
//! This is the core abstraction the chat orchestrator talks to. Uses RPITIT
//! for `complete`; see [`BoxLlmProvider`](super::box_provider::BoxLlmProvider)
//! for dynamic dispatch.

use personae_types::llm::{CompletionRequest, CompletionResponse, LlmError};

/// Trait for LLM provider backends.
///
/// Implementations live in personae-infra (e.g., `OpenAiProvider`).
pub trait LlmProvider: Send + Sync {
    /// Human-readable provider name (e.g., "openai").
    fn name(&self) -> &str;

    /// Model used when a request leaves `model` empty.
    fn default_model(&self) -> &str;

    /// Send a completion request and receive one assistant reply.
    fn complete(
        &self,
        request: &CompletionRequest,
    ) -> impl std::future::Future<Output = Result<CompletionResponse, LlmError>> + Send;
}
