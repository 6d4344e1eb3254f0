//! Message repository trait definition.

use personae_types::agent::AgentId;
use personae_types::chat::ChatMessage;
use personae_types::error::RepositoryError;
use uuid::Uuid;

/// Append-only storage of chat messages for signed-in users.
pub trait MessageRepository: Send + Sync {
    /// Append a message.
    fn save(
        &self,
        message: &ChatMessage,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;

    /// Messages between `user_id` and an agent, oldest first.
    fn list_for_user(
        &self,
        agent_id: &AgentId,
        user_id: &Uuid,
    ) -> impl std::future::Future<Output = Result<Vec<ChatMessage>, RepositoryError>> + Send;
}
