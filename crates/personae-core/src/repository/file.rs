//! Knowledge-file metadata repository trait definition.

use personae_types::agent::AgentId;
use personae_types::error::RepositoryError;
use personae_types::file::{AgentFile, FileContent};
use uuid::Uuid;

/// Metadata and extracted text for files attached to agents.
///
/// The bytes themselves live in an [`ObjectStore`](crate::storage::object_store::ObjectStore).
pub trait FileRepository: Send + Sync {
    fn create(
        &self,
        file: &AgentFile,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;

    fn get(
        &self,
        id: &Uuid,
    ) -> impl std::future::Future<Output = Result<Option<AgentFile>, RepositoryError>> + Send;

    /// Files for an agent, oldest first.
    fn list_for_agent(
        &self,
        agent_id: &AgentId,
    ) -> impl std::future::Future<Output = Result<Vec<AgentFile>, RepositoryError>> + Send;

    /// Delete a file row (its content row cascades).
    fn delete(
        &self,
        id: &Uuid,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;

    fn save_content(
        &self,
        content: &FileContent,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;

    /// Extracted text of every file attached to an agent, in upload order.
    fn contents_for_agent(
        &self,
        agent_id: &AgentId,
    ) -> impl std::future::Future<Output = Result<Vec<String>, RepositoryError>> + Send;
}
