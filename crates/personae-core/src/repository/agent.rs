//! Agent repository trait definition.

use personae_types::agent::{Agent, AgentId, AgentListing};
use personae_types::error::RepositoryError;
use uuid::Uuid;

/// Filter criteria for listing agents.
#[derive(Debug, Clone, Default)]
pub struct AgentFilter {
    /// Only agents created by this profile.
    pub creator_id: Option<Uuid>,
    /// Maximum number of results.
    pub limit: Option<i64>,
    /// Number of results to skip (offset pagination).
    pub offset: Option<i64>,
}

/// Repository trait for agent persistence.
///
/// Implementations live in personae-infra (e.g., SqliteAgentRepository).
/// Uses native async fn in traits (Rust 2024 edition, no async_trait macro).
pub trait AgentRepository: Send + Sync {
    /// Insert a new agent. Returns the stored agent.
    fn create(
        &self,
        agent: &Agent,
    ) -> impl std::future::Future<Output = Result<Agent, RepositoryError>> + Send;

    fn get_by_id(
        &self,
        id: &AgentId,
    ) -> impl std::future::Future<Output = Result<Option<Agent>, RepositoryError>> + Send;

    /// List agents newest first, each with its count of stored user messages.
    fn list(
        &self,
        filter: AgentFilter,
    ) -> impl std::future::Future<Output = Result<Vec<AgentListing>, RepositoryError>> + Send;

    /// Overwrite an existing agent. `NotFound` if it does not exist.
    fn update(
        &self,
        agent: &Agent,
    ) -> impl std::future::Future<Output = Result<Agent, RepositoryError>> + Send;

    /// Delete an agent and, through cascades, everything hanging off it.
    fn delete(
        &self,
        id: &AgentId,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;
}
