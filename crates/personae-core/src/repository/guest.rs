//! Guest interaction counter repository.

use personae_types::agent::AgentId;
use personae_types::error::RepositoryError;
use personae_types::guest::{GuestId, GuestInteraction};

/// Storage for per-(guest, agent) message counters.
///
/// Counters only ever grow. Implementations must keep the (guest, agent)
/// pair unique and perform increments atomically.
pub trait GuestRepository: Send + Sync {
    fn get(
        &self,
        guest_id: &GuestId,
        agent_id: &AgentId,
    ) -> impl std::future::Future<Output = Result<Option<GuestInteraction>, RepositoryError>> + Send;

    /// Create the counter with a count of 1.
    ///
    /// Returns `false` without touching anything if the pair already exists.
    fn create_first(
        &self,
        guest_id: &GuestId,
        agent_id: &AgentId,
    ) -> impl std::future::Future<Output = Result<bool, RepositoryError>> + Send;

    /// Increment the counter if it is still below `limit`.
    ///
    /// Returns the new count, or `None` when the counter was already at or
    /// above the limit (or missing).
    fn increment_below(
        &self,
        guest_id: &GuestId,
        agent_id: &AgentId,
        limit: u32,
    ) -> impl std::future::Future<Output = Result<Option<u32>, RepositoryError>> + Send;
}
