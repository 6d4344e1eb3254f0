//! Guest message gate.
//!
//! Anonymous visitors get a handful of free messages per agent. The first
//! message opens a counter; before the second one the visitor is asked
//! whether to continue as a guest or sign up; once the counter reaches the
//! limit every further send is refused with a sign-up redirect.

use personae_types::agent::AgentId;
use personae_types::error::{GuestError, RepositoryError};
use personae_types::guest::{GateDecision, GuestId, GuestStatus};
use tracing::debug;

use crate::repository::guest::GuestRepository;

pub struct GuestGate<G: GuestRepository> {
    repo: G,
    limit: u32,
}

impl<G: GuestRepository> GuestGate<G> {
    pub fn new(repo: G, limit: u32) -> Self {
        Self { repo, limit }
    }

    /// Decide whether a guest may send one more message, recording it if so.
    ///
    /// A send is accepted only while the stored count is below the limit;
    /// the increment applies the same comparison atomically, so concurrent
    /// requests cannot push the count past the limit.
    pub async fn check_and_record(
        &self,
        guest_id: &GuestId,
        agent_id: &AgentId,
        continue_as_guest: bool,
    ) -> Result<GateDecision, GuestError> {
        if self.limit == 0 {
            return Ok(GateDecision::SignUpRequired);
        }

        let existing = self.repo.get(guest_id, agent_id).await.map_err(storage)?;

        let Some(interaction) = existing else {
            if self.repo.create_first(guest_id, agent_id).await.map_err(storage)? {
                debug!(%guest_id, %agent_id, "guest counter opened");
                return Ok(self.allowed(1));
            }
            // Lost a race with a concurrent first message; fall through to
            // the increment path.
            return self.increment(guest_id, agent_id).await;
        };

        let count = interaction.interaction_count;
        if count >= self.limit {
            return Ok(GateDecision::SignUpRequired);
        }
        if count == 1 && !continue_as_guest {
            return Ok(GateDecision::Prompt);
        }
        self.increment(guest_id, agent_id).await
    }

    /// Current usage without changing anything.
    pub async fn status(
        &self,
        guest_id: &GuestId,
        agent_id: &AgentId,
    ) -> Result<GuestStatus, GuestError> {
        let count = self
            .repo
            .get(guest_id, agent_id)
            .await
            .map_err(storage)?
            .map(|i| i.interaction_count)
            .unwrap_or(0);
        Ok(GuestStatus::new(count, self.limit))
    }

    async fn increment(
        &self,
        guest_id: &GuestId,
        agent_id: &AgentId,
    ) -> Result<GateDecision, GuestError> {
        match self
            .repo
            .increment_below(guest_id, agent_id, self.limit)
            .await
            .map_err(storage)?
        {
            Some(count) => {
                debug!(%guest_id, %agent_id, count, "guest message counted");
                Ok(self.allowed(count))
            }
            None => Ok(GateDecision::SignUpRequired),
        }
    }

    fn allowed(&self, count: u32) -> GateDecision {
        GateDecision::Allowed {
            count,
            remaining: self.limit.saturating_sub(count),
        }
    }
}

fn storage(e: RepositoryError) -> GuestError {
    GuestError::StorageError(e.to_string())
}
