//! Agent management service.
//!
//! Create, read, list, update and delete agents. Anyone may read; only a
//! profile with the creator role may create, and only an agent's own creator
//! may change or delete it.

use chrono::Utc;
use personae_types::agent::{
    Agent, AgentId, AgentListing, CreateAgentRequest, UpdateAgentRequest, normalize_instructions,
    normalize_traits,
};
use personae_types::error::{AgentError, RepositoryError};
use personae_types::profile::Profile;
use personae_types::session::Session;
use tracing::{info, warn};

use crate::repository::agent::{AgentFilter, AgentRepository};
use crate::storage::object_store::ObjectStore;

/// Default page size for agent listings.
pub const DEFAULT_LIST_LIMIT: i64 = 50;

pub struct AgentService<A: AgentRepository, O: ObjectStore> {
    agent_repo: A,
    object_store: O,
}

impl<A: AgentRepository, O: ObjectStore> AgentService<A, O> {
    pub fn new(agent_repo: A, object_store: O) -> Self {
        Self {
            agent_repo,
            object_store,
        }
    }

    /// Create an agent owned by the calling creator.
    pub async fn create_agent(
        &self,
        session: &Session,
        request: CreateAgentRequest,
    ) -> Result<Agent, AgentError> {
        let profile = require_profile(session)?;
        if !session.is_creator() {
            return Err(AgentError::Forbidden);
        }

        let name = required_field("name", &request.name)?;
        let description = required_field("description", &request.description)?;

        let now = Utc::now();
        let agent = Agent {
            id: AgentId::new(),
            name,
            description,
            expertise: request
                .expertise
                .map(|e| e.trim().to_string())
                .unwrap_or_default(),
            instructions: normalize_instructions(request.instructions),
            traits: normalize_traits(request.traits.unwrap_or_default()),
            creator_id: Some(profile.id),
            created_at: now,
            updated_at: now,
        };

        let agent = self.agent_repo.create(&agent).await.map_err(storage)?;
        info!(agent_id = %agent.id, creator_id = %profile.id, "agent created");
        Ok(agent)
    }

    /// Fetch an agent by its textual id.
    pub async fn get_agent(&self, id: &str) -> Result<Agent, AgentError> {
        let id = parse_agent_id(id)?;
        self.get_agent_by_id(&id).await
    }

    pub async fn get_agent_by_id(&self, id: &AgentId) -> Result<Agent, AgentError> {
        self.agent_repo
            .get_by_id(id)
            .await
            .map_err(storage)?
            .ok_or(AgentError::NotFound)
    }

    /// List agents newest first with their interaction counts.
    pub async fn list_agents(
        &self,
        limit: Option<i64>,
        offset: Option<i64>,
    ) -> Result<Vec<AgentListing>, AgentError> {
        let filter = AgentFilter {
            creator_id: None,
            limit: Some(limit.unwrap_or(DEFAULT_LIST_LIMIT).clamp(1, 200)),
            offset: Some(offset.unwrap_or(0).max(0)),
        };
        self.agent_repo.list(filter).await.map_err(storage)
    }

    /// Agents created by a given profile.
    pub async fn list_agents_by(&self, creator: &Profile) -> Result<Vec<AgentListing>, AgentError> {
        let filter = AgentFilter {
            creator_id: Some(creator.id),
            ..Default::default()
        };
        self.agent_repo.list(filter).await.map_err(storage)
    }

    /// Apply a partial update. Only the agent's creator may do this.
    pub async fn update_agent(
        &self,
        session: &Session,
        id: &AgentId,
        request: UpdateAgentRequest,
    ) -> Result<Agent, AgentError> {
        let mut agent = self.owned_agent(session, id).await?;

        if let Some(name) = request.name {
            agent.name = required_field("name", &name)?;
        }
        if let Some(description) = request.description {
            agent.description = required_field("description", &description)?;
        }
        if let Some(expertise) = request.expertise {
            agent.expertise = expertise.trim().to_string();
        }
        if request.instructions.is_some() {
            agent.instructions = normalize_instructions(request.instructions);
        }
        if let Some(traits) = request.traits {
            agent.traits = normalize_traits(traits);
        }
        agent.updated_at = Utc::now();

        let agent = self.agent_repo.update(&agent).await.map_err(|e| match e {
            RepositoryError::NotFound => AgentError::NotFound,
            other => storage(other),
        })?;
        info!(agent_id = %agent.id, "agent updated");
        Ok(agent)
    }

    /// Delete an agent with its messages, counters and files.
    pub async fn delete_agent(&self, session: &Session, id: &AgentId) -> Result<(), AgentError> {
        let agent = self.owned_agent(session, id).await?;

        self.agent_repo.delete(&agent.id).await.map_err(|e| match e {
            RepositoryError::NotFound => AgentError::NotFound,
            other => storage(other),
        })?;

        if let Err(e) = self.object_store.delete_prefix(&agent.id.to_string()).await {
            warn!(agent_id = %agent.id, error = %e, "failed to remove stored agent files");
        }

        info!(agent_id = %agent.id, "agent deleted");
        Ok(())
    }

    /// Load an agent and check that the caller created it.
    async fn owned_agent(&self, session: &Session, id: &AgentId) -> Result<Agent, AgentError> {
        let profile = require_profile(session)?;
        let agent = self.get_agent_by_id(id).await?;
        if !agent.is_created_by(&profile.id) {
            return Err(AgentError::Forbidden);
        }
        Ok(agent)
    }
}

/// Parse a textual agent id, mapping failures to a validation error.
pub fn parse_agent_id(id: &str) -> Result<AgentId, AgentError> {
    id.trim()
        .parse::<AgentId>()
        .map_err(|_| AgentError::InvalidId(id.to_string()))
}

fn require_profile(session: &Session) -> Result<&Profile, AgentError> {
    session.profile().ok_or(AgentError::Unauthenticated)
}

fn required_field(field: &str, value: &str) -> Result<String, AgentError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(AgentError::Validation(format!("{field} is required")));
    }
    Ok(value.to_string())
}

fn storage(e: RepositoryError) -> AgentError {
    AgentError::StorageError(e.to_string())
}
