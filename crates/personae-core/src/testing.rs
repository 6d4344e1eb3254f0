//! In-memory repository and provider fakes shared by the service tests.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use chrono::Utc;
use personae_types::agent::{Agent, AgentId, AgentListing};
use personae_types::chat::{ChatMessage, MessageRole};
use personae_types::error::{FileError, RepositoryError};
use personae_types::file::{AgentFile, FileContent};
use personae_types::guest::{GuestId, GuestInteraction};
use personae_types::llm::{CompletionRequest, CompletionResponse, LlmError, Usage};
use personae_types::profile::{Profile, ProfileRole};
use uuid::Uuid;

use crate::llm::provider::LlmProvider;
use crate::repository::agent::{AgentFilter, AgentRepository};
use crate::repository::file::FileRepository;
use crate::repository::guest::GuestRepository;
use crate::repository::message::MessageRepository;
use crate::repository::profile::ProfileRepository;
use crate::storage::object_store::ObjectStore;

pub fn profile(role: ProfileRole) -> Profile {
    Profile {
        id: Uuid::now_v7(),
        username: None,
        role,
        created_at: Utc::now(),
    }
}

pub fn agent_by(creator: Option<Uuid>) -> Agent {
    let now = Utc::now();
    Agent {
        id: AgentId::new(),
        name: "Tutor".into(),
        description: "Helps with homework".into(),
        expertise: "Math".into(),
        instructions: None,
        traits: vec!["Patient".into()],
        creator_id: creator,
        created_at: now,
        updated_at: now,
    }
}

// --- Repositories ---

#[derive(Clone, Default)]
pub struct MemAgents {
    pub agents: Arc<Mutex<Vec<Agent>>>,
    pub messages: Option<MemMessages>,
}

impl MemAgents {
    pub fn with(agent: Agent) -> Self {
        let repo = Self::default();
        repo.agents.lock().unwrap().push(agent);
        repo
    }
}

impl AgentRepository for MemAgents {
    async fn create(&self, agent: &Agent) -> Result<Agent, RepositoryError> {
        self.agents.lock().unwrap().push(agent.clone());
        Ok(agent.clone())
    }

    async fn get_by_id(&self, id: &AgentId) -> Result<Option<Agent>, RepositoryError> {
        Ok(self.agents.lock().unwrap().iter().find(|a| a.id == *id).cloned())
    }

    async fn list(&self, filter: AgentFilter) -> Result<Vec<AgentListing>, RepositoryError> {
        let mut agents: Vec<Agent> = self
            .agents
            .lock()
            .unwrap()
            .iter()
            .filter(|a| filter.creator_id.is_none() || a.creator_id == filter.creator_id)
            .cloned()
            .collect();
        agents.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        let offset = filter.offset.unwrap_or(0) as usize;
        let limit = filter.limit.unwrap_or(i64::MAX) as usize;
        Ok(agents
            .into_iter()
            .skip(offset)
            .take(limit)
            .map(|agent| {
                let interaction_count = self
                    .messages
                    .as_ref()
                    .map(|m| {
                        m.rows
                            .lock()
                            .unwrap()
                            .iter()
                            .filter(|r| r.agent_id == agent.id && r.role == MessageRole::User)
                            .count() as u64
                    })
                    .unwrap_or(0);
                AgentListing {
                    agent,
                    interaction_count,
                }
            })
            .collect())
    }

    async fn update(&self, agent: &Agent) -> Result<Agent, RepositoryError> {
        let mut agents = self.agents.lock().unwrap();
        let slot = agents
            .iter_mut()
            .find(|a| a.id == agent.id)
            .ok_or(RepositoryError::NotFound)?;
        *slot = agent.clone();
        Ok(agent.clone())
    }

    async fn delete(&self, id: &AgentId) -> Result<(), RepositoryError> {
        let mut agents = self.agents.lock().unwrap();
        let before = agents.len();
        agents.retain(|a| a.id != *id);
        if agents.len() == before {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }
}

#[derive(Clone, Default)]
pub struct MemMessages {
    pub rows: Arc<Mutex<Vec<ChatMessage>>>,
    pub fail_writes: bool,
}

impl MessageRepository for MemMessages {
    async fn save(&self, message: &ChatMessage) -> Result<(), RepositoryError> {
        if self.fail_writes {
            return Err(RepositoryError::Connection);
        }
        self.rows.lock().unwrap().push(message.clone());
        Ok(())
    }

    async fn list_for_user(
        &self,
        agent_id: &AgentId,
        user_id: &Uuid,
    ) -> Result<Vec<ChatMessage>, RepositoryError> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|m| m.agent_id == *agent_id && m.user_id == Some(*user_id))
            .cloned()
            .collect())
    }
}

#[derive(Clone, Default)]
pub struct MemGuests {
    pub counters: Arc<Mutex<HashMap<(GuestId, AgentId), u32>>>,
}

impl MemGuests {
    pub fn count(&self, guest_id: GuestId, agent_id: AgentId) -> Option<u32> {
        self.counters.lock().unwrap().get(&(guest_id, agent_id)).copied()
    }
}

impl GuestRepository for MemGuests {
    async fn get(
        &self,
        guest_id: &GuestId,
        agent_id: &AgentId,
    ) -> Result<Option<GuestInteraction>, RepositoryError> {
        let now = Utc::now();
        Ok(self
            .count(*guest_id, *agent_id)
            .map(|interaction_count| GuestInteraction {
                id: Uuid::now_v7(),
                guest_id: *guest_id,
                agent_id: *agent_id,
                interaction_count,
                created_at: now,
                updated_at: now,
            }))
    }

    async fn create_first(
        &self,
        guest_id: &GuestId,
        agent_id: &AgentId,
    ) -> Result<bool, RepositoryError> {
        let mut counters = self.counters.lock().unwrap();
        if counters.contains_key(&(*guest_id, *agent_id)) {
            return Ok(false);
        }
        counters.insert((*guest_id, *agent_id), 1);
        Ok(true)
    }

    async fn increment_below(
        &self,
        guest_id: &GuestId,
        agent_id: &AgentId,
        limit: u32,
    ) -> Result<Option<u32>, RepositoryError> {
        let mut counters = self.counters.lock().unwrap();
        match counters.get_mut(&(*guest_id, *agent_id)) {
            Some(count) if *count < limit => {
                *count += 1;
                Ok(Some(*count))
            }
            _ => Ok(None),
        }
    }
}

#[derive(Clone, Default)]
pub struct MemProfiles {
    pub profiles: Arc<Mutex<Vec<Profile>>>,
    pub tokens: Arc<Mutex<HashMap<String, Uuid>>>,
}

impl ProfileRepository for MemProfiles {
    async fn create(&self, profile: &Profile) -> Result<Profile, RepositoryError> {
        self.profiles.lock().unwrap().push(profile.clone());
        Ok(profile.clone())
    }

    async fn get_by_id(&self, id: &Uuid) -> Result<Option<Profile>, RepositoryError> {
        Ok(self.profiles.lock().unwrap().iter().find(|p| p.id == *id).cloned())
    }

    async fn list(&self) -> Result<Vec<Profile>, RepositoryError> {
        Ok(self.profiles.lock().unwrap().clone())
    }

    async fn update_username(
        &self,
        id: &Uuid,
        username: Option<&str>,
    ) -> Result<Profile, RepositoryError> {
        let mut profiles = self.profiles.lock().unwrap();
        if let Some(name) = username {
            if profiles
                .iter()
                .any(|p| p.id != *id && p.username.as_deref() == Some(name))
            {
                return Err(RepositoryError::Conflict(format!("username '{name}' taken")));
            }
        }
        let profile = profiles
            .iter_mut()
            .find(|p| p.id == *id)
            .ok_or(RepositoryError::NotFound)?;
        profile.username = username.map(str::to_string);
        Ok(profile.clone())
    }

    async fn store_token_hash(
        &self,
        profile_id: &Uuid,
        token_hash: &str,
    ) -> Result<(), RepositoryError> {
        self.tokens
            .lock()
            .unwrap()
            .insert(token_hash.to_string(), *profile_id);
        Ok(())
    }

    async fn find_by_token_hash(&self, token_hash: &str) -> Result<Option<Profile>, RepositoryError> {
        let id = self.tokens.lock().unwrap().get(token_hash).copied();
        match id {
            Some(id) => self.get_by_id(&id).await,
            None => Ok(None),
        }
    }
}

#[derive(Clone, Default)]
pub struct MemFiles {
    pub files: Arc<Mutex<Vec<AgentFile>>>,
    pub contents: Arc<Mutex<Vec<FileContent>>>,
}

impl FileRepository for MemFiles {
    async fn create(&self, file: &AgentFile) -> Result<(), RepositoryError> {
        self.files.lock().unwrap().push(file.clone());
        Ok(())
    }

    async fn get(&self, id: &Uuid) -> Result<Option<AgentFile>, RepositoryError> {
        Ok(self.files.lock().unwrap().iter().find(|f| f.id == *id).cloned())
    }

    async fn list_for_agent(&self, agent_id: &AgentId) -> Result<Vec<AgentFile>, RepositoryError> {
        Ok(self
            .files
            .lock()
            .unwrap()
            .iter()
            .filter(|f| f.agent_id == *agent_id)
            .cloned()
            .collect())
    }

    async fn delete(&self, id: &Uuid) -> Result<(), RepositoryError> {
        self.files.lock().unwrap().retain(|f| f.id != *id);
        self.contents.lock().unwrap().retain(|c| c.file_id != *id);
        Ok(())
    }

    async fn save_content(&self, content: &FileContent) -> Result<(), RepositoryError> {
        self.contents.lock().unwrap().push(content.clone());
        Ok(())
    }

    async fn contents_for_agent(&self, agent_id: &AgentId) -> Result<Vec<String>, RepositoryError> {
        let files = self.files.lock().unwrap();
        let contents = self.contents.lock().unwrap();
        Ok(files
            .iter()
            .filter(|f| f.agent_id == *agent_id)
            .filter_map(|f| contents.iter().find(|c| c.file_id == f.id))
            .map(|c| c.content.clone())
            .collect())
    }
}

#[derive(Clone, Default)]
pub struct MemObjects {
    pub objects: Arc<Mutex<HashMap<String, Vec<u8>>>>,
}

impl ObjectStore for MemObjects {
    async fn put(&self, key: &str, data: &[u8]) -> Result<(), FileError> {
        self.objects
            .lock()
            .unwrap()
            .insert(key.to_string(), data.to_vec());
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Vec<u8>, FileError> {
        self.objects
            .lock()
            .unwrap()
            .get(key)
            .cloned()
            .ok_or(FileError::NotFound)
    }

    async fn delete(&self, key: &str) -> Result<(), FileError> {
        self.objects.lock().unwrap().remove(key);
        Ok(())
    }

    async fn delete_prefix(&self, prefix: &str) -> Result<(), FileError> {
        let prefix = format!("{prefix}/");
        self.objects
            .lock()
            .unwrap()
            .retain(|k, _| !k.starts_with(&prefix));
        Ok(())
    }
}

// --- LLM ---

#[derive(Clone)]
pub enum MockReply {
    Text(String),
    Quota,
    Fail,
}

/// Provider that records every request and answers with a canned reply.
#[derive(Clone)]
pub struct MockLlm {
    pub reply: MockReply,
    pub requests: Arc<Mutex<Vec<CompletionRequest>>>,
}

impl MockLlm {
    pub fn replying(text: &str) -> Self {
        Self {
            reply: MockReply::Text(text.to_string()),
            requests: Arc::default(),
        }
    }

    pub fn failing(reply: MockReply) -> Self {
        Self {
            reply,
            requests: Arc::default(),
        }
    }

    pub fn calls(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn last_request(&self) -> Option<CompletionRequest> {
        self.requests.lock().unwrap().last().cloned()
    }
}

impl LlmProvider for MockLlm {
    fn name(&self) -> &str {
        "mock"
    }

    fn default_model(&self) -> &str {
        "mock-model"
    }

    async fn complete(&self, request: &CompletionRequest) -> Result<CompletionResponse, LlmError> {
        self.requests.lock().unwrap().push(request.clone());
        match &self.reply {
            MockReply::Text(text) => Ok(CompletionResponse {
                id: "resp-mock".into(),
                content: text.clone(),
                model: "mock-model".into(),
                usage: Usage::default(),
            }),
            MockReply::Quota => Err(LlmError::QuotaExceeded),
            MockReply::Fail => Err(LlmError::Provider {
                message: "upstream exploded".into(),
            }),
        }
    }
}
