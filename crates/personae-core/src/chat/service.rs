//! Chat service: one user message in, one agent reply out.
//!
//! The pipeline for a send:
//! 1. Reject blank messages and unknown agents
//! 2. Guests pass through the [`GuestGate`]; signed-in users have their
//!    stored history loaded and the new message persisted
//! 3. Build the persona system prompt (with knowledge extracts)
//! 4. Call the LLM provider
//! 5. Persist the reply for signed-in users
//!
//! Persistence failures are logged and do not fail the exchange. LLM
//! failures are returned to the caller.

use personae_types::agent::{Agent, AgentId};
use personae_types::chat::{
    ChatMessage, ChatOutcome, ChatRequest, Language, Message, MessageRole,
};
use personae_types::config::{ChatConfig, LlmConfig};
use personae_types::error::{ChatError, GuestError, RepositoryError};
use personae_types::guest::{GateDecision, GuestStatus};
use personae_types::llm::CompletionRequest;
use personae_types::session::Session;
use tracing::{Instrument, debug, error, info, info_span, warn};
use uuid::Uuid;

use super::prompt::PersonaPromptBuilder;
use crate::llm::provider::LlmProvider;
use crate::repository::agent::AgentRepository;
use crate::repository::file::FileRepository;
use crate::repository::guest::GuestRepository;
use crate::repository::message::MessageRepository;
use crate::service::guest::GuestGate;

pub const GUEST_PROMPT_MESSAGE: &str =
    "Continue as a guest or sign up to keep your conversations.";
pub const SIGN_UP_REQUIRED_MESSAGE: &str =
    "You've reached the free message limit for this agent. Sign up to keep chatting.";
/// Where a guest is sent once the free limit is used up.
pub const SIGN_UP_REDIRECT: &str = "/";

/// Completion parameters and prompt limits used for every exchange.
#[derive(Debug, Clone)]
pub struct ChatSettings {
    pub model: String,
    pub temperature: f64,
    pub max_tokens: u32,
    pub default_language: Language,
    pub max_knowledge_chars: usize,
}

impl ChatSettings {
    pub fn from_config(llm: &LlmConfig, chat: &ChatConfig) -> Self {
        Self {
            model: llm.model.clone(),
            temperature: llm.temperature,
            max_tokens: llm.max_tokens,
            default_language: chat.default_language,
            max_knowledge_chars: chat.max_knowledge_chars,
        }
    }
}

impl Default for ChatSettings {
    fn default() -> Self {
        Self::from_config(&LlmConfig::default(), &ChatConfig::default())
    }
}

/// Where the conversation history comes from and where the exchange is recorded.
enum Caller {
    Guest { remaining: u32 },
    User { id: Uuid },
}

pub struct ChatService<A, M, G, F, L>
where
    A: AgentRepository,
    M: MessageRepository,
    G: GuestRepository,
    F: FileRepository,
    L: LlmProvider,
{
    agent_repo: A,
    message_repo: M,
    gate: GuestGate<G>,
    file_repo: F,
    provider: L,
    settings: ChatSettings,
}

impl<A, M, G, F, L> ChatService<A, M, G, F, L>
where
    A: AgentRepository,
    M: MessageRepository,
    G: GuestRepository,
    F: FileRepository,
    L: LlmProvider,
{
    pub fn new(
        agent_repo: A,
        message_repo: M,
        gate: GuestGate<G>,
        file_repo: F,
        provider: L,
        settings: ChatSettings,
    ) -> Self {
        Self {
            agent_repo,
            message_repo,
            gate,
            file_repo,
            provider,
            settings,
        }
    }

    /// Send one user message to an agent and return the outcome.
    pub async fn send(
        &self,
        session: &Session,
        agent_id: &AgentId,
        request: ChatRequest,
    ) -> Result<ChatOutcome, ChatError> {
        let content = request.content.trim().to_string();
        if content.is_empty() {
            return Err(ChatError::EmptyMessage);
        }

        let agent = self.agent(agent_id).await?;

        let caller = match session {
            Session::Anonymous => return Err(ChatError::Guest(GuestError::Unavailable)),
            Session::Guest { guest_id } => {
                match self
                    .gate
                    .check_and_record(guest_id, &agent.id, request.continue_as_guest)
                    .await?
                {
                    GateDecision::Allowed { remaining, .. } => Caller::Guest { remaining },
                    GateDecision::Prompt => {
                        debug!(%guest_id, agent_id = %agent.id, "guest asked to continue or sign up");
                        return Ok(ChatOutcome::GuestPrompt {
                            message: GUEST_PROMPT_MESSAGE.to_string(),
                        });
                    }
                    GateDecision::SignUpRequired => {
                        info!(%guest_id, agent_id = %agent.id, "guest message limit reached");
                        return Ok(ChatOutcome::SignUpRequired {
                            message: SIGN_UP_REQUIRED_MESSAGE.to_string(),
                            redirect: SIGN_UP_REDIRECT.to_string(),
                        });
                    }
                }
            }
            Session::Authenticated { profile } => Caller::User { id: profile.id },
        };

        let mut messages = match &caller {
            Caller::Guest { .. } => request
                .history
                .into_iter()
                .filter(|m| m.role != MessageRole::System)
                .collect(),
            Caller::User { id } => self.stored_history(&agent.id, id).await,
        };

        if let Caller::User { id } = &caller {
            self.record(&agent.id, *id, MessageRole::User, &content).await;
        }
        messages.push(Message::user(content));

        let language = request.language.unwrap_or(self.settings.default_language);
        let system = self.system_prompt(&agent, language).await;

        let completion = CompletionRequest {
            model: self.settings.model.clone(),
            messages,
            system: Some(system),
            max_tokens: self.settings.max_tokens,
            temperature: Some(self.settings.temperature),
        };

        let span = info_span!(
            "gen_ai.complete",
            gen_ai.system = self.provider.name(),
            gen_ai.agent.id = %agent.id,
            gen_ai.request.model = %completion.model,
            gen_ai.request.max_tokens = completion.max_tokens,
            gen_ai.request.temperature = ?completion.temperature,
        );
        let response = self.provider.complete(&completion).instrument(span).await.map_err(|e| {
            error!(agent_id = %agent.id, provider = self.provider.name(), error = %e, "chat completion failed");
            ChatError::Llm(e)
        })?;

        let reply = response.content;
        let guest_remaining = match caller {
            Caller::User { id } => {
                self.record(&agent.id, id, MessageRole::Assistant, &reply).await;
                None
            }
            Caller::Guest { remaining } => Some(remaining),
        };

        debug!(
            agent_id = %agent.id,
            input_tokens = response.usage.input_tokens,
            output_tokens = response.usage.output_tokens,
            "chat reply generated"
        );

        Ok(ChatOutcome::Replied {
            reply: Message::assistant(reply),
            guest_remaining,
        })
    }

    /// Stored conversation between the signed-in caller and an agent.
    pub async fn history(
        &self,
        session: &Session,
        agent_id: &AgentId,
    ) -> Result<Vec<ChatMessage>, ChatError> {
        let user_id = session.user_id().ok_or(ChatError::Unauthenticated)?;
        let agent = self.agent(agent_id).await?;
        self.message_repo
            .list_for_user(&agent.id, &user_id)
            .await
            .map_err(storage)
    }

    /// Free-message usage for the calling guest.
    pub async fn guest_status(
        &self,
        session: &Session,
        agent_id: &AgentId,
    ) -> Result<GuestStatus, ChatError> {
        let guest_id = session
            .guest_id()
            .ok_or(ChatError::Guest(GuestError::Unavailable))?;
        let agent = self.agent(agent_id).await?;
        Ok(self.gate.status(&guest_id, &agent.id).await?)
    }

    async fn agent(&self, agent_id: &AgentId) -> Result<Agent, ChatError> {
        self.agent_repo
            .get_by_id(agent_id)
            .await
            .map_err(storage)?
            .ok_or(ChatError::AgentNotFound)
    }

    async fn stored_history(&self, agent_id: &AgentId, user_id: &Uuid) -> Vec<Message> {
        match self.message_repo.list_for_user(agent_id, user_id).await {
            Ok(rows) => rows.iter().map(ChatMessage::to_message).collect(),
            Err(e) => {
                warn!(%agent_id, %user_id, error = %e, "failed to load chat history");
                Vec::new()
            }
        }
    }

    async fn record(&self, agent_id: &AgentId, user_id: Uuid, role: MessageRole, content: &str) {
        let message = ChatMessage::new(*agent_id, Some(user_id), role, content.to_string());
        if let Err(e) = self.message_repo.save(&message).await {
            warn!(%agent_id, %user_id, %role, error = %e, "failed to save chat message");
        }
    }

    async fn system_prompt(&self, agent: &Agent, language: Language) -> String {
        let contents = match self.file_repo.contents_for_agent(&agent.id).await {
            Ok(contents) => contents,
            Err(e) => {
                warn!(agent_id = %agent.id, error = %e, "failed to load knowledge files");
                Vec::new()
            }
        };
        let knowledge =
            PersonaPromptBuilder::knowledge(&contents, self.settings.max_knowledge_chars);
        PersonaPromptBuilder::build(agent, knowledge.as_deref(), language)
    }
}

fn storage(e: RepositoryError) -> ChatError {
    ChatError::StorageError(e.to_string())
}
