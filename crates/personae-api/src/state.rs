//! Application state wiring all services together.
//!
//! AppState holds the concrete service instances used by both CLI and REST API.
//! Services are generic over repository/storage/provider traits; AppState pins
//! them to the concrete infra implementations.

use std::path::PathBuf;
use std::sync::Arc;

use personae_core::chat::service::{ChatService, ChatSettings};
use personae_core::llm::box_provider::BoxLlmProvider;
use personae_core::service::agent::AgentService;
use personae_core::service::file::FileService;
use personae_core::service::guest::GuestGate;
use personae_core::service::profile::ProfileService;
use personae_infra::config::{load_app_config, resolve_api_key};
use personae_infra::filesystem::{LocalObjectStore, resolve_data_dir};
use personae_infra::llm::create_provider;
use personae_infra::sqlite::agent::SqliteAgentRepository;
use personae_infra::sqlite::file::SqliteFileRepository;
use personae_infra::sqlite::guest::SqliteGuestRepository;
use personae_infra::sqlite::message::SqliteMessageRepository;
use personae_infra::sqlite::pool::DatabasePool;
use personae_infra::sqlite::profile::SqliteProfileRepository;
use personae_types::config::AppConfig;

/// Concrete type aliases for the service generics pinned to infra implementations.
pub type ConcreteAgentService = AgentService<SqliteAgentRepository, LocalObjectStore>;

pub type ConcreteChatService = ChatService<
    SqliteAgentRepository,
    SqliteMessageRepository,
    SqliteGuestRepository,
    SqliteFileRepository,
    BoxLlmProvider,
>;

pub type ConcreteFileService =
    FileService<SqliteFileRepository, SqliteAgentRepository, LocalObjectStore>;

pub type ConcreteProfileService = ProfileService<SqliteProfileRepository>;

/// Shared application state holding all services.
#[derive(Clone)]
pub struct AppState {
    pub agent_service: Arc<ConcreteAgentService>,
    pub chat_service: Arc<ConcreteChatService>,
    pub file_service: Arc<ConcreteFileService>,
    pub profile_service: Arc<ConcreteProfileService>,
    pub config: Arc<AppConfig>,
    pub data_dir: PathBuf,
}

impl AppState {
    /// Initialize the application state: load config, connect to DB, wire services.
    pub async fn init() -> anyhow::Result<Self> {
        let data_dir = resolve_data_dir();
        tokio::fs::create_dir_all(&data_dir).await?;

        let config = load_app_config(&data_dir).await;
        let db_pool = DatabasePool::open_in(&data_dir).await?;
        let provider = create_provider(&config.llm, resolve_api_key(&config.llm))?;

        Ok(Self::build(db_pool, config, provider, data_dir))
    }

    /// Wire services over an already-open pool.
    pub fn build(
        db_pool: DatabasePool,
        config: AppConfig,
        provider: BoxLlmProvider,
        data_dir: PathBuf,
    ) -> Self {
        let object_store = LocalObjectStore::in_data_dir(&data_dir);

        let agent_service = AgentService::new(
            SqliteAgentRepository::new(db_pool.clone()),
            object_store.clone(),
        );

        let gate = GuestGate::new(
            SqliteGuestRepository::new(db_pool.clone()),
            config.chat.guest_message_limit,
        );
        let chat_service = ChatService::new(
            SqliteAgentRepository::new(db_pool.clone()),
            SqliteMessageRepository::new(db_pool.clone()),
            gate,
            SqliteFileRepository::new(db_pool.clone()),
            provider,
            ChatSettings::from_config(&config.llm, &config.chat),
        );

        let file_service = FileService::new(
            SqliteFileRepository::new(db_pool.clone()),
            SqliteAgentRepository::new(db_pool.clone()),
            object_store,
            config.storage.max_file_size_bytes,
        );

        let profile_service = ProfileService::new(SqliteProfileRepository::new(db_pool));

        Self {
            agent_service: Arc::new(agent_service),
            chat_service: Arc::new(chat_service),
            file_service: Arc::new(file_service),
            profile_service: Arc::new(profile_service),
            config: Arc::new(config),
            data_dir,
        }
    }
}
