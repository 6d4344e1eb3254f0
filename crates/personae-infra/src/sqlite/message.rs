//! SQLite message repository implementation.

use personae_core::repository::message::MessageRepository;
use personae_types::agent::AgentId;
use personae_types::chat::{ChatMessage, MessageRole};
use personae_types::error::RepositoryError;
use sqlx::Row;
use uuid::Uuid;

use super::pool::DatabasePool;
use super::{format_datetime, parse_datetime, parse_uuid, query_error};

/// SQLite-backed implementation of `MessageRepository`.
pub struct SqliteMessageRepository {
    pool: DatabasePool,
}

impl SqliteMessageRepository {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

fn message_from_row(row: &sqlx::sqlite::SqliteRow) -> Result<ChatMessage, RepositoryError> {
    let id: String = row.try_get("id").map_err(query_error)?;
    let agent_id: String = row.try_get("agent_id").map_err(query_error)?;
    let user_id: Option<String> = row.try_get("user_id").map_err(query_error)?;
    let role: String = row.try_get("role").map_err(query_error)?;
    let content: String = row.try_get("content").map_err(query_error)?;
    let created_at: String = row.try_get("created_at").map_err(query_error)?;

    Ok(ChatMessage {
        id: parse_uuid(&id, "message id")?,
        agent_id: AgentId(parse_uuid(&agent_id, "agent id")?),
        user_id: user_id
            .as_deref()
            .map(|u| parse_uuid(u, "user id"))
            .transpose()?,
        role: role
            .parse::<MessageRole>()
            .map_err(RepositoryError::Query)?,
        content,
        created_at: parse_datetime(&created_at)?,
    })
}

impl MessageRepository for SqliteMessageRepository {
    async fn save(&self, message: &ChatMessage) -> Result<(), RepositoryError> {
        sqlx::query(
            "INSERT INTO messages (id, agent_id, user_id, role, content, created_at)
             VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(message.id.to_string())
        .bind(message.agent_id.to_string())
        .bind(message.user_id.map(|id| id.to_string()))
        .bind(message.role.to_string())
        .bind(&message.content)
        .bind(format_datetime(&message.created_at))
        .execute(&self.pool.writer)
        .await
        .map_err(query_error)?;
        Ok(())
    }

    async fn list_for_user(
        &self,
        agent_id: &AgentId,
        user_id: &Uuid,
    ) -> Result<Vec<ChatMessage>, RepositoryError> {
        let rows = sqlx::query(
            "SELECT * FROM messages WHERE agent_id = ? AND user_id = ?
             ORDER BY created_at ASC, id ASC",
        )
        .bind(agent_id.to_string())
        .bind(user_id.to_string())
        .fetch_all(&self.pool.reader)
        .await
        .map_err(query_error)?;

        rows.iter().map(message_from_row).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sqlite::agent::SqliteAgentRepository;
    use crate::sqlite::profile::SqliteProfileRepository;
    use crate::sqlite::test_support::test_pool;
    use chrono::Utc;
    use personae_core::repository::agent::AgentRepository;
    use personae_core::repository::profile::ProfileRepository;
    use personae_types::agent::Agent;
    use personae_types::profile::{Profile, ProfileRole};

    async fn seed(pool: &DatabasePool) -> (AgentId, Uuid, Uuid) {
        let now = Utc::now();
        let agent = Agent {
            id: AgentId::new(),
            name: "Tutor".into(),
            description: "Helps".into(),
            expertise: String::new(),
            instructions: None,
            traits: Vec::new(),
            creator_id: None,
            created_at: now,
            updated_at: now,
        };
        SqliteAgentRepository::new(pool.clone())
            .create(&agent)
            .await
            .unwrap();

        let profiles = SqliteProfileRepository::new(pool.clone());
        let mut ids = Vec::new();
        for _ in 0..2 {
            let profile = Profile {
                id: Uuid::now_v7(),
                username: None,
                role: ProfileRole::User,
                created_at: now,
            };
            profiles.create(&profile).await.unwrap();
            ids.push(profile.id);
        }
        (agent.id, ids[0], ids[1])
    }

    #[tokio::test]
    async fn test_messages_ordered_and_scoped_to_user() {
        let pool = test_pool().await;
        let (agent_id, alice, bob) = seed(&pool).await;
        let repo = SqliteMessageRepository::new(pool);

        repo.save(&ChatMessage::new(agent_id, Some(alice), MessageRole::User, "Hello".into()))
            .await
            .unwrap();
        repo.save(&ChatMessage::new(agent_id, Some(alice), MessageRole::Assistant, "Hi there".into()))
            .await
            .unwrap();
        repo.save(&ChatMessage::new(agent_id, Some(bob), MessageRole::User, "Other".into()))
            .await
            .unwrap();

        let history = repo.list_for_user(&agent_id, &alice).await.unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].role, MessageRole::User);
        assert_eq!(history[0].content, "Hello");
        assert_eq!(history[1].role, MessageRole::Assistant);
        assert_eq!(history[1].content, "Hi there");
    }

    #[tokio::test]
    async fn test_message_requires_existing_agent() {
        let repo = SqliteMessageRepository::new(test_pool().await);
        let result = repo
            .save(&ChatMessage::new(AgentId::new(), None, MessageRole::User, "x".into()))
            .await;
        assert!(result.is_err(), "foreign key should reject unknown agent");
    }
}
