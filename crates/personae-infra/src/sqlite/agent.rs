//! SQLite agent repository implementation.
//!
//! Implements `AgentRepository` from `personae-core` using sqlx with split read/write pools.

use personae_core::repository::agent::{AgentFilter, AgentRepository};
use personae_types::agent::{Agent, AgentId, AgentListing};
use personae_types::error::RepositoryError;
use sqlx::Row;

use super::pool::DatabasePool;
use super::{format_datetime, parse_datetime, parse_uuid, query_error};

/// SQLite-backed implementation of `AgentRepository`.
pub struct SqliteAgentRepository {
    pool: DatabasePool,
}

impl SqliteAgentRepository {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

/// Internal row type for mapping SQLite rows to domain Agent.
struct AgentRow {
    id: String,
    name: String,
    description: String,
    expertise: String,
    instructions: Option<String>,
    traits: String,
    creator_id: Option<String>,
    created_at: String,
    updated_at: String,
}

impl AgentRow {
    fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            name: row.try_get("name")?,
            description: row.try_get("description")?,
            expertise: row.try_get("expertise")?,
            instructions: row.try_get("instructions")?,
            traits: row.try_get("traits")?,
            creator_id: row.try_get("creator_id")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }

    fn into_agent(self) -> Result<Agent, RepositoryError> {
        let traits: Vec<String> = serde_json::from_str(&self.traits)
            .map_err(|e| RepositoryError::Query(format!("invalid traits JSON: {e}")))?;

        Ok(Agent {
            id: AgentId(parse_uuid(&self.id, "agent id")?),
            name: self.name,
            description: self.description,
            expertise: self.expertise,
            instructions: self.instructions,
            traits,
            creator_id: self
                .creator_id
                .as_deref()
                .map(|id| parse_uuid(id, "creator id"))
                .transpose()?,
            created_at: parse_datetime(&self.created_at)?,
            updated_at: parse_datetime(&self.updated_at)?,
        })
    }
}

fn traits_json(agent: &Agent) -> Result<String, RepositoryError> {
    serde_json::to_string(&agent.traits).map_err(|e| RepositoryError::Query(e.to_string()))
}

impl AgentRepository for SqliteAgentRepository {
    async fn create(&self, agent: &Agent) -> Result<Agent, RepositoryError> {
        let result = sqlx::query(
            "INSERT INTO agents (id, name, description, expertise, instructions, traits, creator_id, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(agent.id.to_string())
        .bind(&agent.name)
        .bind(&agent.description)
        .bind(&agent.expertise)
        .bind(&agent.instructions)
        .bind(traits_json(agent)?)
        .bind(agent.creator_id.map(|id| id.to_string()))
        .bind(format_datetime(&agent.created_at))
        .bind(format_datetime(&agent.updated_at))
        .execute(&self.pool.writer)
        .await;

        match result {
            Ok(_) => Ok(agent.clone()),
            Err(sqlx::Error::Database(db_err)) if db_err.message().contains("UNIQUE") => Err(
                RepositoryError::Conflict(format!("agent '{}' already exists", agent.id)),
            ),
            Err(e) => Err(query_error(e)),
        }
    }

    async fn get_by_id(&self, id: &AgentId) -> Result<Option<Agent>, RepositoryError> {
        let row = sqlx::query("SELECT * FROM agents WHERE id = ?")
            .bind(id.to_string())
            .fetch_optional(&self.pool.reader)
            .await
            .map_err(query_error)?;

        match row {
            Some(row) => {
                let agent_row = AgentRow::from_row(&row).map_err(query_error)?;
                Ok(Some(agent_row.into_agent()?))
            }
            None => Ok(None),
        }
    }

    async fn list(&self, filter: AgentFilter) -> Result<Vec<AgentListing>, RepositoryError> {
        let mut sql = String::from(
            "SELECT a.*,
                    (SELECT COUNT(*) FROM messages m WHERE m.agent_id = a.id AND m.role = 'user')
                        AS interaction_count
             FROM agents a",
        );
        if filter.creator_id.is_some() {
            sql.push_str(" WHERE a.creator_id = ?");
        }
        sql.push_str(" ORDER BY a.created_at DESC, a.id DESC LIMIT ? OFFSET ?");

        let mut query = sqlx::query(&sql);
        if let Some(creator_id) = filter.creator_id {
            query = query.bind(creator_id.to_string());
        }
        let rows = query
            .bind(filter.limit.unwrap_or(-1))
            .bind(filter.offset.unwrap_or(0))
            .fetch_all(&self.pool.reader)
            .await
            .map_err(query_error)?;

        let mut listings = Vec::with_capacity(rows.len());
        for row in &rows {
            let interaction_count: i64 = row.try_get("interaction_count").map_err(query_error)?;
            let agent = AgentRow::from_row(row).map_err(query_error)?.into_agent()?;
            listings.push(AgentListing {
                agent,
                interaction_count: interaction_count.max(0) as u64,
            });
        }
        Ok(listings)
    }

    async fn update(&self, agent: &Agent) -> Result<Agent, RepositoryError> {
        let result = sqlx::query(
            "UPDATE agents SET name = ?, description = ?, expertise = ?, instructions = ?, traits = ?, updated_at = ?
             WHERE id = ?",
        )
        .bind(&agent.name)
        .bind(&agent.description)
        .bind(&agent.expertise)
        .bind(&agent.instructions)
        .bind(traits_json(agent)?)
        .bind(format_datetime(&agent.updated_at))
        .bind(agent.id.to_string())
        .execute(&self.pool.writer)
        .await
        .map_err(query_error)?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(agent.clone())
    }

    async fn delete(&self, id: &AgentId) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM agents WHERE id = ?")
            .bind(id.to_string())
            .execute(&self.pool.writer)
            .await
            .map_err(query_error)?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }
}
