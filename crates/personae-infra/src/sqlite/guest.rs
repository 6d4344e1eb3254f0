//! SQLite guest interaction counter repository.
//!
//! Row creation uses `INSERT .. ON CONFLICT DO NOTHING` against the
//! `(guest_id, agent_id)` unique key, and increments are a single guarded
//! `UPDATE .. RETURNING` on the writer connection.

use chrono::Utc;
use personae_core::repository::guest::GuestRepository;
use personae_types::agent::AgentId;
use personae_types::error::RepositoryError;
use personae_types::guest::{GuestId, GuestInteraction};
use sqlx::Row;
use uuid::Uuid;

use super::pool::DatabasePool;
use super::{format_datetime, parse_datetime, parse_uuid, query_error};

pub struct SqliteGuestRepository {
    pool: DatabasePool,
}

impl SqliteGuestRepository {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

impl GuestRepository for SqliteGuestRepository {
    async fn get(
        &self,
        guest_id: &GuestId,
        agent_id: &AgentId,
    ) -> Result<Option<GuestInteraction>, RepositoryError> {
        let row = sqlx::query(
            "SELECT * FROM guest_interactions WHERE guest_id = ? AND agent_id = ?",
        )
        .bind(guest_id.to_string())
        .bind(agent_id.to_string())
        .fetch_optional(&self.pool.reader)
        .await
        .map_err(query_error)?;

        let Some(row) = row else {
            return Ok(None);
        };

        let id: String = row.try_get("id").map_err(query_error)?;
        let count: i64 = row.try_get("interaction_count").map_err(query_error)?;
        let created_at: String = row.try_get("created_at").map_err(query_error)?;
        let updated_at: String = row.try_get("updated_at").map_err(query_error)?;

        Ok(Some(GuestInteraction {
            id: parse_uuid(&id, "guest interaction id")?,
            guest_id: *guest_id,
            agent_id: *agent_id,
            interaction_count: u32::try_from(count).unwrap_or(u32::MAX),
            created_at: parse_datetime(&created_at)?,
            updated_at: parse_datetime(&updated_at)?,
        }))
    }

    async fn create_first(
        &self,
        guest_id: &GuestId,
        agent_id: &AgentId,
    ) -> Result<bool, RepositoryError> {
        let now = format_datetime(&Utc::now());
        let result = sqlx::query(
            "INSERT INTO guest_interactions (id, guest_id, agent_id, interaction_count, created_at, updated_at)
             VALUES (?, ?, ?, 1, ?, ?)
             ON CONFLICT (guest_id, agent_id) DO NOTHING",
        )
        .bind(Uuid::now_v7().to_string())
        .bind(guest_id.to_string())
        .bind(agent_id.to_string())
        .bind(&now)
        .bind(&now)
        .execute(&self.pool.writer)
        .await
        .map_err(query_error)?;

        Ok(result.rows_affected() == 1)
    }

    async fn increment_below(
        &self,
        guest_id: &GuestId,
        agent_id: &AgentId,
        limit: u32,
    ) -> Result<Option<u32>, RepositoryError> {
        let row = sqlx::query(
            "UPDATE guest_interactions
             SET interaction_count = interaction_count + 1, updated_at = ?
             WHERE guest_id = ? AND agent_id = ? AND interaction_count < ?
             RETURNING interaction_count",
        )
        .bind(format_datetime(&Utc::now()))
        .bind(guest_id.to_string())
        .bind(agent_id.to_string())
        .bind(i64::from(limit))
        .fetch_optional(&self.pool.writer)
        .await
        .map_err(query_error)?;

        match row {
            Some(row) => {
                let count: i64 = row.try_get("interaction_count").map_err(query_error)?;
                Ok(Some(u32::try_from(count).unwrap_or(u32::MAX)))
            }
            None => Ok(None),
        }
    }
}
