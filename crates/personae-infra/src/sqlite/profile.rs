//! SQLite profile and access-token repository implementation.

use chrono::Utc;
use personae_core::repository::profile::ProfileRepository;
use personae_types::error::RepositoryError;
use personae_types::profile::{Profile, ProfileRole};
use sqlx::Row;
use uuid::Uuid;

use super::pool::DatabasePool;
use super::{format_datetime, parse_datetime, parse_uuid, query_error};

pub struct SqliteProfileRepository {
    pool: DatabasePool,
}

impl SqliteProfileRepository {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

fn profile_from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Profile, RepositoryError> {
    let id: String = row.try_get("id").map_err(query_error)?;
    let username: Option<String> = row.try_get("username").map_err(query_error)?;
    let role: String = row.try_get("role").map_err(query_error)?;
    let created_at: String = row.try_get("created_at").map_err(query_error)?;

    Ok(Profile {
        id: parse_uuid(&id, "profile id")?,
        username,
        role: role.parse::<ProfileRole>().map_err(RepositoryError::Query)?,
        created_at: parse_datetime(&created_at)?,
    })
}

fn unique_violation(e: sqlx::Error, what: &str) -> RepositoryError {
    match e {
        sqlx::Error::Database(db_err) if db_err.message().contains("UNIQUE") => {
            RepositoryError::Conflict(format!("{what} already exists"))
        }
        other => query_error(other),
    }
}

impl ProfileRepository for SqliteProfileRepository {
    async fn create(&self, profile: &Profile) -> Result<Profile, RepositoryError> {
        sqlx::query("INSERT INTO profiles (id, username, role, created_at) VALUES (?, ?, ?, ?)")
            .bind(profile.id.to_string())
            .bind(&profile.username)
            .bind(profile.role.to_string())
            .bind(format_datetime(&profile.created_at))
            .execute(&self.pool.writer)
            .await
            .map_err(|e| unique_violation(e, "username"))?;
        Ok(profile.clone())
    }

    async fn get_by_id(&self, id: &Uuid) -> Result<Option<Profile>, RepositoryError> {
        let row = sqlx::query("SELECT * FROM profiles WHERE id = ?")
            .bind(id.to_string())
            .fetch_optional(&self.pool.reader)
            .await
            .map_err(query_error)?;
        row.as_ref().map(profile_from_row).transpose()
    }

    async fn list(&self) -> Result<Vec<Profile>, RepositoryError> {
        let rows = sqlx::query("SELECT * FROM profiles ORDER BY created_at ASC")
            .fetch_all(&self.pool.reader)
            .await
            .map_err(query_error)?;
        rows.iter().map(profile_from_row).collect()
    }

    async fn update_username(
        &self,
        id: &Uuid,
        username: Option<&str>,
    ) -> Result<Profile, RepositoryError> {
        let result = sqlx::query("UPDATE profiles SET username = ? WHERE id = ?")
            .bind(username)
            .bind(id.to_string())
            .execute(&self.pool.writer)
            .await
            .map_err(|e| unique_violation(e, "username"))?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        // Read back on the writer so the change is visible immediately.
        let row = sqlx::query("SELECT * FROM profiles WHERE id = ?")
            .bind(id.to_string())
            .fetch_one(&self.pool.writer)
            .await
            .map_err(query_error)?;
        profile_from_row(&row)
    }

    async fn store_token_hash(
        &self,
        profile_id: &Uuid,
        token_hash: &str,
    ) -> Result<(), RepositoryError> {
        sqlx::query(
            "INSERT INTO access_tokens (id, profile_id, token_hash, created_at) VALUES (?, ?, ?, ?)",
        )
        .bind(Uuid::now_v7().to_string())
        .bind(profile_id.to_string())
        .bind(token_hash)
        .bind(format_datetime(&Utc::now()))
        .execute(&self.pool.writer)
        .await
        .map_err(|e| unique_violation(e, "token"))?;
        Ok(())
    }

    async fn find_by_token_hash(&self, token_hash: &str) -> Result<Option<Profile>, RepositoryError> {
        let row = sqlx::query(
            "SELECT p.* FROM profiles p
             JOIN access_tokens t ON t.profile_id = p.id
             WHERE t.token_hash = ?",
        )
        .bind(token_hash)
        .fetch_optional(&self.pool.reader)
        .await
        .map_err(query_error)?;

        let Some(row) = row else {
            return Ok(None);
        };

        // Best effort; a failed timestamp update must not fail authentication.
        let _ = sqlx::query("UPDATE access_tokens SET last_used_at = ? WHERE token_hash = ?")
            .bind(format_datetime(&Utc::now()))
            .bind(token_hash)
            .execute(&self.pool.writer)
            .await;

        profile_from_row(&row).map(Some)
    }
}
