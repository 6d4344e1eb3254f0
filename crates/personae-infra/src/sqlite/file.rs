//! SQLite knowledge-file repository implementation.

use personae_core::repository::file::FileRepository;
use personae_types::agent::AgentId;
use personae_types::error::RepositoryError;
use personae_types::file::{AgentFile, FileContent};
use sqlx::Row;
use uuid::Uuid;

use super::pool::DatabasePool;
use super::{format_datetime, parse_datetime, parse_uuid, query_error};

pub struct SqliteFileRepository {
    pool: DatabasePool,
}

impl SqliteFileRepository {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

fn file_from_row(row: &sqlx::sqlite::SqliteRow) -> Result<AgentFile, RepositoryError> {
    let id: String = row.try_get("id").map_err(query_error)?;
    let agent_id: String = row.try_get("agent_id").map_err(query_error)?;
    let size: i64 = row.try_get("size").map_err(query_error)?;
    let created_at: String = row.try_get("created_at").map_err(query_error)?;
    let updated_at: String = row.try_get("updated_at").map_err(query_error)?;

    Ok(AgentFile {
        id: parse_uuid(&id, "file id")?,
        agent_id: AgentId(parse_uuid(&agent_id, "agent id")?),
        filename: row.try_get("filename").map_err(query_error)?,
        file_path: row.try_get("file_path").map_err(query_error)?,
        content_type: row.try_get("content_type").map_err(query_error)?,
        size: size.max(0) as u64,
        created_at: parse_datetime(&created_at)?,
        updated_at: parse_datetime(&updated_at)?,
    })
}

impl FileRepository for SqliteFileRepository {
    async fn create(&self, file: &AgentFile) -> Result<(), RepositoryError> {
        sqlx::query(
            "INSERT INTO agent_files (id, agent_id, filename, file_path, content_type, size, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(file.id.to_string())
        .bind(file.agent_id.to_string())
        .bind(&file.filename)
        .bind(&file.file_path)
        .bind(&file.content_type)
        .bind(i64::try_from(file.size).unwrap_or(i64::MAX))
        .bind(format_datetime(&file.created_at))
        .bind(format_datetime(&file.updated_at))
        .execute(&self.pool.writer)
        .await
        .map_err(query_error)?;
        Ok(())
    }

    async fn get(&self, id: &Uuid) -> Result<Option<AgentFile>, RepositoryError> {
        let row = sqlx::query("SELECT * FROM agent_files WHERE id = ?")
            .bind(id.to_string())
            .fetch_optional(&self.pool.reader)
            .await
            .map_err(query_error)?;
        row.as_ref().map(file_from_row).transpose()
    }

    async fn list_for_agent(&self, agent_id: &AgentId) -> Result<Vec<AgentFile>, RepositoryError> {
        let rows = sqlx::query(
            "SELECT * FROM agent_files WHERE agent_id = ? ORDER BY created_at ASC, id ASC",
        )
        .bind(agent_id.to_string())
        .fetch_all(&self.pool.reader)
        .await
        .map_err(query_error)?;
        rows.iter().map(file_from_row).collect()
    }

    async fn delete(&self, id: &Uuid) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM agent_files WHERE id = ?")
            .bind(id.to_string())
            .execute(&self.pool.writer)
            .await
            .map_err(query_error)?;
        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    async fn save_content(&self, content: &FileContent) -> Result<(), RepositoryError> {
        sqlx::query(
            "INSERT INTO file_contents (id, file_id, content, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?)
             ON CONFLICT (file_id) DO UPDATE SET content = excluded.content, updated_at = excluded.updated_at",
        )
        .bind(content.id.to_string())
        .bind(content.file_id.to_string())
        .bind(&content.content)
        .bind(format_datetime(&content.created_at))
        .bind(format_datetime(&content.updated_at))
        .execute(&self.pool.writer)
        .await
        .map_err(query_error)?;
        Ok(())
    }

    async fn contents_for_agent(&self, agent_id: &AgentId) -> Result<Vec<String>, RepositoryError> {
        let rows: Vec<(String,)> = sqlx::query_as(
            "SELECT c.content FROM file_contents c
             JOIN agent_files f ON f.id = c.file_id
             WHERE f.agent_id = ?
             ORDER BY f.created_at ASC, f.id ASC",
        )
        .bind(agent_id.to_string())
        .fetch_all(&self.pool.reader)
        .await
        .map_err(query_error)?;
        Ok(rows.into_iter().map(|(content,)| content).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sqlite::agent::SqliteAgentRepository;
    use crate::sqlite::test_support::test_pool;
    use chrono::Utc;
    use personae_core::repository::agent::AgentRepository;
    use personae_types::agent::Agent;

    async fn seed_agent(pool: &DatabasePool) -> AgentId {
        let now = Utc::now();
        let agent = Agent {
            id: AgentId::new(),
            name: "Librarian".into(),
            description: "Knows books".into(),
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
        agent.id
    }

    fn make_file(agent_id: AgentId, name: &str) -> AgentFile {
        let now = Utc::now();
        let id = Uuid::now_v7();
        AgentFile {
            id,
            agent_id,
            filename: name.to_string(),
            file_path: format!("{agent_id}/{id}.txt"),
            content_type: "text/plain".to_string(),
            size: 42,
            created_at: now,
            updated_at: now,
        }
    }

    fn make_content(file_id: Uuid, text: &str) -> FileContent {
        let now = Utc::now();
        FileContent {
            id: Uuid::now_v7(),
            file_id,
            content: text.to_string(),
            created_at: now,
            updated_at: now,
        }
    }

    #[tokio::test]
    async fn test_files_and_contents_roundtrip() {
        let pool = test_pool().await;
        let agent_id = seed_agent(&pool).await;
        let repo = SqliteFileRepository::new(pool);

        let first = make_file(agent_id, "a.txt");
        let second = make_file(agent_id, "b.pdf");
        repo.create(&first).await.unwrap();
        repo.create(&second).await.unwrap();
        repo.save_content(&make_content(first.id, "alpha")).await.unwrap();

        let listed = repo.list_for_agent(&agent_id).await.unwrap();
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].filename, "a.txt");
        assert_eq!(listed[0].size, 42);

        assert_eq!(repo.contents_for_agent(&agent_id).await.unwrap(), vec!["alpha"]);
    }

    #[tokio::test]
    async fn test_delete_cascades_content() {
        let pool = test_pool().await;
        let agent_id = seed_agent(&pool).await;
        let repo = SqliteFileRepository::new(pool);

        let file = make_file(agent_id, "a.txt");
        repo.create(&file).await.unwrap();
        repo.save_content(&make_content(file.id, "alpha")).await.unwrap();

        repo.delete(&file.id).await.unwrap();

        assert!(repo.get(&file.id).await.unwrap().is_none());
        assert!(repo.contents_for_agent(&agent_id).await.unwrap().is_empty());
        assert!(matches!(repo.delete(&file.id).await, Err(RepositoryError::NotFound)));
    }
}
