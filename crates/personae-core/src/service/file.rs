//! Knowledge-file service.
//!
//! Uploads arrive as base64 (optionally a data URL). Bytes go to the object
//! store, metadata to the file repository. Text-like files also get their
//! content extracted so the chat prompt can include it; anything else is
//! kept as an attachment only.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use chrono::Utc;
use personae_types::agent::{Agent, AgentId};
use personae_types::error::{FileError, RepositoryError};
use personae_types::file::{
    AgentFile, FileContent, UploadFileRequest, UploadedFile, is_text_content_type,
};
use personae_types::session::Session;
use tracing::{info, warn};
use uuid::Uuid;

use crate::repository::agent::AgentRepository;
use crate::repository::file::FileRepository;
use crate::storage::object_store::ObjectStore;

/// File extensions treated as text regardless of the declared content type.
const TEXT_EXTENSIONS: &[&str] = &["txt", "md", "markdown", "json", "csv"];

pub struct FileService<F: FileRepository, A: AgentRepository, O: ObjectStore> {
    file_repo: F,
    agent_repo: A,
    object_store: O,
    max_file_size: u64,
}

impl<F: FileRepository, A: AgentRepository, O: ObjectStore> FileService<F, A, O> {
    pub fn new(file_repo: F, agent_repo: A, object_store: O, max_file_size: u64) -> Self {
        Self {
            file_repo,
            agent_repo,
            object_store,
            max_file_size,
        }
    }

    /// Store an uploaded file for an agent the caller created.
    pub async fn upload(
        &self,
        session: &Session,
        agent_id: &AgentId,
        request: UploadFileRequest,
    ) -> Result<UploadedFile, FileError> {
        let agent = self.owned_agent(session, agent_id).await?;

        let filename = validate_filename(&request.name)?;
        let bytes = decode_payload(&request.base64)?;
        let size = bytes.len() as u64;
        if size > self.max_file_size {
            return Err(FileError::TooLarge {
                size,
                limit: self.max_file_size,
            });
        }

        let id = Uuid::now_v7();
        let key = storage_key(&agent.id, &id, &filename);
        self.object_store.put(&key, &bytes).await?;

        let now = Utc::now();
        let file = AgentFile {
            id,
            agent_id: agent.id,
            filename,
            file_path: key,
            content_type: request.content_type.trim().to_string(),
            size,
            created_at: now,
            updated_at: now,
        };
        if let Err(e) = self.file_repo.create(&file).await {
            if let Err(cleanup) = self.object_store.delete(&file.file_path).await {
                warn!(key = %file.file_path, error = %cleanup, "failed to remove orphaned upload");
            }
            return Err(storage(e));
        }

        let extracted = match extract_text(&file.content_type, &file.filename, &bytes) {
            Some(text) => self.store_content(&file, text).await,
            None => {
                info!(
                    file_id = %file.id,
                    content_type = %file.content_type,
                    "stored file without extracted text"
                );
                false
            }
        };

        info!(agent_id = %agent.id, file_id = %file.id, size, extracted, "file uploaded");
        Ok(UploadedFile { file, extracted })
    }

    /// Files attached to an agent, oldest first.
    pub async fn list(&self, agent_id: &AgentId) -> Result<Vec<AgentFile>, FileError> {
        self.agent(agent_id).await?;
        self.file_repo.list_for_agent(agent_id).await.map_err(storage)
    }

    /// Remove a file row and its stored bytes.
    pub async fn delete(
        &self,
        session: &Session,
        agent_id: &AgentId,
        file_id: &Uuid,
    ) -> Result<(), FileError> {
        let agent = self.owned_agent(session, agent_id).await?;
        let file = self
            .file_repo
            .get(file_id)
            .await
            .map_err(storage)?
            .filter(|f| f.agent_id == agent.id)
            .ok_or(FileError::NotFound)?;

        self.file_repo.delete(&file.id).await.map_err(storage)?;
        if let Err(e) = self.object_store.delete(&file.file_path).await {
            warn!(file_id = %file.id, error = %e, "failed to remove stored file bytes");
        }
        info!(agent_id = %agent.id, file_id = %file.id, "file deleted");
        Ok(())
    }

    async fn store_content(&self, file: &AgentFile, text: String) -> bool {
        let now = Utc::now();
        let content = FileContent {
            id: Uuid::now_v7(),
            file_id: file.id,
            content: text,
            created_at: now,
            updated_at: now,
        };
        match self.file_repo.save_content(&content).await {
            Ok(()) => true,
            Err(e) => {
                warn!(file_id = %file.id, error = %e, "failed to store extracted text");
                false
            }
        }
    }

    async fn agent(&self, agent_id: &AgentId) -> Result<Agent, FileError> {
        self.agent_repo
            .get_by_id(agent_id)
            .await
            .map_err(storage)?
            .ok_or(FileError::AgentNotFound)
    }

    async fn owned_agent(&self, session: &Session, agent_id: &AgentId) -> Result<Agent, FileError> {
        let profile = session.profile().ok_or(FileError::Forbidden)?;
        let agent = self.agent(agent_id).await?;
        if !agent.is_created_by(&profile.id) {
            return Err(FileError::Forbidden);
        }
        Ok(agent)
    }
}

/// Reject names that could escape the agent's storage prefix.
fn validate_filename(name: &str) -> Result<String, FileError> {
    let name = name.trim();
    if name.is_empty()
        || name.contains('/')
        || name.contains('\\')
        || name.contains('\0')
        || name.contains("..")
    {
        return Err(FileError::InvalidFilename(name.to_string()));
    }
    Ok(name.to_string())
}

/// Decode a base64 payload, stripping a `data:<mime>;base64,` prefix if present.
fn decode_payload(payload: &str) -> Result<Vec<u8>, FileError> {
    let payload = payload.trim();
    let encoded = match payload.strip_prefix("data:") {
        Some(rest) => rest
            .split_once(";base64,")
            .map(|(_, data)| data)
            .ok_or_else(|| FileError::InvalidEncoding("data URL is not base64".to_string()))?,
        None => payload,
    };
    STANDARD
        .decode(encoded)
        .map_err(|e| FileError::InvalidEncoding(e.to_string()))
}

/// Storage key `{agent_id}/{file_id}.{ext}`; the extension is kept only if alphanumeric.
fn storage_key(agent_id: &AgentId, file_id: &Uuid, filename: &str) -> String {
    match extension(filename) {
        Some(ext) => format!("{agent_id}/{file_id}.{ext}"),
        None => format!("{agent_id}/{file_id}"),
    }
}

fn extension(filename: &str) -> Option<String> {
    let (_, ext) = filename.rsplit_once('.')?;
    if ext.is_empty() || ext.len() > 10 || !ext.chars().all(|c| c.is_ascii_alphanumeric()) {
        return None;
    }
    Some(ext.to_ascii_lowercase())
}

/// Best-effort text extraction for text-like uploads.
pub fn extract_text(content_type: &str, filename: &str, bytes: &[u8]) -> Option<String> {
    let texty = is_text_content_type(content_type)
        || extension(filename).is_some_and(|ext| TEXT_EXTENSIONS.contains(&ext.as_str()));
    if !texty {
        return None;
    }
    let text = String::from_utf8_lossy(bytes).trim().to_string();
    (!text.is_empty()).then_some(text)
}

fn storage(e: RepositoryError) -> FileError {
    FileError::StorageError(e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{MemAgents, MemFiles, MemObjects, agent_by, profile};
    use personae_types::profile::ProfileRole;

    struct Fixture {
        svc: FileService<MemFiles, MemAgents, MemObjects>,
        files: MemFiles,
        objects: MemObjects,
        agent: Agent,
        owner: Session,
    }

    fn fixture() -> Fixture {
        let owner = profile(ProfileRole::Creator);
        let agent = agent_by(Some(owner.id));
        let files = MemFiles::default();
        let objects = MemObjects::default();
        let svc = FileService::new(
            files.clone(),
            MemAgents::with(agent.clone()),
            objects.clone(),
            1024,
        );
        Fixture {
            svc,
            files,
            objects,
            agent,
            owner: Session::Authenticated { profile: owner },
        }
    }

    fn upload(name: &str, content_type: &str, data: &[u8]) -> UploadFileRequest {
        UploadFileRequest {
            name: name.into(),
            content_type: content_type.into(),
            base64: format!("data:{content_type};base64,{}", STANDARD.encode(data)),
        }
    }

    #[tokio::test]
    async fn test_upload_text_extracts_content() {
        let fx = fixture();
        let uploaded = fx
            .svc
            .upload(&fx.owner, &fx.agent.id, upload("notes.md", "text/markdown", b"# Fractions\n"))
            .await
            .unwrap();

        assert!(uploaded.extracted);
        assert!(uploaded.file.file_path.starts_with(&fx.agent.id.to_string()));
        assert!(uploaded.file.file_path.ends_with(".md"));
        assert_eq!(uploaded.file.size, 12);
        assert!(fx.objects.objects.lock().unwrap().contains_key(&uploaded.file.file_path));
        let contents = fx.files.contents.lock().unwrap();
        assert_eq!(contents.len(), 1);
        assert_eq!(contents[0].content, "# Fractions");
    }

    #[tokio::test]
    async fn test_upload_pdf_stored_without_content() {
        let fx = fixture();
        let uploaded = fx
            .svc
            .upload(&fx.owner, &fx.agent.id, upload("book.pdf", "application/pdf", b"%PDF-1.4"))
            .await
            .unwrap();

        assert!(!uploaded.extracted);
        assert_eq!(fx.files.files.lock().unwrap().len(), 1);
        assert!(fx.files.contents.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_upload_rejects_traversal_and_size() {
        let fx = fixture();
        let err = fx
            .svc
            .upload(&fx.owner, &fx.agent.id, upload("../etc/passwd", "text/plain", b"x"))
            .await
            .unwrap_err();
        assert!(matches!(err, FileError::InvalidFilename(_)));

        let err = fx
            .svc
            .upload(&fx.owner, &fx.agent.id, upload("big.txt", "text/plain", &[b'a'; 2048]))
            .await
            .unwrap_err();
        assert!(matches!(err, FileError::TooLarge { size: 2048, limit: 1024 }));
        assert!(fx.objects.objects.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_upload_by_stranger_is_forbidden() {
        let fx = fixture();
        let stranger = Session::Authenticated {
            profile: profile(ProfileRole::Creator),
        };
        let err = fx
            .svc
            .upload(&stranger, &fx.agent.id, upload("a.txt", "text/plain", b"hi"))
            .await
            .unwrap_err();
        assert!(matches!(err, FileError::Forbidden));
    }

    #[tokio::test]
    async fn test_delete_removes_row_and_bytes() {
        let fx = fixture();
        let uploaded = fx
            .svc
            .upload(&fx.owner, &fx.agent.id, upload("a.txt", "text/plain", b"hi"))
            .await
            .unwrap();

        fx.svc
            .delete(&fx.owner, &fx.agent.id, &uploaded.file.id)
            .await
            .unwrap();

        assert!(fx.files.files.lock().unwrap().is_empty());
        assert!(fx.objects.objects.lock().unwrap().is_empty());
        assert!(matches!(
            fx.svc.delete(&fx.owner, &fx.agent.id, &uploaded.file.id).await,
            Err(FileError::NotFound)
        ));
    }

    #[test]
    fn test_decode_payload_plain_and_data_url() {
        assert_eq!(decode_payload("aGk=").unwrap(), b"hi");
        assert_eq!(decode_payload("data:text/plain;base64,aGk=").unwrap(), b"hi");
        assert!(matches!(
            decode_payload("data:text/plain,hi"),
            Err(FileError::InvalidEncoding(_))
        ));
    }

    #[test]
    fn test_extract_text_by_extension() {
        assert_eq!(
            extract_text("application/octet-stream", "data.csv", b"a,b\n"),
            Some("a,b".to_string())
        );
        assert_eq!(extract_text("image/png", "pic.png", b"\x89PNG"), None);
        assert_eq!(extract_text("text/plain", "blank.txt", b"   "), None);
    }
}
