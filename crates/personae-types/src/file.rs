//! Knowledge-file types.
//!
//! Uploaded file bytes live in object storage; metadata lives in
//! `agent_files`, and extracted text (when any) in `file_contents`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::agent::AgentId;

/// Metadata for a file attached to an agent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentFile {
    pub id: Uuid,
    pub agent_id: AgentId,
    pub filename: String,
    /// Key relative to the object storage root.
    pub file_path: String,
    pub content_type: String,
    pub size: u64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Text extracted from an uploaded file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileContent {
    pub id: Uuid,
    pub file_id: Uuid,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Request body for uploading a knowledge file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadFileRequest {
    pub name: String,
    pub content_type: String,
    /// Base64 payload, optionally as a `data:<mime>;base64,` URL.
    pub base64: String,
}

/// An uploaded file plus whether text could be extracted from it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadedFile {
    #[serde(flatten)]
    pub file: AgentFile,
    pub extracted: bool,
}

/// True for content types whose bytes are read as text.
pub fn is_text_content_type(content_type: &str) -> bool {
    let ct = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();
    ct.starts_with("text/") || ct == "application/json" || ct == "application/markdown"
}
