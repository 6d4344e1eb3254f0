use thiserror::Error;

use crate::llm::LlmError;

/// Errors related to agent operations.
#[derive(Debug, Error)]
pub enum AgentError {
    #[error("agent not found")]
    NotFound,

    #[error("invalid agent id: '{0}'")]
    InvalidId(String),

    #[error("{0}")]
    Validation(String),

    #[error("only creators may manage agents")]
    Forbidden,

    #[error("authentication required")]
    Unauthenticated,

    #[error("storage error: {0}")]
    StorageError(String),
}

/// Errors related to the guest message gate.
#[derive(Debug, Error)]
pub enum GuestError {
    #[error("guest access not available")]
    Unavailable,

    #[error("storage error: {0}")]
    StorageError(String),
}

/// Errors from a chat exchange.
#[derive(Debug, Error)]
pub enum ChatError {
    #[error("message must not be empty")]
    EmptyMessage,

    #[error("agent not found")]
    AgentNotFound,

    #[error("authentication required")]
    Unauthenticated,

    #[error(transparent)]
    Guest(#[from] GuestError),

    #[error("llm error: {0}")]
    Llm(#[from] LlmError),

    #[error("storage error: {0}")]
    StorageError(String),
}

/// Errors related to knowledge files.
#[derive(Debug, Error)]
pub enum FileError {
    #[error("file not found")]
    NotFound,

    #[error("agent not found")]
    AgentNotFound,

    #[error("invalid filename: '{0}'")]
    InvalidFilename(String),

    #[error("file too large: {size} bytes exceeds the {limit}-byte limit")]
    TooLarge { size: u64, limit: u64 },

    #[error("invalid base64 payload: {0}")]
    InvalidEncoding(String),

    #[error("only the agent's creator may manage its files")]
    Forbidden,

    #[error("object storage error: {0}")]
    ObjectStore(String),

    #[error("storage error: {0}")]
    StorageError(String),
}

/// Errors from repository operations (used by trait definitions in personae-core).
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("database connection error")]
    Connection,

    #[error("query error: {0}")]
    Query(String),

    #[error("entity not found")]
    NotFound,

    #[error("conflict: {0}")]
    Conflict(String),
}
