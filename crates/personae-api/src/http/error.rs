//! Application error type mapping to HTTP status codes and envelope format.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use personae_types::error::{AgentError, ChatError, FileError, GuestError, RepositoryError};
use personae_types::llm::LlmError;

use crate::http::response::{ApiResponse, new_request_id};

/// Shown to the caller for any collaborator failure during a chat send.
pub const CHAT_FAILED_MESSAGE: &str = "We couldn't send your message. Please try again.";

/// Application-level error that maps to HTTP responses.
#[derive(Debug)]
pub enum AppError {
    Agent(AgentError),
    Chat(ChatError),
    File(FileError),
    Guest(GuestError),
    Repository(RepositoryError),
    /// Authentication failure.
    Unauthorized(String),
    Validation(String),
    /// Generic internal error.
    Internal(String),
}

impl From<AgentError> for AppError {
    fn from(e: AgentError) -> Self {
        AppError::Agent(e)
    }
}

impl From<ChatError> for AppError {
    fn from(e: ChatError) -> Self {
        AppError::Chat(e)
    }
}

impl From<FileError> for AppError {
    fn from(e: FileError) -> Self {
        AppError::File(e)
    }
}

impl From<GuestError> for AppError {
    fn from(e: GuestError) -> Self {
        AppError::Guest(e)
    }
}

impl From<RepositoryError> for AppError {
    fn from(e: RepositoryError) -> Self {
        AppError::Repository(e)
    }
}

fn guest_parts(e: &GuestError) -> (StatusCode, &'static str, String) {
    match e {
        GuestError::Unavailable => (StatusCode::FORBIDDEN, "GUEST_UNAVAILABLE", e.to_string()),
        GuestError::StorageError(_) => {
            (StatusCode::INTERNAL_SERVER_ERROR, "STORAGE_ERROR", e.to_string())
        }
    }
}

impl AppError {
    fn parts(&self) -> (StatusCode, &'static str, String) {
        match self {
            AppError::Agent(AgentError::NotFound) | AppError::Chat(ChatError::AgentNotFound) => {
                (StatusCode::NOT_FOUND, "AGENT_NOT_FOUND", "Agent not found".to_string())
            }
            AppError::Agent(e @ (AgentError::InvalidId(_) | AgentError::Validation(_))) => {
                (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", e.to_string())
            }
            AppError::Agent(e @ AgentError::Forbidden) => {
                (StatusCode::FORBIDDEN, "FORBIDDEN", e.to_string())
            }
            AppError::Agent(AgentError::Unauthenticated)
            | AppError::Chat(ChatError::Unauthenticated) => (
                StatusCode::UNAUTHORIZED,
                "UNAUTHORIZED",
                "Authentication required".to_string(),
            ),
            AppError::Agent(e @ AgentError::StorageError(_)) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "STORAGE_ERROR", e.to_string())
            }

            AppError::Chat(e @ ChatError::EmptyMessage) => {
                (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", e.to_string())
            }
            AppError::Chat(ChatError::Guest(e)) | AppError::Guest(e) => guest_parts(e),
            AppError::Chat(ChatError::Llm(LlmError::QuotaExceeded)) => (
                StatusCode::TOO_MANY_REQUESTS,
                "LLM_QUOTA_EXCEEDED",
                "The assistant is out of quota. Please try again later.".to_string(),
            ),
            AppError::Chat(ChatError::Llm(_)) => {
                (StatusCode::BAD_GATEWAY, "CHAT_FAILED", CHAT_FAILED_MESSAGE.to_string())
            }
            AppError::Chat(e @ ChatError::StorageError(_)) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "STORAGE_ERROR", e.to_string())
            }

            AppError::File(FileError::NotFound) => {
                (StatusCode::NOT_FOUND, "FILE_NOT_FOUND", "File not found".to_string())
            }
            AppError::File(FileError::AgentNotFound) => {
                (StatusCode::NOT_FOUND, "AGENT_NOT_FOUND", "Agent not found".to_string())
            }
            AppError::File(e @ (FileError::InvalidFilename(_) | FileError::InvalidEncoding(_))) => {
                (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", e.to_string())
            }
            AppError::File(e @ FileError::TooLarge { .. }) => {
                (StatusCode::PAYLOAD_TOO_LARGE, "FILE_TOO_LARGE", e.to_string())
            }
            AppError::File(e @ FileError::Forbidden) => {
                (StatusCode::FORBIDDEN, "FORBIDDEN", e.to_string())
            }
            AppError::File(e @ (FileError::ObjectStore(_) | FileError::StorageError(_))) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "STORAGE_ERROR", e.to_string())
            }

            AppError::Repository(RepositoryError::NotFound) => {
                (StatusCode::NOT_FOUND, "NOT_FOUND", "Not found".to_string())
            }
            AppError::Repository(RepositoryError::Conflict(msg)) => {
                (StatusCode::CONFLICT, "CONFLICT", msg.clone())
            }
            AppError::Repository(e) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "STORAGE_ERROR", e.to_string())
            }

            AppError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED", msg.clone()),
            AppError::Validation(msg) => {
                (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
            }
            AppError::Internal(msg) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR", msg.clone())
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = self.parts();
        if status.is_server_error() {
            tracing::error!(%status, code, error = ?self, "request failed");
        }

        (status, Json(ApiResponse::error(code, &message, new_request_id()))).into_response()
    }
}
