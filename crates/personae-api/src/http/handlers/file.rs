//! Knowledge file handlers: upload, list, delete.

use std::time::Instant;

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use uuid::Uuid;

use personae_core::service::agent::parse_agent_id;
use personae_types::error::FileError;
use personae_types::file::{AgentFile, UploadFileRequest, UploadedFile};

use crate::http::error::AppError;
use crate::http::extractors::session::CurrentSession;
use crate::http::response::{ApiResponse, new_request_id};
use crate::state::AppState;

/// GET /api/v1/agents/{id}/files - Files attached to an agent.
pub async fn list_files(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<Vec<AgentFile>>>, AppError> {
    let start = Instant::now();
    let request_id = new_request_id();

    let agent_id = parse_agent_id(&id)?;
    let files = state.file_service.list(&agent_id).await?;
    let elapsed = start.elapsed().as_millis() as u64;

    Ok(Json(ApiResponse::success(files, request_id, elapsed)))
}

/// POST /api/v1/agents/{id}/files - Upload a base64-encoded knowledge file.
pub async fn upload_file(
    State(state): State<AppState>,
    CurrentSession(session): CurrentSession,
    Path(id): Path<String>,
    Json(body): Json<UploadFileRequest>,
) -> Result<(StatusCode, Json<ApiResponse<UploadedFile>>), AppError> {
    let start = Instant::now();
    let request_id = new_request_id();

    let agent_id = parse_agent_id(&id)?;
    let uploaded = state.file_service.upload(&session, &agent_id, body).await?;
    let elapsed = start.elapsed().as_millis() as u64;

    let self_link = format!("/api/v1/agents/{agent_id}/files/{}", uploaded.file.id);
    let resp = ApiResponse::success(uploaded, request_id, elapsed).with_link("self", &self_link);
    Ok((StatusCode::CREATED, Json(resp)))
}

/// DELETE /api/v1/agents/{id}/files/{file_id} - Remove a file and its bytes.
pub async fn delete_file(
    State(state): State<AppState>,
    CurrentSession(session): CurrentSession,
    Path((id, file_id)): Path<(String, String)>,
) -> Result<Json<ApiResponse<serde_json::Value>>, AppError> {
    let start = Instant::now();
    let request_id = new_request_id();

    let agent_id = parse_agent_id(&id)?;
    let file_id = Uuid::parse_str(file_id.trim()).map_err(|_| FileError::NotFound)?;
    state.file_service.delete(&session, &agent_id, &file_id).await?;
    let elapsed = start.elapsed().as_millis() as u64;

    Ok(Json(ApiResponse::success(
        serde_json::json!({"deleted": true, "id": file_id.to_string()}),
        request_id,
        elapsed,
    )))
}
