//! Stored conversation history for signed-in users.

use std::time::Instant;

use axum::Json;
use axum::extract::{Path, State};

use personae_core::service::agent::parse_agent_id;
use personae_types::chat::ChatMessage;

use crate::http::error::AppError;
use crate::http::extractors::session::CurrentSession;
use crate::http::response::{ApiResponse, new_request_id};
use crate::state::AppState;

/// GET /api/v1/agents/{id}/messages - The caller's messages with an agent, oldest first.
pub async fn list_messages(
    State(state): State<AppState>,
    CurrentSession(session): CurrentSession,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<Vec<ChatMessage>>>, AppError> {
    let start = Instant::now();
    let request_id = new_request_id();

    let agent_id = parse_agent_id(&id)?;
    let messages = state.chat_service.history(&session, &agent_id).await?;
    let elapsed = start.elapsed().as_millis() as u64;

    Ok(Json(ApiResponse::success(messages, request_id, elapsed)))
}
