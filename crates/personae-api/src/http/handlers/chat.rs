//! Chat handlers: send a message, read a guest's free-message allowance.

use std::time::Instant;

use axum::Json;
use axum::extract::{Path, State};

use personae_core::service::agent::parse_agent_id;
use personae_types::chat::{ChatOutcome, ChatRequest};
use personae_types::guest::GuestStatus;

use crate::http::error::AppError;
use crate::http::extractors::session::CurrentSession;
use crate::http::response::{ApiResponse, new_request_id};
use crate::state::AppState;

/// POST /api/v1/agents/{id}/chat - Send one message and get the agent's reply.
///
/// Guests may instead receive a `guest_prompt` or `sign_up_required`
/// outcome; both are successful responses.
pub async fn send_message(
    State(state): State<AppState>,
    CurrentSession(session): CurrentSession,
    Path(id): Path<String>,
    Json(body): Json<ChatRequest>,
) -> Result<Json<ApiResponse<ChatOutcome>>, AppError> {
    let start = Instant::now();
    let request_id = new_request_id();

    let agent_id = parse_agent_id(&id)?;
    let outcome = state.chat_service.send(&session, &agent_id, body).await?;
    let elapsed = start.elapsed().as_millis() as u64;

    let sign_up = match &outcome {
        ChatOutcome::SignUpRequired { redirect, .. } => Some(redirect.clone()),
        _ => None,
    };
    let mut resp = ApiResponse::success(outcome, request_id, elapsed);
    if let Some(redirect) = sign_up {
        resp = resp.with_link("sign_up", &redirect);
    }
    Ok(Json(resp))
}

/// GET /api/v1/agents/{id}/guest-status - Free messages left for the calling guest.
pub async fn guest_status(
    State(state): State<AppState>,
    CurrentSession(session): CurrentSession,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<GuestStatus>>, AppError> {
    let start = Instant::now();
    let request_id = new_request_id();

    let agent_id = parse_agent_id(&id)?;
    let status = state.chat_service.guest_status(&session, &agent_id).await?;
    let elapsed = start.elapsed().as_millis() as u64;

    Ok(Json(ApiResponse::success(status, request_id, elapsed)))
}
