//! Agent CRUD handlers for the REST API.

use std::time::Instant;

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;

use personae_core::service::agent::parse_agent_id;
use personae_types::agent::{Agent, AgentListing, CreateAgentRequest, UpdateAgentRequest};
use personae_types::error::AgentError;

use crate::http::error::AppError;
use crate::http::extractors::query::AgentListQuery;
use crate::http::extractors::session::CurrentSession;
use crate::http::response::{ApiResponse, new_request_id};
use crate::state::AppState;

/// POST /api/v1/agents - Create a new agent (creators only).
pub async fn create_agent(
    State(state): State<AppState>,
    CurrentSession(session): CurrentSession,
    Json(body): Json<CreateAgentRequest>,
) -> Result<(StatusCode, Json<ApiResponse<Agent>>), AppError> {
    let start = Instant::now();
    let request_id = new_request_id();

    let agent = state.agent_service.create_agent(&session, body).await?;
    let elapsed = start.elapsed().as_millis() as u64;

    let self_link = format!("/api/v1/agents/{}", agent.id);
    let chat_link = format!("{self_link}/chat");
    let resp = ApiResponse::success(agent, request_id, elapsed)
        .with_link("self", &self_link)
        .with_link("chat", &chat_link);

    Ok((StatusCode::CREATED, Json(resp)))
}

/// GET /api/v1/agents - List agents, newest first.
///
/// `?mine=true` restricts the list to agents created by the caller.
pub async fn list_agents(
    State(state): State<AppState>,
    CurrentSession(session): CurrentSession,
    Query(query): Query<AgentListQuery>,
) -> Result<Json<ApiResponse<Vec<AgentListing>>>, AppError> {
    let start = Instant::now();
    let request_id = new_request_id();

    let agents = if query.mine {
        let profile = session.profile().ok_or(AgentError::Unauthenticated)?;
        state.agent_service.list_agents_by(profile).await?
    } else {
        state
            .agent_service
            .list_agents(query.limit, query.offset)
            .await?
    };
    let elapsed = start.elapsed().as_millis() as u64;

    let resp = ApiResponse::success(agents, request_id, elapsed).with_link("self", "/api/v1/agents");
    Ok(Json(resp))
}

/// GET /api/v1/agents/{id} - Get an agent by ID.
pub async fn get_agent(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<Agent>>, AppError> {
    let start = Instant::now();
    let request_id = new_request_id();

    let agent = state.agent_service.get_agent(&id).await?;
    let elapsed = start.elapsed().as_millis() as u64;

    let self_link = format!("/api/v1/agents/{}", agent.id);
    let files_link = format!("{self_link}/files");
    let resp = ApiResponse::success(agent, request_id, elapsed)
        .with_link("self", &self_link)
        .with_link("files", &files_link);

    Ok(Json(resp))
}

/// PUT /api/v1/agents/{id} - Update an agent (its creator only).
pub async fn update_agent(
    State(state): State<AppState>,
    CurrentSession(session): CurrentSession,
    Path(id): Path<String>,
    Json(body): Json<UpdateAgentRequest>,
) -> Result<Json<ApiResponse<Agent>>, AppError> {
    let start = Instant::now();
    let request_id = new_request_id();

    let id = parse_agent_id(&id)?;
    let updated = state.agent_service.update_agent(&session, &id, body).await?;
    let elapsed = start.elapsed().as_millis() as u64;

    let self_link = format!("/api/v1/agents/{}", updated.id);
    Ok(Json(
        ApiResponse::success(updated, request_id, elapsed).with_link("self", &self_link),
    ))
}

/// DELETE /api/v1/agents/{id} - Delete an agent permanently (its creator only).
pub async fn delete_agent(
    State(state): State<AppState>,
    CurrentSession(session): CurrentSession,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<serde_json::Value>>, AppError> {
    let start = Instant::now();
    let request_id = new_request_id();

    let id = parse_agent_id(&id)?;
    state.agent_service.delete_agent(&session, &id).await?;
    let elapsed = start.elapsed().as_millis() as u64;

    let resp = ApiResponse::success(
        serde_json::json!({"deleted": true, "id": id.to_string()}),
        request_id,
        elapsed,
    );
    Ok(Json(resp))
}
