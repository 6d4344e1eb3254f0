//! The caller's own session and profile.

use std::time::Instant;

use axum::Json;
use axum::extract::State;

use personae_types::profile::{Profile, UpdateProfileRequest};
use personae_types::session::Session;

use crate::http::error::AppError;
use crate::http::extractors::session::CurrentSession;
use crate::http::response::{ApiResponse, new_request_id};
use crate::state::AppState;

/// GET /api/v1/me - Who the server thinks is calling.
pub async fn get_me(CurrentSession(session): CurrentSession) -> Json<ApiResponse<Session>> {
    let start = Instant::now();
    let request_id = new_request_id();
    let elapsed = start.elapsed().as_millis() as u64;
    Json(ApiResponse::success(session, request_id, elapsed))
}

/// PUT /api/v1/me - Change the signed-in user's username.
pub async fn update_me(
    State(state): State<AppState>,
    CurrentSession(session): CurrentSession,
    Json(body): Json<UpdateProfileRequest>,
) -> Result<Json<ApiResponse<Profile>>, AppError> {
    let start = Instant::now();
    let request_id = new_request_id();

    let profile = session
        .profile()
        .ok_or_else(|| AppError::Unauthorized("Authentication required".to_string()))?;
    let updated = state
        .profile_service
        .update_username(&profile.id, body.username.as_deref())
        .await?;
    let elapsed = start.elapsed().as_millis() as u64;

    Ok(Json(ApiResponse::success(updated, request_id, elapsed)))
}
