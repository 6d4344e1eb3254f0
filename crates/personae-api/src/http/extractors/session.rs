//! Session extractor.
//!
//! Resolves who is calling from request headers, once per request:
//! - `Authorization: Bearer <token>`: a signed-in profile
//! - `X-Guest-Id: <uuid>`: a guest visitor
//! - neither: anonymous (read-only)
//!
//! Tokens are SHA-256 hashed and compared against the `access_tokens` table.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use sha2::{Digest, Sha256};

use personae_types::error::GuestError;
use personae_types::guest::GuestId;
use personae_types::session::Session;

use crate::http::error::AppError;
use crate::state::AppState;

pub const GUEST_ID_HEADER: &str = "x-guest-id";

/// Prefix of every issued access token.
pub const TOKEN_PREFIX: &str = "psn_";

/// The caller's [`Session`], resolved from headers.
pub struct CurrentSession(pub Session);

impl FromRequestParts<AppState> for CurrentSession {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        if let Some(token) = bearer_token(parts)? {
            let profile = state
                .profile_service
                .authenticate(&hash_token(&token))
                .await?
                .ok_or_else(|| AppError::Unauthorized("Invalid access token".to_string()))?;
            return Ok(CurrentSession(Session::Authenticated { profile }));
        }

        if let Some(value) = parts.headers.get(GUEST_ID_HEADER) {
            let guest_id = value
                .to_str()
                .ok()
                .and_then(|v| v.parse::<GuestId>().ok())
                .ok_or(GuestError::Unavailable)?;
            return Ok(CurrentSession(Session::Guest { guest_id }));
        }

        Ok(CurrentSession(Session::Anonymous))
    }
}

fn bearer_token(parts: &Parts) -> Result<Option<String>, AppError> {
    let Some(auth) = parts.headers.get("authorization") else {
        return Ok(None);
    };
    let auth_str = auth
        .to_str()
        .map_err(|_| AppError::Unauthorized("Invalid Authorization header encoding".to_string()))?;
    match auth_str.strip_prefix("Bearer ") {
        Some(token) if !token.trim().is_empty() => Ok(Some(token.trim().to_string())),
        _ => Err(AppError::Unauthorized(
            "Provide a token via 'Authorization: Bearer <token>'".to_string(),
        )),
    }
}

/// Compute SHA-256 hash of an access token (lowercase hex).
pub fn hash_token(token: &str) -> String {
    let digest = Sha256::digest(token.as_bytes());
    format!("{:x}", digest)
}

/// Generate a fresh plaintext access token.
///
/// Two v4 UUIDs, hex encoded, behind [`TOKEN_PREFIX`].
pub fn generate_token() -> String {
    format!(
        "{TOKEN_PREFIX}{}{}",
        uuid::Uuid::new_v4().simple(),
        uuid::Uuid::new_v4().simple()
    )
}
