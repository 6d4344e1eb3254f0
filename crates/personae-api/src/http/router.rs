//! Axum router configuration with middleware.
//!
//! All routes are under `/api/v1/`, plus an unauthenticated `/health`.
//! Middleware: CORS, request tracing.
//!
//! A built web client can be served from `PERSONAE_WEB_DIR`; API routes take
//! priority and unknown paths fall through to its `index.html`.

use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::routing::{delete, get, post};
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;

use crate::http::handlers;
use crate::state::AppState;

/// Room for base64 expansion and the JSON wrapper around an upload.
fn upload_body_limit(max_file_size: u64) -> usize {
    let encoded = max_file_size.saturating_mul(4) / 3 + 64 * 1024;
    usize::try_from(encoded).unwrap_or(usize::MAX)
}

/// Build the complete API router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let body_limit = upload_body_limit(state.config.storage.max_file_size_bytes);

    let api_routes = Router::new()
        // Session
        .route(
            "/me",
            get(handlers::profile::get_me).put(handlers::profile::update_me),
        )
        // Agent CRUD
        .route(
            "/agents",
            get(handlers::agent::list_agents).post(handlers::agent::create_agent),
        )
        .route(
            "/agents/{id}",
            get(handlers::agent::get_agent)
                .put(handlers::agent::update_agent)
                .delete(handlers::agent::delete_agent),
        )
        // Chat
        .route(
            "/agents/{id}/chat",
            post(handlers::chat::send_message),
        )
        .route(
            "/agents/{id}/guest-status",
            get(handlers::chat::guest_status),
        )
        .route(
            "/agents/{id}/messages",
            get(handlers::message::list_messages),
        )
        // Knowledge files
        .route(
            "/agents/{id}/files",
            get(handlers::file::list_files)
                .post(handlers::file::upload_file)
                .layer(DefaultBodyLimit::max(body_limit)),
        )
        .route(
            "/agents/{id}/files/{file_id}",
            delete(handlers::file::delete_file),
        );

    let mut router = Router::new()
        .nest("/api/v1", api_routes)
        .route("/health", get(health_check))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    if let Ok(web_dir) = std::env::var("PERSONAE_WEB_DIR") {
        if std::path::Path::new(&web_dir).exists() {
            let index_path = format!("{web_dir}/index.html");
            let serve_dir = ServeDir::new(&web_dir).fallback(ServeFile::new(index_path));
            router = router.fallback_service(serve_dir);
            tracing::info!(path = %web_dir, "static web client serving enabled");
        }
    }

    router
}

/// GET /health - Simple health check endpoint (no session required).
async fn health_check() -> axum::Json<serde_json::Value> {
    axum::Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
