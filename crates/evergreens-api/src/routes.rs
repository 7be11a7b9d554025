use axum::{
    Json, Router,
    response::IntoResponse,
    routing::{get, patch, post},
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::{AppState, auth, chat, meetings, proposals};

pub fn router(state: AppState) -> Router {
    let auth_routes = Router::new()
        .route("/api/auth/login", post(auth::login))
        .route("/api/auth/register", post(auth::register));

    let lifecycle_routes = Router::new()
        .route(
            "/api/proposals",
            post(proposals::submit_proposal).get(proposals::get_proposals),
        )
        .route("/api/proposals/stats", get(proposals::get_proposal_stats))
        .route("/api/proposals/{id}", patch(proposals::patch_proposal))
        .route(
            "/api/meetings",
            post(meetings::request_meeting).get(meetings::get_meetings),
        );

    Router::new()
        .route("/api/health", get(health))
        .merge(auth_routes)
        .merge(lifecycle_routes)
        .route("/api/chat", post(chat::chat))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}
