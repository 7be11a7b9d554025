use axum::{Json, extract::State};

use evergreens_types::api::{ChatRequest, ChatResponse};

use crate::AppState;

/// POST /api/chat. Always answers; gateway failures become the fallback text.
pub async fn chat(State(state): State<AppState>, Json(req): Json<ChatRequest>) -> Json<ChatResponse> {
    let reply = state.chat.respond(&req.message, &req.history).await;
    Json(ChatResponse { reply })
}
