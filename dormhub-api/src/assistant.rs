use axum::{extract::State, routing::post, Json, Router};
use dormhub_assistant::ChatTurn;
use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
struct ChatRequest {
    /// Full conversation so far, oldest first, ending with the new user
    /// message. The conversation lives only in the client's state.
    messages: Vec<ChatTurn>,
}

#[derive(Debug, Serialize)]
struct ChatResponse {
    reply: String,
}

pub fn routes() -> Router<AppState> {
    Router::new().route("/v1/assistant/chat", post(chat))
}

/// POST /v1/assistant/chat
async fn chat(
    State(state): State<AppState>,
    Json(req): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, AppError> {
    let reply = state.assistant.send(&req.messages).await?;
    Ok(Json(ChatResponse { reply }))
}
