//! Handlers for the chat bot and per-user chat history.

use axum::extract::State;
use axum::Json;
use kevs_core::bot;
use kevs_core::chat::ChatMessage;
use serde::{Deserialize, Serialize};

use crate::error::AppResult;
use crate::extract::ApiJson;
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

/// Request body for `POST /api/chat`.
#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct ChatHistoryResponse {
    pub success: bool,
    pub history: Vec<ChatMessage>,
}

#[derive(Debug, Serialize)]
pub struct ChatReplyResponse {
    pub success: bool,
    pub reply: String,
    pub history: Vec<ChatMessage>,
}

/// GET /api/chat
pub async fn history(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<ChatHistoryResponse>> {
    let history = state.chat_log.load(auth.username()).await?;

    Ok(Json(ChatHistoryResponse {
        success: true,
        history,
    }))
}

/// POST /api/chat
///
/// Records the message and the bot's reply. If the history file cannot be
/// written the reply is still returned, with the exchange appended to
/// whatever history could be read.
pub async fn send_message(
    auth: AuthUser,
    State(state): State<AppState>,
    ApiJson(input): ApiJson<ChatRequest>,
) -> AppResult<Json<ChatReplyResponse>> {
    let username = auth.username();
    let reply = bot::respond(&input.message, username);
    let exchange = [ChatMessage::user(input.message), ChatMessage::bot(reply.clone())];

    let history = match state.chat_log.append_exchange(username, exchange.clone()).await {
        Ok(history) => history,
        Err(e) => {
            tracing::warn!(error = %e, username, "Failed to persist chat exchange");
            let mut history = state.chat_log.load(username).await.unwrap_or_default();
            history.extend(exchange);
            history
        }
    };

    Ok(Json(ChatReplyResponse {
        success: true,
        reply,
        history,
    }))
}
