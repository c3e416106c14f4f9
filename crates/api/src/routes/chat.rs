//! Route definitions for the `/chat` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::chat;
use crate::state::AppState;

/// ```text
/// GET  /chat  -> history
/// POST /chat  -> send_message
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/chat", get(chat::history).post(chat::send_message))
}
