use std::sync::Arc;

use kevs_db::chat_log::ChatLogStore;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: kevs_db::DbPool,
    /// Server configuration (session cookie settings are read per request).
    pub config: Arc<ServerConfig>,
    /// Per-user chat history files.
    pub chat_log: Arc<ChatLogStore>,
}
