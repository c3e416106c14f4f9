//! Route definitions for the `/user` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::{progress, user};
use crate::state::AppState;

/// Routes mounted at `/user`.
///
/// ```text
/// GET  /                   -> current_user
/// POST /progress/task      -> toggle_task
/// POST /progress/complete  -> complete_project
/// POST /progress/reset     -> reset
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(user::current_user))
        .route("/progress/task", post(progress::toggle_task))
        .route("/progress/complete", post(progress::complete_project))
        .route("/progress/reset", post(progress::reset))
}
