pub mod auth;
pub mod chat;
pub mod health;
pub mod user;

use axum::routing::get;
use axum::Router;

use crate::handlers;
use crate::state::AppState;

/// Build the `/api` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /projects                    project catalog (public)
///
/// /register                    create account (public)
/// /login                       open session (public)
/// /logout                      close session (public)
///
/// /user                        current user, soft auth (GET)
/// /user/progress/task          toggle a task (POST, auth required)
/// /user/progress/complete      complete a project (POST, auth required)
/// /user/progress/reset         clear all progress (POST, auth required)
///
/// /chat                        history (GET), send message (POST), auth required
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/projects", get(handlers::catalog::list_projects))
        .merge(auth::router())
        .nest("/user", user::router())
        .merge(chat::router())
}
