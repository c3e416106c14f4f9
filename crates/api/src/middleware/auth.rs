//! Cookie-session authentication extractor for Axum handlers.

use axum::extract::{FromRequestParts, OptionalFromRequestParts};
use axum::http::request::Parts;
use kevs_core::error::CoreError;
use kevs_core::types::DbId;
use kevs_db::models::user::User;
use kevs_db::repositories::{SessionRepo, UserRepo};

use crate::auth::session::{hash_session_token, token_from_headers};
use crate::error::AppError;
use crate::state::AppState;

/// Message returned with every 401 from a session-gated endpoint.
pub const NOT_LOGGED_IN: &str = "Not logged in";

/// Authenticated user resolved from the session cookie.
///
/// Use this as an extractor parameter in any handler that requires a
/// session; requests without a live session are rejected with 401. Use
/// `Option<AuthUser>` where an anonymous caller is acceptable.
///
/// ```ignore
/// async fn my_handler(auth: AuthUser) -> AppResult<Json<()>> {
///     tracing::info!(user_id = auth.user.id, "handling request");
///     Ok(Json(()))
/// }
/// ```
#[derive(Debug, Clone)]
pub struct AuthUser {
    /// The user row as loaded when the request arrived.
    pub user: User,
}

impl AuthUser {
    pub fn user_id(&self) -> DbId {
        self.user.id
    }

    pub fn username(&self) -> &str {
        &self.user.username
    }
}

/// Look up the live session named by the request's cookie, if any.
async fn resolve(parts: &Parts, state: &AppState) -> Result<Option<AuthUser>, AppError> {
    let Some(token) = token_from_headers(&parts.headers) else {
        return Ok(None);
    };

    let hash = hash_session_token(&token);
    let Some(session) = SessionRepo::find_active_by_token_hash(&state.pool, &hash).await? else {
        tracing::debug!("Session cookie does not match a live session");
        return Ok(None);
    };

    let user = UserRepo::find_by_id(&state.pool, session.user_id).await?;
    Ok(user.map(|user| AuthUser { user }))
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        resolve(parts, state)
            .await?
            .ok_or_else(|| AppError::Core(CoreError::Unauthorized(NOT_LOGGED_IN.into())))
    }
}

impl OptionalFromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Option<Self>, Self::Rejection> {
        resolve(parts, state).await
    }
}
