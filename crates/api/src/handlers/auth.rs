//! Handlers for account registration, login, and logout.

use axum::extract::State;
use axum::http::header::{SET_COOKIE, USER_AGENT};
use axum::http::HeaderMap;
use axum::response::IntoResponse;
use axum::Json;
use chrono::Utc;
use kevs_core::error::CoreError;
use kevs_db::models::session::CreateSession;
use kevs_db::models::user::CreateUser;
use kevs_db::repositories::{SessionRepo, UserRepo};
use serde::{Deserialize, Serialize};

use crate::auth::password::{hash_password, verify_password};
use crate::auth::session::{generate_session_token, hash_session_token, token_from_headers};
use crate::error::{AppError, AppResult};
use crate::extract::ApiJson;
use crate::state::AppState;

const MISSING_FIELDS: &str = "Missing fields";
const INVALID_CREDENTIALS: &str = "Invalid credentials";
const DUPLICATE_ACCOUNT: &str = "Username or email already exists";

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /api/register`.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub username: Option<String>,
    pub admission: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

/// Request body for `POST /api/login`.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    pub success: bool,
    pub message: &'static str,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub success: bool,
    pub username: String,
}

#[derive(Debug, Serialize)]
pub struct SuccessResponse {
    pub success: bool,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/register
///
/// Create an account with zeroed progress. Username and email must both be
/// unused (exact, case-sensitive match).
pub async fn register(
    State(state): State<AppState>,
    ApiJson(input): ApiJson<RegisterRequest>,
) -> AppResult<Json<RegisterResponse>> {
    let username = required(input.username.as_deref())?;
    let email = required(input.email.as_deref())?;
    // Passwords are taken verbatim; only emptiness is rejected.
    let password = input
        .password
        .filter(|p| !p.is_empty())
        .ok_or_else(|| AppError::BadRequest(MISSING_FIELDS.into()))?;
    let admission = input.admission.as_deref().map(str::trim).unwrap_or_default();

    if UserRepo::exists_with_username_or_email(&state.pool, username, email).await? {
        return Err(AppError::Core(CoreError::Conflict(DUPLICATE_ACCOUNT.into())));
    }

    let password_hash = hash_password(&password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;

    // A concurrent registration can still win the race; the unique
    // constraints turn that into the same 400 CONFLICT.
    let user = UserRepo::create(
        &state.pool,
        &CreateUser {
            username: username.to_string(),
            admission: Some(admission.to_string()),
            email: email.to_string(),
            password_hash,
        },
    )
    .await?;

    tracing::info!(user_id = user.id, username = %user.username, "User registered");

    Ok(Json(RegisterResponse {
        success: true,
        message: "Account created",
    }))
}

/// POST /api/login
///
/// Verify credentials, open a session, and set the session cookie.
/// Unknown usernames and wrong passwords both answer 400.
pub async fn login(
    State(state): State<AppState>,
    headers: HeaderMap,
    ApiJson(input): ApiJson<LoginRequest>,
) -> AppResult<impl IntoResponse> {
    let username = required(input.username.as_deref())?;
    let password = input
        .password
        .filter(|p| !p.is_empty())
        .ok_or_else(|| AppError::BadRequest(MISSING_FIELDS.into()))?;

    let user = UserRepo::find_by_username(&state.pool, username)
        .await?
        .ok_or_else(|| AppError::BadRequest(INVALID_CREDENTIALS.into()))?;

    let password_valid = verify_password(&password, &user.password_hash)
        .map_err(|e| AppError::InternalError(format!("Password verification error: {e}")))?;
    if !password_valid {
        tracing::info!(username = %user.username, "Login rejected: wrong password");
        return Err(AppError::BadRequest(INVALID_CREDENTIALS.into()));
    }

    let (token, token_hash) = generate_session_token();
    let session_config = &state.config.session;
    let user_agent = headers
        .get(USER_AGENT)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);

    let session = SessionRepo::create(
        &state.pool,
        &CreateSession {
            user_id: user.id,
            token_hash,
            expires_at: Utc::now() + session_config.ttl(),
            user_agent,
        },
    )
    .await?;

    tracing::info!(
        user_id = user.id,
        session_id = session.id,
        "User logged in"
    );

    Ok((
        [(SET_COOKIE, session_config.cookie_for(&token))],
        Json(LoginResponse {
            success: true,
            username: user.username,
        }),
    ))
}

/// POST /api/logout
///
/// Revoke the presented session, if any, and clear the cookie. Always
/// succeeds.
pub async fn logout(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> AppResult<impl IntoResponse> {
    if let Some(token) = token_from_headers(&headers) {
        let revoked =
            SessionRepo::revoke_by_token_hash(&state.pool, &hash_session_token(&token)).await?;
        tracing::info!(revoked, "User logged out");
    }

    Ok((
        [(SET_COOKIE, state.config.session.expired_cookie())],
        Json(SuccessResponse { success: true }),
    ))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Trim a required text field, rejecting absent or blank values.
fn required(value: Option<&str>) -> AppResult<&str> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .ok_or_else(|| AppError::BadRequest(MISSING_FIELDS.into()))
}
