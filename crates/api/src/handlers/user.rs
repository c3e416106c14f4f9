//! Handler for the current-user profile.

use std::collections::BTreeSet;

use axum::Json;
use kevs_core::progress::TaskCompletion;
use kevs_core::rewards::{self, Badge};
use kevs_core::types::{DbId, ProjectIndex};
use serde::Serialize;

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;

/// Response for `GET /api/user`: `{ logged_in }` plus the profile when a
/// session is present.
#[derive(Debug, Serialize)]
pub struct CurrentUserResponse {
    pub logged_in: bool,
    #[serde(flatten)]
    pub profile: Option<UserProfile>,
}

/// Public view of a user row (no password hash).
#[derive(Debug, Serialize)]
pub struct UserProfile {
    pub id: DbId,
    pub username: String,
    pub admission: Option<String>,
    pub email: String,
    pub unlocked_index: ProjectIndex,
    pub completed_projects: BTreeSet<ProjectIndex>,
    pub task_completion: TaskCompletion,
    pub points: u32,
    pub level: u32,
    pub badges: Vec<Badge>,
}

/// GET /api/user
///
/// Answers 200 either way; anonymous callers get `{ logged_in: false }`.
pub async fn current_user(auth: Option<AuthUser>) -> AppResult<Json<CurrentUserResponse>> {
    let Some(AuthUser { user }) = auth else {
        return Ok(Json(CurrentUserResponse {
            logged_in: false,
            profile: None,
        }));
    };

    let progress = user.progress()?;

    Ok(Json(CurrentUserResponse {
        logged_in: true,
        profile: Some(UserProfile {
            id: user.id,
            username: user.username,
            admission: user.admission,
            email: user.email,
            unlocked_index: progress.unlocked_index,
            completed_projects: progress.completed_projects,
            task_completion: progress.task_completion,
            points: progress.points,
            level: rewards::level(progress.points),
            badges: rewards::badges(progress.points),
        }),
    }))
}
