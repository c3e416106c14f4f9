//! Handlers that mutate the logged-in user's progress.
//!
//! Every mutation runs inside one transaction that holds the user's row
//! lock from read to write, so two concurrent requests for the same user
//! cannot overwrite each other's changes.

use std::collections::BTreeSet;

use axum::extract::State;
use axum::Json;
use kevs_core::error::CoreError;
use kevs_core::progress::{Progress, TaskCompletion};
use kevs_core::types::{DbId, ProjectIndex, TaskIndex};
use kevs_db::models::user::ProgressColumns;
use kevs_db::repositories::UserRepo;
use serde::{Deserialize, Serialize};

use crate::error::AppResult;
use crate::extract::ApiJson;
use crate::handlers::auth::SuccessResponse;
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /api/user/progress/task`.
#[derive(Debug, Deserialize)]
pub struct TaskToggleRequest {
    pub project_index: ProjectIndex,
    pub task_index: TaskIndex,
    #[serde(default)]
    pub checked: bool,
}

/// Request body for `POST /api/user/progress/complete`.
#[derive(Debug, Deserialize)]
pub struct CompleteProjectRequest {
    pub project_index: ProjectIndex,
}

#[derive(Debug, Serialize)]
pub struct TaskToggleResponse {
    pub success: bool,
    pub task_completion: TaskCompletion,
}

#[derive(Debug, Serialize)]
pub struct CompleteProjectResponse {
    pub success: bool,
    pub completed_projects: BTreeSet<ProjectIndex>,
    pub unlocked_index: ProjectIndex,
    pub points: u32,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/user/progress/task
pub async fn toggle_task(
    auth: AuthUser,
    State(state): State<AppState>,
    ApiJson(input): ApiJson<TaskToggleRequest>,
) -> AppResult<Json<TaskToggleResponse>> {
    let ((), progress) = update_progress(&state, auth.user_id(), |progress| {
        progress
            .toggle_task(input.project_index, input.task_index, input.checked)
            .map(|_| ())
    })
    .await?;

    tracing::info!(
        user_id = auth.user_id(),
        project_index = input.project_index,
        task_index = input.task_index,
        checked = input.checked,
        "Task toggled"
    );

    Ok(Json(TaskToggleResponse {
        success: true,
        task_completion: progress.task_completion,
    }))
}

/// POST /api/user/progress/complete
///
/// Completing an already-completed project is a successful no-op.
pub async fn complete_project(
    auth: AuthUser,
    State(state): State<AppState>,
    ApiJson(input): ApiJson<CompleteProjectRequest>,
) -> AppResult<Json<CompleteProjectResponse>> {
    let (outcome, progress) = update_progress(&state, auth.user_id(), |progress| {
        progress.complete_project(input.project_index)
    })
    .await?;

    tracing::info!(
        user_id = auth.user_id(),
        project_index = input.project_index,
        changed = outcome.changed(),
        points = progress.points,
        "Project completion recorded"
    );

    Ok(Json(CompleteProjectResponse {
        success: true,
        completed_projects: progress.completed_projects,
        unlocked_index: progress.unlocked_index,
        points: progress.points,
    }))
}

/// POST /api/user/progress/reset
pub async fn reset(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<SuccessResponse>> {
    update_progress(&state, auth.user_id(), |progress| {
        progress.reset();
        Ok(())
    })
    .await?;

    tracing::info!(user_id = auth.user_id(), "Progress reset");

    Ok(Json(SuccessResponse { success: true }))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Lock the user's row, apply `apply` to their progress, and persist the
/// result. Nothing is written if `apply` fails or leaves the progress as it
/// was, so `updated_at` only moves on a real change.
async fn update_progress<T>(
    state: &AppState,
    user_id: DbId,
    apply: impl FnOnce(&mut Progress) -> Result<T, CoreError>,
) -> AppResult<(T, Progress)> {
    let mut tx = state.pool.begin().await?;

    let user = UserRepo::lock_by_id(&mut *tx, user_id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "User",
            id: user_id,
        })?;

    let mut progress = user.progress()?;
    if !progress.points_consistent() {
        tracing::warn!(
            user_id,
            points = progress.points,
            completed = progress.completed_projects.len(),
            "Stored points do not match completed projects"
        );
    }

    let before = progress.clone();
    let value = apply(&mut progress)?;

    if progress == before {
        // Dropping the transaction rolls it back and releases the row lock.
        return Ok((value, progress));
    }

    let columns = ProgressColumns::try_from(&progress)?;
    UserRepo::save_progress(&mut *tx, user_id, &columns)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "User",
            id: user_id,
        })?;

    tx.commit().await?;

    Ok((value, progress))
}
