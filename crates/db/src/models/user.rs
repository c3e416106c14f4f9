//! User entity model and DTOs.

use kevs_core::error::CoreError;
use kevs_core::progress::{Progress, TaskCompletion};
use kevs_core::types::{DbId, Timestamp};
use serde::Deserialize;
use sqlx::types::Json;
use sqlx::FromRow;

/// Full user row from the `users` table.
///
/// Contains the password hash -- NEVER serialize this to API responses
/// directly. Progress columns are stored in their SQL shapes; use
/// [`User::progress`] to get the typed domain value.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: DbId,
    pub username: String,
    pub admission: Option<String>,
    pub email: String,
    pub password_hash: String,
    pub unlocked_index: i32,
    pub completed_projects: Vec<i32>,
    pub task_completion: Json<TaskCompletion>,
    pub points: i32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl User {
    /// Convert the stored progress columns into a [`Progress`] value.
    ///
    /// Fails if any stored integer is negative, which the schema's CHECK
    /// constraints rule out for `unlocked_index` and `points` but not for
    /// array elements.
    pub fn progress(&self) -> Result<Progress, CoreError> {
        let unlocked_index = non_negative("unlocked_index", self.unlocked_index)?;
        let points = non_negative("points", self.points)?;
        let completed_projects = self
            .completed_projects
            .iter()
            .map(|&idx| non_negative("completed_projects", idx))
            .collect::<Result<_, _>>()?;

        Ok(Progress {
            unlocked_index,
            completed_projects,
            task_completion: self.task_completion.0.clone(),
            points,
        })
    }
}

fn non_negative(column: &str, value: i32) -> Result<u32, CoreError> {
    u32::try_from(value).map_err(|_| {
        CoreError::Internal(format!("users.{column} holds negative value {value}"))
    })
}

/// Stored progress columns in their SQL shapes.
#[derive(Debug, Clone)]
pub struct ProgressColumns {
    pub unlocked_index: i32,
    pub completed_projects: Vec<i32>,
    pub task_completion: Json<TaskCompletion>,
    pub points: i32,
}

impl TryFrom<&Progress> for ProgressColumns {
    type Error = CoreError;

    fn try_from(progress: &Progress) -> Result<Self, Self::Error> {
        let to_sql = |column: &str, value: u32| {
            i32::try_from(value).map_err(|_| {
                CoreError::Internal(format!("{column} value {value} does not fit in INTEGER"))
            })
        };

        Ok(Self {
            unlocked_index: to_sql("unlocked_index", progress.unlocked_index)?,
            completed_projects: progress
                .completed_projects
                .iter()
                .map(|&idx| to_sql("completed_projects", idx))
                .collect::<Result<_, _>>()?,
            task_completion: Json(progress.task_completion.clone()),
            points: to_sql("points", progress.points)?,
        })
    }
}

/// DTO for creating a new user. Progress columns start at their defaults.
#[derive(Debug, Deserialize)]
pub struct CreateUser {
    pub username: String,
    pub admission: Option<String>,
    pub email: String,
    pub password_hash: String,
}
