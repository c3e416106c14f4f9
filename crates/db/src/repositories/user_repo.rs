//! Repository for the `users` table.

use kevs_core::types::DbId;
use sqlx::{PgConnection, PgPool};

use crate::models::user::{CreateUser, ProgressColumns, User};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, username, admission, email, password_hash, unlocked_index, \
                        completed_projects, task_completion, points, created_at, updated_at";

/// Provides CRUD operations for users.
pub struct UserRepo;

impl UserRepo {
    /// Insert a new user with zeroed progress, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateUser) -> Result<User, sqlx::Error> {
        let query = format!(
            "INSERT INTO users (username, admission, email, password_hash)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(&input.username)
            .bind(&input.admission)
            .bind(&input.email)
            .bind(&input.password_hash)
            .fetch_one(pool)
            .await
    }

    /// Find a user by internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE id = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a user by username (case-sensitive).
    pub async fn find_by_username(
        pool: &PgPool,
        username: &str,
    ) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE username = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(username)
            .fetch_optional(pool)
            .await
    }

    /// Whether any user already holds `username` or `email` (exact match).
    pub async fn exists_with_username_or_email(
        pool: &PgPool,
        username: &str,
        email: &str,
    ) -> Result<bool, sqlx::Error> {
        let exists: (bool,) = sqlx::query_as(
            "SELECT EXISTS (SELECT 1 FROM users WHERE username = $1 OR email = $2)",
        )
        .bind(username)
        .bind(email)
        .fetch_one(pool)
        .await?;
        Ok(exists.0)
    }

    /// Load a user and take a row lock held until the surrounding
    /// transaction ends.
    ///
    /// Progress updates go through this so concurrent read-modify-write
    /// cycles on the same user are serialized.
    pub async fn lock_by_id(conn: &mut PgConnection, id: DbId) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE id = $1 FOR UPDATE");
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .fetch_optional(conn)
            .await
    }

    /// Overwrite the progress columns of a user.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn save_progress(
        conn: &mut PgConnection,
        id: DbId,
        progress: &ProgressColumns,
    ) -> Result<Option<User>, sqlx::Error> {
        let query = format!(
            "UPDATE users SET
                unlocked_index = $2,
                completed_projects = $3,
                task_completion = $4,
                points = $5
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .bind(progress.unlocked_index)
            .bind(&progress.completed_projects)
            .bind(&progress.task_completion)
            .bind(progress.points)
            .fetch_optional(conn)
            .await
    }
}
