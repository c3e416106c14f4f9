//! Startup data seeding.

use kevs_db::models::user::CreateUser;
use kevs_db::repositories::UserRepo;
use kevs_db::DbPool;

use crate::auth::password::hash_password;
use crate::error::{AppError, AppResult};

pub const DEMO_USERNAME: &str = "demo";
pub const DEMO_EMAIL: &str = "demo@example.com";
pub const DEMO_ADMISSION: &str = "123";
pub const DEMO_PASSWORD: &str = "demo123";

/// Create the `demo` account unless its username or email is taken.
///
/// Returns `true` if the account was created by this call.
pub async fn ensure_demo_user(pool: &DbPool) -> AppResult<bool> {
    if UserRepo::exists_with_username_or_email(pool, DEMO_USERNAME, DEMO_EMAIL).await? {
        tracing::debug!("Demo user already present");
        return Ok(false);
    }

    let password_hash = hash_password(DEMO_PASSWORD)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;

    let user = UserRepo::create(
        pool,
        &CreateUser {
            username: DEMO_USERNAME.to_string(),
            admission: Some(DEMO_ADMISSION.to_string()),
            email: DEMO_EMAIL.to_string(),
            password_hash,
        },
    )
    .await?;

    tracing::info!(user_id = user.id, "Demo user created");
    Ok(true)
}
