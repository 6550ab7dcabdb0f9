use chrono::{DateTime, Utc};
use sqlx::error::ErrorKind;
use sqlx::PgPool;

use crate::models::User;

/// Insert a user. `created_at` falls back to the database clock.
pub async fn create<'e, E: sqlx::PgExecutor<'e>>(
    executor: E,
    username: &str,
    email: &str,
    password_hash: &str,
    created_at: Option<DateTime<Utc>>,
) -> Result<User, sqlx::Error> {
    sqlx::query_as::<_, User>(
        "INSERT INTO users (username, email, password, created_at)
         VALUES ($1, $2, $3, COALESCE($4, NOW())) RETURNING *",
    )
    .bind(username)
    .bind(email)
    .bind(password_hash)
    .bind(created_at)
    .fetch_one(executor)
    .await
}

pub async fn find_by_id<'e, E: sqlx::PgExecutor<'e>>(
    executor: E,
    id: i32,
) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
        .bind(id)
        .fetch_optional(executor)
        .await
}

pub async fn find_by_email<'e, E: sqlx::PgExecutor<'e>>(
    executor: E,
    email: &str,
) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = $1")
        .bind(email)
        .fetch_optional(executor)
        .await
}

pub async fn find_by_username_or_email<'e, E: sqlx::PgExecutor<'e>>(
    executor: E,
    username: &str,
    email: &str,
) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>("SELECT * FROM users WHERE username = $1 OR email = $2 LIMIT 1")
        .bind(username)
        .bind(email)
        .fetch_optional(executor)
        .await
}

pub async fn list_all(pool: &PgPool) -> Result<Vec<User>, sqlx::Error> {
    sqlx::query_as::<_, User>("SELECT * FROM users ORDER BY created_at DESC")
        .fetch_all(pool)
        .await
}

/// Grant or revoke admin. Returns false when no user has this email.
pub async fn set_admin(pool: &PgPool, email: &str, admin: bool) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("UPDATE users SET admin = $2 WHERE email = $1")
        .bind(email)
        .bind(admin)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

/// Whether an insert was rejected by a table constraint or because a value
/// does not fit its column (SQLSTATE class 22).
pub fn is_integrity_error(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Database(db_err) => {
            matches!(
                db_err.kind(),
                ErrorKind::UniqueViolation | ErrorKind::NotNullViolation | ErrorKind::CheckViolation
            ) || db_err.code().is_some_and(|code| code.starts_with("22"))
        }
        _ => false,
    }
}
