//! Maintenance tasks run from the command line instead of the server.

use sqlx::PgPool;

use crate::auth::password;
use crate::db;
use crate::error::AppError;

const SEED_USERS: [(&str, &str); 2] = [
    ("michael", "michael@realpython.com"),
    ("michaelherman", "michaelherman@realpython.com"),
];

pub async fn migrate(pool: &PgPool) -> Result<(), AppError> {
    sqlx::migrate!("./migrations")
        .run(pool)
        .await
        .map_err(sqlx::Error::from)?;
    Ok(())
}

/// Drop every table, then rebuild the schema from the migrations.
pub async fn recreate_db(pool: &PgPool) -> Result<(), AppError> {
    sqlx::query("DROP TABLE IF EXISTS users, _sqlx_migrations")
        .execute(pool)
        .await?;
    tracing::warn!("Dropped all tables");
    migrate(pool).await
}

/// Insert the sample users, skipping any that already exist. Returns how
/// many were added.
pub async fn seed_db(pool: &PgPool, seed_password: &str) -> Result<usize, AppError> {
    let mut added = 0;
    for (username, email) in SEED_USERS {
        if db::users::find_by_username_or_email(pool, username, email)
            .await?
            .is_some()
        {
            tracing::info!("Seed user {username} already present");
            continue;
        }
        let password_hash = password::hash(seed_password).map_err(AppError::Internal)?;
        db::users::create(pool, username, email, &password_hash, None).await?;
        added += 1;
    }
    Ok(added)
}

pub async fn set_admin(pool: &PgPool, email: &str, admin: bool) -> Result<(), AppError> {
    if db::users::set_admin(pool, email, admin).await? {
        tracing::info!(email, admin, "Admin flag updated");
        Ok(())
    } else {
        Err(AppError::user_not_found())
    }
}
