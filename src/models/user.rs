use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Debug, Clone, sqlx::FromRow, Serialize)]
pub struct User {
    pub id: i32,
    pub username: String,
    pub email: String,
    /// Argon2id PHC string.
    #[serde(skip_serializing)]
    pub password: String,
    pub active: bool,
    pub admin: bool,
    pub created_at: DateTime<Utc>,
}
