use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::{Extension, Json};
use serde_json::{json, Value};
use sqlx::PgPool;

use crate::auth::extractor::AuthUser;
use crate::auth::password;
use crate::db;
use crate::error::{AppError, DUPLICATE_EMAIL};
use crate::models::User;
use crate::payload::Payload;
use crate::state::SharedState;

/// `POST /users`, behind the admin gate.
pub async fn create(
    State(state): State<SharedState>,
    Extension(auth): Extension<AuthUser>,
    payload: Payload,
) -> Result<(StatusCode, Json<Value>), AppError> {
    let user = add_user(&state.pool, &payload).await?;

    tracing::info!(user_id = user.id, added_by = %auth.username, "User added");

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "status": "success",
            "message": format!("{} was added!", user.email),
        })),
    ))
}

/// Insert a user from `{username, email, password}` in one transaction.
///
/// Only the email is looked up before the insert. A duplicate username, a
/// missing field or a value the column rejects all come back as
/// [`AppError::InvalidPayload`] after the transaction is rolled back.
pub(crate) async fn add_user(pool: &PgPool, payload: &Payload) -> Result<User, AppError> {
    let username = payload.text("username");
    let email = payload.text("email");
    let password = payload.text("password");

    let mut tx = pool.begin().await?;

    if let Some(email) = email {
        if db::users::find_by_email(&mut *tx, email).await?.is_some() {
            tx.rollback().await?;
            return Err(AppError::BadRequest(DUPLICATE_EMAIL.to_string()));
        }
    }

    let (Some(username), Some(email), Some(password)) = (username, email, password) else {
        tx.rollback().await?;
        return Err(AppError::InvalidPayload);
    };

    let password_hash = password::hash(password).map_err(AppError::Internal)?;

    match db::users::create(&mut *tx, username, email, &password_hash, None).await {
        Ok(user) => {
            tx.commit().await?;
            Ok(user)
        }
        Err(e) if db::users::is_integrity_error(&e) => {
            tracing::warn!("User insert rejected by storage: {e}");
            tx.rollback().await?;
            Err(AppError::InvalidPayload)
        }
        Err(e) => Err(e.into()),
    }
}

/// `GET /users/{id}`. Ids that are not integers are simply not found.
pub async fn get(
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, AppError> {
    let id: i32 = id.parse().map_err(|_| AppError::user_not_found())?;

    let user = db::users::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(AppError::user_not_found)?;

    Ok(Json(json!({
        "status": "success",
        "data": {
            "username": user.username,
            "email": user.email,
            "created_at": user.created_at,
        },
    })))
}

/// `GET /users`, newest first.
pub async fn list(State(state): State<SharedState>) -> Result<Json<Value>, AppError> {
    let users: Vec<Value> = db::users::list_all(&state.pool)
        .await?
        .into_iter()
        .map(|user| {
            json!({
                "id": user.id,
                "username": user.username,
                "email": user.email,
                "created_at": user.created_at,
            })
        })
        .collect();

    Ok(Json(json!({
        "status": "success",
        "data": { "users": users },
    })))
}
