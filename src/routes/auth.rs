use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde_json::{json, Value};

use crate::auth::extractor::AuthUser;
use crate::auth::{jwt, password};
use crate::db;
use crate::error::{AppError, DUPLICATE_USER};
use crate::payload::Payload;
use crate::state::SharedState;

fn issue_token(state: &SharedState, user_id: i32) -> Result<String, AppError> {
    jwt::issue(user_id, state.config.token_lifetime, &state.config.secret_key)
        .map_err(AppError::Internal)
}

pub async fn register(
    State(state): State<SharedState>,
    payload: Payload,
) -> Result<(StatusCode, Json<Value>), AppError> {
    let (Some(username), Some(email), Some(password)) = (
        payload.text("username"),
        payload.text("email"),
        payload.text("password"),
    ) else {
        return Err(AppError::InvalidPayload);
    };

    if db::users::find_by_username_or_email(&state.pool, username, email)
        .await?
        .is_some()
    {
        return Err(AppError::BadRequest(DUPLICATE_USER.to_string()));
    }

    let password_hash = password::hash(password).map_err(AppError::Internal)?;

    let user = db::users::create(&state.pool, username, email, &password_hash, None)
        .await
        .map_err(|e| {
            if db::users::is_integrity_error(&e) {
                tracing::warn!("Registration rejected by storage: {e}");
                AppError::InvalidPayload
            } else {
                AppError::Database(e)
            }
        })?;

    let auth_token = issue_token(&state, user.id)?;

    tracing::info!(user_id = user.id, "User registered");

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "status": "success",
            "message": "Successfully registered",
            "auth_token": auth_token,
        })),
    ))
}

pub async fn login(
    State(state): State<SharedState>,
    payload: Payload,
) -> Result<Json<Value>, AppError> {
    let (Some(email), Some(password)) = (payload.text("email"), payload.text("password")) else {
        return Err(AppError::InvalidPayload);
    };

    let user = db::users::find_by_email(&state.pool, email)
        .await?
        .ok_or_else(AppError::user_not_found)?;

    // Unknown email and wrong password look the same to the caller.
    if !password::verify(password, &user.password).map_err(AppError::Internal)? {
        return Err(AppError::user_not_found());
    }

    let auth_token = issue_token(&state, user.id)?;

    Ok(Json(json!({
        "status": "success",
        "message": "Successfully logged in.",
        "auth_token": auth_token,
    })))
}

/// Tokens are stateless; logging out only confirms the token was valid.
pub async fn logout(auth: AuthUser) -> Json<Value> {
    tracing::debug!(user_id = auth.user_id, "User logged out");
    Json(json!({
        "status": "success",
        "message": "Successfully logged out.",
    }))
}

pub async fn status(
    auth: AuthUser,
    State(state): State<SharedState>,
) -> Result<Json<Value>, AppError> {
    let user = db::users::find_by_id(&state.pool, auth.user_id)
        .await?
        .ok_or_else(AppError::invalid_token)?;

    Ok(Json(json!({
        "status": "success",
        "data": {
            "id": user.id,
            "username": user.username,
            "email": user.email,
            "active": user.active,
            "admin": user.admin,
            "created_at": user.created_at,
        },
    })))
}
