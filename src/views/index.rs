use askama::Template;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Redirect, Response};

use crate::db;
use crate::error::{AppError, INVALID_PAYLOAD};
use crate::models::User;
use crate::payload::Payload;
use crate::routes::users::add_user;
use crate::state::SharedState;

#[derive(Template)]
#[template(path = "index.html")]
struct IndexTemplate {
    users: Vec<User>,
    error: Option<String>,
}

async fn render(state: &SharedState, error: Option<String>) -> Result<Html<String>, AppError> {
    let users = db::users::list_all(&state.pool).await?;
    let template = IndexTemplate { users, error };
    template
        .render()
        .map(Html)
        .map_err(|e| AppError::Internal(format!("Template render failed: {e}")))
}

pub async fn index(State(state): State<SharedState>) -> Result<Html<String>, AppError> {
    render(&state, None).await
}

/// Form post from the index page. Rejected input re-renders the page with
/// the failure message instead of an envelope.
pub async fn add(
    State(state): State<SharedState>,
    payload: Result<Payload, AppError>,
) -> Result<Response, AppError> {
    let outcome = match payload {
        Ok(payload) => add_user(&state.pool, &payload).await,
        Err(e) => Err(e),
    };

    let message = match outcome {
        Ok(user) => {
            tracing::info!(user_id = user.id, "User added from index form");
            return Ok(Redirect::to("/").into_response());
        }
        Err(AppError::InvalidPayload) => INVALID_PAYLOAD.to_string(),
        Err(AppError::BadRequest(msg)) => msg,
        Err(e) => return Err(e),
    };

    let page = render(&state, Some(message)).await?;
    Ok((StatusCode::BAD_REQUEST, page).into_response())
}
