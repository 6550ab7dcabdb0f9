use axum::extract::{FromRequestParts, Request, State};
use axum::middleware::Next;
use axum::response::Response;

use crate::auth::extractor::AuthUser;
use crate::error::AppError;
use crate::state::SharedState;

/// Gate for privileged routes. Resolves the caller, rejects non-admins with
/// 403 and hands the resolved [`AuthUser`] to the handler as an extension.
pub async fn require_admin(
    State(state): State<SharedState>,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let (mut parts, body) = req.into_parts();
    let auth = AuthUser::from_request_parts(&mut parts, &state).await?;

    if let Err(denied) = auth.require_admin() {
        tracing::info!(user_id = auth.user_id, "Non-admin caller denied");
        return Err(denied);
    }

    parts.extensions.insert(auth);
    Ok(next.run(Request::from_parts(parts, body)).await)
}
