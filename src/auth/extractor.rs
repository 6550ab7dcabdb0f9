use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::RequestPartsExt;
use axum_extra::headers::authorization::Bearer;
use axum_extra::headers::Authorization;
use axum_extra::TypedHeader;

use crate::auth::jwt;
use crate::db;
use crate::error::AppError;
use crate::state::SharedState;

/// The caller behind a valid bearer token. Only active users resolve.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: i32,
    pub username: String,
    pub admin: bool,
}

impl AuthUser {
    pub fn require_admin(&self) -> Result<(), AppError> {
        if self.admin {
            Ok(())
        } else {
            Err(AppError::Forbidden)
        }
    }
}

impl FromRequestParts<SharedState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &SharedState,
    ) -> Result<Self, Self::Rejection> {
        let TypedHeader(Authorization(bearer)) = parts
            .extract::<TypedHeader<Authorization<Bearer>>>()
            .await
            .map_err(|_| AppError::invalid_token())?;

        let claims = jwt::decode_token(bearer.token(), &state.config.secret_key).map_err(|e| {
            tracing::debug!("Rejected auth token: {e}");
            AppError::invalid_token()
        })?;

        let user = db::users::find_by_id(&state.pool, claims.sub)
            .await?
            .filter(|user| user.active)
            .ok_or_else(AppError::invalid_token)?;

        Ok(AuthUser {
            user_id: user.id,
            username: user.username,
            admin: user.admin,
        })
    }
}
