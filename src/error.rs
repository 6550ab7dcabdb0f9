use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

pub const INVALID_PAYLOAD: &str = "Invalid payload.";
pub const FORBIDDEN: &str = "You do not have permission to do that.";
pub const INVALID_TOKEN: &str = "Provide a valid auth token.";
pub const USER_NOT_FOUND: &str = "User does not exist.";
pub const DUPLICATE_EMAIL: &str = "Sorry, that email already exists.";
pub const DUPLICATE_USER: &str = "Sorry. That user already exists.";

#[derive(Debug)]
pub enum AppError {
    InvalidPayload,
    BadRequest(String),
    Unauthenticated(String),
    Forbidden,
    NotFound(String),
    Internal(String),
    Database(sqlx::Error),
}

impl AppError {
    pub fn invalid_token() -> Self {
        AppError::Unauthenticated(INVALID_TOKEN.to_string())
    }

    pub fn user_not_found() -> Self {
        AppError::NotFound(USER_NOT_FOUND.to_string())
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::InvalidPayload | AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthenticated(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden => StatusCode::FORBIDDEN,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Internal(_) | AppError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AppError::InvalidPayload => write!(f, "Bad Request: {INVALID_PAYLOAD}"),
            AppError::BadRequest(msg) => write!(f, "Bad Request: {msg}"),
            AppError::Unauthenticated(msg) => write!(f, "Unauthorized: {msg}"),
            AppError::Forbidden => write!(f, "Forbidden: {FORBIDDEN}"),
            AppError::NotFound(msg) => write!(f, "Not Found: {msg}"),
            AppError::Internal(msg) => write!(f, "Internal Error: {msg}"),
            AppError::Database(err) => write!(f, "Database Error: {err}"),
        }
    }
}

impl std::error::Error for AppError {}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let (kind, message) = match self {
            AppError::InvalidPayload => ("fail", INVALID_PAYLOAD.to_string()),
            AppError::BadRequest(msg) | AppError::Unauthenticated(msg) | AppError::NotFound(msg) => {
                ("fail", msg)
            }
            // Denials carry "error" rather than "fail".
            AppError::Forbidden => ("error", FORBIDDEN.to_string()),
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {msg}");
                ("error", "Internal server error".to_string())
            }
            AppError::Database(err) => {
                tracing::error!("Database error: {err}");
                ("error", "Internal server error".to_string())
            }
        };

        let body = json!({ "status": kind, "message": message });
        (status, axum::Json(body)).into_response()
    }
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        AppError::Database(err)
    }
}

#[cfg(test)]
mod tests {
    use axum::body::to_bytes;
    use serde_json::Value;

    use super::*;

    async fn render(err: AppError) -> (StatusCode, Value) {
        let response = err.into_response();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn invalid_payload_envelope() {
        let (status, body) = render(AppError::InvalidPayload).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["status"], "fail");
        assert_eq!(body["message"], "Invalid payload.");
    }

    #[tokio::test]
    async fn forbidden_envelope() {
        let (status, body) = render(AppError::Forbidden).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body["status"], "error");
        assert_eq!(body["message"], "You do not have permission to do that.");
    }

    #[tokio::test]
    async fn database_errors_are_not_leaked() {
        let (status, body) = render(AppError::Database(sqlx::Error::RowNotFound)).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["status"], "error");
        assert_eq!(body["message"], "Internal server error");
    }

    #[tokio::test]
    async fn not_found_envelope() {
        let (status, body) = render(AppError::user_not_found()).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["message"], "User does not exist.");
    }
}
