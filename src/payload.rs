use axum::extract::{FromRequest, Request};
use axum::http::header::CONTENT_TYPE;
use bytes::Bytes;
use serde_json::{Map, Value};

use crate::error::AppError;

/// A non-empty key/value request body.
///
/// JSON is assumed unless the request says it is a url-encoded form; the
/// Content-Type does not have to be `application/json`. Anything that is
/// not a non-empty object is rejected with [`AppError::InvalidPayload`].
#[derive(Debug)]
pub struct Payload(pub Map<String, Value>);

impl Payload {
    /// A string field. Missing, null and non-string values read as `None`.
    pub fn text(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(Value::as_str)
    }
}

impl<S: Send + Sync> FromRequest<S> for Payload {
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let content_type = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned);

        let body = Bytes::from_request(req, state)
            .await
            .map_err(|_| AppError::InvalidPayload)?;

        parse_body(content_type.as_deref(), &body).map(Payload)
    }
}

pub fn parse_body(content_type: Option<&str>, body: &[u8]) -> Result<Map<String, Value>, AppError> {
    let value = if content_type.is_some_and(|ct| ct.contains("application/x-www-form-urlencoded")) {
        parse_form_urlencoded(body)
    } else {
        serde_json::from_slice(body).map_err(|_| AppError::InvalidPayload)?
    };

    match value {
        Value::Object(map) if !map.is_empty() => Ok(map),
        _ => Err(AppError::InvalidPayload),
    }
}

fn parse_form_urlencoded(body: &[u8]) -> Value {
    let map: Map<String, Value> = form_urlencoded::parse(body)
        .map(|(k, v)| (k.into_owned(), Value::String(v.into_owned())))
        .collect();
    Value::Object(map)
}
