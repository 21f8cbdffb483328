//! Optional API-key guard for the query endpoint.

use axum::{
    extract::{Request, State},
    http::{HeaderMap, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use tracing::warn;

use crate::error::ErrorBody;
use crate::state::AppState;

pub const API_KEY_HEADER: &str = "x-api-key";

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("Missing API key")]
    MissingKey,

    #[error("Invalid API key")]
    InvalidKey,
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let body = ErrorBody { error: "unauthorized", message: self.to_string() };
        (StatusCode::UNAUTHORIZED, Json(body)).into_response()
    }
}

/// Check the request's key against the configured one.
pub fn check_api_key(expected: Option<&str>, headers: &HeaderMap) -> Result<(), AuthError> {
    let Some(expected) = expected else {
        return Ok(());
    };

    let provided = headers
        .get(API_KEY_HEADER)
        .and_then(|h| h.to_str().ok())
        .ok_or(AuthError::MissingKey)?;

    if provided == expected {
        Ok(())
    } else {
        Err(AuthError::InvalidKey)
    }
}

/// Middleware enforcing [`check_api_key`] when a key is configured.
pub async fn require_api_key(State(state): State<AppState>, request: Request, next: Next) -> Response {
    match check_api_key(state.server.api_key.as_deref(), request.headers()) {
        Ok(()) => next.run(request).await,
        Err(e) => {
            warn!(error = %e, path = %request.uri().path(), "Rejected unauthenticated request");
            e.into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use axum::http::HeaderValue;

    use super::*;

    #[test]
    fn test_no_key_configured_allows_all() {
        assert!(check_api_key(None, &HeaderMap::new()).is_ok());
    }

    #[test]
    fn test_key_checks() {
        let mut headers = HeaderMap::new();
        assert!(matches!(check_api_key(Some("k"), &headers), Err(AuthError::MissingKey)));

        headers.insert(API_KEY_HEADER, HeaderValue::from_static("wrong"));
        assert!(matches!(check_api_key(Some("k"), &headers), Err(AuthError::InvalidKey)));

        headers.insert(API_KEY_HEADER, HeaderValue::from_static("k"));
        assert!(check_api_key(Some("k"), &headers).is_ok());
    }
}
