//! Mapping of pipeline errors onto HTTP responses.

use axum::{http::StatusCode, Json};
use serde::Serialize;
use tracing::{error, warn};

use vaani_core::VaaniError;

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: &'static str,
    pub message: String,
}

pub type ApiError = (StatusCode, Json<ErrorBody>);

/// Status and user-safe body for a pipeline error. Store details are only logged.
pub fn api_error(err: VaaniError) -> ApiError {
    let (status, code) = match &err {
        VaaniError::MalformedInput(_) => (StatusCode::BAD_REQUEST, "malformed_input"),
        VaaniError::StoreUnavailable(_) => (StatusCode::SERVICE_UNAVAILABLE, "store_unavailable"),
        VaaniError::Query(_) => (StatusCode::SERVICE_UNAVAILABLE, "store_query_failed"),
    };

    if err.is_store_error() {
        error!(error = %err, "Request failed in the graph store");
    } else {
        warn!(error = %err, "Rejected request");
    }

    (status, Json(ErrorBody { error: code, message: err.user_message() }))
}

pub fn not_found(message: impl Into<String>) -> ApiError {
    (StatusCode::NOT_FOUND, Json(ErrorBody { error: "not_found", message: message.into() }))
}
