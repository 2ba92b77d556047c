use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

/// Every failure a route handler can produce. Each variant maps to one
/// HTTP response; nothing propagates past the router and nothing is
/// fatal to the process.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Missing or unknown session.
    #[error("Unauthorized")]
    Unauthorized,

    /// Login failure. Unknown username and wrong password produce this
    /// same variant so callers cannot probe for registered usernames.
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// Signup with a username that already has a row.
    #[error("Username already exists")]
    UsernameTaken,

    /// Malformed or missing body fields.
    #[error("{0}")]
    BadRequest(String),

    /// A write to the backing sheet failed. `message` is the public
    /// body; `source` stays in the logs.
    #[error("{message}")]
    StoreUnavailable {
        message: &'static str,
        #[source]
        source: anyhow::Error,
    },
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if let ApiError::StoreUnavailable { message, source } = &self {
            error!(error = %source, "{message}");
        }
        let status = match self {
            ApiError::Unauthorized | ApiError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            ApiError::UsernameTaken | ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::StoreUnavailable { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

/// Fallback for unmatched paths and methods.
pub async fn not_found() -> Response {
    (StatusCode::NOT_FOUND, Json(json!({ "error": "Not found" }))).into_response()
}
