//! API error types and response formatting.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

/// API error type that converts to appropriate HTTP responses.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The query string could not be deserialized.
    #[error("invalid query string: {0}")]
    InvalidQuery(String),

    /// Lookup query failed.
    #[error("lookup error: {0}")]
    Lookup(#[from] debtor_core::Error),

    /// Borrowing a connection from the pool failed.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// The database connectivity check failed.
    #[error("database unavailable: {0}")]
    Unavailable(#[source] sqlx::Error),
}

/// JSON error response body.
#[derive(Debug, Clone, Serialize)]
struct ErrorResponse {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<String>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error, message) = match &self {
            Self::InvalidQuery(msg) => {
                tracing::warn!(error = %msg, "rejected query string");
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error", None)
            }
            Self::Lookup(err) => {
                tracing::error!(error = %err, "query error");
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error", None)
            }
            Self::Database(err) => {
                tracing::error!(error = %err, "database error");
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error", None)
            }
            Self::Unavailable(err) => {
                tracing::error!(error = %err, "database check failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Failed to connect to database.",
                    None,
                )
            }
        };

        let body = ErrorResponse {
            error: error.to_string(),
            message,
        };

        (status, Json(body)).into_response()
    }
}
