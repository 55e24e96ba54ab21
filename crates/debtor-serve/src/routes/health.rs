//! Health check endpoints.

use axum::Json;
use axum::extract::State;
use serde::Serialize;

use crate::error::ApiError;
use crate::state::AppState;

/// Plain-text confirmation served at `/`.
const ROOT_MESSAGE: &str = "API is running. Use /debtor_status_info for queries.";

/// `GET /`
pub async fn root() -> &'static str {
    ROOT_MESSAGE
}

/// Health check response.
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    status: &'static str,
    service: &'static str,
    version: &'static str,
}

/// Public health check endpoint.
///
/// Does not touch the database; use this for load balancer probes.
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        service: "debtor-serve",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Database connectivity response.
#[derive(Debug, Clone, Serialize)]
pub struct CheckDbResponse {
    message: &'static str,
    database_name: String,
}

/// `GET /check_db`
///
/// Borrows a connection and asks the server which database it is serving.
pub async fn check_db(State(state): State<AppState>) -> Result<Json<CheckDbResponse>, ApiError> {
    let mut conn = state.acquire().await.map_err(ApiError::Unavailable)?;

    let database_name: String = sqlx::query_scalar("SELECT current_database()::text")
        .fetch_one(&mut *conn)
        .await
        .map_err(ApiError::Unavailable)?;

    Ok(Json(CheckDbResponse {
        message: "Connected to database successfully!",
        database_name,
    }))
}
