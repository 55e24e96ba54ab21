//! API route definitions.

mod debtor;
mod health;

use axum::Router;
use axum::routing::get;

use crate::state::AppState;

/// Build the complete API router.
///
/// # Route Structure
///
/// - `GET /` - Static liveness string
/// - `GET /health` - Health check (JSON)
/// - `GET /check_db` - Database connectivity check
/// - `GET /debtor_status_info` - Debtor status lookup (single or batch mode)
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(health::root))
        .route("/health", get(health::health_check))
        .route("/check_db", get(health::check_db))
        .route("/debtor_status_info", get(debtor::debtor_status_info))
        .with_state(state)
}
