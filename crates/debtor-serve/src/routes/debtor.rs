//! Debtor status lookup endpoint.

use axum::Json;
use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::response::{IntoResponse, Response};
use debtor_core::{
    DebtorStatusQuery, Lookup, PromiseBalanceRow, fetch_debtor_status, fetch_promise_balances,
};

use crate::error::ApiError;
use crate::state::AppState;

/// `GET /debtor_status_info`
///
/// With `promises=A,B,C` returns unaggregated balances for those promise
/// numbers. Otherwise returns aggregated status rows filtered by any of
/// `idcard`, `promise` and `province`.
pub async fn debtor_status_info(
    State(state): State<AppState>,
    params: Result<Query<DebtorStatusQuery>, QueryRejection>,
) -> Result<Response, ApiError> {
    let Query(params) = params.map_err(|e| ApiError::InvalidQuery(e.body_text()))?;

    let lookup = params.into_lookup();
    let mode = lookup.mode();
    metrics::counter!("debtor_lookup_requests_total", "mode" => mode).increment(1);

    run_lookup(&state, &lookup).await
}

async fn run_lookup(state: &AppState, lookup: &Lookup) -> Result<Response, ApiError> {
    if matches!(lookup, Lookup::Batch(promises) if promises.is_empty()) {
        return Ok(Json(Vec::<PromiseBalanceRow>::new()).into_response());
    }

    let mut conn = state.acquire().await?;

    let response = match lookup {
        Lookup::Batch(promises) => {
            tracing::debug!(promises = promises.len(), "batch lookup");
            let rows = fetch_promise_balances(&mut *conn, promises).await?;
            Json(rows).into_response()
        }
        Lookup::Single(filter) => {
            tracing::debug!(
                idcard = filter.idcard.is_some(),
                promise = filter.promise.is_some(),
                province = filter.province.is_some(),
                "single lookup"
            );
            let rows = fetch_debtor_status(&mut *conn, filter).await?;
            Json(rows).into_response()
        }
    };

    Ok(response)
}
