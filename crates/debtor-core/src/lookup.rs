//! Lookup execution against a borrowed PostgreSQL connection.
//!
//! Callers own the connection; these functions never acquire or release
//! pool capacity themselves.

use std::time::Instant;

use sqlx::PgConnection;

use crate::error::Result;
use crate::filter::DebtorFilter;
use crate::rows::{DebtorStatusRow, PromiseBalanceRow};
use crate::sql;

/// Aggregated debtor status rows matching `filter`.
pub async fn fetch_debtor_status(
    conn: &mut PgConnection,
    filter: &DebtorFilter,
) -> Result<Vec<DebtorStatusRow>> {
    let predicate = filter.predicate();
    let statement = sql::single_query(&predicate);

    let mut query = sqlx::query_as::<_, DebtorStatusRow>(&statement);
    for value in predicate.values() {
        query = query.bind(value);
    }

    let started = Instant::now();
    let rows = query.fetch_all(&mut *conn).await;
    record_query("single", started, rows.as_ref().map(Vec::len).ok());

    Ok(rows?)
}

/// Unaggregated balances for every record whose promise number is in
/// `promises`.
pub async fn fetch_promise_balances(
    conn: &mut PgConnection,
    promises: &[String],
) -> Result<Vec<PromiseBalanceRow>> {
    if promises.is_empty() {
        return Ok(Vec::new());
    }

    let statement = sql::batch_query();

    let started = Instant::now();
    let rows = sqlx::query_as::<_, PromiseBalanceRow>(&statement)
        .bind(promises)
        .fetch_all(&mut *conn)
        .await;
    record_query("batch", started, rows.as_ref().map(Vec::len).ok());

    Ok(rows?)
}

fn record_query(mode: &'static str, started: Instant, rows: Option<usize>) {
    let elapsed = started.elapsed();
    metrics::histogram!("debtor_lookup_query_duration_seconds", "mode" => mode)
        .record(elapsed.as_secs_f64());

    match rows {
        Some(count) => {
            metrics::counter!("debtor_lookup_rows_total", "mode" => mode).increment(count as u64);
            tracing::debug!(
                mode,
                rows = count,
                elapsed_ms = elapsed.as_millis() as u64,
                "lookup complete"
            );
        }
        None => {
            metrics::counter!("debtor_lookup_errors_total", "mode" => mode).increment(1);
        }
    }
}
