//! Prometheus metrics helpers for the debtor status service.
//!
//! # Usage
//!
//! ```rust,ignore
//! use debtor_core::metrics::{init_metrics, start_metrics_server};
//!
//! #[tokio::main]
//! async fn main() {
//!     let handle = init_metrics();
//!     start_metrics_server(9091, handle).await.unwrap();
//!
//!     metrics::counter!("debtor_lookup_requests_total", "mode" => "single").increment(1);
//! }
//! ```
//!
//! # Metric Naming Conventions
//!
//! - Prefix: component (`debtor_lookup_`, `db_pool_`)
//! - Suffix: unit or type (`_total`, `_seconds`)
//! - Labels: only `mode` (`single` / `batch`)

use std::net::SocketAddr;

use axum::{Router, routing::get};
use metrics::{describe_counter, describe_gauge, describe_histogram};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};

/// Initialize the Prometheus metrics recorder.
///
/// Must be called once at startup before any metrics are recorded.
///
/// # Panics
///
/// Panics if a recorder is already installed.
pub fn init_metrics() -> PrometheusHandle {
    let handle = PrometheusBuilder::new()
        .install_recorder()
        .expect("Failed to install Prometheus recorder");

    register_common_metrics();

    handle
}

/// Like [`init_metrics`] but returns `None` if a recorder is already
/// installed instead of panicking.
pub fn try_init_metrics() -> Option<PrometheusHandle> {
    let handle = PrometheusBuilder::new().install_recorder().ok()?;
    register_common_metrics();
    Some(handle)
}

/// Serve `/metrics` on `port` from a background task.
///
/// The listener is bound before returning, so a port conflict is reported to
/// the caller.
pub async fn start_metrics_server(
    port: u16,
    handle: PrometheusHandle,
) -> Result<(), std::io::Error> {
    let app = Router::new().route(
        "/metrics",
        get(move || {
            let handle = handle.clone();
            async move { handle.render() }
        }),
    );

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Metrics server listening on http://{}/metrics", addr);

    tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await {
            tracing::error!(error = %e, "metrics server stopped");
        }
    });

    Ok(())
}

/// Register descriptions for the service's metrics.
fn register_common_metrics() {
    // =========================================================================
    // Lookup Metrics
    // =========================================================================

    describe_counter!(
        "debtor_lookup_requests_total",
        "Lookup requests received (label: mode)"
    );
    describe_counter!(
        "debtor_lookup_errors_total",
        "Lookup queries that failed (label: mode)"
    );
    describe_counter!(
        "debtor_lookup_rows_total",
        "Rows returned by lookup queries (label: mode)"
    );
    describe_histogram!(
        "debtor_lookup_query_duration_seconds",
        "Time spent executing lookup queries (label: mode)"
    );

    // =========================================================================
    // Connection Pool Metrics
    // =========================================================================

    describe_gauge!("db_pool_connections", "Open connections in the pool");
    describe_gauge!(
        "db_pool_idle_connections",
        "Idle connections available in the pool"
    );
    describe_counter!(
        "db_pool_acquire_errors_total",
        "Failures to borrow a connection from the pool"
    );
}

/// Publish pool occupancy gauges.
pub fn record_pool(size: u32, idle: usize) {
    metrics::gauge!("db_pool_connections").set(f64::from(size));
    metrics::gauge!("db_pool_idle_connections").set(idle as f64);
}
