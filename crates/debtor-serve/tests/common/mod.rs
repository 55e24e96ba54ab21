//! Shared helpers for integration tests.
//!
//! Tests that need PostgreSQL read `TEST_DATABASE_URL` and are skipped when
//! it is unset. Each test gets its own schema, selected through the pool's
//! `search_path`, so tests run in parallel without sharing fixtures.

#![allow(dead_code)]

use std::str::FromStr;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::{Duration, Instant};

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use serde_json::Value;
use sqlx::PgPool;
use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use tower::ServiceExt;

use debtor_serve::{AppState, Config, router};

const SCHEMA_SQL: &str = include_str!("../fixtures/schema.sql");
const SEED_SQL: &str = include_str!("../fixtures/seed.sql");

static SCHEMA_COUNTER: AtomicU32 = AtomicU32::new(0);

/// Config for states built around a test pool. Only `database_url` is
/// informational here; the pool is constructed directly.
pub fn test_config(database_url: &str, max_connections: u32) -> Config {
    Config {
        bind_addr: "127.0.0.1:0".to_string(),
        database_url: database_url.to_string(),
        db_ssl: false,
        db_max_connections: max_connections,
        metrics_port: None,
    }
}

/// An isolated, seeded schema plus a router whose pool is confined to it.
pub struct TestDb {
    pub pool: PgPool,
    pub app: Router,
    admin: PgPool,
    schema: String,
}

impl TestDb {
    /// Create and seed a fresh schema, or `None` when no database is
    /// configured.
    pub async fn setup(max_connections: u32) -> Option<Self> {
        let Ok(url) = std::env::var("TEST_DATABASE_URL") else {
            eprintln!("TEST_DATABASE_URL not set; skipping database test");
            return None;
        };

        let schema = format!(
            "debtor_test_{}_{}",
            std::process::id(),
            SCHEMA_COUNTER.fetch_add(1, Ordering::SeqCst)
        );

        let admin = PgPoolOptions::new()
            .max_connections(1)
            .connect(&url)
            .await
            .expect("connect to TEST_DATABASE_URL");
        sqlx::raw_sql(&format!("DROP SCHEMA IF EXISTS {schema} CASCADE; CREATE SCHEMA {schema}"))
            .execute(&admin)
            .await
            .expect("create test schema");

        let options = PgConnectOptions::from_str(&url)
            .expect("parse TEST_DATABASE_URL")
            .options([("search_path", schema.as_str())]);
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .acquire_timeout(Duration::from_secs(5))
            .connect_with(options)
            .await
            .expect("connect test pool");

        sqlx::raw_sql(SCHEMA_SQL)
            .execute(&pool)
            .await
            .expect("create fixture tables");
        sqlx::raw_sql(SEED_SQL)
            .execute(&pool)
            .await
            .expect("seed fixture rows");

        let app = router(AppState::with_pool(
            pool.clone(),
            test_config(&url, max_connections),
        ));

        Some(Self {
            pool,
            app,
            admin,
            schema,
        })
    }

    /// Run extra SQL against the test schema.
    pub async fn execute(&self, sql: &str) {
        sqlx::raw_sql(sql)
            .execute(&self.pool)
            .await
            .expect("execute fixture sql");
    }

    /// Name of the schema this test owns.
    pub fn schema(&self) -> &str {
        &self.schema
    }

    /// Connections currently lent out by the pool.
    pub fn borrowed(&self) -> usize {
        (self.pool.size() as usize).saturating_sub(self.pool.num_idle())
    }

    /// Wait for every borrowed connection to come back. Returning a
    /// connection happens on a spawned task after its guard drops.
    pub async fn wait_until_all_returned(&self) -> usize {
        let deadline = Instant::now() + Duration::from_secs(5);
        while self.borrowed() > 0 && Instant::now() < deadline {
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
        self.borrowed()
    }

    pub async fn teardown(self) {
        self.pool.close().await;
        sqlx::raw_sql(&format!("DROP SCHEMA IF EXISTS {} CASCADE", self.schema))
            .execute(&self.admin)
            .await
            .expect("drop test schema");
        self.admin.close().await;
    }
}

/// Send a GET request through the router and return status and raw body.
pub async fn get_raw(app: &Router, uri: &str) -> (StatusCode, String) {
    let response = app
        .clone()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();

    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, String::from_utf8(bytes.to_vec()).unwrap())
}

/// Send a GET request and parse the body as JSON.
pub async fn get_json(app: &Router, uri: &str) -> (StatusCode, Value) {
    let (status, body) = get_raw(app, uri).await;
    let json = serde_json::from_str(&body)
        .unwrap_or_else(|e| panic!("response to {uri} is not JSON ({e}): {body}"));
    (status, json)
}

/// Read a numeric amount serialized as a decimal string.
pub fn amount(value: &Value) -> f64 {
    match value {
        Value::String(s) => s.parse().unwrap_or_else(|_| panic!("not a decimal: {s}")),
        Value::Number(n) => n.as_f64().unwrap(),
        other => panic!("not an amount: {other}"),
    }
}

/// Percent-encode a query value (the Thai labels and spaces in fixtures).
pub fn encode(value: &str) -> String {
    value
        .bytes()
        .map(|b| match b {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                (b as char).to_string()
            }
            _ => format!("%{b:02X}"),
        })
        .collect()
}
