//! Application state and configuration.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use sqlx::pool::PoolConnection;
use sqlx::postgres::{PgConnectOptions, PgPoolOptions, PgSslMode};
use sqlx::{PgPool, Postgres};

/// Pool size used when `DB_MAX_CONNECTIONS` is not set.
const DEFAULT_MAX_CONNECTIONS: u32 = 10;

/// Application configuration loaded from environment.
#[derive(Clone)]
pub struct Config {
    /// Server bind address (e.g., "0.0.0.0:8080").
    pub bind_addr: String,

    /// PostgreSQL connection string.
    pub database_url: String,

    /// Require TLS to the database without certificate verification.
    pub db_ssl: bool,

    /// Maximum number of pooled connections.
    pub db_max_connections: u32,

    /// Port for the Prometheus `/metrics` listener, if enabled.
    pub metrics_port: Option<u16>,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Required environment variables:
    /// - `DATABASE_URL`: PostgreSQL connection string (the older
    ///   `twdf_dashboard` name is accepted as a fallback)
    ///
    /// Optional environment variables:
    /// - `PORT`: Listen port (default: 8080)
    /// - `BIND_HOST`: Listen host (default: "0.0.0.0")
    /// - `DB_SSL`: "true" to require TLS (default: disabled)
    /// - `DB_MAX_CONNECTIONS`: Pool size (default: 10)
    /// - `METRICS_PORT`: Serve Prometheus metrics on this port
    pub fn from_env() -> anyhow::Result<Self> {
        let host = std::env::var("BIND_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());

        let port: u16 = match std::env::var("PORT") {
            Ok(port) => port
                .trim()
                .parse()
                .map_err(|e| anyhow::anyhow!("invalid PORT '{port}': {e}"))?,
            Err(_) => 8080,
        };

        let database_url = std::env::var("DATABASE_URL")
            .or_else(|_| std::env::var("twdf_dashboard"))
            .map_err(|_| anyhow::anyhow!("DATABASE_URL environment variable is required"))?;

        let db_ssl = std::env::var("DB_SSL").is_ok_and(|v| v.trim() == "true");

        let db_max_connections = match std::env::var("DB_MAX_CONNECTIONS") {
            Ok(n) => n
                .trim()
                .parse()
                .map_err(|e| anyhow::anyhow!("invalid DB_MAX_CONNECTIONS '{n}': {e}"))?,
            Err(_) => DEFAULT_MAX_CONNECTIONS,
        };
        if db_max_connections == 0 {
            anyhow::bail!("DB_MAX_CONNECTIONS must be at least 1");
        }

        let metrics_port = match std::env::var("METRICS_PORT") {
            Ok(p) => Some(
                p.trim()
                    .parse()
                    .map_err(|e| anyhow::anyhow!("invalid METRICS_PORT '{p}': {e}"))?,
            ),
            Err(_) => None,
        };

        let bind_addr = format!("{host}:{port}");

        tracing::info!(
            bind_addr = %bind_addr,
            db_ssl,
            db_max_connections,
            metrics_port = ?metrics_port,
            "configuration loaded"
        );

        Ok(Self {
            bind_addr,
            database_url,
            db_ssl,
            db_max_connections,
            metrics_port,
        })
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // The connection string carries credentials.
        f.debug_struct("Config")
            .field("bind_addr", &self.bind_addr)
            .field("database_url", &"<redacted>")
            .field("db_ssl", &self.db_ssl)
            .field("db_max_connections", &self.db_max_connections)
            .field("metrics_port", &self.metrics_port)
            .finish()
    }
}

/// Shared application state available to all request handlers.
#[derive(Clone)]
pub struct AppState {
    /// PostgreSQL connection pool.
    pub pool: PgPool,

    /// Application configuration.
    pub config: Arc<Config>,
}

impl AppState {
    /// Create a new application state from configuration.
    ///
    /// The pool connects lazily, so an unreachable database surfaces as a
    /// failed request rather than a failed startup.
    pub fn new(config: Config) -> anyhow::Result<Self> {
        let options = connect_options(&config)?;
        let pool = PgPoolOptions::new()
            .max_connections(config.db_max_connections)
            .connect_lazy_with(options);

        Ok(Self::with_pool(pool, config))
    }

    /// Create application state around an existing pool.
    pub fn with_pool(pool: PgPool, config: Config) -> Self {
        Self {
            pool,
            config: Arc::new(config),
        }
    }

    /// Borrow one connection for the duration of a request.
    ///
    /// The connection goes back to the pool when the returned guard drops,
    /// on every exit path.
    pub async fn acquire(&self) -> Result<PoolConnection<Postgres>, sqlx::Error> {
        let conn = self.pool.acquire().await.inspect_err(|_| {
            metrics::counter!("db_pool_acquire_errors_total").increment(1);
        })?;
        self.record_pool();
        Ok(conn)
    }

    /// Publish pool occupancy gauges.
    pub fn record_pool(&self) {
        debtor_core::metrics::record_pool(self.pool.size(), self.pool.num_idle());
    }
}

/// Connection options for `config`.
///
/// `DB_SSL=true` requires encryption without certificate verification.
/// Otherwise TLS is disabled unless the connection string names an
/// `sslmode` itself.
fn connect_options(config: &Config) -> anyhow::Result<PgConnectOptions> {
    let options = PgConnectOptions::from_str(&config.database_url)?;
    let options = if config.db_ssl {
        options.ssl_mode(PgSslMode::Require)
    } else if url_sets_sslmode(&config.database_url) {
        options
    } else {
        options.ssl_mode(PgSslMode::Disable)
    };
    Ok(options)
}

fn url_sets_sslmode(url: &str) -> bool {
    url.split_once('?').is_some_and(|(_, query)| {
        query
            .split('&')
            .filter_map(|pair| pair.split('=').next())
            .any(|key| key == "sslmode" || key == "ssl-mode")
    })
}
