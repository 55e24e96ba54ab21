//! Debtor Serve - HTTP API for debtor status lookups
//!
//! This crate provides a read-only REST API over the revolving-fund debtor
//! records stored in PostgreSQL. Every request is stateless: it borrows one
//! pooled connection, runs a single parameterized query, and returns the rows
//! as JSON.
//!
//! # Architecture
//!
//! - **AppState**: Shared application state (Postgres pool, configuration)
//! - **Routes**: Endpoint handlers
//! - **ApiError**: Failure to HTTP response mapping; internals are logged,
//!   never returned to callers

mod error;
mod routes;
mod state;

pub use self::error::ApiError;
pub use self::routes::router;
pub use self::state::{AppState, Config};
