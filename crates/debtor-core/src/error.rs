//! Error types for debtor status lookups.

use thiserror::Error;

/// Result type alias using the crate's error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while running a lookup.
#[derive(Error, Debug)]
pub enum Error {
    /// Query execution or row decoding failed.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}
