//! Core types and query composition for debtor status lookups.
//!
//! This crate provides:
//! - Request filter model and mode selection (single vs. batch lookup)
//! - A structured predicate builder that keeps placeholder indexes and bound
//!   values in lockstep
//! - The SQL statements for both lookup modes and their typed result rows
//! - Lookup functions that run against a borrowed PostgreSQL connection
//! - Prometheus metrics helpers
//! - Shared error types

mod error;
pub mod filter;
pub mod lookup;
pub mod metrics;
pub mod predicate;
pub mod rows;
pub mod sql;

// ═══════════════════════════════════════════════════════════════════════════
// Constants
// ═══════════════════════════════════════════════════════════════════════════

/// Project statuses included in every single-mode lookup.
pub const ACTIVE_PROJECT_STATUSES: [&str; 3] = ["เปิดโครงการ", "ระหว่างดำเนินคดี", "ปิดโครงการ"];

/// Position code of the group representative who proposed the project.
pub const REPRESENTATIVE_POSITION: &str = "position_1";

/// Payment status excluded from the not-yet-due computation.
pub const CANCELED_PAYMENT_STATUS: &str = "Canceled";

/// Grace period (days) after a payment's end date during which it still
/// counts as not yet due.
pub const NOT_DUE_GRACE_DAYS: u32 = 5;

pub use error::{Error, Result};
pub use filter::{DebtorFilter, DebtorStatusQuery, Lookup};
pub use lookup::{fetch_debtor_status, fetch_promise_balances};
pub use predicate::{Predicate, PredicateBuilder};
pub use rows::{DebtorStatusRow, PromiseBalanceRow};
