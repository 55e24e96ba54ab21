//! Structured `WHERE` clause assembly with positional parameters.
//!
//! Conditions are appended as (template, bound value) pairs and rendered in a
//! single pass, so the `$n` placeholder written into the SQL text and the
//! position of the value in the bind list always come from the same counter.
//!
//! ```
//! use debtor_core::PredicateBuilder;
//!
//! let predicate = PredicateBuilder::new()
//!     .fixed("ds.ds_status_project IS NOT NULL")
//!     .equals("TRIM(ds.ds_number_promise)", Some("P-001"))
//!     .contains_ignore_case("TRIM(p.dpd_province)", None)
//!     .build();
//!
//! assert_eq!(
//!     predicate.sql(),
//!     "ds.ds_status_project IS NOT NULL AND TRIM(ds.ds_number_promise) = $1"
//! );
//! assert_eq!(predicate.values(), ["P-001"]);
//! ```

/// How a bound condition compares its column expression to the value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchOp {
    /// `expr = $n`
    Equals,
    /// `expr ILIKE $n`, with the value wrapped as `%value%`.
    ContainsIgnoreCase,
}

#[derive(Debug, Clone)]
enum Condition {
    /// Literal SQL with no parameters.
    Fixed(String),
    /// Column expression compared against one positional parameter.
    Bound {
        expr: &'static str,
        op: MatchOp,
        value: String,
    },
}

/// Builder for a conjunction of fixed and parameter-bound conditions.
#[derive(Debug, Clone, Default)]
pub struct PredicateBuilder {
    conditions: Vec<Condition>,
}

impl PredicateBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a literal condition. Never pass request data here.
    pub fn fixed(mut self, sql: impl Into<String>) -> Self {
        self.conditions.push(Condition::Fixed(sql.into()));
        self
    }

    /// Append `expr = $n` when `value` is present.
    pub fn equals(self, expr: &'static str, value: Option<&str>) -> Self {
        self.bound(expr, MatchOp::Equals, value)
    }

    /// Append `expr ILIKE $n` (substring match) when `value` is present.
    pub fn contains_ignore_case(self, expr: &'static str, value: Option<&str>) -> Self {
        self.bound(expr, MatchOp::ContainsIgnoreCase, value)
    }

    fn bound(mut self, expr: &'static str, op: MatchOp, value: Option<&str>) -> Self {
        if let Some(value) = value {
            self.conditions.push(Condition::Bound {
                expr,
                op,
                value: value.to_string(),
            });
        }
        self
    }

    /// Render the conjunction and its bind list.
    pub fn build(self) -> Predicate {
        let mut parts = Vec::with_capacity(self.conditions.len());
        let mut values = Vec::new();

        for condition in self.conditions {
            match condition {
                Condition::Fixed(sql) => parts.push(sql),
                Condition::Bound { expr, op, value } => {
                    values.push(match op {
                        MatchOp::Equals => value,
                        MatchOp::ContainsIgnoreCase => format!("%{value}%"),
                    });
                    let idx = values.len();
                    parts.push(match op {
                        MatchOp::Equals => format!("{expr} = ${idx}"),
                        MatchOp::ContainsIgnoreCase => format!("{expr} ILIKE ${idx}"),
                    });
                }
            }
        }

        Predicate {
            sql: parts.join(" AND "),
            values,
        }
    }
}

/// A rendered conjunction: SQL text plus values for `$1..$n` in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Predicate {
    sql: String,
    values: Vec<String>,
}

impl Predicate {
    /// Conjunction text, without the `WHERE` keyword.
    pub fn sql(&self) -> &str {
        &self.sql
    }

    /// Bound values; index `i` binds placeholder `$(i + 1)`.
    pub fn values(&self) -> &[String] {
        &self.values
    }

    pub fn into_values(self) -> Vec<String> {
        self.values
    }

    pub fn is_empty(&self) -> bool {
        self.sql.is_empty()
    }

    /// `WHERE <conjunction>`, or an empty string when there are no conditions.
    pub fn where_clause(&self) -> String {
        if self.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", self.sql)
        }
    }
}

/// Quote a string as a SQL literal, doubling embedded single quotes.
pub(crate) fn quote_literal(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}
