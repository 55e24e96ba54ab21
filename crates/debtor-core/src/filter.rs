//! Request filter model and lookup mode selection.

use serde::Deserialize;

use crate::ACTIVE_PROJECT_STATUSES;
use crate::predicate::{Predicate, PredicateBuilder, quote_literal};

/// Raw query parameters for `GET /debtor_status_info`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DebtorStatusQuery {
    /// Comma-separated promise numbers; switches to batch mode.
    pub promises: Option<String>,
    /// Borrower national id card number (exact, trimmed).
    pub idcard: Option<String>,
    /// Promise (contract) number (exact, trimmed).
    pub promise: Option<String>,
    /// Province name (case-insensitive substring).
    pub province: Option<String>,
}

/// Which lookup a request resolves to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Lookup {
    /// Unaggregated balances for a list of promise numbers.
    Batch(Vec<String>),
    /// Aggregated debtor status rows matching the filter.
    Single(DebtorFilter),
}

impl Lookup {
    /// Short label used in logs and metric labels.
    pub fn mode(&self) -> &'static str {
        match self {
            Self::Batch(_) => "batch",
            Self::Single(_) => "single",
        }
    }
}

/// Normalized single-mode filter. Every field is trimmed and non-blank.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DebtorFilter {
    pub idcard: Option<String>,
    pub promise: Option<String>,
    pub province: Option<String>,
}

impl DebtorStatusQuery {
    /// Resolve the request into a lookup.
    ///
    /// A non-blank `promises` parameter selects batch mode and the single-mode
    /// parameters are ignored. Blank parameters count as absent.
    pub fn into_lookup(self) -> Lookup {
        if let Some(promises) = non_blank(self.promises.as_deref()) {
            return Lookup::Batch(split_promises(promises));
        }

        Lookup::Single(DebtorFilter {
            idcard: non_blank(self.idcard.as_deref()).map(str::to_string),
            promise: non_blank(self.promise.as_deref()).map(str::to_string),
            province: non_blank(self.province.as_deref()).map(str::to_string),
        })
    }
}

impl DebtorFilter {
    /// Build the single-mode predicate: the project status set, then one
    /// condition per present field in the order idcard, promise, province.
    pub fn predicate(&self) -> Predicate {
        let statuses = ACTIVE_PROJECT_STATUSES
            .iter()
            .map(|s| quote_literal(s))
            .collect::<Vec<_>>()
            .join(",");

        PredicateBuilder::new()
            .fixed(format!("ds.ds_status_project IN ({statuses})"))
            .equals("TRIM(w.wfri_id_card)", self.idcard.as_deref())
            .equals("TRIM(ds.ds_number_promise)", self.promise.as_deref())
            .contains_ignore_case("TRIM(p.dpd_province)", self.province.as_deref())
            .build()
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Split a comma-separated promise list, trimming entries and dropping blanks.
pub fn split_promises(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const STATUS_SQL: &str =
        "ds.ds_status_project IN ('เปิดโครงการ','ระหว่างดำเนินคดี','ปิดโครงการ')";

    fn query(
        promises: Option<&str>,
        idcard: Option<&str>,
        promise: Option<&str>,
        province: Option<&str>,
    ) -> DebtorStatusQuery {
        DebtorStatusQuery {
            promises: promises.map(str::to_string),
            idcard: idcard.map(str::to_string),
            promise: promise.map(str::to_string),
            province: province.map(str::to_string),
        }
    }

    fn single(q: DebtorStatusQuery) -> DebtorFilter {
        match q.into_lookup() {
            Lookup::Single(filter) => filter,
            other => panic!("expected single lookup, got {other:?}"),
        }
    }

    #[test]
    fn no_params_is_single_mode_with_status_filter_only() {
        let filter = single(DebtorStatusQuery::default());
        let predicate = filter.predicate();
        assert_eq!(predicate.sql(), STATUS_SQL);
        assert!(predicate.values().is_empty());
    }

    #[test]
    fn promises_selects_batch_mode() {
        let lookup = query(Some("A,B,C"), Some("123"), None, None).into_lookup();
        assert_eq!(
            lookup,
            Lookup::Batch(vec!["A".into(), "B".into(), "C".into()])
        );
        assert_eq!(lookup.mode(), "batch");
    }

    #[test]
    fn promises_entries_are_trimmed_and_blanks_dropped() {
        assert_eq!(split_promises(" A , ,B,, C "), vec!["A", "B", "C"]);
        assert!(split_promises(",,").is_empty());
    }

    #[test]
    fn blank_promises_falls_back_to_single_mode() {
        let lookup = query(Some("   "), None, Some("P-1"), None).into_lookup();
        assert_eq!(lookup.mode(), "single");
    }

    #[test]
    fn blank_single_params_are_absent() {
        let filter = single(query(None, Some(""), Some("  "), Some("\t")));
        assert_eq!(filter, DebtorFilter::default());
        assert!(filter.predicate().values().is_empty());
    }

    #[test]
    fn values_are_trimmed() {
        let filter = single(query(None, Some(" 3100 "), Some(" P-001\n"), Some(" bangkok ")));
        assert_eq!(filter.predicate().values(), ["3100", "P-001", "%bangkok%"]);
    }

    #[test]
    fn one_condition_per_present_param_in_every_combination() {
        let columns = [
            ("TRIM(w.wfri_id_card) = ", "id-1"),
            ("TRIM(ds.ds_number_promise) = ", "P-1"),
            ("TRIM(p.dpd_province) ILIKE ", "north"),
        ];

        for mask in 0u8..8 {
            let present = |i: usize| mask & (1 << i) != 0;
            let filter = DebtorFilter {
                idcard: present(0).then(|| columns[0].1.to_string()),
                promise: present(1).then(|| columns[1].1.to_string()),
                province: present(2).then(|| columns[2].1.to_string()),
            };
            let predicate = filter.predicate();

            let mut expected_sql = vec![STATUS_SQL.to_string()];
            let mut expected_values = Vec::new();
            for (i, (prefix, value)) in columns.iter().enumerate() {
                if present(i) {
                    expected_values.push(if i == 2 {
                        format!("%{value}%")
                    } else {
                        value.to_string()
                    });
                    expected_sql.push(format!("{prefix}${}", expected_values.len()));
                }
            }

            assert_eq!(predicate.sql(), expected_sql.join(" AND "), "mask {mask:03b}");
            assert_eq!(predicate.values(), expected_values.as_slice(), "mask {mask:03b}");
        }
    }
}
