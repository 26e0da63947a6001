//! Inclusive date range filtering over normalized rows.

use std::borrow::Cow;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::dates::parse_date;
use crate::models::NormalizedRow;

// ── DateRange ─────────────────────────────────────────────────────────────────

/// The two user-supplied boundary strings.
///
/// An empty boundary means "no bound" on that side. A boundary that is not
/// empty but does not parse as a date is ignored as well.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub from: String,
    pub to: String,
}

impl DateRange {
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
        }
    }

    /// Clear both boundaries.
    pub fn reset(&mut self) {
        self.from.clear();
        self.to.clear();
    }

    /// `true` when both boundary strings are empty.
    pub fn is_empty(&self) -> bool {
        self.from.is_empty() && self.to.is_empty()
    }

    /// `true` when at least one boundary parses and therefore constrains rows.
    pub fn is_active(&self) -> bool {
        self.lower().is_some() || self.upper().is_some()
    }

    fn lower(&self) -> Option<NaiveDateTime> {
        bound(&self.from)
    }

    fn upper(&self) -> Option<NaiveDateTime> {
        bound(&self.to)
    }

    /// Whether a single row date lies inside the range.
    ///
    /// With no active bound every date passes, parsable or not. With an
    /// active bound, dates that do not parse are rejected.
    pub fn contains(&self, date: &str) -> bool {
        let (lower, upper) = (self.lower(), self.upper());
        if lower.is_none() && upper.is_none() {
            return true;
        }
        within(date, lower, upper)
    }

    /// Rows whose date lies inside the range, in their original order.
    ///
    /// Returns the input slice itself when both boundaries are empty.
    pub fn apply<'a>(&self, rows: &'a [NormalizedRow]) -> Cow<'a, [NormalizedRow]> {
        if self.is_empty() {
            return Cow::Borrowed(rows);
        }

        let (lower, upper) = (self.lower(), self.upper());
        if lower.is_none() && upper.is_none() {
            debug!(from = %self.from, to = %self.to, "no boundary parses; range ignored");
            return Cow::Borrowed(rows);
        }

        let kept: Vec<NormalizedRow> = rows
            .iter()
            .filter(|row| within(&row.date, lower, upper))
            .cloned()
            .collect();

        debug!(
            from = %self.from,
            to = %self.to,
            kept = kept.len(),
            total = rows.len(),
            "applied date range"
        );
        Cow::Owned(kept)
    }
}

fn bound(text: &str) -> Option<NaiveDateTime> {
    if text.is_empty() {
        None
    } else {
        parse_date(text)
    }
}

fn within(date: &str, lower: Option<NaiveDateTime>, upper: Option<NaiveDateTime>) -> bool {
    match parse_date(date) {
        Some(d) => lower.map_or(true, |f| d >= f) && upper.map_or(true, |t| d <= t),
        None => false,
    }
}

/// Convenience wrapper over [`DateRange::apply`] for the two raw boundaries.
pub fn filter_by_date<'a>(
    rows: &'a [NormalizedRow],
    from: &str,
    to: &str,
) -> Cow<'a, [NormalizedRow]> {
    DateRange::new(from, to).apply(rows)
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn row(date: &str, amount: f64) -> NormalizedRow {
        NormalizedRow::new(date, amount, "A", 1.0)
    }

    fn dates(rows: &[NormalizedRow]) -> Vec<&str> {
        rows.iter().map(|r| r.date.as_str()).collect()
    }

    fn june_fixture() -> Vec<NormalizedRow> {
        vec![
            row("2024-05-31", 1.0),
            row("2024-06-01", 2.0),
            row("2024-06-15", 3.0),
            row("2024-07-01", 4.0),
        ]
    }

    #[test]
    fn test_empty_range_is_identity() {
        let rows = june_fixture();
        let out = filter_by_date(&rows, "", "");
        assert!(matches!(out, Cow::Borrowed(_)));
        assert_eq!(out.as_ref(), rows.as_slice());
    }

    #[test]
    fn test_june_range_is_inclusive() {
        let rows = june_fixture();
        let out = filter_by_date(&rows, "2024-06-01", "2024-06-30");
        assert_eq!(dates(&out), vec!["2024-06-01", "2024-06-15"]);
    }

    #[test]
    fn test_upper_bound_equality_included() {
        let rows = june_fixture();
        let out = filter_by_date(&rows, "", "2024-06-15");
        assert_eq!(dates(&out), vec!["2024-05-31", "2024-06-01", "2024-06-15"]);
    }

    #[test]
    fn test_lower_bound_only() {
        let rows = june_fixture();
        let out = filter_by_date(&rows, "2024-06-15", "");
        assert_eq!(dates(&out), vec!["2024-06-15", "2024-07-01"]);
    }

    #[test]
    fn test_preserves_relative_order() {
        let rows = vec![
            row("2024-06-20", 1.0),
            row("2024-06-02", 2.0),
            row("2024-06-10", 3.0),
        ];
        let out = filter_by_date(&rows, "2024-06-01", "2024-06-30");
        assert_eq!(dates(&out), vec!["2024-06-20", "2024-06-02", "2024-06-10"]);
    }

    #[test]
    fn test_unparsable_row_dates_excluded_under_active_bound() {
        let rows = vec![row("garbage", 1.0), row("2024-06-10", 2.0), row("", 3.0)];
        let out = filter_by_date(&rows, "2024-06-01", "");
        assert_eq!(dates(&out), vec!["2024-06-10"]);
    }

    #[test]
    fn test_unparsable_row_dates_kept_without_bound() {
        let rows = vec![row("garbage", 1.0), row("2024-06-10", 2.0)];
        let out = filter_by_date(&rows, "", "");
        assert_eq!(out.len(), 2);
    }

    #[test]
    fn test_unparsable_boundary_is_ignored() {
        let rows = vec![row("garbage", 1.0), row("2024-06-10", 2.0)];
        let out = filter_by_date(&rows, "not-a-date", "");
        assert_eq!(out.len(), 2);

        let out = filter_by_date(&rows, "not-a-date", "2024-06-30");
        assert_eq!(dates(&out), vec!["2024-06-10"]);
    }

    #[test]
    fn test_contains_matches_apply() {
        let range = DateRange::new("2024-06-01", "2024-06-30");
        for r in june_fixture() {
            let in_apply = range.apply(std::slice::from_ref(&r)).len() == 1;
            assert_eq!(range.contains(&r.date), in_apply, "date {}", r.date);
        }
    }

    #[test]
    fn test_reset_and_activity() {
        let mut range = DateRange::new("2024-06-01", "oops");
        assert!(!range.is_empty());
        assert!(range.is_active());
        range.reset();
        assert!(range.is_empty());
        assert!(!range.is_active());

        let partial = DateRange::new("20", "");
        assert!(!partial.is_empty());
        assert!(!partial.is_active());
    }

    #[test]
    fn test_filter_is_repeatable() {
        let rows = june_fixture();
        let range = DateRange::new("2024-06-01", "2024-06-30");
        assert_eq!(range.apply(&rows), range.apply(&rows));
    }
}
