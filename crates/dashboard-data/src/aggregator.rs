//! Grouped sums over normalized rows.
//!
//! Both aggregators share one grouping pass that keeps first-insertion order;
//! they differ only in the key they group on and the order they emit.

use std::collections::HashMap;

use dashboard_core::dates::compare_date_keys;
use dashboard_core::models::{AggregateSeries, Measure, NormalizedRow};

// ── SeriesAggregator ──────────────────────────────────────────────────────────

/// Stateless helper that turns rows into chart-ready series.
pub struct SeriesAggregator;

impl SeriesAggregator {
    /// Sum `measure` per exact date string, ordered chronologically.
    ///
    /// Keys are compared by parsed date; keys that parse to the same instant
    /// keep insertion order, and keys that do not parse come last.
    pub fn sum_by_date(rows: &[NormalizedRow], measure: Measure) -> AggregateSeries {
        let mut groups = Self::group_sum(rows, |row| row.date.as_str(), measure);
        // `sort_by` is stable, which the tie-break relies on.
        groups.sort_by(|(a, _), (b, _)| compare_date_keys(a, b));
        AggregateSeries::from_pairs(groups)
    }

    /// Sum `measure` per category, largest total first.
    ///
    /// Equal totals keep the order in which their categories first appeared.
    pub fn sum_by_category(rows: &[NormalizedRow], measure: Measure) -> AggregateSeries {
        let mut groups = Self::group_sum(rows, |row| row.category.as_str(), measure);
        groups.sort_by(|(_, a), (_, b)| b.total_cmp(a));
        AggregateSeries::from_pairs(groups)
    }

    // ── Private ───────────────────────────────────────────────────────────────

    /// Generic grouping driver.
    ///
    /// Returns `(key, sum)` pairs in the order each key was first seen.
    fn group_sum<'a>(
        rows: &'a [NormalizedRow],
        key_fn: impl Fn(&'a NormalizedRow) -> &'a str,
        measure: Measure,
    ) -> Vec<(String, f64)> {
        let mut index: HashMap<&'a str, usize> = HashMap::new();
        let mut groups: Vec<(String, f64)> = Vec::new();

        for row in rows {
            let key = key_fn(row);
            let slot = *index.entry(key).or_insert_with(|| {
                groups.push((key.to_string(), 0.0));
                groups.len() - 1
            });
            groups[slot].1 += row.measure(measure);
        }

        groups
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn dated(date: &str, amount: f64) -> NormalizedRow {
        NormalizedRow::new(date, amount, "A", 1.0)
    }

    fn categorized(category: &str, amount: f64) -> NormalizedRow {
        NormalizedRow::new("2024-01-01", amount, category, 1.0)
    }

    // ── sum_by_date ───────────────────────────────────────────────────────────

    #[test]
    fn test_by_date_sums_and_sorts() {
        let rows = vec![
            dated("2024-01-02", 10.0),
            dated("2024-01-01", 5.0),
            dated("2024-01-02", 3.0),
        ];
        let series = SeriesAggregator::sum_by_date(&rows, Measure::Amount);
        assert_eq!(series.labels, vec!["2024-01-01", "2024-01-02"]);
        assert_eq!(series.values, vec![5.0, 13.0]);
    }

    #[test]
    fn test_by_date_sorts_chronologically_not_lexically() {
        let rows = vec![
            dated("2024-10-01", 1.0),
            dated("2024/9/30", 2.0),
            dated("2024-02-01", 3.0),
        ];
        let series = SeriesAggregator::sum_by_date(&rows, Measure::Amount);
        assert_eq!(series.labels, vec!["2024-02-01", "2024/9/30", "2024-10-01"]);
    }

    #[test]
    fn test_by_date_groups_exact_strings() {
        let rows = vec![dated("2024-01-01", 1.0), dated(" 2024-01-01", 2.0)];
        let series = SeriesAggregator::sum_by_date(&rows, Measure::Amount);
        assert_eq!(series.len(), 2);
        assert_eq!(series.labels, vec!["2024-01-01", " 2024-01-01"]);
        assert_eq!(series.values, vec![1.0, 2.0]);
    }

    #[test]
    fn test_by_date_same_instant_keeps_insertion_order() {
        let rows = vec![
            dated("2024-01-01T00:00:00Z", 1.0),
            dated("2024-01-01", 2.0),
        ];
        let series = SeriesAggregator::sum_by_date(&rows, Measure::Amount);
        assert_eq!(series.labels, vec!["2024-01-01T00:00:00Z", "2024-01-01"]);
    }

    #[test]
    fn test_by_date_unparsable_keys_sort_last_in_insertion_order() {
        let rows = vec![
            dated("zzz", 1.0),
            dated("2024-03-01", 2.0),
            dated("", 3.0),
            dated("2024-01-01", 4.0),
        ];
        let series = SeriesAggregator::sum_by_date(&rows, Measure::Amount);
        assert_eq!(series.labels, vec!["2024-01-01", "2024-03-01", "zzz", ""]);
        assert_eq!(series.values, vec![4.0, 2.0, 1.0, 3.0]);
    }

    #[test]
    fn test_by_date_units_measure() {
        let rows = vec![
            NormalizedRow::new("2024-01-01", 100.0, "A", 2.0),
            NormalizedRow::new("2024-01-01", 50.0, "B", 5.0),
        ];
        let series = SeriesAggregator::sum_by_date(&rows, Measure::Units);
        assert_eq!(series.values, vec![7.0]);
    }

    #[test]
    fn test_by_date_empty() {
        assert!(SeriesAggregator::sum_by_date(&[], Measure::Amount).is_empty());
    }

    // ── sum_by_category ───────────────────────────────────────────────────────

    #[test]
    fn test_by_category_ranked_descending() {
        let rows = vec![
            categorized("A", 10.0),
            categorized("B", 30.0),
            categorized("A", 5.0),
        ];
        let series = SeriesAggregator::sum_by_category(&rows, Measure::Amount);
        assert_eq!(series.labels, vec!["B", "A"]);
        assert_eq!(series.values, vec![30.0, 15.0]);
    }

    #[test]
    fn test_by_category_ties_keep_first_occurrence_order() {
        let rows = vec![
            categorized("C", 10.0),
            categorized("A", 10.0),
            categorized("B", 20.0),
            categorized("D", 10.0),
        ];
        let series = SeriesAggregator::sum_by_category(&rows, Measure::Amount);
        assert_eq!(series.labels, vec!["B", "C", "A", "D"]);
    }

    #[test]
    fn test_by_category_empty() {
        assert!(SeriesAggregator::sum_by_category(&[], Measure::Amount).is_empty());
    }

    // ── purity ────────────────────────────────────────────────────────────────

    #[test]
    fn test_aggregators_are_idempotent() {
        let rows = vec![
            NormalizedRow::new("2024-01-02", 10.0, "A", 1.0),
            NormalizedRow::new("2024-01-01", 5.0, "B", 2.0),
            NormalizedRow::new("2024-01-02", 3.0, "A", 3.0),
        ];
        let first = SeriesAggregator::sum_by_date(&rows, Measure::Amount);
        let second = SeriesAggregator::sum_by_date(&rows, Measure::Amount);
        assert_eq!(first, second);

        let first = SeriesAggregator::sum_by_category(&rows, Measure::Amount);
        let second = SeriesAggregator::sum_by_category(&rows, Measure::Amount);
        assert_eq!(first, second);
    }

    #[test]
    fn test_series_stay_index_aligned() {
        let rows = vec![
            NormalizedRow::new("2024-01-03", 1.0, "X", 0.0),
            NormalizedRow::new("2024-01-01", 2.0, "Y", 0.0),
            NormalizedRow::new("2024-01-02", 3.0, "Z", 0.0),
        ];
        let series = SeriesAggregator::sum_by_date(&rows, Measure::Amount);
        let pairs: Vec<(&str, f64)> = series.iter().collect();
        assert_eq!(
            pairs,
            vec![("2024-01-01", 2.0), ("2024-01-02", 3.0), ("2024-01-03", 1.0)]
        );
    }
}
