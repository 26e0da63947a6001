//! The full pipeline from normalized rows to everything a view renders.

use serde::Serialize;
use tracing::debug;

use dashboard_core::filter::DateRange;
use dashboard_core::models::{AggregateSeries, Measure, NormalizedRow};

use crate::aggregator::SeriesAggregator;

/// Result of filtering and aggregating one dataset.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardAnalysis {
    /// Which field the series sum.
    pub measure: Measure,
    /// The range the rows were filtered with.
    pub range: DateRange,
    /// Rows in the dataset before filtering.
    pub total_rows: usize,
    /// Rows left after filtering.
    pub rows_in_range: usize,
    /// Measure summed over the filtered rows.
    pub total: f64,
    pub over_time: AggregateSeries,
    pub by_category: AggregateSeries,
}

impl DashboardAnalysis {
    /// "Rows in range: N / M".
    pub fn rows_summary(&self) -> String {
        format!("Rows in range: {} / {}", self.rows_in_range, self.total_rows)
    }
}

/// Filter `rows` by `range` and build both series for `measure`.
pub fn analyze(rows: &[NormalizedRow], range: &DateRange, measure: Measure) -> DashboardAnalysis {
    let filtered = range.apply(rows);
    let over_time = SeriesAggregator::sum_by_date(&filtered, measure);
    let by_category = SeriesAggregator::sum_by_category(&filtered, measure);
    let total = over_time.total();

    debug!(
        measure = %measure,
        total_rows = rows.len(),
        rows_in_range = filtered.len(),
        dates = over_time.len(),
        categories = by_category.len(),
        "analysis complete"
    );

    DashboardAnalysis {
        measure,
        range: range.clone(),
        total_rows: rows.len(),
        rows_in_range: filtered.len(),
        total,
        over_time,
        by_category,
    }
}
