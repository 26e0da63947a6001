use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ── Column names ──────────────────────────────────────────────────────────────

/// Header of the date column in the source CSV.
pub const DATE_COLUMN: &str = "Date";
/// Header of the sales (amount) column in the source CSV.
pub const SALES_COLUMN: &str = "Sales";
/// Header of the category column in the source CSV.
pub const CATEGORY_COLUMN: &str = "Category";
/// Header of the units column in the source CSV.
pub const UNITS_COLUMN: &str = "Units";

/// Category assigned to rows whose category cell is missing or empty.
pub const UNKNOWN_CATEGORY: &str = "Unknown";

// ── RawRecord ─────────────────────────────────────────────────────────────────

/// One untyped CSV record keyed by header name.
///
/// Cells carry whatever type dynamic typing inferred for them: numbers,
/// booleans, strings or null. Columns missing from a short row are absent.
pub type RawRecord = serde_json::Map<String, serde_json::Value>;

// ── NormalizedRow ─────────────────────────────────────────────────────────────

/// A CSV record coerced into the fixed four-field shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedRow {
    /// Date text, expected as `YYYY-MM-DD` but not validated.
    pub date: String,
    /// Sales value.
    pub amount: f64,
    /// Category label, [`UNKNOWN_CATEGORY`] when the source had none.
    pub category: String,
    /// Unit count.
    pub units: f64,
}

impl NormalizedRow {
    pub fn new(
        date: impl Into<String>,
        amount: f64,
        category: impl Into<String>,
        units: f64,
    ) -> Self {
        Self {
            date: date.into(),
            amount,
            category: category.into(),
            units,
        }
    }

    /// Value of the given measure for this row.
    pub fn measure(&self, measure: Measure) -> f64 {
        match measure {
            Measure::Amount => self.amount,
            Measure::Units => self.units,
        }
    }
}

// ── Measure ───────────────────────────────────────────────────────────────────

/// The numeric field an aggregator sums.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Measure {
    #[default]
    Amount,
    Units,
}

impl Measure {
    /// Display label used in chart titles.
    pub fn label(self) -> &'static str {
        match self {
            Measure::Amount => "Sales",
            Measure::Units => "Units",
        }
    }

    /// The other measure.
    pub fn toggled(self) -> Self {
        match self {
            Measure::Amount => Measure::Units,
            Measure::Units => Measure::Amount,
        }
    }
}

impl fmt::Display for Measure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Measure::Amount => f.write_str("amount"),
            Measure::Units => f.write_str("units"),
        }
    }
}

impl FromStr for Measure {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "amount" | "sales" => Ok(Measure::Amount),
            "units" => Ok(Measure::Units),
            other => Err(format!("unknown measure: {other}")),
        }
    }
}

// ── AggregateSeries ───────────────────────────────────────────────────────────

/// Index-aligned labels and values of a grouped sum, ready for charting.
///
/// `labels[i]` and `values[i]` always describe the same group.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AggregateSeries {
    pub labels: Vec<String>,
    pub values: Vec<f64>,
}

impl AggregateSeries {
    /// Build a series from `(label, value)` pairs, keeping their order.
    pub fn from_pairs(pairs: Vec<(String, f64)>) -> Self {
        let (labels, values) = pairs.into_iter().unzip();
        Self { labels, values }
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Sum of all values.
    pub fn total(&self) -> f64 {
        self.values.iter().sum()
    }

    /// Iterate over `(label, value)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.labels
            .iter()
            .map(String::as_str)
            .zip(self.values.iter().copied())
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
