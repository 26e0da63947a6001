//! Coercion of untyped CSV records into [`NormalizedRow`]s.
//!
//! Normalization is total: every input yields a row, and bad cells fall back
//! to defaults instead of failing. Rows are never dropped here.

use serde_json::Value;
use tracing::debug;

use crate::models::{
    NormalizedRow, RawRecord, CATEGORY_COLUMN, DATE_COLUMN, SALES_COLUMN, UNITS_COLUMN,
    UNKNOWN_CATEGORY,
};

// ── RowNormalizer ─────────────────────────────────────────────────────────────

/// Stateless helper that maps raw records onto the fixed row shape.
pub struct RowNormalizer;

impl RowNormalizer {
    /// Normalize a single record.
    pub fn normalize(record: &RawRecord) -> NormalizedRow {
        NormalizedRow {
            date: Self::coerce_string(record.get(DATE_COLUMN)),
            amount: Self::coerce_number(record.get(SALES_COLUMN)),
            category: Self::coerce_category(record.get(CATEGORY_COLUMN)),
            units: Self::coerce_number(record.get(UNITS_COLUMN)),
        }
    }

    /// Normalize every record, preserving order.
    pub fn normalize_all(records: &[RawRecord]) -> Vec<NormalizedRow> {
        let rows: Vec<NormalizedRow> = records.iter().map(Self::normalize).collect();

        let defaulted = records.iter().filter(|r| Self::needs_default(r)).count();
        debug!(rows = rows.len(), defaulted, "normalized CSV records");

        rows
    }

    /// String form of a cell. A null cell becomes `"null"` and an absent
    /// one `"undefined"`, so both stay visible as their own date group.
    pub fn coerce_string(value: Option<&Value>) -> String {
        match value {
            None => "undefined".to_string(),
            Some(Value::Null) => "null".to_string(),
            Some(Value::String(s)) => s.clone(),
            Some(Value::Bool(b)) => b.to_string(),
            Some(Value::Number(n)) => match n.as_f64() {
                Some(f) => format_number(f),
                None => n.to_string(),
            },
            Some(other) => other.to_string(),
        }
    }

    /// Numeric form of a cell, `0.0` whenever no finite number comes out.
    pub fn coerce_number(value: Option<&Value>) -> f64 {
        let coerced = match value {
            None | Some(Value::Null) => 0.0,
            Some(Value::Bool(b)) => {
                if *b {
                    1.0
                } else {
                    0.0
                }
            }
            Some(Value::Number(n)) => n.as_f64().unwrap_or(0.0),
            Some(Value::String(s)) => {
                let trimmed = s.trim();
                if trimmed.is_empty() {
                    0.0
                } else {
                    trimmed.parse::<f64>().unwrap_or(0.0)
                }
            }
            Some(_) => 0.0,
        };

        if coerced.is_finite() {
            coerced
        } else {
            0.0
        }
    }

    /// Category label, [`UNKNOWN_CATEGORY`] unless the cell holds a truthy value.
    pub fn coerce_category(value: Option<&Value>) -> String {
        let truthy = match value {
            None | Some(Value::Null) => false,
            Some(Value::String(s)) => !s.is_empty(),
            Some(Value::Bool(b)) => *b,
            Some(Value::Number(n)) => n.as_f64().map(|f| f != 0.0).unwrap_or(true),
            Some(_) => true,
        };

        if truthy {
            Self::coerce_string(value)
        } else {
            UNKNOWN_CATEGORY.to_string()
        }
    }

    /// `true` when at least one field of `record` falls back to a default.
    fn needs_default(record: &RawRecord) -> bool {
        let numeric_ok = |key: &str| match record.get(key) {
            Some(Value::Number(_)) => true,
            Some(Value::String(s)) => s.trim().parse::<f64>().is_ok(),
            _ => false,
        };
        let date_ok = matches!(
            record.get(DATE_COLUMN),
            Some(Value::String(_) | Value::Number(_))
        );
        let category_ok =
            matches!(record.get(CATEGORY_COLUMN), Some(Value::String(s)) if !s.is_empty());

        !(date_ok && category_ok && numeric_ok(SALES_COLUMN) && numeric_ok(UNITS_COLUMN))
    }
}

/// Shortest decimal form of `f`: integers print without a fraction.
fn format_number(f: f64) -> String {
    if f.fract() == 0.0 && f.abs() < 1e15 {
        format!("{}", f as i64)
    } else {
        f.to_string()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
