//! CSV loading for the sales dashboard.
//!
//! Turns header-driven CSV text into [`RawRecord`]s, inferring cell types the
//! way a spreadsheet would: numbers and booleans become typed JSON values,
//! empty cells become null, everything else stays a string.

use std::io::Read;
use std::path::Path;
use std::sync::OnceLock;

use csv::{ReaderBuilder, StringRecord};
use dashboard_core::error::{DashboardError, Result};
use dashboard_core::models::RawRecord;
use regex::Regex;
use serde_json::{Number, Value};
use tracing::{debug, warn};

/// Largest integer a double can hold exactly; bigger numbers stay strings.
const MAX_EXACT_FLOAT: f64 = 9_007_199_254_740_992.0;

// ── Public API ────────────────────────────────────────────────────────────────

/// Parse CSV text into raw records keyed by header name.
pub fn parse_csv_str(text: &str) -> Result<Vec<RawRecord>> {
    parse_csv_reader(text.as_bytes())
}

/// Parse CSV data from any reader.
///
/// The first row is the header. Empty lines are skipped, but a row of empty
/// cells such as `,,,` is kept. Short rows simply lack their trailing
/// columns; extra cells beyond the header are kept under `__extra_<n>` keys.
///
/// # Errors
///
/// [`DashboardError::CsvParse`] when the reader yields malformed data, for
/// example invalid UTF-8.
pub fn parse_csv_reader<R: Read>(reader: R) -> Result<Vec<RawRecord>> {
    let mut csv_reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let headers: Vec<String> = csv_reader
        .headers()?
        .iter()
        .map(|h| h.trim_start_matches('\u{feff}').to_string())
        .collect();

    let mut records = Vec::new();
    for result in csv_reader.records() {
        let record = result?;
        records.push(to_raw_record(&headers, &record));
    }

    debug!(columns = headers.len(), records = records.len(), "parsed CSV");
    Ok(records)
}

/// Read and parse a CSV file from disk.
///
/// # Errors
///
/// [`DashboardError::FileRead`] when the file cannot be opened, otherwise
/// whatever [`parse_csv_reader`] reports.
pub fn read_csv_file(path: &Path) -> Result<Vec<RawRecord>> {
    let file = std::fs::File::open(path).map_err(|source| {
        warn!("Failed to read file {}: {}", path.display(), source);
        DashboardError::FileRead {
            path: path.to_path_buf(),
            source,
        }
    })?;
    parse_csv_reader(std::io::BufReader::new(file))
}

/// Infer a typed JSON value for a single cell.
pub fn infer_value(cell: &str) -> Value {
    if cell.is_empty() {
        return Value::Null;
    }
    match cell {
        "true" | "TRUE" => return Value::Bool(true),
        "false" | "FALSE" => return Value::Bool(false),
        _ => {}
    }

    if float_pattern().is_match(cell) {
        if let Ok(f) = cell.trim().parse::<f64>() {
            if f.abs() <= MAX_EXACT_FLOAT {
                if let Some(n) = Number::from_f64(f) {
                    return Value::Number(n);
                }
            }
        }
    }

    Value::String(cell.to_string())
}

// ── Internal helpers ──────────────────────────────────────────────────────────

fn float_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^\s*-?(\d+\.?|\.\d+|\d+\.\d+)([eE][-+]?\d+)?\s*$").expect("regex is valid")
    })
}

fn to_raw_record(headers: &[String], record: &StringRecord) -> RawRecord {
    let mut raw = RawRecord::new();
    for (i, cell) in record.iter().enumerate() {
        let key = match headers.get(i) {
            Some(h) => h.clone(),
            None => format!("__extra_{}", i - headers.len()),
        };
        raw.insert(key, infer_value(cell));
    }
    raw
}

// ── Tests ─────────────────────────────────────────────────────────────────────
