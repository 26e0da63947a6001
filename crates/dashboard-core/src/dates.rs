//! Lenient parsing of ISO-like date strings.
//!
//! Row dates and filter boundaries are both free text. Everything that
//! compares dates goes through [`parse_date`], so the filter and the
//! time-series sort agree on what counts as a date.

use std::cmp::Ordering;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use tracing::trace;

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
];

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d"];

/// Parse a date-like string into a naive UTC instant.
///
/// Accepts, after trimming surrounding whitespace:
/// * RFC 3339 timestamps (offset or `Z`), converted to UTC;
/// * naive date-times (`2024-06-01T10:30`, `2024-06-01 10:30:00`, ...);
/// * calendar dates (`2024-06-01`, `2024/06/01`) at midnight;
/// * year-month (`2024-06`) and bare years (`2024`) at the first instant.
///
/// Returns `None` for anything else, including the empty string.
pub fn parse_date(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }

    let normalised = match s.strip_suffix('Z') {
        Some(stripped) => format!("{stripped}+00:00"),
        None => s.to_string(),
    };
    if let Ok(dt) = DateTime::parse_from_rfc3339(&normalised) {
        return Some(dt.naive_utc());
    }

    for fmt in DATETIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(naive);
        }
    }

    for fmt in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(s, fmt) {
            return date.and_hms_opt(0, 0, 0);
        }
    }

    if let Some(date) = parse_partial_date(s) {
        return date.and_hms_opt(0, 0, 0);
    }

    trace!("unparsable date string {:?}", s);
    None
}

/// `YYYY-MM` and `YYYY`, which chrono's format parser rejects on its own.
fn parse_partial_date(s: &str) -> Option<NaiveDate> {
    let all_digits = |part: &str| !part.is_empty() && part.bytes().all(|b| b.is_ascii_digit());

    match s.split_once('-') {
        Some((year, month)) if year.len() == 4 && month.len() == 2 => {
            if !all_digits(year) || !all_digits(month) {
                return None;
            }
            NaiveDate::from_ymd_opt(year.parse().ok()?, month.parse().ok()?, 1)
        }
        None if s.len() == 4 && all_digits(s) => NaiveDate::from_ymd_opt(s.parse().ok()?, 1, 1),
        _ => None,
    }
}

/// Chronological ordering of two date keys.
///
/// Parsable keys come first in date order; unparsable keys sort after every
/// parsable one and compare equal among themselves, so a stable sort keeps
/// their original order.
pub fn compare_date_keys(a: &str, b: &str) -> Ordering {
    match (parse_date(a), parse_date(b)) {
        (Some(x), Some(y)) => x.cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}
