use std::path::PathBuf;
use thiserror::Error;

/// All errors produced by the sales dashboard.
///
/// Only loading can fail, either fetching the source or parsing it.
/// Normalization, filtering and aggregation are total and never produce one
/// of these.
#[derive(Error, Debug)]
pub enum DashboardError {
    /// The CSV source could not be opened or read.
    #[error("Failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The CSV text was malformed.
    #[error("Failed to parse CSV at line {line}: {message}")]
    CsvParse { line: u64, message: String },
}

impl From<csv::Error> for DashboardError {
    fn from(err: csv::Error) -> Self {
        let line = err.position().map(|p| p.line()).unwrap_or(0);
        DashboardError::CsvParse {
            line,
            message: err.to_string(),
        }
    }
}

/// Convenience alias used throughout the dashboard crates.
pub type Result<T> = std::result::Result<T, DashboardError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_file_read() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "no such file");
        let err = DashboardError::FileRead {
            path: PathBuf::from("/data/sample.csv"),
            source: io_err,
        };
        let msg = err.to_string();
        assert!(msg.contains("Failed to read file"));
        assert!(msg.contains("/data/sample.csv"));
        assert!(msg.contains("no such file"));
    }

    #[test]
    fn test_error_display_csv_parse() {
        let err = DashboardError::CsvParse {
            line: 4,
            message: "unterminated quote".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Failed to parse CSV at line 4: unterminated quote"
        );
    }

    #[test]
    fn test_error_from_csv_carries_line() {
        let data = "a,b\n1,2\n3\n";
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(false)
            .from_reader(data.as_bytes());
        let csv_err = reader
            .records()
            .find_map(|r| r.err())
            .expect("ragged row must fail in strict mode");
        let err: DashboardError = csv_err.into();
        match err {
            DashboardError::CsvParse { line, .. } => assert_eq!(line, 3),
            other => panic!("unexpected error: {other}"),
        }
    }
}
