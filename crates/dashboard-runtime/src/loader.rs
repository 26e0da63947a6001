//! Background CSV loading.
//!
//! [`spawn_load`] fetches the source file in a tokio task, parses and
//! normalizes it, and sends a single [`LoadOutcome`] back over an `mpsc`
//! channel. The outcome carries the ticket it was started with so the
//! session can reject it if the mount has moved on.

use std::path::{Path, PathBuf};

use dashboard_core::error::{DashboardError, Result};
use dashboard_core::models::NormalizedRow;
use dashboard_core::normalizer::RowNormalizer;
use dashboard_data::reader::parse_csv_reader;
use tokio::sync::mpsc;

use crate::session::LoadTicket;

/// Result of one background load.
#[derive(Debug)]
pub struct LoadOutcome {
    pub ticket: LoadTicket,
    pub result: Result<Vec<NormalizedRow>>,
}

/// Fetch, parse and normalize the CSV at `path`.
pub async fn load_rows(path: &Path) -> Result<Vec<NormalizedRow>> {
    let bytes = tokio::fs::read(path).await.map_err(|source| {
        tracing::warn!(path = %path.display(), error = %source, "failed to read CSV source");
        DashboardError::FileRead {
            path: path.to_path_buf(),
            source,
        }
    })?;

    let records = parse_csv_reader(bytes.as_slice())?;
    let rows = RowNormalizer::normalize_all(&records);
    tracing::debug!(path = %path.display(), rows = rows.len(), "CSV source loaded");
    Ok(rows)
}

/// Start loading `path` in the background.
///
/// Returns the receiving end of the outcome channel and a handle that can
/// abort the task.
pub fn spawn_load(path: PathBuf, ticket: LoadTicket) -> (mpsc::Receiver<LoadOutcome>, LoadHandle) {
    let (tx, rx) = mpsc::channel(1);

    let handle = tokio::spawn(async move {
        let result = load_rows(&path).await;
        if tx.send(LoadOutcome { ticket, result }).await.is_err() {
            tracing::debug!("load receiver dropped before completion");
        }
    });

    (rx, LoadHandle { handle })
}

// ── LoadHandle ────────────────────────────────────────────────────────────────

/// Handle to a background load task.
pub struct LoadHandle {
    handle: tokio::task::JoinHandle<()>,
}

impl LoadHandle {
    /// Abort the task if it is still running.
    pub fn abort(&self) {
        self.handle.abort();
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
