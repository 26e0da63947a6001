//! Load lifecycle for one mount of the dashboard.

use dashboard_core::models::NormalizedRow;

/// Where the current load stands.
///
/// `Loading` is the entry state. `Ready` and `Failed` are terminal for the
/// mount; only a new mount goes back to `Loading`.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum LoadState {
    #[default]
    Loading,
    /// Fetch and parse succeeded. The row set may be empty.
    Ready(Vec<NormalizedRow>),
    /// Fetch or parse failed. The message is never empty.
    Failed(String),
}

impl LoadState {
    /// Build a `Failed` state, substituting a generic message for an empty one.
    pub fn failed(message: impl Into<String>) -> Self {
        let message = message.into();
        if message.trim().is_empty() {
            LoadState::Failed("failed to load data".to_string())
        } else {
            LoadState::Failed(message)
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, LoadState::Loading)
    }

    pub fn is_terminal(&self) -> bool {
        !self.is_loading()
    }

    /// Loaded rows, or an empty slice while loading or after a failure.
    pub fn rows(&self) -> &[NormalizedRow] {
        match self {
            LoadState::Ready(rows) => rows,
            _ => &[],
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            LoadState::Failed(msg) => Some(msg),
            _ => None,
        }
    }

    /// Short status text for the UI.
    pub fn status_label(&self) -> String {
        match self {
            LoadState::Loading => "Loading data...".to_string(),
            LoadState::Ready(rows) => format!("Loaded {} rows", rows.len()),
            LoadState::Failed(msg) => format!("Error: {msg}"),
        }
    }
}
