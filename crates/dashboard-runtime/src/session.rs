//! Per-mount dashboard state.
//!
//! [`DashboardSession`] holds the loaded rows, the user's date range and
//! measure, and a generation counter. Every mount hands out a [`LoadTicket`]
//! stamped with the current generation; a completion is committed only while
//! its ticket is still current, so loads that finish after an unmount or a
//! remount are dropped.

use dashboard_core::error::Result;
use dashboard_core::filter::DateRange;
use dashboard_core::models::{Measure, NormalizedRow};
use dashboard_data::analysis::{analyze, DashboardAnalysis};

use crate::load_state::LoadState;

/// Number of source rows shown in the preview table.
pub const PREVIEW_ROWS: usize = 10;

/// Generation stamp carried by one load.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadTicket {
    generation: u64,
}

impl LoadTicket {
    pub fn generation(self) -> u64 {
        self.generation
    }
}

// ── DashboardSession ──────────────────────────────────────────────────────────

#[derive(Debug, Default)]
pub struct DashboardSession {
    generation: u64,
    mounted: bool,
    state: LoadState,
    range: DateRange,
    measure: Measure,
}

impl DashboardSession {
    pub fn new(range: DateRange, measure: Measure) -> Self {
        Self {
            range,
            measure,
            ..Self::default()
        }
    }

    // ── Lifecycle ─────────────────────────────────────────────────────────

    /// Start a new mount: enter `Loading` and return the ticket the load
    /// must present on completion.
    pub fn mount(&mut self) -> LoadTicket {
        self.generation += 1;
        self.mounted = true;
        self.state = LoadState::Loading;
        tracing::info!(generation = self.generation, "dashboard mounted");
        LoadTicket {
            generation: self.generation,
        }
    }

    /// End the current mount. Any load still in flight becomes stale.
    pub fn unmount(&mut self) {
        self.generation += 1;
        self.mounted = false;
        self.state = LoadState::Loading;
        tracing::info!(generation = self.generation, "dashboard unmounted");
    }

    /// Commit a finished load.
    ///
    /// Returns `false` and leaves the state untouched when the ticket is
    /// stale or the mount already reached a terminal state.
    pub fn complete_load(
        &mut self,
        ticket: LoadTicket,
        result: Result<Vec<NormalizedRow>>,
    ) -> bool {
        if !self.mounted || ticket.generation != self.generation {
            tracing::debug!(
                ticket = ticket.generation,
                current = self.generation,
                "discarding stale load"
            );
            return false;
        }
        if self.state.is_terminal() {
            tracing::debug!(generation = self.generation, "load already settled");
            return false;
        }

        self.state = match result {
            Ok(rows) => {
                tracing::info!(rows = rows.len(), "data loaded");
                LoadState::Ready(rows)
            }
            Err(e) => {
                tracing::warn!(error = %e, "data load failed");
                LoadState::failed(e.to_string())
            }
        };
        true
    }

    // ── Inputs ────────────────────────────────────────────────────────────

    pub fn set_from(&mut self, from: impl Into<String>) {
        self.range.from = from.into();
    }

    pub fn set_to(&mut self, to: impl Into<String>) {
        self.range.to = to.into();
    }

    /// Clear both boundaries.
    pub fn reset_range(&mut self) {
        self.range.reset();
    }

    pub fn set_measure(&mut self, measure: Measure) {
        self.measure = measure;
    }

    // ── Accessors ─────────────────────────────────────────────────────────

    pub fn state(&self) -> &LoadState {
        &self.state
    }

    pub fn range(&self) -> &DateRange {
        &self.range
    }

    pub fn measure(&self) -> Measure {
        self.measure
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    /// All loaded rows, empty unless the state is `Ready`.
    pub fn rows(&self) -> &[NormalizedRow] {
        self.state.rows()
    }

    /// Loaded rows inside the current range.
    pub fn filtered_rows(&self) -> Vec<NormalizedRow> {
        self.range.apply(self.rows()).into_owned()
    }

    /// Recompute the filtered series for the current inputs.
    pub fn analysis(&self) -> DashboardAnalysis {
        analyze(self.rows(), &self.range, self.measure)
    }

    /// First `n` source rows, ignoring the range.
    pub fn preview(&self, n: usize) -> &[NormalizedRow] {
        let rows = self.rows();
        &rows[..rows.len().min(n)]
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
