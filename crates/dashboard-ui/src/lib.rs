//! Terminal UI layer for the sales dashboard.
//!
//! Provides themes, the header and filter bar components, the line and bar
//! chart adapters, the source preview table, and the application event loop
//! built on [`ratatui`].

pub mod app;
pub mod charts;
pub mod components;
pub mod table_view;
pub mod themes;

pub use dashboard_core as core;

/// Flatten a test buffer into one string for substring assertions.
#[cfg(test)]
pub(crate) fn buffer_text(buffer: &ratatui::buffer::Buffer) -> String {
    buffer.content().iter().map(|cell| cell.symbol()).collect()
}
