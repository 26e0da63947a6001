//! Runtime layer for the sales dashboard.
//!
//! Owns the per-mount session state, the load lifecycle, and the background
//! task that fetches and parses the CSV source.

pub mod load_state;
pub mod loader;
pub mod session;

pub use dashboard_core as core;
pub use dashboard_data as data;
