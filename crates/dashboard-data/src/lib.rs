//! Data layer for the sales dashboard.
//!
//! Parses CSV text into untyped records, aggregates normalized rows into
//! chart-ready series, and runs the filter-then-aggregate pipeline that backs
//! each render.

pub mod aggregator;
pub mod analysis;
pub mod reader;

pub use dashboard_core as core;
