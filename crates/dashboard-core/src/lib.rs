//! Core types for the sales dashboard.
//!
//! Holds the row and series models, the shared error type, CLI settings, date
//! parsing, and the two leaf stages of the pipeline: the row normalizer and
//! the date range filter.

pub mod dates;
pub mod error;
pub mod filter;
pub mod formatting;
pub mod models;
pub mod normalizer;
pub mod settings;
