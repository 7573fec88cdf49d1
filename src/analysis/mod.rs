//! Analysis modules.
//!
//! Turns per-file tables into a corpus and a specimen summary:
//! derived columns, concatenation, deduplication and descriptive
//! statistics.

pub mod aggregator;
pub mod derive;
pub mod stats;

pub use aggregator::*;
pub use derive::*;
pub use stats::*;

use thiserror::Error;

/// Errors raised while deriving or aggregating tables.
#[derive(Debug, Error, PartialEq)]
pub enum AnalysisError {
    #[error("required column '{0}' is missing")]
    MissingColumn(String),

    #[error(transparent)]
    Table(#[from] crate::models::TableError),
}
