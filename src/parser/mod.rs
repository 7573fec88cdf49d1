//! Instrument file parsing.
//!
//! An instrument file has a `Variables` block of unit-bearing metadata and
//! a `Channel Data` block of comma-separated readings. Parsing turns one
//! file into one [`Table`](crate::models::Table): the channel rows, with
//! every metadata key appended as a constant column.

pub mod channel;
pub mod numeric;
pub mod variables;

pub use channel::{looks_like_instrument_file, parse_file, ChannelSummary};

use thiserror::Error;

/// Errors raised while parsing an instrument file.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("malformed Variables line {line}: '{text}' has no value")]
    MalformedVariable { line: usize, text: String },

    #[error("no 'Channel Data' section found")]
    MissingChannelData,

    #[error("'Channel Data' section has no {0} line")]
    MissingHeader(&'static str),

    #[error("data row {line} has {found} cells but only {expected} columns")]
    RowWidth {
        line: usize,
        expected: usize,
        found: usize,
    },

    #[error("metadata column '{0}' collides with an existing column")]
    ColumnCollision(String),

    #[error(transparent)]
    Table(#[from] crate::models::TableError),

    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}
