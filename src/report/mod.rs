//! Output artifacts.
//!
//! This module turns the corpus and the specimen summary into files: the
//! summary spreadsheet, plotly HTML charts and the run summary.

mod charts;
mod generator;
mod html;
mod spreadsheet;

pub use charts::{line_chart, violin_chart};
pub use generator::write_report;
pub use html::write_html;
pub use spreadsheet::{write_statistics, write_summary};
