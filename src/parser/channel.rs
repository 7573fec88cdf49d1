//! `Channel Data` extraction and per-file table assembly.

use super::numeric::{extract_numeric_value, split_unit};
use super::variables::extract_variables;
use super::ParseError;
use crate::models::{Table, TableError, Value};
use serde::Serialize;
use std::path::Path;
use tracing::debug;

/// Signature written on the first line by the tensile tester.
pub const INSTRUMENT_SIGNATURE: &str = "EVOMECT150NanoTestDataFile";

/// Line introducing the tabular readings.
pub const CHANNEL_DATA_MARKER: &str = "Channel Data";

/// One parsed instrument file.
#[derive(Debug, Clone)]
pub struct InstrumentTable {
    /// Channel readings plus constant metadata columns.
    pub table: Table,
    /// Names of the channel columns, in file order.
    pub channels: Vec<String>,
    /// Whether the text carried the instrument signature.
    pub recognized: bool,
}

impl InstrumentTable {
    /// Per-channel statistics over the numeric cells.
    pub fn summary(&self) -> ChannelSummary {
        let channels = self
            .channels
            .iter()
            .filter_map(|name| self.table.column(name))
            .map(|column| ChannelStats::from_values(&column.name, &column.values))
            .collect();

        ChannelSummary {
            rows: self.table.height(),
            channels,
        }
    }
}

/// Statistics of one channel column.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChannelStats {
    pub name: String,
    pub count: usize,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub mean: Option<f64>,
}

impl ChannelStats {
    fn from_values(name: &str, values: &[Value]) -> Self {
        let numbers: Vec<f64> = values.iter().filter_map(Value::as_f64).collect();
        let count = numbers.len();
        let (min, max, mean) = if count == 0 {
            (None, None, None)
        } else {
            let min = numbers.iter().copied().fold(f64::INFINITY, f64::min);
            let max = numbers.iter().copied().fold(f64::NEG_INFINITY, f64::max);
            let mean = numbers.iter().sum::<f64>() / count as f64;
            (Some(min), Some(max), Some(mean))
        };

        Self {
            name: name.to_string(),
            count,
            min,
            max,
            mean,
        }
    }
}

/// Channel statistics of one file.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChannelSummary {
    /// Number of data rows.
    pub rows: usize,
    /// One entry per channel column.
    pub channels: Vec<ChannelStats>,
}

/// Whether the text starts with the tensile tester's file signature.
pub fn looks_like_instrument_file(text: &str) -> bool {
    text.trim_start_matches('\u{feff}')
        .starts_with(INSTRUMENT_SIGNATURE)
}

/// Reads and parses one instrument file.
pub fn parse_file(path: &Path) -> Result<InstrumentTable, ParseError> {
    let text = std::fs::read_to_string(path).map_err(|source| ParseError::Io {
        path: path.display().to_string(),
        source,
    })?;
    parse_instrument(&text)
}

/// Parses the text of one instrument file into a table.
///
/// The header row sits two lines below the `Channel Data` marker and the
/// unit row three lines below it. Every non-blank line after the marker
/// that does not start with a quote is a data row. Column names are
/// `"<header> (<unit>)"`; cells that are not numbers become missing.
/// Each `Variables` entry then adds a constant `<key>` column and, when
/// its value is unit-bearing or text, a `<key> Unit` column.
pub fn parse_instrument(text: &str) -> Result<InstrumentTable, ParseError> {
    let lines: Vec<&str> = text.lines().collect();
    let variables = extract_variables(&lines)?;

    let marker = lines
        .iter()
        .position(|l| l.trim_end() == CHANNEL_DATA_MARKER)
        .ok_or(ParseError::MissingChannelData)?;
    let header_line = lines
        .get(marker + 2)
        .ok_or(ParseError::MissingHeader("header"))?;
    let unit_line = lines
        .get(marker + 3)
        .ok_or(ParseError::MissingHeader("unit"))?;

    let channels: Vec<String> = header_line
        .trim()
        .split(',')
        .zip(unit_line.trim().split(','))
        .map(|(header, unit)| format!("{} ({})", clean_token(header), clean_token(unit)))
        .collect();

    let mut rows: Vec<Vec<Value>> = Vec::new();
    for (offset, line) in lines[marker + 1..].iter().enumerate() {
        let text = line.trim();
        if text.is_empty() || text.starts_with('"') {
            continue;
        }

        let mut cells: Vec<Value> = text.split(',').map(coerce_cell).collect();
        if cells.len() > channels.len() {
            return Err(ParseError::RowWidth {
                line: marker + offset + 2,
                expected: channels.len(),
                found: cells.len(),
            });
        }
        cells.resize(channels.len(), Value::Missing);
        rows.push(cells);
    }

    let mut table = Table::with_height(rows.len());
    for (j, name) in channels.iter().enumerate() {
        let values = rows.iter().map(|row| row[j].clone()).collect();
        table.push_column(name, values).map_err(collision)?;
    }

    for (key, raw) in &variables {
        match extract_numeric_value(raw) {
            Ok(number) => {
                table
                    .push_constant(key, Value::from(number))
                    .map_err(collision)?;
                table
                    .push_constant(&format!("{} Unit", key), Value::Text(split_unit(raw, number)))
                    .map_err(collision)?;
            }
            Err(_) => {
                debug!("Metadata '{}' keeps raw text '{}'", key, raw);
                table
                    .push_constant(key, Value::Text(raw.clone()))
                    .map_err(collision)?;
            }
        }
    }

    Ok(InstrumentTable {
        table,
        channels,
        recognized: looks_like_instrument_file(text),
    })
}

/// Strips surrounding whitespace, then surrounding quotes.
fn clean_token(token: &str) -> &str {
    token.trim().trim_matches('"')
}

fn coerce_cell(cell: &str) -> Value {
    cell.trim()
        .parse::<f64>()
        .map(Value::from)
        .unwrap_or(Value::Missing)
}

fn collision(err: TableError) -> ParseError {
    match err {
        TableError::DuplicateColumn(name) => ParseError::ColumnCollision(name),
        other => ParseError::Table(other),
    }
}
