//! Data models for the tensile-test reader.
//!
//! This module contains the tabular model shared by the parser, the
//! aggregation step and the reporters: a dynamically-typed [`Value`] cell,
//! a named [`Column`] and an ordered, row-labelled [`Table`].

use crate::analysis::ColumnStats;
use crate::parser::ChannelSummary;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use thiserror::Error;

/// A single cell of a table.
///
/// Numeric coercion failures are represented as [`Value::Missing`] rather
/// than errors, mirroring a NaN-filled dataframe column.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum Value {
    /// A floating-point measurement or metadata value.
    Number(f64),
    /// Free text (specimen names, units, raw metadata).
    Text(String),
    /// Absent or unparseable cell.
    Missing,
}

impl Value {
    /// Returns the numeric content, if any.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Number(v) => Some(*v),
            _ => None,
        }
    }

    /// Returns the text content, if any.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Whether the cell is missing.
    pub fn is_missing(&self) -> bool {
        matches!(self, Value::Missing)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        if v.is_nan() {
            Value::Missing
        } else {
            // -0.0 + 0.0 is +0.0
            Value::Number(v + 0.0)
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or(Value::Missing)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Number(v) => write!(f, "{}", v),
            Value::Text(s) => write!(f, "{}", s),
            Value::Missing => Ok(()),
        }
    }
}

// Eq/Ord/Hash are needed to group and sort specimens by name. All three
// agree with the total order, so -0.0 and 0.0 are distinct cells.

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Value {}

impl PartialOrd for Value {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Value {
    fn cmp(&self, other: &Self) -> Ordering {
        fn rank(v: &Value) -> u8 {
            match v {
                Value::Number(_) => 0,
                Value::Text(_) => 1,
                Value::Missing => 2,
            }
        }
        match (self, other) {
            (Value::Number(a), Value::Number(b)) => a.total_cmp(b),
            (Value::Text(a), Value::Text(b)) => a.cmp(b),
            _ => rank(self).cmp(&rank(other)),
        }
    }
}

impl Hash for Value {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            Value::Number(v) => v.to_bits().hash(state),
            Value::Text(s) => s.hash(state),
            Value::Missing => {}
        }
    }
}

/// Errors raised when assembling a table.
#[derive(Debug, Error, PartialEq)]
pub enum TableError {
    #[error("column '{0}' already exists")]
    DuplicateColumn(String),

    #[error("column '{column}' has {found} values, table has {expected} rows")]
    LengthMismatch {
        column: String,
        expected: usize,
        found: usize,
    },
}

/// A named column of cells.
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    /// Column header.
    pub name: String,
    /// One cell per table row.
    pub values: Vec<Value>,
}

/// An ordered collection of equal-length columns.
///
/// Every row carries an index label. Freshly built tables are labelled
/// `0..height`; [`Table::take`] keeps the labels of the selected rows, so
/// a deduplicated summary still knows where its rows came from.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    columns: Vec<Column>,
    index: Vec<usize>,
}

impl Table {
    /// Creates an empty table with `height` rows and no columns.
    pub fn with_height(height: usize) -> Self {
        Self {
            columns: Vec::new(),
            index: (0..height).collect(),
        }
    }

    /// Number of rows.
    pub fn height(&self) -> usize {
        self.index.len()
    }

    /// Number of columns.
    pub fn width(&self) -> usize {
        self.columns.len()
    }

    /// Row labels, one per row.
    pub fn index(&self) -> &[usize] {
        &self.index
    }

    /// All columns in order.
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Column names in order.
    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    /// Looks up a column by name.
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Whether a column with this name exists.
    pub fn has_column(&self, name: &str) -> bool {
        self.column(name).is_some()
    }

    /// Returns the cell at `row` of column `name`.
    pub fn get(&self, name: &str, row: usize) -> Option<&Value> {
        self.column(name).and_then(|c| c.values.get(row))
    }

    /// Appends a new column, failing on a duplicate name or wrong length.
    pub fn push_column(&mut self, name: &str, values: Vec<Value>) -> Result<(), TableError> {
        if self.has_column(name) {
            return Err(TableError::DuplicateColumn(name.to_string()));
        }
        if values.len() != self.height() {
            return Err(TableError::LengthMismatch {
                column: name.to_string(),
                expected: self.height(),
                found: values.len(),
            });
        }
        self.columns.push(Column {
            name: name.to_string(),
            values,
        });
        Ok(())
    }

    /// Appends a column holding `value` on every row.
    pub fn push_constant(&mut self, name: &str, value: Value) -> Result<(), TableError> {
        let values = vec![value; self.height()];
        self.push_column(name, values)
    }

    /// Replaces an existing column in place, or appends it.
    pub fn set_column(&mut self, name: &str, values: Vec<Value>) -> Result<(), TableError> {
        if values.len() != self.height() {
            return Err(TableError::LengthMismatch {
                column: name.to_string(),
                expected: self.height(),
                found: values.len(),
            });
        }
        match self.columns.iter_mut().find(|c| c.name == name) {
            Some(column) => column.values = values,
            None => self.columns.push(Column {
                name: name.to_string(),
                values,
            }),
        }
        Ok(())
    }

    /// Builds a new table from the given rows, keeping their labels.
    pub fn take(&self, rows: &[usize]) -> Table {
        let columns = self
            .columns
            .iter()
            .map(|c| Column {
                name: c.name.clone(),
                values: rows.iter().map(|&r| c.values[r].clone()).collect(),
            })
            .collect();
        Table {
            columns,
            index: rows.iter().map(|&r| self.index[r]).collect(),
        }
    }

    /// Stacks tables vertically.
    ///
    /// The result has the union of all column names in order of first
    /// appearance; cells a table does not provide are [`Value::Missing`].
    /// Row labels are renumbered `0..total`.
    pub fn concat(tables: &[Table]) -> Table {
        let mut names: Vec<&str> = Vec::new();
        for table in tables {
            for column in &table.columns {
                if !names.contains(&column.name.as_str()) {
                    names.push(&column.name);
                }
            }
        }

        let total: usize = tables.iter().map(Table::height).sum();
        let columns = names
            .iter()
            .map(|name| {
                let mut values = Vec::with_capacity(total);
                for table in tables {
                    match table.column(name) {
                        Some(c) => values.extend(c.values.iter().cloned()),
                        None => values.extend(std::iter::repeat(Value::Missing).take(table.height())),
                    }
                }
                Column {
                    name: name.to_string(),
                    values,
                }
            })
            .collect();

        Table {
            columns,
            index: (0..total).collect(),
        }
    }
}

// ============================================================================
// Run Report Models
// ============================================================================

/// Metadata about one reporting run.
#[derive(Debug, Clone, Serialize)]
pub struct RunMetadata {
    /// Directory the instrument files were read from.
    pub input_dir: String,
    /// When the run finished.
    pub run_date: DateTime<Utc>,
    /// Number of files parsed.
    pub files_parsed: usize,
    /// Rows in the concatenated corpus.
    pub corpus_rows: usize,
    /// Rows in the specimen summary.
    pub specimens: usize,
    /// Wall-clock duration in seconds.
    pub duration_seconds: f64,
}

/// One parsed instrument file.
#[derive(Debug, Clone, Serialize)]
pub struct ParsedFile {
    /// File name, as stored in the `File` column.
    pub name: String,
    /// Whether the file carried the instrument signature.
    pub recognized: bool,
    /// Per-channel statistics.
    pub channels: ChannelSummary,
}

/// Everything the run summary reports on.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub metadata: RunMetadata,
    pub files: Vec<ParsedFile>,
    pub statistics: Vec<ColumnStats>,
    /// Paths of the artifacts written.
    pub artifacts: Vec<String>,
    /// Charts skipped for missing columns, with the reason.
    pub skipped: Vec<String>,
}
