//! Corpus aggregation.
//!
//! This module stacks per-file tables into one corpus and reduces the
//! corpus to one row per specimen.

use super::AnalysisError;
use crate::models::{Table, Value};
use std::collections::{BTreeSet, HashMap};

/// Concatenate per-file tables, preserving their order.
pub fn concat_tables(tables: &[Table]) -> Table {
    Table::concat(tables)
}

/// Keep only the last row of every distinct specimen name.
///
/// This is positional deduplication, not a statistical reduction: the
/// kept row is whichever came last in corpus order. Kept rows stay in
/// corpus order and keep their corpus row labels. Missing names count as
/// one name.
pub fn summarize_specimens(corpus: &Table, name_column: &str) -> Result<Table, AnalysisError> {
    let names = &corpus
        .column(name_column)
        .ok_or_else(|| AnalysisError::MissingColumn(name_column.to_string()))?
        .values;

    let mut last_row: HashMap<&Value, usize> = HashMap::new();
    for (row, name) in names.iter().enumerate() {
        last_row.insert(name, row);
    }

    let keep: Vec<usize> = names
        .iter()
        .enumerate()
        .filter(|(row, name)| last_row.get(name) == Some(row))
        .map(|(row, _)| row)
        .collect();

    Ok(corpus.take(&keep))
}

/// Sorted distinct values of a column, used for category order.
pub fn distinct_values(table: &Table, column: &str) -> Vec<Value> {
    table
        .column(column)
        .map(|c| {
            c.values
                .iter()
                .cloned()
                .collect::<BTreeSet<_>>()
                .into_iter()
                .collect()
        })
        .unwrap_or_default()
}
