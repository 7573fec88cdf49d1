//! Spreadsheet export of the specimen summary.
//!
//! Tables are written as CSV with a leading unnamed column holding the
//! row labels, so each summary row can be traced back to the corpus.

use crate::analysis::ColumnStats;
use crate::models::{Table, Value};
use anyhow::{Context, Result};
use std::io::Write;
use std::path::Path;

fn cell(value: &Value) -> String {
    value.to_string()
}

fn optional(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

fn create_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }
    }
    Ok(())
}

/// Write a table, header first, one record per row.
pub fn write_table<W: Write>(table: &Table, writer: W) -> Result<()> {
    let mut csv = csv::Writer::from_writer(writer);

    let mut header = vec![String::new()];
    header.extend(table.column_names().into_iter().map(String::from));
    csv.write_record(&header)?;

    for (row, label) in table.index().iter().enumerate() {
        let mut record = vec![label.to_string()];
        record.extend(table.columns().iter().map(|c| cell(&c.values[row])));
        csv.write_record(&record)?;
    }

    csv.flush()?;
    Ok(())
}

/// Write the specimen summary to `path`.
pub fn write_summary(table: &Table, path: &Path) -> Result<()> {
    create_parent(path)?;
    let file = std::fs::File::create(path)
        .with_context(|| format!("Failed to create spreadsheet: {}", path.display()))?;
    write_table(table, file)
        .with_context(|| format!("Failed to write spreadsheet: {}", path.display()))
}

/// Write mean and standard deviation rows, one column per statistic.
pub fn write_statistics(stats: &[ColumnStats], path: &Path) -> Result<()> {
    create_parent(path)?;
    let file = std::fs::File::create(path)
        .with_context(|| format!("Failed to create statistics file: {}", path.display()))?;
    let mut csv = csv::Writer::from_writer(file);

    let mut header = vec![String::new()];
    header.extend(stats.iter().map(|s| s.column.clone()));
    csv.write_record(&header)?;

    let mut mean = vec!["mean".to_string()];
    mean.extend(stats.iter().map(|s| optional(s.mean)));
    csv.write_record(&mean)?;

    let mut std = vec!["std".to_string()];
    std.extend(stats.iter().map(|s| optional(s.std)));
    csv.write_record(&std)?;

    csv.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary() -> Table {
        let mut table = Table::with_height(3);
        table
            .push_column(
                "SpecimenName",
                vec![Value::from("A"), Value::from("B, 2"), Value::from("C")],
            )
            .unwrap();
        table
            .push_column(
                "Modulus",
                vec![Value::Number(5.5), Value::Missing, Value::Number(7.0)],
            )
            .unwrap();
        table.take(&[0, 2])
    }

    #[test]
    fn test_write_table_with_row_labels() {
        let mut buffer = Vec::new();
        write_table(&summary(), &mut buffer).unwrap();

        let text = String::from_utf8(buffer).unwrap();
        assert_eq!(text, ",SpecimenName,Modulus\n0,A,5.5\n2,C,7\n");
    }

    #[test]
    fn test_write_table_quotes_and_missing() {
        let mut table = Table::with_height(1);
        table.push_column("Name", vec![Value::from("B, 2")]).unwrap();
        table.push_column("Modulus", vec![Value::Missing]).unwrap();

        let mut buffer = Vec::new();
        write_table(&table, &mut buffer).unwrap();

        let text = String::from_utf8(buffer).unwrap();
        assert_eq!(text, ",Name,Modulus\n0,\"B, 2\",\n");
    }

    #[test]
    fn test_write_summary_and_statistics() {
        let dir = tempfile::tempdir().unwrap();
        let summary_path = dir.path().join("out").join("summarised_data.csv");
        let stats_path = dir.path().join("stats.csv");

        write_summary(&summary(), &summary_path).unwrap();
        write_statistics(
            &[ColumnStats {
                column: "Modulus".to_string(),
                count: 2,
                mean: Some(6.25),
                std: None,
            }],
            &stats_path,
        )
        .unwrap();

        let mut reader = csv::Reader::from_path(&summary_path).unwrap();
        assert_eq!(reader.records().count(), 2);

        let stats = std::fs::read_to_string(&stats_path).unwrap();
        assert_eq!(stats, ",Modulus\nmean,6.25\nstd,\n");
    }
}
