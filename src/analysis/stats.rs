//! Descriptive statistics over the specimen summary.

use crate::models::{Table, Value};
use serde::Serialize;

/// Mean and sample standard deviation of one numeric column.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnStats {
    pub column: String,
    pub count: usize,
    pub mean: Option<f64>,
    pub std: Option<f64>,
}

/// Describes every numeric column of the table.
///
/// A column is numeric when it has at least one number and no text.
/// Missing cells are skipped; the standard deviation uses `n - 1` and
/// needs two values.
pub fn describe(table: &Table) -> Vec<ColumnStats> {
    table
        .columns()
        .iter()
        .filter(|c| {
            c.values.iter().any(|v| matches!(v, Value::Number(_)))
                && !c.values.iter().any(|v| matches!(v, Value::Text(_)))
        })
        .map(|c| {
            let numbers: Vec<f64> = c.values.iter().filter_map(Value::as_f64).collect();
            ColumnStats {
                column: c.name.clone(),
                count: numbers.len(),
                mean: mean(&numbers),
                std: sample_std(&numbers),
            }
        })
        .collect()
}

fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

fn sample_std(values: &[f64]) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    let m = mean(values)?;
    let ss: f64 = values.iter().map(|v| (v - m).powi(2)).sum();
    Some((ss / (values.len() - 1) as f64).sqrt())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_describe_numeric_columns_only() {
        let mut table = Table::with_height(3);
        table
            .push_column(
                "Modulus",
                vec![Value::Number(2.0), Value::Number(4.0), Value::Missing],
            )
            .unwrap();
        table
            .push_column(
                "SpecimenName",
                vec![Value::from("a"), Value::from("b"), Value::from("c")],
            )
            .unwrap();
        table
            .push_column("Toughness", vec![Value::Number(1.0), Value::Missing, Value::Missing])
            .unwrap();

        let stats = describe(&table);

        assert_eq!(stats.len(), 2);
        assert_eq!(stats[0].column, "Modulus");
        assert_eq!(stats[0].count, 2);
        assert_eq!(stats[0].mean, Some(3.0));
        assert!((stats[0].std.unwrap() - 2f64.sqrt()).abs() < 1e-12);
        assert_eq!(stats[1].column, "Toughness");
        assert_eq!(stats[1].mean, Some(1.0));
        assert_eq!(stats[1].std, None);
    }

    #[test]
    fn test_describe_skips_all_missing_columns() {
        let mut table = Table::with_height(2);
        table.push_constant("Operator", Value::Missing).unwrap();
        table
            .push_constant("Operator Unit", Value::from("jdoe"))
            .unwrap();
        table
            .push_column("Modulus", vec![Value::Number(1.0), Value::Number(3.0)])
            .unwrap();

        let stats = describe(&table);

        assert_eq!(stats.len(), 1);
        assert_eq!(stats[0].column, "Modulus");
        assert_eq!(stats[0].mean, Some(2.0));
    }

    #[test]
    fn test_describe_empty_table() {
        assert!(describe(&Table::with_height(0)).is_empty());
    }
}
