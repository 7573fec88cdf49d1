//! Derived specimen attributes.
//!
//! Adds `Species`, `File`, `FirstLetter` and, when enabled, `SpecimenType`
//! columns computed from the specimen name.

use super::AnalysisError;
use crate::config::DeriveConfig;
use crate::models::{Table, Value};
use serde::Serialize;
use std::fmt;

pub const SPECIES_COLUMN: &str = "Species";
pub const FILE_COLUMN: &str = "File";
pub const FIRST_LETTER_COLUMN: &str = "FirstLetter";
pub const SPECIMEN_TYPE_COLUMN: &str = "SpecimenType";

/// Silk type encoded in a specimen name by an underscore-prefixed code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum SpecimenType {
    /// `_dl`
    Dragline,
    /// `_bl`
    BridgingLine,
    /// `_gf`
    Gumfoot,
    /// `_ac`
    Aciniform,
    /// `_PMS`
    Pms,
    /// `_N2`, a single-thread dragline.
    SimpleDragline,
    /// `_N4`, a bundled dragline.
    BundleDragline,
}

impl SpecimenType {
    /// Primary silk codes, matched after an underscore.
    const CODES: [(&'static str, SpecimenType); 5] = [
        ("dl", SpecimenType::Dragline),
        ("bl", SpecimenType::BridgingLine),
        ("gf", SpecimenType::Gumfoot),
        ("PMS", SpecimenType::Pms),
        ("ac", SpecimenType::Aciniform),
    ];

    /// Dragline refinements.
    const DRAGLINE_CODES: [(&'static str, SpecimenType); 2] = [
        ("N2", SpecimenType::SimpleDragline),
        ("N4", SpecimenType::BundleDragline),
    ];

    /// Classifies a specimen name.
    ///
    /// The leftmost `_<code>` wins. A dragline, or a name with no primary
    /// code, is refined by a `_N2`/`_N4` marker when one is present.
    pub fn classify(name: &str) -> Option<Self> {
        let primary = first_code(name, &Self::CODES);
        match primary {
            Some(SpecimenType::Dragline) | None => {
                first_code(name, &Self::DRAGLINE_CODES).or(primary)
            }
            other => other,
        }
    }

    /// Human-readable label used in charts and the spreadsheet.
    pub fn label(&self) -> &'static str {
        match self {
            SpecimenType::Dragline => "Dragline",
            SpecimenType::BridgingLine => "Bridging line",
            SpecimenType::Gumfoot => "Gumfoot",
            SpecimenType::Aciniform => "Aciniform",
            SpecimenType::Pms => "PMS",
            SpecimenType::SimpleDragline => "Simple dragline",
            SpecimenType::BundleDragline => "Bundle dragline",
        }
    }
}

impl fmt::Display for SpecimenType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

fn first_code(name: &str, codes: &[(&str, SpecimenType)]) -> Option<SpecimenType> {
    name.match_indices('_').find_map(|(pos, _)| {
        let rest = &name[pos + 1..];
        codes
            .iter()
            .find(|(code, _)| rest.starts_with(code))
            .map(|(_, t)| *t)
    })
}

/// Adds the per-file columns to a freshly parsed table.
///
/// Text metadata reaches the table through its `<key> Unit` column, so
/// the specimen name is restored from `<name> Unit` first. Then `Species`
/// (name prefix), `File` and, if enabled, `SpecimenType` are added.
pub fn derive_file_columns(
    table: &mut Table,
    file_name: &str,
    config: &DeriveConfig,
) -> Result<(), AnalysisError> {
    let name_column = config.name_column.as_str();
    let unit_column = format!("{} Unit", name_column);

    if let Some(unit) = table.column(&unit_column) {
        let values = unit.values.clone();
        table.set_column(name_column, values)?;
    }

    let names = table
        .column(name_column)
        .ok_or_else(|| AnalysisError::MissingColumn(name_column.to_string()))?
        .values
        .clone();

    let species = names
        .iter()
        .map(|name| match name {
            Value::Text(s) => Value::Text(s.chars().take(config.species_prefix_len).collect()),
            _ => Value::Missing,
        })
        .collect();
    table.set_column(SPECIES_COLUMN, species)?;

    table.set_column(FILE_COLUMN, vec![Value::from(file_name); table.height()])?;

    if config.classify_specimen_type {
        let types = names
            .iter()
            .map(|name| {
                name.as_str()
                    .and_then(SpecimenType::classify)
                    .map(|t| Value::from(t.label()))
                    .unwrap_or(Value::Missing)
            })
            .collect();
        table.set_column(SPECIMEN_TYPE_COLUMN, types)?;
    }

    Ok(())
}

/// Adds `FirstLetter`, the first character of each specimen name.
pub fn add_first_letter(corpus: &mut Table, name_column: &str) -> Result<(), AnalysisError> {
    let letters = corpus
        .column(name_column)
        .ok_or_else(|| AnalysisError::MissingColumn(name_column.to_string()))?
        .values
        .iter()
        .map(|name| {
            name.as_str()
                .and_then(|s| s.chars().next())
                .map(|c| Value::Text(c.to_string()))
                .unwrap_or(Value::Missing)
        })
        .collect();

    corpus.set_column(FIRST_LETTER_COLUMN, letters)?;
    Ok(())
}
