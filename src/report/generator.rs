//! Markdown run summary generation.
//!
//! This module renders a [`RunReport`] as a Markdown document describing
//! which files were read, what they contained, and which artifacts the
//! run produced.

use crate::analysis::ColumnStats;
use crate::models::{ParsedFile, RunMetadata, RunReport};
use anyhow::{Context, Result};
use std::path::Path;

/// Generate a complete Markdown run summary.
pub fn generate_markdown_report(report: &RunReport) -> String {
    let mut output = String::new();

    output.push_str("# SilkReport Run Summary\n\n");

    output.push_str(&generate_metadata_section(&report.metadata));
    output.push_str(&generate_files_section(&report.files));
    output.push_str(&generate_statistics_section(&report.statistics));
    output.push_str(&generate_artifacts_section(&report.artifacts, &report.skipped));
    output.push_str(&generate_footer());

    output
}

/// Generate the metadata section.
fn generate_metadata_section(metadata: &RunMetadata) -> String {
    let mut section = String::new();

    section.push_str("## Metadata\n\n");
    section.push_str(&format!("- **Input Directory:** `{}`\n", metadata.input_dir));
    section.push_str(&format!(
        "- **Run Date:** {}\n",
        metadata.run_date.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    section.push_str(&format!("- **Files Parsed:** {}\n", metadata.files_parsed));
    section.push_str(&format!("- **Corpus Rows:** {}\n", metadata.corpus_rows));
    section.push_str(&format!("- **Specimens:** {}\n", metadata.specimens));
    section.push_str(&format!(
        "- **Duration:** {:.1}s\n",
        metadata.duration_seconds
    ));
    section.push('\n');

    section
}

fn number(value: Option<f64>) -> String {
    value.map(|v| format!("{:.4}", v)).unwrap_or_else(|| "-".to_string())
}

/// Generate the per-file section.
fn generate_files_section(files: &[ParsedFile]) -> String {
    let mut section = String::new();

    section.push_str("## Files\n\n");

    if files.is_empty() {
        section.push_str("No instrument files were found.\n\n");
        return section;
    }

    section.push_str("| File | Rows | Channels | Signature |\n");
    section.push_str("|:---|:---:|:---:|:---:|\n");
    for file in files {
        section.push_str(&format!(
            "| `{}` | {} | {} | {} |\n",
            file.name,
            file.channels.rows,
            file.channels.channels.len(),
            if file.recognized { "yes" } else { "no" }
        ));
    }
    section.push('\n');

    for file in files.iter().filter(|f| !f.channels.channels.is_empty()) {
        section.push_str(&generate_channel_block(file));
    }

    section
}

/// Generate the channel table of one file.
fn generate_channel_block(file: &ParsedFile) -> String {
    let mut block = String::new();

    block.push_str(&format!("### {}\n\n", file.name));
    block.push_str("| Channel | Count | Min | Max | Mean |\n");
    block.push_str("|:---|:---:|---:|---:|---:|\n");
    for channel in &file.channels.channels {
        block.push_str(&format!(
            "| {} | {} | {} | {} | {} |\n",
            channel.name,
            channel.count,
            number(channel.min),
            number(channel.max),
            number(channel.mean)
        ));
    }
    block.push('\n');

    block
}

/// Generate the specimen statistics section.
fn generate_statistics_section(stats: &[ColumnStats]) -> String {
    if stats.is_empty() {
        return String::new();
    }

    let mut section = String::new();

    section.push_str("## Specimen Statistics\n\n");
    section.push_str("| Column | Count | Mean | Std |\n");
    section.push_str("|:---|:---:|---:|---:|\n");
    for s in stats {
        section.push_str(&format!(
            "| {} | {} | {} | {} |\n",
            s.column,
            s.count,
            number(s.mean),
            number(s.std)
        ));
    }
    section.push('\n');

    section
}

/// Generate the artifacts section.
fn generate_artifacts_section(artifacts: &[String], skipped: &[String]) -> String {
    let mut section = String::new();

    section.push_str("## Artifacts\n\n");
    if artifacts.is_empty() {
        section.push_str("No artifacts were written.\n");
    }
    for artifact in artifacts {
        section.push_str(&format!("- `{}`\n", artifact));
    }
    section.push('\n');

    if !skipped.is_empty() {
        section.push_str("### Skipped Charts\n\n");
        for reason in skipped {
            section.push_str(&format!("- {}\n", reason));
        }
        section.push('\n');
    }

    section
}

/// Generate the report footer.
fn generate_footer() -> String {
    let mut footer = String::new();

    footer.push_str("---\n\n");
    footer.push_str(&format!(
        "*Summary generated by SilkReport v{}*\n",
        env!("CARGO_PKG_VERSION")
    ));

    footer
}

/// Generate a JSON run summary.
pub fn generate_json_report(report: &RunReport) -> Result<String> {
    serde_json::to_string_pretty(report).map_err(Into::into)
}

/// Write the run summary, as JSON when the path ends in `.json` and as
/// Markdown otherwise.
pub fn write_report(report: &RunReport, path: &Path) -> Result<()> {
    let is_json = path
        .extension()
        .map(|e| e.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    let content = if is_json {
        generate_json_report(report)?
    } else {
        generate_markdown_report(report)
    };

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }
    }

    std::fs::write(path, content)
        .with_context(|| format!("Failed to write run summary to {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::channel::parse_instrument;
    use chrono::Utc;

    const SAMPLE: &str = "EVOMECT150NanoTestDataFile\nVariables\nSpecimenName Phopha_dl_01\nModulus 7.5 GPa\n\nChannel Data\n\n\"Stress\",\"Strain\"\n\"MPa\",\"mm/mm\"\n1,0.1\n3,0.2\n";

    fn create_test_report() -> RunReport {
        let parsed = parse_instrument(SAMPLE).unwrap();

        RunReport {
            metadata: RunMetadata {
                input_dir: "230424_selected_sample".to_string(),
                run_date: Utc::now(),
                files_parsed: 1,
                corpus_rows: 2,
                specimens: 1,
                duration_seconds: 0.25,
            },
            files: vec![ParsedFile {
                name: "B_4_IS_1.txt".to_string(),
                recognized: true,
                channels: parsed.summary(),
            }],
            statistics: vec![ColumnStats {
                column: "Modulus".to_string(),
                count: 1,
                mean: Some(7.5),
                std: None,
            }],
            artifacts: vec!["./summarised_data.csv".to_string()],
            skipped: vec!["violin SpecimenType: required column(s) SpecimenType not in the table".to_string()],
        }
    }

    #[test]
    fn test_generate_markdown_report() {
        let report = create_test_report();
        let markdown = generate_markdown_report(&report);

        assert!(markdown.contains("# SilkReport Run Summary"));
        assert!(markdown.contains("## Metadata"));
        assert!(markdown.contains("- **Specimens:** 1"));
        assert!(markdown.contains("| `B_4_IS_1.txt` | 2 | 2 | yes |"));
        assert!(markdown.contains("| Stress (MPa) | 2 | 1.0000 | 3.0000 | 2.0000 |"));
        assert!(markdown.contains("| Modulus | 1 | 7.5000 | - |"));
        assert!(markdown.contains("- `./summarised_data.csv`"));
        assert!(markdown.contains("### Skipped Charts"));
    }

    #[test]
    fn test_empty_run() {
        let mut report = create_test_report();
        report.files.clear();
        report.statistics.clear();
        report.artifacts.clear();
        report.skipped.clear();

        let markdown = generate_markdown_report(&report);
        assert!(markdown.contains("No instrument files were found."));
        assert!(markdown.contains("No artifacts were written."));
        assert!(!markdown.contains("## Specimen Statistics"));
        assert!(!markdown.contains("### Skipped Charts"));
    }

    #[test]
    fn test_generate_json_report() {
        let report = create_test_report();
        let json = generate_json_report(&report).unwrap();

        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed["metadata"]["specimens"], 1);
        assert_eq!(parsed["files"][0]["channels"]["rows"], 2);
    }

    #[test]
    fn test_write_report_format_by_extension() {
        let dir = tempfile::tempdir().unwrap();
        let report = create_test_report();

        let md = dir.path().join("run.md");
        let json = dir.path().join("run.json");
        write_report(&report, &md).unwrap();
        write_report(&report, &json).unwrap();

        assert!(std::fs::read_to_string(&md).unwrap().starts_with("# SilkReport"));
        assert!(std::fs::read_to_string(&json).unwrap().starts_with('{'));
    }

    #[test]
    fn test_write_report_creates_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out").join("nested").join("run.md");

        write_report(&create_test_report(), &path).unwrap();

        assert!(path.is_file());
    }
}
