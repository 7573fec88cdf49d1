//! Command-line interface argument parsing.
//!
//! This module handles all CLI argument parsing using clap,
//! including validation. Unset options fall back to the configuration
//! file, then to built-in defaults.

use clap::Parser;
use std::path::PathBuf;

/// SilkReport - tensile-test reader and reporter for silk fibers
///
/// Parses every instrument file of a directory, keeps one row per
/// specimen, and writes a summary spreadsheet plus interactive charts.
///
/// Examples:
///   silkreport
///   silkreport --input ./230424_selected_sample --output-dir ./results
///   silkreport --input ./data --classify --summary run.md
///   silkreport --input ./data --dry-run
///   silkreport --init-config
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Args {
    /// Directory holding the instrument files
    #[arg(short, long, value_name = "DIR", env = "SILKREPORT_INPUT")]
    pub input: Option<PathBuf>,

    /// Extension of instrument files (default: txt)
    #[arg(short, long, value_name = "EXT")]
    pub extension: Option<String>,

    /// Base directory for all output artifacts
    #[arg(short, long, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// File name of the specimen summary spreadsheet
    #[arg(long, value_name = "FILE")]
    pub summary_file: Option<String>,

    /// Directory for HTML charts, relative to the output directory
    #[arg(long, value_name = "DIR")]
    pub plots_dir: Option<String>,

    /// Path to configuration file
    ///
    /// If not specified, looks for .silkreport.toml in the current directory
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Derive a SpecimenType column from the silk code in specimen names
    ///
    /// Codes: _dl, _bl, _gf, _ac, _PMS, and _N2/_N4 for draglines.
    #[arg(long)]
    pub classify: bool,

    /// Write a Markdown run summary to this file
    #[arg(long, value_name = "FILE")]
    pub summary: Option<PathBuf>,

    /// Enable verbose logging output
    #[arg(short, long)]
    pub verbose: bool,

    /// Run in quiet mode (minimal output)
    #[arg(short, long)]
    pub quiet: bool,

    /// Dry run: list the files that would be parsed and exit
    #[arg(long)]
    pub dry_run: bool,

    /// Generate a default .silkreport.toml configuration file
    #[arg(long)]
    pub init_config: bool,
}

impl Args {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate the parsed arguments.
    pub fn validate(&self) -> Result<(), String> {
        // Skip validation for --init-config
        if self.init_config {
            return Ok(());
        }

        // Check for conflicting options
        if self.verbose && self.quiet {
            return Err("Cannot use both --verbose and --quiet".to_string());
        }

        if let Some(ref ext) = self.extension {
            if ext.trim_start_matches('.').is_empty() {
                return Err("Extension must not be empty".to_string());
            }
        }

        if let Some(ref input) = self.input {
            if !input.exists() {
                return Err(format!(
                    "Input directory does not exist: {}",
                    input.display()
                ));
            }
            if !input.is_dir() {
                return Err(format!(
                    "Input path is not a directory: {}",
                    input.display()
                ));
            }
        }

        Ok(())
    }

    /// Returns the log level based on verbosity settings.
    pub fn log_level(&self) -> tracing::Level {
        if self.quiet {
            tracing::Level::ERROR
        } else if self.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_args() -> Args {
        Args {
            input: None,
            extension: None,
            output_dir: None,
            summary_file: None,
            plots_dir: None,
            config: None,
            classify: false,
            summary: None,
            verbose: false,
            quiet: false,
            dry_run: false,
            init_config: false,
        }
    }

    #[test]
    fn test_parse_flags() {
        let args = Args::try_parse_from([
            "silkreport",
            "--extension",
            "dat",
            "--output-dir",
            "out",
            "--classify",
            "--dry-run",
        ])
        .unwrap();

        assert_eq!(args.extension.as_deref(), Some("dat"));
        assert_eq!(args.output_dir, Some(PathBuf::from("out")));
        assert!(args.classify);
        assert!(args.dry_run);
        assert!(!args.init_config);
    }

    #[test]
    fn test_validation_conflicting_options() {
        let mut args = make_args();
        args.verbose = true;
        args.quiet = true;
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_validation_empty_extension() {
        let mut args = make_args();
        args.extension = Some(".".to_string());
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_validation_missing_input() {
        let mut args = make_args();
        args.input = Some(PathBuf::from("/definitely/not/a/dir"));
        assert!(args.validate().is_err());

        args.init_config = true;
        assert!(args.validate().is_ok());
    }

    #[test]
    fn test_log_level() {
        let mut args = make_args();
        assert_eq!(args.log_level(), tracing::Level::INFO);

        args.verbose = true;
        assert_eq!(args.log_level(), tracing::Level::DEBUG);

        args.verbose = false;
        args.quiet = true;
        assert_eq!(args.log_level(), tracing::Level::ERROR);
    }
}
