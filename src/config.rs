//! Configuration file handling.
//!
//! This module handles loading and merging configuration from
//! `.silkreport.toml` files. Every path and column name the run depends on
//! lives here, so nothing downstream reads a hard-coded location.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Name of the configuration file looked up in the working directory.
pub const CONFIG_FILE_NAME: &str = ".silkreport.toml";

/// Directory scanned when nothing else is configured.
pub const DEFAULT_INPUT_DIR: &str = "230424_selected_sample";

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Input discovery settings.
    #[serde(default)]
    pub input: InputConfig,

    /// Output artifact settings.
    #[serde(default)]
    pub output: OutputConfig,

    /// Derived column settings.
    #[serde(default)]
    pub derive: DeriveConfig,

    /// Chart settings.
    #[serde(default)]
    pub plots: PlotsConfig,
}

/// Where instrument files are read from.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputConfig {
    /// Directory holding the instrument files.
    #[serde(default = "default_input_dir")]
    pub dir: PathBuf,

    /// Extension of instrument files, without the dot.
    #[serde(default = "default_extension")]
    pub extension: String,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            dir: default_input_dir(),
            extension: default_extension(),
        }
    }
}

fn default_input_dir() -> PathBuf {
    PathBuf::from(DEFAULT_INPUT_DIR)
}

fn default_extension() -> String {
    "txt".to_string()
}

/// Where output artifacts are written.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Base directory for all artifacts.
    #[serde(default = "default_output_dir")]
    pub dir: PathBuf,

    /// Specimen summary spreadsheet, relative to `dir`.
    #[serde(default = "default_summary_file")]
    pub summary_file: String,

    /// Directory for HTML charts, relative to `dir`.
    #[serde(default = "default_plots_dir")]
    pub plots_dir: String,

    /// Stress-strain line chart file name; empty disables it.
    #[serde(default = "default_line_chart_file")]
    pub line_chart_file: String,

    /// Mean/std statistics spreadsheet; not written unless set.
    #[serde(default)]
    pub statistics_file: Option<String>,

    /// Markdown run summary; not written unless set.
    #[serde(default)]
    pub run_summary: Option<PathBuf>,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: default_output_dir(),
            summary_file: default_summary_file(),
            plots_dir: default_plots_dir(),
            line_chart_file: default_line_chart_file(),
            statistics_file: None,
            run_summary: None,
        }
    }
}

fn default_output_dir() -> PathBuf {
    PathBuf::from(".")
}

fn default_summary_file() -> String {
    "summarised_data.csv".to_string()
}

fn default_plots_dir() -> String {
    "plots".to_string()
}

fn default_line_chart_file() -> String {
    "stress_strain_line_plot.html".to_string()
}

impl OutputConfig {
    /// Full path of the summary spreadsheet.
    pub fn summary_path(&self) -> PathBuf {
        self.dir.join(&self.summary_file)
    }

    /// Full path of a chart file.
    pub fn plot_path(&self, file_name: &str) -> PathBuf {
        self.dir.join(&self.plots_dir).join(file_name)
    }

    /// Full path of the statistics spreadsheet, if enabled.
    pub fn statistics_path(&self) -> Option<PathBuf> {
        self.statistics_file.as_ref().map(|f| self.dir.join(f))
    }
}

/// Derived column settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeriveConfig {
    /// Column identifying a specimen.
    #[serde(default = "default_name_column")]
    pub name_column: String,

    /// Number of leading name characters forming the species code.
    #[serde(default = "default_species_prefix_len")]
    pub species_prefix_len: usize,

    /// Add a `SpecimenType` column from the name's silk code.
    #[serde(default)]
    pub classify_specimen_type: bool,
}

impl Default for DeriveConfig {
    fn default() -> Self {
        Self {
            name_column: default_name_column(),
            species_prefix_len: default_species_prefix_len(),
            classify_specimen_type: false,
        }
    }
}

fn default_name_column() -> String {
    "SpecimenName".to_string()
}

fn default_species_prefix_len() -> usize {
    6
}

/// One violin chart: distribution of `value` split by `group`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViolinJob {
    /// Numeric attribute on the y axis.
    pub value: String,
    /// Categorical attribute on the x axis and colour.
    pub group: String,
    /// Y axis title.
    pub y_title: String,
    /// X axis and legend title.
    pub x_title: String,
    /// HTML file name inside the plots directory; `None` builds the chart
    /// without writing it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output: Option<String>,
}

/// Chart settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlotsConfig {
    /// Strain channel for the line chart x axis.
    #[serde(default = "default_strain_column")]
    pub strain_column: String,

    /// Stress channel for the line chart y axis.
    #[serde(default = "default_stress_column")]
    pub stress_column: String,

    /// Fixed x axis range of the line chart.
    #[serde(default = "default_x_range")]
    pub x_range: [f64; 2],

    /// Fixed y axis range of the line chart.
    #[serde(default = "default_y_range")]
    pub y_range: [f64; 2],

    /// Line chart trace width.
    #[serde(default = "default_line_width")]
    pub line_width: f64,

    /// Line chart font size.
    #[serde(default = "default_line_font_size")]
    pub line_font_size: u32,

    /// Violin chart font size.
    #[serde(default = "default_violin_font_size")]
    pub violin_font_size: u32,

    /// Columns shown on line chart hover, when present.
    #[serde(default = "default_hover_columns")]
    pub hover_columns: Vec<String>,

    /// Violin charts to build.
    #[serde(default = "default_violins")]
    pub violins: Vec<ViolinJob>,
}

impl Default for PlotsConfig {
    fn default() -> Self {
        Self {
            strain_column: default_strain_column(),
            stress_column: default_stress_column(),
            x_range: default_x_range(),
            y_range: default_y_range(),
            line_width: default_line_width(),
            line_font_size: default_line_font_size(),
            violin_font_size: default_violin_font_size(),
            hover_columns: default_hover_columns(),
            violins: default_violins(),
        }
    }
}

// The instrument pads header names, hence the double space.
fn default_strain_column() -> String {
    "Engineering Strain  (mm/mm)".to_string()
}

fn default_stress_column() -> String {
    "Engineering Stress  (MPa)".to_string()
}

fn default_x_range() -> [f64; 2] {
    [0.0, 0.7]
}

fn default_y_range() -> [f64; 2] {
    [0.0, 2000.0]
}

fn default_line_width() -> f64 {
    4.0
}

fn default_line_font_size() -> u32 {
    30
}

fn default_violin_font_size() -> u32 {
    20
}

fn default_hover_columns() -> Vec<String> {
    vec![
        "SpecimenName",
        "Modulus",
        "Toughness",
        "Species",
        "File",
        "SpecimenType",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

fn default_violins() -> Vec<ViolinJob> {
    vec![
        ViolinJob {
            value: "Modulus".to_string(),
            group: "Species".to_string(),
            y_title: "Modulus (GPa)".to_string(),
            x_title: "Species".to_string(),
            output: None,
        },
        ViolinJob {
            value: "Modulus".to_string(),
            group: "SpecimenType".to_string(),
            y_title: "Modulus (GPa)".to_string(),
            x_title: "Silk Type".to_string(),
            output: None,
        },
        ViolinJob {
            value: "StrainAtBreak".to_string(),
            group: "SpecimenType".to_string(),
            y_title: "StrainAtBreak (MPa)".to_string(),
            x_title: "Silk Type".to_string(),
            output: Some("strainatbreak_specimentype_violin_plot.html".to_string()),
        },
    ]
}

impl Config {
    /// Load configuration from a file path.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Resolve the configuration for a run.
    ///
    /// An explicit path must load. Otherwise `.silkreport.toml` in `dir`
    /// is used when present; if it cannot be parsed a warning is logged and
    /// the defaults apply.
    pub fn discover(explicit: Option<&Path>, dir: &Path) -> Result<Self> {
        if let Some(path) = explicit {
            info!("Loading config from: {}", path.display());
            return Self::load(path);
        }

        let default_path = dir.join(CONFIG_FILE_NAME);
        if !default_path.exists() {
            debug!("No config file found, using defaults");
            return Ok(Self::default());
        }

        match Self::load(&default_path) {
            Ok(config) => {
                info!("Loaded default config from {}", default_path.display());
                Ok(config)
            }
            Err(e) => {
                warn!("Failed to load config: {:#}", e);
                Ok(Self::default())
            }
        }
    }

    /// Merge this configuration with CLI arguments.
    ///
    /// CLI arguments take precedence over config file settings.
    /// This method only overrides config when CLI provides explicit values.
    pub fn merge_with_args(&mut self, args: &crate::cli::Args) {
        if let Some(ref input) = args.input {
            self.input.dir = input.clone();
        }
        if let Some(ref extension) = args.extension {
            self.input.extension = extension.trim_start_matches('.').to_string();
        }

        if let Some(ref dir) = args.output_dir {
            self.output.dir = dir.clone();
        }
        if let Some(ref file) = args.summary_file {
            self.output.summary_file = file.clone();
        }
        if let Some(ref dir) = args.plots_dir {
            self.output.plots_dir = dir.clone();
        }
        if let Some(ref path) = args.summary {
            self.output.run_summary = Some(path.clone());
        }

        // Flags always override
        if args.classify {
            self.derive.classify_specimen_type = true;
        }
    }

    /// Generate a default configuration file content.
    pub fn default_toml() -> String {
        let config = Config::default();
        toml::to_string_pretty(&config).unwrap_or_else(|_| String::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.input.dir, PathBuf::from("230424_selected_sample"));
        assert_eq!(config.input.extension, "txt");
        assert_eq!(config.derive.species_prefix_len, 6);
        assert!(!config.derive.classify_specimen_type);
        assert_eq!(config.plots.x_range, [0.0, 0.7]);
        assert_eq!(config.plots.y_range, [0.0, 2000.0]);
        assert_eq!(config.plots.violins.len(), 3);
        assert!(config.output.statistics_file.is_none());
    }

    #[test]
    fn test_parse_config() {
        let toml_content = r#"
[input]
dir = "data/run1"
extension = "dat"

[output]
dir = "out"
statistics_file = "stats.csv"

[derive]
classify_specimen_type = true

[plots]
x_range = [0.0, 0.5]

[[plots.violins]]
value = "Toughness"
group = "Species"
y_title = "Toughness (MPa)"
x_title = "Species"
output = "toughness_violin_plot.html"
"#;

        let config: Config = toml::from_str(toml_content).unwrap();
        assert_eq!(config.input.dir, PathBuf::from("data/run1"));
        assert_eq!(config.input.extension, "dat");
        assert_eq!(config.output.summary_path(), PathBuf::from("out/summarised_data.csv"));
        assert_eq!(config.output.statistics_path(), Some(PathBuf::from("out/stats.csv")));
        assert!(config.derive.classify_specimen_type);
        assert_eq!(config.derive.name_column, "SpecimenName");
        assert_eq!(config.plots.x_range, [0.0, 0.5]);
        assert_eq!(config.plots.y_range, [0.0, 2000.0]);
        assert_eq!(config.plots.violins.len(), 1);
        assert_eq!(config.plots.violins[0].value, "Toughness");
    }

    #[test]
    fn test_plot_path() {
        let output = OutputConfig::default();
        assert_eq!(
            output.plot_path("a.html"),
            PathBuf::from("./plots/a.html")
        );
    }

    #[test]
    fn test_default_toml_generation() {
        let toml_str = Config::default_toml();
        assert!(!toml_str.is_empty());
        assert!(toml_str.contains("[input]"));
        assert!(toml_str.contains("[output]"));
        assert!(toml_str.contains("[derive]"));
        assert!(toml_str.contains("violins"));

        let reparsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(reparsed.plots.violins, Config::default().plots.violins);
    }

    const FILE_CONFIG: &str = r#"
[input]
dir = "file_in"
extension = "txt"

[output]
dir = "file_out"
summary_file = "file_summary.csv"
plots_dir = "file_plots"
run_summary = "file_run.md"

[derive]
classify_specimen_type = true
"#;

    fn args(argv: &[&str]) -> crate::cli::Args {
        use clap::Parser;
        let mut full = vec!["silkreport"];
        full.extend_from_slice(argv);
        crate::cli::Args::try_parse_from(full).unwrap()
    }

    #[test]
    fn test_cli_values_override_file() {
        let mut config: Config = toml::from_str(FILE_CONFIG).unwrap();
        config.merge_with_args(&args(&[
            "--input",
            "cli_in",
            "--extension",
            ".dat",
            "--output-dir",
            "cli_out",
            "--summary",
            "cli_run.md",
            "--classify",
        ]));

        assert_eq!(config.input.dir, PathBuf::from("cli_in"));
        assert_eq!(config.input.extension, "dat");
        assert_eq!(config.output.dir, PathBuf::from("cli_out"));
        assert_eq!(config.output.run_summary, Some(PathBuf::from("cli_run.md")));
        assert!(config.derive.classify_specimen_type);

        // not given on the command line
        assert_eq!(config.output.summary_file, "file_summary.csv");
        assert_eq!(config.output.plots_dir, "file_plots");
    }

    #[test]
    fn test_unset_cli_values_keep_file_values() {
        let mut config: Config = toml::from_str(FILE_CONFIG).unwrap();
        config.merge_with_args(&args(&["--input", "cli_in"]));

        assert_eq!(config.input.dir, PathBuf::from("cli_in"));
        assert_eq!(config.input.extension, "txt");
        assert_eq!(config.output.dir, PathBuf::from("file_out"));
        assert_eq!(config.output.run_summary, Some(PathBuf::from("file_run.md")));
        // an absent --classify does not clear the file's setting
        assert!(config.derive.classify_specimen_type);
    }

    #[test]
    fn test_discover_uses_file_in_directory() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(CONFIG_FILE_NAME), FILE_CONFIG).unwrap();

        let config = Config::discover(None, dir.path()).unwrap();
        assert_eq!(config.input.dir, PathBuf::from("file_in"));
    }

    #[test]
    fn test_discover_without_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();

        let config = Config::discover(None, dir.path()).unwrap();
        assert_eq!(config.input.dir, PathBuf::from(DEFAULT_INPUT_DIR));
    }

    #[test]
    fn test_discover_broken_default_file_falls_back() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(CONFIG_FILE_NAME), "[input\ndir = ").unwrap();

        let config = Config::discover(None, dir.path()).unwrap();
        assert_eq!(config.input.dir, PathBuf::from(DEFAULT_INPUT_DIR));
        assert_eq!(config.output.summary_file, "summarised_data.csv");
    }

    #[test]
    fn test_discover_broken_explicit_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("custom.toml");
        std::fs::write(&path, "[input\ndir = ").unwrap();

        assert!(Config::discover(Some(&path), dir.path()).is_err());
        assert!(Config::discover(Some(&dir.path().join("absent.toml")), dir.path()).is_err());
    }
}
