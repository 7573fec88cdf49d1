//! SilkReport - tensile-test reader and reporter for silk fibers
//!
//! Reads every instrument file of a directory, reduces the readings to one
//! row per specimen, and writes a summary spreadsheet plus interactive
//! stress-strain and violin charts.
//!
//! Exit codes:
//!   0 - Success
//!   1 - Runtime error (malformed file, missing column, I/O failure, etc.)

mod analysis;
mod cli;
mod color;
mod config;
mod models;
mod parser;
mod report;
mod scanner;

use anyhow::{bail, Context, Result};
use chrono::Utc;
use cli::Args;
use config::{Config, CONFIG_FILE_NAME};
use indicatif::{ProgressBar, ProgressStyle};
use models::{ParsedFile, RunMetadata, RunReport, Table};
use scanner::{FileScanner, ScannedFile};
use std::path::Path;
use std::time::Instant;
use tracing::{debug, error, info, warn};
use tracing_subscriber::FmtSubscriber;

fn main() -> Result<()> {
    // Parse command-line arguments
    let args = Args::parse_args();

    // Validate arguments
    if let Err(e) = args.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    // Handle --init-config early (no logging needed)
    if args.init_config {
        return handle_init_config();
    }

    // Initialize logging
    init_logging(&args);

    info!("SilkReport v{}", env!("CARGO_PKG_VERSION"));
    debug!("Arguments: {:?}", args);

    match run(args) {
        Ok(exit_code) => {
            std::process::exit(exit_code);
        }
        Err(e) => {
            error!("Run failed: {:#}", e);
            eprintln!("\n❌ Error: {:#}", e);
            std::process::exit(1);
        }
    }
}

/// Handle --init-config: generate a default .silkreport.toml.
fn handle_init_config() -> Result<()> {
    let path = Path::new(CONFIG_FILE_NAME);

    if path.exists() {
        eprintln!(
            "⚠️  {} already exists. Remove it first or edit it manually.",
            CONFIG_FILE_NAME
        );
        std::process::exit(1);
    }

    let content = Config::default_toml();
    std::fs::write(path, &content)
        .with_context(|| format!("Failed to write {}", CONFIG_FILE_NAME))?;

    println!("✅ Created {} with default settings.", CONFIG_FILE_NAME);
    println!("   Edit it to customize paths, derived columns, and charts.");
    Ok(())
}

/// Initialize logging based on verbosity settings.
fn init_logging(args: &Args) {
    let level = args.log_level();

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
    }
}

/// Run the complete read-summarize-report workflow. Returns the exit code.
fn run(args: Args) -> Result<i32> {
    // Load configuration
    let mut config = load_config(&args)?;
    config.merge_with_args(&args);

    // Handle --dry-run: scan files and exit
    if args.dry_run {
        let file_scanner = FileScanner::new(scanner::ScanConfig::from(&config.input));
        return handle_dry_run(&file_scanner);
    }

    let run_report = execute(&config, args.quiet)?;
    let metadata = &run_report.metadata;

    // Print summary
    println!("\n📊 Run Summary:");
    println!("   Files parsed: {}", metadata.files_parsed);
    println!("   Corpus rows: {}", metadata.corpus_rows);
    println!("   Specimens: {}", metadata.specimens);
    println!("   Artifacts written: {}", run_report.artifacts.len());
    if !run_report.skipped.is_empty() {
        println!("   Charts skipped: {}", run_report.skipped.len());
    }
    println!("   Duration: {:.1}s", metadata.duration_seconds);
    println!("\n✅ Done!");

    Ok(0)
}

/// Scan, parse, summarize and write every artifact for one configuration.
///
/// Charts whose columns are missing are listed in `skipped`; everything
/// else that goes wrong is an error.
fn execute(config: &Config, quiet: bool) -> Result<RunReport> {
    let start_time = Instant::now();
    let file_scanner = FileScanner::new(scanner::ScanConfig::from(&config.input));

    // Step 1: Discover instrument files
    println!(
        "📂 Scanning {} for *.{} files",
        file_scanner.input_dir().display(),
        config.input.extension
    );
    let files = file_scanner.scan()?;
    if files.is_empty() {
        bail!(
            "No *.{} files found in {}",
            config.input.extension,
            file_scanner.input_dir().display()
        );
    }
    info!("Found {} instrument files", files.len());

    // Step 2: Parse each file and add per-file columns
    let (tables, parsed_files) = parse_all(&files, config, quiet)?;

    // Step 3: Build the corpus and the specimen summary
    let name_column = config.derive.name_column.as_str();
    let mut corpus = analysis::concat_tables(&tables);
    drop(tables);
    analysis::add_first_letter(&mut corpus, name_column)?;
    info!(
        "Corpus: {} rows, {} columns",
        corpus.height(),
        corpus.width()
    );

    let summary = analysis::summarize_specimens(&corpus, name_column)?;
    info!("Summary: {} specimens", summary.height());

    let statistics = analysis::describe(&summary);
    for s in &statistics {
        debug!(
            "{}: n={} mean={:?} std={:?}",
            s.column, s.count, s.mean, s.std
        );
    }

    // Step 4: Write artifacts
    let mut artifacts = Vec::new();
    let mut skipped = Vec::new();

    let summary_path = config.output.summary_path();
    report::write_summary(&summary, &summary_path)?;
    println!("📄 Summary written to {}", summary_path.display());
    artifacts.push(summary_path.display().to_string());

    if let Some(stats_path) = config.output.statistics_path() {
        report::write_statistics(&statistics, &stats_path)?;
        println!("📄 Statistics written to {}", stats_path.display());
        artifacts.push(stats_path.display().to_string());
    }

    write_charts(&corpus, &summary, config, &mut artifacts, &mut skipped)?;

    let mut run_report = RunReport {
        metadata: RunMetadata {
            input_dir: file_scanner.input_dir().display().to_string(),
            run_date: Utc::now(),
            files_parsed: parsed_files.len(),
            corpus_rows: corpus.height(),
            specimens: summary.height(),
            duration_seconds: start_time.elapsed().as_secs_f64(),
        },
        files: parsed_files,
        statistics,
        artifacts,
        skipped,
    };

    // Step 5: Optional run summary
    if let Some(ref path) = config.output.run_summary {
        report::write_report(&run_report, path)?;
        println!("📝 Run summary written to {}", path.display());
        run_report.artifacts.push(path.display().to_string());
    }

    Ok(run_report)
}

/// Parse every scanned file into a table carrying its derived columns.
fn parse_all(
    files: &[ScannedFile],
    config: &Config,
    quiet: bool,
) -> Result<(Vec<Table>, Vec<ParsedFile>)> {
    let progress = if quiet {
        ProgressBar::hidden()
    } else {
        ProgressBar::new(files.len() as u64)
    };
    progress.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:30.cyan/blue}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=>-"),
    );

    let mut tables = Vec::with_capacity(files.len());
    let mut parsed_files = Vec::with_capacity(files.len());

    for file in files {
        progress.set_message(file.name.clone());
        debug!("Parsing {} ({} bytes)", file.path.display(), file.size);

        let parsed = parser::parse_file(&file.path)
            .with_context(|| format!("Failed to parse {}", file.name))?;
        if !parsed.recognized {
            warn!("{} does not start with the instrument signature", file.name);
        }

        let channels = parsed.summary();
        for c in &channels.channels {
            debug!(
                "{} / {}: n={} min={:?} max={:?} mean={:?}",
                file.name, c.name, c.count, c.min, c.max, c.mean
            );
        }

        let mut table = parsed.table;
        analysis::derive_file_columns(&mut table, &file.name, &config.derive)
            .with_context(|| format!("Failed to derive columns for {}", file.name))?;

        tables.push(table);
        parsed_files.push(ParsedFile {
            name: file.name.clone(),
            recognized: parsed.recognized,
            channels,
        });
        progress.inc(1);
    }

    progress.finish_and_clear();
    Ok((tables, parsed_files))
}

/// Build the line chart and every violin job, writing those with an output.
///
/// A chart whose columns are missing is skipped with a warning.
fn write_charts(
    corpus: &Table,
    summary: &Table,
    config: &Config,
    artifacts: &mut Vec<String>,
    skipped: &mut Vec<String>,
) -> Result<()> {
    let plots = &config.plots;

    match report::line_chart(corpus, plots, &config.derive.name_column) {
        Ok(figure) => {
            if !config.output.line_chart_file.is_empty() {
                let path = config.output.plot_path(&config.output.line_chart_file);
                report::write_html(&figure, &path)?;
                println!("📈 Line chart written to {}", path.display());
                artifacts.push(path.display().to_string());
            }
        }
        Err(e) => {
            warn!("Skipping stress-strain line chart: {}", e);
            skipped.push(format!("stress-strain line chart: {}", e));
        }
    }

    for job in &plots.violins {
        let figure = match report::violin_chart(summary, job, plots.violin_font_size) {
            Ok(figure) => figure,
            Err(e) => {
                warn!("Skipping {} by {} violin chart: {}", job.value, job.group, e);
                skipped.push(format!("{} by {} violin chart: {}", job.value, job.group, e));
                continue;
            }
        };
        debug!(
            "Built {} by {} violin chart with {} groups",
            job.value,
            job.group,
            figure.data.len()
        );

        if let Some(ref file_name) = job.output {
            let path = config.output.plot_path(file_name);
            report::write_html(&figure, &path)?;
            println!("📈 Violin chart written to {}", path.display());
            artifacts.push(path.display().to_string());
        }
    }

    Ok(())
}

/// Handle --dry-run: scan files, print what would be parsed, exit.
fn handle_dry_run(file_scanner: &FileScanner) -> Result<i32> {
    println!("\n🔍 Dry run: scanning files (nothing is written)...\n");

    let files = file_scanner.scan()?;

    if files.is_empty() {
        println!("   No matching instrument files found.");
    } else {
        println!("   Found {} files that would be parsed:\n", files.len());
        for file in &files {
            let signature = match std::fs::read_to_string(&file.path) {
                Ok(text) if parser::looks_like_instrument_file(&text) => "",
                Ok(_) => "  ⚠️  no instrument signature",
                Err(_) => "  ⚠️  unreadable",
            };
            println!("     📄 {} ({} bytes){}", file.name, file.size, signature);
        }
        println!("\n   Total: {} files", files.len());
    }

    println!("\n✅ Dry run complete. No artifacts were written.");
    Ok(0)
}

/// Load configuration from file or use defaults.
fn load_config(args: &Args) -> Result<Config> {
    Config::discover(args.config.as_deref(), Path::new("."))
}
