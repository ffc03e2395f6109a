//! CLI entry point for profiling and cleaning a CSV dataset.

use anyhow::{Result, anyhow};
use clap::Parser;
use datawash::utils::bytes_to_mb;
use datawash::{CleaningConfig, CleaningReport, Pipeline, ReportGenerator, format_number};
use dotenv::dotenv;
use polars::io::csv::read::CsvReadOptions;
use polars::prelude::*;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info};

#[cfg(feature = "ai")]
use datawash::ai::{InstructionTranslator, OpenAiTranslator};

#[derive(Parser, Debug)]
#[command(
    version,
    about = "Data-quality profiling and cleaning",
    long_about = "Profiles a CSV dataset, ranks remediation suggestions, applies a\n\
                  configured cleaning pass and reports the quality change.\n\n\
                  ENVIRONMENT VARIABLES:\n  \
                  OPENAI_API_KEY    API key for --instruction translation\n\n\
                  EXAMPLES:\n  \
                  # Profile and list suggestions only\n  \
                  datawash -i data.csv --dry-run\n\n  \
                  # Fill missing values and normalize text\n  \
                  datawash -i data.csv --handle-missing --standardize-text --text-case title\n\n  \
                  # Use a saved configuration and write reports\n  \
                  datawash -i data.csv --config cleaning.json --emit-report"
)]
struct Args {
    /// Path to the CSV file to process
    #[arg(short, long)]
    input: String,

    /// Output directory for the cleaned dataset and reports
    #[arg(short, long, default_value = "./outputs")]
    output: String,

    /// JSON cleaning configuration
    ///
    /// Flags absent from the file are disabled. Stage flags given on the
    /// command line are enabled on top of it.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Fill missing values (median for numeric columns, mode otherwise)
    #[arg(long)]
    handle_missing: bool,

    /// Remove rows that repeat an earlier row
    #[arg(long)]
    remove_duplicates: bool,

    /// Collapse whitespace and normalize case in text columns
    #[arg(long)]
    standardize_text: bool,

    /// Case applied by --standardize-text (lower, title)
    #[arg(long)]
    text_case: Option<String>,

    /// Profile and list suggestions without cleaning
    #[arg(long)]
    dry_run: bool,

    /// Output JSON to stdout instead of a human-readable summary
    ///
    /// Disables all logging; only the final JSON document is written.
    #[arg(long)]
    json: bool,

    /// Write JSON and text reports to the output directory
    ///
    /// Saved as <input_name>_report.json and <input_name>_report.txt
    #[arg(short = 'r', long)]
    emit_report: bool,

    /// Free-text instruction to translate into data commands
    ///
    /// The commands are printed for review and never executed.
    #[arg(long)]
    instruction: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// Suppress progress output (only show errors and final result)
    #[arg(short, long)]
    quiet: bool,
}

/// Initialize the tracing subscriber.
///
/// Nothing is installed in JSON mode so stdout carries only the document.
fn init_logging(level: &str, quiet: bool, json_output: bool) {
    if json_output {
        return;
    }

    use tracing_subscriber::EnvFilter;

    let effective_level = if quiet { "warn" } else { level };

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(effective_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

fn main() -> Result<()> {
    let args = Args::parse();

    init_logging(&args.log_level, args.quiet, args.json);

    // OPENAI_API_KEY may live in .env
    dotenv().ok();

    if !Path::new(&args.input).exists() {
        return Err(anyhow!("Input file not found: {}", args.input));
    }

    let config = build_config(&args)?;
    debug!("Cleaning configuration: {:?}", config);

    info!("Loading dataset from: {}", args.input);
    let data = load_csv_with_fallbacks(&args.input)?;
    info!("Dataset loaded successfully: {:?}", data.shape());

    if let Some(ref instruction) = args.instruction {
        translate_instruction(instruction, &data)?;
    }

    let pipeline = Pipeline::new(config);

    if args.dry_run {
        return run_dry_run(&args, &pipeline, &data);
    }

    run_pipeline(&pipeline, &args, &data)
}

/// Merge the optional JSON config with stage flags from the command line.
fn build_config(args: &Args) -> Result<CleaningConfig> {
    let base = match &args.config {
        Some(path) => {
            let content = std::fs::read_to_string(path)
                .map_err(|e| anyhow!("Could not read config {}: {}", path.display(), e))?;
            serde_json::from_str::<CleaningConfig>(&content)?
        }
        None => CleaningConfig::default(),
    };

    let mut builder = CleaningConfig::builder()
        .handle_missing(base.handle_missing || args.handle_missing)
        .remove_duplicates(base.remove_duplicates || args.remove_duplicates)
        .standardize_text(base.standardize_text || args.standardize_text)
        .text_case(base.text_case);

    if let Some(ref case) = args.text_case {
        builder = builder.text_case(case.as_str());
    }

    Ok(builder.build())
}

/// Show the profile and suggestions without cleaning.
///
/// Uses `println!` on purpose: this output is the point of --dry-run and
/// must show regardless of log level.
fn run_dry_run(args: &Args, pipeline: &Pipeline, data: &DataFrame) -> Result<()> {
    let (profile, suggestions) = pipeline.analyze(data)?;

    if args.json {
        let document = serde_json::json!({
            "profile": profile,
            "suggestions": suggestions,
        });
        println!("{}", serde_json::to_string_pretty(&document)?);
        return Ok(());
    }

    println!("\n{}", "=".repeat(80));
    println!("DRY RUN - Data quality profile");
    println!("{}\n", "=".repeat(80));

    let info = &profile.basic_info;
    println!("DATASET OVERVIEW");
    println!("{}", "-".repeat(40));
    println!("  File: {}", args.input);
    println!("  Rows: {}", format_number(info.row_count as i64));
    println!("  Columns: {}", info.column_count);
    println!("  Memory: {:.2} MB", bytes_to_mb(info.memory_usage_bytes));
    println!();

    println!("COLUMNS");
    println!("{}", "-".repeat(40));
    println!("{:<20} {:<12} {:<10} {:<10}", "Column", "Type", "Missing", "Missing %");
    println!("{}", "-".repeat(56));
    for column in &info.columns {
        let pct = profile
            .missing_values
            .column(&column.name)
            .map_or(0.0, |m| m.percentage);
        println!(
            "{:<20} {:<12} {:<10} {:<10.1}",
            truncate_str(&column.name, 19),
            column.dtype,
            column.null_count,
            pct
        );
    }
    println!();

    println!("ISSUES");
    println!("{}", "-".repeat(40));
    println!(
        "  Missing values: {} in {} columns",
        format_number(profile.missing_values.total_missing as i64),
        profile.missing_values.columns_with_missing
    );
    println!(
        "  Duplicate rows: {} ({:.2}%)",
        profile.duplicates.count, profile.duplicates.percentage
    );
    for outliers in &profile.outliers {
        println!(
            "  Outliers in '{}': {} outside [{:.2}, {:.2}]",
            outliers.column, outliers.count, outliers.lower_bound, outliers.upper_bound
        );
    }
    for pair in &profile.correlation_issues {
        println!(
            "  Correlated: '{}' ~ '{}' ({:.2})",
            pair.feature1, pair.feature2, pair.correlation
        );
    }
    println!();

    println!("SUGGESTIONS");
    println!("{}", "-".repeat(40));
    if suggestions.is_empty() {
        println!("  No issues found");
    } else {
        for suggestion in &suggestions {
            println!("  - [{}] {}", suggestion.priority, suggestion.title);
            println!("      {}", suggestion.description);
            println!("      -> {}", suggestion.recommendation);
        }
    }
    println!();

    let config = pipeline.config();
    println!("CLEANING STAGES");
    println!("{}", "-".repeat(40));
    println!("  Handle missing values: {}", config.handle_missing);
    println!("  Remove duplicates:     {}", config.remove_duplicates);
    println!(
        "  Standardize text:      {} (case: {})",
        config.standardize_text, config.text_case
    );
    println!();

    println!("{}", "=".repeat(80));
    println!("To clean the dataset, run without --dry-run");
    println!("{}", "=".repeat(80));

    Ok(())
}

/// Truncate a string to max length with ellipsis
fn truncate_str(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let head: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", head)
    }
}

/// Translate an instruction and print the commands for review.
#[cfg(feature = "ai")]
fn translate_instruction(instruction: &str, data: &DataFrame) -> Result<()> {
    let api_key = std::env::var("OPENAI_API_KEY")
        .map_err(|_| anyhow!("OPENAI_API_KEY must be set to use --instruction"))?;

    let translator = OpenAiTranslator::new(api_key)?;
    let columns: Vec<String> = data
        .get_column_names()
        .iter()
        .map(|name| name.to_string())
        .collect();

    info!("Translating instruction with {}", translator.name());
    let commands = match translator.translate(instruction, &columns) {
        Ok(commands) => commands,
        Err(e) if e.is_recoverable() => {
            tracing::warn!("Instruction translation failed, continuing without it: {}", e);
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };

    println!("Translated commands (not executed):");
    for command in &commands {
        println!("  - {}", command);
        if let Err(e) = command.check_columns(&columns) {
            tracing::warn!("'{}' will not apply as written: {}", command.action_name(), e);
        }
    }
    println!("{}", serde_json::to_string_pretty(&commands)?);

    Ok(())
}

#[cfg(not(feature = "ai"))]
fn translate_instruction(_instruction: &str, _data: &DataFrame) -> Result<()> {
    Err(anyhow!(
        "Instruction translation not compiled in. Build with --features ai."
    ))
}

/// Run the pipeline and emit its results.
///
/// - Default: human-readable summary
/// - `--json`: JSON document on stdout only
/// - `--emit-report`: JSON and text reports in the output directory
fn run_pipeline(pipeline: &Pipeline, args: &Args, data: &DataFrame) -> Result<()> {
    if !pipeline.config().any_stage_enabled() {
        info!("No cleaning stage enabled; the dataset will be written unchanged");
    }

    let outcome = pipeline.run(data).map_err(|e| {
        error!("Pipeline failed: {}", e);
        anyhow!("Pipeline failed: {}", e)
    })?;

    let input_stem = extract_file_stem(&args.input);
    let generator = ReportGenerator::new(PathBuf::from(&args.output));
    let output_path = generator.write_cleaned_csv(&outcome.cleaned, &input_stem)?;

    if args.emit_report {
        let json_path = generator.write_report_to_file(&outcome.report, &input_stem)?;
        let text_path = generator.write_text_report(&outcome.report, &input_stem)?;
        info!(
            "Reports written to: {}, {}",
            json_path.display(),
            text_path.display()
        );
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&outcome.document())?);
        return Ok(());
    }

    print_human_readable_summary(&outcome.report, &args.input, &output_path);
    if !outcome.suggestions.is_empty() {
        println!("Suggestions:");
        for suggestion in outcome.suggestions.iter().take(5) {
            println!("  - [{}] {}", suggestion.priority, suggestion.title);
        }
        if outcome.suggestions.len() > 5 {
            println!("  ... and {} more", outcome.suggestions.len() - 5);
        }
        println!();
    }

    println!("Use --json for machine-readable output");
    println!("Use --emit-report to save JSON and text reports");
    println!("{}", "=".repeat(80));

    Ok(())
}

/// Extract the file stem (name without extension) from a path.
fn extract_file_stem(path: &str) -> String {
    Path::new(path)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("output")
        .to_string()
}

fn print_human_readable_summary(report: &CleaningReport, input: &str, output: &Path) {
    let (rows_before, cols_before) = report.original_shape;
    let (rows_after, cols_after) = report.final_shape;

    println!();
    println!("{}", "=".repeat(80));
    println!("CLEANING COMPLETE");
    println!("{}", "=".repeat(80));
    println!();

    println!(
        "Input:  {} ({} rows x {} columns)",
        input,
        format_number(rows_before as i64),
        cols_before
    );
    println!(
        "Output: {} ({} rows x {} columns)",
        output.display(),
        format_number(rows_after as i64),
        cols_after
    );
    println!();

    println!("Summary:");
    println!("  Rows removed: {}", report.rows_removed);
    println!("  Columns removed: {}", report.columns_removed);
    println!(
        "  Missing values handled: {}",
        format_number(report.missing_values_handled as i64)
    );
    println!("  Duplicates removed: {}", report.duplicates_removed);
    println!(
        "  Quality score: {:.1} -> {:.1} ({:+.1})",
        report.quality_improvement.original_score,
        report.quality_improvement.final_score,
        report.quality_improvement.improvement
    );
    println!(
        "  Memory: {:.2} MB -> {:.2} MB ({:.1}% reduction)",
        report.memory_reduction.original_mb,
        report.memory_reduction.final_mb,
        report.memory_reduction.reduction_percent
    );
    println!();

    if report.operations_performed.is_empty() {
        println!("No changes were needed.");
    } else {
        println!("Operations:");
        for operation in &report.operations_performed {
            println!("  - {}", operation);
        }
    }
    println!();
}

/// Load CSV with multiple fallback strategies
fn load_csv_with_fallbacks(path: &str) -> Result<DataFrame> {
    match CsvReadOptions::default()
        .with_infer_schema_length(Some(100))
        .with_has_header(true)
        .with_parse_options(CsvParseOptions::default().with_quote_char(Some(b'"')))
        .try_into_reader_with_file_path(Some(PathBuf::from(path)))?
        .finish()
    {
        Ok(df) => return Ok(df),
        Err(e) => {
            debug!("Standard loading failed: {}", e);
        }
    }

    match CsvReadOptions::default()
        .with_infer_schema_length(None)
        .with_has_header(true)
        .try_into_reader_with_file_path(Some(PathBuf::from(path)))?
        .finish()
    {
        Ok(df) => return Ok(df),
        Err(e) => {
            debug!("Loading with full schema inference failed: {}", e);
        }
    }

    let content = std::fs::read_to_string(path).inspect_err(|e| {
        error!("Could not read file: {}", e);
    })?;
    let cursor = std::io::Cursor::new(clean_csv_content(&content));

    CsvReadOptions::default()
        .with_infer_schema_length(Some(100))
        .with_has_header(true)
        .into_reader_with_file_handle(cursor)
        .finish()
        .map_err(|e| e.into())
}

/// Collapse doubled quotes and drop blank lines.
fn clean_csv_content(content: &str) -> String {
    content
        .replace("\"\"\"", "\"")
        .replace("\"\"", "\"")
        .lines()
        .filter(|line| !line.trim().is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(extra: &[&str]) -> Args {
        let mut argv = vec!["datawash", "-i", "data.csv"];
        argv.extend_from_slice(extra);
        Args::parse_from(argv)
    }

    #[test]
    fn test_flags_enable_stages() {
        let config = build_config(&args(&["--handle-missing", "--text-case", "title"])).unwrap();

        assert!(config.handle_missing);
        assert!(!config.remove_duplicates);
        assert!(!config.standardize_text);
        assert_eq!(config.text_case, datawash::TextCase::Title);
    }

    #[test]
    fn test_config_file_merges_with_flags() {
        let path = std::env::temp_dir().join(format!("datawash_cli_{}.json", std::process::id()));
        std::fs::write(&path, r#"{"standardize_text": true, "text_case": "upper"}"#).unwrap();

        let path_arg = path.to_string_lossy().to_string();
        let config = build_config(&args(&["--config", &path_arg, "--remove-duplicates"])).unwrap();

        assert!(config.standardize_text);
        assert!(config.remove_duplicates);
        assert!(!config.handle_missing);
        assert_eq!(config.text_case.as_str(), "upper");

        let _ = std::fs::remove_file(path);
    }

    #[test]
    fn test_extract_file_stem() {
        assert_eq!(extract_file_stem("data/sales.csv"), "sales");
        assert_eq!(extract_file_stem(""), "output");
    }

    #[test]
    fn test_clean_csv_content_drops_blank_lines() {
        let cleaned = clean_csv_content("a,b\n\n1,\"\"x\"\"\n   \n2,y\n");
        assert_eq!(cleaned, "a,b\n1,\"x\"\n2,y");
    }

    #[test]
    fn test_truncate_str() {
        assert_eq!(truncate_str("short", 19), "short");
        assert_eq!(truncate_str("a_very_long_column_name", 10), "a_very_...");
    }
}
