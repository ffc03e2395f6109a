//! Integration tests for profiling, suggestions, cleaning and reporting.
//!
//! These tests exercise the public API end to end on small frames and on
//! the CSV fixture.

use datawash::ai::{DataCommand, parse_commands};
use datawash::reporting::quality_score;
use datawash::{
    CleaningConfig, CleaningError, DataProfiler, Pipeline, Priority, ReportGenerator,
    SuggestionEngine, TextCase, clean,
};
use polars::io::csv::read::CsvReadOptions;
use polars::prelude::*;
use pretty_assertions::assert_eq;
use std::path::PathBuf;

// ============================================================================
// Helper Functions
// ============================================================================

fn fixtures_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")
}

fn load_csv(filename: &str) -> DataFrame {
    let path = fixtures_path().join(filename);
    CsvReadOptions::default()
        .with_has_header(true)
        .try_into_reader_with_file_path(Some(path))
        .expect("Failed to create CSV reader")
        .finish()
        .expect("Failed to read CSV file")
}

fn worked_example() -> DataFrame {
    df![
        "age" => [Some(25i64), Some(30), None, Some(30)],
        "city" => ["NY", " ny", "LA", "LA"],
    ]
    .unwrap()
}

fn lower_text_config() -> CleaningConfig {
    CleaningConfig::builder()
        .handle_missing(true)
        .standardize_text(true)
        .text_case(TextCase::Lower)
        .build()
}

// ============================================================================
// Worked Example
// ============================================================================

#[test]
fn test_worked_example_profile() {
    let profile = DataProfiler::profile(&worked_example()).unwrap();

    let age = profile.missing_values.column("age").unwrap();
    assert_eq!(age.count, 1);
    assert_eq!(age.percentage, 25.0);
    assert_eq!(profile.duplicates.count, 0);

    let city = profile.categorical_for("city").unwrap();
    assert_eq!(city.case_groups.len(), 1);
    assert_eq!(city.case_groups[0].normalized, "ny");
    assert_eq!(city.case_groups[0].variants, vec!["NY", " ny"]);
    assert!(city.whitespace_issues);
}

#[test]
fn test_worked_example_clean() {
    let df = worked_example();
    let result = clean(&df, &lower_text_config()).unwrap();

    let expected = df![
        "age" => [25.0f64, 30.0, 30.0, 30.0],
        "city" => ["ny", "ny", "la", "la"],
    ]
    .unwrap();
    assert!(result.data.equals(&expected));

    assert_eq!(
        result.log.operations,
        vec![
            "Filled 1 missing values in 'age' with median".to_string(),
            "Standardized 4 values in 'city' (whitespace cleaned + lower case)".to_string(),
        ]
    );

    // Rows 3 and 4 become identical once cleaned.
    let cleaned_profile = DataProfiler::profile(&result.data).unwrap();
    assert_eq!(cleaned_profile.duplicates.count, 1);
    assert_eq!(cleaned_profile.duplicates.duplicate_indices, vec![3]);

    // Caller's frame is untouched.
    assert!(df.equals_missing(&worked_example()));
}

// ============================================================================
// Profile Properties
// ============================================================================

#[test]
fn test_missing_counts_sum_to_total() {
    let df = load_csv("customers.csv");
    let profile = DataProfiler::profile(&df).unwrap();

    let sum: usize = profile
        .missing_values
        .by_column
        .iter()
        .map(|c| c.count)
        .sum();
    assert_eq!(sum, profile.missing_values.total_missing);
    assert_eq!(profile.missing_values.total_missing, 2);
    assert_eq!(profile.missing_values.columns_with_missing, 2);
}

#[test]
fn test_fixture_duplicates_and_basic_info() {
    let df = load_csv("customers.csv");
    let profile = DataProfiler::profile(&df).unwrap();

    assert_eq!(profile.basic_info.row_count, 8);
    assert_eq!(profile.basic_info.column_count, 4);
    assert_eq!(profile.duplicates.count, 1);
    assert_eq!(profile.duplicates.duplicate_indices, vec![6]);
    assert_eq!(profile.duplicates.percentage, 12.5);
}

#[test]
fn test_outlier_bounds_are_ordered() {
    let df = df![
        "score" => [1.0f64, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0, 1000.0],
        "delta" => [-500.0f64, 1.0, 2.0, 2.0, 3.0, 3.0, 3.0, 4.0, 5.0, 6.0],
    ]
    .unwrap();
    let profile = DataProfiler::profile(&df).unwrap();

    assert_eq!(profile.outliers.len(), 2);
    for outliers in &profile.outliers {
        assert!(outliers.lower_bound <= outliers.q1);
        assert!(outliers.q1 <= outliers.q3);
        assert!(outliers.q3 <= outliers.upper_bound);
        assert!(outliers.count > 0);
    }

    assert_eq!(profile.outliers_for("score").unwrap().outlier_indices, vec![9]);
    assert_eq!(profile.outliers_for("delta").unwrap().outlier_indices, vec![0]);
}

// ============================================================================
// Suggestions
// ============================================================================

#[test]
fn test_suggestions_sorted_by_priority() {
    let df = load_csv("customers.csv");
    let profile = DataProfiler::profile(&df).unwrap();
    let suggestions = SuggestionEngine::new().suggest(&df, &profile);

    assert!(!suggestions.is_empty());
    for pair in suggestions.windows(2) {
        assert!(pair[0].priority.weight() >= pair[1].priority.weight());
    }
}

#[test]
fn test_clean_dataset_has_no_suggestions() {
    let df = df![
        "x" => [1.5f64, 2.5, 3.5, 4.25],
        "y" => [4.1f64, 1.2, 3.3, 2.7],
    ]
    .unwrap();
    let profile = DataProfiler::profile(&df).unwrap();

    assert!(SuggestionEngine::new().suggest(&df, &profile).is_empty());
}

#[test]
fn test_high_missing_is_high_priority() {
    let df = df!["mostly_empty" => [None, None, None, Some(1i64)]].unwrap();
    let profile = DataProfiler::profile(&df).unwrap();
    let suggestions = SuggestionEngine::new().suggest(&df, &profile);

    assert_eq!(suggestions[0].priority, Priority::High);
    assert_eq!(
        suggestions[0].details.affected_columns().to_vec(),
        vec!["mostly_empty".to_string()]
    );
}

// ============================================================================
// Cleaning Properties
// ============================================================================

#[test]
fn test_full_clean_leaves_no_nulls_or_duplicates() {
    let df = load_csv("customers.csv");
    let result = clean(&df, &CleaningConfig::all_stages()).unwrap();

    let profile = DataProfiler::profile(&result.data).unwrap();
    assert_eq!(profile.missing_values.total_missing, 0);
    assert_eq!(profile.duplicates.count, 0);
    assert_eq!(result.data.height(), 7);
    assert_eq!(result.log.duplicates_removed, 1);
    assert_eq!(result.log.missing_values_handled, 2);
}

#[test]
fn test_cleaning_is_idempotent() {
    let df = load_csv("customers.csv");
    let config = CleaningConfig::all_stages();

    let first = clean(&df, &config).unwrap();
    let second = clean(&first.data, &config).unwrap();

    assert!(second.data.equals(&first.data));
    assert!(second.log.is_empty());
}

#[test]
fn test_all_null_column_is_skipped() {
    let df = df![
        "empty" => [None::<f64>, None, None],
        "value" => [Some(1.0f64), None, Some(3.0)],
    ]
    .unwrap();
    let result = clean(&df, &CleaningConfig::builder().handle_missing(true).build()).unwrap();

    assert_eq!(result.data.column("empty").unwrap().null_count(), 3);
    assert_eq!(result.data.column("value").unwrap().null_count(), 0);
    assert_eq!(result.log.skipped_columns, vec!["empty".to_string()]);
    assert!(
        result
            .log
            .operations
            .contains(&"Skipped imputation for 'empty': no non-null values".to_string())
    );
}

#[test]
fn test_unknown_text_case_only_cleans_whitespace() {
    let df = df!["name" => ["  Ada   Lovelace ", "GRACE hopper"]].unwrap();
    let config = CleaningConfig::builder()
        .standardize_text(true)
        .text_case("upper")
        .build();
    let result = clean(&df, &config).unwrap();

    let expected = df!["name" => ["Ada Lovelace", "GRACE hopper"]].unwrap();
    assert!(result.data.equals(&expected));
    assert_eq!(
        result.log.operations,
        vec!["Standardized 1 values in 'name' (whitespace cleaned)".to_string()]
    );
}

#[test]
fn test_config_json_with_absent_flags() {
    let config: CleaningConfig = serde_json::from_str(r#"{"remove_duplicates": true}"#).unwrap();

    assert!(config.remove_duplicates);
    assert!(!config.handle_missing);
    assert!(!config.standardize_text);
    assert_eq!(config.text_case, TextCase::Lower);

    let df = df!["a" => [Some(1i64), Some(1), None]].unwrap();
    let result = clean(&df, &config).unwrap();
    assert_eq!(result.data.height(), 2);
    assert_eq!(result.data.column("a").unwrap().null_count(), 1);
}

// ============================================================================
// Reporting
// ============================================================================

#[test]
fn test_quality_score_bounds() {
    let empty = DataFrame::empty();
    assert_eq!(quality_score(&empty).unwrap(), 0.0);

    let all_null = df![
        "a" => [None::<i64>, None, None],
        "b" => [None::<i64>, None, None],
    ]
    .unwrap();
    let score = quality_score(&all_null).unwrap();
    assert!((0.0..=100.0).contains(&score));
    assert_eq!(score, 0.0);

    let fixture = load_csv("customers.csv");
    let score = quality_score(&fixture).unwrap();
    assert!((0.0..=100.0).contains(&score));
}

#[test]
fn test_pipeline_report_matches_log() {
    let df = load_csv("customers.csv");
    let outcome = Pipeline::new(CleaningConfig::all_stages()).run(&df).unwrap();
    let report = &outcome.report;

    assert_eq!(report.original_shape, (8, 4));
    assert_eq!(report.final_shape, (7, 4));
    assert_eq!(report.rows_removed, 1);
    assert_eq!(report.columns_removed, 0);
    assert_eq!(report.duplicates_removed, 1);
    assert_eq!(report.operations_performed, outcome.log.operations);
    assert!(report.quality_improvement.improvement >= 0.0);
    assert!(report.render_text().starts_with("DATA CLEANING REPORT"));
}

#[test]
fn test_report_files_are_written() {
    let output_dir = std::env::temp_dir().join(format!("datawash_it_{}", std::process::id()));
    let df = worked_example();
    let result = clean(&df, &lower_text_config()).unwrap();

    let report = ReportGenerator::build_report(&df, &result.data, &result.log).unwrap();
    let generator = ReportGenerator::new(output_dir.clone());

    let json_path = generator.write_report_to_file(&report, "people").unwrap();
    let csv_path = generator.write_cleaned_csv(&result.data, "people").unwrap();

    let document: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&json_path).unwrap()).unwrap();
    assert_eq!(document["missing_values_handled"], 1);

    let written = std::fs::read_to_string(&csv_path).unwrap();
    assert!(written.starts_with("age,city"));

    let _ = std::fs::remove_dir_all(output_dir);
}

// ============================================================================
// Errors and Collaborators
// ============================================================================

#[test]
fn test_parse_translator_reply() {
    let reply = "```json\n{\"commands\": [\
        {\"action\": \"drop_column\", \"column\": \"notes\"},\
        {\"operation\": \"remove_duplicates\"}\
    ]}\n```";
    let commands = parse_commands(reply).unwrap();

    assert_eq!(
        commands,
        vec![
            DataCommand::DropColumn {
                column: "notes".to_string()
            },
            DataCommand::RemoveDuplicates { subset: None },
        ]
    );
}

#[test]
fn test_bad_translator_reply_is_external_error() {
    let err = parse_commands("I cannot help with that").unwrap_err();

    assert!(err.is_external());
    assert!(matches!(err, CleaningError::ExternalService { .. }));
    assert_eq!(err.error_code(), "EXTERNAL_SERVICE_ERROR");
}
