//! Data-Quality Profiling and Cleaning Library
//!
//! Analyzes a tabular dataset held in a Polars [`DataFrame`](polars::prelude::DataFrame)
//! and produces a structured quality profile, ranked remediation
//! suggestions, an auditable cleaning pass and a before/after report.
//!
//! # Overview
//!
//! - **Profiler**: missing values and their co-occurrence, duplicate rows,
//!   storage type candidates, IQR outliers, case/whitespace issues, highly
//!   correlated numeric pairs
//! - **Suggestion Engine**: prioritized, typed remediation advice
//! - **Cleaner**: median/mode imputation, duplicate removal and text
//!   standardization, each gated by [`CleaningConfig`]
//! - **Report Generator**: quality score and memory delta for both sides
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use datawash::{CleaningConfig, DataProfiler, SuggestionEngine, TextCase};
//! use polars::prelude::*;
//!
//! let df = CsvReadOptions::default()
//!     .try_into_reader_with_file_path(Some("data.csv".into()))?
//!     .finish()?;
//!
//! let profile = DataProfiler::profile(&df)?;
//! let suggestions = SuggestionEngine::new().suggest(&df, &profile);
//!
//! let config = CleaningConfig::builder()
//!     .handle_missing(true)
//!     .standardize_text(true)
//!     .text_case(TextCase::Lower)
//!     .build();
//! let result = datawash::clean(&df, &config)?;
//!
//! let report = datawash::ReportGenerator::build_report(&df, &result.data, &result.log)?;
//! println!("{}", report.render_text());
//! ```
//!
//! # External collaborators
//!
//! Instruction translation and transcription live in [`ai`] behind traits.
//! The core never calls them.

pub mod ai;
pub mod cleaner;
pub mod config;
pub mod error;
pub mod pipeline;
pub mod profiler;
pub mod reporting;
pub mod suggestions;
pub mod types;
pub mod utils;

// Re-exports for convenient access
pub use cleaner::{clean, CleaningLog, CleaningResult, DataCleaner};
pub use config::{
    CleaningConfig, CleaningConfigBuilder, ConfigValidationError, SuggestionRules, TextCase,
};
pub use error::{CleaningError, Result as DatawashResult, ResultExt};
pub use pipeline::{OutcomeDocument, Pipeline, PipelineOutcome};
pub use profiler::DataProfiler;
pub use reporting::{CleaningReport, MemoryReduction, QualityImprovement, ReportGenerator};
pub use suggestions::SuggestionEngine;
pub use types::{
    BasicInfo, CaseGroup, CategoricalIssues, ColumnDescriptor, ColumnMissing, ColumnOutliers,
    ColumnTypeInfo, CorrelationPair, DataProfile, DuplicatesProfile, MissingPattern,
    MissingValuesProfile, Priority, SuggestedAction, Suggestion, SuggestionDetails,
    TypeOptimization,
};
pub use utils::{ColumnKind, format_number, suggest_sample_size};

/// Profile a dataset. Shorthand for [`DataProfiler::profile`].
pub fn profile(df: &polars::prelude::DataFrame) -> error::Result<DataProfile> {
    DataProfiler::profile(df)
}

/// Suggest remediations with the default thresholds.
pub fn suggest(df: &polars::prelude::DataFrame, profile: &DataProfile) -> Vec<Suggestion> {
    SuggestionEngine::new().suggest(df, profile)
}

/// Build a before/after report. Shorthand for [`ReportGenerator::build_report`].
pub fn report(
    original: &polars::prelude::DataFrame,
    cleaned: &polars::prelude::DataFrame,
    log: &CleaningLog,
) -> error::Result<CleaningReport> {
    ReportGenerator::build_report(original, cleaned, log)
}
