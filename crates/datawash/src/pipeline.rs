//! End-to-end run: profile, suggest, clean, report.

use crate::cleaner::{CleaningLog, DataCleaner};
use crate::config::CleaningConfig;
use crate::error::{Result, ResultExt};
use crate::profiler::DataProfiler;
use crate::reporting::{CleaningReport, ReportGenerator};
use crate::suggestions::SuggestionEngine;
use crate::types::{DataProfile, Suggestion};
use polars::prelude::*;
use serde::Serialize;
use tracing::info;

/// Everything one pipeline run produces.
#[derive(Debug, Clone)]
pub struct PipelineOutcome {
    /// Profile of the original dataset.
    pub profile: DataProfile,
    pub suggestions: Vec<Suggestion>,
    pub cleaned: DataFrame,
    pub log: CleaningLog,
    pub report: CleaningReport,
}

/// Serializable view of a [`PipelineOutcome`] without the cleaned frame.
#[derive(Debug, Serialize)]
pub struct OutcomeDocument<'a> {
    pub profile: &'a DataProfile,
    pub suggestions: &'a [Suggestion],
    pub log: &'a CleaningLog,
    pub report: &'a CleaningReport,
}

impl PipelineOutcome {
    pub fn document(&self) -> OutcomeDocument<'_> {
        OutcomeDocument {
            profile: &self.profile,
            suggestions: &self.suggestions,
            log: &self.log,
            report: &self.report,
        }
    }
}

/// Runs the four components in order on one dataset.
///
/// # Example
///
/// ```rust,ignore
/// use datawash::{CleaningConfig, Pipeline};
///
/// let outcome = Pipeline::new(CleaningConfig::all_stages()).run(&df)?;
/// for suggestion in &outcome.suggestions {
///     println!("[{}] {}", suggestion.priority, suggestion.title);
/// }
/// println!("{}", outcome.report.render_text());
/// ```
#[derive(Debug, Clone, Default)]
pub struct Pipeline {
    cleaner: DataCleaner,
    engine: SuggestionEngine,
}

static_assertions::assert_impl_all!(Pipeline: Send, Sync);
static_assertions::assert_impl_all!(PipelineOutcome: Send);

impl Pipeline {
    pub fn new(config: CleaningConfig) -> Self {
        Self {
            cleaner: DataCleaner::new(config),
            engine: SuggestionEngine::new(),
        }
    }

    /// Use a custom suggestion engine.
    pub fn with_engine(mut self, engine: SuggestionEngine) -> Self {
        self.engine = engine;
        self
    }

    pub fn config(&self) -> &CleaningConfig {
        self.cleaner.config()
    }

    /// Profile and suggest only; nothing is cleaned.
    pub fn analyze(&self, df: &DataFrame) -> Result<(DataProfile, Vec<Suggestion>)> {
        let profile = DataProfiler::profile(df).context("Profiling dataset")?;
        let suggestions = self.engine.suggest(df, &profile);
        Ok((profile, suggestions))
    }

    pub fn run(&self, df: &DataFrame) -> Result<PipelineOutcome> {
        info!("Stage 1/4: profiling");
        let profile = DataProfiler::profile(df).context("Profiling dataset")?;

        info!("Stage 2/4: suggestions");
        let suggestions = self.engine.suggest(df, &profile);

        info!("Stage 3/4: cleaning");
        let result = self.cleaner.clean(df)?;

        info!("Stage 4/4: report");
        let report = ReportGenerator::build_report(df, &result.data, &result.log)
            .context("Building report")?;

        Ok(PipelineOutcome {
            profile,
            suggestions,
            cleaned: result.data,
            log: result.log,
            report,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_chains_components() {
        let df = df![
            "age" => [Some(25i64), Some(30), None, Some(30)],
            "city" => ["NY", " ny", "LA", "LA"],
        ]
        .unwrap();

        let outcome = Pipeline::new(CleaningConfig::all_stages()).run(&df).unwrap();

        assert_eq!(outcome.profile.missing_values.total_missing, 1);
        assert!(!outcome.suggestions.is_empty());
        assert_eq!(outcome.cleaned.height(), outcome.report.final_shape.0);
        assert_eq!(outcome.report.operations_performed, outcome.log.operations);

        let doc = serde_json::to_value(outcome.document()).unwrap();
        assert!(doc["profile"]["basic_info"]["row_count"].is_number());
        assert!(doc["report"]["quality_improvement"].is_object());
    }

    #[test]
    fn test_analyze_does_not_clean() {
        let df = df!["a" => [1i64, 1]].unwrap();
        let (profile, suggestions) = Pipeline::default().analyze(&df).unwrap();

        assert_eq!(profile.duplicates.count, 1);
        assert_eq!(suggestions[0].title, "Remove duplicate rows");
    }
}
