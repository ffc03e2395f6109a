//! Data cleaning module.
//!
//! This module applies the stages enabled in a [`CleaningConfig`], always in
//! this order:
//! 1. Missing value imputation (median for numeric, mode otherwise)
//! 2. Duplicate row removal (keep first occurrence)
//! 3. Text standardization (whitespace and case)
//!
//! The caller's frame is never touched; every stage works on an owned copy.

mod dedup;
mod imputation;
mod text;

pub(crate) use dedup::remove_duplicate_rows;
pub(crate) use imputation::impute_missing_values;
pub(crate) use text::standardize_text_columns;

use crate::config::CleaningConfig;
use crate::error::{Result, ResultExt};
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::info;

/// Ordered record of what a cleaning pass did.
///
/// An all-null column has no imputation value, so with `handle_missing` on it
/// adds a "Skipped imputation" line to `operations` and its name to
/// `skipped_columns` on every pass, including a pass over already cleaned
/// data. Such a log is never empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CleaningLog {
    /// Human-readable description of each mutation, in the order applied.
    pub operations: Vec<String>,
    pub missing_values_handled: usize,
    pub duplicates_removed: usize,
    pub values_standardized: usize,
    /// Columns left with nulls because they had no value to impute from.
    pub skipped_columns: Vec<String>,
}

impl CleaningLog {
    pub(crate) fn record(&mut self, operation: String) {
        info!("{}", operation);
        self.operations.push(operation);
    }

    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }
}

/// A cleaned dataset and the log of how it was produced.
#[derive(Debug, Clone)]
pub struct CleaningResult {
    pub data: DataFrame,
    pub log: CleaningLog,
}

/// Applies a [`CleaningConfig`] to datasets.
#[derive(Debug, Clone, Default)]
pub struct DataCleaner {
    config: CleaningConfig,
}

impl DataCleaner {
    pub fn new(config: CleaningConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &CleaningConfig {
        &self.config
    }

    /// Clean a copy of `df`.
    pub fn clean(&self, df: &DataFrame) -> Result<CleaningResult> {
        let mut data = df.clone();
        let mut log = CleaningLog::default();

        info!(
            "Cleaning dataset with {} rows and {} columns",
            data.height(),
            data.width()
        );

        if self.config.handle_missing {
            impute_missing_values(&mut data, &mut log).context("Imputing missing values")?;
        }

        if self.config.remove_duplicates {
            let (deduplicated, removed) =
                remove_duplicate_rows(&data).context("Removing duplicate rows")?;
            data = deduplicated;
            if removed > 0 {
                log.duplicates_removed = removed;
                log.record(format!("Removed {} duplicate rows", removed));
            }
        }

        if self.config.standardize_text {
            standardize_text_columns(&mut data, &self.config.text_case, &mut log)
                .context("Standardizing text")?;
        }

        if log.is_empty() {
            info!("No cleaning operations were necessary");
        }

        Ok(CleaningResult { data, log })
    }
}

/// Clean a copy of `df` with `config`.
pub fn clean(df: &DataFrame, config: &CleaningConfig) -> Result<CleaningResult> {
    DataCleaner::new(config.clone()).clean(df)
}
