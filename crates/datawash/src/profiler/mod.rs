//! Data profiling module for dataset analysis.
//!
//! This module inspects a dataset without mutating it and produces a
//! [`DataProfile`] with these sections:
//! - Basic shape and column descriptors
//! - Missing values and missingness co-occurrence
//! - Exact duplicate rows
//! - Storage type optimization candidates
//! - IQR outliers in numeric columns
//! - Case and whitespace inconsistencies in text columns
//! - Highly correlated numeric column pairs

mod categorical;
mod correlation;
mod duplicates;
mod dtypes;
mod missing;
mod outliers;

use crate::error::{Result, ResultExt};
use crate::types::{BasicInfo, ColumnDescriptor, DataProfile};
use crate::utils::series_kind;
use polars::prelude::*;
use tracing::{debug, info};

pub(crate) use categorical::detect_categorical_issues;
pub(crate) use correlation::detect_correlation_issues;
pub(crate) use duplicates::analyze_duplicates;
pub(crate) use dtypes::analyze_data_types;
pub(crate) use missing::analyze_missing_values;
pub(crate) use outliers::detect_outliers;

/// Data profiler for analyzing dataset quality.
pub struct DataProfiler;

impl DataProfiler {
    /// Profile an entire dataset.
    ///
    /// Every section degrades to zero counts on an empty frame. Columns that
    /// cannot be read as numbers are left out of the numeric-only sections
    /// rather than failing the run.
    pub fn profile(df: &DataFrame) -> Result<DataProfile> {
        info!(
            "Profiling dataset with {} rows and {} columns",
            df.height(),
            df.width()
        );

        let basic_info = Self::basic_info(df);
        let missing_values = analyze_missing_values(df).context("Analyzing missing values")?;
        let duplicates = analyze_duplicates(df).context("Analyzing duplicate rows")?;
        let data_types = analyze_data_types(df).context("Analyzing data types")?;
        let outliers = detect_outliers(df);
        let categorical_issues =
            detect_categorical_issues(df).context("Detecting categorical issues")?;
        let correlation_issues = detect_correlation_issues(df);

        debug!(
            total_missing = missing_values.total_missing,
            duplicates = duplicates.count,
            outlier_columns = outliers.len(),
            categorical_columns = categorical_issues.len(),
            correlated_pairs = correlation_issues.len(),
            "Profile complete"
        );

        Ok(DataProfile {
            basic_info,
            missing_values,
            duplicates,
            data_types,
            outliers,
            categorical_issues,
            correlation_issues,
        })
    }

    /// Describe every column of a dataset in order.
    pub fn describe_columns(df: &DataFrame) -> Vec<ColumnDescriptor> {
        df.get_columns()
            .iter()
            .map(|col| {
                let series = col.as_materialized_series();
                ColumnDescriptor {
                    name: col.name().to_string(),
                    kind: series_kind(series),
                    dtype: series.dtype().to_string(),
                    null_count: series.null_count(),
                }
            })
            .collect()
    }

    fn basic_info(df: &DataFrame) -> BasicInfo {
        BasicInfo {
            row_count: df.height(),
            column_count: df.width(),
            memory_usage_bytes: df.estimated_size(),
            columns: Self::describe_columns(df),
        }
    }
}
