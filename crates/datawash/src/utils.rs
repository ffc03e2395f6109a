//! Shared utilities for profiling, cleaning and reporting.
//!
//! This module contains the dtype classification, the neutral cell view used
//! for row comparison, and the small statistics helpers (quantiles,
//! correlation, mode) that every component relies on.

use once_cell::sync::Lazy;
use polars::prelude::*;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

// =============================================================================
// Data Type Utilities
// =============================================================================

/// Primitive kind of a column, derived from its polars dtype.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnKind {
    /// Integer or floating point numbers
    Numeric,
    /// String/text type
    Text,
    /// Boolean, temporal, nested and anything else
    Other,
}

/// Check if a DataType is numeric (integer or float).
#[inline]
pub fn is_numeric_dtype(dtype: &DataType) -> bool {
    is_integer_dtype(dtype) || is_float_dtype(dtype)
}

/// Check if a DataType is an integer type.
#[inline]
pub fn is_integer_dtype(dtype: &DataType) -> bool {
    matches!(
        dtype,
        DataType::Int8
            | DataType::Int16
            | DataType::Int32
            | DataType::Int64
            | DataType::UInt8
            | DataType::UInt16
            | DataType::UInt32
            | DataType::UInt64
    )
}

/// Check if a DataType is a floating point type.
#[inline]
pub fn is_float_dtype(dtype: &DataType) -> bool {
    matches!(dtype, DataType::Float32 | DataType::Float64)
}

/// Bit width of an integer dtype, `None` for anything else.
pub fn integer_bit_width(dtype: &DataType) -> Option<u32> {
    match dtype {
        DataType::Int8 | DataType::UInt8 => Some(8),
        DataType::Int16 | DataType::UInt16 => Some(16),
        DataType::Int32 | DataType::UInt32 => Some(32),
        DataType::Int64 | DataType::UInt64 => Some(64),
        _ => None,
    }
}

/// Get the kind of a DataType.
pub fn get_column_kind(dtype: &DataType) -> ColumnKind {
    if is_numeric_dtype(dtype) {
        ColumnKind::Numeric
    } else if matches!(dtype, DataType::String) {
        ColumnKind::Text
    } else {
        ColumnKind::Other
    }
}

/// Get the kind of a Series.
pub fn series_kind(series: &Series) -> ColumnKind {
    get_column_kind(series.dtype())
}

// =============================================================================
// Cell View
// =============================================================================

/// A single dataset value, independent of the polars dtype it came from.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Null,
    Number(f64),
    Text(String),
}

/// Hashable identity of a [`Cell`], used to compare whole rows.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CellKey {
    Null,
    Number(u64),
    Text(String),
}

impl Cell {
    pub fn is_null(&self) -> bool {
        matches!(self, Cell::Null)
    }

    pub fn key(&self) -> CellKey {
        match self {
            Cell::Null => CellKey::Null,
            // +0.0 and -0.0 compare equal, so they must hash equal
            Cell::Number(v) if *v == 0.0 => CellKey::Number(0.0f64.to_bits()),
            Cell::Number(v) => CellKey::Number(v.to_bits()),
            Cell::Text(s) => CellKey::Text(s.clone()),
        }
    }
}

/// Read every value of a Series as a [`Cell`].
///
/// Numeric columns are read as `f64`; everything else is read through its
/// string form.
pub fn column_cells(series: &Series) -> PolarsResult<Vec<Cell>> {
    if series_kind(series) == ColumnKind::Numeric {
        let floats = series.cast(&DataType::Float64)?;
        return Ok(floats
            .f64()?
            .into_iter()
            .map(|v| v.map_or(Cell::Null, Cell::Number))
            .collect());
    }

    match series.cast(&DataType::String) {
        Ok(strings) => Ok(strings
            .str()?
            .into_iter()
            .map(|v| v.map_or(Cell::Null, |s| Cell::Text(s.to_string())))
            .collect()),
        Err(_) => {
            // Nested dtypes have no string cast; fall back to display form.
            let mut cells = Vec::with_capacity(series.len());
            for i in 0..series.len() {
                let value = series.get(i)?;
                if value.is_null() {
                    cells.push(Cell::Null);
                } else {
                    cells.push(Cell::Text(format!("{}", value)));
                }
            }
            Ok(cells)
        }
    }
}

/// Non-null, non-NaN values of a numeric Series paired with their row index.
pub fn indexed_numeric_values(series: &Series) -> PolarsResult<Vec<(usize, f64)>> {
    let floats = series.cast(&DataType::Float64)?;
    Ok(floats
        .f64()?
        .into_iter()
        .enumerate()
        .filter_map(|(idx, v)| v.filter(|x| !x.is_nan()).map(|x| (idx, x)))
        .collect())
}

/// Non-null, non-NaN values of a numeric Series.
pub fn numeric_values(series: &Series) -> PolarsResult<Vec<f64>> {
    Ok(indexed_numeric_values(series)?
        .into_iter()
        .map(|(_, v)| v)
        .collect())
}

/// Non-null values of a Series in their string form.
pub fn text_values(series: &Series) -> PolarsResult<Vec<String>> {
    Ok(column_cells(series)?
        .into_iter()
        .filter_map(|cell| match cell {
            Cell::Text(s) => Some(s),
            Cell::Number(v) => Some(v.to_string()),
            Cell::Null => None,
        })
        .collect())
}

/// Flag every row that repeats an earlier row exactly.
///
/// The first occurrence of each distinct row is `false`; later copies are
/// `true`. Nulls compare equal to nulls.
pub fn duplicate_row_flags(df: &DataFrame) -> PolarsResult<Vec<bool>> {
    let height = df.height();
    if height == 0 || df.width() == 0 {
        return Ok(vec![false; height]);
    }

    let columns: Vec<Vec<CellKey>> = df
        .get_columns()
        .iter()
        .map(|col| {
            column_cells(col.as_materialized_series())
                .map(|cells| cells.iter().map(Cell::key).collect())
        })
        .collect::<PolarsResult<_>>()?;

    let mut seen: HashSet<Vec<CellKey>> = HashSet::with_capacity(height);
    let mut flags = Vec::with_capacity(height);

    for row in 0..height {
        let key: Vec<CellKey> = columns.iter().map(|col| col[row].clone()).collect();
        flags.push(!seen.insert(key));
    }

    Ok(flags)
}

/// Count rows that repeat an earlier row.
pub fn count_duplicate_rows(df: &DataFrame) -> PolarsResult<usize> {
    Ok(duplicate_row_flags(df)?.into_iter().filter(|d| *d).count())
}

/// Total null cells across all columns.
pub fn total_null_cells(df: &DataFrame) -> usize {
    df.get_columns().iter().map(|col| col.null_count()).sum()
}

// =============================================================================
// Statistics Utilities
// =============================================================================

/// `part / whole * 100`, or `0.0` when `whole` is zero.
#[inline]
pub fn percentage(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        0.0
    } else {
        (part as f64 / whole as f64) * 100.0
    }
}

/// Quantile with linear interpolation between closest ranks.
///
/// `sorted` must be ascending. Returns `None` for an empty slice.
pub fn quantile_linear(sorted: &[f64], q: f64) -> Option<f64> {
    if sorted.is_empty() {
        return None;
    }

    let position = q.clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    let lower = position.floor() as usize;
    let upper = position.ceil() as usize;
    let fraction = position - lower as f64;

    Some(sorted[lower] + (sorted[upper] - sorted[lower]) * fraction)
}

/// Median of a set of values (the 50% linear quantile).
pub fn median(values: &[f64]) -> Option<f64> {
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));
    quantile_linear(&sorted, 0.5)
}

/// Pearson correlation of paired observations.
///
/// Returns `None` when fewer than two pairs exist or either side has zero
/// variance.
pub fn pearson_correlation(pairs: &[(f64, f64)]) -> Option<f64> {
    let n = pairs.len();
    if n < 2 {
        return None;
    }

    let mean_x = pairs.iter().map(|(x, _)| x).sum::<f64>() / n as f64;
    let mean_y = pairs.iter().map(|(_, y)| y).sum::<f64>() / n as f64;

    let mut covariance = 0.0;
    let mut variance_x = 0.0;
    let mut variance_y = 0.0;
    for (x, y) in pairs {
        let dx = x - mean_x;
        let dy = y - mean_y;
        covariance += dx * dy;
        variance_x += dx * dx;
        variance_y += dy * dy;
    }

    if variance_x == 0.0 || variance_y == 0.0 {
        return None;
    }

    Some(covariance / (variance_x.sqrt() * variance_y.sqrt()))
}

/// Most frequent value; ties resolve to the smallest value in sort order.
pub fn string_mode<S: AsRef<str>>(values: &[S]) -> Option<String> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for value in values {
        *counts.entry(value.as_ref()).or_insert(0) += 1;
    }

    let max_count = counts.values().copied().max()?;
    counts
        .into_iter()
        .filter(|(_, count)| *count == max_count)
        .map(|(value, _)| value)
        .min()
        .map(str::to_string)
}

// =============================================================================
// Series Transformation Utilities
// =============================================================================

static WHITESPACE_RUN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s+").expect("Invalid regex: whitespace run"));

/// Collapse internal whitespace runs to one space and trim both ends.
pub fn normalize_whitespace(value: &str) -> String {
    WHITESPACE_RUN.replace_all(value, " ").trim().to_string()
}

/// Check whether a value starts or ends with whitespace.
pub fn has_edge_whitespace(value: &str) -> bool {
    value.starts_with(char::is_whitespace) || value.ends_with(char::is_whitespace)
}

/// Fill null values in a numeric Series with a specific value.
///
/// The result is always `Float64`.
pub fn fill_numeric_nulls(series: &Series, fill_value: f64) -> PolarsResult<Series> {
    let floats = series.cast(&DataType::Float64)?;
    let filled: Vec<f64> = floats
        .f64()?
        .into_iter()
        .map(|v| v.unwrap_or(fill_value))
        .collect();

    Ok(Series::new(series.name().clone(), filled))
}

/// Fill null values in a Series with a string value.
///
/// The result is always `String`.
pub fn fill_string_nulls(series: &Series, fill_value: &str) -> PolarsResult<Series> {
    let filled: Vec<String> = column_cells(series)?
        .into_iter()
        .map(|cell| match cell {
            Cell::Null => fill_value.to_string(),
            Cell::Text(s) => s,
            Cell::Number(v) => v.to_string(),
        })
        .collect();

    Ok(Series::new(series.name().clone(), filled))
}

// =============================================================================
// Formatting Utilities
// =============================================================================

/// Format an integer with comma thousands separators (`10000` → `10,000`).
pub fn format_number(value: i64) -> String {
    let digits = value.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 1);

    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }

    if value < 0 {
        format!("-{}", grouped)
    } else {
        grouped
    }
}

/// Suggest how many rows of a `rows x cols` dataset fit in `target_mb`,
/// assuming eight bytes per cell.
pub fn suggest_sample_size(rows: usize, cols: usize, target_mb: f64) -> usize {
    if cols == 0 {
        return rows;
    }

    let estimated_mb = (rows * cols * 8) as f64 / (1024.0 * 1024.0);
    if estimated_mb <= target_mb {
        rows
    } else {
        let suggested = ((target_mb * 1024.0 * 1024.0) / (cols * 8) as f64) as usize;
        suggested.min(rows)
    }
}

/// Convert a byte count to mebibytes.
#[inline]
pub fn bytes_to_mb(bytes: usize) -> f64 {
    bytes as f64 / (1024.0 * 1024.0)
}

// =============================================================================
// Tests
// =============================================================================
