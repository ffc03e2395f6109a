//! Storage type optimization candidates.

use crate::types::{ColumnTypeInfo, TypeOptimization};
use crate::utils::{integer_bit_width, is_float_dtype, numeric_values, ColumnKind, series_kind};
use polars::prelude::*;

/// Text columns below this unique/row ratio are categorical candidates.
const CATEGORY_RATIO: f64 = 0.5;

pub(crate) fn analyze_data_types(df: &DataFrame) -> PolarsResult<Vec<ColumnTypeInfo>> {
    let rows = df.height();

    df.get_columns()
        .iter()
        .map(|col| {
            let series = col.as_materialized_series();
            let unique_values = series.drop_nulls().n_unique()?;

            Ok(ColumnTypeInfo {
                column: col.name().to_string(),
                current_type: series.dtype().to_string(),
                unique_values,
                suggestions: type_suggestions(series, unique_values, rows)?,
            })
        })
        .collect()
}

fn type_suggestions(
    series: &Series,
    unique_values: usize,
    rows: usize,
) -> PolarsResult<Vec<TypeOptimization>> {
    let dtype = series.dtype();
    let mut suggestions = Vec::new();

    if let Some(width) = integer_bit_width(dtype) {
        let values = numeric_values(series)?;
        let min = values.iter().copied().reduce(f64::min);
        let max = values.iter().copied().reduce(f64::max);

        if let (Some(min), Some(max)) = (min, max) {
            if width > 8 && min >= i8::MIN as f64 && max <= i8::MAX as f64 {
                suggestions.push(TypeOptimization::Int8);
            } else if width > 16 && min >= i16::MIN as f64 && max <= i16::MAX as f64 {
                suggestions.push(TypeOptimization::Int16);
            }
        }
    } else if is_float_dtype(dtype) {
        let values = numeric_values(series)?;
        if !values.is_empty() && values.iter().all(|v| v.is_finite() && v.fract() == 0.0) {
            suggestions.push(TypeOptimization::Int32);
        }
    } else if series_kind(series) == ColumnKind::Text
        && (unique_values as f64) < rows as f64 * CATEGORY_RATIO
    {
        suggestions.push(TypeOptimization::Category);
    }

    Ok(suggestions)
}
