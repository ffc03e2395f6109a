//! IQR outlier detection for numeric columns.

use crate::types::ColumnOutliers;
use crate::utils::{indexed_numeric_values, percentage, quantile_linear, series_kind, ColumnKind};
use polars::prelude::*;
use tracing::debug;

/// Multiplier applied to the IQR to get the fences.
const IQR_MULTIPLIER: f64 = 1.5;

/// Detect outliers in every numeric column.
///
/// Columns with no non-null values, or with no outliers, are omitted.
pub(crate) fn detect_outliers(df: &DataFrame) -> Vec<ColumnOutliers> {
    let rows = df.height();
    let mut result = Vec::new();

    for col in df.get_columns() {
        let series = col.as_materialized_series();
        if series_kind(series) != ColumnKind::Numeric {
            continue;
        }

        let values = match indexed_numeric_values(series) {
            Ok(values) => values,
            Err(e) => {
                debug!("Skipping outlier detection for '{}': {}", col.name(), e);
                continue;
            }
        };

        if let Some(outliers) = column_outliers(col.name().as_str(), &values, rows) {
            result.push(outliers);
        }
    }

    result
}

fn column_outliers(name: &str, values: &[(usize, f64)], rows: usize) -> Option<ColumnOutliers> {
    let mut sorted: Vec<f64> = values.iter().map(|(_, v)| *v).collect();
    sorted.sort_by(|a, b| a.total_cmp(b));

    let q1 = quantile_linear(&sorted, 0.25)?;
    let q3 = quantile_linear(&sorted, 0.75)?;
    let iqr = q3 - q1;
    let lower_bound = q1 - IQR_MULTIPLIER * iqr;
    let upper_bound = q3 + IQR_MULTIPLIER * iqr;

    let outlier_indices: Vec<usize> = values
        .iter()
        .filter(|(_, v)| *v < lower_bound || *v > upper_bound)
        .map(|(idx, _)| *idx)
        .collect();

    if outlier_indices.is_empty() {
        return None;
    }

    let count = outlier_indices.len();
    Some(ColumnOutliers {
        column: name.to_string(),
        count,
        percentage: percentage(count, rows),
        q1,
        q3,
        lower_bound,
        upper_bound,
        outlier_indices,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detects_iqr_outliers() {
        let df = df![
            "value" => [Some(10.0f64), Some(12.0), Some(11.0), Some(13.0), Some(100.0), None],
            "label" => ["a", "b", "c", "d", "e", "f"],
        ]
        .unwrap();

        let outliers = detect_outliers(&df);
        assert_eq!(outliers.len(), 1);

        let value = &outliers[0];
        assert_eq!(value.column, "value");
        assert_eq!(value.count, 1);
        assert_eq!(value.outlier_indices, vec![4]);
        // sorted [10, 11, 12, 13, 100]: Q1=11, Q3=13, IQR=2
        assert_eq!(value.q1, 11.0);
        assert_eq!(value.q3, 13.0);
        assert_eq!(value.lower_bound, 8.0);
        assert_eq!(value.upper_bound, 16.0);
        assert!((value.percentage - 100.0 / 6.0).abs() < 1e-9);
    }

    #[test]
    fn test_bounds_are_closed() {
        // Q1=2, Q3=4, bounds [-1, 7]; -1 and 7 sit exactly on the fences.
        let df = df!["v" => [-1i64, 2, 2, 4, 4, 7]].unwrap();
        let sorted = [-1.0, 2.0, 2.0, 4.0, 4.0, 7.0];
        assert_eq!(quantile_linear(&sorted, 0.25), Some(2.0));
        assert_eq!(quantile_linear(&sorted, 0.75), Some(4.0));

        assert!(detect_outliers(&df).is_empty());
    }

    #[test]
    fn test_skips_all_null_and_clean_columns() {
        let df = df![
            "nulls" => [None::<f64>, None, None],
            "clean" => [1i32, 2, 3],
        ]
        .unwrap();

        assert!(detect_outliers(&df).is_empty());
    }
}
