//! Missing value analysis and missingness co-occurrence.

use crate::types::{ColumnMissing, MissingPattern, MissingValuesProfile};
use crate::utils::{pearson_correlation, percentage};
use polars::prelude::*;

/// Null-indicator correlation above which two columns are recorded as
/// missing together.
const PATTERN_THRESHOLD: f64 = 0.5;

pub(crate) fn analyze_missing_values(df: &DataFrame) -> PolarsResult<MissingValuesProfile> {
    let rows = df.height();
    let mut total_missing = 0;
    let mut by_column = Vec::new();

    for col in df.get_columns() {
        let count = col.null_count();
        total_missing += count;

        if count > 0 {
            by_column.push(ColumnMissing {
                column: col.name().to_string(),
                count,
                percentage: percentage(count, rows),
            });
        }
    }

    Ok(MissingValuesProfile {
        total_missing,
        columns_with_missing: by_column.len(),
        by_column,
        missing_patterns: find_missing_patterns(df),
    })
}

/// For every ordered pair of distinct columns, record B under A when the
/// correlation of their null indicators exceeds the threshold.
fn find_missing_patterns(df: &DataFrame) -> Vec<MissingPattern> {
    let rows = df.height();

    // A column with no nulls (or only nulls) has a constant indicator and
    // cannot correlate with anything.
    let indicators: Vec<(String, Vec<f64>)> = df
        .get_columns()
        .iter()
        .filter(|col| col.null_count() > 0 && col.null_count() < rows)
        .map(|col| {
            let flags = col
                .as_materialized_series()
                .is_null()
                .into_iter()
                .map(|v| if v == Some(true) { 1.0 } else { 0.0 })
                .collect();
            (col.name().to_string(), flags)
        })
        .collect();

    let mut patterns = Vec::new();
    for (name_a, flags_a) in &indicators {
        let correlated_with: Vec<String> = indicators
            .iter()
            .filter(|(name_b, _)| name_b != name_a)
            .filter(|(_, flags_b)| {
                let pairs: Vec<(f64, f64)> =
                    flags_a.iter().copied().zip(flags_b.iter().copied()).collect();
                pearson_correlation(&pairs).is_some_and(|r| r > PATTERN_THRESHOLD)
            })
            .map(|(name_b, _)| name_b.clone())
            .collect();

        if !correlated_with.is_empty() {
            patterns.push(MissingPattern {
                column: name_a.clone(),
                correlated_with,
            });
        }
    }

    patterns
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_counts_and_percentages() {
        let df = df![
            "a" => [Some(1i64), None, None, Some(4)],
            "b" => [Some("x"), Some("y"), None, Some("z")],
            "c" => [1.0, 2.0, 3.0, 4.0],
        ]
        .unwrap();

        let missing = analyze_missing_values(&df).unwrap();

        assert_eq!(missing.total_missing, 3);
        assert_eq!(missing.columns_with_missing, 2);
        assert_eq!(missing.column("a").unwrap().count, 2);
        assert_eq!(missing.column("a").unwrap().percentage, 50.0);
        assert_eq!(missing.column("b").unwrap().percentage, 25.0);
        assert!(missing.column("c").is_none());

        let sum: usize = missing.by_column.iter().map(|c| c.count).sum();
        assert_eq!(sum, missing.total_missing);
    }

    #[test]
    fn test_missing_patterns_are_directional() {
        let df = df![
            "a" => [Some(1i64), None, Some(3), None],
            "b" => [Some("x"), None, Some("z"), None],
            "c" => [None, Some(2.0), Some(3.0), Some(4.0)],
        ]
        .unwrap();

        let missing = analyze_missing_values(&df).unwrap();
        let patterns = &missing.missing_patterns;

        assert_eq!(patterns.len(), 2);
        assert_eq!(patterns[0].column, "a");
        assert_eq!(patterns[0].correlated_with, vec!["b".to_string()]);
        assert_eq!(patterns[1].column, "b");
        assert_eq!(patterns[1].correlated_with, vec!["a".to_string()]);
    }

    #[test]
    fn test_missing_zero_rows() {
        let df = df!["a" => Vec::<f64>::new()].unwrap();
        let missing = analyze_missing_values(&df).unwrap();

        assert_eq!(missing.total_missing, 0);
        assert!(missing.by_column.is_empty());
        assert!(missing.missing_patterns.is_empty());
    }
}
