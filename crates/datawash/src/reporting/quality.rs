//! Quality score and memory footprint measurements.

use crate::utils::{bytes_to_mb, count_duplicate_rows, percentage, total_null_cells};
use polars::prelude::*;

/// Weight applied to the duplicate-row ratio.
const DUPLICATE_WEIGHT: f64 = 10.0;

/// Quality score in `[0, 100]`: `100 - missing% - duplicate_ratio * 10`.
///
/// A frame with no rows or no columns scores 0.
pub fn quality_score(df: &DataFrame) -> PolarsResult<f64> {
    let rows = df.height();
    let cols = df.width();
    if rows == 0 || cols == 0 {
        return Ok(0.0);
    }

    let missing_penalty = percentage(total_null_cells(df), rows * cols);
    let duplicate_penalty = count_duplicate_rows(df)? as f64 / rows as f64 * DUPLICATE_WEIGHT;

    Ok((100.0 - missing_penalty - duplicate_penalty).clamp(0.0, 100.0))
}

/// Estimated in-memory size of a frame in MiB.
pub fn memory_mb(df: &DataFrame) -> f64 {
    bytes_to_mb(df.estimated_size())
}

/// Percentage reduction from `original` to `final_`, 0 when `original` is 0.
pub fn reduction_percent(original: f64, final_: f64) -> f64 {
    if original > 0.0 {
        (original - final_) / original * 100.0
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_perfect_frame_scores_100() {
        let df = df!["a" => [1i64, 2, 3], "b" => ["x", "y", "z"]].unwrap();
        assert_eq!(quality_score(&df).unwrap(), 100.0);
    }

    #[test]
    fn test_penalties() {
        // 1 null in 8 cells = 12.5; 1 duplicate in 4 rows = 2.5
        let df = df![
            "a" => [Some(1i64), Some(1), Some(2), None],
            "b" => ["x", "x", "y", "z"],
        ]
        .unwrap();
        assert_eq!(quality_score(&df).unwrap(), 85.0);
    }

    #[test]
    fn test_score_is_clamped() {
        let df = df!["a" => [None::<i64>, None, None]].unwrap();
        // 100% missing plus two duplicate rows would go negative.
        assert_eq!(quality_score(&df).unwrap(), 0.0);
    }

    #[test]
    fn test_empty_frame_scores_zero() {
        assert_eq!(quality_score(&DataFrame::empty()).unwrap(), 0.0);
        let df = df!["a" => Vec::<i64>::new()].unwrap();
        assert_eq!(quality_score(&df).unwrap(), 0.0);
    }

    #[test]
    fn test_reduction_percent_guards_zero() {
        assert_eq!(reduction_percent(0.0, 1.0), 0.0);
        assert_eq!(reduction_percent(2.0, 1.0), 50.0);
        assert_eq!(reduction_percent(1.0, 2.0), -100.0);
    }
}
