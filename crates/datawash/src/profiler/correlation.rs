use crate::types::CorrelationPair;
use crate::utils::{pearson_correlation, series_kind, ColumnKind};
use polars::prelude::*;
use tracing::debug;

/// Absolute correlation above which a numeric pair is reported.
const HIGH_CORRELATION: f64 = 0.9;

/// Report every unordered pair of numeric columns whose absolute Pearson
/// correlation exceeds the threshold. Rows where either side is null are
/// excluded pairwise.
pub(crate) fn detect_correlation_issues(df: &DataFrame) -> Vec<CorrelationPair> {
    let mut columns: Vec<(String, Vec<Option<f64>>)> = Vec::new();

    for col in df.get_columns() {
        let series = col.as_materialized_series();
        if series_kind(series) != ColumnKind::Numeric {
            continue;
        }

        match nullable_floats(series) {
            Ok(values) => columns.push((col.name().to_string(), values)),
            Err(e) => debug!("Skipping correlation for '{}': {}", col.name(), e),
        }
    }

    let mut pairs = Vec::new();
    for i in 0..columns.len() {
        for j in (i + 1)..columns.len() {
            let (name_a, values_a) = &columns[i];
            let (name_b, values_b) = &columns[j];

            let observations: Vec<(f64, f64)> = values_a
                .iter()
                .zip(values_b)
                .filter_map(|(a, b)| Some(((*a)?, (*b)?)))
                .collect();

            if let Some(r) = pearson_correlation(&observations)
                && r.abs() > HIGH_CORRELATION
            {
                pairs.push(CorrelationPair {
                    feature1: name_a.clone(),
                    feature2: name_b.clone(),
                    correlation: r.abs(),
                });
            }
        }
    }

    pairs
}

fn nullable_floats(series: &Series) -> PolarsResult<Vec<Option<f64>>> {
    let floats = series.cast(&DataType::Float64)?;
    Ok(floats
        .f64()?
        .into_iter()
        .map(|v| v.filter(|x| !x.is_nan()))
        .collect())
}
