//! Whitespace and case standardization for text columns.

use super::CleaningLog;
use crate::config::TextCase;
use crate::error::Result;
use crate::utils::{normalize_whitespace, series_kind, ColumnKind};
use polars::prelude::*;
use tracing::debug;

/// Standardize one value: collapse whitespace runs, trim, then apply case.
pub(crate) fn standardize_value(value: &str, case: &TextCase) -> String {
    case.apply(&normalize_whitespace(value))
}

fn describe_transformation(case: &TextCase) -> String {
    match case {
        TextCase::Lower | TextCase::Title => format!("whitespace cleaned + {} case", case),
        TextCase::Unchanged(_) => "whitespace cleaned".to_string(),
    }
}

/// Standardize every text column in place. Nulls stay null.
pub(crate) fn standardize_text_columns(
    df: &mut DataFrame,
    case: &TextCase,
    log: &mut CleaningLog,
) -> Result<()> {
    let targets: Vec<String> = df
        .get_columns()
        .iter()
        .filter(|col| series_kind(col.as_materialized_series()) == ColumnKind::Text)
        .map(|col| col.name().to_string())
        .collect();

    for name in targets {
        let series = df.column(&name)?.as_materialized_series().clone();

        let mut changed = 0;
        let standardized: Vec<Option<String>> = series
            .str()?
            .into_iter()
            .map(|value| {
                value.map(|original| {
                    let cleaned = standardize_value(original, case);
                    if cleaned != original {
                        changed += 1;
                    }
                    cleaned
                })
            })
            .collect();

        if changed == 0 {
            debug!("Text in '{}' already standardized", name);
            continue;
        }

        df.replace(&name, Series::new(name.as_str().into(), standardized))?;

        log.values_standardized += changed;
        log.record(format!(
            "Standardized {} values in '{}' ({})",
            changed,
            name,
            describe_transformation(case)
        ));
    }

    Ok(())
}
