//! Median and mode imputation.

use super::CleaningLog;
use crate::error::{CleaningError, Result};
use crate::utils::{
    column_cells, fill_numeric_nulls, fill_string_nulls, median, numeric_values, series_kind,
    string_mode, text_values, Cell, ColumnKind,
};
use polars::prelude::*;
use tracing::{debug, warn};

/// Value used to fill a column's nulls.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum ImputationValue {
    Median(f64),
    Mode(String),
    /// Most frequent value of a column without a numeric or text form,
    /// identified by the first row holding it.
    ModeAt(usize),
}

impl ImputationValue {
    fn strategy(&self) -> &'static str {
        match self {
            ImputationValue::Median(_) => "median",
            ImputationValue::Mode(_) | ImputationValue::ModeAt(_) => "mode",
        }
    }
}

/// Median of a numeric column, mode of any other column.
///
/// Fails with [`CleaningError::NoImputationValue`] when the column has no
/// non-null values.
pub(crate) fn imputation_value(series: &Series) -> Result<ImputationValue> {
    let value = match series_kind(series) {
        ColumnKind::Numeric => median(&numeric_values(series)?).map(ImputationValue::Median),
        ColumnKind::Text => string_mode(&text_values(series)?).map(ImputationValue::Mode),
        ColumnKind::Other => mode_row(series)?.map(ImputationValue::ModeAt),
    };

    value.ok_or_else(|| CleaningError::NoImputationValue {
        column: series.name().to_string(),
    })
}

/// Index of the first row holding the most frequent non-null value.
fn mode_row(series: &Series) -> PolarsResult<Option<usize>> {
    let cells = column_cells(series)?;
    let texts: Vec<&str> = cells
        .iter()
        .filter_map(|cell| match cell {
            Cell::Text(s) => Some(s.as_str()),
            _ => None,
        })
        .collect();

    let Some(mode) = string_mode(&texts) else {
        return Ok(None);
    };
    Ok(cells
        .iter()
        .position(|cell| matches!(cell, Cell::Text(s) if *s == mode)))
}

/// Replace nulls with the value at `row`, keeping the dtype.
fn fill_nulls_from_row(series: &Series, row: usize) -> PolarsResult<Series> {
    let fill = series.new_from_index(row, series.len());
    series.zip_with(&series.is_not_null(), &fill)
}

/// Fill nulls in every column that has any.
///
/// Numeric columns take the median and become Float64, text columns take the
/// mode, and other dtypes take their most frequent value without a cast.
pub(crate) fn impute_missing_values(df: &mut DataFrame, log: &mut CleaningLog) -> Result<()> {
    let targets: Vec<String> = df
        .get_columns()
        .iter()
        .filter(|col| col.null_count() > 0)
        .map(|col| col.name().to_string())
        .collect();

    for name in targets {
        let series = df
            .column(&name)
            .map_err(|_| CleaningError::ColumnNotFound(name.clone()))?
            .as_materialized_series()
            .clone();

        let value = match imputation_value(&series) {
            Ok(value) => value,
            Err(e) if e.is_recoverable() => {
                warn!("Skipping imputation for '{}': {}", name, e);
                log.record(format!(
                    "Skipped imputation for '{}': no non-null values",
                    name
                ));
                log.skipped_columns.push(name);
                continue;
            }
            Err(e) => return Err(e),
        };

        let filled = match &value {
            ImputationValue::Median(value) => fill_numeric_nulls(&series, *value)?,
            ImputationValue::Mode(mode) => fill_string_nulls(&series, mode)?,
            ImputationValue::ModeAt(row) => {
                debug!("Filling '{}' ({}) from row {}", name, series.dtype(), row);
                fill_nulls_from_row(&series, *row)?
            }
        };

        let count = series.null_count();
        df.replace(&name, filled)?;

        log.missing_values_handled += count;
        log.record(format!(
            "Filled {} missing values in '{}' with {}",
            count,
            name,
            value.strategy()
        ));
    }

    Ok(())
}
