use crate::types::DuplicatesProfile;
use crate::utils::{duplicate_row_flags, percentage};
use polars::prelude::*;

/// Count rows that exactly repeat an earlier row. The first occurrence is
/// never counted.
pub(crate) fn analyze_duplicates(df: &DataFrame) -> PolarsResult<DuplicatesProfile> {
    let duplicate_indices: Vec<usize> = duplicate_row_flags(df)?
        .into_iter()
        .enumerate()
        .filter_map(|(idx, is_dup)| is_dup.then_some(idx))
        .collect();

    let count = duplicate_indices.len();
    Ok(DuplicatesProfile {
        count,
        percentage: percentage(count, df.height()),
        duplicate_indices,
    })
}
