use crate::utils::duplicate_row_flags;
use polars::prelude::*;

/// Drop every row that repeats an earlier row, keeping the first occurrence
/// and the original row order. Returns the new frame and the removed count.
pub(crate) fn remove_duplicate_rows(df: &DataFrame) -> PolarsResult<(DataFrame, usize)> {
    let flags = duplicate_row_flags(df)?;
    let removed = flags.iter().filter(|d| **d).count();
    if removed == 0 {
        return Ok((df.clone(), 0));
    }

    let keep: Vec<bool> = flags.into_iter().map(|d| !d).collect();
    let mask = BooleanChunked::from_slice("keep".into(), &keep);
    Ok((df.filter(&mask)?, removed))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keeps_first_occurrence_in_order() {
        let df = df![
            "id" => [3i64, 1, 3, 2, 1],
            "v" => ["c", "a", "c", "b", "a"],
        ]
        .unwrap();

        let (deduped, removed) = remove_duplicate_rows(&df).unwrap();
        assert_eq!(removed, 2);

        let ids: Vec<i64> = deduped
            .column("id")
            .unwrap()
            .as_materialized_series()
            .i64()
            .unwrap()
            .into_iter()
            .flatten()
            .collect();
        assert_eq!(ids, vec![3, 1, 2]);
    }

    #[test]
    fn test_no_duplicates_returns_same_rows() {
        let df = df!["id" => [1i64, 2, 3]].unwrap();
        let (deduped, removed) = remove_duplicate_rows(&df).unwrap();

        assert_eq!(removed, 0);
        assert!(deduped.equals(&df));
    }
}
