//! Case and whitespace inconsistencies in text columns.

use crate::types::{CaseGroup, CategoricalIssues};
use crate::utils::{has_edge_whitespace, series_kind, text_values, ColumnKind};
use polars::prelude::*;
use std::collections::{HashMap, HashSet};

pub(crate) fn detect_categorical_issues(df: &DataFrame) -> PolarsResult<Vec<CategoricalIssues>> {
    let mut issues = Vec::new();

    for col in df.get_columns() {
        let series = col.as_materialized_series();
        if series_kind(series) != ColumnKind::Text {
            continue;
        }

        let values = text_values(series)?;
        let unique_values = values.iter().collect::<HashSet<_>>().len();
        let case_groups = case_groups(&values);
        let whitespace_issues = values.iter().any(|v| has_edge_whitespace(v));

        if !case_groups.is_empty() || whitespace_issues {
            issues.push(CategoricalIssues {
                column: col.name().to_string(),
                unique_values,
                case_groups,
                whitespace_issues,
            });
        }
    }

    Ok(issues)
}

/// Group values by trimmed lowercase form and keep the groups whose variants
/// differ after trimming. Variants that differ only in edge whitespace are a
/// whitespace issue, not a case issue.
fn case_groups(values: &[String]) -> Vec<CaseGroup> {
    let mut groups: Vec<CaseGroup> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for value in values {
        let normalized = value.trim().to_lowercase();
        let slot = *index.entry(normalized.clone()).or_insert_with(|| {
            groups.push(CaseGroup {
                normalized,
                variants: Vec::new(),
            });
            groups.len() - 1
        });

        let group = &mut groups[slot];
        if !group.variants.contains(value) {
            group.variants.push(value.clone());
        }
    }

    groups.retain(|g| {
        let trimmed: HashSet<&str> = g.variants.iter().map(|v| v.trim()).collect();
        trimmed.len() > 1
    });
    groups
}
