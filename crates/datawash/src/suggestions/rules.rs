//! Individual suggestion rules. Each returns zero or more suggestions.

use crate::config::SuggestionRules;
use crate::types::{DataProfile, Priority, SuggestedAction, Suggestion, SuggestionDetails};
use crate::utils::{get_column_kind, ColumnKind};
use polars::prelude::*;

fn quote_columns(columns: &[String]) -> String {
    columns
        .iter()
        .map(|c| format!("'{}'", c))
        .collect::<Vec<_>>()
        .join(", ")
}

fn column_kind(df: &DataFrame, profile: &DataProfile, name: &str) -> Option<ColumnKind> {
    df.column(name)
        .ok()
        .map(|col| get_column_kind(col.dtype()))
        .or_else(|| profile.descriptor(name).map(|d| d.kind))
}

pub(super) fn missing_value_suggestions(
    df: &DataFrame,
    profile: &DataProfile,
    rules: &SuggestionRules,
) -> Vec<Suggestion> {
    let missing = &profile.missing_values;
    if missing.total_missing == 0 {
        return Vec::new();
    }

    let mut high = Vec::new();
    let mut low = Vec::new();
    let mut moderate = Vec::new();

    for entry in &missing.by_column {
        let ratio = entry.percentage / 100.0;
        if ratio > rules.missing_threshold_high {
            high.push(entry.column.clone());
        } else if ratio < rules.missing_threshold_low {
            low.push(entry.column.clone());
        } else {
            moderate.push(entry.column.clone());
        }
    }

    let high_pct = rules.missing_threshold_high * 100.0;
    let low_pct = rules.missing_threshold_low * 100.0;
    let mut suggestions = Vec::new();

    if !high.is_empty() {
        suggestions.push(Suggestion {
            priority: Priority::High,
            title: format!("Remove columns with >{:.0}% missing values", high_pct),
            description: format!(
                "Columns {} have more than {:.0}% missing values",
                quote_columns(&high),
                high_pct
            ),
            recommendation: "Consider removing these columns as imputation may not be reliable"
                .to_string(),
            action: SuggestedAction::RemoveColumns,
            details: SuggestionDetails::MissingValues {
                affected_columns: high,
            },
        });
    }

    if !low.is_empty() {
        let (numeric, categorical): (Vec<String>, Vec<String>) = low
            .into_iter()
            .partition(|c| column_kind(df, profile, c) == Some(ColumnKind::Numeric));

        if !numeric.is_empty() {
            suggestions.push(Suggestion {
                priority: Priority::Medium,
                title: "Impute missing values in numeric columns".to_string(),
                description: format!(
                    "Numeric columns {} have <{:.0}% missing values",
                    quote_columns(&numeric),
                    low_pct
                ),
                recommendation: "Use mean/median imputation or KNN imputation".to_string(),
                action: SuggestedAction::ImputeNumeric,
                details: SuggestionDetails::MissingValues {
                    affected_columns: numeric,
                },
            });
        }

        if !categorical.is_empty() {
            suggestions.push(Suggestion {
                priority: Priority::Medium,
                title: "Impute missing values in categorical columns".to_string(),
                description: format!(
                    "Categorical columns {} have <{:.0}% missing values",
                    quote_columns(&categorical),
                    low_pct
                ),
                recommendation: "Use mode imputation or create an \"Unknown\" category"
                    .to_string(),
                action: SuggestedAction::ImputeCategorical,
                details: SuggestionDetails::MissingValues {
                    affected_columns: categorical,
                },
            });
        }
    }

    if !moderate.is_empty() {
        suggestions.push(Suggestion {
            priority: Priority::Medium,
            title: "Carefully handle moderate missing values".to_string(),
            description: format!(
                "Columns {} have {:.0}-{:.0}% missing values",
                quote_columns(&moderate),
                low_pct,
                high_pct
            ),
            recommendation: "Consider advanced imputation techniques or domain knowledge"
                .to_string(),
            action: SuggestedAction::CarefulImputation,
            details: SuggestionDetails::MissingValues {
                affected_columns: moderate,
            },
        });
    }

    suggestions
}

pub(super) fn duplicate_suggestions(
    profile: &DataProfile,
    rules: &SuggestionRules,
) -> Vec<Suggestion> {
    let duplicates = &profile.duplicates;
    if duplicates.count == 0 {
        return Vec::new();
    }

    let percentage = duplicates.percentage;
    let priority = if percentage > rules.duplicate_high_percent {
        Priority::High
    } else if percentage > rules.duplicate_medium_percent {
        Priority::Medium
    } else {
        Priority::Low
    };

    vec![Suggestion {
        priority,
        title: "Remove duplicate rows".to_string(),
        description: format!(
            "Found {} duplicate rows ({:.2}%)",
            duplicates.count, percentage
        ),
        recommendation: "Remove duplicate rows to avoid bias in analysis".to_string(),
        action: SuggestedAction::RemoveDuplicates,
        details: SuggestionDetails::Duplicates {
            count: duplicates.count,
            percentage,
        },
    }]
}

pub(super) fn outlier_suggestions(
    profile: &DataProfile,
    rules: &SuggestionRules,
) -> Vec<Suggestion> {
    let (high, moderate): (Vec<_>, Vec<_>) = profile
        .outliers
        .iter()
        .partition(|o| o.percentage / 100.0 > rules.outlier_threshold);

    let high: Vec<String> = high.into_iter().map(|o| o.column.clone()).collect();
    let moderate: Vec<String> = moderate.into_iter().map(|o| o.column.clone()).collect();
    let threshold_pct = rules.outlier_threshold * 100.0;
    let mut suggestions = Vec::new();

    if !high.is_empty() {
        suggestions.push(Suggestion {
            priority: Priority::Medium,
            title: "Handle outliers in columns with high outlier percentage".to_string(),
            description: format!(
                "Columns {} have >{:.0}% outliers",
                quote_columns(&high),
                threshold_pct
            ),
            recommendation:
                "Consider capping, transformation, or removal based on domain knowledge"
                    .to_string(),
            action: SuggestedAction::HandleOutliers,
            details: SuggestionDetails::Outliers {
                affected_columns: high,
            },
        });
    }

    if !moderate.is_empty() {
        suggestions.push(Suggestion {
            priority: Priority::Low,
            title: "Review outliers in columns".to_string(),
            description: format!("Columns {} have moderate outliers", quote_columns(&moderate)),
            recommendation: "Review outliers manually; they might be valid extreme values"
                .to_string(),
            action: SuggestedAction::ReviewOutliers,
            details: SuggestionDetails::Outliers {
                affected_columns: moderate,
            },
        });
    }

    suggestions
}

pub(super) fn data_type_suggestions(profile: &DataProfile) -> Vec<Suggestion> {
    let optimizable: Vec<String> = profile
        .data_types
        .iter()
        .filter(|info| !info.suggestions.is_empty())
        .map(|info| info.column.clone())
        .collect();

    if optimizable.is_empty() {
        return Vec::new();
    }

    vec![Suggestion {
        priority: Priority::Low,
        title: "Optimize data types for memory efficiency".to_string(),
        description: format!("Columns {} can be optimized", quote_columns(&optimizable)),
        recommendation: "Convert to more efficient data types to reduce memory usage".to_string(),
        action: SuggestedAction::OptimizeTypes,
        details: SuggestionDetails::DataTypes {
            affected_columns: optimizable,
        },
    }]
}

pub(super) fn categorical_suggestions(profile: &DataProfile) -> Vec<Suggestion> {
    let case_columns: Vec<String> = profile
        .categorical_issues
        .iter()
        .filter(|issues| issues.has_case_issues())
        .map(|issues| issues.column.clone())
        .collect();
    let whitespace_columns: Vec<String> = profile
        .categorical_issues
        .iter()
        .filter(|issues| issues.whitespace_issues)
        .map(|issues| issues.column.clone())
        .collect();

    let mut suggestions = Vec::new();

    if !case_columns.is_empty() {
        suggestions.push(Suggestion {
            priority: Priority::Medium,
            title: "Standardize text case in categorical columns".to_string(),
            description: format!(
                "Columns {} have case inconsistencies",
                quote_columns(&case_columns)
            ),
            recommendation: "Standardize text case (e.g., lowercase) for consistency".to_string(),
            action: SuggestedAction::StandardizeCase,
            details: SuggestionDetails::CategoricalCleaning {
                affected_columns: case_columns,
            },
        });
    }

    if !whitespace_columns.is_empty() {
        suggestions.push(Suggestion {
            priority: Priority::Low,
            title: "Remove whitespace from categorical columns".to_string(),
            description: format!(
                "Columns {} have whitespace issues",
                quote_columns(&whitespace_columns)
            ),
            recommendation: "Strip leading/trailing whitespace".to_string(),
            action: SuggestedAction::StripWhitespace,
            details: SuggestionDetails::CategoricalCleaning {
                affected_columns: whitespace_columns,
            },
        });
    }

    suggestions
}
