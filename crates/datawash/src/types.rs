//! Record types shared between the profiler, the suggestion engine and the
//! presentation layer.
//!
//! Every map from the profile is an ordered vector keyed by column name, so
//! consumers see columns in dataset order.

use crate::utils::ColumnKind;
use serde::{Deserialize, Serialize};

// ============================================================================
// Profile
// ============================================================================

/// Name, kind and null count of a single column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnDescriptor {
    pub name: String,
    pub kind: ColumnKind,
    /// Polars dtype name, e.g. `i64` or `str`.
    pub dtype: String,
    pub null_count: usize,
}

/// Dataset-level facts gathered before any analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BasicInfo {
    pub row_count: usize,
    pub column_count: usize,
    /// Estimated in-memory size of the frame in bytes.
    pub memory_usage_bytes: usize,
    pub columns: Vec<ColumnDescriptor>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnMissing {
    pub column: String,
    pub count: usize,
    pub percentage: f64,
}

/// Columns whose null positions correlate with `column`'s (r > 0.5).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MissingPattern {
    pub column: String,
    pub correlated_with: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MissingValuesProfile {
    pub total_missing: usize,
    pub columns_with_missing: usize,
    /// Only columns with at least one null.
    pub by_column: Vec<ColumnMissing>,
    pub missing_patterns: Vec<MissingPattern>,
}

impl MissingValuesProfile {
    /// Missing entry for a column, if it has any nulls.
    pub fn column(&self, name: &str) -> Option<&ColumnMissing> {
        self.by_column.iter().find(|c| c.column == name)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DuplicatesProfile {
    pub count: usize,
    pub percentage: f64,
    /// Row indices of every row that repeats an earlier row.
    pub duplicate_indices: Vec<usize>,
}

/// Advisory storage optimization for a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TypeOptimization {
    Int8,
    Int16,
    Int32,
    Category,
}

impl TypeOptimization {
    pub fn as_str(&self) -> &'static str {
        match self {
            TypeOptimization::Int8 => "int8",
            TypeOptimization::Int16 => "int16",
            TypeOptimization::Int32 => "int32",
            TypeOptimization::Category => "category",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnTypeInfo {
    pub column: String,
    pub current_type: String,
    /// Distinct non-null values.
    pub unique_values: usize,
    pub suggestions: Vec<TypeOptimization>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnOutliers {
    pub column: String,
    pub count: usize,
    pub percentage: f64,
    pub q1: f64,
    pub q3: f64,
    pub lower_bound: f64,
    pub upper_bound: f64,
    pub outlier_indices: Vec<usize>,
}

/// Spellings of one value that differ only in case or surrounding space.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaseGroup {
    /// Trimmed lowercase form shared by every variant.
    pub normalized: String,
    /// Distinct original spellings in first-seen order.
    pub variants: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoricalIssues {
    pub column: String,
    pub unique_values: usize,
    pub case_groups: Vec<CaseGroup>,
    pub whitespace_issues: bool,
}

impl CategoricalIssues {
    pub fn has_case_issues(&self) -> bool {
        !self.case_groups.is_empty()
    }

    /// Every variant of every flagged group, flattened.
    pub fn case_variants(&self) -> Vec<&str> {
        self.case_groups
            .iter()
            .flat_map(|g| g.variants.iter().map(String::as_str))
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorrelationPair {
    pub feature1: String,
    pub feature2: String,
    /// Absolute Pearson correlation.
    pub correlation: f64,
}

/// Structured data-quality profile of one dataset snapshot.
///
/// Built once by [`crate::profiler::DataProfiler`]; regenerate it if the
/// dataset changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataProfile {
    pub basic_info: BasicInfo,
    pub missing_values: MissingValuesProfile,
    pub duplicates: DuplicatesProfile,
    pub data_types: Vec<ColumnTypeInfo>,
    /// Only columns with at least one outlier.
    pub outliers: Vec<ColumnOutliers>,
    /// Only text columns with at least one flagged condition.
    pub categorical_issues: Vec<CategoricalIssues>,
    pub correlation_issues: Vec<CorrelationPair>,
}

impl DataProfile {
    pub fn row_count(&self) -> usize {
        self.basic_info.row_count
    }

    /// Descriptor of a column by name.
    pub fn descriptor(&self, name: &str) -> Option<&ColumnDescriptor> {
        self.basic_info.columns.iter().find(|c| c.name == name)
    }

    pub fn outliers_for(&self, name: &str) -> Option<&ColumnOutliers> {
        self.outliers.iter().find(|o| o.column == name)
    }

    pub fn categorical_for(&self, name: &str) -> Option<&CategoricalIssues> {
        self.categorical_issues.iter().find(|c| c.column == name)
    }

    pub fn data_type_for(&self, name: &str) -> Option<&ColumnTypeInfo> {
        self.data_types.iter().find(|c| c.column == name)
    }
}

// ============================================================================
// Suggestions
// ============================================================================

/// Priority of a suggestion. Weights: High=3, Medium=2, Low=1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Priority {
    High,
    Medium,
    Low,
}

impl Priority {
    pub fn weight(&self) -> u8 {
        match self {
            Priority::High => 3,
            Priority::Medium => 2,
            Priority::Low => 1,
        }
    }
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Priority::High => "High",
            Priority::Medium => "Medium",
            Priority::Low => "Low",
        };
        f.write_str(s)
    }
}

/// Remediation a suggestion proposes. Advisory only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SuggestedAction {
    RemoveColumns,
    ImputeNumeric,
    ImputeCategorical,
    CarefulImputation,
    RemoveDuplicates,
    HandleOutliers,
    ReviewOutliers,
    OptimizeTypes,
    StandardizeCase,
    StripWhitespace,
}

/// Type-specific payload of a suggestion, tagged by `type` when serialized.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SuggestionDetails {
    MissingValues { affected_columns: Vec<String> },
    Duplicates { count: usize, percentage: f64 },
    Outliers { affected_columns: Vec<String> },
    DataTypes { affected_columns: Vec<String> },
    CategoricalCleaning { affected_columns: Vec<String> },
}

impl SuggestionDetails {
    /// Columns the suggestion concerns; empty for whole-row suggestions.
    pub fn affected_columns(&self) -> &[String] {
        match self {
            SuggestionDetails::MissingValues { affected_columns }
            | SuggestionDetails::Outliers { affected_columns }
            | SuggestionDetails::DataTypes { affected_columns }
            | SuggestionDetails::CategoricalCleaning { affected_columns } => affected_columns,
            SuggestionDetails::Duplicates { .. } => &[],
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            SuggestionDetails::MissingValues { .. } => "missing_values",
            SuggestionDetails::Duplicates { .. } => "duplicates",
            SuggestionDetails::Outliers { .. } => "outliers",
            SuggestionDetails::DataTypes { .. } => "data_types",
            SuggestionDetails::CategoricalCleaning { .. } => "categorical_cleaning",
        }
    }
}

/// Human-facing remediation suggestion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Suggestion {
    pub priority: Priority,
    pub title: String,
    pub description: String,
    pub recommendation: String,
    pub action: SuggestedAction,
    #[serde(flatten)]
    pub details: SuggestionDetails,
}
