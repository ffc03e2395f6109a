//! Configuration types for cleaning and suggestion generation.
//!
//! [`CleaningConfig`] is the only programmatic link between a user's choices
//! and what the cleaner does. It deserializes from loosely specified JSON:
//! any flag left out disables its stage.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Case normalization applied during text standardization.
///
/// Unrecognized values are kept verbatim and leave case untouched, so a
/// config written for a newer front end never fails to load.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum TextCase {
    /// All lowercase.
    #[default]
    Lower,
    /// Title case: first letter of every word uppercase, the rest lowercase.
    Title,
    /// Any other value; whitespace is still normalized but case is kept.
    Unchanged(String),
}

impl TextCase {
    /// Apply the case transformation to a value.
    pub fn apply(&self, value: &str) -> String {
        match self {
            TextCase::Lower => value.to_lowercase(),
            TextCase::Title => to_title_case(value),
            TextCase::Unchanged(_) => value.to_string(),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            TextCase::Lower => "lower",
            TextCase::Title => "title",
            TextCase::Unchanged(other) => other,
        }
    }
}

impl From<String> for TextCase {
    fn from(value: String) -> Self {
        match value.as_str() {
            "lower" => TextCase::Lower,
            "title" => TextCase::Title,
            _ => TextCase::Unchanged(value),
        }
    }
}

impl From<&str> for TextCase {
    fn from(value: &str) -> Self {
        TextCase::from(value.to_string())
    }
}

impl From<TextCase> for String {
    fn from(value: TextCase) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for TextCase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Uppercase the first letter of every run of letters, lowercase the rest.
///
/// Any non-alphabetic character starts a new word, so `"o'neil 2nd"` becomes
/// `"O'Neil 2Nd"`.
pub(crate) fn to_title_case(value: &str) -> String {
    let mut result = String::with_capacity(value.len());
    let mut previous_is_letter = false;

    for c in value.chars() {
        if c.is_alphabetic() {
            if previous_is_letter {
                result.extend(c.to_lowercase());
            } else {
                result.extend(c.to_uppercase());
            }
            previous_is_letter = true;
        } else {
            result.push(c);
            previous_is_letter = false;
        }
    }

    result
}

/// Configuration for a cleaning pass.
///
/// Stages always run in the order missing values → duplicates → text,
/// each gated by its own flag.
///
/// # Example
///
/// ```rust,ignore
/// use datawash::config::{CleaningConfig, TextCase};
///
/// let config = CleaningConfig::builder()
///     .handle_missing(true)
///     .standardize_text(true)
///     .text_case(TextCase::Title)
///     .build();
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CleaningConfig {
    /// Fill nulls (median for numeric columns, mode otherwise).
    pub handle_missing: bool,

    /// Drop rows that repeat an earlier row.
    pub remove_duplicates: bool,

    /// Collapse whitespace, trim and normalize case in text columns.
    pub standardize_text: bool,

    /// Case applied when `standardize_text` is set.
    /// Default: lower
    pub text_case: TextCase,
}

impl CleaningConfig {
    /// Create a new configuration builder.
    pub fn builder() -> CleaningConfigBuilder {
        CleaningConfigBuilder::default()
    }

    /// Configuration with every stage enabled and lowercase text.
    pub fn all_stages() -> Self {
        Self {
            handle_missing: true,
            remove_duplicates: true,
            standardize_text: true,
            text_case: TextCase::Lower,
        }
    }

    /// Whether any stage is enabled.
    pub fn any_stage_enabled(&self) -> bool {
        self.handle_missing || self.remove_duplicates || self.standardize_text
    }
}

/// Builder for [`CleaningConfig`] with fluent API.
#[derive(Debug, Default)]
pub struct CleaningConfigBuilder {
    handle_missing: Option<bool>,
    remove_duplicates: Option<bool>,
    standardize_text: Option<bool>,
    text_case: Option<TextCase>,
}

impl CleaningConfigBuilder {
    /// Enable or disable missing-value imputation.
    pub fn handle_missing(mut self, enable: bool) -> Self {
        self.handle_missing = Some(enable);
        self
    }

    /// Enable or disable duplicate row removal.
    pub fn remove_duplicates(mut self, enable: bool) -> Self {
        self.remove_duplicates = Some(enable);
        self
    }

    /// Enable or disable text standardization.
    pub fn standardize_text(mut self, enable: bool) -> Self {
        self.standardize_text = Some(enable);
        self
    }

    /// Set the case applied during text standardization.
    pub fn text_case(mut self, case: impl Into<TextCase>) -> Self {
        self.text_case = Some(case.into());
        self
    }

    /// Build the configuration. Unset flags are disabled.
    pub fn build(self) -> CleaningConfig {
        CleaningConfig {
            handle_missing: self.handle_missing.unwrap_or(false),
            remove_duplicates: self.remove_duplicates.unwrap_or(false),
            standardize_text: self.standardize_text.unwrap_or(false),
            text_case: self.text_case.unwrap_or_default(),
        }
    }
}

/// Thresholds used by the suggestion engine.
///
/// Ratios are fractions in `0.0..=1.0`; duplicate cut-offs are percentages.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SuggestionRules {
    /// Below this missing ratio a column is a simple imputation candidate.
    pub missing_threshold_low: f64,
    /// Above this missing ratio a column is a removal candidate.
    pub missing_threshold_high: f64,
    /// Above this outlier ratio a column needs active outlier handling.
    pub outlier_threshold: f64,
    /// Duplicate percentage above which the suggestion is High priority.
    pub duplicate_high_percent: f64,
    /// Duplicate percentage above which the suggestion is Medium priority.
    pub duplicate_medium_percent: f64,
}

impl Default for SuggestionRules {
    fn default() -> Self {
        Self {
            missing_threshold_low: 0.10,
            missing_threshold_high: 0.40,
            outlier_threshold: 0.05,
            duplicate_high_percent: 5.0,
            duplicate_medium_percent: 1.0,
        }
    }
}

impl SuggestionRules {
    /// Validate the thresholds and return errors if invalid.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        for (field, value) in [
            ("missing_threshold_low", self.missing_threshold_low),
            ("missing_threshold_high", self.missing_threshold_high),
            ("outlier_threshold", self.outlier_threshold),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigValidationError::InvalidThreshold {
                    field: field.to_string(),
                    value,
                });
            }
        }

        if self.missing_threshold_low > self.missing_threshold_high {
            return Err(ConfigValidationError::InvertedRange {
                low: "missing_threshold_low".to_string(),
                high: "missing_threshold_high".to_string(),
            });
        }

        if self.duplicate_medium_percent > self.duplicate_high_percent {
            return Err(ConfigValidationError::InvertedRange {
                low: "duplicate_medium_percent".to_string(),
                high: "duplicate_high_percent".to_string(),
            });
        }

        Ok(())
    }
}

/// Errors that can occur during configuration validation.
#[derive(Debug, thiserror::Error)]
pub enum ConfigValidationError {
    #[error("Invalid threshold for '{field}': {value} (must be between 0.0 and 1.0)")]
    InvalidThreshold { field: String, value: f64 },

    #[error("'{low}' must not exceed '{high}'")]
    InvertedRange { low: String, high: String },
}

impl From<ConfigValidationError> for crate::error::CleaningError {
    fn from(err: ConfigValidationError) -> Self {
        crate::error::CleaningError::InvalidConfig(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_disables_everything() {
        let config = CleaningConfig::default();
        assert!(!config.handle_missing);
        assert!(!config.remove_duplicates);
        assert!(!config.standardize_text);
        assert_eq!(config.text_case, TextCase::Lower);
        assert!(!config.any_stage_enabled());
    }

    #[test]
    fn test_missing_flags_default_to_disabled() {
        let config: CleaningConfig = serde_json::from_str(r#"{"handle_missing": true}"#).unwrap();
        assert!(config.handle_missing);
        assert!(!config.remove_duplicates);
        assert!(!config.standardize_text);
        assert_eq!(config.text_case, TextCase::Lower);
    }

    #[test]
    fn test_unknown_text_case_is_preserved() {
        let config: CleaningConfig =
            serde_json::from_str(r#"{"standardize_text": true, "text_case": "upper"}"#).unwrap();
        assert_eq!(config.text_case, TextCase::Unchanged("upper".to_string()));
        assert_eq!(config.text_case.apply("MiXeD"), "MiXeD");

        let json = serde_json::to_string(&config).unwrap();
        assert!(json.contains(r#""text_case":"upper""#));
    }

    #[test]
    fn test_builder_custom_values() {
        let config = CleaningConfig::builder()
            .handle_missing(true)
            .standardize_text(true)
            .text_case("title")
            .build();

        assert!(config.handle_missing);
        assert!(!config.remove_duplicates);
        assert!(config.standardize_text);
        assert_eq!(config.text_case, TextCase::Title);
    }

    #[test]
    fn test_title_case() {
        assert_eq!(to_title_case("new york"), "New York");
        assert_eq!(to_title_case("NEW YORK"), "New York");
        assert_eq!(to_title_case("o'neil"), "O'Neil");
        assert_eq!(to_title_case("route66west"), "Route66West");
        assert_eq!(to_title_case(""), "");
    }

    #[test]
    fn test_text_case_apply() {
        assert_eq!(TextCase::Lower.apply("Los Angeles"), "los angeles");
        assert_eq!(TextCase::Title.apply("los angeles"), "Los Angeles");
    }

    #[test]
    fn test_suggestion_rules_defaults_are_valid() {
        let rules = SuggestionRules::default();
        assert_eq!(rules.missing_threshold_low, 0.10);
        assert_eq!(rules.missing_threshold_high, 0.40);
        assert_eq!(rules.outlier_threshold, 0.05);
        assert!(rules.validate().is_ok());
    }

    #[test]
    fn test_suggestion_rules_validation() {
        let rules = SuggestionRules {
            outlier_threshold: 1.5,
            ..SuggestionRules::default()
        };
        assert!(matches!(
            rules.validate(),
            Err(ConfigValidationError::InvalidThreshold { .. })
        ));

        let rules = SuggestionRules {
            missing_threshold_low: 0.5,
            missing_threshold_high: 0.2,
            ..SuggestionRules::default()
        };
        assert!(matches!(
            rules.validate(),
            Err(ConfigValidationError::InvertedRange { .. })
        ));
    }
}
