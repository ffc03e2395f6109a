//! Suggestion engine: turns a [`DataProfile`] into ranked remediation advice.
//!
//! Suggestions are advisory. Nothing here feeds back into the cleaner; the
//! only programmatic link to cleaning behavior is
//! [`CleaningConfig`](crate::config::CleaningConfig).

mod rules;

use crate::config::SuggestionRules;
use crate::error::Result;
use crate::types::{DataProfile, Suggestion};
use polars::prelude::*;
use std::cmp::Reverse;
use tracing::{debug, info};

/// Rule-based suggestion engine.
///
/// Rules are evaluated in a fixed order (missing values, duplicates,
/// outliers, data types, categorical cleaning) and the combined list is
/// stably sorted by descending priority weight.
#[derive(Debug, Clone, Default)]
pub struct SuggestionEngine {
    rules: SuggestionRules,
}

impl SuggestionEngine {
    /// Create an engine with the default thresholds.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an engine with custom thresholds.
    pub fn with_rules(rules: SuggestionRules) -> Result<Self> {
        rules.validate()?;
        Ok(Self { rules })
    }

    pub fn rules(&self) -> &SuggestionRules {
        &self.rules
    }

    /// Generate suggestions for a dataset and its profile.
    pub fn suggest(&self, df: &DataFrame, profile: &DataProfile) -> Vec<Suggestion> {
        let mut suggestions = Vec::new();

        suggestions.extend(rules::missing_value_suggestions(df, profile, &self.rules));
        suggestions.extend(rules::duplicate_suggestions(profile, &self.rules));
        suggestions.extend(rules::outlier_suggestions(profile, &self.rules));
        suggestions.extend(rules::data_type_suggestions(profile));
        suggestions.extend(rules::categorical_suggestions(profile));

        suggestions.sort_by_key(|s| Reverse(s.priority.weight()));

        for suggestion in &suggestions {
            debug!(
                "[{}] {} ({})",
                suggestion.priority,
                suggestion.title,
                suggestion.details.type_name()
            );
        }
        info!("Generated {} suggestions", suggestions.len());

        suggestions
    }
}
