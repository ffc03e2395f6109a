//! Structured data commands produced by instruction translation.
//!
//! Commands are surfaced to a human and never executed by this crate.

use crate::error::{CleaningError, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Service name used in errors raised while parsing translator replies.
pub(crate) const TRANSLATOR_SERVICE: &str = "instruction_translator";

/// One of the five supported data commands, tagged by `action`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum DataCommand {
    RemoveRows {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        column: Option<String>,
        /// Free-form condition, e.g. `age < 18`.
        #[serde(default, alias = "filter", skip_serializing_if = "Option::is_none")]
        condition: Option<String>,
    },
    DropColumn {
        #[serde(alias = "column_name", alias = "name")]
        column: String,
    },
    FillMissing {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        column: Option<String>,
        #[serde(default, alias = "strategy", skip_serializing_if = "Option::is_none")]
        method: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        value: Option<Value>,
    },
    RemoveDuplicates {
        #[serde(default, alias = "columns", skip_serializing_if = "Option::is_none")]
        subset: Option<Vec<String>>,
    },
    RenameColumn {
        #[serde(alias = "old_name", alias = "from")]
        column: String,
        #[serde(alias = "to", alias = "new_column")]
        new_name: String,
    },
}

impl DataCommand {
    pub fn action_name(&self) -> &'static str {
        match self {
            DataCommand::RemoveRows { .. } => "remove_rows",
            DataCommand::DropColumn { .. } => "drop_column",
            DataCommand::FillMissing { .. } => "fill_missing",
            DataCommand::RemoveDuplicates { .. } => "remove_duplicates",
            DataCommand::RenameColumn { .. } => "rename_column",
        }
    }

    /// Columns the command reads or modifies. A rename's new name is excluded.
    pub fn referenced_columns(&self) -> Vec<&str> {
        match self {
            DataCommand::RemoveRows { column, .. } | DataCommand::FillMissing { column, .. } => {
                column.as_deref().into_iter().collect()
            }
            DataCommand::DropColumn { column } | DataCommand::RenameColumn { column, .. } => {
                vec![column.as_str()]
            }
            DataCommand::RemoveDuplicates { subset } => subset
                .iter()
                .flatten()
                .map(String::as_str)
                .collect(),
        }
    }

    /// Fail with [`CleaningError::ColumnNotFound`] for the first referenced
    /// column missing from `columns`.
    pub fn check_columns(&self, columns: &[String]) -> Result<()> {
        match self
            .referenced_columns()
            .into_iter()
            .find(|name| !columns.iter().any(|c| c == name))
        {
            Some(missing) => Err(CleaningError::ColumnNotFound(missing.to_string())),
            None => Ok(()),
        }
    }
}

impl fmt::Display for DataCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataCommand::RemoveRows { column, condition } => {
                write!(f, "remove rows")?;
                if let Some(column) = column {
                    write!(f, " in '{}'", column)?;
                }
                if let Some(condition) = condition {
                    write!(f, " where {}", condition)?;
                }
                Ok(())
            }
            DataCommand::DropColumn { column } => write!(f, "drop column '{}'", column),
            DataCommand::FillMissing {
                column,
                method,
                value,
            } => {
                write!(f, "fill missing values")?;
                if let Some(column) = column {
                    write!(f, " in '{}'", column)?;
                }
                match (method, value) {
                    (_, Some(value)) => write!(f, " with {}", value),
                    (Some(method), None) => write!(f, " using {}", method),
                    (None, None) => Ok(()),
                }
            }
            DataCommand::RemoveDuplicates { subset } => match subset {
                Some(columns) => write!(f, "remove duplicates on {}", columns.join(", ")),
                None => write!(f, "remove duplicate rows"),
            },
            DataCommand::RenameColumn { column, new_name } => {
                write!(f, "rename column '{}' to '{}'", column, new_name)
            }
        }
    }
}

/// Strip a surrounding Markdown code fence, if any.
fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };

    // Drop the info string (`json`) on the opening line.
    let body = rest.split_once('\n').map_or("", |(_, body)| body);
    body.trim_end().strip_suffix("```").unwrap_or(body).trim()
}

/// Parse a translator reply into commands.
///
/// Accepts a single command object, an array of them, or an object with a
/// `commands` array. Models sometimes name the tag `operation`; that is
/// accepted too.
pub fn parse_commands(reply: &str) -> Result<Vec<DataCommand>> {
    let body = strip_code_fence(reply);
    let value: Value = serde_json::from_str(body).map_err(|e| {
        CleaningError::external(TRANSLATOR_SERVICE, format!("reply is not valid JSON: {}", e))
    })?;

    let items = match value {
        Value::Array(items) => items,
        Value::Object(mut map) => match map.remove("commands") {
            Some(Value::Array(items)) => items,
            Some(_) => {
                return Err(CleaningError::external(
                    TRANSLATOR_SERVICE,
                    "'commands' is not an array",
                ));
            }
            None => vec![Value::Object(map)],
        },
        other => {
            return Err(CleaningError::external(
                TRANSLATOR_SERVICE,
                format!("expected a JSON object or array, got {}", other),
            ));
        }
    };

    items.into_iter().map(parse_command).collect()
}

fn parse_command(mut item: Value) -> Result<DataCommand> {
    if let Value::Object(map) = &mut item
        && !map.contains_key("action")
        && let Some(operation) = map.remove("operation")
    {
        map.insert("action".to_string(), operation);
    }

    serde_json::from_value(item).map_err(|e| {
        CleaningError::external(TRANSLATOR_SERVICE, format!("unsupported command: {}", e))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_single_object() {
        let commands = parse_commands(r#"{"action": "drop_column", "column": "notes"}"#).unwrap();
        assert_eq!(
            commands,
            vec![DataCommand::DropColumn {
                column: "notes".to_string()
            }]
        );
    }

    #[test]
    fn test_parse_fenced_array_with_aliases() {
        let reply = "```json\n[\n  {\"action\": \"rename_column\", \"old_name\": \"nm\", \"new_name\": \"name\"},\n  {\"operation\": \"remove_duplicates\"}\n]\n```";
        let commands = parse_commands(reply).unwrap();

        assert_eq!(
            commands,
            vec![
                DataCommand::RenameColumn {
                    column: "nm".to_string(),
                    new_name: "name".to_string()
                },
                DataCommand::RemoveDuplicates { subset: None },
            ]
        );
    }

    #[test]
    fn test_parse_commands_wrapper() {
        let reply = r#"{"commands": [{"action": "fill_missing", "column": "age", "strategy": "median"}]}"#;
        let commands = parse_commands(reply).unwrap();

        assert_eq!(commands[0].action_name(), "fill_missing");
        assert_eq!(commands[0].to_string(), "fill missing values in 'age' using median");
    }

    #[test]
    fn test_invalid_replies_are_external_errors() {
        let not_json = parse_commands("Sure! I removed the rows.").unwrap_err();
        assert!(not_json.is_external());

        let unknown = parse_commands(r#"{"action": "train_model"}"#).unwrap_err();
        assert_eq!(unknown.error_code(), "EXTERNAL_SERVICE_ERROR");

        let scalar = parse_commands("42").unwrap_err();
        assert!(scalar.is_external());
    }

    #[test]
    fn test_serializes_with_action_tag() {
        let command = DataCommand::RemoveRows {
            column: Some("age".to_string()),
            condition: Some("age < 0".to_string()),
        };
        let value = serde_json::to_value(&command).unwrap();

        assert_eq!(value["action"], "remove_rows");
        assert_eq!(command.to_string(), "remove rows in 'age' where age < 0");
    }

    #[test]
    fn test_check_columns_reports_unknown_column() {
        let columns = vec!["age".to_string(), "city".to_string()];

        let rename = DataCommand::RenameColumn {
            column: "city".to_string(),
            new_name: "town".to_string(),
        };
        assert!(rename.check_columns(&columns).is_ok());

        let dedup = DataCommand::RemoveDuplicates {
            subset: Some(vec!["age".to_string(), "zip".to_string()]),
        };
        let err = dedup.check_columns(&columns).unwrap_err();
        assert_eq!(err.error_code(), "COLUMN_NOT_FOUND");
        assert_eq!(err.to_string(), "Column 'zip' not found in dataset");
        assert!(!err.is_recoverable());

        let unscoped = DataCommand::RemoveRows {
            column: None,
            condition: Some("age < 0".to_string()),
        };
        assert!(unscoped.referenced_columns().is_empty());
    }
}
