//! OpenAI chat-completions instruction translator.
//!
//! This module provides the [`OpenAiTranslator`] which implements
//! [`InstructionTranslator`] on top of the chat completions endpoint.

use super::command::{parse_commands, TRANSLATOR_SERVICE};
use super::{DataCommand, InstructionTranslator};
use crate::error::{CleaningError, Result};
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};

/// Default chat completions endpoint.
const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1/chat/completions";

/// Default model for instruction translation.
const DEFAULT_MODEL: &str = "gpt-4o-mini";

const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Low temperature keeps the JSON shape stable.
const DEFAULT_TEMPERATURE: f32 = 0.0;

const DEFAULT_MAX_TOKENS: u32 = 500;

#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<Message>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Serialize, Deserialize)]
struct Message {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Option<Vec<Choice>>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: Option<Message>,
}

/// Configuration for the OpenAI translator.
#[derive(Debug, Clone)]
pub struct OpenAiConfig {
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
    pub timeout_secs: u64,
    /// Base URL for the API (useful for proxies or compatible servers).
    pub base_url: String,
}

impl Default for OpenAiConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            temperature: DEFAULT_TEMPERATURE,
            max_tokens: DEFAULT_MAX_TOKENS,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }
}

impl OpenAiConfig {
    pub fn builder() -> OpenAiConfigBuilder {
        OpenAiConfigBuilder::default()
    }
}

/// Builder for [`OpenAiConfig`].
#[derive(Default)]
pub struct OpenAiConfigBuilder {
    model: Option<String>,
    temperature: Option<f32>,
    max_tokens: Option<u32>,
    timeout_secs: Option<u64>,
    base_url: Option<String>,
}

impl OpenAiConfigBuilder {
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    pub fn temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    pub fn max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    pub fn timeout_secs(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = Some(timeout_secs);
        self
    }

    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    pub fn build(self) -> OpenAiConfig {
        OpenAiConfig {
            model: self.model.unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            temperature: self.temperature.unwrap_or(DEFAULT_TEMPERATURE),
            max_tokens: self.max_tokens.unwrap_or(DEFAULT_MAX_TOKENS),
            timeout_secs: self.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS),
            base_url: self.base_url.unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
        }
    }
}

/// Translates free-text instructions into [`DataCommand`]s with an OpenAI
/// chat model.
///
/// # Example
///
/// ```rust,ignore
/// use datawash::ai::{InstructionTranslator, OpenAiTranslator};
///
/// let translator = OpenAiTranslator::new(std::env::var("OPENAI_API_KEY")?)?;
/// let commands = translator.translate("drop the notes column", &columns)?;
/// ```
pub struct OpenAiTranslator {
    api_key: String,
    config: OpenAiConfig,
    client: Client,
}

static_assertions::assert_impl_all!(OpenAiTranslator: Send, Sync);

impl OpenAiTranslator {
    /// Create a translator with default configuration.
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        Self::with_config(api_key, OpenAiConfig::default())
    }

    /// Create a translator with custom configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created.
    pub fn with_config(api_key: impl Into<String>, config: OpenAiConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| {
                CleaningError::external(
                    TRANSLATOR_SERVICE,
                    format!("Failed to build HTTP client: {}", e),
                )
            })?;

        Ok(Self {
            api_key: api_key.into(),
            config,
            client,
        })
    }

    pub(crate) fn build_prompt(instruction: &str, columns: &[String]) -> String {
        format!(
            "You are a data transformation engine.\n\n\
            Dataset columns:\n{:?}\n\n\
            Convert the following instruction into structured JSON.\n\n\
            Supported actions:\n\
            - remove_rows\n\
            - drop_column\n\
            - fill_missing\n\
            - remove_duplicates\n\
            - rename_column\n\n\
            Every command is an object with an \"action\" field set to one of the \
            supported actions. Return a single object, or {{\"commands\": [...]}} \
            for several.\n\n\
            Instruction:\n{}\n\n\
            Return ONLY valid JSON.",
            columns, instruction
        )
    }

    fn call_api(&self, prompt: &str) -> Result<String> {
        let request = ChatRequest {
            model: self.config.model.clone(),
            messages: vec![Message {
                role: "user".to_string(),
                content: prompt.to_string(),
            }],
            temperature: self.config.temperature,
            max_tokens: self.config.max_tokens,
        };

        let response = self
            .client
            .post(&self.config.base_url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .map_err(|e| CleaningError::external(TRANSLATOR_SERVICE, e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(CleaningError::external(
                TRANSLATOR_SERVICE,
                format!("OpenAI API Error {}: {}", status, body),
            ));
        }

        let result: ChatResponse = response
            .json()
            .map_err(|e| CleaningError::external(TRANSLATOR_SERVICE, e.to_string()))?;

        result
            .choices
            .as_ref()
            .and_then(|choices| choices.first())
            .and_then(|choice| choice.message.as_ref())
            .map(|msg| msg.content.clone())
            .filter(|content| !content.trim().is_empty())
            .ok_or_else(|| {
                CleaningError::external(TRANSLATOR_SERVICE, "No response content from OpenAI API")
            })
    }
}

impl InstructionTranslator for OpenAiTranslator {
    fn translate(&self, instruction: &str, columns: &[String]) -> Result<Vec<DataCommand>> {
        let prompt = Self::build_prompt(instruction, columns);
        let reply = self.call_api(&prompt).inspect_err(|e| {
            warn!("Instruction translation failed: {}", e);
        })?;

        debug!("Translator reply: {}", reply);
        parse_commands(&reply)
    }

    fn name(&self) -> &str {
        "OpenAI"
    }

    fn model(&self) -> Option<&str> {
        Some(&self.config.model)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_builder_defaults() {
        let config = OpenAiConfig::builder().model("gpt-4o").build();

        assert_eq!(config.model, "gpt-4o");
        assert_eq!(config.timeout_secs, DEFAULT_TIMEOUT_SECS);
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
    }

    #[test]
    fn test_prompt_lists_columns_and_actions() {
        let prompt = OpenAiTranslator::build_prompt(
            "drop the notes column",
            &["age".to_string(), "notes".to_string()],
        );

        assert!(prompt.contains(r#"["age", "notes"]"#));
        assert!(prompt.contains("- rename_column"));
        assert!(prompt.contains("drop the notes column"));
        assert!(prompt.ends_with("Return ONLY valid JSON."));
    }

    #[test]
    fn test_unreachable_endpoint_is_external_error() {
        let config = OpenAiConfig::builder()
            .base_url("http://127.0.0.1:9/v1/chat/completions")
            .timeout_secs(2)
            .build();
        let translator = OpenAiTranslator::with_config("test-key", config).unwrap();

        let err = translator.translate("remove duplicates", &[]).unwrap_err();
        assert!(err.is_external());
        assert_eq!(translator.model(), Some("gpt-4o-mini"));
    }
}
