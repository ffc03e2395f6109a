//! Whisper transcription over the OpenAI audio endpoint.

use super::Transcriber;
use crate::error::{CleaningError, Result};
use reqwest::blocking::{multipart, Client};
use serde::Deserialize;
use std::io;
use std::path::Path;
use std::time::Duration;
use tracing::{info, warn};

const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1/audio/transcriptions";
const DEFAULT_MODEL: &str = "whisper-1";
const DEFAULT_TIMEOUT_SECS: u64 = 120;

const SERVICE: &str = "transcriber";

#[derive(Debug, Deserialize)]
struct TranscriptionResponse {
    text: Option<String>,
}

/// Configuration for the Whisper transcriber.
#[derive(Debug, Clone)]
pub struct WhisperConfig {
    pub model: String,
    /// Optional ISO-639-1 language hint.
    pub language: Option<String>,
    pub timeout_secs: u64,
    pub base_url: String,
}

impl Default for WhisperConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            language: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }
}

impl WhisperConfig {
    pub fn builder() -> WhisperConfigBuilder {
        WhisperConfigBuilder::default()
    }
}

/// Builder for [`WhisperConfig`].
#[derive(Default)]
pub struct WhisperConfigBuilder {
    model: Option<String>,
    language: Option<String>,
    timeout_secs: Option<u64>,
    base_url: Option<String>,
}

impl WhisperConfigBuilder {
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    pub fn language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
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

    pub fn build(self) -> WhisperConfig {
        WhisperConfig {
            model: self.model.unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            language: self.language,
            timeout_secs: self.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS),
            base_url: self.base_url.unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
        }
    }
}

/// Speech-to-text through a Whisper model.
pub struct WhisperTranscriber {
    api_key: String,
    config: WhisperConfig,
    client: Client,
}

static_assertions::assert_impl_all!(WhisperTranscriber: Send, Sync);

impl WhisperTranscriber {
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        Self::with_config(api_key, WhisperConfig::default())
    }

    pub fn with_config(api_key: impl Into<String>, config: WhisperConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| {
                CleaningError::external(SERVICE, format!("Failed to build HTTP client: {}", e))
            })?;

        Ok(Self {
            api_key: api_key.into(),
            config,
            client,
        })
    }

    pub fn config(&self) -> &WhisperConfig {
        &self.config
    }
}

impl Transcriber for WhisperTranscriber {
    fn transcribe(&self, audio_path: &Path) -> Result<String> {
        if !audio_path.is_file() {
            return Err(CleaningError::Io(io::Error::new(
                io::ErrorKind::NotFound,
                format!("Audio file not found: {}", audio_path.display()),
            )));
        }

        let mut form = multipart::Form::new()
            .text("model", self.config.model.clone())
            .file("file", audio_path)?;
        if let Some(language) = &self.config.language {
            form = form.text("language", language.clone());
        }

        info!("Transcribing {}", audio_path.display());

        let response = self
            .client
            .post(&self.config.base_url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .multipart(form)
            .send()
            .map_err(|e| {
                warn!("Transcription request failed: {}", e);
                CleaningError::external(SERVICE, e.to_string())
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(CleaningError::external(
                SERVICE,
                format!("Transcription API Error {}: {}", status, body),
            ));
        }

        let result: TranscriptionResponse = response
            .json()
            .map_err(|e| CleaningError::external(SERVICE, e.to_string()))?;

        result
            .text
            .map(|text| text.trim().to_string())
            .filter(|text| !text.is_empty())
            .ok_or_else(|| CleaningError::external(SERVICE, "Empty transcription"))
    }

    fn name(&self) -> &str {
        "Whisper"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_audio_is_io_error() {
        let transcriber = WhisperTranscriber::new("test-key").unwrap();
        let err = transcriber
            .transcribe(Path::new("/nonexistent/clip.mp3"))
            .unwrap_err();

        assert_eq!(err.error_code(), "IO_ERROR");
        assert!(!err.is_external());
    }

    #[test]
    fn test_unreachable_endpoint_is_external_error() {
        let audio = std::env::temp_dir().join(format!("datawash_clip_{}.wav", std::process::id()));
        std::fs::write(&audio, b"RIFF").unwrap();

        let config = WhisperConfig::builder()
            .base_url("http://127.0.0.1:9/v1/audio/transcriptions")
            .timeout_secs(2)
            .language("en")
            .build();
        let transcriber = WhisperTranscriber::with_config("test-key", config).unwrap();

        let err = transcriber.transcribe(&audio).unwrap_err();
        assert!(err.is_external());

        let _ = std::fs::remove_file(audio);
    }
}
