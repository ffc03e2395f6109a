//! Collaborator traits for instruction translation and transcription.
//!
//! Implementations are constructed and owned by the caller and passed where
//! needed; there is no process-wide model or client.
//!
//! # Error Handling
//!
//! Every failure (transport, non-success status, unusable reply) must be
//! returned as [`CleaningError::ExternalService`](crate::error::CleaningError::ExternalService).
//! Nothing here touches a dataset, so a failure cannot leave a cleaning
//! stage partially applied.

use super::DataCommand;
use crate::error::Result;
use std::path::Path;

/// Translates a free-text instruction into structured data commands.
pub trait InstructionTranslator: Send + Sync {
    /// Translate `instruction` given the dataset's column names.
    fn translate(&self, instruction: &str, columns: &[String]) -> Result<Vec<DataCommand>>;

    /// Get the translator name for logging and debugging.
    fn name(&self) -> &str;

    /// Get the model being used, if the backend exposes one.
    fn model(&self) -> Option<&str> {
        None
    }
}

/// Turns an audio file into plain text.
pub trait Transcriber: Send + Sync {
    fn transcribe(&self, audio_path: &Path) -> Result<String>;

    fn name(&self) -> &str;
}
