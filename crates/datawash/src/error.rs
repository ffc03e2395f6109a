//! Error types for the profiling, suggestion and cleaning pipeline.
//!
//! Errors are serializable so a presentation layer can receive them as
//! `{code, message}` records alongside the profile and report data.

use serde::Serialize;
use serde::ser::SerializeStruct;
use thiserror::Error;

/// The main error type for the cleaning pipeline.
#[derive(Error, Debug)]
pub enum CleaningError {
    /// A referenced column does not exist.
    #[error("Column '{0}' not found in dataset")]
    ColumnNotFound(String),

    /// Configuration or rule thresholds failed validation.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Median/mode imputation has no value to work with (all-null column).
    #[error("No imputation value available for column '{column}': column has no non-null values")]
    NoImputationValue { column: String },

    /// A collaborator outside the core (instruction translation,
    /// transcription) failed.
    #[error("External service '{service}' failed: {message}")]
    ExternalService { service: String, message: String },

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Polars error wrapper.
    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    /// Report, profile or command JSON failed to (de)serialize.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// An error wrapped with the step that produced it.
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<CleaningError>,
    },
}

impl CleaningError {
    /// Build an [`CleaningError::ExternalService`] error.
    pub fn external(service: impl Into<String>, message: impl Into<String>) -> Self {
        CleaningError::ExternalService {
            service: service.into(),
            message: message.into(),
        }
    }

    /// Wrap the error with the step that failed.
    pub fn with_context(self, context: impl Into<String>) -> Self {
        CleaningError::WithContext {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// Stable code for a presentation layer to branch on.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::ColumnNotFound(_) => "COLUMN_NOT_FOUND",
            Self::InvalidConfig(_) => "INVALID_CONFIG",
            Self::NoImputationValue { .. } => "NO_IMPUTATION_VALUE",
            Self::ExternalService { .. } => "EXTERNAL_SERVICE_ERROR",
            Self::Io(_) => "IO_ERROR",
            Self::Polars(_) => "POLARS_ERROR",
            Self::Json(_) => "JSON_ERROR",
            Self::WithContext { source, .. } => source.error_code(),
        }
    }

    /// Check if this error came from an external collaborator.
    pub fn is_external(&self) -> bool {
        match self {
            Self::ExternalService { .. } => true,
            Self::WithContext { source, .. } => source.is_external(),
            _ => false,
        }
    }

    /// Check if this error is recoverable, i.e. the caller can skip the
    /// affected step and continue.
    pub fn is_recoverable(&self) -> bool {
        match self {
            Self::NoImputationValue { .. } | Self::ExternalService { .. } => true,
            Self::WithContext { source, .. } => source.is_recoverable(),
            _ => false,
        }
    }
}

/// Errors are serialized as a struct with `code` and `message` fields.
impl Serialize for CleaningError {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let mut state = serializer.serialize_struct("CleaningError", 2)?;
        state.serialize_field("code", &self.error_code())?;
        state.serialize_field("message", &self.to_string())?;
        state.end()
    }
}

/// Result type alias for cleaning operations.
pub type Result<T> = std::result::Result<T, CleaningError>;

/// Attach step context to fallible results.
pub trait ResultExt<T> {
    fn context(self, context: impl Into<String>) -> Result<T>;
}

impl<T> ResultExt<T> for Result<T> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.with_context(context))
    }
}

impl<T> ResultExt<T> for std::result::Result<T, polars::error::PolarsError> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| CleaningError::Polars(e).with_context(context))
    }
}
