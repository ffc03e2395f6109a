//! External collaborators: instruction translation and audio transcription.
//!
//! The cleaning core never calls these. A host application constructs a
//! collaborator, owns it, and shows its output to a human; translated
//! [`DataCommand`]s are never executed here.
//!
//! # Feature Flag
//!
//! The traits and [`parse_commands`] are always available. The concrete
//! HTTP implementations require the `ai` feature (enabled by default).
//!
//! ```toml
//! # Disable the HTTP collaborators for a smaller binary
//! datawash = { version = "0.1", default-features = false }
//! ```

mod command;
mod provider;

pub use command::{parse_commands, DataCommand};
pub use provider::{InstructionTranslator, Transcriber};

#[cfg(feature = "ai")]
mod openai;
#[cfg(feature = "ai")]
mod whisper;

#[cfg(feature = "ai")]
pub use openai::{OpenAiConfig, OpenAiConfigBuilder, OpenAiTranslator};

#[cfg(feature = "ai")]
pub use whisper::{WhisperConfig, WhisperConfigBuilder, WhisperTranscriber};
