//! Error types for the snooze bridge

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

/// Result type alias for bridge operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in the snooze bridge
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),

    /// Language model error (bad status, malformed or empty response)
    #[error("language model error: {0}")]
    Llm(String),

    /// Speech runtime executable could not be located
    #[error("runtime executable `{0}` not found on PATH or in fallback locations")]
    RuntimeNotFound(String),

    /// Speech synthesis script does not exist
    #[error("speech script not found at {}", .0.display())]
    ScriptNotFound(PathBuf),

    /// Speech synthesis process exceeded its time limit
    #[error("speech synthesis timed out after {after:?}: {stderr}")]
    SpeechTimeout {
        /// Configured limit
        after: Duration,
        /// Standard error captured before the process was killed
        stderr: String,
    },

    /// Speech synthesis process exited unsuccessfully
    #[error("speech synthesis exited with code {code}: {stderr}")]
    SpeechFailed {
        /// Exit code, `-1` when terminated by a signal
        code: i32,
        /// Captured standard error
        stderr: String,
    },

    /// IO error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// HTTP error
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// Serialization error
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// TOML parsing error
    #[error("toml error: {0}")]
    Toml(#[from] toml::de::Error),
}
