//! Error types for the chirp application layer.

use std::path::PathBuf;
use thiserror::Error;

/// Result type for chirp operations.
pub type Result<T> = std::result::Result<T, ChirpError>;

/// Errors raised while loading or checking configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Config file exists but could not be read.
    #[error("Failed to read config {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Config file is not valid TOML or has wrongly typed fields.
    #[error("Failed to parse config {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    /// Explicitly requested config file does not exist.
    #[error("Config file not found: {}", .0.display())]
    NotFound(PathBuf),

    /// A value is out of its allowed range.
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Top-level application error.
#[derive(Debug, Error)]
pub enum ChirpError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("LLM setup failed: {0}")]
    Llm(#[from] llm::LlmError),

    #[error("X API setup failed: {0}")]
    Api(#[from] xapi::XApiError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
