//! Error types for the precompress CLI.

use std::fmt;

/// Result type for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

/// CLI error types.
#[derive(Debug)]
pub enum CliError {
    /// IO error (file operations, etc.)
    Io(std::io::Error),

    /// Configuration file or flag error
    Config(String),

    /// Invalid argument
    InvalidArgument(String),

    /// Watch error
    Watch(String),

    /// Compression pipeline error
    Compression(precompress_core::CompressionError),
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::Io(e) => write!(f, "IO error: {}", e),
            CliError::Config(msg) => write!(f, "Configuration error: {}", msg),
            CliError::InvalidArgument(msg) => write!(f, "Invalid argument: {}", msg),
            CliError::Watch(msg) => write!(f, "Watch error: {}", msg),
            CliError::Compression(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for CliError {}

impl From<std::io::Error> for CliError {
    fn from(e: std::io::Error) -> Self {
        CliError::Io(e)
    }
}

impl From<precompress_core::CompressionError> for CliError {
    fn from(e: precompress_core::CompressionError) -> Self {
        CliError::Compression(e)
    }
}

impl From<toml::de::Error> for CliError {
    fn from(e: toml::de::Error) -> Self {
        CliError::Config(e.to_string())
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        CliError::Config(e.to_string())
    }
}

impl From<notify::Error> for CliError {
    fn from(e: notify::Error) -> Self {
        CliError::Watch(e.to_string())
    }
}
