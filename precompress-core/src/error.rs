//! Error types for precompression

use thiserror::Error;

/// Errors that can occur while collecting or compressing build assets
#[derive(Error, Debug)]
pub enum CompressionError {
    /// Compression operation failed
    #[error("Compression failed: {0}")]
    CompressionFailed(String),

    /// Invalid compression level
    #[error("Invalid compression level: {0} (must be between {1} and {2})")]
    InvalidLevel(i64, i64, i64),

    /// An option was present but had the wrong shape
    #[error("Invalid compression option `{key}`: {reason}")]
    InvalidOption { key: String, reason: String },

    /// Unsupported algorithm
    #[error("Unsupported compression algorithm: {0}")]
    UnsupportedAlgorithm(String),

    /// IO error during collection or output
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// The bundle hook ran before the build configuration was resolved
    #[error("Build configuration has not been resolved")]
    NotConfigured,
}

impl CompressionError {
    pub(crate) fn invalid_option(key: &str, reason: impl Into<String>) -> Self {
        Self::InvalidOption {
            key: key.to_string(),
            reason: reason.into(),
        }
    }
}
