//! Error types for the CapFlow ingestion pipeline.

use std::io;
use thiserror::Error;

/// Result type alias using [`CapFlowError`] as the error type.
pub type Result<T> = std::result::Result<T, CapFlowError>;

/// Top-level error type for pipeline operations.
///
/// Parse-level failures never appear here: the streaming parser downgrades
/// them to diagnostics. This type covers the failures that do stop an
/// operation, such as an unreadable source file or a bad configuration.
#[derive(Debug, Error)]
pub enum CapFlowError {
    /// Configuration errors
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// I/O errors obtaining the underlying bytes of a source
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Internal errors that shouldn't normally occur
    #[error("internal error: {0}")]
    Internal(String),
}

/// Errors loading or validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Configuration file not found
    #[error("configuration file not found: {path}")]
    FileNotFound { path: String },

    /// Failed to load configuration
    #[error("failed to load configuration from {path}: {reason}")]
    LoadFailed { path: String, reason: String },

    /// Invalid configuration value
    #[error("invalid configuration value for '{field}': {reason}")]
    InvalidValue { field: String, reason: String },

    /// Duplicate source name
    #[error("duplicate source name: {name}")]
    DuplicateSourceName { name: String },
}

impl ConfigError {
    /// Creates a file not found error.
    pub fn file_not_found(path: impl Into<String>) -> Self {
        Self::FileNotFound { path: path.into() }
    }

    /// Creates a load failed error.
    pub fn load_failed(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::LoadFailed {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Creates an invalid value error.
    pub fn invalid_value(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidValue {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_error_helpers() {
        let err = ConfigError::file_not_found("/etc/capflow/config.yaml");
        assert!(matches!(err, ConfigError::FileNotFound { .. }));

        let err = ConfigError::invalid_value("logging.level", "no such level");
        assert!(err.to_string().contains("logging.level"));
    }

    #[test]
    fn io_error_conversion() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let err: CapFlowError = io_err.into();
        assert!(matches!(err, CapFlowError::Io(_)));
    }
}
