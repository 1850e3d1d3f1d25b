//! CLI error types.

use std::path::PathBuf;

use thiserror::Error;

/// CLI error type.
#[derive(Debug, Error)]
pub enum CliError {
    /// Invalid date format.
    #[error("Invalid date format: {0}. Use YYYY-MM-DD or YYYYMMDD.")]
    InvalidDate(String),

    /// A bond file could not be read.
    #[error("Cannot read bonds from {}: {message}", path.display())]
    BondFile {
        /// File that failed.
        path: PathBuf,
        /// What went wrong.
        message: String,
    },

    /// A curve file could not be read.
    #[error("Cannot read curve from {}: {message}", path.display())]
    CurveFile {
        /// File that failed.
        path: PathBuf,
        /// What went wrong.
        message: String,
    },

    /// The requested bond is not in the file.
    #[error("Bond not found: {0}")]
    BondNotFound(String),

    /// No bond could be estimated.
    #[error("No estimates produced: {0}")]
    NoEstimates(String),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(#[from] versified_config::ConfigError),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// CLI result type.
pub type CliResult<T> = Result<T, CliError>;
