//! Error types for the Crosswalk CLI

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for CLI operations
pub type Result<T> = std::result::Result<T, CliError>;

/// CLI error types
#[derive(Error, Debug)]
pub enum CliError {
    /// Configuration file not found
    #[error("Configuration file not found: {path}")]
    ConfigNotFound { path: PathBuf },

    /// Configuration file read error
    #[error("Failed to read configuration file {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Configuration parse error
    #[error("Failed to parse configuration file {path}: {message}")]
    ConfigParse { path: PathBuf, message: String },

    /// CSV file could not be opened or parsed
    #[error("Failed to read CSV {path}: {source}")]
    CsvRead {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    /// CSV content does not match the expected layout
    #[error("Invalid input in {path}: {source}")]
    Input {
        path: PathBuf,
        #[source]
        source: crosswalk::Error,
    },

    /// Requested framework does not exist in the loaded data
    #[error("Unknown framework: {name}. Available: {available}")]
    UnknownFramework { name: String, available: String },

    /// Analysis error
    #[error(transparent)]
    Analysis(#[from] crosswalk::Error),

    /// Missing required configuration
    #[error("Missing required configuration: {field}")]
    MissingRequired { field: String },

    /// Invalid configuration value
    #[error("Invalid value for {field}: {message}")]
    InvalidValue { field: String, message: String },

    /// File write error
    #[error("Failed to write file {path}: {source}")]
    FileWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Logging setup failed
    #[error("Failed to initialize logging: {message}")]
    Logging { message: String },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl CliError {
    /// Create a missing required field error
    pub fn missing(field: impl Into<String>) -> Self {
        Self::MissingRequired {
            field: field.into(),
        }
    }

    /// Create an invalid value error
    pub fn invalid(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidValue {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Attach the list of known frameworks to an unknown-framework error
    pub fn with_available<'a>(err: crosswalk::Error, labels: impl Iterator<Item = &'a str>) -> Self {
        match err {
            crosswalk::Error::UnknownFramework { name } => {
                let available: Vec<&str> = labels.collect();
                Self::UnknownFramework {
                    name,
                    available: if available.is_empty() {
                        "(none)".to_string()
                    } else {
                        available.join(", ")
                    },
                }
            }
            other => Self::Analysis(other),
        }
    }
}
