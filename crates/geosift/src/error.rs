//! Error types for the geosift library.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for geosift operations.
#[derive(Debug, Error)]
pub enum GeoSiftError {
    /// Error reading or writing a file.
    #[error("IO error for '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Error from the CSV library.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Empty file or no rows to process.
    #[error("Empty data: {0}")]
    EmptyData(String),

    /// A column role required by the flow could not be resolved.
    #[error("No {role} column found among: {available}")]
    MissingColumn { role: String, available: String },

    /// Configuration error (credentials, batch size, client setup).
    #[error("Configuration error: {0}")]
    Config(String),

    /// Failure talking to the completion service or reading its reply.
    #[error("Remote call failed: {0}")]
    Remote(String),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for geosift operations.
pub type Result<T> = std::result::Result<T, GeoSiftError>;
