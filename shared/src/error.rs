//! Error types for settings persistence

use thiserror::Error;

/// Settings store error types
#[derive(Debug, Error)]
pub enum SettingsError {
    /// Backing file could not be read or written
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Stored value is not valid JSON for the requested type
    #[error("Invalid JSON for key {key}: {source}")]
    Json {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    /// Backing file is not a JSON object
    #[error("Corrupt store file: {0}")]
    Corrupt(String),
}

/// Result type for settings operations
pub type SettingsResult<T> = Result<T, SettingsError>;
