//! Error types for the printer library

use thiserror::Error;

/// Direct byte-channel failures
///
/// Callers recover from these by falling back to the network print service.
#[derive(Debug, Error)]
pub enum TransportError {
    /// Device missing or unreachable
    #[error("Device unavailable: {0}")]
    Unavailable(String),

    /// Device exists but access was not granted
    #[error("Access denied: {0}")]
    Denied(String),

    /// Writing to an open channel failed
    #[error("Write failed: {0}")]
    Write(String),

    /// Timeout while opening the channel
    #[error("Timeout: {0}")]
    Timeout(String),
}

/// Printer error types
#[derive(Debug, Error)]
pub enum PrintError {
    /// Direct channel could not be opened or written
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    /// Network print service did not answer with success
    #[error("Print service unavailable: {0}")]
    ServiceUnavailable(String),

    /// No transport is available in this environment
    #[error("No print transport available")]
    NoTransport,

    /// Invalid printer configuration
    #[error("Invalid config: {0}")]
    InvalidConfig(String),
}

impl PrintError {
    /// Whether the failure came from the direct byte channel
    pub fn is_transport(&self) -> bool {
        matches!(self, PrintError::Transport(_))
    }
}

/// Result type for printer operations
pub type PrintResult<T> = Result<T, PrintError>;
